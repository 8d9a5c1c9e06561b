//! # API Server Module
//!
//! ## Purpose
//! REST API server exposing the query router and document ingestion over HTTP
//! with structured JSON responses.
//!
//! ## Input/Output Specification
//! - **Input**: HTTP requests with queries or upload paths
//! - **Output**: JSON responses with rendered text and response kinds
//! - **Endpoints**: Query, upload, health, stats
//!
//! ## Key Features
//! - CORS support for web frontends
//! - Structured error rendering into the response channel
//! - Component statistics endpoint

use crate::errors::{NavigatorError, Result};
use crate::route::ResponseKind;
use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use serde::{Deserialize, Serialize};
use tracing::info;

/// HTTP server wrapping the application state
pub struct ApiServer {
    app_state: crate::AppState,
}

/// Query request payload
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

/// Query response payload
#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub response: String,
    pub kind: String,
}

/// Upload request payload
#[derive(Debug, Deserialize)]
pub struct UploadRequest {
    pub path_or_url: String,
}

/// Upload response payload
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub sections_loaded: usize,
}

impl ApiServer {
    pub fn new(app_state: crate::AppState) -> Self {
        Self { app_state }
    }

    /// Run the API server until shutdown
    pub async fn run(self) -> Result<()> {
        let bind_addr = format!(
            "{}:{}",
            self.app_state.config.server.host, self.app_state.config.server.port
        );
        let enable_cors = self.app_state.config.server.enable_cors;

        info!("Starting API server on {}", bind_addr);

        let app_state = self.app_state.clone();
        HttpServer::new(move || {
            let cors = if enable_cors {
                Cors::permissive()
            } else {
                Cors::default()
            };

            App::new()
                .wrap(cors)
                .app_data(web::Data::new(app_state.clone()))
                .route("/query", web::post().to(query_handler))
                .route("/upload", web::post().to(upload_handler))
                .route("/health", web::get().to(health_handler))
                .route("/stats", web::get().to(stats_handler))
                .route("/", web::get().to(index_handler))
        })
        .bind(&bind_addr)
        .map_err(|e| NavigatorError::Internal {
            message: format!("Failed to bind server to {}: {}", bind_addr, e),
        })?
        .run()
        .await
        .map_err(|e| NavigatorError::Internal {
            message: format!("Server error: {}", e),
        })?;

        Ok(())
    }
}

fn kind_label(kind: ResponseKind) -> &'static str {
    match kind {
        ResponseKind::Answer => "answer",
        ResponseKind::NoMatch => "no_match",
        ResponseKind::Fallback => "fallback",
        ResponseKind::Error => "error",
    }
}

/// Query endpoint handler
async fn query_handler(
    app_state: web::Data<crate::AppState>,
    request: web::Json<QueryRequest>,
) -> ActixResult<HttpResponse> {
    let routed = app_state.router.handle(&request.query).await;

    Ok(HttpResponse::Ok().json(QueryResponse {
        response: routed.text,
        kind: kind_label(routed.kind).to_string(),
    }))
}

/// Upload endpoint handler. Extraction failures render into the message
/// channel as `Error: <message>`.
async fn upload_handler(
    app_state: web::Data<crate::AppState>,
    request: web::Json<UploadRequest>,
) -> ActixResult<HttpResponse> {
    let message = match app_state.ingestor.ingest(&request.path_or_url).await {
        Ok(message) => message,
        Err(e) => format!("Error: {}", e),
    };

    Ok(HttpResponse::Ok().json(UploadResponse { message }))
}

/// Health check endpoint handler
async fn health_handler(app_state: web::Data<crate::AppState>) -> ActixResult<HttpResponse> {
    let response = HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        sections_loaded: app_state.router.section_count(),
    };

    Ok(HttpResponse::Ok().json(response))
}

/// Statistics endpoint handler
async fn stats_handler(app_state: web::Data<crate::AppState>) -> ActixResult<HttpResponse> {
    let response = serde_json::json!({
        "sections_loaded": app_state.router.section_count(),
        "corpus_documents": app_state.router.corpus_len(),
        "uploaded_documents": app_state.router.uploads().len(),
    });

    Ok(HttpResponse::Ok().json(response))
}

/// Index page handler
async fn index_handler() -> ActixResult<HttpResponse> {
    let html = r#"
    <!DOCTYPE html>
    <html>
    <head>
        <title>Policy Navigator</title>
        <style>
            body { font-family: Arial, sans-serif; margin: 40px; }
            .header { color: #2c3e50; }
            .endpoint { margin: 20px 0; padding: 15px; background: #f8f9fa; border-radius: 5px; }
            .method { font-weight: bold; color: #27ae60; }
        </style>
    </head>
    <body>
        <h1 class="header">Policy Navigator API</h1>
        <p>Ask natural-language questions about government regulations and case law.</p>

        <h2>Available Endpoints</h2>

        <div class="endpoint">
            <span class="method">POST</span> /query
            <p>Route a free-text query to the regulation, case-law, or section-store handlers.</p>
        </div>

        <div class="endpoint">
            <span class="method">POST</span> /upload
            <p>Ingest a document (PDF/TXT) into the uploaded-document index.</p>
        </div>

        <div class="endpoint">
            <span class="method">GET</span> /health
            <p>Check the health status of the service.</p>
        </div>

        <div class="endpoint">
            <span class="method">GET</span> /stats
            <p>Get index and dataset statistics.</p>
        </div>

        <h2>Example Query Request</h2>
        <pre>{
  "query": "What happened in the last 30 days at the Federal Register regarding executive orders?"
}</pre>
    </body>
    </html>
    "#;

    Ok(HttpResponse::Ok().content_type("text/html").body(html))
}
