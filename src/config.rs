//! # Configuration Management Module
//!
//! ## Purpose
//! Centralized configuration management for the policy navigator, supporting multiple
//! sources (files, environment variables, command line arguments) with validation and
//! type-safe access to all system settings.
//!
//! ## Input/Output Specification
//! - **Input**: Configuration files (TOML), environment variables, CLI arguments
//! - **Output**: Validated configuration structs with defaults and overrides
//! - **Validation**: Type checking, range validation, dependency verification
//!
//! ## Configuration Sources (in order of precedence)
//! 1. Command line arguments (highest priority)
//! 2. Environment variables
//! 3. Configuration files
//! 4. Default values (lowest priority)
//!
//! ## Usage
//! ```rust,ignore
//! use crate::config::Config;
//!
//! // Load from default locations
//! let config = Config::load()?;
//!
//! // Load from specific file
//! let config = Config::from_file("custom.toml")?;
//!
//! // Access configuration
//! println!("Server port: {}", config.server.port);
//! ```

use crate::errors::{NavigatorError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure containing all system settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server and API configuration
    pub server: ServerConfig,
    /// Static section dataset settings
    pub dataset: DatasetConfig,
    /// Embedding settings
    pub embedding: EmbeddingConfig,
    /// Summarization settings
    pub summarize: SummarizeConfig,
    /// Federal Register API adapter settings
    pub federal_register: FederalRegisterConfig,
    /// CourtListener API adapter settings
    pub courtlistener: CourtListenerConfig,
    /// Slack notification sink settings
    pub slack: SlackConfig,
    /// Document ingestion settings
    pub ingest: IngestConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Server and API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server bind address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
}

/// Static section dataset configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Path to the commercial code JSON dataset
    pub commercial_code_path: PathBuf,
}

/// Embedding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Remote embedding service endpoint (fallback embedding used when absent)
    pub endpoint: Option<String>,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

/// Summarization configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizeConfig {
    /// Remote summarization service endpoint (leading-sentence fallback used when absent)
    pub endpoint: Option<String>,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// Number of leading sentences kept by the fallback summarizer
    pub fallback_sentences: usize,
}

/// Federal Register API adapter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FederalRegisterConfig {
    /// API base URL
    pub api_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// Number of documents requested per query
    pub per_page: u32,
}

/// CourtListener API adapter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourtListenerConfig {
    /// API base URL
    pub api_url: String,
    /// API authentication token (required for requests)
    pub api_token: Option<String>,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// Number of opinions requested per query
    pub page_size: u32,
    /// Attempts before giving up on a timed-out request
    pub retry_attempts: u32,
    /// Fixed delay between retry attempts in seconds
    pub retry_delay_seconds: u64,
}

/// Slack notification sink configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlackConfig {
    /// Slack API base URL
    pub api_url: String,
    /// Bot token (notification disabled when absent)
    pub token: Option<String>,
    /// Channel to post to (notification disabled when absent)
    pub channel: Option<String>,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

/// Document ingestion configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Fixed window size in characters when paragraph chunking finds fewer than 2 paragraphs
    pub chunk_window_chars: usize,
    /// Number of uploaded-document chunks retrieved per query
    pub query_top_k: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Enable structured JSON logging
    pub json_format: bool,
}

impl Config {
    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        Self::from_file("config.toml")
    }

    /// Load configuration from a specific file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!("Configuration file not found: {:?}, using defaults", path);
            let mut config = Self::default();
            config.apply_env_overrides()?;
            config.validate()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path).map_err(|e| NavigatorError::Config {
            message: format!("Failed to read config file {:?}: {}", path, e),
        })?;

        let mut config: Config = toml::from_str(&content).map_err(|e| NavigatorError::Config {
            message: format!("Failed to parse config file {:?}: {}", path, e),
        })?;

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("POLICY_NAV_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("POLICY_NAV_PORT") {
            self.server.port = port.parse().map_err(|_| NavigatorError::Config {
                message: "Invalid port number in POLICY_NAV_PORT".to_string(),
            })?;
        }
        if let Ok(dataset) = std::env::var("POLICY_NAV_DATASET") {
            self.dataset.commercial_code_path = PathBuf::from(dataset);
        }
        if let Ok(token) = std::env::var("COURTLISTENER_API_TOKEN") {
            self.courtlistener.api_token = Some(token);
        }
        if let Ok(token) = std::env::var("SLACK_TOKEN") {
            self.slack.token = Some(token);
        }
        if let Ok(channel) = std::env::var("SLACK_CHANNEL") {
            self.slack.channel = Some(channel);
        }

        Ok(())
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(NavigatorError::ValidationFailed {
                field: "server.port".to_string(),
                reason: "Port cannot be zero".to_string(),
            });
        }

        if self.federal_register.per_page == 0 {
            return Err(NavigatorError::ValidationFailed {
                field: "federal_register.per_page".to_string(),
                reason: "Page size must be greater than zero".to_string(),
            });
        }

        if self.courtlistener.retry_attempts == 0 {
            return Err(NavigatorError::ValidationFailed {
                field: "courtlistener.retry_attempts".to_string(),
                reason: "At least one attempt is required".to_string(),
            });
        }

        if self.ingest.chunk_window_chars == 0 {
            return Err(NavigatorError::ValidationFailed {
                field: "ingest.chunk_window_chars".to_string(),
                reason: "Chunk window must be greater than zero".to_string(),
            });
        }

        Ok(())
    }

    /// Get configuration as TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| NavigatorError::Config {
            message: format!("Failed to serialize config to TOML: {}", e),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                enable_cors: true,
            },
            dataset: DatasetConfig {
                commercial_code_path: PathBuf::from("./data/commercial_code.json"),
            },
            embedding: EmbeddingConfig {
                endpoint: None,
                timeout_seconds: 10,
            },
            summarize: SummarizeConfig {
                endpoint: None,
                timeout_seconds: 10,
                fallback_sentences: 2,
            },
            federal_register: FederalRegisterConfig {
                api_url: "https://www.federalregister.gov/api/v1".to_string(),
                timeout_seconds: 10,
                per_page: 1,
            },
            courtlistener: CourtListenerConfig {
                api_url: "https://www.courtlistener.com/api/rest/v3".to_string(),
                api_token: None,
                timeout_seconds: 30,
                page_size: 1,
                retry_attempts: 3,
                retry_delay_seconds: 2,
            },
            slack: SlackConfig {
                api_url: "https://slack.com/api".to_string(),
                token: None,
                channel: None,
                timeout_seconds: 10,
            },
            ingest: IngestConfig {
                chunk_window_chars: 500,
                query_top_k: 2,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                json_format: false,
            },
        }
    }
}
