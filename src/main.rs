//! # Policy Navigator Main Driver
//!
//! ## Purpose
//! Main entry point for the policy navigator. Loads configuration, initializes
//! logging and components, then either serves the HTTP API or runs the
//! interactive console menu.
//!
//! ## Input/Output Specification
//! - **Input**: Configuration files, command line arguments, environment variables
//! - **Output**: Running web server, or an interactive query session
//!
//! ## Architecture Flow
//! 1. Parse command line arguments and load configuration
//! 2. Initialize logging and tracing
//! 3. Load the section dataset and build the corpus index
//! 4. Wire the API adapters and notification sink
//! 5. Serve HTTP or run the interactive menu

use clap::{Arg, Command};
use std::io::Write;
use tracing::info;
use tracing_subscriber::EnvFilter;

use policy_navigator::{api::ApiServer, AppState, Config, NavigatorError, Result};

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("policy-navigator")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Policy Navigator Team")
        .about("Keyword-routed retrieval engine for government regulations and case law")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("config.toml"),
        )
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .value_name("PORT")
                .help("Server port")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("interactive")
                .short('i')
                .long("interactive")
                .help("Run the interactive console menu instead of the HTTP server")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let config_path = matches.get_one::<String>("config").unwrap();
    let mut config = Config::from_file(config_path)?;

    if let Some(port) = matches.get_one::<u16>("port") {
        config.server.port = *port;
    }

    init_logging(&config)?;

    info!("Starting Policy Navigator v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration loaded from: {}", config_path);

    let app_state = AppState::from_config(config).await?;

    if matches.get_flag("interactive") {
        return run_interactive(app_state).await;
    }

    let host = app_state.config.server.host.clone();
    let port = app_state.config.server.port;
    info!("Policy Navigator serving on {}:{}", host, port);

    ApiServer::new(app_state).run().await
}

/// Initialize logging and tracing
fn init_logging(config: &Config) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .map_err(|_| NavigatorError::Config {
            message: format!("Invalid log level: {}", config.logging.level),
        })?;

    if config.logging.json_format {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    Ok(())
}

/// Interactive console menu over the query router
async fn run_interactive(app_state: AppState) -> Result<()> {
    println!("Welcome to the Policy Navigator!");

    loop {
        println!();
        println!("Select query type:");
        println!("1. Commercial Code");
        println!("2. EPA");
        println!("3. Federal Register");
        println!("4. Case Law");
        println!("5. Uploaded Documents");
        println!("6. Upload a document");
        println!("7. Exit");

        let choice = prompt("Enter choice (1-7): ")?;
        let choice = choice.trim();

        if choice == "7" || choice.eq_ignore_ascii_case("exit") {
            break;
        }

        match choice {
            "1" | "2" | "3" | "4" => {
                let query = prompt("Enter your query: ")?;
                let response = app_state.router.handle(query.trim()).await;
                println!("\n{}", response.text);
            }
            "5" => {
                let query = prompt("Enter your query: ")?;
                let prefixed = format!("uploaded: {}", query.trim());
                let response = app_state.router.handle(&prefixed).await;
                println!("\n{}", response.text);
            }
            "6" => {
                let path = prompt("Enter a file path or URL: ")?;
                match app_state.ingestor.ingest(path.trim()).await {
                    Ok(message) => println!("\n{}", message),
                    Err(e) => println!("\nError: {}", e),
                }
            }
            _ => println!("Invalid choice. Please select 1-7."),
        }
    }

    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line)
}
