//! Checkmate Server CLI
//!
//! Starts the fact-check HTTP API.

use checkmate_server::{
    config::{load_credentials, ServerConfig},
    start_server, ServerError,
};
use std::env;
use std::process;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), ServerError> {
    let args: Vec<String> = env::args().collect();

    let config = if args.len() > 2 && args[1] == "--config" {
        ServerConfig::from_file(&args[2])?
    } else if args.len() > 1 && args[1] == "--help" {
        print_help();
        process::exit(0);
    } else {
        ServerConfig::default()
    };

    // Fail before opening anything if a key is missing.
    let credentials = load_credentials()?;

    start_server(config, credentials).await
}

fn print_help() {
    println!("Checkmate Server - Fact-check HTTP API");
    println!();
    println!("USAGE:");
    println!("    checkmate-server [--config <path-to-config.toml>]");
    println!();
    println!("OPTIONS:");
    println!("    --config <file>    Load configuration from TOML file");
    println!("    --help             Print this help message");
    println!();
    println!("ENVIRONMENT:");
    println!("    GEMINI_API_KEY     Gemini API key (required)");
    println!("    SERPER_API_KEY     Serper API key (required)");
    println!("    RUST_LOG           Log filter (default: info)");
    println!("    A .env file in the working directory is read if present.");
    println!();
    println!("CONFIGURATION:");
    println!("    - bind_address / bind_port (default 127.0.0.1:5001)");
    println!("    - database_path (default checkmate.db)");
    println!("    - pool_size (default 4)");
    println!("    - [verifier] model_name, model_timeout_secs, search_timeout_secs,");
    println!("      tool_mode = \"auto\" | \"required\"");
    println!();
}
