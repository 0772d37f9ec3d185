//! Symbol catalog loader
//!
//! Loads the process-wide symbol catalog (cache or Finnhub) and looks up
//! every ticker given on the command line.
//!
//! Usage: `symbol-catalog [TICKER...]`

use std::path::Path;
use std::process::ExitCode;
use symbol_catalog::core::registry;
use symbol_catalog::infrastructure::{init_logging, Config};

#[tokio::main]
async fn main() -> ExitCode {
    // Guards flush file logs on drop
    let _guards = match init_logging(Path::new("logs")) {
        Ok(guards) => guards,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = registry::initialize(&config).await {
        tracing::error!("Symbol catalog initialization failed: {}", e);
        return ExitCode::FAILURE;
    }

    let catalog = match registry::catalog() {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    tracing::info!("Symbol catalog ready with {} symbols", catalog.len());

    let mut unknown = false;
    for ticker in std::env::args().skip(1) {
        match catalog.get(&ticker) {
            Some(symbol) => match serde_json::to_string(symbol) {
                Ok(json) => println!("{}", json),
                Err(e) => tracing::error!("Failed to render {}: {}", ticker, e),
            },
            None => {
                println!("{}: unknown ticker", ticker);
                unknown = true;
            }
        }
    }

    if unknown {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
