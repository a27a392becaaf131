//! AI Router - Main Entry Point
//!
//! Batch filter around the routing engine: reads records as JSON, routes
//! them against the configured routes, and prints the named output buckets.

use ai_router::config::RouterConfig;
use ai_router::model::HttpModelCapability;
use ai_router::observability::{init_default_logging, metrics};
use ai_router::record::Record;
use ai_router::routing::ContentRouter;
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use std::io::Read;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tracing::{error, info};

/// Per-item content router delegating route selection to a language model
#[derive(Parser)]
#[command(name = "ai-router")]
#[command(about = "Route JSON records to named branches via a language model")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE", env = "AI_ROUTER_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Route a batch of records read from a file or stdin
    Route {
        /// Input file with a JSON array or JSON Lines of payloads; '-' reads stdin
        #[arg(short, long, default_value = "-")]
        input: String,
        /// Force debug mode regardless of configuration
        #[arg(long)]
        debug: bool,
    },
    /// Validate configuration
    Config {
        /// Show the parsed configuration
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_default_logging();

    let config = match load_configuration(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {e}");
            process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Route { input, debug } => route_records(config, &input, debug).await,
        Commands::Config { show } => handle_config_command(config, show),
    };

    if let Err(e) = result {
        error!("Command failed: {e}");
        process::exit(1);
    }
}

fn load_configuration(config_path: &Option<PathBuf>) -> Result<RouterConfig, Box<dyn std::error::Error>> {
    match config_path {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            Ok(RouterConfig::from_file(path)?)
        }
        None => {
            let default_paths = ["router.toml", "config/router.toml"];

            for path_str in default_paths {
                let path = PathBuf::from(path_str);
                if path.exists() {
                    info!("Loading configuration from: {}", path.display());
                    return Ok(RouterConfig::from_file(&path)?);
                }
            }

            error!("No configuration file found. Provide one with -c/--config or create router.toml");
            process::exit(1);
        }
    }
}

async fn route_records(
    mut config: RouterConfig,
    input: &str,
    debug: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if debug {
        config.router.debug = true;
    }

    let records = read_records(input)?;
    info!(records = records.len(), "Read input records");

    let mut router = ContentRouter::new(config.clone());
    if let Some(section) = config.model.clone() {
        let capability = HttpModelCapability::new(section, config.router.response_format)?;
        router = router.with_model(Arc::new(capability));
    }

    let buckets = router.route_batch(records).await?;

    let mut names = vec!["Default".to_string()];
    names.extend(config.routes.iter().map(|r| r.name.clone()));

    let output: Vec<Value> = names
        .iter()
        .zip(buckets.into_buckets())
        .map(|(name, records)| json!({ "route": name, "records": records }))
        .collect();

    println!("{}", serde_json::to_string_pretty(&output)?);

    info!(snapshot = ?metrics().snapshot(), "Routing metrics");
    Ok(())
}

/// Parse input as a JSON array first, then as JSON Lines
fn read_records(input: &str) -> Result<Vec<Record>, Box<dyn std::error::Error>> {
    let content = if input == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        std::fs::read_to_string(input)?
    };

    if let Ok(values) = serde_json::from_str::<Vec<Value>>(&content) {
        return Ok(values.into_iter().map(Record::new).collect());
    }

    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| Ok(Record::new(serde_json::from_str::<Value>(line)?)))
        .collect()
}

fn handle_config_command(
    config: RouterConfig,
    show: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // Loading already validated; reaching here means the file is usable
    println!(
        "Configuration valid: {} route(s), model backend: {}",
        config.routes.len(),
        if config.model.is_some() { "http" } else { "none" }
    );

    if show {
        println!("{}", toml::to_string_pretty(&config)?);
    }

    Ok(())
}
