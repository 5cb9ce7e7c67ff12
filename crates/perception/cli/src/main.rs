//! perceive - replay perception scenarios
//!
//! Reads a JSON scenario, resolves what every observer perceives of the
//! acting source, applies recorded overrides and prints the outcome as JSON.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use perception_types::PrivacyPolicy;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod scenario;

use config::AppConfig;
use scenario::Scenario;

/// Perception scenario CLI
#[derive(Parser)]
#[command(name = "perceive")]
#[command(about = "Replay a perception scenario and print detection results", long_about = None)]
#[command(version)]
struct Cli {
    /// Scenario file (JSON)
    scenario: PathBuf,

    /// Configuration file path
    #[arg(short, long, env = "PERCEPTION_CONFIG")]
    config: Option<String>,

    /// Privacy policy (transparent, standard, obscured, strict)
    #[arg(short, long)]
    privacy: Option<String>,

    /// Log level
    #[arg(long, env = "PERCEPTION_LOG_LEVEL")]
    log_level: Option<String>,

    /// Enable JSON logging
    #[arg(long, env = "PERCEPTION_LOG_JSON")]
    json: bool,

    /// Pretty-print the result
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config =
        AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    // Override with CLI args
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    if cli.json {
        config.logging.json = true;
    }
    if let Some(privacy) = &cli.privacy {
        config.perception.engine.privacy = parse_privacy(privacy)?;
    }

    init_tracing(&config);

    let scenario = Scenario::from_path(&cli.scenario)
        .with_context(|| format!("Failed to load scenario {}", cli.scenario.display()))?;

    let (engine, store) =
        scenario::build(&config.perception).context("Invalid perception configuration")?;
    let store = Arc::new(store);
    store.start_cleanup_task();

    let outcome = scenario::replay(&scenario, &engine, &store)?;
    store.destroy();

    let rendered = if cli.pretty {
        serde_json::to_string_pretty(&outcome)?
    } else {
        serde_json::to_string(&outcome)?
    };
    println!("{}", rendered);

    info!(detected = outcome.report.detections.len(), "Done");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    // Logs go to stderr so stdout stays valid JSON
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.logging.level.clone().into());

    if config.logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn parse_privacy(value: &str) -> anyhow::Result<PrivacyPolicy> {
    match value.to_lowercase().as_str() {
        "transparent" => Ok(PrivacyPolicy::Transparent),
        "standard" => Ok(PrivacyPolicy::Standard),
        "obscured" => Ok(PrivacyPolicy::Obscured),
        "strict" => Ok(PrivacyPolicy::Strict),
        other => anyhow::bail!("Unknown privacy policy: {}", other),
    }
}
