mod cli;

use std::path::Path;

use anyhow::{bail, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Commands, ConfigCommands, MetricCommands};
use p2k_server::core::{AppConfig, MetricsClient};
use p2k_server::utils::{generate_token, Metric, METRICS};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "p2k_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Serve { port, host, cors, memory } => {
            let mut config = AppConfig::load(config_path)?;
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(host) = host {
                config.server.host = host;
            }
            config.server.cors |= cors;

            p2k_server::server::run(config, memory).await?;
        }
        Commands::Metric { command } => {
            handle_metric(command, config_path).await?;
        }
        Commands::Config { command } => {
            handle_config(command, config_path)?;
        }
    }

    Ok(())
}

async fn handle_metric(command: MetricCommands, config_path: Option<&Path>) -> Result<()> {
    match command {
        MetricCommands::List => {
            println!("Supported metrics:\n");
            for def in METRICS {
                println!("  {:<28} {:<32} {}", def.name, def.query_id, def.description);
            }
        }
        MetricCommands::Fetch { name, query_id } => {
            let metric: Metric = name.parse().map_err(anyhow::Error::msg)?;
            let query_id = query_id.unwrap_or_else(|| metric.default_query_id().to_string());

            let config = AppConfig::load(config_path)?;
            let client = MetricsClient::from_config(&config.cloudwatch)?;
            let data = client.fetch_metric(metric, &query_id).await?;

            if data.is_empty() {
                println!("No data points for {}", metric);
                return Ok(());
            }

            println!("{} ({} points)\n", metric, data.len());
            for (ts, value) in data.points() {
                println!("  {}  {:.4}", ts.to_rfc3339(), value);
            }
        }
    }

    Ok(())
}

fn handle_config(command: ConfigCommands, config_path: Option<&Path>) -> Result<()> {
    match command {
        ConfigCommands::View => {
            let config = AppConfig::load(config_path)?;
            println!("Configuration ({}):\n", AppConfig::config_path(config_path).display());
            for (key, value) in config.masked_entries() {
                println!("{}: {}", key, value);
            }
        }
        ConfigCommands::Validate => {
            let config = AppConfig::load(config_path)?;
            let errors = config.validate();

            if errors.is_empty() {
                println!("✓ Configuration is valid");
            } else {
                println!("✗ Configuration errors:");
                for error in errors {
                    println!("  - {}", error);
                }
            }
        }
        ConfigCommands::Init { force } => {
            let path = AppConfig::config_path(config_path);
            if path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
            AppConfig::default().save(&path)?;
            println!("✓ Wrote default configuration to {}", path.display());
        }
        ConfigCommands::GenerateToken => {
            println!("{}", generate_token(32));
            println!("\nSet it as server.admin_token or export P2K_ADMIN_TOKEN");
        }
    }

    Ok(())
}
