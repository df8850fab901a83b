/// CLI argument parsing

use std::path::PathBuf;

use clap::{Parser, Subcommand};

// Build timestamp injected at compile time
pub const VERSION_WITH_BUILD: &str = concat!(env!("CARGO_PKG_VERSION"), " (built: ", env!("BUILD_TIMESTAMP"), ")");

#[derive(Parser)]
#[command(name = "p2k-server")]
#[command(author, version = VERSION_WITH_BUILD, about, long_about = None)]
pub struct Cli {
    /// Config file (defaults to $P2K_CONFIG or ./p2k.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Enable CORS for cross-origin requests
        #[arg(long)]
        cors: bool,

        /// Use a throwaway in-memory database
        #[arg(long)]
        memory: bool,
    },

    /// EC2 instance metrics
    Metric {
        #[command(subcommand)]
        command: MetricCommands,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum MetricCommands {
    /// List supported metrics
    List,

    /// Fetch yesterday's data points for one metric
    Fetch {
        /// CloudWatch metric name, e.g. CPUUtilization
        name: String,

        /// Query id (defaults to the catalog id)
        #[arg(short, long)]
        query_id: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// View configuration
    View,

    /// Validate configuration
    Validate,

    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Generate a random admin token
    GenerateToken,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve() {
        let cli = Cli::try_parse_from(["p2k-server", "serve", "--port", "9000", "--memory"]).unwrap();
        match cli.command {
            Commands::Serve { port, host, cors, memory } => {
                assert_eq!(port, Some(9000));
                assert_eq!(host, None);
                assert!(!cors);
                assert!(memory);
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_parse_metric_fetch() {
        let cli = Cli::try_parse_from([
            "p2k-server", "-c", "alt.toml", "metric", "fetch", "NetworkIn", "--query-id", "q1",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("alt.toml")));
        match cli.command {
            Commands::Metric { command: MetricCommands::Fetch { name, query_id } } => {
                assert_eq!(name, "NetworkIn");
                assert_eq!(query_id.as_deref(), Some("q1"));
            }
            _ => panic!("expected metric fetch"),
        }
    }
}
