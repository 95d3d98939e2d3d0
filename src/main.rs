//! # Shepherd CLI
//!
//! ```bash
//! shepherd --config ./config/shepherd.toml <command>
//! ```
//!
//! | Command | Description |
//! |---------|-------------|
//! | `shepherd search "<query>"` | Federated search; prints the context string |
//! | `shepherd probe` | Report which organization the credentials reach |
//! | `shepherd sources` | List the record stores a search queries |
//! | `shepherd serve` | Start the HTTP API server |
//! | `shepherd completions <shell>` | Print shell completions |

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use shepherd::{config, search, server, sources};

/// Shepherd — federated search over church record stores.
#[derive(Parser)]
#[command(
    name = "shepherd",
    about = "Shepherd — federated search over church record stores",
    version,
    long_about = "Shepherd fans a staff question out to the people directory, gathering types, \
    calendar events, and small groups, and merges the findings into a context string for a \
    language model plus a separate diagnostic trace for operators."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Credentials are read from the environment variables the file names
    /// (`PCO_APP_ID` / `PCO_SECRET` by default).
    #[arg(long, global = true, default_value = "./config/shepherd.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search every record store for a query.
    ///
    /// Prints the merged context string. Backend failures never abort the
    /// search; they are recorded in the diagnostic trace.
    Search {
        /// The question or name to look up.
        query: String,

        /// Also print the diagnostic trace.
        #[arg(long)]
        diagnostics: bool,

        /// Print the full outcome as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Check which organization the configured credentials reach.
    Probe,

    /// List the record stores a search will query, in order.
    Sources,

    /// Start the HTTP API server on `[server].bind`.
    Serve,

    /// Print shell completions to stdout.
    Completions {
        shell: Shell,
    },
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Commands that don't require config
    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "shepherd", &mut std::io::stdout());
        return Ok(());
    }

    let cfg = config::load_config(&cli.config)?;
    init_tracing(&cfg.logging.level);

    match cli.command {
        Commands::Search {
            query,
            diagnostics,
            json,
        } => {
            search::run_search(&cfg, &query, diagnostics, json).await?;
        }
        Commands::Probe => {
            search::run_probe(&cfg).await?;
        }
        Commands::Sources => {
            sources::list_sources(&cfg)?;
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
        Commands::Completions { .. } => {
            // Handled above (before config loading)
            unreachable!()
        }
    }

    Ok(())
}
