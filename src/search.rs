//! Search commands: wiring the HTTP backend into the orchestrator and
//! printing results for the CLI.

use anyhow::Result;
use shepherd_core::search::{Orchestrator, SearchOutcome, NO_DATA_SENTINEL};
use std::sync::Arc;

use crate::client::HttpBackend;
use crate::config::{Config, Credentials};

/// Build an orchestrator backed by the record-store HTTP API.
pub fn build_orchestrator(config: &Config, credentials: Credentials) -> Result<Orchestrator> {
    let backend = HttpBackend::new(&config.backend, credentials)?;
    Ok(Orchestrator::new(Arc::new(backend), config.search.clone()))
}

/// Run one federated search against the configured record stores.
///
/// This is the entry point used by the CLI and the HTTP server. The
/// returned outcome is always well-formed; only client construction can
/// fail.
pub async fn search_context(
    config: &Config,
    credentials: Credentials,
    query: &str,
) -> Result<SearchOutcome> {
    let orchestrator = build_orchestrator(config, credentials)?;
    Ok(orchestrator.search(query).await)
}

/// `shepherd search "<query>"`.
///
/// Prints the context string; `show_diagnostics` appends the diagnostic
/// trace under a separator, `json` prints the whole outcome as JSON.
pub async fn run_search(
    config: &Config,
    query: &str,
    show_diagnostics: bool,
    json: bool,
) -> Result<()> {
    if query.trim().is_empty() {
        println!("{}", NO_DATA_SENTINEL);
        return Ok(());
    }

    let credentials = Credentials::from_env(&config.backend)?;
    let outcome = search_context(config, credentials, query).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    println!("{}", outcome.context);
    if show_diagnostics {
        println!();
        println!("--- diagnostics ---");
        println!("{}", outcome.diagnostics);
    }

    Ok(())
}

/// `shepherd probe`: report which organization the credentials reach.
pub async fn run_probe(config: &Config) -> Result<()> {
    let credentials = Credentials::from_env(&config.backend)?;
    let orchestrator = build_orchestrator(config, credentials)?;
    println!("{}", orchestrator.probe().await);
    Ok(())
}
