use anyhow::Result;
use shepherd_core::search::build_sources;
use shepherd_core::sources::GROUPS_ENDPOINT;

use crate::config::{Config, Credentials};

/// `shepherd sources`: list the record stores a search will query, in
/// order, without contacting any of them.
pub fn list_sources(config: &Config) -> Result<()> {
    println!("{:<16} {:<30} ENABLED", "SOURCE", "ENDPOINT");
    for source in build_sources(&config.search) {
        println!("{:<16} {:<30} true", source.name(), source.endpoint());
    }
    if !config.search.query_groups {
        println!("{:<16} {:<30} false", "Groups API", GROUPS_ENDPOINT);
    }

    println!();
    println!("base url:    {}", config.backend.base_url);
    let creds = match Credentials::from_env(&config.backend) {
        Ok(_) => "OK".to_string(),
        Err(e) => format!("MISSING ({})", e),
    };
    println!("credentials: {}", creds);

    Ok(())
}
