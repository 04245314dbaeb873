//! Cache command implementation.

use anyhow::Result;
use colored::Colorize;
use serde_json::json;

use super::{CacheCommand, Services};

/// Execute the cache command.
pub fn execute(services: &Services, command: CacheCommand) -> Result<()> {
    match command {
        CacheCommand::List { json } => list(services, json),
        CacheCommand::Clear => {
            services.resolver.cache().clear();
            println!("Lookup cache cleared");
            Ok(())
        }
    }
}

fn list(services: &Services, json_output: bool) -> Result<()> {
    let cache = services.resolver.cache();
    let store = cache.read();
    let stats = cache.stats();

    if json_output {
        let keywords: Vec<_> = store
            .order
            .iter()
            .filter_map(|key| store.get(key).map(|entry| (key, entry)))
            .map(|(key, entry)| {
                json!({ "keyword": key, "results": entry.results.len(), "ts": entry.timestamp })
            })
            .collect();
        let output = json!({
            "entries": stats.entries,
            "capacity": stats.capacity,
            "keywords": keywords,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if store.is_empty() {
        println!("{}", "No cached keywords".dimmed());
        return Ok(());
    }

    println!("{}", format!("Cached keywords ({}/{})", stats.entries, stats.capacity).bold().cyan());
    for key in &store.order {
        if let Some(entry) = store.get(key) {
            println!("  {:<24} {} result(s)", key, entry.results.len());
        }
    }
    Ok(())
}
