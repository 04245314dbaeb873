//! Search command implementation.

use anyhow::Result;
use colored::Colorize;
use serde_json::json;
use skyroute_client::format_label;

use super::Services;

/// Execute the search command.
pub async fn execute(services: &Services, keyword: &str, json_output: bool) -> Result<()> {
    let outcome = services.resolver.lookup(keyword).await;
    let source = outcome.source();
    let results = outcome.into_results();

    if json_output {
        let output = json!({ "keyword": keyword.trim(), "source": source, "results": results });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("{}", format!("No locations found for '{}'", keyword.trim()).dimmed());
        return Ok(());
    }

    for location in &results {
        println!("  {:<5} {}", location.code().unwrap_or("-").cyan(), format_label(location));
    }
    println!();
    println!("{}", format!("{} result(s) from {}", results.len(), source).dimmed());

    Ok(())
}
