//! Hold and ticket command implementations.
//!
//! Booking errors are never swallowed: the command prints the remote details
//! and exits with a failure status.

use anyhow::{Result, anyhow};
use colored::Colorize;
use serde_json::Value;
use skyroute_abstraction::ProxyError;
use skyroute_client::{booking_reference, ticket_reference};

use super::{Services, parse_payload};

/// Execute the hold command.
pub async fn hold(services: &Services, raw_payload: &str) -> Result<()> {
    let payload = parse_payload(raw_payload)?;
    let data = services.proxy.hold(payload).await.map_err(|e| report("Hold", e))?;
    print_result("Booking held", booking_reference(&data), &data)
}

/// Execute the ticket command.
pub async fn ticket(services: &Services, raw_payload: &str) -> Result<()> {
    let payload = parse_payload(raw_payload)?;
    let data = services.proxy.ticket(payload).await.map_err(|e| report("Ticket", e))?;
    print_result("Ticket issued", ticket_reference(&data), &data)
}

fn print_result(title: &str, reference: Option<String>, data: &Value) -> Result<()> {
    match reference {
        Some(reference) => println!("{} {}", format!("{title}:").green().bold(), reference),
        None => println!("{}", title.green().bold()),
    }
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

fn report(operation: &str, error: ProxyError) -> anyhow::Error {
    if let Some(details) = error.details() {
        eprintln!("{}", "Details:".red());
        eprintln!("{}", serde_json::to_string_pretty(details).unwrap_or_else(|_| details.to_string()));
    }
    anyhow!("{operation} request failed: {error}")
}
