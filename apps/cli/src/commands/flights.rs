//! Flights command implementation.

use anyhow::{Context, Result};
use serde_json::json;
use skyroute_client::Payload;

use super::{FlightSearchArgs, Services, parse_payload};

/// Execute the flights command.
pub async fn execute(services: &Services, args: FlightSearchArgs) -> Result<()> {
    let payload = build_payload(args)?;
    let data = services.proxy.search(payload).await.context("Flight search failed")?;
    println!("{}", serde_json::to_string_pretty(&data)?);
    Ok(())
}

/// Build the request payload: flags first, then `--payload` attributes on top.
fn build_payload(args: FlightSearchArgs) -> Result<Payload> {
    let mut payload = Payload::new();

    if let Some(origin) = args.origin {
        payload.insert("originLocationCode".to_string(), json!(origin.trim().to_uppercase()));
    }
    if let Some(destination) = args.destination {
        payload
            .insert("destinationLocationCode".to_string(), json!(destination.trim().to_uppercase()));
    }
    if let Some(date) = args.date {
        payload.insert("departureDate".to_string(), json!(date));
    }
    if let Some(return_date) = args.return_date {
        payload.insert("returnDate".to_string(), json!(return_date));
    }
    if let Some(adults) = args.adults {
        payload.insert("adults".to_string(), json!(adults));
    }
    if let Some(currency) = args.currency {
        payload.insert("currencyCode".to_string(), json!(currency.to_uppercase()));
    }
    if args.non_stop {
        payload.insert("nonStop".to_string(), json!(true));
    }

    if let Some(raw) = args.payload {
        payload.extend(parse_payload(&raw)?);
    }

    Ok(payload)
}
