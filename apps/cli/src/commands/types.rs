//! Command type definitions shared between main.rs and the command modules.

use clap::{Args, Subcommand};

#[derive(Subcommand, Debug, Clone)]
pub enum CacheCommand {
    /// List cached keywords, newest first
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Remove every cached keyword
    Clear,
}

/// Arguments of a flight offer search.
#[derive(Args, Debug, Clone)]
pub struct FlightSearchArgs {
    /// Origin location code (e.g. MUC)
    #[arg(long)]
    pub origin: Option<String>,

    /// Destination location code (e.g. IST)
    #[arg(long)]
    pub destination: Option<String>,

    /// Departure date (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<String>,

    /// Return date for round trips (YYYY-MM-DD)
    #[arg(long)]
    pub return_date: Option<String>,

    /// Number of adult passengers
    #[arg(long)]
    pub adults: Option<u32>,

    /// Currency code (e.g. EUR)
    #[arg(long)]
    pub currency: Option<String>,

    /// Only non-stop flights
    #[arg(long)]
    pub non_stop: bool,

    /// Extra request attributes as a JSON object, or @file
    #[arg(long)]
    pub payload: Option<String>,
}
