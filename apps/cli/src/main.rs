//! SkyRoute CLI - location lookup and reservation requests from the terminal.
//!
//! Wraps the lookup resolver (cache-first airport search and code labels) and
//! the reservation proxy (flight search, hold, ticket).

mod commands;
mod config;

use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{CacheCommand, FlightSearchArgs, Services, booking, cache, flights, label, search};
use config::CliConfig;

/// SkyRoute CLI - airport lookup and flight reservations
#[derive(Parser, Debug)]
#[command(
    name = "skyroute",
    author,
    version,
    about = "SkyRoute - airport lookup and flight reservation client"
)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Backend base URL (overrides SKYROUTE_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Lookup cache file (overrides SKYROUTE_CACHE_FILE)
    #[arg(long, global = true)]
    cache_file: Option<PathBuf>,

    /// Keep the lookup cache in memory for this run only
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search airports and locations by keyword
    Search {
        /// Free-text keyword (city, airport name or code)
        keyword: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the display label of a location code
    Label {
        /// Location code (e.g. TXL)
        code: String,
    },

    /// Search flight offers
    Flights(FlightSearchArgs),

    /// Place a reservation hold
    Hold {
        /// Booking payload as a JSON object, or @file
        #[arg(long)]
        payload: String,
    },

    /// Issue tickets for a held booking
    Ticket {
        /// Ticket payload as a JSON object, or @file
        #[arg(long)]
        payload: String,
    },

    /// Inspect or clear the lookup cache
    #[command(subcommand)]
    Cache(CacheCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration
    let mut cli_config = CliConfig::discover_and_load();

    // Initialize tracing
    let level = match args.log_level.as_deref().or(cli_config.log_level.as_deref()) {
        Some("trace") => Level::TRACE,
        Some("debug") => Level::DEBUG,
        Some("info") => Level::INFO,
        Some("error") => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // CLI args take precedence
    if let Some(base_url) = args.base_url {
        cli_config.base_url = Some(base_url);
    }
    if let Some(cache_file) = args.cache_file {
        cli_config.cache_file = Some(cache_file);
    }

    // If no command provided, show help
    let Some(command) = args.command else {
        Args::command().print_help()?;
        return Ok(());
    };

    let services = Services::build(&cli_config, args.ephemeral)?;

    match command {
        Command::Search { keyword, json } => search::execute(&services, &keyword, json).await?,
        Command::Label { code } => label::execute(&services, &code).await?,
        Command::Flights(flight_args) => flights::execute(&services, flight_args).await?,
        Command::Hold { payload } => booking::hold(&services, &payload).await?,
        Command::Ticket { payload } => booking::ticket(&services, &payload).await?,
        Command::Cache(cache_command) => cache::execute(&services, cache_command)?,
    }

    Ok(())
}
