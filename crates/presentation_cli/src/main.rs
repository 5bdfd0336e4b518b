//! Ride wizard CLI
//!
//! Runs the location, search and routing services against the configured
//! maps provider, and walks a reservation from pickup to booking.

#![allow(clippy::print_stdout)]

mod commands;

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use domain::Coordinate;
use infrastructure::{AppConfig, init_telemetry};

/// Ride wizard CLI
#[derive(Debug, Parser)]
#[command(name = "ride-wizard")]
#[command(author, version, about = "Ride reservation wizard CLI", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file (default: ./config.toml if present)
    #[arg(short, long, env = "RIDE_WIZARD_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve a coordinate to an address
    Reverse {
        /// Position as "lat,lng"
        #[arg(value_parser = parse_coordinate)]
        at: Coordinate,
    },

    /// Search places by text
    Search {
        query: String,
    },

    /// Resolve a place id from a search to coordinates
    Details {
        place_id: String,
    },

    /// Compute the driving route between two positions
    Route {
        /// Origin as "lat,lng"
        #[arg(long, value_parser = parse_coordinate)]
        from: Coordinate,

        /// Destination as "lat,lng"
        #[arg(long, value_parser = parse_coordinate)]
        to: Coordinate,
    },

    /// Decode an encoded polyline into coordinates
    Decode {
        polyline: String,
    },

    /// Walk a full reservation and hand it to the booking recorder
    ///
    /// Example: ride-wizard reserve --at 31.5204,74.3587 --destination "Emporium Mall"
    Reserve {
        /// Simulated device position as "lat,lng" (no fix when omitted)
        #[arg(long, value_parser = parse_coordinate)]
        at: Option<Coordinate>,

        /// Answer the location permission prompt with "deny"
        #[arg(long)]
        deny_location: bool,

        /// Destination search text; the first suggestion is used
        #[arg(short, long)]
        destination: String,

        /// Scheduled pickup time (RFC 3339); pickup is immediate when omitted
        #[arg(long)]
        later: Option<DateTime<Utc>>,

        /// Book for someone else
        #[arg(long)]
        passenger_name: Option<String>,

        /// Phone number of the other passenger
        #[arg(long, requires = "passenger_name")]
        passenger_phone: Option<String>,
    },
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}

/// Parse "lat,lng" into a validated coordinate
fn parse_coordinate(value: &str) -> Result<Coordinate, String> {
    let (lat, lng) = value
        .split_once(',')
        .ok_or_else(|| format!("expected \"lat,lng\", got \"{value}\""))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|e| format!("invalid latitude \"{lat}\": {e}"))?;
    let lng: f64 = lng
        .trim()
        .parse()
        .map_err(|e| format!("invalid longitude \"{lng}\": {e}"))?;
    Coordinate::new(lat, lng).map_err(|e| e.to_string())
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<AppConfig> {
    let config = match path {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_ref())?;

    if let Some(filter) = log_filter_from_verbosity(cli.verbose) {
        config.telemetry.log_filter = filter.to_string();
    }
    init_telemetry(&config.telemetry)?;

    let output = match cli.command {
        Commands::Decode { polyline } => commands::decode(&polyline)?,
        command => {
            if let Err(errors) = config.validate() {
                anyhow::bail!("Invalid configuration:\n  {}", errors.join("\n  "));
            }
            run(command, &config).await?
        },
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn run(command: Commands, config: &AppConfig) -> anyhow::Result<serde_json::Value> {
    let maps = commands::maps_adapter(config)?;
    match command {
        Commands::Reverse { at } => commands::reverse(maps, at).await,
        Commands::Search { query } => commands::search(maps, config, &query).await,
        Commands::Details { place_id } => commands::details(maps, config, &place_id).await,
        Commands::Route { from, to } => commands::route(maps, from, to).await,
        Commands::Reserve {
            at,
            deny_location,
            destination,
            later,
            passenger_name,
            passenger_phone,
        } => {
            let request = commands::ReserveRequest {
                device_position: at,
                deny_location,
                destination,
                later,
                passenger_name,
                passenger_phone,
            };
            commands::reserve(maps, config, request).await
        },
        Commands::Decode { polyline } => commands::decode(&polyline),
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn log_filter_from_verbosity_levels() {
        assert_eq!(log_filter_from_verbosity(0), None);
        assert_eq!(log_filter_from_verbosity(1), Some("info"));
        assert_eq!(log_filter_from_verbosity(2), Some("debug"));
        assert_eq!(log_filter_from_verbosity(7), Some("trace"));
    }

    #[test]
    fn parses_coordinates() {
        let coordinate = parse_coordinate("31.5204, 74.3587").unwrap();
        assert!((coordinate.latitude() - 31.5204).abs() < 1e-9);
        assert!((coordinate.longitude() - 74.3587).abs() < 1e-9);
    }

    #[test]
    fn rejects_bad_coordinates() {
        assert!(parse_coordinate("31.5204").is_err());
        assert!(parse_coordinate("north,74.3").is_err());
        assert!(parse_coordinate("95.0,74.3").is_err());
    }

    #[test]
    fn parses_reserve_command() {
        let cli = Cli::try_parse_from([
            "ride-wizard",
            "-vv",
            "reserve",
            "--at",
            "31.5204,74.3587",
            "--destination",
            "Emporium Mall",
            "--later",
            "2030-01-01T09:30:00Z",
            "--passenger-name",
            "Ayesha",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        let Commands::Reserve {
            at,
            destination,
            later,
            passenger_name,
            passenger_phone,
            deny_location,
        } = cli.command
        else {
            panic!("expected reserve command");
        };
        assert!(at.is_some());
        assert_eq!(destination, "Emporium Mall");
        assert!(later.is_some());
        assert_eq!(passenger_name.as_deref(), Some("Ayesha"));
        assert!(passenger_phone.is_none());
        assert!(!deny_location);
    }

    #[test]
    fn passenger_phone_requires_name() {
        let result = Cli::try_parse_from([
            "ride-wizard",
            "reserve",
            "--destination",
            "airport",
            "--passenger-phone",
            "+923001234567",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn route_requires_both_endpoints() {
        assert!(Cli::try_parse_from(["ride-wizard", "route", "--from", "31.5,74.3"]).is_err());
    }
}
