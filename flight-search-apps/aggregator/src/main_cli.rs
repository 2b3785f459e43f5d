//!  Flight Search Aggregator
//!
//!  Copyright (C) 2026  Flight Search Aggregator Contributors
//!
//!  This program is free software: you can redistribute it and/or modify
//!  it under the terms of the GNU Affero General Public License as published by
//!  the Free Software Foundation, either version 3 of the License, or
//!  (at your option) any later version.
//!
//!  This program is distributed in the hope that it will be useful,
//!  but WITHOUT ANY WARRANTY; without even the implied warranty of
//!  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//!  GNU Affero General Public License for more details.
//!
//!  You should have received a copy of the GNU Affero General Public License
//!  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Demo CLI: wires a handful of providers into a registry, runs one search,
//! and renders the results as a terminal table.

use std::sync::Arc;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use flightsearch_aggregator::aggregator::AggregatorConfig;
use flightsearch_aggregator::providers::fixture::{sample_flight_priced, FixtureProvider};
use flightsearch_aggregator::providers::partner_feed::PartnerFeedProvider;
use flightsearch_aggregator::provider::ProviderRegistry;
use flightsearch_aggregator::validator::RawSearchRequest;
use flightsearch_aggregator::{search, Flight, SearchError};

#[derive(Parser, Debug)]
#[command(name = "flightsearch-cli", about = "Search flights across registered providers")]
struct CliArgs {
    /// Origin IATA code, e.g. CGK
    origin: String,
    /// Destination IATA code, e.g. DPS
    destination: String,
    /// Departure date, YYYY-MM-DD
    departure_date: String,

    #[arg(long, default_value = "1")]
    passengers: u8,

    #[arg(long, default_value = "economy")]
    class: String,

    #[arg(long, default_value = "bestValue")]
    sort_by: String,

    #[arg(long)]
    max_price: Option<f64>,

    #[arg(long)]
    max_stops: Option<u32>,

    /// Path to a partner feed JSON file; omitted = only the built-in sample provider runs.
    #[arg(long)]
    partner_feed: Option<String>,

    #[arg(long, default_value = "2000")]
    provider_timeout_ms: u64,

    #[arg(long, default_value = "5000")]
    global_timeout_ms: u64,

    #[arg(short, long)]
    verbose: bool,
}

fn setup_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn build_registry(args: &CliArgs) -> ProviderRegistry {
    let mut registry = ProviderRegistry::new();
    registry.register(Arc::new(FixtureProvider::new(
        "sample",
        vec![
            sample_flight_priced("sample-1", "GA", 1_250_000.0, 145, 0),
            sample_flight_priced("sample-2", "QZ", 980_000.0, 205, 1),
        ],
    )));
    if let Some(path) = &args.partner_feed {
        registry.register(Arc::new(PartnerFeedProvider::new("partner", path.clone())));
    }
    registry
}

fn get_terminal_width() -> usize {
    term_size::dimensions().map(|(w, _)| w).unwrap_or(100)
}

fn calc_column_widths(total_width: usize) -> [usize; 5] {
    // airline | departure | arrival | duration/stops | price
    let fixed = total_width.saturating_sub(4 * 3);
    [
        fixed * 20 / 100,
        fixed * 25 / 100,
        fixed * 25 / 100,
        fixed * 15 / 100,
        fixed * 15 / 100,
    ]
}

fn render_results(flights: &[Flight]) {
    if flights.is_empty() {
        println!("No flights matched.");
        return;
    }

    let widths = calc_column_widths(get_terminal_width());
    println!(
        "{:<aw$} {:<dw$} {:<rw$} {:<sw$} {:<pw$}",
        "AIRLINE",
        "DEPARTS",
        "ARRIVES",
        "DUR/STOPS",
        "PRICE",
        aw = widths[0],
        dw = widths[1],
        rw = widths[2],
        sw = widths[3],
        pw = widths[4],
    );
    for flight in flights {
        let stops_label = match flight.stops {
            0 => "nonstop".to_string(),
            n => format!("{n} stop{}", if n == 1 { "" } else { "s" }),
        };
        println!(
            "{:<aw$} {:<dw$} {:<rw$} {:<sw$} {:<pw$}",
            format!("{} {}", flight.airline.code, flight.flight_number),
            flight.departure.date_time.format("%H:%M"),
            flight.arrival.date_time.format("%H:%M"),
            format!("{} / {}", flight.duration.formatted, stops_label),
            format!("{:.0} {}", flight.price.amount, flight.price.currency),
            aw = widths[0],
            dw = widths[1],
            rw = widths[2],
            sw = widths[3],
            pw = widths[4],
        );
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    setup_logging(args.verbose);

    let registry = build_registry(&args);
    let config = AggregatorConfig {
        provider_timeout: std::time::Duration::from_millis(args.provider_timeout_ms),
        global_timeout: std::time::Duration::from_millis(args.global_timeout_ms),
    };

    let request = RawSearchRequest {
        origin: args.origin.clone(),
        destination: args.destination.clone(),
        departure_date: args.departure_date.clone(),
        passengers: Some(args.passengers),
        class: Some(args.class.clone()),
        sort_by: Some(args.sort_by.clone()),
        filters: if args.max_price.is_some() || args.max_stops.is_some() {
            Some(flightsearch_aggregator::validator::RawFilterOptions {
                max_price: args.max_price,
                max_stops: args.max_stops,
                ..Default::default()
            })
        } else {
            None
        },
    };

    match search(request, &registry, config, CancellationToken::new()).await {
        Ok(response) => {
            render_results(&response.flights);
            println!(
                "\n{} result(s) in {}ms ({} succeeded, {} failed)",
                response.metadata.total_results,
                response.metadata.search_time_ms,
                response.metadata.providers_succeeded,
                response.metadata.providers_failed,
            );
            Ok(())
        }
        Err(SearchError::InvalidRequest(errors)) => {
            eprintln!("invalid request:");
            for e in errors {
                eprintln!("  {}: {}", e.field, e.message);
            }
            std::process::exit(1);
        }
        Err(SearchError::AllProvidersFailed) => {
            eprintln!("all providers failed");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("search failed: {e}");
            std::process::exit(1);
        }
    }
}
