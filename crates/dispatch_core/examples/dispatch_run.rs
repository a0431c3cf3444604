//! Load a registry from disk, dispatch trips until the driver pool runs dry,
//! then print what happened.
//!
//! Run with: cargo run -p dispatch_core --example dispatch_run -- [DATA_DIR]
//!
//! DATA_DIR defaults to the integration test fixtures. Set `RUST_LOG=debug`
//! to see driver selection details.

use std::path::PathBuf;

use dispatch_core::config::DispatchConfig;
use dispatch_core::{DispatchError, TripDispatcher};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("dispatch_core=info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    let data_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures"));
    let mut dispatcher = TripDispatcher::new(&DispatchConfig::default().with_data_dir(data_dir))?;

    let passenger_ids: Vec<u32> = dispatcher.passengers().map(|p| p.id).collect();
    println!("--- Dispatching for {} passengers ---", passenger_ids.len());
    for passenger_id in passenger_ids {
        match dispatcher.request_trip(passenger_id) {
            Ok(trip) => println!(
                "  trip {:>3}  passenger={}  driver={}  start={}",
                trip.id, trip.passenger_id, trip.driver_id, trip.start_time
            ),
            Err(DispatchError::NoDriversAvailable) => {
                println!("  passenger {passenger_id}: no drivers available");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }

    println!("\nDrivers:");
    for driver in dispatcher.drivers() {
        let rating = dispatcher
            .store()
            .average_rating(driver.id)?
            .map(|r| format!("{r:.1}"))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<24} {:<11} trips={}  revenue={:.2}  rating={}",
            driver.name,
            driver.status.as_str(),
            driver.trips.len(),
            dispatcher.store().total_revenue(driver.id)?,
            rating,
        );
    }
    Ok(())
}
