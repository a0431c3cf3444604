#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use dispatch_core::config::DispatchConfig;
use dispatch_core::TripDispatcher;
use tempfile::TempDir;

pub const PASSENGERS_HEADER: &str = "id,name,phone_num";
pub const DRIVERS_HEADER: &str = "id,name,vin,status";
pub const TRIPS_HEADER: &str = "id,driver_id,passenger_id,start_time,end_time,cost,rating";

/// The CSV tables checked in next to the integration tests.
pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

pub fn fixtures_config() -> DispatchConfig {
    DispatchConfig::default().with_data_dir(fixtures_dir())
}

pub fn fixture_dispatcher() -> TripDispatcher {
    TripDispatcher::new(&fixtures_config()).expect("fixture tables should load")
}

/// Number of data rows in a fixture table (lines minus the header).
pub fn fixture_row_count(file: &str) -> usize {
    let contents = fs::read_to_string(fixtures_dir().join(file)).expect("fixture file");
    contents.lines().filter(|line| !line.trim().is_empty()).count() - 1
}

/// A scratch data directory holding the three tables.
pub struct TableDir {
    dir: TempDir,
}

impl TableDir {
    pub fn new(passengers: &[&str], drivers: &[&str], trips: &[&str]) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        write_table(dir.path(), "passengers.csv", PASSENGERS_HEADER, passengers);
        write_table(dir.path(), "drivers.csv", DRIVERS_HEADER, drivers);
        write_table(dir.path(), "trips.csv", TRIPS_HEADER, trips);
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn config(&self) -> DispatchConfig {
        DispatchConfig::default().with_data_dir(self.path())
    }
}

fn write_table(dir: &Path, file: &str, header: &str, rows: &[&str]) {
    let mut contents = String::from(header);
    for row in rows {
        contents.push('\n');
        contents.push_str(row);
    }
    contents.push('\n');
    fs::write(dir.join(file), contents).expect("write table");
}
