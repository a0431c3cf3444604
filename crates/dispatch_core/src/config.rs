use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Development tables shipped with the crate, read when no directory is configured.
pub const DEFAULT_DATA_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/support");

/// Where the dispatcher reads its three tables from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    pub data_dir: PathBuf,
    pub passengers_file: String,
    pub drivers_file: String,
    pub trips_file: String,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            passengers_file: "passengers.csv".to_string(),
            drivers_file: "drivers.csv".to_string(),
            trips_file: "trips.csv".to_string(),
        }
    }
}

impl DispatchConfig {
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    pub fn with_passengers_file(mut self, file: impl Into<String>) -> Self {
        self.passengers_file = file.into();
        self
    }

    pub fn with_drivers_file(mut self, file: impl Into<String>) -> Self {
        self.drivers_file = file.into();
        self
    }

    pub fn with_trips_file(mut self, file: impl Into<String>) -> Self {
        self.trips_file = file.into();
        self
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn passengers_path(&self) -> PathBuf {
        self.data_dir.join(&self.passengers_file)
    }

    pub fn drivers_path(&self) -> PathBuf {
        self.data_dir.join(&self.drivers_file)
    }

    pub fn trips_path(&self) -> PathBuf {
        self.data_dir.join(&self.trips_file)
    }
}
