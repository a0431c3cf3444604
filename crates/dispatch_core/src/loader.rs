//! CSV source for the raw registry tables.

use std::path::Path;

use tracing::debug;

use crate::config::DispatchConfig;
use crate::error::LoadError;
use crate::records::RawRecord;

/// The three raw tables, rows in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryTables {
    pub passengers: Vec<RawRecord>,
    pub drivers: Vec<RawRecord>,
    pub trips: Vec<RawRecord>,
}

impl RegistryTables {
    pub fn load(config: &DispatchConfig) -> Result<Self, LoadError> {
        Ok(Self {
            passengers: read_records(&config.passengers_path())?,
            drivers: read_records(&config.drivers_path())?,
            trips: read_records(&config.trips_path())?,
        })
    }
}

/// Reads a headed CSV file into one [`RawRecord`] per row.
pub fn read_records(path: &Path) -> Result<Vec<RawRecord>, LoadError> {
    let csv_error = |source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_error)?;

    let records = reader
        .deserialize::<RawRecord>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(csv_error)?;
    debug!(path = %path.display(), rows = records.len(), "Read table");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn reads_rows_keyed_by_header() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("drivers.csv");
        fs::write(
            &path,
            "id,name,vin,status\n1,Driver 1 (unavailable),WBWSS52P9NEYLVDE9,UNAVAILABLE\n3, Driver 3 (no trips) ,,AVAILABLE\n",
        )
        .expect("write");

        let rows = read_records(&path).expect("rows");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].field("status"), Some("UNAVAILABLE"));
        assert_eq!(rows[1].field("name"), Some("Driver 3 (no trips)"));
        assert_eq!(rows[1].field("vin"), None);
    }

    #[test]
    fn missing_file_names_the_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nope.csv");
        let err = read_records(&path).expect_err("missing file");
        assert!(matches!(err, LoadError::Csv { ref path, .. } if path.ends_with("nope.csv")));
    }
}
