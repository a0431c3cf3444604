//! Test helpers for common test setup and utilities.
//!
//! Builds small registries in memory so tests don't depend on files on disk.
//! The sample registry matches the CSV fixtures shipped with the crate's
//! integration tests.

use chrono::{DateTime, TimeZone, Utc};

use crate::clock::ManualClock;
use crate::dispatch::TripDispatcher;
use crate::loader::RegistryTables;
use crate::records::RawRecord;

/// A fixed "now" used by tests that need reproducible trip start times.
///
/// # Panics
///
/// Panics if the constant date is invalid (should never happen).
pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2018, 7, 2, 12, 0, 0)
        .single()
        .expect("valid test timestamp")
}

pub fn passenger_row(id: u32) -> RawRecord {
    RawRecord::new()
        .with("id", id.to_string())
        .with("name", format!("Passenger {id}"))
        .with("phone_num", format!("555-01{id:02}"))
}

pub fn driver_row(id: u32, name: &str, status: &str) -> RawRecord {
    RawRecord::new()
        .with("id", id.to_string())
        .with("name", name)
        .with("status", status)
}

/// An ongoing trip row: end time, cost and rating left empty.
pub fn ongoing_trip_row(id: u32, passenger_id: u32, driver_id: u32, start_time: &str) -> RawRecord {
    RawRecord::new()
        .with("id", id.to_string())
        .with("passenger_id", passenger_id.to_string())
        .with("driver_id", driver_id.to_string())
        .with("start_time", start_time)
        .with("end_time", "")
        .with("cost", "")
        .with("rating", "")
}

pub fn completed_trip_row(
    id: u32,
    passenger_id: u32,
    driver_id: u32,
    start_time: &str,
    end_time: &str,
    cost: f64,
    rating: u8,
) -> RawRecord {
    ongoing_trip_row(id, passenger_id, driver_id, start_time)
        .with("end_time", end_time)
        .with("cost", cost.to_string())
        .with("rating", rating.to_string())
}

/// Eight passengers, four drivers and five trips:
///
/// * driver 1 is `UNAVAILABLE` and owns the one ongoing trip (5);
/// * driver 2 last dropped off on 2018-06-20;
/// * driver 3 has never driven;
/// * driver 4 last dropped off on 2018-05-30.
pub fn sample_tables() -> RegistryTables {
    RegistryTables {
        passengers: (1..=8).map(passenger_row).collect(),
        drivers: vec![
            driver_row(1, "Driver 1 (unavailable)", "UNAVAILABLE"),
            driver_row(2, "Driver 2", "AVAILABLE"),
            driver_row(3, "Driver 3 (no trips)", "AVAILABLE"),
            driver_row(4, "Driver 4", "AVAILABLE"),
        ],
        trips: vec![
            completed_trip_row(
                1,
                1,
                1,
                "2018-05-25 11:52:40 -0700",
                "2018-05-25 12:25:00 -0700",
                10.0,
                5,
            ),
            completed_trip_row(
                2,
                3,
                2,
                "2018-06-07 04:19:25 -0700",
                "2018-06-07 04:51:55 -0700",
                15.0,
                4,
            ),
            completed_trip_row(
                3,
                4,
                4,
                "2018-05-30 08:10:00 -0700",
                "2018-05-30 08:35:00 -0700",
                9.5,
                3,
            ),
            completed_trip_row(
                4,
                2,
                2,
                "2018-06-20 15:00:00 -0700",
                "2018-06-20 15:30:00 -0700",
                22.25,
                5,
            ),
            ongoing_trip_row(5, 6, 1, "2018-07-01 09:00:00 -0700"),
        ],
    }
}

/// Dispatcher over [`sample_tables`] with its clock frozen at [`test_now`].
///
/// # Panics
///
/// Panics if the sample tables fail to link (should never happen).
pub fn sample_dispatcher() -> TripDispatcher {
    TripDispatcher::from_tables(&sample_tables())
        .expect("sample tables should link")
        .with_clock(ManualClock::new(test_now()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::DriverStatus;

    #[test]
    fn sample_registry_links() {
        let dispatcher = sample_dispatcher();
        assert_eq!(dispatcher.store().passenger_count(), 8);
        assert_eq!(dispatcher.store().driver_count(), 4);
        assert_eq!(dispatcher.store().trip_count(), 5);
    }

    #[test]
    fn sample_driver_one_is_busy() {
        let dispatcher = sample_dispatcher();
        let driver = dispatcher.find_driver(1).expect("driver");
        assert_eq!(driver.status, DriverStatus::Unavailable);
        assert!(dispatcher.store().has_ongoing_trip(driver));
    }
}
