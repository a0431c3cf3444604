//! Raw table rows and their mapping to validated entities.
//!
//! Mapping is pure: it never looks at other rows, so a failure here is always
//! a problem with the row itself. Foreign keys on trips are left as ids and
//! resolved later by the linker in [`crate::store`].

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::ecs::{Driver, DriverStatus, EntityKind, Passenger};
use crate::error::RecordError;

/// Timestamp layouts accepted in the trips table besides RFC 3339.
const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S %z", "%Y-%m-%d %H:%M:%S%.f %z"];

/// Highest rating a passenger can give.
pub const MAX_RATING: u8 = 5;

/// One table row as a flat column → value map. Empty cells read as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(BTreeMap<String, String>);

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(column.into(), value.into());
        self
    }

    pub fn field(&self, column: &str) -> Option<&str> {
        self.0
            .get(column)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }
}

impl<K, V> FromIterator<(K, V)> for RawRecord
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(column, value)| (column.into(), value.into()))
                .collect(),
        )
    }
}

/// A trip row whose passenger and driver are still plain ids.
#[derive(Debug, Clone, PartialEq)]
pub struct UnlinkedTrip {
    pub id: u32,
    pub passenger_id: u32,
    pub driver_id: u32,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub cost: Option<f64>,
    pub rating: Option<u8>,
}

/// Parses an RFC 3339 or `YYYY-MM-DD HH:MM:SS ±ZZZZ` timestamp into UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(value, format).ok())
        .map(|parsed| parsed.with_timezone(&Utc))
}

impl Passenger {
    /// Builds a passenger with an empty trip history from a `passengers` row.
    pub fn from_record(record: &RawRecord) -> Result<Self, RecordError> {
        let kind = EntityKind::Passenger;
        Ok(Passenger {
            id: parse_id(record, kind, "id")?,
            name: required(record, kind, "name")?.to_string(),
            phone_number: required(record, kind, "phone_num")?.to_string(),
            trips: Vec::new(),
        })
    }
}

impl Driver {
    /// Builds a driver with an empty trip history from a `drivers` row.
    pub fn from_record(record: &RawRecord) -> Result<Self, RecordError> {
        let kind = EntityKind::Driver;
        let status = required(record, kind, "status")?;
        Ok(Driver {
            id: parse_id(record, kind, "id")?,
            name: required(record, kind, "name")?.to_string(),
            status: status
                .parse::<DriverStatus>()
                .map_err(|_| invalid(kind, "status", status))?,
            trips: Vec::new(),
        })
    }
}

impl UnlinkedTrip {
    pub fn from_record(record: &RawRecord) -> Result<Self, RecordError> {
        let kind = EntityKind::Trip;
        let id = parse_id(record, kind, "id")?;
        let start_time = parse_time(record, "start_time")?
            .ok_or(RecordError::MissingField { kind, field: "start_time" })?;
        let end_time = parse_time(record, "end_time")?;
        let cost = parse_optional::<f64>(record, kind, "cost")?;
        let rating = parse_optional::<u8>(record, kind, "rating")?;

        if let Some(cost) = cost {
            if !cost.is_finite() || cost < 0.0 {
                return Err(invalid(kind, "cost", &cost.to_string()));
            }
        }
        if let Some(rating) = rating {
            if !(1..=MAX_RATING).contains(&rating) {
                return Err(invalid(kind, "rating", &rating.to_string()));
            }
        }

        let completed_fields = [end_time.is_some(), cost.is_some(), rating.is_some()];
        if completed_fields.iter().any(|set| *set) && !completed_fields.iter().all(|set| *set) {
            return Err(RecordError::PartiallyCompleted { trip_id: id });
        }
        if end_time.is_some_and(|end| end < start_time) {
            return Err(RecordError::EndsBeforeStart { trip_id: id });
        }

        Ok(UnlinkedTrip {
            id,
            passenger_id: parse_id(record, kind, "passenger_id")?,
            driver_id: parse_id(record, kind, "driver_id")?,
            start_time,
            end_time,
            cost,
            rating,
        })
    }
}

fn invalid(kind: EntityKind, field: &'static str, value: &str) -> RecordError {
    RecordError::InvalidValue {
        kind,
        field,
        value: value.to_string(),
    }
}

fn required<'a>(
    record: &'a RawRecord,
    kind: EntityKind,
    field: &'static str,
) -> Result<&'a str, RecordError> {
    record
        .field(field)
        .ok_or(RecordError::MissingField { kind, field })
}

fn parse_optional<T: FromStr>(
    record: &RawRecord,
    kind: EntityKind,
    field: &'static str,
) -> Result<Option<T>, RecordError> {
    record
        .field(field)
        .map(|value| value.parse::<T>().map_err(|_| invalid(kind, field, value)))
        .transpose()
}

/// Identifiers are positive; `0` is rejected so it can never resolve.
fn parse_id(record: &RawRecord, kind: EntityKind, field: &'static str) -> Result<u32, RecordError> {
    let value = required(record, kind, field)?;
    match value.parse::<u32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(invalid(kind, field, value)),
    }
}

fn parse_time(
    record: &RawRecord,
    field: &'static str,
) -> Result<Option<DateTime<Utc>>, RecordError> {
    record
        .field(field)
        .map(|value| parse_timestamp(value).ok_or_else(|| invalid(EntityKind::Trip, field, value)))
        .transpose()
}
