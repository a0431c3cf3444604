//! Error types for loading the registry and dispatching trips.
//!
//! Loading failures are split in two: [`RecordError`] for a single row that
//! cannot be mapped to an entity, and [`LoadError`] for everything that stops
//! the store from being built (I/O, CSV framing, duplicate ids, dangling
//! foreign keys, a driver with two ongoing trips). [`DispatchError`] covers the operations on a loaded store.

use std::path::PathBuf;

use thiserror::Error;

use crate::ecs::EntityKind;

/// A `status` cell that is neither `AVAILABLE` nor `UNAVAILABLE`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown driver status {0:?}")]
pub struct UnknownStatus(pub String);

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("{kind} record is missing field `{field}`")]
    MissingField {
        kind: EntityKind,
        field: &'static str,
    },

    #[error("{kind} record has invalid `{field}` value {value:?}")]
    InvalidValue {
        kind: EntityKind,
        field: &'static str,
        value: String,
    },

    #[error("trip {trip_id} is partially completed: end_time, cost and rating must be all set or all empty")]
    PartiallyCompleted { trip_id: u32 },

    #[error("trip {trip_id} ends before it starts")]
    EndsBeforeStart { trip_id: u32 },
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{kind} row {row}: {source}")]
    Record {
        kind: EntityKind,
        row: usize,
        #[source]
        source: RecordError,
    },

    #[error("duplicate {kind} id {id}")]
    DuplicateId { kind: EntityKind, id: u32 },

    #[error("trip {trip_id} references unknown {kind} id {id}")]
    MalformedReference {
        trip_id: u32,
        kind: EntityKind,
        id: u32,
    },

    #[error("trip {trip_id} is a second ongoing trip for driver {driver_id}")]
    OverlappingTrips { trip_id: u32, driver_id: u32 },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DispatchError {
    #[error("invalid {kind} id: {id}")]
    InvalidId { kind: EntityKind, id: u32 },

    #[error("no drivers available")]
    NoDriversAvailable,

    #[error("trip ids exhausted")]
    TripIdsExhausted,

    #[error("trip {trip_id} is already completed")]
    TripAlreadyCompleted { trip_id: u32 },

    #[error("cannot complete trip {trip_id}: {reason}")]
    InvalidCompletion { trip_id: u32, reason: &'static str },
}

impl DispatchError {
    pub(crate) fn invalid_id(kind: EntityKind, id: u32) -> Self {
        DispatchError::InvalidId { kind, id }
    }
}
