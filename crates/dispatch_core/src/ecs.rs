use std::fmt;
use std::str::FromStr;

use bevy_ecs::prelude::{Component, Entity};
use chrono::{DateTime, TimeDelta, Utc};

use crate::error::UnknownStatus;

/// Kind of record held by the entity store; carried by lookup and load errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Passenger,
    Driver,
    Trip,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Passenger => "passenger",
            EntityKind::Driver => "driver",
            EntityKind::Trip => "trip",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriverStatus {
    Available,
    Unavailable,
}

impl DriverStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DriverStatus::Available => "AVAILABLE",
            DriverStatus::Unavailable => "UNAVAILABLE",
        }
    }
}

impl fmt::Display for DriverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DriverStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "AVAILABLE" => Ok(DriverStatus::Available),
            "UNAVAILABLE" => Ok(DriverStatus::Unavailable),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Component)]
pub struct Passenger {
    pub id: u32,
    pub name: String,
    pub phone_number: String,
    /// Trip entities in request order.
    pub trips: Vec<Entity>,
}

#[derive(Debug, Clone, PartialEq, Eq, Component)]
pub struct Driver {
    pub id: u32,
    pub name: String,
    pub status: DriverStatus,
    /// Trip entities in the order they were driven.
    pub trips: Vec<Entity>,
}

impl Driver {
    pub fn is_available(&self) -> bool {
        self.status == DriverStatus::Available
    }
}

/// One passenger-driver engagement. Holds handles to both endpoints but owns neither.
#[derive(Debug, Clone, PartialEq, Component)]
pub struct Trip {
    pub id: u32,
    pub passenger: Entity,
    pub driver: Entity,
    pub passenger_id: u32,
    pub driver_id: u32,
    pub start_time: DateTime<Utc>,
    /// `None` while the trip is ongoing; set together with `cost` and `rating`.
    pub end_time: Option<DateTime<Utc>>,
    pub cost: Option<f64>,
    pub rating: Option<u8>,
}

impl Trip {
    pub fn is_ongoing(&self) -> bool {
        self.end_time.is_none()
    }

    pub fn is_completed(&self) -> bool {
        self.end_time.is_some() && self.cost.is_some() && self.rating.is_some()
    }

    /// Time between pickup and dropoff; `None` while ongoing.
    pub fn duration(&self) -> Option<TimeDelta> {
        self.end_time.map(|end| end - self.start_time)
    }
}
