use bevy_ecs::prelude::Entity;
use chrono::{DateTime, Utc};

use crate::ecs::{Driver, Trip};

/// How long a driver has gone without a passenger.
///
/// Variant order is the ranking order: `NeverDriven` beats any `IdleSince`,
/// and earlier `IdleSince` timestamps beat later ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Seniority {
    NeverDriven,
    /// End of the driver's latest completed trip.
    IdleSince(DateTime<Utc>),
    /// Has history but no completed trip to measure idleness from.
    OnTrip,
}

impl Seniority {
    pub fn from_history<'a>(history: impl IntoIterator<Item = &'a Trip>) -> Self {
        let mut has_driven = false;
        let mut latest_end = None;
        for trip in history {
            has_driven = true;
            latest_end = latest_end.max(trip.end_time);
        }
        match (has_driven, latest_end) {
            (false, _) => Seniority::NeverDriven,
            (true, Some(end)) => Seniority::IdleSince(end),
            (true, None) => Seniority::OnTrip,
        }
    }
}

/// An available driver as seen by a selection policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverCandidate {
    pub entity: Entity,
    pub driver_id: u32,
    pub seniority: Seniority,
}

impl DriverCandidate {
    pub fn new<'a>(
        entity: Entity,
        driver: &Driver,
        history: impl IntoIterator<Item = &'a Trip>,
    ) -> Self {
        Self {
            entity,
            driver_id: driver.id,
            seniority: Seniority::from_history(history),
        }
    }

    /// Total order used by [`super::LongestIdlePolicy`]: seniority, then lowest id.
    pub fn rank(&self) -> (Seniority, u32) {
        (self.seniority, self.driver_id)
    }
}
