use bevy_ecs::prelude::Entity;
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::DispatchConfig;
use crate::ecs::{Driver, DriverStatus, EntityKind, Passenger, Trip};
use crate::error::{DispatchError, LoadError};
use crate::loader::RegistryTables;
use crate::matching::{DriverCandidate, DriverSelectionPolicy, LongestIdlePolicy};
use crate::records::MAX_RATING;
use crate::store::EntityStore;

/// Fields recorded when a trip finishes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TripCompletion {
    pub end_time: DateTime<Utc>,
    pub cost: f64,
    pub rating: u8,
}

/// Owns the linked registry and assigns drivers to passenger requests.
///
/// Each dispatcher is an independent context: nothing is shared between
/// instances. Mutating operations take `&mut self`, so driver selection and
/// the status flip that follows cannot interleave with another request.
pub struct TripDispatcher {
    store: EntityStore,
    clock: Box<dyn Clock>,
    policy: Box<dyn DriverSelectionPolicy>,
}

impl TripDispatcher {
    /// Loads the three tables named by `config` and links them.
    pub fn new(config: &DispatchConfig) -> Result<Self, LoadError> {
        info!(data_dir = %config.data_dir().display(), "Loading ride registry");
        let tables = RegistryTables::load(config)?;
        Self::from_tables(&tables)
    }

    pub fn from_tables(tables: &RegistryTables) -> Result<Self, LoadError> {
        let store = EntityStore::from_records(&tables.passengers, &tables.drivers, &tables.trips)?;
        Ok(Self::from_store(store))
    }

    pub fn from_store(store: EntityStore) -> Self {
        Self {
            store,
            clock: Box::new(SystemClock),
            policy: Box::new(LongestIdlePolicy),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_policy(mut self, policy: impl DriverSelectionPolicy + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn passengers(&self) -> impl Iterator<Item = &Passenger> + '_ {
        self.store.passengers()
    }

    pub fn drivers(&self) -> impl Iterator<Item = &Driver> + '_ {
        self.store.drivers()
    }

    pub fn trips(&self) -> impl Iterator<Item = &Trip> + '_ {
        self.store.trips()
    }

    pub fn find_passenger(&self, id: u32) -> Result<&Passenger, DispatchError> {
        self.store.find_passenger(id)
    }

    pub fn find_driver(&self, id: u32) -> Result<&Driver, DispatchError> {
        self.store.find_driver(id)
    }

    pub fn find_trip(&self, id: u32) -> Result<&Trip, DispatchError> {
        self.store.find_trip(id)
    }

    /// Every `AVAILABLE` driver in store order, ranked inputs for the policy.
    pub fn candidates(&self) -> Vec<DriverCandidate> {
        self.store
            .driver_entities()
            .filter(|(_, driver)| driver.is_available())
            .map(|(entity, driver)| {
                DriverCandidate::new(entity, driver, self.store.resolve_trips(&driver.trips))
            })
            .collect()
    }

    /// Starts a trip for `passenger_id` with the driver chosen by the policy.
    ///
    /// On success the trip is ongoing, appears once in the passenger's and the
    /// driver's history and in [`Self::trips`], and the driver is
    /// `UNAVAILABLE`. On failure nothing changes.
    ///
    /// # Errors
    /// * [`DispatchError::InvalidId`] if the passenger does not exist
    /// * [`DispatchError::NoDriversAvailable`] if every driver is `UNAVAILABLE`
    /// * [`DispatchError::TripIdsExhausted`] if a trip already holds id `u32::MAX`
    pub fn request_trip(&mut self, passenger_id: u32) -> Result<Trip, DispatchError> {
        let passenger = self.store.passenger_entity(passenger_id)?;
        let Some(trip_id) = self.store.next_trip_id() else {
            warn!(passenger_id, "Trip request rejected: trip ids exhausted");
            return Err(DispatchError::TripIdsExhausted);
        };

        let candidates = self.candidates();
        let Some(chosen) = self.policy.select(&candidates).copied() else {
            info!(passenger_id, "Trip request rejected: no drivers available");
            return Err(DispatchError::NoDriversAvailable);
        };
        debug!(
            candidates = candidates.len(),
            driver_id = chosen.driver_id,
            seniority = ?chosen.seniority,
            "Selected driver"
        );

        let trip = Trip {
            id: trip_id,
            passenger,
            driver: chosen.entity,
            passenger_id,
            driver_id: chosen.driver_id,
            start_time: self.clock.now(),
            end_time: None,
            cost: None,
            rating: None,
        };
        self.store.attach_trip(trip.clone());
        self.store
            .set_driver_status(chosen.entity, DriverStatus::Unavailable);

        info!(
            trip_id = trip.id,
            passenger_id,
            driver_id = trip.driver_id,
            "Trip requested"
        );
        Ok(trip)
    }

    /// Records the end of an ongoing trip and frees its driver.
    ///
    /// End time, cost and rating are set together. The driver returns to
    /// `AVAILABLE` unless another of their trips is still ongoing.
    ///
    /// # Errors
    /// * [`DispatchError::InvalidId`] if the trip does not exist
    /// * [`DispatchError::TripAlreadyCompleted`] if it already has an end time
    /// * [`DispatchError::InvalidCompletion`] for a negative or non-finite cost,
    ///   a rating outside 1..=5, or an end time before the start
    pub fn complete_trip(
        &mut self,
        trip_id: u32,
        completion: TripCompletion,
    ) -> Result<Trip, DispatchError> {
        let entity = self.store.trip_entity(trip_id)?;
        let trip = self.store.find_trip(trip_id)?;
        validate_completion(trip, &completion)?;
        let driver = trip.driver;

        let Some(completed) = self.finish(entity, completion) else {
            return Err(DispatchError::invalid_id(EntityKind::Trip, trip_id));
        };

        let still_busy = self
            .store
            .find_driver(completed.driver_id)
            .map(|driver| self.store.has_ongoing_trip(driver))
            .unwrap_or(false);
        if !still_busy {
            self.store.set_driver_status(driver, DriverStatus::Available);
        }

        info!(
            trip_id,
            driver_id = completed.driver_id,
            cost = completion.cost,
            rating = completion.rating,
            "Trip completed"
        );
        Ok(completed)
    }

    fn finish(&mut self, trip: Entity, completion: TripCompletion) -> Option<Trip> {
        let mut trip = self.store.trip_mut(trip)?;
        trip.end_time = Some(completion.end_time);
        trip.cost = Some(completion.cost);
        trip.rating = Some(completion.rating);
        Some(Trip::clone(&trip))
    }
}

fn validate_completion(trip: &Trip, completion: &TripCompletion) -> Result<(), DispatchError> {
    let invalid = |reason| DispatchError::InvalidCompletion {
        trip_id: trip.id,
        reason,
    };
    if !trip.is_ongoing() {
        return Err(DispatchError::TripAlreadyCompleted { trip_id: trip.id });
    }
    if !completion.cost.is_finite() || completion.cost < 0.0 {
        return Err(invalid("cost must be a non-negative amount"));
    }
    if !(1..=MAX_RATING).contains(&completion.rating) {
        return Err(invalid("rating must be between 1 and 5"));
    }
    if completion.end_time < trip.start_time {
        return Err(invalid("end time is before start time"));
    }
    Ok(())
}
