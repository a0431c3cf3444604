use bevy_ecs::prelude::Entity;

use super::EntityStore;
use crate::ecs::{Driver, EntityKind, Passenger, Trip};
use crate::error::DispatchError;

impl EntityStore {
    /// Returns the stored passenger, or [`DispatchError::InvalidId`] if `id` is unknown.
    pub fn find_passenger(&self, id: u32) -> Result<&Passenger, DispatchError> {
        let entity = self.passenger_entity(id)?;
        self.world
            .get::<Passenger>(entity)
            .ok_or(DispatchError::invalid_id(EntityKind::Passenger, id))
    }

    /// Returns the stored driver, or [`DispatchError::InvalidId`] if `id` is unknown.
    pub fn find_driver(&self, id: u32) -> Result<&Driver, DispatchError> {
        let entity = self.driver_entity(id)?;
        self.world
            .get::<Driver>(entity)
            .ok_or(DispatchError::invalid_id(EntityKind::Driver, id))
    }

    pub fn find_trip(&self, id: u32) -> Result<&Trip, DispatchError> {
        let entity = self.trip_entity(id)?;
        self.world
            .get::<Trip>(entity)
            .ok_or(DispatchError::invalid_id(EntityKind::Trip, id))
    }

    /// The passenger's trips in request order.
    pub fn passenger_trips(&self, id: u32) -> Result<Vec<&Trip>, DispatchError> {
        let passenger = self.find_passenger(id)?;
        Ok(self.resolve_trips(&passenger.trips).collect())
    }

    /// The driver's trips in the order they were driven.
    pub fn driver_trips(&self, id: u32) -> Result<Vec<&Trip>, DispatchError> {
        let driver = self.find_driver(id)?;
        Ok(self.resolve_trips(&driver.trips).collect())
    }

    pub(crate) fn passenger_entity(&self, id: u32) -> Result<Entity, DispatchError> {
        self.passenger_ids
            .get(&id)
            .copied()
            .ok_or(DispatchError::invalid_id(EntityKind::Passenger, id))
    }

    pub(crate) fn driver_entity(&self, id: u32) -> Result<Entity, DispatchError> {
        self.driver_ids
            .get(&id)
            .copied()
            .ok_or(DispatchError::invalid_id(EntityKind::Driver, id))
    }

    pub(crate) fn trip_entity(&self, id: u32) -> Result<Entity, DispatchError> {
        self.trip_ids
            .get(&id)
            .copied()
            .ok_or(DispatchError::invalid_id(EntityKind::Trip, id))
    }
}
