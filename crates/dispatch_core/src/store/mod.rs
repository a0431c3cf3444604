//! The entity store: every passenger, driver and trip as an ECS entity.
//!
//! The store's [`World`] owns all entities. Cross references (trip → passenger,
//! trip → driver, histories) are [`Entity`] handles into that world, and three
//! ordered lists keep the load/creation order for reporting. Only the linker
//! (at construction) and the dispatcher mutate the store.

mod linker;
mod lookup;

use std::collections::HashMap;

use bevy_ecs::prelude::{Entity, Mut, World};

use crate::ecs::{Driver, DriverStatus, Passenger, Trip};

pub struct EntityStore {
    world: World,
    passengers: Vec<Entity>,
    drivers: Vec<Entity>,
    trips: Vec<Entity>,
    passenger_ids: HashMap<u32, Entity>,
    driver_ids: HashMap<u32, Entity>,
    trip_ids: HashMap<u32, Entity>,
    /// `None` once a trip with id `u32::MAX` exists.
    next_trip_id: Option<u32>,
}

impl Default for EntityStore {
    fn default() -> Self {
        Self {
            world: World::new(),
            passengers: Vec::new(),
            drivers: Vec::new(),
            trips: Vec::new(),
            passenger_ids: HashMap::new(),
            driver_ids: HashMap::new(),
            trip_ids: HashMap::new(),
            next_trip_id: Some(1),
        }
    }
}

impl EntityStore {
    pub fn passengers(&self) -> impl Iterator<Item = &Passenger> + '_ {
        self.passengers
            .iter()
            .filter_map(|entity| self.world.get::<Passenger>(*entity))
    }

    pub fn drivers(&self) -> impl Iterator<Item = &Driver> + '_ {
        self.drivers
            .iter()
            .filter_map(|entity| self.world.get::<Driver>(*entity))
    }

    /// Every trip, historical ones in table order followed by requested ones.
    pub fn trips(&self) -> impl Iterator<Item = &Trip> + '_ {
        self.trips.iter().filter_map(|entity| self.world.get::<Trip>(*entity))
    }

    pub fn passenger_count(&self) -> usize {
        self.passengers.len()
    }

    pub fn driver_count(&self) -> usize {
        self.drivers.len()
    }

    pub fn trip_count(&self) -> usize {
        self.trips.len()
    }

    /// Id the next requested trip will receive, or `None` when the id space
    /// is used up.
    pub fn next_trip_id(&self) -> Option<u32> {
        self.next_trip_id
    }

    /// Resolves a history of trip handles, preserving its order.
    pub fn resolve_trips<'a>(
        &'a self,
        history: &'a [Entity],
    ) -> impl Iterator<Item = &'a Trip> + 'a {
        history
            .iter()
            .filter_map(|entity| self.world.get::<Trip>(*entity))
    }

    /// Every driver, in store order, paired with its entity handle.
    pub(crate) fn driver_entities(&self) -> impl Iterator<Item = (Entity, &Driver)> + '_ {
        self.drivers
            .iter()
            .filter_map(|entity| self.world.get::<Driver>(*entity).map(|driver| (*entity, driver)))
    }

    /// Spawns `trip`, appends it to both endpoint histories and to the global
    /// trip list. Callers must have resolved `trip.passenger` and `trip.driver`
    /// from this store.
    pub(crate) fn attach_trip(&mut self, trip: Trip) -> Entity {
        let (trip_id, passenger, driver) = (trip.id, trip.passenger, trip.driver);
        let entity = self.world.spawn(trip).id();

        if let Some(mut passenger) = self.world.get_mut::<Passenger>(passenger) {
            passenger.trips.push(entity);
        }
        if let Some(mut driver) = self.world.get_mut::<Driver>(driver) {
            driver.trips.push(entity);
        }

        self.trips.push(entity);
        self.trip_ids.insert(trip_id, entity);
        self.next_trip_id = match (self.next_trip_id, trip_id.checked_add(1)) {
            (Some(next), Some(after)) => Some(next.max(after)),
            _ => None,
        };
        entity
    }

    pub(crate) fn set_driver_status(&mut self, driver: Entity, status: DriverStatus) {
        if let Some(mut driver) = self.world.get_mut::<Driver>(driver) {
            driver.status = status;
        }
    }

    pub(crate) fn trip_mut(&mut self, trip: Entity) -> Option<Mut<'_, Trip>> {
        self.world.get_mut::<Trip>(trip)
    }

    pub(crate) fn has_ongoing_trip(&self, driver: &Driver) -> bool {
        self.resolve_trips(&driver.trips).any(Trip::is_ongoing)
    }
}
