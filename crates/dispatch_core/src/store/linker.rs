use std::collections::hash_map::Entry;

use bevy_ecs::prelude::Entity;
use tracing::{debug, info, warn};

use super::EntityStore;
use crate::ecs::{Driver, DriverStatus, EntityKind, Passenger, Trip};
use crate::error::{LoadError, RecordError};
use crate::records::{RawRecord, UnlinkedTrip};

impl EntityStore {
    /// Maps raw rows to entities and links them into a store.
    ///
    /// Row-level problems surface as [`LoadError::Record`] with the 1-based row
    /// number; cross-row problems as [`LoadError::DuplicateId`] or
    /// [`LoadError::MalformedReference`].
    pub fn from_records(
        passengers: &[RawRecord],
        drivers: &[RawRecord],
        trips: &[RawRecord],
    ) -> Result<Self, LoadError> {
        let passengers = map_rows(passengers, EntityKind::Passenger, Passenger::from_record)?;
        let drivers = map_rows(drivers, EntityKind::Driver, Driver::from_record)?;
        let trips = map_rows(trips, EntityKind::Trip, UnlinkedTrip::from_record)?;
        Self::link(passengers, drivers, trips)
    }

    /// Builds the linked graph from mapped entities.
    ///
    /// Trips are attached to their passenger's and driver's histories in the
    /// order given. A driver may own at most one ongoing trip; a second one is
    /// [`LoadError::OverlappingTrips`]. A driver recorded `AVAILABLE` while
    /// owning an ongoing trip is switched to `UNAVAILABLE`.
    pub fn link(
        passengers: Vec<Passenger>,
        drivers: Vec<Driver>,
        trips: Vec<UnlinkedTrip>,
    ) -> Result<Self, LoadError> {
        let mut store = EntityStore::default();

        for mut passenger in passengers {
            let id = passenger.id;
            passenger.trips.clear();
            let Entry::Vacant(slot) = store.passenger_ids.entry(id) else {
                return Err(LoadError::DuplicateId {
                    kind: EntityKind::Passenger,
                    id,
                });
            };
            let entity = store.world.spawn(passenger).id();
            slot.insert(entity);
            store.passengers.push(entity);
        }

        for mut driver in drivers {
            let id = driver.id;
            driver.trips.clear();
            let Entry::Vacant(slot) = store.driver_ids.entry(id) else {
                return Err(LoadError::DuplicateId {
                    kind: EntityKind::Driver,
                    id,
                });
            };
            let entity = store.world.spawn(driver).id();
            slot.insert(entity);
            store.drivers.push(entity);
        }

        for trip in trips {
            if store.trip_ids.contains_key(&trip.id) {
                return Err(LoadError::DuplicateId {
                    kind: EntityKind::Trip,
                    id: trip.id,
                });
            }
            let passenger = store.resolve_reference(&trip, EntityKind::Passenger)?;
            let driver = store.resolve_reference(&trip, EntityKind::Driver)?;
            if trip.end_time.is_none() && store.driver_is_on_trip(driver) {
                return Err(LoadError::OverlappingTrips {
                    trip_id: trip.id,
                    driver_id: trip.driver_id,
                });
            }
            store.attach_trip(Trip {
                id: trip.id,
                passenger,
                driver,
                passenger_id: trip.passenger_id,
                driver_id: trip.driver_id,
                start_time: trip.start_time,
                end_time: trip.end_time,
                cost: trip.cost,
                rating: trip.rating,
            });
        }

        store.reconcile_driver_status();

        info!(
            passengers = store.passenger_count(),
            drivers = store.driver_count(),
            trips = store.trip_count(),
            "Linked ride registry"
        );
        Ok(store)
    }

    fn resolve_reference(
        &self,
        trip: &UnlinkedTrip,
        kind: EntityKind,
    ) -> Result<Entity, LoadError> {
        let (index, id) = match kind {
            EntityKind::Driver => (&self.driver_ids, trip.driver_id),
            _ => (&self.passenger_ids, trip.passenger_id),
        };
        index
            .get(&id)
            .copied()
            .ok_or(LoadError::MalformedReference {
                trip_id: trip.id,
                kind,
                id,
            })
    }

    fn driver_is_on_trip(&self, driver: Entity) -> bool {
        self.world
            .get::<Driver>(driver)
            .is_some_and(|driver| self.has_ongoing_trip(driver))
    }

    fn reconcile_driver_status(&mut self) {
        let busy: Vec<Entity> = self
            .driver_entities()
            .filter(|(_, driver)| driver.is_available() && self.has_ongoing_trip(driver))
            .map(|(entity, _)| entity)
            .collect();

        for entity in busy {
            if let Some(driver) = self.world.get::<Driver>(entity) {
                warn!(
                    driver_id = driver.id,
                    "Driver recorded AVAILABLE has an ongoing trip; marking UNAVAILABLE"
                );
            }
            self.set_driver_status(entity, DriverStatus::Unavailable);
        }

        let off_duty = self
            .drivers()
            .filter(|driver| !driver.is_available() && !self.has_ongoing_trip(driver))
            .count();
        if off_duty > 0 {
            debug!(off_duty, "Drivers recorded UNAVAILABLE without an ongoing trip");
        }
    }
}

fn map_rows<T>(
    rows: &[RawRecord],
    kind: EntityKind,
    map: impl Fn(&RawRecord) -> Result<T, RecordError>,
) -> Result<Vec<T>, LoadError> {
    rows.iter()
        .enumerate()
        .map(|(index, row)| {
            map(row).map_err(|source| LoadError::Record {
                kind,
                row: index + 1,
                source,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passenger(id: u32) -> RawRecord {
        RawRecord::new()
            .with("id", id.to_string())
            .with("name", format!("Passenger {id}"))
            .with("phone_num", format!("555-01{id:02}"))
    }

    fn driver(id: u32, status: &str) -> RawRecord {
        RawRecord::new()
            .with("id", id.to_string())
            .with("name", format!("Driver {id}"))
            .with("status", status)
    }

    fn trip(id: u32, passenger_id: u32, driver_id: u32, completed: bool) -> RawRecord {
        let row = RawRecord::new()
            .with("id", id.to_string())
            .with("passenger_id", passenger_id.to_string())
            .with("driver_id", driver_id.to_string())
            .with("start_time", "2018-06-01 10:00:00 +0000");
        if completed {
            row.with("end_time", "2018-06-01 10:20:00 +0000")
                .with("cost", "12")
                .with("rating", "4")
        } else {
            row
        }
    }

    #[test]
    fn links_trips_into_both_histories_in_table_order() {
        let store = EntityStore::from_records(
            &[passenger(1), passenger(2)],
            &[driver(1, "AVAILABLE"), driver(2, "AVAILABLE")],
            &[trip(10, 1, 2, true), trip(11, 2, 2, true), trip(12, 1, 1, true)],
        )
        .expect("store");

        let passenger = store.find_passenger(1).expect("passenger");
        let ids: Vec<u32> = store.resolve_trips(&passenger.trips).map(|t| t.id).collect();
        assert_eq!(ids, vec![10, 12]);

        let driver = store.find_driver(2).expect("driver");
        let ids: Vec<u32> = store.resolve_trips(&driver.trips).map(|t| t.id).collect();
        assert_eq!(ids, vec![10, 11]);

        assert_eq!(store.trip_count(), 3);
        assert_eq!(store.next_trip_id(), Some(13));
    }

    #[test]
    fn dangling_passenger_reference_is_fatal() {
        let err = EntityStore::from_records(
            &[passenger(1)],
            &[driver(1, "AVAILABLE")],
            &[trip(5, 42, 1, true)],
        )
        .err()
        .expect("load error");
        assert!(matches!(
            err,
            LoadError::MalformedReference {
                trip_id: 5,
                kind: EntityKind::Passenger,
                id: 42
            }
        ));
    }

    #[test]
    fn dangling_driver_reference_is_fatal() {
        let err = EntityStore::from_records(
            &[passenger(1)],
            &[driver(1, "AVAILABLE")],
            &[trip(5, 1, 9, true)],
        )
        .err()
        .expect("load error");
        assert!(matches!(
            err,
            LoadError::MalformedReference {
                kind: EntityKind::Driver,
                id: 9,
                ..
            }
        ));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = EntityStore::from_records(&[passenger(1), passenger(1)], &[], &[])
            .err()
            .expect("load error");
        assert!(matches!(
            err,
            LoadError::DuplicateId {
                kind: EntityKind::Passenger,
                id: 1
            }
        ));

        let err = EntityStore::from_records(
            &[passenger(1)],
            &[driver(1, "AVAILABLE")],
            &[trip(3, 1, 1, true), trip(3, 1, 1, true)],
        )
        .err()
        .expect("load error");
        assert!(matches!(
            err,
            LoadError::DuplicateId {
                kind: EntityKind::Trip,
                id: 3
            }
        ));
    }

    #[test]
    fn second_ongoing_trip_for_a_driver_is_rejected() {
        let err = EntityStore::from_records(
            &[passenger(1), passenger(2)],
            &[driver(1, "UNAVAILABLE")],
            &[trip(1, 1, 1, false), trip(2, 2, 1, true), trip(3, 2, 1, false)],
        )
        .err()
        .expect("load error");
        assert!(matches!(
            err,
            LoadError::OverlappingTrips {
                trip_id: 3,
                driver_id: 1
            }
        ));
    }

    #[test]
    fn record_errors_carry_row_number() {
        let bad = driver(2, "MAYBE");
        let err = EntityStore::from_records(&[], &[driver(1, "AVAILABLE"), bad], &[])
            .err()
            .expect("load error");
        assert!(matches!(
            err,
            LoadError::Record {
                kind: EntityKind::Driver,
                row: 2,
                source: RecordError::InvalidValue { field: "status", .. }
            }
        ));
    }

    #[test]
    fn busy_driver_is_reconciled_to_unavailable() {
        let store = EntityStore::from_records(
            &[passenger(1)],
            &[driver(1, "AVAILABLE"), driver(2, "UNAVAILABLE")],
            &[trip(1, 1, 1, false)],
        )
        .expect("store");

        let busy = store.find_driver(1).expect("driver");
        assert_eq!(busy.status, DriverStatus::Unavailable);

        let off_duty = store.find_driver(2).expect("driver");
        assert_eq!(off_duty.status, DriverStatus::Unavailable);
        assert!(off_duty.trips.is_empty());
    }
}
