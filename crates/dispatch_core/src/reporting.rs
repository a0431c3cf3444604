//! Aggregates over completed trips. Ongoing trips contribute nothing.

use chrono::TimeDelta;

use crate::ecs::Trip;
use crate::error::DispatchError;
use crate::store::EntityStore;

impl EntityStore {
    /// Total fare paid by the passenger.
    pub fn net_expenditures(&self, passenger_id: u32) -> Result<f64, DispatchError> {
        let passenger = self.find_passenger(passenger_id)?;
        Ok(self.resolve_trips(&passenger.trips).filter_map(completed_cost).sum())
    }

    /// Total time the passenger has spent riding.
    pub fn total_time_spent(&self, passenger_id: u32) -> Result<TimeDelta, DispatchError> {
        let passenger = self.find_passenger(passenger_id)?;
        Ok(self
            .resolve_trips(&passenger.trips)
            .filter(|trip| trip.is_completed())
            .filter_map(Trip::duration)
            .fold(TimeDelta::zero(), |total, duration| total + duration))
    }

    /// Total fare collected by the driver.
    pub fn total_revenue(&self, driver_id: u32) -> Result<f64, DispatchError> {
        let driver = self.find_driver(driver_id)?;
        Ok(self.resolve_trips(&driver.trips).filter_map(completed_cost).sum())
    }

    /// Mean rating over the driver's completed trips; `None` if there are none.
    pub fn average_rating(&self, driver_id: u32) -> Result<Option<f64>, DispatchError> {
        let driver = self.find_driver(driver_id)?;
        let (sum, count) = self
            .resolve_trips(&driver.trips)
            .filter(|trip| trip.is_completed())
            .filter_map(|trip| trip.rating)
            .fold((0u32, 0u32), |(sum, count), rating| (sum + u32::from(rating), count + 1));
        Ok((count > 0).then(|| f64::from(sum) / f64::from(count)))
    }
}

fn completed_cost(trip: &Trip) -> Option<f64> {
    trip.is_completed().then_some(trip.cost).flatten()
}

#[cfg(test)]
mod tests {
    use crate::records::RawRecord;
    use crate::store::EntityStore;
    use chrono::TimeDelta;

    fn trip(id: u32, driver_id: u32, end: Option<(&str, &str, &str)>) -> RawRecord {
        let row = RawRecord::new()
            .with("id", id.to_string())
            .with("passenger_id", "1")
            .with("driver_id", driver_id.to_string())
            .with("start_time", "2018-06-01 10:00:00 +0000");
        match end {
            Some((end_time, cost, rating)) => row
                .with("end_time", end_time)
                .with("cost", cost)
                .with("rating", rating),
            None => row,
        }
    }

    fn store() -> EntityStore {
        EntityStore::from_records(
            &[RawRecord::new()
                .with("id", "1")
                .with("name", "Passenger 1")
                .with("phone_num", "555-0101")],
            &[
                RawRecord::new()
                    .with("id", "1")
                    .with("name", "Driver 1")
                    .with("status", "AVAILABLE"),
                RawRecord::new()
                    .with("id", "2")
                    .with("name", "Driver 2")
                    .with("status", "AVAILABLE"),
            ],
            &[
                trip(1, 1, Some(("2018-06-01 10:30:00 +0000", "10.25", "5"))),
                trip(2, 1, Some(("2018-06-01 10:15:00 +0000", "4.75", "2"))),
                trip(3, 1, None),
            ],
        )
        .expect("store")
    }

    #[test]
    fn passenger_totals_skip_ongoing_trips() {
        let store = store();
        assert_eq!(store.net_expenditures(1), Ok(15.0));
        assert_eq!(store.total_time_spent(1), Ok(TimeDelta::minutes(45)));
    }

    #[test]
    fn driver_totals_skip_ongoing_trips() {
        let store = store();
        assert_eq!(store.total_revenue(1), Ok(15.0));
        assert_eq!(store.average_rating(1), Ok(Some(3.5)));
    }

    #[test]
    fn driver_without_completed_trips_has_no_rating() {
        let store = store();
        assert_eq!(store.total_revenue(2), Ok(0.0));
        assert_eq!(store.average_rating(2), Ok(None));
        assert!(store.average_rating(3).is_err());
    }
}
