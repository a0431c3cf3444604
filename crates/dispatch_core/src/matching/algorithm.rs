use super::types::DriverCandidate;

/// Trait for policies that pick which available driver takes a new trip.
///
/// The dispatcher builds the candidate set (every `AVAILABLE` driver, in store
/// order) and asks the policy for one of them. Policies only read the
/// candidates; all state changes happen in the dispatcher afterwards.
///
/// # Examples
///
/// ```rust
/// use bevy_ecs::prelude::Entity;
/// use dispatch_core::matching::{
///     DriverCandidate, DriverSelectionPolicy, LongestIdlePolicy, Seniority,
/// };
///
/// let candidates = [DriverCandidate {
///     entity: Entity::from_raw(4),
///     driver_id: 3,
///     seniority: Seniority::NeverDriven,
/// }];
/// let chosen = LongestIdlePolicy.select(&candidates).map(|candidate| candidate.driver_id);
/// assert_eq!(chosen, Some(3));
/// ```
pub trait DriverSelectionPolicy: Send + Sync {
    /// Returns the chosen candidate, or `None` when `candidates` is empty.
    ///
    /// Implementations must be deterministic: the same candidates in the same
    /// order always yield the same driver.
    fn select<'a>(&self, candidates: &'a [DriverCandidate]) -> Option<&'a DriverCandidate>;
}
