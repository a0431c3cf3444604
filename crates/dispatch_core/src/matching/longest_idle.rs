use super::algorithm::DriverSelectionPolicy;
use super::types::DriverCandidate;

/// Default dispatch policy: fresh drivers first, then whoever has waited longest.
///
/// Ranks candidates by a single key, `(seniority, driver_id)`:
/// 1. drivers who have never driven, lowest id first;
/// 2. drivers whose latest completed trip ended earliest, lowest id on ties.
///
/// Time complexity: O(n) in the number of candidates.
#[derive(Debug, Default, Clone, Copy)]
pub struct LongestIdlePolicy;

impl DriverSelectionPolicy for LongestIdlePolicy {
    fn select<'a>(&self, candidates: &'a [DriverCandidate]) -> Option<&'a DriverCandidate> {
        candidates.iter().min_by_key(|candidate| candidate.rank())
    }
}
