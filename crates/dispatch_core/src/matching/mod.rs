pub mod algorithm;
pub mod longest_idle;
pub mod types;

pub use algorithm::DriverSelectionPolicy;
pub use longest_idle::LongestIdlePolicy;
pub use types::{DriverCandidate, Seniority};
