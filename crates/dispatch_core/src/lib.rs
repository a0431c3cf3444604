pub mod clock;
pub mod config;
pub mod dispatch;
pub mod ecs;
pub mod error;
pub mod loader;
pub mod matching;
pub mod records;
pub mod reporting;
pub mod store;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use dispatch::{TripCompletion, TripDispatcher};
pub use error::{DispatchError, LoadError, RecordError, UnknownStatus};
