pub mod executor;

pub use crate::usecases::common::ProgressTracker;
pub use executor::CollectExecutor;
