pub mod collector;

pub use collector::{CollectorState, TrainingDataCollector};
