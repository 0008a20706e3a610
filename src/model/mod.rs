//! Labels, presets and the trainer that owns the classifier.

pub mod classifier;
pub mod example;
pub mod prediction;
pub mod preset;
pub mod quality;
pub mod trainer;

pub use classifier::{BinaryClassifier, FeedforwardClassifier};
pub use example::{Label, TrainingExample};
pub use prediction::{PredictionResult, Scores};
pub use preset::TrainingPreset;
pub use quality::TrainingQuality;
pub use trainer::{ContrastTrainer, TrainingJob, TrainingReport};
