pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod loss;
pub mod optim;
pub mod train;

pub mod color;
pub mod collect;
pub mod model;
pub mod store;
pub mod session;
pub mod demo;

pub mod config;
pub mod error;
pub mod logging;

// Convenience re-exports
pub use math::matrix::Matrix;
pub use activation::activation::ActivationFunction;
pub use layers::dense::Layer;
pub use network::{ModelSnapshot, Network, NetworkSpec};
pub use loss::LossType;
pub use optim::sgd::Sgd;
pub use train::{train_loop, TrainConfig, TrainingOutcome};

pub use color::{hex_to_normalized_rgb, hex_to_rgb, normalize_rgb, rgb_to_hex, NormalizedRgb, Rgb};
pub use collect::TrainingDataCollector;
pub use config::ContrastConfig;
pub use demo::demo_training_data;
pub use error::{ColorError, ModelStoreError, StoreError, TrainerError};
pub use model::{
    BinaryClassifier, ContrastTrainer, FeedforwardClassifier, Label, PredictionResult,
    TrainingExample, TrainingPreset, TrainingQuality,
};
pub use session::Phase;
pub use store::{FileStore, KeyValueStore, MemoryStore, ModelStore, SavedModel};
