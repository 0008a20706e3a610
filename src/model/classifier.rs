use rand::rngs::StdRng;

use crate::color::convert::NormalizedRgb;
use crate::config::NetworkConfig;
use crate::model::example::TrainingExample;
use crate::model::prediction::Scores;
use crate::network::{ModelSnapshot, Network, NetworkSpec};
use crate::train::{train_loop, TrainConfig, TrainingOutcome};

/// A trainable dark/light classifier over normalized colors.
///
/// `ContrastTrainer` only talks to this trait, so any model that can be
/// initialised, fitted, run and serialized can stand in for the built-in
/// feedforward network.
pub trait BinaryClassifier: Send + Sized + 'static {
    /// A fresh, untrained instance.
    fn initialise(config: &NetworkConfig, rng: &mut StdRng) -> Self;

    /// Fits to `examples`. May panic or return a non-finite error on failure.
    fn fit(&mut self, examples: &[TrainingExample], config: &TrainConfig, rng: &mut StdRng) -> TrainingOutcome;

    /// Class scores for one color.
    fn scores(&self, input: NormalizedRgb) -> Scores;

    /// Serialized weights and topology.
    fn to_json(&self) -> Result<String, String>;

    /// Inverse of `to_json`; rejects anything structurally unsound.
    fn from_json(json: &str) -> Result<Self, String>;
}

/// The built-in classifier: a small fully connected sigmoid network.
#[derive(Debug, Clone)]
pub struct FeedforwardClassifier {
    network: Network,
}

impl FeedforwardClassifier {
    pub fn network(&self) -> &Network {
        &self.network
    }
}

impl BinaryClassifier for FeedforwardClassifier {
    fn initialise(config: &NetworkConfig, rng: &mut StdRng) -> Self {
        let spec = NetworkSpec::contrast(config.hidden_layers.clone(), config.activation);
        FeedforwardClassifier { network: spec.build(rng) }
    }

    fn fit(&mut self, examples: &[TrainingExample], config: &TrainConfig, rng: &mut StdRng) -> TrainingOutcome {
        let inputs: Vec<Vec<f64>> = examples.iter().map(|e| e.input.to_array().to_vec()).collect();
        let labels: Vec<Vec<f64>> = examples.iter().map(|e| e.output.one_hot().to_vec()).collect();
        train_loop(&mut self.network, &inputs, &labels, config, rng)
    }

    fn scores(&self, input: NormalizedRgb) -> Scores {
        Scores::from_output(&self.network.run(&input.to_array()))
    }

    fn to_json(&self) -> Result<String, String> {
        ModelSnapshot::of(&self.network).to_json().map_err(|e| e.to_string())
    }

    fn from_json(json: &str) -> Result<Self, String> {
        ModelSnapshot::from_json(json)
            .and_then(ModelSnapshot::into_network)
            .map(|network| FeedforwardClassifier { network })
            .map_err(|e| e.to_string())
    }
}
