use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::layers::dense::Layer;
use crate::network::network::Network;

/// Fully connected topology: `input_size` → each of `hidden_layers` → `output_size`.
///
/// Hidden layers use `activation`; the output layer is always sigmoid so that
/// every output is a score in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    pub input_size: usize,
    pub hidden_layers: Vec<usize>,
    pub output_size: usize,
    pub activation: ActivationFunction,
}

impl NetworkSpec {
    /// Three normalized channels in, `dark`/`light` scores out.
    pub fn contrast(hidden_layers: Vec<usize>, activation: ActivationFunction) -> NetworkSpec {
        NetworkSpec { input_size: 3, hidden_layers, output_size: 2, activation }
    }

    /// Builds freshly initialised layers for this topology.
    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> Network {
        let mut layers = Vec::with_capacity(self.hidden_layers.len() + 1);
        let mut fan_in = self.input_size;
        for &width in self.hidden_layers.iter().filter(|&&w| w > 0) {
            layers.push(Layer::new(width, fan_in, self.activation, rng));
            fan_in = width;
        }
        layers.push(Layer::new(self.output_size, fan_in, ActivationFunction::Sigmoid, rng));
        Network { layers }
    }
}
