use serde::{Serialize, Deserialize};

use crate::layers::dense::Layer;
use crate::math::matrix::Matrix;
use crate::activation::activation::ActivationFunction;
use crate::network::network::Network;

/// Format tag written into every snapshot.
pub const SNAPSHOT_FORMAT: &str = "contrast-nn/feedforward";
pub const SNAPSHOT_VERSION: u32 = 1;

/// Input channel names, in the order the network consumes them.
pub const INPUT_LABELS: [&str; 3] = ["r", "g", "b"];
/// Output score names, in the order the network emits them.
pub const OUTPUT_LABELS: [&str; 2] = ["dark", "light"];

/// Weights of one layer as stored in a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSnapshot {
    pub activation: ActivationFunction,
    pub weights: Matrix,
    pub biases: Matrix,
}

/// Serializable topology + weights, enough to rebuild a network exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSnapshot {
    pub format: String,
    pub version: u32,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub layers: Vec<LayerSnapshot>,
}

/// Why a snapshot could not be turned back into a network.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("model JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unsupported model format {format:?} version {version}")]
    Format { format: String, version: u32 },
    #[error("model expects inputs {found:?}, not r/g/b")]
    Inputs { found: Vec<String> },
    #[error("model emits outputs {found:?}, not dark/light")]
    Outputs { found: Vec<String> },
    #[error("model has no layers")]
    Empty,
    #[error("layer {index} has inconsistent or non-finite weights")]
    Layer { index: usize },
    #[error("layer {index} expects {expected} inputs but receives {found}")]
    Chain { index: usize, expected: usize, found: usize },
    #[error("output layer uses {found:?}; scores must come from a sigmoid")]
    OutputActivation { found: ActivationFunction },
}

impl ModelSnapshot {
    pub fn of(network: &Network) -> ModelSnapshot {
        ModelSnapshot {
            format: SNAPSHOT_FORMAT.to_string(),
            version: SNAPSHOT_VERSION,
            inputs: INPUT_LABELS.iter().map(|s| s.to_string()).collect(),
            outputs: OUTPUT_LABELS.iter().map(|s| s.to_string()).collect(),
            layers: network.layers.iter()
                .map(|l| LayerSnapshot {
                    activation: l.activator,
                    weights: l.weights.clone(),
                    biases: l.biases.clone(),
                })
                .collect(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<ModelSnapshot, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validates the snapshot and rebuilds the network it describes.
    pub fn into_network(self) -> Result<Network, SnapshotError> {
        if self.format != SNAPSHOT_FORMAT || self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::Format { format: self.format, version: self.version });
        }
        if self.inputs != INPUT_LABELS {
            return Err(SnapshotError::Inputs { found: self.inputs });
        }
        if self.outputs != OUTPUT_LABELS {
            return Err(SnapshotError::Outputs { found: self.outputs });
        }
        if self.layers.is_empty() {
            return Err(SnapshotError::Empty);
        }

        let mut fan_in = INPUT_LABELS.len();
        let mut layers = Vec::with_capacity(self.layers.len());
        for (index, snap) in self.layers.into_iter().enumerate() {
            let layer = Layer::from_parts(snap.weights, snap.biases, snap.activation);
            if !layer.is_consistent() {
                return Err(SnapshotError::Layer { index });
            }
            if layer.input_size() != fan_in {
                return Err(SnapshotError::Chain { index, expected: layer.input_size(), found: fan_in });
            }
            fan_in = layer.size;
            layers.push(layer);
        }

        if fan_in != OUTPUT_LABELS.len() {
            return Err(SnapshotError::Outputs {
                found: vec![format!("{fan_in} unnamed scores")],
            });
        }
        if let Some(last) = layers.last() {
            if last.activator != ActivationFunction::Sigmoid {
                return Err(SnapshotError::OutputActivation { found: last.activator });
            }
        }
        Ok(Network { layers })
    }
}
