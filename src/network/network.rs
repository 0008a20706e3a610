use serde::{Serialize, Deserialize};

use crate::{layers::dense::Layer, math::matrix::Matrix};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Network {
    pub layers: Vec<Layer>,
}

impl Network {
    /// Forward pass; stores activations in each layer for backprop.
    pub fn forward(&mut self, input: &[f64]) -> Vec<f64> {
        let mut current = Matrix::row(input.to_vec());
        for layer in &mut self.layers {
            current = layer.feed_from(&current);
        }
        current.data.swap_remove(0)
    }

    /// Forward pass without touching the backprop cache.
    pub fn run(&self, input: &[f64]) -> Vec<f64> {
        let mut current = Matrix::row(input.to_vec());
        for layer in &self.layers {
            current = layer.activate(&current);
        }
        current.data.swap_remove(0)
    }

    pub fn input_size(&self) -> usize {
        self.layers.first().map(Layer::input_size).unwrap_or(0)
    }

    pub fn output_size(&self) -> usize {
        self.layers.last().map(|l| l.size).unwrap_or(0)
    }

    /// Every layer is well formed and feeds the next one.
    pub fn is_consistent(&self) -> bool {
        !self.layers.is_empty()
            && self.layers.iter().all(Layer::is_consistent)
            && self.layers.windows(2).all(|pair| pair[0].size == pair[1].input_size())
    }
}
