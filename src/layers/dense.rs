use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::{math::matrix::Matrix, activation::activation::ActivationFunction};

/// Initial weights are drawn uniformly from [-INIT_SCALE, INIT_SCALE).
const INIT_SCALE: f64 = 0.5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer{
    pub size: usize,
    /// Shape `(input_size, size)`.
    pub weights: Matrix,
    /// Shape `(1, size)`.
    pub biases: Matrix,
    pub activator: ActivationFunction,
    #[serde(skip)]
    pub neurons: Matrix,
    #[serde(skip)]
    pre_neurons: Matrix,  // pre-activation values (z = Wx + b) needed for correct derivative
}

impl Layer {
    pub fn new<R: Rng + ?Sized>(
        size: usize,
        input_size: usize,
        activation: ActivationFunction,
        rng: &mut R,
    ) -> Layer {
        Layer {
            size,
            weights: Matrix::random(input_size, size, INIT_SCALE, rng),
            biases: Matrix::random(1, size, INIT_SCALE, rng),
            activator: activation,
            neurons: Matrix::zeros(1, size),
            pre_neurons: Matrix::zeros(1, size),
        }
    }

    /// Rebuilds a layer from stored parameters; `size` follows the bias width.
    pub fn from_parts(weights: Matrix, biases: Matrix, activation: ActivationFunction) -> Layer {
        let size = biases.cols;
        Layer {
            size,
            weights,
            biases,
            activator: activation,
            neurons: Matrix::zeros(1, size),
            pre_neurons: Matrix::zeros(1, size),
        }
    }

    pub fn input_size(&self) -> usize {
        self.weights.rows
    }

    /// Inference-only pass; leaves the backprop cache alone.
    pub fn activate(&self, input: &Matrix) -> Matrix {
        let z = (input * &self.weights) + self.biases.clone();
        z.map(|x| self.activator.function(x))
    }

    /// Training pass; caches z and a for `compute_gradients`.
    pub fn feed_from(&mut self, input: &Matrix) -> Matrix {
        let z = (input * &self.weights) + self.biases.clone();
        let a = z.map(|x| self.activator.function(x));
        self.pre_neurons = z;
        self.neurons = a.clone();
        a
    }

    /// Computes gradient adjustments. Returns (weights_grad, biases_grad).
    /// `next_layer_delta` is ∂L/∂a for this layer (error in activation space).
    pub fn compute_gradients(
        &self,
        next_layer_delta: &Matrix,
        inputs: &Matrix,
    ) -> (Matrix, Matrix) {
        // Use pre-activation z so that derivative(z) = σ'(z) is computed correctly
        let act_derivative = self.pre_neurons.map(|x| self.activator.derivative(x));
        // δ = error ⊙ σ'(z)
        let layer_delta = next_layer_delta.hadamard(&act_derivative);

        let weights_adjustment = &inputs.transpose() * &layer_delta;

        (weights_adjustment, layer_delta)
    }

    /// Subtracts already-scaled steps from the parameters.
    pub fn apply_steps(&mut self, weights_step: &Matrix, biases_step: &Matrix) {
        self.weights = self.weights.clone() - weights_step.clone();
        self.biases = self.biases.clone() - biases_step.clone();
    }

    /// Weights and biases agree with `size` and with each other.
    pub fn is_consistent(&self) -> bool {
        self.weights.is_well_formed()
            && self.biases.is_well_formed()
            && self.weights.cols == self.size
            && self.biases.rows == 1
            && self.biases.cols == self.size
            && self.weights.is_finite()
            && self.biases.is_finite()
    }
}
