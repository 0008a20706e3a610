use crate::{math::matrix::Matrix, layers::dense::Layer};

/// Stochastic gradient descent with classical momentum.
///
/// Each update is `v = momentum * v + learning_rate * grad; w -= v`, with one
/// velocity pair per layer. Velocities start at zero and are sized on first use.
pub struct Sgd {
    pub learning_rate: f64,
    pub momentum: f64,
    velocities: Vec<Option<(Matrix, Matrix)>>,
}

impl Sgd {
    pub fn new(learning_rate: f64, momentum: f64) -> Sgd {
        Sgd { learning_rate, momentum, velocities: Vec::new() }
    }

    /// Applies one weight update to layer `index` given its gradients.
    pub fn step(&mut self, index: usize, layer: &mut Layer, weights_grad: &Matrix, biases_grad: &Matrix) {
        if self.velocities.len() <= index {
            self.velocities.resize(index + 1, None);
        }
        let (lr, momentum) = (self.learning_rate, self.momentum);
        let (w_vel, b_vel) = self.velocities[index].get_or_insert_with(|| (
            Matrix::zeros(weights_grad.rows, weights_grad.cols),
            Matrix::zeros(biases_grad.rows, biases_grad.cols),
        ));

        *w_vel = w_vel.map(|v| v * momentum) + weights_grad.map(|g| g * lr);
        *b_vel = b_vel.map(|v| v * momentum) + biases_grad.map(|g| g * lr);

        layer.apply_steps(w_vel, b_vel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::ActivationFunction;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn momentum_accumulates_across_steps() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut layer = Layer::new(1, 1, ActivationFunction::Sigmoid, &mut rng);
        let w0 = layer.weights.data[0][0];
        let grad = Matrix::row(vec![1.0]);

        let mut sgd = Sgd::new(0.1, 0.5);
        sgd.step(0, &mut layer, &grad, &grad);
        let w1 = layer.weights.data[0][0];
        sgd.step(0, &mut layer, &grad, &grad);
        let w2 = layer.weights.data[0][0];

        assert!((w0 - w1 - 0.1).abs() < 1e-12);
        // second step: 0.5 * 0.1 + 0.1
        assert!((w1 - w2 - 0.15).abs() < 1e-12);
    }
}
