use std::time::Instant;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::math::matrix::Matrix;
use crate::network::network::Network;
use crate::optim::sgd::Sgd;
use crate::train::iteration_stats::{IterationStats, TrainingOutcome};
use crate::train::train_config::TrainConfig;

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Trains `network` with online gradient descent until `config.iterations`
/// passes have run or an iteration's mean loss falls below
/// `config.error_threshold`, whichever comes first.
///
/// # Arguments
/// - `network`: mutable reference to the network; modified in place
/// - `inputs` : training samples, each a `Vec<f64>` of length `input_size`
/// - `labels` : corresponding targets, same length as `inputs`
/// - `config` : hyperparameters and optional progress channel
/// - `rng`    : drives the per-iteration shuffle
///
/// A non-finite loss stops the run immediately; the outcome then carries that
/// loss so the caller can report divergence.
///
/// # Panics
/// Panics if `inputs` is empty or lengths mismatch.
pub fn train_loop<R: Rng + ?Sized>(
    network: &mut Network,
    inputs: &[Vec<f64>],
    labels: &[Vec<f64>],
    config: &TrainConfig,
    rng: &mut R,
) -> TrainingOutcome {
    assert!(!inputs.is_empty(), "inputs must not be empty");
    assert_eq!(
        inputs.len(),
        labels.len(),
        "inputs and labels must have equal length"
    );

    let t_start = Instant::now();
    let mut optimizer = Sgd::new(config.learning_rate, config.momentum);
    let mut indices: Vec<usize> = (0..inputs.len()).collect();
    let mut outcome = TrainingOutcome { iterations: 0, error: f64::INFINITY };

    for iteration in 1..=config.iterations {
        indices.shuffle(rng);
        let error = run_one_iteration(network, inputs, labels, &indices, &mut optimizer, config);
        outcome = TrainingOutcome { iterations: iteration, error };

        let finished = !error.is_finite()
            || error < config.error_threshold
            || iteration == config.iterations;

        if let Some(ref tx) = config.progress_tx {
            let due = config.progress_period > 0 && iteration % config.progress_period == 0;
            if due || finished {
                let stats = IterationStats {
                    iteration,
                    total_iterations: config.iterations,
                    error,
                    elapsed_ms: t_start.elapsed().as_millis() as u64,
                };
                tracing::debug!(iteration, error, "training progress");
                let _ = tx.send(stats);
            }
        }

        if finished {
            break;
        }
    }

    outcome
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// One pass over the examples in `order`, updating after every example.
/// Returns the mean loss over the pass.
fn run_one_iteration(
    network: &mut Network,
    inputs: &[Vec<f64>],
    labels: &[Vec<f64>],
    order: &[usize],
    optimizer: &mut Sgd,
    config: &TrainConfig,
) -> f64 {
    let mut total_loss = 0.0;

    for &idx in order {
        let input    = &inputs[idx];
        let expected = &labels[idx];

        let output = network.forward(input);
        total_loss += config.loss_type.loss(&output, expected);

        // Initial delta: ∂L/∂a_output (error in output activation space)
        let mut delta = Matrix::row(config.loss_type.derivative(&output, expected));

        // Backward pass.
        for i in (0..network.layers.len()).rev() {
            let input_for_layer = if i == 0 {
                Matrix::row(input.clone())
            } else {
                network.layers[i - 1].neurons.clone()
            };

            let (w_grad, b_grad) = network.layers[i].compute_gradients(&delta, &input_for_layer);

            if i > 0 {
                // Propagate δ_i through the pre-update weights to get ∂L/∂a_{i-1}
                delta = &b_grad * &network.layers[i].weights.transpose();
            }

            optimizer.step(i, &mut network.layers[i], &w_grad, &b_grad);
        }
    }

    total_loss / order.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use crate::activation::ActivationFunction;
    use crate::network::spec::NetworkSpec;
    use rand::{rngs::StdRng, SeedableRng};

    fn extremes() -> (Vec<Vec<f64>>, Vec<Vec<f64>>) {
        let inputs = vec![
            vec![0.0, 0.0, 0.0],
            vec![1.0, 1.0, 1.0],
            vec![0.1, 0.1, 0.1],
            vec![0.9, 0.9, 0.9],
        ];
        let labels = vec![
            vec![1.0, 0.0],
            vec![0.0, 1.0],
            vec![1.0, 0.0],
            vec![0.0, 1.0],
        ];
        (inputs, labels)
    }

    #[test]
    fn never_exceeds_the_iteration_budget() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut net = NetworkSpec::contrast(vec![3, 3], ActivationFunction::Sigmoid).build(&mut rng);
        let (inputs, labels) = extremes();
        let mut config = TrainConfig::new(7);
        config.error_threshold = 0.0;
        let outcome = train_loop(&mut net, &inputs, &labels, &config, &mut rng);
        assert_eq!(outcome.iterations, 7);
        assert!(outcome.error.is_finite());
    }

    #[test]
    fn a_generous_threshold_stops_after_one_iteration() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut net = NetworkSpec::contrast(vec![3, 3], ActivationFunction::Sigmoid).build(&mut rng);
        let (inputs, labels) = extremes();
        let mut config = TrainConfig::new(100);
        config.error_threshold = 10.0;
        let outcome = train_loop(&mut net, &inputs, &labels, &config, &mut rng);
        assert_eq!(outcome.iterations, 1);
        assert!(outcome.reached_threshold(10.0));
    }

    #[test]
    fn training_lowers_the_loss() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut net = NetworkSpec::contrast(vec![3, 3], ActivationFunction::Sigmoid).build(&mut rng);
        let (inputs, labels) = extremes();

        let mut probe = TrainConfig::new(1);
        probe.learning_rate = 0.0;
        probe.momentum = 0.0;
        let before = train_loop(&mut net, &inputs, &labels, &probe, &mut rng).error;

        let after = train_loop(&mut net, &inputs, &labels, &TrainConfig::new(3000), &mut rng).error;
        assert!(after < before, "loss went from {before} to {after}");
    }

    #[test]
    fn reports_progress_including_the_last_iteration() {
        let mut rng = StdRng::seed_from_u64(10);
        let mut net = NetworkSpec::contrast(vec![3], ActivationFunction::Sigmoid).build(&mut rng);
        let (inputs, labels) = extremes();
        let (tx, rx) = mpsc::channel();
        let mut config = TrainConfig::new(25);
        config.error_threshold = 0.0;
        config.progress_period = 10;
        config.progress_tx = Some(tx);
        train_loop(&mut net, &inputs, &labels, &config, &mut rng);
        drop(config);

        let seen: Vec<usize> = rx.iter().map(|s| s.iteration).collect();
        assert_eq!(seen, vec![10, 20, 25]);
    }
}
