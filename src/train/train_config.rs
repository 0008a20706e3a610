use std::sync::mpsc;

use crate::loss::loss_type::LossType;
use crate::train::iteration_stats::IterationStats;

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `iterations`     : maximum number of full passes over the examples
/// - `error_threshold`: stop as soon as an iteration's mean loss drops below this
/// - `learning_rate`  : SGD step size
/// - `momentum`       : fraction of the previous step carried into the next
/// - `loss_type`      : which loss function to use
/// - `progress_period`: iterations between progress samples (0 disables them)
/// - `progress_tx`    : optional channel sender for `IterationStats`; a dropped
///                       receiver is ignored, the run still completes
pub struct TrainConfig {
    pub iterations: usize,
    pub error_threshold: f64,
    pub learning_rate: f64,
    pub momentum: f64,
    pub loss_type: LossType,
    pub progress_period: usize,
    pub progress_tx: Option<mpsc::Sender<IterationStats>>,
}

impl TrainConfig {
    /// Defaults: threshold 0.005, learning rate 0.3, momentum 0.1, MSE, no progress channel.
    pub fn new(iterations: usize) -> Self {
        TrainConfig {
            iterations,
            error_threshold: 0.005,
            learning_rate: 0.3,
            momentum: 0.1,
            loss_type: LossType::Mse,
            progress_period: 10,
            progress_tx: None,
        }
    }
}
