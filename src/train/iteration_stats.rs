use serde::{Serialize, Deserialize};

/// Progress sample emitted by `train_loop`.
///
/// When a `progress_tx` channel is configured in `TrainConfig`, the loop sends
/// one sample every `progress_period` iterations and one for the final
/// iteration, so a caller can drive a loading indicator while training runs
/// on another thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationStats {
    /// 1-based iteration number.
    pub iteration: usize,
    /// Iteration budget for this run.
    pub total_iterations: usize,
    /// Mean per-example loss over this iteration.
    pub error: f64,
    /// Wall-clock time since the run started, in milliseconds.
    pub elapsed_ms: u64,
}

/// What a finished run reports back.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingOutcome {
    /// Iterations actually performed (≤ the budget).
    pub iterations: usize,
    /// Loss of the last completed iteration.
    pub error: f64,
}

impl TrainingOutcome {
    pub fn reached_threshold(&self, threshold: f64) -> bool {
        self.error < threshold
    }
}
