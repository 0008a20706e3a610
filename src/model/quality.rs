use serde::{Deserialize, Serialize};

/// Coarse fit rating derived from final loss and example count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrainingQuality {
    Great,
    Good,
    Fair,
    Poor,
}

/// (loss below, examples at least, rating), checked top to bottom.
const LADDER: [(f64, usize, TrainingQuality); 3] = [
    (0.01, 15, TrainingQuality::Great),
    (0.05, 10, TrainingQuality::Good),
    (0.15, 5, TrainingQuality::Fair),
];

impl TrainingQuality {
    /// First rung whose loss and count bounds both hold; `Poor` otherwise.
    pub fn assess(loss: f64, example_count: usize) -> TrainingQuality {
        LADDER
            .iter()
            .find(|(max_loss, min_examples, _)| loss < *max_loss && example_count >= *min_examples)
            .map(|&(_, _, quality)| quality)
            .unwrap_or(TrainingQuality::Poor)
    }

    pub fn label(self) -> &'static str {
        match self {
            TrainingQuality::Great => "Excellent",
            TrainingQuality::Good => "Good",
            TrainingQuality::Fair => "Fair",
            TrainingQuality::Poor => "Poor",
        }
    }
}
