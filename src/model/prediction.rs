use serde::{Deserialize, Serialize};

use crate::model::example::Label;

/// Raw class scores, each in [0, 1]; they need not sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    pub dark: f64,
    pub light: f64,
}

impl Scores {
    /// Reads `[dark, light]` from a network output; missing entries count as 0.
    pub fn from_output(output: &[f64]) -> Scores {
        Scores {
            dark: output.first().copied().unwrap_or(0.0),
            light: output.get(1).copied().unwrap_or(0.0),
        }
    }
}

/// Recommendation for one color plus the scores behind it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionResult {
    pub prediction: Label,
    pub raw: Scores,
}

impl PredictionResult {
    /// `Dark` only when its score is strictly greater; ties go to `Light`.
    pub fn from_scores(raw: Scores) -> PredictionResult {
        let prediction = if raw.dark > raw.light { Label::Dark } else { Label::Light };
        PredictionResult { prediction, raw }
    }

    /// Winning score as a whole percentage, for display.
    pub fn confidence(&self) -> u8 {
        (self.raw.dark.max(self.raw.light) * 100.0).round().clamp(0.0, 100.0) as u8
    }
}
