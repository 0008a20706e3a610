use serde::{Serialize, Deserialize};

use crate::loss::{bce::BceLoss, mse::MseLoss};

/// Selects which loss function the training loop uses. Both pair with the
/// sigmoid output layer.
///
/// - `Mse`               : Mean-squared error over the two class scores.
/// - `BinaryCrossEntropy`: Per-score binary cross-entropy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossType {
    #[default]
    Mse,
    BinaryCrossEntropy,
}

impl LossType {
    /// Scalar loss for one sample.
    pub fn loss(&self, predicted: &[f64], expected: &[f64]) -> f64 {
        match self {
            LossType::Mse                => MseLoss::loss(predicted, expected),
            LossType::BinaryCrossEntropy => BceLoss::loss(predicted, expected),
        }
    }

    /// Per-output gradient for one sample.
    pub fn derivative(&self, predicted: &[f64], expected: &[f64]) -> Vec<f64> {
        match self {
            LossType::Mse                => MseLoss::derivative(predicted, expected),
            LossType::BinaryCrossEntropy => BceLoss::derivative(predicted, expected),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_prediction_has_zero_mse() {
        assert_eq!(LossType::Mse.loss(&[1.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn bce_penalizes_confident_mistakes_harder() {
        let mild = LossType::BinaryCrossEntropy.loss(&[0.6], &[0.0]);
        let harsh = LossType::BinaryCrossEntropy.loss(&[0.99], &[0.0]);
        assert!(harsh > mild);
    }

    #[test]
    fn parses_snake_case_names() {
        let t: LossType = serde_json::from_str("\"binary_cross_entropy\"").unwrap();
        assert_eq!(t, LossType::BinaryCrossEntropy);
    }
}
