/// Binary cross-entropy applied independently to every output score.
pub struct BceLoss;

/// Keeps log() and the gradient denominator away from zero.
const EPS: f64 = 1e-12;

impl BceLoss {
    /// -mean(y·ln(p) + (1-y)·ln(1-p)) with p clamped into (0, 1).
    pub fn loss(predicted: &[f64], expected: &[f64]) -> f64 {
        if predicted.is_empty() {
            return 0.0;
        }
        let sum: f64 = predicted.iter().zip(expected)
            .map(|(&p, &y)| {
                let p = p.clamp(EPS, 1.0 - EPS);
                -(y * p.ln() + (1.0 - y) * (1.0 - p).ln())
            })
            .sum();
        sum / predicted.len() as f64
    }

    /// (p - y) / (p·(1 - p)), the gradient with respect to the sigmoid output.
    pub fn derivative(predicted: &[f64], expected: &[f64]) -> Vec<f64> {
        predicted.iter().zip(expected)
            .map(|(&p, &y)| {
                let p = p.clamp(EPS, 1.0 - EPS);
                (p - y) / (p * (1.0 - p))
            })
            .collect()
    }
}
