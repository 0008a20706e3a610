/// Mean-squared error between predicted and target class scores.
pub struct MseLoss;

impl MseLoss {
    /// mean((p - y)²); zero for empty slices.
    pub fn loss(predicted: &[f64], expected: &[f64]) -> f64 {
        if predicted.is_empty() {
            return 0.0;
        }
        let sum: f64 = predicted.iter().zip(expected)
            .map(|(p, y)| (p - y) * (p - y))
            .sum();
        sum / predicted.len() as f64
    }

    /// ∂L/∂p up to the constant 2/n, which the learning rate absorbs.
    pub fn derivative(predicted: &[f64], expected: &[f64]) -> Vec<f64> {
        predicted.iter().zip(expected).map(|(p, y)| p - y).collect()
    }
}
