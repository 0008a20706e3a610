//! A ready-made training set for trying the model without clicking through colors.
//!
//! Labels follow relative luminance: dark backgrounds get white text, light
//! backgrounds get black text, and mid-tones were picked by hand.

use crate::color::convert::NormalizedRgb;
use crate::model::example::{Label, TrainingExample};

const DEMO: [(f64, f64, f64, Label); 30] = [
    // dark backgrounds
    (0.0, 0.0, 0.0, Label::Dark),
    (0.1, 0.1, 0.1, Label::Dark),
    (0.15, 0.15, 0.2, Label::Dark),
    (0.2, 0.1, 0.1, Label::Dark),
    (0.1, 0.2, 0.1, Label::Dark),
    (0.1, 0.1, 0.3, Label::Dark),
    (0.3, 0.1, 0.3, Label::Dark),
    (0.2, 0.2, 0.2, Label::Dark),
    // light backgrounds
    (1.0, 1.0, 1.0, Label::Light),
    (0.95, 0.95, 0.95, Label::Light),
    (0.9, 0.9, 0.85, Label::Light),
    (1.0, 0.95, 0.8, Label::Light),
    (0.8, 0.9, 1.0, Label::Light),
    (0.9, 1.0, 0.9, Label::Light),
    (1.0, 0.85, 0.85, Label::Light),
    (0.85, 0.85, 0.9, Label::Light),
    // mid-tones
    (0.5, 0.5, 0.5, Label::Dark),
    (0.6, 0.6, 0.6, Label::Light),
    (0.9, 0.4, 0.4, Label::Light),
    (0.2, 0.5, 0.8, Label::Dark),
    (0.4, 0.7, 0.4, Label::Light),
    (1.0, 0.8, 0.0, Label::Light),
    (1.0, 0.5, 0.0, Label::Light),
    (0.5, 0.2, 0.5, Label::Dark),
    // common UI colors
    (0.2, 0.6, 0.86, Label::Dark),
    (0.18, 0.8, 0.44, Label::Light),
    (0.91, 0.3, 0.24, Label::Dark),
    (0.95, 0.77, 0.06, Label::Light),
    (0.61, 0.35, 0.71, Label::Dark),
    (0.1, 0.74, 0.61, Label::Light),
];

pub fn demo_training_data() -> Vec<TrainingExample> {
    DEMO.iter()
        .map(|&(r, g, b, label)| TrainingExample::new(NormalizedRgb::new(r, g, b), label))
        .collect()
}
