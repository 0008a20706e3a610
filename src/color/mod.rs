//! Color-space math and the training color sequence.

pub mod convert;
pub mod generator;

pub use convert::{
    hex_to_hsl, hex_to_hsv, hex_to_normalized_rgb, hex_to_rgb, hsl_to_hex, hsl_to_rgb,
    hsv_to_hex, hsv_to_rgb, is_valid_hex, normalize_rgb, rgb_to_hex, rgb_to_hsl, rgb_to_hsv,
    Hsl, Hsv, NormalizedRgb, Rgb,
};
pub use generator::{
    generate_training_colors, generate_training_colors_with, random_hex, DEFAULT_COLOR_COUNT,
};
