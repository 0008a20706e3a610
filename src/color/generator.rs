use std::collections::HashSet;

use rand::Rng;

use crate::color::convert::{rgb_to_hex, Rgb};

/// Number of colors shown per session unless configured otherwise.
pub const DEFAULT_COLOR_COUNT: usize = 20;

/// Distinct 24-bit colors that exist; larger requests are capped here.
const COLOR_SPACE: usize = 1 << 24;

/// One color drawn uniformly from the full 24-bit space.
pub fn random_hex<R: Rng + ?Sized>(rng: &mut R) -> String {
    let packed: u32 = rng.gen_range(0..=0xff_ffff);
    rgb_to_hex(Rgb::new((packed >> 16) as u8, (packed >> 8) as u8, packed as u8))
}

/// Training colors from the thread-local generator.
pub fn generate_training_colors(count: usize) -> Vec<String> {
    generate_training_colors_with(count, &mut rand::thread_rng())
}

/// Black, then white, then distinct random colors until `count` is reached.
///
/// `count` is raised to at least 2 so the two anchors always fit. Duplicates
/// are rejected and redrawn, so every entry is unique.
pub fn generate_training_colors_with<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<String> {
    let count = count.clamp(2, COLOR_SPACE);
    let mut colors = vec![rgb_to_hex(Rgb::BLACK), rgb_to_hex(Rgb::WHITE)];
    let mut seen: HashSet<String> = colors.iter().cloned().collect();

    while colors.len() < count {
        let color = random_hex(rng);
        if seen.insert(color.clone()) {
            colors.push(color);
        }
    }

    colors
}
