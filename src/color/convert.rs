//! Conversions between hex strings, RGB, HSL and HSV.
//!
//! Everything here is pure. Malformed hex input yields `None` rather than an
//! error; the `FromStr` impl on [`Rgb`] is the one place a typed error is
//! produced, for callers that want `?`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ColorError;

/// 8-bit sRGB triple, the representation every picker and hex string maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// RGB scaled into [0, 1] per channel; the network's input representation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "UnitChannels")]
pub struct NormalizedRgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// Deserialized channels pass through `NormalizedRgb::new` and get clamped.
#[derive(Deserialize)]
struct UnitChannels {
    r: f64,
    g: f64,
    b: f64,
}

impl From<UnitChannels> for NormalizedRgb {
    fn from(c: UnitChannels) -> Self {
        NormalizedRgb::new(c.r, c.g, c.b)
    }
}

/// Hue in degrees [0, 360), saturation and lightness in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hsl {
    pub h: u16,
    pub s: u8,
    pub l: u8,
}

/// Hue in degrees [0, 360), saturation and value in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hsv {
    pub h: u16,
    pub s: u8,
    pub v: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
    pub const WHITE: Rgb = Rgb { r: 255, g: 255, b: 255 };

    pub const fn new(r: u8, g: u8, b: u8) -> Rgb {
        Rgb { r, g, b }
    }

    /// Clamps each channel into [0, 255] and rounds to the nearest integer.
    pub fn from_channels(r: f64, g: f64, b: f64) -> Rgb {
        Rgb { r: to_byte(r), g: to_byte(g), b: to_byte(b) }
    }

    pub fn normalize(self) -> NormalizedRgb {
        normalize_rgb(self)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        hex_to_rgb(s).ok_or_else(|| ColorError::InvalidHex(s.to_string()))
    }
}

impl NormalizedRgb {
    /// Builds a normalized color; NaN becomes 0 and everything else is clamped to [0, 1].
    pub fn new(r: f64, g: f64, b: f64) -> NormalizedRgb {
        NormalizedRgb { r: unit(r), g: unit(g), b: unit(b) }
    }

    /// Scales back to 8-bit channels.
    pub fn to_rgb(self) -> Rgb {
        Rgb::from_channels(self.r * 255.0, self.g * 255.0, self.b * 255.0)
    }

    /// Channels in network input order.
    pub fn to_array(self) -> [f64; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<Rgb> for NormalizedRgb {
    fn from(rgb: Rgb) -> Self {
        normalize_rgb(rgb)
    }
}

fn to_byte(x: f64) -> u8 {
    if x.is_nan() {
        return 0;
    }
    x.round().clamp(0.0, 255.0) as u8
}

fn unit(x: f64) -> f64 {
    if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) }
}

fn percent(x: f64) -> u8 {
    (x * 100.0).round().clamp(0.0, 100.0) as u8
}

fn degrees(h: f64) -> u16 {
    ((h * 360.0).round() as u16) % 360
}

/// Parses `#RGB` or `#RRGGBB` (leading `#` optional, any case).
pub fn hex_to_rgb(hex: &str) -> Option<Rgb> {
    let clean = hex.strip_prefix('#').unwrap_or(hex);
    if !clean.bytes().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let full: String = match clean.len() {
        3 => clean.chars().flat_map(|c| [c, c]).collect(),
        6 => clean.to_string(),
        _ => return None,
    };

    let channel = |i: usize| u8::from_str_radix(&full[i..i + 2], 16).ok();
    Some(Rgb { r: channel(0)?, g: channel(2)?, b: channel(4)? })
}

/// Lowercase `#rrggbb`.
pub fn rgb_to_hex(rgb: Rgb) -> String {
    rgb.to_string()
}

pub fn normalize_rgb(rgb: Rgb) -> NormalizedRgb {
    NormalizedRgb::new(rgb.r as f64 / 255.0, rgb.g as f64 / 255.0, rgb.b as f64 / 255.0)
}

pub fn hex_to_normalized_rgb(hex: &str) -> Option<NormalizedRgb> {
    hex_to_rgb(hex).map(normalize_rgb)
}

pub fn is_valid_hex(hex: &str) -> bool {
    let clean = hex.strip_prefix('#').unwrap_or(hex);
    matches!(clean.len(), 3 | 6) && clean.bytes().all(|c| c.is_ascii_hexdigit())
}

/// Shared hue computation for HSL and HSV; returns a fraction of a full turn.
fn hue_fraction(r: f64, g: f64, b: f64, max: f64, d: f64) -> f64 {
    if max == r {
        ((g - b) / d + if g < b { 6.0 } else { 0.0 }) / 6.0
    } else if max == g {
        ((b - r) / d + 2.0) / 6.0
    } else {
        ((r - g) / d + 4.0) / 6.0
    }
}

fn unit_channels(rgb: Rgb) -> (f64, f64, f64) {
    (rgb.r as f64 / 255.0, rgb.g as f64 / 255.0, rgb.b as f64 / 255.0)
}

pub fn rgb_to_hsl(rgb: Rgb) -> Hsl {
    let (r, g, b) = unit_channels(rgb);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        return Hsl { h: 0, s: 0, l: percent(l) };
    }

    let d = max - min;
    let s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };
    let h = hue_fraction(r, g, b, max, d);

    Hsl { h: degrees(h), s: percent(s), l: percent(l) }
}

pub fn hsl_to_rgb(hsl: Hsl) -> Rgb {
    let h = (hsl.h % 360) as f64 / 360.0;
    let s = hsl.s.min(100) as f64 / 100.0;
    let l = hsl.l.min(100) as f64 / 100.0;

    if s == 0.0 {
        return Rgb::from_channels(l * 255.0, l * 255.0, l * 255.0);
    }

    let hue_to_rgb = |p: f64, q: f64, mut t: f64| -> f64 {
        if t < 0.0 { t += 1.0; }
        if t > 1.0 { t -= 1.0; }
        if t < 1.0 / 6.0 { return p + (q - p) * 6.0 * t; }
        if t < 1.0 / 2.0 { return q; }
        if t < 2.0 / 3.0 { return p + (q - p) * (2.0 / 3.0 - t) * 6.0; }
        p
    };

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    Rgb::from_channels(
        hue_to_rgb(p, q, h + 1.0 / 3.0) * 255.0,
        hue_to_rgb(p, q, h) * 255.0,
        hue_to_rgb(p, q, h - 1.0 / 3.0) * 255.0,
    )
}

pub fn rgb_to_hsv(rgb: Rgb) -> Hsv {
    let (r, g, b) = unit_channels(rgb);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let d = max - min;

    let s = if max == 0.0 { 0.0 } else { d / max };
    let h = if d == 0.0 { 0.0 } else { hue_fraction(r, g, b, max, d) };

    Hsv { h: degrees(h), s: percent(s), v: percent(max) }
}

pub fn hsv_to_rgb(hsv: Hsv) -> Rgb {
    let h = (hsv.h % 360) as f64 / 60.0;
    let s = hsv.s.min(100) as f64 / 100.0;
    let v = hsv.v.min(100) as f64 / 100.0;

    let c = v * s;
    let x = c * (1.0 - ((h % 2.0) - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match h as u8 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    Rgb::from_channels((r + m) * 255.0, (g + m) * 255.0, (b + m) * 255.0)
}

pub fn hex_to_hsl(hex: &str) -> Option<Hsl> {
    hex_to_rgb(hex).map(rgb_to_hsl)
}

pub fn hsl_to_hex(hsl: Hsl) -> String {
    rgb_to_hex(hsl_to_rgb(hsl))
}

pub fn hex_to_hsv(hex: &str) -> Option<Hsv> {
    hex_to_rgb(hex).map(rgb_to_hsv)
}

pub fn hsv_to_hex(hsv: Hsv) -> String {
    rgb_to_hex(hsv_to_rgb(hsv))
}
