use serde::{Deserialize, Serialize};

use crate::color::convert::NormalizedRgb;

/// Which text color a background wants.
///
/// `Dark` means the background is dark and white text reads best; `Light`
/// means the background is light and black text reads best.
///
/// Serialized as a one-hot object: `{"dark":1}` or `{"light":1}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "OneHot", into = "OneHotOut")]
pub enum Label {
    Dark,
    Light,
}

impl Label {
    /// Network target vector in `[dark, light]` order.
    pub fn one_hot(self) -> [f64; 2] {
        match self {
            Label::Dark => [1.0, 0.0],
            Label::Light => [0.0, 1.0],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Label::Dark => "dark",
            Label::Light => "light",
        }
    }
}

/// Incoming label; an absent key means 0.
#[derive(Deserialize)]
struct OneHot {
    #[serde(default)]
    dark: Option<f64>,
    #[serde(default)]
    light: Option<f64>,
}

/// Outgoing label; only the set key is written, as the integer 1.
#[derive(Serialize)]
struct OneHotOut {
    #[serde(skip_serializing_if = "Option::is_none")]
    dark: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    light: Option<u8>,
}

impl From<Label> for OneHotOut {
    fn from(label: Label) -> Self {
        match label {
            Label::Dark => OneHotOut { dark: Some(1), light: None },
            Label::Light => OneHotOut { dark: None, light: Some(1) },
        }
    }
}

impl TryFrom<OneHot> for Label {
    type Error = String;

    fn try_from(value: OneHot) -> Result<Self, Self::Error> {
        let dark = value.dark.unwrap_or(0.0);
        let light = value.light.unwrap_or(0.0);
        match (dark == 1.0, light == 1.0) {
            (true, false) => Ok(Label::Dark),
            (false, true) => Ok(Label::Light),
            _ => Err(format!("label must set exactly one of dark/light to 1 (dark={dark}, light={light})")),
        }
    }
}

/// One labeled color, as collected from a user choice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub input: NormalizedRgb,
    pub output: Label,
}

impl TrainingExample {
    pub fn new(input: NormalizedRgb, output: Label) -> TrainingExample {
        TrainingExample { input, output }
    }
}
