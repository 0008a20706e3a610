use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Named iteration budget for a training run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrainingPreset {
    Quick,
    #[default]
    Balanced,
    Thorough,
}

impl TrainingPreset {
    pub const ALL: [TrainingPreset; 3] = [
        TrainingPreset::Quick,
        TrainingPreset::Balanced,
        TrainingPreset::Thorough,
    ];

    pub fn iterations(self) -> usize {
        match self {
            TrainingPreset::Quick => 100,
            TrainingPreset::Balanced => 1000,
            TrainingPreset::Thorough => 5000,
        }
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            TrainingPreset::Quick => "Quick",
            TrainingPreset::Balanced => "Balanced",
            TrainingPreset::Thorough => "Thorough",
        }
    }

    /// Wire name, as stored in saved models.
    pub fn as_str(self) -> &'static str {
        match self {
            TrainingPreset::Quick => "quick",
            TrainingPreset::Balanced => "balanced",
            TrainingPreset::Thorough => "thorough",
        }
    }
}

impl fmt::Display for TrainingPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrainingPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TrainingPreset::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown training preset {s:?}"))
    }
}
