//! Application phases as an explicit state machine.
//!
//! The phase is owned by whatever drives the interface; the core only
//! provides the transitions. Each transition consumes the current phase and
//! returns the next one; a transition that does not apply to the current
//! phase returns it unchanged.

use crate::demo::demo_training_data;
use crate::model::example::TrainingExample;
use crate::model::preset::TrainingPreset;
use crate::store::SavedModel;

/// What the results screen is showing.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsState {
    pub training_data: Vec<TrainingExample>,
    pub preset: TrainingPreset,
    /// Set when the results come from a saved model; training is then skipped.
    pub loaded_model_json: Option<String>,
    pub saved: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    /// Saved models exist; offer to load one.
    Resume,
    Intro,
    /// Collecting examples.
    Training,
    Results(ResultsState),
}

impl Phase {
    /// `Resume` if anything is saved, otherwise `Intro`.
    pub fn initial(has_saved_models: bool) -> Phase {
        if has_saved_models { Phase::Resume } else { Phase::Intro }
    }

    /// Intro finished or skipped.
    pub fn start_training(self) -> Phase {
        match self {
            Phase::Intro => Phase::Training,
            other => other,
        }
    }

    /// Ignore saved models and go through the intro.
    pub fn start_new(self) -> Phase {
        match self {
            Phase::Resume => Phase::Intro,
            other => other,
        }
    }

    pub fn back_to_intro(self) -> Phase {
        match self {
            Phase::Training => Phase::Intro,
            other => other,
        }
    }

    /// Jump straight to results trained on the built-in demo examples.
    pub fn try_demo(self) -> Phase {
        match self {
            Phase::Intro => Phase::Results(ResultsState {
                training_data: demo_training_data(),
                preset: TrainingPreset::Balanced,
                loaded_model_json: None,
                saved: false,
            }),
            other => other,
        }
    }

    pub fn training_complete(self, training_data: Vec<TrainingExample>, preset: TrainingPreset) -> Phase {
        match self {
            Phase::Training => Phase::Results(ResultsState {
                training_data,
                preset,
                loaded_model_json: None,
                saved: false,
            }),
            other => other,
        }
    }

    /// Show results for a saved model without retraining.
    pub fn load_model(self, model: &SavedModel) -> Phase {
        match self {
            Phase::Resume => Phase::Results(ResultsState {
                training_data: model.training_data.clone(),
                preset: model.preset,
                loaded_model_json: Some(model.model_json.clone()),
                saved: true,
            }),
            other => other,
        }
    }

    pub fn retrain(self) -> Phase {
        match self {
            Phase::Results(_) => Phase::Training,
            other => other,
        }
    }

    pub fn mark_saved(self) -> Phase {
        match self {
            Phase::Results(state) => Phase::Results(ResultsState { saved: true, ..state }),
            other => other,
        }
    }

    /// Back to the start from anywhere.
    pub fn reset(self) -> Phase {
        Phase::Intro
    }
}
