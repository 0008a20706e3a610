use crate::color::convert::hex_to_normalized_rgb;
use crate::color::generator::generate_training_colors;
use crate::config::CollectorConfig;
use crate::model::example::{Label, TrainingExample};

/// Where the collector is in its color sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectorState {
    /// Showing the color at this index.
    Active(usize),
    /// Every color has been answered or skipped.
    Complete,
}

/// Walks a fixed color sequence, turning each user choice into a labeled example.
#[derive(Debug, Clone)]
pub struct TrainingDataCollector {
    config: CollectorConfig,
    colors: Vec<String>,
    index: usize,
    examples: Vec<TrainingExample>,
}

impl TrainingDataCollector {
    /// Starts at the first color of a freshly generated sequence.
    pub fn new(config: CollectorConfig) -> Self {
        let colors = generate_training_colors(config.color_count);
        TrainingDataCollector { config, colors, index: 0, examples: Vec::new() }
    }

    /// Uses a caller-supplied sequence instead of a random one.
    pub fn with_colors(colors: Vec<String>, config: CollectorConfig) -> Self {
        TrainingDataCollector { config, colors, index: 0, examples: Vec::new() }
    }

    pub fn state(&self) -> CollectorState {
        if self.is_complete() {
            CollectorState::Complete
        } else {
            CollectorState::Active(self.index)
        }
    }

    pub fn colors(&self) -> &[String] {
        &self.colors
    }

    pub fn current_index(&self) -> usize {
        self.index
    }

    /// The color on screen; once complete this falls back to the first color.
    pub fn current_color(&self) -> Option<&str> {
        self.colors
            .get(self.index)
            .or_else(|| self.colors.first())
            .map(String::as_str)
    }

    pub fn training_data(&self) -> &[TrainingExample] {
        &self.examples
    }

    pub fn into_training_data(self) -> Vec<TrainingExample> {
        self.examples
    }

    pub fn example_count(&self) -> usize {
        self.examples.len()
    }

    pub fn has_enough_examples(&self) -> bool {
        self.examples.len() >= self.config.min_examples
    }

    pub fn is_complete(&self) -> bool {
        self.index >= self.colors.len()
    }

    /// Percent of the sequence consumed, 0 to 100.
    pub fn progress(&self) -> u8 {
        if self.colors.is_empty() {
            return 100;
        }
        let pct = (100.0 * self.index as f64 / self.colors.len() as f64).round();
        pct.min(100.0) as u8
    }

    /// Records `label` for the current color and moves on.
    ///
    /// Does nothing once complete, or if the current color does not parse.
    pub fn add_example(&mut self, label: Label) {
        let CollectorState::Active(index) = self.state() else {
            return;
        };
        let Some(input) = hex_to_normalized_rgb(&self.colors[index]) else {
            tracing::warn!(color = %self.colors[index], "skipping unparseable training color");
            return;
        };
        self.examples.push(TrainingExample::new(input, label));
        self.index += 1;
    }

    /// Moves on without recording anything.
    pub fn skip(&mut self) {
        if !self.is_complete() {
            self.index += 1;
        }
    }

    /// Drops all examples and starts over on a new random sequence.
    pub fn reset(&mut self) {
        self.colors = generate_training_colors(self.config.color_count);
        self.index = 0;
        self.examples.clear();
    }
}

impl Default for TrainingDataCollector {
    fn default() -> Self {
        TrainingDataCollector::new(CollectorConfig::default())
    }
}
