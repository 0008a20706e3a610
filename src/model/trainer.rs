use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::color::convert::{hex_to_normalized_rgb, NormalizedRgb, Rgb};
use crate::config::NetworkConfig;
use crate::error::TrainerError;
use crate::model::classifier::{BinaryClassifier, FeedforwardClassifier};
use crate::model::example::TrainingExample;
use crate::model::prediction::PredictionResult;
use crate::model::preset::TrainingPreset;
use crate::model::quality::TrainingQuality;
use crate::store::SavedModel;
use crate::train::{IterationStats, TrainingOutcome};

/// Summary of a completed training run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingReport {
    pub preset: TrainingPreset,
    pub example_count: usize,
    pub iterations: usize,
    pub loss: f64,
    pub quality: TrainingQuality,
}

/// Clears the trainer's busy flag when the worker thread exits, however it exits.
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

type WorkerResult<C> = Result<(C, TrainingOutcome), String>;

/// A training run executing on a worker thread.
///
/// Returned by [`ContrastTrainer::start_training`] before any computation has
/// happened, so the caller can show a loading state. Hand it back to
/// [`ContrastTrainer::finish_training`] to install the result. Dropping the
/// job detaches the worker; the trainer stays busy until that thread exits
/// and its result is discarded.
pub struct TrainingJob<C: BinaryClassifier = FeedforwardClassifier> {
    preset: TrainingPreset,
    example_count: usize,
    progress: mpsc::Receiver<IterationStats>,
    handle: thread::JoinHandle<WorkerResult<C>>,
}

impl<C: BinaryClassifier> TrainingJob<C> {
    pub fn preset(&self) -> TrainingPreset {
        self.preset
    }

    /// Progress samples emitted so far; drains without blocking.
    pub fn poll_progress(&self) -> Vec<IterationStats> {
        self.progress.try_iter().collect()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Owns at most one trained classifier and answers predictions with it.
pub struct ContrastTrainer<C: BinaryClassifier = FeedforwardClassifier> {
    config: NetworkConfig,
    classifier: Option<C>,
    final_loss: Option<f64>,
    quality: Option<TrainingQuality>,
    last_error: Option<TrainerError>,
    busy: Arc<AtomicBool>,
}

impl ContrastTrainer<FeedforwardClassifier> {
    pub fn new(config: NetworkConfig) -> Self {
        ContrastTrainer::with_classifier(config)
    }
}

impl Default for ContrastTrainer<FeedforwardClassifier> {
    fn default() -> Self {
        ContrastTrainer::new(NetworkConfig::default())
    }
}

impl<C: BinaryClassifier> ContrastTrainer<C> {
    /// A trainer backed by a classifier other than the built-in network.
    pub fn with_classifier(config: NetworkConfig) -> Self {
        ContrastTrainer {
            config,
            classifier: None,
            final_loss: None,
            quality: None,
            last_error: None,
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_trained(&self) -> bool {
        self.classifier.is_some()
    }

    pub fn is_training(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Loss of the last fresh run; `None` for imported models.
    pub fn final_loss(&self) -> Option<f64> {
        self.final_loss
    }

    /// Quality of the last fresh run; `None` for imported models.
    pub fn quality(&self) -> Option<TrainingQuality> {
        self.quality
    }

    /// The most recent failure, cleared by the next successful operation.
    pub fn error(&self) -> Option<&TrainerError> {
        self.last_error.as_ref()
    }

    pub fn classifier(&self) -> Option<&C> {
        self.classifier.as_ref()
    }

    /// Spawns a fresh training run and returns without waiting for it.
    pub fn start_training(
        &mut self,
        examples: &[TrainingExample],
        preset: TrainingPreset,
    ) -> Result<TrainingJob<C>, TrainerError> {
        if examples.is_empty() {
            self.last_error = Some(TrainerError::InvalidInput);
            return Err(TrainerError::InvalidInput);
        }
        if self.busy.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).is_err() {
            return Err(TrainerError::TrainingInProgress);
        }
        let busy = BusyGuard(Arc::clone(&self.busy));
        self.last_error = None;

        let (tx, rx) = mpsc::channel();
        let mut train_config = self.config.train_config(preset.iterations());
        train_config.progress_tx = Some(tx);
        let network_config = self.config.clone();
        let data = examples.to_vec();

        tracing::info!(
            examples = data.len(),
            preset = %preset,
            iterations = train_config.iterations,
            "starting training run"
        );

        let handle = thread::Builder::new()
            .name("contrast-training".to_string())
            .spawn(move || -> WorkerResult<C> {
                let _busy = busy;
                let mut rng = match network_config.seed {
                    Some(seed) => StdRng::seed_from_u64(seed),
                    None => StdRng::from_entropy(),
                };
                let mut classifier = C::initialise(&network_config, &mut rng);
                let outcome = classifier.fit(&data, &train_config, &mut rng);
                if !outcome.error.is_finite() {
                    return Err(format!("training diverged (loss = {})", outcome.error));
                }
                Ok((classifier, outcome))
            })
            .map_err(|e| {
                let err = TrainerError::TrainingFailed(format!("could not start training thread: {e}"));
                self.last_error = Some(err.clone());
                err
            })?;

        Ok(TrainingJob {
            preset,
            example_count: examples.len(),
            progress: rx,
            handle,
        })
    }

    /// Waits for `job` and installs its network, replacing any previous one.
    ///
    /// On failure the trainer is left untrained; the previous network is not
    /// restored.
    pub fn finish_training(&mut self, job: TrainingJob<C>) -> Result<TrainingReport, TrainerError> {
        let TrainingJob { preset, example_count, handle, .. } = job;
        let result = handle.join().unwrap_or_else(|payload| Err(panic_message(payload)));

        match result {
            Ok((classifier, outcome)) => {
                let quality = TrainingQuality::assess(outcome.error, example_count);
                self.classifier = Some(classifier);
                self.final_loss = Some(outcome.error);
                self.quality = Some(quality);
                self.last_error = None;
                tracing::info!(
                    iterations = outcome.iterations,
                    loss = outcome.error,
                    quality = quality.label(),
                    "training finished"
                );
                Ok(TrainingReport {
                    preset,
                    example_count,
                    iterations: outcome.iterations,
                    loss: outcome.error,
                    quality,
                })
            }
            Err(message) => {
                tracing::warn!("training failed: {message}");
                let err = TrainerError::TrainingFailed(message);
                self.classifier = None;
                self.final_loss = None;
                self.quality = None;
                self.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Trains to completion on a worker thread and installs the result.
    pub fn train(
        &mut self,
        examples: &[TrainingExample],
        preset: TrainingPreset,
    ) -> Result<TrainingReport, TrainerError> {
        let job = self.start_training(examples, preset)?;
        self.finish_training(job)
    }

    /// `None` until a network has been trained or imported.
    pub fn predict(&self, input: NormalizedRgb) -> Option<PredictionResult> {
        let classifier = self.classifier.as_ref()?;
        Some(PredictionResult::from_scores(classifier.scores(input)))
    }

    pub fn predict_rgb(&self, rgb: Rgb) -> Option<PredictionResult> {
        self.predict(rgb.normalize())
    }

    /// `None` for malformed hex as well as for an untrained trainer.
    pub fn predict_hex(&self, hex: &str) -> Option<PredictionResult> {
        self.predict(hex_to_normalized_rgb(hex)?)
    }

    /// Serialized network, or `None` when untrained.
    pub fn export_model(&self) -> Option<String> {
        let classifier = self.classifier.as_ref()?;
        match classifier.to_json() {
            Ok(json) => Some(json),
            Err(e) => {
                tracing::warn!("failed to export model: {e}");
                None
            }
        }
    }

    /// Replaces the held network with one rebuilt from `json`.
    ///
    /// The swap only happens on success; a bad snapshot leaves the current
    /// network in place. Loss and quality are cleared because they are not
    /// part of the snapshot.
    pub fn import_model(&mut self, json: &str) -> Result<(), TrainerError> {
        match C::from_json(json) {
            Ok(classifier) => {
                self.classifier = Some(classifier);
                self.final_loss = None;
                self.quality = None;
                self.last_error = None;
                tracing::info!("imported model");
                Ok(())
            }
            Err(message) => {
                tracing::warn!("failed to import model: {message}");
                let err = TrainerError::ImportFailed(message);
                self.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Imports the network stored in a saved model.
    pub fn load_saved(&mut self, model: &SavedModel) -> Result<(), TrainerError> {
        self.import_model(&model.model_json)
    }

    /// Drops the network and everything derived from it.
    pub fn reset(&mut self) {
        self.classifier = None;
        self.final_loss = None;
        self.quality = None;
        self.last_error = None;
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "training thread panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::example::Label;
    use crate::model::prediction::Scores;
    use crate::train::TrainConfig;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    fn seeded() -> ContrastTrainer {
        ContrastTrainer::new(NetworkConfig { seed: Some(1234), ..NetworkConfig::default() })
    }

    fn anchors() -> Vec<TrainingExample> {
        vec![
            TrainingExample::new(NormalizedRgb::new(0.0, 0.0, 0.0), Label::Dark),
            TrainingExample::new(NormalizedRgb::new(1.0, 1.0, 1.0), Label::Light),
            TrainingExample::new(NormalizedRgb::new(0.1, 0.1, 0.1), Label::Dark),
            TrainingExample::new(NormalizedRgb::new(0.9, 0.9, 0.9), Label::Light),
        ]
    }

    /// Blows up inside `fit`.
    struct Exploding;

    impl BinaryClassifier for Exploding {
        fn initialise(_: &NetworkConfig, _: &mut StdRng) -> Self {
            Exploding
        }
        fn fit(&mut self, _: &[TrainingExample], _: &TrainConfig, _: &mut StdRng) -> TrainingOutcome {
            panic!("matrix shapes disagree")
        }
        fn scores(&self, _: NormalizedRgb) -> Scores {
            Scores { dark: 0.0, light: 0.0 }
        }
        fn to_json(&self) -> Result<String, String> {
            Ok("\"exploding\"".to_string())
        }
        fn from_json(json: &str) -> Result<Self, String> {
            if json == "\"exploding\"" { Ok(Exploding) } else { Err("not exploding".to_string()) }
        }
    }

    static SLOW_RUNNING: AtomicUsize = AtomicUsize::new(0);
    static SLOW_PEAK: AtomicUsize = AtomicUsize::new(0);

    /// Takes a while to fit and records how many fits overlap.
    struct Slow;

    impl BinaryClassifier for Slow {
        fn initialise(_: &NetworkConfig, _: &mut StdRng) -> Self {
            Slow
        }
        fn fit(&mut self, _: &[TrainingExample], _: &TrainConfig, _: &mut StdRng) -> TrainingOutcome {
            let running = SLOW_RUNNING.fetch_add(1, Ordering::SeqCst) + 1;
            SLOW_PEAK.fetch_max(running, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(200));
            SLOW_RUNNING.fetch_sub(1, Ordering::SeqCst);
            TrainingOutcome { iterations: 1, error: 0.001 }
        }
        fn scores(&self, _: NormalizedRgb) -> Scores {
            Scores { dark: 0.5, light: 0.5 }
        }
        fn to_json(&self) -> Result<String, String> {
            Ok("\"slow\"".to_string())
        }
        fn from_json(_: &str) -> Result<Self, String> {
            Ok(Slow)
        }
    }

    /// Finishes with a NaN loss.
    struct Diverging;

    impl BinaryClassifier for Diverging {
        fn initialise(_: &NetworkConfig, _: &mut StdRng) -> Self {
            Diverging
        }
        fn fit(&mut self, _: &[TrainingExample], _: &TrainConfig, _: &mut StdRng) -> TrainingOutcome {
            TrainingOutcome { iterations: 3, error: f64::NAN }
        }
        fn scores(&self, _: NormalizedRgb) -> Scores {
            Scores { dark: 0.5, light: 0.5 }
        }
        fn to_json(&self) -> Result<String, String> {
            Ok("\"diverging\"".to_string())
        }
        fn from_json(_: &str) -> Result<Self, String> {
            Ok(Diverging)
        }
    }

    #[test]
    fn untrained_trainer_has_no_opinion() {
        let trainer: ContrastTrainer = ContrastTrainer::default();
        assert!(!trainer.is_trained());
        assert!(trainer.predict(NormalizedRgb::new(0.5, 0.5, 0.5)).is_none());
        assert!(trainer.export_model().is_none());
    }

    #[test]
    fn empty_examples_are_rejected() {
        let mut trainer = seeded();
        assert_eq!(trainer.train(&[], TrainingPreset::Quick), Err(TrainerError::InvalidInput));
        assert_eq!(trainer.error(), Some(&TrainerError::InvalidInput));
        assert!(!trainer.is_training());
    }

    #[test]
    fn trains_and_separates_black_from_white() {
        let mut trainer = seeded();
        let report = trainer.train(&anchors(), TrainingPreset::Thorough).unwrap();
        assert!(trainer.is_trained());
        assert!(!trainer.is_training());
        assert!(report.iterations <= 5000);
        assert_eq!(trainer.final_loss(), Some(report.loss));
        assert_eq!(trainer.quality(), Some(TrainingQuality::assess(report.loss, 4)));
        // Four examples can never rate above Poor.
        assert_eq!(report.quality, TrainingQuality::Poor);

        assert_eq!(trainer.predict_hex("#000000").unwrap().prediction, Label::Dark);
        assert_eq!(trainer.predict_rgb(Rgb::WHITE).unwrap().prediction, Label::Light);
        assert!(trainer.predict_hex("#nothex").is_none());
    }

    #[test]
    fn overlapping_runs_are_rejected() {
        let mut trainer = seeded();
        let job = trainer.start_training(&anchors(), TrainingPreset::Quick).unwrap();
        assert!(trainer.is_training());
        assert_eq!(
            trainer.start_training(&anchors(), TrainingPreset::Quick).err(),
            Some(TrainerError::TrainingInProgress)
        );
        trainer.finish_training(job).unwrap();
        assert!(!trainer.is_training());
        assert!(trainer.start_training(&anchors(), TrainingPreset::Quick).is_ok());
    }

    #[test]
    fn abandoned_jobs_keep_the_trainer_busy_until_the_worker_exits() {
        let mut trainer: ContrastTrainer<Slow> = ContrastTrainer::with_classifier(NetworkConfig::default());
        let job = trainer.start_training(&anchors(), TrainingPreset::Quick).unwrap();
        drop(job);
        assert!(trainer.is_training());
        assert_eq!(
            trainer.start_training(&anchors(), TrainingPreset::Quick).err(),
            Some(TrainerError::TrainingInProgress)
        );

        while trainer.is_training() {
            thread::sleep(Duration::from_millis(10));
        }
        let report = trainer.train(&anchors(), TrainingPreset::Quick).unwrap();
        assert_eq!(report.iterations, 1);
        assert_eq!(SLOW_PEAK.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn progress_reaches_the_caller() {
        let mut trainer = seeded();
        let job = trainer.start_training(&anchors(), TrainingPreset::Quick).unwrap();
        while !job.is_finished() {
            thread::yield_now();
        }
        let samples = job.poll_progress();
        assert!(!samples.is_empty());
        assert!(samples.iter().all(|s| s.total_iterations == 100));
        trainer.finish_training(job).unwrap();
    }

    #[test]
    fn panicking_training_reports_failure_and_forgets_the_model() {
        let mut trainer: ContrastTrainer<Exploding> = ContrastTrainer::with_classifier(NetworkConfig::default());
        trainer.import_model("\"exploding\"").unwrap();
        assert!(trainer.is_trained());

        let err = trainer.train(&anchors(), TrainingPreset::Quick).unwrap_err();
        assert_eq!(err, TrainerError::TrainingFailed("matrix shapes disagree".to_string()));
        assert!(!trainer.is_trained());
        assert_eq!(trainer.error(), Some(&err));
        assert!(!trainer.is_training());
    }

    #[test]
    fn non_finite_loss_is_a_failure() {
        let mut trainer: ContrastTrainer<Diverging> = ContrastTrainer::with_classifier(NetworkConfig::default());
        let err = trainer.train(&anchors(), TrainingPreset::Quick).unwrap_err();
        assert!(matches!(err, TrainerError::TrainingFailed(ref m) if m.contains("diverged")));
        assert!(trainer.quality().is_none());
    }

    #[test]
    fn failed_import_keeps_the_current_network() {
        let mut trainer = seeded();
        trainer.train(&anchors(), TrainingPreset::Quick).unwrap();
        let before = trainer.export_model().unwrap();

        let err = trainer.import_model("{\"format\":\"something else\"}").unwrap_err();
        assert!(matches!(err, TrainerError::ImportFailed(_)));
        assert!(trainer.is_trained());
        assert_eq!(trainer.export_model().unwrap(), before);
        assert!(trainer.quality().is_some());
    }

    #[test]
    fn import_restores_predictions_but_not_quality() {
        let mut trained = seeded();
        trained.train(&anchors(), TrainingPreset::Balanced).unwrap();
        let json = trained.export_model().unwrap();

        let mut loaded: ContrastTrainer = ContrastTrainer::default();
        loaded.import_model(&json).unwrap();
        assert!(loaded.is_trained());
        assert!(loaded.quality().is_none());
        assert!(loaded.final_loss().is_none());

        let probe = NormalizedRgb::new(0.3, 0.7, 0.2);
        assert_eq!(trained.predict(probe), loaded.predict(probe));
    }

    #[test]
    fn reset_returns_to_untrained() {
        let mut trainer = seeded();
        trainer.train(&anchors(), TrainingPreset::Quick).unwrap();
        trainer.reset();
        assert!(!trainer.is_trained());
        assert!(trainer.final_loss().is_none());
        assert!(trainer.quality().is_none());
        assert!(trainer.predict(NormalizedRgb::new(0.0, 0.0, 0.0)).is_none());
    }
}
