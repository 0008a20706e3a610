use std::error::Error;
use std::path::Path;

use contrast_nn::{
    demo_training_data, logging, ContrastConfig, ContrastTrainer, FileStore, ModelStore,
    TrainingPreset,
};

fn main() -> Result<(), Box<dyn Error>> {
    if let Err(e) = logging::init() {
        eprintln!("logging disabled: {e}");
    }

    let config = ContrastConfig::load_or_default(Path::new("contrast.toml"))?;
    let data = demo_training_data();

    let mut trainer = ContrastTrainer::new(config.network.clone());
    let job = trainer.start_training(&data, TrainingPreset::Balanced)?;
    while !job.is_finished() {
        for stats in job.poll_progress() {
            println!("Iteration {}/{}: error = {:.6}", stats.iteration, stats.total_iterations, stats.error);
        }
        std::thread::sleep(std::time::Duration::from_millis(20));
    }
    let report = trainer.finish_training(job)?;
    println!(
        "Trained on {} examples in {} iterations: loss = {:.6} ({})",
        report.example_count,
        report.iterations,
        report.loss,
        report.quality.label()
    );

    for hex in ["#000000", "#ffffff", "#3498db", "#f1c40f", "#8e44ad", "#2ecc71"] {
        if let Some(result) = trainer.predict_hex(hex) {
            println!("{hex} -> {} background ({}% confident)", result.prediction.as_str(), result.confidence());
        }
    }

    let Some(model_json) = trainer.export_model() else {
        return Ok(());
    };
    let mut store = ModelStore::new(FileStore::default_location()?, &config.store);
    let saved = store.save(model_json, data, report.preset, None)?;
    println!("Saved {} as {} ({} stored)", saved.name, saved.id, store.get_all().len());

    Ok(())
}
