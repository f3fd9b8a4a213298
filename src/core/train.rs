use crate::common::{Config, FaceRegError, Result};
use crate::core::recognizer::FaceRecognizer;
use crate::storage::samples;
use std::collections::BTreeSet;

pub struct TrainingSummary {
    pub sample_count: usize,
    pub labels: BTreeSet<i32>,
}

/// Training stage: load every sample in the samples directory, train the
/// recognizer over the full batch in one call, and persist the model,
/// overwriting any prior artifact.
pub fn run(config: &Config) -> Result<TrainingSummary> {
    let samples_dir = &config.storage.samples_dir;
    let training_set = samples::load_training_set(samples_dir)?;

    if training_set.is_empty() {
        return Err(FaceRegError::Storage(format!(
            "No training samples found in {} (run `facereg enroll` first)",
            samples_dir.display()
        )));
    }

    let labels = training_set.label_set();
    println!(
        "Training on {} samples across {} identities...",
        training_set.len(),
        labels.len()
    );

    let mut recognizer = FaceRecognizer::new(config)?;
    recognizer.train(&training_set.images, &training_set.labels)?;
    recognizer.save(&config.storage.model_path)?;

    tracing::info!(
        samples = training_set.len(),
        identities = labels.len(),
        model = %config.storage.model_path.display(),
        "model trained"
    );
    println!("Model written to {}", config.storage.model_path.display());

    Ok(TrainingSummary {
        sample_count: training_set.len(),
        labels,
    })
}
