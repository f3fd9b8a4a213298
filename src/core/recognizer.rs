use crate::common::{Config, FaceRegError, Result};
use opencv::core::{Mat, Ptr, Vector};
use opencv::face::LBPHFaceRecognizer;
use opencv::prelude::*;
use std::path::Path;

/// One prediction from the trained model. `confidence` is an LBPH distance:
/// lower means closer to the training data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub label: i32,
    pub confidence: f64,
}

/// LBPH face recognizer. Trained once over the full sample batch, persisted
/// as an opaque OpenCV YAML artifact, loaded once at recognition startup.
pub struct FaceRecognizer {
    model: Ptr<LBPHFaceRecognizer>,
    confidence_threshold: f64,
}

impl FaceRecognizer {
    /// Fresh, untrained recognizer with the configured LBPH parameters.
    pub fn new(config: &Config) -> Result<Self> {
        // The model-side threshold stays disabled; match/no-match is decided
        // against `confidence_threshold` so the raw distance stays visible.
        let model = LBPHFaceRecognizer::create(
            config.recognizer.radius,
            config.recognizer.neighbors,
            config.recognizer.grid_x,
            config.recognizer.grid_y,
            f64::MAX,
        )?;

        Ok(Self {
            model,
            confidence_threshold: config.recognizer.confidence_threshold,
        })
    }

    /// Load the trained model from disk. Fatal if the artifact is missing, so
    /// recognition fails up front instead of predicting from an empty model.
    pub fn load(config: &Config) -> Result<Self> {
        let model_path = &config.storage.model_path;
        if !model_path.exists() {
            return Err(FaceRegError::Model(format!(
                "Recognition model not found at: {} (run `facereg train` first)",
                model_path.display()
            )));
        }

        let mut recognizer = Self::new(config)?;
        recognizer
            .model
            .read(&model_path.to_string_lossy())
            .map_err(|e| {
                FaceRegError::Model(format!(
                    "Failed to load model {}: {}",
                    model_path.display(),
                    e
                ))
            })?;

        Ok(recognizer)
    }

    /// Train over the complete in-memory batch in one synchronous call.
    pub fn train(&mut self, images: &Vector<Mat>, labels: &Vector<i32>) -> Result<()> {
        self.model
            .train(images, labels)
            .map_err(|e| FaceRegError::Model(format!("Training failed: {}", e)))?;
        Ok(())
    }

    /// Persist the trained model, overwriting any prior artifact.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        self.model.write(&path.to_string_lossy()).map_err(|e| {
            FaceRegError::Model(format!("Failed to save model {}: {}", path.display(), e))
        })?;
        Ok(())
    }

    /// Predict the closest label for a grayscale face crop.
    pub fn predict(&self, face: &Mat) -> Result<Prediction> {
        let mut label = -1i32;
        let mut confidence = 0.0f64;
        self.model
            .predict(face, &mut label, &mut confidence)
            .map_err(|e| FaceRegError::Model(format!("Prediction failed: {}", e)))?;

        Ok(Prediction { label, confidence })
    }

    pub fn confidence_threshold(&self) -> f64 {
        self.confidence_threshold
    }
}
