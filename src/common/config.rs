use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::common::error::{FaceRegError, Result};
use crate::common::paths;

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub detector: DetectorConfig,
    #[serde(default)]
    pub recognizer: RecognizerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub enrollment: EnrollmentConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CameraConfig {
    #[serde(default)]
    pub device_index: i32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self { device_index: 0 }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DetectorConfig {
    #[serde(default = "default_cascade_path")]
    pub cascade_path: PathBuf,
    #[serde(default = "default_scale_factor")]
    pub scale_factor: f64,
    #[serde(default = "default_min_neighbors")]
    pub min_neighbors: i32,
    /// Minimum face side length in pixels; 0 disables the lower bound.
    #[serde(default)]
    pub min_face_size: i32,
}

fn default_cascade_path() -> PathBuf {
    PathBuf::from("haarcascade_frontalface_default.xml")
}
fn default_scale_factor() -> f64 {
    1.3
}
fn default_min_neighbors() -> i32 {
    5
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            cascade_path: default_cascade_path(),
            scale_factor: default_scale_factor(),
            min_neighbors: default_min_neighbors(),
            min_face_size: 0,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RecognizerConfig {
    #[serde(default = "default_lbph_radius")]
    pub radius: i32,
    #[serde(default = "default_lbph_neighbors")]
    pub neighbors: i32,
    #[serde(default = "default_lbph_grid")]
    pub grid_x: i32,
    #[serde(default = "default_lbph_grid")]
    pub grid_y: i32,
    /// LBPH confidence is a distance: predictions above this are treated as
    /// unknown. Raise it towards f64::MAX to trust every prediction.
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f64,
}

fn default_lbph_radius() -> i32 {
    1
}
fn default_lbph_neighbors() -> i32 {
    8
}
fn default_lbph_grid() -> i32 {
    8
}
fn default_confidence_threshold() -> f64 {
    80.0
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            radius: default_lbph_radius(),
            neighbors: default_lbph_neighbors(),
            grid_x: default_lbph_grid(),
            grid_y: default_lbph_grid(),
            confidence_threshold: default_confidence_threshold(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
    #[serde(default = "default_samples_dir")]
    pub samples_dir: PathBuf,
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("facereg.db")
}
fn default_samples_dir() -> PathBuf {
    PathBuf::from("dataset")
}
fn default_model_path() -> PathBuf {
    PathBuf::from("recognizer/trainingdata.yml")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            samples_dir: default_samples_dir(),
            model_path: default_model_path(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EnrollmentConfig {
    /// Soft quota: checked once per frame, so the final frame may push the
    /// total a few samples past it.
    #[serde(default = "default_max_samples")]
    pub max_samples: u32,
    #[serde(default = "default_capture_delay")]
    pub capture_delay_ms: u64,
}

fn default_max_samples() -> u32 {
    20
}
fn default_capture_delay() -> u64 {
    100
}

impl Default for EnrollmentConfig {
    fn default() -> Self {
        Self {
            max_samples: default_max_samples(),
            capture_delay_ms: default_capture_delay(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DisplayConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Config {
    /// Resolve the effective config: an explicit path must exist, otherwise
    /// `./facereg.toml`, then the user config dir, then built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from_path(path);
        }

        let local = PathBuf::from(paths::DEFAULT_CONFIG_FILE);
        if local.exists() {
            return Self::load_from_path(&local);
        }

        if let Some(user) = paths::user_config_file() {
            if user.exists() {
                return Self::load_from_path(&user);
            }
        }

        let config = Config::default();
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(FaceRegError::Other(anyhow::anyhow!(
                "Config file not found: {}",
                path.display()
            )));
        }

        tracing::debug!("loading config from {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)
            .map_err(|e| FaceRegError::Other(anyhow::anyhow!("Config parse error: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.detector.scale_factor <= 1.0 {
            return Err(FaceRegError::Other(anyhow::anyhow!(
                "Detector scale factor must be greater than 1.0, got {}",
                self.detector.scale_factor
            )));
        }
        if self.detector.min_neighbors < 1 {
            return Err(FaceRegError::Other(anyhow::anyhow!(
                "Detector min_neighbors must be at least 1, got {}",
                self.detector.min_neighbors
            )));
        }
        if self.detector.min_face_size < 0 {
            return Err(FaceRegError::Other(anyhow::anyhow!(
                "Detector min_face_size must not be negative, got {}",
                self.detector.min_face_size
            )));
        }

        if self.recognizer.radius < 1 {
            return Err(FaceRegError::Other(anyhow::anyhow!(
                "Recognizer LBPH radius must be at least 1, got {}",
                self.recognizer.radius
            )));
        }
        if self.recognizer.neighbors < 1 {
            return Err(FaceRegError::Other(anyhow::anyhow!(
                "Recognizer LBPH neighbors must be at least 1, got {}",
                self.recognizer.neighbors
            )));
        }
        if self.recognizer.grid_x < 1 || self.recognizer.grid_y < 1 {
            return Err(FaceRegError::Other(anyhow::anyhow!(
                "Recognizer LBPH grid must be at least 1x1, got {}x{}",
                self.recognizer.grid_x,
                self.recognizer.grid_y
            )));
        }
        if self.recognizer.confidence_threshold <= 0.0 {
            return Err(FaceRegError::Other(anyhow::anyhow!(
                "Confidence threshold must be positive, got {}",
                self.recognizer.confidence_threshold
            )));
        }

        if self.enrollment.max_samples == 0 {
            return Err(FaceRegError::Other(anyhow::anyhow!(
                "Enrollment max_samples must be at least 1"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.enrollment.max_samples, 20);
        assert_eq!(config.camera.device_index, 0);
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config: Config = toml::from_str(
            r#"
            [enrollment]
            max_samples = 5

            [recognizer]
            confidence_threshold = 65.0
            "#,
        )
        .unwrap();

        assert_eq!(config.enrollment.max_samples, 5);
        assert_eq!(config.enrollment.capture_delay_ms, 100);
        assert_eq!(config.recognizer.confidence_threshold, 65.0);
        assert_eq!(config.detector.min_neighbors, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_bad_scale_factor() {
        let mut config = Config::default();
        config.detector.scale_factor = 1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_sample_quota() {
        let mut config = Config::default();
        config.enrollment.max_samples = 0;
        assert!(config.validate().is_err());
    }
}
