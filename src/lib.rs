pub mod camera;
pub mod cli;
pub mod common;
pub mod core;
pub mod storage;

pub use camera::Camera;
pub use cli::Preview;
pub use common::{Config, FaceRegError, Result};
pub use core::{FaceDetector, FaceRecognizer, Overlay, Prediction};
pub use storage::{PersonRecord, PersonStore};
