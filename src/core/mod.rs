pub mod detector;
pub mod enroll;
pub mod recognize;
pub mod recognizer;
pub mod train;

pub use detector::FaceDetector;
pub use recognize::Overlay;
pub use recognizer::{FaceRecognizer, Prediction};
pub use train::TrainingSummary;
