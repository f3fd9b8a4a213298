use crate::common::{Config, FaceRegError, Result};
use opencv::core::{Mat, Rect, Size, Vector};
use opencv::objdetect::CascadeClassifier;
use opencv::prelude::*;
use opencv::imgproc;

/// Face detector backed by an OpenCV cascade classifier loaded from the
/// configured XML file.
pub struct FaceDetector {
    classifier: CascadeClassifier,
    scale_factor: f64,
    min_neighbors: i32,
    min_size: Size,
}

impl FaceDetector {
    pub fn new(config: &Config) -> Result<Self> {
        let cascade_path = &config.detector.cascade_path;
        if !cascade_path.exists() {
            return Err(FaceRegError::Detector(format!(
                "Cascade file not found at: {}",
                cascade_path.display()
            )));
        }

        let path = cascade_path.to_string_lossy();
        let classifier = CascadeClassifier::new(&path)
            .map_err(|e| FaceRegError::Detector(format!("Failed to load cascade {}: {}", path, e)))?;

        Ok(Self {
            classifier,
            scale_factor: config.detector.scale_factor,
            min_neighbors: config.detector.min_neighbors,
            min_size: Size::new(config.detector.min_face_size, config.detector.min_face_size),
        })
    }

    /// Run the cascade over a grayscale frame and return the face rectangles.
    pub fn detect(&mut self, gray: &Mat) -> Result<Vec<Rect>> {
        let mut faces = Vector::<Rect>::new();
        self.classifier.detect_multi_scale(
            gray,
            &mut faces,
            self.scale_factor,
            self.min_neighbors,
            0,
            self.min_size,
            Size::new(0, 0),
        )?;
        Ok(faces.to_vec())
    }
}

/// Single-channel copy of a BGR camera frame, the form both the detector and
/// the recognizer operate on.
pub fn to_grayscale(frame: &Mat) -> Result<Mat> {
    let mut gray = Mat::default();
    imgproc::cvt_color(frame, &mut gray, imgproc::COLOR_BGR2GRAY, 0)?;
    Ok(gray)
}

/// Clone out the face region of a grayscale frame.
pub fn crop_face(gray: &Mat, face: Rect) -> Result<Mat> {
    let roi = Mat::roi(gray, face)?;
    Ok(roi.try_clone()?)
}
