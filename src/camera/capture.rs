use crate::common::{Config, FaceRegError, Result};
use opencv::core::Mat;
use opencv::prelude::*;
use opencv::videoio::{self, VideoCapture};

/// Scoped handle on the capture device: opened at stage entry, released on
/// Drop so every exit path (including errors) closes the camera.
pub struct Camera {
    device: VideoCapture,
    index: i32,
}

impl Camera {
    pub fn new(config: &Config) -> Result<Self> {
        let index = config.camera.device_index;
        tracing::debug!("opening camera device {}", index);

        let device = VideoCapture::new(index, videoio::CAP_ANY)
            .map_err(|e| FaceRegError::Camera(format!("Failed to open camera {}: {}", index, e)))?;

        let opened = device
            .is_opened()
            .map_err(|e| FaceRegError::Camera(format!("Failed to query camera {}: {}", index, e)))?;
        if !opened {
            return Err(FaceRegError::Camera(format!(
                "Camera {} is not available",
                index
            )));
        }

        Ok(Self { device, index })
    }

    /// Blocking pull of the next frame. An empty frame or a failed grab is a
    /// read failure, not something to retry.
    pub fn read_frame(&mut self) -> Result<Mat> {
        let mut frame = Mat::default();
        let grabbed = self.device.read(&mut frame).map_err(|e| {
            FaceRegError::Camera(format!(
                "Failed to read frame from camera {}: {}",
                self.index, e
            ))
        })?;

        if !grabbed || frame.empty() {
            return Err(FaceRegError::Camera(format!(
                "Camera {} returned an empty frame",
                self.index
            )));
        }

        Ok(frame)
    }
}

/// Camera smoke test: grab one frame and write it out as a JPEG.
pub fn capture_test_frame(config: &Config, path: &std::path::Path) -> Result<()> {
    let mut camera = Camera::new(config)?;
    let frame = camera.read_frame()?;

    let params: opencv::core::Vector<i32> = opencv::core::Vector::new();
    let written = opencv::imgcodecs::imwrite(&path.to_string_lossy(), &frame, &params)?;
    if !written {
        return Err(FaceRegError::Camera(format!(
            "Failed to write test frame to {}",
            path.display()
        )));
    }

    Ok(())
}

impl Drop for Camera {
    fn drop(&mut self) {
        if let Err(e) = self.device.release() {
            tracing::warn!("failed to release camera {}: {}", self.index, e);
        }
    }
}
