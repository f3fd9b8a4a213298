use crate::camera::Camera;
use crate::cli::preview::{self, Preview};
use crate::common::{Config, FaceRegError, Result};
use crate::core::detector::{self, FaceDetector};
use crate::storage::{samples, PersonRecord, PersonStore};
use opencv::core::Vector;
use opencv::imgcodecs;
use std::time::Duration;

/// Enrollment stage: persist the person record, then capture face crops from
/// the camera until the sample quota is reached.
///
/// Returns the number of samples written: at least `max_samples`, possibly
/// a few more, unless the operator cancels early from the preview window.
pub fn run(config: &Config, person: &PersonRecord, headless: bool) -> Result<u32> {
    // Identity goes in first: capturing samples for an unpersisted person
    // would leave orphaned labels.
    let store = PersonStore::open(&config.storage.database_path)?;
    store.upsert(person)?;
    tracing::info!(id = person.id, name = %person.name, "person record upserted");

    std::fs::create_dir_all(&config.storage.samples_dir)?;

    let mut camera = Camera::new(config)?;
    let mut detector = FaceDetector::new(config)?;
    let preview = if headless || !config.display.enabled {
        None
    } else {
        Some(Preview::open("Enrollment")?)
    };

    println!(
        "Capturing face samples for {} (id {}), quota {}...",
        person.name, person.id, config.enrollment.max_samples
    );

    let mut sample_count: u32 = 0;

    loop {
        let mut frame = camera.read_frame()?;
        let gray = detector::to_grayscale(&frame)?;
        let faces = detector.detect(&gray)?;

        for face in faces {
            sample_count += 1;
            let crop = detector::crop_face(&gray, face)?;
            let path = samples::sample_path(&config.storage.samples_dir, person.id, sample_count);

            let params: Vector<i32> = Vector::new();
            let written = imgcodecs::imwrite(&path.to_string_lossy(), &crop, &params)?;
            if !written {
                return Err(FaceRegError::Storage(format!(
                    "Failed to write sample image: {}",
                    path.display()
                )));
            }
            tracing::debug!(sample = sample_count, path = %path.display(), "sample written");

            if preview.is_some() {
                preview::draw_face_box(&mut frame, face)?;
            }
            std::thread::sleep(Duration::from_millis(config.enrollment.capture_delay_ms));
        }

        if let Some(window) = &preview {
            window.show(&frame)?;
            if window.poll_quit(1)? {
                println!("Enrollment cancelled after {} samples", sample_count);
                return Ok(sample_count);
            }
        }

        // Soft stop: checked once per frame, so a multi-face final frame
        // can overshoot the quota.
        if sample_count > config.enrollment.max_samples {
            break;
        }
    }

    println!(
        "Captured {} samples into {}",
        sample_count,
        config.storage.samples_dir.display()
    );
    Ok(sample_count)
}
