use crate::camera::Camera;
use crate::cli::preview::{self, Preview};
use crate::common::{Config, Result};
use crate::core::detector::{self, FaceDetector};
use crate::core::recognizer::{FaceRecognizer, Prediction};
use crate::storage::{PersonRecord, PersonStore};
use opencv::core::Point;

/// What gets rendered next to a detected face.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    Known { name_line: String, age_line: String },
    Unknown,
}

/// Decide the overlay for one prediction. A prediction whose distance
/// exceeds the threshold is treated as no match, and so is a predicted id
/// with no record in the store; neither ends the loop.
pub fn resolve_overlay(
    prediction: Prediction,
    person: Option<&PersonRecord>,
    confidence_threshold: f64,
) -> Overlay {
    if prediction.confidence > confidence_threshold {
        return Overlay::Unknown;
    }

    match person {
        Some(person) => Overlay::Known {
            name_line: format!("Name:{}", person.name),
            age_line: format!("Age:{}", person.age),
        },
        None => Overlay::Unknown,
    }
}

/// Recognition stage: load the trained model, then detect and identify faces
/// on live frames until the operator quits from the preview window (or the
/// process is terminated, in headless mode).
pub fn run(config: &Config, headless: bool) -> Result<()> {
    let recognizer = FaceRecognizer::load(config)?;
    let store = PersonStore::open(&config.storage.database_path)?;
    let mut camera = Camera::new(config)?;
    let mut detector = FaceDetector::new(config)?;
    let preview = if headless || !config.display.enabled {
        None
    } else {
        Some(Preview::open("Recognition")?)
    };

    if preview.is_some() {
        println!("Recognizing faces (press q or Esc in the window to quit)...");
    } else {
        println!("Recognizing faces headless (terminate the process to stop)...");
    }

    loop {
        let mut frame = camera.read_frame()?;
        let gray = detector::to_grayscale(&frame)?;
        let faces = detector.detect(&gray)?;

        for face in faces {
            let crop = detector::crop_face(&gray, face)?;
            let prediction = recognizer.predict(&crop)?;
            let person = store.get(prediction.label)?;
            let overlay = resolve_overlay(
                prediction,
                person.as_ref(),
                recognizer.confidence_threshold(),
            );

            match &overlay {
                Overlay::Known { name_line, .. } => tracing::info!(
                    label = prediction.label,
                    confidence = prediction.confidence,
                    "{}",
                    name_line
                ),
                Overlay::Unknown => tracing::info!(
                    label = prediction.label,
                    confidence = prediction.confidence,
                    "unknown face"
                ),
            }

            if preview.is_some() {
                preview::draw_face_box(&mut frame, face)?;
                let first_line = Point::new(face.x, face.y + face.height + 20);
                let second_line = Point::new(face.x, face.y + face.height + 45);
                match &overlay {
                    Overlay::Known {
                        name_line,
                        age_line,
                    } => {
                        preview::draw_label(&mut frame, name_line, first_line)?;
                        preview::draw_label(&mut frame, age_line, second_line)?;
                    }
                    Overlay::Unknown => {
                        preview::draw_label(&mut frame, "Unknown", first_line)?;
                    }
                }
            }
        }

        if let Some(window) = &preview {
            window.show(&frame)?;
            if window.poll_quit(1)? {
                break;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> PersonRecord {
        PersonRecord {
            id: 7,
            name: "Alice".into(),
            age: 30,
        }
    }

    #[test]
    fn known_person_within_threshold_gets_name_and_age_lines() {
        let prediction = Prediction {
            label: 7,
            confidence: 42.0,
        };
        let overlay = resolve_overlay(prediction, Some(&alice()), 80.0);

        assert_eq!(
            overlay,
            Overlay::Known {
                name_line: "Name:Alice".into(),
                age_line: "Age:30".into(),
            }
        );
    }

    #[test]
    fn missing_record_is_unknown_not_a_crash() {
        let prediction = Prediction {
            label: 99,
            confidence: 10.0,
        };
        assert_eq!(resolve_overlay(prediction, None, 80.0), Overlay::Unknown);
    }

    #[test]
    fn over_threshold_prediction_is_unknown_even_with_a_record() {
        let prediction = Prediction {
            label: 7,
            confidence: 120.0,
        };
        assert_eq!(
            resolve_overlay(prediction, Some(&alice()), 80.0),
            Overlay::Unknown
        );
    }

    #[test]
    fn boundary_confidence_still_matches() {
        let prediction = Prediction {
            label: 7,
            confidence: 80.0,
        };
        assert!(matches!(
            resolve_overlay(prediction, Some(&alice()), 80.0),
            Overlay::Known { .. }
        ));
    }
}
