use crate::common::{FaceRegError, Result};
use opencv::core::{Mat, Vector};
use opencv::imgcodecs;
use opencv::prelude::*;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

pub const SAMPLE_PREFIX: &str = "user";
pub const SAMPLE_EXT: &str = "jpg";

/// `user.<id>.<sequence>.jpg`
pub fn sample_file_name(id: i32, sequence: u32) -> String {
    format!("{}.{}.{}.{}", SAMPLE_PREFIX, id, sequence, SAMPLE_EXT)
}

pub fn sample_path(dir: &Path, id: i32, sequence: u32) -> PathBuf {
    dir.join(sample_file_name(id, sequence))
}

/// The person id lives at dot-token index 1. This parse is the only link
/// between the record store and the training data, so it stays in one place.
pub fn parse_sample_id(file_name: &str) -> Result<i32> {
    file_name
        .split('.')
        .nth(1)
        .and_then(|token| token.parse::<i32>().ok())
        .ok_or_else(|| FaceRegError::MalformedSamples(file_name.to_string()))
}

/// Flat listing of the samples directory with each file's embedded label.
/// Every malformed filename is collected and reported in one error rather
/// than stopping at the first.
pub fn scan_sample_dir(dir: &Path) -> Result<Vec<(PathBuf, i32)>> {
    let mut samples = Vec::new();
    let mut malformed = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let file_name = entry.file_name().to_string_lossy().into_owned();
        match parse_sample_id(&file_name) {
            Ok(id) => samples.push((entry.path(), id)),
            Err(_) => malformed.push(file_name),
        }
    }

    if !malformed.is_empty() {
        malformed.sort();
        return Err(FaceRegError::MalformedSamples(malformed.join(", ")));
    }

    Ok(samples)
}

/// The full in-memory training batch: images and labels as parallel
/// sequences in directory-listing order.
pub struct TrainingSet {
    pub images: Vector<Mat>,
    pub labels: Vector<i32>,
}

impl TrainingSet {
    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn label_set(&self) -> BTreeSet<i32> {
        self.labels.iter().collect()
    }
}

/// Load every sample in the directory as a grayscale image. An undecodable
/// file is a hard error; training silently missing samples would quietly
/// weaken the model.
pub fn load_training_set(dir: &Path) -> Result<TrainingSet> {
    let mut images = Vector::<Mat>::new();
    let mut labels = Vector::<i32>::new();

    for (path, id) in scan_sample_dir(dir)? {
        let image = imgcodecs::imread(&path.to_string_lossy(), imgcodecs::IMREAD_GRAYSCALE)?;
        if image.empty() {
            return Err(FaceRegError::Storage(format!(
                "Failed to decode sample image: {}",
                path.display()
            )));
        }

        images.push(image);
        labels.push(id);
    }

    Ok(TrainingSet { images, labels })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_round_trips_to_id() {
        for (id, sequence) in [(7, 1), (0, 0), (123, 456), (-3, 9)] {
            let name = sample_file_name(id, sequence);
            assert_eq!(parse_sample_id(&name).unwrap(), id);
        }
    }

    #[test]
    fn expected_layout_matches_original_scheme() {
        assert_eq!(sample_file_name(7, 3), "user.7.3.jpg");
        assert_eq!(parse_sample_id("user.7.3.jpg").unwrap(), 7);
    }

    #[test]
    fn rejects_names_without_an_integer_id() {
        for name in ["user.jpg", "noext", "user.x.1.jpg", "user..1.jpg", ""] {
            assert!(parse_sample_id(name).is_err(), "accepted {:?}", name);
        }
    }

    #[test]
    fn scan_collects_labels_from_valid_dir() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["user.1.1.jpg", "user.1.2.jpg", "user.2.1.jpg"] {
            std::fs::write(dir.path().join(name), b"stub").unwrap();
        }

        let samples = scan_sample_dir(dir.path()).unwrap();
        assert_eq!(samples.len(), 3);

        let labels: BTreeSet<i32> = samples.iter().map(|(_, id)| *id).collect();
        assert_eq!(labels, BTreeSet::from([1, 2]));
    }

    #[test]
    fn scan_reports_all_malformed_names() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["user.1.1.jpg", "notes.txt", "user.x.2.jpg"] {
            std::fs::write(dir.path().join(name), b"stub").unwrap();
        }

        let err = scan_sample_dir(dir.path()).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("notes.txt"), "{}", message);
        assert!(message.contains("user.x.2.jpg"), "{}", message);
        assert!(!message.contains("user.1.1.jpg"), "{}", message);
    }

    #[test]
    fn scan_missing_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(scan_sample_dir(&missing).is_err());
    }
}
