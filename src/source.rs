//! File-backed model collaborators.
//!
//! These stand in for live models when landmarks and attributes were
//! produced ahead of time, e.g. by a separate face mesh run. Landmark dumps
//! may be bzip2-compressed (`.json.bz2`).
//!
//! # Example
//!
//! ```ignore
//! use golden_face::{DetectorOptions, FileLandmarkDetector};
//!
//! let detector = FileLandmarkDetector::open("portrait.landmarks.json.bz2", &DetectorOptions::default())?;
//! ```

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use bzip2::read::BzDecoder;
use image::RgbImage;
use log::info;

use crate::attributes::{AttributeModel, AttributeRequest, RawAttributes};
use crate::error::{Error, Result};
use crate::landmarks::{DetectorOptions, LandmarkDetector, MeshDetection};

/// Open a dump file, transparently decompressing `.bz2`.
fn open_dump(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let is_bz2 = path.extension().is_some_and(|ext| ext == "bz2");
    if is_bz2 {
        Ok(Box::new(BzDecoder::new(reader)))
    } else {
        Ok(Box::new(reader))
    }
}

/// Replays a recorded face mesh detection for every image.
#[derive(Debug, Clone)]
pub struct FileLandmarkDetector {
    detection: MeshDetection,
}

impl FileLandmarkDetector {
    /// Load a JSON dump of the form `{"faces": [{"landmarks": [{"x":..,"y":..}, ..]}]}`.
    pub fn open<P: AsRef<Path>>(path: P, options: &DetectorOptions) -> Result<Self> {
        let path = path.as_ref();
        let detection: MeshDetection = serde_json::from_reader(open_dump(path)?)?;
        info!(
            "loaded landmark dump {:?} ({} faces)",
            path,
            detection.faces.len()
        );
        Ok(Self::from_detection(detection, options))
    }

    pub fn from_detection(detection: MeshDetection, options: &DetectorOptions) -> Self {
        Self {
            detection: detection.filtered(options),
        }
    }
}

impl LandmarkDetector for FileLandmarkDetector {
    fn detect(&self, _image: &RgbImage) -> Result<MeshDetection> {
        Ok(self.detection.clone())
    }
}

/// Replays a recorded attribute estimator result.
///
/// Only JSON syntax is checked when loading; the shape is checked on every
/// call so a malformed dump behaves like a failing model.
#[derive(Debug, Clone)]
pub struct FileAttributeModel {
    raw: serde_json::Value,
}

impl FileAttributeModel {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = serde_json::from_reader(open_dump(path.as_ref())?)?;
        Ok(Self { raw })
    }

    pub fn from_value(raw: serde_json::Value) -> Self {
        Self { raw }
    }
}

impl AttributeModel for FileAttributeModel {
    fn analyze(&self, _image: &RgbImage, _request: &AttributeRequest) -> Result<RawAttributes> {
        serde_json::from_value(self.raw.clone()).map_err(|e| Error::UnexpectedShape(e.to_string()))
    }
}

/// Used when no attribute estimator is configured; always fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableAttributeModel;

impl AttributeModel for UnavailableAttributeModel {
    fn analyze(&self, _image: &RgbImage, _request: &AttributeRequest) -> Result<RawAttributes> {
        Err(Error::AttributeModel("no attribute model configured".into()))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use bzip2::write::BzEncoder;
    use bzip2::Compression;
    use serde_json::json;

    use super::*;
    use crate::mesh::FACE_MESH_POINTS;
    use crate::types::NormalizedPoint;

    fn dump_json() -> String {
        let detection = MeshDetection::single(vec![NormalizedPoint::new(0.5, 0.5); FACE_MESH_POINTS]);
        serde_json::to_string(&detection).unwrap()
    }

    #[test]
    fn loads_plain_dump() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("face.json");
        std::fs::write(&path, dump_json()).unwrap();

        let detector = FileLandmarkDetector::open(&path, &DetectorOptions::default()).unwrap();
        let detection = detector.detect(&RgbImage::new(8, 8)).unwrap();
        assert_eq!(detection.faces.len(), 1);
        assert_eq!(detection.faces[0].landmarks.len(), FACE_MESH_POINTS);
    }

    #[test]
    fn loads_bz2_dump() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("face.json.bz2");
        let mut encoder = BzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(dump_json().as_bytes()).unwrap();
        std::fs::write(&path, encoder.finish().unwrap()).unwrap();

        let detector = FileLandmarkDetector::open(&path, &DetectorOptions::default()).unwrap();
        let detection = detector.detect(&RgbImage::new(8, 8)).unwrap();
        assert_eq!(detection.faces[0].landmarks[0].x, 0.5);
    }

    #[test]
    fn missing_dump_is_io_error() {
        let err = FileLandmarkDetector::open("does-not-exist.json", &DetectorOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn attribute_shape_checked_per_call() {
        let model = FileAttributeModel::from_value(json!({"unexpected": true}));
        let image = RgbImage::new(1, 1);
        let raw = model.analyze(&image, &AttributeRequest::default()).unwrap();
        // Parses as a record, but has neither age nor gender.
        assert!(raw.into_result().is_err());

        let model = FileAttributeModel::from_value(json!("not a record"));
        assert!(matches!(
            model.analyze(&image, &AttributeRequest::default()),
            Err(Error::UnexpectedShape(_))
        ));
    }

    #[test]
    fn unavailable_model_always_fails() {
        let result = UnavailableAttributeModel.analyze(&RgbImage::new(1, 1), &AttributeRequest::default());
        assert!(matches!(result, Err(Error::AttributeModel(_))));
    }
}
