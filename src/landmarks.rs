//! Face mesh detection results and their conversion to pixel landmarks.

use image::RgbImage;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::mesh::{is_complete_mesh, FACE_MESH_POINTS, REFINED_FACE_MESH_POINTS};
use crate::types::{LandmarkSet, NormalizedPoint};

/// A face mesh model mapping an RGB image to zero or more faces.
///
/// Implementations are loaded once and reused for every image; `detect` must
/// not keep per-image state.
pub trait LandmarkDetector: Send + Sync {
    fn detect(&self, image: &RgbImage) -> Result<MeshDetection>;
}

/// Raw output of a face mesh model for one image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshDetection {
    #[serde(default)]
    pub faces: Vec<MeshFace>,
}

/// One detected face: landmarks in the model's numbering, as image fractions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshFace {
    pub landmarks: Vec<NormalizedPoint>,

    /// Detection confidence, when the model reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

impl MeshDetection {
    pub fn no_faces() -> Self {
        Self::default()
    }

    pub fn single(landmarks: Vec<NormalizedPoint>) -> Self {
        Self {
            faces: vec![MeshFace {
                landmarks,
                score: None,
            }],
        }
    }

    /// Apply detector settings to a raw result: drop low-confidence faces,
    /// keep at most `max_num_faces`, and strip iris points when refinement
    /// is off.
    pub fn filtered(mut self, options: &DetectorOptions) -> Self {
        self.faces
            .retain(|face| face.score.map_or(true, |s| s >= options.min_detection_confidence));
        self.faces.truncate(options.max_num_faces);
        if !options.refine_landmarks {
            for face in &mut self.faces {
                if face.landmarks.len() == REFINED_FACE_MESH_POINTS {
                    face.landmarks.truncate(FACE_MESH_POINTS);
                }
            }
        }
        self
    }
}

/// Face mesh model settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorOptions {
    /// Treat every input as an independent still image, never a video stream.
    pub static_image_mode: bool,
    pub max_num_faces: usize,
    /// Ask for iris-refined landmarks around the eyes and lips.
    pub refine_landmarks: bool,
    pub min_detection_confidence: f32,
}

impl Default for DetectorOptions {
    fn default() -> Self {
        Self {
            static_image_mode: true,
            max_num_faces: 1,
            refine_landmarks: true,
            min_detection_confidence: 0.5,
        }
    }
}

/// Convert a detection on `image` into pixel-space landmarks.
///
/// Only the first face is used. Returns `None` when no face was detected,
/// when the first face is not a complete mesh, or when any of its fractions
/// is non-finite or far outside the frame.
pub fn normalize(image: &RgbImage, detection: &MeshDetection) -> Option<LandmarkSet> {
    let (width, height) = image.dimensions();
    let face = detection.faces.first()?;

    if detection.faces.len() > 1 {
        debug!("{} faces detected, using the first", detection.faces.len());
    }

    if !is_complete_mesh(face.landmarks.len()) {
        warn!(
            "discarding partial face mesh with {} landmarks",
            face.landmarks.len()
        );
        return None;
    }

    if let Some(idx) = face.landmarks.iter().position(|p| !p.is_plausible()) {
        warn!(
            "discarding face mesh with invalid landmark {}: {:?}",
            idx, face.landmarks[idx]
        );
        return None;
    }

    let points = face
        .landmarks
        .iter()
        .map(|p| p.to_pixel(width, height))
        .collect();
    Some(LandmarkSet::from_points(points))
}
