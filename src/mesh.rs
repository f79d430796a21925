//! Face mesh landmark indices used for measurement and visualization.
//!
//! The ratio calculation and the overlay both read from this table so the
//! drawn segments are always the segments that were measured.

use crate::types::LandmarkSet;

/// Point count of the base face mesh topology.
pub const FACE_MESH_POINTS: usize = 468;

/// Point count when iris refinement is enabled (10 iris points appended).
pub const REFINED_FACE_MESH_POINTS: usize = 478;

/// Whether `count` is a complete face mesh. Anything else is a partial set.
pub fn is_complete_mesh(count: usize) -> bool {
    count == FACE_MESH_POINTS || count == REFINED_FACE_MESH_POINTS
}

/// A named pair of landmark indices whose distance is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LandmarkPair {
    pub name: &'static str,
    pub from: usize,
    pub to: usize,
}

impl LandmarkPair {
    pub const fn new(name: &'static str, from: usize, to: usize) -> Self {
        Self { name, from, to }
    }

    /// Pixel distance between the two landmarks, or `None` if either index
    /// is outside the set.
    pub fn distance(&self, landmarks: &LandmarkSet) -> Option<f64> {
        let a = landmarks.get(self.from)?;
        let b = landmarks.get(self.to)?;
        Some(a.distance(&b))
    }
}

/// Inner eye corners (inter-canthal distance).
pub const INNER_EYE_DISTANCE: LandmarkPair = LandmarkPair::new("inner_eye_distance", 133, 362);

/// Nose root between the eyes to nose tip.
pub const NOSE_LENGTH: LandmarkPair = LandmarkPair::new("nose_length", 168, 1);

/// Left to right mouth corner.
pub const MOUTH_WIDTH: LandmarkPair = LandmarkPair::new("mouth_width", 61, 291);

pub const MEASURED_PAIRS: [LandmarkPair; 3] = [INNER_EYE_DISTANCE, NOSE_LENGTH, MOUTH_WIDTH];

/// Landmarks marked on the overlay: outer and inner eye corners, nose tip,
/// mouth corners and nose root.
pub const KEY_POINTS: [usize; 8] = [33, 133, 362, 263, 1, 61, 291, 168];
