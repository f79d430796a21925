//! Facial proportion ratios.
//!
//! Each ratio divides one measured landmark distance by another. Distances
//! come from the shared pair table in [`crate::mesh`].

use std::collections::BTreeMap;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::mesh::{LandmarkPair, INNER_EYE_DISTANCE, MOUTH_WIDTH, NOSE_LENGTH};
use crate::types::LandmarkSet;

/// The proportions measured on every face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatioKind {
    /// Inner eye distance / nose length
    EyeDistanceOverNoseLength,
    /// Nose length / mouth width
    NoseLengthOverMouthWidth,
}

impl RatioKind {
    pub const ALL: [RatioKind; 2] = [
        RatioKind::EyeDistanceOverNoseLength,
        RatioKind::NoseLengthOverMouthWidth,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RatioKind::EyeDistanceOverNoseLength => "eye_distance_over_nose_length",
            RatioKind::NoseLengthOverMouthWidth => "nose_length_over_mouth_width",
        }
    }

    /// Short label for reports.
    pub fn label(&self) -> &'static str {
        match self {
            RatioKind::EyeDistanceOverNoseLength => "Eye Dist / Nose Length",
            RatioKind::NoseLengthOverMouthWidth => "Nose Len / Mouth Width",
        }
    }

    pub fn numerator(&self) -> LandmarkPair {
        match self {
            RatioKind::EyeDistanceOverNoseLength => INNER_EYE_DISTANCE,
            RatioKind::NoseLengthOverMouthWidth => NOSE_LENGTH,
        }
    }

    pub fn denominator(&self) -> LandmarkPair {
        match self {
            RatioKind::EyeDistanceOverNoseLength => NOSE_LENGTH,
            RatioKind::NoseLengthOverMouthWidth => MOUTH_WIDTH,
        }
    }
}

impl std::fmt::Display for RatioKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ratio values keyed by kind. Empty when no face was measured.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RatioResult {
    values: BTreeMap<RatioKind, f64>,
}

impl RatioResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Measure every ratio on a landmark set.
    ///
    /// Returns an empty result if the set is empty or if any referenced
    /// landmark index is missing; a zero-length denominator yields 0.
    pub fn from_landmarks(landmarks: &LandmarkSet) -> Self {
        if landmarks.is_empty() {
            return Self::default();
        }

        let mut result = Self::default();
        for kind in RatioKind::ALL {
            let numerator = kind.numerator().distance(landmarks);
            let denominator = kind.denominator().distance(landmarks);
            let (Some(numerator), Some(denominator)) = (numerator, denominator) else {
                warn!(
                    "landmark set has {} points, too few for {}; returning no ratios",
                    landmarks.len(),
                    kind
                );
                return Self::default();
            };
            result.insert(kind, ratio(numerator, denominator));
        }

        debug!("computed ratios: {:?}", result.values);
        result
    }

    pub fn insert(&mut self, kind: RatioKind, value: f64) {
        self.values.insert(kind, value);
    }

    pub fn get(&self, kind: RatioKind) -> Option<f64> {
        self.values.get(&kind).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RatioKind, f64)> + '_ {
        self.values.iter().map(|(k, v)| (*k, *v))
    }
}

impl FromIterator<(RatioKind, f64)> for RatioResult {
    fn from_iter<T: IntoIterator<Item = (RatioKind, f64)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Compute ratios for an optional landmark set. No face means no ratios.
pub fn compute_ratios(landmarks: Option<&LandmarkSet>) -> RatioResult {
    landmarks.map(RatioResult::from_landmarks).unwrap_or_default()
}

/// Divide two distances, treating a zero denominator as a zero ratio.
fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}
