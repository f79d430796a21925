//! # golden-face
//!
//! Facial proportion analysis from face mesh landmarks.
//!
//! This crate provides:
//! - **Landmark normalization**: face mesh output (image fractions) to pixel coordinates
//! - **Proportions**: eye distance, nose length and mouth width ratios
//! - **Beauty score**: deviation of those ratios from the golden ratio, on a 0-10 scale
//! - **Overlay**: the measured segments and key points drawn on a copy of the image
//! - **Attributes**: age and gender from an external estimator, normalized to one shape
//!
//! The face mesh model and the age/gender estimator are external; plug them in
//! through the [`LandmarkDetector`] and [`AttributeModel`] traits.
//!
//! ## Pipeline
//!
//! 1. Detect the face mesh and keep the first face (468 or 478 points)
//! 2. Convert landmarks to pixels with `floor(x * width)`, `floor(y * height)`
//! 3. Measure inner eye distance (133-362), nose length (168-1), mouth width (61-291)
//! 4. Derive `eye_distance / nose_length` and `nose_length / mouth_width`
//! 5. Score `max(0, 10 - 2.5 * sum |1.618 - ratio|)` and label it
//! 6. Draw the overlay; estimate age and gender
//!
//! ## Quick Start
//!
//! ```rust
//! use golden_face::{
//!     AnalyzerConfig, Analysis, FaceAnalyzer, FileLandmarkDetector, MeshDetection,
//!     NormalizedPoint, UnavailableAttributeModel, FACE_MESH_POINTS,
//! };
//! use image::RgbImage;
//!
//! // A recorded detection; a live face mesh model works the same way.
//! let config = AnalyzerConfig::default();
//! let detection = MeshDetection::single(vec![NormalizedPoint::new(0.5, 0.5); FACE_MESH_POINTS]);
//! let detector = FileLandmarkDetector::from_detection(detection, &config.detector);
//!
//! let analyzer = FaceAnalyzer::from_config(&config, detector, UnavailableAttributeModel).unwrap();
//!
//! let image = RgbImage::new(640, 480);
//! match analyzer.analyze(&image) {
//!     Analysis::Face(report) => println!("{}", report.summary().to_text()),
//!     Analysis::NoFace => println!("No face detected"),
//! }
//! ```

mod analyzer;
mod attributes;
mod config;
mod error;
mod landmarks;
pub mod mesh;
mod metrics;
mod overlay;
mod score;
mod source;
mod types;

pub use analyzer::{Analysis, FaceAnalyzer, FaceReport, ReportSummary};
pub use attributes::{
    AttributeAction, AttributeEstimator, AttributeModel, AttributeOutcome, AttributeRequest,
    AttributeResult, RawAttributes, RawGender, RawRecord, UNKNOWN_GENDER,
};
pub use config::AnalyzerConfig;
pub use error::{Error, Result};
pub use landmarks::{normalize, DetectorOptions, LandmarkDetector, MeshDetection, MeshFace};
pub use mesh::{LandmarkPair, FACE_MESH_POINTS, REFINED_FACE_MESH_POINTS};
pub use metrics::{compute_ratios, RatioKind, RatioResult};
pub use overlay::{parse_hex_color, OverlayRenderer, OverlayStyle};
pub use score::{penalty, score, BeautyScore, ScoreLabel, GOLDEN_RATIO, MAX_SCORE};
pub use source::{FileAttributeModel, FileLandmarkDetector, UnavailableAttributeModel};
pub use types::{LandmarkSet, NormalizedPoint, Point};
