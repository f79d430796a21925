//! The per-image analysis pipeline.

use image::RgbImage;
use log::{debug, warn};
use serde::Serialize;

use crate::attributes::{AttributeEstimator, AttributeModel, AttributeOutcome};
use crate::config::AnalyzerConfig;
use crate::error::Result;
use crate::landmarks::{normalize, DetectorOptions, LandmarkDetector};
use crate::metrics::RatioResult;
use crate::overlay::OverlayRenderer;
use crate::score::{score, BeautyScore, ScoreLabel};
use crate::types::LandmarkSet;

/// Holds the loaded models. Build one per process and reuse it; `analyze`
/// keeps no state between images.
pub struct FaceAnalyzer {
    detector: Box<dyn LandmarkDetector>,
    detector_options: DetectorOptions,
    estimator: AttributeEstimator,
    renderer: OverlayRenderer,
}

impl FaceAnalyzer {
    pub fn new(
        detector: impl LandmarkDetector + 'static,
        estimator: AttributeEstimator,
        renderer: OverlayRenderer,
    ) -> Self {
        Self {
            detector: Box::new(detector),
            detector_options: DetectorOptions::default(),
            estimator,
            renderer,
        }
    }

    /// Validate `config` and assemble an analyzer around the given models.
    pub fn from_config(
        config: &AnalyzerConfig,
        detector: impl LandmarkDetector + 'static,
        attribute_model: impl AttributeModel + 'static,
    ) -> Result<Self> {
        config.validate()?;
        let estimator = AttributeEstimator::new(attribute_model, config.attributes.clone());
        let renderer = OverlayRenderer::from_style(&config.overlay)?;
        Ok(Self::new(detector, estimator, renderer).with_detector_options(config.detector.clone()))
    }

    /// Replace the confidence, face count and refinement settings applied to
    /// every detector result.
    pub fn with_detector_options(mut self, options: DetectorOptions) -> Self {
        self.detector_options = options;
        self
    }

    /// Detect and normalize landmarks. Detector errors count as "no face".
    pub fn landmarks(&self, image: &RgbImage) -> Option<LandmarkSet> {
        let detection = match self.detector.detect(image) {
            Ok(detection) => detection,
            Err(e) => {
                warn!("landmark detection failed: {}", e);
                return None;
            }
        };
        debug!("detector reported {} face(s)", detection.faces.len());
        normalize(image, &detection.filtered(&self.detector_options))
    }

    pub fn analyze(&self, image: &RgbImage) -> Analysis {
        let Some(landmarks) = self.landmarks(image) else {
            return Analysis::NoFace;
        };

        let attributes = self.estimator.estimate(image);
        let ratios = RatioResult::from_landmarks(&landmarks);
        let score = score(&ratios);
        let overlay = self.renderer.render(image, Some(&landmarks));

        Analysis::Face(Box::new(FaceReport {
            landmarks,
            attributes,
            ratios,
            score,
            overlay,
        }))
    }
}

/// Outcome of analyzing one image.
#[derive(Debug, Clone)]
pub enum Analysis {
    NoFace,
    Face(Box<FaceReport>),
}

impl Analysis {
    pub fn report(&self) -> Option<&FaceReport> {
        match self {
            Analysis::NoFace => None,
            Analysis::Face(report) => Some(report.as_ref()),
        }
    }
}

/// Everything measured on a detected face.
#[derive(Debug, Clone)]
pub struct FaceReport {
    pub landmarks: LandmarkSet,
    pub attributes: AttributeOutcome,
    pub ratios: RatioResult,
    pub score: BeautyScore,
    /// Copy of the input with measured segments and key points drawn.
    pub overlay: RgbImage,
}

impl FaceReport {
    pub fn summary(&self) -> ReportSummary {
        let attributes = self.attributes.result();
        ReportSummary {
            age: attributes.age,
            gender: attributes.gender,
            attributes_fallback: self.attributes.is_fallback(),
            beauty_score: self.score.value,
            label: self.score.label,
            ratios: self.ratios.clone(),
            landmark_count: self.landmarks.len(),
        }
    }
}

/// Serializable view of a [`FaceReport`], without images.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    pub age: i32,
    pub gender: String,
    pub attributes_fallback: bool,
    pub beauty_score: f64,
    pub label: ScoreLabel,
    pub ratios: RatioResult,
    pub landmark_count: usize,
}

impl ReportSummary {
    /// Dashboard-style text: score to one decimal, ratios to two.
    pub fn to_text(&self) -> String {
        let mut s = String::new();
        s.push_str(&format!("Age:          {}\n", self.age));
        s.push_str(&format!("Gender:       {}\n", self.gender));
        if self.attributes_fallback {
            s.push_str("              (attribute estimation unavailable)\n");
        }
        s.push_str(&format!(
            "Beauty Score: {:.1}/10 ({})\n",
            self.beauty_score, self.label
        ));
        s.push_str("\nGolden Ratio Analysis:\n");
        for (kind, value) in self.ratios.iter() {
            s.push_str(&format!("  {:<24} {:.2}\n", kind.label(), value));
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::{AttributeRequest, AttributeResult};
    use crate::error::Error;
    use crate::landmarks::{MeshDetection, MeshFace};
    use crate::mesh::{FACE_MESH_POINTS, REFINED_FACE_MESH_POINTS};
    use crate::metrics::RatioKind;
    use crate::source::UnavailableAttributeModel;
    use crate::types::NormalizedPoint;

    struct BrokenDetector;

    impl LandmarkDetector for BrokenDetector {
        fn detect(&self, _: &RgbImage) -> Result<MeshDetection> {
            Err(Error::Detector("graph failed to load".into()))
        }
    }

    struct ScoredDetector(Vec<(usize, f32)>);

    impl LandmarkDetector for ScoredDetector {
        fn detect(&self, _: &RgbImage) -> Result<MeshDetection> {
            let faces = self
                .0
                .iter()
                .map(|&(count, score)| MeshFace {
                    landmarks: vec![NormalizedPoint::new(0.5, 0.5); count],
                    score: Some(score),
                })
                .collect();
            Ok(MeshDetection { faces })
        }
    }

    fn analyzer_with(detector: impl LandmarkDetector + 'static) -> FaceAnalyzer {
        FaceAnalyzer::new(
            detector,
            AttributeEstimator::new(UnavailableAttributeModel, AttributeRequest::default()),
            OverlayRenderer::default(),
        )
    }

    #[test]
    fn low_confidence_face_is_no_face() {
        let analyzer = analyzer_with(ScoredDetector(vec![(FACE_MESH_POINTS, 0.2)]));
        assert!(analyzer.landmarks(&RgbImage::new(32, 32)).is_none());

        let lenient = analyzer_with(ScoredDetector(vec![(FACE_MESH_POINTS, 0.2)]))
            .with_detector_options(DetectorOptions {
                min_detection_confidence: 0.1,
                ..DetectorOptions::default()
            });
        assert!(lenient.landmarks(&RgbImage::new(32, 32)).is_some());
    }

    #[test]
    fn detector_options_pick_face_and_refinement() {
        // The first face is below the threshold, so the second one is used.
        let detector = ScoredDetector(vec![(300, 0.3), (REFINED_FACE_MESH_POINTS, 0.9)]);
        let landmarks = analyzer_with(detector).landmarks(&RgbImage::new(32, 32)).unwrap();
        assert_eq!(landmarks.len(), REFINED_FACE_MESH_POINTS);
        assert_eq!(landmarks[0].x, 16);

        let detector = ScoredDetector(vec![(REFINED_FACE_MESH_POINTS, 0.9)]);
        let unrefined = analyzer_with(detector).with_detector_options(DetectorOptions {
            refine_landmarks: false,
            ..DetectorOptions::default()
        });
        let landmarks = unrefined.landmarks(&RgbImage::new(32, 32)).unwrap();
        assert_eq!(landmarks.len(), FACE_MESH_POINTS);
    }

    #[test]
    fn detector_error_is_no_face() {
        let analyzer = analyzer_with(BrokenDetector);
        let analysis = analyzer.analyze(&RgbImage::new(16, 16));
        assert!(matches!(analysis, Analysis::NoFace));
        assert!(analysis.report().is_none());
    }

    #[test]
    fn summary_text_formatting() {
        let summary = ReportSummary {
            age: 33,
            gender: "Woman".into(),
            attributes_fallback: false,
            beauty_score: 6.909999,
            label: ScoreLabel::Average,
            ratios: [
                (RatioKind::EyeDistanceOverNoseLength, 1.0),
                (RatioKind::NoseLengthOverMouthWidth, 1.004),
            ]
            .into_iter()
            .collect(),
            landmark_count: 468,
        };
        let text = summary.to_text();
        assert!(text.contains("Beauty Score: 6.9/10 (Average)"));
        assert!(text.contains("Eye Dist / Nose Length"));
        assert!(text.contains("1.00\n"));
        assert!(!text.contains("unavailable"));
    }

    #[test]
    fn fallback_is_visible_in_summary() {
        let report = FaceReport {
            landmarks: LandmarkSet::from_points(Vec::new()),
            attributes: AttributeOutcome::Fallback {
                reason: "boom".into(),
            },
            ratios: RatioResult::new(),
            score: BeautyScore::from_penalty(0.0),
            overlay: RgbImage::new(1, 1),
        };
        let summary = report.summary();
        assert!(summary.attributes_fallback);
        assert_eq!(summary.age, AttributeResult::default().age);
        assert_eq!(summary.gender, "Unknown");
        assert_eq!(summary.beauty_score, 10.0);
    }
}
