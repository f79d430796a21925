use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::attributes::AttributeRequest;
use crate::error::{Error, Result};
use crate::landmarks::DetectorOptions;
use crate::overlay::{parse_hex_color, OverlayStyle};

/// Analyzer settings. Missing fields take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub detector: DetectorOptions,
    pub attributes: AttributeRequest,
    pub overlay: OverlayStyle,
}

impl AnalyzerConfig {
    /// Load and validate a JSON config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let d = &self.detector;
        if !d.static_image_mode {
            return Err(Error::InvalidConfig(
                "detector.static_image_mode must be true; video input is not supported".into(),
            ));
        }
        if d.max_num_faces != 1 {
            return Err(Error::InvalidConfig(format!(
                "detector.max_num_faces must be 1, got {}",
                d.max_num_faces
            )));
        }
        if !(0.0..=1.0).contains(&d.min_detection_confidence) {
            return Err(Error::InvalidConfig(format!(
                "detector.min_detection_confidence must be in [0, 1], got {}",
                d.min_detection_confidence
            )));
        }

        if self.attributes.enforce_detection {
            return Err(Error::InvalidConfig(
                "attributes.enforce_detection must be false".into(),
            ));
        }

        let o = &self.overlay;
        if o.line_thickness == 0 {
            return Err(Error::InvalidConfig("overlay.line_thickness must be positive".into()));
        }
        if o.marker_radius <= 0 {
            return Err(Error::InvalidConfig("overlay.marker_radius must be positive".into()));
        }
        for color in [&o.eye_color, &o.nose_color, &o.mouth_color, &o.marker_color] {
            parse_hex_color(color)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        AnalyzerConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: AnalyzerConfig =
            serde_json::from_str(r##"{"overlay": {"marker_radius": 5, "eye_color": "#123456"}}"##).unwrap();
        assert_eq!(config.overlay.marker_radius, 5);
        assert_eq!(config.overlay.eye_color, "#123456");
        assert_eq!(config.overlay.line_thickness, 2);
        assert_eq!(config.detector, DetectorOptions::default());
        config.validate().unwrap();
    }

    #[test]
    fn rejects_invalid_settings() {
        let mut config = AnalyzerConfig::default();
        config.detector.max_num_faces = 3;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let mut config = AnalyzerConfig::default();
        config.detector.static_image_mode = false;
        assert!(config.validate().is_err());

        let mut config = AnalyzerConfig::default();
        config.attributes.enforce_detection = true;
        assert!(config.validate().is_err());

        let mut config = AnalyzerConfig::default();
        config.detector.min_detection_confidence = 1.5;
        assert!(config.validate().is_err());

        let mut config = AnalyzerConfig::default();
        config.overlay.mouth_color = "cyan".into();
        assert!(matches!(config.validate(), Err(Error::InvalidColor(_))));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"detector": {"refine_landmarks": false}}"#).unwrap();

        let config = AnalyzerConfig::load(&path).unwrap();
        assert!(!config.detector.refine_landmarks);
        assert_eq!(config.detector.max_num_faces, 1);
    }
}
