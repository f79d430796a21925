//! Age and gender estimation.
//!
//! The external estimator answers in several shapes: a single record or a
//! list of per-face records, with gender either a label or a probability
//! map. [`RawAttributes::into_result`] collapses all of them into one
//! [`AttributeResult`]. [`AttributeEstimator`] never fails: any error turns
//! into [`AttributeOutcome::Fallback`].

use std::collections::BTreeMap;

use image::RgbImage;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const UNKNOWN_GENDER: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeAction {
    Age,
    Gender,
}

/// What to ask the estimator for, and how.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeRequest {
    pub actions: Vec<AttributeAction>,
    /// When true the estimator may refuse images where it cannot confidently
    /// find a face. Must stay false here.
    pub enforce_detection: bool,
    pub detector_backend: String,
}

impl Default for AttributeRequest {
    fn default() -> Self {
        Self {
            actions: vec![AttributeAction::Age, AttributeAction::Gender],
            enforce_detection: false,
            detector_backend: "opencv".to_string(),
        }
    }
}

/// An age/gender model. Loaded once, then called once per image.
pub trait AttributeModel: Send + Sync {
    fn analyze(&self, image: &RgbImage, request: &AttributeRequest) -> Result<RawAttributes>;
}

/// Estimator output as returned by the model.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawAttributes {
    Many(Vec<RawRecord>),
    Single(RawRecord),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub age: Option<f64>,
    #[serde(default)]
    pub gender: Option<RawGender>,
    #[serde(default)]
    pub dominant_gender: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawGender {
    Label(String),
    Probabilities(BTreeMap<String, f64>),
}

impl RawGender {
    fn into_label(self) -> Result<String> {
        match self {
            RawGender::Label(label) => Ok(label),
            RawGender::Probabilities(probs) => {
                let mut best: Option<(String, f64)> = None;
                for (label, p) in probs {
                    if best.as_ref().map_or(true, |(_, bp)| p > *bp) {
                        best = Some((label, p));
                    }
                }
                best.map(|(label, _)| label)
                    .ok_or_else(|| Error::UnexpectedShape("empty gender probabilities".into()))
            }
        }
    }
}

impl RawAttributes {
    /// Take the first record and reduce it to an age and a gender label.
    pub fn into_result(self) -> Result<AttributeResult> {
        let record = match self {
            RawAttributes::Single(record) => record,
            RawAttributes::Many(records) => records
                .into_iter()
                .next()
                .ok_or_else(|| Error::UnexpectedShape("empty result list".into()))?,
        };

        let age = record
            .age
            .filter(|a| a.is_finite() && *a >= 0.0)
            .ok_or_else(|| Error::UnexpectedShape("missing or invalid age".into()))?;

        let gender = match (record.gender, record.dominant_gender) {
            (Some(gender), _) => gender.into_label()?,
            (None, Some(label)) => label,
            (None, None) => return Err(Error::UnexpectedShape("missing gender".into())),
        };

        Ok(AttributeResult {
            age: age.round() as i32,
            gender,
        })
    }
}

/// Estimated age and gender label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeResult {
    pub age: i32,
    pub gender: String,
}

impl Default for AttributeResult {
    fn default() -> Self {
        Self {
            age: 0,
            gender: UNKNOWN_GENDER.to_string(),
        }
    }
}

/// Result of an estimation attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeOutcome {
    Estimated(AttributeResult),
    /// The model failed; `reason` is the error message.
    Fallback { reason: String },
}

impl AttributeOutcome {
    /// The estimated attributes, or the defaults after a fallback.
    pub fn result(&self) -> AttributeResult {
        match self {
            AttributeOutcome::Estimated(result) => result.clone(),
            AttributeOutcome::Fallback { .. } => AttributeResult::default(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, AttributeOutcome::Fallback { .. })
    }
}

/// Wraps an [`AttributeModel`] and normalizes everything it returns.
pub struct AttributeEstimator {
    model: Box<dyn AttributeModel>,
    request: AttributeRequest,
}

impl AttributeEstimator {
    pub fn new(model: impl AttributeModel + 'static, request: AttributeRequest) -> Self {
        Self {
            model: Box::new(model),
            request,
        }
    }

    pub fn request(&self) -> &AttributeRequest {
        &self.request
    }

    pub fn estimate(&self, image: &RgbImage) -> AttributeOutcome {
        match self
            .model
            .analyze(image, &self.request)
            .and_then(RawAttributes::into_result)
        {
            Ok(result) => {
                debug!("estimated age {} gender {}", result.age, result.gender);
                AttributeOutcome::Estimated(result)
            }
            Err(e) => {
                warn!("attribute estimation failed, using defaults: {}", e);
                AttributeOutcome::Fallback {
                    reason: e.to_string(),
                }
            }
        }
    }
}

impl std::fmt::Debug for AttributeEstimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttributeEstimator")
            .field("request", &self.request)
            .finish_non_exhaustive()
    }
}
