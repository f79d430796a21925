//! Beauty score aggregation.
//!
//! The score starts at 10 and loses 2.5 points per unit of absolute
//! deviation of each ratio from the golden ratio, bottoming out at 0.

use serde::Serialize;

use crate::metrics::RatioResult;

/// Reference proportion every ratio is compared against.
pub const GOLDEN_RATIO: f64 = 1.618;

pub const MAX_SCORE: f64 = 10.0;

const PENALTY_WEIGHT: f64 = 2.5;

/// Category for a beauty score, from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ScoreLabel {
    Outstanding,
    Excellent,
    Good,
    Average,
    #[serde(rename = "Below Average")]
    BelowAverage,
}

impl ScoreLabel {
    /// Thresholds are inclusive and checked from the top down.
    pub fn from_score(score: f64) -> Self {
        if score >= 9.0 {
            ScoreLabel::Outstanding
        } else if score >= 8.0 {
            ScoreLabel::Excellent
        } else if score >= 7.0 {
            ScoreLabel::Good
        } else if score >= 5.0 {
            ScoreLabel::Average
        } else {
            ScoreLabel::BelowAverage
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreLabel::Outstanding => "Outstanding",
            ScoreLabel::Excellent => "Excellent",
            ScoreLabel::Good => "Good",
            ScoreLabel::Average => "Average",
            ScoreLabel::BelowAverage => "Below Average",
        }
    }
}

impl std::fmt::Display for ScoreLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A score in [0, 10] with its category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BeautyScore {
    pub value: f64,
    pub label: ScoreLabel,
}

impl BeautyScore {
    pub fn from_penalty(penalty: f64) -> Self {
        let value = (MAX_SCORE - penalty * PENALTY_WEIGHT).max(0.0);
        Self {
            value,
            label: ScoreLabel::from_score(value),
        }
    }

    pub fn from_ratios(ratios: &RatioResult) -> Self {
        Self::from_penalty(penalty(ratios))
    }
}

/// Sum of absolute deviations from [`GOLDEN_RATIO`]. Missing ratios add nothing.
pub fn penalty(ratios: &RatioResult) -> f64 {
    ratios
        .iter()
        .map(|(_, value)| (GOLDEN_RATIO - value).abs())
        .sum()
}

pub fn score(ratios: &RatioResult) -> BeautyScore {
    let score = BeautyScore::from_ratios(ratios);
    log::debug!("beauty score {:.3} ({})", score.value, score.label);
    score
}
