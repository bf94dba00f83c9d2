//! Weighted candidate scoring and hire/review/reject bucketing

use crate::error::{Result, ResumeScreenerError};
use crate::processing::skill_extractor::{SkillCategory, SkillCounts};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Weights used when the recruiter supplies none
pub const DEFAULT_WEIGHTS: [(SkillCategory, f64); 4] = [
    (SkillCategory::Python, 0.30),
    (SkillCategory::Leadership, 0.25),
    (SkillCategory::Web, 0.25),
    (SkillCategory::Data, 0.20),
];

/// Slider positions run 0..=5 and are divided by this before use
pub const SLIDER_SCALE: f64 = 10.0;
pub const SLIDER_MAX: u8 = 5;

/// Each matched keyword contributes this many points before weighting
const POINTS_PER_KEYWORD: f64 = 10.0;

pub const HIRE_THRESHOLD: f64 = 7.0;
pub const REVIEW_THRESHOLD: f64 = 5.0;

/// Category -> importance weight supplied by the recruiter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightMap(BTreeMap<SkillCategory, f64>);

impl WeightMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn default_weights() -> Self {
        Self(DEFAULT_WEIGHTS.into_iter().collect())
    }

    /// Build from explicit pairs; weights must be finite and non-negative
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (SkillCategory, f64)>,
    {
        let mut weights = BTreeMap::new();
        for (category, weight) in pairs {
            if !weight.is_finite() || weight < 0.0 {
                return Err(ResumeScreenerError::InvalidWeights(format!(
                    "weight for {} must be a finite non-negative number, got {}",
                    category, weight
                )));
            }
            weights.insert(category, weight);
        }
        Ok(Self(weights))
    }

    /// Map the four 0-5 slider controls to weights of value / 10
    pub fn from_sliders(python: u8, leadership: u8, web: u8, data: u8) -> Result<Self> {
        let sliders = [
            (SkillCategory::Python, python),
            (SkillCategory::Leadership, leadership),
            (SkillCategory::Web, web),
            (SkillCategory::Data, data),
        ];

        if let Some((category, value)) = sliders.iter().find(|(_, v)| *v > SLIDER_MAX) {
            return Err(ResumeScreenerError::InvalidInput(format!(
                "{} slider must be between 0 and {}, got {}",
                category, SLIDER_MAX, value
            )));
        }

        Self::from_pairs(
            sliders
                .into_iter()
                .map(|(category, value)| (category, f64::from(value) / SLIDER_SCALE)),
        )
    }

    pub fn get(&self, category: SkillCategory) -> Option<f64> {
        self.0.get(&category).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SkillCategory, f64)> + '_ {
        self.0.iter().map(|(c, w)| (*c, *w))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }
}

/// Weighted score of a candidate's skill counts, rounded to two decimals.
///
/// `Σ count·weight·10 / Σ weight` over the categories present in `weights`.
/// The result is not clamped: a category with more matched keywords than its
/// weight anticipates pushes the score above 10.
pub fn score(skills: &SkillCounts, weights: &WeightMap) -> Result<f64> {
    let defaults;
    let weights = if weights.is_empty() {
        defaults = WeightMap::default_weights();
        &defaults
    } else {
        weights
    };

    let mut total = 0.0;
    let mut total_weight = 0.0;
    for (category, weight) in weights.iter() {
        total += skills.get(category) as f64 * weight * POINTS_PER_KEYWORD;
        total_weight += weight;
    }

    if total_weight <= 0.0 {
        return Err(ResumeScreenerError::InvalidWeights(
            "all category weights are zero; raise at least one requirement".to_string(),
        ));
    }

    Ok(round2(total / total_weight))
}

/// Half-way cases go to the even digit
fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Screening outcome derived from a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    Hire,
    Review,
    Reject,
}

impl Recommendation {
    pub fn from_score(score: f64) -> Self {
        if score >= HIRE_THRESHOLD {
            Recommendation::Hire
        } else if score >= REVIEW_THRESHOLD {
            Recommendation::Review
        } else {
            Recommendation::Reject
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::Hire => "Hire",
            Recommendation::Review => "Review",
            Recommendation::Reject => "Reject",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
