//! Screening engine: per-candidate extraction and scoring plus session summaries

use crate::config::Config;
use crate::error::{Result, ResumeScreenerError};
use crate::processing::clustering::{SkillCluster, SkillClusterer};
use crate::processing::scoring::{score, Recommendation, WeightMap};
use crate::processing::skill_extractor::{SkillCategory, SkillCounts, SkillExtractor, SkillTable};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;

/// Number of equal-width score bins between 0 and 10
pub const DISTRIBUTION_BINS: usize = 10;

/// Coordinates skill extraction and scoring for each candidate
pub struct ScreeningEngine {
    extractor: SkillExtractor,
    weights: WeightMap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateReport {
    pub name: String,
    pub skills: SkillCounts,
    pub score: f64,
    pub recommendation: Recommendation,
    pub matched_keywords: Vec<String>,
    pub word_count: usize,
}

/// A document that could not be screened, kept for the warning list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedDocument {
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Per-category counts of one of the top candidates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillProfile {
    pub name: String,
    pub score: f64,
    pub counts: Vec<(SkillCategory, usize)>,
}

/// Dashboard-level metrics over every screened candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub best_score: f64,
    pub average_score: f64,
    pub unique_skill_tags: usize,
    pub resumes_processed: usize,
    pub distribution: Vec<DistributionBin>,
    pub top_profiles: Vec<SkillProfile>,
}

impl ScreeningEngine {
    pub fn new(table: &SkillTable, weights: WeightMap) -> Result<Self> {
        if !weights.is_empty() && weights.total() <= 0.0 {
            return Err(ResumeScreenerError::InvalidWeights(
                "all category weights are zero; raise at least one requirement".to_string(),
            ));
        }

        let extractor = SkillExtractor::new(table)?;
        info!(
            "Screening engine ready with {} keywords",
            extractor.keyword_count()
        );

        Ok(Self {
            extractor,
            weights,
        })
    }

    pub fn from_config(config: &Config, weights: WeightMap) -> Result<Self> {
        Self::new(&config.skill_table(), weights)
    }

    /// Extract, score and bucket a single resume
    pub fn screen(&self, name: &str, text: &str) -> Result<CandidateReport> {
        if text.trim().is_empty() {
            return Err(ResumeScreenerError::EmptyInput(format!(
                "No text extracted from {}",
                name
            )));
        }

        let report = self.screen_text(name, text)?;
        debug!(
            "Screened {}: score {:.2} ({})",
            name, report.score, report.recommendation
        );
        Ok(report)
    }

    /// Score text as-is; blank text yields an empty skill map and a zero score
    pub fn screen_text(&self, name: &str, text: &str) -> Result<CandidateReport> {
        let normalized = self.extractor.normalizer().normalize(text);
        let skills = self.extractor.count_normalized(&normalized);
        let score = score(&skills, &self.weights)?;

        Ok(CandidateReport {
            name: name.to_string(),
            recommendation: Recommendation::from_score(score),
            matched_keywords: self.extractor.matched_keywords(text),
            word_count: normalized.split_whitespace().count(),
            skills,
            score,
        })
    }

    /// Screen many documents; blank ones are skipped, weight errors abort
    pub fn screen_all(
        &self,
        documents: &[(String, String)],
    ) -> Result<(Vec<CandidateReport>, Vec<SkippedDocument>)> {
        let mut reports = Vec::new();
        let mut skipped = Vec::new();

        for (name, text) in documents {
            match self.screen(name, text) {
                Ok(report) => reports.push(report),
                Err(ResumeScreenerError::EmptyInput(reason)) => {
                    warn!("{}. Skipping.", reason);
                    skipped.push(SkippedDocument {
                        name: name.clone(),
                        reason,
                    });
                }
                Err(e) => return Err(e),
            }
        }

        Ok((reports, skipped))
    }

    pub fn weights(&self) -> &WeightMap {
        &self.weights
    }

    pub fn keyword_count(&self) -> usize {
        self.extractor.keyword_count()
    }
}

/// Distinct `category: count` tags across candidates, first appearance order
pub fn distinct_skill_phrases(candidates: &[CandidateReport]) -> Vec<String> {
    let mut seen = HashSet::new();
    candidates
        .iter()
        .flat_map(|c| c.skills.tag_phrases())
        .filter(|phrase| seen.insert(phrase.clone()))
        .collect()
}

/// Group the session's distinct skill tags into at most `k` clusters
pub fn cluster_skill_phrases(
    candidates: &[CandidateReport],
    clusterer: &SkillClusterer<'_>,
    k: usize,
) -> Result<Vec<SkillCluster>> {
    let phrases = distinct_skill_phrases(candidates);
    info!("Clustering {} distinct skill tags into up to {} groups", phrases.len(), k);
    clusterer.cluster_groups(&phrases, k)
}

/// Candidates ordered by score, highest first; ties keep input order
pub fn rank_candidates(candidates: &[CandidateReport]) -> Vec<CandidateReport> {
    let mut ranked = candidates.to_vec();
    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    ranked
}

impl SessionSummary {
    pub fn from_candidates(candidates: &[CandidateReport], top_n: usize) -> Self {
        let resumes_processed = candidates.len();
        let best_score = candidates
            .iter()
            .map(|c| c.score)
            .fold(None, |best: Option<f64>, s| Some(best.map_or(s, |b| b.max(s))))
            .unwrap_or(0.0);
        let average_score = if resumes_processed == 0 {
            0.0
        } else {
            candidates.iter().map(|c| c.score).sum::<f64>() / resumes_processed as f64
        };

        let top_profiles = rank_candidates(candidates)
            .into_iter()
            .take(top_n)
            .map(|c| SkillProfile {
                counts: SkillCategory::ALL
                    .iter()
                    .map(|category| (*category, c.skills.get(*category)))
                    .collect(),
                name: c.name,
                score: c.score,
            })
            .collect();

        Self {
            best_score,
            average_score,
            unique_skill_tags: distinct_skill_phrases(candidates).len(),
            resumes_processed,
            distribution: score_distribution(candidates),
            top_profiles,
        }
    }
}

/// Histogram of scores over [0, 10]; scores at or above 10 land in the last bin
pub fn score_distribution(candidates: &[CandidateReport]) -> Vec<DistributionBin> {
    let width = 10.0 / DISTRIBUTION_BINS as f64;
    let mut bins: Vec<DistributionBin> = (0..DISTRIBUTION_BINS)
        .map(|i| DistributionBin {
            lower: i as f64 * width,
            upper: (i + 1) as f64 * width,
            count: 0,
        })
        .collect();

    for candidate in candidates {
        let index = ((candidate.score.max(0.0) / width) as usize).min(DISTRIBUTION_BINS - 1);
        bins[index].count += 1;
    }

    bins
}
