//! Report structures for a screening session

use crate::processing::analyzer::{
    rank_candidates, CandidateReport, SessionSummary, SkippedDocument,
};
use crate::processing::clustering::SkillCluster;
use crate::processing::scoring::{Recommendation, WeightMap};
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// Everything the formatters render for one `screen` run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningReport {
    /// Dashboard metrics, distribution and top profiles
    pub summary: SessionSummary,

    /// Candidates ranked by score, highest first
    pub candidates: Vec<CandidateReport>,

    /// Documents that yielded no text
    pub skipped: Vec<SkippedDocument>,

    /// Skill tag clusters, when clustering ran
    pub clusters: Option<Vec<SkillCluster>>,

    /// Category weights the scores were computed with
    pub weights: WeightMap,

    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: SystemTime,
    pub screener_version: String,
    pub processing_time_ms: u64,
    pub embedding_model: Option<String>,
}

impl ScreeningReport {
    pub fn new(
        candidates: &[CandidateReport],
        skipped: Vec<SkippedDocument>,
        clusters: Option<Vec<SkillCluster>>,
        weights: WeightMap,
        top_n: usize,
    ) -> Self {
        Self {
            summary: SessionSummary::from_candidates(candidates, top_n),
            candidates: rank_candidates(candidates),
            skipped,
            clusters,
            weights,
            metadata: ReportMetadata {
                generated_at: SystemTime::now(),
                screener_version: env!("CARGO_PKG_VERSION").to_string(),
                processing_time_ms: 0,
                embedding_model: None,
            },
        }
    }

    pub fn with_processing_time(mut self, processing_time_ms: u64) -> Self {
        self.metadata.processing_time_ms = processing_time_ms;
        self
    }

    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.metadata.embedding_model = Some(model.into());
        self
    }

    pub fn count_with(&self, recommendation: Recommendation) -> usize {
        self.candidates
            .iter()
            .filter(|c| c.recommendation == recommendation)
            .count()
    }
}
