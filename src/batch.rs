//! Batch screening of CSV files with a `resume_text` column

use crate::error::{Result, ResumeScreenerError};
use crate::input::text_extractor::decode_text;
use crate::processing::analyzer::ScreeningEngine;
use crate::processing::scoring::Recommendation;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Column that must be present in batch input
pub const RESUME_TEXT_COLUMN: &str = "resume_text";

/// Default export name for batch results
pub const DEFAULT_OUTPUT_FILE: &str = "resume_scores.csv";

#[derive(Debug, Clone, PartialEq)]
pub struct BatchRow {
    pub candidate_id: usize,
    pub resume_text: String,
}

/// One exported row; `skills` holds the JSON-encoded category counts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    pub candidate_id: usize,
    pub score: f64,
    pub skills: String,
    pub recommendation: Recommendation,
}

/// Parse batch rows; fails before yielding anything if the schema is wrong.
/// Rows too short to reach the `resume_text` column are kept as blank text.
pub fn read_batch<R: Read>(reader: R) -> Result<Vec<BatchRow>> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers = csv_reader.byte_headers().map_err(|e| {
        ResumeScreenerError::MalformedBatchInput(format!("Could not read CSV header: {}", e))
    })?;
    let column = headers
        .iter()
        .position(|h| decode_text(h.to_vec(), "CSV header").trim() == RESUME_TEXT_COLUMN)
        .ok_or_else(|| {
            ResumeScreenerError::MalformedBatchInput(format!(
                "CSV must contain a '{}' column.",
                RESUME_TEXT_COLUMN
            ))
        })?;

    let mut rows = Vec::new();
    for (candidate_id, record) in csv_reader.byte_records().enumerate() {
        let record = record.map_err(|e| {
            ResumeScreenerError::MalformedBatchInput(format!(
                "Row {} could not be parsed: {}",
                candidate_id, e
            ))
        })?;
        let resume_text = match record.get(column) {
            Some(field) => decode_text(field.to_vec(), &format!("row {}", candidate_id)),
            None => {
                warn!("Row {} has no {} field, scoring it as empty", candidate_id, RESUME_TEXT_COLUMN);
                String::new()
            }
        };

        rows.push(BatchRow {
            candidate_id,
            resume_text,
        });
    }

    Ok(rows)
}

pub fn read_batch_file(path: &Path) -> Result<Vec<BatchRow>> {
    let file = File::open(path)?;
    read_batch(file)
}

/// Score every row; only configuration problems abort the batch
pub fn run_batch(engine: &ScreeningEngine, rows: &[BatchRow], show_progress: bool) -> Result<Vec<BatchResult>> {
    let progress = if show_progress {
        let bar = ProgressBar::new(rows.len() as u64);
        if let Ok(style) = ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} resumes") {
            bar.set_style(style);
        }
        bar
    } else {
        ProgressBar::hidden()
    };

    let mut results = Vec::with_capacity(rows.len());
    for row in rows {
        let report = engine.screen_text(&format!("row {}", row.candidate_id), &row.resume_text)?;
        results.push(BatchResult {
            candidate_id: row.candidate_id,
            score: report.score,
            skills: serde_json::to_string(&report.skills)?,
            recommendation: report.recommendation,
        });
        progress.inc(1);
    }
    progress.finish_and_clear();

    info!("Scored {} batch rows", results.len());
    Ok(results)
}

pub fn write_results<W: Write>(writer: W, results: &[BatchResult]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for result in results {
        csv_writer.serialize(result)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_results_file(path: &Path, results: &[BatchResult]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    write_results(File::create(path)?, results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::processing::scoring::WeightMap;

    fn engine() -> ScreeningEngine {
        ScreeningEngine::from_config(&Config::default(), WeightMap::from_sliders(2, 1, 1, 2).unwrap())
            .unwrap()
    }

    #[test]
    fn test_missing_column_is_malformed() {
        let input = "name,text\nalice,python\n";
        let err = read_batch(input.as_bytes()).unwrap_err();
        assert!(matches!(err, ResumeScreenerError::MalformedBatchInput(_)));
    }

    #[test]
    fn test_read_batch_assigns_row_ids() {
        let input = "name,resume_text\nalice,\"managed a team, python and pandas\"\nbob,html css\n";
        let rows = read_batch(input.as_bytes()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].candidate_id, 0);
        assert_eq!(rows[0].resume_text, "managed a team, python and pandas");
        assert_eq!(rows[1].candidate_id, 1);
    }

    #[test]
    fn test_short_row_does_not_abort_batch() {
        let input = "name,resume_text\nalice,python pandas\ncarol\nbob,html css\n";
        let rows = read_batch(input.as_bytes()).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].candidate_id, 1);
        assert_eq!(rows[1].resume_text, "");
        assert_eq!(rows[2].candidate_id, 2);
        assert_eq!(rows[2].resume_text, "html css");

        let results = run_batch(&engine(), &rows, false).unwrap();
        assert_eq!(results[1].score, 0.0);
        assert_eq!(results[1].recommendation, Recommendation::Reject);
        assert_eq!(results[2].skills, r#"{"web":2}"#);
    }

    #[test]
    fn test_non_utf8_field_is_decoded() {
        let mut input = b"resume_text\nCaf".to_vec();
        input.push(0xE9);
        input.extend_from_slice(b" sql\n");

        let rows = read_batch(input.as_slice()).unwrap();
        assert_eq!(rows[0].resume_text, "Café sql");
    }

    #[test]
    fn test_run_batch_and_export() {
        let rows = vec![
            BatchRow {
                candidate_id: 0,
                resume_text: "managed a team of engineers using python and pandas".to_string(),
            },
            BatchRow {
                candidate_id: 1,
                resume_text: String::new(),
            },
        ];

        let results = run_batch(&engine(), &rows, false).unwrap();

        assert_eq!(results[0].score, 10.0);
        assert_eq!(results[0].recommendation, Recommendation::Hire);
        assert_eq!(results[0].skills, r#"{"python":2,"leadership":2}"#);
        assert_eq!(results[1].score, 0.0);
        assert_eq!(results[1].skills, "{}");
        assert_eq!(results[1].recommendation, Recommendation::Reject);

        let mut out = Vec::new();
        write_results(&mut out, &results).unwrap();
        let csv_text = String::from_utf8(out).unwrap();
        let mut lines = csv_text.lines();

        assert_eq!(lines.next(), Some("candidate_id,score,skills,recommendation"));
        assert_eq!(
            lines.next(),
            Some(r#"0,10.0,"{""python"":2,""leadership"":2}",Hire"#)
        );
        assert_eq!(lines.next(), Some("1,0.0,{},Reject"));
    }
}
