//! Integration tests for the resume screener

use resume_screener::batch::{read_batch_file, run_batch, write_results_file};
use resume_screener::config::{Config, OutputFormat};
use resume_screener::input::manager::InputManager;
use resume_screener::output::formatter::ReportGenerator;
use resume_screener::output::report::ScreeningReport;
use resume_screener::processing::analyzer::ScreeningEngine;
use resume_screener::processing::scoring::{Recommendation, WeightMap};
use resume_screener::processing::skill_extractor::SkillCategory;
use resume_screener::ResumeScreenerError;
use std::io::Write;
use std::path::{Path, PathBuf};

fn default_engine() -> ScreeningEngine {
    ScreeningEngine::from_config(&Config::default(), WeightMap::from_sliders(2, 1, 1, 2).unwrap())
        .unwrap()
}

#[tokio::test]
async fn test_text_extraction_from_txt() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.txt");

    let text = manager.extract_text(path).await.unwrap();
    assert!(text.contains("Jane Smith"));
    assert!(text.contains("Senior Data Engineer"));
    assert!(text.contains("Tableau"));
}

#[tokio::test]
async fn test_text_extraction_from_markdown() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.md");

    let text = manager.extract_text(path).await.unwrap();
    assert!(text.contains("Jane Smith"));
    assert!(text.contains("Senior Data Engineer"));
    // Should not contain markdown formatting
    assert!(!text.contains("**"));
    assert!(!text.contains("##"));
}

#[tokio::test]
async fn test_caching_functionality() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.txt");

    let text1 = manager.extract_text(path).await.unwrap();
    assert_eq!(manager.cache_size(), 1);

    let text2 = manager.extract_text(path).await.unwrap();
    assert_eq!(text1, text2);
    assert_eq!(manager.cache_size(), 1);
}

#[tokio::test]
async fn test_unsupported_file_type() {
    let mut manager = InputManager::new();
    let result = manager.extract_text(Path::new("tests/fixtures/unsupported.xyz")).await;
    assert!(matches!(result, Err(ResumeScreenerError::UnsupportedFormat(_))));
}

#[tokio::test]
async fn test_nonexistent_file() {
    let mut manager = InputManager::new();
    let result = manager.extract_text(Path::new("tests/fixtures/nonexistent.txt")).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_blank_file_is_empty_input() {
    let mut manager = InputManager::new();
    let result = manager.extract_text(Path::new("tests/fixtures/blank.txt")).await;
    assert!(matches!(result, Err(ResumeScreenerError::EmptyInput(_))));
}

#[tokio::test]
async fn test_latin1_file_is_decoded() {
    let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
    file.write_all(&[b'C', b'a', b'f', 0xE9, b' ', b'S', b'Q', b'L']).unwrap();
    file.flush().unwrap();

    let mut manager = InputManager::new();
    let text = manager.extract_text(file.path()).await.unwrap();
    assert_eq!(text, "Café SQL");
}

#[tokio::test]
async fn test_load_documents_skips_failures() {
    let paths: Vec<PathBuf> = [
        "tests/fixtures/sample_resume.txt",
        "tests/fixtures/blank.txt",
        "tests/fixtures/web_resume.txt",
    ]
    .iter()
    .map(PathBuf::from)
    .collect();

    let mut manager = InputManager::new();
    let (documents, failures) = manager.load_documents(&paths).await;

    assert_eq!(documents.len(), 2);
    assert_eq!(documents[0].name, "sample_resume.txt");
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, PathBuf::from("tests/fixtures/blank.txt"));
}

#[tokio::test]
async fn test_unsupported_extension_is_skipped_not_fatal() {
    let paths = vec![
        PathBuf::from("tests/fixtures/unsupported.xyz"),
        PathBuf::from("tests/fixtures/web_resume.txt"),
    ];

    let mut manager = InputManager::new();
    let (documents, failures) = manager.load_documents(&paths).await;

    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].name, "web_resume.txt");
    assert_eq!(failures.len(), 1);
    assert!(matches!(failures[0].1, ResumeScreenerError::UnsupportedFormat(_)));
}

#[tokio::test]
async fn test_txt_and_markdown_score_the_same() {
    let mut manager = InputManager::new();
    let txt = manager.extract_text(Path::new("tests/fixtures/sample_resume.txt")).await.unwrap();
    let md = manager.extract_text(Path::new("tests/fixtures/sample_resume.md")).await.unwrap();

    let engine = default_engine();
    let from_txt = engine.screen("sample_resume.txt", &txt).unwrap();
    let from_md = engine.screen("sample_resume.md", &md).unwrap();

    assert_eq!(from_txt.skills, from_md.skills);
    assert_eq!(from_txt.skills.get(SkillCategory::Python), 3);
    assert_eq!(from_txt.skills.get(SkillCategory::Leadership), 4);
    assert_eq!(from_txt.skills.get(SkillCategory::Web), 0);
    assert_eq!(from_txt.skills.get(SkillCategory::Data), 4);
    assert_eq!(from_txt.score, 30.0);
    assert_eq!(from_txt.recommendation, Recommendation::Hire);
}

#[test]
fn test_screening_end_to_end_example() {
    let report = default_engine()
        .screen("candidate", "managed a team of engineers using python and pandas")
        .unwrap();

    assert_eq!(serde_json::to_string(&report.skills).unwrap(), r#"{"python":2,"leadership":2}"#);
    assert_eq!(report.score, 10.0);
    assert_eq!(report.recommendation, Recommendation::Hire);
}

#[test]
fn test_empty_weights_use_defaults() {
    let engine = ScreeningEngine::from_config(&Config::default(), WeightMap::new()).unwrap();
    let report = engine.screen("candidate", "python pandas sql").unwrap();

    // (2 * 0.30 + 1 * 0.20) * 10 / 1.0
    assert_eq!(report.score, 8.0);
}

#[test]
fn test_all_zero_sliders_are_rejected() {
    let result = ScreeningEngine::from_config(&Config::default(), WeightMap::from_sliders(0, 0, 0, 0).unwrap());
    assert!(matches!(result, Err(ResumeScreenerError::InvalidWeights(_))));
}

#[test]
fn test_batch_end_to_end() {
    let rows = read_batch_file(Path::new("tests/fixtures/batch.csv")).unwrap();
    assert_eq!(rows.len(), 4);

    let results = run_batch(&default_engine(), &rows, false).unwrap();
    let scores: Vec<f64> = results.iter().map(|r| r.score).collect();
    assert_eq!(scores, vec![10.0, 3.33, 0.0, 15.0]);
    assert_eq!(results[2].skills, "{}");
    assert_eq!(results[3].recommendation, Recommendation::Hire);

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("scores").join("resume_scores.csv");
    write_results_file(&out, &results).unwrap();

    let written = std::fs::read_to_string(&out).unwrap();
    let mut lines = written.lines();
    assert_eq!(lines.next(), Some("candidate_id,score,skills,recommendation"));
    assert_eq!(lines.next(), Some(r#"0,10.0,"{""python"":2,""leadership"":2}",Hire"#));
    assert_eq!(lines.next(), Some(r#"1,3.33,"{""web"":2}",Reject"#));
    assert_eq!(written.lines().count(), 5);
}

#[test]
fn test_batch_without_resume_text_column_fails() {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "name,summary").unwrap();
    writeln!(file, "alice,python").unwrap();
    file.flush().unwrap();

    let result = read_batch_file(file.path());
    assert!(matches!(result, Err(ResumeScreenerError::MalformedBatchInput(_))));
}

#[tokio::test]
async fn test_report_generation_for_session() {
    let paths = vec![
        PathBuf::from("tests/fixtures/sample_resume.txt"),
        PathBuf::from("tests/fixtures/web_resume.txt"),
    ];
    let mut manager = InputManager::new();
    let (documents, _) = manager.load_documents(&paths).await;
    let named: Vec<(String, String)> = documents.into_iter().map(|d| (d.name, d.text)).collect();

    let engine = default_engine();
    let (candidates, skipped) = engine.screen_all(&named).unwrap();
    let report = ScreeningReport::new(&candidates, skipped, None, engine.weights().clone(), 3);

    assert_eq!(report.summary.resumes_processed, 2);
    assert_eq!(report.candidates[0].name, "sample_resume.txt");
    assert_eq!(report.summary.best_score, 30.0);

    let markdown = ReportGenerator::with_options(false, false)
        .generate_report(&report, &OutputFormat::Markdown)
        .unwrap();
    assert!(markdown.contains("| web_resume.txt | 8.33 | 0 | 0 | 5 | 0 | Hire |"));
}
