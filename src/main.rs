//! Resume screener: keyword-based resume scoring from the command line

use clap::Parser;
use log::{error, info, warn};
use resume_screener::batch;
use resume_screener::cli::{self, Cli, Commands, ConfigAction, WeightArgs};
use resume_screener::config::{Config, OutputFormat};
use resume_screener::input::manager::{display_name, InputManager};
use resume_screener::output::formatter::{save_report_to_file, ReportGenerator};
use resume_screener::output::report::ScreeningReport;
use resume_screener::processing::analyzer::{
    cluster_skill_phrases, CandidateReport, ScreeningEngine, SkippedDocument,
};
use resume_screener::processing::clustering::{SkillCluster, SkillClusterer};
use resume_screener::processing::embeddings::{EmbeddingProvider, Model2VecProvider};
use resume_screener::processing::scoring::{
    Recommendation, WeightMap, HIRE_THRESHOLD, REVIEW_THRESHOLD,
};
use resume_screener::{Result, ResumeScreenerError};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    // Load configuration
    let config = match Config::load_from(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    // Execute command
    if let Err(e) = run_command(cli.command, config, cli.config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config, config_override: Option<PathBuf>) -> Result<()> {
    match command {
        Commands::Screen {
            files,
            weights,
            cluster,
            clusters,
            output,
            save,
            detailed,
        } => {
            let output_format = match output {
                Some(format) => cli::parse_output_format(&format).map_err(ResumeScreenerError::InvalidInput)?,
                None => config.output.format,
            };
            let detailed = detailed || config.output.detailed;
            let n_clusters = clusters.unwrap_or(config.clustering.n_clusters);

            screen(&config, &files, weights, cluster.then_some(n_clusters), output_format, save, detailed).await?;
        }

        Commands::Batch { input, out, weights } => {
            run_batch(&config, &input, &out, weights)?;
        }

        Commands::Config { action } => {
            let config_path = config_override.unwrap_or_else(Config::config_path);
            match action {
                Some(ConfigAction::Show) | None => show_config(&config, &config_path),

                Some(ConfigAction::Reset) => {
                    println!("🔄 Resetting configuration to defaults...");
                    Config::default().save_to(&config_path)?;
                    println!("✅ Configuration reset successfully!");
                }

                Some(ConfigAction::Path) => {
                    println!("{}", config_path.display());
                }
            }
        }
    }

    Ok(())
}

async fn screen(
    config: &Config,
    files: &[PathBuf],
    weight_args: WeightArgs,
    n_clusters: Option<usize>,
    output_format: OutputFormat,
    save: Option<PathBuf>,
    detailed: bool,
) -> Result<()> {
    let start_time = Instant::now();
    info!("Starting resume screening for {} files", files.len());

    let engine = ScreeningEngine::from_config(config, weights_from_args(weight_args)?)?;

    println!("🚀 Resume screening");
    println!("📂 Extracting text from {} files...", files.len());

    let mut input_manager = InputManager::new().with_cache(config.processing.enable_caching);
    let (documents, failures) = input_manager.load_documents(files).await;

    let mut skipped: Vec<SkippedDocument> = failures
        .into_iter()
        .map(|(path, e)| {
            println!("⚠️  {}. Skipping.", e);
            SkippedDocument {
                name: display_name(&path),
                reason: e.to_string(),
            }
        })
        .collect();

    if documents.is_empty() {
        return Err(ResumeScreenerError::EmptyInput(
            "No valid text detected in any uploaded file".to_string(),
        ));
    }

    let named_texts: Vec<(String, String)> = documents
        .into_iter()
        .map(|doc| (doc.name, doc.text))
        .collect();
    let (candidates, blank) = engine.screen_all(&named_texts)?;
    skipped.extend(blank);

    if candidates.is_empty() {
        return Err(ResumeScreenerError::EmptyInput(
            "No valid text detected in any uploaded file".to_string(),
        ));
    }
    println!("📊 Scored {} candidates", candidates.len());

    let mut embedding_model = None;
    let clusters = match n_clusters {
        Some(k) => {
            println!("🧠 Clustering skill tags...");
            let provider = Model2VecProvider::from_config(config);
            embedding_model = Some(provider.model_name().to_string());
            cluster_or_warn(&candidates, &provider, config, k)
        }
        None => None,
    };

    let mut report = ScreeningReport::new(
        &candidates,
        skipped,
        clusters,
        engine.weights().clone(),
        config.output.top_candidates,
    )
    .with_processing_time(start_time.elapsed().as_millis() as u64);
    if let Some(model) = embedding_model {
        report = report.with_embedding_model(model);
    }

    let use_colors = config.output.color_output && save.is_none();
    let generator = ReportGenerator::with_options(use_colors, detailed);
    let content = generator.generate_report(&report, &output_format)?;

    match save {
        Some(path) => {
            save_report_to_file(&content, &path)?;
            println!("✅ Report saved to {}", path.display());
        }
        None => println!("{}", content),
    }

    info!(
        "Screening finished: {} hire, {} review, {} reject",
        report.count_with(Recommendation::Hire),
        report.count_with(Recommendation::Review),
        report.count_with(Recommendation::Reject)
    );
    Ok(())
}

/// Embedding failures only cost the cluster section, never the scores
fn cluster_or_warn(
    candidates: &[CandidateReport],
    provider: &dyn EmbeddingProvider,
    config: &Config,
    k: usize,
) -> Option<Vec<SkillCluster>> {
    let clusterer = SkillClusterer::new(provider, config.clustering.clone());
    match cluster_skill_phrases(candidates, &clusterer, k) {
        Ok(clusters) => Some(clusters),
        Err(e) => {
            warn!("Skill clustering unavailable: {}", e);
            println!("⚠️  Skill clustering skipped: {}", e);
            None
        }
    }
}

fn run_batch(config: &Config, input: &Path, out: &Path, weight_args: WeightArgs) -> Result<()> {
    let engine = ScreeningEngine::from_config(config, weights_from_args(weight_args)?)?;

    println!("📄 Reading batch file: {}", input.display());
    let rows = batch::read_batch_file(input)?;
    println!("🔍 Scoring {} rows...", rows.len());

    let results = batch::run_batch(&engine, &rows, true)?;
    batch::write_results_file(out, &results)?;

    let hires = results
        .iter()
        .filter(|r| r.recommendation == Recommendation::Hire)
        .count();
    println!("✅ Scored {} candidates ({} recommended for hire)", results.len(), hires);
    println!("📁 Results written to {}", out.display());
    Ok(())
}

fn show_config(config: &Config, config_path: &Path) {
    println!("⚙️  Current Configuration\n");
    println!("Config File: {}", config_path.display());
    println!("Models Directory: {}", config.models_dir().display());
    println!("Embedding Model: {}", config.models.embedding_model);
    println!("\nClustering:");
    println!("  Clusters: {}", config.clustering.n_clusters);
    println!("  Seed: {}", config.clustering.seed);
    println!("  Restarts: {}", config.clustering.n_init);
    println!("\nRecommendation Thresholds:");
    println!("  Hire: score >= {:.1}", HIRE_THRESHOLD);
    println!("  Review: score >= {:.1}", REVIEW_THRESHOLD);
    println!("\nSkill Keywords:");
    for (category, keywords) in config.skill_table().categories() {
        println!("  {}: {}", category.label(), keywords.join(", "));
    }
    println!("\nOutput Format: {:?}", config.output.format);
}

fn weights_from_args(args: WeightArgs) -> Result<WeightMap> {
    WeightMap::from_sliders(args.python, args.leadership, args.web, args.data)
}
