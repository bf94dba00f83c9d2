//! CLI interface for the resume screener

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "resume-screener")]
#[command(about = "Keyword-based resume screening with weighted skill scores")]
#[command(long_about = "Score resumes against weighted skill requirements (Python, Leadership, Web, Data), bucket candidates into Hire/Review/Reject, and optionally cluster skill tags with embeddings")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Screen one or more resume files
    Screen {
        /// Resume files (PDF, TXT, MD)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[command(flatten)]
        weights: WeightArgs,

        /// Group the session's skill tags with embedding-based k-means
        #[arg(long)]
        cluster: bool,

        /// Number of skill clusters (defaults to the configured value)
        #[arg(long)]
        clusters: Option<usize>,

        /// Output format: console, json, markdown, html
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Show matched keywords per candidate
        #[arg(short, long)]
        detailed: bool,
    },

    /// Score every row of a CSV file with a resume_text column
    Batch {
        /// Input CSV file
        input: PathBuf,

        /// Where to write the scored CSV
        #[arg(long, default_value = crate::batch::DEFAULT_OUTPUT_FILE)]
        out: PathBuf,

        #[command(flatten)]
        weights: WeightArgs,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

/// Requirement sliders, 0 to 5; each is divided by 10 to form the weight
#[derive(Args, Debug, Clone, Copy)]
pub struct WeightArgs {
    /// Python requirement
    #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(0..=5))]
    pub python: u8,

    /// Leadership requirement
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(0..=5))]
    pub leadership: u8,

    /// Web requirement
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(0..=5))]
    pub web: u8,

    /// Data requirement
    #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(0..=5))]
    pub data: u8,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file location
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<crate::config::OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(crate::config::OutputFormat::Console),
        "json" => Ok(crate::config::OutputFormat::Json),
        "markdown" | "md" => Ok(crate::config::OutputFormat::Markdown),
        "html" => Ok(crate::config::OutputFormat::Html),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, markdown, html",
            format
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_screen_defaults() {
        let cli = Cli::try_parse_from(["resume-screener", "screen", "a.pdf", "b.txt"]).unwrap();
        match cli.command {
            Commands::Screen { files, weights, cluster, .. } => {
                assert_eq!(files.len(), 2);
                assert_eq!(
                    (weights.python, weights.leadership, weights.web, weights.data),
                    (2, 1, 1, 2)
                );
                assert!(!cluster);
            }
            _ => panic!("expected screen command"),
        }
    }

    #[test]
    fn test_slider_out_of_range_rejected() {
        let result = Cli::try_parse_from(["resume-screener", "screen", "a.pdf", "--python", "6"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_batch_default_output() {
        let cli = Cli::try_parse_from(["resume-screener", "batch", "in.csv"]).unwrap();
        match cli.command {
            Commands::Batch { out, .. } => assert_eq!(out, PathBuf::from("resume_scores.csv")),
            _ => panic!("expected batch command"),
        }
    }

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format("MD").unwrap(), OutputFormat::Markdown);
        assert!(parse_output_format("pdf").is_err());
    }
}
