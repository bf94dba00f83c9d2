//! Configuration management for the resume screener

use crate::error::{Result, ResumeScreenerError};
use crate::processing::skill_extractor::{SkillCategory, SkillTable};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub models: ModelConfig,
    pub processing: ProcessingConfig,
    #[serde(default)]
    pub skills: SkillsConfig,
    pub clustering: ClusteringConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub models_dir: PathBuf,
    pub embedding_model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    pub batch_size: usize,
    pub enable_caching: bool,
}

/// Extra trigger keywords appended to the built-in category lists
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkillsConfig {
    #[serde(default)]
    pub python: Vec<String>,
    #[serde(default)]
    pub leadership: Vec<String>,
    #[serde(default)]
    pub web: Vec<String>,
    #[serde(default)]
    pub data: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusteringConfig {
    pub n_clusters: usize,
    pub seed: u64,
    pub max_iterations: usize,
    pub n_init: usize,
    pub tolerance: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
    pub top_candidates: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
    Html,
}

impl Default for Config {
    fn default() -> Self {
        let models_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".resume-screener")
            .join("models");

        Self {
            models: ModelConfig {
                models_dir,
                embedding_model: "minishlab/M2V_base_output".to_string(),
            },
            processing: ProcessingConfig {
                batch_size: 32,
                enable_caching: true,
            },
            skills: SkillsConfig::default(),
            clustering: ClusteringConfig::default(),
            output: OutputConfig {
                format: OutputFormat::Console,
                detailed: false,
                color_output: true,
                top_candidates: 3,
            },
        }
    }
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            n_clusters: 5,
            seed: 42,
            max_iterations: 300,
            n_init: 10,
            tolerance: 1e-4,
        }
    }
}

impl SkillsConfig {
    fn keywords_for(&self, category: SkillCategory) -> &[String] {
        match category {
            SkillCategory::Python => &self.python,
            SkillCategory::Leadership => &self.leadership,
            SkillCategory::Web => &self.web,
            SkillCategory::Data => &self.data,
        }
    }
}

impl Config {
    /// Load from an explicit path, or from the default location
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::read(path),
            None => Self::load(),
        }
    }

    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::read(&config_path)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            ResumeScreenerError::Configuration(format!(
                "Failed to parse config '{}': {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            ResumeScreenerError::Configuration(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-screener")
            .join("config.toml")
    }

    pub fn models_dir(&self) -> &PathBuf {
        &self.models.models_dir
    }

    /// Build the keyword table: built-in lists extended with configured keywords
    pub fn skill_table(&self) -> SkillTable {
        let mut table = SkillTable::default();
        for category in SkillCategory::ALL {
            table.extend_category(category, self.skills.keywords_for(category));
        }
        table
    }

    pub fn validate(&self) -> Result<()> {
        if self.processing.batch_size == 0 {
            return Err(ResumeScreenerError::Configuration(
                "processing.batch_size must be at least 1".to_string(),
            ));
        }
        if self.clustering.n_init == 0 || self.clustering.max_iterations == 0 {
            return Err(ResumeScreenerError::Configuration(
                "clustering.n_init and clustering.max_iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
