//! Input manager for handling different resume file types

use crate::error::{Result, ResumeScreenerError};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor};
use log::{info, warn};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Text pulled from one resume file
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedDocument {
    pub name: String,
    pub path: PathBuf,
    pub text: String,
}

pub struct InputManager {
    cache: HashMap<String, String>,
    enable_cache: bool,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            enable_cache: true,
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    /// Extract text, failing with `EmptyInput` when nothing readable comes out
    pub async fn extract_text(&mut self, path: &Path) -> Result<String> {
        let path_str = path.to_string_lossy().to_string();

        if self.enable_cache {
            if let Some(cached_text) = self.cache.get(&path_str) {
                info!("Using cached text for: {}", path.display());
                return Ok(cached_text.clone());
            }
        }

        if !path.exists() {
            return Err(ResumeScreenerError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let text = match self.detect_file_type(path)? {
            FileType::Pdf => {
                info!("Extracting text from PDF: {}", path.display());
                PdfExtractor.extract(path).await?
            }
            FileType::Text => {
                info!("Reading plain text file: {}", path.display());
                PlainTextExtractor.extract(path).await?
            }
            FileType::Markdown => {
                info!("Processing markdown file: {}", path.display());
                MarkdownExtractor.extract(path).await?
            }
            FileType::Csv | FileType::Unknown => {
                return Err(ResumeScreenerError::UnsupportedFormat(format!(
                    "Unsupported resume file type for: {}",
                    path.display()
                )));
            }
        };

        if text.trim().is_empty() {
            return Err(ResumeScreenerError::EmptyInput(format!(
                "No text extracted from {}",
                display_name(path)
            )));
        }

        if self.enable_cache {
            self.cache.insert(path_str, text.clone());
        }

        Ok(text)
    }

    /// Load every readable resume; files that fail are reported and skipped
    pub async fn load_documents(
        &mut self,
        paths: &[PathBuf],
    ) -> (Vec<LoadedDocument>, Vec<(PathBuf, ResumeScreenerError)>) {
        let mut documents = Vec::new();
        let mut failures = Vec::new();

        for path in paths {
            match self.extract_text(path).await {
                Ok(text) => documents.push(LoadedDocument {
                    name: display_name(path),
                    path: path.clone(),
                    text,
                }),
                Err(e) => {
                    warn!("{}. Skipping.", e);
                    failures.push((path.clone(), e));
                }
            }
        }

        (documents, failures)
    }

    fn detect_file_type(&self, path: &Path) -> Result<FileType> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| {
                ResumeScreenerError::InvalidInput(format!(
                    "File has no extension: {}",
                    path.display()
                ))
            })?;

        Ok(FileType::from_extension(extension))
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

/// File name for reports, falling back to the full path
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
