//! Sentence embeddings for skill phrases using Model2Vec

use crate::config::Config;
use crate::error::{Result, ResumeScreenerError};
use log::{debug, info};
use model2vec_rs::model::StaticModel;
use once_cell::sync::OnceCell;
use std::path::PathBuf;
use std::time::Instant;

/// Maps phrases to fixed-length vectors, one per phrase, order preserved
pub trait EmbeddingProvider {
    fn embed(&self, phrases: &[String]) -> Result<Vec<Vec<f32>>>;

    fn model_name(&self) -> &str;
}

/// Model2Vec static model, loaded on first use and then shared read-only
pub struct Model2VecProvider {
    source: PathBuf,
    model_name: String,
    batch_size: usize,
    model: OnceCell<StaticModel>,
}

impl Model2VecProvider {
    /// `source` is either a local model directory or a HuggingFace repo id
    pub fn new(source: impl Into<PathBuf>, model_name: impl Into<String>, batch_size: usize) -> Self {
        Self {
            source: source.into(),
            model_name: model_name.into(),
            batch_size: batch_size.max(1),
            model: OnceCell::new(),
        }
    }

    /// Prefer a downloaded copy under the models dir, else the hub repo id
    pub fn from_config(config: &Config) -> Self {
        let model_name = &config.models.embedding_model;
        let local_path = config.models_dir().join(model_name);
        let source = if local_path.exists() {
            local_path
        } else {
            PathBuf::from(model_name)
        };

        Self::new(source, model_name.clone(), config.processing.batch_size)
    }

    pub fn is_loaded(&self) -> bool {
        self.model.get().is_some()
    }

    fn model(&self) -> Result<&StaticModel> {
        self.model.get_or_try_init(|| {
            let start_time = Instant::now();
            info!("Loading Model2Vec embedding model from: {}", self.source.display());

            let model = StaticModel::from_pretrained(&self.source, None, None, None).map_err(|e| {
                ResumeScreenerError::Embedding(format!(
                    "Failed to load model '{}': {}",
                    self.model_name, e
                ))
            })?;

            info!("Model loaded successfully in {:.2?}", start_time.elapsed());
            Ok(model)
        })
    }
}

impl EmbeddingProvider for Model2VecProvider {
    fn embed(&self, phrases: &[String]) -> Result<Vec<Vec<f32>>> {
        if phrases.is_empty() {
            return Ok(Vec::new());
        }

        let model = self.model()?;
        let start_time = Instant::now();

        let mut embeddings = Vec::with_capacity(phrases.len());
        for batch in phrases.chunks(self.batch_size) {
            embeddings.extend(model.encode(batch));
        }

        if embeddings.len() != phrases.len() {
            return Err(ResumeScreenerError::Embedding(format!(
                "Model returned {} embeddings for {} phrases",
                embeddings.len(),
                phrases.len()
            )));
        }

        debug!(
            "Embedded {} phrases in {}ms",
            phrases.len(),
            start_time.elapsed().as_millis()
        );
        Ok(embeddings)
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

/// Check that every vector shares one non-zero dimension
pub fn embedding_dimension(embeddings: &[Vec<f32>]) -> Result<usize> {
    let dim = match embeddings.first() {
        Some(first) => first.len(),
        None => return Ok(0),
    };

    if dim == 0 {
        return Err(ResumeScreenerError::Embedding(
            "Embedding vectors are empty".to_string(),
        ));
    }

    if let Some(bad) = embeddings.iter().find(|e| e.len() != dim) {
        return Err(ResumeScreenerError::Embedding(format!(
            "Embedding dimensions don't match: {} vs {}",
            dim,
            bad.len()
        )));
    }

    Ok(dim)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedding_dimension_checks_consistency() {
        assert_eq!(embedding_dimension(&[]).unwrap(), 0);
        assert_eq!(embedding_dimension(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap(), 2);
        assert!(embedding_dimension(&[vec![1.0, 2.0], vec![3.0]]).is_err());
        assert!(embedding_dimension(&[vec![]]).is_err());
    }

    #[test]
    fn test_provider_is_lazy() {
        let provider = Model2VecProvider::new("/nonexistent/model", "test-model", 8);
        assert!(!provider.is_loaded());
        assert_eq!(provider.model_name(), "test-model");

        // Empty input never touches the model
        assert!(provider.embed(&[]).unwrap().is_empty());
        assert!(!provider.is_loaded());
    }

    #[test]
    fn test_from_config_falls_back_to_repo_id() {
        let mut config = Config::default();
        config.models.models_dir = PathBuf::from("/nonexistent/models");

        let provider = Model2VecProvider::from_config(&config);
        assert_eq!(provider.source, PathBuf::from("minishlab/M2V_base_output"));
    }
}
