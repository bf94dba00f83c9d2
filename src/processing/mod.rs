//! Text processing, skill extraction, clustering and scoring

pub mod analyzer;
pub mod clustering;
pub mod embeddings;
pub mod scoring;
pub mod skill_extractor;
pub mod text_processor;
