//! Error handling for the resume screener

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResumeScreenerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("No extractable text: {0}")]
    EmptyInput(String),

    #[error("Malformed batch input: {0}")]
    MalformedBatchInput(String),

    #[error("Invalid weights: {0}")]
    InvalidWeights(String),

    #[error("Embedding generation error: {0}")]
    Embedding(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Text processing error: {0}")]
    TextProcessing(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, ResumeScreenerError>;
