//! Error taxonomy for the newsrag service

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NewsRagError {
    /// Bad caller input, reported before any remote call is made
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Embedding provider error: {0}")]
    Embedding(String),

    #[error("Vector index error: {0}")]
    Retrieval(String),

    #[error("Generation provider error: {0}")]
    Generation(String),

    /// A client was used before its required setup completed
    #[error("Not initialized: {0}")]
    NotInitialized(&'static str),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP client error: {0}")]
    Http(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, NewsRagError>;
