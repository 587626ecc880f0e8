//! newsrag — retrieval-augmented question answering over a news corpus
//!
//! The pipeline embeds a query, retrieves the nearest articles from a
//! vector index, and asks a generative model to answer from that context,
//! with a cache-aside layer and Redis-persisted session transcripts.

pub mod api;
pub mod cache;
pub mod chat;
pub mod config;
pub mod embeddings;
pub mod errors;
pub mod llm;
pub mod logging;
pub mod models;
pub mod rag;
pub mod session;
pub mod vector;

pub use config::AppConfig;
pub use errors::NewsRagError;
pub use errors::Result;
