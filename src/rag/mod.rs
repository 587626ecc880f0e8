//! RAG (Retrieval-Augmented Generation) module
//!
//! End-to-end query answering over the news corpus:
//! - Cache-aside lookup of previously answered queries
//! - Semantic retrieval from the vector index
//! - Context assembly from retrieved articles
//! - LLM answer generation constrained to that context

pub mod context;
pub mod pipeline;

pub use context::build_context;
pub use context::NO_RESULTS_CONTEXT;
pub use pipeline::query_cache_key;
pub use pipeline::RagPipeline;
