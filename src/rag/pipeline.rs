//! Complete RAG pipeline: cache check -> embed -> retrieve -> generate

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::cache::Cache;
use crate::embeddings::Embedder;
use crate::embeddings::RETRIEVAL_QUERY_TASK;
use crate::errors::NewsRagError;
use crate::errors::Result;
use crate::llm::Generator;
use crate::models::AnswerPayload;
use crate::rag::context::build_context;
use crate::vector::VectorSearch;

/// Query-result cache TTL (fixed, not configurable)
const QUERY_CACHE_TTL: Duration = Duration::from_secs(600);

const QUERY_CACHE_PREFIX: &str = "rag:news:";

/// Number of nearest articles retrieved per query
const RETRIEVAL_LIMIT: usize = 5;

/// Normalize a query for cache-key derivation. Queries differing only in
/// case or surrounding whitespace collide by design.
fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Derive the cache key for a query; a pure function of the normalized text
pub fn query_cache_key(query: &str) -> String {
    format!("{QUERY_CACHE_PREFIX}{}", normalize_query(query))
}

/// The central RAG orchestrator.
///
/// All collaborators are injected so the pipeline can run against fakes in
/// tests; clones of the `Arc`s are shared freely across requests.
pub struct RagPipeline {
    cache: Arc<dyn Cache>,
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorSearch>,
    generator: Arc<dyn Generator>,
}

impl RagPipeline {
    pub fn new(
        cache: Arc<dyn Cache>,
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn VectorSearch>,
        generator: Arc<dyn Generator>,
    ) -> Self {
        Self {
            cache,
            embedder,
            index,
            generator,
        }
    }

    /// Run one query through the pipeline.
    ///
    /// A cache hit skips retrieval and generation entirely. On a miss the
    /// steps run strictly sequentially and any provider failure aborts the
    /// request; nothing is cached for failed attempts. Cache writes are
    /// best-effort since the answer has already been computed.
    ///
    /// # Errors
    /// - `Validation` for an empty or whitespace-only query
    /// - `Embedding` / `Retrieval` / `Generation` for provider failures
    pub async fn run_query(&self, query: &str) -> Result<AnswerPayload> {
        if query.trim().is_empty() {
            return Err(NewsRagError::Validation("query is required".to_string()));
        }

        info!("Processing RAG query: {query}");

        let key = query_cache_key(query);
        if let Some(raw) = self.cache.get(&key).await {
            match serde_json::from_str::<AnswerPayload>(&raw) {
                Ok(mut payload) => {
                    debug!("Cache hit for {key}");
                    payload.cached = true;
                    return Ok(payload);
                }
                // Corrupt cached JSON is a miss, never a caller-visible error
                Err(e) => debug!("Discarding corrupt cache entry {key}: {e}"),
            }
        }

        debug!("Step 1: embedding query");
        let vector = self.embedder.embed(query, RETRIEVAL_QUERY_TASK).await?;

        debug!("Step 2: retrieving documents");
        let points = self.index.search(&vector, RETRIEVAL_LIMIT).await?;
        debug!("Retrieved {} results", points.len());

        let context = build_context(&points);

        debug!("Step 3: generating answer");
        let answer = self.generator.generate(query, &context).await?;

        let payload = AnswerPayload {
            answer,
            sources: points,
            cached: false,
        };

        match serde_json::to_string(&payload) {
            Ok(raw) => self.cache.set(&key, &raw, QUERY_CACHE_TTL).await,
            Err(e) => warn!("Skipping cache write for {key}: {e}"),
        }

        Ok(payload)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Counting fakes for the pipeline's collaborators

    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::embeddings::Embedder;
    use crate::errors::Result;
    use crate::llm::Generator;
    use crate::models::RetrievedPoint;
    use crate::vector::VectorSearch;

    #[derive(Default)]
    pub struct CountingEmbedder {
        pub calls: AtomicUsize,
    }

    #[async_trait]
    impl Embedder for CountingEmbedder {
        async fn embed(&self, _text: &str, _task: &str) -> Result<Vec<f32>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![0.1, 0.2, 0.3])
        }
    }

    pub struct FixedIndex {
        pub points: Vec<RetrievedPoint>,
        pub calls: AtomicUsize,
    }

    impl FixedIndex {
        pub fn returning(points: Vec<RetrievedPoint>) -> Self {
            Self {
                points,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn empty() -> Self {
            Self::returning(Vec::new())
        }
    }

    #[async_trait]
    impl VectorSearch for FixedIndex {
        async fn search(&self, _vector: &[f32], limit: usize) -> Result<Vec<RetrievedPoint>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.points.iter().take(limit).cloned().collect())
        }
    }

    #[derive(Default)]
    pub struct EchoGenerator {
        pub calls: AtomicUsize,
        pub last_context: Mutex<Option<String>>,
    }

    #[async_trait]
    impl Generator for EchoGenerator {
        async fn generate(&self, query: &str, context: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_context.lock().unwrap() = Some(context.to_string());
            Ok(format!("answer to: {query}"))
        }
    }

    pub fn article(id: u64, title: &str, text: &str) -> RetrievedPoint {
        RetrievedPoint {
            id: serde_json::json!(id),
            score: 0.9,
            payload: serde_json::json!({"title": title, "text": text}),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    use super::test_support::article;
    use super::test_support::CountingEmbedder;
    use super::test_support::EchoGenerator;
    use super::test_support::FixedIndex;
    use super::*;
    use crate::cache::test_support::MemoryCache;
    use crate::config::LlmConfig;
    use crate::llm::GeminiClient;
    use crate::llm::MODEL_NOT_CONFIGURED_ANSWER;
    use crate::rag::context::NO_RESULTS_CONTEXT;

    struct Fixture {
        cache: Arc<MemoryCache>,
        embedder: Arc<CountingEmbedder>,
        index: Arc<FixedIndex>,
        generator: Arc<EchoGenerator>,
        pipeline: RagPipeline,
    }

    fn fixture_with_index(index: FixedIndex) -> Fixture {
        let cache = Arc::new(MemoryCache::new());
        let embedder = Arc::new(CountingEmbedder::default());
        let index = Arc::new(index);
        let generator = Arc::new(EchoGenerator::default());
        let pipeline = RagPipeline::new(
            cache.clone(),
            embedder.clone(),
            index.clone(),
            generator.clone(),
        );
        Fixture {
            cache,
            embedder,
            index,
            generator,
            pipeline,
        }
    }

    fn fixture() -> Fixture {
        fixture_with_index(FixedIndex::returning(vec![article(
            1,
            "Rate decision",
            "The central bank held rates steady.",
        )]))
    }

    #[test]
    fn cache_key_is_pure_over_normalized_query() {
        assert_eq!(query_cache_key("  Fed Rates  "), "rag:news:fed rates");
        assert_eq!(query_cache_key("fed rates"), "rag:news:fed rates");
        assert_eq!(query_cache_key("FED RATES"), query_cache_key("fed rates"));
    }

    #[tokio::test]
    async fn second_call_is_served_from_cache() {
        let f = fixture();

        let first = f.pipeline.run_query("what about rates?").await.unwrap();
        assert!(!first.cached);

        let second = f.pipeline.run_query("what about rates?").await.unwrap();
        assert!(second.cached);
        assert_eq!(second.answer, first.answer);
        assert_eq!(second.sources, first.sources);

        // Retrieval and generation ran exactly once
        assert_eq!(f.embedder.calls.load(Ordering::SeqCst), 1);
        assert_eq!(f.index.calls.load(Ordering::SeqCst), 1);
        assert_eq!(f.generator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn queries_equal_after_normalization_share_an_entry() {
        let f = fixture();

        let first = f.pipeline.run_query("  Fed Rates ").await.unwrap();
        let second = f.pipeline.run_query("fed rates").await.unwrap();

        assert!(!first.cached);
        assert!(second.cached);
        assert_eq!(f.embedder.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_retrieval_feeds_sentinel_context_to_generator() {
        let f = fixture_with_index(FixedIndex::empty());

        let payload = f.pipeline.run_query("obscure question").await.unwrap();

        assert!(payload.sources.is_empty());
        assert!(!payload.cached);
        assert_eq!(
            f.generator.last_context.lock().unwrap().as_deref(),
            Some(NO_RESULTS_CONTEXT)
        );
    }

    #[tokio::test]
    async fn blank_query_is_rejected_before_any_provider_call() {
        let f = fixture();

        for query in ["", "   ", "\n\t"] {
            let err = f.pipeline.run_query(query).await.unwrap_err();
            assert!(matches!(err, NewsRagError::Validation(_)), "query {query:?}");
        }

        assert_eq!(f.embedder.calls.load(Ordering::SeqCst), 0);
        assert_eq!(f.index.calls.load(Ordering::SeqCst), 0);
        assert_eq!(f.generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn corrupt_cache_entry_is_treated_as_miss() {
        let f = fixture();
        f.cache
            .insert_raw(&query_cache_key("broken entry"), "{not json");

        let payload = f.pipeline.run_query("broken entry").await.unwrap();
        assert!(!payload.cached);
        assert_eq!(f.embedder.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn stored_cached_flag_is_overridden_on_read() {
        let f = fixture();
        // Simulate a stored payload that (incorrectly) carries cached=true
        let stored = AnswerPayload {
            answer: "stale".to_string(),
            sources: Vec::new(),
            cached: true,
        };
        f.cache.insert_raw(
            &query_cache_key("tagged"),
            &serde_json::to_string(&stored).unwrap(),
        );

        let payload = f.pipeline.run_query("tagged").await.unwrap();
        assert!(payload.cached);
        assert_eq!(payload.answer, "stale");
        assert_eq!(f.embedder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unconfigured_generator_degrades_but_pipeline_completes() {
        let cache = Arc::new(MemoryCache::new());
        let index = Arc::new(FixedIndex::returning(vec![article(
            7,
            "Elections",
            "Results were certified.",
        )]));
        let generator = Arc::new(GeminiClient::new(&LlmConfig::default()).unwrap());
        let pipeline = RagPipeline::new(
            cache,
            Arc::new(CountingEmbedder::default()),
            index,
            generator,
        );

        let payload = pipeline.run_query("who won?").await.unwrap();
        assert_eq!(payload.answer, MODEL_NOT_CONFIGURED_ANSWER);
        assert!(!payload.cached);
        assert_eq!(payload.sources.len(), 1);
    }
}
