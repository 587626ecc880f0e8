//! Multi-turn chat over the RAG pipeline

use std::sync::Arc;

use serde::Serialize;

use crate::errors::Result;
use crate::models::RetrievedPoint;
use crate::rag::RagPipeline;
use crate::session::ChatMessage;
use crate::session::SessionStore;

/// Result of one chat turn, including the updated transcript
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatOutcome {
    pub session_id: String,
    pub answer: String,
    pub history: Vec<ChatMessage>,
    pub sources: Vec<RetrievedPoint>,
    pub cached: bool,
}

/// Orchestrates session transcripts around the RAG pipeline.
///
/// Each turn is answered from the current message alone; prior turns are a
/// display record only and are not fed into the prompt.
pub struct ChatService {
    pipeline: Arc<RagPipeline>,
    sessions: SessionStore,
}

impl ChatService {
    pub fn new(pipeline: Arc<RagPipeline>, sessions: SessionStore) -> Self {
        Self { pipeline, sessions }
    }

    /// Process one chat turn: load transcript, append the user message, run
    /// the pipeline, append the answer, persist with a refreshed TTL.
    ///
    /// The transcript save is read-modify-write without locking; concurrent
    /// turns on one session are last-writer-wins.
    ///
    /// # Errors
    /// Pipeline failures propagate and nothing is persisted for the turn.
    pub async fn process_chat(&self, session_id: &str, user_message: &str) -> Result<ChatOutcome> {
        let mut history = self.sessions.history(session_id).await;
        history.push(ChatMessage::user(user_message));

        let result = self.pipeline.run_query(user_message).await?;

        history.push(ChatMessage::assistant(&result.answer));
        self.sessions.save(session_id, &history).await;

        Ok(ChatOutcome {
            session_id: session_id.to_string(),
            answer: result.answer,
            history,
            sources: result.sources,
            cached: result.cached,
        })
    }

    pub async fn history(&self, session_id: &str) -> Vec<ChatMessage> {
        self.sessions.history(session_id).await
    }

    pub async fn clear_history(&self, session_id: &str) {
        self.sessions.clear(session_id).await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    use super::*;
    use crate::cache::test_support::MemoryCache;
    use crate::errors::NewsRagError;
    use crate::rag::pipeline::test_support::article;
    use crate::rag::pipeline::test_support::CountingEmbedder;
    use crate::rag::pipeline::test_support::EchoGenerator;
    use crate::rag::pipeline::test_support::FixedIndex;

    fn service() -> (Arc<CountingEmbedder>, ChatService) {
        let cache = Arc::new(MemoryCache::new());
        let embedder = Arc::new(CountingEmbedder::default());
        let pipeline = Arc::new(RagPipeline::new(
            cache.clone(),
            embedder.clone(),
            Arc::new(FixedIndex::returning(vec![article(1, "Title", "Body")])),
            Arc::new(EchoGenerator::default()),
        ));
        let sessions = SessionStore::new(cache, Duration::from_secs(3600));
        (embedder, ChatService::new(pipeline, sessions))
    }

    #[tokio::test]
    async fn two_turns_append_four_ordered_messages() {
        let (_, chat) = service();

        let first = chat.process_chat("s1", "first question").await.unwrap();
        assert_eq!(first.history.len(), 2);

        let second = chat.process_chat("s1", "second question").await.unwrap();
        let roles: Vec<&str> = second.history.iter().map(|m| m.role.as_str()).collect();
        assert_eq!(roles, ["user", "assistant", "user", "assistant"]);
        assert_eq!(second.history[0].content, "first question");
        assert_eq!(second.history[2].content, "second question");

        // Persisted transcript matches the returned one
        assert_eq!(chat.history("s1").await, second.history);
    }

    #[tokio::test]
    async fn repeated_question_is_served_from_cache() {
        let (embedder, chat) = service();

        let first = chat.process_chat("s1", "same question").await.unwrap();
        let second = chat.process_chat("s2", "same question").await.unwrap();

        assert!(!first.cached);
        assert!(second.cached);
        assert_eq!(second.answer, first.answer);
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn clear_history_empties_the_session() {
        let (_, chat) = service();
        chat.process_chat("s1", "a question").await.unwrap();
        chat.clear_history("s1").await;
        assert!(chat.history("s1").await.is_empty());
    }

    #[tokio::test]
    async fn failed_turn_persists_nothing() {
        let (_, chat) = service();
        let err = chat.process_chat("s1", "   ").await.unwrap_err();
        assert!(matches!(err, NewsRagError::Validation(_)));
        assert!(chat.history("s1").await.is_empty());
    }

    #[tokio::test]
    async fn sessions_are_isolated() {
        let (_, chat) = service();
        chat.process_chat("s1", "q1").await.unwrap();
        chat.process_chat("s2", "q2").await.unwrap();

        let h1 = chat.history("s1").await;
        let h2 = chat.history("s2").await;
        assert_eq!(h1.len(), 2);
        assert_eq!(h2.len(), 2);
        assert_eq!(h1[0].content, "q1");
        assert_eq!(h2[0].content, "q2");
    }
}
