//! Per-session transcript persistence over the cache store

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;
use tracing::warn;

use crate::cache::Cache;

/// One turn of a session transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String, // "user" or "assistant"
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

fn session_key(session_id: &str) -> String {
    format!("session:{session_id}:messages")
}

/// Stores ordered transcripts keyed by client-supplied session id.
///
/// Transcripts are replaced wholesale on each save (read-modify-write at
/// the caller), with the TTL refreshed every time. Concurrent saves for one
/// session are last-writer-wins.
pub struct SessionStore {
    cache: Arc<dyn Cache>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(cache: Arc<dyn Cache>, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    /// Load a session's transcript. An absent session is an empty
    /// transcript, never an error; corrupt stored JSON is discarded.
    pub async fn history(&self, session_id: &str) -> Vec<ChatMessage> {
        let key = session_key(session_id);
        let Some(raw) = self.cache.get(&key).await else {
            return Vec::new();
        };
        match serde_json::from_str(&raw) {
            Ok(messages) => messages,
            Err(e) => {
                warn!("Failed to parse session history for {key}: {e}");
                Vec::new()
            }
        }
    }

    /// Persist the full transcript with a refreshed TTL
    pub async fn save(&self, session_id: &str, messages: &[ChatMessage]) {
        let key = session_key(session_id);
        match serde_json::to_string(messages) {
            Ok(raw) => self.cache.set(&key, &raw, self.ttl).await,
            Err(e) => warn!("Skipping session save for {key}: {e}"),
        }
    }

    /// Delete the stored transcript. Idempotent: clearing an absent session
    /// succeeds.
    pub async fn clear(&self, session_id: &str) {
        self.cache.delete(&session_key(session_id)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::test_support::MemoryCache;

    fn store() -> (Arc<MemoryCache>, SessionStore) {
        let cache = Arc::new(MemoryCache::new());
        let store = SessionStore::new(cache.clone(), Duration::from_secs(3600));
        (cache, store)
    }

    #[tokio::test]
    async fn absent_session_is_an_empty_transcript() {
        let (_, store) = store();
        assert!(store.history("nobody").await.is_empty());
    }

    #[tokio::test]
    async fn save_then_load_preserves_order() {
        let (_, store) = store();
        let messages = vec![
            ChatMessage::user("hi"),
            ChatMessage::assistant("hello"),
        ];
        store.save("s1", &messages).await;
        assert_eq!(store.history("s1").await, messages);
    }

    #[tokio::test]
    async fn clear_then_history_is_empty() {
        let (_, store) = store();
        store.save("s1", &[ChatMessage::user("hi")]).await;
        store.clear("s1").await;
        assert!(store.history("s1").await.is_empty());

        // Clearing an absent session is fine
        store.clear("s1").await;
    }

    #[tokio::test]
    async fn corrupt_transcript_is_discarded() {
        let (cache, store) = store();
        cache.insert_raw("session:s1:messages", "[{bad json");
        assert!(store.history("s1").await.is_empty());
    }
}
