use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    /// Full connection URL; takes precedence over host/port when set
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_redis_host")]
    pub host: String,
    #[serde(default = "default_redis_port")]
    pub port: u16,
    /// TTL applied to session transcripts on every save
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: u64,
}

fn default_redis_host() -> String {
    "localhost".to_string()
}

fn default_redis_port() -> u16 {
    6379
}

fn default_session_ttl() -> u64 {
    3600
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: default_redis_host(),
            port: default_redis_port(),
            session_ttl_secs: default_session_ttl(),
        }
    }
}

impl RedisConfig {
    /// Get the effective connection URL
    pub fn resolve_url(&self) -> String {
        resolve_connection_url(self.url.as_deref(), "redis", &self.host, self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QdrantConfig {
    /// Full endpoint URL; takes precedence over host/port when set
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_qdrant_host")]
    pub host: String,
    #[serde(default = "default_qdrant_port")]
    pub port: u16,
    #[serde(default = "default_collection")]
    pub collection: String,
}

fn default_qdrant_host() -> String {
    "qdrant".to_string()
}

fn default_qdrant_port() -> u16 {
    6333
}

fn default_collection() -> String {
    "news_articles".to_string()
}

impl Default for QdrantConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: default_qdrant_host(),
            port: default_qdrant_port(),
            collection: default_collection(),
        }
    }
}

impl QdrantConfig {
    /// Get the effective endpoint URL
    pub fn resolve_url(&self) -> String {
        resolve_connection_url(self.url.as_deref(), "http", &self.host, self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingsConfig {
    /// Jina API key; required in a production deployment
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_embedding_model")]
    pub model: String,
    #[serde(default = "default_embedding_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_embedding_timeout")]
    pub timeout_secs: u64,
}

fn default_embedding_model() -> String {
    "jina-embeddings-v4".to_string()
}

fn default_embedding_endpoint() -> String {
    "https://api.jina.ai/v1/embeddings".to_string()
}

fn default_embedding_timeout() -> u64 {
    20
}

impl Default for EmbeddingsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_embedding_model(),
            endpoint: default_embedding_endpoint(),
            timeout_secs: default_embedding_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Gemini API key; absence degrades generation instead of failing boot
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_llm_model")]
    pub model: String,
}

fn default_llm_model() -> String {
    "gemini-2.5-flash".to_string()
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_llm_model(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub redis: RedisConfig,
    #[serde(default)]
    pub qdrant: QdrantConfig,
    #[serde(default)]
    pub embeddings: EmbeddingsConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from the default config file path, then apply
    /// environment overrides on top
    pub fn load() -> crate::Result<Self> {
        let mut config = if Path::new("config.toml").exists() {
            Self::from_file("config.toml")?
        } else if Path::new("config.example.toml").exists() {
            tracing::warn!(
                "Using config.example.toml. Please create config.toml for production use."
            );
            Self::from_file("config.example.toml")?
        } else {
            Self::default()
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply environment-style overrides from a lookup function.
    ///
    /// Taking the lookup as a parameter keeps precedence behavior unit
    /// testable without mutating process environment.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(port) = get("BACKEND_PORT").or_else(|| get("PORT")) {
            if let Ok(port) = port.trim().parse() {
                self.server.port = port;
            }
        }

        if let Some(url) = get("REDIS_URL") {
            self.redis.url = Some(url);
        }
        if let Some(host) = get("REDIS_HOST") {
            self.redis.host = host;
        }
        if let Some(port) = get("REDIS_PORT") {
            if let Ok(port) = port.trim().parse() {
                self.redis.port = port;
            }
        }
        if let Some(ttl) = get("SESSION_TTL") {
            if let Ok(ttl) = ttl.trim().parse() {
                self.redis.session_ttl_secs = ttl;
            }
        }

        if let Some(url) = get("QDRANT_URL") {
            self.qdrant.url = Some(url);
        }
        if let Some(host) = get("QDRANT_HOST") {
            self.qdrant.host = host;
        }
        if let Some(port) = get("QDRANT_PORT") {
            if let Ok(port) = port.trim().parse() {
                self.qdrant.port = port;
            }
        }
        if let Some(collection) = get("QDRANT_COLLECTION") {
            self.qdrant.collection = collection;
        }

        if let Some(key) = get("JINA_API_KEY") {
            self.embeddings.api_key = Some(key);
        }
        if let Some(key) = get("GEMINI_API_KEY") {
            self.llm.api_key = Some(key);
        }
        if let Some(model) = get("GEMINI_MODEL") {
            self.llm.model = model;
        }

        if let Some(level) = get("LOG_LEVEL") {
            self.logging.level = level;
        }
    }

    /// Check required provider credentials.
    ///
    /// A missing embedding key is fatal at boot; a missing generation key
    /// only degrades answers, so it is reported but tolerated.
    pub fn validate(&self) -> crate::Result<()> {
        if self
            .embeddings
            .api_key
            .as_deref()
            .map_or(true, |k| k.trim().is_empty())
        {
            return Err(crate::NewsRagError::Config(
                "JINA_API_KEY is not set".to_string(),
            ));
        }
        if self.llm.api_key.is_none() {
            tracing::warn!("GEMINI_API_KEY is not set; answers will use the fallback response");
        }
        Ok(())
    }
}

/// Resolve a connection URL with enumerated precedence: an explicit full
/// URL always wins over host+port assembly.
fn resolve_connection_url(explicit: Option<&str>, scheme: &str, host: &str, port: u16) -> String {
    match explicit {
        Some(url) if !url.trim().is_empty() => url.trim().trim_end_matches('/').to_string(),
        _ => format!("{scheme}://{host}:{port}"),
    }
}
