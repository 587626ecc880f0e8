//! HTTP server implementation

use std::sync::Arc;
use std::time::Duration;

use axum::routing::get;
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::Any;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::handlers;
use crate::api::handlers::AppState;
use crate::api::routes;
use crate::cache::Cache;
use crate::cache::RedisCache;
use crate::chat::ChatService;
use crate::config::AppConfig;
use crate::embeddings::JinaClient;
use crate::llm::GeminiClient;
use crate::rag::RagPipeline;
use crate::session::SessionStore;
use crate::vector::QdrantClient;
use crate::Result;

/// Build the full application router with middleware
pub fn build_app(state: AppState) -> Router {
    let api_router = routes::api_routes(state.clone());

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .with_state(state)
        .nest("/api", api_router)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
}

/// Wire the provider clients together into shared application state.
///
/// # Errors
/// - Missing embedding credential (required at boot)
/// - HTTP client construction failures
pub fn init_state(config: &AppConfig) -> Result<AppState> {
    let cache: Arc<dyn Cache> = Arc::new(RedisCache::connect(&config.redis));
    let embedder = Arc::new(JinaClient::new(&config.embeddings)?);
    let index = Arc::new(QdrantClient::connect(&config.qdrant)?);
    let generator = Arc::new(GeminiClient::new(&config.llm)?);

    let pipeline = Arc::new(RagPipeline::new(
        cache.clone(),
        embedder,
        index,
        generator,
    ));
    let sessions = SessionStore::new(
        cache.clone(),
        Duration::from_secs(config.redis.session_ttl_secs),
    );
    let chat = Arc::new(ChatService::new(pipeline.clone(), sessions));

    Ok(AppState {
        pipeline,
        chat,
        cache,
        collection: config.qdrant.collection.clone(),
    })
}

/// Start the API server
pub async fn serve_api(config: &AppConfig) -> Result<()> {
    info!("Starting newsrag API server...");

    config.validate()?;
    let state = init_state(config)?;
    let app = build_app(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Backend listening on {addr}");

    axum::serve(listener, app).await?;
    Ok(())
}
