//! Main Gateway implementation
//!
//! HTTP server exposing book chat and the transformation workflows.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::any::Any;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use bookgpt_core::book::BookLibrary;
use bookgpt_core::pipeline::GenerationPipeline;
use bookgpt_core::provider::ProviderChain;
use bookgpt_core::workflows::{
    ChatWorkflow, MissionVisionRevisionWorkflow, MissionVisionWorkflow,
    StakeholderRevisionWorkflow, StakeholderWorkflow,
};
use bookgpt_providers::ProviderRouter;

use crate::api::INTERNAL_ERROR;
use crate::config::GatewayConfig;
use crate::handlers;
use crate::{GatewayError, Result};

/// Gateway state shared across handlers
pub struct GatewayState {
    pub config: GatewayConfig,
    pub library: Arc<BookLibrary>,
    pub pipeline: GenerationPipeline,
    pub chat: ChatWorkflow,
    pub mission_vision: MissionVisionWorkflow,
    pub mission_vision_revision: MissionVisionRevisionWorkflow,
    pub stakeholder: StakeholderWorkflow,
    pub stakeholder_revision: StakeholderRevisionWorkflow,
}

impl GatewayState {
    /// State around an already assembled provider chain
    pub fn new(config: GatewayConfig, library: BookLibrary, chain: ProviderChain) -> Self {
        Self {
            chat: ChatWorkflow::new(),
            mission_vision: MissionVisionWorkflow::new(&library),
            mission_vision_revision: MissionVisionRevisionWorkflow::new(&library),
            stakeholder: StakeholderWorkflow::new(&library),
            stakeholder_revision: StakeholderRevisionWorkflow::new(&library),
            pipeline: GenerationPipeline::new(Arc::new(chain)),
            library: Arc::new(library),
            config,
        }
    }

    /// Build the provider chain the configuration asks for
    pub fn from_config(config: GatewayConfig) -> Result<Self> {
        let router = if config.mock_mode {
            ProviderRouter::mock()
        } else if let Some(path) = &config.llm_config_path {
            ProviderRouter::from_config_file(path)
                .map_err(|e| GatewayError::InvalidConfig(format!("{:#}", e)))?
        } else {
            ProviderRouter::from_env().map_err(|e| GatewayError::InvalidConfig(format!("{:#}", e)))?
        };

        tracing::info!(
            "Provider chain: [{}] (mock mode: {})",
            router.names().join(", "),
            config.mock_mode
        );

        let chain = router.into_chain(config.provider_timeout());
        Ok(Self::new(config, BookLibrary::builtin(), chain))
    }
}

/// Main Gateway
pub struct Gateway {
    state: Arc<GatewayState>,
}

impl Gateway {
    /// Create a new gateway with configuration
    pub fn new(config: GatewayConfig) -> Result<Self> {
        Ok(Self::with_state(GatewayState::from_config(config)?))
    }

    pub fn with_state(state: GatewayState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    /// Get gateway state
    pub fn state(&self) -> Arc<GatewayState> {
        self.state.clone()
    }

    /// Build the Axum router
    pub fn build_router(&self) -> Router {
        Router::new()
            .route("/health", get(Self::handle_health))
            .route("/test", get(Self::handle_test))
            .route("/status", get(Self::handle_status))
            .route("/api/books", get(Self::handle_books))
            .route("/api/chat", post(handlers::chat::chat))
            .route("/api/chat/stream", post(handlers::chat::chat_stream))
            .route("/api/mission-vision", post(handlers::mission_vision::generate))
            .route("/api/mission-vision/revise", post(handlers::revision::revise_mission_vision))
            .route("/api/stakeholder-motivation", post(handlers::stakeholder::generate))
            .route(
                "/api/stakeholder-motivation/revise",
                post(handlers::revision::revise_stakeholder),
            )
            .layer(CatchPanicLayer::custom(panic_response))
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Start the gateway server, stopping on Ctrl+C
    pub async fn start(&self) -> Result<()> {
        let addr = self.state.config.socket_addr()?;
        let router = self.build_router();

        tracing::info!("📚 BookGPT Gateway starting on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Gateway stopped");
        Ok(())
    }

    // HTTP handlers

    async fn handle_health() -> impl IntoResponse {
        Json(serde_json::json!({
            "status": "healthy",
            "version": crate::VERSION
        }))
    }

    async fn handle_test() -> impl IntoResponse {
        Json(serde_json::json!({
            "message": "Server is working!",
            "timestamp": chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
        }))
    }

    async fn handle_status(State(state): State<Arc<GatewayState>>) -> impl IntoResponse {
        let chain = state.pipeline.chain();
        Json(serde_json::json!({
            "version": crate::VERSION,
            "mockMode": state.config.mock_mode,
            "providers": chain.statuses(),
            "providerTimeoutSecs": chain.attempt_timeout().as_secs(),
        }))
    }

    async fn handle_books(State(state): State<Arc<GatewayState>>) -> impl IntoResponse {
        Json(state.library.books().to_vec())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Gateway shutdown initiated");
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = handlers::panic_message(panic.as_ref());
    tracing::error!("Handler panicked: {}", detail);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(header::CONTENT_TYPE, "application/json")],
        serde_json::json!({ "success": false, "error": INTERNAL_ERROR }).to_string(),
    )
        .into_response()
}
