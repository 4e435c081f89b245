//! Application startup and lifecycle management.

use axum::{
    extract::State,
    http::StatusCode,
    middleware::from_fn,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::GatewayConfig;
use crate::error::AppError;
use crate::handlers::{chat, images, keywords, metrics};
use crate::middleware::metrics::metrics_middleware;
use crate::services::metrics::init_metrics;
use crate::services::providers::modelslab::ModelsLabProvider;
use crate::services::providers::openai::OpenAiProvider;
use crate::services::providers::stable_diffusion::StableDiffusionProvider;
use crate::services::Database;

/// Shared application state, threaded through every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub openai: OpenAiProvider,
    pub stable_diffusion: StableDiffusionProvider,
    pub modelslab: ModelsLabProvider,
}

/// Health check endpoint for liveness probes.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.db.health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "service": "genai-gateway",
                "version": env!("CARGO_PKG_VERSION")
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "unhealthy",
                "service": "genai-gateway",
                "error": e.to_string()
            })),
        ),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Build the router with every gateway route and the middleware stack.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics::metrics))
        .route("/dall-e-3", post(images::generate_image))
        .route("/text2img", post(images::text_to_image))
        .route("/text2img2", post(images::realtime_text_to_image))
        .route("/chat", post(chat::chat_completion))
        .route(
            "/keywords",
            get(keywords::list_keywords).post(keywords::add_keywords),
        )
        .route("/categories", get(keywords::list_categories))
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: GatewayConfig) -> Result<Self, AppError> {
        let db = Database::new(&config.database).await.map_err(|e| {
            tracing::error!("Failed to connect to PostgreSQL: {}", e);
            e
        })?;

        db.run_migrations().await.map_err(|e| {
            tracing::error!("Failed to run database migrations: {}", e);
            e
        })?;

        init_metrics();

        let openai = OpenAiProvider::new(config.openai.clone());
        tracing::info!(
            image_model = %config.openai.image_model,
            chat_model = %config.openai.chat_model,
            "Initialized OpenAI provider"
        );

        let stable_diffusion = StableDiffusionProvider::new(
            config.stable_diffusion.api_key.clone(),
            config.stable_diffusion.base_url.clone(),
        );
        let modelslab = ModelsLabProvider::new(
            config.stable_diffusion.api_key.clone(),
            config.stable_diffusion.modelslab_base_url.clone(),
        );
        tracing::info!(
            stable_diffusion = %config.stable_diffusion.base_url,
            modelslab = %config.stable_diffusion.modelslab_base_url,
            "Initialized Stable Diffusion providers"
        );

        let state = AppState {
            db,
            openai,
            stable_diffusion,
            modelslab,
        };

        // Bind listener (port 0 = random port for testing)
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Gateway listening on port {}", port);

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Get a reference to the database.
    pub fn db(&self) -> &Database {
        &self.state.db
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = build_router(self.state);
        axum::serve(self.listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}
