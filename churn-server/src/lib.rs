//! Churn prediction service
//!
//! Thin HTTP wrapper over a persisted model artifact: the artifact is
//! loaded exactly once at startup (a missing or unreadable artifact aborts
//! the process before the listener binds) and shared read-only by every
//! request.

mod error;
mod handlers;
mod state;

pub use error::ServerError;
pub use state::AppState;

use anyhow::Context;
use axum::routing::{get, post};
use axum::Router;
use churn_core::model::ChurnModel;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub model_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            model_path: PathBuf::from("models/churn_model.json"),
        }
    }
}

/// Build the application router.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/predict", post(handlers::predict))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server with the given configuration.
///
/// Fails before binding if the model artifact cannot be loaded.
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let model = ChurnModel::load(&config.model_path).with_context(|| {
        format!(
            "failed to load model artifact from {}",
            config.model_path.display()
        )
    })?;
    info!(
        features = model.preprocessor().feature_names().len(),
        "loaded model artifact from {}",
        config.model_path.display()
    );

    let state = Arc::new(AppState::new(model));
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("churn prediction service listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.model_path, PathBuf::from("models/churn_model.json"));
    }

    #[tokio::test]
    async fn test_startup_without_artifact_fails() {
        let config = ServerConfig {
            model_path: PathBuf::from("does/not/exist.json"),
            ..Default::default()
        };
        assert!(run_server(config).await.is_err());
    }
}
