//! HTTP surface
//!
//! One handler set for translation and apply; route paths come from
//! configuration so differently prefixed deployments share the code.

pub mod handlers;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::apply::ApplyOrchestrator;
use crate::app::AppContext;
use crate::config::ServerConfig;
use crate::translate::TranslationOrchestrator;

/// Shared API state
pub struct ApiState {
    pub translation: Arc<TranslationOrchestrator>,
    pub apply: Arc<ApplyOrchestrator>,
}

pub struct ApiServer {
    state: Arc<ApiState>,
    config: ServerConfig,
}

impl ApiServer {
    pub fn new(context: &AppContext, config: ServerConfig) -> Self {
        let state = Arc::new(ApiState {
            translation: Arc::clone(&context.translation),
            apply: Arc::clone(&context.apply),
        });
        Self { state, config }
    }

    /// Bind the configured address and serve until the process stops
    pub async fn start(self) -> Result<()> {
        let listener = TcpListener::bind(self.config.bind).await?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener
    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        info!("Starting API server on {}", listener.local_addr()?);
        axum::serve(listener, self.router()).await?;
        Ok(())
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(handlers::health_check))
            .route(&self.config.translate_path, post(handlers::translate_files))
            .route(&self.config.apply_path, post(handlers::apply_terraform))
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .with_state(Arc::clone(&self.state))
    }
}
