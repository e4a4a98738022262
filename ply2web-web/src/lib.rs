//! Browser front end for ply2web
//!
//! Serves a single page that shows the current scene as server-rendered
//! frames and accepts PLY files by drag-and-drop. An upload is stored in a
//! scoped temporary file, read back, and added to the scene under its file
//! name.

pub mod browser;
pub mod error;
pub mod handlers;
pub mod upload;

pub use error::ApiError;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use ply2web_core::Result;
use ply2web_visualization::Plotter;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Largest accepted upload
pub const MAX_UPLOAD_BYTES: usize = 1024 * 1024 * 1024;

/// Where and how to serve
#[derive(Debug, Clone, PartialEq)]
pub struct ServeConfig {
    pub bind: String,
    pub port: u16,
    pub open_browser: bool,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 38080,
            open_browser: false,
        }
    }
}

impl ServeConfig {
    /// URL a local browser should open
    pub fn local_url(&self, port: u16) -> String {
        let host = match self.bind.as_str() {
            "0.0.0.0" | "::" | "" => "localhost",
            host => host,
        };
        if host.contains(':') {
            format!("http://[{}]:{}/", host, port)
        } else {
            format!("http://{}:{}/", host, port)
        }
    }
}

/// State shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub plotter: Arc<Mutex<Plotter>>,
}

impl AppState {
    pub fn new(plotter: Plotter) -> Self {
        Self {
            plotter: Arc::new(Mutex::new(plotter)),
        }
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/render.png", get(handlers::render))
        .route("/api/stats", get(handlers::stats))
        .route("/api/upload", post(handlers::upload))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

/// HTTP server around a plotter
pub struct WebServer {
    state: AppState,
    config: ServeConfig,
}

impl WebServer {
    pub fn new(plotter: Plotter, config: ServeConfig) -> Self {
        Self {
            state: AppState::new(plotter),
            config,
        }
    }

    /// Bind and serve until Ctrl-C
    pub async fn serve(self) -> Result<()> {
        let listener =
            tokio::net::TcpListener::bind((self.config.bind.as_str(), self.config.port)).await?;
        let local = listener.local_addr()?;
        let url = self.config.local_url(local.port());
        log::info!("serving on http://{} ({})", local, url);

        if self.config.open_browser {
            browser::open(&url);
        }

        axum::serve(listener, router(self.state))
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        log::info!("server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
