//! HTTP front end.
//!
//! Routes:
//!
//! | Route | Behavior |
//! |-------|----------|
//! | `GET /` | rescan every theme, rewrite manifests, return the index page |
//! | `GET /static/data/{file}` | stream a generated manifest, 404 if absent |
//! | `GET /static/images/{dir}/{file}` | stream an image asset, 404 if absent |
//!
//! Static files go through `tower_http`'s `ServeDir`, which picks the content
//! type, rejects paths escaping the served directory, and answers 404 for
//! missing files.
//!
//! Index requests are serialised on an async mutex so two regenerations never
//! interleave. The scan itself runs on the blocking pool, and the blocking task
//! owns the lock guard: a client that disconnects mid-request drops its handler
//! future, but the lock stays held until the regeneration finishes.

use crate::config::GalleryConfig;
use crate::manifest::{self, ManifestError};
use crate::page;
use crate::types::{DATA_URL_PREFIX, IMAGES_URL_PREFIX, StaticLayout};
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Shared application state.
pub struct AppState {
    config: GalleryConfig,
    layout: StaticLayout,
    /// Rendered once; the page does not vary per request.
    index_html: String,
    regenerate_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(config: GalleryConfig, layout: StaticLayout) -> Result<Self, serde_json::Error> {
        let index_html = page::render_index(&config)?.into_string();
        Ok(Self {
            config,
            layout,
            index_html,
            regenerate_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn config(&self) -> &GalleryConfig {
        &self.config
    }

    pub fn layout(&self) -> &StaticLayout {
        &self.layout
    }
}

/// Build the application router.
pub fn build_router(state: Arc<AppState>) -> Router {
    let data = ServeDir::new(state.layout.data_dir());
    let images = ServeDir::new(state.layout.images_dir());

    Router::new()
        .route("/", get(index))
        .nest_service(DATA_URL_PREFIX, data)
        .nest_service(IMAGES_URL_PREFIX, images)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Failure while serving a request. The client only ever sees a generic 500.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("manifest regeneration failed: {0}")]
    Manifest(#[from] ManifestError),
    #[error("manifest regeneration task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!(error = %self, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
    }
}

async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    let guard = Arc::clone(&state.regenerate_lock).lock_owned().await;

    let task_state = Arc::clone(&state);
    let summaries = tokio::task::spawn_blocking(move || {
        let _guard = guard;
        manifest::regenerate(&task_state.layout, &task_state.config.themes)
    })
    .await??;

    let images: usize = summaries.iter().map(|s| s.image_count).sum();
    info!(themes = summaries.len(), images, "manifests regenerated");

    Ok(Html(state.index_html.clone()))
}

/// Bind `addr` and serve until Ctrl+C or SIGTERM.
pub async fn run(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<()> {
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "gridwall listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received Ctrl+C, shutting down"),
        () = terminate => info!("received SIGTERM, shutting down"),
    }
}
