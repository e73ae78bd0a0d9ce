//! HTTP server
//!
//! Builds the axum router over one shared [`Hub`] and runs it. Routes:
//! - `GET /sse`: streaming delivery endpoint
//! - `GET /chat?message=`: submission endpoint
//! - `GET /`, `GET /json`, `GET /echo?input=`: plain request/response pages
//! - anything else: a file from the static directory, or `404 Not Found`

use std::path::Path;

use axum::Router;
use axum::handler::HandlerWithoutStateExt;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::broker::Hub;
use crate::config::{Settings, StreamSettings};
use crate::transport::{routes, sse};
use crate::utils::{Error, Result};

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub hub: Hub,
    pub stream: StreamSettings,
}

impl AppState {
    pub fn new(hub: Hub, stream: StreamSettings) -> Self {
        Self { hub, stream }
    }
}

pub fn router(state: AppState, static_dir: impl AsRef<Path>) -> Router {
    let static_dir = static_dir.as_ref();
    let static_files =
        ServeDir::new(static_dir).fallback(routes::respond_not_found.into_service());

    Router::new()
        .route_service("/", ServeFile::new(static_dir.join("chat.html")))
        .route("/json", get(routes::respond_json))
        .route("/echo", get(routes::respond_echo))
        .route("/chat", get(routes::respond_chat))
        .route("/sse", get(sse::respond_sse))
        .fallback_service(static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn bind(addr: &str) -> Result<TcpListener> {
    TcpListener::bind(addr).await.map_err(|source| Error::Bind {
        addr: addr.to_string(),
        source,
    })
}

/// Serves on an already bound listener until the listener fails.
pub async fn serve(listener: TcpListener, hub: Hub, settings: &Settings) -> Result<()> {
    let app = router(
        AppState::new(hub, settings.stream.clone()),
        &settings.server.static_dir,
    );

    if let Ok(addr) = listener.local_addr() {
        info!("Server is listening on http://{addr}");
    }

    axum::serve(listener, app).await?;
    Ok(())
}

pub async fn start_http_server(hub: Hub, settings: Settings) -> Result<()> {
    let listener = bind(&settings.addr()).await?;
    serve(listener, hub, &settings).await
}
