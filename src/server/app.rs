// axum application setup and server startup

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::{
    handlers::{
        assets::{serve_index, serve_static_asset},
        upload::handle_upload_request,
    },
    media::prepare_media_dir,
};
use crate::config::AppConfig;
use crate::utils::net::local_ip_display;

/// shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

/// create the axum application with all routes and middleware
pub fn create_app(config: AppConfig) -> Router {
    let app_state = AppState::new(config);

    Router::new()
        // uploads stream to disk; the size cap is enforced while copying
        .route(
            "/upload",
            post(handle_upload_request).layer(DefaultBodyLimit::disable()),
        )
        // bundled front-end
        .route("/", get(serve_index))
        .route("/*path", get(serve_static_asset))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(app_state)
}

/// prepare the media dir, bind, and serve until the listener fails
pub async fn start_server(config: AppConfig) -> Result<()> {
    prepare_media_dir(&config.upload.media_dir)
        .await
        .context("unable to init media dir")?;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("invalid host/port combination")?;

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        address = %addr,
        local_ip = %local_ip_display(),
        port = config.server.port,
        media_dir = %config.upload.media_dir.display(),
        conflict_policy = %config.upload.conflict_policy,
        "skicka listening"
    );

    let app = create_app(config);
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
