// embedded front-end handlers

use axum::{
    body::Body,
    extract::Path,
    http::{header, StatusCode},
    response::Response,
};
use rust_embed::RustEmbed;
use tracing::{debug, warn};

#[derive(RustEmbed)]
#[folder = "assets/"]
#[include = "*.html"]
#[include = "*.js"]
#[include = "*.css"]
#[include = "*.svg"]
pub struct FrontendAssets;

const INDEX: &str = "index.html";

/// serve the upload page
pub async fn serve_index() -> Result<Response, StatusCode> {
    serve_embedded(INDEX)
}

/// serve any other bundled asset by path
pub async fn serve_static_asset(Path(asset_path): Path<String>) -> Result<Response, StatusCode> {
    let asset_path = asset_path.trim_start_matches('/');
    if asset_path.is_empty() {
        return serve_embedded(INDEX);
    }
    serve_embedded(asset_path)
}

fn serve_embedded(asset_path: &str) -> Result<Response, StatusCode> {
    debug!("serving static asset: {}", asset_path);

    let asset = FrontendAssets::get(asset_path).ok_or_else(|| {
        debug!("static asset not found: {}", asset_path);
        StatusCode::NOT_FOUND
    })?;

    let mime_type = mime_guess::from_path(asset_path).first_or_octet_stream();

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, mime_type.as_ref())
        .header(header::CONTENT_LENGTH, asset.data.len())
        .body(Body::from(asset.data.into_owned()))
        .map_err(|e| {
            warn!("failed to build asset response: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}
