// shared test helpers
#![allow(dead_code)] // helpers are shared across multiple integration test crates

use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use skicka::{
    config::{AppConfig, ConflictPolicy, UploadConfig},
    server::app::create_app,
};
use std::path::Path;

pub const BOUNDARY: &str = "----skicka-boundary";

pub fn base_config(media_dir: &Path) -> AppConfig {
    AppConfig {
        upload: UploadConfig {
            media_dir: media_dir.to_path_buf(),
            ..Default::default()
        },
        ..Default::default()
    }
}

pub fn policy_config(media_dir: &Path, conflict_policy: ConflictPolicy) -> AppConfig {
    let mut config = base_config(media_dir);
    config.upload.conflict_policy = conflict_policy;
    config
}

pub fn app(config: AppConfig) -> axum::Router {
    create_app(config)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// a single-part body carrying `content` under `field` as `filename`
pub fn multipart_field(boundary: &str, field: &str, filename: &str, content: &[u8]) -> Vec<u8> {
    [
        format!("--{boundary}\r\n").as_bytes(),
        format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n")
            .as_bytes(),
        b"Content-Type: application/octet-stream\r\n\r\n",
        content,
        format!("\r\n--{boundary}--\r\n").as_bytes(),
    ]
    .concat()
}

pub fn multipart_body(boundary: &str, filename: &str, content: &[u8]) -> Vec<u8> {
    multipart_field(boundary, "file", filename, content)
}

/// a body with one plain text field and no file part
pub fn multipart_text_only(boundary: &str, name: &str, value: &str) -> Vec<u8> {
    format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n--{boundary}--\r\n"
    )
    .into_bytes()
}

pub fn multipart_request(uri: &str, boundary: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .header(header::CONTENT_LENGTH, body.len())
        .body(Body::from(body))
        .unwrap()
}

pub fn upload_request(filename: &str, content: &[u8]) -> Request<Body> {
    multipart_request("/upload", BOUNDARY, multipart_body(BOUNDARY, filename, content))
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_string(response: Response) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

/// responses carry a bare json string
pub async fn body_message(response: Response) -> String {
    serde_json::from_slice::<String>(&body_bytes(response).await).unwrap()
}

pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
