//! skicka: a small http drop box.
//!
//! `POST /upload` stores a multipart `file` part in the media directory,
//! renaming (or rejecting) on name collisions; every other `GET` serves the
//! bundled upload page.

pub mod config;
pub mod logging;
pub mod server;
pub mod utils;
