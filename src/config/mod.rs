// configuration module public api

pub mod loading;
pub mod types;

pub use loading::{bootstrap_logging, load_configuration, render_configuration};
pub use types::*;
