// configuration type definitions

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// command line interface definition
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "skicka", version = env!("CARGO_PKG_VERSION"))]
#[command(about = "drop files onto a machine over http")]
pub struct Cli {
    /// directory uploaded files are written to
    #[arg(short = 'm', long, env = "SKICKA_MEDIA_DIR")]
    pub media_dir: Option<PathBuf>,

    /// host to listen on
    #[arg(short = 'l', long, env = "SKICKA_HOST")]
    pub host: Option<String>,

    /// port to listen on
    #[arg(short = 'p', long, env = "SKICKA_PORT")]
    pub port: Option<u16>,

    /// what to do when an uploaded name is taken (rename, reject)
    #[arg(long, env = "SKICKA_CONFLICT_POLICY")]
    pub conflict_policy: Option<ConflictPolicy>,

    /// enable debug logging
    #[arg(long, env = "SKICKA_DEBUG")]
    pub debug: bool,

    /// log output format (json, compact)
    #[arg(long, env = "SKICKA_LOG_FORMAT")]
    pub log_format: Option<LogFormat>,

    /// config file to use
    #[arg(short = 'c', long, env = "SKICKA_CONFIG")]
    pub config_file: Option<PathBuf>,

    /// print the effective configuration as toml and exit
    #[arg(long)]
    pub print_config: bool,

    /// increase verbosity (-v, -vv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// decrease verbosity (-q, -qq)
    #[arg(short = 'q', long, action = clap::ArgAction::Count)]
    pub quiet: u8,
}

/// complete application configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub upload: UploadConfig,
    pub logging: LoggingConfig,
}

/// listener configuration section
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// file upload configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct UploadConfig {
    #[serde(default = "default_media_dir")]
    pub media_dir: PathBuf,
    #[serde(default)]
    pub conflict_policy: ConflictPolicy,
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub debug: bool,
    #[serde(default)]
    pub format: LogFormat,
}

/// how an upload is stored when its name is already taken in the media dir
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// store under `name(0).ext`, `name(1).ext`, ... using the first free index
    #[default]
    RenameOnConflict,
    /// refuse the upload and leave the directory untouched
    RejectOnConflict,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Json,
    Compact,
}

impl std::str::FromStr for ConflictPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rename" | "rename_on_conflict" => Ok(ConflictPolicy::RenameOnConflict),
            "reject" | "reject_on_conflict" => Ok(ConflictPolicy::RejectOnConflict),
            _ => Err(format!("invalid conflict policy: {s}")),
        }
    }
}

impl fmt::Display for ConflictPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictPolicy::RenameOnConflict => f.write_str("rename_on_conflict"),
            ConflictPolicy::RejectOnConflict => f.write_str("reject_on_conflict"),
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "compact" => Ok(LogFormat::Compact),
            _ => Err(format!("invalid log format: {s}")),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            media_dir: default_media_dir(),
            conflict_policy: ConflictPolicy::default(),
            max_file_size: default_max_file_size(),
        }
    }
}

// default value functions for serde
fn default_media_dir() -> PathBuf {
    PathBuf::from("/tmp/skicka")
}

fn default_max_file_size() -> u64 {
    1024 * 1024 * 1024 // 1 GiB
}
