// configuration loading and merging logic

use anyhow::{Context, Result};
use figment::{
    providers::{Format, Serialized, Toml},
    Figment,
};
use serde::Serialize;
use std::path::PathBuf;

use super::types::{AppConfig, Cli, ConflictPolicy, LogFormat, LoggingConfig};

/// load and merge configuration from multiple sources
/// precedence: defaults < config file < cli arguments and environment
pub fn load_configuration(cli: &Cli) -> Result<AppConfig> {
    // start with default configuration
    let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

    // merge config file if provided
    if let Some(config_path) = &cli.config_file {
        if config_path.exists() {
            figment = figment.merge(Toml::file(config_path));
        } else {
            anyhow::bail!("config file not found: {}", config_path.display());
        }
    }

    // merge cli overrides - highest precedence
    figment = figment.merge(Serialized::defaults(CliOverrides::from(cli)));

    let config: AppConfig = figment.extract().context("failed to parse configuration")?;

    validate_configuration(&config)?;

    Ok(config)
}

/// render the effective configuration the way a config file would spell it
pub fn render_configuration(config: &AppConfig) -> Result<String> {
    toml::to_string_pretty(config).context("failed to render configuration")
}

/// logging settings available before any config file is read,
/// used to report failures of the configuration load itself
pub fn bootstrap_logging(cli: &Cli) -> LoggingConfig {
    LoggingConfig {
        debug: cli.debug,
        format: cli.log_format.unwrap_or_default(),
    }
}

// only the flags the user actually set, so unset flags never mask the file
#[derive(Serialize)]
struct CliOverrides {
    server: ServerOverrides,
    upload: UploadOverrides,
    logging: LoggingOverrides,
}

#[derive(Serialize)]
struct ServerOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    port: Option<u16>,
}

#[derive(Serialize)]
struct UploadOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    media_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    conflict_policy: Option<ConflictPolicy>,
}

#[derive(Serialize)]
struct LoggingOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    debug: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<LogFormat>,
}

impl From<&Cli> for CliOverrides {
    fn from(cli: &Cli) -> Self {
        Self {
            server: ServerOverrides {
                host: cli.host.clone(),
                port: cli.port,
            },
            upload: UploadOverrides {
                media_dir: cli.media_dir.clone(),
                conflict_policy: cli.conflict_policy,
            },
            logging: LoggingOverrides {
                debug: cli.debug.then_some(true),
                format: cli.log_format,
            },
        }
    }
}

/// validate configuration for consistency
fn validate_configuration(config: &AppConfig) -> Result<()> {
    if config.server.port == 0 {
        anyhow::bail!("port cannot be 0");
    }

    if config.upload.media_dir.as_os_str().is_empty() {
        anyhow::bail!("media directory cannot be empty");
    }

    if config.upload.max_file_size == 0 {
        anyhow::bail!("max_file_size must be greater than 0");
    }

    Ok(())
}
