// logging setup: builds the subscriber, leaves installing it to the caller

use tracing::{level_filters::LevelFilter, Level, Subscriber};
use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggingConfig};

/// compute the effective level: info (default), debug when requested,
/// then shifted by the verbose/quiet counters
pub fn effective_level(config: &LoggingConfig, verbose_count: u8, quiet_count: u8) -> Level {
    let base_level = if config.debug { 3i8 } else { 2i8 };
    let adjustment = verbose_count as i8 - quiet_count as i8;
    let final_level = (base_level + adjustment).clamp(0, 4);

    match final_level {
        i8::MIN..=0 => Level::ERROR,
        1 => Level::WARN,
        2 => Level::INFO,
        3 => Level::DEBUG,
        4.. => Level::TRACE,
    }
}

/// build the structured logging subscriber; `RUST_LOG` wins over the computed level
pub fn build_subscriber(
    config: &LoggingConfig,
    verbose_count: u8,
    quiet_count: u8,
) -> Box<dyn Subscriber + Send + Sync> {
    let level = effective_level(config, verbose_count, quiet_count);
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    match config.format {
        LogFormat::Json => Box::new(
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .json()
                .flatten_event(true)
                .with_current_span(false)
                .finish(),
        ),
        LogFormat::Compact => Box::new(
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .compact()
                .finish(),
        ),
    }
}
