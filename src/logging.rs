//! File logging. The terminal belongs to the TUI, so tracing output goes to
//! `bubbledash.log` in the cache directory.

use color_eyre::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cache::{CacheManager, LOG_FILE};
use crate::config::LoggingConfig;

/// Filter directive: `RUST_LOG` wins, then `--debug`, then the config level.
pub fn filter_directive(config: &LoggingConfig, debug: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if debug { "debug" } else { config.level.as_str() };
        EnvFilter::new(format!("warn,bubbledash={level}"))
    })
}

/// Install the global subscriber. Keep the returned guard alive until exit so
/// buffered lines are flushed; `None` means logging is disabled.
pub fn init(cache: &CacheManager, config: &LoggingConfig, debug: bool) -> Result<Option<WorkerGuard>> {
    if !config.enabled {
        return Ok(None);
    }
    cache.ensure_cache_dir()?;
    let appender = tracing_appender::rolling::never(cache.cache_dir(), LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(filter_directive(config, debug))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .try_init()?;

    Ok(Some(guard))
}
