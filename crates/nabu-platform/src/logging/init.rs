use std::sync::Once;

use crate::env::{EnvSource, ProcessEnv};

/// Filter used when neither the config nor `RUST_LOG` sets one.
const DEFAULT_FILTER: &str = "info";

/// Logger configuration.
///
/// `env_filter` uses `env_logger` filter syntax, e.g.
/// `"nabu_platform=debug,wgpu=warn"`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

static INIT: Once = Once::new();

/// Installs the global logger. Later calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = resolve_filter(&config, &ProcessEnv);

        let mut builder = env_logger::Builder::new();
        builder.parse_filters(&filter);
        builder.write_style(config.write_style);

        if let Err(e) = builder.try_init() {
            eprintln!("nabu: logger already installed: {e}");
            return;
        }

        log::debug!("logging initialized with filter {filter:?}");
    });
}

/// Picks the filter: explicit config, then `RUST_LOG`, then `info`.
fn resolve_filter(config: &LoggingConfig, env: &dyn EnvSource) -> String {
    if let Some(filter) = &config.env_filter {
        return filter.clone();
    }

    match env.var("RUST_LOG") {
        Ok(Some(filter)) if !filter.trim().is_empty() => filter,
        _ => DEFAULT_FILTER.to_string(),
    }
}
