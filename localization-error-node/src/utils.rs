use std::path::PathBuf;

use tracing::warn;
use tracing_subscriber::EnvFilter;

const CONFIG_PATH_ENV_NAME: &str = "LOCALIZATION_ERROR_CONFIG_PATH";

/// Get config path from input or env LOCALIZATION_ERROR_CONFIG_PATH
pub fn config_path(config: Option<PathBuf>) -> Option<PathBuf> {
    if config.is_some() {
        config
    } else {
        std::env::var(CONFIG_PATH_ENV_NAME)
            .map(|s| {
                warn!("### ENV VAR {} is used ###", s);
                PathBuf::from(s)
            })
            .ok()
    }
}

/// Installs a fmt subscriber filtered by `RUST_LOG` (default `info`).
///
/// Does nothing if a global subscriber is already set.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
