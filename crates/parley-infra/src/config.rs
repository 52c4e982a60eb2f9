//! Configuration loader for Parley.
//!
//! Reads `config.toml` from the data directory (`~/.parley/` by default) and
//! deserializes it into [`ParleyConfig`]. Falls back to defaults when the
//! file is missing or malformed.

use std::path::Path;

use parley_types::config::ParleyConfig;

/// File name looked up inside the data directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Load configuration from `{data_dir}/config.toml`.
///
/// - Missing file: returns [`ParleyConfig::default()`].
/// - Unreadable or unparsable file: logs a warning and returns the default.
/// - Otherwise: returns the parsed config, with defaults for absent fields.
pub async fn load_config(data_dir: &Path) -> ParleyConfig {
    let config_path = data_dir.join(CONFIG_FILE);

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return ParleyConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return ParleyConfig::default();
        }
    };

    match toml::from_str::<ParleyConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            ParleyConfig::default()
        }
    }
}

/// Resolve how many messages a fetch should return.
///
/// An explicit count wins over the configured default.
pub fn resolve_fetch_count(config: &ParleyConfig, requested: Option<usize>) -> usize {
    requested.unwrap_or(config.default_fetch_count)
}
