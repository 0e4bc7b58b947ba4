//! Configuration loader for Pickems.
//!
//! Reads `pickems.toml` and deserializes it into [`PickemsConfig`]. Falls back
//! to defaults when the file is missing or malformed.

use std::path::Path;

use pickems_types::config::PickemsConfig;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "pickems.toml";

/// Load configuration from `path`.
///
/// - If the file does not exist, returns [`PickemsConfig::default()`].
/// - If the file exists but cannot be read or parsed, logs a warning and
///   returns the default.
pub async fn load_config(path: &Path) -> PickemsConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config found at {}, using defaults", path.display());
            return PickemsConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return PickemsConfig::default();
        }
    };

    match toml::from_str::<PickemsConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            PickemsConfig::default()
        }
    }
}
