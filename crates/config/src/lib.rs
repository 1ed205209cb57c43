pub mod schema;

pub use schema::{ClockConfig, GlobalConfig, SegmentKind, SmoothingConfig, TopbarConfig};

use std::path::{Path, PathBuf};
use topbar_core::{Result, TopbarError};

/// Load configuration from a TOML file.  Returns `TopbarConfig::default()` if
/// the file doesn't exist so the bar always has sensible defaults.
pub fn load(path: impl AsRef<Path>) -> Result<TopbarConfig> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::warn!(
            "Config file not found at '{}'; using defaults.",
            path.display()
        );
        return Ok(TopbarConfig::default());
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|e| TopbarError::Config(format!("cannot read '{}': {e}", path.display())))?;

    let config: TopbarConfig =
        toml::from_str(&raw).map_err(|e| TopbarError::Config(format!("TOML parse error: {e}")))?;
    config.validate()?;
    Ok(config)
}

/// Return the default config path, honouring `$XDG_CONFIG_HOME`.
pub fn default_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("topbar").join("topbar.toml")
}
