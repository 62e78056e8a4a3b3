//! Builds the [`BridgeConfig`] a process runs with.
//!
//! Tunables come from an optional YAML file (every field defaulted), secrets
//! from the environment. A `.env` file has already been loaded by `main`.
//!
//! # Errors
//! An unreadable file, invalid YAML or an out-of-range setting is an error.
//! Unset secrets are not: they stay blank and the run reports them.

use anyhow::Result;
use std::fs;
use std::path::Path;
use tracing::{error, info, warn};

use wip_bridge_core::config::{
    BridgeConfig, Credentials, Settings, TWITTER_ACCESS_TOKEN, TWITTER_ACCESS_TOKEN_SECRET,
    TWITTER_API_KEY, TWITTER_API_KEY_SECRET, WIP_API_KEY,
};

/// Loads the optional YAML settings file and reads the secrets from the environment.
///
/// Missing secrets are not an error here: they are carried as blank values
/// so that the run itself reports them as `missing_evars`.
pub fn load_config<P: AsRef<Path>>(path: Option<P>) -> Result<BridgeConfig> {
    let settings = match path {
        Some(path) => load_settings(path.as_ref())?,
        None => {
            info!("No settings file given, using defaults");
            Settings::default()
        }
    };
    validate_settings(&settings)?;

    let config = BridgeConfig {
        credentials: credentials_from_env(),
        settings,
    };
    config.trace_loaded();
    Ok(config)
}

fn load_settings(path: &Path) -> Result<Settings> {
    info!(config_path = ?path, "Loading settings from file");
    let content = fs::read_to_string(path).map_err(|e| {
        error!(error = ?e, config_path = ?path, "Failed to read config file");
        anyhow::anyhow!("Failed to read config file {:?}: {}", path, e)
    })?;
    // An empty file is a valid "all defaults" config.
    if content.trim().is_empty() {
        return Ok(Settings::default());
    }
    let settings: Settings = serde_yaml::from_str(&content).map_err(|e| {
        error!(error = ?e, config_path = ?path, "Failed to parse config YAML");
        anyhow::anyhow!("Failed to parse config YAML: {e}")
    })?;
    info!(config_path = ?path, "Parsed config YAML successfully");
    Ok(settings)
}

fn validate_settings(settings: &Settings) -> Result<()> {
    if settings.lookback_minutes <= 0 {
        anyhow::bail!("lookback_minutes must be positive, got {}", settings.lookback_minutes);
    }
    if settings.connection_timeout_secs == 0 {
        anyhow::bail!("connection_timeout_secs must be positive");
    }
    if settings.privacy_marker.trim().is_empty() {
        anyhow::bail!("privacy_marker must not be empty");
    }
    if settings.run_deadline_secs == Some(0) {
        anyhow::bail!("run_deadline_secs must be positive when set");
    }
    Ok(())
}

/// Reads the five secrets; unset variables become blank strings.
pub fn credentials_from_env() -> Credentials {
    let read = |name: &str| match std::env::var(name) {
        Ok(value) => {
            info!(var = name, len = value.len(), "Secret found in env");
            value
        }
        Err(e) => {
            warn!(var = name, error = ?e, "Secret not set in env");
            String::new()
        }
    };
    Credentials {
        wip_api_key: read(WIP_API_KEY),
        twitter_api_key: read(TWITTER_API_KEY),
        twitter_api_key_secret: read(TWITTER_API_KEY_SECRET),
        twitter_access_token: read(TWITTER_ACCESS_TOKEN),
        twitter_access_token_secret: read(TWITTER_ACCESS_TOKEN_SECRET),
    }
}

