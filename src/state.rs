use std::fs;
use std::path::{Path, PathBuf};

use crate::error::CatalogError;
use crate::types::Config;

/// Overrides `dataSource` for a single process
pub const DATA_SOURCE_ENV: &str = "AIOS_DATA_SOURCE";

/// Sent as `x-vercel-protection-bypass` on deployed video checks
pub const BYPASS_SECRET_ENV: &str = "VERCEL_AUTOMATION_BYPASS_SECRET";

/// Get the canonical config file path (~/.aios/config.json)
pub fn config_path() -> Result<PathBuf, CatalogError> {
    let home = dirs::home_dir()
        .ok_or_else(|| CatalogError::Config("Could not find home directory".to_string()))?;
    Ok(home.join(".aios").join("config.json"))
}

/// Load configuration from ~/.aios/config.json, then apply env overrides.
///
/// A missing file is not an error: every field has a default.
pub fn load_config() -> Result<Config, CatalogError> {
    let path = config_path()?;
    let config = load_config_from(&path)?;
    Ok(apply_env_overrides(config, |key| std::env::var(key).ok()))
}

pub fn load_config_from(path: &Path) -> Result<Config, CatalogError> {
    if !path.exists() {
        log::debug!("No config at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| CatalogError::Config(format!("Failed to read config: {}", e)))?;

    let config: Config = serde_json::from_str(&content)
        .map_err(|e| CatalogError::Config(format!("Failed to parse config: {}", e)))?;

    if config.page_size == 0 {
        return Err(CatalogError::Config("pageSize must be at least 1".to_string()));
    }

    Ok(config)
}

/// Apply environment overrides; `lookup` is injectable for tests.
pub fn apply_env_overrides(mut config: Config, lookup: impl Fn(&str) -> Option<String>) -> Config {
    if let Some(source) = lookup(DATA_SOURCE_ENV).filter(|s| !s.trim().is_empty()) {
        log::info!("Using data source from {}: {}", DATA_SOURCE_ENV, source);
        config.data_source = source;
    }
    config
}

/// Bypass secret for protected preview deployments, if configured.
pub fn bypass_secret() -> Option<String> {
    std::env::var(BYPASS_SECRET_ENV)
        .ok()
        .filter(|s| !s.is_empty())
}
