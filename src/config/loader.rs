//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, validating all parameters,
//! and providing clear error messages for misconfiguration.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;
use url::Url;

use super::AppConfig;

/// Load and validate configuration from a TOML file.
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<AppConfig> {
  let path = Path::new(path);

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  let config = parse_config(&content)?;

  info!(
    name = %config.app.name,
    data_dir = %config.storage.data_dir,
    schema_version = config.storage.schema_version,
    "Configuration loaded successfully"
  );

  Ok(config)
}

/// Load `path` if it exists, otherwise fall back to defaults.
///
/// A file that exists but fails to parse or validate is still an error.
pub fn load_or_default(path: &str) -> Result<AppConfig> {
  if Path::new(path).exists() {
    load_config(path)
  } else {
    let config = AppConfig::default();
    validate_config(&config)?;
    Ok(config)
  }
}

/// Parse and validate configuration text.
pub fn parse_config(content: &str) -> Result<AppConfig> {
  let config: AppConfig = toml::from_str(content).with_context(|| "Failed to parse config.toml")?;
  validate_config(&config)?;
  Ok(config)
}

/// Validate all configuration parameters.
///
/// Checks for:
/// - Non-empty storage locations and a positive schema version
/// - A non-empty admin password
/// - A parseable messaging base URL and a digits-only phone
fn validate_config(config: &AppConfig) -> Result<()> {
  // Storage validation
  anyhow::ensure!(
    !config.storage.data_dir.trim().is_empty(),
    "storage.data_dir must not be empty"
  );
  anyhow::ensure!(
    !config.storage.flat_storage_file.trim().is_empty(),
    "storage.flat_storage_file must not be empty"
  );
  anyhow::ensure!(
    config.storage.schema_version >= 1,
    "storage.schema_version must be at least 1, got {}",
    config.storage.schema_version
  );

  // Admin validation
  anyhow::ensure!(
    !config.admin.password.is_empty(),
    "admin.password must not be empty"
  );

  // Messaging validation
  Url::parse(&config.messaging.base_url)
    .with_context(|| format!("messaging.base_url is not a URL: {}", config.messaging.base_url))?;
  anyhow::ensure!(
    !config.messaging.phone.is_empty() && config.messaging.phone.chars().all(|c| c.is_ascii_digit()),
    "messaging.phone must be digits only, got {:?}",
    config.messaging.phone
  );

  Ok(())
}
