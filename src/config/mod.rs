//! Configuration Module - TOML-based Storefront Configuration
//!
//! Loads and validates configuration from `config.toml`. Every field has
//! a default, so a missing file or section still yields a working setup.
//! The admin secret, messaging recipient and storage location live here;
//! nothing is hardcoded in the usecases layer.

pub mod loader;

use serde::Deserialize;

use crate::domain::message::{DEFAULT_LINK_BASE, DEFAULT_PHONE, DEFAULT_SIGNATURE};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
  /// Application identity and logging.
  pub app: AppSection,
  /// Where collections and flat storage live.
  pub storage: StorageConfig,
  /// Admin mode gate.
  pub admin: AdminConfig,
  /// Outbound messaging recipient and signature.
  pub messaging: MessagingConfig,
  /// Catalog maintenance behaviour.
  pub catalog: CatalogConfig,
}

/// Application identity configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppSection {
  /// Human-readable storefront name.
  pub name: String,
  /// Log level (trace, debug, info, warn, error).
  pub log_level: String,
}

impl Default for AppSection {
  fn default() -> Self {
    Self {
      name: "catalog-intake".to_string(),
      log_level: "info".to_string(),
    }
  }
}

/// Persistence configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
  /// Directory for collection files and flat storage.
  pub data_dir: String,
  /// Schema version of the collection layout. Bumps are additive.
  pub schema_version: u32,
  /// File name of the flat storage inside `data_dir`.
  pub flat_storage_file: String,
}

impl Default for StorageConfig {
  fn default() -> Self {
    Self {
      data_dir: "data".to_string(),
      schema_version: 1,
      flat_storage_file: "local_storage.json".to_string(),
    }
  }
}

/// Admin gate configuration. Advisory only, not a security boundary.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
  pub password: String,
}

impl Default for AdminConfig {
  fn default() -> Self {
    Self {
      password: "hbh71hbh".to_string(),
    }
  }
}

/// Messaging deep-link configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MessagingConfig {
  /// Deep-link base URL.
  pub base_url: String,
  /// Recipient phone number, digits only.
  pub phone: String,
  /// Closing line of every order message.
  pub signature: String,
}

impl Default for MessagingConfig {
  fn default() -> Self {
    Self {
      base_url: DEFAULT_LINK_BASE.to_string(),
      phone: DEFAULT_PHONE.to_string(),
      signature: DEFAULT_SIGNATURE.to_string(),
    }
  }
}

/// Catalog configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
  /// Re-insert the required care product on every load.
  pub ensure_required_product: bool,
}

impl Default for CatalogConfig {
  fn default() -> Self {
    Self {
      ensure_required_product: true,
    }
  }
}
