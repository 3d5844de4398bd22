//! Admin Session - Device-local Management Mode
//!
//! A single boolean flag in flat storage turns on product CRUD controls
//! and order history. This is a visibility toggle, not an authentication
//! boundary: the secret is a static client-side value and nothing
//! server-side checks the flag.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::ports::flat_storage::{FlatStorage, FlatStorageError};
use crate::ports::prompt::Confirm;

/// Flat storage key holding the admin flag.
pub const ADMIN_FLAG_KEY: &str = "isAdmin";

/// Question asked before leaving admin mode.
pub const LOGOUT_QUESTION: &str = "هل تريد تسجيل الخروج من وضع الأدمن؟";

/// Admin flag reader/writer.
pub struct AdminSession {
  storage: Arc<dyn FlatStorage>,
  secret: String,
}

impl AdminSession {
  /// Create a session gate checking passwords against `secret`.
  pub fn new(storage: Arc<dyn FlatStorage>, secret: impl Into<String>) -> Self {
    Self {
      storage,
      secret: secret.into(),
    }
  }

  /// Exact-match password check. On match the flag is set.
  ///
  /// A mismatch is a normal `Ok(false)`, not an error, and leaves the
  /// flag untouched.
  #[instrument(skip(self, password))]
  pub fn try_login(&self, password: &str) -> Result<bool, FlatStorageError> {
    if password != self.secret {
      info!("Admin login rejected");
      return Ok(false);
    }
    self.storage.set_item(ADMIN_FLAG_KEY, "true")?;
    info!("Admin mode enabled");
    Ok(true)
  }

  /// Whether admin mode is on. Unreadable storage counts as off.
  pub fn is_admin(&self) -> bool {
    match self.storage.get_item(ADMIN_FLAG_KEY) {
      Ok(flag) => flag.as_deref() == Some("true"),
      Err(e) => {
        warn!(error = %e, "Failed to read admin flag");
        false
      }
    }
  }

  /// Leave admin mode after the user confirms.
  ///
  /// Returns `true` when the flag was cleared and admin-gated views need a
  /// refresh.
  #[instrument(skip(self, confirm))]
  pub fn logout(&self, confirm: &dyn Confirm) -> Result<bool, FlatStorageError> {
    if !confirm.confirm(LOGOUT_QUESTION) {
      return Ok(false);
    }
    self.storage.remove_item(ADMIN_FLAG_KEY)?;
    info!("Admin mode disabled");
    Ok(true)
  }
}
