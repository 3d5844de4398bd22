//! Messaging Port - Outbound Deep Link Handoff
//!
//! The core never talks to the messaging service directly. It builds a
//! ready-to-open link and hands it to a launcher owned by the renderer.

use url::Url;

/// Trait for opening a deep link in a new context.
pub trait LinkLauncher: Send + Sync + 'static {
    /// Open `link`. Failures are reported but never roll back an order.
    fn launch(&self, link: &Url) -> anyhow::Result<()>;
}
