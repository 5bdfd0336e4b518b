//! Device location permission port

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

/// Port for the OS-level location permission prompt
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PermissionPort: Send + Sync {
    /// Ask for location permission, returning whether it was granted
    ///
    /// Refusal is a normal outcome; implementations never fail.
    async fn request_permission(&self) -> bool;
}
