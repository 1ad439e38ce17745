//! Photo store capability.
//!
//! Profile photos are image data, never text. The assistant only ever sees
//! an opaque [`PhotoHandle`]; file I/O stays behind [`PhotoStore`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use crate::error::SettingsError;

/// Opaque reference to a stored photo.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoHandle(pub String);

impl std::fmt::Display for PhotoHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[async_trait]
pub trait PhotoStore: Send + Sync {
    /// Store encoded image bytes and return their handle.
    async fn save(&self, bytes: &[u8]) -> Result<PhotoHandle, SettingsError>;

    /// Load a stored photo. `None` if the handle is unknown.
    async fn load(&self, handle: &PhotoHandle) -> Option<Vec<u8>>;

    /// Delete a stored photo. Unknown handles are ignored.
    async fn delete(&self, handle: &PhotoHandle) -> Result<(), SettingsError>;

    /// Delete every stored photo not in `referenced`. Returns how many were removed.
    async fn cleanup_orphans(&self, referenced: &HashSet<PhotoHandle>) -> Result<usize, SettingsError>;
}
