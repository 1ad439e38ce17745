//! File-backed and in-memory implementations of [`PhotoStore`].
//!
//! File-backed photos live in a single directory, one file per photo, named
//! `profile_<uuid>.png`. The handle is the file name.

use async_trait::async_trait;
use chatset_core::error::SettingsError;
use chatset_core::photo::{PhotoHandle, PhotoStore};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

fn new_handle() -> PhotoHandle {
    PhotoHandle(format!("profile_{}.png", Uuid::new_v4()))
}

/// Photos stored as files in one directory.
pub struct FilePhotoStore {
    dir: PathBuf,
}

impl FilePhotoStore {
    /// Use `dir` for storage. The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Resolve a handle to its file, rejecting anything that is not a bare
    /// file name.
    fn path_for(&self, handle: &PhotoHandle) -> Option<PathBuf> {
        let name = Path::new(&handle.0);
        let is_bare = name.components().count() == 1 && name.file_name().is_some();
        is_bare.then(|| self.dir.join(name))
    }
}

#[async_trait]
impl PhotoStore for FilePhotoStore {
    async fn save(&self, bytes: &[u8]) -> Result<PhotoHandle, SettingsError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| SettingsError::Photo(format!("create {}: {e}", self.dir.display())))?;

        let handle = new_handle();
        let path = self.dir.join(&handle.0);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| SettingsError::Photo(format!("write {}: {e}", path.display())))?;

        debug!(photo = %handle, bytes = bytes.len(), "Photo saved");
        Ok(handle)
    }

    async fn load(&self, handle: &PhotoHandle) -> Option<Vec<u8>> {
        let path = self.path_for(handle)?;
        tokio::fs::read(&path).await.ok()
    }

    async fn delete(&self, handle: &PhotoHandle) -> Result<(), SettingsError> {
        let Some(path) = self.path_for(handle) else {
            return Ok(());
        };
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SettingsError::Photo(format!("delete {}: {e}", path.display()))),
        }
    }

    async fn cleanup_orphans(&self, referenced: &HashSet<PhotoHandle>) -> Result<usize, SettingsError> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(SettingsError::Photo(format!("list {}: {e}", self.dir.display()))),
        };

        let mut removed = 0;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| SettingsError::Photo(e.to_string()))?
        {
            let name = entry.file_name().to_string_lossy().into_owned();
            if referenced.contains(&PhotoHandle(name.clone())) {
                continue;
            }
            match tokio::fs::remove_file(entry.path()).await {
                Ok(()) => {
                    info!(photo = %name, "Cleaned up orphaned photo");
                    removed += 1;
                }
                Err(e) => warn!(photo = %name, error = %e, "Failed to remove orphaned photo"),
            }
        }
        Ok(removed)
    }
}

/// Photos kept in memory. Used by tests and when no photo directory is set.
#[derive(Default)]
pub struct InMemoryPhotoStore {
    photos: RwLock<HashMap<PhotoHandle, Vec<u8>>>,
}

impl InMemoryPhotoStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.photos.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.photos.read().await.is_empty()
    }
}

#[async_trait]
impl PhotoStore for InMemoryPhotoStore {
    async fn save(&self, bytes: &[u8]) -> Result<PhotoHandle, SettingsError> {
        let handle = new_handle();
        self.photos.write().await.insert(handle.clone(), bytes.to_vec());
        Ok(handle)
    }

    async fn load(&self, handle: &PhotoHandle) -> Option<Vec<u8>> {
        self.photos.read().await.get(handle).cloned()
    }

    async fn delete(&self, handle: &PhotoHandle) -> Result<(), SettingsError> {
        self.photos.write().await.remove(handle);
        Ok(())
    }

    async fn cleanup_orphans(&self, referenced: &HashSet<PhotoHandle>) -> Result<usize, SettingsError> {
        let mut photos = self.photos.write().await;
        let before = photos.len();
        photos.retain(|handle, _| referenced.contains(handle));
        Ok(before - photos.len())
    }
}
