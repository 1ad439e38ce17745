//! In-memory settings store.
//!
//! Implements both [`SettingsAccessor`] and [`SettingsMutator`]. Mutations
//! are applied under the write lock and are visible to the next `current()`
//! as soon as `apply` returns.

use async_trait::async_trait;
use chatset_core::error::SettingsError;
use chatset_core::photo::{PhotoHandle, PhotoStore};
use chatset_core::settings::{
    AppSettings, SettingChange, SettingId, SettingValue, SettingsAccessor, SettingsMutator,
};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use crate::descriptor::normalize_hex;
use crate::palette::NamedColor;

pub struct InMemorySettingsStore {
    settings: RwLock<AppSettings>,
    photos: Option<Arc<dyn PhotoStore>>,
}

impl InMemorySettingsStore {
    pub fn new(initial: AppSettings) -> Self {
        Self {
            settings: RwLock::new(initial),
            photos: None,
        }
    }

    /// Attach a photo store so profile photos can be uploaded.
    pub fn with_photo_store(mut self, photos: Arc<dyn PhotoStore>) -> Self {
        self.photos = Some(photos);
        self
    }

    /// Store an uploaded profile photo and make it current. The previously
    /// referenced photo, if any, is deleted.
    pub async fn set_profile_photo(&self, bytes: &[u8]) -> Result<PhotoHandle, SettingsError> {
        let photos = self.photo_store()?;
        let handle = photos.save(bytes).await?;

        let previous = {
            let mut settings = self.settings.write().await;
            settings.profile_photo.replace(handle.clone())
        };
        if let Some(old) = previous {
            if let Err(e) = photos.delete(&old).await {
                warn!(photo = %old, error = %e, "Failed to delete replaced profile photo");
            }
        }

        info!(photo = %handle, "Profile photo updated");
        Ok(handle)
    }

    /// Remove the current profile photo, deleting its data.
    pub async fn clear_profile_photo(&self) -> Result<(), SettingsError> {
        let photos = self.photo_store()?;
        let previous = self.settings.write().await.profile_photo.take();
        if let Some(old) = previous {
            photos.delete(&old).await?;
            info!(photo = %old, "Profile photo removed");
        }
        Ok(())
    }

    /// Image bytes of the current profile photo.
    pub async fn profile_photo(&self) -> Option<Vec<u8>> {
        let handle = self.settings.read().await.profile_photo.clone()?;
        self.photos.as_ref()?.load(&handle).await
    }

    /// Delete stored photos other than the current profile photo. Returns
    /// how many were removed; zero when no photo store is attached.
    pub async fn cleanup_photos(&self) -> Result<usize, SettingsError> {
        let Some(photos) = self.photos.as_ref() else {
            return Ok(0);
        };
        let referenced: HashSet<PhotoHandle> = self.settings.read().await.profile_photo.iter().cloned().collect();
        photos.cleanup_orphans(&referenced).await
    }

    fn photo_store(&self) -> Result<&Arc<dyn PhotoStore>, SettingsError> {
        self.photos
            .as_ref()
            .ok_or_else(|| SettingsError::Photo("no photo store configured".into()))
    }
}

impl Default for InMemorySettingsStore {
    fn default() -> Self {
        Self::new(AppSettings::default())
    }
}

#[async_trait]
impl SettingsAccessor for InMemorySettingsStore {
    async fn current(&self) -> AppSettings {
        self.settings.read().await.clone()
    }
}

#[async_trait]
impl SettingsMutator for InMemorySettingsStore {
    async fn apply(&self, change: &SettingChange) -> Result<(), SettingsError> {
        let unsupported = || SettingsError::Unsupported {
            setting: change.setting.to_string(),
            value: change.value.to_string(),
        };

        let mut settings = self.settings.write().await;
        match (change.setting, &change.value) {
            (SettingId::BackgroundColor, SettingValue::NamedColor(name)) => {
                let color: NamedColor = name.parse().map_err(|_| unsupported())?;
                settings.background_color = color.hex().to_string();
            }
            (SettingId::BackgroundColor, SettingValue::CustomColor(hex)) => {
                settings.background_color = normalize_hex(hex).ok_or_else(unsupported)?;
            }
            (SettingId::DarkMode, SettingValue::Boolean(on)) => settings.dark_mode = *on,
            (SettingId::FontSize, SettingValue::Integer(size)) => settings.font_size = *size,
            (SettingId::Opacity, SettingValue::Decimal(opacity)) => settings.opacity = *opacity,
            (SettingId::Username, SettingValue::Text(name)) => settings.username = name.clone(),
            _ => return Err(unsupported()),
        }

        debug!(setting = %change.setting, value = %change.value, "Setting applied");
        Ok(())
    }
}
