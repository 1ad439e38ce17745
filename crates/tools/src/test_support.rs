//! Recording doubles for the settings and display capabilities.

use async_trait::async_trait;
use chatset_core::error::SettingsError;
use chatset_core::settings::{SettingChange, SettingsMutator};
use chatset_core::ui::{UiComponent, UiDisplay};
use tokio::sync::Mutex;

/// Records every change it is asked to apply.
#[derive(Default)]
pub struct RecordingMutator {
    pub applied: Mutex<Vec<SettingChange>>,
    pub fail: bool,
}

impl RecordingMutator {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub async fn count(&self) -> usize {
        self.applied.lock().await.len()
    }
}

#[async_trait]
impl SettingsMutator for RecordingMutator {
    async fn apply(&self, change: &SettingChange) -> Result<(), SettingsError> {
        if self.fail {
            return Err(SettingsError::Storage("disk full".into()));
        }
        self.applied.lock().await.push(change.clone());
        Ok(())
    }
}

/// Records every component it is asked to show.
pub struct RecordingDisplay {
    pub shown: Mutex<Vec<UiComponent>>,
    succeed: bool,
}

impl RecordingDisplay {
    pub fn succeeding() -> Self {
        Self {
            shown: Mutex::new(Vec::new()),
            succeed: true,
        }
    }

    pub fn failing() -> Self {
        Self {
            shown: Mutex::new(Vec::new()),
            succeed: false,
        }
    }

    pub async fn calls(&self) -> Vec<UiComponent> {
        self.shown.lock().await.clone()
    }
}

#[async_trait]
impl UiDisplay for RecordingDisplay {
    async fn show(&self, component: UiComponent) -> bool {
        self.shown.lock().await.push(component);
        self.succeed
    }
}
