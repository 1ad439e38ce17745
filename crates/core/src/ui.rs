//! Interactive UI components and the capability that displays them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use crate::message::MessageKind;

/// An interactive component the chat surface can render in place of a
/// typed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UiComponent {
    UploadPhotos,
    ColorPicker,
    FontSizeSlider,
    OpacitySlider,
}

impl UiComponent {
    pub const ALL: [UiComponent; 4] = [
        UiComponent::UploadPhotos,
        UiComponent::ColorPicker,
        UiComponent::FontSizeSlider,
        UiComponent::OpacitySlider,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UploadPhotos => "uploadPhotos",
            Self::ColorPicker => "colorPicker",
            Self::FontSizeSlider => "fontSizeSlider",
            Self::OpacitySlider => "opacitySlider",
        }
    }

    /// User-facing description, quoted in tool output.
    pub fn description(&self) -> &'static str {
        match self {
            Self::UploadPhotos => "shows a photo upload interface for the profile picture",
            Self::ColorPicker => "displays a color picker for background color selection",
            Self::FontSizeSlider => "shows a slider to adjust the font size",
            Self::OpacitySlider => "shows a slider to adjust the opacity (0-100%)",
        }
    }

    /// The conversation message kind that renders this component.
    pub fn message_kind(&self) -> MessageKind {
        match self {
            Self::UploadPhotos => MessageKind::UploadPhotos,
            Self::ColorPicker => MessageKind::ColorPicker,
            Self::FontSizeSlider => MessageKind::FontSizeSlider,
            Self::OpacitySlider => MessageKind::OpacitySlider,
        }
    }
}

impl fmt::Display for UiComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shows a component to the user.
///
/// Displaying is defined as appending an assistant message of the
/// component's kind to the conversation turn; it must have happened by the
/// time `show` returns. Returns `false` when the component could not be shown.
#[async_trait]
pub trait UiDisplay: Send + Sync {
    async fn show(&self, component: UiComponent) -> bool;
}
