//! Settings for chatset: the per-setting descriptor table, value
//! validation, the color palette, and the stores the tools act on.

pub mod descriptor;
pub mod palette;
pub mod photos;
pub mod store;
pub mod validator;

pub use descriptor::{SettingDescriptor, catalogue, descriptor, descriptors};
pub use palette::NamedColor;
pub use photos::{FilePhotoStore, InMemoryPhotoStore};
pub use store::InMemorySettingsStore;
pub use validator::{ValidationFailure, coerce, is_valid, validate};
