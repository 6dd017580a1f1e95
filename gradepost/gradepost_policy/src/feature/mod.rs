//! Feature gating for the post-policy subsystem.

pub mod setting;
pub mod toggle;

pub use setting::{InMemorySettingStore, SettingStore};
pub use toggle::FeatureToggle;
