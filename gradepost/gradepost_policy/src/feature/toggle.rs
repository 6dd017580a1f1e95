//! The post-policies feature toggle.
//!
//! The backing setting can be unset, `"true"`, or anything else. Only
//! `"true"` reads as enabled; consumers branch on enabled or disabled and
//! never see the unset state.

use gradepost_core::error::Result;
use gradepost_core::log_event;
use gradepost_core::utils::{LogLevel, PostPolicyConfig};
use std::sync::Arc;

use super::setting::SettingStore;

const ENABLED: &str = "true";
const DISABLED: &str = "false";

/// Process-wide switch for the post-policy subsystem.
pub struct FeatureToggle<S> {
    settings: Arc<S>,
    key: String,
    log_level: LogLevel,
}

impl<S> FeatureToggle<S>
where
    S: SettingStore,
{
    /// Create a toggle over `settings` using the configured setting key.
    pub fn new(settings: Arc<S>, config: &PostPolicyConfig) -> Self {
        Self {
            settings,
            key: config.feature_setting_key.clone(),
            log_level: config.log_level,
        }
    }

    /// The setting key this toggle reads and writes.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether the feature is enabled.
    ///
    /// True only when the setting is exactly `"true"`.
    pub fn is_enabled(&self) -> Result<bool> {
        Ok(self.settings.get(&self.key)?.as_deref() == Some(ENABLED))
    }

    /// Enable the feature by setting the value to `"true"`.
    pub fn enable(&self) -> Result<()> {
        self.write(ENABLED)
    }

    /// Disable the feature by setting the value to `"false"`.
    pub fn disable(&self) -> Result<()> {
        self.write(DISABLED)
    }

    fn write(&self, value: &str) -> Result<()> {
        self.settings.set(&self.key, value)?;
        log_event!(self.log_level, "post policies feature setting changed",
            key => self.key,
            value => value,
        );
        Ok(())
    }
}

impl<S> Clone for FeatureToggle<S> {
    fn clone(&self) -> Self {
        Self {
            settings: Arc::clone(&self.settings),
            key: self.key.clone(),
            log_level: self.log_level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::InMemorySettingStore;
    use gradepost_core::error::{Error, SettingError};

    /// A setting store that cannot be reached.
    struct UnreachableSettings;

    impl SettingStore for UnreachableSettings {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(SettingError::Storage("connection refused".to_string()).into())
        }

        fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(SettingError::Storage("connection refused".to_string()).into())
        }

        fn remove(&self, _key: &str) -> Result<Option<String>> {
            Err(SettingError::Storage("connection refused".to_string()).into())
        }
    }

    fn toggle() -> (Arc<InMemorySettingStore>, FeatureToggle<InMemorySettingStore>) {
        let settings = Arc::new(InMemorySettingStore::new());
        let toggle = FeatureToggle::new(Arc::clone(&settings), &PostPolicyConfig::default());
        (settings, toggle)
    }

    #[test]
    fn test_enabled_when_setting_is_true() {
        let (settings, toggle) = toggle();
        settings.set("post_policies_enabled", "true").unwrap();
        assert!(toggle.is_enabled().unwrap());
    }

    #[test]
    fn test_disabled_for_any_other_value() {
        let (settings, toggle) = toggle();
        for value in ["NO", "false", "TRUE", "True", " true", "1", ""] {
            settings.set("post_policies_enabled", value).unwrap();
            assert!(!toggle.is_enabled().unwrap(), "{value:?} should read as disabled");
        }
    }

    #[test]
    fn test_disabled_when_unset() {
        let (_, toggle) = toggle();
        assert!(!toggle.is_enabled().unwrap());
    }

    #[test]
    fn test_enable_writes_true() {
        let (settings, toggle) = toggle();
        toggle.enable().unwrap();
        assert_eq!(settings.get_or("post_policies_enabled", "false").unwrap(), "true");
        assert!(toggle.is_enabled().unwrap());
    }

    #[test]
    fn test_disable_writes_false() {
        let (settings, toggle) = toggle();
        toggle.enable().unwrap();
        toggle.disable().unwrap();
        assert_eq!(settings.get_or("post_policies_enabled", "true").unwrap(), "false");
        assert!(!toggle.is_enabled().unwrap());
    }

    #[test]
    fn test_configured_key() {
        let settings = Arc::new(InMemorySettingStore::new());
        let config = PostPolicyConfig {
            feature_setting_key: "gradebook.post_policies".to_string(),
            ..PostPolicyConfig::default()
        };
        let toggle = FeatureToggle::new(Arc::clone(&settings), &config);

        toggle.enable().unwrap();
        assert_eq!(toggle.key(), "gradebook.post_policies");
        assert_eq!(settings.get("post_policies_enabled").unwrap(), None);
        assert_eq!(
            settings.get("gradebook.post_policies").unwrap().as_deref(),
            Some("true")
        );
    }

    #[test]
    fn test_storage_errors_propagate() {
        let toggle = FeatureToggle::new(Arc::new(UnreachableSettings), &PostPolicyConfig::default());
        let refused = SettingError::Storage("connection refused".to_string());

        for result in [toggle.is_enabled().map(drop), toggle.enable(), toggle.disable()] {
            assert!(matches!(result, Err(Error::Setting(ref e)) if *e == refused));
        }
    }
}
