//! Desktop-wide animation settings.
//!
//! Hosts with a settings daemon forward its "enable animations" key into
//! [`AnimationSettings::set_enable_animations`]. Hosts without one can start
//! from [`AnimationSettings::from_env`].

use std::sync::Arc;

use crate::error::{CoreError, Result};
use crate::logging::targets;
use crate::property::Property;
use crate::signal::Signal;

/// Environment variable read by [`AnimationSettings::from_env`].
pub const ENABLE_ANIMATIONS_ENV: &str = "HORIZON_MOTION_ENABLE_ANIMATIONS";

/// Settings shared by every surface of a host.
#[derive(Debug)]
pub struct AnimationSettings {
    enable_animations: Property<bool>,
    /// Emitted when [`enable_animations`](Self::enable_animations) changes.
    pub enable_animations_changed: Signal<bool>,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            enable_animations: Property::new(true),
            enable_animations_changed: Signal::new(),
        }
    }
}

impl AnimationSettings {
    /// Settings with animations enabled.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Settings initialized from [`ENABLE_ANIMATIONS_ENV`].
    ///
    /// An unset variable keeps animations enabled. An unparsable value is
    /// logged and ignored.
    pub fn from_env() -> Arc<Self> {
        let settings = Self::default();
        if let Ok(value) = std::env::var(ENABLE_ANIMATIONS_ENV) {
            match parse_bool_setting(ENABLE_ANIMATIONS_ENV, &value) {
                Ok(enabled) => settings.enable_animations.set_silent(enabled),
                Err(err) => tracing::warn!(target: targets::SETTINGS, %err, "ignoring setting"),
            }
        }
        tracing::debug!(
            target: targets::SETTINGS,
            enable_animations = settings.enable_animations.get(),
            "animation settings loaded"
        );
        Arc::new(settings)
    }

    /// Whether animations are globally enabled.
    pub fn enable_animations(&self) -> bool {
        self.enable_animations.get()
    }

    /// Enable or disable animations globally.
    pub fn set_enable_animations(&self, enabled: bool) {
        if self.enable_animations.set(enabled) {
            tracing::debug!(target: targets::SETTINGS, enabled, "enable-animations changed");
            self.enable_animations_changed.emit(enabled);
        }
    }
}

/// Parse a boolean setting the way desktop environment variables spell them.
pub fn parse_bool_setting(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(CoreError::invalid_setting(name, value)),
    }
}

static_assertions::assert_impl_all!(AnimationSettings: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn test_parse_bool_setting() {
        assert_eq!(parse_bool_setting("k", "0"), Ok(false));
        assert_eq!(parse_bool_setting("k", " Off "), Ok(false));
        assert_eq!(parse_bool_setting("k", "YES"), Ok(true));
        assert!(parse_bool_setting("k", "sometimes").is_err());
    }

    #[test]
    fn test_change_notification() {
        let settings = AnimationSettings::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        settings
            .enable_animations_changed
            .connect(move |&enabled| seen_clone.lock().push(enabled));

        settings.set_enable_animations(true);
        settings.set_enable_animations(false);
        settings.set_enable_animations(false);

        assert!(!settings.enable_animations());
        assert_eq!(*seen.lock(), vec![false]);
    }
}
