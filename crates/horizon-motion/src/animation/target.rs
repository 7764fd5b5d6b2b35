//! Animation targets.
//!
//! An [`AnimationTarget`] is where an animation's values go. It is either a
//! closure, or a reactive [`Property<f64>`] optionally paired with the signal
//! its owner uses to announce changes.

use std::fmt;
use std::sync::{Arc, Weak};

use horizon_motion_core::{Property, Signal};

type ValueCallback = Arc<dyn Fn(f64) + Send + Sync>;

#[derive(Clone)]
enum TargetKind {
    Callback(ValueCallback),
    Property {
        property: Weak<Property<f64>>,
        changed: Option<Weak<Signal<f64>>>,
    },
}

/// The destination of an animation's values.
///
/// Setting a value is safe to repeat every frame with the same value. Property
/// targets hold their property weakly; once it is dropped, values are
/// discarded.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use horizon_motion::animation::AnimationTarget;
/// use horizon_motion_core::Property;
///
/// let opacity = Arc::new(Property::new(0.0));
/// let target = AnimationTarget::property(&opacity);
/// target.set_value(0.75);
/// assert_eq!(opacity.get(), 0.75);
/// ```
#[derive(Clone)]
pub struct AnimationTarget {
    kind: TargetKind,
}

impl AnimationTarget {
    /// A target that calls `callback` with every value.
    pub fn callback<F>(callback: F) -> Self
    where
        F: Fn(f64) + Send + Sync + 'static,
    {
        Self {
            kind: TargetKind::Callback(Arc::new(callback)),
        }
    }

    /// A target that writes into `property`.
    pub fn property(property: &Arc<Property<f64>>) -> Self {
        Self {
            kind: TargetKind::Property {
                property: Arc::downgrade(property),
                changed: None,
            },
        }
    }

    /// A target that writes into `property` and emits `changed` when the
    /// written value differs from the stored one.
    pub fn property_with_signal(property: &Arc<Property<f64>>, changed: &Arc<Signal<f64>>) -> Self {
        Self {
            kind: TargetKind::Property {
                property: Arc::downgrade(property),
                changed: Some(Arc::downgrade(changed)),
            },
        }
    }

    /// A target that discards every value.
    pub fn none() -> Self {
        Self::callback(|_| {})
    }

    /// Deliver `value` to the destination.
    pub fn set_value(&self, value: f64) {
        match &self.kind {
            TargetKind::Callback(callback) => callback(value),
            TargetKind::Property { property, changed } => {
                let Some(property) = property.upgrade() else {
                    return;
                };
                if property.set(value) {
                    if let Some(signal) = changed.as_ref().and_then(Weak::upgrade) {
                        signal.emit(value);
                    }
                }
            }
        }
    }

    /// Whether this target writes into a property.
    pub fn is_property(&self) -> bool {
        matches!(self.kind, TargetKind::Property { .. })
    }
}

impl fmt::Debug for AnimationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TargetKind::Callback(_) => f.write_str("AnimationTarget::Callback"),
            TargetKind::Property { property, .. } => f
                .debug_struct("AnimationTarget::Property")
                .field("alive", &(property.strong_count() > 0))
                .finish(),
        }
    }
}

static_assertions::assert_impl_all!(AnimationTarget: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn test_callback_target() {
        let values = Arc::new(Mutex::new(Vec::new()));
        let values_clone = values.clone();
        let target = AnimationTarget::callback(move |v| values_clone.lock().push(v));

        target.set_value(0.25);
        target.set_value(0.25);
        assert_eq!(*values.lock(), vec![0.25, 0.25]);
        assert!(!target.is_property());
    }

    #[test]
    fn test_property_target_emits_on_change_only() {
        let property = Arc::new(Property::new(0.0));
        let changed = Arc::new(Signal::<f64>::new());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        changed.connect(move |&v| seen_clone.lock().push(v));

        let target = AnimationTarget::property_with_signal(&property, &changed);
        target.set_value(0.5);
        target.set_value(0.5);
        target.set_value(1.0);

        assert_eq!(property.get(), 1.0);
        assert_eq!(*seen.lock(), vec![0.5, 1.0]);
    }

    #[test]
    fn test_property_target_after_drop() {
        let property = Arc::new(Property::new(0.0));
        let target = AnimationTarget::property(&property);
        drop(property);
        target.set_value(1.0);
        assert!(format!("{target:?}").contains("false"));
    }
}
