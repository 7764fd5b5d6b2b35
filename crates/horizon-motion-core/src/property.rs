//! Reactive properties for Horizon Motion.
//!
//! A [`Property<T>`] is an interior-mutable cell with change detection. It does
//! not own a signal: the owner pairs each property with a notification signal
//! and emits it only when [`Property::set`] reports an effective change.
//!
//! # Example
//!
//! ```
//! use horizon_motion_core::{Property, Signal};
//!
//! struct Tracker {
//!     enabled: Property<bool>,
//!     enabled_changed: Signal<bool>,
//! }
//!
//! impl Tracker {
//!     fn set_enabled(&self, enabled: bool) {
//!         if self.enabled.set(enabled) {
//!             self.enabled_changed.emit(enabled);
//!         }
//!     }
//! }
//!
//! let tracker = Tracker {
//!     enabled: Property::new(true),
//!     enabled_changed: Signal::new(),
//! };
//! tracker.set_enabled(false);
//! assert!(!tracker.enabled.get());
//! ```

use std::fmt;

use parking_lot::RwLock;

/// An interior-mutable value that reports whether writes change it.
///
/// # Thread Safety
///
/// `Property<T>` is `Send + Sync` whenever `T` is, via its `RwLock`.
pub struct Property<T> {
    value: RwLock<T>,
}

impl<T: Clone> Property<T> {
    /// Create a new property with an initial value.
    pub fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
        }
    }

    /// Get a copy of the current value.
    pub fn get(&self) -> T {
        self.value.read().clone()
    }

    /// Access the value through a closure without cloning.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.value.read())
    }

    /// Overwrite the value without change detection.
    pub fn set_silent(&self, value: T) {
        *self.value.write() = value;
    }
}

impl<T: Clone + PartialEq> Property<T> {
    /// Set the value, returning `true` if it changed.
    ///
    /// The caller emits its notification signal when this returns `true`.
    pub fn set(&self, value: T) -> bool {
        let mut current = self.value.write();
        if *current != value {
            *current = value;
            true
        } else {
            false
        }
    }

    /// Set the value, returning the previous one if it changed.
    pub fn replace(&self, value: T) -> Option<T> {
        let mut current = self.value.write();
        if *current != value {
            Some(std::mem::replace(&mut *current, value))
        } else {
            None
        }
    }
}

impl<T: Clone> Clone for Property<T> {
    fn clone(&self) -> Self {
        Self::new(self.get())
    }
}

impl<T: Clone + Default> Default for Property<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Property").field(&*self.value.read()).finish()
    }
}

static_assertions::assert_impl_all!(Property<f64>: Send, Sync);
