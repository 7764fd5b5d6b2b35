//! Frame clocks for Horizon Motion.
//!
//! A frame clock delivers one tick per display refresh to every subscribed
//! callback. Animations subscribe while playing and unsubscribe on every exit
//! path through a [`TickSubscription`] guard.
//!
//! Two clocks ship with the crate:
//!
//! - [`ManualFrameClock`]: time only moves when the host (or a test) says so.
//! - [`SystemFrameClock`]: time follows a monotonic `Instant`; the host calls
//!   [`SystemFrameClock::dispatch`] once per refresh.
//!
//! Hosts with their own compositor clock implement [`FrameClock`] and use a
//! [`TickRegistry`] for the subscription bookkeeping.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicU64, Ordering};
//! use horizon_motion_core::{FrameClock, ManualFrameClock, TickControl};
//!
//! let clock = ManualFrameClock::new();
//! let last = Arc::new(AtomicU64::new(0));
//! let last_clone = last.clone();
//! clock.add_tick_callback(Arc::new(move |frame_time| {
//!     last_clone.store(frame_time, Ordering::SeqCst);
//!     TickControl::Continue
//! }));
//!
//! clock.advance(16);
//! assert_eq!(last.load(Ordering::SeqCst), 16);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Instant;

use parking_lot::Mutex;
use slotmap::{new_key_type, SlotMap};

use crate::error::{CoreError, Result};
use crate::logging::{targets, FrameSpan};

new_key_type! {
    /// Identifier of a tick callback registered with a frame clock.
    pub struct TickCallbackId;
}

/// What a tick callback wants after being invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    /// Keep receiving ticks.
    Continue,
    /// Unregister this callback.
    Remove,
}

/// A callback invoked once per frame with the frame time in milliseconds.
pub type TickCallback = Arc<dyn Fn(u64) -> TickControl + Send + Sync>;

/// A per-surface source of frame ticks.
///
/// Frame times are monotonic milliseconds with an arbitrary origin; only
/// differences between them are meaningful.
pub trait FrameClock: Send + Sync {
    /// The time of the current frame, in milliseconds.
    fn frame_time(&self) -> u64;

    /// Register a callback to be invoked on every frame.
    fn add_tick_callback(&self, callback: TickCallback) -> TickCallbackId;

    /// Unregister a callback. Returns `false` if it was not registered.
    fn remove_tick_callback(&self, id: TickCallbackId) -> bool;
}

struct TickEntry {
    order: u64,
    callback: TickCallback,
}

/// Subscription table shared by frame clock implementations.
///
/// Callbacks run in registration order. No lock is held while a callback
/// runs, so callbacks may add or remove subscriptions (their own included).
pub struct TickRegistry {
    entries: Mutex<SlotMap<TickCallbackId, TickEntry>>,
    next_order: AtomicU64,
}

impl Default for TickRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TickRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(SlotMap::with_key()),
            next_order: AtomicU64::new(0),
        }
    }

    /// Register a callback.
    pub fn insert(&self, callback: TickCallback) -> TickCallbackId {
        let order = self.next_order.fetch_add(1, Ordering::Relaxed);
        let id = self.entries.lock().insert(TickEntry { order, callback });
        tracing::trace!(target: targets::FRAME_CLOCK, ?id, "tick callback added");
        id
    }

    /// Unregister a callback.
    pub fn remove(&self, id: TickCallbackId) -> bool {
        let removed = self.entries.lock().remove(id).is_some();
        if removed {
            tracing::trace!(target: targets::FRAME_CLOCK, ?id, "tick callback removed");
        }
        removed
    }

    /// Whether a callback is still registered.
    pub fn contains(&self, id: TickCallbackId) -> bool {
        self.entries.lock().contains_key(id)
    }

    /// Number of registered callbacks.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether no callbacks are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Invoke every registered callback once with `frame_time`.
    ///
    /// Callbacks registered during dispatch first run on the next frame.
    /// Callbacks removed during dispatch are not invoked. Returns the number
    /// of callbacks invoked.
    #[tracing::instrument(skip(self), target = "horizon_motion_core::frame_clock", level = "trace")]
    pub fn dispatch(&self, frame_time: u64) -> usize {
        let mut snapshot: Vec<(u64, TickCallbackId, TickCallback)> = {
            let entries = self.entries.lock();
            entries
                .iter()
                .map(|(id, entry)| (entry.order, id, Arc::clone(&entry.callback)))
                .collect()
        };
        snapshot.sort_by_key(|(order, _, _)| *order);

        let mut invoked = 0;
        for (_, id, callback) in snapshot {
            if !self.contains(id) {
                continue;
            }
            invoked += 1;
            if callback(frame_time) == TickControl::Remove {
                self.remove(id);
            }
        }
        invoked
    }
}

impl std::fmt::Debug for TickRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TickRegistry")
            .field("callbacks", &self.len())
            .finish()
    }
}

/// A frame clock whose time is set explicitly.
///
/// Useful for hosts that already know their presentation time, and for
/// deterministic tests.
#[derive(Debug, Default)]
pub struct ManualFrameClock {
    time: AtomicU64,
    registry: TickRegistry,
}

impl ManualFrameClock {
    /// Create a clock at time zero.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Create a clock starting at `time` milliseconds.
    pub fn starting_at(time: u64) -> Arc<Self> {
        Arc::new(Self {
            time: AtomicU64::new(time),
            registry: TickRegistry::new(),
        })
    }

    /// Move the clock to `time` without dispatching a frame.
    pub fn set_time(&self, time: u64) -> Result<()> {
        let current = self.time.load(Ordering::SeqCst);
        if time < current {
            return Err(CoreError::ClockWentBackwards {
                current,
                requested: time,
            });
        }
        self.time.store(time, Ordering::SeqCst);
        Ok(())
    }

    /// Move the clock forward by `delta` milliseconds and dispatch one frame.
    pub fn advance(&self, delta: u64) -> usize {
        self.time.fetch_add(delta, Ordering::SeqCst);
        self.dispatch()
    }

    /// Dispatch a frame at the current time.
    pub fn dispatch(&self) -> usize {
        let frame_time = self.frame_time();
        let _span = FrameSpan::new(frame_time);
        self.registry.dispatch(frame_time)
    }

    /// Number of active tick callbacks.
    pub fn tick_callback_count(&self) -> usize {
        self.registry.len()
    }
}

impl FrameClock for ManualFrameClock {
    fn frame_time(&self) -> u64 {
        self.time.load(Ordering::SeqCst)
    }

    fn add_tick_callback(&self, callback: TickCallback) -> TickCallbackId {
        self.registry.insert(callback)
    }

    fn remove_tick_callback(&self, id: TickCallbackId) -> bool {
        self.registry.remove(id)
    }
}

/// A frame clock following the monotonic system clock.
#[derive(Debug)]
pub struct SystemFrameClock {
    origin: Instant,
    registry: TickRegistry,
}

impl SystemFrameClock {
    /// Create a clock whose time zero is now.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            origin: Instant::now(),
            registry: TickRegistry::new(),
        })
    }

    /// Dispatch a frame at the current time. Call once per display refresh.
    pub fn dispatch(&self) -> usize {
        let frame_time = self.frame_time();
        let _span = FrameSpan::new(frame_time);
        self.registry.dispatch(frame_time)
    }

    /// Number of active tick callbacks.
    pub fn tick_callback_count(&self) -> usize {
        self.registry.len()
    }
}

impl FrameClock for SystemFrameClock {
    fn frame_time(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    fn add_tick_callback(&self, callback: TickCallback) -> TickCallbackId {
        self.registry.insert(callback)
    }

    fn remove_tick_callback(&self, id: TickCallbackId) -> bool {
        self.registry.remove(id)
    }
}

/// A tick callback registration that is removed when dropped.
///
/// Holds the clock weakly: a subscription never keeps a clock alive.
pub struct TickSubscription {
    clock: Weak<dyn FrameClock>,
    id: TickCallbackId,
}

impl TickSubscription {
    /// Register `callback` with `clock` and guard the registration.
    pub fn new(clock: &Arc<dyn FrameClock>, callback: TickCallback) -> Self {
        let id = clock.add_tick_callback(callback);
        Self {
            clock: Arc::downgrade(clock),
            id,
        }
    }

    /// The guarded callback ID.
    pub fn id(&self) -> TickCallbackId {
        self.id
    }
}

impl Drop for TickSubscription {
    fn drop(&mut self) {
        if let Some(clock) = self.clock.upgrade() {
            clock.remove_tick_callback(self.id);
        }
    }
}

impl std::fmt::Debug for TickSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TickSubscription")
            .field("id", &self.id)
            .finish()
    }
}

static_assertions::assert_impl_all!(ManualFrameClock: Send, Sync);
static_assertions::assert_impl_all!(SystemFrameClock: Send, Sync);
static_assertions::assert_impl_all!(TickSubscription: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder(log: &Arc<Mutex<Vec<(char, u64)>>>, name: char) -> TickCallback {
        let log = log.clone();
        Arc::new(move |time| {
            log.lock().push((name, time));
            TickControl::Continue
        })
    }

    #[test]
    fn test_dispatch_in_registration_order() {
        let clock = ManualFrameClock::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        let a = clock.add_tick_callback(recorder(&log, 'a'));
        clock.add_tick_callback(recorder(&log, 'b'));
        clock.remove_tick_callback(a);
        // Reuses the freed slot but must still run after 'b'.
        clock.add_tick_callback(recorder(&log, 'c'));

        assert_eq!(clock.advance(10), 2);
        assert_eq!(*log.lock(), vec![('b', 10), ('c', 10)]);
    }

    #[test]
    fn test_remove_control_unregisters() {
        let clock = ManualFrameClock::new();
        let count = Arc::new(AtomicU64::new(0));
        let count_clone = count.clone();
        clock.add_tick_callback(Arc::new(move |_| {
            if count_clone.fetch_add(1, Ordering::SeqCst) == 1 {
                TickControl::Remove
            } else {
                TickControl::Continue
            }
        }));

        clock.advance(1);
        clock.advance(1);
        clock.advance(1);
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert_eq!(clock.tick_callback_count(), 0);
    }

    #[test]
    fn test_callback_removed_mid_dispatch_is_skipped() {
        let clock = ManualFrameClock::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let victim: Arc<Mutex<Option<TickCallbackId>>> = Arc::new(Mutex::new(None));

        let weak = Arc::downgrade(&clock);
        let victim_clone = victim.clone();
        clock.add_tick_callback(Arc::new(move |_| {
            if let (Some(clock), Some(id)) = (weak.upgrade(), victim_clone.lock().take()) {
                clock.remove_tick_callback(id);
            }
            TickControl::Continue
        }));
        let id = clock.add_tick_callback(recorder(&log, 'v'));
        *victim.lock() = Some(id);

        assert_eq!(clock.advance(16), 1);
        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_callback_added_mid_dispatch_waits_for_next_frame() {
        let clock = ManualFrameClock::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        let weak = Arc::downgrade(&clock);
        let log_clone = log.clone();
        clock.add_tick_callback(Arc::new(move |_| {
            if let Some(clock) = weak.upgrade() {
                clock.add_tick_callback(recorder(&log_clone, 'n'));
            }
            TickControl::Remove
        }));

        clock.advance(5);
        assert!(log.lock().is_empty());
        clock.advance(5);
        assert_eq!(*log.lock(), vec![('n', 10)]);
    }

    #[test]
    fn test_set_time_rejects_going_backwards() {
        let clock = ManualFrameClock::starting_at(100);
        assert!(clock.set_time(150).is_ok());
        assert_eq!(clock.frame_time(), 150);
        assert_eq!(
            clock.set_time(120),
            Err(CoreError::ClockWentBackwards {
                current: 150,
                requested: 120
            })
        );
    }

    #[test]
    fn test_subscription_unregisters_on_drop() {
        let manual = ManualFrameClock::new();
        let clock: Arc<dyn FrameClock> = manual.clone();
        let log = Arc::new(Mutex::new(Vec::new()));

        let subscription = TickSubscription::new(&clock, recorder(&log, 's'));
        manual.advance(1);
        drop(subscription);
        manual.advance(1);

        assert_eq!(*log.lock(), vec![('s', 1)]);
        assert_eq!(manual.tick_callback_count(), 0);
    }

    #[test]
    fn test_subscription_outlives_clock() {
        let clock: Arc<dyn FrameClock> = ManualFrameClock::new();
        let subscription = TickSubscription::new(&clock, Arc::new(|_| TickControl::Continue));
        drop(clock);
        drop(subscription);
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemFrameClock::new();
        let first = clock.frame_time();
        let second = clock.frame_time();
        assert!(second >= first);
        assert_eq!(clock.dispatch(), 0);
    }
}
