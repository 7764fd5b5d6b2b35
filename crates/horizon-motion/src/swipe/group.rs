//! Keeping several swipe trackers in lockstep.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use horizon_motion_core::logging::targets;
use horizon_motion_core::ConnectionGuard;
use parking_lot::Mutex;
use slotmap::{new_key_type, SlotMap};

use super::swipeable::NavigationDirection;
use super::tracker::{EndSwipe, SwipeTracker};

new_key_type! {
    /// Handle of a tracker inside a [`SwipeGroup`].
    pub struct MemberId;
}

struct Member {
    tracker: Weak<SwipeTracker>,
    // Dropping these disconnects the relays.
    _connections: Vec<ConnectionGuard>,
}

#[derive(Default)]
struct GroupInner {
    members: Mutex<SlotMap<MemberId, Member>>,
    /// The tracker whose gesture is being mirrored.
    current: Mutex<Option<Weak<SwipeTracker>>>,
    relaying: AtomicBool,
}

impl GroupInner {
    /// Claim the group for `source` unless another live tracker holds it.
    fn claim(&self, source: &Weak<SwipeTracker>) -> bool {
        let mut current = self.current.lock();
        if let Some(holder) = current.as_ref() {
            if !holder.ptr_eq(source) && holder.strong_count() > 0 {
                return false;
            }
        }
        *current = Some(source.clone());
        true
    }

    fn is_current(&self, source: &Weak<SwipeTracker>) -> bool {
        self.current
            .lock()
            .as_ref()
            .is_some_and(|holder| holder.ptr_eq(source))
    }

    fn release(&self) {
        *self.current.lock() = None;
    }

    /// Run `f` on every live member except `source`, with echoes suppressed.
    fn relay(&self, source: &Weak<SwipeTracker>, f: impl Fn(&SwipeTracker)) {
        let others: Vec<Arc<SwipeTracker>> = {
            let mut members = self.members.lock();
            members.retain(|_, member| member.tracker.strong_count() > 0);
            members
                .values()
                .filter(|member| !member.tracker.ptr_eq(source))
                .filter_map(|member| member.tracker.upgrade())
                .collect()
        };

        self.relaying.store(true, Ordering::SeqCst);
        for tracker in &others {
            f(tracker);
        }
        self.relaying.store(false, Ordering::SeqCst);
    }

    fn is_relaying(&self) -> bool {
        self.relaying.load(Ordering::SeqCst)
    }

    fn on_prepare(&self, source: &Weak<SwipeTracker>, direction: NavigationDirection) {
        if self.is_relaying() || !self.claim(source) {
            return;
        }
        self.relay(source, |tracker| tracker.prepare.emit(direction));
    }

    fn on_begin(&self, source: &Weak<SwipeTracker>) {
        if self.is_relaying() || !self.is_current(source) {
            return;
        }
        self.relay(source, |tracker| tracker.begin_swipe.emit(()));
    }

    fn on_update(&self, source: &Weak<SwipeTracker>, progress: f64) {
        if self.is_relaying() || !self.is_current(source) {
            return;
        }
        self.relay(source, |tracker| tracker.update_swipe.emit(progress));
    }

    fn on_end(&self, source: &Weak<SwipeTracker>, end: EndSwipe) {
        if self.is_relaying() || !self.is_current(source) {
            return;
        }
        self.relay(source, |tracker| tracker.end_swipe.emit(end));
        self.release();
    }

    fn on_cancelled(&self, source: &Weak<SwipeTracker>, cancel_progress: f64) {
        if self.is_relaying() || !self.is_current(source) {
            return;
        }
        self.relay(source, |tracker| tracker.swipe_cancelled.emit(cancel_progress));
        self.release();
    }
}

/// Mirrors the swipes of one tracker onto others.
///
/// When a member starts a gesture, its `prepare`, `begin_swipe`,
/// `update_swipe`, `end_swipe` and `swipe_cancelled` emissions are
/// re-emitted on every other member, so that widgets sharing a position (for
/// example a sidebar and its header) move together. While one member is
/// swiping, gestures on the others are not mirrored.
///
/// The group holds its trackers weakly; dropping the group disconnects it.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use horizon_motion::swipe::{SwipeGroup, SwipeTracker, Swipeable};
///
/// struct Pane;
///
/// impl Swipeable for Pane {
///     fn distance(&self) -> f64 { 300.0 }
///     fn snap_points(&self) -> Vec<f64> { vec![0.0, 1.0] }
///     fn progress(&self) -> f64 { 1.0 }
///     fn cancel_progress(&self) -> f64 { 1.0 }
/// }
///
/// let pane = Arc::new(Pane);
/// let content = Arc::new(SwipeTracker::new(&pane));
/// let header = Arc::new(SwipeTracker::new(&pane));
///
/// let group = SwipeGroup::new();
/// group.add_tracker(&content);
/// group.add_tracker(&header);
/// assert_eq!(group.len(), 2);
/// ```
#[derive(Clone, Default)]
pub struct SwipeGroup {
    inner: Arc<GroupInner>,
}

impl SwipeGroup {
    /// Create an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `tracker` to the group. Adding a member twice does nothing.
    pub fn add_tracker(&self, tracker: &Arc<SwipeTracker>) -> MemberId {
        let source = Arc::downgrade(tracker);
        if let Some(id) = self.find(&source) {
            tracing::debug!(target: targets::SWIPE, "tracker already in swipe group");
            return id;
        }

        let group = Arc::downgrade(&self.inner);
        let connections = vec![
            tracker.prepare.connect_scoped(relay_slot::<NavigationDirection, _>(
                &group,
                &source,
                |inner, source, &direction| inner.on_prepare(source, direction),
            )),
            tracker.begin_swipe.connect_scoped(relay_slot::<(), _>(
                &group,
                &source,
                |inner, source, _| inner.on_begin(source),
            )),
            tracker.update_swipe.connect_scoped(relay_slot::<f64, _>(
                &group,
                &source,
                |inner, source, &progress| inner.on_update(source, progress),
            )),
            tracker.end_swipe.connect_scoped(relay_slot::<EndSwipe, _>(
                &group,
                &source,
                |inner, source, &end| inner.on_end(source, end),
            )),
            tracker.swipe_cancelled.connect_scoped(relay_slot::<f64, _>(
                &group,
                &source,
                |inner, source, &progress| inner.on_cancelled(source, progress),
            )),
        ];

        let id = self.inner.members.lock().insert(Member {
            tracker: source,
            _connections: connections,
        });
        tracing::debug!(target: targets::SWIPE, ?id, "tracker added to swipe group");
        id
    }

    /// Remove `tracker` from the group. Returns whether it was a member.
    pub fn remove_tracker(&self, tracker: &Arc<SwipeTracker>) -> bool {
        let source = Arc::downgrade(tracker);
        let Some(id) = self.find(&source) else {
            return false;
        };
        let removed = self.inner.members.lock().remove(id);
        if self.inner.is_current(&source) {
            self.inner.release();
        }
        // Disconnect outside the members lock.
        drop(removed);
        tracing::debug!(target: targets::SWIPE, ?id, "tracker removed from swipe group");
        true
    }

    /// Whether `tracker` is a member.
    pub fn contains(&self, tracker: &Arc<SwipeTracker>) -> bool {
        self.find(&Arc::downgrade(tracker)).is_some()
    }

    /// The live members.
    pub fn trackers(&self) -> Vec<Arc<SwipeTracker>> {
        self.inner
            .members
            .lock()
            .values()
            .filter_map(|member| member.tracker.upgrade())
            .collect()
    }

    /// Number of live members.
    pub fn len(&self) -> usize {
        self.inner
            .members
            .lock()
            .values()
            .filter(|member| member.tracker.strong_count() > 0)
            .count()
    }

    /// Whether the group has no live members.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn find(&self, source: &Weak<SwipeTracker>) -> Option<MemberId> {
        self.inner
            .members
            .lock()
            .iter()
            .find(|(_, member)| member.tracker.ptr_eq(source))
            .map(|(id, _)| id)
    }
}

impl std::fmt::Debug for SwipeGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwipeGroup")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

/// A slot forwarding to the group while both the group and the source
/// tracker are alive.
fn relay_slot<Args, F>(
    group: &Weak<GroupInner>,
    source: &Weak<SwipeTracker>,
    handler: F,
) -> impl Fn(&Args) + Send + Sync + 'static
where
    Args: 'static,
    F: Fn(&GroupInner, &Weak<SwipeTracker>, &Args) + Send + Sync + 'static,
{
    let group = group.clone();
    let source = source.clone();
    move |args| {
        if let Some(inner) = group.upgrade() {
            handler(&inner, &source, args);
        }
    }
}

static_assertions::assert_impl_all!(SwipeGroup: Send, Sync);
