//! Swipe gesture tracking.
//!
//! A [`SwipeTracker`] turns drags and touchpad scrolls over a [`Swipeable`]
//! into a progress value, and on release picks the snap point the swipeable
//! should settle on.
//!
//! # Gesture lifecycle
//!
//! ```text
//! Idle --first motion--> Prepared --past drag threshold--> Dragging --release--> Idle
//!   |                       |                                  |
//!   +--wrong axis/area--> Rejected <--overshooting--+          +--cancel--> Idle
//! ```
//!
//! A drag is prepared on its first motion event, which emits
//! [`prepare`](SwipeTracker::prepare) so the host can get ready to move.
//! Once the pointer has travelled far enough the tracker claims the input
//! sequence, emits [`begin_swipe`](SwipeTracker::begin_swipe), and reports
//! every move through [`update_swipe`](SwipeTracker::update_swipe). Releasing
//! emits [`end_swipe`](SwipeTracker::end_swipe) with an [`EndSwipe`] the host
//! hands to a spring animation; cancelling emits
//! [`swipe_cancelled`](SwipeTracker::swipe_cancelled) instead.
//!
//! Signals are emitted with no lock held, so handlers may query the tracker
//! or change its configuration.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Weak};

use horizon_motion_core::logging::targets;
use horizon_motion_core::{Property, Signal, Surface};
use parking_lot::Mutex;

use super::config::SwipeTrackerConfig;
use super::swipeable::{
    validate_distance, validate_snap_points, EventSequenceState, InputSource,
    NavigationDirection, Orientation, Propagation, ScrollEvent, Swipeable,
};
use crate::animation::{AnimationTarget, SpringAnimation, SpringParams};

/// Progress closer than this to a snap point counts as resting on it.
const SNAP_EPSILON: f64 = 0.005;

/// Gesture state of a [`SwipeTracker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SwipeState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// A gesture started and the host was asked to prepare, but the input
    /// has not been claimed yet.
    Prepared,
    /// The input is claimed and moves the progress.
    Dragging,
    /// The current input sequence will not swipe.
    Rejected,
}

/// Configuration properties reported through [`SwipeTracker::notify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwipeTrackerProperty {
    /// Whether the tracker reacts to input.
    Enabled,
    /// Whether the swipe direction is mirrored.
    Reversed,
    /// Whether mouse drags can swipe.
    AllowMouseDrag,
    /// Whether a swipe may cross more than one snap point.
    AllowLongSwipes,
    /// Whether dragging past the last snap point rubber-bands.
    UpperOvershoot,
    /// Whether dragging past the first snap point rubber-bands.
    LowerOvershoot,
    /// The tracked axis.
    Orientation,
}

/// The outcome of a released swipe.
///
/// `velocity` is in progress units per second and is zero when the gesture
/// was moving away from `to`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EndSwipe {
    /// Progress at release.
    pub from: f64,
    /// The snap point to settle on.
    pub to: f64,
    /// Release velocity towards `to`.
    pub velocity: f64,
}

impl EndSwipe {
    /// A spring animation continuing the gesture: from the release point,
    /// to the chosen snap point, starting with the release velocity.
    ///
    /// The animation is returned idle; the caller owns and plays it.
    pub fn into_spring_animation(
        self,
        surface: &Arc<Surface>,
        params: SpringParams,
        target: AnimationTarget,
    ) -> SpringAnimation {
        SpringAnimation::new(surface, self.from, self.to, params, target)
            .with_initial_velocity(self.velocity)
    }
}

#[derive(Debug, Clone, Copy)]
struct HistoryRecord {
    delta: f64,
    time: u32,
}

#[derive(Debug, Default)]
struct Gesture {
    state: SwipeState,
    start_x: f64,
    start_y: f64,
    pointer_x: f64,
    pointer_y: f64,
    initial_progress: f64,
    /// Accumulated progress before rubber-banding.
    raw_progress: f64,
    progress: f64,
    prev_offset: f64,
    history: VecDeque<HistoryRecord>,
}

impl Gesture {
    fn reset(&mut self) {
        self.state = SwipeState::Idle;
        self.start_x = 0.0;
        self.start_y = 0.0;
        self.initial_progress = 0.0;
        self.raw_progress = 0.0;
        self.progress = 0.0;
        self.prev_offset = 0.0;
        self.history.clear();
    }

    fn trim_history(&mut self, time: u32, window: u32) {
        let threshold = time.saturating_sub(window);
        while self
            .history
            .front()
            .is_some_and(|record| record.time < threshold)
        {
            self.history.pop_front();
        }
    }

    fn append_to_history(&mut self, delta: f64, time: u32, window: u32) {
        self.trim_history(time, window);
        self.history.push_back(HistoryRecord { delta, time });
    }

    /// Average velocity over the history, in input units per millisecond.
    ///
    /// The first record only marks the start time; its delta happened
    /// before the measured interval.
    fn velocity(&self) -> f64 {
        let (Some(first), Some(last)) = (self.history.front(), self.history.back()) else {
            return 0.0;
        };
        if first.time == last.time {
            return 0.0;
        }
        let total: f64 = self.history.iter().skip(1).map(|record| record.delta).sum();
        total / (f64::from(last.time) - f64::from(first.time))
    }
}

/// Tracks swipe gestures over a [`Swipeable`].
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use horizon_motion::swipe::{InputSource, SwipeState, SwipeTracker, Swipeable};
///
/// struct Pages;
///
/// impl Swipeable for Pages {
///     fn distance(&self) -> f64 { 100.0 }
///     fn snap_points(&self) -> Vec<f64> { vec![0.0, 1.0] }
///     fn progress(&self) -> f64 { 0.0 }
///     fn cancel_progress(&self) -> f64 { 0.0 }
/// }
///
/// let pages = Arc::new(Pages);
/// let tracker = SwipeTracker::new(&pages);
/// tracker.end_swipe.connect(|end| println!("settle on {}", end.to));
///
/// tracker.drag_begin(50.0, 50.0, InputSource::Touch);
/// tracker.drag_update(-10.0, 0.0, 0);
/// tracker.drag_update(-40.0, 0.0, 16);
/// assert_eq!(tracker.state(), SwipeState::Dragging);
/// tracker.drag_end(32);
/// assert_eq!(tracker.state(), SwipeState::Idle);
/// ```
pub struct SwipeTracker {
    swipeable: Weak<dyn Swipeable>,
    config: SwipeTrackerConfig,
    enabled: Property<bool>,
    reversed: Property<bool>,
    allow_mouse_drag: Property<bool>,
    allow_long_swipes: Property<bool>,
    upper_overshoot: Property<bool>,
    lower_overshoot: Property<bool>,
    orientation: Property<Orientation>,
    gesture: Mutex<Gesture>,

    /// A gesture is starting in the given direction; the host should get
    /// ready to move. Emitted before the input is claimed.
    pub prepare: Signal<NavigationDirection>,
    /// The input was claimed and the swipe has begun.
    pub begin_swipe: Signal<()>,
    /// The progress moved.
    pub update_swipe: Signal<f64>,
    /// The swipe was released.
    pub end_swipe: Signal<EndSwipe>,
    /// The swipe was cancelled, or ended before it was claimed. Carries the
    /// swipeable's cancel progress.
    pub swipe_cancelled: Signal<f64>,
    /// A configuration property changed.
    pub notify: Signal<SwipeTrackerProperty>,
}

impl SwipeTracker {
    /// Create a tracker with the default thresholds.
    ///
    /// The tracker holds `swipeable` weakly.
    pub fn new<S: Swipeable + 'static>(swipeable: &Arc<S>) -> Self {
        Self::with_config(swipeable, SwipeTrackerConfig::default())
    }

    /// Create a tracker with custom thresholds.
    pub fn with_config<S: Swipeable + 'static>(
        swipeable: &Arc<S>,
        config: SwipeTrackerConfig,
    ) -> Self {
        let swipeable: Arc<dyn Swipeable> = Arc::clone(swipeable) as Arc<dyn Swipeable>;
        Self {
            swipeable: Arc::downgrade(&swipeable),
            config,
            enabled: Property::new(true),
            reversed: Property::new(false),
            allow_mouse_drag: Property::new(false),
            allow_long_swipes: Property::new(false),
            upper_overshoot: Property::new(false),
            lower_overshoot: Property::new(false),
            orientation: Property::new(Orientation::Horizontal),
            gesture: Mutex::new(Gesture::default()),
            prepare: Signal::new(),
            begin_swipe: Signal::new(),
            update_swipe: Signal::new(),
            end_swipe: Signal::new(),
            swipe_cancelled: Signal::new(),
            notify: Signal::new(),
        }
    }

    /// The tracked swipeable, if it is still alive.
    pub fn swipeable(&self) -> Option<Arc<dyn Swipeable>> {
        self.swipeable.upgrade()
    }

    /// The thresholds in use.
    pub fn config(&self) -> &SwipeTrackerConfig {
        &self.config
    }

    /// The gesture state.
    pub fn state(&self) -> SwipeState {
        self.gesture.lock().state
    }

    /// The progress of the current gesture, as last reported through
    /// [`update_swipe`](Self::update_swipe).
    pub fn progress(&self) -> f64 {
        self.gesture.lock().progress
    }

    // -------------------------------------------------------------------------
    // Configuration
    // -------------------------------------------------------------------------

    /// Whether the tracker reacts to input.
    pub fn enabled(&self) -> bool {
        self.enabled.get()
    }

    /// Enable or disable the tracker.
    ///
    /// Disabling abandons a gesture that has not started dragging, emitting
    /// [`swipe_cancelled`](Self::swipe_cancelled) if the host was already
    /// asked to prepare; a drag in progress runs to completion.
    pub fn set_enabled(&self, enabled: bool) {
        if !self.enabled.set(enabled) {
            return;
        }
        if !enabled {
            match self.state() {
                SwipeState::Dragging => {}
                SwipeState::Prepared => self.gesture_cancel(false),
                SwipeState::Idle | SwipeState::Rejected => self.gesture.lock().reset(),
            }
        }
        self.notify.emit(SwipeTrackerProperty::Enabled);
    }

    /// Whether the swipe direction is mirrored, as in right-to-left layouts.
    pub fn reversed(&self) -> bool {
        self.reversed.get()
    }

    /// Set whether the swipe direction is mirrored.
    pub fn set_reversed(&self, reversed: bool) {
        self.set_flag(&self.reversed, reversed, SwipeTrackerProperty::Reversed);
    }

    /// Whether mouse drags can swipe.
    pub fn allow_mouse_drag(&self) -> bool {
        self.allow_mouse_drag.get()
    }

    /// Set whether mouse drags can swipe. Touch always can.
    pub fn set_allow_mouse_drag(&self, allow: bool) {
        self.set_flag(&self.allow_mouse_drag, allow, SwipeTrackerProperty::AllowMouseDrag);
    }

    /// Whether a swipe may cross more than one snap point.
    pub fn allow_long_swipes(&self) -> bool {
        self.allow_long_swipes.get()
    }

    /// Set whether a swipe may cross more than one snap point.
    pub fn set_allow_long_swipes(&self, allow: bool) {
        self.set_flag(&self.allow_long_swipes, allow, SwipeTrackerProperty::AllowLongSwipes);
    }

    /// Whether dragging past the last snap point rubber-bands.
    pub fn upper_overshoot(&self) -> bool {
        self.upper_overshoot.get()
    }

    /// Set whether dragging past the last snap point rubber-bands instead of
    /// stopping.
    pub fn set_upper_overshoot(&self, overshoot: bool) {
        self.set_flag(&self.upper_overshoot, overshoot, SwipeTrackerProperty::UpperOvershoot);
    }

    /// Whether dragging past the first snap point rubber-bands.
    pub fn lower_overshoot(&self) -> bool {
        self.lower_overshoot.get()
    }

    /// Set whether dragging past the first snap point rubber-bands instead
    /// of stopping.
    pub fn set_lower_overshoot(&self, overshoot: bool) {
        self.set_flag(&self.lower_overshoot, overshoot, SwipeTrackerProperty::LowerOvershoot);
    }

    /// The tracked axis.
    pub fn orientation(&self) -> Orientation {
        self.orientation.get()
    }

    /// Set the tracked axis.
    pub fn set_orientation(&self, orientation: Orientation) {
        if self.orientation.set(orientation) {
            self.notify.emit(SwipeTrackerProperty::Orientation);
        }
    }

    fn set_flag(&self, flag: &Property<bool>, value: bool, property: SwipeTrackerProperty) {
        if flag.set(value) {
            self.notify.emit(property);
        }
    }

    // -------------------------------------------------------------------------
    // Drag input
    // -------------------------------------------------------------------------

    /// A press that may start a drag, at surface coordinates.
    pub fn drag_begin(&self, start_x: f64, start_y: f64, source: InputSource) -> EventSequenceState {
        if !self.enabled() {
            tracing::warn!(target: targets::SWIPE, "drag on a disabled swipe tracker ignored");
            return EventSequenceState::Denied;
        }
        match source {
            InputSource::Mouse if !self.allow_mouse_drag() => {
                tracing::debug!(target: targets::SWIPE, "mouse drag not allowed");
                return EventSequenceState::Denied;
            }
            InputSource::Touchpad => return EventSequenceState::Denied,
            _ => {}
        }

        let mut gesture = self.gesture.lock();
        if gesture.state != SwipeState::Idle {
            return EventSequenceState::Denied;
        }
        gesture.start_x = start_x;
        gesture.start_y = start_y;
        EventSequenceState::None
    }

    /// The drag moved to `(offset_x, offset_y)` from where it began.
    ///
    /// `time` is the event time in milliseconds.
    pub fn drag_update(&self, offset_x: f64, offset_y: f64, time: u32) -> EventSequenceState {
        let vertical = self.orientation() == Orientation::Vertical;
        let axis_offset = if vertical { offset_y } else { offset_x };
        let offset = if self.reversed() {
            axis_offset
        } else {
            -axis_offset
        };
        let offset_is_vertical = offset_y.abs() > offset_x.abs();
        let axis_matches = vertical == offset_is_vertical;

        let (state, delta) = {
            let mut gesture = self.gesture.lock();
            let delta = offset - gesture.prev_offset;
            gesture.prev_offset = offset;
            if gesture.state == SwipeState::Rejected {
                return EventSequenceState::Denied;
            }
            gesture.append_to_history(delta, time, self.config.event_history_threshold_ms);
            (gesture.state, delta)
        };

        match state {
            SwipeState::Idle => {
                if !axis_matches || !self.enabled() {
                    self.gesture.lock().state = SwipeState::Rejected;
                    return EventSequenceState::Denied;
                }
                let direction = if offset > 0.0 {
                    NavigationDirection::Forward
                } else {
                    NavigationDirection::Back
                };
                return if self.gesture_prepare(direction, true) {
                    EventSequenceState::None
                } else {
                    EventSequenceState::Denied
                };
            }
            SwipeState::Prepared => {
                if offset_x.hypot(offset_y) < self.config.drag_threshold {
                    return EventSequenceState::None;
                }
                if !axis_matches || self.is_overshooting(offset) {
                    self.gesture_cancel(true);
                    return EventSequenceState::Denied;
                }
                self.gesture_begin();
                self.gesture.lock().prev_offset = offset;
            }
            SwipeState::Dragging | SwipeState::Rejected => {}
        }

        if let Some(distance) = self.drag_distance() {
            self.gesture_update(delta / distance);
        }
        EventSequenceState::Claimed
    }

    /// The drag was released.
    pub fn drag_end(&self, time: u32) {
        let state = self.gesture.lock().state;
        match state {
            SwipeState::Rejected => self.gesture.lock().reset(),
            SwipeState::Dragging => match self.drag_distance() {
                Some(distance) => self.gesture_end(distance, time, false),
                None => self.gesture_cancel(false),
            },
            SwipeState::Idle | SwipeState::Prepared => self.gesture_cancel(false),
        }
    }

    /// The drag was taken away by the host.
    pub fn drag_cancel(&self) {
        self.gesture_cancel(false);
    }

    /// Record the pointer position, used as the origin of touchpad swipes.
    pub fn pointer_motion(&self, x: f64, y: f64) {
        let mut gesture = self.gesture.lock();
        gesture.pointer_x = x;
        gesture.pointer_y = y;
    }

    // -------------------------------------------------------------------------
    // Touchpad input
    // -------------------------------------------------------------------------

    /// A scroll event. Only smooth touchpad scrolls swipe; everything else
    /// propagates untouched.
    pub fn scroll(&self, event: ScrollEvent) -> Propagation {
        if event.source != InputSource::Touchpad || !event.smooth {
            return Propagation::Proceed;
        }

        let vertical = self.orientation() == Orientation::Vertical;
        let axis_delta = if vertical { event.dy } else { event.dx };
        let delta = if self.reversed() {
            -axis_delta
        } else {
            axis_delta
        };
        let distance = if vertical {
            self.config.touchpad_base_distance_v
        } else {
            self.config.touchpad_base_distance_h
        };
        let multiplier = self.config.scroll_multiplier;
        let window = self.config.event_history_threshold_ms;

        match self.state() {
            SwipeState::Rejected => {
                if event.is_stop {
                    self.gesture.lock().reset();
                }
                return Propagation::Proceed;
            }
            SwipeState::Idle => {
                if event.is_stop {
                    return Propagation::Proceed;
                }
                if !self.enabled() {
                    tracing::warn!(target: targets::SWIPE, "scroll on a disabled swipe tracker ignored");
                    return Propagation::Proceed;
                }
                {
                    let mut gesture = self.gesture.lock();
                    gesture.start_x = gesture.pointer_x;
                    gesture.start_y = gesture.pointer_y;
                }
                let direction = if delta > 0.0 {
                    NavigationDirection::Forward
                } else {
                    NavigationDirection::Back
                };
                self.gesture_prepare(direction, false);
            }
            SwipeState::Prepared | SwipeState::Dragging => {}
        }

        if self.state() == SwipeState::Prepared {
            if self.is_overshooting(delta) {
                self.gesture_cancel(true);
            } else {
                self.gesture_begin();
            }
        }

        if self.state() == SwipeState::Dragging {
            if event.is_stop {
                self.gesture_end(distance, event.time, true);
            } else {
                self.gesture
                    .lock()
                    .append_to_history(delta * multiplier, event.time, window);
                self.gesture_update(delta / distance * multiplier);
                return Propagation::Stop;
            }
        }

        Propagation::Proceed
    }

    // -------------------------------------------------------------------------
    // Gesture steps
    // -------------------------------------------------------------------------

    fn drag_distance(&self) -> Option<f64> {
        let distance = self.swipeable()?.distance();
        validate_distance(distance).ok().map(|()| distance)
    }

    /// Whether moving by `offset` would leave the snap point range on an
    /// edge that does not overshoot.
    fn is_overshooting(&self, offset: f64) -> bool {
        let Some(swipeable) = self.swipeable() else {
            return true;
        };
        let Some((first, last)) = range(&swipeable.snap_points()) else {
            return true;
        };
        let progress = self.gesture.lock().progress;
        (offset < 0.0 && progress <= first && !self.lower_overshoot())
            || (offset > 0.0 && progress >= last && !self.upper_overshoot())
    }

    fn gesture_prepare(&self, direction: NavigationDirection, is_drag: bool) -> bool {
        let (start_x, start_y) = {
            let gesture = self.gesture.lock();
            if gesture.state != SwipeState::Idle {
                return false;
            }
            (gesture.start_x, gesture.start_y)
        };

        let Some(swipeable) = self.swipeable() else {
            tracing::debug!(target: targets::SWIPE, "swipeable is gone, rejecting gesture");
            self.gesture.lock().state = SwipeState::Rejected;
            return false;
        };

        let usable = validate_snap_points(&swipeable.snap_points()).and_then(|()| {
            if is_drag {
                validate_distance(swipeable.distance())
            } else {
                Ok(())
            }
        });
        if let Err(err) = usable {
            tracing::warn!(target: targets::SWIPE, %err, "swipeable cannot be swiped");
            self.gesture.lock().state = SwipeState::Rejected;
            return false;
        }

        if swipeable
            .swipe_area(direction, is_drag)
            .is_some_and(|area| !area.contains(start_x, start_y))
        {
            tracing::debug!(
                target: targets::SWIPE,
                start_x,
                start_y,
                "gesture started outside the swipe area"
            );
            self.gesture.lock().state = SwipeState::Rejected;
            return false;
        }

        tracing::debug!(target: targets::SWIPE, ?direction, is_drag, "swipe prepared");
        self.prepare.emit(direction);

        // Read after `prepare`: handlers may move the swipeable.
        let progress = swipeable.progress();
        let mut gesture = self.gesture.lock();
        gesture.initial_progress = progress;
        gesture.raw_progress = progress;
        gesture.progress = progress;
        gesture.state = SwipeState::Prepared;
        true
    }

    fn gesture_begin(&self) {
        {
            let mut gesture = self.gesture.lock();
            if gesture.state != SwipeState::Prepared {
                return;
            }
            gesture.state = SwipeState::Dragging;
        }
        tracing::debug!(target: targets::SWIPE, "swipe began");
        self.begin_swipe.emit(());
    }

    fn gesture_update(&self, delta: f64) {
        let Some(swipeable) = self.swipeable() else {
            return;
        };
        let points = swipeable.snap_points();
        let Some((first, last)) = range(&points) else {
            return;
        };
        let allow_long_swipes = self.allow_long_swipes();
        let upper_overshoot = self.upper_overshoot();
        let lower_overshoot = self.lower_overshoot();

        let progress = {
            let mut gesture = self.gesture.lock();
            if gesture.state != SwipeState::Dragging {
                return;
            }
            let (lower, upper) = if allow_long_swipes {
                (first, last)
            } else {
                bounds(&points, gesture.initial_progress)
            };

            let raw = gesture.raw_progress + delta;
            let (raw, progress) = if raw > upper {
                if upper_overshoot && upper >= last {
                    (raw, upper + self.config.rubber_band(raw - upper))
                } else {
                    (upper, upper)
                }
            } else if raw < lower {
                if lower_overshoot && lower <= first {
                    (raw, lower + self.config.rubber_band(raw - lower))
                } else {
                    (lower, lower)
                }
            } else {
                (raw, raw)
            };
            gesture.raw_progress = raw;
            gesture.progress = progress;
            progress
        };

        tracing::trace!(target: targets::SWIPE, progress, "swipe updated");
        self.update_swipe.emit(progress);
    }

    fn gesture_end(&self, distance: f64, time: u32, touchpad: bool) {
        let Some(swipeable) = self.swipeable() else {
            self.gesture.lock().reset();
            return;
        };
        let points = swipeable.snap_points();
        let cancel_progress = swipeable.cancel_progress();
        let allow_long_swipes = self.allow_long_swipes();

        let end = {
            let mut gesture = self.gesture.lock();
            if gesture.state == SwipeState::Idle {
                return;
            }
            gesture.trim_history(time, self.config.event_history_threshold_ms);
            let velocity = gesture.velocity();
            let to = self
                .end_progress(&gesture, &points, velocity, touchpad, allow_long_swipes)
                .unwrap_or(cancel_progress);
            let from = gesture.progress;

            let mut velocity = velocity / distance * 1000.0;
            if (to - from) * velocity <= 0.0 {
                velocity = 0.0;
            }
            gesture.reset();
            EndSwipe { from, to, velocity }
        };

        tracing::debug!(
            target: targets::SWIPE,
            from = end.from,
            to = end.to,
            velocity = end.velocity,
            "swipe ended"
        );
        self.end_swipe.emit(end);
    }

    /// Abandon the gesture. If one was under way, report the cancel
    /// progress. With `reject`, the rest of the input sequence is ignored.
    fn gesture_cancel(&self, reject: bool) {
        let was_active = {
            let mut gesture = self.gesture.lock();
            let active = matches!(gesture.state, SwipeState::Prepared | SwipeState::Dragging);
            gesture.reset();
            if reject {
                gesture.state = SwipeState::Rejected;
            }
            active
        };
        if !was_active {
            return;
        }
        let Some(swipeable) = self.swipeable() else {
            return;
        };
        let cancel_progress = swipeable.cancel_progress();
        tracing::debug!(target: targets::SWIPE, cancel_progress, "swipe cancelled");
        self.swipe_cancelled.emit(cancel_progress);
    }

    /// The snap point a release with `velocity` (input units per
    /// millisecond) settles on.
    fn end_progress(
        &self,
        gesture: &Gesture,
        points: &[f64],
        velocity: f64,
        touchpad: bool,
        allow_long_swipes: bool,
    ) -> Option<f64> {
        let (first, last) = range(points)?;

        if velocity.abs() < self.config.velocity_threshold(touchpad) {
            return Some(points[closest_point(points, gesture.progress)]);
        }

        let (lower, upper) = if allow_long_swipes {
            (first, last)
        } else {
            bounds(points, gesture.initial_progress)
        };
        let pos = (gesture.progress + self.config.project(velocity, touchpad)).clamp(lower, upper);
        Some(points[projection_point(points, pos, velocity, gesture.initial_progress)])
    }
}

impl fmt::Debug for SwipeTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwipeTracker")
            .field("state", &self.state())
            .field("enabled", &self.enabled())
            .field("orientation", &self.orientation())
            .field("reversed", &self.reversed())
            .field("allow_mouse_drag", &self.allow_mouse_drag())
            .field("allow_long_swipes", &self.allow_long_swipes())
            .field("upper_overshoot", &self.upper_overshoot())
            .field("lower_overshoot", &self.lower_overshoot())
            .finish_non_exhaustive()
    }
}

static_assertions::assert_impl_all!(SwipeTracker: Send, Sync);
static_assertions::assert_impl_all!(EndSwipe: Send, Sync, Copy);

// -----------------------------------------------------------------------------
// Snap point arithmetic. `points` is sorted and, where indexed, non-empty.
// -----------------------------------------------------------------------------

fn range(points: &[f64]) -> Option<(f64, f64)> {
    Some((*points.first()?, *points.last()?))
}

fn closest_point(points: &[f64], pos: f64) -> usize {
    let mut closest = 0;
    let mut min_distance = f64::INFINITY;
    for (i, point) in points.iter().enumerate() {
        let distance = (point - pos).abs();
        if distance < min_distance {
            closest = i;
            min_distance = distance;
        }
    }
    closest
}

/// The first point at or after `pos`.
fn next_point(points: &[f64], pos: f64) -> Option<usize> {
    points.iter().position(|&point| point >= pos)
}

/// The last point at or before `pos`.
fn previous_point(points: &[f64], pos: f64) -> Option<usize> {
    points.iter().rposition(|&point| point <= pos)
}

/// The progress range reachable from `pos` without long swipes: one snap
/// point either side of the point (or pair of points) around it.
fn bounds(points: &[f64], pos: f64) -> (f64, f64) {
    let last = points.len() - 1;
    let closest = closest_point(points, pos);
    let (prev, next) = if (points[closest] - pos).abs() < SNAP_EPSILON {
        (Some(closest), Some(closest))
    } else {
        (previous_point(points, pos), next_point(points, pos))
    };
    let lower = prev.map_or(0, |i| i.saturating_sub(1));
    let upper = next.map_or(last, |i| (i + 1).min(last));
    (points[lower], points[upper])
}

/// The snap point a fling projected to `pos` lands on.
///
/// A fling that would settle back on the point the gesture started from
/// moves on to the neighbouring point in the direction of travel instead.
fn projection_point(points: &[f64], pos: f64, velocity: f64, initial_progress: f64) -> usize {
    let initial = closest_point(points, initial_progress);
    let prev = previous_point(points, pos);
    let next = next_point(points, pos);

    let (behind, ahead) = if velocity > 0.0 {
        (prev, next)
    } else {
        (next, prev)
    };
    if behind == Some(initial) {
        if let Some(ahead) = ahead {
            return ahead;
        }
    }
    closest_point(points, pos)
}
