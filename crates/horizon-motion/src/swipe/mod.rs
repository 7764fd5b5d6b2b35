//! Swipe gestures.
//!
//! A widget that can be swiped implements [`Swipeable`] and feeds its input
//! to a [`SwipeTracker`]. The tracker reports progress while the gesture
//! moves and, on release, an [`EndSwipe`] describing where and how fast to
//! settle. [`EndSwipe::into_spring_animation`] turns that into a
//! [`SpringAnimation`](crate::animation::SpringAnimation).
//!
//! Progress is measured in the swipeable's own units: snap points are the
//! rest positions, and [`Swipeable::distance`] pixels of drag move the
//! progress by one unit.

mod config;
mod group;
mod swipeable;
mod tracker;

pub use config::{
    SwipeTrackerConfig, DEFAULT_DECELERATION_PARABOLA_MULTIPLIER, DEFAULT_DRAG_THRESHOLD,
    DEFAULT_EVENT_HISTORY_THRESHOLD_MS, DEFAULT_OVERSHOOT_RESISTANCE, DEFAULT_SCROLL_MULTIPLIER,
    DEFAULT_TOUCHPAD_BASE_DISTANCE_H, DEFAULT_TOUCHPAD_BASE_DISTANCE_V,
    DEFAULT_TOUCHPAD_DECELERATION, DEFAULT_TOUCHPAD_VELOCITY_THRESHOLD,
    DEFAULT_TOUCH_DECELERATION, DEFAULT_TOUCH_VELOCITY_THRESHOLD,
    DEFAULT_VELOCITY_CURVE_THRESHOLD,
};
pub use group::{MemberId, SwipeGroup};
pub use swipeable::{
    validate_distance, validate_snap_points, EventSequenceState, InputSource,
    NavigationDirection, Orientation, Propagation, Rect, ScrollEvent, Swipeable,
};
pub use tracker::{EndSwipe, SwipeState, SwipeTracker, SwipeTrackerProperty};
