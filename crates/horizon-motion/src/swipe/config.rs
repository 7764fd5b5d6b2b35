//! Swipe tracker thresholds.

/// Distance, in pixels, a drag must travel before it is claimed.
pub const DEFAULT_DRAG_THRESHOLD: f64 = 16.0;

/// Input events older than this many milliseconds are ignored when
/// computing the release velocity.
pub const DEFAULT_EVENT_HISTORY_THRESHOLD_MS: u32 = 150;

/// Minimum touch release velocity, in pixels per millisecond, for a fling.
pub const DEFAULT_TOUCH_VELOCITY_THRESHOLD: f64 = 0.3;

/// Minimum touchpad release velocity, in pixels per millisecond, for a fling.
pub const DEFAULT_TOUCHPAD_VELOCITY_THRESHOLD: f64 = 0.6;

/// Per-millisecond deceleration of a touch fling.
pub const DEFAULT_TOUCH_DECELERATION: f64 = 0.998;

/// Per-millisecond deceleration of a touchpad fling.
pub const DEFAULT_TOUCHPAD_DECELERATION: f64 = 0.997;

/// Velocity, in pixels per millisecond, above which the projected distance
/// grows along a parabola instead of linearly.
pub const DEFAULT_VELOCITY_CURVE_THRESHOLD: f64 = 2.0;

/// Steepness of the parabola used for fast flings.
pub const DEFAULT_DECELERATION_PARABOLA_MULTIPLIER: f64 = 0.35;

/// Pixels of touchpad travel mapped to one progress unit, horizontally.
pub const DEFAULT_TOUCHPAD_BASE_DISTANCE_H: f64 = 400.0;

/// Pixels of touchpad travel mapped to one progress unit, vertically.
pub const DEFAULT_TOUCHPAD_BASE_DISTANCE_V: f64 = 300.0;

/// Multiplier applied to smooth-scroll deltas.
pub const DEFAULT_SCROLL_MULTIPLIER: f64 = 10.0;

/// Progress distance a rubber-banded overshoot approaches but never reaches.
pub const DEFAULT_OVERSHOOT_RESISTANCE: f64 = 0.5;

/// Tunable thresholds of a [`SwipeTracker`](super::SwipeTracker).
///
/// The defaults match the feel of touch and touchpad swipes on common
/// hardware; most hosts never change them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeTrackerConfig {
    /// Pixels a drag must travel before it is claimed.
    pub drag_threshold: f64,
    /// Window, in milliseconds, of events used for the release velocity.
    pub event_history_threshold_ms: u32,
    /// Fling velocity threshold for touch, in pixels per millisecond.
    pub touch_velocity_threshold: f64,
    /// Fling velocity threshold for touchpads, in pixels per millisecond.
    pub touchpad_velocity_threshold: f64,
    /// Deceleration of touch flings.
    pub touch_deceleration: f64,
    /// Deceleration of touchpad flings.
    pub touchpad_deceleration: f64,
    /// Velocity above which projections follow a parabola.
    pub velocity_curve_threshold: f64,
    /// Steepness of that parabola.
    pub deceleration_parabola_multiplier: f64,
    /// Touchpad pixels per progress unit for horizontal trackers.
    pub touchpad_base_distance_h: f64,
    /// Touchpad pixels per progress unit for vertical trackers.
    pub touchpad_base_distance_v: f64,
    /// Smooth-scroll delta multiplier.
    pub scroll_multiplier: f64,
    /// Asymptote of rubber-banded overshoot, in progress units.
    pub overshoot_resistance: f64,
}

impl Default for SwipeTrackerConfig {
    fn default() -> Self {
        Self {
            drag_threshold: DEFAULT_DRAG_THRESHOLD,
            event_history_threshold_ms: DEFAULT_EVENT_HISTORY_THRESHOLD_MS,
            touch_velocity_threshold: DEFAULT_TOUCH_VELOCITY_THRESHOLD,
            touchpad_velocity_threshold: DEFAULT_TOUCHPAD_VELOCITY_THRESHOLD,
            touch_deceleration: DEFAULT_TOUCH_DECELERATION,
            touchpad_deceleration: DEFAULT_TOUCHPAD_DECELERATION,
            velocity_curve_threshold: DEFAULT_VELOCITY_CURVE_THRESHOLD,
            deceleration_parabola_multiplier: DEFAULT_DECELERATION_PARABOLA_MULTIPLIER,
            touchpad_base_distance_h: DEFAULT_TOUCHPAD_BASE_DISTANCE_H,
            touchpad_base_distance_v: DEFAULT_TOUCHPAD_BASE_DISTANCE_V,
            scroll_multiplier: DEFAULT_SCROLL_MULTIPLIER,
            overshoot_resistance: DEFAULT_OVERSHOOT_RESISTANCE,
        }
    }
}

impl SwipeTrackerConfig {
    /// The velocity threshold for the given input kind.
    pub(crate) fn velocity_threshold(&self, touchpad: bool) -> f64 {
        if touchpad {
            self.touchpad_velocity_threshold
        } else {
            self.touch_velocity_threshold
        }
    }

    /// The deceleration for the given input kind.
    pub(crate) fn deceleration(&self, touchpad: bool) -> f64 {
        if touchpad {
            self.touchpad_deceleration
        } else {
            self.touch_deceleration
        }
    }

    /// Project a release velocity, in pixels per millisecond, into a
    /// distance in progress units.
    ///
    /// The sign of the result follows the sign of `velocity`.
    pub fn project(&self, velocity: f64, touchpad: bool) -> f64 {
        let deceleration = self.deceleration(touchpad);
        let slope = deceleration / (1.0 - deceleration) / 1000.0;
        let speed = velocity.abs();

        let distance = if speed > self.velocity_curve_threshold {
            let k = self.deceleration_parabola_multiplier;
            let c = slope / 2.0 / k;
            let x = speed - self.velocity_curve_threshold + c;
            k * x * x - k * c * c + slope * self.velocity_curve_threshold
        } else {
            speed * slope
        };

        distance.copysign(velocity)
    }

    /// Map `extra` progress past a boundary onto a rubber band that
    /// approaches [`overshoot_resistance`](Self::overshoot_resistance).
    pub fn rubber_band(&self, extra: f64) -> f64 {
        let k = self.overshoot_resistance;
        if k <= 0.0 {
            return 0.0;
        }
        extra / (1.0 + extra.abs() / k)
    }
}
