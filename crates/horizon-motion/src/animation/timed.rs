//! Timed animations.
//!
//! A [`TimedAnimation`] interpolates between two values over a fixed duration
//! using an [`Easing`] curve, optionally repeating, playing backwards, or
//! alternating direction on each iteration.

use std::sync::Arc;

use horizon_motion_core::Surface;

use super::easing::{ease, lerp, Easing};
use super::scheduler::{Animation, AnimationProperty, ValueCurve, DURATION_INFINITE};
use super::target::AnimationTarget;

/// Default easing of timed animations.
pub const DEFAULT_EASING: Easing = Easing::EaseOutCubic;

/// Default repeat count of timed animations.
pub const DEFAULT_REPEAT_COUNT: u32 = 1;

/// The value curve of a [`TimedAnimation`].
#[derive(Debug, Clone, PartialEq)]
pub struct TimedCurve {
    /// Start value.
    pub value_from: f64,
    /// End value.
    pub value_to: f64,
    /// Duration of one iteration in milliseconds.
    pub duration: u32,
    /// Easing applied within each iteration.
    pub easing: Easing,
    /// Number of iterations; 0 repeats forever.
    pub repeat_count: u32,
    /// Play from `value_to` to `value_from`.
    pub reverse: bool,
    /// Flip direction on every other iteration.
    pub alternate: bool,
}

impl TimedCurve {
    /// A single, forward iteration with the default easing.
    pub fn new(value_from: f64, value_to: f64, duration: u32) -> Self {
        Self {
            value_from,
            value_to,
            duration,
            easing: DEFAULT_EASING,
            repeat_count: DEFAULT_REPEAT_COUNT,
            reverse: false,
            alternate: false,
        }
    }
}

impl ValueCurve for TimedCurve {
    fn calculate_value(&mut self, t: u32) -> f64 {
        if self.duration == 0 {
            return self.value_to;
        }

        let position = f64::from(t) / f64::from(self.duration);
        let iteration = position.trunc();
        let mut progress = position - iteration;

        let mut reverse = self.alternate && (iteration as u64) % 2 == 1;
        if self.reverse {
            reverse = !reverse;
        }

        // Land exactly on the terminal value instead of an interpolated one.
        if t >= self.estimate_duration() {
            return if self.alternate == reverse {
                self.value_to
            } else {
                self.value_from
            };
        }

        if reverse {
            progress = 1.0 - progress;
        }

        lerp(self.value_from, self.value_to, ease(self.easing, progress))
    }

    fn estimate_duration(&self) -> u32 {
        if self.repeat_count == 0 {
            return DURATION_INFINITE;
        }
        self.duration.saturating_mul(self.repeat_count)
    }
}

/// An animation interpolating between two values over a fixed duration.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use horizon_motion::animation::{AnimationTarget, Easing, TimedAnimation};
/// use horizon_motion_core::{AnimationSettings, ManualFrameClock, Property, Surface};
///
/// let clock = ManualFrameClock::new();
/// let surface = Surface::new(clock.clone(), AnimationSettings::new());
/// let opacity = Arc::new(Property::new(0.0));
///
/// let fade = TimedAnimation::new(&surface, 0.0, 1.0, 200, AnimationTarget::property(&opacity))
///     .with_easing(Easing::Linear);
/// fade.play();
/// clock.advance(100);
/// assert_eq!(opacity.get(), 0.5);
/// ```
pub type TimedAnimation = Animation<TimedCurve>;

impl Animation<TimedCurve> {
    /// Create a timed animation from `value_from` to `value_to` lasting
    /// `duration` milliseconds.
    pub fn new(
        surface: &Arc<Surface>,
        value_from: f64,
        value_to: f64,
        duration: u32,
        target: AnimationTarget,
    ) -> Self {
        Self::from_curve(surface, TimedCurve::new(value_from, value_to, duration), target)
    }

    /// Builder form of [`set_easing`](Self::set_easing).
    pub fn with_easing(self, easing: Easing) -> Self {
        self.set_easing(easing);
        self
    }

    /// Builder form of [`set_repeat_count`](Self::set_repeat_count).
    pub fn with_repeat_count(self, repeat_count: u32) -> Self {
        self.set_repeat_count(repeat_count);
        self
    }

    /// Builder form of [`set_reverse`](Self::set_reverse).
    pub fn with_reverse(self, reverse: bool) -> Self {
        self.set_reverse(reverse);
        self
    }

    /// Builder form of [`set_alternate`](Self::set_alternate).
    pub fn with_alternate(self, alternate: bool) -> Self {
        self.set_alternate(alternate);
        self
    }

    /// The start value.
    pub fn value_from(&self) -> f64 {
        self.with_curve(|c| c.value_from)
    }

    /// Set the start value.
    pub fn set_value_from(&self, value: f64) {
        self.update_curve(AnimationProperty::ValueFrom, |c| {
            replace_if_changed(&mut c.value_from, value)
        });
    }

    /// The end value.
    pub fn value_to(&self) -> f64 {
        self.with_curve(|c| c.value_to)
    }

    /// Set the end value.
    pub fn set_value_to(&self, value: f64) {
        self.update_curve(AnimationProperty::ValueTo, |c| {
            replace_if_changed(&mut c.value_to, value)
        });
    }

    /// Duration of one iteration, in milliseconds.
    pub fn duration(&self) -> u32 {
        self.with_curve(|c| c.duration)
    }

    /// Set the duration of one iteration, in milliseconds.
    pub fn set_duration(&self, duration: u32) {
        self.update_curve(AnimationProperty::Duration, |c| {
            replace_if_changed(&mut c.duration, duration)
        });
    }

    /// The easing curve.
    pub fn easing(&self) -> Easing {
        self.with_curve(|c| c.easing)
    }

    /// Set the easing curve.
    pub fn set_easing(&self, easing: Easing) {
        self.update_curve(AnimationProperty::Easing, |c| {
            replace_if_changed(&mut c.easing, easing)
        });
    }

    /// Number of iterations; 0 means forever.
    pub fn repeat_count(&self) -> u32 {
        self.with_curve(|c| c.repeat_count)
    }

    /// Set the number of iterations; 0 means forever.
    pub fn set_repeat_count(&self, repeat_count: u32) {
        self.update_curve(AnimationProperty::RepeatCount, |c| {
            replace_if_changed(&mut c.repeat_count, repeat_count)
        });
    }

    /// Whether the animation plays backwards.
    pub fn reverse(&self) -> bool {
        self.with_curve(|c| c.reverse)
    }

    /// Set whether the animation plays backwards.
    pub fn set_reverse(&self, reverse: bool) {
        self.update_curve(AnimationProperty::Reverse, |c| {
            replace_if_changed(&mut c.reverse, reverse)
        });
    }

    /// Whether the direction flips on every iteration.
    pub fn alternate(&self) -> bool {
        self.with_curve(|c| c.alternate)
    }

    /// Set whether the direction flips on every iteration.
    pub fn set_alternate(&self, alternate: bool) {
        self.update_curve(AnimationProperty::Alternate, |c| {
            replace_if_changed(&mut c.alternate, alternate)
        });
    }
}

pub(crate) fn replace_if_changed<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear(from: f64, to: f64, duration: u32) -> TimedCurve {
        TimedCurve {
            easing: Easing::Linear,
            ..TimedCurve::new(from, to, duration)
        }
    }

    #[test]
    fn test_defaults() {
        let curve = TimedCurve::new(0.0, 1.0, 250);
        assert_eq!(curve.easing, Easing::EaseOutCubic);
        assert_eq!(curve.repeat_count, 1);
        assert!(!curve.reverse && !curve.alternate);
        assert_eq!(curve.estimate_duration(), 250);
    }

    #[test]
    fn test_single_iteration() {
        let mut curve = linear(0.0, 1.0, 200);
        assert_eq!(curve.calculate_value(0), 0.0);
        assert!((curve.calculate_value(100) - 0.5).abs() < 1e-12);
        assert_eq!(curve.calculate_value(200), 1.0);
        assert_eq!(curve.calculate_value(5000), 1.0);
    }

    #[test]
    fn test_zero_duration_returns_end() {
        let mut curve = linear(3.0, 7.0, 0);
        assert_eq!(curve.calculate_value(0), 7.0);
        assert_eq!(curve.estimate_duration(), 0);
    }

    #[test]
    fn test_reverse() {
        let mut curve = TimedCurve {
            reverse: true,
            ..linear(0.0, 1.0, 100)
        };
        assert_eq!(curve.calculate_value(0), 1.0);
        assert!((curve.calculate_value(25) - 0.75).abs() < 1e-12);
        assert_eq!(curve.calculate_value(100), 0.0);
    }

    #[test]
    fn test_alternate_terminal_values() {
        for repeat_count in 1..=4 {
            for reverse in [false, true] {
                let mut curve = TimedCurve {
                    repeat_count,
                    reverse,
                    alternate: true,
                    ..linear(-2.0, 5.0, 100)
                };
                let total = curve.estimate_duration();
                let odd = repeat_count % 2 == 1;
                let expected = if odd != reverse { 5.0 } else { -2.0 };
                assert_eq!(curve.calculate_value(total), expected, "repeat {repeat_count}, reverse {reverse}");
            }
        }
    }

    #[test]
    fn test_terminal_value_checks_total_duration() {
        // One iteration is over, but the animation is not.
        let mut curve = TimedCurve {
            repeat_count: 3,
            ..linear(0.0, 1.0, 100)
        };
        assert_eq!(curve.calculate_value(100), 0.0);
        assert!((curve.calculate_value(150) - 0.5).abs() < 1e-12);
        assert_eq!(curve.calculate_value(300), 1.0);
    }

    #[test]
    fn test_infinite_repeat() {
        let mut curve = TimedCurve {
            repeat_count: 0,
            ..linear(0.0, 1.0, 100)
        };
        assert_eq!(curve.estimate_duration(), DURATION_INFINITE);
        assert!((curve.calculate_value(1_000_050) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_total_duration_saturates() {
        let curve = TimedCurve {
            repeat_count: 1_000,
            ..linear(0.0, 1.0, u32::MAX / 10)
        };
        assert_eq!(curve.estimate_duration(), DURATION_INFINITE);
    }

    #[test]
    fn test_idle_value_follows_configuration() {
        use horizon_motion_core::{AnimationSettings, ManualFrameClock};
        use parking_lot::Mutex;

        let clock = ManualFrameClock::new();
        let surface = Surface::new(clock.clone(), AnimationSettings::new());
        let pushed = Arc::new(Mutex::new(Vec::new()));
        let pushed_clone = pushed.clone();
        let animation = TimedAnimation::new(
            &surface,
            0.0,
            1.0,
            100,
            AnimationTarget::callback(move |v| pushed_clone.lock().push(v)),
        )
        .with_reverse(true);
        assert_eq!(animation.value(), 1.0);

        animation.set_reverse(false);
        animation.set_value_from(5.0);
        assert_eq!(animation.value(), 5.0);
        assert!(pushed.lock().is_empty());

        animation.reset();
        assert_eq!(animation.value(), 5.0);

        // Outside Idle the value belongs to the clock.
        animation.play();
        clock.advance(50);
        let playing = animation.value();
        animation.set_value_from(0.0);
        assert_eq!(animation.value(), playing);
    }
}
