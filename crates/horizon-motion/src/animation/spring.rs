//! Spring animations.
//!
//! A [`SpringAnimation`] moves a value with a damped harmonic oscillator. The
//! motion is evaluated in closed form, so any elapsed time can be sampled
//! directly and frame drops never change the path.
//!
//! Springs have no fixed duration; it is estimated from the parameters as the
//! first time at which both the distance to `value_to` and the velocity are
//! below `epsilon`. An undamped spring never settles, and its estimated
//! duration is [`DURATION_INFINITE`]: it only ends through
//! [`skip`](super::Animation::skip) or [`reset`](super::Animation::reset).

use std::sync::Arc;

use horizon_motion_core::logging::targets;
use horizon_motion_core::Surface;

use super::scheduler::{Animation, AnimationProperty, ValueCurve, DURATION_INFINITE};
use super::spring_params::SpringParams;
use super::target::AnimationTarget;
use super::timed::replace_if_changed;
use crate::error::{MotionError, Result};

/// Default rest threshold of spring animations.
pub const DEFAULT_EPSILON: f64 = 0.001;

/// Step, in seconds, of the numeric derivative used by the overdamped estimate.
const DELTA: f64 = 0.001;

/// Cap on millisecond steps when searching for a crossing or a rest point.
const MAX_ITERATIONS: u32 = 20_000;

/// Cap on Newton iterations of the overdamped estimate.
const MAX_NEWTON_ITERATIONS: u32 = 1_000;

/// Velocity threshold, relative to `epsilon`, below which a spring may rest.
/// Velocities are in units per second.
const VELOCITY_EPSILON_SCALE: f64 = 100.0;

/// The value curve of a [`SpringAnimation`].
#[derive(Debug, Clone, PartialEq)]
pub struct SpringCurve {
    value_from: f64,
    value_to: f64,
    params: SpringParams,
    initial_velocity: f64,
    velocity: f64,
    epsilon: f64,
    clamp: bool,
    estimated_duration: u32,
}

impl SpringCurve {
    /// A spring at rest at `value_from`, pulled towards `value_to`.
    pub fn new(value_from: f64, value_to: f64, params: SpringParams) -> Self {
        let mut curve = Self {
            value_from,
            value_to,
            params,
            initial_velocity: 0.0,
            velocity: 0.0,
            epsilon: DEFAULT_EPSILON,
            clamp: false,
            estimated_duration: 0,
        };
        curve.refresh_estimate();
        curve
    }

    /// The value at `t` milliseconds, without recording the velocity.
    pub fn value_at(&self, t: u32) -> f64 {
        if t >= self.estimated_duration {
            return self.value_to;
        }
        self.clamp_value(self.oscillate(t).0)
    }

    /// The velocity at `t` milliseconds, in units per second.
    pub fn velocity_at(&self, t: u32) -> f64 {
        if t >= self.estimated_duration {
            return 0.0;
        }
        self.oscillate(t).1
    }

    /// The velocity recorded by the last [`calculate_value`](ValueCurve::calculate_value).
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    fn clamp_value(&self, value: f64) -> f64 {
        if self.clamp {
            let (low, high) = if self.value_from <= self.value_to {
                (self.value_from, self.value_to)
            } else {
                (self.value_to, self.value_from)
            };
            value.clamp(low, high)
        } else {
            value
        }
    }

    fn refresh_estimate(&mut self) {
        self.estimated_duration = self.calculate_duration();
        tracing::trace!(
            target: targets::SPRING,
            estimated_duration = self.estimated_duration,
            "spring duration estimated"
        );
    }

    fn beta(&self) -> f64 {
        self.params.damping() / (2.0 * self.params.mass())
    }

    fn omega0(&self) -> f64 {
        (self.params.stiffness() / self.params.mass()).sqrt()
    }

    // Position and velocity at `time` ms. Solutions of m*x'' + b*x' + k*x = 0
    // of the form C1*e^(l1*t) + C2*e^(l2*t), shifted to rest at `value_to`.
    fn oscillate(&self, time: u32) -> (f64, f64) {
        self.oscillate_secs(f64::from(time) / 1000.0)
    }

    fn oscillate_secs(&self, t: f64) -> (f64, f64) {
        let beta = self.beta();
        let omega0 = self.omega0();
        let v0 = self.initial_velocity;
        let x0 = self.value_from - self.value_to;
        let envelope = (-beta * t).exp();

        // f64::EPSILON is too strict to classify critical damping reliably.
        if approx_eq(beta, omega0, f64::from(f32::EPSILON)) {
            let value = self.value_to + envelope * (x0 + (beta * x0 + v0) * t);
            let velocity = envelope * (-beta * t * v0 - beta * beta * t * x0 + v0);
            return (value, velocity);
        }

        if beta < omega0 {
            let omega1 = (omega0 * omega0 - beta * beta).sqrt();
            let (sin, cos) = (omega1 * t).sin_cos();
            let value = self.value_to + envelope * (x0 * cos + ((beta * x0 + v0) / omega1) * sin);
            let velocity = envelope
                * (v0 * cos - (x0 * omega1 + (beta * beta * x0 + beta * v0) / omega1) * sin);
            return (value, velocity);
        }

        let omega2 = (beta * beta - omega0 * omega0).sqrt();
        let (sinh, cosh) = ((omega2 * t).sinh(), (omega2 * t).cosh());
        let value = self.value_to + envelope * (x0 * cosh + ((beta * x0 + v0) / omega2) * sinh);
        let velocity =
            envelope * (v0 * cosh + (omega2 * x0 - (beta * beta * x0 + beta * v0) / omega2) * sinh);
        (value, velocity)
    }

    // First millisecond at which the spring gets within epsilon of `value_to`,
    // skipping t = 0 so that in-place springs do not end immediately.
    fn first_zero(&self) -> Option<u32> {
        let forward = self.value_to - self.value_from > f64::EPSILON;
        let backward = self.value_from - self.value_to > f64::EPSILON;

        let mut i = 1;
        let mut y = self.oscillate(i).0;
        while (forward && self.value_to - y > self.epsilon)
            || (backward && y - self.value_to > self.epsilon)
        {
            if i > MAX_ITERATIONS {
                return None;
            }
            i += 1;
            y = self.oscillate(i).0;
        }
        Some(i)
    }

    fn calculate_duration(&self) -> u32 {
        let beta = self.beta();
        if beta < 0.0 || approx_eq(beta, 0.0, f64::EPSILON) {
            return DURATION_INFINITE;
        }

        if self.clamp {
            if approx_eq(self.value_to, self.value_from, f64::EPSILON) {
                return 0;
            }
            if let Some(zero) = self.first_zero() {
                return zero;
            }
            tracing::debug!(target: targets::SPRING, "clamped spring never reaches its target; using the rest estimate");
        }

        let omega0 = self.omega0();

        // The envelope reaching epsilon: exact enough for oscillating springs
        // and the first guess for overdamped ones.
        let mut x0 = -self.epsilon.ln() / beta;

        if !(approx_eq(beta, omega0, f64::from(f32::EPSILON)) || beta < omega0) {
            // Overdamped springs decay slower than their envelope: find where
            // the motion itself gets within epsilon, using Newton's method.
            match self.newton_rest_time(x0) {
                Some(x1) => x0 = x1,
                None => {
                    tracing::debug!(target: targets::SPRING, "newton estimate diverged; using the envelope")
                }
            }
        }

        let Some(start) = secs_to_millis(x0) else {
            return DURATION_INFINITE;
        };
        self.settle_from(start)
    }

    fn newton_rest_time(&self, mut x0: f64) -> Option<f64> {
        let target = self.value_to;
        let mut y0 = self.oscillate_secs(x0).0;
        let mut x1 = x0;
        let mut y1 = y0;
        let mut iterations = 0;

        loop {
            let m = (self.oscillate_secs(x0 + DELTA).0 - y0) / DELTA;
            if m == 0.0 || !m.is_finite() {
                return ((target - y1).abs() <= self.epsilon).then_some(x1);
            }
            x1 = (target - y0 + m * x0) / m;
            y1 = self.oscillate_secs(x1).0;

            if (target - y1).abs() <= self.epsilon {
                return (x1.is_finite() && x1 >= 0.0).then_some(x1);
            }
            if iterations > MAX_NEWTON_ITERATIONS {
                return None;
            }
            x0 = x1;
            y0 = y1;
            iterations += 1;
        }
    }

    // Walks forward from `start` until both the distance to the target and
    // the velocity are below their thresholds.
    fn settle_from(&self, start: u32) -> u32 {
        let velocity_epsilon = self.epsilon * VELOCITY_EPSILON_SCALE;
        let end = start.saturating_add(MAX_ITERATIONS).min(DURATION_INFINITE - 1);

        let mut t = start;
        while t < end {
            let (value, velocity) = self.oscillate(t);
            if (value - self.value_to).abs() <= self.epsilon && velocity.abs() <= velocity_epsilon {
                return t;
            }
            t += 1;
        }
        end
    }
}

impl ValueCurve for SpringCurve {
    fn calculate_value(&mut self, t: u32) -> f64 {
        if t >= self.estimated_duration {
            self.velocity = 0.0;
            return self.value_to;
        }

        let (value, velocity) = self.oscillate(t);
        self.velocity = velocity;
        self.clamp_value(value)
    }

    fn estimate_duration(&self) -> u32 {
        self.estimated_duration
    }
}

fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

fn secs_to_millis(secs: f64) -> Option<u32> {
    let millis = secs * 1000.0;
    if !millis.is_finite() || millis >= f64::from(DURATION_INFINITE) {
        return None;
    }
    // Truncation matches the millisecond resolution of frame times.
    Some(millis.max(0.0) as u32)
}

/// An animation driven by a damped spring.
///
/// # Example
///
/// ```
/// use horizon_motion::animation::{AnimationTarget, SpringAnimation, SpringParams};
/// use horizon_motion_core::{AnimationSettings, ManualFrameClock, Surface};
///
/// let clock = ManualFrameClock::new();
/// let surface = Surface::new(clock.clone(), AnimationSettings::new());
/// let spring = SpringAnimation::new(
///     &surface,
///     0.0,
///     1.0,
///     SpringParams::new(1.0, 1.0, 100.0)?,
///     AnimationTarget::none(),
/// );
///
/// spring.play();
/// while clock.tick_callback_count() > 0 {
///     clock.advance(16);
/// }
/// assert_eq!(spring.value(), 1.0);
/// # Ok::<(), horizon_motion::MotionError>(())
/// ```
pub type SpringAnimation = Animation<SpringCurve>;

impl Animation<SpringCurve> {
    /// Create a spring animation from `value_from` to `value_to`.
    pub fn new(
        surface: &Arc<Surface>,
        value_from: f64,
        value_to: f64,
        params: SpringParams,
        target: AnimationTarget,
    ) -> Self {
        Self::from_curve(surface, SpringCurve::new(value_from, value_to, params), target)
    }

    /// Builder form of [`set_initial_velocity`](Self::set_initial_velocity).
    pub fn with_initial_velocity(self, velocity: f64) -> Self {
        self.set_initial_velocity(velocity);
        self
    }

    /// Builder form of [`set_clamp`](Self::set_clamp).
    pub fn with_clamp(self, clamp: bool) -> Self {
        self.set_clamp(clamp);
        self
    }

    /// Builder form of [`set_epsilon`](Self::set_epsilon).
    pub fn with_epsilon(self, epsilon: f64) -> Result<Self> {
        self.set_epsilon(epsilon)?;
        Ok(self)
    }

    /// The start value.
    pub fn value_from(&self) -> f64 {
        self.with_curve(|c| c.value_from)
    }

    /// Set the start value.
    pub fn set_value_from(&self, value: f64) {
        self.update_spring(AnimationProperty::ValueFrom, |c| {
            replace_if_changed(&mut c.value_from, value)
        });
    }

    /// The rest value.
    pub fn value_to(&self) -> f64 {
        self.with_curve(|c| c.value_to)
    }

    /// Set the rest value.
    pub fn set_value_to(&self, value: f64) {
        self.update_spring(AnimationProperty::ValueTo, |c| {
            replace_if_changed(&mut c.value_to, value)
        });
    }

    /// The physical parameters.
    pub fn spring_params(&self) -> SpringParams {
        self.with_curve(|c| c.params)
    }

    /// Set the physical parameters.
    pub fn set_spring_params(&self, params: SpringParams) {
        self.update_spring(AnimationProperty::SpringParams, |c| {
            replace_if_changed(&mut c.params, params)
        });
    }

    /// The velocity at the start, in units per second.
    pub fn initial_velocity(&self) -> f64 {
        self.with_curve(|c| c.initial_velocity)
    }

    /// Set the velocity at the start, in units per second.
    ///
    /// Hand-offs from a gesture pass the release velocity here.
    pub fn set_initial_velocity(&self, velocity: f64) {
        self.update_spring(AnimationProperty::InitialVelocity, |c| {
            replace_if_changed(&mut c.initial_velocity, velocity)
        });
    }

    /// The rest threshold.
    pub fn epsilon(&self) -> f64 {
        self.with_curve(|c| c.epsilon)
    }

    /// Set the rest threshold.
    ///
    /// Smaller values make the animation last longer. Must be positive.
    pub fn set_epsilon(&self, epsilon: f64) -> Result<()> {
        if !(epsilon.is_finite() && epsilon > 0.0) {
            return Err(MotionError::InvalidEpsilon(epsilon));
        }
        self.update_spring(AnimationProperty::Epsilon, |c| {
            replace_if_changed(&mut c.epsilon, epsilon)
        });
        Ok(())
    }

    /// Whether overshoot is suppressed.
    pub fn clamp(&self) -> bool {
        self.with_curve(|c| c.clamp)
    }

    /// Suppress overshoot: values stay between `value_from` and `value_to`
    /// and the animation ends when it first reaches `value_to`.
    pub fn set_clamp(&self, clamp: bool) {
        self.update_spring(AnimationProperty::Clamp, |c| {
            replace_if_changed(&mut c.clamp, clamp)
        });
    }

    /// The estimated duration in milliseconds, or [`DURATION_INFINITE`].
    pub fn estimated_duration(&self) -> u32 {
        self.with_curve(|c| c.estimated_duration)
    }

    /// The current velocity, in units per second. Zero once settled.
    pub fn velocity(&self) -> f64 {
        self.with_curve(SpringCurve::velocity)
    }

    /// The value at `t` milliseconds after the start.
    pub fn value_at(&self, t: u32) -> f64 {
        self.with_curve(|c| c.value_at(t))
    }

    /// The velocity at `t` milliseconds after the start.
    pub fn velocity_at(&self, t: u32) -> f64 {
        self.with_curve(|c| c.velocity_at(t))
    }

    fn update_spring(&self, property: AnimationProperty, f: impl FnOnce(&mut SpringCurve) -> bool) {
        let before = self.estimated_duration();
        let changed = self.update_curve(property, |c| {
            let changed = f(c);
            if changed {
                c.refresh_estimate();
            }
            changed
        });
        if changed && self.estimated_duration() != before {
            self.notify().emit(AnimationProperty::EstimatedDuration);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curve(ratio: f64, mass: f64, stiffness: f64) -> SpringCurve {
        SpringCurve::new(0.0, 1.0, SpringParams::new(ratio, mass, stiffness).unwrap())
    }

    #[test]
    fn test_starts_at_from_with_initial_velocity() {
        let mut spring = curve(0.5, 1.0, 100.0);
        spring.initial_velocity = 3.0;
        spring.refresh_estimate();
        assert!((spring.calculate_value(0) - 0.0).abs() < 1e-12);
        assert!((spring.velocity() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_critically_damped_does_not_overshoot() {
        let mut spring = curve(1.0, 1.0, 100.0);
        let mut last_distance = 1.0;
        for t in (0..=spring.estimate_duration()).step_by(4) {
            let value = spring.calculate_value(t);
            let distance = (1.0 - value).abs();
            assert!(value <= 1.0 + spring.epsilon);
            assert!(distance <= last_distance + 1e-12);
            last_distance = distance;
        }
    }

    #[test]
    fn test_overdamped_does_not_overshoot() {
        let mut spring = curve(2.5, 1.0, 200.0);
        let duration = spring.estimate_duration();
        assert!(duration > 0 && duration < DURATION_INFINITE);
        let mut last_distance = 1.0;
        for t in (0..=duration).step_by(8) {
            let distance = (1.0 - spring.calculate_value(t)).abs();
            assert!(distance <= last_distance + 1e-12);
            last_distance = distance;
        }
    }

    #[test]
    fn test_underdamped_overshoots() {
        let spring = curve(0.3, 1.0, 300.0);
        let peak = (0..spring.estimate_duration())
            .map(|t| spring.value_at(t))
            .fold(f64::MIN, f64::max);
        assert!(peak > 1.05);
    }

    #[test]
    fn test_settles_at_estimate() {
        for (ratio, mass, stiffness) in [(0.3, 1.0, 300.0), (1.0, 1.0, 100.0), (1.8, 0.5, 500.0)] {
            let spring = curve(ratio, mass, stiffness);
            let duration = spring.estimate_duration();
            let (value, velocity) = spring.oscillate(duration);
            assert!((value - 1.0).abs() <= spring.epsilon, "ratio {ratio}");
            assert!(velocity.abs() <= spring.epsilon * VELOCITY_EPSILON_SCALE, "ratio {ratio}");
            assert_eq!(spring.value_at(duration), 1.0);
            assert_eq!(spring.velocity_at(duration), 0.0);
        }
    }

    #[test]
    fn test_undamped_is_infinite() {
        let spring = curve(0.0, 1.0, 100.0);
        assert_eq!(spring.estimate_duration(), DURATION_INFINITE);
    }

    #[test]
    fn test_clamp_stays_in_bounds_and_ends_at_first_crossing() {
        let mut spring = curve(0.2, 1.0, 400.0);
        spring.clamp = true;
        spring.refresh_estimate();

        let duration = spring.estimate_duration();
        assert!(duration > 0);
        for t in 0..=duration + 100 {
            let value = spring.calculate_value(t);
            assert!((0.0..=1.0).contains(&value), "t = {t}: {value}");
        }
        // The unclamped spring would still be ringing.
        let unclamped = curve(0.2, 1.0, 400.0);
        assert!(duration < unclamped.estimate_duration());
    }

    #[test]
    fn test_clamp_in_place_is_instant() {
        let mut spring = SpringCurve::new(0.5, 0.5, SpringParams::default());
        spring.clamp = true;
        spring.refresh_estimate();
        assert_eq!(spring.estimate_duration(), 0);
        assert_eq!(spring.calculate_value(0), 0.5);
    }

    #[test]
    fn test_smaller_epsilon_lasts_longer() {
        let mut spring = curve(1.0, 1.0, 100.0);
        let coarse = spring.estimate_duration();
        spring.epsilon = 0.000_01;
        spring.refresh_estimate();
        assert!(spring.estimate_duration() > coarse);
    }

    #[test]
    fn test_idle_value_follows_value_from() {
        use horizon_motion_core::{AnimationSettings, ManualFrameClock};

        let surface = Surface::new(ManualFrameClock::new(), AnimationSettings::new());
        let spring = SpringAnimation::new(
            &surface,
            0.0,
            1.0,
            SpringParams::navigation(),
            AnimationTarget::none(),
        );
        spring.set_value_from(0.4);
        assert_eq!(spring.value(), 0.4);
    }
}
