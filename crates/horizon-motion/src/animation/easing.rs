//! Easing functions for smooth animations.
//!
//! Easing functions map a linear progress value (0.0 to 1.0) to a transformed
//! value that creates smoother, more natural-looking animations. Every curve
//! maps 0 to 0 and 1 to 1 exactly. The `Elastic`, `Back` and `Bounce` families
//! leave the unit range or reverse direction on the way; every other curve is
//! monotonic and stays within it.
//!
//! Most curves follow Robert Penner's easing equations. [`Easing::Ease`] and
//! its `EaseIn`/`EaseOut`/`EaseInOut` siblings are the CSS cubic Bézier
//! timing functions of the same names.

use std::f64::consts::PI;

/// Available easing functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Easing {
    /// Linear interpolation (no easing).
    #[default]
    Linear,
    /// Quadratic ease-in.
    EaseInQuad,
    /// Quadratic ease-out.
    EaseOutQuad,
    /// Quadratic ease-in-out.
    EaseInOutQuad,
    /// Cubic ease-in.
    EaseInCubic,
    /// Cubic ease-out.
    EaseOutCubic,
    /// Cubic ease-in-out.
    EaseInOutCubic,
    /// Quartic ease-in.
    EaseInQuart,
    /// Quartic ease-out.
    EaseOutQuart,
    /// Quartic ease-in-out.
    EaseInOutQuart,
    /// Quintic ease-in.
    EaseInQuint,
    /// Quintic ease-out.
    EaseOutQuint,
    /// Quintic ease-in-out.
    EaseInOutQuint,
    /// Sinusoidal ease-in.
    EaseInSine,
    /// Sinusoidal ease-out.
    EaseOutSine,
    /// Sinusoidal ease-in-out.
    EaseInOutSine,
    /// Exponential ease-in.
    EaseInExpo,
    /// Exponential ease-out.
    EaseOutExpo,
    /// Exponential ease-in-out.
    EaseInOutExpo,
    /// Circular ease-in.
    EaseInCirc,
    /// Circular ease-out.
    EaseOutCirc,
    /// Circular ease-in-out.
    EaseInOutCirc,
    /// Elastic ease-in: oscillates around the start before leaving.
    EaseInElastic,
    /// Elastic ease-out: overshoots and oscillates around the end.
    EaseOutElastic,
    /// Elastic ease-in-out.
    EaseInOutElastic,
    /// Back ease-in: pulls back below 0 before moving forward.
    EaseInBack,
    /// Back ease-out: overshoots past 1 before settling.
    EaseOutBack,
    /// Back ease-in-out.
    EaseInOutBack,
    /// Bounce ease-in.
    EaseInBounce,
    /// Bounce ease-out: bounces against the end like a dropped ball.
    EaseOutBounce,
    /// Bounce ease-in-out.
    EaseInOutBounce,
    /// CSS `ease`, `cubic-bezier(0.25, 0.1, 0.25, 1.0)`.
    Ease,
    /// CSS `ease-in`, `cubic-bezier(0.42, 0.0, 1.0, 1.0)`.
    EaseIn,
    /// CSS `ease-out`, `cubic-bezier(0.0, 0.0, 0.58, 1.0)`.
    EaseOut,
    /// CSS `ease-in-out`, `cubic-bezier(0.42, 0.0, 0.58, 1.0)`.
    EaseInOut,
}

impl Easing {
    /// Every easing function, in declaration order.
    pub const ALL: [Easing; 35] = [
        Easing::Linear,
        Easing::EaseInQuad,
        Easing::EaseOutQuad,
        Easing::EaseInOutQuad,
        Easing::EaseInCubic,
        Easing::EaseOutCubic,
        Easing::EaseInOutCubic,
        Easing::EaseInQuart,
        Easing::EaseOutQuart,
        Easing::EaseInOutQuart,
        Easing::EaseInQuint,
        Easing::EaseOutQuint,
        Easing::EaseInOutQuint,
        Easing::EaseInSine,
        Easing::EaseOutSine,
        Easing::EaseInOutSine,
        Easing::EaseInExpo,
        Easing::EaseOutExpo,
        Easing::EaseInOutExpo,
        Easing::EaseInCirc,
        Easing::EaseOutCirc,
        Easing::EaseInOutCirc,
        Easing::EaseInElastic,
        Easing::EaseOutElastic,
        Easing::EaseInOutElastic,
        Easing::EaseInBack,
        Easing::EaseOutBack,
        Easing::EaseInOutBack,
        Easing::EaseInBounce,
        Easing::EaseOutBounce,
        Easing::EaseInOutBounce,
        Easing::Ease,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
    ];

    /// Whether the curve is monotonic and stays within `[0, 1]`.
    pub fn is_monotonic(self) -> bool {
        !matches!(
            self,
            Easing::EaseInElastic
                | Easing::EaseOutElastic
                | Easing::EaseInOutElastic
                | Easing::EaseInBack
                | Easing::EaseOutBack
                | Easing::EaseInOutBack
                | Easing::EaseInBounce
                | Easing::EaseOutBounce
                | Easing::EaseInOutBounce
        )
    }
}

/// Apply an easing function to a progress value.
///
/// `t` is clamped to `[0, 1]` and the endpoints map exactly to 0 and 1.
///
/// # Example
///
/// ```
/// use horizon_motion::animation::{ease, Easing};
///
/// assert_eq!(ease(Easing::Linear, 0.5), 0.5);
/// assert!(ease(Easing::EaseInQuad, 0.5) < 0.5);
/// assert!(ease(Easing::EaseOutCubic, 0.5) > 0.5);
/// assert_eq!(ease(Easing::EaseOutBack, 1.0), 1.0);
/// ```
#[inline]
pub fn ease(easing: Easing, t: f64) -> f64 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }

    match easing {
        Easing::Linear => t,
        Easing::EaseInQuad => t * t,
        Easing::EaseOutQuad => 1.0 - (1.0 - t).powi(2),
        Easing::EaseInOutQuad => in_out(t, |p| p * p),
        Easing::EaseInCubic => t.powi(3),
        Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
        Easing::EaseInOutCubic => in_out(t, |p| p.powi(3)),
        Easing::EaseInQuart => t.powi(4),
        Easing::EaseOutQuart => 1.0 - (1.0 - t).powi(4),
        Easing::EaseInOutQuart => in_out(t, |p| p.powi(4)),
        Easing::EaseInQuint => t.powi(5),
        Easing::EaseOutQuint => 1.0 - (1.0 - t).powi(5),
        Easing::EaseInOutQuint => in_out(t, |p| p.powi(5)),
        Easing::EaseInSine => 1.0 - (t * PI / 2.0).cos(),
        Easing::EaseOutSine => (t * PI / 2.0).sin(),
        Easing::EaseInOutSine => -((PI * t).cos() - 1.0) / 2.0,
        Easing::EaseInExpo => 2f64.powf(10.0 * (t - 1.0)),
        Easing::EaseOutExpo => 1.0 - 2f64.powf(-10.0 * t),
        Easing::EaseInOutExpo => in_out(t, |p| 2f64.powf(10.0 * (p - 1.0))),
        Easing::EaseInCirc => 1.0 - (1.0 - t * t).sqrt(),
        Easing::EaseOutCirc => (1.0 - (t - 1.0).powi(2)).sqrt(),
        Easing::EaseInOutCirc => in_out(t, |p| 1.0 - (1.0 - p * p).sqrt()),
        Easing::EaseInElastic => elastic_in(t, 0.3),
        Easing::EaseOutElastic => 1.0 - elastic_in(1.0 - t, 0.3),
        Easing::EaseInOutElastic => in_out(t, |p| elastic_in(p, 0.45)),
        Easing::EaseInBack => back_in(t, BACK_OVERSHOOT),
        Easing::EaseOutBack => 1.0 - back_in(1.0 - t, BACK_OVERSHOOT),
        Easing::EaseInOutBack => in_out(t, |p| back_in(p, BACK_OVERSHOOT * 1.525)),
        Easing::EaseInBounce => 1.0 - bounce_out(1.0 - t),
        Easing::EaseOutBounce => bounce_out(t),
        Easing::EaseInOutBounce => in_out(t, |p| 1.0 - bounce_out(1.0 - p)),
        Easing::Ease => cubic_bezier(0.25, 0.1, 0.25, 1.0, t),
        Easing::EaseIn => cubic_bezier(0.42, 0.0, 1.0, 1.0, t),
        Easing::EaseOut => cubic_bezier(0.0, 0.0, 0.58, 1.0, t),
        Easing::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, t),
    }
}

/// Linear interpolation between `a` and `b`.
///
/// Written as `a * (1 - t) + b * t` so that `t = 0` and `t = 1` return the
/// endpoints exactly.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a * (1.0 - t) + b * t
}

/// Interpolate between two values using an easing function.
#[inline]
pub fn lerp_eased(easing: Easing, start: f64, end: f64, t: f64) -> f64 {
    lerp(start, end, ease(easing, t))
}

const BACK_OVERSHOOT: f64 = 1.70158;

// Builds an in-out curve from an ease-in curve: the first half eases in, the
// second half is the point reflection of the first.
#[inline]
fn in_out(t: f64, ease_in: impl Fn(f64) -> f64) -> f64 {
    if t < 0.5 {
        ease_in(2.0 * t) / 2.0
    } else {
        1.0 - ease_in(2.0 - 2.0 * t) / 2.0
    }
}

#[inline]
fn elastic_in(t: f64, period: f64) -> f64 {
    if t <= 0.0 {
        return 0.0;
    }
    let s = period / 4.0;
    let p = t - 1.0;
    -(2f64.powf(10.0 * p) * ((p - s) * 2.0 * PI / period).sin())
}

#[inline]
fn back_in(t: f64, overshoot: f64) -> f64 {
    t * t * ((overshoot + 1.0) * t - overshoot)
}

#[inline]
fn bounce_out(t: f64) -> f64 {
    const N: f64 = 7.5625;
    const D: f64 = 2.75;

    if t < 1.0 / D {
        N * t * t
    } else if t < 2.0 / D {
        let p = t - 1.5 / D;
        N * p * p + 0.75
    } else if t < 2.5 / D {
        let p = t - 2.25 / D;
        N * p * p + 0.9375
    } else {
        let p = t - 2.625 / D;
        N * p * p + 0.984375
    }
}

// =============================================================================
// Cubic Bézier
// =============================================================================

// Evaluates a CSS timing function with control points (x1, y1) and (x2, y2):
// solves x(u) = t for the curve parameter u, then returns y(u).
fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64, t: f64) -> f64 {
    let sample = |a1: f64, a2: f64, u: f64| {
        let inv = 1.0 - u;
        3.0 * inv * inv * u * a1 + 3.0 * inv * u * u * a2 + u * u * u
    };
    let slope = |a1: f64, a2: f64, u: f64| {
        let inv = 1.0 - u;
        3.0 * inv * inv * a1 + 6.0 * inv * u * (a2 - a1) + 3.0 * u * u * (1.0 - a2)
    };

    let mut u = t;
    for _ in 0..8 {
        let error = sample(x1, x2, u) - t;
        if error.abs() < 1e-7 {
            return sample(y1, y2, u);
        }
        let d = slope(x1, x2, u);
        if d.abs() < 1e-6 {
            break;
        }
        u -= error / d;
    }

    // Newton stalled: fall back to bisection, x(u) is monotonic on [0, 1].
    let (mut lo, mut hi) = (0.0, 1.0);
    u = t;
    for _ in 0..64 {
        let x = sample(x1, x2, u);
        if (x - t).abs() < 1e-7 {
            break;
        }
        if x < t {
            lo = u;
        } else {
            hi = u;
        }
        u = (lo + hi) / 2.0;
    }
    sample(y1, y2, u)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear() {
        assert_eq!(ease(Easing::Linear, 0.0), 0.0);
        assert_eq!(ease(Easing::Linear, 0.5), 0.5);
        assert_eq!(ease(Easing::Linear, 1.0), 1.0);
    }

    #[test]
    fn test_endpoints_are_exact() {
        for easing in Easing::ALL {
            assert_eq!(ease(easing, 0.0), 0.0, "{easing:?} at 0");
            assert_eq!(ease(easing, 1.0), 1.0, "{easing:?} at 1");
        }
    }

    #[test]
    fn test_clamp() {
        assert_eq!(ease(Easing::Linear, -0.5), 0.0);
        assert_eq!(ease(Easing::EaseOutBack, 1.5), 1.0);
    }

    #[test]
    fn test_monotonic_curves_stay_in_range() {
        for easing in Easing::ALL.into_iter().filter(|e| e.is_monotonic()) {
            let mut previous = 0.0;
            for step in 0..=200 {
                let value = ease(easing, f64::from(step) / 200.0);
                assert!((0.0..=1.0).contains(&value), "{easing:?} left range: {value}");
                assert!(value + 1e-9 >= previous, "{easing:?} decreased at step {step}");
                previous = value;
            }
        }
    }

    #[test]
    fn test_in_out_midpoint() {
        for easing in [
            Easing::EaseInOutQuad,
            Easing::EaseInOutCubic,
            Easing::EaseInOutQuart,
            Easing::EaseInOutQuint,
            Easing::EaseInOutSine,
            Easing::EaseInOutExpo,
            Easing::EaseInOutCirc,
        ] {
            assert!((ease(easing, 0.5) - 0.5).abs() < 1e-9, "{easing:?}");
        }
    }

    #[test]
    fn test_higher_powers_are_more_pronounced() {
        let quad = ease(Easing::EaseInQuad, 0.5);
        let cubic = ease(Easing::EaseInCubic, 0.5);
        let quart = ease(Easing::EaseInQuart, 0.5);
        let quint = ease(Easing::EaseInQuint, 0.5);
        assert!(quad > cubic && cubic > quart && quart > quint);
    }

    #[test]
    fn test_non_monotonic_curves_leave_range() {
        assert!(ease(Easing::EaseInBack, 0.2) < 0.0);
        assert!(ease(Easing::EaseOutBack, 0.8) > 1.0);
        assert!(ease(Easing::EaseOutElastic, 0.1) > 1.0);
        // A bounce touches the end before bouncing back.
        assert!((ease(Easing::EaseOutBounce, 1.0 / 2.75) - 1.0).abs() < 1e-9);
        assert!(ease(Easing::EaseOutBounce, 0.5) < 1.0);
    }

    #[test]
    fn test_css_curves() {
        // Symmetric control points give a symmetric curve.
        assert!((ease(Easing::EaseInOut, 0.5) - 0.5).abs() < 1e-6);
        assert!(ease(Easing::EaseIn, 0.25) < 0.25);
        assert!(ease(Easing::EaseOut, 0.25) > 0.25);
        // CSS `ease` at x = 0.5 is about 0.8024.
        assert!((ease(Easing::Ease, 0.5) - 0.8024).abs() < 1e-3);
    }

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(100.0, 200.0, 0.0), 100.0);
        assert_eq!(lerp(100.0, 200.0, 0.5), 150.0);
        assert_eq!(lerp(100.0, 200.0, 1.0), 200.0);
        assert_eq!(lerp_eased(Easing::Linear, -1.0, 1.0, 0.25), -0.5);
    }
}
