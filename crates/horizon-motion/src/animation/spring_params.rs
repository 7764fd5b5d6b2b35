//! Physical parameters of a damped harmonic oscillator.

use crate::error::{MotionError, Result};

/// Mass, stiffness and damping of a spring.
///
/// Usually created with [`SpringParams::new`], which takes a damping ratio
/// instead of a raw damping coefficient:
///
/// - ratio `1.0`: critically damped, the fastest approach without overshoot
/// - ratio `< 1.0`: underdamped, overshoots and oscillates
/// - ratio `> 1.0`: overdamped, approaches slowly without overshoot
///
/// # Example
///
/// ```
/// use horizon_motion::animation::SpringParams;
///
/// let params = SpringParams::new(0.5, 1.0, 100.0)?;
/// assert_eq!(params.damping(), 10.0);
/// assert!((params.damping_ratio() - 0.5).abs() < 1e-12);
/// # Ok::<(), horizon_motion::MotionError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringParams {
    damping: f64,
    mass: f64,
    stiffness: f64,
}

impl SpringParams {
    /// Create parameters from a damping ratio.
    pub fn new(damping_ratio: f64, mass: f64, stiffness: f64) -> Result<Self> {
        if !damping_ratio.is_finite() || damping_ratio < 0.0 {
            return Err(MotionError::InvalidDampingRatio(damping_ratio));
        }
        if !(mass > 0.0 && stiffness > 0.0 && mass.is_finite() && stiffness.is_finite()) {
            return Err(MotionError::invalid_spring_params(
                damping_ratio * critical_damping(mass.abs(), stiffness.abs()),
                mass,
                stiffness,
            ));
        }
        Self::new_full(damping_ratio * critical_damping(mass, stiffness), mass, stiffness)
    }

    /// Create parameters from a raw damping coefficient.
    pub fn new_full(damping: f64, mass: f64, stiffness: f64) -> Result<Self> {
        let valid = damping.is_finite()
            && damping >= 0.0
            && mass.is_finite()
            && mass > 0.0
            && stiffness.is_finite()
            && stiffness > 0.0;
        if !valid {
            return Err(MotionError::invalid_spring_params(damping, mass, stiffness));
        }
        Ok(Self {
            damping,
            mass,
            stiffness,
        })
    }

    /// The damping coefficient.
    pub fn damping(&self) -> f64 {
        self.damping
    }

    /// The damping relative to critical damping.
    pub fn damping_ratio(&self) -> f64 {
        self.damping / critical_damping(self.mass, self.stiffness)
    }

    /// The mass.
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// The stiffness.
    pub fn stiffness(&self) -> f64 {
        self.stiffness
    }

    /// Page transitions: critically damped and quick.
    pub fn navigation() -> Self {
        Self::preset(1.0, 1.0, 1000.0)
    }

    /// Sidebars and flaps sliding in and out.
    pub fn sidebar() -> Self {
        Self::preset(1.0, 0.5, 500.0)
    }

    /// Bottom sheets, with a slight overshoot.
    pub fn bottom_sheet() -> Self {
        Self::preset(0.8, 1.0, 400.0)
    }

    /// Floating sheets, with a visible bounce.
    pub fn floating_sheet() -> Self {
        Self::preset(0.62, 1.0, 500.0)
    }

    fn preset(damping_ratio: f64, mass: f64, stiffness: f64) -> Self {
        Self {
            damping: damping_ratio * critical_damping(mass, stiffness),
            mass,
            stiffness,
        }
    }
}

impl Default for SpringParams {
    /// A critically damped unit spring.
    fn default() -> Self {
        Self {
            damping: 2.0,
            mass: 1.0,
            stiffness: 1.0,
        }
    }
}

fn critical_damping(mass: f64, stiffness: f64) -> f64 {
    2.0 * (mass * stiffness).sqrt()
}
