//! Animations for Horizon Motion.
//!
//! This module provides the animation scheduler and the two curves built on
//! it: eased timed animations and physically simulated springs.
//!
//! # Easing Functions
//!
//! Easing functions control the rate of change during timed animations. They
//! take a normalized progress value `t` (0.0 to 1.0) and return a transformed
//! value.
//!
//! # Example
//!
//! ```
//! use horizon_motion::animation::{AnimationState, AnimationTarget, TimedAnimation};
//! use horizon_motion_core::{AnimationSettings, ManualFrameClock, Surface};
//!
//! let clock = ManualFrameClock::new();
//! let surface = Surface::new(clock.clone(), AnimationSettings::new());
//! let animation = TimedAnimation::new(&surface, 0.0, 100.0, 250, AnimationTarget::none());
//!
//! animation.play();
//! clock.advance(250);
//! assert_eq!(animation.state(), AnimationState::Finished);
//! assert_eq!(animation.value(), 100.0);
//! ```

mod easing;
mod scheduler;
mod spring;
mod spring_params;
mod target;
mod timed;

pub use easing::{ease, lerp, lerp_eased, Easing};
pub use scheduler::{
    Animation, AnimationProperty, AnimationState, ValueCurve, WeakAnimation, DURATION_INFINITE,
};
pub use spring::{SpringAnimation, SpringCurve, DEFAULT_EPSILON};
pub use spring_params::SpringParams;
pub use target::AnimationTarget;
pub use timed::{TimedAnimation, TimedCurve, DEFAULT_EASING, DEFAULT_REPEAT_COUNT};

static_assertions::assert_impl_all!(TimedAnimation: Send, Sync, Clone);
static_assertions::assert_impl_all!(SpringAnimation: Send, Sync, Clone);
