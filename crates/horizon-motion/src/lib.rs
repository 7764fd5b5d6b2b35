//! Horizon Motion: animations and swipe gestures for adaptive widgets.
//!
//! The crate has two halves that meet at a single hand-off point:
//!
//! - [`animation`]: a frame-clock driven scheduler with pluggable value
//!   curves. [`TimedAnimation`](animation::TimedAnimation) interpolates with
//!   an easing curve; [`SpringAnimation`](animation::SpringAnimation)
//!   simulates a damped harmonic oscillator.
//! - [`swipe`]: a gesture state machine turning drags and touchpad scrolls
//!   into progress updates, and releases into an
//!   [`EndSwipe`](swipe::EndSwipe) that seeds a spring animation.
//!
//! Host plumbing (signals, properties, frame clocks, surfaces, settings)
//! lives in [`horizon_motion_core`].
//!
//! # Example
//!
//! ```
//! use horizon_motion::animation::{AnimationTarget, SpringAnimation, SpringParams};
//! use horizon_motion_core::{AnimationSettings, ManualFrameClock, Surface};
//!
//! let clock = ManualFrameClock::new();
//! let surface = Surface::new(clock.clone(), AnimationSettings::new());
//!
//! let spring = SpringAnimation::new(
//!     &surface,
//!     0.0,
//!     1.0,
//!     SpringParams::navigation(),
//!     AnimationTarget::none(),
//! );
//! spring.play();
//! for _ in 0..100 {
//!     clock.advance(16);
//! }
//! assert_eq!(spring.value(), 1.0);
//! ```

pub mod animation;
mod error;
pub mod swipe;

pub use error::{MotionError, Result};
pub use horizon_motion_core::logging::targets;
