//! Host plumbing for Horizon Motion.
//!
//! This crate provides the collaborators the animation engine needs from its
//! host toolkit, in a host-agnostic form:
//!
//! - **Signal/Slot System**: Type-safe notifications
//! - **Property System**: Interior-mutable values with change detection
//! - **Frame Clocks**: Per-refresh tick delivery with RAII subscriptions
//! - **Surfaces**: The mapped/unmapped widget stand-in animations attach to
//! - **Settings**: The desktop-wide "enable animations" switch
//!
//! # Example
//!
//! ```
//! use horizon_motion_core::{AnimationSettings, ManualFrameClock, Surface};
//!
//! let clock = ManualFrameClock::new();
//! let surface = Surface::new(clock.clone(), AnimationSettings::new());
//!
//! clock.advance(16);
//! assert_eq!(surface.frame_time(), 16);
//! ```

mod error;
pub mod frame_clock;
pub mod logging;
pub mod property;
pub mod settings;
pub mod signal;
pub mod surface;

pub use error::{CoreError, Result};
pub use frame_clock::{
    FrameClock, ManualFrameClock, SystemFrameClock, TickCallback, TickCallbackId, TickControl,
    TickRegistry, TickSubscription,
};
pub use logging::FrameSpan;
pub use property::Property;
pub use settings::{parse_bool_setting, AnimationSettings, ENABLE_ANIMATIONS_ENV};
pub use signal::{ConnectionGuard, ConnectionId, Signal};
pub use surface::Surface;
