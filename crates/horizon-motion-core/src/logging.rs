//! Logging facilities for Horizon Motion.
//!
//! Horizon Motion is instrumented with the `tracing` crate and never installs
//! a subscriber itself. To see logs, install one in your application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("horizon_motion=debug,horizon_motion_core=info")
//!     .init();
//! ```
//!
//! State transitions are logged at `debug`, per-frame values at `trace`, and
//! recoverable API misuse at `warn`.

/// Span names used throughout Horizon Motion for tracing.
pub mod span_names {
    /// One frame clock dispatch.
    pub const FRAME: &str = "horizon_motion::frame";
    /// Signal emission span.
    pub const SIGNAL: &str = "horizon_motion::signal";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core plumbing target.
    pub const CORE: &str = "horizon_motion_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "horizon_motion_core::signal";
    /// Frame clock and tick dispatch target.
    pub const FRAME_CLOCK: &str = "horizon_motion_core::frame_clock";
    /// Host surface target.
    pub const SURFACE: &str = "horizon_motion_core::surface";
    /// Animation settings target.
    pub const SETTINGS: &str = "horizon_motion_core::settings";
    /// Animation scheduler target.
    pub const ANIMATION: &str = "horizon_motion::animation";
    /// Spring physics target.
    pub const SPRING: &str = "horizon_motion::spring";
    /// Swipe tracking target.
    pub const SWIPE: &str = "horizon_motion::swipe";
}

/// A guard that keeps a frame-scoped tracing span entered.
///
/// The span is exited when the guard is dropped.
///
/// # Example
///
/// ```
/// use horizon_motion_core::logging::FrameSpan;
///
/// {
///     let _span = FrameSpan::new(16);
///     // tick callbacks run here
/// }
/// ```
pub struct FrameSpan {
    _span: tracing::span::EnteredSpan,
}

impl FrameSpan {
    /// Enter a span describing the frame at `frame_time` milliseconds.
    pub fn new(frame_time: u64) -> Self {
        let span = tracing::trace_span!(target: "horizon_motion_core::frame_clock", "frame", frame_time);
        Self {
            _span: span.entered(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_targets_share_crate_prefixes() {
        for target in [targets::SIGNAL, targets::FRAME_CLOCK, targets::SURFACE, targets::SETTINGS] {
            assert!(target.starts_with(targets::CORE));
        }
        for target in [targets::ANIMATION, targets::SPRING, targets::SWIPE] {
            assert!(target.starts_with("horizon_motion::"));
        }
    }

    #[test]
    fn test_frame_span_without_subscriber() {
        let _span = FrameSpan::new(0);
    }
}
