//! Error types for Horizon Motion.

/// Result type alias for animation and swipe operations.
pub type Result<T> = std::result::Result<T, MotionError>;

/// Errors raised when constructing animations and gesture descriptions.
///
/// These are contract violations caught at construction time; runtime misuse
/// with a safe fallback is logged instead.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MotionError {
    /// Spring parameters outside their physical range.
    #[error("invalid spring parameters: damping {damping} must be >= 0, mass {mass} and stiffness {stiffness} must be > 0")]
    InvalidSpringParams {
        damping: f64,
        mass: f64,
        stiffness: f64,
    },

    /// A negative or non-finite damping ratio.
    #[error("invalid damping ratio {0}: must be finite and >= 0")]
    InvalidDampingRatio(f64),

    /// A spring rest threshold that is not strictly positive.
    #[error("invalid epsilon {0}: must be finite and > 0")]
    InvalidEpsilon(f64),

    /// A swipeable reported no snap points.
    #[error("swipeable has no snap points")]
    EmptySnapPoints,

    /// A swipeable reported snap points out of order.
    #[error("snap points must be sorted in ascending order")]
    NonMonotonicSnapPoints,

    /// A swipe distance that is not strictly positive.
    #[error("invalid swipe distance {0}: must be finite and > 0")]
    InvalidDistance(f64),
}

impl MotionError {
    /// Create a spring parameter error.
    pub fn invalid_spring_params(damping: f64, mass: f64, stiffness: f64) -> Self {
        Self::InvalidSpringParams {
            damping,
            mass,
            stiffness,
        }
    }
}
