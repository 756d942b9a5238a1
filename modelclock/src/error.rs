//! Clock and coordinate configuration errors.

use crate::config::WrapMode;
use thiserror::Error;

/// Library result type.
pub type Result<T> = std::result::Result<T, ClockError>;

/// Errors surfaced by configuration and control operations.
///
/// Misconfiguration is reported at the operation that introduces it, never
/// silently degraded. A rate of zero (frozen clock) or a negative rate
/// (reverse playback) is not an error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClockError {
    /// Loop and ping-pong need a finite window with `t_min < t_max`.
    #[error("{mode:?} playback needs a finite window with t_min < t_max, got [{t_min}, {t_max}]")]
    InvalidWindow {
        mode: WrapMode,
        t_min: f64,
        t_max: f64,
    },

    /// The scene unit scale must be finite and non-zero.
    #[error("meters_per_unit must be finite and non-zero, got {value}")]
    InvalidScale { value: f64 },

    /// Scene axis orientation signs must be `+1` or `-1`.
    #[error("{axis} orientation must be +1 or -1, got {value}")]
    InvalidAxis { axis: &'static str, value: f64 },
}
