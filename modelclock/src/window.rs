//! The valid span of model time.

use serde::Deserialize;

/// An immutable `[t_min, t_max]` bound on model time.
///
/// `t_max` may be `f64::INFINITY` for an open-ended window. Loop and
/// ping-pong playback need a finite, positive-length window; that
/// combination is checked by [`Timebase`](crate::timebase::Timebase) at the
/// point of use, never here. A window is replaced wholesale, not mutated.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct TimeWindow {
    /// The smallest allowed model time.
    #[serde(default)]
    pub t_min: f64,
    /// The largest allowed model time. May be `+inf`.
    #[serde(default = "default_t_max")]
    pub t_max: f64,
}

fn default_t_max() -> f64 {
    f64::INFINITY
}

impl TimeWindow {
    /// Creates a window spanning `[t_min, t_max]`.
    pub fn new(t_min: f64, t_max: f64) -> Self {
        Self { t_min, t_max }
    }

    /// Creates an open-ended window `[t_min, +inf)`.
    pub fn from_start(t_min: f64) -> Self {
        Self {
            t_min,
            t_max: f64::INFINITY,
        }
    }

    /// The length of the window. Infinite for open-ended windows.
    pub fn length(&self) -> f64 {
        self.t_max - self.t_min
    }

    /// Whether both bounds are finite and the window has positive length.
    pub fn is_finite(&self) -> bool {
        self.t_min.is_finite() && self.t_max.is_finite() && self.t_min < self.t_max
    }
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self::from_start(0.0)
    }
}
