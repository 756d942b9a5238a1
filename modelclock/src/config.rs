//! Configuration structures for the model clock.
//!
//! These structs are designed to be deserialized from a configuration file
//! (e.g., a TOML file) using `serde`, so a clock's starting time, speed,
//! wrap behavior, and window can be defined outside the application code.
//! Every field has a default, which makes a partial (or empty) file valid.

use crate::window::TimeWindow;
use serde::Deserialize;

/// How model time behaves at the ends of its [`TimeWindow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WrapMode {
    /// Stop at the window edge and stay there.
    #[default]
    Clamp,
    /// Jump back to `t_min` after passing `t_max`.
    Loop,
    /// Bounce back and forth between the window edges.
    PingPong,
}

/// The full construction-time configuration for a
/// [`Timebase`](crate::timebase::Timebase).
#[derive(Debug, Clone, Deserialize)]
pub struct TimebaseConfig {
    /// Where model time starts.
    #[serde(default)]
    pub t0: f64,

    /// Playback speed in model seconds per real second. Zero (a frozen
    /// clock) and negative values (reverse playback) are both valid.
    #[serde(default = "default_rate")]
    pub rate: f64,

    /// Behavior at the window ends.
    #[serde(default)]
    pub wrap: WrapMode,

    /// The valid span of model time.
    #[serde(default)]
    pub window: TimeWindow,

    /// Maximum real-time delta consumed per advance call. Late host frames
    /// are capped to this, which keeps cue crossing checks reliable.
    #[serde(default = "default_clamp_dt")]
    pub clamp_dt: f64,
}

fn default_rate() -> f64 {
    1.0
}

fn default_clamp_dt() -> f64 {
    1.0 / 30.0
}

impl Default for TimebaseConfig {
    fn default() -> Self {
        Self {
            t0: 0.0,
            rate: default_rate(),
            wrap: WrapMode::default(),
            window: TimeWindow::default(),
            clamp_dt: default_clamp_dt(),
        }
    }
}
