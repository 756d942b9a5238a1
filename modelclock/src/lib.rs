//! # Modelclock
//!
//! A shared, frame-driven model clock for synchronized physics animations.
//!
//! Modelclock provides one authoritative time value, advanced once per
//! rendered frame, that every animated quantity reads from. Play, pause,
//! speed, reverse, and seek then affect all objects at once instead of
//! being re-implemented per entity.
//!
//! ## Core Concepts
//!
//! - **Timebase**: the clock itself. Holds *model time*, a playback rate,
//!   and a [`WrapMode`](config::WrapMode) describing what happens at the
//!   edges of its [`TimeWindow`](window::TimeWindow): clamp in place, loop
//!   back to the start, or ping-pong back and forth.
//! - **Cues**: callbacks tied to model time. An instant cue fires when one
//!   frame's motion crosses a single trigger time; a range cue fires
//!   enter/exit callbacks around an interval. The per-frame step cap plus
//!   segment-based crossing checks mean a slow host frame does not skip a
//!   cue.
//! - **Frame-driven**: the host render loop calls
//!   [`advance`](timebase::Timebase::advance) once per frame with the
//!   frame's elapsed real time. Nothing here spawns threads or blocks.
//!
//! ## Example Usage
//!
//! ```rust
//! use modelclock::prelude::*;
//!
//! fn main() -> Result<(), ClockError> {
//!     let config = TimebaseConfig {
//!         wrap: WrapMode::PingPong,
//!         window: TimeWindow::new(0.0, 2.0),
//!         ..TimebaseConfig::default()
//!     };
//!     let mut clock = Timebase::new(config)?;
//!
//!     // Fire exactly when the motion crosses t = 1 s.
//!     clock.on(1.0, |t| println!("impact at {t:.2} s"));
//!
//!     // Host render loop: once per frame.
//!     for _ in 0..120 {
//!         clock.advance(1.0 / 60.0);
//!     }
//!     println!("model time is now {:.3} s", clock.model_time());
//!     Ok(())
//! }
//! ```

pub const ENGINE_NAME: &str = "Model Clock";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Declare all the modules in the crate.
pub mod config;
pub mod coords;
pub mod cues;
pub mod error;
pub mod timebase;
pub mod window;

/// A prelude module for easy importing of the most common types.
pub mod prelude {
    pub use crate::config::{TimebaseConfig, WrapMode};
    pub use crate::coords::SceneCoords;
    pub use crate::cues::CueId;
    pub use crate::error::ClockError;
    pub use crate::timebase::Timebase;
    pub use crate::window::TimeWindow;
}
