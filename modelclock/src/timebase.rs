//! The shared clock that drives synchronized physics animations.
//!
//! A [`Timebase`] holds a single number called *model time*. On every
//! rendered frame the host calls [`Timebase::advance`] with that frame's
//! elapsed real time; the clock moves model time according to the playback
//! rate and the configured [`WrapMode`], then fires any cues whose moment
//! the motion crossed. All animated objects read the same clock, so
//! play/pause/speed/reverse/seek affect everything at once.
//!
//! Two ideas keep cue delivery reliable even when host frames arrive late:
//! the consumed per-frame delta is capped at `clamp_dt`, and instant cues
//! are checked against the whole segment from the previous time to the new
//! time rather than against a single sampled value.
//!
//! The clock is single-threaded by design: all mutation happens inside
//! `advance`, `seek`, or the other control calls, and cue callbacks run
//! synchronously inline. Callbacks must not re-enter the owning `Timebase`
//! (through interior mutability or otherwise); behavior is unspecified if
//! they do.

use crate::config::{TimebaseConfig, WrapMode};
use crate::cues::{crossed, CueId, InstantCue, RangeCue};
use crate::error::{ClockError, Result};
use crate::window::TimeWindow;
use slotmap::SlotMap;
use tracing::{debug, trace};

/// Exact-boundary tolerance for ping-pong bounce detection. Catches
/// landings on a window edge that the sign-crossing test alone would miss.
const BOUNCE_EPS: f64 = 1e-9;

/// A scene-agnostic, shared clock for physics animations.
pub struct Timebase {
    time: f64,
    prev_time: f64,
    rate: f64,
    running: bool,
    wrap_mode: WrapMode,
    window: TimeWindow,
    clamp_dt: f64,
    /// Direction multiplier, only meaningful under ping-pong. Flips exactly
    /// when a boundary bounce occurs.
    dir_sign: f64,
    instant_cues: SlotMap<CueId, InstantCue>,
    /// Firing order. Slot order after a clear/re-register cycle is not
    /// insertion order, so it is tracked explicitly.
    instant_order: Vec<CueId>,
    range_cues: SlotMap<CueId, RangeCue>,
    range_order: Vec<CueId>,
}

impl std::fmt::Debug for Timebase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Timebase")
            .field("time", &self.time)
            .field("prev_time", &self.prev_time)
            .field("rate", &self.rate)
            .field("running", &self.running)
            .field("wrap_mode", &self.wrap_mode)
            .field("window", &self.window)
            .field("clamp_dt", &self.clamp_dt)
            .field("dir_sign", &self.dir_sign)
            .field("instant_cues", &self.instant_order.len())
            .field("range_cues", &self.range_order.len())
            .finish()
    }
}

impl Timebase {
    /// Creates a clock from a configuration.
    ///
    /// The initial time is wrapped into the window. Fails if the window
    /// cannot support the requested wrap mode: loop and ping-pong need a
    /// finite window with `t_min < t_max`.
    pub fn new(config: TimebaseConfig) -> Result<Self> {
        validate_window(config.wrap, config.window)?;
        let mut clock = Self {
            time: config.t0,
            prev_time: config.t0,
            rate: config.rate,
            running: true,
            wrap_mode: config.wrap,
            window: config.window,
            clamp_dt: config.clamp_dt,
            dir_sign: 1.0,
            instant_cues: SlotMap::with_key(),
            instant_order: Vec::new(),
            range_cues: SlotMap::with_key(),
            range_order: Vec::new(),
        };
        let t0 = clock.wrap(config.t0);
        clock.time = t0;
        clock.prev_time = t0;
        Ok(clock)
    }

    // -----------------------
    // Query surface
    // -----------------------

    /// Current model time. No side effects.
    pub fn model_time(&self) -> f64 {
        self.time
    }

    /// Playback rate in model seconds per real second.
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Whether [`advance`](Self::advance) currently moves time.
    pub fn running(&self) -> bool {
        self.running
    }

    /// Active wrap mode.
    pub fn wrap_mode(&self) -> WrapMode {
        self.wrap_mode
    }

    /// Active time window.
    pub fn window(&self) -> TimeWindow {
        self.window
    }

    /// Maximum real-time delta consumed per advance call.
    pub fn clamp_dt(&self) -> f64 {
        self.clamp_dt
    }

    // -----------------------
    // Control surface
    // -----------------------

    /// Starts the clock. Idempotent.
    pub fn play(&mut self) {
        self.running = true;
        debug!("clock playing");
    }

    /// Pauses the clock; `advance` becomes a no-op. Idempotent.
    pub fn pause(&mut self) {
        self.running = false;
        debug!("clock paused");
    }

    /// Flips between playing and paused.
    pub fn toggle(&mut self) {
        self.running = !self.running;
        debug!(running = self.running, "clock toggled");
    }

    /// Sets the playback rate. Zero freezes the clock, negative plays in
    /// reverse. Time is not re-wrapped.
    pub fn set_rate(&mut self, rate: f64) {
        self.rate = rate;
        debug!(rate, "rate set");
    }

    /// Alias for [`set_rate`](Self::set_rate).
    pub fn speed(&mut self, rate: f64) {
        self.set_rate(rate);
    }

    /// Forces reverse playback. Idempotent once the rate is negative.
    pub fn reverse(&mut self) {
        self.rate = -self.rate.abs();
        debug!(rate = self.rate, "reverse");
    }

    /// Forces forward playback. Idempotent once the rate is positive.
    pub fn forward(&mut self) {
        self.rate = self.rate.abs();
        debug!(rate = self.rate, "forward");
    }

    /// Jumps model time to `t`, wrapped into the window.
    ///
    /// A seek is a relocation, not motion: `prev_time` is set to the new
    /// time, so no cue segment is created and cues lying between the old
    /// and new time deliberately do not fire. Replaying a flash from ten
    /// seconds ago because the user scrubbed past it is never wanted.
    pub fn seek(&mut self, t: f64) {
        self.time = self.wrap(t);
        self.prev_time = self.time;
        debug!(time = self.time, "seek");
    }

    /// Replaces the window, then re-seeks the current time into it.
    ///
    /// Fails if the new window cannot support the current wrap mode. Does
    /// not fire cues (seek semantics).
    pub fn set_window(&mut self, t_min: f64, t_max: f64) -> Result<()> {
        let window = TimeWindow::new(t_min, t_max);
        validate_window(self.wrap_mode, window)?;
        self.window = window;
        debug!(t_min, t_max, "window set");
        self.seek(self.time);
        Ok(())
    }

    /// Replaces the wrap mode, then re-seeks the current time under it.
    ///
    /// Fails if the current window cannot support `mode`. Does not fire
    /// cues (seek semantics).
    pub fn set_wrap(&mut self, mode: WrapMode) -> Result<()> {
        validate_window(mode, self.window)?;
        self.wrap_mode = mode;
        debug!(?mode, "wrap mode set");
        self.seek(self.time);
        Ok(())
    }

    // -----------------------
    // Cue surface
    // -----------------------

    /// Registers a callback to fire when one frame's motion crosses `t`.
    ///
    /// Fires once per advance call whose segment contains `t`, forward or
    /// backward. There is no de-duplication across calls: a clock
    /// oscillating over the trigger fires it once per crossing frame.
    pub fn on(&mut self, t: f64, action: impl FnMut(f64) + Send + 'static) -> CueId {
        let id = self.instant_cues.insert(InstantCue {
            at: t,
            action: Box::new(action),
        });
        self.instant_order.push(id);
        debug!(at = t, "instant cue registered");
        id
    }

    /// Registers enter/exit callbacks for the interval spanned by `t0` and
    /// `t1` (in either order).
    ///
    /// Membership is tested only at the end of each advance, not swept
    /// across the segment like instant cues: a motion fast enough to enter
    /// and leave the interval within a single frame misses both edges.
    /// `clamp_dt` bounds how much motion one frame can cover, which bounds
    /// how narrow an interval can be stepped over.
    ///
    /// Each registration is an independent entity; two range cues over the
    /// same interval keep separate inside/outside state.
    pub fn on_range(
        &mut self,
        t0: f64,
        t1: f64,
        on_enter: impl FnMut(f64) + Send + 'static,
        on_exit: impl FnMut(f64) + Send + 'static,
    ) -> CueId {
        let id = self.range_cues.insert(RangeCue {
            t0,
            t1,
            on_enter: Box::new(on_enter),
            on_exit: Box::new(on_exit),
            inside: false,
        });
        self.range_order.push(id);
        debug!(t0, t1, "range cue registered");
        id
    }

    /// Empties both cue registries and their tracked state.
    pub fn clear_cues(&mut self) {
        self.instant_cues.clear();
        self.instant_order.clear();
        self.range_cues.clear();
        self.range_order.clear();
        debug!("cues cleared");
    }

    // -----------------------
    // Per-frame advance
    // -----------------------

    /// Advances model time by one frame's worth of real time.
    ///
    /// Call once per rendered frame with that frame's elapsed real time
    /// (non-negative). A no-op while paused. The consumed delta is capped
    /// at `clamp_dt`, so one late frame can never move time further than
    /// `rate * clamp_dt`; an unbounded delta could jump clean over a
    /// narrow cue or over an entire window traversal under ping-pong.
    ///
    /// Cue callbacks run synchronously before this returns, so their side
    /// effects are visible to the next line of host code. A panicking
    /// callback unwinds out of this call and the remaining cues of the
    /// firing pass are not run.
    pub fn advance(&mut self, dt_real: f64) {
        if !self.running {
            return;
        }

        let dt = if dt_real <= self.clamp_dt {
            dt_real
        } else {
            self.clamp_dt
        };

        // Only ping-pong reflects; clamp and loop never flip direction.
        let eff_rate = self.rate
            * if self.wrap_mode == WrapMode::PingPong {
                self.dir_sign
            } else {
                1.0
            };

        let old = self.time;
        let proposed = old + eff_rate * dt;

        let (new, bounced) = self.wrap_with_bounce(old, proposed);

        if bounced && self.wrap_mode == WrapMode::PingPong {
            self.dir_sign = -self.dir_sign;
            trace!(dir_sign = self.dir_sign, time = new, "bounce");
        }

        self.prev_time = old;
        self.time = new;
        trace!(prev = old, time = new, "advance");

        self.fire_cues();
    }

    // -----------------------
    // Boundary policy
    // -----------------------

    /// Folds `t` into the window under the active wrap mode.
    fn wrap(&self, t: f64) -> f64 {
        let TimeWindow { t_min: a, t_max: b } = self.window;

        if self.wrap_mode == WrapMode::Clamp || !self.window.is_finite() {
            // Open-ended windows only ever clamp; with b = +inf the upper
            // bound is a no-op.
            return t.min(b).max(a);
        }

        let length = b - a;
        if length == 0.0 {
            return a;
        }

        if self.wrap_mode == WrapMode::Loop {
            a + (t - a).rem_euclid(length)
        } else {
            // Fold into [0, 2*length], then reflect the upper half back.
            // A continuous triangle wave, no jump at the fold points.
            let m = (t - a).rem_euclid(2.0 * length);
            a + if m <= length { m } else { 2.0 * length - m }
        }
    }

    /// Wraps like [`wrap`](Self::wrap) and reports whether a ping-pong
    /// boundary reflection occurred.
    ///
    /// Clamp never bounces, and a loop's jump back to `t_min` is a
    /// discontinuity, not a reflection.
    fn wrap_with_bounce(&self, t_before: f64, t_after: f64) -> (f64, bool) {
        let TimeWindow { t_min: a, t_max: b } = self.window;

        if self.wrap_mode == WrapMode::Clamp || !self.window.is_finite() {
            return (t_after.min(b).max(a), false);
        }
        if self.wrap_mode == WrapMode::Loop {
            return (self.wrap(t_after), false);
        }

        let wrapped = self.wrap(t_after);
        // A bounce is a sign crossing of either boundary by the unwrapped
        // segment, or an exact landing on a boundary, which the crossing
        // test alone misses (zero crossing difference).
        let hit_left =
            (t_before - a) * (t_after - a) < 0.0 || (wrapped - a).abs() < BOUNCE_EPS;
        let hit_right =
            (t_before - b) * (t_after - b) < 0.0 || (wrapped - b).abs() < BOUNCE_EPS;
        (wrapped, hit_left || hit_right)
    }

    // -----------------------
    // Cue firing
    // -----------------------

    /// Scans both registries against the segment of the advance that just
    /// completed, in registration order.
    fn fire_cues(&mut self) {
        let t_prev = self.prev_time;
        let t_now = self.time;

        // Instant cues sweep the whole segment, so a coarse frame cannot
        // step over a trigger. A zero-motion frame fires nothing.
        if t_prev != t_now {
            for id in &self.instant_order {
                if let Some(cue) = self.instant_cues.get_mut(*id) {
                    if crossed(cue.at, t_prev, t_now) {
                        trace!(at = cue.at, "instant cue fired");
                        (cue.action)(cue.at);
                    }
                }
            }
        }

        // Range cues are edge-triggered on membership of the endpoint only.
        for id in &self.range_order {
            if let Some(cue) = self.range_cues.get_mut(*id) {
                let inside_now = cue.contains(t_now);
                if inside_now && !cue.inside {
                    trace!(t0 = cue.t0, t1 = cue.t1, time = t_now, "range entered");
                    (cue.on_enter)(t_now);
                    cue.inside = true;
                } else if !inside_now && cue.inside {
                    trace!(t0 = cue.t0, t1 = cue.t1, time = t_now, "range exited");
                    (cue.on_exit)(t_now);
                    cue.inside = false;
                }
            }
        }
    }
}

impl Default for Timebase {
    fn default() -> Self {
        let config = TimebaseConfig::default();
        // Clamp over [0, +inf) accepts any configuration, so this cannot
        // fail; build directly rather than unwrapping.
        Self {
            time: config.t0,
            prev_time: config.t0,
            rate: config.rate,
            running: true,
            wrap_mode: config.wrap,
            window: config.window,
            clamp_dt: config.clamp_dt,
            dir_sign: 1.0,
            instant_cues: SlotMap::with_key(),
            instant_order: Vec::new(),
            range_cues: SlotMap::with_key(),
            range_order: Vec::new(),
        }
    }
}

/// Checks that `window` can support `mode`.
fn validate_window(mode: WrapMode, window: TimeWindow) -> Result<()> {
    match mode {
        WrapMode::Clamp => Ok(()),
        WrapMode::Loop | WrapMode::PingPong => {
            if window.is_finite() {
                Ok(())
            } else {
                Err(ClockError::InvalidWindow {
                    mode,
                    t_min: window.t_min,
                    t_max: window.t_max,
                })
            }
        }
    }
}
