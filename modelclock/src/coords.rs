//! Mapping between world positions (meters) and the host's scene units.
//!
//! A stateless linear transform: the clock never touches it, but a host
//! that positions objects as a function of model time usually wants its
//! `f(t) -> (x, y)` expressed in meters and rendered in scene units.

use crate::error::{ClockError, Result};

/// Converts world coordinates (meters) to scene units and back.
///
/// `origin` is where the world origin sits in the scene; `x_right` and
/// `y_up` flip the respective axis when set to `-1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneCoords {
    meters_per_unit: f64,
    origin: (f64, f64),
    x_right: f64,
    y_up: f64,
}

impl SceneCoords {
    /// Creates a transform.
    ///
    /// Fails fast on a zero or non-finite scale, or on axis signs other
    /// than `+1`/`-1`, so mistakes surface before anything is drawn.
    pub fn new(
        meters_per_unit: f64,
        origin: (f64, f64),
        x_right: f64,
        y_up: f64,
    ) -> Result<Self> {
        if meters_per_unit == 0.0 || !meters_per_unit.is_finite() {
            return Err(ClockError::InvalidScale {
                value: meters_per_unit,
            });
        }
        if x_right != 1.0 && x_right != -1.0 {
            return Err(ClockError::InvalidAxis {
                axis: "x_right",
                value: x_right,
            });
        }
        if y_up != 1.0 && y_up != -1.0 {
            return Err(ClockError::InvalidAxis {
                axis: "y_up",
                value: y_up,
            });
        }
        Ok(Self {
            meters_per_unit,
            origin,
            x_right,
            y_up,
        })
    }

    /// Converts a world length in meters to scene units.
    pub fn world_len_to_scene(&self, meters: f64) -> f64 {
        meters / self.meters_per_unit
    }

    /// Converts a scene length in units to meters.
    pub fn scene_len_to_world(&self, units: f64) -> f64 {
        units * self.meters_per_unit
    }

    /// Converts a world point `(x, y)` in meters to a scene point.
    pub fn world_to_scene_point(&self, x_m: f64, y_m: f64) -> (f64, f64) {
        (
            self.origin.0 + self.x_right * self.world_len_to_scene(x_m),
            self.origin.1 + self.y_up * self.world_len_to_scene(y_m),
        )
    }

    /// Converts a scene point back to world meters.
    pub fn scene_to_world_point(&self, x_sc: f64, y_sc: f64) -> (f64, f64) {
        // Subtract the origin first, then undo the axis sign, then convert
        // units; the inverse of `world_to_scene_point` step by step.
        let dx_scene = (x_sc - self.origin.0) * self.x_right;
        let dy_scene = (y_sc - self.origin.1) * self.y_up;
        (
            self.scene_len_to_world(dx_scene),
            self.scene_len_to_world(dy_scene),
        )
    }

    /// Wraps a world-position function of model time into one that yields
    /// scene points directly.
    ///
    /// The host samples the returned function with
    /// [`model_time()`](crate::timebase::Timebase::model_time) once per
    /// frame to place an object.
    pub fn scene_position_fn<F>(&self, mut world_pos: F) -> impl FnMut(f64) -> (f64, f64)
    where
        F: FnMut(f64) -> (f64, f64),
    {
        let coords = *self;
        move |t| {
            let (x_m, y_m) = world_pos(t);
            coords.world_to_scene_point(x_m, y_m)
        }
    }
}

impl Default for SceneCoords {
    fn default() -> Self {
        Self {
            meters_per_unit: 1.0,
            origin: (0.0, 0.0),
            x_right: 1.0,
            y_up: 1.0,
        }
    }
}
