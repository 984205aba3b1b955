//! Floating-origin wrap along Z.
//!
//! The viewer's accumulated travel `rover_z` is kept in `f64`. Objects that
//! live at a fixed world Z are drawn at `wrap_z(world_z)`, a small local
//! coordinate in `[-half_range, half_range)`; the subtraction from the rover
//! happens in `f64` before the cast, so local positions stay precise however
//! far the viewer has flown. Height queries always take the true world Z,
//! reconstructed with [`CoordinateWrapper::to_world`].

/// Repeating local Z interval used for geometry placement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WrapWindow {
    range: f32,
    half_range: f32,
}

impl WrapWindow {
    /// Range used when none (or an invalid one) is configured.
    pub const DEFAULT_RANGE: f32 = 400.0;

    /// Create a window of length `range`. Non-finite or non-positive ranges
    /// fall back to [`Self::DEFAULT_RANGE`].
    pub fn new(range: f32) -> Self {
        let range = if range.is_finite() && range > 0.0 {
            range
        } else {
            tracing::warn!(range, "invalid wrap range, using {}", Self::DEFAULT_RANGE);
            Self::DEFAULT_RANGE
        };
        Self {
            range,
            half_range: range * 0.5,
        }
    }

    pub fn range(&self) -> f32 {
        self.range
    }

    pub fn half_range(&self) -> f32 {
        self.half_range
    }
}

impl Default for WrapWindow {
    fn default() -> Self {
        Self::new(Self::DEFAULT_RANGE)
    }
}

/// Tracks the viewer's forward travel and maps world Z to local Z.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordinateWrapper {
    window: WrapWindow,
    rover_z: f64,
}

impl CoordinateWrapper {
    pub fn new(window: WrapWindow) -> Self {
        Self {
            window,
            rover_z: 0.0,
        }
    }

    pub fn window(&self) -> WrapWindow {
        self.window
    }

    /// Accumulated forward travel.
    pub fn rover_z(&self) -> f64 {
        self.rover_z
    }

    /// Jump the rover to an absolute position (e.g. on realm switch).
    pub fn set_rover_z(&mut self, rover_z: f64) {
        self.rover_z = rover_z;
    }

    /// Move the rover forward by `dz`. Must run before the sampler recenters
    /// in the same frame.
    pub fn advance(&mut self, dz: f32) {
        self.rover_z += f64::from(dz);
    }

    /// Local Z of an object fixed at `world_z`, in `[-half_range, half_range)`.
    pub fn wrap_z(&self, world_z: f64) -> f32 {
        let range = f64::from(self.window.range);
        let half = f64::from(self.window.half_range);
        let mut r = (world_z - self.rover_z + half).rem_euclid(range);
        // rem_euclid may round up to exactly `range`.
        if r >= range {
            r = 0.0;
        }
        let local = (r - half) as f32;
        // The f32 cast can round up onto the open end; -half is congruent.
        if local >= self.window.half_range {
            -self.window.half_range
        } else {
            local
        }
    }

    /// True world Z of a local coordinate.
    pub fn to_world(&self, local_z: f32) -> f64 {
        f64::from(local_z) + self.rover_z
    }

    /// `(local_z, world_z)` for an object: where to draw it, and the
    /// coordinate to pass to height queries.
    pub fn place(&self, world_z: f64) -> (f32, f32) {
        let local = self.wrap_z(world_z);
        (local, self.to_world(local) as f32)
    }
}

impl Default for CoordinateWrapper {
    fn default() -> Self {
        Self::new(WrapWindow::default())
    }
}
