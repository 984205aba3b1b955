//! Cached square grid of heights around the last sampler center.

/// Placement of an `R × R` grid of height samples in world space.
///
/// Node `(i, j)` sits at `origin + (i, j) * spacing`; storage is row-major
/// with `j` (world Z) as the row index. The GPU compute pass computes node
/// positions with the same expression.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowSpec {
    /// World position of node `(0, 0)` as `(x, z)`.
    pub origin: [f32; 2],
    /// Distance between neighbouring nodes.
    pub spacing: f32,
    /// Nodes per side (≥ 2).
    pub resolution: u32,
}

impl WindowSpec {
    /// Window of side `world_size` centered on `center`.
    pub fn centered(center: [f32; 2], world_size: f32, resolution: u32) -> Self {
        let resolution = resolution.max(2);
        let half = world_size * 0.5;
        Self {
            origin: [center[0] - half, center[1] - half],
            spacing: world_size / (resolution - 1) as f32,
            resolution,
        }
    }

    /// Total number of nodes.
    pub fn node_count(&self) -> usize {
        let r = self.resolution as usize;
        r * r
    }

    /// World `(x, z)` of node `(i, j)`.
    #[inline]
    pub fn node(&self, i: u32, j: u32) -> [f32; 2] {
        [
            self.origin[0] + i as f32 * self.spacing,
            self.origin[1] + j as f32 * self.spacing,
        ]
    }

    /// Side length actually covered by the nodes.
    pub fn extent(&self) -> f32 {
        self.spacing * (self.resolution - 1) as f32
    }

    /// Whether `(x, z)` lies inside the covered square (edges included).
    pub fn contains(&self, x: f32, z: f32) -> bool {
        let fx = (x - self.origin[0]) / self.spacing;
        let fz = (z - self.origin[1]) / self.spacing;
        let last = (self.resolution - 1) as f32;
        (0.0..=last).contains(&fx) && (0.0..=last).contains(&fz)
    }
}

/// A rendered window plus the parameter generation it was rendered with.
#[derive(Clone, Debug)]
pub struct HeightSampleCache {
    window: WindowSpec,
    center: [f32; 2],
    heights: Vec<f32>,
    generation: u64,
}

impl HeightSampleCache {
    /// Wrap rendered heights. `heights.len()` must equal `window.node_count()`.
    pub(crate) fn new(window: WindowSpec, center: [f32; 2], heights: Vec<f32>, generation: u64) -> Self {
        debug_assert_eq!(heights.len(), window.node_count());
        Self {
            window,
            center,
            heights,
            generation,
        }
    }

    pub fn window(&self) -> &WindowSpec {
        &self.window
    }

    /// Center the window was rendered around.
    pub fn center(&self) -> [f32; 2] {
        self.center
    }

    /// Parameter generation the heights belong to.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Raw node heights, row-major.
    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    /// Give the buffer back for reuse by the next render.
    pub(crate) fn into_heights(self) -> Vec<f32> {
        self.heights
    }

    /// Stored height of node `(i, j)`.
    pub fn node_height(&self, i: u32, j: u32) -> Option<f32> {
        let r = self.window.resolution;
        if i >= r || j >= r {
            return None;
        }
        self.heights.get((j * r + i) as usize).copied()
    }

    /// Bilinearly interpolated height, or `None` outside the window.
    pub fn sample(&self, x: f32, z: f32) -> Option<f32> {
        let w = &self.window;
        let fx = (x - w.origin[0]) / w.spacing;
        let fz = (z - w.origin[1]) / w.spacing;
        let last = (w.resolution - 1) as f32;
        if !(0.0..=last).contains(&fx) || !(0.0..=last).contains(&fz) {
            return None;
        }

        let i0 = (fx as u32).min(w.resolution - 2);
        let j0 = (fz as u32).min(w.resolution - 2);
        let tx = fx - i0 as f32;
        let tz = fz - j0 as f32;

        let h00 = self.node_height(i0, j0)?;
        let h10 = self.node_height(i0 + 1, j0)?;
        let h01 = self.node_height(i0, j0 + 1)?;
        let h11 = self.node_height(i0 + 1, j0 + 1)?;

        let top = h00 + (h10 - h00) * tx;
        let bottom = h01 + (h11 - h01) * tx;
        Some(top + (bottom - top) * tz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn planar_cache() -> HeightSampleCache {
        // h = 2x + 3z is reproduced exactly by bilinear interpolation.
        let window = WindowSpec::centered([0.0, 0.0], 8.0, 5);
        let mut heights = Vec::new();
        for j in 0..5 {
            for i in 0..5 {
                let [x, z] = window.node(i, j);
                heights.push(2.0 * x + 3.0 * z);
            }
        }
        HeightSampleCache::new(window, [0.0, 0.0], heights, 1)
    }

    #[test]
    fn test_centered_window_geometry() {
        let w = WindowSpec::centered([100.0, -50.0], 300.0, 128);
        assert_eq!(w.origin, [-50.0, -200.0]);
        assert!((w.extent() - 300.0).abs() < 1e-3);
        assert_eq!(w.node_count(), 128 * 128);
        assert!(w.contains(100.0, -50.0));
        assert!(!w.contains(260.0, -50.0));
    }

    #[test]
    fn test_resolution_clamped_to_two() {
        let w = WindowSpec::centered([0.0, 0.0], 10.0, 0);
        assert_eq!(w.resolution, 2);
        assert_eq!(w.spacing, 10.0);
    }

    #[test]
    fn test_bilinear_reproduces_plane() {
        let cache = planar_cache();
        for &(x, z) in &[(0.0, 0.0), (1.3, -2.7), (-4.0, 4.0), (3.99, 0.01)] {
            let h = cache.sample(x, z).unwrap();
            assert!((h - (2.0 * x + 3.0 * z)).abs() < 1e-4, "({x}, {z}) -> {h}");
        }
    }

    #[test]
    fn test_sample_outside_is_none() {
        let cache = planar_cache();
        assert!(cache.sample(4.5, 0.0).is_none());
        assert!(cache.sample(0.0, -4.01).is_none());
        assert!(cache.sample(f32::NAN, 0.0).is_none());
    }

    #[test]
    fn test_node_height_bounds() {
        let cache = planar_cache();
        assert_eq!(cache.node_height(0, 0), Some(2.0 * -4.0 + 3.0 * -4.0));
        assert_eq!(cache.node_height(5, 0), None);
    }
}
