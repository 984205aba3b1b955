//! Height-field sampler: cached, recentered window with synchronous queries.
//!
//! Per frame the owner calls [`HeightFieldSampler::update_center`] once (after
//! the coordinate wrapper has moved), then any number of consumers call
//! [`HeightFieldSampler::get_height`]. Queries never fail: points outside the
//! window, or a window rendered with older parameters, are evaluated
//! directly; a sampler with no source attached answers `0.0`.

use std::cell::Cell;

use planar_terrain::{BiomeBlend, HeightFieldComposer, TerrainParameters};

use crate::bridge::{CpuHeightSource, HeightSource};
use crate::height_cache::{HeightSampleCache, WindowSpec};

/// Largest accepted window resolution. A 1024² window is 4 MiB of heights,
/// well inside default GPU storage limits.
pub const MAX_RESOLUTION: u32 = 1024;

/// Window size and recenter policy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SamplerConfig {
    /// Side length of the cached window in world units.
    pub world_size: f32,
    /// Grid nodes per side.
    pub resolution: u32,
    /// Recenter once the center drifts more than `world_size * recenter_fraction`
    /// along either axis.
    pub recenter_fraction: f32,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            world_size: 300.0,
            resolution: 128,
            recenter_fraction: 0.25,
        }
    }
}

impl SamplerConfig {
    /// Replace unusable fields with defaults.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let mut out = self;
        if !(out.world_size.is_finite() && out.world_size > 0.0) {
            tracing::warn!(world_size = out.world_size, "invalid sampler world size, using default");
            out.world_size = defaults.world_size;
        }
        if !(2..=MAX_RESOLUTION).contains(&out.resolution) {
            let clamped = out.resolution.clamp(2, MAX_RESOLUTION);
            tracing::warn!(
                resolution = out.resolution,
                clamped,
                "sampler resolution out of range, clamping"
            );
            out.resolution = clamped;
        }
        if !(out.recenter_fraction.is_finite() && out.recenter_fraction > 0.0) {
            tracing::warn!(
                fraction = out.recenter_fraction,
                "invalid recenter fraction, using default"
            );
            out.recenter_fraction = defaults.recenter_fraction;
        }
        out
    }

    /// Drift along either axis that triggers a recenter.
    pub fn recenter_threshold(&self) -> f32 {
        self.world_size * self.recenter_fraction
    }
}

/// Counters for how queries were answered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SamplerStats {
    /// Windows rendered.
    pub recenters: u64,
    /// Queries answered from the cached window.
    pub cached_hits: u64,
    /// Queries answered by direct evaluation.
    pub direct_fallbacks: u64,
    /// Queries made before a source was attached.
    pub uninitialized_queries: u64,
    /// Renders where the active source failed and the CPU took over.
    pub source_failures: u64,
}

/// Outcome of [`HeightFieldSampler::update_center`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CenterUpdate {
    /// The existing window still covers the viewer.
    Unchanged,
    /// A new window was rendered.
    Recentered,
    /// No source attached yet; nothing rendered.
    Uninitialized,
}

/// Owns the cached height window and answers height queries.
pub struct HeightFieldSampler {
    config: SamplerConfig,
    params: TerrainParameters,
    composer: HeightFieldComposer,
    generation: u64,
    source: Option<Box<dyn HeightSource>>,
    cpu_fallback: CpuHeightSource,
    cache: Option<HeightSampleCache>,
    stats: Cell<SamplerStats>,
    warned_uninitialized: Cell<bool>,
}

impl HeightFieldSampler {
    /// Create a sampler with no source; queries return `0.0` until one is attached.
    pub fn new(params: TerrainParameters, config: SamplerConfig) -> Self {
        let composer = HeightFieldComposer::new(params.clone());
        Self {
            config: config.sanitized(),
            params,
            composer,
            generation: 0,
            source: None,
            cpu_fallback: CpuHeightSource::new(),
            cache: None,
            stats: Cell::new(SamplerStats::default()),
            warned_uninitialized: Cell::new(false),
        }
    }

    /// Create a sampler that renders with `source`.
    pub fn with_source(
        params: TerrainParameters,
        config: SamplerConfig,
        source: Box<dyn HeightSource>,
    ) -> Self {
        let mut sampler = Self::new(params, config);
        sampler.attach_source(source);
        sampler
    }

    /// Attach (or replace) the window source. The current window is dropped.
    pub fn attach_source(&mut self, source: Box<dyn HeightSource>) {
        tracing::info!(source = source.name(), "height sampler source attached");
        self.source = Some(source);
        self.cache = None;
    }

    /// Whether a source is attached.
    pub fn is_initialized(&self) -> bool {
        self.source.is_some()
    }

    /// Name of the attached source.
    pub fn source_name(&self) -> Option<&'static str> {
        self.source.as_ref().map(|s| s.name())
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Parameters exactly as supplied.
    pub fn params(&self) -> &TerrainParameters {
        &self.params
    }

    /// Composer used for direct evaluation.
    pub fn composer(&self) -> &HeightFieldComposer {
        &self.composer
    }

    /// Current window, if one has been rendered.
    pub fn cache(&self) -> Option<&HeightSampleCache> {
        self.cache.as_ref()
    }

    pub fn stats(&self) -> SamplerStats {
        self.stats.get()
    }

    pub fn reset_stats(&self) {
        self.stats.set(SamplerStats::default());
    }

    /// Increments every time the parameters change.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Replace the parameters. Any change to the surface they describe
    /// invalidates the cached window; edits that sanitize to the parameters
    /// already in use are stored without a new generation.
    pub fn set_params(&mut self, params: TerrainParameters) {
        if params == self.params {
            return;
        }
        let composer = HeightFieldComposer::new(params.clone());
        self.params = params;
        if composer.params() == self.composer.params() {
            return;
        }
        self.composer = composer;
        self.generation += 1;
        tracing::debug!(generation = self.generation, "terrain parameters changed");
    }

    /// Update height amplitude and noise frequency, keeping everything else.
    pub fn sync_terrain_params(&mut self, terrain_height: f32, terrain_scale: f32) {
        // Bitwise so a repeated NaN counts as unchanged.
        if self.params.terrain_height.to_bits() == terrain_height.to_bits()
            && self.params.terrain_scale.to_bits() == terrain_scale.to_bits()
        {
            return;
        }
        let mut params = self.params.clone();
        params.terrain_height = terrain_height;
        params.terrain_scale = terrain_scale;
        self.set_params(params);
    }

    /// Reseed the world.
    pub fn set_seed(&mut self, seed: u64) {
        if self.params.seed() == seed {
            return;
        }
        let mut params = self.params.clone();
        params.set_seed(seed);
        self.set_params(params);
    }

    /// Drop the current window; the next `update_center` re-renders.
    pub fn invalidate(&mut self) {
        self.cache = None;
    }

    fn needs_recenter(&self, x: f32, z: f32) -> bool {
        match &self.cache {
            None => true,
            Some(cache) if cache.generation() != self.generation => true,
            Some(cache) => {
                let [cx, cz] = cache.center();
                let drift = (x - cx).abs().max((z - cz).abs());
                // NaN drift never satisfies `<=`, so a bad center forces a render.
                !(drift <= self.config.recenter_threshold())
            }
        }
    }

    /// Move the window center to the viewer, re-rendering when the viewer
    /// has drifted past the threshold or the parameters changed.
    pub fn update_center(&mut self, x: f32, z: f32) -> CenterUpdate {
        if self.source.is_none() {
            self.warn_uninitialized();
            return CenterUpdate::Uninitialized;
        }
        if !x.is_finite() || !z.is_finite() {
            tracing::warn!(x, z, "non-finite sampler center ignored");
            return CenterUpdate::Unchanged;
        }
        if !self.needs_recenter(x, z) {
            return CenterUpdate::Unchanged;
        }

        let window = WindowSpec::centered([x, z], self.config.world_size, self.config.resolution);
        let mut heights = self
            .cache
            .take()
            .map(HeightSampleCache::into_heights)
            .unwrap_or_default();

        let rendered = match self.source.as_mut() {
            Some(source) => match source.render_window(&self.params, &window, &mut heights) {
                Ok(()) => true,
                Err(err) => {
                    tracing::error!(source = source.name(), %err, "height window render failed, using CPU");
                    self.bump(|s| s.source_failures += 1);
                    false
                }
            },
            None => false,
        };
        if !rendered
            && let Err(err) = self
                .cpu_fallback
                .render_window(&self.params, &window, &mut heights)
        {
            tracing::error!(%err, "CPU height window render failed");
            return CenterUpdate::Unchanged;
        }

        if heights.len() != window.node_count() {
            tracing::error!(
                expected = window.node_count(),
                actual = heights.len(),
                "height window has wrong size, discarded"
            );
            return CenterUpdate::Unchanged;
        }

        self.cache = Some(HeightSampleCache::new(window, [x, z], heights, self.generation));
        self.bump(|s| s.recenters += 1);
        tracing::debug!(x, z, "height window recentered");
        CenterUpdate::Recentered
    }

    /// Height at a true world position.
    pub fn get_height(&self, x: f32, z: f32) -> f32 {
        if self.source.is_none() {
            self.warn_uninitialized();
            self.bump(|s| s.uninitialized_queries += 1);
            return 0.0;
        }
        if let Some(cache) = &self.cache
            && cache.generation() == self.generation
            && let Some(h) = cache.sample(x, z)
        {
            self.bump(|s| s.cached_hits += 1);
            return h;
        }
        self.bump(|s| s.direct_fallbacks += 1);
        self.composer.height(x, z)
    }

    /// Batch form of [`Self::get_height`].
    pub fn get_heights(&self, points: &[(f32, f32)]) -> Vec<f32> {
        points.iter().map(|&(x, z)| self.get_height(x, z)).collect()
    }

    /// Continuous biome blend at a true world position.
    pub fn get_biome_at(&self, x: f32, z: f32) -> f32 {
        self.composer.classify(x, z).blend
    }

    /// Full classification at a true world position.
    pub fn classify(&self, x: f32, z: f32) -> BiomeBlend {
        self.composer.classify(x, z)
    }

    fn bump(&self, f: impl FnOnce(&mut SamplerStats)) {
        let mut stats = self.stats.get();
        f(&mut stats);
        self.stats.set(stats);
    }

    fn warn_uninitialized(&self) {
        if !self.warned_uninitialized.replace(true) {
            tracing::warn!("height sampler queried before a source was attached, returning 0");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::BridgeError;

    fn cpu_sampler() -> HeightFieldSampler {
        HeightFieldSampler::with_source(
            TerrainParameters::default(),
            SamplerConfig::default(),
            Box::new(CpuHeightSource::new()),
        )
    }

    struct FailingSource;

    impl HeightSource for FailingSource {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn render_window(
            &mut self,
            _params: &TerrainParameters,
            _window: &WindowSpec,
            _out: &mut Vec<f32>,
        ) -> Result<(), BridgeError> {
            Err(BridgeError::NoAdapter)
        }
    }

    #[test]
    fn test_small_move_does_not_recenter() {
        let mut s = cpu_sampler();
        assert_eq!(s.update_center(0.0, 0.0), CenterUpdate::Recentered);
        assert_eq!(s.update_center(0.0, 1.0), CenterUpdate::Unchanged);
        assert_eq!(s.update_center(0.0, 250.0), CenterUpdate::Recentered);
        assert_eq!(s.stats().recenters, 2);
    }

    #[test]
    fn test_threshold_is_fraction_of_world_size() {
        let mut s = cpu_sampler();
        s.update_center(0.0, 0.0);
        assert_eq!(s.update_center(74.0, -74.0), CenterUpdate::Unchanged);
        assert_eq!(s.update_center(76.0, 0.0), CenterUpdate::Recentered);
    }

    #[test]
    fn test_uninitialized_returns_zero() {
        let mut s = HeightFieldSampler::new(TerrainParameters::default(), SamplerConfig::default());
        assert!(!s.is_initialized());
        assert_eq!(s.update_center(0.0, 0.0), CenterUpdate::Uninitialized);
        assert_eq!(s.get_height(10.0, 10.0), 0.0);
        assert_eq!(s.get_heights(&[(1.0, 1.0), (2.0, 2.0)]), vec![0.0, 0.0]);
        assert_eq!(s.stats().uninitialized_queries, 3);
    }

    #[test]
    fn test_cached_value_close_to_direct() {
        let mut s = cpu_sampler();
        s.update_center(0.0, 0.0);
        let window = *s.cache().unwrap().window();
        for (i, j) in [(0, 0), (17, 40), (126, 100), (64, 3)] {
            let [x, z] = window.node(i, j);
            let cached = s.get_height(x, z);
            let direct = s.composer().height(x, z);
            assert!((cached - direct).abs() < 1e-2, "node ({i}, {j}): {cached} vs {direct}");
        }
        assert_eq!(s.stats().cached_hits, 4);
    }

    #[test]
    fn test_outside_window_matches_direct_evaluation() {
        let mut s = cpu_sampler();
        s.update_center(0.0, 0.0);
        let h = s.get_height(5_000.0, -7_000.0);
        assert_eq!(h, s.composer().height(5_000.0, -7_000.0));
        assert_eq!(s.stats().direct_fallbacks, 1);
    }

    #[test]
    fn test_param_change_bypasses_stale_window() {
        let mut s = cpu_sampler();
        s.update_center(0.0, 0.0);
        s.sync_terrain_params(80.0, 0.0005);
        assert_eq!(s.generation(), 1);

        // Before the next update the stale window must not be used.
        let h = s.get_height(3.0, 4.0);
        assert_eq!(h, s.composer().height(3.0, 4.0));
        assert_eq!(s.stats().cached_hits, 0);

        // Even without moving, the next update re-renders.
        assert_eq!(s.update_center(0.0, 0.0), CenterUpdate::Recentered);
    }

    #[test]
    fn test_unchanged_params_keep_generation() {
        let mut s = cpu_sampler();
        s.sync_terrain_params(35.0, 0.0005);
        s.set_seed(0);
        assert_eq!(s.generation(), 0);
        s.set_seed(12);
        assert_eq!(s.generation(), 1);
        assert_eq!(s.params().seed(), 12);
    }

    #[test]
    fn test_failing_source_falls_back_to_cpu() {
        let mut s = HeightFieldSampler::with_source(
            TerrainParameters::default(),
            SamplerConfig {
                resolution: 16,
                ..Default::default()
            },
            Box::new(FailingSource),
        );
        assert_eq!(s.update_center(100.0, 100.0), CenterUpdate::Recentered);
        assert_eq!(s.stats().source_failures, 1);
        let cache = s.cache().unwrap();
        let [x, z] = cache.window().node(3, 9);
        assert_eq!(cache.node_height(3, 9), Some(s.composer().height(x, z)));
    }

    #[test]
    fn test_invalid_config_sanitized() {
        let c = SamplerConfig {
            world_size: -1.0,
            resolution: 0,
            recenter_fraction: f32::NAN,
        }
        .sanitized();
        assert_eq!(c.world_size, 300.0);
        assert_eq!(c.resolution, 2);
        assert_eq!(c.recenter_fraction, 0.25);

        let huge = SamplerConfig {
            resolution: 100_000,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(huge.resolution, MAX_RESOLUTION);
    }

    #[test]
    fn test_repeated_nan_params_do_not_churn_generation() {
        let mut s = cpu_sampler();
        s.update_center(0.0, 0.0);
        for _ in 0..5 {
            s.sync_terrain_params(f32::NAN, 0.0005);
        }
        // NaN height sanitizes to the default already in use.
        assert_eq!(s.generation(), 0);
        assert!(s.params().terrain_height.is_nan());
        assert_eq!(s.update_center(0.0, 0.0), CenterUpdate::Unchanged);

        s.sync_terrain_params(f32::NAN, 0.001);
        s.sync_terrain_params(f32::NAN, 0.001);
        assert_eq!(s.generation(), 1);
    }

    #[test]
    fn test_non_finite_center_ignored() {
        let mut s = cpu_sampler();
        assert_eq!(s.update_center(f32::NAN, 0.0), CenterUpdate::Unchanged);
        assert!(s.cache().is_none());
    }
}
