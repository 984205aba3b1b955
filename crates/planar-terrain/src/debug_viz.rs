//! Top-down debug images of the height field and biome cycle.
//!
//! The demo writes these as PNGs; they are the quickest way to spot a
//! landform seam or a biome band that does not wrap.

mod image;
mod renderers;

pub use self::image::DebugImage;
pub use renderers::{
    WorldRegion, height_to_color, render_biome_debug, render_heightmap_debug, render_noise_debug,
};

/// Which debug images are wanted, and whether the ones already produced
/// still match the terrain.
#[derive(Clone, Debug, Default)]
pub struct TerrainDebugState {
    pub show_heightmap: bool,
    pub show_biome_map: bool,
    /// Outline the sampler's cached window on the heightmap.
    pub show_sampler_window: bool,
    rendered_generation: Option<u64>,
}

impl TerrainDebugState {
    /// Everything hidden, nothing rendered yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every image enabled.
    pub fn all() -> Self {
        Self {
            show_heightmap: true,
            show_biome_map: true,
            show_sampler_window: true,
            rendered_generation: None,
        }
    }

    pub fn any_visible(&self) -> bool {
        self.show_heightmap || self.show_biome_map || self.show_sampler_window
    }

    /// Whether images must be (re)rendered for parameter `generation`.
    pub fn needs_render(&self, generation: u64) -> bool {
        self.any_visible() && self.rendered_generation != Some(generation)
    }

    /// Record that images for `generation` were written.
    pub fn mark_rendered(&mut self, generation: u64) {
        self.rendered_generation = Some(generation);
    }

    /// Force the next [`Self::needs_render`] to return `true`.
    pub fn invalidate(&mut self) {
        self.rendered_generation = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_state_never_renders() {
        let state = TerrainDebugState::new();
        assert!(!state.any_visible());
        assert!(!state.needs_render(0));
    }

    #[test]
    fn test_render_tracks_generation() {
        let mut state = TerrainDebugState::all();
        assert!(state.needs_render(0));
        state.mark_rendered(0);
        assert!(!state.needs_render(0));
        assert!(state.needs_render(1));

        state.invalidate();
        assert!(state.needs_render(0));
    }

    #[test]
    fn test_single_overlay_counts_as_visible() {
        let state = TerrainDebugState {
            show_sampler_window: true,
            ..Default::default()
        };
        assert!(state.any_visible());
    }
}
