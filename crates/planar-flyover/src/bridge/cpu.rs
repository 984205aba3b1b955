//! CPU height source: direct composer evaluation per node.

use planar_terrain::{HeightFieldComposer, TerrainParameters};

use super::{BridgeError, HeightSource};
use crate::height_cache::WindowSpec;

/// Renders windows on the calling thread with [`HeightFieldComposer`].
///
/// Also serves as the sampler's recovery path when the GPU source fails.
#[derive(Debug, Default)]
pub struct CpuHeightSource {
    composer: Option<HeightFieldComposer>,
    raw_params: Option<TerrainParameters>,
}

impl CpuHeightSource {
    pub fn new() -> Self {
        Self::default()
    }

    fn composer_for(&mut self, params: &TerrainParameters) -> &HeightFieldComposer {
        if self.raw_params.as_ref() != Some(params) {
            self.raw_params = Some(params.clone());
            self.composer = None;
        }
        self.composer
            .get_or_insert_with(|| HeightFieldComposer::new(params.clone()))
    }
}

impl HeightSource for CpuHeightSource {
    fn name(&self) -> &'static str {
        "cpu"
    }

    fn render_window(
        &mut self,
        params: &TerrainParameters,
        window: &WindowSpec,
        out: &mut Vec<f32>,
    ) -> Result<(), BridgeError> {
        let composer = self.composer_for(params);
        out.clear();
        out.reserve(window.node_count());
        for j in 0..window.resolution {
            for i in 0..window.resolution {
                let [x, z] = window.node(i, j);
                out.push(composer.height(x, z));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_matches_direct_evaluation() {
        let params = TerrainParameters::with_seed(4);
        let composer = HeightFieldComposer::new(params.clone());
        let window = WindowSpec::centered([500.0, -1_200.0], 300.0, 16);
        let mut source = CpuHeightSource::new();
        let mut out = Vec::new();
        source.render_window(&params, &window, &mut out).unwrap();

        assert_eq!(out.len(), 256);
        let [x, z] = window.node(5, 11);
        assert_eq!(out[11 * 16 + 5], composer.height(x, z));
    }

    #[test]
    fn test_params_change_rebuilds_composer() {
        let window = WindowSpec::centered([0.0, 0.0], 100.0, 4);
        let mut source = CpuHeightSource::new();
        let mut a = Vec::new();
        let mut b = Vec::new();
        source
            .render_window(&TerrainParameters::default(), &window, &mut a)
            .unwrap();
        let mut taller = TerrainParameters::default();
        taller.terrain_height = 70.0;
        source.render_window(&taller, &window, &mut b).unwrap();
        assert_ne!(a, b);
    }
}
