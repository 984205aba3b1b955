//! Property tests for the height function and the biome classifier.

use planar_terrain::{HeightFieldComposer, TerrainParameters, noise2d};
use proptest::prelude::*;

fn world_coord() -> impl Strategy<Value = f32> {
    -100_000.0f32..100_000.0
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn height_is_deterministic(x in world_coord(), z in world_coord(), seed in 0u64..1_000) {
        let a = HeightFieldComposer::new(TerrainParameters::with_seed(seed));
        let b = HeightFieldComposer::new(TerrainParameters::with_seed(seed));
        prop_assert_eq!(a.height(x, z).to_bits(), b.height(x, z).to_bits());
    }

    #[test]
    fn height_is_finite_and_bounded(x in world_coord(), z in world_coord()) {
        let composer = HeightFieldComposer::new(TerrainParameters::default());
        let h = composer.height(x, z);
        prop_assert!(h.is_finite());
        // Relief sums to at most 1.95 H; carving removes at most 2 H.
        prop_assert!(h.abs() <= 35.0 * 4.0, "height {} out of range", h);
    }

    #[test]
    fn noise_stays_in_range(x in -10_000.0f32..10_000.0, y in -10_000.0f32..10_000.0) {
        let n = noise2d(x, y);
        prop_assert!(n.abs() <= 1.05, "noise {} out of range", n);
    }

    #[test]
    fn biome_id_in_range(x in world_coord(), z in world_coord(), count in 1u32..=16) {
        let mut params = TerrainParameters::default();
        params.biome_count = count;
        let composer = HeightFieldComposer::new(params);
        let b = composer.classify(x, z);
        prop_assert!(b.biome_id.0 < count);
        prop_assert!((0.0..1.0).contains(&b.blend));
    }

    #[test]
    fn biome_blend_is_continuous(x in -20_000.0f32..20_000.0, z in -20_000.0f32..20_000.0) {
        let composer = HeightFieldComposer::new(TerrainParameters::default());
        let a = composer.classify(x, z).blend;
        let b = composer.classify(x, z + 0.1).blend;
        let d = (a - b).abs();
        // Circular distance, so the intentional wrap from N-1 to 0 is allowed.
        prop_assert!(d.min(1.0 - d) < 1e-3, "blend jumped by {} at ({}, {})", d, x, z);
    }
}
