//! GPU window renders agree with the CPU. Skipped when no adapter exists.

use planar_flyover::*;
use planar_terrain::{TerrainParameters, karst_biome};

fn gpu_or_skip() -> Option<GpuHeightSource> {
    match GpuHeightSource::new_headless() {
        Ok(gpu) => Some(gpu),
        Err(err) => {
            eprintln!("skipping GPU parity: {err}");
            None
        }
    }
}

fn assert_windows_agree(params: &TerrainParameters, window: &WindowSpec) {
    let Some(mut gpu) = gpu_or_skip() else {
        return;
    };
    let mut cpu = CpuHeightSource::new();
    let mut expected = Vec::new();
    let mut actual = Vec::new();
    cpu.render_window(params, window, &mut expected).unwrap();
    gpu.render_window(params, window, &mut actual).unwrap();
    assert_eq!(expected.len(), actual.len());

    // Terrace steps and biome seams may flip on a rounding difference, so a
    // handful of nodes are allowed to land on the other side.
    let tol = params.terrain_height.abs().max(1.0) * 0.01;
    let off = expected
        .iter()
        .zip(&actual)
        .filter(|(e, a)| (*e - *a).abs() >= tol)
        .count();
    assert!(
        off * 100 <= expected.len(),
        "{off} of {} nodes differ on {}",
        expected.len(),
        gpu.adapter_name()
    );
}

#[test]
fn default_window_matches_cpu() {
    let window = WindowSpec::centered([0.0, 0.0], 300.0, 64);
    assert_windows_agree(&TerrainParameters::default(), &window);
}

#[test]
fn seeded_karst_window_matches_cpu() {
    let mut params = TerrainParameters::with_seed(77);
    params.biomes.push(karst_biome());
    params.biome_count = 6;
    params.landform_blend = 0.2;
    let window = WindowSpec::centered([1_200.0, 3_400.0], 500.0, 48);
    assert_windows_agree(&params, &window);
}

#[test]
fn oversized_window_is_an_error_not_a_device_fault() {
    let Some(mut gpu) = gpu_or_skip() else {
        return;
    };
    let window = WindowSpec::centered([0.0, 0.0], 300.0, 20_000);
    let mut out = Vec::new();
    let err = gpu
        .render_window(&TerrainParameters::default(), &window, &mut out)
        .unwrap_err();
    assert!(matches!(err, BridgeError::WindowTooLarge { resolution: 20_000, .. }), "{err}");

    // The source stays usable afterwards.
    let small = WindowSpec::centered([0.0, 0.0], 300.0, 8);
    gpu.render_window(&TerrainParameters::default(), &small, &mut out)
        .unwrap();
    assert_eq!(out.len(), 64);
}
