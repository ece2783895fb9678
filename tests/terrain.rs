use fault_terrain::{
    Fault, FaultSettings, GridParams, RandomFaults, ScriptedFaults, TerrainConfig, TerrainError,
    TerrainMesh,
};

fn generate(div: u32, seed: u64) -> TerrainMesh {
    let grid = GridParams::new(div, -1., 1., -1., 1.).unwrap();
    TerrainMesh::generate(grid, &FaultSettings::default(), &mut RandomFaults::seeded(seed)).unwrap()
}

#[test]
fn mesh_sizes_follow_div() {
    for div in [1, 3, 10, 32] {
        let terrain = generate(div, div as u64);
        let n = div as usize;

        assert_eq!(terrain.vertex_count(), (n + 1) * (n + 1));
        assert_eq!(terrain.triangle_count(), 2 * n * n);
        assert_eq!(terrain.vertex_buffer().len(), 3 * terrain.vertex_count());
        assert_eq!(terrain.normal_buffer().len(), 3 * terrain.vertex_count());
        assert_eq!(terrain.triangle_indices().len(), 3 * terrain.triangle_count());
        assert_eq!(terrain.edges().count(), 3 * terrain.triangle_count());
    }
}

#[test]
fn triangle_indices_in_range() {
    let terrain = generate(12, 1);
    let count = terrain.vertex_count() as u32;

    assert!(terrain.triangles().flatten().all(|idx| idx < count));
    assert!(terrain.edges().flatten().all(|idx| idx < count));
}

#[test]
fn normals_are_unit_length() {
    let terrain = generate(24, 77);

    for n in terrain.normals() {
        assert!((n.length() - 1.).abs() < 1e-5, "normal {n:?} is not unit length");
        assert!(n.z > 0., "heightfield normals face up");
    }
}

#[test]
fn heights_bounded_by_fault_budget() {
    let settings = FaultSettings::default();
    let terrain = generate(16, 5);
    let bound = settings.max_displacement() + 1e-4;

    let (min, max) = terrain.height_range();
    assert!(min >= -bound && max <= bound);
}

#[test]
fn same_seed_same_terrain() {
    let config = TerrainConfig {
        grid: GridParams::new(20, -2., 2., -1., 1.).unwrap(),
        ..Default::default()
    };

    let a = TerrainMesh::from_config(&config, 1234).unwrap();
    let b = TerrainMesh::from_config(&config, 1234).unwrap();
    let c = TerrainMesh::from_config(&config, 4321).unwrap();

    assert_eq!(a.vertices(), b.vertices());
    assert_eq!(a.normals(), b.normals());
    assert_ne!(a.vertices(), c.vertices());
}

#[test]
fn edges_follow_triangle_sides() {
    let terrain = generate(2, 0);

    for (tri, sides) in terrain
        .triangles()
        .zip(terrain.edges().collect::<Vec<_>>().chunks(3))
    {
        let [a, b, c] = tri;
        assert_eq!(sides, &[[a, b], [b, c], [c, a]]);
    }
}

#[test]
fn scripted_regression_heightmap() {
    // Three faults through the middle row of a 2x2 grid, all with normal +i.
    // Row 0 sits behind each line, row 2 in front, row 1 on it.
    let grid = GridParams::new(2, 0., 2., 0., 2.).unwrap();
    let settings = FaultSettings {
        iterations: 3,
        delta: 0.25,
    };
    let mut source = ScriptedFaults::new(vec![Fault::new(1, 0, 0.), Fault::new(1, 2, 0.)]);

    let terrain = TerrainMesh::generate(grid, &settings, &mut source).unwrap();
    let heights: Vec<f32> = terrain.vertices().iter().map(|v| v.z).collect();

    assert_eq!(
        heights,
        vec![-0.75, -0.75, -0.75, 0., 0., 0., 0.75, 0.75, 0.75]
    );
}

#[test]
fn invalid_grid_rejected() {
    let grid = GridParams {
        div: 0,
        ..Default::default()
    };
    let err = TerrainMesh::generate(grid, &FaultSettings::default(), &mut RandomFaults::seeded(0))
        .unwrap_err();

    assert!(matches!(err, TerrainError::InvalidConfiguration { .. }));
}

#[test]
fn missing_config_file_is_io_error() {
    let err = TerrainConfig::from_toml_file("does/not/exist.toml").unwrap_err();
    assert!(matches!(err, TerrainError::Io { .. }));
}
