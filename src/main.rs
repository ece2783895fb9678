use std::f32::consts::FRAC_PI_2;
use std::path::PathBuf;

use anyhow::Context;
use bevy::{app::AppExit, prelude::*};
use bevy_atmosphere::prelude::*;
use bevy_fly_camera::{FlyCamera, FlyCameraPlugin};
use clap::{Parser, ValueEnum};
use fault_terrain::{ColorMode, TerrainConfig, TerrainMesh};
use tracing_subscriber::EnvFilter;

/// World units per terrain unit; the default grid spans -1..1.
const WORLD_SCALE: f32 = 50.;

/// Fault formation terrain viewer.
#[derive(Parser, Debug)]
#[command(name = "terrain_viewer", version, about, long_about = None)]
struct Cli {
    /// TOML file with `[grid]` and `[faults]` tables.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for the fault source. Random when omitted.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Cells per side of the grid.
    #[arg(long)]
    div: Option<u32>,

    /// Number of faults applied.
    #[arg(long)]
    iterations: Option<u32>,

    /// Height step per fault.
    #[arg(long)]
    delta: Option<f32>,

    /// Vertex colouring of the solid mesh.
    #[arg(long, value_enum, default_value = "elevation")]
    color: ColorArg,

    /// Generate once, log statistics and exit without opening a window.
    #[arg(long)]
    headless: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ColorArg {
    Uniform,
    Normals,
    Elevation,
}

impl From<ColorArg> for ColorMode {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Uniform => ColorMode::Uniform,
            ColorArg::Normals => ColorMode::Normals,
            ColorArg::Elevation => ColorMode::Elevation,
        }
    }
}

impl Cli {
    fn terrain_config(&self) -> anyhow::Result<TerrainConfig> {
        let mut config = match &self.config {
            Some(path) => TerrainConfig::from_toml_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => TerrainConfig::default(),
        };

        if let Some(div) = self.div {
            config.grid.div = div;
        }
        if let Some(iterations) = self.iterations {
            config.faults.iterations = iterations;
        }
        if let Some(delta) = self.delta {
            config.faults.delta = delta;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }

        config.validate().context("invalid terrain settings")?;
        Ok(config)
    }
}

#[derive(Resource)]
struct TerrainSettings {
    config: TerrainConfig,
    seed: u64,
    color: ColorMode,
}

#[derive(Resource)]
struct TerrainHandles {
    surface: Handle<Mesh>,
    wireframe: Handle<Mesh>,
}

/// Which terrain meshes are drawn. `M` steps through the modes.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
enum RenderMode {
    #[default]
    Solid,
    Wireframe,
    Both,
}

impl RenderMode {
    fn next(self) -> Self {
        match self {
            Self::Solid => Self::Wireframe,
            Self::Wireframe => Self::Both,
            Self::Both => Self::Solid,
        }
    }

    fn shows_surface(self) -> bool {
        matches!(self, Self::Solid | Self::Both)
    }

    fn shows_wireframe(self) -> bool {
        matches!(self, Self::Wireframe | Self::Both)
    }
}

#[derive(Component)]
struct TerrainSurface;

#[derive(Component)]
struct TerrainWireframe;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.terrain_config()?;
    let seed = config.seed.unwrap_or_else(rand::random);
    let color = ColorMode::from(cli.color);

    if cli.headless {
        return run_headless(&config, seed);
    }

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Fault Terrain".into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugin(FlyCameraPlugin)
        .add_plugin(AtmospherePlugin)
        .insert_resource(TerrainSettings {
            config,
            seed,
            color,
        })
        .init_resource::<RenderMode>()
        .add_startup_system(setup_terrain)
        .add_system(cycle_render_mode)
        .add_system(regenerate_terrain)
        .run();

    Ok(())
}

fn run_headless(config: &TerrainConfig, seed: u64) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let terrain = TerrainMesh::from_config(config, seed)?;
    let (min, max) = terrain.height_range();

    info!(
        seed,
        vertices = terrain.vertex_count(),
        triangles = terrain.triangle_count(),
        edges = terrain.edge_indices().len() / 2,
        min_height = min,
        max_height = max,
        "Generated terrain"
    );

    Ok(())
}

fn setup_terrain(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    settings: Res<TerrainSettings>,
    mode: Res<RenderMode>,
    mut exit: EventWriter<AppExit>,
) {
    let terrain = match TerrainMesh::from_config(&settings.config, settings.seed) {
        Ok(terrain) => terrain,
        Err(err) => {
            error!("Failed to generate terrain: {err}");
            exit.send(AppExit);
            return;
        }
    };
    info!(seed = settings.seed, "Terrain ready");

    let handles = TerrainHandles {
        surface: meshes.add(terrain.to_render_mesh(settings.color)),
        wireframe: meshes.add(terrain.to_wireframe_mesh()),
    };

    // Terrain heights are +z; Bevy is y-up
    let transform = Transform::from_rotation(Quat::from_rotation_x(-FRAC_PI_2))
        .with_scale(Vec3::splat(WORLD_SCALE));

    let base_color = match settings.color {
        ColorMode::Uniform => Color::rgb_u8(0xff, 0xd8, 0x91),
        ColorMode::Normals | ColorMode::Elevation => Color::WHITE,
    };

    commands.spawn((
        PbrBundle {
            mesh: handles.surface.clone(),
            material: materials.add(StandardMaterial {
                base_color,
                perceptual_roughness: 0.5,
                ..default()
            }),
            transform,
            visibility: visibility(mode.shows_surface()),
            ..default()
        },
        TerrainSurface,
    ));

    commands.spawn((
        PbrBundle {
            mesh: handles.wireframe.clone(),
            material: materials.add(StandardMaterial {
                base_color: Color::BLACK,
                unlit: true,
                ..default()
            }),
            transform,
            visibility: visibility(mode.shows_wireframe()),
            ..default()
        },
        TerrainWireframe,
    ));

    commands.insert_resource(handles);

    add_camera(&mut commands);
    add_lights(&mut commands);
}

fn visibility(shown: bool) -> Visibility {
    if shown {
        Visibility::Visible
    } else {
        Visibility::Hidden
    }
}

fn cycle_render_mode(
    keys: Res<Input<KeyCode>>,
    mut mode: ResMut<RenderMode>,
    mut surfaces: Query<&mut Visibility, (With<TerrainSurface>, Without<TerrainWireframe>)>,
    mut wireframes: Query<&mut Visibility, (With<TerrainWireframe>, Without<TerrainSurface>)>,
) {
    if !keys.just_pressed(KeyCode::M) {
        return;
    }

    *mode = mode.next();
    debug!(mode = ?*mode, "Render mode changed");

    for mut vis in surfaces.iter_mut() {
        *vis = visibility(mode.shows_surface());
    }
    for mut vis in wireframes.iter_mut() {
        *vis = visibility(mode.shows_wireframe());
    }
}

/// `R` replaces both terrain meshes with a terrain from a fresh seed.
fn regenerate_terrain(
    keys: Res<Input<KeyCode>>,
    mut settings: ResMut<TerrainSettings>,
    handles: Option<Res<TerrainHandles>>,
    mut meshes: ResMut<Assets<Mesh>>,
) {
    let Some(handles) = handles else { return };
    if !keys.just_pressed(KeyCode::R) {
        return;
    }

    let seed = rand::random();
    match TerrainMesh::from_config(&settings.config, seed) {
        Ok(terrain) => {
            if let Some(mesh) = meshes.get_mut(&handles.surface) {
                *mesh = terrain.to_render_mesh(settings.color);
            }
            if let Some(mesh) = meshes.get_mut(&handles.wireframe) {
                *mesh = terrain.to_wireframe_mesh();
            }
            settings.seed = seed;
            info!(seed, "Regenerated terrain");
        }
        Err(err) => error!("Failed to regenerate terrain: {err}"),
    }
}

fn add_camera(commands: &mut Commands) {
    commands
        .spawn(Camera3dBundle {
            transform: Transform::from_xyz(0., 0.5 * WORLD_SCALE, 1.5 * WORLD_SCALE),
            ..default()
        })
        .insert(FlyCamera::default())
        .insert(AtmosphereCamera::default());
}

fn add_lights(commands: &mut Commands) {
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 0.1,
    });

    commands.spawn(DirectionalLightBundle {
        directional_light: DirectionalLight {
            illuminance: 10000.,
            shadows_enabled: false,
            ..default()
        },
        transform: Transform::from_rotation(Quat::from_rotation_x(-0.25 * std::f32::consts::PI)),
        ..default()
    });
}
