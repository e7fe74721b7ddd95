//! Nametags overlay demo
//!
//! Renders one simulated frame of players around the camera and logs the
//! resulting nametag batch.

use std::f32::consts::TAU;
use std::path::PathBuf;

use clap::Parser;
use glam::{Mat4, Vec2, Vec3};
use nametags::settings::{default_settings_path, load_or_default};
use nametags::{
    Entity, EntityList, FrameDispatcher, MatrixStack, NametagBatch, NametagsModule,
    OverlayRenderEvent, RenderTarget, WorldRenderEvent,
};

#[derive(Parser, Debug)]
#[command(about = "Render one frame of player nametags headlessly")]
struct Args {
    /// Number of players placed around the camera
    #[arg(long, default_value_t = 8)]
    players: u32,

    /// Override the nametag scale (1.0 - 4.0)
    #[arg(long)]
    scale: Option<f32>,

    #[arg(long, default_value_t = 854.0)]
    width: f32,

    #[arg(long, default_value_t = 480.0)]
    height: f32,

    /// Settings file; defaults to the platform config directory
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Also show the distance on each tag
    #[arg(long)]
    distance: bool,
}

struct LoggingTarget;

impl RenderTarget for LoggingTarget {
    fn submit(&mut self, batch: NametagBatch) {
        tracing::info!(
            "Batch committed: {} vertices, {} indices, {} text sections ({} bytes of vertex data)",
            batch.vertices.len(),
            batch.indices.len(),
            batch.texts.len(),
            batch.vertex_bytes().len()
        );
        for section in &batch.texts {
            tracing::info!(
                "  {:>10} at ({:.1}, {:.1}) z={:.3}",
                section.text,
                section.screen_position.x,
                section.screen_position.y,
                section.z
            );
        }
    }
}

fn build_scene(players: u32, camera: Vec3) -> EntityList {
    (0..players)
        .map(|i| {
            let angle = i as f32 / players.max(1) as f32 * TAU;
            let radius = 4.0 + i as f32 * 3.0;
            let feet = camera + Vec3::new(angle.cos() * radius, -1.62, angle.sin() * radius);
            let mut player = Entity::player(i + 1, format!("Player{}", i + 1), feet)
                .with_ping(20 + i * 15)
                .with_health(20.0 - (i % 20) as f32, 20.0);
            // Walking toward the camera since the last tick
            player.move_to(feet - (feet - camera).normalize_or_zero() * 0.2);
            player
        })
        .collect()
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let settings_path = match args.settings.clone() {
        Some(path) => Some(path),
        None => match default_settings_path() {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!("{}", e);
                None
            }
        },
    };
    let mut settings = settings_path
        .as_deref()
        .map(load_or_default)
        .unwrap_or_default();
    if let Some(scale) = args.scale {
        if let Err(e) = settings.set_scale(scale) {
            tracing::error!("{}", e);
            std::process::exit(2);
        }
    }
    settings.distance |= args.distance;

    let module = NametagsModule::new(settings);
    let camera = Vec3::new(0.0, 65.62, 0.0);
    let world = build_scene(args.players, camera);
    tracing::info!("Starting nametags demo with {} players", world.len());

    // Camera looks along -Z; the model-view is camera-relative (rotation only)
    let stack = MatrixStack::with_base(Mat4::look_at_rh(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y));
    let projection =
        Mat4::perspective_rh_gl(70f32.to_radians(), args.width / args.height, 0.05, 256.0);

    let mut dispatcher = FrameDispatcher::new();
    dispatcher.world_rendered(module.on_world_render(&WorldRenderEvent {
        matrix_stack: &stack,
        projection,
        camera_position: camera,
    }));

    let overlay = OverlayRenderEvent {
        tick_delta: 0.5,
        viewport: Vec2::new(args.width, args.height),
    };
    let mut target = LoggingTarget;
    match module.on_overlay_render(&overlay, dispatcher.current(), &world, &mut target) {
        Ok(drawn) => tracing::info!("Drew {} of {} nametags", drawn, world.len()),
        Err(e) => tracing::error!("Nametag pass failed: {}", e),
    }
    dispatcher.end_frame();
    tracing::info!("Rendered {} frame(s)", dispatcher.frames());
}
