//! Firstshot - first-person shooting sandbox
//!
//! Runs a scripted, headless session: the player drops into a small arena,
//! walks, looks around, jumps and fires, while the log reports what happens.

mod settings;

use anyhow::{Context, Result};
use firstshot_core::{Color, GameTime, Transform, Vec3};
use firstshot_game::{Gameplay, Material, Mesh, SceneNode};
use firstshot_physics::PhysicsWorld;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use winit::event::{ElementState, MouseButton};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::settings::GameSettings;

/// Simulated frame rate of the scripted run
const FRAME_RATE: f32 = 60.0;
/// Length of the scripted run in seconds
const RUN_SECONDS: f32 = 12.0;

/// One scripted input
#[derive(Debug, Clone, Copy)]
enum Cue {
    Key(KeyCode, ElementState),
    Click(ElementState),
    Look(f64, f64),
}

/// Inputs fired on a given frame
fn script(frame: u32) -> Vec<Cue> {
    use ElementState::{Pressed, Released};

    let mut cues = Vec::new();
    match frame {
        60 => cues.push(Cue::Key(KeyCode::KeyW, Pressed)),
        200 => cues.push(Cue::Key(KeyCode::ShiftLeft, Pressed)),
        260 => cues.push(Cue::Key(KeyCode::ShiftLeft, Released)),
        300 => cues.push(Cue::Key(KeyCode::Space, Pressed)),
        302 => cues.push(Cue::Key(KeyCode::Space, Released)),
        360 | 420 | 540 => cues.push(Cue::Click(Pressed)),
        362 | 422 | 542 => cues.push(Cue::Click(Released)),
        480 => cues.push(Cue::Key(KeyCode::KeyW, Released)),
        _ => {}
    }
    if (120..180).contains(&frame) {
        cues.push(Cue::Look(-8.0, 0.0));
    }
    if (500..520).contains(&frame) {
        cues.push(Cue::Look(0.0, -6.0));
    }
    cues
}

/// Ground, a wall and a few loose crates
fn build_arena(gameplay: &mut Gameplay) {
    gameplay.physics.create_ground(0.0);

    let wall = Vec3::new(10.0, 2.0, 0.5);
    let wall_position = Vec3::new(0.0, 2.0, -15.0);
    gameplay.physics.create_static_box(wall, wall_position);
    gameplay.scene.attach(SceneNode {
        name: "wall".to_string(),
        mesh: Mesh::Box { half_extents: wall },
        material: Material::default(),
        transform: Transform::from_position(wall_position),
    });

    for i in 0..3 {
        let half = Vec3::splat(0.5);
        let position = Vec3::new(-3.0 + 3.0 * i as f32, 0.5, -8.0);
        gameplay.physics.create_dynamic_box(half, position, 5.0);
        gameplay.scene.attach(SceneNode {
            name: format!("crate-{}", i),
            mesh: Mesh::Box { half_extents: half },
            material: Material {
                base_color: Color::rgb(0.6, 0.4, 0.2),
                ..Material::default()
            },
            transform: Transform::from_position(position),
        });
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("Failed to set subscriber")?;

    info!("Starting Firstshot...");

    let settings = GameSettings::load();
    if std::env::args().any(|arg| arg == "--write-settings") {
        settings.save().context("Failed to write settings")?;
    }

    let physics = PhysicsWorld::with_config(settings.physics.clone());
    let mut gameplay = Gameplay::new(settings.gameplay.clone(), physics);
    build_arena(&mut gameplay);

    gameplay.spawn_player(Vec3::new(0.0, 5.0, 0.0));
    gameplay
        .enable()
        .context("Failed to enable player input")?;

    let mut game_time = GameTime::new(settings.time.clone());
    let frames = (FRAME_RATE * RUN_SECONDS) as u32;
    let mut fired = 0;

    for frame in 0..frames {
        for cue in script(frame) {
            match cue {
                Cue::Key(key, state) => gameplay.handle_keyboard(PhysicalKey::Code(key), state),
                Cue::Click(state) => gameplay.handle_mouse_button(MouseButton::Left, state),
                Cue::Look(dx, dy) => gameplay.handle_mouse_motion((dx, dy)),
            }
        }

        game_time.update(1.0 / FRAME_RATE);
        let report = gameplay.update(game_time.delta_time);
        fired += report.fired;
        if report.expired > 0 {
            info!("{} projectiles expired", report.expired);
        }

        if frame % FRAME_RATE as u32 == 0 {
            info!(
                "t={:.1}s player={:.2?} grounded={} looking={:.2?} live projectiles={}",
                game_time.total_time,
                gameplay.character.position(),
                gameplay.character.is_grounded(),
                gameplay.camera.direction(),
                gameplay.projectiles.len()
            );
        }
    }

    gameplay.disable();
    if fired == 0 {
        warn!("Scripted run fired no projectiles");
    }

    info!(
        "Finished after {} frames: fired {}, expired {}, {} still live",
        game_time.frame_count,
        fired,
        gameplay.projectiles.expired_total(),
        gameplay.projectiles.len()
    );
    Ok(())
}
