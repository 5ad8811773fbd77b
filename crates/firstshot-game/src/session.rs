//! Gameplay session
//!
//! Owns the physics world, scene, camera and every controller, and runs one
//! frame at a time: decoded input first, then movement, physics, projectile
//! ageing and finally camera follow.

use firstshot_core::{Transform, Vec3};
use firstshot_physics::{CharacterBody, CharacterBodyConfig, PhysicsWorld};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use winit::event::{ElementState, MouseButton};
use winit::keyboard::PhysicalKey;

use crate::camera::{CameraState, LookConfig, LookController};
use crate::error::GameError;
use crate::input::{InputAction, InputConfig, InputEvent, InputMapper};
use crate::player::{MovementConfig, MovementController, WeaponConfig, WeaponMount};
use crate::projectile::{Launch, ProjectileConfig, ProjectileId, ProjectileManager};
use crate::scene::Scene;

/// Everything tunable about a session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplayConfig {
    /// Camera position relative to the character's feet
    pub eye_offset: Vec3,
    pub look: LookConfig,
    pub movement: MovementConfig,
    pub character: CharacterBodyConfig,
    pub projectile: ProjectileConfig,
    pub weapon: WeaponConfig,
    pub input: InputConfig,
}

impl Default for GameplayConfig {
    fn default() -> Self {
        Self {
            eye_offset: Vec3::new(0.0, 2.0, 0.0),
            look: LookConfig::default(),
            movement: MovementConfig::default(),
            character: CharacterBodyConfig::default(),
            projectile: ProjectileConfig::default(),
            weapon: WeaponConfig::default(),
            input: InputConfig::default(),
        }
    }
}

/// Summary of one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameReport {
    /// Walk vector handed to the character
    pub walk_direction: Vec3,
    /// Projectiles fired this frame
    pub fired: usize,
    /// Projectiles removed by expiry this frame
    pub expired: usize,
}

/// A running first-person session
pub struct Gameplay {
    pub physics: PhysicsWorld,
    pub scene: Scene,
    pub camera: CameraState,
    pub look: LookController,
    pub movement: MovementController,
    pub character: CharacterBody,
    pub weapon: WeaponMount,
    pub projectiles: ProjectileManager,
    pub input: InputMapper,
    eye_offset: Vec3,
    enabled: bool,
}

impl Gameplay {
    /// Build a session around an existing physics world
    pub fn new(config: GameplayConfig, physics: PhysicsWorld) -> Self {
        Self {
            physics,
            scene: Scene::new(),
            camera: CameraState::default(),
            look: LookController::new(config.look),
            movement: MovementController::new(config.movement),
            character: CharacterBody::with_config(config.character),
            weapon: WeaponMount::new(config.weapon),
            projectiles: ProjectileManager::new(config.projectile),
            input: InputMapper::from_config(&config.input),
            eye_offset: config.eye_offset,
            enabled: false,
        }
    }

    /// Insert the character at the origin and warp it to `position`
    pub fn spawn_player(&mut self, position: Vec3) {
        self.character.spawn(&mut self.physics, Vec3::ZERO);
        self.character.warp(&mut self.physics, position);
        self.physics.update_queries();
        self.character.set_view_direction(self.camera.direction());
        self.follow_camera();
        info!("Player spawned at {:?}", position);
    }

    /// Register input and hide the cursor
    pub fn enable(&mut self) -> Result<(), GameError> {
        if !self.character.is_spawned() {
            return Err(GameError::CharacterNotSpawned);
        }
        self.input.enable();
        self.enabled = true;
        Ok(())
    }

    /// Unregister input, release every held action and stop walking
    pub fn disable(&mut self) {
        self.input.disable();
        self.movement.reset(&mut self.character);
        self.enabled = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Feed a raw keyboard event
    pub fn handle_keyboard(&mut self, physical_key: PhysicalKey, state: ElementState) {
        self.input.handle_keyboard(physical_key, state);
    }

    /// Feed a raw mouse button event
    pub fn handle_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        self.input.handle_mouse_button(button, state);
    }

    /// Feed raw mouse motion in pixels
    pub fn handle_mouse_motion(&mut self, delta: (f64, f64)) {
        self.input.handle_mouse_motion(delta);
    }

    /// Advance the session by one frame
    pub fn update(&mut self, dt: f32) -> FrameReport {
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
        let mut report = FrameReport::default();

        for event in self.input.drain_events() {
            if self.dispatch(event) {
                report.fired += 1;
            }
        }

        report.walk_direction = self.movement.update(&self.camera, &mut self.character);
        self.character.set_view_direction(self.camera.direction());
        self.character.step(&mut self.physics, dt);
        self.physics.step(dt);

        report.expired = self
            .projectiles
            .tick(&mut self.physics, &mut self.scene, dt);

        self.follow_camera();
        report
    }

    /// Returns true when the event fired a projectile
    fn dispatch(&mut self, event: InputEvent) -> bool {
        match event {
            InputEvent::Analog { axis, value } => {
                self.look.on_analog(&mut self.camera, axis, value);
                false
            }
            InputEvent::Action {
                action: InputAction::Shoot,
                pressed,
            } => {
                // Fires on release
                if pressed {
                    return false;
                }
                match self.shoot() {
                    Ok(_) => true,
                    Err(e) => {
                        warn!("Shot rejected: {}", e);
                        false
                    }
                }
            }
            InputEvent::Action { action, pressed } => {
                self.movement
                    .on_action(action, pressed, &mut self.character);
                false
            }
        }
    }

    /// Fire a projectile from the pistol muzzle along the camera direction
    pub fn shoot(&mut self) -> Result<ProjectileId, GameError> {
        if !self.character.is_spawned() {
            return Err(GameError::CharacterNotSpawned);
        }
        let launch = Launch {
            origin: self.weapon.muzzle_position(&self.player_transform()),
            rotation: self.camera.rotation(),
            direction: self.camera.direction(),
            impulse: self.projectiles.config.impulse,
        };
        self.projectiles
            .spawn(&mut self.physics, &mut self.scene, &launch)
    }

    /// Character pose: feet position with yaw-only facing
    pub fn player_transform(&self) -> Transform {
        Transform::from_position_rotation(self.character.position(), self.character.facing())
    }

    fn follow_camera(&mut self) {
        self.camera
            .set_position(self.character.position() + self.eye_offset);
        self.weapon.follow(&self.camera);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::KeyCode;

    const DT: f32 = 1.0 / 60.0;

    fn session() -> Gameplay {
        let mut physics = PhysicsWorld::new();
        physics.create_ground(0.0);
        let mut gameplay = Gameplay::new(GameplayConfig::default(), physics);
        gameplay.spawn_player(Vec3::new(0.0, 5.0, 0.0));
        gameplay
    }

    fn press(gameplay: &mut Gameplay, key: KeyCode) {
        gameplay.handle_keyboard(PhysicalKey::Code(key), ElementState::Pressed);
    }

    fn release(gameplay: &mut Gameplay, key: KeyCode) {
        gameplay.handle_keyboard(PhysicalKey::Code(key), ElementState::Released);
    }

    fn click(gameplay: &mut Gameplay, state: ElementState) {
        gameplay.handle_mouse_button(MouseButton::Left, state);
    }

    #[test]
    fn test_enable_requires_spawned_player() {
        let mut gameplay = Gameplay::new(GameplayConfig::default(), PhysicsWorld::new());
        assert!(matches!(
            gameplay.enable(),
            Err(GameError::CharacterNotSpawned)
        ));
        assert!(!gameplay.is_enabled());
    }

    #[test]
    fn test_spawn_places_camera_at_eye() {
        let gameplay = session();
        assert_eq!(gameplay.character.position(), Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(gameplay.camera.position(), Vec3::new(0.0, 7.0, 0.0));
    }

    #[test]
    fn test_enable_hides_cursor() {
        let mut gameplay = session();
        gameplay.enable().unwrap();
        assert!(!gameplay.input.cursor_visible());
        gameplay.disable();
        assert!(gameplay.input.cursor_visible());
    }

    #[test]
    fn test_forward_key_walks_forward() {
        let mut gameplay = session();
        gameplay.enable().unwrap();
        press(&mut gameplay, KeyCode::KeyW);
        let report = gameplay.update(DT);
        assert!((report.walk_direction - Vec3::new(0.0, 0.0, -2.6)).length() < 1e-5);

        release(&mut gameplay, KeyCode::KeyW);
        let report = gameplay.update(DT);
        assert_eq!(report.walk_direction, Vec3::ZERO);
    }

    #[test]
    fn test_first_shot_leaves_in_front_of_player() {
        let mut gameplay = session();
        let id = gameplay.shoot().unwrap();
        let body = gameplay.projectiles.get(id).unwrap().body();
        let (origin, _) = gameplay.physics.body_pose(body).unwrap();
        assert!((origin - Vec3::new(0.2, 6.931449, -0.5)).length() < 1e-3);
    }

    #[test]
    fn test_first_frame_shot_travels_forward() {
        let mut gameplay = session();
        gameplay.enable().unwrap();
        click(&mut gameplay, ElementState::Released);
        assert_eq!(gameplay.update(DT).fired, 1);

        let projectile = gameplay.projectiles.iter().next().unwrap();
        let (position, _) = gameplay.physics.body_pose(projectile.body()).unwrap();
        assert!(position.z < -0.5);
        assert!((position.x - 0.2).abs() < 0.05);
    }

    #[test]
    fn test_shoot_fires_on_release() {
        let mut gameplay = session();
        gameplay.enable().unwrap();

        click(&mut gameplay, ElementState::Pressed);
        assert_eq!(gameplay.update(DT).fired, 0);
        assert!(gameplay.projectiles.is_empty());

        click(&mut gameplay, ElementState::Released);
        assert_eq!(gameplay.update(DT).fired, 1);
        assert_eq!(gameplay.projectiles.len(), 1);
        assert_eq!(gameplay.scene.len(), 1);
        assert_eq!(gameplay.physics.body_count(), 1);
    }

    #[test]
    fn test_input_ignored_while_disabled() {
        let mut gameplay = session();
        press(&mut gameplay, KeyCode::KeyW);
        click(&mut gameplay, ElementState::Released);
        let report = gameplay.update(DT);
        assert_eq!(report.walk_direction, Vec3::ZERO);
        assert!(gameplay.projectiles.is_empty());
    }

    #[test]
    fn test_disable_stops_walking() {
        let mut gameplay = session();
        gameplay.enable().unwrap();
        press(&mut gameplay, KeyCode::KeyD);
        gameplay.update(DT);
        gameplay.disable();
        assert_eq!(gameplay.character.walk_direction(), Vec3::ZERO);
        assert_eq!(gameplay.update(DT).walk_direction, Vec3::ZERO);
    }

    #[test]
    fn test_mouse_motion_turns_camera_and_walk() {
        let mut gameplay = session();
        gameplay.enable().unwrap();
        gameplay.input.axis_scale = 1.0;
        gameplay.handle_mouse_motion((-std::f64::consts::FRAC_PI_2, 0.0));
        press(&mut gameplay, KeyCode::KeyW);
        let report = gameplay.update(DT);

        assert!((gameplay.camera.direction() - Vec3::NEG_X).length() < 1e-4);
        assert!((report.walk_direction - Vec3::new(-2.6, 0.0, 0.0)).length() < 1e-3);
        assert!((gameplay.character.view_direction() - Vec3::NEG_X).length() < 1e-4);
    }

    #[test]
    fn test_camera_follows_player() {
        let mut gameplay = session();
        gameplay.enable().unwrap();
        for _ in 0..30 {
            gameplay.update(DT);
        }
        let expected = gameplay.character.position() + Vec3::new(0.0, 2.0, 0.0);
        assert_eq!(gameplay.camera.position(), expected);
        assert!(gameplay.character.position().y < 5.0);
    }

    #[test]
    fn test_zero_dt_keeps_walk_vector() {
        let mut gameplay = session();
        gameplay.enable().unwrap();
        press(&mut gameplay, KeyCode::KeyA);
        let first = gameplay.update(DT).walk_direction;
        let second = gameplay.update(0.0).walk_direction;
        assert_eq!(first, second);
    }

    #[test]
    fn test_weapon_pitch_tracks_camera() {
        let mut gameplay = session();
        gameplay.enable().unwrap();
        gameplay.input.axis_scale = 0.01;
        gameplay.handle_mouse_motion((0.0, -30.0));
        gameplay.update(DT);
        assert!(gameplay.camera.direction().y > 0.0);
        assert!((gameplay.weapon.pitch() - gameplay.camera.pitch()).abs() < 1e-6);
        assert!(gameplay.weapon.pitch() < 0.0);
    }

    #[test]
    fn test_projectiles_expire_in_session() {
        let mut gameplay = session();
        gameplay.projectiles.config.max_lifetime = 0.05;
        gameplay.enable().unwrap();
        click(&mut gameplay, ElementState::Released);
        gameplay.update(DT);
        assert_eq!(gameplay.projectiles.len(), 1);

        let mut expired = 0;
        for _ in 0..10 {
            expired += gameplay.update(DT).expired;
        }
        assert_eq!(expired, 1);
        assert!(gameplay.scene.is_empty());
        assert_eq!(gameplay.physics.body_count(), 0);
    }
}
