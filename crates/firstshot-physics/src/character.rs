//! Walk-direction character body built on rapier3d's kinematic character controller
//!
//! The gameplay layer writes a walk direction (units per second, horizontal)
//! and a view direction every frame; the body resolves them against the world
//! with gravity, ground snapping and a grounded-only jump.

use glam::{Quat, Vec3};
use rapier3d::control::{CharacterAutostep, CharacterLength, KinematicCharacterController};
use rapier3d::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{to_na_vector, PhysicsWorld};

/// Character body configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterBodyConfig {
    /// Capsule radius (default: 0.5m)
    pub radius: f32,
    /// Capsule height (default: 2.0m)
    pub height: f32,
    /// Body mass, divides the jump impulse (default: 1.0)
    pub mass: f32,
    /// Impulse applied on jump, in the body's facing frame (default: 20 up)
    pub jump_force: Vec3,
    /// Maximum slope angle in degrees (default: 45)
    pub max_slope_angle: f32,
    /// Step height for climbing stairs (default: 0.25m)
    pub step_height: f32,
    /// Skin width for collision detection (default: 0.02m)
    pub skin_width: f32,
    /// Whether to snap to ground when walking down slopes
    pub snap_to_ground: bool,
    /// Maximum ground snap distance
    pub ground_snap_distance: f32,
}

impl Default for CharacterBodyConfig {
    fn default() -> Self {
        Self {
            radius: 0.5,
            height: 2.0,
            mass: 1.0,
            jump_force: Vec3::new(0.0, 20.0, 0.0),
            max_slope_angle: 45.0,
            step_height: 0.25,
            skin_width: 0.02,
            snap_to_ground: true,
            ground_snap_distance: 0.2,
        }
    }
}

/// Physics-driven character that walks along a commanded direction
pub struct CharacterBody {
    /// Configuration
    pub config: CharacterBodyConfig,
    /// Feet position
    position: Vec3,
    /// Horizontal locomotion command, consumed every step
    walk_direction: Vec3,
    /// Horizontal facing direction (unit length)
    view_direction: Vec3,
    /// Vertical velocity from gravity and jumps
    vertical_velocity: f32,
    /// Whether the character touched ground during the last step
    grounded: bool,
    /// A jump accepted since the last step
    jump_pending: bool,
    /// The collider handle for this character
    collider_handle: Option<ColliderHandle>,
    /// Rapier's kinematic character controller
    controller: KinematicCharacterController,
}

impl CharacterBody {
    /// Create a new character body with default config
    pub fn new() -> Self {
        Self::with_config(CharacterBodyConfig::default())
    }

    /// Create a new character body with custom config
    pub fn with_config(config: CharacterBodyConfig) -> Self {
        let mut controller = KinematicCharacterController::default();
        controller.max_slope_climb_angle = config.max_slope_angle.to_radians();
        controller.min_slope_slide_angle = config.max_slope_angle.to_radians();
        controller.autostep = Some(CharacterAutostep {
            max_height: CharacterLength::Absolute(config.step_height),
            min_width: CharacterLength::Relative(0.5),
            include_dynamic_bodies: true,
        });
        controller.snap_to_ground = if config.snap_to_ground {
            Some(CharacterLength::Absolute(config.ground_snap_distance))
        } else {
            None
        };
        controller.offset = CharacterLength::Absolute(config.skin_width);

        Self {
            config,
            position: Vec3::ZERO,
            walk_direction: Vec3::ZERO,
            view_direction: Vec3::Z,
            vertical_velocity: 0.0,
            grounded: false,
            jump_pending: false,
            collider_handle: None,
            controller,
        }
    }

    /// Insert the character's capsule into the physics world
    pub fn spawn(&mut self, physics: &mut PhysicsWorld, position: Vec3) -> ColliderHandle {
        if let Some(old) = self.collider_handle.take() {
            physics.remove_collider(old);
        }

        let half_height = (self.config.height - 2.0 * self.config.radius) / 2.0;
        let collider = ColliderBuilder::capsule_y(half_height.max(0.01), self.config.radius)
            .translation(to_na_vector(self.capsule_center(position)))
            .friction(0.0) // Smooth sliding against walls
            .restitution(0.0)
            .build();

        let handle = physics.add_static_collider(collider);
        self.collider_handle = Some(handle);
        self.position = position;
        self.vertical_velocity = 0.0;
        self.grounded = false;
        self.jump_pending = false;
        debug!("Character spawned at {:?}", position);
        handle
    }

    /// Whether the body has been inserted into a physics world
    pub fn is_spawned(&self) -> bool {
        self.collider_handle.is_some()
    }

    /// The collider handle, if spawned
    pub fn collider_handle(&self) -> Option<ColliderHandle> {
        self.collider_handle
    }

    /// Current feet position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Current walk direction command
    pub fn walk_direction(&self) -> Vec3 {
        self.walk_direction
    }

    /// Set the walk direction; only the horizontal part is used
    pub fn set_walk_direction(&mut self, walk_direction: Vec3) {
        self.walk_direction = Vec3::new(walk_direction.x, 0.0, walk_direction.z);
    }

    /// Current horizontal facing direction
    pub fn view_direction(&self) -> Vec3 {
        self.view_direction
    }

    /// Set the facing direction. Vertical components are ignored and a
    /// straight-up or straight-down view keeps the previous facing.
    pub fn set_view_direction(&mut self, direction: Vec3) {
        let flat = Vec3::new(direction.x, 0.0, direction.z);
        if let Some(normalized) = flat.try_normalize() {
            self.view_direction = normalized;
        }
    }

    /// Rotation taking local +Z onto the facing direction (yaw only)
    pub fn facing(&self) -> Quat {
        Quat::from_rotation_y(self.view_direction.x.atan2(self.view_direction.z))
    }

    /// Vertical velocity from gravity and jumps
    pub fn vertical_velocity(&self) -> f32 {
        self.vertical_velocity
    }

    /// Check if standing on ground
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// Request a jump. Ignored unless the body is on the ground.
    pub fn jump(&mut self) -> bool {
        if !self.grounded {
            debug!("Jump ignored, character is airborne");
            return false;
        }
        self.jump_pending = true;
        true
    }

    /// Teleport the character, clearing vertical motion
    pub fn warp(&mut self, physics: &mut PhysicsWorld, position: Vec3) {
        self.position = position;
        self.vertical_velocity = 0.0;
        self.jump_pending = false;
        self.grounded = false;
        self.sync_collider(physics);
    }

    /// Advance the body by one frame: jump, gravity, then a collision-corrected move
    pub fn step(&mut self, physics: &mut PhysicsWorld, dt: f32) {
        if !(dt > 0.0) {
            return;
        }

        if self.jump_pending {
            let impulse = self.facing() * self.config.jump_force;
            self.vertical_velocity = impulse.y / self.config.mass.max(f32::EPSILON);
            self.jump_pending = false;
        }
        self.vertical_velocity += physics.config.gravity.y * dt;

        let translation = Vec3::new(
            self.walk_direction.x * dt,
            self.vertical_velocity * dt,
            self.walk_direction.z * dt,
        );
        self.move_character(physics, translation, dt);

        if self.grounded && self.vertical_velocity < 0.0 {
            self.vertical_velocity = 0.0;
        }
    }

    /// Move the character with collision detection
    fn move_character(&mut self, physics: &mut PhysicsWorld, desired_translation: Vec3, dt: f32) {
        let Some(collider_handle) = self.collider_handle else {
            return;
        };

        let Some(collider) = physics.collider_set.get(collider_handle) else {
            return;
        };

        let shape = collider.shape();
        let center = self.capsule_center(self.position);
        let current_pos = Isometry::translation(center.x, center.y, center.z);

        let movement = self.controller.move_shape(
            dt,
            &physics.rigid_body_set,
            &physics.collider_set,
            &physics.query_pipeline,
            shape,
            &current_pos,
            to_na_vector(desired_translation),
            QueryFilter::default().exclude_collider(collider_handle),
            |_| {},
        );

        self.grounded = movement.grounded;

        let effective = movement.translation;
        self.position += Vec3::new(effective.x, effective.y, effective.z);
        self.sync_collider(physics);
    }

    fn sync_collider(&self, physics: &mut PhysicsWorld) {
        let Some(handle) = self.collider_handle else {
            return;
        };
        if let Some(collider) = physics.collider_set.get_mut(handle) {
            collider.set_translation(to_na_vector(self.capsule_center(self.position)));
        }
    }

    fn capsule_center(&self, feet: Vec3) -> Vec3 {
        feet + Vec3::new(0.0, self.config.height / 2.0, 0.0)
    }
}

impl Default for CharacterBody {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_character_body_config() {
        let config = CharacterBodyConfig::default();
        assert_eq!(config.radius, 0.5);
        assert_eq!(config.height, 2.0);
        assert_eq!(config.mass, 1.0);
        assert_eq!(config.jump_force, Vec3::new(0.0, 20.0, 0.0));
    }

    #[test]
    fn test_walk_direction_is_flattened() {
        let mut body = CharacterBody::new();
        body.set_walk_direction(Vec3::new(1.0, 5.0, -2.0));
        assert_eq!(body.walk_direction(), Vec3::new(1.0, 0.0, -2.0));
    }

    #[test]
    fn test_view_direction_keeps_previous_when_vertical() {
        let mut body = CharacterBody::new();
        body.set_view_direction(Vec3::new(0.0, 0.5, -2.0));
        assert!((body.view_direction() - Vec3::NEG_Z).length() < 1e-6);

        body.set_view_direction(Vec3::Y);
        assert!((body.view_direction() - Vec3::NEG_Z).length() < 1e-6);
    }

    #[test]
    fn test_facing_maps_local_z_to_view() {
        let mut body = CharacterBody::new();
        body.set_view_direction(Vec3::X);
        assert!((body.facing() * Vec3::Z - Vec3::X).length() < 1e-5);

        body.set_view_direction(Vec3::NEG_Z);
        let up = body.facing() * Vec3::Y;
        assert!((up - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn test_jump_requires_ground() {
        let mut body = CharacterBody::new();
        assert!(!body.jump());
    }

    #[test]
    fn test_spawn_and_warp() {
        let mut physics = PhysicsWorld::new();
        let mut body = CharacterBody::new();
        assert!(!body.is_spawned());

        let handle = body.spawn(&mut physics, Vec3::new(0.0, 5.0, 0.0));
        assert!(body.is_spawned());
        let center = physics.get_collider(handle).unwrap().translation();
        assert!((center.y - 6.0).abs() < 1e-5);

        body.warp(&mut physics, Vec3::new(3.0, 1.0, 0.0));
        assert_eq!(body.position(), Vec3::new(3.0, 1.0, 0.0));
        let center = physics.get_collider(handle).unwrap().translation();
        assert!((center.x - 3.0).abs() < 1e-5);
        assert!((center.y - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_falls_onto_ground_and_jumps() {
        let mut physics = PhysicsWorld::new();
        physics.create_ground(0.0);
        let mut body = CharacterBody::new();
        body.spawn(&mut physics, Vec3::new(0.0, 1.0, 0.0));
        physics.update_queries();

        let dt = 1.0 / 60.0;
        for _ in 0..120 {
            body.step(&mut physics, dt);
        }
        assert!(body.is_grounded());
        assert!(body.position().y > -0.1 && body.position().y < 0.5);

        assert!(body.jump());
        body.step(&mut physics, dt);
        assert!(body.position().y > 0.1);
        assert!(body.vertical_velocity() > 0.0);
    }

    #[test]
    fn test_step_without_spawn_is_noop() {
        let mut physics = PhysicsWorld::new();
        let mut body = CharacterBody::new();
        body.set_walk_direction(Vec3::X);
        body.step(&mut physics, 0.1);
        assert_eq!(body.position(), Vec3::ZERO);
    }
}
