//! Firstshot Physics - Physics space using rapier3d
//!
//! Provides rigid body dynamics for projectiles and level props, plus the
//! walk-direction character body that carries the player.

mod character;
mod convert;

pub use character::{CharacterBody, CharacterBodyConfig};
pub use convert::{to_glam_quat, to_glam_vec, to_na_rotation, to_na_vector};

use glam::{Quat, Vec3};
use nalgebra::Unit;
use rapier3d::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Physics world configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicsConfig {
    /// Gravity vector (default: -9.81 on Y axis)
    pub gravity: Vec3,
    /// Timestep used by [`PhysicsWorld::step_fixed`] (default: 1/60)
    pub timestep: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
            timestep: 1.0 / 60.0,
        }
    }
}

/// Continuous collision detection tuning for fast, small bodies
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CcdSettings {
    /// Bodies moving less than this per step skip the swept test (0 disables CCD)
    pub motion_threshold: f32,
    /// Radius of the sphere swept along the body's motion
    pub swept_sphere_radius: f32,
}

impl Default for CcdSettings {
    fn default() -> Self {
        Self {
            motion_threshold: 0.2,
            swept_sphere_radius: 0.2,
        }
    }
}

impl CcdSettings {
    /// Whether these settings turn CCD on at all
    pub fn enabled(&self) -> bool {
        self.motion_threshold > 0.0
    }

    /// Apply the settings to a rigid body under construction
    pub fn apply(&self, builder: RigidBodyBuilder) -> RigidBodyBuilder {
        if self.enabled() {
            builder
                .ccd_enabled(true)
                .soft_ccd_prediction(self.swept_sphere_radius.max(0.0))
        } else {
            builder.ccd_enabled(false)
        }
    }
}

/// The main physics world containing all simulation state
pub struct PhysicsWorld {
    /// Configuration
    pub config: PhysicsConfig,

    /// Rigid body storage
    pub rigid_body_set: RigidBodySet,
    /// Collider storage
    pub collider_set: ColliderSet,
    /// Impulse joint storage
    pub impulse_joint_set: ImpulseJointSet,
    /// Multi-body joint storage
    pub multibody_joint_set: MultibodyJointSet,

    /// Integration parameters
    integration_parameters: IntegrationParameters,
    /// Physics pipeline
    physics_pipeline: PhysicsPipeline,
    /// Island manager
    island_manager: IslandManager,
    /// Broad phase collision detection
    broad_phase: DefaultBroadPhase,
    /// Narrow phase collision detection
    narrow_phase: NarrowPhase,
    /// Continuous collision detection solver
    ccd_solver: CCDSolver,
    /// Query pipeline for shape casts
    pub(crate) query_pipeline: QueryPipeline,
}

impl PhysicsWorld {
    /// Create a new physics world with default configuration
    pub fn new() -> Self {
        Self::with_config(PhysicsConfig::default())
    }

    /// Create a new physics world with custom configuration
    pub fn with_config(config: PhysicsConfig) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = config.timestep;

        Self {
            config,
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    /// Step the simulation by `dt` seconds. Non-positive steps are skipped.
    pub fn step(&mut self, dt: f32) {
        if !(dt > 0.0) {
            return;
        }
        self.integration_parameters.dt = dt;

        let gravity = to_na_vector(self.config.gravity);

        self.physics_pipeline.step(
            &gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );

        // Update query pipeline after physics step
        self.query_pipeline.update(&self.collider_set);
    }

    /// Step the simulation by the configured fixed timestep
    pub fn step_fixed(&mut self) {
        self.step(self.config.timestep);
    }

    /// Refresh the query pipeline without stepping (after adding static geometry)
    pub fn update_queries(&mut self) {
        self.query_pipeline.update(&self.collider_set);
    }

    /// Add a static collider (ground, walls, etc.)
    pub fn add_static_collider(&mut self, collider: Collider) -> ColliderHandle {
        self.collider_set.insert(collider)
    }

    /// Add a dynamic rigid body with a collider
    pub fn add_dynamic_body(
        &mut self,
        rigid_body: RigidBody,
        collider: Collider,
    ) -> (RigidBodyHandle, ColliderHandle) {
        let rb_handle = self.rigid_body_set.insert(rigid_body);
        let col_handle =
            self.collider_set
                .insert_with_parent(collider, rb_handle, &mut self.rigid_body_set);
        // Mass must be current before any impulse lands ahead of the next step
        if let Some(body) = self.rigid_body_set.get_mut(rb_handle) {
            body.recompute_mass_properties_from_colliders(&self.collider_set);
        }
        (rb_handle, col_handle)
    }

    /// Remove a rigid body and its colliders. Returns `false` if it was already gone.
    pub fn remove_rigid_body(&mut self, handle: RigidBodyHandle) -> bool {
        let removed = self
            .rigid_body_set
            .remove(
                handle,
                &mut self.island_manager,
                &mut self.collider_set,
                &mut self.impulse_joint_set,
                &mut self.multibody_joint_set,
                true,
            )
            .is_some();
        if !removed {
            debug!("Rigid body {:?} already removed", handle);
        }
        removed
    }

    /// Remove a collider. Returns `false` if it was already gone.
    pub fn remove_collider(&mut self, handle: ColliderHandle) -> bool {
        self.collider_set
            .remove(handle, &mut self.island_manager, &mut self.rigid_body_set, true)
            .is_some()
    }

    /// Check whether a rigid body is still registered
    pub fn contains_body(&self, handle: RigidBodyHandle) -> bool {
        self.rigid_body_set.contains(handle)
    }

    /// Number of registered rigid bodies
    pub fn body_count(&self) -> usize {
        self.rigid_body_set.len()
    }

    /// Get a rigid body by handle
    pub fn get_rigid_body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.rigid_body_set.get(handle)
    }

    /// Get a collider by handle
    pub fn get_collider(&self, handle: ColliderHandle) -> Option<&Collider> {
        self.collider_set.get(handle)
    }

    /// Apply an instantaneous impulse at a point relative to the body's center of mass
    pub fn apply_impulse(
        &mut self,
        handle: RigidBodyHandle,
        impulse: Vec3,
        relative_point: Vec3,
    ) -> bool {
        let Some(body) = self.rigid_body_set.get_mut(handle) else {
            return false;
        };

        if relative_point == Vec3::ZERO {
            body.apply_impulse(to_na_vector(impulse), true);
        } else {
            let point = *body.center_of_mass() + to_na_vector(relative_point);
            body.apply_impulse_at_point(to_na_vector(impulse), point, true);
        }
        true
    }

    /// Set a body's world position and rotation directly
    pub fn set_pose(&mut self, handle: RigidBodyHandle, position: Vec3, rotation: Quat) -> bool {
        let Some(body) = self.rigid_body_set.get_mut(handle) else {
            return false;
        };

        let isometry = Isometry::from_parts(to_na_vector(position).into(), to_na_rotation(rotation));
        body.set_position(isometry, true);
        true
    }

    /// Query a body's world position and rotation
    pub fn body_pose(&self, handle: RigidBodyHandle) -> Option<(Vec3, Quat)> {
        self.rigid_body_set
            .get(handle)
            .map(|body| (to_glam_vec(body.translation()), to_glam_quat(body.rotation())))
    }

    /// Create a ground plane collider
    pub fn create_ground(&mut self, y: f32) -> ColliderHandle {
        let normal = Unit::new_normalize(vector![0.0, 1.0, 0.0]);
        let ground = ColliderBuilder::halfspace(normal)
            .translation(vector![0.0, y, 0.0])
            .friction(0.7)
            .restitution(0.0)
            .build();
        self.add_static_collider(ground)
    }

    /// Create a static box collider
    pub fn create_static_box(&mut self, half_extents: Vec3, position: Vec3) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .translation(to_na_vector(position))
            .friction(0.7)
            .build();
        self.add_static_collider(collider)
    }

    /// Create a dynamic box of the given mass, like a loose crate in a level
    pub fn create_dynamic_box(
        &mut self,
        half_extents: Vec3,
        position: Vec3,
        mass: f32,
    ) -> RigidBodyHandle {
        let body = RigidBodyBuilder::dynamic()
            .translation(to_na_vector(position))
            .build();
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .mass(mass)
            .friction(0.7)
            .build();
        self.add_dynamic_body(body, collider).0
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}
