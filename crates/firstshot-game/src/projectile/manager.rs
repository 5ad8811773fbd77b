//! Projectile lifecycle
//!
//! Each live projectile owns exactly one scene node and one rigid body.
//! Despawning removes both together and is safe to repeat.

use std::fmt;

use firstshot_core::{Quat, Transform, Vec3};
use firstshot_physics::{to_na_vector, PhysicsWorld};
use rapier3d::prelude::{ColliderBuilder, RigidBodyBuilder, RigidBodyHandle};
use tracing::{debug, info};

use super::ProjectileConfig;
use crate::error::GameError;
use crate::scene::{Mesh, Scene, SceneNode, VisualHandle};

/// Unique projectile identifier, never reused within a manager
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectileId(u64);

impl ProjectileId {
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for ProjectileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Projectile#{}", self.0)
    }
}

/// Where and how a projectile is fired
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Launch {
    /// World-space spawn position
    pub origin: Vec3,
    /// Initial orientation of the body and its visual
    pub rotation: Quat,
    /// Firing direction
    pub direction: Vec3,
    /// Impulse magnitude applied along `direction`
    pub impulse: f32,
}

impl Launch {
    fn validate(&self) -> Result<(), GameError> {
        if !self.origin.is_finite() {
            return Err(GameError::InvalidLaunch(format!(
                "origin {:?} is not finite",
                self.origin
            )));
        }
        if !self.rotation.is_finite() || self.rotation.length_squared() < f32::EPSILON {
            return Err(GameError::InvalidLaunch(format!(
                "rotation {:?} is degenerate",
                self.rotation
            )));
        }
        if !self.direction.is_finite() || self.direction.length_squared() < f32::EPSILON {
            return Err(GameError::InvalidLaunch(format!(
                "direction {:?} is degenerate",
                self.direction
            )));
        }
        if !self.impulse.is_finite() || self.impulse < 0.0 {
            return Err(GameError::InvalidLaunch(format!(
                "impulse {} must be finite and non-negative",
                self.impulse
            )));
        }
        Ok(())
    }
}

/// A live projectile
#[derive(Debug, Clone)]
pub struct Projectile {
    id: ProjectileId,
    visual: VisualHandle,
    body: RigidBodyHandle,
    age: f32,
    max_lifetime: f32,
}

impl Projectile {
    pub fn id(&self) -> ProjectileId {
        self.id
    }

    pub fn visual(&self) -> VisualHandle {
        self.visual
    }

    pub fn body(&self) -> RigidBodyHandle {
        self.body
    }

    /// Seconds since spawn
    pub fn age(&self) -> f32 {
        self.age
    }

    pub fn max_lifetime(&self) -> f32 {
        self.max_lifetime
    }

    /// Expired once strictly older than its lifetime
    pub fn is_expired(&self) -> bool {
        self.age > self.max_lifetime
    }
}

/// Owns every live projectile
#[derive(Debug, Default)]
pub struct ProjectileManager {
    pub config: ProjectileConfig,
    live: Vec<Projectile>,
    next_id: u64,
    spawned_total: u64,
    expired_total: u64,
}

impl ProjectileManager {
    pub fn new(config: ProjectileConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Fire a projectile. The launch is validated before anything is
    /// registered, so a rejected launch leaves no trace.
    pub fn spawn(
        &mut self,
        physics: &mut PhysicsWorld,
        scene: &mut Scene,
        launch: &Launch,
    ) -> Result<ProjectileId, GameError> {
        launch.validate()?;

        let rotation = launch.rotation.normalize();
        let direction = launch.direction.normalize();

        let visual = scene.attach(SceneNode {
            name: "projectile".to_string(),
            mesh: Mesh::Sphere {
                radius: self.config.radius,
                z_samples: self.config.segments,
                radial_samples: self.config.segments,
            },
            material: self.config.material,
            transform: Transform::from_position_rotation(launch.origin, rotation),
        });

        let rigid_body = self
            .config
            .ccd
            .apply(RigidBodyBuilder::dynamic().translation(to_na_vector(launch.origin)))
            .build();
        let collider = ColliderBuilder::ball(self.config.radius)
            .mass(self.config.mass)
            .build();
        let (body, _) = physics.add_dynamic_body(rigid_body, collider);
        physics.set_pose(body, launch.origin, rotation);
        physics.apply_impulse(body, direction * launch.impulse, Vec3::ZERO);

        let id = ProjectileId(self.next_id);
        self.next_id += 1;
        self.spawned_total += 1;
        self.live.push(Projectile {
            id,
            visual,
            body,
            age: 0.0,
            max_lifetime: self.config.max_lifetime.max(0.0),
        });

        debug!("Spawned {:?} at {:?}", id, launch.origin);
        Ok(id)
    }

    /// Age every projectile, remove the expired ones and sync visuals to
    /// their bodies. Returns how many were removed.
    pub fn tick(&mut self, physics: &mut PhysicsWorld, scene: &mut Scene, dt: f32) -> usize {
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };

        let mut expired = Vec::new();
        for projectile in &mut self.live {
            projectile.age += dt;
            if projectile.is_expired() {
                expired.push(projectile.id);
            }
        }

        for id in &expired {
            self.despawn(physics, scene, *id);
        }
        self.expired_total += expired.len() as u64;

        for projectile in &self.live {
            if let Some((position, rotation)) = physics.body_pose(projectile.body) {
                scene.set_transform(
                    projectile.visual,
                    Transform::from_position_rotation(position, rotation),
                );
            }
        }

        if !expired.is_empty() {
            info!(
                "Removed {} expired projectiles, {} live",
                expired.len(),
                self.live.len()
            );
        }
        expired.len()
    }

    /// Remove a projectile's visual and body. Returns false if it is not live.
    pub fn despawn(&mut self, physics: &mut PhysicsWorld, scene: &mut Scene, id: ProjectileId) -> bool {
        let Some(index) = self.live.iter().position(|p| p.id == id) else {
            debug!("{:?} already despawned", id);
            return false;
        };
        let projectile = self.live.swap_remove(index);
        scene.detach(projectile.visual);
        physics.remove_rigid_body(projectile.body);
        true
    }

    /// Remove every live projectile. Returns how many were removed.
    pub fn clear(&mut self, physics: &mut PhysicsWorld, scene: &mut Scene) -> usize {
        let count = self.live.len();
        for projectile in self.live.drain(..) {
            scene.detach(projectile.visual);
            physics.remove_rigid_body(projectile.body);
        }
        count
    }

    pub fn get(&self, id: ProjectileId) -> Option<&Projectile> {
        self.live.iter().find(|p| p.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Projectile> {
        self.live.iter()
    }

    /// Number of live projectiles
    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Projectiles fired since creation
    pub fn spawned_total(&self) -> u64 {
        self.spawned_total
    }

    /// Projectiles removed by expiry since creation
    pub fn expired_total(&self) -> u64 {
        self.expired_total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use firstshot_physics::PhysicsConfig;

    fn world() -> (ProjectileManager, PhysicsWorld, Scene) {
        (
            ProjectileManager::default(),
            PhysicsWorld::new(),
            Scene::new(),
        )
    }

    fn launch() -> Launch {
        Launch {
            origin: Vec3::new(0.0, 2.0, 0.0),
            rotation: Quat::IDENTITY,
            direction: Vec3::NEG_Z,
            impulse: 20.0,
        }
    }

    #[test]
    fn test_spawn_registers_visual_and_body() {
        let (mut manager, mut physics, mut scene) = world();
        let id = manager.spawn(&mut physics, &mut scene, &launch()).unwrap();

        assert_eq!(manager.len(), 1);
        assert_eq!(scene.len(), 1);
        assert_eq!(physics.body_count(), 1);

        let projectile = manager.get(id).unwrap();
        assert_eq!(projectile.age(), 0.0);
        assert!(scene.contains(projectile.visual()));
        assert!(physics.contains_body(projectile.body()));

        let node = scene.get(projectile.visual()).unwrap();
        assert_eq!(node.material, manager.config.material);
        assert_eq!(node.transform.position, Vec3::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn test_spawn_enables_ccd_and_launches() {
        let (mut manager, mut physics, mut scene) = world();
        let id = manager.spawn(&mut physics, &mut scene, &launch()).unwrap();
        let body = physics.get_rigid_body(manager.get(id).unwrap().body()).unwrap();

        assert!(body.is_ccd_enabled());
        // 20 N·s on 0.5 kg
        assert!((body.linvel().z + 40.0).abs() < 1e-3);
        assert!((body.mass() - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_invalid_launch_registers_nothing() {
        let (mut manager, mut physics, mut scene) = world();
        let bad = [
            Launch { origin: Vec3::NAN, ..launch() },
            Launch { direction: Vec3::ZERO, ..launch() },
            Launch { impulse: -1.0, ..launch() },
            Launch { rotation: Quat::from_xyzw(0.0, 0.0, 0.0, 0.0), ..launch() },
        ];
        for launch in &bad {
            let result = manager.spawn(&mut physics, &mut scene, launch);
            assert!(matches!(result, Err(GameError::InvalidLaunch(_))));
        }
        assert!(manager.is_empty());
        assert!(scene.is_empty());
        assert_eq!(physics.body_count(), 0);
    }

    #[test]
    fn test_expires_strictly_after_lifetime() {
        let (mut manager, mut physics, mut scene) = world();
        manager.config.max_lifetime = 10.0;
        manager.spawn(&mut physics, &mut scene, &launch()).unwrap();

        assert_eq!(manager.tick(&mut physics, &mut scene, 4.0), 0);
        assert_eq!(manager.tick(&mut physics, &mut scene, 4.0), 0);
        assert_eq!(manager.len(), 1);

        assert_eq!(manager.tick(&mut physics, &mut scene, 4.0), 1);
        assert!(manager.is_empty());
        assert!(scene.is_empty());
        assert_eq!(physics.body_count(), 0);
        assert_eq!(manager.expired_total(), 1);
    }

    #[test]
    fn test_age_equal_to_lifetime_survives() {
        let (mut manager, mut physics, mut scene) = world();
        manager.config.max_lifetime = 1.0;
        manager.spawn(&mut physics, &mut scene, &launch()).unwrap();
        manager.tick(&mut physics, &mut scene, 0.5);
        manager.tick(&mut physics, &mut scene, 0.5);
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_zero_dt_never_destroys() {
        let (mut manager, mut physics, mut scene) = world();
        manager.config.max_lifetime = 0.0;
        manager.spawn(&mut physics, &mut scene, &launch()).unwrap();
        for _ in 0..10 {
            assert_eq!(manager.tick(&mut physics, &mut scene, 0.0), 0);
        }
        assert_eq!(manager.tick(&mut physics, &mut scene, -1.0), 0);
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_only_expired_removed() {
        let (mut manager, mut physics, mut scene) = world();
        manager.config.max_lifetime = 1.0;
        let first = manager.spawn(&mut physics, &mut scene, &launch()).unwrap();
        manager.tick(&mut physics, &mut scene, 0.8);
        let second = manager.spawn(&mut physics, &mut scene, &launch()).unwrap();

        assert_eq!(manager.tick(&mut physics, &mut scene, 0.3), 1);
        assert!(manager.get(first).is_none());
        assert!(manager.get(second).is_some());
        assert_eq!(scene.len(), 1);
        assert_eq!(physics.body_count(), 1);
    }

    #[test]
    fn test_despawn_is_idempotent() {
        let (mut manager, mut physics, mut scene) = world();
        let id = manager.spawn(&mut physics, &mut scene, &launch()).unwrap();
        assert!(manager.despawn(&mut physics, &mut scene, id));
        assert!(!manager.despawn(&mut physics, &mut scene, id));
        assert_eq!(physics.body_count(), 0);
        assert!(scene.is_empty());
    }

    #[test]
    fn test_ids_are_unique() {
        let (mut manager, mut physics, mut scene) = world();
        let a = manager.spawn(&mut physics, &mut scene, &launch()).unwrap();
        manager.despawn(&mut physics, &mut scene, a);
        let b = manager.spawn(&mut physics, &mut scene, &launch()).unwrap();
        assert_ne!(a, b);
        assert_eq!(manager.spawned_total(), 2);
    }

    #[test]
    fn test_tick_syncs_visual_to_body() {
        let (mut manager, _, mut scene) = world();
        let mut physics = PhysicsWorld::with_config(PhysicsConfig {
            gravity: Vec3::ZERO,
            ..Default::default()
        });
        let id = manager.spawn(&mut physics, &mut scene, &launch()).unwrap();
        physics.step(0.1);
        manager.tick(&mut physics, &mut scene, 0.1);

        let visual = manager.get(id).unwrap().visual();
        let position = scene.get(visual).unwrap().transform.position;
        assert!(position.z < -1.0);
    }

    #[test]
    fn test_clear_removes_everything() {
        let (mut manager, mut physics, mut scene) = world();
        for _ in 0..3 {
            manager.spawn(&mut physics, &mut scene, &launch()).unwrap();
        }
        assert_eq!(manager.clear(&mut physics, &mut scene), 3);
        assert!(manager.is_empty());
        assert!(scene.is_empty());
        assert_eq!(physics.body_count(), 0);
    }
}
