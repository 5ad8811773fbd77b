//! Projectile system module
//!
//! Spawns physics-driven spheres, ages them every frame and removes each one
//! from both the scene and the physics world once it outlives its lifetime.

mod config;
mod manager;

pub use config::ProjectileConfig;
pub use manager::{Launch, Projectile, ProjectileId, ProjectileManager};
