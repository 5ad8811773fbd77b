//! Projectile configuration

use firstshot_core::Color;
use firstshot_physics::CcdSettings;
use serde::{Deserialize, Serialize};

use crate::scene::Material;

/// Projectile configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileConfig {
    /// Sphere radius in meters (default: 0.1)
    pub radius: f32,
    /// Mesh tessellation along both sphere axes
    pub segments: u32,
    /// Mass in kilograms (default: 0.5)
    pub mass: f32,
    /// Launch impulse magnitude along the firing direction (default: 20)
    pub impulse: f32,
    /// Seconds a projectile lives before it is removed (default: 10)
    pub max_lifetime: f32,
    /// Continuous collision detection tuning
    pub ccd: CcdSettings,
    /// Surface material
    pub material: Material,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            radius: 0.1,
            segments: 32,
            mass: 0.5,
            impulse: 20.0,
            max_lifetime: 10.0,
            ccd: CcdSettings::default(),
            material: Material {
                base_color: Color::YELLOW.scaled(0.5),
                metallic: 0.01,
                roughness: 0.3,
            },
        }
    }
}
