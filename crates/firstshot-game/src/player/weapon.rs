//! Hand-held pistol attached to the player, pitched with the camera

use firstshot_core::{Quat, Transform, Vec3};
use serde::{Deserialize, Serialize};

use crate::camera::CameraState;

/// Pistol placement relative to the player body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponConfig {
    /// Pistol position in the player's local frame
    pub mount_offset: Vec3,
    /// Muzzle position in the pistol's local frame
    pub muzzle_offset: Vec3,
}

impl Default for WeaponConfig {
    fn default() -> Self {
        Self {
            mount_offset: Vec3::new(-0.2, 1.9, 0.3),
            muzzle_offset: Vec3::new(0.0, 0.031449, 0.2),
        }
    }
}

/// Pistol mount state
#[derive(Debug, Clone, Default)]
pub struct WeaponMount {
    pub config: WeaponConfig,
    pitch: f32,
}

impl WeaponMount {
    pub fn new(config: WeaponConfig) -> Self {
        Self { config, pitch: 0.0 }
    }

    /// Copy the camera pitch onto the pistol
    pub fn follow(&mut self, camera: &CameraState) {
        self.pitch = camera.pitch();
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Pistol transform in the player's local frame
    pub fn local_transform(&self) -> Transform {
        Transform::from_position_rotation(self.config.mount_offset, Quat::from_rotation_x(self.pitch))
    }

    /// Pistol transform in world space
    pub fn world_transform(&self, player: &Transform) -> Transform {
        player.mul_transform(&self.local_transform())
    }

    /// Muzzle position in world space
    pub fn muzzle_position(&self, player: &Transform) -> Vec3 {
        self.world_transform(player)
            .transform_point(self.config.muzzle_offset)
    }
}
