//! Look configuration

use serde::{Deserialize, Serialize};

/// Mouse look configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookConfig {
    /// Radians of rotation per unit of analog input
    pub rotation_speed: f32,
    /// Invert vertical look
    pub invert_y: bool,
}

impl Default for LookConfig {
    fn default() -> Self {
        Self {
            rotation_speed: 1.0,
            invert_y: false,
        }
    }
}

impl LookConfig {
    /// Sign applied to pitch input
    pub fn vertical_sign(&self) -> f32 {
        if self.invert_y {
            -1.0
        } else {
            1.0
        }
    }
}
