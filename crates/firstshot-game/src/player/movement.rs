//! Movement configuration and constants

use serde::{Deserialize, Serialize};

/// Movement configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovementConfig {
    /// Speed multiplier while walking
    pub walk_speed: f32,
    /// Speed multiplier while the run action is held
    pub run_speed: f32,
    /// Forward/backward speed in meters per second
    pub forward_speed: f32,
    /// Strafe speed in meters per second
    pub side_speed: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            walk_speed: 1.0,
            run_speed: 3.0,
            forward_speed: 2.6,
            side_speed: 2.4,
        }
    }
}

impl MovementConfig {
    /// Get the current speed multiplier based on run state
    pub fn speed_multiplier(&self, running: bool) -> f32 {
        if running {
            self.run_speed
        } else {
            self.walk_speed
        }
    }
}
