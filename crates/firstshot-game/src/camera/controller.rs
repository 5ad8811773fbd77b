//! Mouse-look controller
//!
//! Yaw turns about the world up axis and pitch about the camera's own left
//! axis, so the left vector never leaves the horizontal plane and no roll
//! accumulates. Pitch is not clamped.

use firstshot_core::{Mat3, Quat, Vec3};
use tracing::trace;

use super::{CameraState, LookConfig};
use crate::input::AnalogAxis;

/// Applies analog look input to a [`CameraState`]
#[derive(Debug, Clone, Default)]
pub struct LookController {
    pub config: LookConfig,
}

impl LookController {
    pub fn new(config: LookConfig) -> Self {
        Self { config }
    }

    /// Rotate the camera by one analog input. Returns false when the
    /// input was ignored (zero or non-finite).
    pub fn on_analog(&self, camera: &mut CameraState, axis: AnalogAxis, value: f32) -> bool {
        if value == 0.0 || !value.is_finite() {
            return false;
        }

        let vertical = self.config.vertical_sign();
        let (angle, about) = match axis {
            AnalogAxis::RotateLeft => (value, Vec3::Y),
            AnalogAxis::RotateRight => (-value, Vec3::Y),
            AnalogAxis::RotateUp => (-value * vertical, camera.left()),
            AnalogAxis::RotateDown => (value * vertical, camera.left()),
        };

        self.rotate(camera, angle, about);
        trace!("Look {:?} by {}", axis, value);
        true
    }

    fn rotate(&self, camera: &mut CameraState, value: f32, axis: Vec3) {
        let Some(axis) = axis.try_normalize() else {
            return;
        };
        let turn = Mat3::from_axis_angle(axis, self.config.rotation_speed * value);

        let left = (turn * camera.left()).normalize();
        let up = (turn * camera.up()).normalize();
        let direction = left.cross(up).normalize();

        // Rebuild from the rotated basis and renormalize to stop drift
        let basis = Mat3::from_cols(left, up, direction);
        camera.set_rotation(Quat::from_mat3(&basis));
    }
}
