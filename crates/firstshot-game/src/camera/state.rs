//! Camera pose: position plus an orthonormal (left, up, direction) basis

use firstshot_core::{EulerRot, Mat3, Quat, Vec3};

/// World-space camera state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    position: Vec3,
    left: Vec3,
    up: Vec3,
    direction: Vec3,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            left: Vec3::NEG_X,
            up: Vec3::Y,
            direction: Vec3::NEG_Z,
        }
    }
}

impl CameraState {
    /// Camera at `position` looking along `direction` with world up.
    /// A degenerate or vertical direction falls back to looking down -Z.
    pub fn looking_along(position: Vec3, direction: Vec3) -> Self {
        let Some(direction) = direction.try_normalize() else {
            return Self::at(position);
        };
        let Some(left) = Vec3::Y.cross(direction).try_normalize() else {
            return Self::at(position);
        };
        Self {
            position,
            left,
            up: direction.cross(left),
            direction,
        }
    }

    /// Default orientation at a position
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Forward unit vector
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Up unit vector
    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Left unit vector
    pub fn left(&self) -> Vec3 {
        self.left
    }

    /// Rotation whose columns are (left, up, direction)
    pub fn rotation(&self) -> Quat {
        Quat::from_mat3(&Mat3::from_cols(self.left, self.up, self.direction)).normalize()
    }

    /// Replace the basis with the one described by `rotation`
    pub fn set_rotation(&mut self, rotation: Quat) {
        let rotation = rotation.normalize();
        self.left = rotation * Vec3::X;
        self.up = rotation * Vec3::Y;
        self.direction = rotation * Vec3::Z;
    }

    /// Pitch angle in radians; negative when looking up
    pub fn pitch(&self) -> f32 {
        let (_, pitch, _) = self.rotation().to_euler(EulerRot::YXZ);
        pitch
    }

    /// Largest deviation of the basis from orthonormal
    pub fn orthonormal_error(&self) -> f32 {
        let lengths = [self.left, self.up, self.direction]
            .iter()
            .map(|v| (v.length() - 1.0).abs())
            .fold(0.0_f32, f32::max);
        let dots = [
            self.left.dot(self.up),
            self.up.dot(self.direction),
            self.direction.dot(self.left),
        ]
        .iter()
        .map(|d| d.abs())
        .fold(0.0_f32, f32::max);
        lengths.max(dots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_basis() {
        let camera = CameraState::default();
        assert_eq!(camera.direction(), Vec3::NEG_Z);
        assert_eq!(camera.left(), Vec3::NEG_X);
        assert!(camera.orthonormal_error() < 1e-6);
        assert!((camera.rotation() * Vec3::Z - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn test_looking_along() {
        let camera = CameraState::looking_along(Vec3::ONE, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(camera.position(), Vec3::ONE);
        assert!((camera.direction() - Vec3::X).length() < 1e-6);
        assert!((camera.up() - Vec3::Y).length() < 1e-6);
        assert!(camera.orthonormal_error() < 1e-5);

        let fallback = CameraState::looking_along(Vec3::ZERO, Vec3::Y);
        assert_eq!(fallback.direction(), Vec3::NEG_Z);
    }

    #[test]
    fn test_rotation_round_trip() {
        let mut camera = CameraState::default();
        let rotation = Quat::from_rotation_y(0.7) * Quat::from_rotation_x(-0.3);
        camera.set_rotation(rotation);
        assert!(camera.rotation().dot(rotation).abs() > 0.9999);
        assert!((camera.pitch() + 0.3).abs() < 1e-4);
        assert!(camera.orthonormal_error() < 1e-5);
    }
}
