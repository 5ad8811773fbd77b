//! glam <-> nalgebra conversions at the rapier boundary

use glam::{Quat, Vec3};
use rapier3d::prelude::{Real, Rotation, Vector};

/// Convert a glam vector into a rapier vector
pub fn to_na_vector(v: Vec3) -> Vector<Real> {
    nalgebra::vector![v.x, v.y, v.z]
}

/// Convert a rapier vector into a glam vector
pub fn to_glam_vec(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

/// Convert a glam quaternion into a rapier rotation
pub fn to_na_rotation(q: Quat) -> Rotation<Real> {
    let q = q.normalize();
    Rotation::from_quaternion(nalgebra::Quaternion::new(q.w, q.x, q.y, q.z))
}

/// Convert a rapier rotation into a glam quaternion
pub fn to_glam_quat(r: &Rotation<Real>) -> Quat {
    let c = r.coords;
    Quat::from_xyzw(c.x, c.y, c.z, c.w)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_conversion_preserves_action() {
        let q = Quat::from_rotation_y(1.1) * Quat::from_rotation_x(-0.4);
        let r = to_na_rotation(q);

        let v = Vec3::new(0.3, -0.2, 0.9);
        let via_glam = q * v;
        let via_na = to_glam_vec(&(r * to_na_vector(v)));
        assert!((via_glam - via_na).length() < 1e-5);

        let back = to_glam_quat(&r);
        assert!(back.dot(q).abs() > 0.9999);
    }
}
