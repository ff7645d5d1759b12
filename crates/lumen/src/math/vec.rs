pub use glam::Vec3;

pub trait ReflectVecExt {
    fn reflect(self, normal: Vec3) -> Vec3;
}

impl ReflectVecExt for Vec3 {
    fn reflect(self, normal: Vec3) -> Vec3 {
        self - (2.0 * self.dot(normal) * normal)
    }
}

/// Helpers for directions expressed in a shading frame, where the surface
/// normal is the `+z` axis.
pub trait LocalVec3Ext {
    fn cos_theta(self) -> f32;
    fn abs_cos_theta(self) -> f32;
    fn same_hemisphere(self, other: Self) -> bool;
}

impl LocalVec3Ext for Vec3 {
    fn cos_theta(self) -> f32 {
        self.z
    }

    fn abs_cos_theta(self) -> f32 {
        self.z.abs()
    }

    fn same_hemisphere(self, other: Self) -> bool {
        self.z * other.z > 0.0
    }
}

pub trait Vec3SameDirExt {
    fn same_direction(self, other: Self) -> Self;
}

impl Vec3SameDirExt for Vec3 {
    /// Returns `self`, flipped if needed so it points into the hemisphere of
    /// `other`.
    fn same_direction(self, other: Self) -> Self {
        if self.dot(other) > 0.0 {
            self
        } else {
            -self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reflect_over_normal() {
        let v = Vec3::new(1.0, -1.0, 0.0).normalize();
        let r = v.reflect(Vec3::Y);
        assert!((r - Vec3::new(1.0, 1.0, 0.0).normalize()).length() < 1e-6);
    }

    #[test]
    fn hemispheres() {
        assert!(Vec3::new(0.1, 0.3, 0.5).same_hemisphere(Vec3::Z));
        assert!(!Vec3::new(0.1, 0.3, -0.5).same_hemisphere(Vec3::Z));
        assert_eq!(Vec3::new(0.0, 0.0, -0.25).abs_cos_theta(), 0.25);
    }
}
