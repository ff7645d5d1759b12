use glam::Vec3;

/// Orthonormal shading frame. The constructing normal becomes the local
/// `+z` axis.
#[derive(Debug, Clone, Copy)]
pub struct Frame {
    pub t: Vec3,
    pub b: Vec3,
    pub n: Vec3,
}

impl Frame {
    pub fn from_normal(n: Vec3) -> Self {
        let up = if n.z.abs() < 0.999 { Vec3::Z } else { Vec3::X };
        let t = n.cross(up).normalize();
        let b = n.cross(t);
        Self { t, b, n }
    }

    pub fn to_local(&self, v: Vec3) -> Vec3 {
        Vec3::new(v.dot(self.t), v.dot(self.b), v.dot(self.n))
    }

    pub fn to_world(&self, v: Vec3) -> Vec3 {
        v.x * self.t + v.y * self.b + v.z * self.n
    }
}
