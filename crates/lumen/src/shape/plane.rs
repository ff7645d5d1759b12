use glam::Vec2;

use crate::{
    math::{bounds::Bounds, frame::Frame, point::Point},
    ray::Ray,
};

use super::{Shape, SurfaceHit, SurfaceSample};

/// Unbounded plane through `anchor`. Cheap ground/backdrop geometry; it
/// cannot carry an area light.
pub struct Plane {
    pub anchor: Point,
    frame: Frame,
}

impl Plane {
    pub fn new(anchor: Point, normal: glam::Vec3) -> Self {
        Self {
            anchor,
            frame: Frame::from_normal(normal.normalize()),
        }
    }
}

impl Shape for Plane {
    fn intersect(&self, ray: &Ray) -> Option<SurfaceHit> {
        let n = self.frame.n;
        let denom = ray.direction.dot(n);
        if denom.abs() < 1e-8 {
            return None;
        }
        let t = (self.anchor - ray.origin).dot(n) / denom;
        if !ray.range().contains(&t) {
            return None;
        }
        let p = ray.at_unchecked(t);
        let local = self.frame.to_local(p - self.anchor);
        Some(SurfaceHit {
            t,
            p,
            ng: n,
            ns: n,
            uv: Vec2::new(local.x.fract(), local.y.fract()),
            prim: 0,
        })
    }

    fn area(&self) -> f32 {
        f32::INFINITY
    }

    fn sample_surface(&self, _u: Vec2) -> Option<SurfaceSample> {
        None
    }

    fn bounding_box(&self) -> Bounds {
        // Unbounded; only the anchor participates in world extent queries.
        Bounds::around(self.anchor, glam::Vec3::ZERO)
    }
}
