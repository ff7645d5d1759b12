use glam::{Vec2, Vec3};

use crate::{
    math::{bounds::Bounds, point::Point},
    ray::Ray,
};

use super::{Shape, SurfaceHit, SurfaceSample};

/// Parallelogram spanned by two edges. The workhorse for light panels and
/// box interiors.
pub struct Quad {
    pub origin: Point,
    pub e1: Vec3,
    pub e2: Vec3,
    normal: Vec3,
}

impl Quad {
    pub fn new(origin: Point, e1: Vec3, e2: Vec3) -> Self {
        Self {
            origin,
            e1,
            e2,
            normal: e1.cross(e2).normalize(),
        }
    }
}

impl Shape for Quad {
    fn intersect(&self, ray: &Ray) -> Option<SurfaceHit> {
        let denom = ray.direction.dot(self.normal);
        if denom.abs() < 1e-8 {
            return None;
        }
        let t = (self.origin - ray.origin).dot(self.normal) / denom;
        if !ray.range().contains(&t) {
            return None;
        }

        // Decompose the in-plane offset onto the (possibly non-orthogonal)
        // edge basis.
        let d = ray.at_unchecked(t) - self.origin;
        let g11 = self.e1.length_squared();
        let g22 = self.e2.length_squared();
        let g12 = self.e1.dot(self.e2);
        let det = g11 * g22 - g12 * g12;
        if det.abs() < 1e-12 {
            return None;
        }
        let d1 = d.dot(self.e1);
        let d2 = d.dot(self.e2);
        let a = (g22 * d1 - g12 * d2) / det;
        let b = (g11 * d2 - g12 * d1) / det;
        if !(0.0..=1.0).contains(&a) || !(0.0..=1.0).contains(&b) {
            return None;
        }

        Some(SurfaceHit {
            t,
            p: ray.at_unchecked(t),
            ng: self.normal,
            ns: self.normal,
            uv: Vec2::new(a, b),
            prim: 0,
        })
    }

    fn area(&self) -> f32 {
        self.e1.cross(self.e2).length()
    }

    fn sample_surface(&self, u: Vec2) -> Option<SurfaceSample> {
        Some(SurfaceSample {
            p: self.origin + u.x * self.e1 + u.y * self.e2,
            n: self.normal,
            prim: 0,
        })
    }

    fn bounding_box(&self) -> Bounds {
        let corners = [
            self.origin,
            self.origin + self.e1,
            self.origin + self.e2,
            self.origin + self.e1 + self.e2,
        ];
        corners
            .into_iter()
            .fold(Bounds::EMPTY, |acc, p| acc.union(Bounds::around(p, Vec3::ZERO)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_quad() -> Quad {
        // Spans [0,1]^2 on the xz plane, normal +y.
        Quad::new(Point::ORIGIN, Vec3::Z, Vec3::X)
    }

    #[test]
    fn hits_inside() {
        let quad = unit_quad();
        let ray = Ray::new(Point::new(0.5, 3.0, 0.5), Vec3::NEG_Y);
        let hit = quad.intersect(&ray).unwrap();
        assert!((hit.t - 3.0).abs() < 1e-5);
        assert!((hit.uv - Vec2::splat(0.5)).length() < 1e-5);
    }

    #[test]
    fn misses_outside_the_edges() {
        let quad = unit_quad();
        let ray = Ray::new(Point::new(1.5, 3.0, 0.5), Vec3::NEG_Y);
        assert!(quad.intersect(&ray).is_none());
    }

    #[test]
    fn area_and_sampling_agree() {
        let quad = Quad::new(Point::ORIGIN, 2.0 * Vec3::Z, 3.0 * Vec3::X);
        assert!((quad.area() - 6.0).abs() < 1e-5);
        let s = quad.sample_surface(Vec2::new(1.0, 1.0)).unwrap();
        assert!((s.p - Point::new(3.0, 0.0, 2.0)).length() < 1e-5);
    }
}
