use glam::{Vec2, Vec3};

use crate::{
    math::{
        bounds::Bounds,
        distributions::{Samplable, Samples, UniformUnitSphere3},
        point::Point,
    },
    ray::Ray,
};

use super::{Shape, SurfaceHit, SurfaceSample};

pub struct Sphere {
    pub center: Point,
    pub radius: f32,
}

impl Sphere {
    fn hit_at(&self, ray: &Ray, t: f32) -> SurfaceHit {
        let p = ray.at_unchecked(t);
        let n = (p - self.center) / self.radius;
        SurfaceHit {
            t,
            p,
            ng: n,
            ns: n,
            uv: sphere_uv(n),
            prim: 0,
        }
    }
}

fn sphere_uv(n: Vec3) -> Vec2 {
    let u = 0.5 + f32::atan2(n.x, n.z) / std::f32::consts::TAU;
    let v = f32::acos(n.y.clamp(-1.0, 1.0)) / std::f32::consts::PI;
    Vec2::new(u, v)
}

impl Shape for Sphere {
    fn intersect(&self, ray: &Ray) -> Option<SurfaceHit> {
        let oc = ray.origin - self.center;
        // |o + t d - c|^2 = r^2, with d normalized.
        let half_b = oc.dot(ray.direction);
        let c = oc.length_squared() - self.radius * self.radius;
        let disc = half_b * half_b - c;
        if disc < 0.0 {
            return None;
        }
        let sqrt_disc = disc.sqrt();

        let near = -half_b - sqrt_disc;
        if ray.range().contains(&near) {
            return Some(self.hit_at(ray, near));
        }
        let far = -half_b + sqrt_disc;
        if ray.range().contains(&far) {
            return Some(self.hit_at(ray, far));
        }
        None
    }

    fn area(&self) -> f32 {
        4.0 * std::f32::consts::PI * self.radius * self.radius
    }

    fn sample_surface(&self, u: Vec2) -> Option<SurfaceSample> {
        let n = UniformUnitSphere3.sample_with(Samples([u.x, u.y]));
        Some(SurfaceSample {
            p: self.center + self.radius * n,
            n,
            prim: 0,
        })
    }

    fn bounding_box(&self) -> Bounds {
        Bounds::around(self.center, Vec3::splat(self.radius))
    }
}
