//! Geometry the scene can trace against. The rendering core only needs three
//! things from a shape: ray intersection, surface area, and surface sampling
//! for area lights; acceleration structures live behind the same trait.

pub mod plane;
pub mod quad;
pub mod sphere;

pub use plane::Plane;
pub use quad::Quad;
pub use sphere::Sphere;

use glam::{Vec2, Vec3};

use crate::{math::bounds::Bounds, math::point::Point, ray::Ray};

/// Local geometry at a ray hit, before any shading state is attached.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceHit {
    pub t: f32,
    pub p: Point,
    /// Geometric normal.
    pub ng: Vec3,
    /// Shading normal; equals `ng` unless the shape interpolates normals.
    pub ns: Vec3,
    pub uv: Vec2,
    /// Sub-primitive inside the shape. Zero for analytic shapes.
    pub prim: u32,
}

/// A point chosen uniformly on a shape's surface, with density `1 / area`.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceSample {
    pub p: Point,
    pub n: Vec3,
    pub prim: u32,
}

pub trait Shape: Send + Sync {
    fn intersect(&self, ray: &Ray) -> Option<SurfaceHit>;

    fn area(&self) -> f32;

    /// Uniform surface sampling. `None` for unbounded shapes, which cannot
    /// carry area lights.
    fn sample_surface(&self, u: Vec2) -> Option<SurfaceSample>;

    fn bounding_box(&self) -> Bounds;
}
