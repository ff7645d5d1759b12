pub mod area;
pub mod point;

pub use area::AreaLight;
pub use point::PointLight;

use glam::{Vec2, Vec3};

use crate::{
    color::{linear, Spectrum},
    math::point::Point,
    ray::{HitId, Ray},
    scene::{Intersection, Scene},
};

/// Result of importance-sampling a light from a receiving point: incident
/// radiance, the world-space direction toward the light, the solid-angle
/// density of the draw, and a deferred occlusion query.
pub struct LiSample {
    pub li: Spectrum,
    pub wi: Vec3,
    pub pdf: f32,
    pub tester: VisibilityTester,
}

impl LiSample {
    /// A draw that contributes nothing; `pdf == 0` makes callers skip it.
    pub fn invalid(at: Point) -> Self {
        Self {
            li: linear::BLACK,
            wi: Vec3::ZERO,
            pdf: 0.0,
            tester: VisibilityTester {
                from: at,
                to: at,
                exclude: None,
            },
        }
    }
}

pub trait Light: Send + Sync {
    fn sample_li(&self, u: Vec2, isect: &Intersection) -> LiSample;

    /// Solid-angle density with which `sample_li` would have produced `wi`
    /// from this receiving point. Zero for delta lights.
    fn pdf_li(&self, isect: &Intersection, wi: Vec3) -> f32;

    /// Total emitted flux, used to weight light selection.
    fn power(&self) -> f32;

    /// Delta lights cannot be hit by a sampled BSDF direction; the direct
    /// light estimator gives their sample full weight.
    fn is_delta(&self) -> bool {
        false
    }

    /// Radiance leaving the light's surface at `isect` along `w`. Only area
    /// lights emit from geometry.
    fn le(&self, _isect: &Intersection, _w: Vec3) -> Spectrum {
        linear::BLACK
    }
}

/// Deferred shadow query between a shading point and a sampled light point.
pub struct VisibilityTester {
    pub from: Point,
    pub to: Point,
    /// Surface the shading point sits on, skipped during the query.
    pub exclude: Option<HitId>,
}

impl VisibilityTester {
    pub fn visible(&self, scene: &Scene) -> bool {
        let d = self.to - self.from;
        let dist = d.length();
        if dist <= 1e-5 {
            return true;
        }
        // Stop just short of the light surface so the light itself does not
        // count as an occluder.
        let mut ray = Ray::new_with_range(self.from, d / dist, 1e-4..dist * (1.0 - 1e-3));
        ray.exclude = self.exclude;
        !scene.occluded(&ray)
    }
}
