use std::sync::Arc;

use glam::{Vec2, Vec3};

use crate::{
    color::{linear, Spectrum},
    ray::Ray,
    scene::Intersection,
    shape::Shape,
};

use super::{LiSample, Light, VisibilityTester};

/// Diffuse one-sided emitter attached to a primitive's geometry.
///
/// The light holds the shared shape plus the primitive's slot in the scene,
/// not the primitive itself; the primitive points back at the light by
/// index, so neither side owns the other.
pub struct AreaLight {
    shape: Arc<dyn Shape>,
    primitive_slot: u32,
    pub radiance: Spectrum,
}

impl AreaLight {
    pub fn new(shape: Arc<dyn Shape>, primitive_slot: u32, radiance: Spectrum) -> Self {
        Self {
            shape,
            primitive_slot,
            radiance,
        }
    }

    pub fn primitive_slot(&self) -> u32 {
        self.primitive_slot
    }
}

impl Light for AreaLight {
    fn sample_li(&self, u: Vec2, isect: &Intersection) -> LiSample {
        let Some(s) = self.shape.sample_surface(u) else {
            return LiSample::invalid(isect.p);
        };
        let d = s.p - isect.p;
        let dist_squared = d.length_squared();
        if dist_squared == 0.0 {
            return LiSample::invalid(isect.p);
        }
        let wi = d / dist_squared.sqrt();

        // Cosine at the emitting surface; the back face is dark.
        let cos_light = s.n.dot(-wi);
        if cos_light <= 0.0 {
            return LiSample::invalid(isect.p);
        }

        LiSample {
            li: self.radiance,
            wi,
            // Uniform-area density converted to solid angle at the receiver.
            pdf: dist_squared / (cos_light * self.shape.area()),
            tester: VisibilityTester {
                from: isect.p,
                to: s.p,
                exclude: Some(isect.id),
            },
        }
    }

    fn pdf_li(&self, isect: &Intersection, wi: Vec3) -> f32 {
        let ray = Ray::new_with_range(isect.p, wi, 1e-4..f32::INFINITY);
        let Some(hit) = self.shape.intersect(&ray) else {
            return 0.0;
        };
        let cos_light = hit.ng.dot(-wi);
        if cos_light <= 0.0 {
            return 0.0;
        }
        isect.p.distance_squared(hit.p) / (cos_light * self.shape.area())
    }

    fn power(&self) -> f32 {
        std::f32::consts::PI * self.radiance.luminance() * self.shape.area()
    }

    fn le(&self, isect: &Intersection, w: Vec3) -> Spectrum {
        if isect.ng.dot(w) > 0.0 {
            self.radiance
        } else {
            linear::BLACK
        }
    }
}
