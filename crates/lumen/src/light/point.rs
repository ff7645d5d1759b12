use glam::{Vec2, Vec3};

use crate::{
    color::Spectrum,
    math::point::Point,
    scene::Intersection,
};

use super::{LiSample, Light, VisibilityTester};

/// Isotropic point emitter with the given radiant intensity.
pub struct PointLight {
    pub position: Point,
    pub intensity: Spectrum,
}

impl Light for PointLight {
    fn sample_li(&self, _u: Vec2, isect: &Intersection) -> LiSample {
        let d = self.position - isect.p;
        let dist_squared = d.length_squared();
        if dist_squared == 0.0 {
            return LiSample::invalid(isect.p);
        }
        LiSample {
            li: self.intensity / dist_squared,
            wi: d / dist_squared.sqrt(),
            pdf: 1.0,
            tester: VisibilityTester {
                from: isect.p,
                to: self.position,
                exclude: Some(isect.id),
            },
        }
    }

    fn pdf_li(&self, _isect: &Intersection, _wi: Vec3) -> f32 {
        0.0
    }

    fn power(&self) -> f32 {
        4.0 * std::f32::consts::PI * self.intensity.luminance()
    }

    fn is_delta(&self) -> bool {
        true
    }
}
