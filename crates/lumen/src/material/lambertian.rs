use std::f32::consts::FRAC_1_PI;

use crate::{
    color::{linear, Spectrum},
    math::{
        distributions::{CosineHemisphere3, Samplable, Samples},
        vec::LocalVec3Ext,
    },
    scattering::ScatteringEvent,
};

use super::{texture::Texture, Bsdf, LobeFlags};

pub struct Lambertian<T> {
    pub albedo: T,
}

impl<T: Texture> Lambertian<T> {
    pub fn new(albedo: T) -> Self {
        Self { albedo }
    }
}

impl<T: Texture> Bsdf for Lambertian<T> {
    fn f(&self, event: &ScatteringEvent) -> Spectrum {
        if !event.wi.same_hemisphere(event.wo) {
            return linear::BLACK;
        }
        self.albedo.eval(event.uv()) * FRAC_1_PI
    }

    fn pdf(&self, event: &ScatteringEvent) -> f32 {
        if !event.wi.same_hemisphere(event.wo) {
            return 0.0;
        }
        event.wi.abs_cos_theta() * FRAC_1_PI
    }

    fn sample(&self, event: &mut ScatteringEvent) -> Spectrum {
        let mut wi = CosineHemisphere3.sample_with(Samples([event.u.x, event.u.y]));
        if event.wo.cos_theta() < 0.0 {
            wi.z = -wi.z;
        }
        event.set_wi(wi);
        event.pdf = self.pdf(event);
        event.lobe = self.lobes();
        self.f(event)
    }

    fn lobes(&self) -> LobeFlags {
        LobeFlags::DIFFUSE | LobeFlags::REFLECTION
    }
}
