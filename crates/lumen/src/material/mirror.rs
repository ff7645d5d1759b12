use crate::{
    color::{linear, Spectrum},
    math::vec::LocalVec3Ext,
    scattering::ScatteringEvent,
};

use super::{Bsdf, LobeFlags};

/// Perfect specular reflector. `f` and `pdf` are zero by convention for a
/// delta lobe; the division by `cos(theta)` in `sample` cancels the
/// throughput cosine so the reflectance passes through unattenuated.
pub struct Mirror {
    pub reflectance: Spectrum,
}

impl Bsdf for Mirror {
    fn f(&self, _event: &ScatteringEvent) -> Spectrum {
        linear::BLACK
    }

    fn pdf(&self, _event: &ScatteringEvent) -> f32 {
        0.0
    }

    fn sample(&self, event: &mut ScatteringEvent) -> Spectrum {
        let wo = event.wo;
        event.set_wi(glam::Vec3::new(-wo.x, -wo.y, wo.z));
        event.pdf = 1.0;
        event.lobe = self.lobes();
        if event.wi.abs_cos_theta() == 0.0 {
            return linear::BLACK;
        }
        self.reflectance * (1.0 / event.wi.abs_cos_theta())
    }

    fn lobes(&self) -> LobeFlags {
        LobeFlags::SPECULAR | LobeFlags::REFLECTION
    }
}
