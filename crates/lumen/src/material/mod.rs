pub mod lambertian;
pub mod mirror;
pub mod texture;

pub use lambertian::Lambertian;
pub use mirror::Mirror;

use bitflags::bitflags;

use crate::{color::Spectrum, scattering::ScatteringEvent};

bitflags! {
    /// Qualitative classification of a scattering lobe. Integrators branch
    /// on `SPECULAR` to decide which estimator owns the emitted light.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct LobeFlags: u8 {
        const DIFFUSE      = 1 << 0;
        const GLOSSY       = 1 << 1;
        const SPECULAR     = 1 << 2;
        const REFLECTION   = 1 << 3;
        const TRANSMISSION = 1 << 4;
    }
}

impl LobeFlags {
    /// Whether any of the given lobe bits were sampled.
    pub fn matches(self, flags: LobeFlags) -> bool {
        self.intersects(flags)
    }
}

/// Scattering contract between surfaces and integrators. All directions are
/// read from the event in its local shading frame.
///
/// `f` and `pdf` describe the non-delta part of the material and return zero
/// for purely specular lobes; `sample` is the only way to walk through a
/// delta lobe.
pub trait Bsdf: Send + Sync {
    fn f(&self, event: &ScatteringEvent) -> Spectrum;

    fn pdf(&self, event: &ScatteringEvent) -> f32;

    /// Draws an incident direction from `event.u`, filling `wi`/`wi_world`,
    /// `pdf` and `lobe` on the event, and returns the BSDF value for the
    /// chosen pair of directions.
    fn sample(&self, event: &mut ScatteringEvent) -> Spectrum;

    fn lobes(&self) -> LobeFlags;
}

#[cfg(test)]
pub(crate) mod test_fixtures {
    use glam::Vec3;

    use crate::{
        camera::Camera,
        color::Spectrum,
        material::{texture::ConstantTexture, Bsdf, Lambertian},
        math::point::Point,
        ray::Ray,
        sampler::SamplerType,
        scattering::{ScatteringEvent, TransportMode},
        scene::{Intersection, Primitive, Scene},
        shape::Sphere,
        Seed,
    };

    pub(crate) struct EventFixture {
        isect: &'static Intersection<'static>,
    }

    /// Head-on hit on a diffuse sphere, shading normal facing the camera.
    /// Leaks the backing scene, which is fine for a handful of test cases.
    pub(crate) fn event_fixture() -> EventFixture {
        let mut scene = Scene::new(Camera::look_at(
            1,
            1,
            1.0,
            Point::ORIGIN,
            Point::new(0.0, 0.0, -2.0),
        ));
        scene.add_primitive(Primitive::new(
            Sphere {
                center: Point::new(0.0, 0.0, -2.0),
                radius: 1.0,
            },
            Lambertian::new(ConstantTexture(Spectrum::splat(0.5))),
        ));
        scene.commit();
        let scene: &'static Scene = Box::leak(Box::new(scene));
        let isect = Box::leak(Box::new(
            scene
                .intersect(&Ray::new(Point::ORIGIN, Vec3::NEG_Z))
                .unwrap(),
        ));
        EventFixture { isect }
    }

    impl EventFixture {
        pub(crate) fn event<'a>(&self, bsdf: &'a dyn Bsdf) -> ScatteringEvent<'a> {
            let mut sampler = SamplerType::Independent.create(Seed { seed: 9, x: 0, y: 0 }, 1);
            ScatteringEvent::new(&mut sampler, self.isect, bsdf, TransportMode::Radiance)
        }
    }
}
