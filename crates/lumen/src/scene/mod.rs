//! Scene facade. Integrators see exactly the surface defined here —
//! intersection, light selection, context creation, cancellation — and
//! nothing of how primitives, lights or the film are stored.

pub mod examples;

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};

use glam::{UVec2, Vec2, Vec3};

use crate::{
    camera::Camera,
    color::{linear, Spectrum},
    film::Film,
    light::{AreaLight, Light, PointLight},
    material::Bsdf,
    math::{bounds::Bounds, distributions::Distribution1d, point::Point},
    memory::Arena,
    ray::{HitId, Ray},
    sampler::Sampler,
    shape::Shape,
};

/// One renderable object: geometry, its material, and (for emitters) the
/// index of the light attached to it. The light side holds the slot of this
/// primitive rather than a reference, so there is no ownership cycle.
pub struct Primitive {
    pub shape: Arc<dyn Shape>,
    pub material: Arc<dyn Bsdf>,
    pub light: Option<u32>,
}

impl Primitive {
    pub fn new(shape: impl Shape + 'static, material: impl Bsdf + 'static) -> Self {
        Self {
            shape: Arc::new(shape),
            material: Arc::new(material),
            light: None,
        }
    }
}

/// Result of tracing a ray into the scene. Stack-scoped: borrows the hit
/// primitive (and its light) for the duration of one trace.
pub struct Intersection<'a> {
    pub t: f32,
    pub p: Point,
    /// Geometric normal.
    pub ng: Vec3,
    /// Shading normal.
    pub ns: Vec3,
    pub uv: Vec2,
    /// Identity of the hit surface, used to exclude self-hits on the next
    /// bounce.
    pub id: HitId,
    /// Reversed direction of the ray that produced this hit, world space.
    pub wo_world: Vec3,
    pub primitive: &'a Primitive,
    pub light: Option<&'a dyn Light>,
}

impl Intersection<'_> {
    /// Emitted radiance along `w`, zero for non-emissive primitives.
    pub fn le(&self, w: Vec3) -> Spectrum {
        match self.light {
            Some(light) => light.le(self, w),
            None => linear::BLACK,
        }
    }
}

/// Everything one pixel sample carries through the integrator.
pub struct RenderContext<'a> {
    pub primary: Ray,
    pub sampler: &'a mut dyn Sampler,
    pub arena: &'a Arena,
    pub raster: UVec2,
    pub camera: &'a Camera,
    /// Reconstruction-filter weight for the film deposit.
    pub weight: f32,
}

/// How `commit` distributes light-selection probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LightSelection {
    /// Proportional to emitted power.
    #[default]
    Power,
    Uniform,
}

/// A light chosen for next-event estimation, with its selection probability.
pub struct LightPick<'a> {
    pub light: &'a dyn Light,
    pub index: u32,
    pub pmf: f32,
}

pub struct Scene {
    primitives: Vec<Primitive>,
    lights: Vec<Arc<dyn Light>>,
    light_selection: LightSelection,
    light_distribution: Option<Distribution1d>,
    bounds: Bounds,
    camera: Camera,
    film: Film,
    committed: bool,
    stop: AtomicBool,
    preview: Mutex<Option<Box<dyn FnMut(&Film) + Send>>>,
}

impl Scene {
    pub fn new(camera: Camera) -> Self {
        let film = Film::new(camera.width, camera.height);
        Self {
            primitives: Vec::new(),
            lights: Vec::new(),
            light_selection: LightSelection::default(),
            light_distribution: None,
            bounds: Bounds::EMPTY,
            camera,
            film,
            committed: false,
            stop: AtomicBool::new(false),
            preview: Mutex::new(None),
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn film(&self) -> &Film {
        &self.film
    }

    pub fn lights(&self) -> &[Arc<dyn Light>] {
        &self.lights
    }

    /// Adds a non-emissive primitive and returns its slot.
    pub fn add_primitive(&mut self, primitive: Primitive) -> u32 {
        self.committed = false;
        self.primitives.push(primitive);
        (self.primitives.len() - 1) as u32
    }

    /// Adds geometry that emits `radiance` from its front face.
    pub fn add_area_light(
        &mut self,
        shape: impl Shape + 'static,
        material: impl Bsdf + 'static,
        radiance: Spectrum,
    ) -> u32 {
        self.committed = false;
        let shape: Arc<dyn Shape> = Arc::new(shape);
        let slot = self.primitives.len() as u32;
        let light_index = self.lights.len() as u32;
        self.lights
            .push(Arc::new(AreaLight::new(shape.clone(), slot, radiance)));
        self.primitives.push(Primitive {
            shape,
            material: Arc::new(material),
            light: Some(light_index),
        });
        slot
    }

    pub fn add_point_light(&mut self, position: Point, intensity: Spectrum) {
        self.committed = false;
        self.lights.push(Arc::new(PointLight {
            position,
            intensity,
        }));
    }

    pub fn set_light_selection(&mut self, selection: LightSelection) {
        self.committed = false;
        self.light_selection = selection;
    }

    /// Freezes the scene for rendering: world bounds and the light-selection
    /// distribution are rebuilt here and immutable afterwards.
    pub fn commit(&mut self) {
        self.bounds = self
            .primitives
            .iter()
            .fold(Bounds::EMPTY, |acc, p| acc.union(p.shape.bounding_box()));

        self.light_distribution = if self.lights.is_empty() {
            None
        } else {
            let weights: Vec<f32> = match self.light_selection {
                LightSelection::Power => self.lights.iter().map(|l| l.power()).collect(),
                LightSelection::Uniform => vec![1.0; self.lights.len()],
            };
            Some(Distribution1d::new(&weights))
        };

        self.committed = true;
    }

    pub fn is_committed(&self) -> bool {
        self.committed
    }

    /// Closest hit along `ray`, honoring its self-hit exclusion.
    pub fn intersect<'a>(&'a self, ray: &Ray) -> Option<Intersection<'a>> {
        let mut best: Option<(u32, crate::shape::SurfaceHit)> = None;
        for (slot, primitive) in self.primitives.iter().enumerate() {
            let Some(hit) = primitive.shape.intersect(ray) else {
                continue;
            };
            let id = HitId {
                geom: slot as u32,
                prim: hit.prim,
            };
            if ray.exclude == Some(id) {
                continue;
            }
            if best.as_ref().is_none_or(|(_, b)| hit.t < b.t) {
                best = Some((slot as u32, hit));
            }
        }

        let (slot, hit) = best?;
        let primitive = &self.primitives[slot as usize];
        Some(Intersection {
            t: hit.t,
            p: hit.p,
            ng: hit.ng,
            ns: hit.ns,
            uv: hit.uv,
            id: HitId {
                geom: slot,
                prim: hit.prim,
            },
            wo_world: -ray.direction,
            primitive,
            light: primitive.light.map(|i| self.lights[i as usize].as_ref()),
        })
    }

    /// Occlusion query for shadow rays; stops at the first hit.
    pub fn occluded(&self, ray: &Ray) -> bool {
        for (slot, primitive) in self.primitives.iter().enumerate() {
            let Some(hit) = primitive.shape.intersect(ray) else {
                continue;
            };
            let id = HitId {
                geom: slot as u32,
                prim: hit.prim,
            };
            if ray.exclude == Some(id) {
                continue;
            }
            return true;
        }
        false
    }

    /// Draws a light according to the committed selection distribution.
    /// `None` on a lightless scene; callers treat that as darkness, not as
    /// an error.
    pub fn choose_light(&self, sampler: &mut dyn Sampler) -> Option<LightPick<'_>> {
        let distribution = self.light_distribution.as_ref()?;
        let (index, pmf) = distribution.sample(sampler.get_1d());
        Some(LightPick {
            light: self.lights[index].as_ref(),
            index: index as u32,
            pmf,
        })
    }

    /// Selection probability of an already-chosen light.
    pub fn pdf_light_choice(&self, light_index: u32) -> f32 {
        self.light_distribution
            .as_ref()
            .map(|d| d.pmf(light_index as usize))
            .unwrap_or(0.0)
    }

    /// Radius of the bounding sphere of the committed scene.
    pub fn world_radius(&self) -> f32 {
        self.bounds.radius()
    }

    /// Bundles everything one pixel sample needs. Consumes the first sampler
    /// dimensions for the filter jitter and the lens position.
    pub fn get_render_context<'a>(
        &'a self,
        raster: UVec2,
        arena: &'a Arena,
        sampler: &'a mut dyn Sampler,
    ) -> RenderContext<'a> {
        let pixel_sample = sampler.get_2d();
        let lens_sample = sampler.get_2d();
        let (primary, weight) = self.camera.primary_ray(raster, pixel_sample, lens_sample);
        RenderContext {
            primary,
            sampler,
            arena,
            raster,
            camera: &self.camera,
            weight,
        }
    }

    /// Cooperative cancellation, polled by render workers between pixels.
    pub fn process_continuable(&self) -> bool {
        !self.stop.load(Ordering::Relaxed)
    }

    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    /// Installs the preview sink driven by [`Scene::update`].
    pub fn set_preview(&self, sink: impl FnMut(&Film) + Send + 'static) {
        *self.preview.lock().unwrap() = Some(Box::new(sink));
    }

    /// Preview tick: hands the film to the registered sink, if any. The
    /// sink mutex is the only lock render workers can meet on.
    pub fn update(&self) {
        if let Some(sink) = self.preview.lock().unwrap().as_mut() {
            sink(&self.film);
        }
    }
}

#[cfg(test)]
pub(crate) mod test_fixtures {
    use glam::{Vec2, Vec3};

    use crate::{
        color::Spectrum,
        material::{texture::ConstantTexture, Lambertian},
        math::point::Point,
        ray::HitId,
        shape::Sphere,
    };

    use super::{Intersection, Primitive};

    /// Free-standing shading point for light and estimator unit tests.
    /// Leaks a small primitive per call; fine at test scale.
    pub(crate) fn shading_point(p: Point, n: Vec3) -> Intersection<'static> {
        let primitive: &'static Primitive = Box::leak(Box::new(Primitive::new(
            Sphere {
                center: p,
                radius: 1.0,
            },
            Lambertian::new(ConstantTexture(Spectrum::splat(0.5))),
        )));
        Intersection {
            t: 1.0,
            p,
            ng: n,
            ns: n,
            uv: Vec2::ZERO,
            id: HitId {
                geom: u32::MAX,
                prim: 0,
            },
            wo_world: n,
            primitive,
            light: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::{UVec2, Vec3};

    use super::*;
    use crate::{
        material::{texture::ConstantTexture, Lambertian, Mirror},
        sampler::{Sampler, SamplerType},
        shape::{Quad, Sphere},
        Seed,
    };

    fn camera() -> Camera {
        Camera::look_at(4, 4, 1.0, Point::ORIGIN, Point::new(0.0, 0.0, -1.0))
    }

    fn diffuse() -> Lambertian<ConstantTexture> {
        Lambertian::new(ConstantTexture(Spectrum::splat(0.5)))
    }

    #[test]
    fn closest_hit_wins() {
        let mut scene = Scene::new(camera());
        scene.add_primitive(Primitive::new(
            Sphere {
                center: Point::new(0.0, 0.0, -5.0),
                radius: 1.0,
            },
            diffuse(),
        ));
        scene.add_primitive(Primitive::new(
            Sphere {
                center: Point::new(0.0, 0.0, -2.0),
                radius: 0.5,
            },
            diffuse(),
        ));
        scene.commit();

        let isect = scene
            .intersect(&Ray::new(Point::ORIGIN, Vec3::NEG_Z))
            .unwrap();
        assert_eq!(isect.id.geom, 1);
        assert!((isect.t - 1.5).abs() < 1e-5);
        assert!((isect.wo_world - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn exclusion_skips_the_source_surface() {
        let mut scene = Scene::new(camera());
        let slot = scene.add_primitive(Primitive::new(
            Sphere {
                center: Point::new(0.0, 0.0, -2.0),
                radius: 1.0,
            },
            diffuse(),
        ));
        scene.commit();

        let ray = Ray::new(Point::ORIGIN, Vec3::NEG_Z)
            .with_exclusion(HitId { geom: slot, prim: 0 });
        assert!(scene.intersect(&ray).is_none());
        assert!(!scene.occluded(&ray));
    }

    #[test]
    fn light_choice_pmf_sums_to_one() {
        let mut scene = Scene::new(camera());
        scene.add_point_light(Point::new(0.0, 1.0, 0.0), Spectrum::splat(3.0));
        scene.add_point_light(Point::new(0.0, 2.0, 0.0), Spectrum::splat(1.0));
        scene.add_area_light(
            Quad::new(Point::new(-1.0, 3.0, -1.0), 2.0 * Vec3::X, 2.0 * Vec3::Z),
            diffuse(),
            Spectrum::splat(2.0),
        );
        scene.commit();

        let total: f32 = (0..scene.lights().len())
            .map(|i| scene.pdf_light_choice(i as u32))
            .sum();
        assert!((total - 1.0).abs() < 1e-5);

        // Power selection favors the stronger point light 3:1.
        let a = scene.pdf_light_choice(0);
        let b = scene.pdf_light_choice(1);
        assert!((a / b - 3.0).abs() < 1e-3);
    }

    #[test]
    fn lightless_scene_has_no_pick() {
        let mut scene = Scene::new(camera());
        scene.add_primitive(Primitive::new(
            Sphere {
                center: Point::new(0.0, 0.0, -2.0),
                radius: 1.0,
            },
            diffuse(),
        ));
        scene.commit();

        let mut sampler = SamplerType::Independent.create(Seed { seed: 1, x: 0, y: 0 }, 1);
        assert!(scene.choose_light(&mut sampler).is_none());
        assert_eq!(scene.pdf_light_choice(0), 0.0);
    }

    #[test]
    fn uniform_selection_ignores_power() {
        let mut scene = Scene::new(camera());
        scene.add_point_light(Point::ORIGIN, Spectrum::splat(100.0));
        scene.add_point_light(Point::ORIGIN, Spectrum::splat(1.0));
        scene.set_light_selection(LightSelection::Uniform);
        scene.commit();
        assert_eq!(scene.pdf_light_choice(0), 0.5);
        assert_eq!(scene.pdf_light_choice(1), 0.5);
    }

    #[test]
    fn world_radius_covers_the_geometry() {
        let mut scene = Scene::new(camera());
        scene.add_primitive(Primitive::new(
            Sphere {
                center: Point::new(-2.0, 0.0, 0.0),
                radius: 1.0,
            },
            diffuse(),
        ));
        scene.add_primitive(Primitive::new(
            Sphere {
                center: Point::new(2.0, 0.0, 0.0),
                radius: 1.0,
            },
            Mirror {
                reflectance: Spectrum::splat(0.9),
            },
        ));
        scene.commit();
        // Box spans [-3,3] x [-1,1] x [-1,1]; the bounding sphere has half
        // its diagonal as radius.
        let expected = 0.5 * (36.0f32 + 4.0 + 4.0).sqrt();
        assert!((scene.world_radius() - expected).abs() < 1e-4);
    }

    #[test]
    fn cancellation_flag() {
        let scene = Scene::new(camera());
        assert!(scene.process_continuable());
        scene.request_stop();
        assert!(!scene.process_continuable());
    }

    #[test]
    fn render_context_draws_from_the_sampler() {
        let mut scene = Scene::new(camera());
        scene.commit();
        let arena = crate::memory::Arena::default();
        let mut sampler = SamplerType::Independent.create(Seed { seed: 4, x: 1, y: 2 }, 1);
        sampler.start_sample(0);
        let ctx = scene.get_render_context(UVec2::new(1, 2), &arena, &mut sampler);
        assert_eq!(ctx.raster, UVec2::new(1, 2));
        assert_eq!(ctx.weight, 1.0);
        assert!(ctx.primary.direction.z < 0.0);
    }
}
