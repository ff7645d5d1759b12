use glam::{Vec2, Vec3};

use crate::{
    color::{linear, Spectrum},
    material::{Bsdf, LobeFlags},
    math::{frame::Frame, point::Point},
    ray::Ray,
    sampler::Sampler,
    scene::Intersection,
};

/// Which quantity a subpath carries: radiance walks from the eye,
/// importance walks from a light.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportMode {
    Radiance,
    Importance,
}

/// One surface interaction, bundled with the sampling state the BSDF and the
/// light estimators need. Lives in the per-sample arena; the intersection
/// and BSDF it borrows outlive it (scene-owned or arena-owned alongside).
///
/// Direction pairs are kept in both the local shading frame (`wi`, `wo`) and
/// world space (`wi_world`, `wo_world`); the setters keep them in sync.
#[derive(Clone, Copy)]
pub struct ScatteringEvent<'a> {
    isect: &'a Intersection<'a>,
    frame: Frame,
    bsdf: &'a dyn Bsdf,

    /// 2-D sample consumed when the BSDF is sampled.
    pub u: Vec2,
    pub wi: Vec3,
    pub wo: Vec3,
    pub wi_world: Vec3,
    pub wo_world: Vec3,
    /// Density of the last BSDF sample.
    pub pdf: f32,
    /// Lobe the last BSDF sample came from.
    pub lobe: LobeFlags,
    pub mode: TransportMode,
}

impl<'a> ScatteringEvent<'a> {
    pub fn new(
        sampler: &mut dyn Sampler,
        isect: &'a Intersection<'a>,
        bsdf: &'a dyn Bsdf,
        mode: TransportMode,
    ) -> Self {
        let frame = Frame::from_normal(isect.ns);
        let wo_world = isect.wo_world;
        Self {
            isect,
            frame,
            bsdf,
            u: sampler.get_2d(),
            wi: Vec3::ZERO,
            wo: frame.to_local(wo_world),
            wi_world: Vec3::ZERO,
            wo_world,
            pdf: 0.0,
            lobe: LobeFlags::empty(),
            mode,
        }
    }

    pub fn intersection(&self) -> &'a Intersection<'a> {
        self.isect
    }

    pub fn bsdf(&self) -> &'a dyn Bsdf {
        self.bsdf
    }

    pub fn p(&self) -> Point {
        self.isect.p
    }

    pub fn ns(&self) -> Vec3 {
        self.isect.ns
    }

    pub fn ng(&self) -> Vec3 {
        self.isect.ng
    }

    pub fn uv(&self) -> Vec2 {
        self.isect.uv
    }

    pub fn to_local(&self, w: Vec3) -> Vec3 {
        self.frame.to_local(w)
    }

    pub fn to_world(&self, w: Vec3) -> Vec3 {
        self.frame.to_world(w)
    }

    /// Sets the incident direction from the local frame.
    pub fn set_wi(&mut self, wi: Vec3) {
        self.wi = wi;
        self.wi_world = self.to_world(wi);
    }

    /// Sets the incident direction from world space.
    pub fn set_wi_world(&mut self, wi_world: Vec3) {
        self.wi_world = wi_world;
        self.wi = self.to_local(wi_world);
    }

    /// Continuation ray leaving this surface, excluding the surface itself
    /// from the next intersection test.
    pub fn spawn_ray(&self, wi_world: Vec3) -> Ray {
        Ray::new_with_range(self.p(), wi_world, 1e-4..f32::INFINITY)
            .with_exclusion(self.isect.id)
    }

    /// Radiance emitted here along `w`, zero unless the hit primitive
    /// carries a light.
    pub fn le(&self, w: Vec3) -> Spectrum {
        match self.isect.light {
            Some(light) => light.le(self.isect, w),
            None => linear::BLACK,
        }
    }
}
