//! Subpath construction shared by the integrators: a bounded random walk
//! that records one vertex per surface interaction, in either transport
//! direction.

use crate::{
    color::{linear, Spectrum},
    material::LobeFlags,
    math::point::Point,
    ray::Ray,
    scattering::{ScatteringEvent, TransportMode},
    scene::{RenderContext, Scene},
};
use glam::Vec3;

/// One vertex of a subpath. `beta` is the throughput accumulated from the
/// subpath origin up to (not including) the scattering at this vertex.
#[derive(Clone, Copy)]
pub struct Vertex<'a> {
    pub p: Point,
    pub beta: Spectrum,
    pub event: Option<&'a ScatteringEvent<'a>>,
    /// The interaction at this vertex sampled a specular lobe.
    pub delta: bool,
    /// Solid-angle density with which the walk arrived here.
    pub pdf_fwd: f32,
}

impl Default for Vertex<'_> {
    fn default() -> Self {
        Self {
            p: Point::ORIGIN,
            beta: linear::BLACK,
            event: None,
            delta: false,
            pdf_fwd: 0.0,
        }
    }
}

impl<'a> Vertex<'a> {
    /// Subpath origin on the camera lens.
    pub fn camera(p: Point, beta: Spectrum) -> Self {
        Self {
            p,
            beta,
            event: None,
            delta: false,
            pdf_fwd: 1.0,
        }
    }

    /// Emitted radiance from this vertex along `w`.
    pub fn le(&self, w: Vec3) -> Spectrum {
        match self.event {
            Some(event) => event.le(w),
            None => linear::BLACK,
        }
    }
}

/// Extends a subpath by up to `vertices.len()` surface interactions,
/// returning how many were recorded.
///
/// Each step intersects the scene, builds a scattering event in the sample
/// arena, samples the BSDF for the continuation direction, and stores a
/// vertex carrying the incoming throughput. Termination: a miss, a zero
/// BSDF sample, or Russian roulette once `depth` reaches `min_depth`.
#[allow(clippy::too_many_arguments)]
pub fn random_walk<'a>(
    scene: &'a Scene,
    ctx: &mut RenderContext<'a>,
    vertices: &mut [Vertex<'a>],
    start: Ray,
    beta: Spectrum,
    pdf: f32,
    start_depth: u32,
    min_depth: u32,
    mode: TransportMode,
) -> usize {
    let arena = ctx.arena;
    let mut ray = start;
    let mut beta = beta;
    let mut pdf_fwd = pdf;
    let mut depth = start_depth;
    let mut n = 0;

    while n < vertices.len() {
        let Some(isect) = scene.intersect(&ray) else {
            break;
        };
        let isect = &*arena.alloc(isect);
        let bsdf = isect.primitive.material.as_ref();

        let mut event = ScatteringEvent::new(&mut *ctx.sampler, isect, bsdf, mode);
        let f = bsdf.sample(&mut event);
        let pdf_bsdf = event.pdf;
        if f.is_black() || pdf_bsdf <= 0.0 {
            break;
        }

        let delta = event.lobe.matches(LobeFlags::SPECULAR);
        let event = &*arena.alloc(event);
        vertices[n] = Vertex {
            p: isect.p,
            beta,
            event: Some(event),
            delta,
            pdf_fwd,
        };
        n += 1;

        beta = beta * f * event.wi_world.dot(isect.ns).abs() / pdf_bsdf;

        if depth >= min_depth {
            let q = beta.max_channel().min(1.0);
            if ctx.sampler.get_1d() > q {
                break;
            }
            beta = beta / q;
        }

        ray = event.spawn_ray(event.wi_world);
        pdf_fwd = pdf_bsdf;
        depth += 1;
    }

    n
}
