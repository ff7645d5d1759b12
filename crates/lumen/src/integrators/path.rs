use crate::{
    bidir::{random_walk, Vertex},
    color::{linear, Spectrum},
    scattering::TransportMode,
    scene::{RenderContext, Scene},
};

use super::{sample_one_light, Integrator};

/// Unidirectional path tracer built on the shared walk primitive: every
/// vertex contributes next-event-estimated direct light; emission is added
/// where the walk arrived directly from the eye or through specular lobes.
pub struct PathTracer {
    pub max_depth: u32,
    pub min_depth: u32,
}

impl Integrator for PathTracer {
    fn li<'a>(&self, scene: &'a Scene, ctx: &mut RenderContext<'a>) -> Spectrum {
        if self.max_depth == 0 {
            return linear::BLACK;
        }

        let arena = ctx.arena;
        let max = self.max_depth as usize;
        let vertices = arena.alloc_slice_with(max + 1, |_| Vertex::default());
        vertices[0] = Vertex::camera(ctx.primary.origin, linear::WHITE);

        let primary = ctx.primary;
        let n = random_walk(
            scene,
            ctx,
            &mut vertices[1..],
            primary,
            linear::WHITE,
            1.0,
            1,
            self.min_depth.max(1),
            TransportMode::Radiance,
        );

        ctx.sampler.start_dimension(4 + 4 * self.max_depth);

        let mut li = linear::BLACK;
        let mut specular = false;
        for depth in 0..n {
            let prev = vertices[depth].p;
            let vertex = vertices[depth + 1];
            if specular || depth == 0 {
                let wo = (prev - vertex.p).normalize();
                li += vertex.beta * vertex.le(wo);
            }
            if let Some(event) = vertex.event {
                li += vertex.beta * sample_one_light(scene, ctx, event);
            }
            specular = vertex.delta;
        }
        li
    }
}
