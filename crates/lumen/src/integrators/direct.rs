use crate::{
    bidir::{random_walk, Vertex},
    color::{linear, Spectrum},
    scattering::TransportMode,
    scene::{RenderContext, Scene},
};

use super::{sample_one_light, Integrator};

/// Direct lighting only: one camera bounce, next-event estimation at the
/// hit point. Emission is picked up when the eye sees it directly or
/// through a specular interaction, where next-event estimation cannot.
pub struct DirectLighting;

impl Integrator for DirectLighting {
    fn li<'a>(&self, scene: &'a Scene, ctx: &mut RenderContext<'a>) -> Spectrum {
        let arena = ctx.arena;
        let vertices = arena.alloc_slice_with(1 + 1, |_| Vertex::default());
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
            1,
            TransportMode::Radiance,
        );

        // Camera and per-bounce dimensions are consumed; direct-light
        // estimation continues on its own dimension range.
        ctx.sampler.start_dimension(4 + 4);

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
