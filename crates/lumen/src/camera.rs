use glam::{Quat, UVec2, Vec2, Vec3};

use crate::{
    filter::{BoxFilter, Filter, FilterSample},
    math::{
        distributions::{Samplable, Samples, UniformUnitDisk},
        point::Point,
    },
    ray::Ray,
};

/// Thin-lens perspective camera. The sensor sits at `focal_length` behind
/// the lens along `+z` in camera space; `rotation` maps camera space into
/// the world, with the view direction on `-z`.
pub struct Camera {
    /// Diameter of the lens opening, in world units. Zero is a pinhole.
    pub aperture: f32,

    /// Lens-to-sensor distance, which is also the focus distance.
    pub focal_length: f32,

    /// Sensor resolution, in pixels.
    pub width: u32,
    pub height: u32,

    /// Half extents of the sensor, in world units.
    pub viewport_half_width: f32,
    pub viewport_half_height: f32,

    pub center_of_lens: Point,
    pub rotation: Quat,

    pub filter: Box<dyn Filter>,
}

impl Camera {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        width: u32,
        height: u32,
        vfov: f32,
        focal_length: f32,
        center_of_lens: Point,
        rotation: Quat,
        aperture: f32,
    ) -> Self {
        let half_height_factor = f32::tan(vfov / 2.);
        let aspect_ratio = width as f32 / height as f32;
        Self {
            width,
            height,
            viewport_half_height: focal_length * half_height_factor,
            viewport_half_width: focal_length * half_height_factor * aspect_ratio,
            focal_length,
            center_of_lens,
            rotation,
            aperture,
            filter: Box::<BoxFilter>::default(),
        }
    }

    /// Pinhole camera placed at `from`, focused on `at`.
    pub fn look_at(width: u32, height: u32, vfov: f32, from: Point, at: Point) -> Self {
        let direction = at - from;
        let rotation = Quat::from_rotation_arc(Vec3::NEG_Z, direction.normalize());
        Self::new(width, height, vfov, direction.length(), from, rotation, 0.0)
    }

    pub fn with_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filter = Box::new(filter);
        self
    }

    /// Generates the primary ray through `raster`, jittered by the
    /// reconstruction filter, with the lens point chosen from `lens_sample`.
    /// Also returns the film weight of the sample.
    pub fn primary_ray(&self, raster: UVec2, pixel_sample: Vec2, lens_sample: Vec2) -> (Ray, f32) {
        let FilterSample { offset, weight } = self.filter.sample(pixel_sample);
        let coords = Vec2::new(raster.x as f32 + 0.5, raster.y as f32 + 0.5) + offset;
        let ViewportCoord { vx, vy } = ViewportCoord::from_pixel_coord(self, coords);

        // Point on the sensor, in camera space.
        let sensor = Vec3::new(
            -vx * self.viewport_half_width,
            -vy * self.viewport_half_height,
            self.focal_length,
        );

        // Point on the lens.
        let [dx, dy] = UniformUnitDisk.sample_with(Samples([lens_sample.x, lens_sample.y]));
        let lens = self.aperture / 2.0 * Vec3::new(dx, dy, 0.0);

        let origin = self.center_of_lens + self.rotation.mul_vec3(lens);
        let direction = self.rotation.mul_vec3(lens - sensor);
        (Ray::new(origin, direction), weight)
    }
}

/// Position on the viewport, mapped to $[-1, 1]$ on both axes.
/// `(-1, -1)` is the top left corner.
#[derive(Debug, Clone, Copy)]
pub struct ViewportCoord {
    pub vx: f32,
    pub vy: f32,
}

impl ViewportCoord {
    pub fn from_pixel_coord(camera: &Camera, coords: Vec2) -> Self {
        Self {
            vx: 2. * (coords.x / camera.width as f32) - 1.,
            vy: 2. * (coords.y / camera.height as f32) - 1.,
        }
    }
}
