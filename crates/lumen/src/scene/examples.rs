//! Built-in demo scenes for the CLI scene selector.

use glam::Vec3;

use crate::{
    camera::Camera,
    color::Spectrum,
    material::{texture::ConstantTexture, Lambertian, Mirror},
    math::point::Point,
    shape::{Plane, Quad, Sphere},
};

use super::{Primitive, Scene};

fn diffuse(albedo: [f32; 3]) -> Lambertian<ConstantTexture> {
    Lambertian::new(ConstantTexture(Spectrum::from_array(albedo)))
}

/// Classic box interior with a ceiling panel light.
pub struct CornellBox;

impl CornellBox {
    pub fn build(width: u32, height: u32) -> Scene {
        let mut scene = Scene::new(Camera::look_at(
            width,
            height,
            f32::to_radians(40.0),
            Point::new(0.0, 1.0, 3.4),
            Point::new(0.0, 1.0, 0.0),
        ));

        let white = [0.73, 0.73, 0.73];
        let side = 2.0;
        let h = side / 2.0;

        // Floor, ceiling, back wall; edge order picks the inward normal.
        scene.add_primitive(Primitive::new(
            Quad::new(Point::new(-h, 0.0, -h), 2.0 * h * Vec3::Z, 2.0 * h * Vec3::X),
            diffuse(white),
        ));
        scene.add_primitive(Primitive::new(
            Quad::new(Point::new(-h, side, -h), 2.0 * h * Vec3::X, 2.0 * h * Vec3::Z),
            diffuse(white),
        ));
        scene.add_primitive(Primitive::new(
            Quad::new(Point::new(-h, 0.0, -h), 2.0 * h * Vec3::X, 2.0 * h * Vec3::Y),
            diffuse(white),
        ));

        // Colored side walls.
        scene.add_primitive(Primitive::new(
            Quad::new(Point::new(-h, 0.0, -h), 2.0 * h * Vec3::Y, 2.0 * h * Vec3::Z),
            diffuse([0.65, 0.05, 0.05]),
        ));
        scene.add_primitive(Primitive::new(
            Quad::new(Point::new(h, 0.0, -h), 2.0 * h * Vec3::Z, 2.0 * h * Vec3::Y),
            diffuse([0.12, 0.45, 0.15]),
        ));

        // Contents: one matte sphere, one mirror sphere.
        scene.add_primitive(Primitive::new(
            Sphere {
                center: Point::new(-0.4, 0.35, -0.3),
                radius: 0.35,
            },
            diffuse([0.55, 0.55, 0.75]),
        ));
        scene.add_primitive(Primitive::new(
            Sphere {
                center: Point::new(0.45, 0.3, 0.3),
                radius: 0.3,
            },
            Mirror {
                reflectance: Spectrum::splat(0.95),
            },
        ));

        // Ceiling panel, facing down.
        let panel = 0.5;
        scene.add_area_light(
            Quad::new(
                Point::new(-panel / 2.0, side - 1e-3, -panel / 2.0),
                panel * Vec3::X,
                panel * Vec3::Z,
            ),
            diffuse(white),
            Spectrum::splat(18.0),
        );

        scene.commit();
        scene
    }
}

/// Spheres on a ground plane under a point light and a warm panel.
pub struct Spheres;

impl Spheres {
    pub fn build(width: u32, height: u32) -> Scene {
        let mut scene = Scene::new(Camera::look_at(
            width,
            height,
            f32::to_radians(55.0),
            Point::new(0.0, 1.2, 3.0),
            Point::new(0.0, 0.5, 0.0),
        ));

        scene.add_primitive(Primitive::new(
            Plane::new(Point::ORIGIN, Vec3::Y),
            diffuse([0.5, 0.5, 0.5]),
        ));
        scene.add_primitive(Primitive::new(
            Sphere {
                center: Point::new(-0.8, 0.5, 0.0),
                radius: 0.5,
            },
            diffuse([0.8, 0.3, 0.25]),
        ));
        scene.add_primitive(Primitive::new(
            Sphere {
                center: Point::new(0.8, 0.5, 0.0),
                radius: 0.5,
            },
            Mirror {
                reflectance: Spectrum::splat(0.9),
            },
        ));

        scene.add_point_light(Point::new(2.0, 3.0, 2.0), Spectrum::splat(30.0));
        scene.add_area_light(
            Quad::new(Point::new(-1.5, 2.5, -1.0), 1.0 * Vec3::X, 1.0 * Vec3::Z),
            diffuse([0.5, 0.5, 0.5]),
            Spectrum::from_array([12.0, 10.0, 7.0]),
        );

        scene.commit();
        scene
    }
}
