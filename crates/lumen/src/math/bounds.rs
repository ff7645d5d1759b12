use glam::Vec3;

use super::point::Point;

/// Axis-aligned box, used for world extent queries.
#[derive(Debug, Clone, Copy)]
pub struct Bounds {
    pub origin: Point,
    pub end: Point,
}

impl Bounds {
    /// An empty box: unioning anything into it yields that thing.
    pub const EMPTY: Bounds = Bounds {
        origin: Point(Vec3::INFINITY),
        end: Point(Vec3::NEG_INFINITY),
    };

    pub fn around(center: Point, half_extent: Vec3) -> Self {
        Self {
            origin: center - half_extent,
            end: center + half_extent,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.origin.vec().cmpgt(self.end.vec()).any()
    }

    pub fn union(self, other: Self) -> Self {
        Self {
            origin: Point(self.origin.vec().min(other.origin.vec())),
            end: Point(self.end.vec().max(other.end.vec())),
        }
    }

    pub fn center(&self) -> Point {
        Point(0.5 * (self.origin.vec() + self.end.vec()))
    }

    /// Radius of the bounding sphere around `center`. Zero for an empty box.
    pub fn radius(&self) -> f32 {
        if self.is_empty() {
            return 0.0;
        }
        0.5 * (self.end - self.origin).length()
    }
}
