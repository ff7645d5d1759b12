use std::ops::{Range, RangeInclusive};

use crate::math::point::Point;
use crate::utils::log_once::error_once;
use glam::Vec3;

/// Identifies one piece of scene surface: the primitive slot and, for
/// aggregate shapes, the sub-primitive inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitId {
    pub geom: u32,
    pub prim: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Point,
    pub direction: Vec3,
    pub bounds: (f32, f32),
    /// Surface the ray starts on. The intersection routines skip it instead
    /// of relying on a distance epsilon alone, which would leak self-hits at
    /// grazing angles.
    pub exclude: Option<HitId>,
}

impl Ray {
    pub fn new(origin: Point, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
            bounds: (0.0, f32::INFINITY),
            exclude: None,
        }
    }

    pub fn new_with_range(origin: Point, direction: Vec3, range: Range<f32>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
            bounds: (range.start, range.end),
            exclude: None,
        }
    }

    pub fn with_exclusion(mut self, id: HitId) -> Self {
        self.exclude = Some(id);
        self
    }

    pub fn range(&self) -> RangeInclusive<f32> {
        self.bounds.0..=self.bounds.1
    }

    pub fn at(&self, t: f32) -> Point {
        if !self.range().contains(&t) {
            error_once!("a ray has been accessed out of bounds");
        }

        self.at_unchecked(t)
    }

    pub fn at_unchecked(&self, t: f32) -> Point {
        self.origin + t * self.direction
    }
}
