use glam::Vec2;

/// A jitter position around the pixel center together with the weight the
/// film should give the resulting sample.
pub struct FilterSample {
    pub offset: Vec2,
    pub weight: f32,
}

/// Reconstruction filter, importance-sampled: the returned weight already
/// folds in the filter shape, so the film only does a weighted average.
pub trait Filter: Send + Sync {
    fn sample(&self, u: Vec2) -> FilterSample;
}

/// Always samples the pixel center. Useful for debugging single pixels.
pub struct DummyFilter;
impl Filter for DummyFilter {
    fn sample(&self, _u: Vec2) -> FilterSample {
        FilterSample {
            offset: Vec2::ZERO,
            weight: 1.0,
        }
    }
}

pub struct BoxFilter {
    pub radius: Vec2,
}

impl Default for BoxFilter {
    fn default() -> Self {
        Self {
            radius: Vec2::splat(0.5),
        }
    }
}

impl Filter for BoxFilter {
    fn sample(&self, u: Vec2) -> FilterSample {
        FilterSample {
            offset: Vec2 {
                x: self.radius.x * (2.0 * u.x - 1.0),
                y: self.radius.y * (2.0 * u.y - 1.0),
            },
            weight: 1.0,
        }
    }
}

pub struct TriangleFilter {
    pub radius: Vec2,
}

impl Filter for TriangleFilter {
    fn sample(&self, u: Vec2) -> FilterSample {
        // Inverse CDF of the tent over [-1, 1].
        fn sample_tent(c: f32) -> f32 {
            if c < 0.5 {
                f32::sqrt(2.0 * c) - 1.0
            } else {
                1.0 - f32::sqrt(2.0 - 2.0 * c)
            }
        }
        FilterSample {
            offset: Vec2 {
                x: self.radius.x * sample_tent(u.x),
                y: self.radius.y * sample_tent(u.y),
            },
            weight: 1.0,
        }
    }
}
