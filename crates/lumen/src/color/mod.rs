use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign};

use crate::math::float::FloatAsExt;

/// Tristimulus radiance value in linear RGB.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Spectrum(pub [f32; 3]);

pub mod linear {
    use super::Spectrum;

    pub const BLACK: Spectrum = Spectrum([0.0, 0.0, 0.0]);
    pub const WHITE: Spectrum = Spectrum([1.0, 1.0, 1.0]);
}

impl Spectrum {
    pub const fn from_array(arr: [f32; 3]) -> Self {
        Self(arr)
    }

    pub const fn to_array(self) -> [f32; 3] {
        self.0
    }

    pub fn splat(v: f32) -> Self {
        Self([v, v, v])
    }

    pub fn is_black(&self) -> bool {
        self.0 == [0.0, 0.0, 0.0]
    }

    pub fn max_channel(&self) -> f32 {
        self.0[0].max(self.0[1]).max(self.0[2])
    }

    pub fn luminance(&self) -> f32 {
        0.212671 * self.0[0] + 0.715160 * self.0[1] + 0.072169 * self.0[2]
    }

    /// Replaces non-finite channels with zero. One corrupted sample becomes a
    /// dark sample instead of poisoning the whole pixel.
    pub fn sanitized(self) -> Self {
        Self(self.0.map(|c| c.into_finite().unwrap_or(0.0)))
    }

    /// Caps each channel, the usual firefly suppression.
    pub fn clamped(self, max_intensity: f32) -> Self {
        Self(self.0.map(|c| c.clamp(0.0, max_intensity)))
    }

    pub fn to_srgb(self) -> [f32; 3] {
        fn encode(c: f32) -> f32 {
            if c <= 0.003_130_8 {
                12.92 * c
            } else {
                1.055 * c.powf(1.0 / 2.4) - 0.055
            }
        }
        self.0.map(|c| encode(c.clamp(0.0, 1.0)))
    }
}

impl Add for Spectrum {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self([
            self.0[0] + rhs.0[0],
            self.0[1] + rhs.0[1],
            self.0[2] + rhs.0[2],
        ])
    }
}

impl AddAssign for Spectrum {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Mul for Spectrum {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self([
            self.0[0] * rhs.0[0],
            self.0[1] * rhs.0[1],
            self.0[2] * rhs.0[2],
        ])
    }
}

impl MulAssign for Spectrum {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Mul<Spectrum> for f32 {
    type Output = Spectrum;

    fn mul(self, rhs: Spectrum) -> Spectrum {
        Spectrum(rhs.0.map(|c| self * c))
    }
}

impl Mul<f32> for Spectrum {
    type Output = Spectrum;

    fn mul(self, rhs: f32) -> Spectrum {
        rhs * self
    }
}

impl Div<f32> for Spectrum {
    type Output = Spectrum;

    fn div(self, rhs: f32) -> Spectrum {
        Spectrum(self.0.map(|c| c / rhs))
    }
}

impl DivAssign<f32> for Spectrum {
    fn div_assign(&mut self, rhs: f32) {
        *self = *self / rhs;
    }
}

impl From<[f32; 3]> for Spectrum {
    fn from(arr: [f32; 3]) -> Self {
        Self(arr)
    }
}

impl From<Spectrum> for image::Rgb<f32> {
    fn from(s: Spectrum) -> Self {
        image::Rgb(s.to_array())
    }
}
