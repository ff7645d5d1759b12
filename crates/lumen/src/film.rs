use std::sync::atomic::{AtomicU32, Ordering};

use glam::UVec2;
use image::Rgb32FImage;

use crate::color::Spectrum;

/// Accumulation target for weighted radiance samples.
///
/// Channels are stored as `f32` bit patterns in atomics and added with a
/// compare-exchange loop: addition is commutative, so concurrent workers may
/// deposit into the same pixel in any order without a lock.
pub struct Film {
    width: u32,
    height: u32,
    pixels: Vec<PixelAcc>,
}

#[derive(Default)]
struct PixelAcc {
    rgb: [AtomicU32; 3],
    weight: AtomicU32,
}

fn atomic_add_f32(slot: &AtomicU32, value: f32) {
    let mut current = slot.load(Ordering::Relaxed);
    loop {
        let next = (f32::from_bits(current) + value).to_bits();
        match slot.compare_exchange_weak(current, next, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => return,
            Err(observed) => current = observed,
        }
    }
}

impl Film {
    pub fn new(width: u32, height: u32) -> Self {
        let mut pixels = Vec::new();
        pixels.resize_with((width * height) as usize, PixelAcc::default);
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn image_dimension(&self) -> UVec2 {
        UVec2::new(self.width, self.height)
    }

    pub fn add_sample(&self, raster: UVec2, value: Spectrum, weight: f32) {
        if raster.x >= self.width || raster.y >= self.height {
            return;
        }
        let acc = &self.pixels[(raster.y * self.width + raster.x) as usize];
        for (slot, channel) in acc.rgb.iter().zip(value.0) {
            atomic_add_f32(slot, weight * channel);
        }
        atomic_add_f32(&acc.weight, weight);
    }

    /// Current value of one pixel: accumulated radiance and weight.
    pub fn pixel(&self, raster: UVec2) -> (Spectrum, f32) {
        let acc = &self.pixels[(raster.y * self.width + raster.x) as usize];
        let rgb = Spectrum([
            f32::from_bits(acc.rgb[0].load(Ordering::Relaxed)),
            f32::from_bits(acc.rgb[1].load(Ordering::Relaxed)),
            f32::from_bits(acc.rgb[2].load(Ordering::Relaxed)),
        ]);
        (rgb, f32::from_bits(acc.weight.load(Ordering::Relaxed)))
    }

    /// Weighted average of every pixel, as a linear HDR image. Pixels that
    /// never received a sample resolve to black.
    pub fn develop(&self) -> Rgb32FImage {
        let mut image = Rgb32FImage::new(self.width, self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                let (rgb, weight) = self.pixel(UVec2::new(x, y));
                let resolved = if weight > 0.0 {
                    rgb / weight
                } else {
                    crate::color::linear::BLACK
                };
                image.put_pixel(x, y, resolved.into());
            }
        }
        image
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weighted_average() {
        let film = Film::new(2, 1);
        let p = UVec2::new(0, 0);
        film.add_sample(p, Spectrum::splat(1.0), 1.0);
        film.add_sample(p, Spectrum::splat(3.0), 1.0);
        let image = film.develop();
        assert_eq!(image.get_pixel(0, 0).0, [2.0, 2.0, 2.0]);
        // Untouched pixel develops to black.
        assert_eq!(image.get_pixel(1, 0).0, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn out_of_range_samples_are_dropped() {
        let film = Film::new(1, 1);
        film.add_sample(UVec2::new(5, 5), Spectrum::splat(1.0), 1.0);
        assert_eq!(film.pixel(UVec2::ZERO).1, 0.0);
    }

    #[test]
    fn concurrent_deposits_sum_exactly() {
        // Sums of 1.0 are exact in f32 far beyond these counts, so the CAS
        // loop either loses updates (bug) or lands on the exact total.
        let film = Film::new(1, 1);
        let threads = 4;
        let per_thread = 1000;
        std::thread::scope(|scope| {
            for _ in 0..threads {
                scope.spawn(|| {
                    for _ in 0..per_thread {
                        film.add_sample(UVec2::ZERO, Spectrum::splat(1.0), 1.0);
                    }
                });
            }
        });
        let (rgb, weight) = film.pixel(UVec2::ZERO);
        assert_eq!(weight, (threads * per_thread) as f32);
        assert_eq!(rgb.0[0], (threads * per_thread) as f32);
    }
}
