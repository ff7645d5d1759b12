use std::ops::Deref;

use glam::Vec3;

/// Sample values are expected to lie in `[0;1(^N`.
pub struct Samples<const N: usize>(pub [f32; N]);
pub type Sample1D = Samples<1>;
pub type Sample2D = Samples<2>;

impl<const N: usize> Deref for Samples<N> {
    type Target = [f32; N];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

pub trait Samplable<T, const N: usize> {
    fn sample_with(&self, samples: Samples<N>) -> T;
}

pub struct UniformUnitDisk;
impl Samplable<[f32; 2], 2> for UniformUnitDisk {
    fn sample_with(&self, samples: Samples<2>) -> [f32; 2] {
        let phi = std::f32::consts::TAU * samples[0];
        let r = samples[1].sqrt();
        let (s, c) = f32::sin_cos(phi);
        [r * c, r * s]
    }
}

pub struct UniformUnitSphere3;
impl Samplable<Vec3, 2> for UniformUnitSphere3 {
    fn sample_with(&self, samples: Samples<2>) -> Vec3 {
        let z = 1.0 - 2.0 * samples[0];
        let r = f32::sqrt(f32::max(0.0, 1.0 - z * z));
        let (s, c) = f32::sin_cos(std::f32::consts::TAU * samples[1]);
        Vec3::new(r * c, r * s, z)
    }
}

pub struct UniformHemisphere3;
impl Samplable<Vec3, 2> for UniformHemisphere3 {
    fn sample_with(&self, samples: Samples<2>) -> Vec3 {
        let z = samples[0];
        let r = f32::sqrt(f32::max(0.0, 1.0 - z * z));
        let (s, c) = f32::sin_cos(std::f32::consts::TAU * samples[1]);
        Vec3::new(r * c, r * s, z)
    }
}

/// Cosine-weighted hemisphere around local `+z`; pdf is `cos(theta) / pi`.
pub struct CosineHemisphere3;
impl Samplable<Vec3, 2> for CosineHemisphere3 {
    fn sample_with(&self, samples: Samples<2>) -> Vec3 {
        let p = UniformUnitDisk.sample_with(samples);
        let z = f32::sqrt(f32::max(0.0, 1.0 - p[0] * p[0] - p[1] * p[1]));
        Vec3::new(p[0], p[1], z)
    }
}

/// Balances a pair of sampling strategies; see Veach's thesis. The weights
/// for `(a, b)` and `(b, a)` sum to one whenever either pdf is positive.
pub fn power_heuristic(a: f32, b: f32) -> f32 {
    let a2 = a * a;
    let b2 = b * b;
    if a2 + b2 > 0.0 {
        a2 / (a2 + b2)
    } else {
        0.0
    }
}

/// Discrete distribution over arbitrary non-negative weights, sampled by CDF
/// inversion. Zero total weight degenerates to the uniform distribution so a
/// caller never observes an unnormalized pmf.
pub struct Distribution1d {
    pmf: Vec<f32>,
    cdf: Vec<f32>,
}

impl Distribution1d {
    pub fn new(weights: &[f32]) -> Self {
        assert!(!weights.is_empty());
        let total: f32 = weights.iter().sum();
        let pmf: Vec<f32> = if total > 0.0 {
            weights.iter().map(|w| w / total).collect()
        } else {
            vec![1.0 / weights.len() as f32; weights.len()]
        };

        let mut acc = 0.0;
        let mut cdf = Vec::with_capacity(pmf.len());
        for p in &pmf {
            acc += p;
            cdf.push(acc);
        }
        // Guard the last bucket against float drift.
        *cdf.last_mut().unwrap() = 1.0;

        Self { pmf, cdf }
    }

    pub fn len(&self) -> usize {
        self.pmf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pmf.is_empty()
    }

    /// Maps `xi` in `[0;1(` to an index and its probability mass.
    pub fn sample(&self, xi: f32) -> (usize, f32) {
        let index = self
            .cdf
            .partition_point(|&c| c <= xi)
            .min(self.pmf.len() - 1);
        (index, self.pmf[index])
    }

    pub fn pmf(&self, index: usize) -> f32 {
        self.pmf[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_heuristic_is_complementary() {
        for (a, b) in [(1.0, 3.0), (0.5, 0.0), (0.0, 2.0), (4.0, 4.0)] {
            let sum = power_heuristic(a, b) + power_heuristic(b, a);
            assert!((sum - 1.0).abs() < 1e-6, "{a} {b}");
        }
        assert_eq!(power_heuristic(0.0, 0.0), 0.0);
    }

    #[test]
    fn pmf_is_normalized() {
        let d = Distribution1d::new(&[3.0, 1.0, 0.0, 2.0]);
        let total: f32 = (0..d.len()).map(|i| d.pmf(i)).sum();
        assert!((total - 1.0).abs() < 1e-6);
        assert_eq!(d.pmf(2), 0.0);
    }

    #[test]
    fn zero_weights_fall_back_to_uniform() {
        let d = Distribution1d::new(&[0.0, 0.0]);
        assert_eq!(d.sample(0.25), (0, 0.5));
        assert_eq!(d.sample(0.75), (1, 0.5));
    }

    #[test]
    fn selection_frequency_tracks_weights() {
        use rand::{distributions::Uniform, prelude::Distribution, SeedableRng};

        // Two lights with a 3:1 power ratio select in a 3:1 ratio.
        let d = Distribution1d::new(&[3.0, 1.0]);
        let mut rng = crate::Rng::seed_from_u64(0x10155);
        let uniform = Uniform::new(0.0f32, 1.0);
        let draws = 1_000_000;
        let mut hits = 0u32;
        for _ in 0..draws {
            let (index, pmf) = d.sample(uniform.sample(&mut rng));
            if index == 0 {
                hits += 1;
                assert_eq!(pmf, 0.75);
            }
        }
        let freq = hits as f64 / draws as f64;
        assert!((freq - 0.75).abs() < 0.01, "{freq}");
    }

    #[test]
    fn edges_of_the_unit_interval() {
        let d = Distribution1d::new(&[1.0, 1.0]);
        assert_eq!(d.sample(0.0).0, 0);
        assert_eq!(d.sample(0.999_999).0, 1);
    }

    #[test]
    fn cosine_hemisphere_stays_above_surface() {
        let v = CosineHemisphere3.sample_with(Samples([0.3, 0.9]));
        assert!(v.z >= 0.0);
        assert!((v.length() - 1.0).abs() < 1e-5);
    }
}
