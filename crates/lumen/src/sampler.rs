use glam::Vec2;
use rand::{distributions::Uniform, prelude::Distribution};

use crate::{Rng, Seed};

pub const ONE_MINUS_EPSILON: f32 = 1.0 - f32::EPSILON / 2.0;

/// Source of sample values for one pixel. Integrators pull 1-D and 2-D
/// values in a fixed order; low-discrepancy variants additionally honor
/// `start_dimension` so that logically-distinct estimates land on distinct
/// dimensions of the sequence.
pub trait Sampler: Send {
    /// Positions the sampler on a sample of its pixel. Resets the dimension.
    fn start_sample(&mut self, sample_index: u32);

    /// Jumps to the given dimension of the current sample.
    fn start_dimension(&mut self, dimension: u32);

    fn get_1d(&mut self) -> f32;
    fn get_2d(&mut self) -> Vec2;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SamplerType {
    Independent,
    Stratified,
    #[default]
    Sobol,
}

impl SamplerType {
    /// The sampler set is closed, so callers get a plain enum rather than a
    /// boxed trait object; the hot loop stays allocation-free.
    pub fn create(self, seed: Seed, spp: u32) -> SamplerInstance {
        match self {
            SamplerType::Independent => SamplerInstance::Independent(IndependentSampler::new(seed)),
            SamplerType::Stratified => {
                SamplerInstance::Stratified(StratifiedSampler::new(seed, spp))
            }
            SamplerType::Sobol => SamplerInstance::Sobol(SobolSampler::new(seed)),
        }
    }
}

pub enum SamplerInstance {
    Independent(IndependentSampler),
    Stratified(StratifiedSampler),
    Sobol(SobolSampler),
}

impl Sampler for SamplerInstance {
    fn start_sample(&mut self, sample_index: u32) {
        match self {
            SamplerInstance::Independent(s) => s.start_sample(sample_index),
            SamplerInstance::Stratified(s) => s.start_sample(sample_index),
            SamplerInstance::Sobol(s) => s.start_sample(sample_index),
        }
    }

    fn start_dimension(&mut self, dimension: u32) {
        match self {
            SamplerInstance::Independent(s) => s.start_dimension(dimension),
            SamplerInstance::Stratified(s) => s.start_dimension(dimension),
            SamplerInstance::Sobol(s) => s.start_dimension(dimension),
        }
    }

    fn get_1d(&mut self) -> f32 {
        match self {
            SamplerInstance::Independent(s) => s.get_1d(),
            SamplerInstance::Stratified(s) => s.get_1d(),
            SamplerInstance::Sobol(s) => s.get_1d(),
        }
    }

    fn get_2d(&mut self) -> Vec2 {
        match self {
            SamplerInstance::Independent(s) => s.get_2d(),
            SamplerInstance::Stratified(s) => s.get_2d(),
            SamplerInstance::Sobol(s) => s.get_2d(),
        }
    }
}

/// Plain pseudo-random values, freshly seeded per sample from the pixel seed.
pub struct IndependentSampler {
    seed: Seed,
    rng: Rng,
    uniform: Uniform<f32>,
}

impl IndependentSampler {
    pub fn new(seed: Seed) -> Self {
        Self {
            seed,
            rng: seed.into_rng(0),
            uniform: Uniform::new(0.0, 1.0),
        }
    }
}

impl Sampler for IndependentSampler {
    fn start_sample(&mut self, sample_index: u32) {
        self.rng = self.seed.into_rng(sample_index);
    }

    fn start_dimension(&mut self, _dimension: u32) {}

    fn get_1d(&mut self) -> f32 {
        self.uniform.sample(&mut self.rng).min(ONE_MINUS_EPSILON)
    }

    fn get_2d(&mut self) -> Vec2 {
        Vec2::new(self.get_1d(), self.get_1d())
    }
}

/// Jitters within the stratum of the current sample index.
///
/// Note the stratum index should be randomly permuted per dimension; using
/// the sample index directly correlates dimensions. See PBRT p734.
pub struct StratifiedSampler {
    seed: Seed,
    rng: Rng,
    uniform: Uniform<f32>,
    samples_x: u32,
    samples_y: u32,
    sample: u32,
}

impl StratifiedSampler {
    pub fn new(seed: Seed, spp: u32) -> Self {
        let samples_x = (spp.max(1) as f32).sqrt().round() as u32;
        let samples_y = (spp.max(1)).div_ceil(samples_x.max(1));
        Self {
            seed,
            rng: seed.into_rng(0),
            uniform: Uniform::new(0.0, 1.0),
            samples_x: samples_x.max(1),
            samples_y: samples_y.max(1),
            sample: 0,
        }
    }

    fn sample_count(&self) -> u32 {
        self.samples_x * self.samples_y
    }
}

impl Sampler for StratifiedSampler {
    fn start_sample(&mut self, sample_index: u32) {
        self.sample = sample_index;
        self.rng = self.seed.into_rng(sample_index);
    }

    fn start_dimension(&mut self, _dimension: u32) {}

    fn get_1d(&mut self) -> f32 {
        let index = (self.sample % self.sample_count()) as f32;
        let jitter = self.uniform.sample(&mut self.rng);
        ((index + jitter) / self.sample_count() as f32).min(ONE_MINUS_EPSILON)
    }

    fn get_2d(&mut self) -> Vec2 {
        let index = self.sample % self.sample_count();
        let x = (index % self.samples_x) as f32;
        let y = (index / self.samples_x) as f32;
        Vec2 {
            x: ((x + self.uniform.sample(&mut self.rng)) / self.samples_x as f32)
                .min(ONE_MINUS_EPSILON),
            y: ((y + self.uniform.sample(&mut self.rng)) / self.samples_y as f32)
                .min(ONE_MINUS_EPSILON),
        }
    }
}

/// Scrambled (0,2)-sequence. Every 2-D pull is one point of the sequence,
/// with the scramble keyed on the pixel seed and the dimension pair, so
/// separate estimates decorrelate while each stays well stratified over the
/// sample index.
pub struct SobolSampler {
    seed: Seed,
    index: u32,
    dimension: u32,
}

impl SobolSampler {
    pub fn new(seed: Seed) -> Self {
        Self {
            seed,
            index: 0,
            dimension: 0,
        }
    }

    fn scrambles(&self, dimension: u32) -> (u32, u32) {
        let bits = self.seed.into_bits(dimension);
        (bits as u32, (bits >> 32) as u32)
    }
}

fn u32_to_unit_f32(v: u32) -> f32 {
    (v as f32 * 2.328_306_4e-10).min(ONE_MINUS_EPSILON)
}

fn van_der_corput(index: u32, scramble: u32) -> f32 {
    u32_to_unit_f32(index.reverse_bits() ^ scramble)
}

fn sobol_2(index: u32, scramble: u32) -> f32 {
    let mut v = 1u32 << 31;
    let mut r = scramble;
    let mut a = index;
    while a != 0 {
        if a & 1 != 0 {
            r ^= v;
        }
        a >>= 1;
        v ^= v >> 1;
    }
    u32_to_unit_f32(r)
}

impl Sampler for SobolSampler {
    fn start_sample(&mut self, sample_index: u32) {
        self.index = sample_index;
        self.dimension = 0;
    }

    fn start_dimension(&mut self, dimension: u32) {
        self.dimension = dimension;
    }

    fn get_1d(&mut self) -> f32 {
        let (sx, _) = self.scrambles(self.dimension);
        self.dimension += 1;
        van_der_corput(self.index, sx)
    }

    fn get_2d(&mut self) -> Vec2 {
        let (sx, sy) = self.scrambles(self.dimension);
        self.dimension += 2;
        Vec2::new(van_der_corput(self.index, sx), sobol_2(self.index, sy))
    }
}
