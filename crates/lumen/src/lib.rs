pub mod bidir;
pub mod camera;
pub mod color;
pub mod film;
pub mod filter;
pub mod integrators;
pub mod light;
pub mod material;
pub mod math;
pub mod memory;
pub mod ray;
pub mod sampler;
pub mod scattering;
pub mod scene;
pub mod shape;
pub mod utils;

use std::path::PathBuf;

pub use rand_xoshiro::Xoshiro256StarStar as Rng;

/// Seeding record for per-pixel sampler construction.
///
/// All randomness used while rendering derives from a `Seed`, so two renders
/// sharing worker seeds (and a single worker) replay the same sample stream.
#[derive(Debug, Copy, Clone, Hash)]
pub struct Seed {
    pub seed: u64,
    pub x: u32,
    pub y: u32,
}

impl Seed {
    pub fn into_rng(self, salt: u32) -> Rng {
        <Rng as rand::SeedableRng>::seed_from_u64(self.into_bits(salt))
    }

    pub fn into_bits(self, salt: u32) -> u64 {
        let mut hasher = std::hash::DefaultHasher::new();
        std::hash::Hash::hash(&self, &mut hasher);
        std::hash::Hash::hash(&salt, &mut hasher);
        std::hash::Hasher::finish(&hasher)
    }
}

/// Setup-phase failures. The per-sample rendering path never returns one of
/// these: conditions it cannot resolve become a zero contribution instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("scene must be committed before rendering")]
    SceneUnready,

    #[error("cannot load image {}", path.display())]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
