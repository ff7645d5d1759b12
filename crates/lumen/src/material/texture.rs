use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use glam::Vec2;
use image::Rgb32FImage;

use crate::{color::Spectrum, Error};

pub trait Texture: Send + Sync {
    fn eval(&self, uv: Vec2) -> Spectrum;
}

pub struct ConstantTexture(pub Spectrum);

impl Texture for ConstantTexture {
    fn eval(&self, _uv: Vec2) -> Spectrum {
        self.0
    }
}

/// Nearest-neighbor lookup into a linear-light image, `v` growing upward.
pub struct ImageTexture {
    pub image: Arc<Rgb32FImage>,
    pub scale: Spectrum,
}

impl Texture for ImageTexture {
    fn eval(&self, uv: Vec2) -> Spectrum {
        let (w, h) = self.image.dimensions();
        let x = ((uv.x.rem_euclid(1.0) * w as f32) as u32).min(w - 1);
        let y = (((1.0 - uv.y).rem_euclid(1.0) * h as f32) as u32).min(h - 1);
        self.scale * Spectrum::from_array(self.image.get_pixel(x, y).0)
    }
}

/// Decoded-image store, memoized by path. Built while the scene is
/// assembled and dropped with it; nothing here is process-global, so two
/// scenes never share (or fight over) cached pixels.
#[derive(Default)]
pub struct TextureCache {
    images: HashMap<PathBuf, Arc<Rgb32FImage>>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads and linearizes an image, reusing the decoded copy on repeated
    /// paths. Failures are fatal to scene setup, never deferred to render
    /// time.
    pub fn load(&mut self, path: &Path) -> Result<Arc<Rgb32FImage>, Error> {
        if let Some(image) = self.images.get(path) {
            return Ok(image.clone());
        }

        log::info!("loading {}", path.display());
        let decoded = image::open(path).map_err(|source| Error::ImageLoad {
            path: path.to_owned(),
            source,
        })?;
        let mut rgb = decoded.to_rgb32f();
        // 8-bit sources arrive gamma encoded; shading wants linear light.
        for p in rgb.pixels_mut() {
            p.0 = p.0.map(|c| c.powf(2.2));
        }

        let image = Arc::new(rgb);
        self.images.insert(path.to_owned(), image.clone());
        Ok(image)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn clear(&mut self) {
        self.images.clear();
    }
}
