use std::path::Path;

use anyhow::Result;
use image::{Rgb32FImage, RgbImage};
use lumen::{color::Spectrum, film::Film};

fn to_srgb_image(image: &Rgb32FImage) -> RgbImage {
    let mut ldr = RgbImage::new(image.width(), image.height());
    for (x, y, pixel) in image.enumerate_pixels() {
        let srgb = Spectrum::from_array(pixel.0).to_srgb();
        ldr.put_pixel(x, y, image::Rgb(srgb.map(|c| (c * 255.0 + 0.5) as u8)));
    }
    ldr
}

/// Writes the developed film as linear EXR plus a tone-mapped PNG, under
/// `outdir/hdr/` and `outdir/ldr/`.
pub fn save_outputs(image: &Rgb32FImage, outdir: &Path) -> Result<()> {
    let hdr_dir = outdir.join("hdr");
    std::fs::create_dir_all(&hdr_dir)?;
    log::info!("Saving HDR image...");
    image.save(hdr_dir.join("color.exr"))?;

    let ldr_dir = outdir.join("ldr");
    std::fs::create_dir_all(&ldr_dir)?;
    log::info!("Saving LDR image...");
    to_srgb_image(image).save(ldr_dir.join("color.png"))?;

    Ok(())
}

/// Snapshot of an in-progress film, cheap enough to run mid-render.
pub fn save_preview(film: &Film, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    to_srgb_image(&film.develop()).save(path)?;
    Ok(())
}
