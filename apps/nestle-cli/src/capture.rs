use std::{fs::File, io::BufWriter, path::Path};

use anyhow::{Context, Result};
use nestle_core::ppu::{FrameBuffer, SCREEN_HEIGHT, SCREEN_WIDTH};

/// Saves `frame` as an 8-bit RGB PNG.
pub fn save_png(frame: &FrameBuffer, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), SCREEN_WIDTH as u32, SCREEN_HEIGHT as u32);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&frame.to_rgb_bytes())?;
    writer.finish()?;
    Ok(())
}
