//! PNG output of rendered frames.

use std::io::Cursor;
use std::path::Path;

use terraview_render::Framebuffer;

use crate::error::AppError;

/// `frame_0007.png` for frame 7.
pub fn frame_file_name(frame: u64) -> String {
    format!("frame_{frame:04}.png")
}

/// Encode the framebuffer as an 8-bit RGBA PNG.
pub fn encode_png(fb: &Framebuffer) -> Result<Vec<u8>, AppError> {
    let mut png_buf = Vec::new();
    {
        let mut encoder = png::Encoder::new(Cursor::new(&mut png_buf), fb.width, fb.height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&fb.pixels)?;
    }
    Ok(png_buf)
}

/// Encode and write the framebuffer to `path`, creating parent directories.
pub fn write_png(path: &Path, fb: &Framebuffer) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| AppError::io(parent, e))?;
    }
    let bytes = encode_png(fb)?;
    std::fs::write(path, bytes).map_err(|e| AppError::io(path, e))
}
