//! An RGBA8 framebuffer and the viewport rectangles drawn into it.

use terraview_math::Rgb;

/// A rectangle of the framebuffer, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// The part of this viewport that lies inside a `width` x `height` target.
    pub fn clipped_to(&self, width: u32, height: u32) -> Viewport {
        let x = self.x.min(width);
        let y = self.y.min(height);
        let right = self.x.saturating_add(self.width).min(width);
        let bottom = self.y.saturating_add(self.height).min(height);
        Viewport::new(x, y, right - x, bottom - y)
    }
}

/// Row-major RGBA pixels. Writes outside the buffer are ignored.
#[derive(Clone, Debug)]
pub struct Framebuffer {
    pub width: u32,
    pub height: u32,
    /// Length = `width * height * 4`.
    pub pixels: Vec<u8>,
}

impl Framebuffer {
    /// A black, opaque framebuffer.
    pub fn new(width: u32, height: u32) -> Self {
        let mut pixels = vec![0; width as usize * height as usize * 4];
        for alpha in pixels.iter_mut().skip(3).step_by(4) {
            *alpha = 255;
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Viewport covering the whole buffer.
    pub fn full_viewport(&self) -> Viewport {
        Viewport::new(0, 0, self.width, self.height)
    }

    fn offset(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * 4)
    }

    pub fn set_pixel(&mut self, x: i64, y: i64, color: Rgb) {
        if let Some(idx) = self.offset(x, y) {
            self.pixels[idx] = color.r;
            self.pixels[idx + 1] = color.g;
            self.pixels[idx + 2] = color.b;
            self.pixels[idx + 3] = 255;
        }
    }

    pub fn pixel(&self, x: i64, y: i64) -> Option<Rgb> {
        self.offset(x, y)
            .map(|idx| Rgb::new(self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2]))
    }

    /// Fill `viewport` (clipped to the buffer) with one color.
    pub fn fill(&mut self, viewport: Viewport, color: Rgb) {
        let vp = viewport.clipped_to(self.width, self.height);
        for y in vp.y..vp.y + vp.height {
            for x in vp.x..vp.x + vp.width {
                self.set_pixel(x as i64, y as i64, color);
            }
        }
    }

    /// Fill `viewport` with a vertical gradient from `top` to `bottom`.
    pub fn fill_vertical_gradient(&mut self, viewport: Viewport, top: Rgb, bottom: Rgb) {
        let vp = viewport.clipped_to(self.width, self.height);
        let span = vp.height.saturating_sub(1).max(1) as f64;
        for row in 0..vp.height {
            let color = top.lerp(bottom, row as f64 / span);
            for x in vp.x..vp.x + vp.width {
                self.set_pixel(x as i64, (vp.y + row) as i64, color);
            }
        }
    }

    /// Number of distinct RGB values in the buffer.
    pub fn unique_color_count(&self) -> usize {
        let mut colors = rustc_hash::FxHashSet::default();
        for chunk in self.pixels.chunks_exact(4) {
            colors.insert((chunk[0], chunk[1], chunk[2]));
        }
        colors.len()
    }
}
