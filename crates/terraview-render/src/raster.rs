//! Primitive rasterization into a framebuffer viewport.
//!
//! Coordinates are framebuffer pixels. Every primitive is clipped to the
//! viewport, so callers never need to bounds-check.

use terraview_math::Rgb;

use crate::framebuffer::{Framebuffer, Viewport};

/// Fill a triangle using pixel-center sampling over its clipped bounding box.
/// Either winding is accepted.
pub fn fill_triangle(fb: &mut Framebuffer, viewport: Viewport, pts: [(f64, f64); 3], color: Rgb) {
    let vp = viewport.clipped_to(fb.width, fb.height);
    if vp.is_empty() {
        return;
    }
    let [a, b, c] = pts;
    let area = edge(a, b, c);
    if area.abs() < 1e-12 {
        draw_thick_line(fb, viewport, [a, b], 1, color);
        draw_thick_line(fb, viewport, [b, c], 1, color);
        return;
    }

    let min_x = a.0.min(b.0).min(c.0).floor().max(vp.x as f64) as i64;
    let max_x = a.0.max(b.0).max(c.0).ceil().min((vp.x + vp.width) as f64) as i64;
    let min_y = a.1.min(b.1).min(c.1).floor().max(vp.y as f64) as i64;
    let max_y = a.1.max(b.1).max(c.1).ceil().min((vp.y + vp.height) as f64) as i64;

    for y in min_y..max_y {
        let py = y as f64 + 0.5;
        for x in min_x..max_x {
            let p = (x as f64 + 0.5, py);
            let w0 = edge(b, c, p);
            let w1 = edge(c, a, p);
            let w2 = edge(a, b, p);
            let inside = if area > 0.0 {
                w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0
            } else {
                w0 <= 0.0 && w1 <= 0.0 && w2 <= 0.0
            };
            if inside {
                fb.set_pixel(x, y, color);
            }
        }
    }
}

/// Draw a line of `thickness` pixels between two points.
pub fn draw_thick_line(
    fb: &mut Framebuffer,
    viewport: Viewport,
    pts: [(f64, f64); 2],
    thickness: u32,
    color: Rgb,
) {
    let vp = viewport.clipped_to(fb.width, fb.height);
    if vp.is_empty() {
        return;
    }
    let [(x0, y0), (x1, y1)] = pts;
    let steps = (x1 - x0).abs().max((y1 - y0).abs()).ceil().max(1.0) as usize;
    let half = thickness.max(1) as i64 / 2;
    let span = thickness.max(1) as i64;

    for s in 0..=steps {
        let t = s as f64 / steps as f64;
        let cx = (x0 + (x1 - x0) * t).floor() as i64 - half;
        let cy = (y0 + (y1 - y0) * t).floor() as i64 - half;
        for dy in 0..span {
            for dx in 0..span {
                plot(fb, vp, cx + dx, cy + dy, color);
            }
        }
    }
}

/// Draw a single pixel.
pub fn draw_dot(fb: &mut Framebuffer, viewport: Viewport, pt: (f64, f64), color: Rgb) {
    let vp = viewport.clipped_to(fb.width, fb.height);
    plot(fb, vp, pt.0.floor() as i64, pt.1.floor() as i64, color);
}

fn plot(fb: &mut Framebuffer, vp: Viewport, x: i64, y: i64, color: Rgb) {
    let inside = x >= vp.x as i64
        && y >= vp.y as i64
        && x < (vp.x + vp.width) as i64
        && y < (vp.y + vp.height) as i64;
    if inside {
        fb.set_pixel(x, y, color);
    }
}

fn edge(a: (f64, f64), b: (f64, f64), p: (f64, f64)) -> f64 {
    (b.0 - a.0) * (p.1 - a.1) - (b.1 - a.1) * (p.0 - a.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb = Rgb::new(255, 0, 0);

    fn count(fb: &Framebuffer, color: Rgb) -> usize {
        fb.pixels
            .chunks_exact(4)
            .filter(|p| p[0] == color.r && p[1] == color.g && p[2] == color.b)
            .count()
    }

    #[test]
    fn test_fill_covers_interior_in_both_windings() {
        for pts in [
            [(1.0, 1.0), (9.0, 1.0), (1.0, 9.0)],
            [(1.0, 1.0), (1.0, 9.0), (9.0, 1.0)],
        ] {
            let mut fb = Framebuffer::new(10, 10);
            let vp = fb.full_viewport();
            fill_triangle(&mut fb, vp, pts, RED);
            assert_eq!(fb.pixel(2, 2), Some(RED));
            assert_eq!(fb.pixel(8, 8), Some(Rgb::BLACK));
            // Half of the 8x8 square, give or take the diagonal.
            let n = count(&fb, RED);
            assert!((28..=40).contains(&n), "filled {n}");
        }
    }

    #[test]
    fn test_fill_is_clipped_to_viewport() {
        let mut fb = Framebuffer::new(20, 20);
        let vp = Viewport::new(0, 0, 10, 10);
        fill_triangle(&mut fb, vp, [(-50.0, -50.0), (80.0, -50.0), (-50.0, 80.0)], RED);
        assert_eq!(count(&fb, RED), 100);
        assert_eq!(fb.pixel(10, 0), Some(Rgb::BLACK));
    }

    #[test]
    fn test_line_thickness() {
        let mut fb = Framebuffer::new(20, 20);
        let vp = fb.full_viewport();
        draw_thick_line(&mut fb, vp, [(2.0, 10.0), (17.0, 10.0)], 3, RED);
        assert_eq!(fb.pixel(10, 9), Some(RED));
        assert_eq!(fb.pixel(10, 11), Some(RED));
        assert_eq!(fb.pixel(10, 13), Some(Rgb::BLACK));
    }

    #[test]
    fn test_dot_outside_viewport_is_ignored() {
        let mut fb = Framebuffer::new(10, 10);
        let vp = Viewport::new(0, 0, 5, 5);
        draw_dot(&mut fb, vp, (7.0, 7.0), RED);
        assert_eq!(count(&fb, RED), 0);
        draw_dot(&mut fb, vp, (2.2, 3.9), RED);
        assert_eq!(fb.pixel(2, 3), Some(RED));
    }
}
