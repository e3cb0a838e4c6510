// Copyright (c) 2026 rezky_nightky

//! RGBA8 drawing surface and the blend contracts every effect composites
//! through.
//!
//! Coordinates are in canvas pixels. Every primitive clips against the
//! canvas bounds, so callers may pass positions outside the visible area.

use crate::color::Rgba;

/// How a source pixel combines with the destination pixel. Channel math is
/// done in 0..=255 with `a = src.a / 255`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendMode {
    /// `dst = src`.
    Replace,
    /// Standard alpha compositing.
    Over,
    /// Additive light: `dst.rgb + src.rgb * a`, saturating.
    Add,
    /// `src.rgb + dst.rgb * (1 - a)`; the source is taken as already
    /// multiplied by its alpha.
    Premultiplied,
    /// Channel-wise saturating `dst - src`, alpha included.
    Subtract,
}

#[inline]
fn mul255(v: u8, a: u8) -> u16 {
    (v as u16 * a as u16 + 127) / 255
}

#[inline]
fn sat(v: u16) -> u8 {
    v.min(255) as u8
}

pub fn blend(dst: Rgba, src: Rgba, mode: BlendMode) -> Rgba {
    match mode {
        BlendMode::Replace => src,
        BlendMode::Over => {
            if src.a == 255 {
                return src;
            }
            if src.a == 0 {
                return dst;
            }
            let inv = 255 - src.a;
            Rgba::new(
                sat(mul255(src.r, src.a) + mul255(dst.r, inv)),
                sat(mul255(src.g, src.a) + mul255(dst.g, inv)),
                sat(mul255(src.b, src.a) + mul255(dst.b, inv)),
                sat(src.a as u16 + mul255(dst.a, inv)),
            )
        }
        BlendMode::Add => Rgba::new(
            sat(dst.r as u16 + mul255(src.r, src.a)),
            sat(dst.g as u16 + mul255(src.g, src.a)),
            sat(dst.b as u16 + mul255(src.b, src.a)),
            sat(dst.a as u16 + src.a as u16),
        ),
        BlendMode::Premultiplied => {
            let inv = 255 - src.a;
            Rgba::new(
                sat(src.r as u16 + mul255(dst.r, inv)),
                sat(src.g as u16 + mul255(dst.g, inv)),
                sat(src.b as u16 + mul255(dst.b, inv)),
                sat(src.a as u16 + mul255(dst.a, inv)),
            )
        }
        BlendMode::Subtract => Rgba::new(
            dst.r.saturating_sub(src.r),
            dst.g.saturating_sub(src.g),
            dst.b.saturating_sub(src.b),
            dst.a.saturating_sub(src.a),
        ),
    }
}

#[derive(Clone, Debug)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl Canvas {
    /// Fully transparent canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Rgba::TRANSPARENT)
    }

    pub fn filled(width: u32, height: u32, color: Rgba) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[allow(dead_code)]
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgba> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    pub fn put(&mut self, x: i32, y: i32, color: Rgba, mode: BlendMode) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = blend(self.pixels[i], color, mode);
        }
    }

    /// Overwrite with `src`, which must have the same dimensions; a size
    /// mismatch copies the overlapping region.
    pub fn copy_from(&mut self, src: &Canvas) {
        if src.width == self.width && src.height == self.height {
            self.pixels.copy_from_slice(&src.pixels);
        } else {
            self.composite(src, 0, 0, BlendMode::Replace);
        }
    }

    pub fn fill(&mut self, color: Rgba, mode: BlendMode) {
        if mode == BlendMode::Replace {
            self.pixels.fill(color);
            return;
        }
        for p in &mut self.pixels {
            *p = blend(*p, color, mode);
        }
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Rgba, mode: BlendMode) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x as i64 + w as i64).min(self.width as i64) as i32;
        let y1 = (y as i64 + h as i64).min(self.height as i64) as i32;
        if x0 >= x1 || y0 >= y1 {
            return;
        }
        let stride = self.width as usize;
        for yy in y0..y1 {
            let row = yy as usize * stride;
            for p in &mut self.pixels[row + x0 as usize..row + x1 as usize] {
                *p = blend(*p, color, mode);
            }
        }
    }

    /// Filled disc: pixel (px, py) is covered when
    /// `(px - cx)^2 + (py - cy)^2 <= r^2`.
    pub fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgba, mode: BlendMode) {
        if !(radius >= 0.0) {
            return;
        }
        let r2 = radius * radius;
        let (x0, x1) = self.clip_span(cx - radius, cx + radius, self.width);
        let (y0, y1) = self.clip_span(cy - radius, cy + radius, self.height);
        let stride = self.width as usize;
        for py in y0..y1 {
            let dy = py as f32 - cy;
            let row = py as usize * stride;
            for px in x0..x1 {
                let dx = px as f32 - cx;
                if dx * dx + dy * dy <= r2 {
                    let i = row + px as usize;
                    self.pixels[i] = blend(self.pixels[i], color, mode);
                }
            }
        }
    }

    /// Thick line: pixels whose distance to the segment `a..b` is at most
    /// `width / 2`.
    pub fn stroke_segment(
        &mut self,
        a: (f32, f32),
        b: (f32, f32),
        width: f32,
        color: Rgba,
        mode: BlendMode,
    ) {
        let half = (width * 0.5).max(0.5);
        let (x0, x1) = self.clip_span(a.0.min(b.0) - half, a.0.max(b.0) + half, self.width);
        let (y0, y1) = self.clip_span(a.1.min(b.1) - half, a.1.max(b.1) + half, self.height);
        let (ex, ey) = (b.0 - a.0, b.1 - a.1);
        let len2 = ex * ex + ey * ey;
        let half2 = half * half;
        let stride = self.width as usize;

        for py in y0..y1 {
            for px in x0..x1 {
                let (qx, qy) = (px as f32 - a.0, py as f32 - a.1);
                let t = if len2 > 0.0 {
                    ((qx * ex + qy * ey) / len2).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let (dx, dy) = (qx - ex * t, qy - ey * t);
                if dx * dx + dy * dy <= half2 {
                    let i = py as usize * stride + px as usize;
                    self.pixels[i] = blend(self.pixels[i], color, mode);
                }
            }
        }
    }

    /// Connected segments through `points`. With blending modes other than
    /// `Replace`, joints are covered twice.
    pub fn stroke_polyline(&mut self, points: &[(f32, f32)], width: f32, color: Rgba, mode: BlendMode) {
        for pair in points.windows(2) {
            self.stroke_segment(pair[0], pair[1], width, color, mode);
        }
    }

    /// Blit `src` with its top-left corner at (`dx`, `dy`).
    pub fn composite(&mut self, src: &Canvas, dx: i32, dy: i32, mode: BlendMode) {
        let x0 = dx.max(0);
        let y0 = dy.max(0);
        let x1 = (dx as i64 + src.width as i64).min(self.width as i64) as i32;
        let y1 = (dy as i64 + src.height as i64).min(self.height as i64) as i32;
        if x0 >= x1 || y0 >= y1 {
            return;
        }
        let stride = self.width as usize;
        let src_stride = src.width as usize;
        for y in y0..y1 {
            let sy = (y - dy) as usize;
            for x in x0..x1 {
                let sx = (x - dx) as usize;
                let s = src.pixels[sy * src_stride + sx];
                let i = y as usize * stride + x as usize;
                self.pixels[i] = blend(self.pixels[i], s, mode);
            }
        }
    }

    fn clip_span(&self, lo: f32, hi: f32, limit: u32) -> (i32, i32) {
        let lo = lo.floor().max(0.0);
        let hi = (hi.ceil() + 1.0).min(limit as f32);
        if !(lo < hi) {
            return (0, 0);
        }
        (lo as i32, hi as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba = Rgba::new(255, 0, 0, 255);

    #[test]
    fn over_with_half_alpha_mixes_evenly() {
        let out = blend(
            Rgba::new(0, 0, 0, 255),
            Rgba::new(200, 100, 0, 128),
            BlendMode::Over,
        );
        assert!((99..=101).contains(&out.r), "r={}", out.r);
        assert!((49..=51).contains(&out.g), "g={}", out.g);
        assert_eq!(out.a, 255);
    }

    #[test]
    fn add_saturates_and_scales_by_alpha() {
        let out = blend(
            Rgba::new(250, 10, 0, 255),
            Rgba::new(255, 255, 255, 51),
            BlendMode::Add,
        );
        assert_eq!(out.r, 255);
        assert_eq!(out.g, 61);
        assert_eq!(out.b, 51);
    }

    #[test]
    fn premultiplied_adds_source_unscaled() {
        let out = blend(
            Rgba::new(100, 100, 100, 255),
            Rgba::new(50, 0, 0, 0),
            BlendMode::Premultiplied,
        );
        assert_eq!(out, Rgba::new(150, 100, 100, 255));
    }

    #[test]
    fn subtract_clears_alpha_channel() {
        let out = blend(
            Rgba::new(0, 0, 0, 210),
            Rgba::new(0, 0, 0, 210),
            BlendMode::Subtract,
        );
        assert_eq!(out, Rgba::TRANSPARENT);
    }

    #[test]
    fn circle_covers_center_and_respects_radius() {
        let mut c = Canvas::new(20, 20);
        c.fill_circle(10.0, 10.0, 3.0, RED, BlendMode::Replace);
        assert_eq!(c.pixel(10, 10), Some(RED));
        assert_eq!(c.pixel(13, 10), Some(RED));
        assert_eq!(c.pixel(13, 13), Some(Rgba::TRANSPARENT));
        assert_eq!(c.pixel(14, 10), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn drawing_off_canvas_is_clipped() {
        let mut c = Canvas::new(8, 8);
        c.fill_circle(-50.0, -50.0, 10.0, RED, BlendMode::Over);
        c.fill_rect(-4, -4, 6, 6, RED, BlendMode::Replace);
        c.stroke_segment((-10.0, 100.0), (100.0, 100.0), 4.0, RED, BlendMode::Over);
        assert_eq!(c.pixel(1, 1), Some(RED));
        assert_eq!(c.pixel(2, 2), Some(Rgba::TRANSPARENT));
        assert_eq!(c.pixel(8, 0), None);
    }

    #[test]
    fn segment_covers_pixels_within_half_width() {
        let mut c = Canvas::new(32, 16);
        c.stroke_segment((2.0, 8.0), (28.0, 8.0), 4.0, RED, BlendMode::Replace);
        assert_eq!(c.pixel(15, 8), Some(RED));
        assert_eq!(c.pixel(15, 10), Some(RED));
        assert_eq!(c.pixel(15, 11), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn composite_respects_offset() {
        let mut dst = Canvas::filled(6, 6, Rgba::new(0, 0, 0, 255));
        let src = Canvas::filled(2, 2, RED);
        dst.composite(&src, 4, 4, BlendMode::Over);
        assert_eq!(dst.pixel(5, 5), Some(RED));
        assert_eq!(dst.pixel(3, 3), Some(Rgba::new(0, 0, 0, 255)));
    }
}
