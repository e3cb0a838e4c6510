// Copyright (c) 2026 rezky_nightky

//! Maps the effect canvas onto terminal cells. Each cell shows two stacked
//! canvas regions through the upper-half-block glyph: the top region is the
//! foreground color, the bottom one the background.

use crate::canvas::Canvas;
use crate::color::{shade_glyph, term_color, Rgb};
use crate::effect::Point;
use crate::frame::{Cell, Frame};
use crate::runtime::ColorMode;

const HALF_BLOCK: char = '▀';
const HUD_COLORS: [Rgb; 2] = [Rgb::new(230, 230, 230), Rgb::new(190, 200, 210)];
const HUD_LEFT: u16 = 1;

pub struct Presenter {
    color_mode: ColorMode,
}

/// Half-open span of canvas pixels covered by slot `i` of `slots`, never
/// empty while the canvas itself is not.
fn span(i: u32, slots: u32, extent: u32) -> (u32, u32) {
    let slots = slots.max(1) as u64;
    let lo = (i as u64 * extent as u64 / slots) as u32;
    let hi = ((i as u64 + 1) * extent as u64 / slots) as u32;
    let lo = lo.min(extent.saturating_sub(1));
    (lo, hi.max(lo + 1).min(extent.max(lo + 1)))
}

/// Box-filtered average of a canvas region, alpha ignored.
fn average(canvas: &Canvas, (x0, x1): (u32, u32), (y0, y1): (u32, u32)) -> Rgb {
    let (mut r, mut g, mut b, mut n) = (0u32, 0u32, 0u32, 0u32);
    for y in y0..y1 {
        for x in x0..x1 {
            if let Some(p) = canvas.pixel(x as i32, y as i32) {
                r += p.r as u32;
                g += p.g as u32;
                b += p.b as u32;
                n += 1;
            }
        }
    }
    if n == 0 {
        return Rgb::default();
    }
    Rgb::new((r / n) as u8, (g / n) as u8, (b / n) as u8)
}

impl Presenter {
    pub fn new(color_mode: ColorMode) -> Self {
        Self { color_mode }
    }

    pub fn render(&self, canvas: &Canvas, frame: &mut Frame) {
        let (cw, ch) = (canvas.width(), canvas.height());
        if cw == 0 || ch == 0 {
            return;
        }
        let rows = frame.height as u32 * 2;
        for cy in 0..frame.height {
            for cx in 0..frame.width {
                let xs = span(cx as u32, frame.width as u32, cw);
                let top = average(canvas, xs, span(cy as u32 * 2, rows, ch));
                let bottom = average(canvas, xs, span(cy as u32 * 2 + 1, rows, ch));
                frame.set(cx, cy, self.cell(top, bottom));
            }
        }
    }

    fn cell(&self, top: Rgb, bottom: Rgb) -> Cell {
        if self.color_mode == ColorMode::Mono {
            let mid = Rgb::new(
                ((top.r as u16 + bottom.r as u16) / 2) as u8,
                ((top.g as u16 + bottom.g as u16) / 2) as u8,
                ((top.b as u16 + bottom.b as u16) / 2) as u8,
            );
            return Cell {
                glyph: shade_glyph(mid),
                fg: None,
                bg: None,
            };
        }
        Cell {
            glyph: HALF_BLOCK,
            fg: term_color(top, self.color_mode),
            bg: term_color(bottom, self.color_mode),
        }
    }

    /// Write the HUD rows over the rendered frame, keeping each cell's
    /// background so the text sits on the scene.
    pub fn draw_hud(&self, frame: &mut Frame, lines: &[&str]) {
        for (row, (text, color)) in lines.iter().zip(HUD_COLORS).enumerate() {
            let y = row as u16;
            let fg = term_color(color, self.color_mode);
            for (i, glyph) in text.chars().enumerate() {
                let x = HUD_LEFT.saturating_add(i as u16);
                let Some(under) = frame.get(x, y) else {
                    break;
                };
                frame.set(x, y, Cell { glyph, fg, bg: under.bg });
            }
        }
    }
}

/// Canvas coordinate under the centre of terminal cell (`col`, `row`).
pub fn cell_to_canvas(col: u16, row: u16, frame: &Frame, canvas: &Canvas) -> Point {
    let sx = canvas.width() as f32 / frame.width.max(1) as f32;
    let sy = canvas.height() as f32 / frame.height.max(1) as f32;
    Point::new((col as f32 + 0.5) * sx, (row as f32 + 0.5) * sy)
}

#[cfg(test)]
mod tests {
    use crossterm::style::Color;

    use super::*;
    use crate::canvas::BlendMode;
    use crate::color::Rgba;

    fn split_canvas() -> Canvas {
        // Top half red, bottom half blue.
        let mut c = Canvas::filled(8, 8, Rgba::new(0, 0, 255, 255));
        c.fill_rect(0, 0, 8, 4, Rgba::new(255, 0, 0, 255), BlendMode::Replace);
        c
    }

    #[test]
    fn half_blocks_carry_top_and_bottom_colors() {
        let mut frame = Frame::new(4, 1);
        Presenter::new(ColorMode::TrueColor).render(&split_canvas(), &mut frame);
        let cell = frame.get(2, 0).unwrap();
        assert_eq!(cell.glyph, HALF_BLOCK);
        assert_eq!(cell.fg, Some(Color::Rgb { r: 255, g: 0, b: 0 }));
        assert_eq!(cell.bg, Some(Color::Rgb { r: 0, g: 0, b: 255 }));
    }

    #[test]
    fn mono_uses_shade_glyphs() {
        let mut frame = Frame::new(2, 2);
        let canvas = Canvas::filled(4, 4, Rgba::new(255, 255, 255, 255));
        Presenter::new(ColorMode::Mono).render(&canvas, &mut frame);
        let cell = frame.get(0, 0).unwrap();
        assert_eq!(cell.glyph, '█');
        assert_eq!(cell.fg, None);
    }

    #[test]
    fn canvas_smaller_than_terminal_still_fills_every_cell() {
        let mut frame = Frame::new(10, 10);
        let canvas = Canvas::filled(3, 3, Rgba::new(10, 20, 30, 255));
        Presenter::new(ColorMode::TrueColor).render(&canvas, &mut frame);
        let want = Some(Color::Rgb { r: 10, g: 20, b: 30 });
        for y in 0..10 {
            for x in 0..10 {
                assert_eq!(frame.get(x, y).unwrap().bg, want);
            }
        }
    }

    #[test]
    fn hud_text_keeps_scene_background() {
        let mut frame = Frame::new(20, 3);
        let p = Presenter::new(ColorMode::TrueColor);
        p.render(&split_canvas(), &mut frame);
        let bg = frame.get(1, 0).unwrap().bg;
        p.draw_hud(&mut frame, &["FIRE", "legend that is longer than the frame"]);
        let c = frame.get(1, 0).unwrap();
        assert_eq!(c.glyph, 'F');
        assert_eq!(c.bg, bg);
        assert_eq!(frame.get(19, 1).unwrap().glyph, 'g');
        assert_eq!(frame.get(5, 0).unwrap().glyph, HALF_BLOCK);
    }

    #[test]
    fn cell_centres_map_into_canvas_space() {
        let frame = Frame::new(96, 54);
        let canvas = Canvas::new(960, 540);
        assert_eq!(cell_to_canvas(0, 0, &frame, &canvas), Point::new(5.0, 5.0));
        assert_eq!(cell_to_canvas(48, 27, &frame, &canvas), Point::new(485.0, 275.0));
    }
}
