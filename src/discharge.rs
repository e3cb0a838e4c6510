// Copyright (c) 2026 rezky_nightky

use rand::{Rng, RngCore};

use crate::canvas::{BlendMode, Canvas};
use crate::color::{Rgb, Rgba};
use crate::effect::{Effect, Point};

pub const DEFAULT_SEGMENTS: usize = 20;
const REBUILD_JITTER: i32 = 12;
const FLICKER_JITTER: i32 = 1;

const GLOW: Rgb = Rgb::new(100, 180, 255);
/// (width, alpha), widest and faintest first.
const GLOW_PASSES: [(f32, u8); 3] = [(8.0, 40), (5.0, 80), (3.0, 130)];
const CORE_WIDTH: f32 = 2.0;

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Zig-zag bolt between two fixed endpoints.
///
/// `rebuild` regenerates the path from the straight line; `flicker` nudges
/// the interior points of the existing path so it trembles without jumping.
pub struct Discharge {
    start: Point,
    end: Point,
    segments: usize,
    path: Vec<Point>,
    glow: Canvas,
}

impl Discharge {
    /// Starts with the straight line; call `rebuild` for a jittered path.
    pub fn new(start: Point, end: Point, segments: usize) -> Self {
        Self {
            start,
            end,
            segments: segments.max(1),
            path: vec![start, end],
            glow: Canvas::new(0, 0),
        }
    }

    #[allow(dead_code)]
    pub fn path(&self) -> &[Point] {
        &self.path
    }

    #[allow(dead_code)]
    pub fn start(&self) -> Point {
        self.start
    }

    #[allow(dead_code)]
    pub fn end(&self) -> Point {
        self.end
    }

    pub fn rebuild(&mut self, rng: &mut dyn RngCore) {
        let mut points = Vec::with_capacity(self.segments + 1);
        points.push(self.start);
        for i in 1..self.segments {
            let t = i as f32 / self.segments as f32;
            let jx = rng.random_range(-REBUILD_JITTER..=REBUILD_JITTER) as f32;
            let jy = rng.random_range(-REBUILD_JITTER..=REBUILD_JITTER) as f32;
            points.push(Point::new(
                lerp(self.start.x, self.end.x, t) + jx,
                lerp(self.start.y, self.end.y, t) + jy,
            ));
        }
        points.push(self.end);
        self.path = points;
        log::debug!(
            "discharge rebuilt: {} points from ({:.0},{:.0}) to ({:.0},{:.0})",
            self.path.len(),
            self.start.x,
            self.start.y,
            self.end.x,
            self.end.y
        );
    }

    pub fn flicker(&mut self, rng: &mut dyn RngCore) {
        let n = self.path.len();
        if n <= 2 {
            return;
        }
        for p in &mut self.path[1..n - 1] {
            p.x += rng.random_range(-FLICKER_JITTER..=FLICKER_JITTER) as f32;
            p.y += rng.random_range(-FLICKER_JITTER..=FLICKER_JITTER) as f32;
        }
    }

    pub fn set_endpoints(&mut self, start: Point, end: Point, rng: &mut dyn RngCore) {
        self.start = start;
        self.end = end;
        self.rebuild(rng);
    }

    /// Move only the end point; the start stays put.
    pub fn set_end(&mut self, end: Point, rng: &mut dyn RngCore) {
        self.set_endpoints(self.start, end, rng);
    }
}

impl Effect for Discharge {
    fn update(&mut self, rng: &mut dyn RngCore) {
        self.flicker(rng);
    }

    fn draw(&mut self, target: &mut Canvas, _pointer: Point) {
        let (w, h) = (target.width(), target.height());
        if self.glow.width() != w || self.glow.height() != h {
            self.glow = Canvas::new(w, h);
        } else {
            self.glow.fill(Rgba::TRANSPARENT, BlendMode::Replace);
        }

        let points: Vec<(f32, f32)> = self.path.iter().map(|&p| p.into()).collect();
        // Later passes overwrite earlier ones, so the centre of the bolt
        // carries the strongest alpha.
        for (width, alpha) in GLOW_PASSES {
            self.glow
                .stroke_polyline(&points, width, GLOW.with_alpha(alpha), BlendMode::Replace);
        }
        target.composite(&self.glow, 0, 0, BlendMode::Over);
        target.stroke_polyline(
            &points,
            CORE_WIDTH,
            Rgb::grey(255).with_alpha(255),
            BlendMode::Over,
        );
    }
}
