// Copyright (c) 2026 rezky_nightky

use rand::RngCore;

use crate::canvas::Canvas;

/// Canvas-space position, usually the pointer.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<Point> for (f32, f32) {
    fn from(p: Point) -> Self {
        (p.x, p.y)
    }
}

/// One selectable visual effect. The scene calls `update` then `draw`
/// exactly once per tick, and only on the active effect.
pub trait Effect {
    /// Advance procedural state by one tick. All randomness comes from `rng`.
    fn update(&mut self, rng: &mut dyn RngCore);

    /// Composite the current state onto `target`.
    fn draw(&mut self, target: &mut Canvas, pointer: Point);

    /// Live particle count, for stats.
    fn population(&self) -> usize {
        0
    }
}
