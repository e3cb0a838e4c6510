// Copyright (c) 2026 rezky_nightky

use std::f32::consts::{FRAC_PI_6, PI};

use rand::{Rng, RngCore};

use crate::canvas::{BlendMode, Canvas};
use crate::color::Rgb;
use crate::effect::{Effect, Point};
use crate::plume::{Plume, PlumeParams};

const FOG_COLOR: Rgb = Rgb::grey(200);

fn ash(rng: &mut dyn RngCore) -> Rgb {
    Rgb::grey(rng.random_range(120..=200))
}

/// Wide, slow cone that drifts both ways.
pub const SMOKE: PlumeParams = PlumeParams {
    per_tick: 6,
    heading: (-PI, -FRAC_PI_6),
    speed: (0.3, 1.0),
    lateral_scale: 0.4,
    vertical_scale: 0.4,
    jitter: (0.0, 0.0),
    radius: (6, 12),
    life: (90, 150),
    color: ash,
};

/// Rising smoke under a full-frame fog layer that breathes: its alpha and
/// horizontal offset both follow slow sines of the tick counter.
pub struct Fog {
    plume: Plume,
    tick: u64,
}

impl Fog {
    pub fn new(origin: Point) -> Self {
        Self {
            plume: Plume::new(origin, SMOKE),
            tick: 0,
        }
    }

    #[allow(dead_code)]
    pub fn origin(&self) -> Point {
        self.plume.origin()
    }

    pub fn set_origin(&mut self, origin: Point) {
        self.plume.set_origin(origin);
    }

    pub fn layer_alpha(&self) -> u8 {
        let t = self.tick as f32;
        (40.0 + 20.0 * (t * 0.01).sin()).round() as u8
    }

    pub fn layer_offset(&self) -> i32 {
        let t = self.tick as f32;
        (10.0 * (t * 0.003).sin()).round() as i32
    }
}

impl Effect for Fog {
    fn update(&mut self, rng: &mut dyn RngCore) {
        self.tick += 1;
        self.plume.tick(rng);
    }

    fn draw(&mut self, target: &mut Canvas, _pointer: Point) {
        self.plume.particles().draw(target);
        let (w, h) = (target.width(), target.height());
        target.fill_rect(
            self.layer_offset(),
            0,
            w,
            h,
            FOG_COLOR.with_alpha(self.layer_alpha()),
            BlendMode::Over,
        );
    }

    fn population(&self) -> usize {
        self.plume.particles().len()
    }
}
