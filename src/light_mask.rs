// Copyright (c) 2026 rezky_nightky

use rand::RngCore;

use crate::canvas::{BlendMode, Canvas};
use crate::color::{Rgb, Rgba};
use crate::effect::{Effect, Point};

pub const MIN_RADIUS: u32 = 8;
pub const MAX_RADIUS: u32 = 1000;
pub const DEFAULT_RADIUS: u32 = 120;

const BACKDROP: Rgb = Rgb::new(40, 60, 80);
pub const DARKNESS_ALPHA: u8 = 210;
const HALO_TINT: Rgb = Rgb::new(255, 255, 200);
const HALO_PEAK_ALPHA: f32 = 80.0;
const HALO_RING_STEP: usize = 8;

/// Flashlight: a dark overlay with a fully transparent hole around the
/// pointer, softened by an additive halo. Nothing is simulated per tick.
pub struct LightMask {
    radius: u32,
    darkness: Canvas,
    halo: Canvas,
}

impl LightMask {
    pub fn new(radius: u32) -> Self {
        let mut mask = Self {
            radius: DEFAULT_RADIUS,
            darkness: Canvas::new(0, 0),
            halo: Canvas::new(0, 0),
        };
        mask.set_radius(radius);
        mask
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    pub fn set_radius(&mut self, radius: u32) {
        let radius = radius.clamp(MIN_RADIUS, MAX_RADIUS);
        if radius != self.radius {
            log::debug!("light radius {} -> {}", self.radius, radius);
        }
        self.radius = radius;
        self.rebuild_halo();
    }

    /// Rings from the rim inwards; each smaller ring overwrites the centre
    /// of the previous one with a higher alpha, so alpha falls off linearly
    /// from the centre out to zero at the rim.
    fn rebuild_halo(&mut self) {
        let r = self.radius;
        let side = r * 2 + 2;
        self.halo = Canvas::new(side, side);
        let c = r as f32;
        for ring in (1..=r).rev().step_by(HALO_RING_STEP) {
            let alpha = (HALO_PEAK_ALPHA * (1.0 - ring as f32 / r as f32)) as u8;
            self.halo
                .fill_circle(c, c, ring as f32, HALO_TINT.with_alpha(alpha), BlendMode::Replace);
        }
    }

    /// The darkness overlay for a `width`×`height` frame with the hole
    /// centred on `pointer`.
    pub fn darkness(&mut self, width: u32, height: u32, pointer: Point) -> &Canvas {
        let dark = Rgba::new(0, 0, 0, DARKNESS_ALPHA);
        if self.darkness.width() != width || self.darkness.height() != height {
            self.darkness = Canvas::filled(width, height, dark);
        } else {
            self.darkness.fill(dark, BlendMode::Replace);
        }
        self.darkness.fill_circle(
            pointer.x,
            pointer.y,
            self.radius as f32,
            dark,
            BlendMode::Subtract,
        );
        &self.darkness
    }
}

impl Effect for LightMask {
    fn update(&mut self, _rng: &mut dyn RngCore) {}

    fn draw(&mut self, target: &mut Canvas, pointer: Point) {
        target.fill(BACKDROP.with_alpha(255), BlendMode::Replace);
        let (w, h) = (target.width(), target.height());
        self.darkness(w, h, pointer);
        target.composite(&self.darkness, 0, 0, BlendMode::Over);

        let r = self.radius as i32;
        target.composite(
            &self.halo,
            pointer.x.round() as i32 - r,
            pointer.y.round() as i32 - r,
            BlendMode::Add,
        );
    }
}
