// Copyright (c) 2026 rezky_nightky

use std::num::NonZeroU32;

use rand::{Rng, RngCore};

use crate::canvas::{BlendMode, Canvas};
use crate::color::{lerp_u8, Rgb};
use crate::effect::{Effect, Point};
use crate::particle::{Particle, ParticleSystem};

const BASE: Rgb = Rgb::new(12, 30, 60);
const SHALLOW: Rgb = Rgb::new(20, 60, 110);
const DEEP: Rgb = Rgb::new(20, 150, 230);
const BUBBLE: Rgb = Rgb::new(160, 200, 255);

pub const ROWS: u32 = 30;
const ROW_THICKNESS: u32 = 4;
const BUBBLES_PER_TICK: usize = 3;

/// Rippling water: horizontal bands displaced by a sine of the running phase
/// and their row index, with bubbles rising from the bottom.
pub struct Fluid {
    width: u32,
    height: u32,
    phase: u64,
    bubbles: ParticleSystem,
}

impl Fluid {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            phase: 0,
            bubbles: ParticleSystem::new(),
        }
    }

    #[allow(dead_code)]
    pub fn phase(&self) -> u64 {
        self.phase
    }

    /// Horizontal displacement of band `row` at the current phase.
    pub fn row_offset(&self, row: u32) -> i32 {
        let t = self.phase as f32;
        let i = row as f32;
        let amp = 8.0 + 6.0 * (t * 0.02 + i * 0.4).sin();
        (amp * (t * 0.05 + i).sin()) as i32
    }

    pub fn row_color(row: u32) -> Rgb {
        let t = row as f32 / ROWS as f32;
        Rgb::new(
            lerp_u8(SHALLOW.r, DEEP.r, t),
            lerp_u8(SHALLOW.g, DEEP.g, t),
            lerp_u8(SHALLOW.b, DEEP.b, t),
        )
    }

    fn spawn_bubble(&self, rng: &mut dyn RngCore) -> Particle {
        let x = rng.random_range(0..=self.width) as f32;
        let bottom = self.height as i64;
        let y = rng.random_range((bottom - 60)..=(bottom - 10)) as f32;
        let vel = (rng.random_range(-0.2..=0.2), rng.random_range(-0.8..=-0.3));
        let radius = rng.random_range(2..=5) as f32;
        let life = NonZeroU32::new(rng.random_range(60..=120)).unwrap_or(NonZeroU32::MIN);
        Particle::new((x, y), vel, radius, life, BUBBLE)
    }
}

impl Effect for Fluid {
    fn update(&mut self, rng: &mut dyn RngCore) {
        self.phase += 1;
        for _ in 0..BUBBLES_PER_TICK {
            let b = self.spawn_bubble(rng);
            self.bubbles.emit(b);
        }
        self.bubbles.update();
    }

    fn draw(&mut self, target: &mut Canvas, _pointer: Point) {
        target.fill(BASE.with_alpha(255), BlendMode::Replace);
        let (w, h) = (target.width(), target.height());
        for row in 0..ROWS {
            let y = (h as u64 * row as u64 / ROWS as u64) as i32;
            target.fill_rect(
                self.row_offset(row),
                y,
                w,
                ROW_THICKNESS,
                Self::row_color(row).with_alpha(255),
                BlendMode::Replace,
            );
        }
        self.bubbles.draw(target);
    }

    fn population(&self) -> usize {
        self.bubbles.len()
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::color::Rgba;

    #[test]
    fn bubbles_start_near_bottom_and_rise_slowly() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut fluid = Fluid::new(960, 540);
        fluid.update(&mut rng);
        assert_eq!(fluid.population(), 3);
        for p in fluid.bubbles.iter() {
            assert!(p.y >= 480.0 - 1.0 && p.y <= 530.0);
            assert!(p.vx.abs() <= 0.2);
            assert!(p.vy < 0.0 && p.vy >= -0.8);
        }
    }

    #[test]
    fn rows_shade_deeper_with_index() {
        assert_eq!(Fluid::row_color(0), Rgb::new(20, 60, 110));
        assert_eq!(Fluid::row_color(10), Rgb::new(20, 90, 150));
        let last = Fluid::row_color(ROWS - 1);
        assert!(last.g > Fluid::row_color(1).g && last.b > Fluid::row_color(1).b);
    }

    #[test]
    fn phase_moves_the_bands() {
        let mut rng = StdRng::seed_from_u64(12);
        let mut fluid = Fluid::new(960, 540);
        let before: Vec<i32> = (0..ROWS).map(|r| fluid.row_offset(r)).collect();
        for _ in 0..20 {
            fluid.update(&mut rng);
        }
        let after: Vec<i32> = (0..ROWS).map(|r| fluid.row_offset(r)).collect();
        assert_ne!(before, after);
        assert!(after.iter().all(|o| o.abs() <= 14));
    }

    #[test]
    fn draw_covers_frame_with_water() {
        let mut fluid = Fluid::new(120, 300);
        let mut c = Canvas::new(120, 300);
        fluid.draw(&mut c, Point::default());
        assert!(c.pixels().iter().all(|p| p.a == 255));
        assert_eq!(c.pixel(60, 0), Some(Fluid::row_color(0).with_alpha(255)));
        assert_eq!(c.pixel(60, 5), Some(Rgba::new(12, 30, 60, 255)));
    }
}
