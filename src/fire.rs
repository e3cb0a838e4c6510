// Copyright (c) 2026 rezky_nightky

use std::f32::consts::{FRAC_PI_2, FRAC_PI_8};

use rand::{Rng, RngCore};

use crate::canvas::{BlendMode, Canvas};
use crate::color::{Rgb, Rgba};
use crate::effect::{Effect, Point};
use crate::plume::{Plume, PlumeParams};

const GLOW_RADIUS: f32 = 90.0;
const GLOW: Rgba = Rgb::new(255, 100, 30).with_alpha(60).premultiply();

fn ember(rng: &mut dyn RngCore) -> Rgb {
    Rgb::new(
        rng.random_range(220..=255),
        rng.random_range(120..=180),
        rng.random_range(20..=60),
    )
}

/// Narrow upward cone, small sideways jitter.
pub const FIRE: PlumeParams = PlumeParams {
    per_tick: 10,
    heading: (-FRAC_PI_2 - FRAC_PI_8, -FRAC_PI_2 + FRAC_PI_8),
    speed: (1.0, 3.0),
    lateral_scale: 0.3,
    vertical_scale: 1.0,
    jitter: (60.0, 10.0),
    radius: (3, 6),
    life: (20, 40),
    color: ember,
};

pub struct Fire {
    plume: Plume,
}

impl Fire {
    pub fn new(origin: Point) -> Self {
        Self {
            plume: Plume::new(origin, FIRE),
        }
    }

    #[allow(dead_code)]
    pub fn origin(&self) -> Point {
        self.plume.origin()
    }

    pub fn set_origin(&mut self, origin: Point) {
        self.plume.set_origin(origin);
    }
}

impl Effect for Fire {
    fn update(&mut self, rng: &mut dyn RngCore) {
        self.plume.tick(rng);
    }

    fn draw(&mut self, target: &mut Canvas, _pointer: Point) {
        self.plume.particles().draw(target);
        let o = self.plume.origin();
        target.fill_circle(
            o.x,
            o.y,
            GLOW_RADIUS,
            GLOW,
            BlendMode::Premultiplied,
        );
    }

    fn population(&self) -> usize {
        self.plume.particles().len()
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn embers_stay_in_warm_palette_and_rise() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut fire = Fire::new(Point::new(480.0, 480.0));
        fire.update(&mut rng);
        let ps = fire.plume.particles();
        assert_eq!(ps.len(), 10);
        for p in ps.iter() {
            assert!(p.color.r >= 220);
            assert!((120..=180).contains(&p.color.g));
            assert!((20..=60).contains(&p.color.b));
            assert!((20..=40).contains(&p.max_life()));
            assert!(p.vy < 0.0);
            assert!(p.vx.abs() <= 0.3 * 3.0 * FRAC_PI_8.sin() + 1e-4);
        }
    }

    #[test]
    fn population_stays_bounded() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut fire = Fire::new(Point::new(100.0, 100.0));
        for _ in 0..500 {
            fire.update(&mut rng);
        }
        assert!(fire.population() <= 10 * 40);
    }

    #[test]
    fn glow_is_composited_over_the_embers() {
        let mut rng = StdRng::seed_from_u64(9);
        let origin = Point::new(100.0, 150.0);
        let mut fire = Fire::new(origin);
        for _ in 0..5 {
            fire.update(&mut rng);
        }
        let black = Canvas::filled(200, 200, Rgba::new(0, 0, 0, 255));

        let mut drawn = black.clone();
        fire.draw(&mut drawn, Point::default());

        let mut embers_then_glow = black.clone();
        fire.plume.particles().draw(&mut embers_then_glow);
        let embers_only = embers_then_glow.clone();
        embers_then_glow.fill_circle(origin.x, origin.y, GLOW_RADIUS, GLOW, BlendMode::Premultiplied);

        let mut glow_then_embers = black;
        glow_then_embers.fill_circle(origin.x, origin.y, GLOW_RADIUS, GLOW, BlendMode::Premultiplied);
        fire.plume.particles().draw(&mut glow_then_embers);

        assert_ne!(embers_only.pixels(), drawn.pixels());
        assert_eq!(drawn.pixels(), embers_then_glow.pixels());
        assert_ne!(drawn.pixels(), glow_then_embers.pixels());
    }

    #[test]
    fn glow_brightens_around_origin() {
        let mut fire = Fire::new(Point::new(100.0, 100.0));
        let mut c = Canvas::filled(200, 200, Rgba::new(0, 0, 0, 255));
        fire.draw(&mut c, Point::default());
        let center = c.pixel(100, 100).unwrap();
        assert!(center.r > 0 && center.r > center.b);
        assert_eq!(c.pixel(0, 0), Some(Rgba::new(0, 0, 0, 255)));
    }
}
