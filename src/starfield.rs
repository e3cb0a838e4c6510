// Copyright (c) 2026 rezky_nightky

use rand::{Rng, RngCore};

use crate::canvas::{BlendMode, Canvas};
use crate::color::Rgb;

pub const BACKGROUND: Rgb = Rgb::new(20, 22, 30);
pub const DEFAULT_STARS: u32 = 180;

/// Night sky behind every effect: flat background with single-pixel stars.
pub fn starfield(width: u32, height: u32, stars: u32, rng: &mut dyn RngCore) -> Canvas {
    let mut sky = Canvas::filled(width, height, BACKGROUND.with_alpha(255));
    if width == 0 || height == 0 {
        return sky;
    }
    for _ in 0..stars {
        let x = rng.random_range(0..width) as i32;
        let y = rng.random_range(0..height) as i32;
        let level = rng.random_range(180..=255);
        sky.put(x, y, Rgb::grey(level).with_alpha(255), BlendMode::Replace);
    }
    sky
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn stars_are_bright_and_rest_is_background() {
        let sky = starfield(64, 32, 40, &mut StdRng::seed_from_u64(1));
        let bg = BACKGROUND.with_alpha(255);
        let stars: Vec<_> = sky.pixels().iter().filter(|p| **p != bg).collect();
        assert!(!stars.is_empty() && stars.len() <= 40);
        for s in stars {
            assert!(s.r >= 180 && s.r == s.g && s.g == s.b);
        }
    }

    #[test]
    fn empty_canvas_does_not_panic() {
        let sky = starfield(0, 0, 10, &mut StdRng::seed_from_u64(1));
        assert!(sky.pixels().is_empty());
    }
}
