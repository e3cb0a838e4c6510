// Copyright (c) 2026 rezky_nightky

use std::num::NonZeroU32;

use crate::canvas::{BlendMode, Canvas};
use crate::color::Rgb;

/// Short-lived point sprite. `life` counts down one per tick from
/// `max_life`; a particle is dead once `life` reaches zero.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
    life: u32,
    max_life: NonZeroU32,
    pub color: Rgb,
}

impl Particle {
    pub fn new(
        pos: (f32, f32),
        vel: (f32, f32),
        radius: f32,
        lifetime: NonZeroU32,
        color: Rgb,
    ) -> Self {
        Self {
            x: pos.0,
            y: pos.1,
            vx: vel.0,
            vy: vel.1,
            radius,
            life: lifetime.get(),
            max_life: lifetime,
            color,
        }
    }

    #[allow(dead_code)]
    pub fn life(&self) -> u32 {
        self.life
    }

    #[allow(dead_code)]
    pub fn max_life(&self) -> u32 {
        self.max_life.get()
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0
    }

    /// Remaining fraction of the lifetime, in `[0, 1]`.
    pub fn fade(&self) -> f32 {
        (self.life as f32 / self.max_life.get() as f32).clamp(0.0, 1.0)
    }

    /// Integrate one tick. Returns whether the particle survives it.
    pub fn step(&mut self) -> bool {
        self.x += self.vx;
        self.y += self.vy;
        self.life = self.life.saturating_sub(1);
        self.life > 0
    }

    pub fn draw(&self, target: &mut Canvas) {
        if !self.is_alive() {
            return;
        }
        let fade = self.fade();
        let radius = (self.radius * (0.5 + 0.5 * fade)).floor().max(1.0);
        let alpha = (255 * self.life / self.max_life.get()).min(255) as u8;
        target.fill_circle(
            self.x,
            self.y,
            radius,
            self.color.with_alpha(alpha),
            BlendMode::Over,
        );
    }
}

/// Unordered set of live particles, exclusively owned by one effect.
#[derive(Clone, Debug, Default)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, p: Particle) {
        self.particles.push(p);
    }

    /// Advance every particle one tick and drop the ones that expired.
    pub fn update(&mut self) {
        self.particles.retain_mut(Particle::step);
    }

    pub fn draw(&self, target: &mut Canvas) {
        for p in &self.particles {
            p.draw(target);
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    #[allow(dead_code)]
    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;

    fn lifetime(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    fn still(n: u32) -> Particle {
        Particle::new((5.0, 5.0), (0.0, 0.0), 3.0, lifetime(n), Rgb::new(255, 0, 0))
    }

    #[test]
    fn particle_is_removed_on_the_tick_its_life_reaches_zero() {
        let mut ps = ParticleSystem::new();
        ps.emit(still(10));
        for n in 1..10 {
            ps.update();
            assert_eq!(ps.len(), 1);
            assert_eq!(ps.iter().next().unwrap().life(), 10 - n);
        }
        ps.update();
        assert!(ps.is_empty());
        ps.update();
        assert!(ps.is_empty());
    }

    #[test]
    fn empty_system_stays_empty() {
        let mut ps = ParticleSystem::new();
        for _ in 0..50 {
            ps.update();
        }
        assert!(ps.is_empty());
    }

    #[test]
    fn update_integrates_velocity_once_per_tick() {
        let mut ps = ParticleSystem::new();
        ps.emit(Particle::new(
            (1.0, 2.0),
            (0.5, -1.0),
            2.0,
            lifetime(5),
            Rgb::grey(200),
        ));
        ps.update();
        ps.update();
        let p = ps.iter().next().unwrap();
        assert_eq!((p.x, p.y), (2.0, 0.0));
    }

    #[test]
    fn fade_never_increases_and_ends_at_zero() {
        let mut p = still(7);
        let mut last = p.fade();
        assert_eq!(last, 1.0);
        while p.step() {
            let f = p.fade();
            assert!(f <= last);
            last = f;
        }
        assert_eq!(p.life(), 0);
        assert_eq!(p.fade(), 0.0);
    }

    #[test]
    fn draw_fades_alpha_with_remaining_life() {
        let mut fresh = Canvas::filled(12, 12, Rgba::new(0, 0, 0, 255));
        still(4).draw(&mut fresh);
        assert_eq!(fresh.pixel(5, 5), Some(Rgba::new(255, 0, 0, 255)));

        let mut old = still(4);
        old.step();
        old.step();
        let mut faded = Canvas::filled(12, 12, Rgba::new(0, 0, 0, 255));
        old.draw(&mut faded);
        let px = faded.pixel(5, 5).unwrap();
        assert!(px.r > 100 && px.r < 160, "r={}", px.r);
    }

    #[test]
    fn draw_alpha_truncates_toward_zero() {
        let mut p = still(4);
        for _ in 0..3 {
            p.step();
        }
        let mut c = Canvas::new(12, 12);
        p.draw(&mut c);
        assert_eq!(c.pixel(5, 5).map(|px| px.a), Some(63));

        let mut p = still(3);
        p.step();
        let mut c = Canvas::new(12, 12);
        p.draw(&mut c);
        assert_eq!(c.pixel(5, 5).map(|px| px.a), Some(170));
    }

    #[test]
    fn dead_particle_draws_nothing() {
        let mut p = still(1);
        assert!(!p.step());
        let mut c = Canvas::new(12, 12);
        p.draw(&mut c);
        assert!(c.pixels().iter().all(|px| *px == Rgba::TRANSPARENT));
    }
}
