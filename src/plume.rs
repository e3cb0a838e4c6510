// Copyright (c) 2026 rezky_nightky

//! Point-source emitter shared by the fire and fog effects: a fixed burst
//! per tick, velocities drawn from a bounded cone.

use std::num::NonZeroU32;

use rand::{Rng, RngCore};

use crate::color::Rgb;
use crate::effect::Point;
use crate::particle::{Particle, ParticleSystem};

#[derive(Clone, Copy)]
pub struct PlumeParams {
    pub per_tick: usize,
    /// Direction range in radians; `-PI/2` is straight up.
    pub heading: (f32, f32),
    pub speed: (f32, f32),
    /// Velocity scale per axis, applied after the cone.
    pub lateral_scale: f32,
    pub vertical_scale: f32,
    /// Half-extents of the spawn box around the origin.
    pub jitter: (f32, f32),
    pub radius: (u32, u32),
    pub life: (u32, u32),
    pub color: fn(&mut dyn RngCore) -> Rgb,
}

pub struct Plume {
    origin: Point,
    params: PlumeParams,
    system: ParticleSystem,
}

fn sample(rng: &mut dyn RngCore, (lo, hi): (f32, f32)) -> f32 {
    if hi > lo {
        rng.random_range(lo..=hi)
    } else {
        lo
    }
}

impl Plume {
    pub fn new(origin: Point, params: PlumeParams) -> Self {
        Self {
            origin,
            params,
            system: ParticleSystem::new(),
        }
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn set_origin(&mut self, origin: Point) {
        self.origin = origin;
    }

    pub fn particles(&self) -> &ParticleSystem {
        &self.system
    }

    fn spawn(&self, rng: &mut dyn RngCore) -> Particle {
        let p = &self.params;
        let heading = sample(rng, p.heading);
        let speed = sample(rng, p.speed);
        let vel = (
            heading.cos() * speed * p.lateral_scale,
            heading.sin() * speed * p.vertical_scale,
        );
        let pos = (
            self.origin.x + sample(rng, (-p.jitter.0, p.jitter.0)),
            self.origin.y + sample(rng, (-p.jitter.1, p.jitter.1)),
        );
        let radius = rng.random_range(p.radius.0..=p.radius.1) as f32;
        let life = NonZeroU32::new(rng.random_range(p.life.0..=p.life.1)).unwrap_or(NonZeroU32::MIN);
        let color = (p.color)(rng);
        Particle::new(pos, vel, radius, life, color)
    }

    /// Emit this tick's burst, then advance the whole system.
    pub fn tick(&mut self, rng: &mut dyn RngCore) {
        for _ in 0..self.params.per_tick {
            let p = self.spawn(rng);
            self.system.emit(p);
        }
        self.system.update();
    }
}
