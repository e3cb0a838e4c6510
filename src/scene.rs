// Copyright (c) 2026 rezky_nightky

use rand::{rngs::StdRng, SeedableRng};

use crate::canvas::Canvas;
use crate::discharge::{Discharge, DEFAULT_SEGMENTS};
use crate::effect::{Effect, Point};
use crate::fire::Fire;
use crate::fluid::Fluid;
use crate::fog::Fog;
use crate::light_mask::LightMask;
use crate::runtime::{EffectKind, HUD_LEGEND};
use crate::starfield::starfield;

/// Distance of the pointer-tracked emitters above the bottom edge.
const EMITTER_LIFT: f32 = 60.0;

#[derive(Clone, Copy, Debug)]
pub struct SceneSettings {
    pub width: u32,
    pub height: u32,
    pub seed: u64,
    pub light_radius: u32,
    pub stars: u32,
    pub initial: EffectKind,
}

/// Owns one instance of every effect and forwards the per-tick calls to the
/// active one. Inactive effects keep their state untouched until selected
/// again.
pub struct Scene {
    height: u32,
    mode: EffectKind,
    paused: bool,
    dragging: bool,

    fluid: Fluid,
    fire: Fire,
    discharge: Discharge,
    fog: Fog,
    light: LightMask,

    background: Canvas,
    rng: StdRng,
}

impl Scene {
    pub fn new(settings: SceneSettings) -> Self {
        let SceneSettings {
            width,
            height,
            seed,
            light_radius,
            stars,
            initial,
        } = settings;
        let mut rng = StdRng::seed_from_u64(seed);
        let (w, h) = (width as f32, height as f32);

        let background = starfield(width, height, stars, &mut rng);
        let mut discharge = Discharge::new(
            Point::new(w / 4.0, h / 4.0),
            Point::new(w * 3.0 / 4.0, h * 3.0 / 4.0),
            DEFAULT_SEGMENTS,
        );
        discharge.rebuild(&mut rng);

        Self {
            height,
            mode: initial,
            paused: false,
            dragging: false,
            fluid: Fluid::new(width, height),
            fire: Fire::new(Point::new(w / 2.0, h - 80.0)),
            discharge,
            fog: Fog::new(Point::new(w / 2.0, h - EMITTER_LIFT)),
            light: LightMask::new(light_radius),
            background,
            rng,
        }
    }

    pub fn mode(&self) -> EffectKind {
        self.mode
    }

    pub fn set_mode(&mut self, mode: EffectKind) {
        if mode != self.mode {
            log::debug!("mode {:?} -> {:?}", self.mode, mode);
        }
        self.mode = mode;
        self.dragging = false;
        if mode == EffectKind::Discharge {
            self.discharge.rebuild(&mut self.rng);
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        log::debug!("paused: {}", self.paused);
    }

    fn active(&mut self) -> (&mut dyn Effect, &mut StdRng) {
        let effect: &mut dyn Effect = match self.mode {
            EffectKind::Fluid => &mut self.fluid,
            EffectKind::Fire => &mut self.fire,
            EffectKind::Discharge => &mut self.discharge,
            EffectKind::Fog => &mut self.fog,
            EffectKind::LightMask => &mut self.light,
        };
        (effect, &mut self.rng)
    }

    /// One simulation tick for the active effect.
    pub fn update(&mut self, pointer: Point) {
        if self.paused {
            return;
        }
        let origin = Point::new(pointer.x, self.height as f32 - EMITTER_LIFT);
        match self.mode {
            EffectKind::Fire => self.fire.set_origin(origin),
            EffectKind::Fog => self.fog.set_origin(origin),
            _ => {}
        }
        let (effect, rng) = self.active();
        effect.update(rng);
    }

    /// Background, then the active effect. The HUD text is left to the
    /// presenter; see [`Scene::hud`].
    pub fn draw(&mut self, target: &mut Canvas, pointer: Point) {
        target.copy_from(&self.background);
        let (effect, _) = self.active();
        effect.draw(target, pointer);
    }

    /// Mode line and control legend for the overlay.
    pub fn hud(&self) -> [&'static str; 2] {
        [self.mode.hud_line(), HUD_LEGEND]
    }

    pub fn population(&self) -> usize {
        match self.mode {
            EffectKind::Fluid => self.fluid.population(),
            EffectKind::Fire => self.fire.population(),
            EffectKind::Discharge => self.discharge.population(),
            EffectKind::Fog => self.fog.population(),
            EffectKind::LightMask => self.light.population(),
        }
    }

    /// Pointer pressed: while the bolt is showing, its end jumps there.
    pub fn begin_drag(&mut self, at: Point) {
        if self.mode != EffectKind::Discharge {
            return;
        }
        self.dragging = true;
        self.discharge.set_end(at, &mut self.rng);
    }

    pub fn drag_to(&mut self, at: Point) {
        if self.mode != EffectKind::Discharge || !self.dragging {
            return;
        }
        self.discharge.set_end(at, &mut self.rng);
    }

    pub fn end_drag(&mut self) {
        self.dragging = false;
    }

    /// Throw away the current bolt and jitter a fresh one.
    pub fn regenerate(&mut self) {
        if self.mode == EffectKind::Discharge {
            self.discharge.rebuild(&mut self.rng);
        }
    }

    #[allow(dead_code)]
    pub fn light_radius(&self) -> u32 {
        self.light.radius()
    }

    pub fn adjust_light_radius(&mut self, delta: i32) {
        let r = (self.light.radius() as i64 + delta as i64).max(0) as u32;
        self.light.set_radius(r);
    }

    #[allow(dead_code)]
    pub fn discharge(&self) -> &Discharge {
        &self.discharge
    }

    #[allow(dead_code)]
    pub fn fire(&self) -> &Fire {
        &self.fire
    }

    #[allow(dead_code)]
    pub fn fog(&self) -> &Fog {
        &self.fog
    }

    #[allow(dead_code)]
    pub fn fluid(&self) -> &Fluid {
        &self.fluid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light_mask::MIN_RADIUS;

    fn settings(initial: EffectKind) -> SceneSettings {
        SceneSettings {
            width: 320,
            height: 180,
            seed: 42,
            light_radius: 40,
            stars: 30,
            initial,
        }
    }

    #[test]
    fn only_the_active_effect_is_updated() {
        let mut scene = Scene::new(settings(EffectKind::Fire));
        for _ in 0..5 {
            scene.update(Point::new(100.0, 100.0));
        }
        assert!(scene.population() > 0);
        assert_eq!(scene.fluid().phase(), 0);
        assert_eq!(scene.fluid().population(), 0);
        assert_eq!(scene.fog().population(), 0);
    }

    #[test]
    fn active_discharge_flickers_once_per_tick() {
        let mut scene = Scene::new(settings(EffectKind::Discharge));
        let before = scene.discharge().path().to_vec();
        scene.update(Point::new(10.0, 10.0));
        let after = scene.discharge().path();

        assert_eq!(after.len(), before.len());
        assert_eq!(after.first(), before.first());
        assert_eq!(after.last(), before.last());
        assert_ne!(&after[1..after.len() - 1], &before[1..before.len() - 1]);
        for (a, b) in after.iter().zip(&before) {
            assert!((a.x - b.x).abs() <= 1.0 && (a.y - b.y).abs() <= 1.0);
        }

        scene.toggle_pause();
        let paused = scene.discharge().path().to_vec();
        scene.update(Point::default());
        assert_eq!(scene.discharge().path(), paused.as_slice());
    }

    #[test]
    fn pointer_steers_fire_and_fog_emitters() {
        let mut scene = Scene::new(settings(EffectKind::Fire));
        scene.update(Point::new(33.0, 10.0));
        assert_eq!(scene.fire().origin(), Point::new(33.0, 120.0));

        let fog_before = scene.fog().origin();
        scene.set_mode(EffectKind::Fog);
        assert_eq!(scene.fog().origin(), fog_before);
        scene.update(Point::new(250.0, 0.0));
        assert_eq!(scene.fog().origin(), Point::new(250.0, 120.0));
        assert_eq!(scene.fire().origin(), Point::new(33.0, 120.0));
    }

    #[test]
    fn discharge_path_is_frozen_while_away_and_rebuilt_on_return() {
        let mut scene = Scene::new(settings(EffectKind::Discharge));
        scene.update(Point::default());
        let path = scene.discharge().path().to_vec();

        scene.set_mode(EffectKind::Fire);
        for _ in 0..10 {
            scene.update(Point::default());
        }
        assert_eq!(scene.discharge().path(), path.as_slice());

        scene.set_mode(EffectKind::Discharge);
        assert_ne!(scene.discharge().path(), path.as_slice());
        assert_eq!(scene.discharge().path().len(), path.len());
    }

    #[test]
    fn drag_only_applies_while_discharge_is_active() {
        let mut scene = Scene::new(settings(EffectKind::Fog));
        let end = scene.discharge().end();
        scene.begin_drag(Point::new(5.0, 5.0));
        scene.drag_to(Point::new(6.0, 6.0));
        assert_eq!(scene.discharge().end(), end);

        scene.set_mode(EffectKind::Discharge);
        let start = scene.discharge().start();
        scene.drag_to(Point::new(7.0, 7.0));
        assert_eq!(scene.discharge().end(), end);
        scene.begin_drag(Point::new(10.0, 20.0));
        scene.drag_to(Point::new(30.0, 40.0));
        assert_eq!(scene.discharge().end(), Point::new(30.0, 40.0));
        assert_eq!(scene.discharge().start(), start);
        scene.end_drag();
        scene.drag_to(Point::new(90.0, 90.0));
        assert_eq!(scene.discharge().end(), Point::new(30.0, 40.0));
    }

    #[test]
    fn same_seed_and_inputs_reproduce_the_same_frames() {
        let run = || {
            let mut scene = Scene::new(settings(EffectKind::Fluid));
            let mut canvas = Canvas::new(320, 180);
            for (i, mode) in EffectKind::ALL.into_iter().enumerate() {
                scene.set_mode(mode);
                let p = Point::new(20.0 * i as f32, 90.0);
                scene.begin_drag(p);
                scene.end_drag();
                for _ in 0..3 {
                    scene.update(p);
                }
            }
            scene.set_mode(EffectKind::Fire);
            scene.update(Point::new(160.0, 90.0));
            scene.draw(&mut canvas, Point::new(160.0, 90.0));
            (scene.discharge().path().to_vec(), canvas.pixels().to_vec())
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn pause_freezes_updates() {
        let mut scene = Scene::new(settings(EffectKind::Fluid));
        scene.toggle_pause();
        scene.update(Point::default());
        assert_eq!(scene.fluid().phase(), 0);
        scene.toggle_pause();
        scene.update(Point::default());
        assert_eq!(scene.fluid().phase(), 1);
    }

    #[test]
    fn draw_starts_from_the_background() {
        let mut scene = Scene::new(settings(EffectKind::Discharge));
        let mut canvas = Canvas::new(320, 180);
        scene.draw(&mut canvas, Point::default());
        assert!(canvas.pixels().iter().all(|p| p.a == 255));
        assert_eq!(canvas.pixel(319, 0), scene.background.pixel(319, 0));
    }

    #[test]
    fn hud_names_the_active_mode() {
        let mut scene = Scene::new(settings(EffectKind::Fire));
        assert!(scene.hud()[0].starts_with("FIRE"));
        scene.set_mode(EffectKind::LightMask);
        assert!(scene.hud()[0].starts_with("LIGHT"));
        assert_eq!(scene.hud()[1], HUD_LEGEND);
    }

    #[test]
    fn light_radius_adjusts_within_bounds() {
        let mut scene = Scene::new(settings(EffectKind::LightMask));
        scene.adjust_light_radius(10);
        assert_eq!(scene.light_radius(), 50);
        scene.adjust_light_radius(-1000);
        assert_eq!(scene.light_radius(), MIN_RADIUS);
    }
}
