//! Balloons and flowers floating up behind the love glyph.
//!
//! The pool is rebuilt wholesale on `spawn` and dropped wholesale on
//! `reset`; objects keep no identity across a cycle. While active, objects
//! rise forever, wrapping from the ceiling back to the spawn band.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::rngs::StdRng;
use rand::Rng;

use crate::config::{DecorConfig, Palette};

/// Renderers draw a balloon as a sphere of this radius with a string below.
pub const BALLOON_RADIUS: f32 = 1.0;
pub const STRING_LENGTH:  f32 = 3.0;

/// Flower layout: a center disc ringed by petals.
pub const FLOWER_CENTER_RADIUS: f32 = 0.3;
pub const PETAL_RADIUS:         f32 = 0.3;
pub const PETAL_DISTANCE:       f32 = 0.4;
pub const PETAL_COUNT:          usize = 5;

/// Height of the band below `wrap_to` that fresh objects spawn in.
pub const SPAWN_DEPTH: f32 = 20.0;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    /// Euler angles in radians.
    pub rotation: Vec3,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DecorKind {
    Balloon { color: u32 },
    /// `spin` is added to the z and y rotation every tick.
    Flower  { color: u32, spin: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecorObject {
    pub transform: Transform,
    pub speed:     f32,
    pub wobble:    f32,
    pub kind:      DecorKind,
}

impl DecorObject {
    pub fn is_flower(&self) -> bool {
        matches!(self.kind, DecorKind::Flower { .. })
    }

    /// Petal centers relative to the flower's position, after its rotation
    /// about z. The y rotation foreshortens the ring along x.
    pub fn petal_offsets(&self) -> [Vec3; PETAL_COUNT] {
        let rot = self.transform.rotation;
        let squash = rot.y.cos();
        std::array::from_fn(|i| {
            let a = (i as f32 / PETAL_COUNT as f32) * TAU + rot.z;
            Vec3::new(a.cos() * PETAL_DISTANCE * squash, a.sin() * PETAL_DISTANCE, 0.0)
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════
// DecorPool
// ════════════════════════════════════════════════════════════════════════════

pub struct DecorPool {
    objects: Vec<DecorObject>,
    active:  bool,
    config:  DecorConfig,
    colors:  Vec<u32>,
    rng:     StdRng,
}

impl DecorPool {
    pub fn new(config: DecorConfig, palette: &Palette, rng: StdRng) -> Self {
        DecorPool {
            objects: Vec::new(),
            active:  false,
            config,
            colors:  palette.balloons.clone(),
            rng,
        }
    }

    /// Fill the pool with fresh balloons and flowers. Does nothing while
    /// already active.
    pub fn spawn(&mut self) {
        if self.active {
            return;
        }
        self.active = true;

        // objects start at or below the wrap line
        let band = self.config.wrap_to;
        let total = self.config.balloon_count + self.config.flower_count;
        self.objects.clear();
        self.objects.reserve(total);

        for _ in 0..self.config.balloon_count {
            let color = self.pick_color();
            let position = Vec3::new(
                self.rng.gen_range(-20.0..20.0),
                band - self.rng.gen_range(0.0..SPAWN_DEPTH),
                self.rng.gen_range(-10.0..10.0),
            );
            self.objects.push(DecorObject {
                transform: Transform { position, rotation: Vec3::ZERO },
                speed:     0.1 + self.rng.gen_range(0.0..0.2),
                wobble:    self.rng.gen_range(0.0..TAU),
                kind:      DecorKind::Balloon { color },
            });
        }

        // flowers rise slower and sit closer to the glyph plane
        for _ in 0..self.config.flower_count {
            let color = self.pick_color();
            let position = Vec3::new(
                self.rng.gen_range(-20.0..20.0),
                band - self.rng.gen_range(0.0..SPAWN_DEPTH),
                self.rng.gen_range(-5.0..5.0),
            );
            self.objects.push(DecorObject {
                transform: Transform { position, rotation: Vec3::ZERO },
                speed:     0.05 + self.rng.gen_range(0.0..0.1),
                wobble:    self.rng.gen_range(0.0..TAU),
                kind:      DecorKind::Flower { color, spin: self.rng.gen_range(-0.05..0.05) },
            });
        }

        log::debug!("spawned {} decor objects", self.objects.len());
    }

    pub fn reset(&mut self) {
        self.active = false;
        self.objects.clear();
    }

    /// Advance one tick.
    pub fn step(&mut self) {
        if !self.active {
            return;
        }
        let cfg = &self.config;
        for o in &mut self.objects {
            let t = &mut o.transform;
            t.position.y += o.speed;
            o.wobble += cfg.wobble_step;
            t.position.x += o.wobble.sin() * cfg.wobble_amp;

            if let DecorKind::Flower { spin, .. } = o.kind {
                t.rotation.z += spin;
                t.rotation.y += spin;
            }

            if t.position.y > cfg.ceiling {
                t.position.y = cfg.wrap_to;
            }
        }
    }

    fn pick_color(&mut self) -> u32 {
        if self.colors.is_empty() {
            return 0xffffff;
        }
        self.colors[self.rng.gen_range(0..self.colors.len())]
    }

    pub fn objects(&self)   -> &[DecorObject] { &self.objects }
    pub fn is_active(&self) -> bool           { self.active }
    pub fn len(&self)       -> usize          { self.objects.len() }
    pub fn is_empty(&self)  -> bool           { self.objects.is_empty() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn pool() -> DecorPool {
        DecorPool::new(DecorConfig::default(), &Palette::default(), StdRng::seed_from_u64(9))
    }

    #[test]
    fn spawn_fills_both_kinds() {
        let mut d = pool();
        assert!(d.is_empty());
        d.spawn();
        assert!(d.is_active());
        assert_eq!(d.len(), 45);
        assert_eq!(d.objects().iter().filter(|o| o.is_flower()).count(), 15);
        for o in d.objects() {
            let p = o.transform.position;
            assert!(p.y <= -20.0 && p.y > -40.0);
            assert!(p.x >= -20.0 && p.x < 20.0);
        }
    }

    #[test]
    fn colors_come_from_palette() {
        let mut d = pool();
        d.spawn();
        let palette = Palette::default().balloons;
        for o in d.objects() {
            let c = match o.kind {
                DecorKind::Balloon { color } | DecorKind::Flower { color, .. } => color,
            };
            assert!(palette.contains(&c));
        }
    }

    #[test]
    fn second_spawn_is_noop() {
        let mut d = pool();
        d.spawn();
        let first = d.objects().to_vec();
        d.spawn();
        assert_eq!(d.len(), 45);
        assert_eq!(d.objects(), &first[..]);
    }

    #[test]
    fn reset_clears_and_allows_respawn() {
        let mut d = pool();
        d.spawn();
        d.reset();
        assert!(!d.is_active());
        assert!(d.is_empty());
        d.reset();
        assert!(d.is_empty());
        d.spawn();
        assert_eq!(d.len(), 45);
    }

    #[test]
    fn step_is_noop_while_inactive() {
        let mut d = pool();
        d.step();
        assert!(d.is_empty());
    }

    #[test]
    fn objects_rise_and_wobble() {
        let mut d = pool();
        d.spawn();
        let before = d.objects()[0];
        d.step();
        let after = d.objects()[0];
        assert!((after.transform.position.y - (before.transform.position.y + before.speed)).abs() < 1e-5);
        assert!((after.wobble - (before.wobble + 0.05)).abs() < 1e-5);
        let dx = after.transform.position.x - before.transform.position.x;
        assert!((dx - after.wobble.sin() * 0.05).abs() < 1e-5);
    }

    #[test]
    fn flowers_spin_balloons_do_not() {
        let mut d = pool();
        d.spawn();
        for _ in 0..3 { d.step(); }
        for o in d.objects() {
            match o.kind {
                DecorKind::Balloon { .. } => assert_eq!(o.transform.rotation, Vec3::ZERO),
                DecorKind::Flower { spin, .. } => {
                    assert!((o.transform.rotation.z - spin * 3.0).abs() < 1e-5);
                    assert_eq!(o.transform.rotation.z, o.transform.rotation.y);
                }
            }
        }
    }

    #[test]
    fn wraps_past_ceiling_in_same_step() {
        let mut d = pool();
        d.spawn();
        d.objects[0].transform.position.y = 30.01 - d.objects[0].speed;
        d.objects[1].transform.position.y = 29.0;
        d.objects[1].speed = 0.5;
        d.step();
        assert_eq!(d.objects()[0].transform.position.y, -20.0);
        // 29.5 is under the ceiling
        assert!((d.objects()[1].transform.position.y - 29.5).abs() < 1e-5);
    }

    #[test]
    fn spawn_band_follows_wrap_line() {
        let cfg = DecorConfig { wrap_to: -50.0, ..DecorConfig::default() };
        let mut d = DecorPool::new(cfg, &Palette::default(), StdRng::seed_from_u64(9));
        d.spawn();
        for o in d.objects() {
            let y = o.transform.position.y;
            assert!(y <= -50.0 && y > -70.0, "spawned at {}", y);
        }
    }

    #[test]
    fn never_renders_above_ceiling() {
        let mut d = pool();
        d.spawn();
        for _ in 0..2000 {
            d.step();
            assert!(d.objects().iter().all(|o| o.transform.position.y <= 30.0));
        }
    }

    #[test]
    fn petals_ring_the_center() {
        let mut d = pool();
        d.spawn();
        let flower = d.objects().iter().find(|o| o.is_flower()).copied().unwrap();
        for off in flower.petal_offsets() {
            assert!((off.length() - PETAL_DISTANCE).abs() < 1e-5);
        }
    }
}
