//! Fixed-size particle pool with a spring-damper pull toward per-particle
//! targets.
//!
//! The pool is sized once and never resized. Each particle is either
//! *active* (holding a glyph pixel) or drifting toward a random point in
//! the background with a little jitter.
//!
//! `step` is frame-coupled: one call is one tick at the host's fixed rate.

use glam::Vec3;
use rand::rngs::StdRng;
use rand::Rng;

use crate::config::FieldConfig;

/// Background volume for particles left over after a glyph takes its share.
pub const BACKDROP: Volume = Volume {
    min: Vec3::new(-30.0, -20.0, -30.0),
    max: Vec3::new( 30.0,  20.0, -10.0),
};

/// Volume the whole pool scatters into on reset, and starts in.
pub const AMBIENT: Volume = Volume {
    min: Vec3::new(-25.0, -15.0, -10.0),
    max: Vec3::new( 25.0,  15.0,  10.0),
};

// The 0.1 factor on the spring gain is part of the tuning, not the config.
const GAIN_SCALE: f32 = 0.1;

/// Axis-aligned box for uniform random points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Volume {
    pub min: Vec3,
    pub max: Vec3,
}

impl Volume {
    pub fn sample(&self, rng: &mut StdRng) -> Vec3 {
        Vec3::new(
            rng.gen_range(self.min.x..self.max.x),
            rng.gen_range(self.min.y..self.max.y),
            rng.gen_range(self.min.z..self.max.z),
        )
    }

    pub fn contains(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    pub target:   Vec3,
    pub velocity: Vec3,
    pub active:   bool,
}

// ════════════════════════════════════════════════════════════════════════════
// ParticleField
// ════════════════════════════════════════════════════════════════════════════

pub struct ParticleField {
    particles: Vec<Particle>,
    /// Flat xyz copy of every position, refreshed by `step`.
    positions: Vec<f32>,
    tint:      u32,
    config:    FieldConfig,
    rng:       StdRng,
}

impl ParticleField {
    /// Spread the pool through the ambient volume, each particle at rest on
    /// its own target.
    pub fn new(config: FieldConfig, tint: u32, mut rng: StdRng) -> Self {
        let particles: Vec<Particle> = (0..config.particle_count)
            .map(|_| {
                let p = AMBIENT.sample(&mut rng);
                Particle { position: p, target: p, velocity: Vec3::ZERO, active: false }
            })
            .collect();

        let mut field = ParticleField {
            positions: vec![0.0; particles.len() * 3],
            particles,
            tint,
            config,
            rng,
        };
        field.sync_positions();
        field
    }

    /// Give particle `i` the target `points[i]`. Particles past the end of
    /// `points` go inactive with a fresh backdrop target; points past the
    /// end of the pool are dropped.
    pub fn reassign_targets(&mut self, points: &[Vec3]) {
        if points.len() > self.particles.len() {
            log::debug!(
                "glyph has {} points, pool holds {}; dropping the rest",
                points.len(), self.particles.len()
            );
        }
        for (i, p) in self.particles.iter_mut().enumerate() {
            match points.get(i) {
                Some(&t) => {
                    p.target = t;
                    p.active = true;
                }
                None => {
                    p.target = BACKDROP.sample(&mut self.rng);
                    p.active = false;
                }
            }
        }
    }

    /// Send every particle to a random ambient point.
    pub fn scatter(&mut self) {
        for p in &mut self.particles {
            p.target = AMBIENT.sample(&mut self.rng);
            p.active = false;
        }
    }

    pub fn recolor(&mut self, tint: u32) {
        self.tint = tint;
    }

    /// Advance one tick (semi-implicit Euler).
    pub fn step(&mut self) {
        let gain    = self.config.force_gain * GAIN_SCALE;
        let keep    = 1.0 - self.config.damping;
        let speed   = self.config.speed;
        let half    = self.config.jitter / 2.0;

        for p in &mut self.particles {
            p.velocity += (p.target - p.position) * gain;
            p.velocity *= keep;

            if !p.active && half > 0.0 {
                p.velocity.x += self.rng.gen_range(-half..half);
                p.velocity.y += self.rng.gen_range(-half..half);
            }

            p.position += p.velocity * speed;
        }
        self.sync_positions();
    }

    fn sync_positions(&mut self) {
        for (dst, p) in self.positions.chunks_exact_mut(3).zip(&self.particles) {
            dst.copy_from_slice(&p.position.to_array());
        }
    }

    // ── Accessors for the render loop ─────────────────────────────────────

    pub fn particles(&self)    -> &[Particle]   { &self.particles }
    /// `3 * len()` floats, xyz per particle in pool order.
    pub fn positions(&self)    -> &[f32]        { &self.positions }
    pub fn tint(&self)         -> u32           { self.tint }
    pub fn config(&self)       -> &FieldConfig  { &self.config }
    pub fn len(&self)          -> usize         { self.particles.len() }
    pub fn is_empty(&self)     -> bool          { self.particles.is_empty() }
    pub fn active_count(&self) -> usize {
        self.particles.iter().filter(|p| p.active).count()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn field() -> ParticleField {
        ParticleField::new(FieldConfig::default(), 0xffffff, StdRng::seed_from_u64(1))
    }

    fn line(n: usize) -> Vec<Vec3> {
        (0..n).map(|i| Vec3::new(i as f32 * 0.1 - 2.5, 1.0, 0.0)).collect()
    }

    #[test]
    fn starts_at_rest_in_ambient_volume() {
        let f = field();
        assert_eq!(f.len(), 3000);
        assert_eq!(f.positions().len(), 9000);
        assert_eq!(f.active_count(), 0);
        for p in f.particles() {
            assert!(AMBIENT.contains(p.position));
            assert_eq!(p.position, p.target);
        }
    }

    #[test]
    fn first_fifty_take_the_glyph() {
        let mut f = field();
        let pts = line(50);
        f.reassign_targets(&pts);

        assert_eq!(f.active_count(), 50);
        for (i, p) in f.particles().iter().enumerate() {
            if i < 50 {
                assert!(p.active);
                assert_eq!(p.target, pts[i]);
            } else {
                assert!(!p.active);
                assert!(BACKDROP.contains(p.target));
            }
        }
        // background targets are drawn independently
        assert_ne!(f.particles()[50].target, f.particles()[51].target);
    }

    #[test]
    fn active_particles_converge() {
        let mut f = field();
        let pts = line(50);
        f.reassign_targets(&pts);
        let before = f.particles()[0].position.distance(pts[0]);
        for _ in 0..600 { f.step(); }
        let after = f.particles()[0].position.distance(pts[0]);
        assert!(after < 0.05, "still {} away (from {})", after, before);
    }

    #[test]
    fn second_glyph_replaces_every_target() {
        let mut f = field();
        let one: Vec<Vec3> = line(40);
        let two: Vec<Vec3> = (0..60).map(|i| Vec3::new(0.0, i as f32 * 0.1, 0.0)).collect();

        f.reassign_targets(&one);
        let stale: Vec<Vec3> = f.particles().iter().map(|p| p.target).collect();
        f.reassign_targets(&two);

        assert_eq!(f.active_count(), 60);
        for (i, p) in f.particles().iter().enumerate() {
            if i < 60 {
                assert_eq!(p.target, two[i]);
            } else {
                assert_ne!(p.target, stale[i]);
            }
        }
    }

    #[test]
    fn excess_points_are_dropped() {
        let mut f = ParticleField::new(
            FieldConfig { particle_count: 10, ..FieldConfig::default() },
            0, StdRng::seed_from_u64(2),
        );
        f.reassign_targets(&line(25));
        assert_eq!(f.len(), 10);
        assert_eq!(f.active_count(), 10);
        assert_eq!(f.particles()[9].target, line(25)[9]);
    }

    #[test]
    fn empty_glyph_leaves_everything_ambient() {
        let mut f = field();
        f.reassign_targets(&line(30));
        f.reassign_targets(&[]);
        assert_eq!(f.active_count(), 0);
    }

    #[test]
    fn scatter_deactivates_into_ambient() {
        let mut f = field();
        f.reassign_targets(&line(100));
        f.scatter();
        assert_eq!(f.active_count(), 0);
        assert!(f.particles().iter().all(|p| AMBIENT.contains(p.target)));
    }

    #[test]
    fn recolor_is_shared() {
        let mut f = field();
        f.recolor(0xff0000);
        assert_eq!(f.tint(), 0xff0000);
    }

    #[test]
    fn step_matches_spring_damper() {
        let cfg = FieldConfig { particle_count: 1, jitter: 0.0, ..FieldConfig::default() };
        let mut f = ParticleField::new(cfg, 0, StdRng::seed_from_u64(3));
        let start = f.particles()[0].position;
        let target = start + Vec3::new(10.0, 0.0, 0.0);
        f.reassign_targets(&[target]);
        f.step();

        // v = (10 * 0.06) * 0.9 = 0.54; x += 0.54 * 0.2
        let p = f.particles()[0];
        assert!((p.velocity.x - 0.54).abs() < 1e-5);
        assert!((p.position.x - (start.x + 0.108)).abs() < 1e-4);
        assert_eq!(&f.positions()[..3], &p.position.to_array());
    }

    #[test]
    fn jitter_only_moves_inactive_in_plane() {
        let cfg = FieldConfig { particle_count: 2, ..FieldConfig::default() };
        let mut f = ParticleField::new(cfg, 0, StdRng::seed_from_u64(4));
        let at = f.particles()[0].position;
        f.reassign_targets(&[at]);
        f.step();

        let active = f.particles()[0];
        assert_eq!(active.velocity, Vec3::ZERO);

        // the inactive one's z velocity comes only from the spring
        let idle = f.particles()[1];
        let spring_z = (idle.target.z - (idle.position.z - idle.velocity.z * 0.2)) * 0.06 * 0.9;
        assert!((idle.velocity.z - spring_z).abs() < 1e-4);
        assert!(idle.velocity.x.abs() > 0.0 || idle.velocity.y.abs() > 0.0);
    }
}
