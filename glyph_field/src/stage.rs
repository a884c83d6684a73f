//! The stage: every piece of mutable scene state in one value.
//!
//! The host owns a single `Stage` and lends it to both event paths:
//! landmark frames go through [`Stage::on_hand_landmarks`], render ticks
//! through [`Stage::tick`] followed by [`Stage::frame`]. Nothing here is
//! shared across threads.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::classifier::classify;
use crate::config::{Palette, Tunables};
use crate::decor::{DecorObject, DecorPool};
use crate::landmarks::HandLandmarkSet;
use crate::machine::{GestureMachine, GestureSymbol};
use crate::particles::ParticleField;
use crate::raster::{GlyphRenderer, Rasterizer, LOVE_TEXT};

// Keeps the decor RNG stream apart from the field's under a fixed seed.
const DECOR_SEED_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// What a renderer needs for one frame.
pub struct Frame<'a> {
    /// xyz per particle, pool order.
    pub positions: &'a [f32],
    pub tint:      u32,
    pub objects:   &'a [DecorObject],
}

pub struct Stage {
    field:   ParticleField,
    decor:   DecorPool,
    raster:  Rasterizer,
    machine: GestureMachine,
    palette: Palette,
}

impl Stage {
    pub fn new(tunables: Tunables) -> Self {
        let raster = Rasterizer::new(tunables.raster.clone());
        Self::build(tunables, raster)
    }

    /// Use a custom glyph renderer in place of the built-in block font.
    pub fn with_renderer(tunables: Tunables, renderer: Box<dyn GlyphRenderer>) -> Self {
        let raster = Rasterizer::with_renderer(tunables.raster.clone(), renderer);
        Self::build(tunables, raster)
    }

    fn build(tunables: Tunables, raster: Rasterizer) -> Self {
        let (field_rng, decor_rng) = match tunables.seed {
            Some(seed) => (
                StdRng::seed_from_u64(seed),
                StdRng::seed_from_u64(seed ^ DECOR_SEED_SALT),
            ),
            None => (StdRng::from_entropy(), StdRng::from_entropy()),
        };

        let Tunables { palette, field, decor, .. } = tunables;
        log::info!(
            "stage: {} particles, {} balloons, {} flowers",
            field.particle_count, decor.balloon_count, decor.flower_count
        );

        Stage {
            field:   ParticleField::new(field, palette.text, field_rng),
            decor:   DecorPool::new(decor, &palette, decor_rng),
            raster,
            machine: GestureMachine::new(),
            palette,
        }
    }

    // ── inbound: tracker ─────────────────────────────────────────────────

    /// One tracker frame. `None` (no hand in view) changes nothing.
    pub fn on_hand_landmarks(&mut self, hand: Option<&HandLandmarkSet>) -> Option<GestureSymbol> {
        let hand = hand?;
        let c = classify(hand);
        log::trace!("classified count={} fist={}", c.count, c.is_fist);
        self.ingest(c.count, c.is_fist)
    }

    /// Feed a classification; dispatch if it is a new symbol.
    pub fn ingest(&mut self, count: u8, is_fist: bool) -> Option<GestureSymbol> {
        let symbol = self.machine.ingest(count, is_fist)?;
        log::info!("State: {}", symbol);
        self.dispatch(symbol);
        Some(symbol)
    }

    fn dispatch(&mut self, symbol: GestureSymbol) {
        match symbol {
            GestureSymbol::Reset => {
                self.field.scatter();
                self.decor.reset();
                self.field.recolor(self.palette.text);
            }
            GestureSymbol::Digit(n) => {
                let targets = self.raster.synthesize_targets(&n.to_string(), false);
                self.field.reassign_targets(&targets);
                self.decor.reset();
                self.field.recolor(self.palette.text);
            }
            GestureSymbol::Love => {
                let targets = self.raster.synthesize_targets(LOVE_TEXT, true);
                self.field.reassign_targets(&targets);
                self.decor.spawn();
                self.field.recolor(self.palette.love);
            }
            GestureSymbol::Ignored => {}
        }
    }

    // ── inbound: render tick ─────────────────────────────────────────────

    pub fn tick(&mut self) {
        self.field.step();
        self.decor.step();
    }

    // ── outbound ─────────────────────────────────────────────────────────

    pub fn frame(&self) -> Frame<'_> {
        Frame {
            positions: self.field.positions(),
            tint:      self.field.tint(),
            objects:   self.decor.objects(),
        }
    }

    pub fn field(&self)   -> &ParticleField         { &self.field }
    pub fn decor(&self)   -> &DecorPool             { &self.decor }
    pub fn palette(&self) -> &Palette               { &self.palette }
    pub fn current(&self) -> Option<GestureSymbol>  { self.machine.last() }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
