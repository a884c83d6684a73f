//! Named tunables, fixed at construction.
//!
//! Every constant the field, the rasterizer and the decor animator use lives
//! here so a host can override any of them before building a [`Stage`].
//!
//! [`Stage`]: crate::stage::Stage

// ════════════════════════════════════════════════════════════════════════════
// Colors
// ════════════════════════════════════════════════════════════════════════════

/// Packed `0xRRGGBB` colors used by the stage.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    /// Particle tint for Reset and digit glyphs.
    pub text:     u32,
    /// Particle tint while the love glyph is shown.
    pub love:     u32,
    /// Balloon and flower petal colors.
    pub balloons: Vec<u32>,
    /// Flower centers.
    pub flower_center: u32,
    /// Balloon strings.
    pub string:   u32,
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            text:          0xffffff,
            love:          0xff0000,
            balloons:      vec![0xff5e57, 0xffdd59, 0x05c46b, 0x0fbcf9, 0xd2a8ff],
            flower_center: 0xffff00,
            string:        0xffffff,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Rasterizer
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq)]
pub struct RasterConfig {
    pub width:           usize,
    pub height:          usize,
    /// Sample every `stride` pixels on both axes.
    pub stride:          usize,
    /// A sample is foreground when its alpha is strictly greater than this.
    pub alpha_threshold: u8,
    /// Bitmap pixel → world unit.
    pub world_scale:     f32,
    /// Glyph height for single digits.
    pub digit_font_px:   usize,
    /// Glyph height for the love string.
    pub love_font_px:    usize,
}

impl Default for RasterConfig {
    fn default() -> Self {
        RasterConfig {
            width:           400,
            height:          200,
            stride:          4,
            alpha_threshold: 128,
            world_scale:     0.1,
            digit_font_px:   150,
            love_font_px:    80,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Particle field
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq)]
pub struct FieldConfig {
    pub particle_count: usize,
    /// World-space point size handed to renderers.
    pub particle_size:  f32,
    pub opacity:        f32,
    /// Spring gain toward the target (scaled by 0.1 inside `step`).
    pub force_gain:     f32,
    pub damping:        f32,
    pub speed:          f32,
    /// Full width of the uniform jitter applied to inactive particles.
    pub jitter:         f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        FieldConfig {
            particle_count: 3000,
            particle_size:  0.15,
            opacity:        0.8,
            force_gain:     0.6,
            damping:        0.1,
            speed:          0.2,
            jitter:         0.05,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Decor
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq)]
pub struct DecorConfig {
    pub balloon_count: usize,
    pub flower_count:  usize,
    /// Objects above this height wrap back to `wrap_to`.
    pub ceiling:       f32,
    pub wrap_to:       f32,
    pub wobble_step:   f32,
    pub wobble_amp:    f32,
}

impl Default for DecorConfig {
    fn default() -> Self {
        DecorConfig {
            balloon_count: 30,
            flower_count:  15,
            ceiling:       30.0,
            wrap_to:       -20.0,
            wobble_step:   0.05,
            wobble_amp:    0.05,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tunables
// ════════════════════════════════════════════════════════════════════════════

/// The whole configuration surface of a [`Stage`](crate::stage::Stage).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tunables {
    pub palette: Palette,
    pub raster:  RasterConfig,
    pub field:   FieldConfig,
    pub decor:   DecorConfig,
    /// Fixed RNG seed; `None` seeds from OS entropy.
    pub seed:    Option<u64>,
}

impl Tunables {
    /// Defaults with a fixed seed, for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Tunables { seed: Some(seed), ..Tunables::default() }
    }
}
