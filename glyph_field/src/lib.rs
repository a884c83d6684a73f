//! # glyph_field
//!
//! Hand-pose gestures drive a fixed pool of particles that morph between
//! scattered noise, rasterized digits and a "love" scene with balloons and
//! flowers floating up behind it.
//!
//! ## Gesture → Scene mapping
//!
//! | Hand | Symbol | Scene |
//! |---|---|---|
//! | Fist (four fingers curled, thumb ignored) | `RESET` | Particles scatter, white; decor cleared |
//! | Zero fingers, no fist | `RESET` | Same as above |
//! | One to three fingers | `1` `2` `3` | Digit glyph, white; decor cleared |
//! | Four fingers | (ignored) | Whatever is showing stays |
//! | Open hand | `LOVE` | "I ❤ U" in red; balloons and flowers rise |
//!
//! A held gesture triggers one transition; frames with no hand change
//! nothing.
//!
//! ## Driving a stage
//!
//! ```no_run
//! use glyph_field::{Stage, Tunables, HandPose};
//!
//! let mut stage = Stage::new(Tunables::default());
//! stage.on_hand_landmarks(Some(&HandPose::fingers(2).landmarks()));
//! loop {
//!     stage.tick();
//!     let frame = stage.frame();
//!     // draw frame.positions with frame.tint, then frame.objects
//!     # break;
//! }
//! ```

pub mod config;
pub mod landmarks;
pub mod classifier;
pub mod pose;
pub mod font;
pub mod raster;
pub mod particles;
pub mod decor;
pub mod machine;
pub mod stage;

pub use classifier::{classify, Classification};
pub use config::{DecorConfig, FieldConfig, Palette, RasterConfig, Tunables};
pub use decor::{DecorKind, DecorObject, DecorPool, Transform};
pub use landmarks::{HandLandmarkSet, Landmark, LANDMARK_COUNT};
pub use machine::{GestureMachine, GestureSymbol};
pub use particles::{Particle, ParticleField};
pub use pose::HandPose;
pub use raster::{AlphaBitmap, BlockFont, GlyphRenderer, Rasterizer, LOVE_TEXT};
pub use stage::{Frame, Stage};
