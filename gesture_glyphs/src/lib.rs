//! # gesture_glyphs
//!
//! A window full of particles that spell out whatever your hand is showing.
//! Hand landmarks come from a simulated camera (keyboard) or a LeapMotion
//! controller and drive a [`glyph_field::Stage`].
//!
//! ## Gesture → Scene mapping
//!
//! | Hand | Scene |
//! |---|---|
//! | Fist | Particles scatter |
//! | 1, 2 or 3 fingers | The digit, drawn in particles |
//! | 4 fingers | No change |
//! | Open hand | "I ❤ U" in red with balloons and flowers |
//!
//! ## Feature flags
//!
//! * (default): **Simulation mode**: keyboard keys hold synthetic hand poses.
//! * `leap`: **Hardware mode**: polls a real LeapMotion controller via LeapC.
//!
//! ### Simulation keyboard shortcuts
//!
//! | Key | Hand |
//! |---|---|
//! | `0` | Fist |
//! | `1`–`5` | That many fingers extended |
//! | `T` | Fist with thumb out (still a fist) |
//! | `N` | No hand in view |
//! | `Q` / `Esc` | Quit |

pub mod tracker;
pub mod visualizer;
pub mod app;
