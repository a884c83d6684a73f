//! Software-rendered visualizer using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │            o   balloons / flowers rising                  │
//! │      ·  ·         ██  ██                    ·             │
//! │   ·        ·        ██      particle glyph      ·         │
//! │         ·         ██████          ·                       │
//! ├──────────────────────────────────────────────────────────┤
//! │  status bar                       key legend              │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! The scene is drawn through a pinhole camera on the +z axis looking at the
//! origin. Particles are additive squares, decor objects are painted far to
//! near as flat-shaded discs.

use std::sync::mpsc::Sender;

use anyhow::anyhow;
use glam::Vec3;
use minifb::{Key, KeyRepeat, Window, WindowOptions};

use glyph_field::decor::{
    DecorKind, BALLOON_RADIUS, FLOWER_CENTER_RADIUS, PETAL_RADIUS, STRING_LENGTH,
};
use glyph_field::font::{self, GLYPH_ROWS};
use glyph_field::{FieldConfig, Frame, Palette};

use crate::tracker::SimKey;

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

pub const WIN_W:     usize = 960;
pub const WIN_H:     usize = 540;
const STATUS_H:      usize = 36;
const STATUS_Y:      usize = WIN_H - STATUS_H;
const BG_COLOR:      u32   = 0xFF000000;
const STATUS_BG:     u32   = 0xFF0F1020;
const STATUS_FG:     u32   = 0xFFEEEEEE;
const LEGEND_FG:     u32   = 0xFF888888;
const LABEL_SCALE:   usize = 2;

// ════════════════════════════════════════════════════════════════════════════
// Camera
// ════════════════════════════════════════════════════════════════════════════

/// Pinhole camera on the z axis looking toward -z.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub z:      f32,
    /// Pixels per world unit at distance 1.
    focal:      f32,
    center:     (f32, f32),
}

/// A projected point: screen position and pixels per world unit there.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
    pub x:     f32,
    pub y:     f32,
    pub scale: f32,
}

const NEAR: f32 = 0.1;

impl Camera {
    pub fn new(z: f32, fov_y_deg: f32, width: usize, height: usize) -> Self {
        let half = (fov_y_deg.to_radians() / 2.0).tan();
        Camera {
            z,
            focal:  height as f32 / 2.0 / half,
            center: (width as f32 / 2.0, height as f32 / 2.0),
        }
    }

    /// `None` for points behind the near plane.
    pub fn project(&self, p: Vec3) -> Option<Projected> {
        let depth = self.z - p.z;
        if depth <= NEAR {
            return None;
        }
        let scale = self.focal / depth;
        Some(Projected {
            x: self.center.0 + p.x * scale,
            y: self.center.1 - p.y * scale,
            scale,
        })
    }
}

impl Default for Camera {
    fn default() -> Self {
        Camera::new(20.0, 75.0, WIN_W, WIN_H)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Canvas: ARGB framebuffer with clipped primitives
// ════════════════════════════════════════════════════════════════════════════

pub struct Canvas {
    pub w:   usize,
    pub h:   usize,
    pub buf: Vec<u32>,
}

impl Canvas {
    pub fn new(w: usize, h: usize) -> Self {
        Canvas { w, h, buf: vec![BG_COLOR; w * h] }
    }

    pub fn clear(&mut self, color: u32) {
        self.buf.fill(color);
    }

    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        self.buf[y * self.w + x]
    }

    fn index(&self, x: isize, y: isize) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.w || y as usize >= self.h {
            return None;
        }
        Some(y as usize * self.w + x as usize)
    }

    pub fn set_pixel(&mut self, x: isize, y: isize, color: u32) {
        if let Some(i) = self.index(x, y) {
            self.buf[i] = color;
        }
    }

    /// Saturating per-channel add.
    pub fn add_pixel(&mut self, x: isize, y: isize, color: u32) {
        if let Some(i) = self.index(x, y) {
            self.buf[i] = add(self.buf[i], color);
        }
    }

    pub fn fill_rect(&mut self, x: isize, y: isize, w: usize, h: usize, color: u32) {
        for row in y..y + h as isize {
            for col in x..x + w as isize {
                self.set_pixel(col, row, color);
            }
        }
    }

    pub fn add_rect(&mut self, x: isize, y: isize, w: usize, h: usize, color: u32) {
        for row in y..y + h as isize {
            for col in x..x + w as isize {
                self.add_pixel(col, row, color);
            }
        }
    }

    /// Disc lit from the upper left.
    pub fn fill_disc(&mut self, cx: f32, cy: f32, r: f32, color: u32) {
        if r <= 0.0 {
            return;
        }
        let (hx, hy) = (cx - r * 0.35, cy - r * 0.35);
        let x0 = (cx - r).floor() as isize;
        let x1 = (cx + r).ceil() as isize;
        let y0 = (cy - r).floor() as isize;
        let y1 = (cy + r).ceil() as isize;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let (px, py) = (x as f32 + 0.5, y as f32 + 0.5);
                if (px - cx).hypot(py - cy) > r {
                    continue;
                }
                let d = (px - hx).hypot(py - hy) / (r * 1.35);
                let shaded = if d < 0.4 {
                    blend(color, 0xFFFFFFFF, (0.4 - d) * 0.8)
                } else {
                    blend(color, 0xFF000000, (d - 0.4) * 0.5)
                };
                self.set_pixel(x, y, shaded);
            }
        }
    }

    pub fn vline(&mut self, x: isize, y0: isize, y1: isize, color: u32) {
        for y in y0.min(y1)..=y0.max(y1) {
            self.set_pixel(x, y, color);
        }
    }

    /// Text in the built-in 5-row font, `scale` pixels per font cell.
    /// Characters the font lacks leave a blank.
    pub fn draw_label(&mut self, text: &str, x: isize, y: isize, scale: usize, color: u32) {
        let mut cx = x;
        for ch in text.chars().filter(|&c| !font::is_zero_width(c)) {
            let width = match font::glyph(ch) {
                Some(g) => {
                    for row in 0..GLYPH_ROWS {
                        for col in 0..g.width {
                            if g.lit(col, row) {
                                self.fill_rect(
                                    cx + (col * scale) as isize,
                                    y + (row * scale) as isize,
                                    scale, scale, color,
                                );
                            }
                        }
                    }
                    g.width
                }
                None => 3,
            };
            cx += ((width + 1) * scale) as isize;
            if cx >= self.w as isize { break; }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window: Window,
    canvas: Canvas,
    camera: Camera,
    sim_tx: Sender<SimKey>,
    order:  Vec<usize>,
}

impl Visualizer {
    pub fn new(sim_tx: Sender<SimKey>) -> anyhow::Result<Self> {
        let mut window = Window::new(
            "Gesture Glyphs",
            WIN_W, WIN_H,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        ).map_err(|e| anyhow!("failed to open window: {}", e))?;

        window.limit_update_rate(Some(std::time::Duration::from_millis(16))); // ~60fps

        Ok(Visualizer {
            window,
            canvas: Canvas::new(WIN_W, WIN_H),
            camera: Camera::default(),
            sim_tx,
            order:  Vec::new(),
        })
    }

    /// Returns false when the window should close.
    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Poll keyboard inputs and translate to [`SimKey`]s.
    /// Returns false when the user asked to quit.
    pub fn poll_input(&mut self) -> bool {
        if !self.window.is_open() { return false; }

        let pressed = |k: Key| self.window.is_key_pressed(k, KeyRepeat::No);

        if pressed(Key::Q) || pressed(Key::Escape) {
            let _ = self.sim_tx.send(SimKey::Quit);
            return false;
        }

        let digits = [Key::Key0, Key::Key1, Key::Key2, Key::Key3, Key::Key4, Key::Key5];
        let mut keys = Vec::new();
        for (n, &k) in digits.iter().enumerate() {
            if pressed(k) { keys.push(SimKey::Fingers(n as u8)); }
        }
        if pressed(Key::T) { keys.push(SimKey::FistThumb); }
        if pressed(Key::N) { keys.push(SimKey::NoHand); }

        for key in keys {
            let _ = self.sim_tx.send(key);
        }
        true
    }

    /// Render one frame.
    pub fn render(&mut self, frame: &Frame<'_>, field: &FieldConfig, palette: &Palette, status: &str) {
        self.canvas.clear(BG_COLOR);
        self.draw_decor(frame, palette);
        draw_particles(&mut self.canvas, &self.camera, frame.positions, frame.tint, field);

        // ── Status bar ────────────────────────────────────────────────────
        self.canvas.fill_rect(0, STATUS_Y as isize, WIN_W, STATUS_H, STATUS_BG);
        self.canvas.draw_label(status, 10, STATUS_Y as isize + 6, LABEL_SCALE, STATUS_FG);

        // ── Key legend ────────────────────────────────────────────────────
        self.canvas.draw_label(
            "0-5=fingers  t=fist+thumb  n=no hand  q=quit",
            10, WIN_H as isize - 14, LABEL_SCALE, LEGEND_FG,
        );

        if let Err(e) = self.window.update_with_buffer(&self.canvas.buf, WIN_W, WIN_H) {
            log::warn!("frame dropped: {}", e);
        }
    }

    // ── Balloons and flowers ──────────────────────────────────────────────

    fn draw_decor(&mut self, frame: &Frame<'_>, palette: &Palette) {
        let objects = frame.objects;
        self.order.clear();
        self.order.extend(0..objects.len());
        // painter's order: farthest (most negative z) first
        self.order.sort_by(|&a, &b| {
            objects[a].transform.position.z.total_cmp(&objects[b].transform.position.z)
        });

        for &i in &self.order {
            let o = &objects[i];
            let pos = o.transform.position;
            match o.kind {
                DecorKind::Balloon { color } => {
                    let Some(top) = self.camera.project(pos) else { continue };
                    let Some(end) = self.camera.project(pos - Vec3::new(0.0, BALLOON_RADIUS + STRING_LENGTH, 0.0)) else { continue };
                    let r = BALLOON_RADIUS * top.scale;
                    self.canvas.vline(top.x as isize, (top.y + r) as isize, end.y as isize, 0xFF000000 | palette.string);
                    self.canvas.fill_disc(top.x, top.y, r, 0xFF000000 | color);
                }
                DecorKind::Flower { color, .. } => {
                    for off in o.petal_offsets() {
                        if let Some(p) = self.camera.project(pos + off) {
                            self.canvas.fill_disc(p.x, p.y, PETAL_RADIUS * p.scale, 0xFF000000 | color);
                        }
                    }
                    if let Some(c) = self.camera.project(pos) {
                        self.canvas.fill_disc(c.x, c.y, FLOWER_CENTER_RADIUS * c.scale, 0xFF000000 | palette.flower_center);
                    }
                }
            }
        }
    }
}

/// Additive square splats, one per particle, sized by distance.
pub fn draw_particles(canvas: &mut Canvas, camera: &Camera, positions: &[f32], tint: u32, field: &FieldConfig) {
    let color = scale_rgb(tint, field.opacity);
    for xyz in positions.chunks_exact(3) {
        let Some(p) = camera.project(Vec3::new(xyz[0], xyz[1], xyz[2])) else { continue };
        let side = (field.particle_size * p.scale).round().max(1.0) as usize;
        let half = side as f32 / 2.0;
        canvas.add_rect((p.x - half) as isize, (p.y - half) as isize, side, side, color);
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Color helpers
// ────────────────────────────────────────────────────────────────────────────

/// Alpha-blend two ARGB colors. `t` = 0.0 → all `a`, `t` = 1.0 → all `b`.
fn blend(a: u32, b: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |ca: u32, cb: u32| (ca as f32 * (1.0-t) + cb as f32 * t) as u32;
    let ar = (a >> 16) & 0xFF; let br = (b >> 16) & 0xFF;
    let ag = (a >>  8) & 0xFF; let bg = (b >>  8) & 0xFF;
    let ab =  a        & 0xFF; let bb =  b        & 0xFF;
    0xFF000000 | (lerp(ar,br) << 16) | (lerp(ag,bg) << 8) | lerp(ab,bb)
}

fn add(a: u32, b: u32) -> u32 {
    let ch = |s: u32| (((a >> s) & 0xFF) + ((b >> s) & 0xFF)).min(0xFF) << s;
    0xFF000000 | ch(16) | ch(8) | ch(0)
}

fn scale_rgb(c: u32, k: f32) -> u32 {
    let k = k.clamp(0.0, 1.0);
    let ch = |s: u32| ((((c >> s) & 0xFF) as f32 * k) as u32) << s;
    0xFF000000 | ch(16) | ch(8) | ch(0)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
