//! Glyph rasterizer: text → alpha bitmap → sparse world-space targets.
//!
//! The bitmap is sampled on a fixed stride in row-major order. That order
//! matters: the particle field hands point `i` to particle `i`, so the same
//! text always maps the same particles to the same pixels.

use glam::Vec3;

use crate::config::RasterConfig;
use crate::font::{self, GLYPH_ROWS};

/// Text shown for the love gesture.
pub const LOVE_TEXT: &str = "I ❤ U";

// ════════════════════════════════════════════════════════════════════════════
// AlphaBitmap
// ════════════════════════════════════════════════════════════════════════════

/// Single-channel offscreen surface, one alpha byte per pixel.
#[derive(Clone, Debug)]
pub struct AlphaBitmap {
    pub width:  usize,
    pub height: usize,
    alpha:      Vec<u8>,
}

impl AlphaBitmap {
    pub fn new(width: usize, height: usize) -> Self {
        AlphaBitmap { width, height, alpha: vec![0; width * height] }
    }

    pub fn clear(&mut self) {
        self.alpha.fill(0);
    }

    pub fn alpha(&self, x: usize, y: usize) -> u8 {
        self.alpha[y * self.width + x]
    }

    /// Fill a rectangle, clipped to the surface.
    pub fn fill_rect(&mut self, x: isize, y: isize, w: usize, h: usize, alpha: u8) {
        let x0 = x.max(0) as usize;
        let y0 = y.max(0) as usize;
        let x1 = (x + w as isize).clamp(0, self.width as isize) as usize;
        let y1 = (y + h as isize).clamp(0, self.height as isize) as usize;
        for row in y0..y1 {
            self.alpha[row * self.width + x0.min(x1)..row * self.width + x1].fill(alpha);
        }
    }

    /// Pixels with nonzero alpha.
    #[cfg(test)]
    pub fn coverage(&self) -> usize {
        self.alpha.iter().filter(|&&a| a > 0).count()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// GlyphRenderer
// ════════════════════════════════════════════════════════════════════════════

/// Draws text centered into an alpha bitmap at roughly `font_px` tall.
pub trait GlyphRenderer: Send {
    fn draw(&self, text: &str, font_px: usize, bitmap: &mut AlphaBitmap);
}

/// Renders the built-in bitmap font as solid blocks, one font cell being
/// `font_px / 5` pixels square.
#[derive(Clone, Copy, Debug, Default)]
pub struct BlockFont;

impl GlyphRenderer for BlockFont {
    fn draw(&self, text: &str, font_px: usize, bitmap: &mut AlphaBitmap) {
        let cell = (font_px / GLYPH_ROWS).max(1);
        let text_w = font::text_cells(text) * cell;
        let text_h = GLYPH_ROWS * cell;

        let mut x = (bitmap.width as isize - text_w as isize) / 2;
        let y = (bitmap.height as isize - text_h as isize) / 2;

        for c in text.chars().filter(|&c| !font::is_zero_width(c)) {
            let Some(g) = font::glyph(c) else { continue };
            for row in 0..GLYPH_ROWS {
                for col in 0..g.width {
                    if g.lit(col, row) {
                        bitmap.fill_rect(
                            x + (col * cell) as isize,
                            y + (row * cell) as isize,
                            cell, cell, 255,
                        );
                    }
                }
            }
            x += ((g.width + 1) * cell) as isize;
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Rasterizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Rasterizer {
    config:   RasterConfig,
    renderer: Box<dyn GlyphRenderer>,
    bitmap:   AlphaBitmap,
}

impl Rasterizer {
    pub fn new(config: RasterConfig) -> Self {
        Self::with_renderer(config, Box::new(BlockFont))
    }

    pub fn with_renderer(config: RasterConfig, renderer: Box<dyn GlyphRenderer>) -> Self {
        let bitmap = AlphaBitmap::new(config.width, config.height);
        Rasterizer { config, renderer, bitmap }
    }

    /// Render `text` and return its foreground samples in world space,
    /// row-major. `love_mode` selects the smaller font.
    pub fn synthesize_targets(&mut self, text: &str, love_mode: bool) -> Vec<Vec3> {
        let font_px = if love_mode { self.config.love_font_px } else { self.config.digit_font_px };

        self.bitmap.clear();
        self.renderer.draw(text, font_px, &mut self.bitmap);

        let points = self.sample();
        log::debug!("rasterized {:?} at {}px → {} targets", text, font_px, points.len());
        points
    }

    fn sample(&self) -> Vec<Vec3> {
        let cfg = &self.config;
        let stride = cfg.stride.max(1);
        let half_w = cfg.width as f32 / 2.0;
        let half_h = cfg.height as f32 / 2.0;

        let mut points = Vec::new();
        for y in (0..cfg.height).step_by(stride) {
            for x in (0..cfg.width).step_by(stride) {
                if self.bitmap.alpha(x, y) > cfg.alpha_threshold {
                    points.push(Vec3::new(
                        (x as f32 - half_w) * cfg.world_scale,
                        -(y as f32 - half_h) * cfg.world_scale,
                        0.0,
                    ));
                }
            }
        }
        points
    }

    #[cfg(test)]
    pub fn bitmap(&self) -> &AlphaBitmap { &self.bitmap }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raster() -> Rasterizer {
        Rasterizer::new(RasterConfig::default())
    }

    #[test]
    fn digit_one_sample_count() {
        // 30px cells at x=155, y=25; per-cell sample counts follow the
        // 4px grid alignment of each cell edge
        let pts = raster().synthesize_targets("1", false);
        assert_eq!(pts.len(), 435);
    }

    #[test]
    fn targets_are_row_major_and_flat() {
        let pts = raster().synthesize_targets("2", false);
        assert!(!pts.is_empty());
        for w in pts.windows(2) {
            assert!(w[1].y < w[0].y || (w[1].y == w[0].y && w[1].x > w[0].x));
        }
        assert!(pts.iter().all(|p| p.z == 0.0));
    }

    #[test]
    fn targets_stay_inside_scaled_bitmap() {
        let pts = raster().synthesize_targets("3", false);
        for p in &pts {
            assert!(p.x >= -20.0 && p.x < 20.0);
            assert!(p.y > -10.0 && p.y <= 10.0);
        }
    }

    #[test]
    fn symmetric_glyph_is_centred() {
        let pts = raster().synthesize_targets("8", false);
        let mean_x: f32 = pts.iter().map(|p| p.x).sum::<f32>() / pts.len() as f32;
        assert!(mean_x.abs() < 1e-3, "mean x {}", mean_x);
    }

    #[test]
    fn love_text_uses_smaller_font() {
        let mut r = raster();
        let love = r.synthesize_targets(LOVE_TEXT, true);
        assert!(!love.is_empty());
        // 16px cells: the heart's widest row spans 80px
        let big = r.synthesize_targets(LOVE_TEXT, false);
        assert_ne!(love.len(), big.len());
        assert!(love.len() < 3000);
    }

    #[test]
    fn emoji_presentation_selector_is_ignored() {
        let mut r = raster();
        let plain = r.synthesize_targets("I ❤ U", true);
        let emoji = r.synthesize_targets("I ❤\u{FE0F} U", true);
        assert_eq!(plain, emoji);
    }

    #[test]
    fn unsupported_text_yields_no_targets() {
        let pts = raster().synthesize_targets("\u{1F600}", false);
        assert!(pts.is_empty());
    }

    #[test]
    fn render_clears_previous_text() {
        let mut r = raster();
        r.synthesize_targets("8", false);
        r.synthesize_targets("", false);
        assert_eq!(r.bitmap().coverage(), 0);
    }

    #[test]
    fn oversized_text_is_clipped() {
        let pts = raster().synthesize_targets("88888", false);
        assert!(!pts.is_empty());
        assert!(pts.iter().all(|p| p.x >= -20.0 && p.x < 20.0));
    }

    struct Solid;
    impl GlyphRenderer for Solid {
        fn draw(&self, _text: &str, _font_px: usize, bitmap: &mut AlphaBitmap) {
            bitmap.fill_rect(0, 0, bitmap.width, bitmap.height, 200);
        }
    }

    #[test]
    fn custom_renderer_is_sampled_on_stride() {
        let mut r = Rasterizer::with_renderer(RasterConfig::default(), Box::new(Solid));
        let pts = r.synthesize_targets("x", false);
        assert_eq!(pts.len(), 100 * 50);
        assert_eq!(pts[0], Vec3::new(-20.0, 10.0, 0.0));
    }

    #[test]
    fn alpha_threshold_is_exclusive() {
        struct Faint;
        impl GlyphRenderer for Faint {
            fn draw(&self, _t: &str, _f: usize, b: &mut AlphaBitmap) {
                b.fill_rect(0, 0, b.width, b.height, 128);
            }
        }
        let mut r = Rasterizer::with_renderer(RasterConfig::default(), Box::new(Faint));
        assert!(r.synthesize_targets("x", false).is_empty());
    }
}
