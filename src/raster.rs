// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Glyph measurement and drawing backends
//!
//! The layout engine is backend-agnostic: it drives a [`Raster`]
//! implementation for measurement, metrics, coverage and draw calls. The
//! default [`CanvasRaster`] backend (feature `raster`) rasterizes glyph
//! outlines with `ab_glyph` and composes them, along with decoded emoji
//! bitmaps, onto a `tiny_skia` pixmap.

use crate::data::{Rgb, Vec2};
use crate::error::Result;
use crate::fonts::RenderFont;

/// Vertical extents of a font at a given size
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LineMetrics {
    /// Pixels above the baseline (positive)
    pub ascent: f32,
    /// Pixels below the baseline (positive)
    pub descent: f32,
}

impl LineMetrics {
    /// The line metric height: ascent + descent
    #[inline]
    pub fn height(&self) -> f32 {
        self.ascent + self.descent
    }
}

/// Measurement and drawing surface
///
/// One implementation serves a whole draw call; it owns (or borrows) the
/// target surface. Measurement must be consistent with drawing: the cursor
/// advances by exactly the measured width of what was drawn.
pub trait Raster {
    /// Measure `text`, returning (width, height) in pixels
    ///
    /// Width is the advance sum; height is the ink height of the text.
    fn measure(&mut self, font: &RenderFont, text: &str) -> Vec2;

    /// Ascent and descent of `font`
    fn line_metrics(&self, font: &RenderFont) -> LineMetrics;

    /// Whether `font` has a glyph for `c`
    fn has_glyph(&self, font: &RenderFont, c: char) -> bool;

    /// Draw `text` with its line box anchored at `pos` (top-left)
    fn draw_glyphs(&mut self, pos: Vec2, font: &RenderFont, text: &str, color: Rgb) -> Result<()>;

    /// Draw a PNG image with its top-left at `pos`, scaled to `height`
    fn draw_image(&mut self, pos: Vec2, png: &[u8], height: f32) -> Result<()>;
}

#[cfg(feature = "raster")]
pub use canvas::CanvasRaster;

#[cfg(feature = "raster")]
mod canvas {
    use super::{LineMetrics, Raster};
    use crate::data::{Rgb, Vec2};
    use crate::error::{Error, Result};
    use crate::fonts::{library, GlyphId, RenderFont, ScaledFaceRef};
    use ab_glyph::Font;
    use easy_cast::*;
    use tiny_skia::{FilterQuality, Pixmap, PixmapPaint, PremultipliedColorU8, Transform};

    /// Default backend: rasterizes onto an owned RGBA pixmap
    ///
    /// Faces must be loaded into the [`library`] before use; `FaceId`s in
    /// [`RenderFont`] handles index it.
    pub struct CanvasRaster {
        pixmap: Pixmap,
    }

    impl CanvasRaster {
        /// Construct with a transparent canvas of the given size
        ///
        /// Returns `None` if either dimension is zero.
        pub fn new(width: u32, height: u32) -> Option<Self> {
            Pixmap::new(width, height).map(|pixmap| CanvasRaster { pixmap })
        }

        /// Construct over an existing pixmap
        pub fn from_pixmap(pixmap: Pixmap) -> Self {
            CanvasRaster { pixmap }
        }

        /// Read access to the canvas
        pub fn pixmap(&self) -> &Pixmap {
            &self.pixmap
        }

        /// Write access to the canvas (e.g. to fill a background)
        pub fn pixmap_mut(&mut self) -> &mut Pixmap {
            &mut self.pixmap
        }

        /// Extract the canvas
        pub fn into_pixmap(self) -> Pixmap {
            self.pixmap
        }

        fn scaled(&self, font: &RenderFont) -> ScaledFaceRef {
            library().get_face(font.face).scale_by_dpem(font.dpem)
        }

        /// Source-over blend of a coverage-weighted color pixel
        fn blend(&mut self, px: i32, py: i32, color: Rgb, coverage: f32) {
            let (w, h) = (self.pixmap.width(), self.pixmap.height());
            if px < 0 || py < 0 {
                return;
            }
            let (px, py): (u32, u32) = (px.cast(), py.cast());
            if px >= w || py >= h {
                return;
            }
            let a = u32::conv_trunc((coverage.clamp(0.0, 1.0) * 255.0) + 0.5).min(255);
            if a == 0 {
                return;
            }
            let idx = usize::conv(py * w + px);
            let pixels = self.pixmap.pixels_mut();
            let dst = pixels[idx];
            let inv = 255 - a;
            let blend1 = |s: u8, d: u8| -> u8 {
                ((u32::from(s) * a + u32::from(d) * inv) / 255).min(255).cast()
            };
            let alpha = blend1(255, dst.alpha());
            let r = blend1(color.r, dst.red()).min(alpha);
            let g = blend1(color.g, dst.green()).min(alpha);
            let b = blend1(color.b, dst.blue()).min(alpha);
            if let Some(c) = PremultipliedColorU8::from_rgba(r, g, b, alpha) {
                pixels[idx] = c;
            }
        }
    }

    impl Raster for CanvasRaster {
        fn measure(&mut self, font: &RenderFont, text: &str) -> Vec2 {
            let sf = self.scaled(font);
            let mut caret = 0.0;
            let (mut low, mut high) = (f32::INFINITY, f32::NEG_INFINITY);
            for c in text.chars() {
                let id = sf.face().glyph_index(c);
                caret += sf.h_advance(id);
                if let Some((y_min, y_max)) = sf.glyph_v_bounds(id) {
                    low = low.min(y_min);
                    high = high.max(y_max);
                }
            }
            let height = if high > low { high - low } else { 0.0 };
            Vec2(caret, height)
        }

        fn line_metrics(&self, font: &RenderFont) -> LineMetrics {
            let sf = self.scaled(font);
            LineMetrics {
                ascent: sf.ascent(),
                descent: sf.descent(),
            }
        }

        fn has_glyph(&self, font: &RenderFont, c: char) -> bool {
            library().coverage(font.face).contains(c)
        }

        fn draw_glyphs(
            &mut self,
            pos: Vec2,
            font: &RenderFont,
            text: &str,
            color: Rgb,
        ) -> Result<()> {
            let store = library().get_face_store(font.face);
            let sf = store.face_ref().scale_by_dpem(font.dpem);
            let ab = store.ab_glyph();
            let scale = font.dpem * ab.height_unscaled() / ab.units_per_em().unwrap();
            let baseline = pos.1 + sf.ascent();

            let mut caret = pos.0;
            for c in text.chars() {
                let id = store.face_ref().glyph_index(c);
                let glyph = ab_glyph::Glyph {
                    id: ab_glyph::GlyphId(id.0),
                    scale: scale.into(),
                    position: ab_glyph::point(0.0, 0.0),
                };
                if let Some(outline) = ab.outline_glyph(glyph) {
                    let bounds = outline.px_bounds();
                    let (ox, oy) = (caret + bounds.min.x, baseline + bounds.min.y);
                    outline.draw(|gx, gy, coverage| {
                        let px = i32::conv_trunc(ox) + i32::conv(gx);
                        let py = i32::conv_trunc(oy) + i32::conv(gy);
                        self.blend(px, py, color, coverage);
                    });
                } else if id == GlyphId(0) && !c.is_whitespace() {
                    log::warn!("no outline for {c:?} in face {:?}", font.face);
                }
                caret += sf.h_advance(id);
            }
            Ok(())
        }

        fn draw_image(&mut self, pos: Vec2, png: &[u8], height: f32) -> Result<()> {
            let image = Pixmap::decode_png(png).map_err(|err| Error::Emoji(err.to_string()))?;
            let scale = height / image.height() as f32;
            let paint = PixmapPaint {
                quality: FilterQuality::Bilinear,
                ..PixmapPaint::default()
            };
            let transform = Transform::from_scale(scale, scale).post_translate(pos.0, pos.1);
            self.pixmap
                .draw_pixmap(0, 0, image.as_ref(), &paint, transform, None);
            Ok(())
        }
    }
}
