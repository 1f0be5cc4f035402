// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Test support: a deterministic mock rasterizer and emoji sources

#![allow(dead_code)]

use polytext::fonts::{FaceId, RenderFont};
use polytext::{EmojiSource, LineMetrics, Raster, Result, Rgb, Vec2};

pub const ASCENT: f32 = 16.0;
pub const DESCENT: f32 = 4.0;
/// Mock line height: ASCENT + DESCENT
pub const LINE: f32 = 20.0;

/// Advance of one char in the mock: ASCII 10 px, everything else 20 px
pub fn char_width(c: char) -> f32 {
    if c == '\n' {
        0.0
    } else if c.is_ascii() {
        10.0
    } else {
        20.0
    }
}

pub fn text_width(text: &str) -> f32 {
    text.chars().map(char_width).sum()
}

/// A recorded draw operation
#[derive(Clone, Debug, PartialEq)]
pub enum Op {
    Glyphs {
        pos: (f32, f32),
        face: FaceId,
        text: String,
        color: Rgb,
    },
    Image {
        pos: (f32, f32),
        height: f32,
    },
}

/// Rasterizer with fixed per-char advances, recording every draw call
#[derive(Default)]
pub struct MockRaster {
    pub ops: Vec<Op>,
}

impl MockRaster {
    pub fn new() -> Self {
        MockRaster::default()
    }

    /// Texts of glyph draw ops, in order
    pub fn glyph_texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Glyphs { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Raster for MockRaster {
    fn measure(&mut self, _font: &RenderFont, text: &str) -> Vec2 {
        Vec2(text_width(text), 14.0)
    }

    fn line_metrics(&self, _font: &RenderFont) -> LineMetrics {
        LineMetrics {
            ascent: ASCENT,
            descent: DESCENT,
        }
    }

    fn has_glyph(&self, _font: &RenderFont, _c: char) -> bool {
        true
    }

    fn draw_glyphs(
        &mut self,
        pos: Vec2,
        font: &RenderFont,
        text: &str,
        color: Rgb,
    ) -> Result<()> {
        self.ops.push(Op::Glyphs {
            pos: (pos.0, pos.1),
            face: font.face,
            text: text.to_string(),
            color,
        });
        Ok(())
    }

    fn draw_image(&mut self, pos: Vec2, _png: &[u8], height: f32) -> Result<()> {
        self.ops.push(Op::Image {
            pos: (pos.0, pos.1),
            height,
        });
        Ok(())
    }
}

/// Source answering every lookup, counting how many reach it
#[derive(Default)]
pub struct CountingSource {
    pub lookups: usize,
}

impl EmojiSource for CountingSource {
    fn lookup(&mut self, _seq: &str) -> Result<Option<Vec<u8>>> {
        self.lookups += 1;
        Ok(Some(vec![0x89, 0x50, 0x4E, 0x47]))
    }
}

/// Source carrying nothing
pub struct EmptySource;

impl EmojiSource for EmptySource {
    fn lookup(&mut self, _seq: &str) -> Result<Option<Vec<u8>>> {
        Ok(None)
    }
}

/// A mock font handle; faces are arbitrary ids for the mock rasterizer
pub fn font(face: u32) -> RenderFont {
    RenderFont::new(FaceId::from(face), 20.0)
}
