// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Simple data types: geometry, colors, input model, options, results

use crate::fonts::RenderFont;
use crate::segment::Segment;
use std::any::Any;
use std::ops::{Add, AddAssign, Sub};

/// 2D vector (x, y) over `f32`
///
/// Usually used as either a position (from the draw origin, y downwards) or
/// a (width, height) size.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2(pub f32, pub f32);

impl Vec2 {
    /// Zero vector
    pub const ZERO: Vec2 = Vec2(0.0, 0.0);
    /// Positive infinity (unbounded size)
    pub const INFINITY: Vec2 = Vec2(f32::INFINITY, f32::INFINITY);
}

impl Add for Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2(self.0 + rhs.0, self.1 + rhs.1)
    }
}

impl AddAssign for Vec2 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec2) {
        self.0 += rhs.0;
        self.1 += rhs.1;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    #[inline]
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2(self.0 - rhs.0, self.1 - rhs.1)
    }
}

impl From<(f32, f32)> for Vec2 {
    #[inline]
    fn from((x, y): (f32, f32)) -> Vec2 {
        Vec2(x, y)
    }
}

/// An opaque 24-bit color
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
    pub const WHITE: Rgb = Rgb {
        r: 255,
        g: 255,
        b: 255,
    };

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Rgb {
        Rgb { r, g, b }
    }
}

impl From<(u8, u8, u8)> for Rgb {
    #[inline]
    fn from((r, g, b): (u8, u8, u8)) -> Rgb {
        Rgb { r, g, b }
    }
}

/// A span of text with caller metadata visible to matcher predicates
///
/// Chunks are expanded to per-character units before font resolution; the
/// tag applies to every character of the span and never affects run merging
/// beyond what the resolved font and color already do.
#[derive(Clone, Copy)]
pub struct Chunk<'a> {
    pub text: &'a str,
    pub tag: Option<&'a dyn Any>,
}

impl<'a> Chunk<'a> {
    #[inline]
    pub fn plain(text: &'a str) -> Self {
        Chunk { text, tag: None }
    }

    #[inline]
    pub fn tagged(text: &'a str, tag: &'a dyn Any) -> Self {
        Chunk {
            text,
            tag: Some(tag),
        }
    }
}

/// Input to a draw call: a flat string or a sequence of tagged chunks
#[derive(Clone, Copy)]
pub enum Content<'a> {
    Plain(&'a str),
    Chunks(&'a [Chunk<'a>]),
}

impl<'a> From<&'a str> for Content<'a> {
    #[inline]
    fn from(text: &'a str) -> Self {
        Content::Plain(text)
    }
}

impl<'a> From<&'a [Chunk<'a>]> for Content<'a> {
    #[inline]
    fn from(chunks: &'a [Chunk<'a>]) -> Self {
        Content::Chunks(chunks)
    }
}

impl<'a> Content<'a> {
    /// Iterate over per-character units
    pub(crate) fn units(self) -> impl Iterator<Item = Unit<'a>> + 'a {
        let (text, chunks) = match self {
            Content::Plain(text) => (Some(text), None),
            Content::Chunks(chunks) => (None, Some(chunks)),
        };
        text.into_iter()
            .map(|t| Chunk { text: t, tag: None })
            .chain(chunks.into_iter().flatten().copied())
            .flat_map(|chunk| chunk.text.chars().map(move |ch| Unit { ch, tag: chunk.tag }))
    }
}

/// A single input character plus the metadata of its chunk
#[derive(Clone, Copy)]
pub struct Unit<'a> {
    pub ch: char,
    pub tag: Option<&'a dyn Any>,
}

/// Leading treatment of wrapped lines
#[derive(Clone, Debug, PartialEq)]
pub enum WrapIndent {
    /// Pixel offset added to the x cursor after a wrap; nothing is drawn
    Offset(f32),
    /// Literal text drawn at the start of every wrapped line
    Text(String),
}

impl Default for WrapIndent {
    fn default() -> Self {
        WrapIndent::Offset(0.0)
    }
}

/// Configuration of a draw call
///
/// All bounds are budgets measured from the draw origin. `f32::INFINITY`
/// (width/height) and `u32::MAX` (lines) mean unbounded; these are the
/// defaults.
#[derive(Debug)]
pub struct Options {
    /// Global draw color; per-descriptor and per-run colors take precedence
    pub color: Rgb,
    /// Maximum line width; overflowing segments wrap
    pub max_width: f32,
    /// Maximum height; drawing stops before a line would exceed it
    pub max_height: f32,
    /// Maximum number of lines
    pub max_lines: u32,
    /// Marker drawn after the last committed segment on truncation
    pub end_marker: String,
    /// Font for the end marker; default is the last descriptor's font
    pub end_marker_font: Option<RenderFont>,
    /// Fixed line height; `None` resolves it from font metrics
    pub line_height: Option<f32>,
    /// Resolve line height from descriptor metrics only (no segment pass)
    pub fast_line_height: bool,
    /// Seed the wrap-point binary search with an estimated fit point
    pub guess_line_breaks: bool,
    /// Vertically center segments of differing metric heights within a line
    pub auto_y_offset: bool,
    /// Recognize emoji and route them to the emoji compositor
    pub emoji: bool,
    /// Emoji raster size; `None` uses the first descriptor's pixel size
    pub emoji_size: Option<f32>,
    /// Substitute a glyph-covering descriptor when the first match lacks one
    pub font_fallback: bool,
    /// Leading treatment of wrapped lines
    pub wrap_indent: WrapIndent,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            color: Rgb::BLACK,
            max_width: f32::INFINITY,
            max_height: f32::INFINITY,
            max_lines: u32::MAX,
            end_marker: String::new(),
            end_marker_font: None,
            line_height: None,
            fast_line_height: true,
            guess_line_breaks: true,
            auto_y_offset: true,
            emoji: true,
            emoji_size: None,
            font_fallback: true,
            wrap_indent: WrapIndent::default(),
        }
    }
}

/// Axis-aligned bounding box
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoundingBox {
    /// Top-left corner
    pub pos: Vec2,
    /// Width and height
    pub size: Vec2,
}

/// Result of a draw call
#[derive(Clone, Debug, PartialEq)]
pub struct DrawResult {
    /// Cursor position after the last committed segment
    pub pos: Vec2,
    /// Box spanning everything drawn; zero-sized at the origin if nothing was
    pub bounds: BoundingBox,
    /// Number of lines on which at least one segment was committed
    pub lines: u32,
    /// Whether a height or line-count limit stopped drawing early
    pub truncated: bool,
    /// The line height used for layout
    pub line_height: f32,
    /// The last segment (or partial segment) committed, if any
    pub last_segment: Option<Segment>,
}
