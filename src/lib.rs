// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Polytext: mixed-script text layout and rasterization
//!
//! A single forward pass lays text out onto a raster canvas, choosing a font
//! per character through caller-supplied predicates, mixing in emoji bitmaps
//! from an external source, wrapping at a width budget and truncating past a
//! height or line-count budget with an end marker.
//!
//! ```no_run
//! use polytext::fonts::{library, RenderFont};
//! use polytext::{draw_text, CanvasRaster, FontDescriptor, Options, Vec2};
//!
//! let face = library().load_path("NotoSans.ttf", 0)?;
//! let font = RenderFont::new(face, 24.0);
//! let fonts = [FontDescriptor::from_predicate(font, |_| true)];
//!
//! let mut canvas = CanvasRaster::new(800, 600).unwrap();
//! let opts = Options {
//!     max_width: 780.0,
//!     emoji: false,
//!     ..Options::default()
//! };
//! let result = draw_text(&mut canvas, Vec2(10.0, 10.0), "hello", &fonts, &opts, None)?;
//! assert_eq!(result.lines, 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod conv;
mod data;
mod descriptor;
mod draw;
mod error;
mod metrics;
mod segment;

pub mod emoji;
pub mod fonts;
pub mod raster;

pub use data::{BoundingBox, Chunk, Content, DrawResult, Options, Rgb, Unit, Vec2, WrapIndent};
pub use descriptor::{FontDescriptor, MatchResult};
pub use draw::draw_text;
pub use emoji::{EmojiSource, LocalEmojiSource};
pub use error::{Error, Result};
#[cfg(feature = "raster")]
pub use raster::CanvasRaster;
pub use raster::{LineMetrics, Raster};
pub use segment::{Segment, SegmentList};
