// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Font library: face storage, metrics and codepoint coverage
//!
//! Faces are loaded into a process-global [`FontLibrary`] and addressed by
//! [`FaceId`]. Layout works on [`RenderFont`] handles (a face plus a pixel
//! size); metrics are read through [`FaceRef`] / [`ScaledFaceRef`].

mod coverage;
mod face;
mod library;

pub use coverage::Coverage;
pub use face::{FaceRef, ScaledFaceRef};
pub use library::{library, FaceId, FaceStore, FontError, FontLibrary};

/// Glyph identifier within a font face
///
/// `GlyphId(0)` is the font's "missing glyph" representation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct GlyphId(pub u16);

impl From<GlyphId> for ttf_parser::GlyphId {
    #[inline]
    fn from(id: GlyphId) -> Self {
        ttf_parser::GlyphId(id.0)
    }
}

/// Opaque handle to a typeface at a fixed pixel size
///
/// Used by descriptors for measurement and drawing. For the default backend
/// `face` indexes the [`FontLibrary`]; mock rasterizers may assign ids
/// arbitrarily.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderFont {
    /// Face identifier
    pub face: FaceId,
    /// Pixel size: dots (pixels) per Em
    pub dpem: f32,
}

impl RenderFont {
    #[inline]
    pub fn new(face: FaceId, dpem: f32) -> Self {
        RenderFont { face, dpem }
    }
}
