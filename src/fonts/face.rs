// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Font face types

use super::GlyphId;
use crate::conv::DPU;
use ttf_parser::Face;

/// Handle to a loaded font face
#[derive(Copy, Clone, Debug)]
pub struct FaceRef(pub(crate) &'static Face<'static>);

impl FaceRef {
    /// Get glyph identifier for a char
    ///
    /// If the char is not found, `GlyphId(0)` is returned (the 'missing
    /// glyph' representation).
    #[inline]
    pub fn glyph_index(&self, c: char) -> GlyphId {
        GlyphId(self.0.glyph_index(c).map(|id| id.0).unwrap_or(0))
    }

    /// Convert `dpem` (pixels/em) to `dpu` (pixels per font unit)
    #[inline]
    pub fn dpu(self, dpem: f32) -> DPU {
        DPU(dpem / f32::from(self.0.units_per_em()))
    }

    /// Get a scaled reference
    ///
    /// Units: `dpem` is dots (pixels) per Em.
    #[inline]
    pub fn scale_by_dpem(self, dpem: f32) -> ScaledFaceRef {
        ScaledFaceRef(self.0, self.dpu(dpem))
    }
}

/// Handle to a loaded font face at a fixed scale
#[derive(Copy, Clone, Debug)]
pub struct ScaledFaceRef(&'static Face<'static>, DPU);

impl ScaledFaceRef {
    /// Unscaled face
    #[inline]
    pub fn face(&self) -> FaceRef {
        FaceRef(self.0)
    }

    /// Horizontal advancement after this glyph, without shaping or kerning
    #[inline]
    pub fn h_advance(&self, id: GlyphId) -> f32 {
        let x = self.0.glyph_hor_advance(id.into()).unwrap_or(0);
        self.1.u16_to_px(x)
    }

    /// Ascender (pixels above the baseline, positive)
    #[inline]
    pub fn ascent(&self) -> f32 {
        self.1.i16_to_px(self.0.ascender())
    }

    /// Descender depth (pixels below the baseline, positive)
    #[inline]
    pub fn descent(&self) -> f32 {
        -self.1.i16_to_px(self.0.descender())
    }

    /// Line height (ascent + descent + line gap)
    #[inline]
    pub fn height(&self) -> f32 {
        self.1.i16_to_px(self.0.height())
    }

    /// Vertical ink extent of a glyph: (y_min, y_max) in pixels, y up
    #[inline]
    pub fn glyph_v_bounds(&self, id: GlyphId) -> Option<(f32, f32)> {
        self.0
            .glyph_bounding_box(id.into())
            .map(|rect| (self.1.i16_to_px(rect.y_min), self.1.i16_to_px(rect.y_max)))
    }
}
