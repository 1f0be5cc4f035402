// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Font descriptors: predicate-driven font selection

use crate::data::{Rgb, Unit};
use crate::fonts::RenderFont;
use crate::raster::Raster;

/// Result of asking a descriptor whether it takes a character
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MatchResult {
    /// The descriptor does not take this character
    #[default]
    NoMatch,
    /// The descriptor takes this character, optionally forcing a run color
    Match {
        /// Overrides the descriptor's fixed color and the global draw color
        color: Option<Rgb>,
    },
}

impl MatchResult {
    /// A match without color override
    pub const MATCH: MatchResult = MatchResult::Match { color: None };

    #[inline]
    pub fn is_match(self) -> bool {
        self != MatchResult::NoMatch
    }
}

impl From<bool> for MatchResult {
    #[inline]
    fn from(matched: bool) -> Self {
        match matched {
            true => MatchResult::MATCH,
            false => MatchResult::NoMatch,
        }
    }
}

/// A rasterizable font plus the rules deciding which characters it takes
///
/// Descriptors are tried in list order: the first whose matcher accepts a
/// character resolves that character's font (subject to glyph-coverage
/// fallback, see [`Options::font_fallback`][crate::Options::font_fallback]).
///
/// ```no_run
/// use polytext::{FontDescriptor, Rgb};
/// use polytext::fonts::{library, RenderFont};
///
/// let face = library().load_path("NotoSans.ttf", 0)?;
/// let ascii = FontDescriptor::from_predicate(RenderFont::new(face, 24.0), |c| c.is_ascii())
///     .with_color(Rgb::new(22, 125, 255));
/// # Ok::<(), polytext::fonts::FontError>(())
/// ```
pub struct FontDescriptor {
    font: RenderFont,
    matcher: Box<dyn Fn(&Unit) -> MatchResult>,
    fixed_color: Option<Rgb>,
    coverage: Option<Box<dyn Fn(char) -> bool>>,
    pub(crate) is_emoji: bool,
}

impl std::fmt::Debug for FontDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("FontDescriptor")
            .field("font", &self.font)
            .field("fixed_color", &self.fixed_color)
            .field("is_emoji", &self.is_emoji)
            .finish_non_exhaustive()
    }
}

impl FontDescriptor {
    /// Construct from a full matcher predicate
    ///
    /// The matcher sees each character together with its chunk tag and may
    /// return a per-run color override.
    pub fn new(font: RenderFont, matcher: impl Fn(&Unit) -> MatchResult + 'static) -> Self {
        FontDescriptor {
            font,
            matcher: Box::new(matcher),
            fixed_color: None,
            coverage: None,
            is_emoji: false,
        }
    }

    /// Construct from a plain character predicate
    pub fn from_predicate(font: RenderFont, pred: impl Fn(char) -> bool + 'static) -> Self {
        Self::new(font, move |unit| pred(unit.ch).into())
    }

    /// The synthetic descriptor catching emoji codepoints
    ///
    /// Injected by the engine as the first, highest-priority descriptor when
    /// emoji handling is enabled; never constructed for user font lists.
    pub(crate) fn emoji(font: RenderFont) -> Self {
        let mut descriptor = Self::from_predicate(font, crate::emoji::is_emoji);
        descriptor.is_emoji = true;
        descriptor
    }

    /// Set a fixed color for all runs using this descriptor
    ///
    /// A per-run color from the matcher still takes precedence.
    pub fn with_color(mut self, color: Rgb) -> Self {
        self.fixed_color = Some(color);
        self
    }

    /// Replace the glyph-coverage predicate
    ///
    /// The default queries the rasterizer, which for the canvas backend is a
    /// cached codepoint-map membership test derived from the font file.
    pub fn with_coverage(mut self, coverage: impl Fn(char) -> bool + 'static) -> Self {
        self.coverage = Some(Box::new(coverage));
        self
    }

    /// The measurement/drawing handle
    #[inline]
    pub fn font(&self) -> RenderFont {
        self.font
    }

    /// The fixed color, if any
    #[inline]
    pub fn fixed_color(&self) -> Option<Rgb> {
        self.fixed_color
    }

    /// Ask the matcher about a character
    #[inline]
    pub fn matches(&self, unit: &Unit) -> MatchResult {
        (self.matcher)(unit)
    }

    /// Coverage check, used only when font fallback is enabled
    pub fn has_glyph(&self, raster: &dyn Raster, c: char) -> bool {
        match &self.coverage {
            Some(coverage) => coverage(c),
            None => raster.has_glyph(&self.font, c),
        }
    }
}
