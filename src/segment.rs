// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Segment building: breaking input into maximal same-font runs
//!
//! A segment is the unit of layout: a maximal contiguous span of input
//! sharing one resolved font descriptor and color. Newlines are always
//! isolated into single-character segments; emoji characters collect into
//! emoji segments regardless of which descriptor would otherwise match.

use crate::conv::to_u32;
use crate::data::{Content, Options, Rgb, Unit};
use crate::descriptor::{FontDescriptor, MatchResult};
use crate::error::{Error, Result};
use crate::fonts::{FaceId, RenderFont};
use crate::raster::Raster;
use smallvec::SmallVec;

/// Resolved-descriptor index of the synthetic emoji descriptor
pub(crate) const EMOJI_DESCR: u32 = u32::MAX;

/// An emitted unit of layout
///
/// Invariants: `text` is non-empty; a literal newline is always a lone
/// single-character segment; emoji and non-emoji characters never share a
/// segment; adjacent segments are never mergeable (merging is resolved
/// eagerly at construction).
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    /// The characters of this run
    pub text: String,
    /// Measurement/drawing handle of the resolved descriptor
    pub font: RenderFont,
    /// Whether this run is drawn through the emoji compositor
    pub is_emoji: bool,
    /// Resolved color override (per-run, else descriptor fixed color)
    pub color: Option<Rgb>,
    /// Index of the resolved descriptor (`EMOJI_DESCR` for the synthetic one)
    pub(crate) descr: u32,
}

/// Output of segment building
#[derive(Debug)]
pub struct SegmentList {
    /// Segments in input order
    pub segments: Vec<Segment>,
    /// De-duplicated user-descriptor indices actually consumed
    pub(crate) used: SmallVec<[u32; 8]>,
    /// Whether any emoji segment was emitted
    pub(crate) has_emoji: bool,
}

impl SegmentList {
    /// Partition `content` into segments using the given descriptor list
    ///
    /// Descriptors are tried in list order per character; with
    /// [`Options::emoji`] a synthetic emoji descriptor is tried first. With
    /// [`Options::font_fallback`], a matching descriptor lacking the glyph is
    /// passed over for the next matching descriptor that has it; if none
    /// does, the first match is used anyway. A character no descriptor
    /// matches fails the call with [`Error::NoFontMatch`].
    pub fn build(
        content: Content,
        fonts: &[FontDescriptor],
        raster: &dyn Raster,
        opts: &Options,
    ) -> Result<SegmentList> {
        let emoji_descr = opts.emoji.then(|| {
            let font = fonts
                .first()
                .map(|d| d.font())
                .unwrap_or(RenderFont::new(FaceId::from(u32::MAX), 0.0));
            FontDescriptor::emoji(font)
        });

        let mut list = SegmentList {
            segments: Vec::new(),
            used: SmallVec::new(),
            has_emoji: false,
        };
        // Char count of the trailing segment, tracked to keep the size guard
        // from re-counting on every extension.
        let mut last_len: usize = 0;

        for unit in content.units() {
            let (descr, descriptor, run_color) =
                resolve(&unit, emoji_descr.as_ref(), fonts, raster, opts)?;
            let color = run_color.or(descriptor.fixed_color());

            if !list.used.contains(&descr) {
                list.used.push(descr);
            }

            let is_emoji = descriptor.is_emoji;
            let cap = size_guard_cap(descriptor.font().dpem, opts);
            let extend = match list.segments.last() {
                Some(prev) if last_len < cap && prev.text != "\n" && unit.ch != '\n' => {
                    if is_emoji {
                        // Emoji extend emoji runs only, descriptor identity aside.
                        prev.is_emoji
                    } else {
                        !prev.is_emoji && prev.descr == descr && prev.color == color
                    }
                }
                _ => false,
            };

            if extend {
                let prev = list.segments.last_mut().unwrap();
                prev.text.push(unit.ch);
                last_len += 1;
            } else {
                list.segments.push(Segment {
                    text: unit.ch.to_string(),
                    font: descriptor.font(),
                    is_emoji,
                    color,
                    descr,
                });
                last_len = 1;
            }
            list.has_emoji |= is_emoji;
        }

        log::debug!("built {} segments", list.segments.len());
        Ok(list)
    }
}

/// Resolve the descriptor for one character
///
/// Returns the resolved index, the descriptor and the per-run color override.
fn resolve<'a>(
    unit: &Unit,
    emoji_descr: Option<&'a FontDescriptor>,
    fonts: &'a [FontDescriptor],
    raster: &dyn Raster,
    opts: &Options,
) -> Result<(u32, &'a FontDescriptor, Option<Rgb>)> {
    let mut first_match: Option<(u32, &FontDescriptor, Option<Rgb>)> = None;

    let candidates = emoji_descr
        .into_iter()
        .map(|d| (EMOJI_DESCR, d))
        .chain(fonts.iter().enumerate().map(|(i, d)| (to_u32(i), d)));

    for (index, descriptor) in candidates {
        let color = match descriptor.matches(unit) {
            MatchResult::NoMatch => continue,
            MatchResult::Match { color } => color,
        };
        if !opts.font_fallback || descriptor.is_emoji || descriptor.has_glyph(raster, unit.ch) {
            return Ok((index, descriptor, color));
        }
        // Matcher takes the char but the face lacks the glyph: remember the
        // first match and keep scanning for a covering descriptor.
        if first_match.is_none() {
            first_match = Some((index, descriptor, color));
        }
    }

    // No matching descriptor covers the glyph: the first match still wins
    // (it may render a missing-glyph placeholder, but it always draws).
    first_match.ok_or(Error::NoFontMatch(unit.ch))
}

/// Char-count cap above which a run is pre-emptively split
///
/// Estimated from a conservative per-character width of 1.5 em: a run twice
/// as long as could ever fit the width budget gains nothing from growing
/// further, it only makes each measurement call more expensive. Splitting
/// here must not change rendered output.
fn size_guard_cap(dpem: f32, opts: &Options) -> usize {
    if !opts.max_width.is_finite() || dpem <= 0.0 {
        return usize::MAX;
    }
    let per_char = dpem * 1.5;
    (2.0 * (opts.max_width / per_char).ceil() + 1.0).max(8.0) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_cap_unbounded_without_max_width() {
        let opts = Options::default();
        assert_eq!(size_guard_cap(24.0, &opts), usize::MAX);
    }

    #[test]
    fn guard_cap_scales_with_budget() {
        let opts = Options {
            max_width: 360.0,
            ..Options::default()
        };
        // 360 / (24 * 1.5) = 10 chars per line, doubled plus one.
        assert_eq!(size_guard_cap(24.0, &opts), 21);
        assert!(size_guard_cap(0.0, &opts) == usize::MAX);
    }
}
