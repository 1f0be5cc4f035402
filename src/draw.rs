// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! The forward layout/draw pass
//!
//! A single pass walks the segment queue, interleaving measurement,
//! wrapping, truncation and draw calls. Committed positions are final: there
//! is no backtracking across lines. Overflowing segments are split at a
//! binary-searched fit point and the remainder is pushed back onto the queue
//! in front of the cursor.

use crate::data::{BoundingBox, Content, DrawResult, Options, Vec2, WrapIndent};
use crate::descriptor::FontDescriptor;
use crate::emoji::{self, EmojiSession, EmojiSource};
use crate::error::{Error, Result};
use crate::metrics::{self, MIN_LINE_HEIGHT};
use crate::raster::Raster;
use crate::segment::{Segment, SegmentList};
use std::collections::{HashMap, VecDeque};

/// Lay out and draw `content` at `origin`
///
/// Fonts are chosen per character from `fonts` in priority order; emoji are
/// routed to `emoji_source` when [`Options::emoji`] is set. Lines wrap at
/// [`Options::max_width`] and drawing stops at [`Options::max_height`] /
/// [`Options::max_lines`], appending [`Options::end_marker`] on truncation.
///
/// On failure nothing is retried and already-drawn content stays on the
/// canvas; draw to an offscreen surface for all-or-nothing semantics.
pub fn draw_text<'a>(
    raster: &mut dyn Raster,
    origin: Vec2,
    content: impl Into<Content<'a>>,
    fonts: &[FontDescriptor],
    opts: &Options,
    emoji_source: Option<&mut dyn EmojiSource>,
) -> Result<DrawResult> {
    let list = SegmentList::build(content.into(), fonts, &*raster, opts)?;

    let emoji_size = opts
        .emoji_size
        .or_else(|| fonts.first().map(|d| d.font().dpem))
        .filter(|size| *size > 0.0)
        .unwrap_or(MIN_LINE_HEIGHT);

    let line_height = match opts.line_height {
        Some(height) if height > 0.0 => height,
        _ => metrics::line_height(raster, fonts, &list, opts, emoji_size),
    };

    let (indent_offset, indent_segments) = match &opts.wrap_indent {
        WrapIndent::Offset(px) => (px.max(0.0), None),
        WrapIndent::Text(text) if !text.is_empty() => {
            let indent = SegmentList::build(Content::Plain(text), fonts, &*raster, opts)?;
            (0.0, Some(indent))
        }
        WrapIndent::Text(_) => (0.0, None),
    };
    let has_emoji =
        list.has_emoji || indent_segments.as_ref().map_or(false, |list| list.has_emoji);
    let indent_segments = indent_segments.map(|list| list.segments);

    // End-marker pre-flight: it must fit the width budget even alone.
    let end_marker = opts.end_marker.as_str();
    let (end_font, end_width) = if !end_marker.is_empty() {
        let font = opts
            .end_marker_font
            .or_else(|| fonts.last().map(|d| d.font()))
            .ok_or(Error::MissingCapability("end-marker font"))?;
        let width = raster.measure(&font, end_marker).0;
        if opts.max_width.is_finite() && width > opts.max_width {
            return Err(Error::EndMarkerTooWide);
        }
        (Some(font), width)
    } else {
        (None, 0.0)
    };

    // The compositor session spans the whole pass and is released on every
    // exit path below, error or not.
    let mut session = match (has_emoji, emoji_source) {
        (true, Some(source)) => Some(EmojiSession::open(source)),
        (true, None) => return Err(Error::MissingCapability("emoji source")),
        (false, _) => None,
    };

    let mut queue: VecDeque<Segment> = list.segments.into();
    let mut ref_widths: HashMap<u32, f32> = HashMap::new();

    let mut x = origin.0;
    let mut y = origin.1;
    let mut line_start_x = origin.0;
    let mut last_pos = origin;
    let mut last_width = 0.0f32;
    let mut max_x = origin.0;
    let mut line_index: u32 = 1;
    let mut lines_drawn: u32 = 0;
    let mut committed_on_line = false;
    let mut truncated = false;
    let mut last_segment: Option<Segment> = None;

    while let Some(mut segment) = queue.pop_front() {
        let is_newline = segment.text == "\n";
        let mut is_break = is_newline;

        if !is_newline && opts.max_width.is_finite() {
            // Reserve room for the end marker once this is the last line
            // that may be drawn.
            let reserve = line_index == opts.max_lines
                || (opts.max_height.is_finite()
                    && y + 2.0 * line_height >= origin.1 + opts.max_height);
            let budget =
                origin.0 + opts.max_width - x - if reserve { end_width } else { 0.0 };

            if measure_segment(raster, &segment, emoji_size) > budget {
                let split_at = fit_point(
                    raster,
                    &segment,
                    budget,
                    emoji_size,
                    opts.guess_line_breaks,
                    &mut ref_widths,
                    x <= line_start_x,
                );
                if split_at < segment.text.len() {
                    let rest = segment.text.split_off(split_at);
                    let is_emoji = opts.emoji && rest.chars().all(emoji::is_emoji);
                    queue.push_front(Segment {
                        text: rest,
                        font: segment.font,
                        is_emoji,
                        color: segment.color,
                        descr: segment.descr,
                    });
                    if let Some(indent) = &indent_segments {
                        for seg in indent.iter().rev() {
                            queue.push_front(seg.clone());
                        }
                    }
                }
                is_break = true;
            }
        }

        // Stop before committing anything beyond the height or line budget.
        if (opts.max_height.is_finite() && y + line_height > origin.1 + opts.max_height)
            || line_index > opts.max_lines
        {
            truncated = true;
            if let Some(font) = end_font {
                let pos = Vec2(last_pos.0 + last_width, last_pos.1);
                raster.draw_glyphs(pos, &font, end_marker, opts.color)?;
            }
            break;
        }

        if !segment.text.is_empty() && !is_newline {
            let width = measure_segment(raster, &segment, emoji_size);
            let v_offset = if opts.auto_y_offset {
                let height = metrics::segment_height(&*raster, &segment, emoji_size);
                metrics::v_offset(line_height, height)
            } else {
                0.0
            };
            let pos = Vec2(x, y + v_offset);

            if segment.is_emoji {
                let session = session
                    .as_mut()
                    .ok_or(Error::MissingCapability("emoji source"))?;
                session.draw(raster, pos, &segment.text, emoji_size)?;
            } else {
                let color = segment.color.unwrap_or(opts.color);
                raster.draw_glyphs(pos, &segment.font, &segment.text, color)?;
            }

            last_pos = Vec2(x, y);
            last_width = width;
            x += width;
            max_x = max_x.max(x);
            if !committed_on_line {
                committed_on_line = true;
                lines_drawn += 1;
            }
            last_segment = Some(segment);
        }

        if is_break {
            x = origin.0 + indent_offset;
            y += line_height;
            line_index += 1;
            line_start_x = x;
            committed_on_line = false;
        }
    }

    log::debug!("drew {lines_drawn} lines, truncated: {truncated}");

    let size = match lines_drawn {
        0 => Vec2::ZERO,
        _ => Vec2(max_x - origin.0, last_pos.1 + line_height - origin.1),
    };
    Ok(DrawResult {
        pos: Vec2(x, y),
        bounds: BoundingBox { pos: origin, size },
        lines: lines_drawn,
        truncated,
        line_height,
        last_segment,
    })
}

/// Width of a whole segment
///
/// Emoji segments measure as one square box per sequence; newline segments
/// have no width; text goes to the rasterizer.
fn measure_segment(raster: &mut dyn Raster, segment: &Segment, emoji_size: f32) -> f32 {
    if segment.text == "\n" {
        0.0
    } else if segment.is_emoji {
        emoji::sequences(&segment.text).count() as f32 * emoji_size
    } else {
        raster.measure(&segment.font, &segment.text).0
    }
}

fn measure_prefix(
    raster: &mut dyn Raster,
    segment: &Segment,
    byte_end: usize,
    emoji_size: f32,
) -> f32 {
    let text = &segment.text[..byte_end];
    if segment.is_emoji {
        emoji::sequences(text).count() as f32 * emoji_size
    } else {
        raster.measure(&segment.font, text).0
    }
}

/// Byte offsets of char boundaries: `offsets[i]` starts char `i`; the last
/// entry is the text length
fn char_offsets(text: &str) -> Vec<usize> {
    text.char_indices()
        .map(|(i, _)| i)
        .chain([text.len()])
        .collect()
}

/// Split point (byte offset) after the largest char-prefix of `segment`
/// measuring strictly under `budget`
///
/// Binary search over prefix length, optionally seeded from a cached
/// per-descriptor reference width; the seed is validated by one real
/// measurement and only narrows the bounds, never changing the result.
/// `at_line_start` force-commits a single char when nothing fits, so the
/// pass cannot stall on a column narrower than one glyph.
fn fit_point(
    raster: &mut dyn Raster,
    segment: &Segment,
    budget: f32,
    emoji_size: f32,
    guess: bool,
    ref_widths: &mut HashMap<u32, f32>,
    at_line_start: bool,
) -> usize {
    let offsets = char_offsets(&segment.text);
    let n = offsets.len() - 1;
    debug_assert!(n > 0);

    let mut best = 0;
    let mut lo = 0;
    // The remainder stays non-empty: at most n-1 chars fit this line.
    let mut hi = n - 1;

    if guess && hi > 0 {
        let ref_width = *ref_widths.entry(segment.descr).or_insert_with(|| {
            if segment.is_emoji {
                emoji_size
            } else {
                let first: String = segment.text.chars().take(1).collect();
                raster.measure(&segment.font, &first).0
            }
        });
        if ref_width > 0.0 && budget > 0.0 {
            let seed = ((budget / ref_width) as usize).min(hi);
            if seed > 0 {
                if measure_prefix(raster, segment, offsets[seed], emoji_size) < budget {
                    lo = seed;
                    best = seed;
                } else {
                    hi = seed - 1;
                }
            }
        }
    }

    while lo < hi {
        let mid = (lo + hi + 1) / 2;
        if measure_prefix(raster, segment, offsets[mid], emoji_size) < budget {
            lo = mid;
            best = mid;
        } else {
            hi = mid - 1;
        }
    }

    if best == 0 && at_line_start {
        best = 1;
    }
    offsets[best]
}
