// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Line metrics: resolving the line height across mixed font sizes

use crate::data::Options;
use crate::descriptor::FontDescriptor;
use crate::raster::Raster;
use crate::segment::SegmentList;

/// Fallback line height guaranteeing forward progress when all metrics
/// resolve to zero
pub(crate) const MIN_LINE_HEIGHT: f32 = 10.0;

/// Resolve the effective line height for a draw call
///
/// Fast mode derives it from the used descriptors' ascent+descent, ignoring
/// emoji (text descriptors are known upfront, emoji sizing is secondary).
/// Precise mode pays a full pass over the emitted segments, measuring each:
/// ink height plus descent for text, the emoji raster size for emoji.
pub(crate) fn line_height(
    raster: &mut dyn Raster,
    fonts: &[FontDescriptor],
    list: &SegmentList,
    opts: &Options,
    emoji_size: f32,
) -> f32 {
    let mut height = 0.0f32;
    if opts.fast_line_height {
        for &index in &list.used {
            let Some(descriptor) = fonts.get(index as usize) else {
                continue; // the emoji descriptor
            };
            height = height.max(raster.line_metrics(&descriptor.font()).height());
        }
    } else {
        for segment in &list.segments {
            let h = if segment.is_emoji {
                emoji_size
            } else {
                let ink = raster.measure(&segment.font, &segment.text).1;
                ink + raster.line_metrics(&segment.font).descent
            };
            height = height.max(h);
        }
    }

    if height <= 0.0 {
        height = MIN_LINE_HEIGHT;
    }
    height
}

/// Line-metric height of one segment: ascent+descent for text, the raster
/// size for emoji
pub(crate) fn segment_height(
    raster: &dyn Raster,
    segment: &crate::segment::Segment,
    emoji_size: f32,
) -> f32 {
    if segment.is_emoji {
        emoji_size
    } else {
        raster.line_metrics(&segment.font).height()
    }
}

/// Vertical offset centering a segment within the line
pub(crate) fn v_offset(line_height: f32, segment_height: f32) -> f32 {
    ((line_height - segment_height) / 2.0).floor().max(0.0)
}
