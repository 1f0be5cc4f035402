// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Emoji classification, sequence scanning and bitmap sourcing
//!
//! Classification is a compact subset of Unicode TR #51 (`emoji-data.txt`):
//! pictographic blocks plus the sequence components (ZWJ, variation
//! selectors, skin-tone modifiers, regional indicators, tag characters,
//! combining keycap). Bare ASCII keycap bases (`0-9`, `*`, `#`) are *not*
//! classified: a digit must not be captured by the emoji descriptor.
//!
//! Emoji images come from an [`EmojiSource`]; one [`EmojiSession`] is opened
//! per draw call and caches lookups for its duration.

use crate::error::{Error, Result};
use crate::raster::Raster;
use crate::Vec2;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

/// Pictographic codepoint ranges (inclusive), sorted
///
/// Derived from TR #51 emoji-data; ranges are block-granular where the block
/// is dense with `Emoji=Yes` entries.
const PICTOGRAPHIC: &[(u32, u32)] = &[
    (0x00A9, 0x00A9),   // copyright
    (0x00AE, 0x00AE),   // registered
    (0x203C, 0x203C),   // double exclamation
    (0x2049, 0x2049),   // exclamation question
    (0x2122, 0x2122),   // trade mark
    (0x2139, 0x2139),   // information
    (0x2194, 0x2199),   // arrows
    (0x21A9, 0x21AA),   // arrows with hook
    (0x231A, 0x231B),   // watch, hourglass
    (0x2328, 0x2328),   // keyboard
    (0x23CF, 0x23CF),   // eject
    (0x23E9, 0x23F3),   // media controls, clocks
    (0x23F8, 0x23FA),   // pause, stop, record
    (0x24C2, 0x24C2),   // circled M
    (0x25AA, 0x25AB),   // small squares
    (0x25B6, 0x25B6),   // play
    (0x25C0, 0x25C0),   // reverse
    (0x25FB, 0x25FE),   // medium squares
    (0x2600, 0x27BF),   // misc symbols, dingbats
    (0x2934, 0x2935),   // arrows curving
    (0x2B05, 0x2B07),   // arrows
    (0x2B1B, 0x2B1C),   // large squares
    (0x2B50, 0x2B50),   // star
    (0x2B55, 0x2B55),   // heavy circle
    (0x3030, 0x3030),   // wavy dash
    (0x303D, 0x303D),   // part alternation mark
    (0x3297, 0x3297),   // circled congratulations
    (0x3299, 0x3299),   // circled secret
    (0x1F004, 0x1F004), // mahjong red dragon
    (0x1F0CF, 0x1F0CF), // joker
    (0x1F170, 0x1F171), // A/B buttons
    (0x1F17E, 0x1F17F), // O/P buttons
    (0x1F18E, 0x1F18E), // AB button
    (0x1F191, 0x1F19A), // squared signs
    (0x1F201, 0x1F202), // squared katakana
    (0x1F21A, 0x1F21A),
    (0x1F22F, 0x1F22F),
    (0x1F232, 0x1F23A),
    (0x1F250, 0x1F251),
    (0x1F300, 0x1F5FF), // misc symbols and pictographs
    (0x1F600, 0x1F64F), // emoticons
    (0x1F680, 0x1F6FF), // transport and map
    (0x1F7E0, 0x1F7EB), // colored shapes
    (0x1F7F0, 0x1F7F0),
    (0x1F90C, 0x1F9FF), // supplemental symbols
    (0x1FA70, 0x1FAFF), // symbols extended
];

fn in_ranges(ranges: &[(u32, u32)], cp: u32) -> bool {
    ranges
        .binary_search_by(|&(lo, hi)| {
            if cp < lo {
                std::cmp::Ordering::Greater
            } else if cp > hi {
                std::cmp::Ordering::Less
            } else {
                std::cmp::Ordering::Equal
            }
        })
        .is_ok()
}

/// Whether `c` belongs on the emoji path
///
/// True for pictographic emoji and for sequence components, so that a whole
/// sequence (base + selectors + joiners) stays on the emoji path.
pub fn is_emoji(c: char) -> bool {
    if c.is_ascii() {
        return false;
    }
    is_pictographic(c)
        || is_regional_indicator(c)
        || is_emoji_modifier(c)
        || is_variation_selector(c)
        || is_zwj(c)
        || is_combining_keycap(c)
        || is_tag_character(c)
}

/// Whether `c` is a pictographic emoji (a sequence base)
pub fn is_pictographic(c: char) -> bool {
    let cp = c as u32;
    is_regional_indicator(c) || in_ranges(PICTOGRAPHIC, cp)
}

/// Regional indicators pair up to form flag emoji
pub fn is_regional_indicator(c: char) -> bool {
    ('\u{1F1E6}'..='\u{1F1FF}').contains(&c)
}

/// Fitzpatrick skin-tone modifiers
pub fn is_emoji_modifier(c: char) -> bool {
    ('\u{1F3FB}'..='\u{1F3FF}').contains(&c)
}

/// VS15 (text presentation) or VS16 (emoji presentation)
pub fn is_variation_selector(c: char) -> bool {
    c == '\u{FE0E}' || c == '\u{FE0F}'
}

/// Zero Width Joiner, glue of multi-person and compound emoji
pub fn is_zwj(c: char) -> bool {
    c == '\u{200D}'
}

/// Combining enclosing keycap
pub fn is_combining_keycap(c: char) -> bool {
    c == '\u{20E3}'
}

/// Tag characters (subdivision flags); U+E007F cancels the sequence
pub fn is_tag_character(c: char) -> bool {
    ('\u{E0020}'..='\u{E007F}').contains(&c)
}

/// Iterator over emoji sequences within a string
///
/// Yields one `&str` per displayable sequence: a pictographic base plus its
/// variation selectors, skin-tone modifiers, ZWJ joins, keycap or tag
/// suffixes; or a regional-indicator pair. Component characters with no base
/// to attach to are skipped (they render as nothing).
pub fn sequences(text: &str) -> Sequences<'_> {
    Sequences { text, pos: 0 }
}

pub struct Sequences<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Iterator for Sequences<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let mut iter = self.text[self.pos..].char_indices().peekable();

        // Find a sequence base, skipping orphaned components.
        let (start, first) = loop {
            let (i, c) = iter.next()?;
            if is_pictographic(c) {
                break (self.pos + i, c);
            }
        };
        let mut end = start + first.len_utf8();

        if is_regional_indicator(first) {
            // A pair forms a flag; a lone indicator stands by itself.
            if let Some(&(i, c)) = iter.peek() {
                if is_regional_indicator(c) {
                    end = self.pos + i + c.len_utf8();
                }
            }
            self.pos = end;
            return Some(&self.text[start..end]);
        }

        loop {
            let Some(&(i, c)) = iter.peek() else { break };
            if is_variation_selector(c) || is_emoji_modifier(c) || is_combining_keycap(c) {
                end = self.pos + i + c.len_utf8();
                iter.next();
            } else if is_tag_character(c) {
                while let Some(&(i, c)) = iter.peek() {
                    if !is_tag_character(c) {
                        break;
                    }
                    end = self.pos + i + c.len_utf8();
                    iter.next();
                    if c == '\u{E007F}' {
                        break;
                    }
                }
            } else if is_zwj(c) {
                iter.next();
                match iter.peek() {
                    Some(&(i, c)) if is_pictographic(c) => {
                        end = self.pos + i + c.len_utf8();
                        iter.next();
                    }
                    // Dangling ZWJ terminates the sequence.
                    _ => break,
                }
            } else {
                break;
            }
        }

        self.pos = end;
        Some(&self.text[start..end])
    }
}

/// Supplier of emoji images
///
/// One lookup covers one whole sequence (possibly several codepoints).
pub trait EmojiSource {
    /// PNG bytes for `seq`, or `Ok(None)` when the source does not carry it
    ///
    /// `Ok(None)` is surfaced to the draw caller as
    /// [`Error::EmojiAssetMissing`]; a recognized emoji is never silently
    /// dropped from the output.
    fn lookup(&mut self, seq: &str) -> Result<Option<Vec<u8>>>;
}

/// Emoji images stored as PNG files in a local directory
///
/// File names are `emoji_` followed by the sequence's codepoints in lower
/// hex, each prefixed `u` and zero-padded to four digits, joined by `_`:
/// `🚀` → `emoji_u1f680.png`, `🇺🇸` → `emoji_u1f1fa_u1f1f8.png`.
pub struct LocalEmojiSource {
    dir: PathBuf,
}

impl LocalEmojiSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        LocalEmojiSource { dir: dir.into() }
    }

    fn file_name(seq: &str) -> String {
        let mut name = String::from("emoji");
        for c in seq.chars() {
            name.push_str(&format!("_u{:04x}", c as u32));
        }
        name.push_str(".png");
        name
    }
}

impl EmojiSource for LocalEmojiSource {
    fn lookup(&mut self, seq: &str) -> Result<Option<Vec<u8>>> {
        let path = self.dir.join(Self::file_name(seq));
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(Error::Emoji(format!("{}: {err}", path.display()))),
        }
    }
}

/// Per-draw emoji compositor session
///
/// Opened once per draw call (only when emoji segments exist), caches
/// lookups for the call's duration and is released unconditionally on every
/// exit path: the cache and the borrow of the source end with the draw,
/// success or failure.
pub(crate) struct EmojiSession<'a> {
    source: &'a mut dyn EmojiSource,
    cache: HashMap<String, Arc<Vec<u8>>>,
}

impl<'a> EmojiSession<'a> {
    pub(crate) fn open(source: &'a mut dyn EmojiSource) -> Self {
        EmojiSession {
            source,
            cache: HashMap::new(),
        }
    }

    fn bitmap(&mut self, seq: &str) -> Result<Arc<Vec<u8>>> {
        if let Some(bytes) = self.cache.get(seq) {
            return Ok(bytes.clone());
        }
        let bytes = self
            .source
            .lookup(seq)?
            .ok_or_else(|| Error::EmojiAssetMissing(seq.to_string()))?;
        let bytes = Arc::new(bytes);
        self.cache.insert(seq.to_string(), bytes.clone());
        Ok(bytes)
    }

    /// Draw an emoji segment: one square bitmap of side `size` per sequence
    pub(crate) fn draw(
        &mut self,
        raster: &mut dyn Raster,
        pos: Vec2,
        text: &str,
        size: f32,
    ) -> Result<()> {
        let mut x = pos.0;
        for seq in sequences(text) {
            let bytes = self.bitmap(seq)?;
            raster.draw_image(Vec2(x, pos.1), &bytes, size)?;
            x += size;
        }
        Ok(())
    }
}

impl Drop for EmojiSession<'_> {
    fn drop(&mut self) {
        log::debug!("emoji session closed ({} cached lookups)", self.cache.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        assert!(is_emoji('😀'));
        assert!(is_emoji('🚀'));
        assert!(is_emoji('✨'));
        assert!(is_emoji('\u{FE0F}'));
        assert!(is_emoji('\u{200D}'));
        assert!(!is_emoji('A'));
        assert!(!is_emoji('中'));
        assert!(!is_emoji('1'));
        assert!(!is_emoji('#'));
    }

    #[test]
    fn single_sequences() {
        let seqs: Vec<_> = sequences("🚀🌍").collect();
        assert_eq!(seqs, ["🚀", "🌍"]);
    }

    #[test]
    fn flag_pair_is_one_sequence() {
        let seqs: Vec<_> = sequences("🇺🇸🚀").collect();
        assert_eq!(seqs, ["🇺🇸", "🚀"]);
    }

    #[test]
    fn skin_tone_attaches() {
        let seqs: Vec<_> = sequences("👋🏽").collect();
        assert_eq!(seqs, ["👋🏽"]);
    }

    #[test]
    fn zwj_family_is_one_sequence() {
        let seqs: Vec<_> = sequences("👨\u{200D}👩\u{200D}👧").collect();
        assert_eq!(seqs.len(), 1);
        assert_eq!(seqs[0].chars().count(), 5);
    }

    #[test]
    fn orphan_components_are_skipped() {
        assert_eq!(sequences("\u{FE0F}\u{200D}").count(), 0);
    }

    #[test]
    fn local_source_reports_absent_assets_as_none() {
        let mut source = LocalEmojiSource::new("/nonexistent/emoji/dir");
        assert!(matches!(source.lookup("🚀"), Ok(None)));
    }

    #[test]
    fn local_source_file_names() {
        assert_eq!(LocalEmojiSource::file_name("🚀"), "emoji_u1f680.png");
        assert_eq!(
            LocalEmojiSource::file_name("🇺🇸"),
            "emoji_u1f1fa_u1f1f8.png"
        );
        assert_eq!(LocalEmojiSource::file_name("✨"), "emoji_u2728.png");
    }
}
