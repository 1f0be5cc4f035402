// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! The forward pass: wrapping, truncation, indents, emoji, results

mod common;

use common::{font, CountingSource, EmptySource, MockRaster, Op, LINE};
use polytext::{draw_text, Error, FontDescriptor, Options, Rgb, Vec2, WrapIndent};

fn catch_all() -> [FontDescriptor; 1] {
    [FontDescriptor::from_predicate(font(0), |_| true)]
}

fn no_emoji() -> Options {
    Options {
        emoji: false,
        ..Options::default()
    }
}

#[test]
fn unbounded_width_never_wraps() {
    let fonts = catch_all();
    let mut raster = MockRaster::new();
    let result = draw_text(
        &mut raster,
        Vec2(10.0, 10.0),
        "hello world",
        &fonts,
        &no_emoji(),
        None,
    )
    .unwrap();

    assert_eq!(raster.glyph_texts(), ["hello world"]);
    assert_eq!(result.lines, 1);
    assert!(!result.truncated);
    assert_eq!(result.pos, Vec2(10.0 + 110.0, 10.0));
    assert_eq!(result.bounds.pos, Vec2(10.0, 10.0));
    assert_eq!(result.bounds.size, Vec2(110.0, LINE));
}

#[test]
fn newline_breaks_lines() {
    let fonts = catch_all();
    let mut raster = MockRaster::new();
    let result = draw_text(
        &mut raster,
        Vec2(0.0, 0.0),
        "hello\nworld",
        &fonts,
        &no_emoji(),
        None,
    )
    .unwrap();

    assert_eq!(raster.glyph_texts(), ["hello", "world"]);
    assert_eq!(result.lines, 2);
    let world = &raster.ops[1];
    assert_eq!(*world, Op::Glyphs {
        pos: (0.0, LINE),
        face: font(0).face,
        text: "world".into(),
        color: Rgb::BLACK,
    });
}

#[test]
fn overflow_wraps_at_fit_point() {
    // A small pixel size keeps the measurement size guard out of the way so
    // the whole input arrives as one segment.
    let fonts = [FontDescriptor::from_predicate(
        polytext::fonts::RenderFont::new(polytext::fonts::FaceId::from(0), 4.0),
        |_| true,
    )];
    let mut raster = MockRaster::new();
    // 10 chars of 10 px against a 35 px budget: 3 + 3 + 3 + 1.
    let opts = Options {
        max_width: 35.0,
        emoji: false,
        ..Options::default()
    };
    let result = draw_text(&mut raster, Vec2(0.0, 0.0), "aaaaaaaaaa", &fonts, &opts, None).unwrap();

    assert_eq!(raster.glyph_texts(), ["aaa", "aaa", "aaa", "a"]);
    assert_eq!(result.lines, 4);
    assert!(!result.truncated);
    assert_eq!(result.bounds.size, Vec2(30.0, 4.0 * LINE));
    assert_eq!(result.last_segment.as_ref().unwrap().text, "a");
}

#[test]
fn guessed_search_matches_plain_search() {
    let fonts = catch_all();
    let text = "mixed width: 中文 then ascii again, looping";
    for max_width in [35.0, 50.0, 95.0, 120.0] {
        let mut guessed = MockRaster::new();
        let mut plain = MockRaster::new();
        let mut opts = Options {
            max_width,
            emoji: false,
            ..Options::default()
        };
        let a = draw_text(&mut guessed, Vec2(0.0, 0.0), text, &fonts, &opts, None).unwrap();
        opts.guess_line_breaks = false;
        let b = draw_text(&mut plain, Vec2(0.0, 0.0), text, &fonts, &opts, None).unwrap();

        assert_eq!(a, b);
        assert_eq!(guessed.ops, plain.ops);
    }
}

#[test]
fn max_lines_truncates_with_marker() {
    let fonts = catch_all();
    let mut raster = MockRaster::new();
    let opts = Options {
        max_width: 55.0,
        max_lines: 1,
        end_marker: "...".to_string(),
        emoji: false,
        ..Options::default()
    };
    let result = draw_text(&mut raster, Vec2(10.0, 10.0), "aaaaaaaaaa", &fonts, &opts, None).unwrap();

    // The last line reserves the marker width (30): 55 - 30 leaves room for
    // two 10 px chars, the marker lands right after them.
    assert_eq!(raster.glyph_texts(), ["aa", "..."]);
    assert_eq!(raster.ops[1], Op::Glyphs {
        pos: (30.0, 10.0),
        face: font(0).face,
        text: "...".into(),
        color: Rgb::BLACK,
    });
    assert!(result.truncated);
    assert_eq!(result.lines, 1);
}

#[test]
fn max_height_truncates_with_marker() {
    let fonts = catch_all();
    let mut raster = MockRaster::new();
    let opts = Options {
        max_width: 100.0,
        max_height: 50.0,
        end_marker: "...".to_string(),
        emoji: false,
        ..Options::default()
    };
    let input: String = std::iter::repeat('a').take(25).collect();
    let result =
        draw_text(&mut raster, Vec2(0.0, 0.0), input.as_str(), &fonts, &opts, None).unwrap();

    // Line 1 fills freely (9 chars); line 2 is the last that fits 50 px and
    // reserves the marker; line 3 would exceed the height.
    assert_eq!(raster.glyph_texts(), ["aaaaaaaaa", "aaaaaa", "..."]);
    assert!(result.truncated);
    assert_eq!(result.lines, 2);
    // The marker follows the last commit on its baseline.
    assert_eq!(raster.ops[2], Op::Glyphs {
        pos: (60.0, LINE),
        face: font(0).face,
        text: "...".into(),
        color: Rgb::BLACK,
    });
    // Truncation invariant: the last drawn line starts within the budget.
    assert!(LINE <= 50.0 - result.line_height);
}

#[test]
fn end_marker_too_wide_fails_before_drawing() {
    let fonts = catch_all();
    let mut raster = MockRaster::new();
    let opts = Options {
        max_width: 25.0,
        end_marker: "...".to_string(),
        emoji: false,
        ..Options::default()
    };
    let err = draw_text(&mut raster, Vec2(0.0, 0.0), "aaaa", &fonts, &opts, None).unwrap_err();
    assert!(matches!(err, Error::EndMarkerTooWide));
    assert!(raster.ops.is_empty());
}

#[test]
fn numeric_indent_offsets_wrapped_lines() {
    let fonts = catch_all();
    let mut raster = MockRaster::new();
    let opts = Options {
        max_width: 50.0,
        wrap_indent: WrapIndent::Offset(5.0),
        emoji: false,
        ..Options::default()
    };
    draw_text(&mut raster, Vec2(0.0, 0.0), "aaaaaaa", &fonts, &opts, None).unwrap();

    // Line 1 takes the largest prefix strictly under the budget (4 chars);
    // the wrapped line starts at x = 5.
    assert_eq!(raster.glyph_texts(), ["aaaa", "aaa"]);
    assert_eq!(raster.ops[1], Op::Glyphs {
        pos: (5.0, LINE),
        face: font(0).face,
        text: "aaa".into(),
        color: Rgb::BLACK,
    });
}

#[test]
fn text_indent_is_drawn_on_wrapped_lines() {
    let fonts = catch_all();
    let mut raster = MockRaster::new();
    let opts = Options {
        max_width: 50.0,
        wrap_indent: WrapIndent::Text("> ".to_string()),
        emoji: false,
        ..Options::default()
    };
    draw_text(&mut raster, Vec2(0.0, 0.0), "aaaaaaa", &fonts, &opts, None).unwrap();

    // The indent segment (20 px) leads the wrapped line ahead of the
    // remainder.
    assert_eq!(raster.glyph_texts(), ["aaaa", "> ", "aaa"]);
    assert_eq!(raster.ops[1], Op::Glyphs {
        pos: (0.0, LINE),
        face: font(0).face,
        text: "> ".into(),
        color: Rgb::BLACK,
    });
    match &raster.ops[2] {
        Op::Glyphs { pos, .. } => assert_eq!(*pos, (20.0, LINE)),
        op => panic!("expected glyphs, got {op:?}"),
    }
}

#[test]
fn idempotent_results() {
    let fonts = catch_all();
    let opts = Options {
        max_width: 70.0,
        emoji: false,
        ..Options::default()
    };
    let text = "idempotence test\nsecond line with wrap";
    let mut first = MockRaster::new();
    let mut second = MockRaster::new();
    let a = draw_text(&mut first, Vec2(3.0, 7.0), text, &fonts, &opts, None).unwrap();
    let b = draw_text(&mut second, Vec2(3.0, 7.0), text, &fonts, &opts, None).unwrap();

    assert_eq!(a, b);
    assert_eq!(first.ops, second.ops);
}

#[test]
fn split_preserves_total_width() {
    let fonts = catch_all();
    let mut raster = MockRaster::new();
    let text = "abcdefghij";
    let opts = Options {
        max_width: 45.0,
        emoji: false,
        ..Options::default()
    };
    draw_text(&mut raster, Vec2(0.0, 0.0), text, &fonts, &opts, None).unwrap();

    let total: f32 = raster
        .glyph_texts()
        .iter()
        .map(|t| common::text_width(t))
        .sum();
    assert_eq!(total, common::text_width(text));
}

#[test]
fn nothing_drawn_collapses_bounds() {
    let fonts = catch_all();
    let mut raster = MockRaster::new();
    let result = draw_text(&mut raster, Vec2(5.0, 6.0), "", &fonts, &no_emoji(), None).unwrap();

    assert!(raster.ops.is_empty());
    assert_eq!(result.lines, 0);
    assert_eq!(result.bounds.pos, Vec2(5.0, 6.0));
    assert_eq!(result.bounds.size, Vec2::ZERO);
    assert_eq!(result.last_segment, None);
}

#[test]
fn trailing_newline_adds_no_line() {
    let fonts = catch_all();
    let mut raster = MockRaster::new();
    let result = draw_text(&mut raster, Vec2(0.0, 0.0), "ab\n", &fonts, &no_emoji(), None).unwrap();

    assert_eq!(result.lines, 1);
    // The cursor still moved to the next line start.
    assert_eq!(result.pos, Vec2(0.0, LINE));
}

#[test]
fn emoji_route_through_the_session() {
    let fonts = catch_all();
    let mut raster = MockRaster::new();
    let mut source = CountingSource::default();
    let result = draw_text(
        &mut raster,
        Vec2(0.0, 0.0),
        "a🚀b",
        &fonts,
        &Options::default(),
        Some(&mut source),
    )
    .unwrap();

    // Emoji measure as one square box of the first descriptor's size (20).
    assert_eq!(raster.ops.len(), 3);
    assert_eq!(raster.ops[1], Op::Image {
        pos: (10.0, 0.0),
        height: 20.0,
    });
    assert_eq!(raster.glyph_texts(), ["a", "b"]);
    match &raster.ops[2] {
        Op::Glyphs { pos, .. } => assert_eq!(*pos, (30.0, 0.0)),
        op => panic!("expected glyphs, got {op:?}"),
    }
    assert_eq!(result.lines, 1);
}

#[test]
fn session_caches_repeated_lookups() {
    let fonts = catch_all();
    let mut raster = MockRaster::new();
    let mut source = CountingSource::default();
    draw_text(
        &mut raster,
        Vec2(0.0, 0.0),
        "🚀🚀🚀",
        &fonts,
        &Options::default(),
        Some(&mut source),
    )
    .unwrap();

    assert_eq!(source.lookups, 1);
    assert_eq!(raster.ops.len(), 3);
}

#[test]
fn emoji_without_source_is_a_missing_capability() {
    let fonts = catch_all();
    let mut raster = MockRaster::new();
    let err = draw_text(
        &mut raster,
        Vec2(0.0, 0.0),
        "a🚀",
        &fonts,
        &Options::default(),
        None,
    )
    .unwrap_err();

    assert!(matches!(err, Error::MissingCapability(_)));
    assert!(raster.ops.is_empty());
}

#[test]
fn emoji_free_text_needs_no_source() {
    let fonts = catch_all();
    let mut raster = MockRaster::new();
    let result = draw_text(
        &mut raster,
        Vec2(0.0, 0.0),
        "plain",
        &fonts,
        &Options::default(),
        None,
    )
    .unwrap();
    assert_eq!(result.lines, 1);
}

#[test]
fn missing_asset_is_surfaced() {
    let fonts = catch_all();
    let mut raster = MockRaster::new();
    let mut source = EmptySource;
    let err = draw_text(
        &mut raster,
        Vec2(0.0, 0.0),
        "🚀",
        &fonts,
        &Options::default(),
        Some(&mut source),
    )
    .unwrap_err();

    match err {
        Error::EmojiAssetMissing(seq) => assert_eq!(seq, "🚀"),
        err => panic!("unexpected error: {err}"),
    }
}

#[test]
fn fixed_line_height_is_respected() {
    let fonts = catch_all();
    let mut raster = MockRaster::new();
    let opts = Options {
        line_height: Some(32.0),
        emoji: false,
        ..Options::default()
    };
    let result = draw_text(&mut raster, Vec2(0.0, 0.0), "a\nb", &fonts, &opts, None).unwrap();

    assert_eq!(result.line_height, 32.0);
    match &raster.ops[1] {
        Op::Glyphs { pos, .. } => assert_eq!(pos.1, 32.0 + 6.0), // centered: (32-20)/2
        op => panic!("expected glyphs, got {op:?}"),
    }
}

#[test]
fn auto_y_offset_can_be_disabled() {
    let fonts = catch_all();
    let mut raster = MockRaster::new();
    let opts = Options {
        line_height: Some(32.0),
        auto_y_offset: false,
        emoji: false,
        ..Options::default()
    };
    draw_text(&mut raster, Vec2(0.0, 0.0), "a", &fonts, &opts, None).unwrap();
    match &raster.ops[0] {
        Op::Glyphs { pos, .. } => assert_eq!(pos.1, 0.0),
        op => panic!("expected glyphs, got {op:?}"),
    }
}
