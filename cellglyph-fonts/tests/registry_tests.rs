//! Integration tests for `FamilyRegistry`: tier resolution, rendering into
//! each output type, and the load/reload/destroy lifecycle.

mod common;

use cellglyph_config::{FamilyConfig, OutputType};
use cellglyph_fonts::{CellSize, FamilyRegistry, FontError, FontStyle, Tier};
use common::{
    COLOR_PIXEL_BGRA, FakeEngine, FakeFont, LCD_SAMPLE, gray_at, loaded_registry, settings_with,
    single_family,
};

const CJK: u32 = 0x4E2D;
const HEART: u32 = 0x2764;
const GRIN: u32 = 0x1F600;

fn ch(codepoint: u32) -> char {
    char::from_u32(codepoint).expect("valid codepoint")
}

/// A wildcard ASCII family plus a CJK range family, a symbol face and a
/// color face.
fn tiered_registry(output: OutputType) -> FamilyRegistry<FakeEngine> {
    let engine = FakeEngine::new()
        .with_font("/fonts/mono.ttf", FakeFont::ascii())
        .with_font("/fonts/cjk.ttf", FakeFont::covering(0x4E00..=0x9FFF))
        .with_font("/fonts/symbols.ttf", FakeFont::covering(0x2600..=0x27BF))
        .with_font(
            "/fonts/emoji.ttf",
            FakeFont::covering(0x1F300..=0x1FAFF).and(0x2600..=0x27BF).with_color(),
        );
    let settings = settings_with(vec![
        FamilyConfig::new("/fonts/cjk.ttf").with_range(0x4E00, 0x9FFF),
        FamilyConfig::new("/fonts/mono.ttf"),
    ])
    .with_symbol_font("/fonts/symbols.ttf")
    .with_color_font("/fonts/emoji.ttf")
    .with_output(output);
    loaded_registry(engine, settings)
}

// ============================================================================
// Resolution
// ============================================================================

#[test]
fn test_ascii_always_resolves_to_default_family() {
    let engine = FakeEngine::new()
        .with_font("/fonts/ascii-range.ttf", FakeFont::ascii())
        .with_font("/fonts/mono.ttf", FakeFont::ascii());
    let settings = settings_with(vec![
        FamilyConfig::new("/fonts/ascii-range.ttf").with_range(0x00, 0x7F),
        FamilyConfig::new("/fonts/mono.ttf"),
    ]);
    let registry = loaded_registry(engine, settings);

    assert_eq!(registry.default_family(), Some(1));
    for code in 0u8..0x80 {
        for style in [FontStyle::Regular, FontStyle::BoldItalic] {
            let resolved = registry.resolve(code as char, style).expect("ascii resolves");
            assert_eq!(resolved.tier, Tier::Primary(1), "code {:#x}", code);
        }
    }
}

#[test]
fn test_disjoint_ranges_pick_the_claiming_family() {
    let engine = FakeEngine::new()
        .with_font("/fonts/a.ttf", FakeFont::ascii())
        .with_font("/fonts/b.ttf", FakeFont::covering(0x80..=0xFFFF));
    let settings = settings_with(vec![
        FamilyConfig::new("/fonts/a.ttf").with_range(0x00, 0x7F),
        FamilyConfig::new("/fonts/b.ttf").with_range(0x80, 0xFFFF),
    ]);
    let registry = loaded_registry(engine, settings);

    let a = registry.resolve('A', FontStyle::Regular).unwrap();
    assert_eq!(a.tier, Tier::Primary(0));
    let b = registry.resolve(ch(CJK), FontStyle::Regular).unwrap();
    assert_eq!(b.tier, Tier::Primary(1));
    assert_eq!(b.glyph_id, CJK as u16);
}

#[test]
fn test_overlapping_ranges_first_insertion_wins() {
    let engine = FakeEngine::new()
        .with_font("/fonts/b.ttf", FakeFont::covering(0x00..=0xFFFF))
        .with_font("/fonts/a.ttf", FakeFont::ascii());
    let settings = settings_with(vec![
        FamilyConfig::new("/fonts/b.ttf").with_range(0x00, 0xFFFF),
        FamilyConfig::new("/fonts/a.ttf").with_range(0x00, 0x7F),
    ]);
    let registry = loaded_registry(engine, settings);

    assert_eq!(registry.resolve('A', FontStyle::Regular).unwrap().tier, Tier::Primary(0));
}

#[test]
fn test_overlapping_non_ascii_ranges_first_insertion_wins() {
    let engine = FakeEngine::new()
        .with_font("/fonts/wide.ttf", FakeFont::covering(0x100..=0x2FF))
        .with_font("/fonts/narrow.ttf", FakeFont::covering(0x100..=0x1FF))
        .with_font("/fonts/mono.ttf", FakeFont::ascii());
    let settings = settings_with(vec![
        FamilyConfig::new("/fonts/wide.ttf").with_range(0x100, 0x2FF),
        FamilyConfig::new("/fonts/narrow.ttf").with_range(0x100, 0x1FF),
        FamilyConfig::new("/fonts/mono.ttf"),
    ]);
    let registry = loaded_registry(engine, settings);

    assert_eq!(registry.resolve(ch(0x150), FontStyle::Regular).unwrap().tier, Tier::Primary(0));
}

#[test]
fn test_missing_variant_falls_back_to_regular() {
    let engine = FakeEngine::new().with_font("/fonts/mono.ttf", FakeFont::ascii());
    let mut registry = loaded_registry(engine, single_family("/fonts/mono.ttf"));

    let resolved = registry.resolve('x', FontStyle::Bold).unwrap();
    assert_eq!(resolved.style, FontStyle::Regular);
    let regular = registry.load_and_render_glyph('x', FontStyle::Regular).unwrap().snapshot();
    let bold = registry.load_and_render_glyph('x', FontStyle::Bold).unwrap().snapshot();
    assert_eq!(bold.info.style, FontStyle::Regular);
    assert_eq!(bold.pixels, regular.pixels);
}

#[test]
fn test_present_variant_is_used() {
    let engine = FakeEngine::new()
        .with_font("/fonts/mono.ttf", FakeFont::ascii())
        .with_font("/fonts/mono-bold.ttf", FakeFont::ascii());
    let settings = settings_with(vec![
        FamilyConfig::new("/fonts/mono.ttf").with_bold("/fonts/mono-bold.ttf"),
    ]);
    let registry = loaded_registry(engine, settings);

    let resolved = registry.resolve('x', FontStyle::Bold).unwrap();
    assert_eq!(resolved.style, FontStyle::Bold);
    let face = registry.face_for(&resolved).expect("face");
    assert_eq!(face.path().to_str(), Some("/fonts/mono-bold.ttf"));

    // No italic configured
    assert_eq!(registry.resolve('x', FontStyle::Italic).unwrap().style, FontStyle::Regular);
}

#[test]
fn test_unloadable_variant_falls_back_to_regular() {
    let engine = FakeEngine::new().with_font("/fonts/mono.ttf", FakeFont::ascii());
    let settings = settings_with(vec![
        FamilyConfig::new("/fonts/mono.ttf").with_bold("/fonts/missing-bold.ttf"),
    ]);
    let registry = loaded_registry(engine, settings);

    assert_eq!(registry.resolve('x', FontStyle::Bold).unwrap().style, FontStyle::Regular);
}

#[test]
fn test_fallback_order_symbol_before_color() {
    let registry = tiered_registry(OutputType::Grayscale);

    assert_eq!(registry.resolve(ch(CJK), FontStyle::Regular).unwrap().tier, Tier::Primary(0));
    // Both the symbol and the color face map U+2764; the symbol face wins
    assert_eq!(registry.resolve(ch(HEART), FontStyle::Regular).unwrap().tier, Tier::Symbol(0));
    assert_eq!(registry.resolve(ch(GRIN), FontStyle::Bold).unwrap().tier, Tier::Color(0));
}

#[test]
fn test_candidate_without_glyph_falls_through() {
    let engine = FakeEngine::new()
        .with_font("/fonts/mono.ttf", FakeFont::ascii())
        .with_font("/fonts/symbols.ttf", FakeFont::covering(0x2500..=0x257F));
    let settings = single_family("/fonts/mono.ttf").with_symbol_font("/fonts/symbols.ttf");
    let registry = loaded_registry(engine, settings);

    // The wildcard family claims U+2500 but has no glyph for it
    let resolved = registry.resolve('\u{2500}', FontStyle::Regular).unwrap();
    assert_eq!(resolved.tier, Tier::Symbol(0));
}

#[test]
fn test_unloaded_family_is_skipped() {
    let engine = FakeEngine::new()
        .with_font("/fonts/mono.ttf", FakeFont::ascii().and(0x4E00..=0x9FFF));
    let settings = settings_with(vec![
        FamilyConfig::new("/fonts/missing-cjk.ttf").with_range(0x4E00, 0x9FFF),
        FamilyConfig::new("/fonts/mono.ttf"),
    ]);
    let registry = loaded_registry(engine, settings);

    assert!(!registry.primaries()[0].is_loaded());
    assert_eq!(registry.resolve(ch(CJK), FontStyle::Regular).unwrap().tier, Tier::Primary(1));
}

#[test]
fn test_uncovered_codepoint_is_not_found_every_time() {
    let mut registry = tiered_registry(OutputType::Grayscale);

    for _ in 0..3 {
        let err = registry.resolve('\u{E000}', FontStyle::Regular).unwrap_err();
        assert!(matches!(err, FontError::GlyphNotFound { codepoint: 0xE000 }));
        let err = registry.load_and_render_glyph('\u{E000}', FontStyle::Regular).unwrap_err();
        assert!(matches!(err, FontError::GlyphNotFound { codepoint: 0xE000 }));
    }
}

#[test]
fn test_ascii_missing_from_default_renders_notdef() {
    let engine = FakeEngine::new().with_font("/fonts/digits.ttf", FakeFont::covering(0x30..=0x39));
    let mut registry = loaded_registry(engine, single_family("/fonts/digits.ttf"));

    let resolved = registry.resolve('a', FontStyle::Regular).unwrap();
    assert_eq!(resolved.tier, Tier::Primary(0));
    assert_eq!(resolved.glyph_id, 0);
    let glyph = registry.load_and_render_ascii_glyph(b'a', FontStyle::Regular).unwrap();
    assert_eq!(glyph.info.glyph_id, 0);
    assert!(glyph.has_pixels());
}

#[test]
fn test_ascii_entry_points_reject_non_ascii() {
    let mut registry = tiered_registry(OutputType::Grayscale);
    assert!(matches!(
        registry.load_ascii_glyph(0xC3, FontStyle::Regular),
        Err(FontError::GlyphNotFound { codepoint: 0xC3 })
    ));
}

// ============================================================================
// Rendering
// ============================================================================

#[test]
fn test_grayscale_passthrough() {
    let mut registry = tiered_registry(OutputType::Grayscale);
    let glyph = registry.load_and_render_glyph('m', FontStyle::Regular).unwrap();

    assert_eq!(glyph.info.pixel_type, OutputType::Grayscale);
    assert_eq!((glyph.info.width, glyph.info.height), (8, 12));
    assert_eq!(glyph.info.pitch, 8);
    assert_eq!(glyph.info.row_alignment, 4);
    assert_eq!(glyph.row(2)[5], gray_at(5, 2));
}

#[test]
fn test_rows_are_padded_to_alignment() {
    let engine = FakeEngine::new().with_font("/fonts/mono.ttf", FakeFont::ascii());
    // 13.5pt at 96 dpi is 18px: 9 pixels wide
    let settings = single_family("/fonts/mono.ttf").with_size(13.5);
    let mut registry = loaded_registry(engine, settings);

    let glyph = registry.load_and_render_glyph('m', FontStyle::Regular).unwrap();
    assert_eq!(glyph.info.width, 9);
    assert_eq!(glyph.info.pitch, 12);
    for y in 0..glyph.info.height as usize {
        let row = glyph.row(y);
        assert_eq!(row[8], gray_at(8, y));
        assert_eq!(&row[9..], &[0, 0, 0]);
    }
}

#[test]
fn test_subpixel_synthesized_from_grayscale_has_equal_channels() {
    let mut registry = tiered_registry(OutputType::RgbHorizontal);
    let glyph = registry.load_and_render_glyph('m', FontStyle::Regular).unwrap();

    assert_eq!(glyph.info.pixel_type, OutputType::RgbHorizontal);
    assert_eq!(glyph.info.pitch, 24);
    for y in 0..glyph.info.height as usize {
        for (x, px) in glyph.row(y).chunks_exact(3).enumerate() {
            let gray = gray_at(x, y);
            assert_eq!(px, &[gray, gray, gray], "pixel ({}, {})", x, y);
        }
    }
}

#[test]
fn test_native_subpixel_respects_channel_order() {
    let engine = FakeEngine::new().with_font("/fonts/lcd.ttf", FakeFont::ascii().with_native_lcd());
    let settings = single_family("/fonts/lcd.ttf");

    let mut rgb = loaded_registry(
        FakeEngine::new().with_font("/fonts/lcd.ttf", FakeFont::ascii().with_native_lcd()),
        settings.clone().with_output(OutputType::RgbHorizontal),
    );
    let glyph = rgb.load_and_render_glyph('m', FontStyle::Regular).unwrap();
    assert!(!glyph.info.rgb_flip);
    assert_eq!(&glyph.row(0)[..3], &LCD_SAMPLE);

    let mut bgr = loaded_registry(engine, settings.with_output(OutputType::BgrHorizontal));
    let glyph = bgr.load_and_render_glyph('m', FontStyle::Regular).unwrap();
    assert!(glyph.info.rgb_flip);
    assert_eq!(&glyph.row(0)[..3], &[LCD_SAMPLE[2], LCD_SAMPLE[1], LCD_SAMPLE[0]]);
}

#[test]
fn test_native_vertical_subpixel_is_interleaved() {
    let engine = FakeEngine::new().with_font("/fonts/lcd.ttf", FakeFont::ascii().with_native_lcd());
    let settings = single_family("/fonts/lcd.ttf").with_output(OutputType::RgbVertical);
    let mut registry = loaded_registry(engine, settings);

    let glyph = registry.load_and_render_glyph('m', FontStyle::Regular).unwrap();
    assert_eq!(glyph.info.pixel_type, OutputType::RgbVertical);
    assert_eq!(glyph.info.height, 12);
    assert_eq!(&glyph.row(11)[..6], &[10, 20, 30, 10, 20, 30]);
}

#[test]
fn test_monochrome_into_subpixel_is_geometry_only() {
    let engine = FakeEngine::new().with_font("/fonts/mono.ttf", FakeFont::ascii());
    let mut settings = single_family("/fonts/mono.ttf").with_output(OutputType::RgbHorizontal);
    settings.antialias = false;
    let mut registry = loaded_registry(engine, settings);

    let glyph = registry.load_and_render_glyph('m', FontStyle::Regular).unwrap();
    assert!(!glyph.has_pixels());
    assert_eq!(glyph.info.pixel_type, OutputType::GeometryOnly);
    assert_eq!((glyph.info.width, glyph.info.height), (8, 12));
}

#[test]
fn test_monochrome_into_grayscale_expands_bits() {
    let engine = FakeEngine::new().with_font("/fonts/mono.ttf", FakeFont::ascii());
    let mut settings = single_family("/fonts/mono.ttf");
    settings.antialias = false;
    let mut registry = loaded_registry(engine, settings);

    let glyph = registry.load_and_render_glyph('m', FontStyle::Regular).unwrap();
    assert_eq!(glyph.info.pixel_type, OutputType::Grayscale);
    assert!(glyph.row(0).iter().all(|&px| px == 255));
}

#[test]
fn test_monochrome_into_color_keeps_text_visible() {
    let engine = FakeEngine::new().with_font("/fonts/mono.ttf", FakeFont::ascii());
    let mut settings = single_family("/fonts/mono.ttf").with_output(OutputType::Color);
    settings.antialias = false;
    let mut registry = loaded_registry(engine, settings);

    let glyph = registry.load_and_render_glyph('m', FontStyle::Regular).unwrap();
    assert!(glyph.has_pixels());
    assert_eq!(glyph.info.pixel_type, OutputType::Color);
    let width = glyph.info.width as usize;
    for px in glyph.row(0)[..width * 4].chunks_exact(4) {
        assert_eq!(px, [255, 255, 255, 255]);
    }
}

#[test]
fn test_color_glyph_in_grayscale_registry_uses_alpha() {
    let mut registry = tiered_registry(OutputType::Grayscale);
    let glyph = registry.load_and_render_glyph(ch(GRIN), FontStyle::Regular).unwrap();

    assert_eq!(glyph.info.tier, Tier::Color(0));
    assert_eq!(glyph.info.pixel_type, OutputType::Grayscale);
    assert!(glyph.row(0)[..8].iter().all(|&px| px == COLOR_PIXEL_BGRA[3]));
}

#[test]
fn test_color_output_swaps_bgra_to_rgba() {
    let mut registry = tiered_registry(OutputType::Color);
    let glyph = registry.load_and_render_glyph(ch(GRIN), FontStyle::Regular).unwrap();

    assert_eq!(glyph.info.pixel_type, OutputType::Color);
    let [b, g, r, a] = COLOR_PIXEL_BGRA;
    assert_eq!(&glyph.row(0)[..4], &[r, g, b, a]);

    // Faces without color data become white with coverage alpha
    let glyph = registry.load_and_render_glyph('m', FontStyle::Regular).unwrap();
    assert_eq!(&glyph.row(0)[..4], &[255, 255, 255, gray_at(0, 0)]);
}

#[test]
fn test_color_glyph_in_subpixel_registry_is_geometry_only() {
    let mut registry = tiered_registry(OutputType::RgbHorizontal);
    let glyph = registry.load_and_render_glyph(ch(GRIN), FontStyle::Regular).unwrap();
    assert!(!glyph.has_pixels());
    assert_eq!(glyph.info.tier, Tier::Color(0));
}

#[test]
fn test_geometry_only_output_never_rasterizes() {
    let engine = FakeEngine::new().with_font("/fonts/mono.ttf", FakeFont::ascii());
    let renders = engine.render_calls();
    let settings = single_family("/fonts/mono.ttf").with_output(OutputType::GeometryOnly);
    let mut registry = loaded_registry(engine, settings);

    let glyph = registry.load_and_render_glyph('m', FontStyle::Regular).unwrap();
    assert!(!glyph.has_pixels());
    assert_eq!((glyph.info.width, glyph.info.height), (8, 12));
    assert_eq!(renders.get(), 0);
}

#[test]
fn test_load_glyph_returns_metrics_only() {
    let mut registry = tiered_registry(OutputType::Grayscale);
    let glyph = registry.load_glyph(ch(CJK), FontStyle::Regular).unwrap();
    assert_eq!(glyph.info.tier, Tier::Primary(0));
    assert!(!glyph.has_pixels());
    assert_eq!(glyph.info.pixel_type, OutputType::GeometryOnly);
    assert_eq!((glyph.info.left, glyph.info.top), (1, 12));

    let glyph = registry.load_ascii_glyph(b'q', FontStyle::Italic).unwrap();
    assert_eq!(glyph.info.codepoint, 'q' as u32);
    assert_eq!(glyph.info.tier, Tier::Primary(1));
}

#[test]
fn test_snapshot_outlives_the_next_request() {
    let mut registry = tiered_registry(OutputType::Grayscale);
    let first = registry.load_and_render_glyph('a', FontStyle::Regular).unwrap().snapshot();
    let second = registry.load_and_render_glyph(ch(GRIN), FontStyle::Regular).unwrap().snapshot();

    assert_eq!(first.info.codepoint, 'a' as u32);
    assert_eq!(first.row(0)[0], gray_at(0, 0));
    assert_ne!(first.pixels, second.pixels);
    assert_eq!(first.as_output().row(1), first.row(1));
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn test_cell_size_from_primaries() {
    let registry = tiered_registry(OutputType::Grayscale);
    assert_eq!(registry.cell_size(), CellSize { width: 8, height: 16 });
    assert_eq!(registry.pixels_for(24, 80), (640, 384));
}

#[test]
fn test_pixels_for_saturates_huge_grids() {
    let registry = tiered_registry(OutputType::Grayscale);
    assert_eq!(registry.pixels_for(1, u32::MAX / 2), (u32::MAX, 16));
    assert_eq!(registry.pixels_for(u32::MAX, 1), (8, u32::MAX));
}

#[test]
fn test_reload_twice_gives_identical_metrics() {
    let mut registry = tiered_registry(OutputType::Grayscale);

    let first = registry.reload_fonts(18.0, 96).unwrap();
    let second = registry.reload_fonts(18.0, 96).unwrap();
    assert_eq!(first, second);
    assert_eq!(first, CellSize { width: 12, height: 24 });
    assert_eq!(registry.primaries()[1].regular().line_height_pixels(), 24);
    let glyph = registry.load_and_render_glyph('m', FontStyle::Regular).unwrap();
    assert_eq!(glyph.info.width, 12);
}

#[test]
fn test_reload_keeps_tiers_and_face_count() {
    let engine = FakeEngine::new()
        .with_font("/fonts/mono.ttf", FakeFont::ascii())
        .with_font("/fonts/symbols.ttf", FakeFont::covering(0x2600..=0x27BF));
    let live = engine.live_faces();
    let settings = single_family("/fonts/mono.ttf").with_symbol_font("/fonts/symbols.ttf");
    let mut registry = loaded_registry(engine, settings);
    assert_eq!(live.get(), 2);

    registry.reload_fonts(24.0, 144).unwrap();
    assert_eq!(live.get(), 2);
    assert_eq!(registry.symbol_faces().len(), 1);
    assert_eq!(registry.settings().size, 24.0);
    assert_eq!(registry.resolve(ch(HEART), FontStyle::Regular).unwrap().tier, Tier::Symbol(0));
}

#[test]
fn test_failed_reload_restores_previous_size() {
    let engine = FakeEngine::new()
        .with_font("/fonts/mono.ttf", FakeFont::ascii().rejecting_sizes_above(64.0));
    let mut registry = loaded_registry(engine, single_family("/fonts/mono.ttf"));
    let before = registry.cell_size();

    let err = registry.reload_fonts(72.0, 96).unwrap_err();
    assert!(matches!(err, FontError::NoBaseFont { .. }));
    assert!(registry.is_loaded());
    assert_eq!(registry.cell_size(), before);
    assert_eq!(registry.settings().size, 12.0);
    assert!(registry.load_and_render_glyph('m', FontStyle::Regular).is_ok());
}

#[test]
fn test_missing_base_font_is_fatal() {
    let engine = FakeEngine::new()
        .with_font("/fonts/symbols.ttf", FakeFont::covering(0x2600..=0x27BF));
    let live = engine.live_faces();
    let settings = single_family("/fonts/missing.ttf").with_symbol_font("/fonts/symbols.ttf");
    let mut registry = FamilyRegistry::with_engine(engine, settings);

    let err = registry.load_fonts().unwrap_err();
    assert!(matches!(err, FontError::NoBaseFont { .. }));
    assert!(!registry.is_loaded());
    assert_eq!(live.get(), 0);
    assert!(matches!(registry.resolve('a', FontStyle::Regular), Err(FontError::NotLoaded)));
}

#[test]
fn test_destroy_releases_everything_and_guards_calls() {
    let engine = FakeEngine::new()
        .with_font("/fonts/mono.ttf", FakeFont::ascii())
        .with_font("/fonts/mono-bold.ttf", FakeFont::ascii())
        .with_font("/fonts/emoji.ttf", FakeFont::covering(0x1F300..=0x1FAFF).with_color());
    let live = engine.live_faces();
    let settings = settings_with(vec![
        FamilyConfig::new("/fonts/mono.ttf").with_bold("/fonts/mono-bold.ttf"),
    ])
    .with_color_font("/fonts/emoji.ttf");
    let mut registry = loaded_registry(engine, settings);
    assert_eq!(live.get(), 3);

    registry.destroy();
    assert_eq!(live.get(), 0);
    assert!(registry.is_destroyed());
    assert!(registry.engine().is_none());
    assert_eq!(registry.cell_size(), CellSize::default());

    assert!(matches!(registry.resolve('a', FontStyle::Regular), Err(FontError::Destroyed)));
    assert!(matches!(registry.load_glyph('a', FontStyle::Regular), Err(FontError::Destroyed)));
    assert!(matches!(
        registry.load_and_render_glyph(ch(GRIN), FontStyle::Regular),
        Err(FontError::Destroyed)
    ));
    assert!(matches!(
        registry.load_and_render_ascii_glyph(b'a', FontStyle::Regular),
        Err(FontError::Destroyed)
    ));
    assert!(matches!(registry.reload_fonts(12.0, 96), Err(FontError::Destroyed)));
    assert!(matches!(registry.load_fonts(), Err(FontError::Destroyed)));
}

#[test]
fn test_dropping_registry_releases_faces() {
    let engine = FakeEngine::new().with_font("/fonts/mono.ttf", FakeFont::ascii());
    let live = engine.live_faces();
    {
        let _registry = loaded_registry(engine, single_family("/fonts/mono.ttf"));
        assert_eq!(live.get(), 1);
    }
    assert_eq!(live.get(), 0);
}

#[test]
fn test_load_fonts_again_rebuilds_without_leaking() {
    let engine = FakeEngine::new().with_font("/fonts/mono.ttf", FakeFont::ascii());
    let live = engine.live_faces();
    let mut registry = loaded_registry(engine, single_family("/fonts/mono.ttf"));

    registry.load_fonts().unwrap();
    assert_eq!(live.get(), 1);
    assert_eq!(registry.primaries().len(), 1);
}
