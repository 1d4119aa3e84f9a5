//! Shared integration test helpers for cellglyph-fonts.
//!
//! `FakeEngine` is an in-memory `FontEngine`: each "font file" is a
//! `FakeFont` registered under a path, covering declared codepoint ranges
//! and producing deterministic bitmaps. Live faces are counted so tests can
//! check that every native face is released.
//!
//! ```ignore
//! mod common;
//! use common::{FakeEngine, FakeFont, settings_with};
//! ```

#![allow(dead_code)]

use std::cell::Cell;
use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use cellglyph_config::{FamilyConfig, FontSettings, OutputType};
use cellglyph_fonts::{
    FaceMetrics, FamilyRegistry, FontEngine, FontError, GlyphMetrics, LoadFlags, RasterImage,
    RasterLayout, RenderMode,
};

/// BGRA value of every pixel of a color glyph.
pub const COLOR_PIXEL_BGRA: [u8; 4] = [0x10, 0x20, 0x30, 0xFF];

/// R, G, B coverage of every native subpixel sample.
pub const LCD_SAMPLE: [u8; 3] = [10, 20, 30];

/// Coverage of the fake grayscale bitmap at (`x`, `y`); never zero.
pub fn gray_at(x: usize, y: usize) -> u8 {
    ((x * 31 + y * 17) % 251 + 1) as u8
}

/// Width of a fake glyph bitmap at `pixel_size`.
pub fn glyph_width(pixel_size: f32) -> u32 {
    (pixel_size / 2.0).ceil() as u32
}

/// Height of a fake glyph bitmap at `pixel_size`.
pub fn glyph_height(pixel_size: f32) -> u32 {
    (pixel_size * 0.75).ceil() as u32
}

#[derive(Debug, Clone)]
pub struct FakeFont {
    pub covers: Vec<RangeInclusive<u32>>,
    pub monospace: bool,
    pub native_lcd: bool,
    pub color: bool,
    /// Largest pixel size the face accepts
    pub max_pixel_size: f32,
}

impl FakeFont {
    /// A monospaced face covering `range`.
    pub fn covering(range: RangeInclusive<u32>) -> Self {
        Self {
            covers: vec![range],
            monospace: true,
            native_lcd: false,
            color: false,
            max_pixel_size: 1000.0,
        }
    }

    /// A monospaced face covering printable ASCII.
    pub fn ascii() -> Self {
        Self::covering(0x20..=0x7E)
    }

    pub fn and(mut self, range: RangeInclusive<u32>) -> Self {
        self.covers.push(range);
        self
    }

    pub fn with_native_lcd(mut self) -> Self {
        self.native_lcd = true;
        self
    }

    pub fn with_color(mut self) -> Self {
        self.color = true;
        self
    }

    pub fn proportional(mut self) -> Self {
        self.monospace = false;
        self
    }

    pub fn rejecting_sizes_above(mut self, pixel_size: f32) -> Self {
        self.max_pixel_size = pixel_size;
        self
    }

    fn maps(&self, codepoint: u32) -> bool {
        self.covers.iter().any(|range| range.contains(&codepoint))
    }
}

#[derive(Debug)]
pub struct FakeFace {
    pub path: PathBuf,
    pub font: FakeFont,
    live: Rc<Cell<usize>>,
}

impl Drop for FakeFace {
    fn drop(&mut self) {
        self.live.set(self.live.get() - 1);
    }
}

#[derive(Debug, Default)]
pub struct FakeEngine {
    fonts: HashMap<PathBuf, FakeFont>,
    live: Rc<Cell<usize>>,
    renders: Rc<Cell<usize>>,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `font` as the file at `path`.
    pub fn with_font(mut self, path: &str, font: FakeFont) -> Self {
        self.fonts.insert(PathBuf::from(path), font);
        self
    }

    /// Counter of currently open faces; outlives the engine.
    pub fn live_faces(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.live)
    }

    /// Counter of `render_glyph` calls; outlives the engine.
    pub fn render_calls(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.renders)
    }
}

impl FontEngine for FakeEngine {
    type Face = FakeFace;

    fn open_face(&mut self, path: &Path, _index: u32) -> Result<FakeFace, FontError> {
        let font = self
            .fonts
            .get(path)
            .cloned()
            .ok_or_else(|| FontError::ResourceOpenFailure {
                path: path.to_path_buf(),
                reason: "No such file or directory".to_string(),
            })?;
        self.live.set(self.live.get() + 1);
        Ok(FakeFace {
            path: path.to_path_buf(),
            font,
            live: Rc::clone(&self.live),
        })
    }

    fn face_metrics(&mut self, face: &FakeFace, pixel_size: f32) -> Result<FaceMetrics, FontError> {
        if pixel_size <= 0.0 || pixel_size > face.font.max_pixel_size {
            return Err(FontError::ResourceOpenFailure {
                path: face.path.clone(),
                reason: format!("pixel size {} rejected", pixel_size),
            });
        }
        Ok(FaceMetrics {
            ascent: pixel_size * 0.75,
            descent: pixel_size * 0.25,
            advance: pixel_size * 0.5,
            is_monospace: face.font.monospace,
            uniform_advance: face.font.monospace,
        })
    }

    fn glyph_index(&self, face: &FakeFace, codepoint: u32) -> u16 {
        if face.font.maps(codepoint) {
            ((codepoint & 0xFFFF) as u16).max(1)
        } else {
            0
        }
    }

    fn supports_render_mode(&mut self, face: &FakeFace, mode: RenderMode) -> bool {
        match mode {
            RenderMode::Lcd | RenderMode::LcdV => face.font.native_lcd,
            _ => true,
        }
    }

    fn has_color_glyphs(&mut self, face: &FakeFace) -> bool {
        face.font.color
    }

    fn load_glyph(
        &mut self,
        _face: &FakeFace,
        pixel_size: f32,
        _glyph_id: u16,
        _flags: LoadFlags,
    ) -> Result<GlyphMetrics, FontError> {
        Ok(GlyphMetrics {
            width: glyph_width(pixel_size),
            height: glyph_height(pixel_size),
            left: 1,
            top: (pixel_size * 0.75) as i32,
            advance: pixel_size * 0.5,
        })
    }

    fn render_glyph(
        &mut self,
        face: &FakeFace,
        pixel_size: f32,
        glyph_id: u16,
        mode: RenderMode,
        flags: LoadFlags,
    ) -> Result<RasterImage, FontError> {
        self.renders.set(self.renders.get() + 1);
        let width = glyph_width(pixel_size);
        let height = glyph_height(pixel_size);
        let (w, h) = (width as usize, height as usize);

        let (layout, pitch, data) = if flags.contains(LoadFlags::COLOR) && face.font.color {
            (RasterLayout::Bgra, w * 4, COLOR_PIXEL_BGRA.repeat(w * h))
        } else {
            match mode {
                RenderMode::None => {
                    return Err(FontError::RasterizationFailed {
                        glyph_id,
                        reason: "no render mode".to_string(),
                    });
                }
                RenderMode::Mono => {
                    let pitch = w.div_ceil(8);
                    let mut data = vec![0u8; pitch * h];
                    for row in data.chunks_exact_mut(pitch) {
                        for x in 0..w {
                            row[x / 8] |= 0x80 >> (x % 8);
                        }
                    }
                    (RasterLayout::Mono, pitch, data)
                }
                RenderMode::Lcd => {
                    let data = LCD_SAMPLE.repeat(w * h);
                    (RasterLayout::SubpixelHorizontal, w * 3, data)
                }
                RenderMode::LcdV => {
                    let mut data = Vec::with_capacity(w * h * 3);
                    for _ in 0..h {
                        for sample in LCD_SAMPLE {
                            data.extend(std::iter::repeat_n(sample, w));
                        }
                    }
                    (RasterLayout::SubpixelVertical, w, data)
                }
                RenderMode::Normal => {
                    let data = (0..h)
                        .flat_map(|y| (0..w).map(move |x| gray_at(x, y)))
                        .collect();
                    (RasterLayout::Gray, w, data)
                }
            }
        };

        Ok(RasterImage {
            width,
            height,
            left: 1,
            top: (pixel_size * 0.75) as i32,
            pitch,
            layout,
            data,
        })
    }
}

/// 12pt at 96 dpi (16px), no built-in fallbacks.
pub fn settings_with(families: Vec<FamilyConfig>) -> FontSettings {
    FontSettings {
        families,
        system_fallbacks: false,
        warn_not_fixed: false,
        ..FontSettings::default()
    }
    .with_size(12.0)
    .with_dpi(96)
    .with_output(OutputType::Grayscale)
}

/// `settings_with` a single wildcard family at `path`.
pub fn single_family(path: &str) -> FontSettings {
    settings_with(vec![FamilyConfig::new(path)])
}

/// A loaded registry over `engine`.
pub fn loaded_registry(engine: FakeEngine, settings: FontSettings) -> FamilyRegistry<FakeEngine> {
    let mut registry = FamilyRegistry::with_engine(engine, settings);
    registry.load_fonts().expect("fonts should load");
    registry
}
