//! The native font engine seam.
//!
//! `FontEngine` is the narrow set of operations the registry needs from a
//! rasterizer: open a face, read its scaled metrics, map codepoints, and
//! load or render glyphs. `SwashEngine` is the production implementation.

mod swash_engine;

use std::path::Path;

use crate::error::FontError;
use crate::types::{LoadFlags, RasterLayout, RenderMode};

pub use swash_engine::{FontData, SwashEngine, SwashFace};

/// Face-wide metrics scaled to a pixel size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FaceMetrics {
    /// Distance from the baseline to the top of the tallest glyphs
    pub ascent: f32,
    /// Distance from the baseline to the bottom of the lowest glyphs (positive)
    pub descent: f32,
    /// Advance of a representative glyph, or the fixed advance for monospace faces
    pub advance: f32,
    /// The face declares itself monospaced
    pub is_monospace: bool,
    /// Sampled glyphs all share one advance width
    pub uniform_advance: bool,
}

/// Placement of one glyph without its pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GlyphMetrics {
    pub width: u32,
    pub height: u32,
    /// Offset from the pen position to the left edge of the bitmap
    pub left: i32,
    /// Offset from the baseline up to the top edge of the bitmap
    pub top: i32,
    pub advance: f32,
}

/// A rasterized glyph as the engine produced it.
///
/// `width` and `height` are in device pixels for every layout. Row `r`
/// starts at `r * pitch`; `SubpixelVertical` stores `3 * height` rows.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub left: i32,
    pub top: i32,
    pub pitch: usize,
    pub layout: RasterLayout,
    pub data: Vec<u8>,
}

impl RasterImage {
    /// A zero-sized grayscale image (whitespace glyphs).
    pub fn empty(left: i32, top: i32) -> Self {
        Self {
            width: 0,
            height: 0,
            left,
            top,
            pitch: 0,
            layout: RasterLayout::Gray,
            data: Vec::new(),
        }
    }

    /// Number of stored rows (three per pixel row for vertical subpixel data).
    pub fn rows(&self) -> usize {
        match self.layout {
            RasterLayout::SubpixelVertical => self.height as usize * 3,
            _ => self.height as usize,
        }
    }

    /// Bytes of pixel data in one row, without padding.
    pub fn row_bytes(&self) -> usize {
        let width = self.width as usize;
        match self.layout {
            RasterLayout::Mono => width.div_ceil(8),
            RasterLayout::Gray | RasterLayout::SubpixelVertical => width,
            RasterLayout::SubpixelHorizontal => width * 3,
            RasterLayout::Rgba | RasterLayout::Bgra => width * 4,
        }
    }

    /// The unpadded bytes of row `row`.
    pub fn row(&self, row: usize) -> &[u8] {
        let start = row * self.pitch;
        &self.data[start..start + self.row_bytes()]
    }
}

/// Operations the registry needs from a native font engine.
///
/// The engine value itself is the library-level handle; `Face` is the
/// per-face resource a `FaceHandle` owns while loaded. Dropping a `Face`
/// releases it.
pub trait FontEngine {
    type Face;

    /// Open face `index` of the font file at `path`.
    fn open_face(&mut self, path: &Path, index: u32) -> Result<Self::Face, FontError>;

    /// Face metrics at `pixel_size`. Fails when the face rejects the size.
    fn face_metrics(&mut self, face: &Self::Face, pixel_size: f32)
    -> Result<FaceMetrics, FontError>;

    /// Glyph index for `codepoint`, 0 when the face has no mapping.
    fn glyph_index(&self, face: &Self::Face, codepoint: u32) -> u16;

    /// Whether the face can be rasterized in `mode`.
    fn supports_render_mode(&mut self, face: &Self::Face, mode: RenderMode) -> bool;

    /// Whether the face carries color bitmaps or color outlines.
    fn has_color_glyphs(&mut self, face: &Self::Face) -> bool;

    /// Load a glyph's placement without rasterizing it.
    fn load_glyph(
        &mut self,
        face: &Self::Face,
        pixel_size: f32,
        glyph_id: u16,
        flags: LoadFlags,
    ) -> Result<GlyphMetrics, FontError>;

    /// Rasterize a glyph.
    fn render_glyph(
        &mut self,
        face: &Self::Face,
        pixel_size: f32,
        glyph_id: u16,
        mode: RenderMode,
        flags: LoadFlags,
    ) -> Result<RasterImage, FontError>;
}
