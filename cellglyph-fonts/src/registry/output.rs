//! Glyph results handed to the renderer.

use cellglyph_config::OutputType;

use crate::types::FontStyle;

use super::search::Tier;

/// Everything about a produced glyph except its pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphInfo {
    pub codepoint: u32,
    pub glyph_id: u16,
    /// Fallback tier and position of the face that served the glyph
    pub tier: Tier,
    /// Style of the face that served the glyph (regular when a variant fell back)
    pub style: FontStyle,
    pub width: u32,
    pub height: u32,
    /// Offset from the pen position to the left edge of the bitmap
    pub left: i32,
    /// Offset from the baseline up to the top edge of the bitmap
    pub top: i32,
    /// Bytes per row including padding; 0 when there are no pixels
    pub pitch: usize,
    pub row_alignment: u8,
    /// Layout of the pixel data; `GeometryOnly` when there is none
    pub pixel_type: OutputType,
    pub rgb_flip: bool,
}

/// The latest glyph produced by a registry.
///
/// The pixels borrow the registry's scratch buffers, so the output must be
/// consumed (or `snapshot`ted) before the next glyph request.
#[derive(Debug, Clone, Copy)]
pub struct GlyphOutput<'a> {
    pub info: GlyphInfo,
    pixels: &'a [u8],
}

impl<'a> GlyphOutput<'a> {
    pub(crate) fn new(info: GlyphInfo, pixels: &'a [u8]) -> Self {
        Self { info, pixels }
    }

    pub(crate) fn geometry(info: GlyphInfo) -> Self {
        Self::new(
            GlyphInfo {
                pitch: 0,
                pixel_type: OutputType::GeometryOnly,
                ..info
            },
            &[],
        )
    }

    /// Pixel rows, `info.pitch` bytes apart.
    pub fn pixels(&self) -> &'a [u8] {
        self.pixels
    }

    pub fn has_pixels(&self) -> bool {
        !self.pixels.is_empty()
    }

    /// Row `row` including its padding.
    pub fn row(&self, row: usize) -> &'a [u8] {
        row_of(&self.info, self.pixels, row)
    }

    /// Copy the glyph out of the registry's buffers.
    pub fn snapshot(&self) -> OwnedGlyph {
        OwnedGlyph {
            info: self.info,
            pixels: self.pixels.to_vec(),
        }
    }
}

/// A glyph copied out of the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct OwnedGlyph {
    pub info: GlyphInfo,
    pub pixels: Vec<u8>,
}

impl OwnedGlyph {
    pub fn row(&self, row: usize) -> &[u8] {
        row_of(&self.info, &self.pixels, row)
    }

    pub fn as_output(&self) -> GlyphOutput<'_> {
        GlyphOutput::new(self.info, &self.pixels)
    }
}

fn row_of<'a>(info: &GlyphInfo, pixels: &'a [u8], row: usize) -> &'a [u8] {
    if info.pitch == 0 || row >= info.height as usize {
        return &[];
    }
    let start = row * info.pitch;
    pixels.get(start..start + info.pitch).unwrap_or(&[])
}
