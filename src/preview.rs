//! Text previews of rendered glyph bitmaps.
//!
//! Each pixel is reduced to a single coverage value and mapped onto a
//! ten-step character ramp, so a glyph can be inspected in a terminal.

use cellglyph_config::OutputType;
use cellglyph_fonts::{GlyphInfo, GlyphOutput};

/// Character ramp from empty to full coverage.
pub const SHADES: &[u8] = b" .:-=+*#%@";

/// Coverage of one pixel given its bytes in `pixel_type` layout.
///
/// Subpixel layouts average their three channels; color pixels use alpha.
pub fn coverage(pixel_type: OutputType, pixel: &[u8]) -> u8 {
    match pixel_type {
        OutputType::GeometryOnly => 0,
        OutputType::Color => pixel.get(3).copied().unwrap_or(0),
        _ if pixel.is_empty() => 0,
        _ => {
            let sum: u32 = pixel.iter().map(|&b| b as u32).sum();
            (sum / pixel.len() as u32) as u8
        }
    }
}

/// Ramp character for a coverage value.
pub fn shade(coverage: u8) -> char {
    let steps = SHADES.len() - 1;
    let index = (coverage as usize * steps + 127) / 255;
    SHADES[index] as char
}

/// Render the glyph as shaded text, one line per bitmap row.
///
/// Glyphs without pixel data yield an empty string.
pub fn render(glyph: &GlyphOutput<'_>) -> String {
    let info = &glyph.info;
    let bpp = info.pixel_type.bytes_per_pixel();
    if !glyph.has_pixels() || bpp == 0 {
        return String::new();
    }

    let width = info.width as usize;
    let mut text = String::with_capacity((width + 1) * info.height as usize);
    for y in 0..info.height as usize {
        let row = glyph.row(y);
        for pixel in row.chunks_exact(bpp).take(width) {
            text.push(shade(coverage(info.pixel_type, pixel)));
        }
        text.push('\n');
    }
    text
}

/// One-line summary of where a glyph came from and how it is laid out.
pub fn describe(info: &GlyphInfo) -> String {
    format!(
        "U+{:04X} glyph {} from {} ({}), {}x{} at ({}, {}), {} pitch {}{}",
        info.codepoint,
        info.glyph_id,
        info.tier,
        info.style,
        info.width,
        info.height,
        info.left,
        info.top,
        info.pixel_type,
        info.pitch,
        if info.rgb_flip { ", bgr" } else { "" },
    )
}
