//! Reformat rasterized glyph bitmaps into the layout the renderer uploads.
//!
//! | source \ target      | grayscale | RGB/BGR horizontal | RGB/BGR vertical | color |
//! |----------------------|-----------|--------------------|------------------|-------|
//! | mono                 | expand    | unsupported        | unsupported      | unsupported |
//! | gray                 | copy      | replicate          | replicate        | white + alpha |
//! | subpixel horizontal  | luminance | copy / swap        | unsupported      | unsupported |
//! | subpixel vertical    | luminance | unsupported        | interleave / swap| unsupported |
//! | RGBA / BGRA          | alpha     | unsupported        | unsupported      | copy / swap |
//!
//! Replicated subpixel data carries no real subpixel detail: each triple
//! holds the gray coverage three times.

use cellglyph_config::OutputType;

use crate::engine::RasterImage;
use crate::error::FontError;
use crate::types::RasterLayout;

/// Shape of a converted bitmap. The bytes live in the caller's buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertedBitmap {
    pub width: u32,
    pub height: u32,
    /// Bytes per row including alignment padding
    pub pitch: usize,
}

/// Converts raster images to an output type with rows padded to `alignment`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapConverter {
    alignment: u8,
}

impl Default for BitmapConverter {
    fn default() -> Self {
        Self::new(4)
    }
}

impl BitmapConverter {
    /// `alignment` is the row byte alignment; values below 1 are treated as 1.
    pub fn new(alignment: u8) -> Self {
        Self {
            alignment: alignment.max(1),
        }
    }

    pub fn alignment(&self) -> u8 {
        self.alignment
    }

    /// Row stride for `width` pixels of `target`.
    pub fn pitch_for(&self, width: u32, target: OutputType) -> usize {
        (width as usize * target.bytes_per_pixel()).next_multiple_of(self.alignment as usize)
    }

    /// Whether `source` can be handed to the renderer as-is.
    pub fn is_passthrough(&self, source: &RasterImage, target: OutputType, rgb_flip: bool) -> bool {
        let layout_matches = match (source.layout, target) {
            (RasterLayout::Gray, OutputType::Grayscale) => true,
            (RasterLayout::SubpixelHorizontal, OutputType::RgbHorizontal) => !rgb_flip,
            (RasterLayout::Rgba, OutputType::Color) => !rgb_flip,
            _ => false,
        };
        layout_matches && source.pitch == self.pitch_for(source.width, target)
    }

    /// Write `source` into `dest` in the `target` layout.
    ///
    /// `dest` is cleared and refilled; its allocation is reused across calls.
    pub fn convert(
        &self,
        source: &RasterImage,
        target: OutputType,
        rgb_flip: bool,
        dest: &mut Vec<u8>,
    ) -> Result<ConvertedBitmap, FontError> {
        let unsupported = || FontError::ConversionUnsupported {
            from: source.layout,
            to: target,
        };

        let pitch = self.pitch_for(source.width, target);
        let used = source.width as usize * target.bytes_per_pixel();
        let height = source.height as usize;
        dest.clear();

        if target == OutputType::GeometryOnly {
            return Err(unsupported());
        }
        if source.width == 0 || height == 0 {
            return Ok(ConvertedBitmap {
                width: source.width,
                height: source.height,
                pitch,
            });
        }
        dest.resize(pitch * height, 0);

        match (source.layout, target) {
            (RasterLayout::Mono, OutputType::Grayscale) => {
                for_each_row(source, dest, pitch, used, |src, out| {
                    for (x, px) in out.iter_mut().enumerate() {
                        let bit = src[x / 8] & (0x80 >> (x % 8));
                        *px = if bit != 0 { 255 } else { 0 };
                    }
                });
            }
            (RasterLayout::Mono, OutputType::Color) => {
                for_each_row(source, dest, pitch, used, |src, out| {
                    for (x, px) in out.chunks_exact_mut(4).enumerate() {
                        let bit = src[x / 8] & (0x80 >> (x % 8));
                        px.copy_from_slice(&[255, 255, 255, if bit != 0 { 255 } else { 0 }]);
                    }
                });
            }
            (RasterLayout::Mono, _) => return Err(unsupported()),

            (RasterLayout::Gray, OutputType::Grayscale) => {
                for_each_row(source, dest, pitch, used, |src, out| out.copy_from_slice(src));
            }
            (RasterLayout::Gray, OutputType::Color) => {
                for_each_row(source, dest, pitch, used, |src, out| {
                    for (px, &alpha) in out.chunks_exact_mut(4).zip(src) {
                        px.copy_from_slice(&[255, 255, 255, alpha]);
                    }
                });
            }
            (RasterLayout::Gray, _) => {
                // Subpixel synthesis: equal channels, so channel order is moot.
                for_each_row(source, dest, pitch, used, |src, out| {
                    for (px, &gray) in out.chunks_exact_mut(3).zip(src) {
                        px.fill(gray);
                    }
                });
            }

            (RasterLayout::SubpixelHorizontal, OutputType::Grayscale) => {
                for_each_row(source, dest, pitch, used, |src, out| {
                    for (px, rgb) in out.iter_mut().zip(src.chunks_exact(3)) {
                        *px = luminance(rgb[0], rgb[1], rgb[2]);
                    }
                });
            }
            (
                RasterLayout::SubpixelHorizontal,
                OutputType::RgbHorizontal | OutputType::BgrHorizontal,
            ) => {
                for_each_row(source, dest, pitch, used, |src, out| {
                    out.copy_from_slice(src);
                    if rgb_flip {
                        out.chunks_exact_mut(3).for_each(|px| px.swap(0, 2));
                    }
                });
            }
            (RasterLayout::SubpixelHorizontal, _) => return Err(unsupported()),

            (RasterLayout::SubpixelVertical, OutputType::Grayscale) => {
                for_each_vertical_row(source, dest, pitch, used, |[r, g, b], out| {
                    for (x, px) in out.iter_mut().enumerate() {
                        *px = luminance(r[x], g[x], b[x]);
                    }
                });
            }
            (RasterLayout::SubpixelVertical, OutputType::RgbVertical | OutputType::BgrVertical) => {
                for_each_vertical_row(source, dest, pitch, used, |[r, g, b], out| {
                    for (x, px) in out.chunks_exact_mut(3).enumerate() {
                        if rgb_flip {
                            px.copy_from_slice(&[b[x], g[x], r[x]]);
                        } else {
                            px.copy_from_slice(&[r[x], g[x], b[x]]);
                        }
                    }
                });
            }
            (RasterLayout::SubpixelVertical, _) => return Err(unsupported()),

            (RasterLayout::Rgba | RasterLayout::Bgra, OutputType::Color) => {
                let swap = (source.layout == RasterLayout::Bgra) != rgb_flip;
                for_each_row(source, dest, pitch, used, |src, out| {
                    out.copy_from_slice(src);
                    if swap {
                        out.chunks_exact_mut(4).for_each(|px| px.swap(0, 2));
                    }
                });
            }
            (RasterLayout::Rgba | RasterLayout::Bgra, OutputType::Grayscale) => {
                for_each_row(source, dest, pitch, used, |src, out| {
                    for (px, rgba) in out.iter_mut().zip(src.chunks_exact(4)) {
                        *px = rgba[3];
                    }
                });
            }
            (RasterLayout::Rgba | RasterLayout::Bgra, _) => return Err(unsupported()),
        }

        Ok(ConvertedBitmap {
            width: source.width,
            height: source.height,
            pitch,
        })
    }
}

/// Rec. 601 luma, the same weights the GPU path uses for coverage.
fn luminance(r: u8, g: u8, b: u8) -> u8 {
    ((r as u32 * 299 + g as u32 * 587 + b as u32 * 114) / 1000) as u8
}

/// Call `f` with each source row and the first `used` bytes of the matching
/// dest row.
fn for_each_row(
    source: &RasterImage,
    dest: &mut [u8],
    pitch: usize,
    used: usize,
    mut f: impl FnMut(&[u8], &mut [u8]),
) {
    for (row, out) in dest.chunks_exact_mut(pitch).enumerate() {
        f(source.row(row), &mut out[..used]);
    }
}

/// Like `for_each_row`, but hands over the three sub-rows of a vertical
/// subpixel pixel row.
fn for_each_vertical_row(
    source: &RasterImage,
    dest: &mut [u8],
    pitch: usize,
    used: usize,
    mut f: impl FnMut([&[u8]; 3], &mut [u8]),
) {
    for (row, out) in dest.chunks_exact_mut(pitch).enumerate() {
        let sub_rows = [
            source.row(row * 3),
            source.row(row * 3 + 1),
            source.row(row * 3 + 2),
        ];
        f(sub_rows, &mut out[..used]);
    }
}
