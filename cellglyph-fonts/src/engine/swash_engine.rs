//! swash-backed `FontEngine`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use swash::FontRef;
use swash::scale::image::{Content, Image};
use swash::scale::{Render, ScaleContext, Scaler, Source, StrikeWith};
use swash::zeno::Format;

use super::{FaceMetrics, FontEngine, GlyphMetrics, RasterImage};
use crate::error::FontError;
use crate::types::{LoadFlags, RasterLayout, RenderMode};

/// Glyphs sampled to decide whether a face has uniform advances.
const ADVANCE_SAMPLES: &[char] = &['i', 'M', 'W', '0', '.', '_', '@'];

/// Sources tried in order when color is requested. Regular text fonts have
/// no color data, so they fall through to the outline.
const COLOR_SOURCES: &[Source] = &[
    Source::ColorBitmap(StrikeWith::BestFit),
    Source::ColorOutline(0),
    Source::Outline,
];

const MASK_SOURCES: &[Source] = &[Source::Outline, Source::Bitmap(StrikeWith::BestFit)];

/// Owns font bytes together with a `FontRef` into them.
///
/// The `FontRef` is valid for as long as this struct (or a clone of it) lives.
#[derive(Clone)]
pub struct FontData {
    /// Raw font data bytes (TTF/OTF/TTC)
    pub data: Arc<Vec<u8>>,
    /// Swash font reference for glyph operations
    pub font_ref: FontRef<'static>,
}

impl std::fmt::Debug for FontData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontData")
            .field("data_len", &self.data.len())
            .finish()
    }
}

impl FontData {
    /// Create a new FontData from bytes using face index 0.
    pub fn new(data: Vec<u8>) -> Option<Self> {
        Self::new_with_index(data, 0)
    }

    /// Create a new FontData for face `face_index` of a font file or collection.
    ///
    /// Returns `None` if the bytes are not a font or the index is out of range.
    pub fn new_with_index(data: Vec<u8>, face_index: usize) -> Option<Self> {
        let data_arc = Arc::new(data);

        // SAFETY: the bytes live in an Arc stored next to the FontRef. The Vec
        // is never mutated and the FontRef is dropped together with (or before)
        // the last Arc, so the 'static borrow never dangles.
        let font_ref = unsafe {
            let bytes = data_arc.as_slice();
            let static_bytes: &'static [u8] = std::mem::transmute(bytes);
            FontRef::from_index(static_bytes, face_index)?
        };

        Some(FontData {
            data: data_arc,
            font_ref,
        })
    }
}

/// A face opened by `SwashEngine`.
#[derive(Debug)]
pub struct SwashFace {
    path: PathBuf,
    font: FontData,
}

impl SwashFace {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn font_data(&self) -> &FontData {
        &self.font
    }
}

/// Font engine backed by swash. The `ScaleContext` is the library-level
/// resource: it caches scaler state across glyphs and faces.
pub struct SwashEngine {
    context: ScaleContext,
}

impl Default for SwashEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SwashEngine {
    pub fn new() -> Self {
        Self {
            context: ScaleContext::new(),
        }
    }

    fn scaler<'a>(
        &'a mut self,
        face: &'a SwashFace,
        pixel_size: f32,
        flags: LoadFlags,
    ) -> Scaler<'a> {
        self.context
            .builder(face.font.font_ref)
            .size(pixel_size)
            .hint(!flags.contains(LoadFlags::NO_HINTING))
            .build()
    }
}

impl FontEngine for SwashEngine {
    type Face = SwashFace;

    fn open_face(&mut self, path: &Path, index: u32) -> Result<SwashFace, FontError> {
        let bytes = std::fs::read(path).map_err(|e| FontError::open_failure(path, e.to_string()))?;
        let font = FontData::new_with_index(bytes, index as usize).ok_or_else(|| {
            FontError::open_failure(path, format!("not a valid font (face index {index})"))
        })?;
        log::debug!("Opened font face {:?} (index {})", path, index);
        Ok(SwashFace {
            path: path.to_path_buf(),
            font,
        })
    }

    fn face_metrics(
        &mut self,
        face: &SwashFace,
        pixel_size: f32,
    ) -> Result<FaceMetrics, FontError> {
        if !pixel_size.is_finite() || pixel_size <= 0.0 {
            return Err(FontError::open_failure(
                &face.path,
                format!("invalid pixel size {pixel_size}"),
            ));
        }

        let font = face.font.font_ref;
        let metrics = font.metrics(&[]);
        if metrics.units_per_em == 0 {
            return Err(FontError::open_failure(&face.path, "units per em is zero"));
        }
        let scaled = metrics.scale(pixel_size);
        let glyph_metrics = font.glyph_metrics(&[]).scale(pixel_size);
        let charmap = font.charmap();

        let advances: Vec<f32> = ADVANCE_SAMPLES
            .iter()
            .map(|&ch| charmap.map(ch))
            .filter(|&glyph_id| glyph_id != 0)
            .map(|glyph_id| glyph_metrics.advance_width(glyph_id))
            .collect();
        let uniform_advance = advances
            .first()
            .is_none_or(|first| advances.iter().all(|a| (a - first).abs() < 0.01));

        // Cell width is the advance of 'm'; hhea max width is full-width in CJK mono fonts.
        let representative = charmap.map('m');
        let advance = if representative != 0 {
            glyph_metrics.advance_width(representative)
        } else if let Some(&first) = advances.first() {
            first
        } else if metrics.is_monospace && scaled.max_width > 0.0 {
            scaled.max_width
        } else {
            scaled.average_width
        };

        Ok(FaceMetrics {
            ascent: scaled.ascent,
            descent: scaled.descent.abs(),
            advance,
            is_monospace: metrics.is_monospace,
            uniform_advance,
        })
    }

    fn glyph_index(&self, face: &SwashFace, codepoint: u32) -> u16 {
        face.font.font_ref.charmap().map(codepoint)
    }

    fn supports_render_mode(&mut self, _face: &SwashFace, mode: RenderMode) -> bool {
        // swash only produces horizontal subpixel masks
        mode != RenderMode::LcdV
    }

    fn has_color_glyphs(&mut self, face: &SwashFace) -> bool {
        let scaler = self.context.builder(face.font.font_ref).build();
        scaler.has_color_outlines() || scaler.has_color_bitmaps()
    }

    fn load_glyph(
        &mut self,
        face: &SwashFace,
        pixel_size: f32,
        glyph_id: u16,
        flags: LoadFlags,
    ) -> Result<GlyphMetrics, FontError> {
        let advance = face
            .font
            .font_ref
            .glyph_metrics(&[])
            .scale(pixel_size)
            .advance_width(glyph_id);
        let mut scaler = self.scaler(face, pixel_size, flags);

        if let Some(outline) = scaler.scale_outline(glyph_id) {
            let bounds = outline.bounds();
            if bounds.max.x <= bounds.min.x || bounds.max.y <= bounds.min.y {
                return Ok(GlyphMetrics {
                    advance,
                    ..GlyphMetrics::default()
                });
            }
            let left = bounds.min.x.floor();
            let right = bounds.max.x.ceil();
            let bottom = bounds.min.y.floor();
            let top = bounds.max.y.ceil();
            return Ok(GlyphMetrics {
                width: (right - left) as u32,
                height: (top - bottom) as u32,
                left: left as i32,
                top: top as i32,
                advance,
            });
        }

        // Bitmap-only glyphs (emoji strikes) have no outline to measure, so
        // the placement comes from decoding the strike.
        let sources = if flags.contains(LoadFlags::COLOR) {
            COLOR_SOURCES
        } else {
            MASK_SOURCES
        };
        let image = Render::new(sources)
            .format(Format::Alpha)
            .render(&mut scaler, glyph_id)
            .ok_or_else(|| FontError::RasterizationFailed {
                glyph_id,
                reason: "glyph has neither an outline nor a bitmap".to_string(),
            })?;
        Ok(GlyphMetrics {
            width: image.placement.width,
            height: image.placement.height,
            left: image.placement.left,
            top: image.placement.top,
            advance,
        })
    }

    fn render_glyph(
        &mut self,
        face: &SwashFace,
        pixel_size: f32,
        glyph_id: u16,
        mode: RenderMode,
        flags: LoadFlags,
    ) -> Result<RasterImage, FontError> {
        let format = match mode {
            RenderMode::None => {
                return Err(FontError::RasterizationFailed {
                    glyph_id,
                    reason: "face is loaded for geometry only".to_string(),
                });
            }
            RenderMode::LcdV => {
                return Err(FontError::UnsupportedRenderMode {
                    path: face.path.clone(),
                    requested: mode,
                });
            }
            RenderMode::Lcd => Format::Subpixel,
            RenderMode::Normal | RenderMode::Mono => Format::Alpha,
        };
        let sources = if flags.contains(LoadFlags::COLOR) {
            COLOR_SOURCES
        } else {
            MASK_SOURCES
        };

        let mut scaler = self.scaler(face, pixel_size, flags);
        let Some(image) = Render::new(sources)
            .format(format)
            .render(&mut scaler, glyph_id)
        else {
            log::trace!("Glyph {} produced no image, treating it as blank", glyph_id);
            return Ok(RasterImage::empty(0, 0));
        };

        let monochrome = mode == RenderMode::Mono || flags.contains(LoadFlags::MONOCHROME);
        Ok(into_raster(image, monochrome))
    }
}

/// Move a swash image into a `RasterImage`, repacking where swash's layout
/// differs from the engine contract.
fn into_raster(image: Image, monochrome: bool) -> RasterImage {
    let width = image.placement.width;
    let height = image.placement.height;
    let left = image.placement.left;
    let top = image.placement.top;
    let w = width as usize;

    let (layout, pitch, data) = match image.content {
        Content::Mask if monochrome => {
            let pitch = w.div_ceil(8);
            (RasterLayout::Mono, pitch, pack_mono(&image.data, w, pitch))
        }
        Content::Mask => (RasterLayout::Gray, w, image.data),
        Content::SubpixelMask => (
            RasterLayout::SubpixelHorizontal,
            w * 3,
            compact_subpixel_mask(&image.data, w, height as usize),
        ),
        Content::Color => (RasterLayout::Rgba, w * 4, image.data),
    };

    RasterImage {
        width,
        height,
        left,
        top,
        pitch,
        layout,
        data,
    }
}

/// Threshold an alpha mask into MSB-first 1-bit rows.
fn pack_mono(mask: &[u8], width: usize, pitch: usize) -> Vec<u8> {
    if width == 0 {
        return Vec::new();
    }
    let rows = mask.len() / width;
    let mut packed = vec![0u8; pitch * rows];
    for (row, src) in mask.chunks_exact(width).enumerate() {
        for (x, &alpha) in src.iter().enumerate() {
            if alpha > 127 {
                packed[row * pitch + x / 8] |= 0x80 >> (x % 8);
            }
        }
    }
    packed
}

/// Reduce a swash subpixel mask to R, G, B triples.
/// Some swash builds emit 3 bytes/pixel, others 4 bytes/pixel with a
/// padding (and sometimes zeroed) fourth byte.
fn compact_subpixel_mask(data: &[u8], width: usize, height: usize) -> Vec<u8> {
    let pixels = width * height;
    if pixels == 0 {
        return Vec::new();
    }
    match data.len() / pixels {
        3 => data[..pixels * 3].to_vec(),
        4 => data
            .chunks_exact(4)
            .flat_map(|chunk| [chunk[0], chunk[1], chunk[2]])
            .collect(),
        _ => {
            // Unknown layout: opaque coverage keeps the glyph visible.
            vec![255; pixels * 3]
        }
    }
}
