//! A single font face: its file, its native resource while loaded, and the
//! render settings derived from the requested output type.

use std::path::Path;

use cellglyph_config::OutputType;

use crate::engine::FontEngine;
use crate::error::FontError;
use crate::types::{FaceSource, LoadFlags, RenderMode};

/// Parameters for `FaceHandle::load`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadParams {
    /// Size in points
    pub size: f32,
    /// Display resolution in dots per inch
    pub dpi: u32,
    pub output_type: OutputType,
    /// Log a warning when the face is not monospaced
    pub warn_not_fixed: bool,
    pub hinting: bool,
    pub antialias: bool,
    /// Request color sources even when the output type is not `Color`
    pub prefer_color: bool,
}

impl LoadParams {
    pub fn new(size: f32, dpi: u32, output_type: OutputType) -> Self {
        Self {
            size,
            dpi,
            output_type,
            warn_not_fixed: false,
            hinting: true,
            antialias: true,
            prefer_color: false,
        }
    }

    /// Pixel size the face is scaled to: `size * dpi / 72`.
    pub fn pixel_size(&self) -> f32 {
        self.size * self.dpi as f32 / 72.0
    }
}

/// One font face. `F` is the engine's native face type.
///
/// Created unloaded; `load` opens the file (once) and derives metrics,
/// `unload` drops the native face but keeps the source for a later reload.
#[derive(Debug)]
pub struct FaceHandle<F> {
    source: FaceSource,
    face: Option<F>,
    pixel_size: f32,
    line_height_pixels: u16,
    glyph_width_pixels: u16,
    output_type: OutputType,
    rgb_flip: bool,
    render_mode: RenderMode,
    load_flags: LoadFlags,
}

impl<F> FaceHandle<F> {
    pub fn new(source: FaceSource) -> Self {
        Self {
            source,
            face: None,
            pixel_size: 0.0,
            line_height_pixels: 0,
            glyph_width_pixels: 0,
            output_type: OutputType::default(),
            rgb_flip: false,
            render_mode: RenderMode::default(),
            load_flags: LoadFlags::empty(),
        }
    }

    /// Open (if needed) and size the face for `params`.
    ///
    /// On failure the handle is left unloaded.
    pub fn load<E>(&mut self, engine: &mut E, params: &LoadParams) -> Result<(), FontError>
    where
        E: FontEngine<Face = F>,
    {
        let face = match self.face.take() {
            Some(face) => face,
            None => engine.open_face(&self.source.path, self.source.index)?,
        };

        let pixel_size = params.pixel_size();
        let metrics = engine.face_metrics(&face, pixel_size)?;

        let mut render_mode = RenderMode::for_output(params.output_type, params.antialias);
        let mut load_flags = LoadFlags::empty();
        if !params.hinting {
            load_flags |= LoadFlags::NO_HINTING;
        }
        if render_mode == RenderMode::Mono {
            load_flags |= LoadFlags::MONOCHROME;
        }
        let wants_color = params.output_type == OutputType::Color || params.prefer_color;
        if wants_color && render_mode != RenderMode::None {
            if engine.has_color_glyphs(&face) {
                load_flags |= LoadFlags::COLOR;
            } else {
                log::debug!(
                    "{:?} has no color glyphs, rendering coverage masks",
                    self.source.path
                );
            }
        }
        if render_mode != RenderMode::None && !engine.supports_render_mode(&face, render_mode) {
            let degraded = FontError::UnsupportedRenderMode {
                path: self.source.path.clone(),
                requested: render_mode,
            };
            log::warn!("{}", degraded);
            render_mode = RenderMode::Normal;
        }

        if params.warn_not_fixed && !(metrics.is_monospace && metrics.uniform_advance) {
            log::warn!(
                "Font {:?} is not monospaced, glyphs may not fit the cell grid",
                self.source.path
            );
        }

        self.pixel_size = pixel_size;
        self.line_height_pixels = to_pixels(metrics.ascent + metrics.descent);
        self.glyph_width_pixels = to_pixels(metrics.advance);
        self.output_type = params.output_type;
        self.rgb_flip = params.output_type.rgb_flip();
        self.render_mode = render_mode;
        self.load_flags = load_flags;
        self.face = Some(face);

        log::debug!(
            "Loaded {:?} at {:.1}px: cell {}x{}, {:?}",
            self.source.path,
            pixel_size,
            self.glyph_width_pixels,
            self.line_height_pixels,
            render_mode
        );
        Ok(())
    }

    /// Release the native face. The source is kept for reloading.
    pub fn unload(&mut self) {
        if self.face.take().is_some() {
            log::trace!("Unloaded {:?}", self.source.path);
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.face.is_some()
    }

    /// The native face, while loaded.
    pub fn face(&self) -> Option<&F> {
        self.face.as_ref()
    }

    pub fn source(&self) -> &FaceSource {
        &self.source
    }

    pub fn path(&self) -> &Path {
        &self.source.path
    }

    pub fn pixel_size(&self) -> f32 {
        self.pixel_size
    }

    pub fn line_height_pixels(&self) -> u16 {
        self.line_height_pixels
    }

    pub fn glyph_width_pixels(&self) -> u16 {
        self.glyph_width_pixels
    }

    pub fn output_type(&self) -> OutputType {
        self.output_type
    }

    pub fn rgb_flip(&self) -> bool {
        self.rgb_flip
    }

    pub fn render_mode(&self) -> RenderMode {
        self.render_mode
    }

    pub fn load_flags(&self) -> LoadFlags {
        self.load_flags
    }
}

/// Round a metric up to whole device pixels (at least one).
fn to_pixels(value: f32) -> u16 {
    value.ceil().clamp(1.0, u16::MAX as f32) as u16
}
