//! The font registry: primary families, symbol faces and color faces, the
//! native engine, and the scratch buffers glyphs are produced into.
//!
//! Lifecycle:
//! - `load_fonts` resolves the configured entries into the three tiers and
//!   loads every face at the configured size and DPI.
//! - `reload_fonts` reloads the same tiers at a new size or DPI.
//! - `destroy` releases every face and the engine; further requests fail
//!   with `FontError::Destroyed`.
//!
//! Glyph requests (`load_glyph`, `load_and_render_glyph` and their ASCII
//! variants) return a `GlyphOutput` borrowing the registry, valid until
//! the next request.

mod output;
mod search;

use cellglyph_config::FontSettings;

use crate::convert::BitmapConverter;
use crate::engine::{FontEngine, RasterImage, SwashEngine};
use crate::error::FontError;
use crate::face::{FaceHandle, LoadParams};
use crate::family::StyledFamily;
use crate::locator::{DEFAULT_COLOR_FAMILIES, DEFAULT_SYMBOL_FAMILIES, FontLocator};
use crate::types::{CellSize, FontStyle, RenderMode};

pub use output::{GlyphInfo, GlyphOutput, OwnedGlyph};
pub use search::{Resolved, Tier};

pub struct FamilyRegistry<E: FontEngine = SwashEngine> {
    /// `None` once destroyed
    engine: Option<E>,
    settings: FontSettings,
    locator: FontLocator,

    // Fallback tiers, in search order
    primaries: Vec<StyledFamily<E::Face>>,
    symbol_faces: Vec<FaceHandle<E::Face>>,
    color_faces: Vec<FaceHandle<E::Face>>,
    /// Index of the family serving ASCII
    default_family: Option<usize>,

    loaded: bool,
    cell: CellSize,

    // Glyph output
    converter: BitmapConverter,
    raster: RasterImage,
    conversion_buffer: Vec<u8>,
}

impl FamilyRegistry<SwashEngine> {
    /// A registry rasterizing with swash. Call `load_fonts` before use.
    pub fn new(settings: FontSettings) -> Self {
        Self::with_engine(SwashEngine::new(), settings)
    }
}

impl<E: FontEngine> FamilyRegistry<E> {
    pub fn with_engine(engine: E, settings: FontSettings) -> Self {
        Self {
            engine: Some(engine),
            converter: BitmapConverter::new(settings.row_alignment),
            settings,
            locator: FontLocator::new(),
            primaries: Vec::new(),
            symbol_faces: Vec::new(),
            color_faces: Vec::new(),
            default_family: None,
            loaded: false,
            cell: CellSize::default(),
            raster: RasterImage::empty(0, 0),
            conversion_buffer: Vec::new(),
        }
    }

    /// Resolve family names with `locator` instead of the system database.
    pub fn with_locator(mut self, locator: FontLocator) -> Self {
        self.locator = locator;
        self
    }

    pub fn settings(&self) -> &FontSettings {
        &self.settings
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_destroyed(&self) -> bool {
        self.engine.is_none()
    }

    /// The native engine, until the registry is destroyed.
    pub fn engine(&self) -> Option<&E> {
        self.engine.as_ref()
    }

    /// Cell size shared by every glyph; zero while unloaded.
    pub fn cell_size(&self) -> CellSize {
        self.cell
    }

    /// Pixel size (width, height) of a `rows` x `cols` grid of cells,
    /// saturating at `u32::MAX`.
    pub fn pixels_for(&self, rows: u32, cols: u32) -> (u32, u32) {
        let width = cols.saturating_mul(self.cell.width as u32);
        (width, rows.saturating_mul(self.cell.height as u32))
    }

    pub fn primaries(&self) -> &[StyledFamily<E::Face>] {
        &self.primaries
    }

    pub fn symbol_faces(&self) -> &[FaceHandle<E::Face>] {
        &self.symbol_faces
    }

    pub fn color_faces(&self) -> &[FaceHandle<E::Face>] {
        &self.color_faces
    }

    /// Index of the primary family that serves ASCII.
    pub fn default_family(&self) -> Option<usize> {
        self.default_family
    }

    /// The engine, if glyph requests can be served.
    fn ready(&self) -> Result<&E, FontError> {
        let engine = self.engine.as_ref().ok_or(FontError::Destroyed)?;
        if !self.loaded {
            return Err(FontError::NotLoaded);
        }
        Ok(engine)
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Build the fallback tiers from the settings and load them.
    ///
    /// Fails with `NoBaseFont` when the default family's regular face is
    /// missing or cannot be loaded. Any other face that fails is skipped.
    pub fn load_fonts(&mut self) -> Result<CellSize, FontError> {
        if self.engine.is_none() {
            return Err(FontError::Destroyed);
        }
        self.unload_all();
        self.build_tiers()?;
        self.load_tiers().inspect_err(|_| self.unload_all())
    }

    /// Reload every face at a new size and DPI, keeping the tiers.
    ///
    /// If the new size cannot be loaded, the previous size and DPI are
    /// restored and the error is returned.
    pub fn reload_fonts(&mut self, size: f32, dpi: u32) -> Result<CellSize, FontError> {
        if self.engine.is_none() {
            return Err(FontError::Destroyed);
        }
        if self.default_family.is_none() {
            return Err(FontError::NotLoaded);
        }

        let previous = (self.settings.size, self.settings.dpi);
        self.unload_all();
        self.settings.size = size;
        self.settings.dpi = dpi;

        match self.load_tiers() {
            Ok(cell) => {
                log::info!("Reloaded fonts at {}pt, {} dpi", size, dpi);
                Ok(cell)
            }
            Err(e) => {
                log::warn!(
                    "Reloading fonts at {}pt, {} dpi failed ({}), restoring {}pt, {} dpi",
                    size,
                    dpi,
                    e,
                    previous.0,
                    previous.1
                );
                self.unload_all();
                (self.settings.size, self.settings.dpi) = previous;
                if let Err(restore) = self.load_tiers() {
                    log::error!("Failed to restore previous fonts: {}", restore);
                    self.unload_all();
                }
                Err(e)
            }
        }
    }

    /// Release every face, the engine and the scratch buffers.
    pub fn destroy(&mut self) {
        if self.engine.is_none() {
            return;
        }
        self.unload_all();
        self.primaries.clear();
        self.symbol_faces.clear();
        self.color_faces.clear();
        self.default_family = None;
        self.raster = RasterImage::empty(0, 0);
        self.conversion_buffer = Vec::new();
        self.engine = None;
        log::info!("Font registry destroyed");
    }

    /// Resolve the configured entries into the three tiers (nothing is
    /// loaded yet).
    fn build_tiers(&mut self) -> Result<(), FontError> {
        self.default_family = None;
        self.primaries.clear();
        self.symbol_faces.clear();
        self.color_faces.clear();

        let settings = &self.settings;
        let default_config = settings
            .families
            .iter()
            .position(|config| config.effective_range().is_wildcard())
            .unwrap_or(0);

        let mut primaries = Vec::with_capacity(settings.families.len());
        let mut default_family = None;
        for (index, config) in settings.families.iter().enumerate() {
            match self.locator.family(config) {
                Some(family) => {
                    if index == default_config {
                        default_family = Some(primaries.len());
                    }
                    primaries.push(family);
                }
                None if index == default_config => {
                    return Err(FontError::NoBaseFont {
                        source: Box::new(FontError::open_failure(
                            &config.regular,
                            "font not found",
                        )),
                    });
                }
                None => {}
            }
        }
        let Some(default_family) = default_family else {
            return Err(FontError::NoBaseFont {
                source: Box::new(FontError::open_failure("", "no font families configured")),
            });
        };

        let symbol_builtin = settings.system_fallbacks.then_some(DEFAULT_SYMBOL_FAMILIES);
        let color_builtin = settings.system_fallbacks.then_some(DEFAULT_COLOR_FAMILIES);
        let symbol_faces = self.locator.faces(&settings.symbol_fonts, symbol_builtin);
        let color_faces = self.locator.faces(&settings.color_fonts, color_builtin);

        self.primaries = primaries;
        self.default_family = Some(default_family);
        self.symbol_faces = symbol_faces.into_iter().map(FaceHandle::new).collect();
        self.color_faces = color_faces.into_iter().map(FaceHandle::new).collect();
        Ok(())
    }

    /// Load every face of every tier at the current settings and derive
    /// the cell size.
    fn load_tiers(&mut self) -> Result<CellSize, FontError> {
        let engine = self.engine.as_mut().ok_or(FontError::Destroyed)?;
        let default_family = self.default_family.ok_or(FontError::NotLoaded)?;
        let settings = &self.settings;

        let params = LoadParams {
            size: settings.size,
            dpi: settings.dpi,
            output_type: settings.output,
            warn_not_fixed: settings.warn_not_fixed,
            hinting: settings.hinting,
            antialias: settings.antialias,
            prefer_color: false,
        };
        for (index, family) in self.primaries.iter_mut().enumerate() {
            if let Err(e) = family.load(engine, &params) {
                if index == default_family {
                    return Err(FontError::NoBaseFont { source: Box::new(e) });
                }
                log::warn!("Skipping font family #{}: {}", index, e);
            }
        }

        let fallback_params = LoadParams {
            warn_not_fixed: false,
            ..params
        };
        for face in &mut self.symbol_faces {
            if let Err(e) = face.load(engine, &fallback_params) {
                log::warn!("Skipping symbol font: {}", e);
            }
        }
        let color_params = LoadParams {
            prefer_color: true,
            ..fallback_params
        };
        for face in &mut self.color_faces {
            if let Err(e) = face.load(engine, &color_params) {
                log::warn!("Skipping color font: {}", e);
            }
        }

        let cell = self
            .primaries
            .iter()
            .filter(|family| family.is_loaded())
            .map(StyledFamily::regular)
            .fold(CellSize::default(), |cell, face| CellSize {
                width: cell.width.max(face.glyph_width_pixels()),
                height: cell.height.max(face.line_height_pixels()),
            });
        self.cell = cell;
        self.loaded = true;

        log::info!(
            "Loaded {} font families, {} symbol and {} color faces at {:.1}px; cell {}x{}",
            self.primaries.iter().filter(|family| family.is_loaded()).count(),
            self.symbol_faces.iter().filter(|face| face.is_loaded()).count(),
            self.color_faces.iter().filter(|face| face.is_loaded()).count(),
            params.pixel_size(),
            cell.width,
            cell.height
        );
        Ok(cell)
    }

    fn unload_all(&mut self) {
        for family in &mut self.primaries {
            family.unload();
        }
        for face in self.symbol_faces.iter_mut().chain(self.color_faces.iter_mut()) {
            face.unload();
        }
        self.loaded = false;
        self.cell = CellSize::default();
    }

    // ========================================================================
    // Glyphs
    // ========================================================================

    /// Glyph placement for `ch` without rasterizing it.
    pub fn load_glyph(&mut self, ch: char, style: FontStyle) -> Result<GlyphOutput<'_>, FontError> {
        let resolved = self.resolve(ch, style)?;
        self.produce(resolved, false)
    }

    /// Glyph placement for an ASCII code, served by the default family.
    pub fn load_ascii_glyph(
        &mut self,
        code: u8,
        style: FontStyle,
    ) -> Result<GlyphOutput<'_>, FontError> {
        let resolved = self.resolve_ascii(code, style)?;
        self.produce(resolved, false)
    }

    /// Rasterize `ch` in the configured output type.
    ///
    /// When the bitmap cannot be converted to the output type, the result
    /// carries geometry only.
    pub fn load_and_render_glyph(
        &mut self,
        ch: char,
        style: FontStyle,
    ) -> Result<GlyphOutput<'_>, FontError> {
        let resolved = self.resolve(ch, style)?;
        self.produce(resolved, true)
    }

    /// Rasterize an ASCII code from the default family.
    pub fn load_and_render_ascii_glyph(
        &mut self,
        code: u8,
        style: FontStyle,
    ) -> Result<GlyphOutput<'_>, FontError> {
        let resolved = self.resolve_ascii(code, style)?;
        self.produce(resolved, true)
    }

    fn produce(&mut self, resolved: Resolved, render: bool) -> Result<GlyphOutput<'_>, FontError> {
        let engine = self.engine.as_mut().ok_or(FontError::Destroyed)?;
        let handle = search::face_in(
            &self.primaries,
            &self.symbol_faces,
            &self.color_faces,
            &resolved,
        )
        .ok_or(FontError::NotLoaded)?;
        let face = handle.face().ok_or(FontError::NotLoaded)?;

        let mut info = GlyphInfo {
            codepoint: resolved.codepoint,
            glyph_id: resolved.glyph_id,
            tier: resolved.tier,
            style: resolved.style,
            width: 0,
            height: 0,
            left: 0,
            top: 0,
            pitch: 0,
            row_alignment: self.converter.alignment(),
            pixel_type: handle.output_type(),
            rgb_flip: handle.rgb_flip(),
        };

        if !render || handle.render_mode() == RenderMode::None {
            let metrics = engine.load_glyph(
                face,
                handle.pixel_size(),
                resolved.glyph_id,
                handle.load_flags(),
            )?;
            info.width = metrics.width;
            info.height = metrics.height;
            info.left = metrics.left;
            info.top = metrics.top;
            return Ok(GlyphOutput::geometry(info));
        }

        self.raster = engine.render_glyph(
            face,
            handle.pixel_size(),
            resolved.glyph_id,
            handle.render_mode(),
            handle.load_flags(),
        )?;
        info.width = self.raster.width;
        info.height = self.raster.height;
        info.left = self.raster.left;
        info.top = self.raster.top;
        log::trace!(
            "Rendered U+{:04X} (glyph {}) from {}: {}x{} {:?}",
            resolved.codepoint,
            resolved.glyph_id,
            resolved.tier,
            info.width,
            info.height,
            self.raster.layout
        );

        let target = info.pixel_type;
        if self.converter.is_passthrough(&self.raster, target, info.rgb_flip) {
            info.pitch = self.raster.pitch;
            return Ok(GlyphOutput::new(info, &self.raster.data));
        }
        match self
            .converter
            .convert(&self.raster, target, info.rgb_flip, &mut self.conversion_buffer)
        {
            Ok(converted) => {
                info.pitch = converted.pitch;
                Ok(GlyphOutput::new(info, &self.conversion_buffer))
            }
            Err(e @ FontError::ConversionUnsupported { .. }) => {
                log::debug!("U+{:04X}: {}, returning geometry only", resolved.codepoint, e);
                Ok(GlyphOutput::geometry(info))
            }
            Err(e) => Err(e),
        }
    }
}
