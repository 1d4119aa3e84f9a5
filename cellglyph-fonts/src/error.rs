//! Typed error types for cellglyph-fonts.
//!
//! Only `NoBaseFont` is fatal. Every other face failure is logged and the
//! owning tier carries on without that face.

use std::path::PathBuf;

use cellglyph_config::OutputType;
use thiserror::Error;

use crate::types::{RasterLayout, RenderMode};

#[derive(Debug, Error)]
pub enum FontError {
    // -----------------------------------------------------------------------
    // Face loading
    // -----------------------------------------------------------------------
    /// The font file could not be read or parsed, or the engine rejected the
    /// requested size. The face stays unloaded.
    #[error("Failed to open font '{}': {reason}", path.display())]
    ResourceOpenFailure {
        /// Path (or unresolved family name) of the face.
        path: PathBuf,
        /// Human-readable cause.
        reason: String,
    },

    /// The face cannot produce the requested render mode; it is rendered as
    /// grayscale instead.
    #[error("Render mode {requested:?} is not supported by '{}', using grayscale", path.display())]
    UnsupportedRenderMode {
        /// Path of the face.
        path: PathBuf,
        /// The mode that was asked for.
        requested: RenderMode,
    },

    /// The regular face of the default family could not be loaded. Nothing
    /// can be rendered without it.
    #[error("No usable base font: {source}")]
    NoBaseFont {
        #[source]
        source: Box<FontError>,
    },

    // -----------------------------------------------------------------------
    // Glyph path
    // -----------------------------------------------------------------------
    /// No face in any fallback tier maps the codepoint.
    #[error("No font provides U+{codepoint:04X}")]
    GlyphNotFound { codepoint: u32 },

    /// The rasterizer returned nothing usable for a glyph.
    #[error("Rasterization of glyph {glyph_id} failed: {reason}")]
    RasterizationFailed { glyph_id: u16, reason: String },

    /// The converter cannot derive the target layout from the source bitmap.
    #[error("Cannot convert a {from:?} bitmap to {to}")]
    ConversionUnsupported { from: RasterLayout, to: OutputType },

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------
    /// A glyph was requested before `load_fonts`, or from an unloaded face.
    #[error("Fonts are not loaded")]
    NotLoaded,

    /// The registry was destroyed; it accepts no further requests.
    #[error("Font registry has been destroyed")]
    Destroyed,
}

impl FontError {
    pub(crate) fn open_failure(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        FontError::ResourceOpenFailure {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
