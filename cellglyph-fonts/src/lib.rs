//! Font resolution and glyph rasterization for a GPU terminal renderer.
//!
//! This crate provides:
//! - Styled families (regular with optional bold/italic/bold-italic faces)
//!   claiming codepoint ranges
//! - A three-tier fallback chain: primary families, symbol faces, color faces
//! - Rasterization through swash, with conversion into the pixel layout the
//!   renderer uploads (grayscale, RGB/BGR subpixel, color)
//! - System font discovery by family name via fontdb
//!
//! # Architecture
//!
//! The `FamilyRegistry` owns every face and resolves a codepoint in order:
//! 1. ASCII goes straight to the default family
//! 2. The first primary family whose range claims the codepoint
//! 3. Symbol faces
//! 4. Color (emoji) faces
//!
//! Glyph requests return a `GlyphOutput` that borrows the registry's
//! scratch buffers and is valid until the next request.

pub mod convert;
pub mod engine;
pub mod error;
pub mod face;
pub mod family;
pub mod locator;
pub mod registry;
pub mod types;

// Re-export main types for convenience
pub use convert::{BitmapConverter, ConvertedBitmap};
pub use engine::{FaceMetrics, FontEngine, GlyphMetrics, RasterImage, SwashEngine};
pub use error::FontError;
pub use face::{FaceHandle, LoadParams};
pub use family::StyledFamily;
pub use locator::FontLocator;
pub use registry::{FamilyRegistry, GlyphInfo, GlyphOutput, OwnedGlyph, Resolved, Tier};
pub use types::{CellSize, FaceSource, FontStyle, LoadFlags, RasterLayout, RenderMode};

pub use cellglyph_config::{FontSettings, OutputType};
