//! Command-line front end for the cellglyph font engine.
//!
//! The engine itself lives in `cellglyph-fonts`; this crate loads the
//! settings, builds a [`FamilyRegistry`](cellglyph_fonts::FamilyRegistry)
//! and reports metrics, resolution results and glyph previews.

/// Application version (root crate version).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod preview;
