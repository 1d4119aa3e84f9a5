//! Font configuration for the cellglyph font-resolution engine.
//!
//! This crate describes what the font registry should load:
//!
//! - Primary families with optional bold/italic/bold-italic faces and the
//!   codepoint range each one claims
//! - Ordered symbol and color (emoji) fallback fonts
//! - Size, DPI and the pixel layout the renderer's textures expect
//!
//! Settings are stored as YAML and validated on load.

pub mod defaults;
mod error;
mod settings;
mod types;

pub use error::ConfigError;
pub use settings::FontSettings;
pub use types::{CodepointRange, FamilyConfig, OutputType, parse_codepoint};
