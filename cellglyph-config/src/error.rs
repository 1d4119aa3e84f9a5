//! Typed error variants for the cellglyph-config crate.
//!
//! `FontSettings::load` and `FontSettings::save` return `anyhow::Result`;
//! the underlying `ConfigError` can be recovered with `downcast_ref` by
//! callers that want to match on the failure mode.
//!
//! # Example
//!
//! ```rust,no_run
//! use cellglyph_config::ConfigError;
//!
//! fn check_load_err(e: &anyhow::Error) {
//!     if let Some(cfg_err) = e.downcast_ref::<ConfigError>() {
//!         match cfg_err {
//!             ConfigError::Io(io) => eprintln!("I/O error: {io}"),
//!             ConfigError::Parse(p) => eprintln!("YAML parse error: {p}"),
//!             ConfigError::Validation(msg) => eprintln!("Validation: {msg}"),
//!         }
//!     }
//! }
//! ```

use std::fmt;

/// Errors that can occur when loading, saving, or validating font settings.
#[derive(Debug)]
pub enum ConfigError {
    /// An I/O error occurred reading or writing the settings file.
    Io(std::io::Error),

    /// The settings file contained YAML that could not be parsed.
    Parse(serde_yaml_ng::Error),

    /// A field value failed semantic validation.
    ///
    /// The inner string names the field and the reason.
    Validation(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "I/O error reading font settings: {e}"),
            ConfigError::Parse(e) => write!(f, "YAML parse error in font settings: {e}"),
            ConfigError::Validation(msg) => write!(f, "Font settings validation error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Validation(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_yaml_ng::Error> for ConfigError {
    fn from(e: serde_yaml_ng::Error) -> Self {
        ConfigError::Parse(e)
    }
}
