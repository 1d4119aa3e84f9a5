//! The `FontSettings` aggregate: everything the font registry needs to build
//! its fallback tiers, plus YAML persistence and validation.

use crate::error::ConfigError;
use crate::types::{FamilyConfig, OutputType};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Font configuration consumed by the font registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSettings {
    // --- Tiers ---
    /// Primary families in search order. The first wildcard family (no range)
    /// is the default family that serves ASCII.
    #[serde(default = "crate::defaults::families")]
    pub families: Vec<FamilyConfig>,

    /// Symbol fonts searched, in order, when no primary family covers a codepoint
    #[serde(default)]
    pub symbol_fonts: Vec<String>,

    /// Color (emoji) fonts searched last
    #[serde(default)]
    pub color_fonts: Vec<String>,

    /// Append the built-in symbol and emoji fallback families after the configured ones
    #[serde(default = "crate::defaults::bool_true")]
    pub system_fallbacks: bool,

    // --- Size ---
    /// Font size in points
    #[serde(default = "crate::defaults::font_size")]
    pub size: f32,

    /// Display resolution in dots per inch
    #[serde(default = "crate::defaults::dpi")]
    pub dpi: u32,

    // --- Rasterization ---
    /// Pixel layout of every rendered glyph
    #[serde(default = "crate::defaults::output")]
    pub output: OutputType,

    /// Enable hinting (aligns outlines to the pixel grid at small sizes)
    #[serde(default = "crate::defaults::bool_true")]
    pub hinting: bool,

    /// Enable anti-aliasing. When false, glyphs are rasterized as 1-bit masks.
    #[serde(default = "crate::defaults::bool_true")]
    pub antialias: bool,

    /// Row byte alignment of produced bitmaps (1, 2, 4 or 8)
    #[serde(default = "crate::defaults::row_alignment")]
    pub row_alignment: u8,

    /// Warn when a primary face is not monospaced
    #[serde(default = "crate::defaults::bool_true")]
    pub warn_not_fixed: bool,
}

impl Default for FontSettings {
    fn default() -> Self {
        Self {
            families: crate::defaults::families(),
            symbol_fonts: Vec::new(),
            color_fonts: Vec::new(),
            system_fallbacks: true,
            size: crate::defaults::font_size(),
            dpi: crate::defaults::dpi(),
            output: crate::defaults::output(),
            hinting: true,
            antialias: true,
            row_alignment: crate::defaults::row_alignment(),
            warn_not_fixed: true,
        }
    }
}

impl FontSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Settings with a single wildcard family and no fallbacks.
    pub fn with_regular(regular: impl Into<String>) -> Self {
        Self {
            families: vec![FamilyConfig::new(regular)],
            system_fallbacks: false,
            ..Self::default()
        }
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    pub fn with_output(mut self, output: OutputType) -> Self {
        self.output = output;
        self
    }

    pub fn with_family(mut self, family: FamilyConfig) -> Self {
        self.families.push(family);
        self
    }

    pub fn with_symbol_font(mut self, font: impl Into<String>) -> Self {
        self.symbol_fonts.push(font.into());
        self
    }

    pub fn with_color_font(mut self, font: impl Into<String>) -> Self {
        self.color_fonts.push(font.into());
        self
    }

    /// Pixel size the faces are scaled to: `size * dpi / 72`.
    pub fn pixel_size(&self) -> f32 {
        self.size * self.dpi as f32 / 72.0
    }

    /// Parse settings from YAML and validate them.
    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        let settings: FontSettings =
            serde_yaml_ng::from_str(contents).map_err(ConfigError::from)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from `path`, or return the defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("Font settings {:?} not found, using defaults", path);
            return Ok(Self::default());
        }

        log::info!("Loading font settings from {:?}", path);
        let contents = fs::read_to_string(path).map_err(ConfigError::from)?;
        Self::from_yaml_str(&contents)
    }

    /// Save settings to `path`, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(ConfigError::from)?;
        }

        let yaml = serde_yaml_ng::to_string(self).map_err(ConfigError::from)?;

        // Atomic save: write to temp file then rename to prevent corruption on crash
        let temp_path = path.with_extension("yaml.tmp");
        fs::write(&temp_path, &yaml).map_err(ConfigError::from)?;
        fs::rename(&temp_path, path).map_err(ConfigError::from)?;

        log::info!("Saved font settings to {:?}", path);
        Ok(())
    }

    /// Default settings file location (`~/.config/cellglyph/fonts.yaml`).
    pub fn default_path() -> PathBuf {
        #[cfg(target_os = "windows")]
        {
            if let Some(config_dir) = dirs::config_dir() {
                config_dir.join("cellglyph").join("fonts.yaml")
            } else {
                PathBuf::from("fonts.yaml")
            }
        }
        #[cfg(not(target_os = "windows"))]
        {
            if let Some(home_dir) = dirs::home_dir() {
                home_dir.join(".config").join("cellglyph").join("fonts.yaml")
            } else {
                PathBuf::from("fonts.yaml")
            }
        }
    }

    /// Check semantic constraints serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.families.is_empty() {
            return Err(ConfigError::Validation(
                "families: at least one font family is required".to_string(),
            ));
        }
        if !(self.size > 0.0 && self.size <= 500.0) {
            return Err(ConfigError::Validation(format!(
                "size: {} is outside (0, 500]",
                self.size
            )));
        }
        if !(1..=2400).contains(&self.dpi) {
            return Err(ConfigError::Validation(format!(
                "dpi: {} is outside [1, 2400]",
                self.dpi
            )));
        }
        if !matches!(self.row_alignment, 1 | 2 | 4 | 8) {
            return Err(ConfigError::Validation(format!(
                "row_alignment: {} must be 1, 2, 4 or 8",
                self.row_alignment
            )));
        }
        for (idx, family) in self.families.iter().enumerate() {
            if family.regular.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "families[{idx}].regular must not be empty"
                )));
            }
            if let Some(range) = family.range
                && range.start > range.end
            {
                return Err(ConfigError::Validation(format!(
                    "families[{idx}].range: start U+{:04X} is after end U+{:04X}",
                    range.start, range.end
                )));
            }
        }
        Ok(())
    }
}
