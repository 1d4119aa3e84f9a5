//! Command-line interface for cellglyph.
//!
//! This module handles argument parsing and logging setup. The subcommand
//! implementations live in the [`commands`] submodule.

pub mod commands;

use anyhow::{Context, Result};
use cellglyph_config::{FontSettings, OutputType, parse_codepoint};
use cellglyph_fonts::FontStyle;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// cellglyph - font fallback resolution and glyph rasterization for terminal renderers
#[derive(Parser, Debug)]
#[command(name = "cellglyph")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Font settings file (default: ~/.config/cellglyph/fonts.yaml)
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Font size in points (overrides the settings file)
    #[arg(long, value_name = "POINTS", global = true)]
    pub size: Option<f32>,

    /// Display resolution in dots per inch (overrides the settings file)
    #[arg(long, value_name = "DPI", global = true)]
    pub dpi: Option<u32>,

    /// Pixel layout of rendered glyphs, e.g. grayscale or bgr_horizontal
    #[arg(long, value_name = "TYPE", global = true)]
    pub output: Option<OutputType>,

    /// Set log level (overrides RUST_LOG)
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevelArg>,
}

/// Log level argument for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevelArg {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevelArg {
    /// Convert to `log::LevelFilter`
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevelArg::Off => log::LevelFilter::Off,
            LogLevelArg::Error => log::LevelFilter::Error,
            LogLevelArg::Warn => log::LevelFilter::Warn,
            LogLevelArg::Info => log::LevelFilter::Info,
            LogLevelArg::Debug => log::LevelFilter::Debug,
            LogLevelArg::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Glyph style argument for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum StyleArg {
    #[default]
    Regular,
    Bold,
    Italic,
    BoldItalic,
}

impl From<StyleArg> for FontStyle {
    fn from(arg: StyleArg) -> Self {
        match arg {
            StyleArg::Regular => FontStyle::Regular,
            StyleArg::Bold => FontStyle::Bold,
            StyleArg::Italic => FontStyle::Italic,
            StyleArg::BoldItalic => FontStyle::BoldItalic,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load the fonts and print the cell size and fallback tiers
    Metrics,

    /// Show which face serves a character
    Resolve {
        /// A single character, or a codepoint such as U+E0B0
        #[arg(value_name = "CHAR", value_parser = parse_char)]
        ch: char,

        #[arg(short, long, value_enum, default_value_t = StyleArg::Regular)]
        style: StyleArg,
    },

    /// Render a character and print its bitmap as shaded text
    Render {
        /// A single character, or a codepoint such as U+E0B0
        #[arg(value_name = "CHAR", value_parser = parse_char)]
        ch: char,

        #[arg(short, long, value_enum, default_value_t = StyleArg::Regular)]
        style: StyleArg,
    },

    /// Write the default settings file
    InitConfig {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    /// Settings file the command reads or writes.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(FontSettings::default_path)
    }

    /// Load the settings file and apply the size/DPI/output overrides.
    pub fn settings(&self) -> Result<FontSettings> {
        let path = self.config_path();
        let mut settings = FontSettings::load(&path)
            .with_context(|| format!("failed to load font settings from {}", path.display()))?;

        if let Some(size) = self.size {
            settings = settings.with_size(size);
        }
        if let Some(dpi) = self.dpi {
            settings = settings.with_dpi(dpi);
        }
        if let Some(output) = self.output {
            settings = settings.with_output(output);
        }
        settings.validate().context("invalid font settings")?;
        Ok(settings)
    }
}

/// Parse a character argument: either the character itself or a codepoint
/// written as `U+XXXX`, `0xXXXX` or decimal.
pub fn parse_char(text: &str) -> Result<char, String> {
    let mut chars = text.chars();
    if let (Some(ch), None) = (chars.next(), chars.next()) {
        return Ok(ch);
    }
    let codepoint = parse_codepoint(text)
        .ok_or_else(|| format!("'{text}' is not a character or codepoint"))?;
    char::from_u32(codepoint).ok_or_else(|| format!("U+{codepoint:04X} is not a valid character"))
}

/// Initialize env_logger. `RUST_LOG` applies unless `level` overrides it.
pub fn init_logging(level: Option<LogLevelArg>) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(level) = level {
        builder.filter_level(level.to_level_filter());
    }
    let _ = builder.try_init();
}
