//! Font configuration types: output pixel formats, codepoint ranges, and
//! per-family face entries.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Output Types
// ============================================================================

/// Pixel layout the renderer's glyph texture pipeline expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OutputType {
    /// Metrics only, no pixel data is produced
    GeometryOnly,
    /// One 8-bit coverage byte per pixel (default)
    #[default]
    Grayscale,
    /// Three coverage bytes per pixel, horizontal subpixels in R, G, B order
    RgbHorizontal,
    /// Three coverage bytes per pixel, horizontal subpixels in B, G, R order
    BgrHorizontal,
    /// Three coverage bytes per pixel, vertical subpixels in R, G, B order
    RgbVertical,
    /// Three coverage bytes per pixel, vertical subpixels in B, G, R order
    BgrVertical,
    /// Four bytes per pixel, straight-alpha RGBA (emoji and pictographs)
    Color,
}

impl OutputType {
    /// Bytes per output pixel (0 for geometry-only).
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            OutputType::GeometryOnly => 0,
            OutputType::Grayscale => 1,
            OutputType::RgbHorizontal
            | OutputType::BgrHorizontal
            | OutputType::RgbVertical
            | OutputType::BgrVertical => 3,
            OutputType::Color => 4,
        }
    }

    /// Whether this is one of the four LCD subpixel layouts.
    pub fn is_subpixel(self) -> bool {
        self.bytes_per_pixel() == 3
    }

    /// Whether subpixels are stacked vertically.
    pub fn is_vertical(self) -> bool {
        matches!(self, OutputType::RgbVertical | OutputType::BgrVertical)
    }

    /// Whether the channel order must be flipped from the rasterizer's RGB.
    pub fn rgb_flip(self) -> bool {
        matches!(self, OutputType::BgrHorizontal | OutputType::BgrVertical)
    }

    /// Configuration name (the same string serde uses)
    pub fn name(self) -> &'static str {
        match self {
            OutputType::GeometryOnly => "geometry_only",
            OutputType::Grayscale => "grayscale",
            OutputType::RgbHorizontal => "rgb_horizontal",
            OutputType::BgrHorizontal => "bgr_horizontal",
            OutputType::RgbVertical => "rgb_vertical",
            OutputType::BgrVertical => "bgr_vertical",
            OutputType::Color => "color",
        }
    }

    /// All output types, in declaration order
    pub fn all() -> &'static [OutputType] {
        &[
            OutputType::GeometryOnly,
            OutputType::Grayscale,
            OutputType::RgbHorizontal,
            OutputType::BgrHorizontal,
            OutputType::RgbVertical,
            OutputType::BgrVertical,
            OutputType::Color,
        ]
    }
}

impl fmt::Display for OutputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        OutputType::all()
            .iter()
            .copied()
            .find(|t| t.name() == normalized)
            .ok_or_else(|| {
                let names: Vec<&str> = OutputType::all().iter().map(|t| t.name()).collect();
                format!("unknown output type '{s}' (expected one of: {})", names.join(", "))
            })
    }
}

// ============================================================================
// Codepoint Ranges
// ============================================================================

/// Inclusive codepoint range a family claims responsibility for.
///
/// `[0, 0]` is the wildcard: the family covers every codepoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CodepointRange {
    /// Start of range (inclusive), e.g. 0x4E00 for CJK
    #[serde(deserialize_with = "deserialize_codepoint")]
    pub start: u32,
    /// End of range (inclusive), e.g. 0x9FFF for CJK
    #[serde(deserialize_with = "deserialize_codepoint")]
    pub end: u32,
}

impl CodepointRange {
    /// The `[0, 0]` range covering every codepoint.
    pub const WILDCARD: CodepointRange = CodepointRange { start: 0, end: 0 };

    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn is_wildcard(&self) -> bool {
        self.start == 0 && self.end == 0
    }

    /// True when the wildcard, or when `start <= codepoint <= end`.
    pub fn contains(&self, codepoint: u32) -> bool {
        self.is_wildcard() || (self.start..=self.end).contains(&codepoint)
    }
}

impl fmt::Display for CodepointRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_wildcard() {
            f.write_str("*")
        } else {
            write!(f, "U+{:04X}-U+{:04X}", self.start, self.end)
        }
    }
}

/// Parse a codepoint written as `U+4E00`, `0x4E00`, or plain decimal.
pub fn parse_codepoint(text: &str) -> Option<u32> {
    let text = text.trim();
    let hex = text
        .strip_prefix("U+")
        .or_else(|| text.strip_prefix("u+"))
        .or_else(|| text.strip_prefix("0x"))
        .or_else(|| text.strip_prefix("0X"));
    match hex {
        Some(digits) => u32::from_str_radix(digits, 16).ok(),
        None => text.parse().ok(),
    }
}

/// Accepts either an integer or one of the string forms `parse_codepoint` understands.
fn deserialize_codepoint<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IntOrText {
        Int(u32),
        Text(String),
    }

    match IntOrText::deserialize(deserializer)? {
        IntOrText::Int(value) => Ok(value),
        IntOrText::Text(text) => parse_codepoint(&text)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid codepoint '{text}'"))),
    }
}

// ============================================================================
// Families
// ============================================================================

/// One logical family: up to four faces sharing a codepoint range.
///
/// Each entry is either a font file path or a family name to look up in the
/// system font database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyConfig {
    /// Regular face (mandatory)
    pub regular: String,
    /// Bold face (optional, falls back to regular)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<String>,
    /// Italic face (optional, falls back to regular)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub italic: Option<String>,
    /// Bold italic face (optional, falls back to regular)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold_italic: Option<String>,
    /// Codepoints this family claims; absent means the wildcard
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<CodepointRange>,
}

impl FamilyConfig {
    /// A wildcard family with only a regular face.
    pub fn new(regular: impl Into<String>) -> Self {
        Self {
            regular: regular.into(),
            bold: None,
            italic: None,
            bold_italic: None,
            range: None,
        }
    }

    pub fn with_bold(mut self, bold: impl Into<String>) -> Self {
        self.bold = Some(bold.into());
        self
    }

    pub fn with_italic(mut self, italic: impl Into<String>) -> Self {
        self.italic = Some(italic.into());
        self
    }

    pub fn with_bold_italic(mut self, bold_italic: impl Into<String>) -> Self {
        self.bold_italic = Some(bold_italic.into());
        self
    }

    pub fn with_range(mut self, start: u32, end: u32) -> Self {
        self.range = Some(CodepointRange::new(start, end));
        self
    }

    /// The configured range, or the wildcard when none is set.
    pub fn effective_range(&self) -> CodepointRange {
        self.range.unwrap_or(CodepointRange::WILDCARD)
    }
}
