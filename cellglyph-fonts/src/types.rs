//! Small value types shared by faces, families, the converter and the registry.

use std::fmt;
use std::path::PathBuf;

use bitflags::bitflags;
use cellglyph_config::OutputType;

/// Requested (or resolved) style of a glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontStyle {
    #[default]
    Regular,
    Bold,
    Italic,
    BoldItalic,
}

impl FontStyle {
    /// Map the grid's bold/italic attributes to a style.
    pub fn from_attributes(bold: bool, italic: bool) -> Self {
        match (bold, italic) {
            (true, true) => FontStyle::BoldItalic,
            (true, false) => FontStyle::Bold,
            (false, true) => FontStyle::Italic,
            (false, false) => FontStyle::Regular,
        }
    }

    pub fn is_bold(self) -> bool {
        matches!(self, FontStyle::Bold | FontStyle::BoldItalic)
    }

    pub fn is_italic(self) -> bool {
        matches!(self, FontStyle::Italic | FontStyle::BoldItalic)
    }

    pub fn name(self) -> &'static str {
        match self {
            FontStyle::Regular => "regular",
            FontStyle::Bold => "bold",
            FontStyle::Italic => "italic",
            FontStyle::BoldItalic => "bold italic",
        }
    }
}

impl fmt::Display for FontStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How the native engine is asked to rasterize a face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RenderMode {
    /// No rasterization, metrics only
    None,
    /// 8-bit anti-aliased coverage
    #[default]
    Normal,
    /// 1-bit coverage (anti-aliasing disabled)
    Mono,
    /// Horizontal LCD subpixel coverage
    Lcd,
    /// Vertical LCD subpixel coverage
    LcdV,
}

impl RenderMode {
    /// Render mode that produces `output` most directly.
    ///
    /// Color output renders in `Normal` mode; the color sources are selected
    /// by `LoadFlags::COLOR`.
    pub fn for_output(output: OutputType, antialias: bool) -> Self {
        match output {
            OutputType::GeometryOnly => RenderMode::None,
            _ if !antialias => RenderMode::Mono,
            OutputType::Grayscale | OutputType::Color => RenderMode::Normal,
            OutputType::RgbHorizontal | OutputType::BgrHorizontal => RenderMode::Lcd,
            OutputType::RgbVertical | OutputType::BgrVertical => RenderMode::LcdV,
        }
    }
}

bitflags! {
    /// Flags passed to the engine when loading or rendering a glyph.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct LoadFlags: u32 {
        /// Prefer color bitmaps and color outlines when the face has them
        const COLOR = 1 << 0;
        /// Disable hinting
        const NO_HINTING = 1 << 1;
        /// Rasterize as a 1-bit mask
        const MONOCHROME = 1 << 2;
    }
}

/// Pixel layout of a bitmap produced by the native rasterizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RasterLayout {
    /// 1 bit per pixel, most significant bit first
    Mono,
    /// 1 coverage byte per pixel
    Gray,
    /// R, G, B coverage bytes per pixel
    SubpixelHorizontal,
    /// Three rows (R, G, B) per pixel row
    SubpixelVertical,
    /// Straight-alpha RGBA
    Rgba,
    /// Straight-alpha BGRA
    Bgra,
}

/// Location of one face on disk: the file and the face index inside a
/// collection (0 for single-face files).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FaceSource {
    pub path: PathBuf,
    pub index: u32,
}

impl FaceSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            index: 0,
        }
    }

    pub fn with_index(path: impl Into<PathBuf>, index: u32) -> Self {
        Self {
            path: path.into(),
            index,
        }
    }
}

/// Fixed cell size shared by every glyph the registry produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellSize {
    pub width: u16,
    pub height: u16,
}
