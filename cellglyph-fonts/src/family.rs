//! A styled family: regular face plus optional bold/italic/bold-italic
//! variants, and the codepoint range the family answers for.

use cellglyph_config::{CodepointRange, OutputType};

use crate::engine::FontEngine;
use crate::error::FontError;
use crate::face::{FaceHandle, LoadParams};
use crate::types::{FaceSource, FontStyle};

#[derive(Debug)]
pub struct StyledFamily<F> {
    regular: FaceHandle<F>,
    bold: Option<FaceHandle<F>>,
    italic: Option<FaceHandle<F>>,
    bold_italic: Option<FaceHandle<F>>,
    range: CodepointRange,
    output_type: OutputType,
}

impl<F> StyledFamily<F> {
    /// A family with only a regular face.
    pub fn new(regular: FaceSource, range: CodepointRange) -> Self {
        Self {
            regular: FaceHandle::new(regular),
            bold: None,
            italic: None,
            bold_italic: None,
            range,
            output_type: OutputType::default(),
        }
    }

    pub fn with_variant(mut self, style: FontStyle, source: FaceSource) -> Self {
        let handle = FaceHandle::new(source);
        match style {
            FontStyle::Regular => self.regular = handle,
            FontStyle::Bold => self.bold = Some(handle),
            FontStyle::Italic => self.italic = Some(handle),
            FontStyle::BoldItalic => self.bold_italic = Some(handle),
        }
        self
    }

    pub fn range(&self) -> CodepointRange {
        self.range
    }

    pub fn is_wildcard(&self) -> bool {
        self.range.is_wildcard()
    }

    /// Whether this family claims `codepoint` (wildcards claim everything).
    pub fn covers(&self, codepoint: u32) -> bool {
        self.range.contains(codepoint)
    }

    pub fn output_type(&self) -> OutputType {
        self.output_type
    }

    pub fn is_loaded(&self) -> bool {
        self.regular.is_loaded()
    }

    pub fn regular(&self) -> &FaceHandle<F> {
        &self.regular
    }

    /// The face for `style` and the style it actually has.
    ///
    /// Absent or unloaded variants resolve to the regular face.
    pub fn resolve(&self, style: FontStyle) -> (&FaceHandle<F>, FontStyle) {
        match self.variant(style) {
            Some(face) if face.is_loaded() => (face, style),
            _ => (&self.regular, FontStyle::Regular),
        }
    }

    fn variant(&self, style: FontStyle) -> Option<&FaceHandle<F>> {
        match style {
            FontStyle::Regular => Some(&self.regular),
            FontStyle::Bold => self.bold.as_ref(),
            FontStyle::Italic => self.italic.as_ref(),
            FontStyle::BoldItalic => self.bold_italic.as_ref(),
        }
    }

    /// Load every present face. Only a regular-face failure is an error;
    /// variant failures are logged and the variant resolves to regular.
    pub fn load<E>(&mut self, engine: &mut E, params: &LoadParams) -> Result<(), FontError>
    where
        E: FontEngine<Face = F>,
    {
        self.regular.load(engine, params)?;
        self.output_type = params.output_type;

        let variants = [
            (FontStyle::Bold, &mut self.bold),
            (FontStyle::Italic, &mut self.italic),
            (FontStyle::BoldItalic, &mut self.bold_italic),
        ];
        for (style, slot) in variants {
            if let Some(face) = slot
                && let Err(e) = face.load(engine, params)
            {
                log::warn!("Failed to load {} variant, using regular: {}", style, e);
            }
        }
        Ok(())
    }

    pub fn unload(&mut self) {
        self.regular.unload();
        for face in [&mut self.bold, &mut self.italic, &mut self.bold_italic]
            .into_iter()
            .flatten()
        {
            face.unload();
        }
    }

    /// Loaded faces, regular first.
    pub fn loaded_faces(&self) -> impl Iterator<Item = &FaceHandle<F>> {
        std::iter::once(&self.regular)
            .chain(self.bold.iter())
            .chain(self.italic.iter())
            .chain(self.bold_italic.iter())
            .filter(|face| face.is_loaded())
    }
}
