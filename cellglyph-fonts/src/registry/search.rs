//! Codepoint resolution across the three fallback tiers.

use std::fmt;

use crate::engine::FontEngine;
use crate::error::FontError;
use crate::face::FaceHandle;
use crate::family::StyledFamily;
use crate::types::FontStyle;

use super::FamilyRegistry;

/// Which fallback tier served a codepoint, and the position in that tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    /// Index into the primary families
    Primary(usize),
    /// Index into the symbol faces
    Symbol(usize),
    /// Index into the color faces
    Color(usize),
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Primary(i) => write!(f, "primary #{}", i),
            Tier::Symbol(i) => write!(f, "symbol #{}", i),
            Tier::Color(i) => write!(f, "color #{}", i),
        }
    }
}

/// Outcome of resolving a codepoint: the face that will render it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved {
    pub codepoint: u32,
    pub tier: Tier,
    /// Style of the face found; regular when the requested variant is absent
    pub style: FontStyle,
    /// Glyph index in that face (0 is notdef, only produced for ASCII)
    pub glyph_id: u16,
}

/// First candidate face that maps `codepoint` to a real glyph.
///
/// Every tier is searched with this one function; the tiers differ only in
/// the candidates they offer.
fn first_with_glyph<'a, E, I>(
    engine: &E,
    candidates: I,
    codepoint: u32,
) -> Option<(usize, FontStyle, u16)>
where
    E: FontEngine,
    E::Face: 'a,
    I: IntoIterator<Item = (usize, &'a FaceHandle<E::Face>, FontStyle)>,
{
    candidates.into_iter().find_map(|(index, handle, style)| {
        let face = handle.face()?;
        match engine.glyph_index(face, codepoint) {
            0 => None,
            glyph_id => Some((index, style, glyph_id)),
        }
    })
}

/// Candidates from a tier of single faces.
fn unstyled<F>(
    faces: &[FaceHandle<F>],
) -> impl Iterator<Item = (usize, &FaceHandle<F>, FontStyle)> {
    faces
        .iter()
        .enumerate()
        .map(|(index, face)| (index, face, FontStyle::Regular))
}

impl<E: FontEngine> FamilyRegistry<E> {
    /// Find the face that renders `ch` in `style`.
    ///
    /// ASCII always resolves to the default family. Anything else goes to
    /// the first primary family claiming it, then the symbol faces, then
    /// the color faces.
    pub fn resolve(&self, ch: char, style: FontStyle) -> Result<Resolved, FontError> {
        let codepoint = ch as u32;
        if codepoint < 0x80 {
            return self.resolve_ascii(codepoint as u8, style);
        }
        let engine = self.ready()?;

        let candidate = self
            .primaries
            .iter()
            .enumerate()
            .find(|(_, family)| family.is_loaded() && family.covers(codepoint))
            .map(|(index, family)| {
                let (face, resolved_style) = family.resolve(style);
                (index, face, resolved_style)
            });
        if let Some((index, style, glyph_id)) = first_with_glyph(engine, candidate, codepoint) {
            return Ok(Resolved {
                codepoint,
                tier: Tier::Primary(index),
                style,
                glyph_id,
            });
        }

        let symbols = unstyled(&self.symbol_faces);
        if let Some((index, _, glyph_id)) = first_with_glyph(engine, symbols, codepoint) {
            log::debug!("U+{:04X} served by symbol face #{}", codepoint, index);
            return Ok(Resolved {
                codepoint,
                tier: Tier::Symbol(index),
                style: FontStyle::Regular,
                glyph_id,
            });
        }

        let colors = unstyled(&self.color_faces);
        if let Some((index, _, glyph_id)) = first_with_glyph(engine, colors, codepoint) {
            log::debug!("U+{:04X} served by color face #{}", codepoint, index);
            return Ok(Resolved {
                codepoint,
                tier: Tier::Color(index),
                style: FontStyle::Regular,
                glyph_id,
            });
        }

        log::debug!("No face provides U+{:04X}", codepoint);
        Err(FontError::GlyphNotFound { codepoint })
    }

    /// Resolve an ASCII code straight to the default family.
    ///
    /// A code the default family does not map resolves to its notdef glyph.
    pub fn resolve_ascii(&self, code: u8, style: FontStyle) -> Result<Resolved, FontError> {
        let codepoint = code as u32;
        if codepoint >= 0x80 {
            return Err(FontError::GlyphNotFound { codepoint });
        }
        let engine = self.ready()?;
        let index = self.default_family.ok_or(FontError::NotLoaded)?;
        let family = self.primaries.get(index).ok_or(FontError::NotLoaded)?;
        let (face, style) = family.resolve(style);
        let native = face.face().ok_or(FontError::NotLoaded)?;
        Ok(Resolved {
            codepoint,
            tier: Tier::Primary(index),
            style,
            glyph_id: engine.glyph_index(native, codepoint),
        })
    }

    /// The face a resolution refers to.
    pub fn face_for(&self, resolved: &Resolved) -> Option<&FaceHandle<E::Face>> {
        face_in(&self.primaries, &self.symbol_faces, &self.color_faces, resolved)
    }
}

/// Look up the face behind `resolved` in the given tiers.
pub(super) fn face_in<'a, F>(
    primaries: &'a [StyledFamily<F>],
    symbol_faces: &'a [FaceHandle<F>],
    color_faces: &'a [FaceHandle<F>],
    resolved: &Resolved,
) -> Option<&'a FaceHandle<F>> {
    match resolved.tier {
        Tier::Primary(i) => primaries.get(i).map(|family| family.resolve(resolved.style).0),
        Tier::Symbol(i) => symbol_faces.get(i),
        Tier::Color(i) => color_faces.get(i),
    }
}
