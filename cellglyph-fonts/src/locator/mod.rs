//! Turns configured font entries into face sources.
//!
//! An entry is either a font file path, used as-is, or a family name looked
//! up in the system font database. The database is only scanned the first
//! time a family name needs resolving.

mod fallbacks;

use std::path::Path;

use cellglyph_config::FamilyConfig;
use fontdb::{Database, Family, Query, Source, Stretch, Style, Weight};

use crate::family::StyledFamily;
use crate::types::{FaceSource, FontStyle};

pub use fallbacks::{DEFAULT_COLOR_FAMILIES, DEFAULT_SYMBOL_FAMILIES};

const FONT_EXTENSIONS: &[&str] = &["ttf", "otf", "ttc", "otc"];

/// Whether a configured entry names a file rather than a family.
pub fn looks_like_path(entry: &str) -> bool {
    if entry.contains('/') || entry.contains(std::path::MAIN_SEPARATOR) {
        return true;
    }
    Path::new(entry)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| FONT_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
}

#[derive(Default)]
pub struct FontLocator {
    db: Option<Database>,
}

impl std::fmt::Debug for FontLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontLocator")
            .field("system_faces", &self.db.as_ref().map(Database::len))
            .finish()
    }
}

impl FontLocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `db` instead of scanning the system fonts.
    pub fn with_database(db: Database) -> Self {
        Self { db: Some(db) }
    }

    /// Whether the font database has been populated.
    pub fn is_scanned(&self) -> bool {
        self.db.is_some()
    }

    fn database(&mut self) -> &Database {
        self.db.get_or_insert_with(|| {
            let mut db = Database::new();
            db.load_system_fonts();
            log::info!("Loaded {} system fonts", db.len());
            db
        })
    }

    /// Resolve one entry for `style`.
    pub fn locate(&mut self, entry: &str, style: FontStyle) -> Option<FaceSource> {
        let entry = entry.trim();
        if entry.is_empty() {
            return None;
        }
        if looks_like_path(entry) {
            return Some(FaceSource::new(entry));
        }
        self.find_family(entry, style)
    }

    /// Query the font database for `family` in `style`.
    pub fn find_family(&mut self, family: &str, style: FontStyle) -> Option<FaceSource> {
        let db = self.database();
        let query = Query {
            families: &[Family::Name(family)],
            weight: if style.is_bold() {
                Weight::BOLD
            } else {
                Weight::NORMAL
            },
            stretch: Stretch::Normal,
            style: if style.is_italic() {
                Style::Italic
            } else {
                Style::Normal
            },
        };
        let id = db.query(&query)?;
        let info = db.face(id)?;
        match &info.source {
            Source::File(path) => Some(FaceSource::with_index(path.clone(), info.index)),
            _ => {
                log::debug!("Font family '{}' is not backed by a file, skipping", family);
                None
            }
        }
    }

    /// Build a family from its configuration.
    ///
    /// Returns `None` when the regular entry cannot be resolved. Variants
    /// that cannot be resolved, or that resolve to the regular face, are
    /// left out so they fall back to regular.
    pub fn family<F>(&mut self, config: &FamilyConfig) -> Option<StyledFamily<F>> {
        let Some(regular) = self.locate(&config.regular, FontStyle::Regular) else {
            log::warn!("Font '{}' not found", config.regular);
            return None;
        };

        let mut family = StyledFamily::new(regular.clone(), config.effective_range());
        let variants = [
            (FontStyle::Bold, config.bold.as_deref()),
            (FontStyle::Italic, config.italic.as_deref()),
            (FontStyle::BoldItalic, config.bold_italic.as_deref()),
        ];
        for (style, entry) in variants {
            let Some(entry) = entry else { continue };
            match self.locate(entry, style) {
                Some(source) if source == regular => {
                    log::debug!("'{}' has no distinct {} face, using regular", entry, style);
                }
                Some(source) => family = family.with_variant(style, source),
                None => log::warn!("{} font '{}' not found, will use regular", style, entry),
            }
        }
        Some(family)
    }

    /// Resolve an ordered list of single-face entries, followed by the
    /// built-in families when `builtin` is given. Duplicates are dropped.
    pub fn faces(&mut self, entries: &[String], builtin: Option<&[&str]>) -> Vec<FaceSource> {
        let mut sources: Vec<FaceSource> = Vec::new();
        for entry in entries {
            match self.locate(entry, FontStyle::Regular) {
                Some(source) if !sources.contains(&source) => sources.push(source),
                Some(_) => {}
                None => log::warn!("Fallback font '{}' not found, skipping", entry),
            }
        }
        for name in builtin.unwrap_or_default() {
            if let Some(source) = self.find_family(name, FontStyle::Regular)
                && !sources.contains(&source)
            {
                log::debug!("Added fallback font: {}", name);
                sources.push(source);
            }
        }
        sources
    }
}
