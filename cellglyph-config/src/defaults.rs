//! Default values for font settings.

use crate::types::{FamilyConfig, OutputType};

pub fn font_size() -> f32 {
    12.0
}

pub fn dpi() -> u32 {
    96
}

pub fn font_family() -> String {
    "JetBrains Mono".to_string()
}

pub fn families() -> Vec<FamilyConfig> {
    let family = font_family();
    vec![
        FamilyConfig::new(family.clone())
            .with_bold(family.clone())
            .with_italic(family.clone())
            .with_bold_italic(family),
    ]
}

pub fn output() -> OutputType {
    OutputType::Grayscale
}

pub fn row_alignment() -> u8 {
    4 // Matches the default GL_UNPACK_ALIGNMENT
}

pub fn bool_true() -> bool {
    true
}
