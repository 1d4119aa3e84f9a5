//! Built-in fallback families appended when `system_fallbacks` is enabled.
//!
//! Only families that resolve on the running system are used, so the lists
//! span the common families of every platform.

/// Monochrome symbol families, searched after the primary families.
pub const DEFAULT_SYMBOL_FAMILIES: &[&str] = &[
    // Nerd Font icons and powerline glyphs
    "Symbols Nerd Font Mono",
    "Symbols Nerd Font",
    // CJK
    "Noto Sans Mono CJK SC",
    "Noto Sans CJK JP",
    "Noto Sans CJK SC",
    "Noto Sans CJK TC",
    "Noto Sans CJK KR",
    "Microsoft YaHei",
    "MS Gothic",
    "Malgun Gothic",
    // Outline symbols and dingbats
    "Apple Symbols",
    "Segoe UI Symbol",
    "STIX Two Math",
    "Noto Sans Symbols",
    "Noto Sans Symbols 2",
    "DejaVu Sans Mono",
    "DejaVu Sans",
    "Symbola",
    "Arial Unicode MS",
];

/// Color emoji families, searched last.
pub const DEFAULT_COLOR_FAMILIES: &[&str] =
    &["Noto Color Emoji", "Apple Color Emoji", "Segoe UI Emoji"];
