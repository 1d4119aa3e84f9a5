//! Subcommand implementations.
//!
//! Output goes to the writer passed in so the commands can be driven from
//! tests; `main` hands them a locked stdout.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, bail};
use cellglyph_config::FontSettings;
use cellglyph_fonts::{FaceHandle, FamilyRegistry, FontEngine, FontStyle};

use super::{Cli, Commands};
use crate::preview;

/// Run the parsed command line.
pub fn run(cli: &Cli, out: &mut impl Write) -> Result<()> {
    if let Commands::InitConfig { force } = cli.command {
        return init_config(&cli.config_path(), force, out);
    }

    let settings = cli.settings()?;
    let mut registry = FamilyRegistry::new(settings);
    let result = run_loaded(&mut registry, &cli.command, out);
    registry.destroy();
    result
}

/// Load the registry's fonts and run a font command against it.
pub fn run_loaded<E: FontEngine>(
    registry: &mut FamilyRegistry<E>,
    command: &Commands,
    out: &mut impl Write,
) -> Result<()> {
    registry.load_fonts().context("failed to load fonts")?;

    match *command {
        Commands::Metrics => metrics(registry, out),
        Commands::Resolve { ch, style } => resolve(registry, ch, style.into(), out),
        Commands::Render { ch, style } => render(registry, ch, style.into(), out),
        Commands::InitConfig { .. } => bail!("init-config does not use fonts"),
    }
}

/// Print the cell size and every face in the fallback chain.
pub fn metrics<E: FontEngine>(registry: &FamilyRegistry<E>, out: &mut impl Write) -> Result<()> {
    let settings = registry.settings();
    let cell = registry.cell_size();
    writeln!(
        out,
        "cell: {}x{} px ({}pt at {} dpi = {:.1} px)",
        cell.width,
        cell.height,
        settings.size,
        settings.dpi,
        settings.pixel_size()
    )?;
    writeln!(out, "output: {}", settings.output)?;

    for (index, family) in registry.primaries().iter().enumerate() {
        let marker = if registry.default_family() == Some(index) {
            " (default)"
        } else {
            ""
        };
        writeln!(
            out,
            "primary #{index}{marker}: range {} {}",
            family.range(),
            face_line(family.regular())
        )?;
        for style in [FontStyle::Bold, FontStyle::Italic, FontStyle::BoldItalic] {
            let (face, resolved) = family.resolve(style);
            if resolved == style {
                writeln!(out, "    {style}: {}", face_line(face))?;
            }
        }
    }
    for (index, face) in registry.symbol_faces().iter().enumerate() {
        writeln!(out, "symbol #{index}: {}", face_line(face))?;
    }
    for (index, face) in registry.color_faces().iter().enumerate() {
        writeln!(out, "color #{index}: {}", face_line(face))?;
    }
    Ok(())
}

fn face_line<F>(face: &FaceHandle<F>) -> String {
    if face.is_loaded() {
        format!(
            "{} [{}x{} px, {:?}]",
            face.path().display(),
            face.glyph_width_pixels(),
            face.line_height_pixels(),
            face.render_mode()
        )
    } else {
        format!("{} [not loaded]", face.path().display())
    }
}

/// Print which tier and face serve `ch`.
pub fn resolve<E: FontEngine>(
    registry: &FamilyRegistry<E>,
    ch: char,
    style: FontStyle,
    out: &mut impl Write,
) -> Result<()> {
    let resolved = registry.resolve(ch, style)?;
    let path = registry
        .face_for(&resolved)
        .map(|face| face.path().display().to_string())
        .unwrap_or_default();
    writeln!(
        out,
        "{:?} U+{:04X} -> {} ({}), glyph {}, {}",
        ch, resolved.codepoint, resolved.tier, resolved.style, resolved.glyph_id, path
    )?;
    Ok(())
}

/// Render `ch` and print its description followed by a shaded preview.
pub fn render<E: FontEngine>(
    registry: &mut FamilyRegistry<E>,
    ch: char,
    style: FontStyle,
    out: &mut impl Write,
) -> Result<()> {
    let glyph = registry.load_and_render_glyph(ch, style)?;
    writeln!(out, "{}", preview::describe(&glyph.info))?;

    let text = preview::render(&glyph);
    if text.is_empty() {
        writeln!(out, "(no pixel data)")?;
    } else {
        out.write_all(text.as_bytes())?;
    }
    Ok(())
}

/// Write the default settings to `path`.
pub fn init_config(path: &Path, force: bool, out: &mut impl Write) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    FontSettings::default().save(path)?;
    writeln!(out, "Wrote default font settings to {}", path.display())?;
    Ok(())
}
