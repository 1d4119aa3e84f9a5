use anyhow::Result;
use cellglyph::cli::{self, Cli, commands};
use clap::Parser;
use std::io::{self, Write};

fn main() -> Result<()> {
    let cli = Cli::parse();
    // CLI --log-level takes precedence over RUST_LOG
    cli::init_logging(cli.log_level);

    log::info!("Starting cellglyph {}", cellglyph::VERSION);

    let mut stdout = io::stdout().lock();
    commands::run(&cli, &mut stdout)?;
    stdout.flush()?;
    Ok(())
}
