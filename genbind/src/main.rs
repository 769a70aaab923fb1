mod cli;

use anyhow::{Context, Result};
use clap::Parser;

use std::io::Write;

fn main() -> Result<()> {
    let args = cli::Args::parse();

    let tu = cli::load_translation_unit(&args)?;
    let config = cli::extract_config(&args)?;

    // Fail-fast: on any binding fault nothing is written, not even a partial file.
    let output = genbind_lib::generate(&tu, &config)
        .context("couldn't generate bindings due to the previous error")?;

    cli::open_output(&config)?
        .write_all(output.as_bytes())
        .context("Failed to write to output")?;

    Ok(())
}
