use genbind_lib::cast::TranslationUnit;
use genbind_lib::{Config, ConfigBuilder, ConfigErr};

use anyhow::{bail, Context};
use clap::Parser;

use std::{ffi::OsStr, fs::File, io::Read, path::PathBuf};

/// Where an AST dump comes from or a rendered module goes: a file, or the standard stream the
/// tool was given. `-` on the command line selects the stream.
#[derive(Debug, Clone)]
pub enum PathOrStd {
    Path(PathBuf),
    StdStream,
}

impl From<&OsStr> for PathOrStd {
    fn from(value: &OsStr) -> Self {
        match value.to_str() {
            Some("-") => Self::StdStream,
            _ => Self::Path(value.into()),
        }
    }
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// The AST dump of the translation unit, use `-` for std in.
    #[arg(default_value = "-")]
    input_path: PathOrStd,

    /// A header to generate bindings for. Repeat for multiple headers.
    #[arg(short = 'H', long = "header", value_name = "HEADER", required = true)]
    headers: Vec<String>,

    /// Extra include directories the front end was run with.
    #[arg(short = 'I', long = "include-dir", value_name = "DIR")]
    include_dirs: Vec<PathBuf>,

    /// Zero or more symbols to leave out of the bindings.
    #[arg(long = "ignore", value_name = "SYMBOL")]
    ignored: Vec<String>,

    /// Strip this prefix from every generated name.
    #[arg(long = "strip-prefix", value_name = "PREFIX")]
    strip_prefix: Option<String>,

    /// Emit alias declarations for size_t and friends instead of folding them to builtins.
    #[arg(long = "no-fold-std-aliases")]
    no_fold_std_aliases: bool,

    /// The output file, use `-` for std out.
    #[arg(short = 'o', long = "output", default_value = "-")]
    output_path: PathOrStd,
}

pub fn load_translation_unit(args: &Args) -> anyhow::Result<TranslationUnit> {
    let source = match &args.input_path {
        PathOrStd::Path(path) => {
            if !path.exists() {
                bail!("Input file `{}` doesn't exist", path.display());
            }
            let mut handle = File::open(path)
                .with_context(|| format!("Failed to open input file `{}`", path.display()))?;
            let mut s = String::new();
            handle
                .read_to_string(&mut s)
                .with_context(|| format!("Failed to read from input file `{}`", path.display()))?;
            s
        }
        PathOrStd::StdStream => {
            let mut handle = std::io::stdin().lock();
            let mut s = String::new();
            handle
                .read_to_string(&mut s)
                .context("Failed to read from stdin")?;
            s
        }
    };

    serde_json::from_str(&source).context("Failed to parse the AST dump")
}

pub fn extract_config(args: &Args) -> Result<Config, ConfigErr> {
    let mut builder = ConfigBuilder::new().fold_std_aliases(!args.no_fold_std_aliases);

    for header in &args.headers {
        builder = builder.header(header);
    }
    for dir in &args.include_dirs {
        builder = builder.include_dir(dir);
    }
    for symbol in &args.ignored {
        builder = builder.ignore(symbol);
    }
    if let Some(prefix) = &args.strip_prefix {
        builder = builder.strip_prefix(prefix);
    }
    if let PathOrStd::Path(path) = &args.output_path {
        builder = builder.output_path(path);
    }

    builder.build()
}

pub fn open_output(config: &Config) -> anyhow::Result<Box<dyn std::io::Write>> {
    match config.output_path() {
        Some(path) => std::fs::OpenOptions::new()
            .write(true)
            .truncate(true)
            .create(true)
            .open(path)
            .map(|f| Box::new(f) as Box<dyn std::io::Write>)
            .with_context(|| format!("Failed to open output file `{}`", path.display())),
        None => Ok(Box::new(std::io::stdout().lock())),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn dash_selects_the_std_stream() {
        assert!(matches!(
            PathOrStd::from(OsStr::new("-")),
            PathOrStd::StdStream
        ));
        assert!(matches!(
            PathOrStd::from(OsStr::new("out.nim")),
            PathOrStd::Path(_)
        ));
    }
}
