use std::collections::HashSet;
use std::path::PathBuf;

/// Everything one generation run is configured by.
///
/// Built once from the command line (or by hand in tests) and passed by reference into the
/// binding context; the context's header lookups close over the header list in here, so a
/// context must not outlive its config.
#[derive(Debug, Clone)]
pub struct Config {
    headers: Vec<String>,
    include_dirs: Vec<PathBuf>,
    output_path: Option<PathBuf>,
    ignored_symbols: HashSet<String>,
    strip_prefix: Option<String>,
    fold_std_aliases: bool,
}

impl Config {
    /// The header names the user asked to bind. Only declarations resolving to one of these are
    /// bound.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn include_dirs(&self) -> &[PathBuf] {
        &self.include_dirs
    }

    pub fn output_path(&self) -> Option<&PathBuf> {
        self.output_path.as_ref()
    }

    pub fn is_ignored(&self, symbol: &str) -> bool {
        self.ignored_symbols.contains(symbol)
    }

    pub fn strip_prefix(&self) -> Option<&str> {
        self.strip_prefix.as_deref()
    }

    /// Whether the common cstddef aliases (`size_t` and friends) collapse to builtin atoms
    /// instead of producing alias declarations.
    pub fn fold_std_aliases(&self) -> bool {
        self.fold_std_aliases
    }
}

#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    headers: Vec<String>,
    include_dirs: Vec<PathBuf>,
    output_path: Option<PathBuf>,
    ignored_symbols: HashSet<String>,
    strip_prefix: Option<String>,
    fold_std_aliases: bool,
}

#[derive(Debug, Clone)]
pub enum ConfigErr {
    NoHeaders,
}

impl std::fmt::Display for ConfigErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigErr::NoHeaders => {
                write!(f, "At least one header to bind has to be requested.")
            }
        }
    }
}

impl std::error::Error for ConfigErr {}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self {
            headers: Vec::new(),
            include_dirs: Vec::new(),
            output_path: None,
            ignored_symbols: HashSet::default(),
            strip_prefix: None,
            fold_std_aliases: true,
        }
    }
}

impl ConfigBuilder {
    /// Standard-alias folding on, nothing ignored.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a header to bind. Declarations whose file ends with this name become bindable.
    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.headers.push(header.into());
        self
    }

    pub fn include_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.include_dirs.push(dir.into());
        self
    }

    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    /// Never bind the symbol with this name.
    pub fn ignore(mut self, symbol: impl Into<String>) -> Self {
        self.ignored_symbols.insert(symbol.into());
        self
    }

    /// Strip this prefix from every output name (the import patterns keep the original names).
    pub fn strip_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.strip_prefix = Some(prefix.into());
        self
    }

    pub fn fold_std_aliases(mut self, fold: bool) -> Self {
        self.fold_std_aliases = fold;
        self
    }

    pub fn build(self) -> Result<Config, ConfigErr> {
        if self.headers.is_empty() {
            return Err(ConfigErr::NoHeaders);
        }
        Ok(Config {
            headers: self.headers,
            include_dirs: self.include_dirs,
            output_path: self.output_path,
            ignored_symbols: self.ignored_symbols,
            strip_prefix: self.strip_prefix,
            fold_std_aliases: self.fold_std_aliases,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn at_least_one_header_is_required() {
        assert!(matches!(
            ConfigBuilder::new().build(),
            Err(ConfigErr::NoHeaders)
        ));
    }

    #[test]
    fn knobs_survive_the_build() {
        let config = ConfigBuilder::new()
            .header("geom.h")
            .output_path("out/geom.nim")
            .ignore("legacy_handle")
            .build()
            .unwrap();

        assert_eq!(config.headers(), ["geom.h"]);
        assert_eq!(config.output_path(), Some(&PathBuf::from("out/geom.nim")));
        assert!(config.is_ignored("legacy_handle"));
        assert!(!config.is_ignored("version"));
        // Defaults: no prefix stripped, standard aliases folded.
        assert_eq!(config.strip_prefix(), None);
        assert!(config.fold_std_aliases());
    }
}
