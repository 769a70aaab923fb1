use std::fs;

use genbind_lib::{cast::TranslationUnit, generate, Config, ConfigBuilder};
use serde::Deserialize;

include! {concat!(env!("OUT_DIR"), "/tests.rs")}

/// One end-to-end fixture: a dumped translation unit plus the knobs of the run.
#[derive(Deserialize)]
struct Fixture {
    headers: Vec<String>,
    #[serde(default)]
    ignore: Vec<String>,
    #[serde(default)]
    strip_prefix: Option<String>,
    #[serde(default = "default_fold")]
    fold_std_aliases: bool,
    /// Only set on failing fixtures: a substring the error message has to contain.
    #[serde(default)]
    error: Option<String>,
    tu: TranslationUnit,
}

fn default_fold() -> bool {
    true
}

fn load(file: &str) -> (Fixture, Config) {
    let source = fs::read_to_string(file)
        .unwrap_or_else(|_| panic!("Failed to read fixture file `{file}`"));
    let fixture: Fixture = serde_json::from_str(&source)
        .unwrap_or_else(|e| panic!("Failed to parse fixture file `{file}`: {e}"));

    let mut builder = ConfigBuilder::new().fold_std_aliases(fixture.fold_std_aliases);
    for header in &fixture.headers {
        builder = builder.header(header);
    }
    for symbol in &fixture.ignore {
        builder = builder.ignore(symbol);
    }
    if let Some(prefix) = &fixture.strip_prefix {
        builder = builder.strip_prefix(prefix);
    }
    let config = builder.build().unwrap();

    (fixture, config)
}

fn output_test(file: &str, golden: &str) {
    let (fixture, config) = load(file);
    let output = match generate(&fixture.tu, &config) {
        Ok(output) => output,
        Err(e) => panic!("Expected fixture `{file}` to bind cleanly, but got: {e}"),
    };

    let expected = fs::read_to_string(golden)
        .unwrap_or_else(|_| panic!("Failed to read golden file `{golden}`"));
    pretty_assertions::assert_str_eq!(
        output,
        expected,
        "The generated module (left) does not match the golden file (right)",
    );
}

fn error_test(file: &str) {
    let (fixture, config) = load(file);
    let needle = fixture
        .error
        .as_deref()
        .unwrap_or_else(|| panic!("Failing fixture `{file}` needs an `error` field"));

    match generate(&fixture.tu, &config) {
        Ok(output) => panic!("Expected fixture `{file}` to fail, but it produced:\n{output}"),
        Err(e) => {
            let message = e.to_string();
            assert!(
                message.contains(needle),
                "Error `{message}` does not mention `{needle}`"
            );
        }
    }
}
