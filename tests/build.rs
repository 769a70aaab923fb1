use std::{env, error::Error, ffi::OsStr, fs, path::Path};
use walkdir::WalkDir;

fn make_save(name: &OsStr) -> String {
    let name = name.to_string_lossy();

    let mut out = String::new();
    for c in name.chars() {
        if c.is_ascii_alphabetic() {
            out.push(c);
        } else {
            out.push('_');
        }
    }
    out
}

fn main() -> Result<(), Box<dyn Error>> {
    let out_dir = env::var("OUT_DIR").unwrap();
    let input_dir = "test_files";

    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed={}", input_dir);
    let mut output = String::new();

    let mut i = 0;
    for entry in WalkDir::new(input_dir).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if path.extension() != Some(OsStr::new("json")) {
            continue;
        }

        // A fixture with a golden file next to it checks the generated module; one without is
        // expected to fail with the error named inside the fixture.
        let golden = path.with_extension("nim");
        let test = if golden.exists() {
            format!(
                r#"output_test("{}", "{}")"#,
                path.display(),
                golden.display()
            )
        } else {
            format!(r#"error_test("{}")"#, path.display())
        };

        let test_name = path.strip_prefix(Path::new(input_dir)).unwrap();
        let test_name = make_save(test_name.as_os_str());

        let test = format!("#[test]\nfn {}_{}() {{\n{};\n}}\n", test_name, i, test);

        output.push_str(&test);
        i += 1;
    }

    fs::write(out_dir + "/tests.rs", output).expect("Failed to write to tests.rs");

    Ok(())
}
