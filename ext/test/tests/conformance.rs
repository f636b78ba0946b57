//! Conformance tests that run YAML fixtures against evmatch
//!
//! Run with: cargo test -p evmatch-test --test conformance

#![cfg(feature = "fixtures")]

use evmatch_test::fixture::{EnvelopeFixture, Fixture};
use std::fs;
use std::path::{Path, PathBuf};

/// Get the spec/tests directory relative to the workspace root
fn fixtures_dir() -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");

    // Go up: ext/test -> ext -> workspace root
    let root = Path::new(manifest_dir)
        .parent()
        .and_then(Path::parent)
        .expect("Could not find workspace root");

    root.join("spec").join("tests")
}

/// Every `.yaml` / `.yml` file in `dir`, sorted by name.
fn yaml_files(dir: &Path) -> Vec<PathBuf> {
    assert!(
        dir.exists(),
        "Fixtures directory does not exist: {}",
        dir.display()
    );

    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .expect("read dir")
        .map(|entry| entry.expect("dir entry").path())
        .filter(|path| {
            path.extension()
                .is_some_and(|e| e == "yaml" || e == "yml")
        })
        .collect();
    files.sort();
    assert!(!files.is_empty(), "No fixtures in {}", dir.display());
    files
}

/// Load and run all pattern fixtures in a directory
fn run_fixtures_in_dir(dir: &Path) {
    for path in yaml_files(dir) {
        println!("Running fixture: {}", path.display());

        let yaml = fs::read_to_string(&path).expect("read yaml");

        // Parse potentially multiple fixtures (separated by ---)
        let fixtures = Fixture::from_yaml_multi(&yaml).unwrap_or_else(|e| {
            panic!("Failed to parse {}: {}", path.display(), e);
        });

        for fixture in fixtures {
            println!("  Running: {}", fixture.name);
            fixture.run_and_assert();
        }
    }
}

/// Load and run all envelope fixtures in a directory
fn run_envelope_fixtures_in_dir(dir: &Path) {
    for path in yaml_files(dir) {
        println!("Running fixture: {}", path.display());

        let yaml = fs::read_to_string(&path).expect("read yaml");
        let fixtures = EnvelopeFixture::from_yaml_multi(&yaml).unwrap_or_else(|e| {
            panic!("Failed to parse {}: {}", path.display(), e);
        });

        for fixture in fixtures {
            println!("  Running: {}", fixture.name);
            fixture.run_and_assert();
        }
    }
}

#[test]
fn test_comparisons() {
    run_fixtures_in_dir(&fixtures_dir().join("01_comparisons"));
}

#[test]
fn test_structure() {
    run_fixtures_in_dir(&fixtures_dir().join("02_structure"));
}

#[test]
fn test_compile_errors() {
    run_fixtures_in_dir(&fixtures_dir().join("03_compile_errors"));
}

#[test]
fn test_envelope() {
    run_envelope_fixtures_in_dir(&fixtures_dir().join("04_envelope"));
}
