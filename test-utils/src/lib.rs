//! Shared test utilities for the asterix workspace.
//!
//! Provides fixture loading from the workspace-level `testdata/` directory
//! and helpers for working with wire samples written as hex strings.

use std::fs;
use std::path::PathBuf;

/// Returns the path to the workspace-level testdata directory.
///
/// This resolves the path relative to the workspace root, not the
/// individual crate.
pub fn testdata_dir() -> PathBuf {
    // CARGO_MANIFEST_DIR points to the crate using this library,
    // so we need to find the workspace root by looking for testdata/
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));

    let candidates = [
        manifest_dir.join("../testdata"),
        manifest_dir.join("../../testdata"),
        manifest_dir.join("testdata"),
    ];

    for candidate in &candidates {
        if candidate.exists() {
            return candidate.canonicalize().unwrap_or_else(|_| candidate.clone());
        }
    }

    manifest_dir.join("../testdata")
}

/// Returns the path to a fixture file.
///
/// # Arguments
///
/// * `category` - "valid" or "invalid"
/// * `filename` - Name of the XML file (e.g., "cat048.xml")
pub fn fixture_path(category: &str, filename: &str) -> PathBuf {
    testdata_dir().join(category).join(filename)
}

/// Loads an XML fixture file from the testdata directory.
///
/// # Arguments
///
/// * `category` - "valid" or "invalid"
/// * `filename` - Name of the XML file (e.g., "cat048.xml")
///
/// # Panics
///
/// Panics if the file cannot be read.
pub fn load_fixture(category: &str, filename: &str) -> String {
    let path = fixture_path(category, filename);
    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e))
}

/// Parses a whitespace-separated hex string into bytes.
///
/// # Panics
///
/// Panics on anything that is not a two-digit hex byte; samples in tests
/// are expected to be well-formed.
pub fn bytes_from_hex(hex: &str) -> Vec<u8> {
    hex.split_whitespace()
        .map(|pair| {
            u8::from_str_radix(pair, 16)
                .unwrap_or_else(|e| panic!("bad hex byte {pair:?}: {e}"))
        })
        .collect()
}

/// The canonical 48-byte CAT048 sample datagram: one block, one record,
/// FSPEC `FD F7 02`.
pub const CAT048_SAMPLE: &str = "30 00 30 fd f7 02 19 c9 35 6d 4d a0 c5 af f1 e0 \
                                 02 00 05 28 3c 66 0c 10 c2 36 d4 18 20 01 c0 78 \
                                 00 31 bc 00 00 40 0d eb 07 b9 58 2e 41 00 20 f5";
