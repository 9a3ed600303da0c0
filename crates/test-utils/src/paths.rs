//! Path utilities for locating test data files.
//!
//! Natural Earth boundary files are optional; tests that need them skip when
//! they cannot be found.

use std::path::PathBuf;

/// Environment variable pointing at a directory of Natural Earth GeoJSON files.
pub const NATURAL_EARTH_ENV: &str = "GEOTOOLZ_NATURAL_EARTH_DIR";

/// Returns the workspace root directory.
pub fn workspace_root() -> PathBuf {
    // Start from the test-utils crate manifest dir
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    PathBuf::from(manifest_dir)
        .parent() // crates/
        .and_then(|p| p.parent()) // workspace root
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(manifest_dir))
}

/// Returns `crates/{crate_name}/testdata/`.
pub fn crate_testdata_dir(crate_name: &str) -> PathBuf {
    workspace_root()
        .join("crates")
        .join(crate_name)
        .join("testdata")
}

/// Directory named by `GEOTOOLZ_NATURAL_EARTH_DIR`, if set.
pub fn natural_earth_dir() -> Option<PathBuf> {
    std::env::var_os(NATURAL_EARTH_ENV).map(PathBuf::from)
}

/// Searches for a test file in multiple locations.
///
/// This function checks the following locations in order:
/// 1. Environment variable `TEST_DATA_DIR` (if set)
/// 2. Environment variable `GEOTOOLZ_NATURAL_EARTH_DIR` (if set)
/// 3. `crates/masks/testdata/`
/// 4. `testdata/` at the workspace root
pub fn find_test_file(name: &str) -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(test_data_dir) = std::env::var("TEST_DATA_DIR") {
        candidates.push(PathBuf::from(test_data_dir).join(name));
    }
    if let Some(dir) = natural_earth_dir() {
        candidates.push(dir.join(name));
    }

    let root = workspace_root();
    candidates.extend([
        crate_testdata_dir("masks").join(name),
        root.join("testdata").join(name),
    ]);

    candidates.into_iter().find(|path| path.exists())
}

/// Creates a temporary directory for test output, removed on drop.
pub fn temp_test_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary test directory")
}

/// Writes `contents` to `name` inside `dir` and returns the full path.
pub fn write_test_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).expect("Failed to write test file");
    path
}
