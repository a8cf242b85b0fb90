//! Common test utilities and helpers for integration tests

use std::path::PathBuf;

/// Get the path to test fixtures
pub fn fixtures_dir() -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    PathBuf::from(manifest_dir).join("tests").join("fixtures")
}

/// Path of the bundled two-aircraft recording
pub fn short_engagement_path() -> PathBuf {
    fixtures_dir().join("short_engagement.acmi")
}

pub fn load_short_engagement() -> String {
    let path = short_engagement_path();
    std::fs::read_to_string(&path)
        .unwrap_or_else(|_| panic!("Failed to read fixture {:?}", path))
}

/// Write a recording to a temporary file named after the calling test
pub fn write_temp_recording(name: &str, text: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("acmiview-{}-{}.acmi", name, std::process::id()));
    std::fs::write(&path, text).expect("Failed to write temp recording");
    path
}

/// Clean up temporary test files
pub fn cleanup_temp_file(path: &PathBuf) {
    let _ = std::fs::remove_file(path);
}
