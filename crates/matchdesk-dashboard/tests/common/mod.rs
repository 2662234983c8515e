//! Common test utilities and fixtures for integration tests

#![allow(dead_code, clippy::unwrap_used)]

pub mod fixtures;

pub use fixtures::*;

use matchdesk_core::types::SelectedFile;
use matchdesk_core::utils::selected_file_from_path;
use std::path::Path;
use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Initialize test logging (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init();
    });
}

/// Write `contents` to `dir/name` and describe it the way the file picker would
pub fn write_file(dir: &Path, name: &str, contents: &str) -> SelectedFile {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    selected_file_from_path(&path).unwrap()
}
