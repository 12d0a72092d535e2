//! Shared test utilities for the gridwall test suite.
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let tmp = setup_static_root(&[("general", &["a.jpg", "b.png"]), ("machu", &[])]);
//! let layout = StaticLayout::new(tmp.path());
//! regenerate(&layout, &themes).unwrap();
//! assert_eq!(sorted(manifest_lines(&read_manifest(tmp.path(), "general.txt"))), [...]);
//! ```

use std::path::Path;
use tempfile::TempDir;

// =========================================================================
// Fixture setup
// =========================================================================

/// Build a static root in a temp directory.
///
/// Each `(dir, files)` pair creates `images/<dir>/` holding the named files.
/// File contents are placeholder bytes; nothing decodes them.
pub fn setup_static_root(themes: &[(&str, &[&str])]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for (dir, files) in themes {
        let theme_dir = tmp.path().join("images").join(dir);
        std::fs::create_dir_all(&theme_dir).unwrap();
        for file in *files {
            std::fs::write(theme_dir.join(file), b"not really an image").unwrap();
        }
    }
    tmp
}

// =========================================================================
// Manifest readers
// =========================================================================

/// Read `data/<file>` under a static root. Panics if missing.
pub fn read_manifest(root: &Path, file: &str) -> String {
    let path = root.join("data").join(file);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("manifest {} unreadable: {e}", path.display()))
}

pub fn manifest_lines(content: &str) -> Vec<String> {
    content.lines().map(str::to_string).collect()
}

/// Sort a listing so assertions do not depend on directory enumeration order.
pub fn sorted(mut items: Vec<String>) -> Vec<String> {
    items.sort();
    items
}

/// Entry names directly inside `dir`, sorted.
pub fn dir_names(dir: &Path) -> Vec<String> {
    let names = std::fs::read_dir(dir)
        .unwrap_or_else(|e| panic!("{} unreadable: {e}", dir.display()))
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    sorted(names)
}
