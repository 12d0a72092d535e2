//! Shared types used by the manifest generator, the server and the CLI.

use std::path::{Path, PathBuf};

/// URL prefix under which theme image directories are published.
pub const IMAGES_URL_PREFIX: &str = "/static/images";

/// URL prefix under which generated manifests are published.
pub const DATA_URL_PREFIX: &str = "/static/data";

/// On-disk layout of the static-assets root.
///
/// ```text
/// static/
/// ├── images/
/// │   ├── general/          # theme image directories (populated out-of-band)
/// │   └── machu/
/// └── data/
///     ├── general.txt       # generated manifests
///     └── this-machu-does-not-exist.txt
/// ```
#[derive(Debug, Clone)]
pub struct StaticLayout {
    root: PathBuf,
}

impl StaticLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Parent of all theme image directories.
    pub fn images_dir(&self) -> PathBuf {
        self.root.join("images")
    }

    /// Generated-data directory, where manifests are written and served from.
    pub fn data_dir(&self) -> PathBuf {
        self.root.join("data")
    }

    pub fn theme_dir(&self, dir: &str) -> PathBuf {
        self.images_dir().join(dir)
    }
}

/// Outcome of writing one theme's manifest.
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestSummary {
    pub theme: String,
    /// Manifest file name inside the data directory.
    pub file: String,
    pub image_count: usize,
}
