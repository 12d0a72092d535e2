//! Image discovery for theme directories.
//!
//! Each theme owns one flat directory under `images/`. Scanning lists that
//! directory (no recursion), keeps the entries whose names carry a recognised
//! image extension, and turns them into public URLs:
//!
//! ```text
//! images/general/a.jpg      →  /static/images/general/a.jpg
//! images/general/Photo.JPG  →  /static/images/general/Photo.JPG
//! images/general/notes.txt  →  (skipped)
//! ```
//!
//! A theme whose directory does not exist simply has no images. Entries keep
//! the order the filesystem enumerates them in. An entry that cannot be
//! inspected (a dangling symlink, say) is logged and skipped; only a failure to
//! read the directory itself is an error.

use crate::config::ThemeConfig;
use crate::types::{IMAGES_URL_PREFIX, StaticLayout};
use std::path::Path;
use tracing::warn;
use walkdir::WalkDir;

/// Recognised image suffixes, compared against the lowercased file name.
pub const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".webp"];

/// Whether a file name ends with a recognised image extension (case-insensitive).
pub fn is_image_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Public URL of an image inside a theme directory.
pub fn image_url(dir: &str, filename: &str) -> String {
    format!("{IMAGES_URL_PREFIX}/{dir}/{filename}")
}

/// List the image URLs currently present in a theme's directory.
pub fn theme_image_urls(
    layout: &StaticLayout,
    theme: &ThemeConfig,
) -> Result<Vec<String>, walkdir::Error> {
    let dir = layout.theme_dir(&theme.dir);
    let names = list_image_names(&dir)?;
    Ok(names
        .iter()
        .map(|name| image_url(&theme.dir, name))
        .collect())
}

/// Image file names directly inside `dir`, in enumeration order.
///
/// Returns an empty list when `dir` does not exist.
pub fn list_image_names(dir: &Path) -> Result<Vec<String>, walkdir::Error> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut names = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
    {
        let entry = match entry {
            Ok(entry) => entry,
            // Depth 0 is the theme directory itself
            Err(err) if err.depth() > 0 => {
                warn!(path = ?err.path(), error = %err, "skipping unreadable entry");
                continue;
            }
            Err(err) => return Err(err),
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if is_image_name(&name) {
            names.push(name.into_owned());
        }
    }
    Ok(names)
}
