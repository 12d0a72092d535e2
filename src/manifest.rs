//! Per-theme manifest generation.
//!
//! For every configured theme, [`regenerate`] scans the theme's image directory
//! and writes `data/<key>.txt` with one image URL per line. Manifests are fully
//! rewritten on every call, so images removed from disk disappear from the
//! listing immediately.
//!
//! Each manifest is written to a uniquely named temporary file in the static
//! root (outside the served `data/` directory) and renamed into place. Readers
//! serving `data/` therefore see either the previous complete file or the new
//! one, never a partial write, and overlapping regenerations never share a
//! staging file.

use crate::config::ThemeConfig;
use crate::scan;
use crate::types::{ManifestSummary, StaticLayout};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to list images: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Rescan every theme and rewrite its manifest.
pub fn regenerate(
    layout: &StaticLayout,
    themes: &[ThemeConfig],
) -> Result<Vec<ManifestSummary>, ManifestError> {
    let data_dir = layout.data_dir();
    fs::create_dir_all(&data_dir)?;

    let mut summaries = Vec::with_capacity(themes.len());
    for theme in themes {
        let urls = scan::theme_image_urls(layout, theme)?;
        let file = theme.manifest_file_name();
        write_manifest(layout.root(), &data_dir.join(&file), &urls)?;

        debug!(theme = %theme.key, images = urls.len(), file = %file, "manifest written");
        summaries.push(ManifestSummary {
            theme: theme.key.clone(),
            file,
            image_count: urls.len(),
        });
    }
    Ok(summaries)
}

/// Manifest body: every URL followed by a newline.
pub fn render_manifest(urls: &[String]) -> String {
    let mut body = String::with_capacity(urls.iter().map(|u| u.len() + 1).sum());
    for url in urls {
        body.push_str(url);
        body.push('\n');
    }
    body
}

/// Stage `urls` in `staging_dir` and atomically move the result to `target`.
///
/// The staging file is removed when anything fails before the rename.
fn write_manifest(staging_dir: &Path, target: &Path, urls: &[String]) -> std::io::Result<()> {
    let mut staging = NamedTempFile::new_in(staging_dir)?;
    staging.write_all(render_manifest(urls).as_bytes())?;
    staging.as_file().sync_all()?;
    staging.persist(target)?;
    Ok(())
}
