//! CLI output formatting for the `scan` command.
//!
//! One line per theme, naming the theme, its image count and the manifest it
//! was written to:
//!
//! ```text
//! general (2 images) → data/general.txt
//! this-machu-does-not-exist (0 images) → data/this-machu-does-not-exist.txt
//!
//! Wrote 2 manifests, 2 images
//! ```
//!
//! `format_*` functions are pure and return lines; `print_*` wrappers write to
//! stdout.

use crate::types::ManifestSummary;

fn image_count(n: usize) -> String {
    match n {
        1 => "1 image".to_string(),
        n => format!("{n} images"),
    }
}

/// Format the per-theme regeneration summary.
pub fn format_regenerate_output(summaries: &[ManifestSummary]) -> Vec<String> {
    let mut lines: Vec<String> = summaries
        .iter()
        .map(|s| {
            format!(
                "{} ({}) → data/{}",
                s.theme,
                image_count(s.image_count),
                s.file
            )
        })
        .collect();

    let total: usize = summaries.iter().map(|s| s.image_count).sum();
    lines.push(String::new());
    lines.push(format!(
        "Wrote {} manifest{}, {}",
        summaries.len(),
        if summaries.len() == 1 { "" } else { "s" },
        image_count(total)
    ));
    lines
}

pub fn print_regenerate_output(summaries: &[ManifestSummary]) {
    for line in format_regenerate_output(summaries) {
        println!("{line}");
    }
}
