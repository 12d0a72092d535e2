//! # gridwall
//!
//! A tiny web server for an endlessly drifting wall of photos. The filesystem
//! is the data source: each theme is a directory of images, and every visit to
//! the index page rescans those directories and republishes one plaintext
//! manifest per theme for the browser to load.
//!
//! ```text
//! GET /                      →  scan images/<dir>/  →  write data/<key>.txt  →  HTML page
//! GET /static/data/<key>.txt →  manifest bytes (or 404)
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `config.toml` loading, merging onto stock defaults, validation |
//! | [`scan`] | Lists a theme directory and filters image file names |
//! | [`manifest`] | Rewrites every theme's manifest (`regenerate`) |
//! | [`page`] | Renders the index document with Maud |
//! | [`server`] | Axum router, handlers, graceful shutdown |
//! | [`types`] | Static-root layout and summaries shared across modules |
//! | [`output`] | CLI output for the `scan` command |
//! | [`logging`] | `tracing` subscriber setup |
//!
//! # Design Decisions
//!
//! ## No Scan Cache
//!
//! Manifests are rebuilt from scratch on each index request. Theme directories
//! are small and flat, and dropping a file into `images/<dir>/` shows up on the
//! next page load without restarts or cache invalidation.
//!
//! ## Atomic Manifest Replacement
//!
//! A manifest is written to a uniquely named staging file in the static root,
//! outside the served `data/`, and renamed over the old one. Regenerations are
//! serialised on one lock that the blocking scan task owns, so a disconnecting
//! client cannot release it early. A browser fetching `data/<key>.txt`
//! mid-regeneration gets a complete file.
//!
//! ## Missing Theme Directories Are Empty
//!
//! A theme whose directory does not exist publishes an empty manifest. The
//! image tree is populated out-of-band and may lag the configuration.

pub mod config;
pub mod logging;
pub mod manifest;
pub mod output;
pub mod page;
pub mod scan;
pub mod server;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
