//! Index page rendering.
//!
//! The page is a single full-screen wall of image cells that drifts slowly in
//! a random walk. Everything the browser needs is inlined into one document:
//!
//! - `static/style.css`: layout and modal styles
//! - `static/grid.js`: grid construction, motion, keyboard panning, modal
//! - a JSON payload (`#grid-config`) with the theme table and grid settings
//!
//! The script picks the theme from `?theme=` (falling back to the default
//! theme), then fetches that theme's manifest from `/static/data/<key>.txt`.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! The page does not depend on the request, so it is rendered once at startup.

use crate::config::{GalleryConfig, GridConfig};
use crate::types::DATA_URL_PREFIX;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use serde::Serialize;

const CSS: &str = include_str!("../static/style.css");
const JS: &str = include_str!("../static/grid.js");

/// Theme used when `?theme=` is absent or unknown.
pub const DEFAULT_THEME: &str = "general";

/// Payload read by `grid.js`.
#[derive(Debug, Serialize)]
struct ClientConfig<'a> {
    default_theme: &'a str,
    themes: Vec<ClientTheme<'a>>,
    grid: &'a GridConfig,
}

#[derive(Debug, Serialize)]
struct ClientTheme<'a> {
    key: &'a str,
    manifest: String,
    aspect_ratio: [u32; 2],
}

/// Serialize the client payload for embedding in a `<script>` element.
///
/// Every `<` is written as the JSON escape `\u003c`, so no value can close the
/// element early.
pub fn client_config_json(config: &GalleryConfig) -> Result<String, serde_json::Error> {
    let default_theme = config
        .theme(DEFAULT_THEME)
        .or_else(|| config.themes.first())
        .map(|t| t.key.as_str())
        .unwrap_or(DEFAULT_THEME);

    let payload = ClientConfig {
        default_theme,
        themes: config
            .themes
            .iter()
            .map(|t| ClientTheme {
                key: &t.key,
                manifest: format!("{DATA_URL_PREFIX}/{}", t.manifest_file_name()),
                aspect_ratio: t.aspect_ratio,
            })
            .collect(),
        grid: &config.grid,
    };

    let json = serde_json::to_string(&payload)?;
    Ok(json.replace('<', "\\u003c"))
}

/// Render the complete index document.
pub fn render_index(config: &GalleryConfig) -> Result<Markup, serde_json::Error> {
    let payload = client_config_json(config)?;

    Ok(html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { "Infinite Grid" }
                style { (PreEscaped(CSS)) }
            }
            body {
                div #wall {}
                p.empty-note { "No images yet." }
                div #modal {
                    img #modal-image alt="";
                }
                script #grid-config type="application/json" { (PreEscaped(payload)) }
                script { (PreEscaped(JS)) }
            }
        }
    })
}
