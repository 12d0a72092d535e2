//! Gallery configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. The configuration is
//! built once at startup and shared read-only with the manifest generator and
//! the HTTP handlers.
//!
//! ## Config File Location
//!
//! `config.toml` is looked up in the configuration directory (`--config-dir`,
//! default: the working directory). It is optional; without it the stock
//! defaults apply.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [server]
//! addr = "127.0.0.1:5000"
//!
//! [[themes]]
//! key = "general"            # Manifest becomes data/general.txt
//! dir = "general"            # Images read from images/general/
//! aspect_ratio = [1, 1]      # width:height of grid cells
//!
//! [grid]
//! cell_size = 150            # Base cell edge in pixels
//! grid_padding = 2           # Gap between cells in pixels
//! move_speed = 0.5           # Drift speed in pixels per frame
//! random_walk_interval_ms = 600
//! random_walk_intensity = 0.4
//! used_image_memory = 200    # Recently shown images to avoid repeating
//! ```
//!
//! ## Partial Configuration
//!
//! Tables merge key-by-key onto the defaults, so overriding one grid value
//! keeps the rest. Arrays replace wholesale: a `[[themes]]` list in the user
//! file is the complete theme set.
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Gallery configuration loaded from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// Listener settings.
    pub server: ServerConfig,
    /// Image categories, each with its own image directory and manifest.
    pub themes: Vec<ThemeConfig>,
    /// Client-side grid behavior, embedded into the index page.
    pub grid: GridConfig,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            themes: default_themes(),
            grid: GridConfig::default(),
        }
    }
}

fn default_themes() -> Vec<ThemeConfig> {
    vec![
        ThemeConfig::new("general", "general", [1, 1]),
        ThemeConfig::new("this-sacchan-does-not-exist", "sacchan", [1, 1]),
        ThemeConfig::new("this-machu-does-not-exist", "machu", [4, 3]),
    ]
}

impl GalleryConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.themes.is_empty() {
            return Err(ConfigError::Validation(
                "at least one theme must be configured".into(),
            ));
        }

        let mut seen = HashSet::new();
        for theme in &self.themes {
            if !is_single_segment(&theme.key) {
                return Err(ConfigError::Validation(format!(
                    "theme key {:?} must be a plain file name",
                    theme.key
                )));
            }
            if !is_single_segment(&theme.dir) {
                return Err(ConfigError::Validation(format!(
                    "theme dir {:?} must be a single directory name",
                    theme.dir
                )));
            }
            if !seen.insert(theme.key.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate theme key {:?}",
                    theme.key
                )));
            }
            if theme.aspect_ratio[0] == 0 || theme.aspect_ratio[1] == 0 {
                return Err(ConfigError::Validation(format!(
                    "themes.aspect_ratio values must be non-zero (theme {:?})",
                    theme.key
                )));
            }
        }

        if self.grid.cell_size == 0 {
            return Err(ConfigError::Validation(
                "grid.cell_size must be non-zero".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.grid.random_walk_intensity) {
            return Err(ConfigError::Validation(
                "grid.random_walk_intensity must be 0.0-1.0".into(),
            ));
        }
        Ok(())
    }

    /// Look up a theme by key.
    pub fn theme(&self, key: &str) -> Option<&ThemeConfig> {
        self.themes.iter().find(|t| t.key == key)
    }
}

/// Theme keys and dirs end up as single path components on disk and in URLs.
///
/// `?`, `#` and `%` would end the path or start an escape once the name is
/// joined into a URL, so they are rejected along with separators.
fn is_single_segment(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !name.contains(['/', '\\', '?', '#', '%'])
        && !name.chars().any(char::is_control)
}

/// Listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Socket address the HTTP listener binds to.
    pub addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
        }
    }
}

/// A named image category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThemeConfig {
    /// Theme identifier, also the manifest file stem and the `?theme=` value.
    pub key: String,
    /// Subdirectory of `images/` holding this theme's pictures.
    pub dir: String,
    /// Cell shape as `[width, height]`.
    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: [u32; 2],
}

fn default_aspect_ratio() -> [u32; 2] {
    [1, 1]
}

impl ThemeConfig {
    pub fn new(key: &str, dir: &str, aspect_ratio: [u32; 2]) -> Self {
        Self {
            key: key.to_string(),
            dir: dir.to_string(),
            aspect_ratio,
        }
    }

    /// File name of this theme's manifest inside the data directory.
    pub fn manifest_file_name(&self) -> String {
        format!("{}.txt", self.key)
    }
}

/// Client-side grid settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridConfig {
    /// Base cell edge in pixels; non-square themes keep roughly the same area.
    pub cell_size: u32,
    /// Gap between cells in pixels.
    pub grid_padding: u32,
    /// Drift speed in pixels per animation frame.
    pub move_speed: f64,
    /// How often the drift direction is nudged.
    pub random_walk_interval_ms: u32,
    /// How far each nudge turns the direction (0 = straight line, 1 = erratic).
    pub random_walk_intensity: f64,
    /// Number of recently shown images the client avoids repeating.
    pub used_image_memory: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_size: 150,
            grid_padding: 2,
            move_speed: 0.5,
            random_walk_interval_ms: 600,
            random_walk_intensity: 0.4,
            used_image_memory: 200,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(GalleryConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay, arrays included, replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(dir: &Path) -> Result<GalleryConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match load_raw_config(dir)? {
        Some(overlay) => merge_toml(base, overlay),
        None => base,
    };
    let config: GalleryConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# gridwall configuration
# ======================
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# HTTP listener
# ---------------------------------------------------------------------------
[server]
addr = "127.0.0.1:5000"

# ---------------------------------------------------------------------------
# Themes
# ---------------------------------------------------------------------------
# Each theme reads images from <root>/images/<dir>/ and publishes them in
# <root>/data/<key>.txt. Visitors pick a theme with /?theme=<key>; unknown
# keys fall back to "general".
#
# A [[themes]] list here replaces the default list entirely.

[[themes]]
key = "general"
dir = "general"
aspect_ratio = [1, 1]

[[themes]]
key = "this-sacchan-does-not-exist"
dir = "sacchan"
aspect_ratio = [1, 1]

[[themes]]
key = "this-machu-does-not-exist"
dir = "machu"
aspect_ratio = [4, 3]

# ---------------------------------------------------------------------------
# Grid behavior (browser side)
# ---------------------------------------------------------------------------
[grid]
# Base cell edge in pixels.
cell_size = 150
# Gap between cells in pixels.
grid_padding = 2
# Drift speed in pixels per animation frame.
move_speed = 0.5
# How often the drift direction changes, in milliseconds.
random_walk_interval_ms = 600
# How strongly each change turns the direction (0.0 - 1.0).
random_walk_intensity = 0.4
# Number of recently shown images to avoid repeating.
used_image_memory = 200
"##
}
