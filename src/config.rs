//! Comment configuration module.
//!
//! Handles loading, validating, and merging `comments.toml`. Stock defaults
//! are overridden by an optional file in the content root.
//!
//! ## Config File Location
//!
//! ```text
//! site/                        # Content root
//! ├── comments.toml            # Optional, overrides stock defaults
//! └── comments/                # Base directory (see `comments_path`)
//!     └── hello-world/
//!         └── 20230101120000_aaa.json
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! comments_path = "comments"   # Base directory, relative to the content root
//! extension = "json"           # Comment file extension (no leading dot)
//!
//! [render]
//! date_format = "[year]-[month]-[day] [hour]:[minute]"
//! markdown = true              # Render comment text as Markdown
//! ```
//!
//! Config files are sparse: override just the values you want. Unknown keys
//! are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILE: &str = "comments.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Comment configuration loaded from `comments.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CommentsConfig {
    /// Base directory holding one subdirectory per post slug. Relative paths
    /// are resolved against the content root.
    pub comments_path: String,
    /// Extension of comment files, compared case-insensitively.
    pub extension: String,
    /// Settings for the HTML fragment renderer.
    pub render: RenderConfig,
}

impl Default for CommentsConfig {
    fn default() -> Self {
        Self {
            comments_path: "comments".to_string(),
            extension: "json".to_string(),
            render: RenderConfig::default(),
        }
    }
}

impl CommentsConfig {
    /// Validate config values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.comments_path.trim().is_empty() {
            return Err(ConfigError::Validation(
                "comments_path must not be empty".into(),
            ));
        }
        if self.extension.is_empty() || self.extension.contains('.') {
            return Err(ConfigError::Validation(
                "extension must be non-empty and without a dot".into(),
            ));
        }
        if let Err(e) = time::format_description::parse_borrowed::<1>(&self.render.date_format) {
            return Err(ConfigError::Validation(format!(
                "render.date_format is not a valid format description: {e}"
            )));
        }
        Ok(())
    }

    /// Resolve the base directory against the content root.
    pub fn comments_dir(&self, content_root: &Path) -> PathBuf {
        let path = Path::new(&self.comments_path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            content_root.join(path)
        }
    }
}

/// HTML rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// `time` format description for the visible timestamp.
    pub date_format: String,
    /// Treat comment text as Markdown. Raw HTML in comments is always escaped.
    pub markdown: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            date_format: "[year]-[month]-[day] [hour]:[minute]".to_string(),
            markdown: true,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(CommentsConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
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

/// Load `comments.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<CommentsConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: CommentsConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `comments.toml` in the content root.
pub fn load_config(content_root: &Path) -> Result<CommentsConfig, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(content_root)?)
}

/// Returns a fully-commented stock `comments.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Simple Comments Configuration
# =============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# Base directory with one subdirectory per post slug:
#   comments/<slug>/<YYYYMMDDHHMMSS>_<author-hash>.json
# Relative paths are resolved against the content root.
comments_path = "comments"

# Extension of comment files (no leading dot, case-insensitive).
extension = "json"

# ---------------------------------------------------------------------------
# HTML rendering
# ---------------------------------------------------------------------------
[render]
# Visible timestamp format, as a `time` crate format description.
# The machine-readable <time datetime> attribute is always ISO-8601.
date_format = "[year]-[month]-[day] [hour]:[minute]"

# Render comment text as Markdown. Raw HTML inside comments is escaped
# either way. Set to false to show plain text paragraphs.
markdown = true
"##
}
