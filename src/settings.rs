//! Settings infrastructure for the outline server.
//!
//! Settings live in an `outline.toml` file and select how documents are
//! partitioned:
//!
//! ```toml
//! [outline]
//! mode = "markdown"        # or "tokens"
//! delimiters = "\t\n\r\f"  # used by tokens mode
//! heading = '^ {0,3}(#{1,6})(?:[ \t]+|$)'
//! fence = '^ {0,3}(`{3,}|~{3,})'
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::outline::{Partitioner, DEFAULT_DELIMITERS, DEFAULT_FENCE, DEFAULT_HEADING};

/// Name of the settings file searched for in the workspace.
pub const SETTINGS_FILE: &str = "outline.toml";

/// Root settings structure loaded from `outline.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    /// Outline configuration.
    pub outline: Option<OutlineSettings>,
}

/// How documents are split into outline regions.
#[derive(Debug, Default, Deserialize)]
pub struct OutlineSettings {
    /// Partition mode (default: markdown).
    pub mode: Option<OutlineMode>,

    /// Token delimiter characters for tokens mode (default: tab, newline,
    /// carriage return, form feed).
    pub delimiters: Option<String>,

    /// Heading marker regex for markdown mode. Capture group 1, if present,
    /// gives the heading level by its length.
    pub heading: Option<String>,

    /// Opening code fence regex for markdown mode.
    pub fence: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutlineMode {
    #[default]
    Markdown,
    Tokens,
}

/// Errors raised while reading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid {marker} pattern '{pattern}': {source}")]
    Pattern {
        marker: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Read and parse a settings file.
pub fn read_settings(path: &Path) -> Result<Settings, SettingsError> {
    let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load settings from a settings file.
///
/// Returns default settings if the file doesn't exist or can't be parsed.
pub fn load_settings(path: &Path) -> Settings {
    match read_settings(path) {
        Ok(settings) => settings,
        Err(SettingsError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {
            Settings::default()
        }
        Err(e) => {
            warn!("{e}; using default settings");
            Settings::default()
        }
    }
}

/// Discover `outline.toml` by searching up the directory tree, then direct children.
///
/// Search order:
/// 1. Walk up from `start_dir` to filesystem root
/// 2. If not found, check immediate child directories of `start_dir`
///
/// Returns `(settings, settings_dir)`; when nothing is found, returns
/// `(Settings::default(), start_dir)`.
pub fn discover_settings(start_dir: &Path) -> (Settings, PathBuf) {
    if let Some(dir) = start_dir
        .ancestors()
        .find(|dir| dir.join(SETTINGS_FILE).is_file())
    {
        info!(dir = %dir.display(), "using {SETTINGS_FILE}");
        return (load_settings(&dir.join(SETTINGS_FILE)), dir.to_path_buf());
    }

    let child = std::fs::read_dir(start_dir).ok().and_then(|entries| {
        entries
            .flatten()
            .filter(|entry| entry.file_type().is_ok_and(|ft| ft.is_dir()))
            .map(|entry| entry.path())
            .find(|dir| dir.join(SETTINGS_FILE).is_file())
    });

    match child {
        Some(dir) => {
            info!(dir = %dir.display(), "using {SETTINGS_FILE}");
            (load_settings(&dir.join(SETTINGS_FILE)), dir)
        }
        None => (Settings::default(), start_dir.to_path_buf()),
    }
}

/// Compile a marker pattern, or use the default when none is configured.
fn compile_marker(
    marker: &'static str,
    pattern: Option<&str>,
    default: &Regex,
) -> Result<Regex, SettingsError> {
    match pattern {
        None => Ok(default.clone()),
        Some(pattern) => Regex::new(pattern).map_err(|source| SettingsError::Pattern {
            marker,
            pattern: pattern.to_string(),
            source,
        }),
    }
}

/// Build a partitioner from settings.
///
/// Invalid marker patterns are reported and replaced by the defaults.
pub fn build_partitioner(settings: &Settings) -> Partitioner {
    let Some(outline) = &settings.outline else {
        return Partitioner::default();
    };

    match outline.mode.unwrap_or_default() {
        OutlineMode::Tokens => {
            let delimiters = outline.delimiters.as_deref().unwrap_or(DEFAULT_DELIMITERS);
            Partitioner::tokens(delimiters.chars())
        }
        OutlineMode::Markdown => {
            let heading = compile_marker("heading", outline.heading.as_deref(), &DEFAULT_HEADING)
                .unwrap_or_else(|e| {
                    warn!("{e}; using default");
                    DEFAULT_HEADING.clone()
                });
            let fence = compile_marker("fence", outline.fence.as_deref(), &DEFAULT_FENCE)
                .unwrap_or_else(|e| {
                    warn!("{e}; using default");
                    DEFAULT_FENCE.clone()
                });
            Partitioner::markdown_with(heading, fence)
        }
    }
}
