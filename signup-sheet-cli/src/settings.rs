//! Persistent settings (store path, selected location, stamp policy).
//!
//! The settings file is `~/.config/signup-sheet/settings.toml`:
//!
//! ```toml
//! [store]
//! path = "/home/me/signup/matches.db"
//!
//! [session]
//! location = "borchard"
//!
//! [players]
//! stamp_policy = "restamp-on-rename"
//! ```
//!
//! Writes go through `toml::Value` so keys this tool doesn't know about are
//! preserved.

use std::io;
use std::path::{Path, PathBuf};

use signup_sheet_core::{Location, StampPolicy};

/// Canonical path to the settings file: `~/.config/signup-sheet/settings.toml`.
pub(crate) fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("signup-sheet").join("settings.toml")
}

/// Default store location: `~/.local/share/signup-sheet/matches.db` (or the
/// platform equivalent), falling back to `matches.db` in the working directory.
pub(crate) fn default_db_path() -> PathBuf {
    match dirs::data_dir() {
        Some(dir) => dir.join("signup-sheet").join("matches.db"),
        None => PathBuf::from("matches.db"),
    }
}

/// Values read from the settings file. Missing or unreadable entries are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Settings {
    pub db_path: Option<PathBuf>,
    pub location: Option<Location>,
    pub stamp_policy: Option<StampPolicy>,
}

impl Settings {
    /// Load settings from `path`. A missing file yields empty settings;
    /// malformed values are reported and skipped.
    pub(crate) fn load_from(path: &Path) -> Self {
        let Ok(contents) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        let doc: toml::Value = match contents.parse() {
            Ok(doc) => doc,
            Err(e) => {
                log::warn!("Ignoring unreadable settings file {}: {}", path.display(), e);
                return Self::default();
            }
        };

        let db_path = string_at(&doc, "store", "path")
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);

        let location = string_at(&doc, "session", "location").and_then(|s| match s.parse() {
            Ok(location) => Some(location),
            Err(e) => {
                log::warn!("Ignoring saved location: {}", e);
                None
            }
        });

        let stamp_policy =
            string_at(&doc, "players", "stamp_policy").and_then(|s| match s.parse() {
                Ok(policy) => Some(policy),
                Err(e) => {
                    log::warn!("Ignoring saved stamp policy: {}", e);
                    None
                }
            });

        Self {
            db_path,
            location,
            stamp_policy,
        }
    }
}

fn string_at<'a>(doc: &'a toml::Value, table: &str, key: &str) -> Option<&'a str> {
    doc.get(table)?.get(key)?.as_str()
}

/// Save (or clear) the selected location.
pub(crate) fn save_location(path: &Path, location: Option<Location>) -> io::Result<()> {
    save_value(
        path,
        "session",
        "location",
        location.map(|l| toml::Value::String(l.short_name().to_string())),
    )
}

/// Set or remove `[table] key` in the settings file, leaving everything else
/// as it was.
fn save_value(path: &Path, table: &str, key: &str, value: Option<toml::Value>) -> io::Result<()> {
    let mut doc: toml::Value = if let Ok(contents) = std::fs::read_to_string(path) {
        contents
            .parse()
            .unwrap_or_else(|_| toml::Value::Table(Default::default()))
    } else {
        toml::Value::Table(Default::default())
    };

    let root = doc
        .as_table_mut()
        .ok_or_else(|| io::Error::other("settings.toml root is not a table"))?;
    let section = root
        .entry(table)
        .or_insert_with(|| toml::Value::Table(Default::default()));
    let section = section
        .as_table_mut()
        .ok_or_else(|| io::Error::other(format!("[{}] is not a table", table)))?;

    match value {
        Some(v) => {
            section.insert(key.to_string(), v);
        }
        None => {
            section.remove(key);
        }
    }

    // Write atomically
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let serialized = toml::to_string_pretty(&doc).map_err(io::Error::other)?;
    let tmp = path.with_extension("toml.tmp");
    std::fs::write(&tmp, &serialized)?;
    std::fs::rename(&tmp, path)?;

    Ok(())
}

/// Load the full settings file as a pretty-printed TOML string for display.
pub(crate) fn load_settings_string(path: &Path) -> Option<String> {
    let contents = std::fs::read_to_string(path).ok()?;
    let doc: toml::Value = contents.parse().ok()?;
    toml::to_string_pretty(&doc).ok()
}
