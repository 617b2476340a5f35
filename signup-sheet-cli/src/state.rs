//! Application state resolved once at startup and passed to every command.

use std::path::{Path, PathBuf};

use rusqlite::Connection;
use signup_sheet_core::{Location, Scope, StampPolicy};

use crate::CliError;
use crate::settings::{Settings, default_db_path};

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValueSource {
    Flag,
    SettingsFile,
    Default,
}

impl std::fmt::Display for ValueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Flag => write!(f, "command line"),
            Self::SettingsFile => write!(f, "settings file"),
            Self::Default => write!(f, "default"),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct AppState {
    pub selected_location: Option<Location>,
    pub location_source: ValueSource,
    pub db_path: PathBuf,
    pub db_source: ValueSource,
    pub stamp_policy: StampPolicy,
    pub settings_path: PathBuf,
}

impl AppState {
    /// Resolve each value: command-line flag, then settings file, then default.
    pub(crate) fn resolve(
        db_flag: Option<PathBuf>,
        location_flag: Option<Location>,
        settings_path: PathBuf,
        settings: Settings,
    ) -> Self {
        let (db_path, db_source) = match (db_flag, settings.db_path) {
            (Some(p), _) => (p, ValueSource::Flag),
            (None, Some(p)) => (p, ValueSource::SettingsFile),
            (None, None) => (default_db_path(), ValueSource::Default),
        };
        let (selected_location, location_source) = match (location_flag, settings.location) {
            (Some(l), _) => (Some(l), ValueSource::Flag),
            (None, Some(l)) => (Some(l), ValueSource::SettingsFile),
            (None, None) => (None, ValueSource::Default),
        };

        Self {
            selected_location,
            location_source,
            db_path,
            db_source,
            stamp_policy: settings.stamp_policy.unwrap_or_default(),
            settings_path,
        }
    }

    /// The selected location, or an error telling the user how to pick one.
    pub(crate) fn require_location(&self) -> Result<Location, CliError> {
        self.selected_location.ok_or(CliError::NoLocation)
    }

    /// The scope for a listing or bulk action.
    pub(crate) fn scope(&self, everywhere: bool) -> Result<Scope, CliError> {
        if everywhere {
            Ok(Scope::Everywhere)
        } else {
            self.require_location().map(Scope::At)
        }
    }

    /// Open the store for one command, creating its directory if needed.
    ///
    /// The connection is closed when the caller drops it.
    pub(crate) fn open_store(&self) -> Result<Connection, CliError> {
        ensure_parent(&self.db_path)?;
        log::debug!("Opening match store {}", self.db_path.display());
        Ok(signup_sheet_db::open_database(&self.db_path)?)
    }
}

fn ensure_parent(path: &Path) -> Result<(), CliError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|e| {
                CliError::other(format!("Failed to create {}: {}", parent.display(), e))
            })
        }
        _ => Ok(()),
    }
}
