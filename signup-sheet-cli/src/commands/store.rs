use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::state::AppState;
use crate::{CliError, log_blank};

pub(crate) fn run_stats(state: &AppState) -> Result<(), CliError> {
    let conn = state.open_store()?;
    let stats = signup_sheet_db::match_stats(&conn)?;

    log::info!(
        "{}",
        "Signup Sheet Statistics".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("  Store: {}", state.db_path.display());
    log_blank();
    log::info!(
        "  {:<32} {:>7} {:>7} {:>8}",
        "Location",
        "Active",
        "Played",
        "Cleared"
    );
    for entry in &stats {
        log::info!(
            "  {:<32} {:>7} {:>7} {:>8}",
            entry.location.display_name(),
            entry.active,
            entry.played_active,
            entry.cleared,
        );
    }
    let total: usize = stats.iter().map(|s| s.total()).sum();
    log_blank();
    log::info!("  Total matches recorded: {}", total);

    Ok(())
}

pub(crate) fn run_schema(state: &AppState) -> Result<(), CliError> {
    let conn = state.open_store()?;
    let version = signup_sheet_db::schema_version(&conn)?;
    let columns = signup_sheet_db::inspect_columns(&conn, signup_sheet_db::schema::MATCHES_TABLE)?;

    log::info!(
        "{}",
        "Match Store Schema".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("  Store:   {}", state.db_path.display());
    log::info!(
        "  Version: {} (supported: {})",
        version,
        signup_sheet_db::CURRENT_VERSION
    );
    log_blank();
    for column in &columns {
        let mut flags = Vec::new();
        if column.primary_key {
            flags.push("primary key");
        }
        if column.not_null {
            flags.push("not null");
        }
        log::info!(
            "  {:<14} {:<8} {}",
            column.name,
            column.declared_type,
            flags.join(", ").if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    Ok(())
}

/// Delete the match store file.
pub(crate) fn run_reset(state: &AppState, confirm: bool) -> Result<(), CliError> {
    let db_path = &state.db_path;

    if !confirm {
        log::warn!(
            "This will permanently delete every match, including cleared ones, at:\n  {}",
            db_path.display(),
        );
        log::info!("Re-run with --confirm to proceed:");
        log::info!("  signup-sheet reset --confirm");
        return Ok(());
    }

    if !db_path.exists() {
        log::info!("No match store found at {}", db_path.display());
        log::info!("Nothing to reset.");
        return Ok(());
    }

    std::fs::remove_file(db_path)
        .map_err(|e| CliError::other(format!("Failed to delete {}: {}", db_path.display(), e)))?;
    // WAL side files; absent after a clean close.
    for suffix in ["-wal", "-shm"] {
        let mut side = db_path.as_os_str().to_owned();
        side.push(suffix);
        match std::fs::remove_file(&side) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => log::warn!("Could not delete {}: {}", side.to_string_lossy(), e),
        }
    }

    log::info!(
        "{}",
        "Match store deleted.".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("  Path: {}", db_path.display());
    Ok(())
}
