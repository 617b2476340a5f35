//! Lifecycle operations: creating matches, editing players, marking played,
//! and clearing.
//!
//! Every operation is a single unit of work against one connection. Callers
//! pass `now` explicitly so stamping is deterministic under test.

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{Connection, ErrorCode, params};
use thiserror::Error;

use signup_sheet_core::util::{format_date, format_timestamp};
use signup_sheet_core::{Location, Match, PlayerNames, Scope, StampPolicy, apply_names};

use crate::queries::get_match;
use crate::schema::SchemaError;

#[derive(Debug, Error)]
pub enum OperationError {
    #[error("SQLite error: {0}")]
    Sqlite(rusqlite::Error),
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(rusqlite::Error),
    #[error("Match not found: {0}")]
    NotFound(String),
    #[error("Match #{match_number} already exists on {date} at {location}")]
    Conflict {
        date: NaiveDate,
        location: Location,
        match_number: u32,
    },
    #[error("Schema error: {0}")]
    Schema(SchemaError),
}

impl From<rusqlite::Error> for OperationError {
    fn from(err: rusqlite::Error) -> Self {
        match err.sqlite_error_code() {
            Some(
                ErrorCode::DatabaseBusy
                | ErrorCode::DatabaseLocked
                | ErrorCode::CannotOpen
                | ErrorCode::ReadOnly
                | ErrorCode::PermissionDenied
                | ErrorCode::NotADatabase,
            ) => Self::StorageUnavailable(err),
            _ => Self::Sqlite(err),
        }
    }
}

impl From<SchemaError> for OperationError {
    fn from(err: SchemaError) -> Self {
        match err {
            SchemaError::Sqlite(e) => e.into(),
            other => Self::Schema(other),
        }
    }
}

/// Result of a player-name update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated,
    /// The match was already played; nothing changed.
    Frozen,
    /// The match was cleared out of the active sheet; nothing changed.
    Archived,
}

/// Result of marking a match played.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    Played,
    /// The match was played earlier; nothing changed.
    AlreadyPlayed,
    /// The match was cleared before it was played; nothing changed.
    Archived,
}

// ── Creation ────────────────────────────────────────────────────────────────

/// Add a match at `location` on `date` with the next free match number.
pub fn create_match(
    conn: &Connection,
    location: Location,
    date: NaiveDate,
) -> Result<Match, OperationError> {
    let date_text = format_date(date);
    let tx = conn.unchecked_transaction()?;

    let match_number: u32 = tx.query_row(
        "SELECT COALESCE(MAX(match_number), 0) + 1 FROM matches
         WHERE match_date = ?1 AND location = ?2",
        params![date_text, location.display_name()],
        |row| row.get(0),
    )?;

    let inserted = tx.execute(
        "INSERT INTO matches (match_date, match_number, location, played, cleared)
         VALUES (?1, ?2, ?3, 0, 0)",
        params![date_text, match_number, location.display_name()],
    );
    match inserted {
        Ok(_) => {}
        Err(e) if e.sqlite_error_code() == Some(ErrorCode::ConstraintViolation) => {
            return Err(OperationError::Conflict {
                date,
                location,
                match_number,
            });
        }
        Err(e) => return Err(e.into()),
    }
    let id = tx.last_insert_rowid();
    tx.commit()?;

    log::debug!(
        "Created match #{} (id {}) on {} at {}",
        match_number,
        id,
        date_text,
        location
    );
    get_match(conn, id)
}

// ── Player edits ────────────────────────────────────────────────────────────

/// Overwrite the four player names of an unplayed match.
///
/// Names are stamped according to `policy`. A played match is left untouched
/// and reported as [`UpdateOutcome::Frozen`]; a cleared one as
/// [`UpdateOutcome::Archived`].
pub fn update_players(
    conn: &Connection,
    id: i64,
    names: &PlayerNames,
    policy: StampPolicy,
    now: NaiveDateTime,
) -> Result<UpdateOutcome, OperationError> {
    let tx = conn.unchecked_transaction()?;
    let current = get_match(&tx, id)?;
    if current.played {
        log::debug!("Ignoring player edit on played match {}", current.label());
        return Ok(UpdateOutcome::Frozen);
    }
    if current.cleared {
        log::debug!("Ignoring player edit on cleared match {}", current.label());
        return Ok(UpdateOutcome::Archived);
    }

    let slots = apply_names(&current.players, names, policy, now);
    let stamp = |i: usize| slots[i].stamped_at.map(format_timestamp);
    tx.execute(
        "UPDATE matches SET
             player1 = ?1, player1_at = ?2,
             player2 = ?3, player2_at = ?4,
             player3 = ?5, player3_at = ?6,
             player4 = ?7, player4_at = ?8
         WHERE id = ?9 AND played = 0 AND cleared = 0",
        params![
            slots[0].name,
            stamp(0),
            slots[1].name,
            stamp(1),
            slots[2].name,
            stamp(2),
            slots[3].name,
            stamp(3),
            id,
        ],
    )?;
    tx.commit()?;

    log::debug!("Updated players on {}", current.label());
    Ok(UpdateOutcome::Updated)
}

// ── Played ──────────────────────────────────────────────────────────────────

/// Mark a match played.
///
/// Stamps `played_at` and backfills every empty player stamp with the same
/// time. Existing stamps are never overwritten, so repeating the call leaves
/// the stored record unchanged. A match cleared before play stays unplayed.
pub fn mark_played(
    conn: &Connection,
    id: i64,
    now: NaiveDateTime,
) -> Result<PlayOutcome, OperationError> {
    let changed = conn.execute(
        "UPDATE matches SET
             played = 1,
             played_at = COALESCE(played_at, ?1),
             player1_at = COALESCE(player1_at, ?1),
             player2_at = COALESCE(player2_at, ?1),
             player3_at = COALESCE(player3_at, ?1),
             player4_at = COALESCE(player4_at, ?1)
         WHERE id = ?2 AND played = 0 AND cleared = 0",
        params![format_timestamp(now), id],
    )?;

    if changed > 0 {
        log::debug!("Marked match {} played", id);
        return Ok(PlayOutcome::Played);
    }

    let current = get_match(conn, id)?;
    if current.played {
        Ok(PlayOutcome::AlreadyPlayed)
    } else {
        log::debug!("Ignoring mark played on cleared match {}", current.label());
        Ok(PlayOutcome::Archived)
    }
}

// ── Clearing ────────────────────────────────────────────────────────────────

/// Clear every active match in `scope`. Returns how many were cleared.
pub fn clear_active(
    conn: &Connection,
    scope: Scope,
    now: NaiveDateTime,
) -> Result<usize, OperationError> {
    let now = format_timestamp(now);
    let cleared = match scope {
        Scope::At(location) => conn.execute(
            "UPDATE matches SET cleared = 1, cleared_at = COALESCE(cleared_at, ?1)
             WHERE cleared = 0 AND location = ?2",
            params![now, location.display_name()],
        )?,
        Scope::Everywhere => conn.execute(
            "UPDATE matches SET cleared = 1, cleared_at = COALESCE(cleared_at, ?1)
             WHERE cleared = 0",
            params![now],
        )?,
    };
    log::debug!("Cleared {} active match(es) at {}", cleared, scope);
    Ok(cleared)
}

/// Clear every played match that is still active, at every location.
pub fn clear_played(conn: &Connection, now: NaiveDateTime) -> Result<usize, OperationError> {
    let cleared = conn.execute(
        "UPDATE matches SET cleared = 1, cleared_at = COALESCE(cleared_at, ?1)
         WHERE played = 1 AND cleared = 0",
        params![format_timestamp(now)],
    )?;
    log::debug!("Cleared {} played match(es)", cleared);
    Ok(cleared)
}
