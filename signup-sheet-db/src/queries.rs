//! Read queries for the signup sheet.
//!
//! Provides lookup by id and by (date, number, location), the active and
//! archived listings, and per-location statistics.

use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{Connection, Row, params};

use signup_sheet_core::util::{format_date, parse_date, parse_timestamp};
use signup_sheet_core::{Location, Match, PlayerSlot, Scope};

use crate::operations::OperationError;

const MATCH_COLUMNS: &str = "id, match_date, match_number, location,
    player1, player1_at, player2, player2_at,
    player3, player3_at, player4, player4_at,
    played, played_at, cleared, cleared_at";

// ── Lookups ─────────────────────────────────────────────────────────────────

/// Fetch a match by id.
pub fn get_match(conn: &Connection, id: i64) -> Result<Match, OperationError> {
    let sql = format!("SELECT {MATCH_COLUMNS} FROM matches WHERE id = ?1");
    let result = conn.query_row(&sql, params![id], row_to_match);
    match result {
        Ok(m) => Ok(m),
        Err(rusqlite::Error::QueryReturnedNoRows) => {
            Err(OperationError::NotFound(format!("id {}", id)))
        }
        Err(e) => Err(e.into()),
    }
}

/// Find the match numbered `match_number` on `date` at `location`.
///
/// The triple is unique in a current store; should duplicates exist anyway,
/// the earliest-created one is returned.
pub fn find_match(
    conn: &Connection,
    date: NaiveDate,
    match_number: u32,
    location: Location,
) -> Result<Option<Match>, OperationError> {
    let sql = format!(
        "SELECT {MATCH_COLUMNS} FROM matches
         WHERE match_date = ?1 AND match_number = ?2 AND location = ?3
         ORDER BY id LIMIT 1"
    );
    let result = conn.query_row(
        &sql,
        params![format_date(date), match_number, location.display_name()],
        row_to_match,
    );
    match result {
        Ok(m) => Ok(Some(m)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

// ── Listings ────────────────────────────────────────────────────────────────

/// List matches that have not been cleared.
///
/// At a single location the list is in creation order; across all locations
/// it is newest date first, then creation order.
pub fn list_active(conn: &Connection, scope: Scope) -> Result<Vec<Match>, OperationError> {
    match scope {
        Scope::At(location) => {
            let sql = format!(
                "SELECT {MATCH_COLUMNS} FROM matches
                 WHERE cleared = 0 AND location = ?1
                 ORDER BY id"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params![location.display_name()], row_to_match)?;
            rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
        }
        Scope::Everywhere => {
            let sql = format!(
                "SELECT {MATCH_COLUMNS} FROM matches
                 WHERE cleared = 0
                 ORDER BY match_date DESC, id"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map([], row_to_match)?;
            rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
        }
    }
}

/// List cleared matches, most recently cleared first.
pub fn list_cleared(
    conn: &Connection,
    scope: Scope,
    limit: usize,
) -> Result<Vec<Match>, OperationError> {
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let sql = format!(
        "SELECT {MATCH_COLUMNS} FROM matches
         WHERE cleared = 1 AND (?1 IS NULL OR location = ?1)
         ORDER BY cleared_at DESC, id DESC
         LIMIT ?2"
    );
    let mut stmt = conn.prepare(&sql)?;
    let location = scope.location().map(|l| l.display_name());
    let rows = stmt.query_map(params![location, limit], row_to_match)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

// ── Statistics ──────────────────────────────────────────────────────────────

/// Match counts for one location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationStats {
    pub location: Location,
    /// Not cleared.
    pub active: usize,
    /// Played and not yet cleared.
    pub played_active: usize,
    pub cleared: usize,
}

impl LocationStats {
    pub fn total(&self) -> usize {
        self.active + self.cleared
    }
}

/// Per-location counts, one entry for every known location in display order.
pub fn match_stats(conn: &Connection) -> Result<Vec<LocationStats>, OperationError> {
    let mut stats: Vec<LocationStats> = Location::all()
        .iter()
        .map(|&location| LocationStats {
            location,
            active: 0,
            played_active: 0,
            cleared: 0,
        })
        .collect();

    let mut stmt = conn.prepare(
        "SELECT location,
                SUM(cleared = 0),
                SUM(cleared = 0 AND played = 1),
                SUM(cleared = 1)
         FROM matches GROUP BY location",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok((
            parse_location(row, 0)?,
            row.get::<_, i64>(1)?,
            row.get::<_, i64>(2)?,
            row.get::<_, i64>(3)?,
        ))
    })?;

    for row in rows {
        let (location, active, played_active, cleared) = row?;
        if let Some(entry) = stats.iter_mut().find(|s| s.location == location) {
            entry.active = active as usize;
            entry.played_active = played_active as usize;
            entry.cleared = cleared as usize;
        }
    }

    Ok(stats)
}

// ── Row Mapping ─────────────────────────────────────────────────────────────

fn row_to_match(row: &Row<'_>) -> rusqlite::Result<Match> {
    let date_text: String = row.get(1)?;
    let date = parse_date(&date_text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e)))?;

    let mut players: [PlayerSlot; 4] = Default::default();
    for (i, slot) in players.iter_mut().enumerate() {
        let name_idx = 4 + i * 2;
        *slot = PlayerSlot {
            name: row.get(name_idx)?,
            stamped_at: parse_optional_timestamp(row, name_idx + 1)?,
        };
    }

    Ok(Match {
        id: row.get(0)?,
        date,
        match_number: row.get(2)?,
        location: parse_location(row, 3)?,
        players,
        played: row.get(12)?,
        played_at: parse_optional_timestamp(row, 13)?,
        cleared: row.get(14)?,
        cleared_at: parse_optional_timestamp(row, 15)?,
    })
}

fn parse_location(row: &Row<'_>, idx: usize) -> rusqlite::Result<Location> {
    let text: String = row.get(idx)?;
    text.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_optional_timestamp(
    row: &Row<'_>,
    idx: usize,
) -> rusqlite::Result<Option<chrono::NaiveDateTime>> {
    let text: Option<String> = row.get(idx)?;
    text.map(|t| {
        parse_timestamp(&t)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
    })
    .transpose()
}
