//! Data model types for the signup sheet.
//!
//! A [`Match`] is one scheduled play slot at a [`Location`] with up to four
//! player names. Matches move one way through their lifecycle: created
//! unplayed, optionally marked played (which freezes the names), and finally
//! cleared out of the active view. Cleared matches stay in storage.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::location::Location;

/// Number of player slots on every match.
pub const PLAYERS_PER_MATCH: usize = 4;

// ── Player slots ────────────────────────────────────────────────────────────

/// One player position on a match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSlot {
    /// Player name; `None` when the slot is empty.
    pub name: Option<String>,
    /// When the name was (last) entered. Backfilled for empty slots once the
    /// match is played.
    pub stamped_at: Option<NaiveDateTime>,
}

impl PlayerSlot {
    pub fn is_filled(&self) -> bool {
        self.name.is_some()
    }
}

/// Error returned when more names are supplied than a match has slots.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("a match holds at most {max} players, got {got}", max = PLAYERS_PER_MATCH)]
pub struct TooManyPlayers {
    pub got: usize,
}

/// The four names requested for a match in one update.
///
/// Names are trimmed; blank names become empty slots. Missing trailing names
/// are empty as well, so an update always describes all four slots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerNames([Option<String>; PLAYERS_PER_MATCH]);

impl PlayerNames {
    /// Build from up to four names, in slot order.
    pub fn new<I, S>(names: I) -> Result<Self, TooManyPlayers>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: Vec<S> = names.into_iter().collect();
        if names.len() > PLAYERS_PER_MATCH {
            return Err(TooManyPlayers { got: names.len() });
        }
        let mut slots: [Option<String>; PLAYERS_PER_MATCH] = Default::default();
        for (slot, name) in slots.iter_mut().zip(&names) {
            *slot = normalize_name(name.as_ref());
        }
        Ok(Self(slots))
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).and_then(|n| n.as_deref())
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&str>> {
        self.0.iter().map(|n| n.as_deref())
    }
}

/// Trim a name; whitespace-only names count as empty.
pub fn normalize_name(name: &str) -> Option<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// ── Match ───────────────────────────────────────────────────────────────────

/// One scheduled slot on the signup sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    /// Storage-assigned identifier; never reused.
    pub id: i64,
    /// Calendar day the slot belongs to.
    pub date: NaiveDate,
    /// Sequence number, unique per (date, location), starting at 1.
    pub match_number: u32,
    pub location: Location,
    pub players: [PlayerSlot; PLAYERS_PER_MATCH],
    pub played: bool,
    pub played_at: Option<NaiveDateTime>,
    pub cleared: bool,
    pub cleared_at: Option<NaiveDateTime>,
}

impl Match {
    /// Still shown on the sheet (not cleared).
    pub fn is_active(&self) -> bool {
        !self.cleared
    }

    /// Player names can still be edited.
    pub fn is_editable(&self) -> bool {
        !self.played && !self.cleared
    }

    /// Number of slots holding a name.
    pub fn filled_slots(&self) -> usize {
        self.players.iter().filter(|p| p.is_filled()).count()
    }

    /// Short human-readable identity, e.g. `#3 2026-10-18 @ Borchard Community Center`.
    pub fn label(&self) -> String {
        format!(
            "#{} {} @ {}",
            self.match_number,
            crate::util::format_date(self.date),
            self.location
        )
    }
}

// ── Scope ───────────────────────────────────────────────────────────────────

/// Which matches a listing or bulk action applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Matches at one location, in creation order.
    At(Location),
    /// Matches at every location, newest date first.
    Everywhere,
}

impl Scope {
    pub fn location(&self) -> Option<Location> {
        match self {
            Self::At(location) => Some(*location),
            Self::Everywhere => None,
        }
    }
}

impl From<Location> for Scope {
    fn from(location: Location) -> Self {
        Self::At(location)
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::At(location) => write!(f, "{}", location),
            Self::Everywhere => write!(f, "all locations"),
        }
    }
}
