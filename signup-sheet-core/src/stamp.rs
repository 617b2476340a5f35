//! Player timestamp rules.
//!
//! Each player slot remembers when its name was entered. Whether a rename
//! refreshes that time depends on the [`StampPolicy`]; under either policy
//! a stamp is never removed once set.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{PLAYERS_PER_MATCH, PlayerNames, PlayerSlot};

/// How player timestamps react to name edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StampPolicy {
    /// Stamp a name when first entered and again whenever it changes.
    #[default]
    RestampOnRename,
    /// Stamp a name when first entered; later renames keep the original time.
    StampOnce,
}

impl StampPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RestampOnRename => "restamp-on-rename",
            Self::StampOnce => "stamp-once",
        }
    }
}

impl std::fmt::Display for StampPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown stamp policy: '{0}' (expected restamp-on-rename or stamp-once)")]
pub struct StampPolicyParseError(pub String);

impl std::str::FromStr for StampPolicy {
    type Err = StampPolicyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "restamp-on-rename" | "restamp" => Ok(Self::RestampOnRename),
            "stamp-once" | "once" => Ok(Self::StampOnce),
            _ => Err(StampPolicyParseError(s.to_string())),
        }
    }
}

/// Compute the new player slots for a name update.
///
/// `stored` is what is currently persisted; the result carries the requested
/// names and the timestamps they should be saved with.
pub fn apply_names(
    stored: &[PlayerSlot; PLAYERS_PER_MATCH],
    names: &PlayerNames,
    policy: StampPolicy,
    now: NaiveDateTime,
) -> [PlayerSlot; PLAYERS_PER_MATCH] {
    let mut updated: [PlayerSlot; PLAYERS_PER_MATCH] = Default::default();
    for (i, (slot, new_name)) in stored.iter().zip(names.iter()).enumerate() {
        let stamped_at = match new_name {
            Some(_) if slot.stamped_at.is_none() => Some(now),
            Some(name)
                if policy == StampPolicy::RestampOnRename && slot.name.as_deref() != Some(name) =>
            {
                Some(now)
            }
            _ => slot.stamped_at,
        };
        updated[i] = PlayerSlot {
            name: new_name.map(str::to_string),
            stamped_at,
        };
    }
    updated
}
