use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The venues a signup sheet can be kept for.
///
/// Locations scope match-number sequencing and the active list. The full
/// display name is what gets persisted, so the order and spelling here are
/// part of the on-disk format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Location {
    ThousandOaks,
    Borchard,
    DosVientos,
    SycamoreCanyon,
}

/// All locations in display order.
const ALL_LOCATIONS: &[Location] = &[
    Location::ThousandOaks,
    Location::Borchard,
    Location::DosVientos,
    Location::SycamoreCanyon,
];

impl Location {
    /// Canonical short name used for CLI arguments and settings.
    pub fn short_name(&self) -> &'static str {
        match self {
            Self::ThousandOaks => "thousand-oaks",
            Self::Borchard => "borchard",
            Self::DosVientos => "dos-vientos",
            Self::SycamoreCanyon => "sycamore-canyon",
        }
    }

    /// Full venue name. This is the value stored in the `location` column.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::ThousandOaks => "Thousand Oaks Community Center",
            Self::Borchard => "Borchard Community Center",
            Self::DosVientos => "Dos Vientos Community Center",
            Self::SycamoreCanyon => "Sycamore Canyon School Gym",
        }
    }

    /// All accepted names for this location (case-insensitive matching).
    ///
    /// Includes the canonical short name; the display name is always
    /// accepted in addition to these.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::ThousandOaks => &["thousand-oaks", "thousand oaks", "to", "tocc"],
            Self::Borchard => &["borchard", "bcc"],
            Self::DosVientos => &["dos-vientos", "dos vientos", "dv", "dvcc"],
            Self::SycamoreCanyon => &["sycamore-canyon", "sycamore canyon", "sycamore", "scs"],
        }
    }

    pub fn all() -> &'static [Location] {
        ALL_LOCATIONS
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Error returned when a string cannot be parsed into a `Location`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown location: '{0}'")]
pub struct LocationParseError(pub String);

impl std::str::FromStr for Location {
    type Err = LocationParseError;

    /// Parse a location from its display name, short name, or any alias
    /// (case-insensitive, surrounding whitespace ignored).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        for &location in ALL_LOCATIONS {
            if location.display_name().to_lowercase() == lower {
                return Ok(location);
            }
            if location.aliases().iter().any(|alias| *alias == lower) {
                return Ok(location);
            }
        }
        Err(LocationParseError(s.to_string()))
    }
}

impl From<Location> for String {
    fn from(location: Location) -> Self {
        location.display_name().to_string()
    }
}

impl TryFrom<String> for Location {
    type Error = LocationParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
#[path = "tests/location_tests.rs"]
mod tests;
