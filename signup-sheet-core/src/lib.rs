//! Domain types for the signup sheet: venues, matches, player slots, and
//! the timestamp rules that govern them.

pub mod location;
pub mod stamp;
pub mod types;
pub mod util;

pub use location::{Location, LocationParseError};
pub use stamp::{StampPolicy, StampPolicyParseError, apply_names};
pub use types::{Match, PLAYERS_PER_MATCH, PlayerNames, PlayerSlot, Scope, TooManyPlayers};
