//! SQLite persistence layer for the signup sheet.
//!
//! Provides schema creation and migration, the match lifecycle operations,
//! and query APIs backed by SQLite (via rusqlite with bundled feature).

pub mod operations;
pub mod queries;
pub mod schema;

pub use operations::{
    OperationError, PlayOutcome, UpdateOutcome, clear_active, clear_played, create_match,
    mark_played, update_players,
};
pub use queries::{
    LocationStats, find_match, get_match, list_active, list_cleared, match_stats,
};
pub use schema::{
    CURRENT_VERSION, ColumnInfo, SchemaError, inspect_columns, open_database, open_memory,
    schema_version,
};
