//! SQLite schema creation and migration.
//!
//! The schema version lives in its own table and is checked once when a
//! store is opened. A store written by the earlier desktop tool (a bare
//! `Matches` table with no version table) is adopted in place: its rows are
//! copied into the current layout inside one transaction. Anything that
//! cannot be adopted or migrated is reported as an error; data is never
//! dropped to make the schema fit.

use rusqlite::{Connection, params};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Migration error: expected version {expected}, found {found}")]
    VersionMismatch { expected: i32, found: i32 },
    #[error("Incompatible table '{table}': {}", .problems.join("; "))]
    Incompatible { table: String, problems: Vec<String> },
    #[error(
        "Duplicate match number {match_number} on {date} at {location}; resolve it before upgrading"
    )]
    DuplicateMatchNumbers {
        date: String,
        location: String,
        match_number: i64,
    },
}

/// Current schema version. Increment when adding migrations.
pub const CURRENT_VERSION: i32 = 2;

/// Name of the match table. SQLite table names are case-insensitive, so this
/// is also the name the legacy `Matches` table is found under.
pub const MATCHES_TABLE: &str = "matches";

/// Columns the current layout must have, with the declared type required for
/// key columns.
const REQUIRED_COLUMNS: &[(&str, Option<&str>)] = &[
    ("id", Some("INTEGER")),
    ("match_date", Some("DATE")),
    ("match_number", None),
    ("location", None),
    ("player1", None),
    ("player1_at", None),
    ("player2", None),
    ("player2_at", None),
    ("player3", None),
    ("player3_at", None),
    ("player4", None),
    ("player4_at", None),
    ("played", None),
    ("played_at", None),
    ("cleared", None),
    ("cleared_at", None),
];

/// Columns of the legacy desktop-tool table.
const LEGACY_COLUMNS: &[(&str, Option<&str>)] = &[
    ("matchid", Some("INTEGER")),
    ("date", Some("DATE")),
    ("matchnumber", None),
    ("player1", None),
    ("player1timestamp", None),
    ("player2", None),
    ("player2timestamp", None),
    ("player3", None),
    ("player3timestamp", None),
    ("player4", None),
    ("player4timestamp", None),
    ("played", None),
    ("playedtimestamp", None),
    ("cleared", None),
    ("clearedtimestamp", None),
    ("location", None),
];

/// One row of `PRAGMA table_info`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    pub declared_type: String,
    pub not_null: bool,
    pub primary_key: bool,
}

/// Create all tables and indexes if they don't exist.
///
/// Idempotent: safe to call on an existing database.
pub fn create_schema(conn: &Connection) -> Result<(), SchemaError> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(SCHEMA_VERSION_SQL)?;
    tx.execute_batch(MATCHES_V1_SQL)?;
    tx.execute_batch(INDEXES_V2_SQL)?;
    set_schema_version(&tx, CURRENT_VERSION)?;
    tx.commit()?;
    Ok(())
}

/// Open or create a signup-sheet store at the given path.
pub fn open_database(path: &std::path::Path) -> Result<Connection, SchemaError> {
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    ensure_schema(&conn)?;
    Ok(conn)
}

/// Open an in-memory database with the full schema. Useful for testing.
pub fn open_memory() -> Result<Connection, SchemaError> {
    let conn = Connection::open_in_memory()?;
    create_schema(&conn)?;
    Ok(conn)
}

/// Bring the schema up to `CURRENT_VERSION` and verify the result.
///
/// Running this against a current schema changes nothing.
pub fn ensure_schema(conn: &Connection) -> Result<(), SchemaError> {
    let version = schema_version(conn)?;
    if version == 0 {
        if table_exists(conn, MATCHES_TABLE)? {
            adopt_unversioned(conn)?;
        } else {
            log::info!("Creating signup sheet schema (version {})", CURRENT_VERSION);
            create_schema(conn)?;
        }
    } else if version != CURRENT_VERSION {
        migrate(conn, version)?;
    }

    verify_schema(conn)
}

/// Get the current schema version, or 0 if no schema exists.
pub fn schema_version(conn: &Connection) -> Result<i32, SchemaError> {
    if !table_exists(conn, "schema_version")? {
        return Ok(0);
    }

    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

/// Column layout of `table` as SQLite reports it. Empty if the table is absent.
pub fn inspect_columns(conn: &Connection, table: &str) -> Result<Vec<ColumnInfo>, SchemaError> {
    let mut stmt =
        conn.prepare("SELECT name, type, \"notnull\", pk FROM pragma_table_info(?1) ORDER BY cid")?;
    let rows = stmt.query_map(params![table], |row| {
        Ok(ColumnInfo {
            name: row.get(0)?,
            declared_type: row.get(1)?,
            not_null: row.get(2)?,
            primary_key: row.get::<_, i64>(3)? > 0,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Check that the match table has every required column and that key
/// columns carry the expected declared type.
pub fn verify_schema(conn: &Connection) -> Result<(), SchemaError> {
    let columns = inspect_columns(conn, MATCHES_TABLE)?;
    let problems = layout_problems(&columns, REQUIRED_COLUMNS);
    if problems.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::Incompatible {
            table: MATCHES_TABLE.to_string(),
            problems,
        })
    }
}

fn table_exists(conn: &Connection, name: &str) -> Result<bool, SchemaError> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name = ?1 COLLATE NOCASE)",
        params![name],
        |row| row.get(0),
    )?;
    Ok(exists)
}

/// Describe every way `columns` falls short of `expected`.
fn layout_problems(columns: &[ColumnInfo], expected: &[(&str, Option<&str>)]) -> Vec<String> {
    let mut problems = Vec::new();
    for (name, required_type) in expected {
        match columns.iter().find(|c| c.name.eq_ignore_ascii_case(name)) {
            None => problems.push(format!("missing column '{}'", name)),
            Some(column) => {
                let Some(ty) = required_type else { continue };
                if !column.declared_type.eq_ignore_ascii_case(ty) {
                    problems.push(format!(
                        "column '{}' is declared {}, expected {}",
                        column.name,
                        if column.declared_type.is_empty() {
                            "without a type"
                        } else {
                            column.declared_type.as_str()
                        },
                        ty
                    ));
                }
            }
        }
    }
    problems
}

/// Record a schema version (once).
fn set_schema_version(conn: &Connection, version: i32) -> Result<(), SchemaError> {
    conn.execute(
        "INSERT INTO schema_version (version)
         SELECT ?1 WHERE NOT EXISTS (SELECT 1 FROM schema_version WHERE version = ?1)",
        params![version],
    )?;
    Ok(())
}

/// Handle a store that has a match table but no version table.
///
/// Either the current layout with its version table lost, or the legacy
/// desktop-tool layout, which is copied over.
fn adopt_unversioned(conn: &Connection) -> Result<(), SchemaError> {
    let columns = inspect_columns(conn, MATCHES_TABLE)?;

    if layout_problems(&columns, REQUIRED_COLUMNS).is_empty() {
        log::info!("Recording missing schema version for existing match table");
        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(SCHEMA_VERSION_SQL)?;
        set_schema_version(&tx, 1)?;
        tx.commit()?;
        return migrate(conn, 1);
    }

    let problems = layout_problems(&columns, LEGACY_COLUMNS);
    if !problems.is_empty() {
        return Err(SchemaError::Incompatible {
            table: MATCHES_TABLE.to_string(),
            problems,
        });
    }

    log::info!("Adopting legacy match table into schema version {}", CURRENT_VERSION);
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch("ALTER TABLE Matches RENAME TO legacy_matches;")?;
    tx.execute_batch(SCHEMA_VERSION_SQL)?;
    tx.execute_batch(MATCHES_V1_SQL)?;
    let copied = tx.execute(COPY_LEGACY_SQL, [])?;
    tx.execute_batch("DROP TABLE legacy_matches;")?;
    check_unique_match_numbers(&tx)?;
    tx.execute_batch(INDEXES_V2_SQL)?;
    set_schema_version(&tx, CURRENT_VERSION)?;
    tx.commit()?;
    log::info!("Copied {} legacy match record(s)", copied);

    Ok(())
}

/// Fail if any (date, location) scope holds the same match number twice.
fn check_unique_match_numbers(conn: &Connection) -> Result<(), SchemaError> {
    let duplicate = conn.query_row(
        "SELECT match_date, location, match_number FROM matches
         GROUP BY match_date, location, match_number
         HAVING COUNT(*) > 1
         ORDER BY match_date, location, match_number
         LIMIT 1",
        [],
        |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
    );
    match duplicate {
        Ok((date, location, match_number)) => Err(SchemaError::DuplicateMatchNumbers {
            date,
            location,
            match_number,
        }),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Run migrations from `from_version` up to `CURRENT_VERSION`.
fn migrate(conn: &Connection, from_version: i32) -> Result<(), SchemaError> {
    if from_version > CURRENT_VERSION {
        return Err(SchemaError::VersionMismatch {
            expected: CURRENT_VERSION,
            found: from_version,
        });
    }

    let mut version = from_version;
    while version < CURRENT_VERSION {
        let tx = conn.unchecked_transaction()?;
        match version {
            1 => {
                check_unique_match_numbers(&tx)?;
                tx.execute_batch(INDEXES_V2_SQL)?;
            }
            _ => {}
        }
        version += 1;
        set_schema_version(&tx, version)?;
        tx.commit()?;
        log::info!("Migrated signup sheet schema to version {}", version);
    }

    Ok(())
}

const SCHEMA_VERSION_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;

// Version 1: the match table.
const MATCHES_V1_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS matches (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    match_date DATE NOT NULL,
    match_number INTEGER NOT NULL,
    location TEXT NOT NULL,
    player1 TEXT,
    player1_at TEXT,
    player2 TEXT,
    player2_at TEXT,
    player3 TEXT,
    player3_at TEXT,
    player4 TEXT,
    player4_at TEXT,
    played INTEGER NOT NULL DEFAULT 0,
    played_at TEXT,
    cleared INTEGER NOT NULL DEFAULT 0,
    cleared_at TEXT
);
"#;

// Version 2: sequence numbers are unique per scope; active rows are indexed.
const INDEXES_V2_SQL: &str = r#"
CREATE UNIQUE INDEX IF NOT EXISTS idx_matches_scope_number
    ON matches(match_date, location, match_number);
CREATE INDEX IF NOT EXISTS idx_matches_active
    ON matches(location, id) WHERE cleared = 0;
"#;

const COPY_LEGACY_SQL: &str = r#"
INSERT INTO matches (
    id, match_date, match_number, location,
    player1, player1_at, player2, player2_at,
    player3, player3_at, player4, player4_at,
    played, played_at, cleared, cleared_at
)
SELECT
    matchid, COALESCE(date(date), date), matchnumber, Location,
    NULLIF(TRIM(player1), ''), NULLIF(player1timestamp, ''),
    NULLIF(TRIM(player2), ''), NULLIF(player2timestamp, ''),
    NULLIF(TRIM(player3), ''), NULLIF(player3timestamp, ''),
    NULLIF(TRIM(player4), ''), NULLIF(player4timestamp, ''),
    COALESCE(played, 0), NULLIF(playedtimestamp, ''),
    COALESCE(cleared, 0), NULLIF(clearedtimestamp, '')
FROM legacy_matches
ORDER BY matchid
"#;
