use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::Connection;
use signup_sheet_core::{Location, PlayerNames, Scope, StampPolicy};
use signup_sheet_db::*;

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
}

fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
    day().and_hms_opt(h, m, s).unwrap()
}

fn names<const N: usize>(list: [&str; N]) -> PlayerNames {
    PlayerNames::new(list).unwrap()
}

/// Rows whose flag and its timestamp disagree.
fn flag_stamp_mismatches(conn: &Connection, flag: &str, stamp: &str) -> i64 {
    conn.query_row(
        &format!("SELECT COUNT(*) FROM matches WHERE ({flag} = 1) != ({stamp} IS NOT NULL)"),
        [],
        |row| row.get(0),
    )
    .unwrap()
}

fn total_rows(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM matches", [], |row| row.get(0))
        .unwrap()
}

// ── Creation ────────────────────────────────────────────────────────────────

#[test]
fn match_numbers_are_sequential_per_date_and_location() {
    let conn = open_memory().unwrap();
    let a1 = create_match(&conn, Location::Borchard, day()).unwrap();
    let a2 = create_match(&conn, Location::Borchard, day()).unwrap();
    let b1 = create_match(&conn, Location::DosVientos, day()).unwrap();
    let next_day = day().succ_opt().unwrap();
    let c1 = create_match(&conn, Location::Borchard, next_day).unwrap();

    assert_eq!(a1.match_number, 1);
    assert_eq!(a2.match_number, 2);
    assert_eq!(b1.match_number, 1);
    assert_eq!(c1.match_number, 1);
    assert!(a1.id < a2.id && a2.id < b1.id && b1.id < c1.id);
}

#[test]
fn next_number_is_one_past_the_current_max() {
    let conn = open_memory().unwrap();
    conn.execute(
        "INSERT INTO matches (match_date, match_number, location) VALUES ('2026-10-18', 5, 'Borchard Community Center')",
        [],
    )
    .unwrap();
    let created = create_match(&conn, Location::Borchard, day()).unwrap();
    assert_eq!(created.match_number, 6);
}

#[test]
fn created_match_starts_unplayed_and_is_listed() {
    let conn = open_memory().unwrap();
    let created = create_match(&conn, Location::ThousandOaks, day()).unwrap();
    assert!(!created.played && !created.cleared);
    assert!(created.played_at.is_none() && created.cleared_at.is_none());
    assert_eq!(created.filled_slots(), 0);

    let active = list_active(&conn, Scope::At(Location::ThousandOaks)).unwrap();
    assert_eq!(active, vec![created]);
}

#[test]
fn clashing_insert_is_a_conflict() {
    let conn = open_memory().unwrap();
    // Another writer sneaks in the same number just before our insert.
    conn.execute_batch(
        "CREATE TRIGGER sneak BEFORE INSERT ON matches BEGIN
             INSERT INTO matches (match_date, match_number, location)
             VALUES (NEW.match_date, NEW.match_number, NEW.location);
         END;",
    )
    .unwrap();

    let err = create_match(&conn, Location::Borchard, day()).unwrap_err();
    match err {
        OperationError::Conflict {
            date,
            location,
            match_number,
        } => {
            assert_eq!(date, day());
            assert_eq!(location, Location::Borchard);
            assert_eq!(match_number, 1);
        }
        other => panic!("expected Conflict, got {other:?}"),
    }
    assert_eq!(total_rows(&conn), 0);
}

// ── Player edits ────────────────────────────────────────────────────────────

#[test]
fn first_names_are_stamped() {
    let conn = open_memory().unwrap();
    let m = create_match(&conn, Location::Borchard, day()).unwrap();

    let outcome =
        update_players(&conn, m.id, &names(["Ana", "Ben"]), StampPolicy::default(), at(18, 0, 0))
            .unwrap();
    assert_eq!(outcome, UpdateOutcome::Updated);

    let m = get_match(&conn, m.id).unwrap();
    assert_eq!(m.players[0].name.as_deref(), Some("Ana"));
    assert_eq!(m.players[0].stamped_at, Some(at(18, 0, 0)));
    assert_eq!(m.players[1].stamped_at, Some(at(18, 0, 0)));
    assert_eq!(m.players[2].name, None);
    assert_eq!(m.players[2].stamped_at, None);
}

#[test]
fn unchanged_names_keep_their_stamps() {
    let conn = open_memory().unwrap();
    let m = create_match(&conn, Location::Borchard, day()).unwrap();
    update_players(&conn, m.id, &names(["Ana"]), StampPolicy::default(), at(18, 0, 0)).unwrap();
    update_players(&conn, m.id, &names(["Ana", "Ben"]), StampPolicy::default(), at(18, 5, 0))
        .unwrap();

    let m = get_match(&conn, m.id).unwrap();
    assert_eq!(m.players[0].stamped_at, Some(at(18, 0, 0)));
    assert_eq!(m.players[1].stamped_at, Some(at(18, 5, 0)));
}

#[test]
fn rename_restamps_only_under_default_policy() {
    let conn = open_memory().unwrap();
    let restamp = create_match(&conn, Location::Borchard, day()).unwrap();
    let once = create_match(&conn, Location::Borchard, day()).unwrap();

    for (m, policy) in [
        (&restamp, StampPolicy::RestampOnRename),
        (&once, StampPolicy::StampOnce),
    ] {
        update_players(&conn, m.id, &names(["Ana"]), policy, at(18, 0, 0)).unwrap();
        update_players(&conn, m.id, &names(["Anya"]), policy, at(18, 10, 0)).unwrap();
    }

    let restamp = get_match(&conn, restamp.id).unwrap();
    assert_eq!(restamp.players[0].name.as_deref(), Some("Anya"));
    assert_eq!(restamp.players[0].stamped_at, Some(at(18, 10, 0)));

    let once = get_match(&conn, once.id).unwrap();
    assert_eq!(once.players[0].name.as_deref(), Some("Anya"));
    assert_eq!(once.players[0].stamped_at, Some(at(18, 0, 0)));
}

#[test]
fn played_match_ignores_player_edits() {
    let conn = open_memory().unwrap();
    let m = create_match(&conn, Location::Borchard, day()).unwrap();
    update_players(&conn, m.id, &names(["Ana"]), StampPolicy::default(), at(18, 0, 0)).unwrap();
    mark_played(&conn, m.id, at(18, 30, 0)).unwrap();
    let before = get_match(&conn, m.id).unwrap();

    let outcome =
        update_players(&conn, m.id, &names(["Zed"]), StampPolicy::default(), at(19, 0, 0)).unwrap();
    assert_eq!(outcome, UpdateOutcome::Frozen);
    assert_eq!(get_match(&conn, m.id).unwrap(), before);
}

#[test]
fn cleared_match_ignores_player_edits() {
    let conn = open_memory().unwrap();
    let m = create_match(&conn, Location::Borchard, day()).unwrap();
    update_players(&conn, m.id, &names(["Ana"]), StampPolicy::default(), at(18, 0, 0)).unwrap();
    clear_active(&conn, Scope::At(Location::Borchard), at(18, 15, 0)).unwrap();
    let before = get_match(&conn, m.id).unwrap();

    let outcome =
        update_players(&conn, m.id, &names(["Zed"]), StampPolicy::default(), at(19, 0, 0)).unwrap();
    assert_eq!(outcome, UpdateOutcome::Archived);
    assert_eq!(get_match(&conn, m.id).unwrap(), before);
}

#[test]
fn editing_missing_match_is_not_found() {
    let conn = open_memory().unwrap();
    let err = update_players(&conn, 42, &names(["Ana"]), StampPolicy::default(), at(18, 0, 0))
        .unwrap_err();
    assert!(matches!(err, OperationError::NotFound(ref key) if key == "id 42"));
}

// ── Played ──────────────────────────────────────────────────────────────────

#[test]
fn mark_played_stamps_and_backfills() {
    let conn = open_memory().unwrap();
    let m = create_match(&conn, Location::Borchard, day()).unwrap();
    update_players(&conn, m.id, &names(["Ana"]), StampPolicy::default(), at(18, 0, 0)).unwrap();

    assert_eq!(mark_played(&conn, m.id, at(18, 30, 0)).unwrap(), PlayOutcome::Played);

    let m = get_match(&conn, m.id).unwrap();
    assert!(m.played);
    assert_eq!(m.played_at, Some(at(18, 30, 0)));
    assert_eq!(m.players[0].stamped_at, Some(at(18, 0, 0)));
    for slot in &m.players[1..] {
        assert_eq!(slot.name, None);
        assert_eq!(slot.stamped_at, Some(at(18, 30, 0)));
    }
}

#[test]
fn marking_played_twice_is_idempotent() {
    let conn = open_memory().unwrap();
    let m = create_match(&conn, Location::Borchard, day()).unwrap();
    mark_played(&conn, m.id, at(18, 30, 0)).unwrap();
    let once = get_match(&conn, m.id).unwrap();

    assert_eq!(
        mark_played(&conn, m.id, at(20, 0, 0)).unwrap(),
        PlayOutcome::AlreadyPlayed
    );
    assert_eq!(get_match(&conn, m.id).unwrap(), once);
}

#[test]
fn cleared_match_cannot_be_played() {
    let conn = open_memory().unwrap();
    let m = create_match(&conn, Location::Borchard, day()).unwrap();
    clear_active(&conn, Scope::Everywhere, at(18, 0, 0)).unwrap();

    assert_eq!(mark_played(&conn, m.id, at(18, 30, 0)).unwrap(), PlayOutcome::Archived);
    let m = get_match(&conn, m.id).unwrap();
    assert!(!m.played);
    assert_eq!(m.played_at, None);
    assert_eq!(m.players[0].stamped_at, None);
}

#[test]
fn played_then_cleared_match_reports_already_played() {
    let conn = open_memory().unwrap();
    let m = create_match(&conn, Location::Borchard, day()).unwrap();
    mark_played(&conn, m.id, at(18, 0, 0)).unwrap();
    clear_played(&conn, at(19, 0, 0)).unwrap();

    assert_eq!(
        mark_played(&conn, m.id, at(20, 0, 0)).unwrap(),
        PlayOutcome::AlreadyPlayed
    );
}

#[test]
fn marking_missing_match_is_not_found() {
    let conn = open_memory().unwrap();
    let err = mark_played(&conn, 9, at(18, 0, 0)).unwrap_err();
    assert!(matches!(err, OperationError::NotFound(_)));
}

// ── Clearing ────────────────────────────────────────────────────────────────

#[test]
fn clear_active_empties_scope_but_keeps_records() {
    let conn = open_memory().unwrap();
    create_match(&conn, Location::Borchard, day()).unwrap();
    let played = create_match(&conn, Location::Borchard, day()).unwrap();
    mark_played(&conn, played.id, at(18, 0, 0)).unwrap();
    let elsewhere = create_match(&conn, Location::DosVientos, day()).unwrap();

    let cleared = clear_active(&conn, Scope::At(Location::Borchard), at(21, 0, 0)).unwrap();
    assert_eq!(cleared, 2);

    assert!(list_active(&conn, Scope::At(Location::Borchard)).unwrap().is_empty());
    assert_eq!(
        list_active(&conn, Scope::At(Location::DosVientos)).unwrap(),
        vec![elsewhere]
    );

    assert_eq!(total_rows(&conn), 3);
    let archived = list_cleared(&conn, Scope::At(Location::Borchard), 10).unwrap();
    assert_eq!(archived.len(), 2);
    assert!(archived.iter().all(|m| m.cleared && m.cleared_at == Some(at(21, 0, 0))));
}

#[test]
fn clear_everywhere_covers_all_locations() {
    let conn = open_memory().unwrap();
    for &location in Location::all() {
        create_match(&conn, location, day()).unwrap();
    }
    assert_eq!(clear_active(&conn, Scope::Everywhere, at(21, 0, 0)).unwrap(), 4);
    assert!(list_active(&conn, Scope::Everywhere).unwrap().is_empty());
    assert_eq!(clear_active(&conn, Scope::Everywhere, at(22, 0, 0)).unwrap(), 0);
}

#[test]
fn clearing_twice_keeps_first_timestamp() {
    let conn = open_memory().unwrap();
    let m = create_match(&conn, Location::Borchard, day()).unwrap();
    clear_active(&conn, Scope::Everywhere, at(21, 0, 0)).unwrap();
    mark_played(&conn, m.id, at(21, 30, 0)).unwrap();
    clear_played(&conn, at(22, 0, 0)).unwrap();
    assert_eq!(get_match(&conn, m.id).unwrap().cleared_at, Some(at(21, 0, 0)));
}

#[test]
fn clear_played_only_touches_played_matches_everywhere() {
    let conn = open_memory().unwrap();
    let played_here = create_match(&conn, Location::Borchard, day()).unwrap();
    let open_here = create_match(&conn, Location::Borchard, day()).unwrap();
    let played_there = create_match(&conn, Location::SycamoreCanyon, day()).unwrap();
    let open_there = create_match(&conn, Location::SycamoreCanyon, day()).unwrap();
    mark_played(&conn, played_here.id, at(19, 0, 0)).unwrap();
    mark_played(&conn, played_there.id, at(19, 5, 0)).unwrap();

    assert_eq!(clear_played(&conn, at(21, 0, 0)).unwrap(), 2);

    let here = list_active(&conn, Scope::At(Location::Borchard)).unwrap();
    assert_eq!(here.iter().map(|m| m.id).collect::<Vec<_>>(), vec![open_here.id]);
    let there = list_active(&conn, Scope::At(Location::SycamoreCanyon)).unwrap();
    assert_eq!(there.iter().map(|m| m.id).collect::<Vec<_>>(), vec![open_there.id]);
}

#[test]
fn flags_and_timestamps_stay_in_step() {
    let conn = open_memory().unwrap();
    let a = create_match(&conn, Location::Borchard, day()).unwrap();
    let b = create_match(&conn, Location::Borchard, day()).unwrap();
    create_match(&conn, Location::DosVientos, day()).unwrap();
    update_players(&conn, a.id, &names(["Ana", "Ben"]), StampPolicy::default(), at(18, 0, 0))
        .unwrap();
    mark_played(&conn, a.id, at(18, 30, 0)).unwrap();
    mark_played(&conn, b.id, at(18, 40, 0)).unwrap();
    clear_played(&conn, at(19, 0, 0)).unwrap();

    assert_eq!(flag_stamp_mismatches(&conn, "played", "played_at"), 0);
    assert_eq!(flag_stamp_mismatches(&conn, "cleared", "cleared_at"), 0);
}

// ── Error classification ────────────────────────────────────────────────────

#[test]
fn read_only_store_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("matches.db");
    {
        let conn = Connection::open(&path).unwrap();
        signup_sheet_db::schema::ensure_schema(&conn).unwrap();
    }

    let conn =
        Connection::open_with_flags(&path, rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY).unwrap();
    let err = create_match(&conn, Location::Borchard, day()).unwrap_err();
    assert!(
        matches!(err, OperationError::StorageUnavailable(_)),
        "expected StorageUnavailable, got {err:?}"
    );
}

#[test]
fn schema_errors_keep_their_kind() {
    let err: OperationError = SchemaError::VersionMismatch {
        expected: 2,
        found: 9,
    }
    .into();
    assert!(matches!(err, OperationError::Schema(_)));
    assert_eq!(
        err.to_string(),
        "Schema error: Migration error: expected version 2, found 9"
    );
}
