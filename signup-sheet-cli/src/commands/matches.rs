//! The sheet itself: listing, adding, editing, playing, and clearing matches.

use chrono::NaiveDate;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use signup_sheet_core::util::{format_date, now, today};
use signup_sheet_core::{Match, PlayerNames, Scope};
use signup_sheet_db::{OperationError, PlayOutcome, UpdateOutcome};

use super::{plural_matches, render_match};
use crate::cli_types::MatchRef;
use crate::state::AppState;
use crate::{CliError, log_blank};

/// Resolve a match number (and optional date) to an active match at the
/// selected location. Cleared matches are only reachable through `archive`.
fn resolve_match(
    conn: &rusqlite::Connection,
    state: &AppState,
    target: &MatchRef,
) -> Result<Match, CliError> {
    let location = state.require_location()?;
    let date = target.date.unwrap_or_else(today);
    let key = format!("#{} on {} at {}", target.number, format_date(date), location);
    match signup_sheet_db::find_match(conn, date, target.number, location)? {
        Some(m) if m.is_active() => Ok(m),
        Some(_) => Err(OperationError::NotFound(format!("{} (cleared)", key)).into()),
        None => Err(OperationError::NotFound(key).into()),
    }
}

fn log_matches(matches: &[Match], scope: Scope) {
    let with_place = scope == Scope::Everywhere;
    for m in matches {
        log::info!("{}", render_match(m, with_place));
    }
}

pub(crate) fn run_list(state: &AppState, everywhere: bool, json: bool) -> Result<(), CliError> {
    let scope = state.scope(everywhere)?;
    let conn = state.open_store()?;
    let matches = signup_sheet_db::list_active(&conn, scope)?;

    if json {
        let out = serde_json::to_string_pretty(&matches)
            .map_err(|e| CliError::other(format!("Failed to serialize matches: {}", e)))?;
        println!("{}", out);
        return Ok(());
    }

    log::info!(
        "{} {}",
        scope.to_string().if_supports_color(Stdout, |t| t.bold()),
        format!("({} active)", plural_matches(matches.len()))
            .if_supports_color(Stdout, |t| t.dimmed()),
    );
    if matches.is_empty() {
        log::info!("  No active matches. Run 'signup-sheet add' to start one.");
        return Ok(());
    }
    log_matches(&matches, scope);
    Ok(())
}

pub(crate) fn run_add(state: &AppState, date: Option<NaiveDate>) -> Result<(), CliError> {
    let location = state.require_location()?;
    let conn = state.open_store()?;
    let created = signup_sheet_db::create_match(&conn, location, date.unwrap_or_else(today))?;

    log::info!(
        "Added match {} at {}",
        format!("#{}", created.match_number).if_supports_color(Stdout, |t| t.bold()),
        location,
    );
    log::info!(
        "  Fill it in with: signup-sheet players {} <NAME>...",
        created.match_number
    );
    Ok(())
}

pub(crate) fn run_players(
    state: &AppState,
    target: &MatchRef,
    names: &[String],
) -> Result<(), CliError> {
    let names = PlayerNames::new(names).map_err(|e| CliError::invalid_input(e.to_string()))?;
    let conn = state.open_store()?;
    let m = resolve_match(&conn, state, target)?;

    match signup_sheet_db::update_players(&conn, m.id, &names, state.stamp_policy, now())? {
        UpdateOutcome::Updated => {
            let updated = signup_sheet_db::get_match(&conn, m.id)?;
            log::info!("Updated players:");
            log::info!("{}", render_match(&updated, false));
        }
        UpdateOutcome::Frozen => {
            log::warn!(
                "Match #{} has already been played; its players can no longer change.",
                m.match_number
            );
        }
        UpdateOutcome::Archived => {
            log::warn!("Match #{} has been cleared from the sheet.", m.match_number);
        }
    }
    Ok(())
}

pub(crate) fn run_played(state: &AppState, target: &MatchRef) -> Result<(), CliError> {
    let conn = state.open_store()?;
    let m = resolve_match(&conn, state, target)?;

    match signup_sheet_db::mark_played(&conn, m.id, now())? {
        PlayOutcome::Played => {
            log::info!(
                "Match {} marked {}",
                format!("#{}", m.match_number).if_supports_color(Stdout, |t| t.bold()),
                "played".if_supports_color(Stdout, |t| t.green()),
            );
        }
        PlayOutcome::AlreadyPlayed => {
            log::info!("Match #{} was already played.", m.match_number);
        }
        PlayOutcome::Archived => {
            log::warn!("Match #{} has been cleared from the sheet.", m.match_number);
        }
    }
    Ok(())
}

pub(crate) fn run_clear(state: &AppState, everywhere: bool) -> Result<(), CliError> {
    let scope = state.scope(everywhere)?;
    let conn = state.open_store()?;
    let cleared = signup_sheet_db::clear_active(&conn, scope, now())?;
    log::info!("Cleared {} at {}.", plural_matches(cleared), scope);
    Ok(())
}

pub(crate) fn run_clear_played(state: &AppState) -> Result<(), CliError> {
    let conn = state.open_store()?;
    let cleared = signup_sheet_db::clear_played(&conn, now())?;
    log::info!("Cleared {} played at any location.", plural_matches(cleared));

    if let Some(location) = state.selected_location {
        let remaining = signup_sheet_db::list_active(&conn, Scope::At(location))?;
        if !remaining.is_empty() {
            log_blank();
            log::info!("Still active at {}:", location);
            log_matches(&remaining, Scope::At(location));
        }
    }
    Ok(())
}

pub(crate) fn run_archive(state: &AppState, everywhere: bool, limit: usize) -> Result<(), CliError> {
    let scope = state.scope(everywhere)?;
    let conn = state.open_store()?;
    let matches = signup_sheet_db::list_cleared(&conn, scope, limit)?;

    log::info!(
        "{}",
        format!("Cleared matches at {}", scope).if_supports_color(Stdout, |t| t.bold()),
    );
    if matches.is_empty() {
        log::info!("  Nothing has been cleared yet.");
        return Ok(());
    }
    for m in &matches {
        let cleared_at = m
            .cleared_at
            .map(signup_sheet_core::util::format_timestamp)
            .unwrap_or_default();
        log::info!(
            "{}  {}",
            render_match(m, true),
            format!("cleared {}", cleared_at).if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    Ok(())
}
