pub(crate) mod config;
pub(crate) mod locations;
pub(crate) mod matches;
pub(crate) mod store;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use signup_sheet_core::Match;
use signup_sheet_core::util::format_date;

/// Placeholder shown for an empty player slot.
const EMPTY_SLOT: &str = "-";

/// The player names of a match, comma separated, empty slots as `-`.
pub(crate) fn player_line(m: &Match) -> String {
    m.players
        .iter()
        .map(|p| p.name.as_deref().unwrap_or(EMPTY_SLOT))
        .collect::<Vec<_>>()
        .join(", ")
}

/// One line of the match grid.
///
/// Played matches are struck through; they can no longer be edited.
pub(crate) fn render_match(m: &Match, with_place: bool) -> String {
    let number = format!("#{:<3}", m.match_number);
    let players = player_line(m);
    let place = if with_place {
        format!("  {} @ {}", format_date(m.date), m.location.short_name())
    } else {
        String::new()
    };

    if m.played {
        let played_at = m
            .played_at
            .map(|t| t.format("%H:%M").to_string())
            .unwrap_or_default();
        format!(
            "  {} {}{}  {}",
            number.if_supports_color(Stdout, |t| t.dimmed()),
            players.if_supports_color(Stdout, |t| t.strikethrough()),
            place.if_supports_color(Stdout, |t| t.dimmed()),
            format!("played {}", played_at).if_supports_color(Stdout, |t| t.green()),
        )
    } else {
        format!(
            "  {} {}{}",
            number.if_supports_color(Stdout, |t| t.bold()),
            players,
            place.if_supports_color(Stdout, |t| t.dimmed()),
        )
    }
}

/// "1 match" / "3 matches".
pub(crate) fn plural_matches(n: usize) -> String {
    if n == 1 {
        "1 match".to_string()
    } else {
        format!("{} matches", n)
    }
}
