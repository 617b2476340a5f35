use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use signup_sheet_core::Location;

use crate::CliError;
use crate::settings::save_location;
use crate::state::AppState;

pub(crate) fn run_locations(state: &AppState) {
    log::info!("Locations:");
    crate::log_blank();

    for &location in Location::all() {
        let selected = state.selected_location == Some(location);
        let marker = if selected { "*" } else { " " };
        log::info!(
            "{} {} {}",
            marker.if_supports_color(Stdout, |t| t.green()),
            location
                .short_name()
                .if_supports_color(Stdout, |t| t.bold()),
            location
                .display_name()
                .if_supports_color(Stdout, |t| t.cyan()),
        );
        let extra: Vec<&str> = location
            .aliases()
            .iter()
            .copied()
            .filter(|a| *a != location.short_name())
            .collect();
        if !extra.is_empty() {
            log::info!("    Also: {}", extra.join(", "));
        }
    }
}

/// Save `location` as the selected location for later commands.
pub(crate) fn run_select(state: &AppState, location: Location) -> Result<(), CliError> {
    save_location(&state.settings_path, Some(location)).map_err(|e| {
        CliError::config(format!(
            "Failed to write {}: {}",
            state.settings_path.display(),
            e
        ))
    })?;
    log::info!(
        "Selected {}",
        location.display_name().if_supports_color(Stdout, |t| t.bold()),
    );
    Ok(())
}
