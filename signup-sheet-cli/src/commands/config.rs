use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::log_blank;
use crate::settings::load_settings_string;
use crate::state::AppState;

/// Show resolved settings and their sources.
pub(crate) fn run_config_show(state: &AppState) {
    log::info!(
        "{}",
        "Signup Sheet Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    log_blank();

    let path = &state.settings_path;
    if path.exists() {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(exists)".if_supports_color(Stdout, |t| t.green()),
        );
    } else {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(not found)".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    log_blank();

    log::info!(
        "  store:        {} {}",
        state.db_path.display(),
        format!("({})", state.db_source).if_supports_color(Stdout, |t| t.dimmed()),
    );
    match state.selected_location {
        Some(location) => log::info!(
            "  location:     {} {}",
            location.short_name(),
            format!("({})", state.location_source).if_supports_color(Stdout, |t| t.dimmed()),
        ),
        None => log::info!(
            "  location:     {}",
            "not selected".if_supports_color(Stdout, |t| t.yellow()),
        ),
    }
    log::info!("  stamp policy: {}", state.stamp_policy);

    if let Some(contents) = load_settings_string(path) {
        log_blank();
        log::info!("{}", "Settings file contents:".if_supports_color(Stdout, |t| t.bold()));
        for line in contents.lines() {
            log::info!("  {}", line);
        }
    }
}

/// Print the settings file path.
pub(crate) fn run_config_path(state: &AppState) {
    println!("{}", state.settings_path.display());
}
