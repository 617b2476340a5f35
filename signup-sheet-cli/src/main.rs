//! signup-sheet CLI
//!
//! Command-line interface for keeping the match signup sheet at the
//! community centers.

mod cli_types;
mod commands;
mod error;
mod logging;
mod settings;
mod state;

use clap::Parser;

use cli_types::{Cli, Commands, ConfigAction};
use commands::{config, locations, matches, store};
pub(crate) use error::CliError;
pub(crate) use logging::log_blank;
use state::AppState;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init_logging(cli.quiet, cli.verbose, cli.logfile.as_deref()) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    let settings_path = cli.config.clone().unwrap_or_else(settings::settings_path);
    let state = AppState::resolve(
        cli.db,
        cli.location,
        settings_path.clone(),
        settings::Settings::load_from(&settings_path),
    );

    if let Err(e) = run(cli.command, &state) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(command: Commands, state: &AppState) -> Result<(), CliError> {
    match command {
        Commands::Locations => {
            locations::run_locations(state);
            Ok(())
        }
        Commands::Select { venue } => locations::run_select(state, venue),
        Commands::List { everywhere, json } => matches::run_list(state, everywhere, json),
        Commands::Add { date } => matches::run_add(state, date),
        Commands::Players { target, names } => matches::run_players(state, &target, &names),
        Commands::Played { target } => matches::run_played(state, &target),
        Commands::Clear { everywhere } => matches::run_clear(state, everywhere),
        Commands::ClearPlayed => matches::run_clear_played(state),
        Commands::Archive { everywhere, limit } => matches::run_archive(state, everywhere, limit),
        Commands::Stats => store::run_stats(state),
        Commands::Schema => store::run_schema(state),
        Commands::Reset { confirm } => store::run_reset(state, confirm),
        Commands::Config { action } => {
            match action {
                ConfigAction::Show => config::run_config_show(state),
                ConfigAction::Path => config::run_config_path(state),
            }
            Ok(())
        }
    }
}
