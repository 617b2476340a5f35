//! Logger setup: `log` facade backed by `env_logger`.
//!
//! Normal output is the bare message so `log::info!` doubles as the CLI's
//! print statement. `--verbose` adds timestamps and level tags.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use log::{Level, LevelFilter};

use crate::CliError;

/// Writes to stdout and, optionally, to a log file with ANSI codes stripped.
struct TeeWriter {
    file: Option<File>,
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stdout().write_all(buf)?;
        if let Some(file) = self.file.as_mut() {
            file.write_all(&strip_ansi_escapes::strip(buf))?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()?;
        if let Some(file) = self.file.as_mut() {
            file.flush()?;
        }
        Ok(())
    }
}

/// Install the global logger. `RUST_LOG` overrides the level chosen by flags.
pub(crate) fn init_logging(
    quiet: bool,
    verbose: bool,
    logfile: Option<&Path>,
) -> Result<(), CliError> {
    let level = if verbose {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };

    let file = logfile.map(File::create).transpose()?;

    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level)
        .parse_default_env()
        .target(env_logger::Target::Pipe(Box::new(TeeWriter { file })))
        .format(move |buf, record| {
            if verbose {
                writeln!(
                    buf,
                    "{} {:<5} [{}] {}",
                    buf.timestamp_seconds(),
                    record.level(),
                    record.target(),
                    record.args()
                )
            } else {
                match record.level() {
                    Level::Error => writeln!(buf, "error: {}", record.args()),
                    Level::Warn => writeln!(buf, "warning: {}", record.args()),
                    _ => writeln!(buf, "{}", record.args()),
                }
            }
        });

    builder
        .try_init()
        .map_err(|e| CliError::other(format!("Failed to initialize logging: {}", e)))
}

/// Emit an empty line at info level.
pub(crate) fn log_blank() {
    log::info!("");
}
