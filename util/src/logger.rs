//! Logger initialisation
//!
//! Executables log through the `log` facade. `logger_init` routes every record to stdout and to
//! the session's log file. Lines are stamped with the seconds elapsed since the session epoch
//! and a coloured three letter level tag:
//!
//! ```text
//! [  1.204518 INF] Lap 1 complete
//! [  1.204733 DBG] sim_lib::pipeline: Lane 0.512 -> steering 0.60 deg, speed 4.97
//! ```
//!
//! Debug and trace lines also carry the target, which is usually the module path.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use colored::{ColoredString, Colorize};
use log::{info, Level, Record};
use std::fmt;
use thiserror::Error;

// Internal imports
use crate::session::{self, Session};

// Re-exports
pub use log::LevelFilter;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors associated with initialising the logger.
#[derive(Debug, Error)]
pub enum LoggerInitError {
    #[error("The minimum log level must be at least `INFO`, found `{0}`")]
    InvalidMinLogLevel(LevelFilter),

    #[error("Could not open the log file: {0}")]
    LogFileInitError(std::io::Error),

    #[error("Could not install the logger: {0}")]
    FernInitError(log::SetLoggerError),
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Initialise the logger for this execution.
///
/// `target_levels` overrides the level of specific targets, e.g. to keep per-tick output from a
/// busy module out of the log while the rest of the executable runs at `Trace`.
///
/// Must only be called once per process, `log` accepts a single global logger.
pub fn logger_init(
    min_level: LevelFilter,
    target_levels: &[(&'static str, LevelFilter)],
    session: &Session,
) -> Result<(), LoggerInitError> {
    if min_level < Level::Info {
        return Err(LoggerInitError::InvalidMinLogLevel(min_level));
    }

    let log_file =
        fern::log_file(&session.log_file_path).map_err(LoggerInitError::LogFileInitError)?;

    target_levels
        .iter()
        .fold(
            fern::Dispatch::new()
                .format(|out, message, record| out.finish(format_args!("{}", Line(record, message))))
                .level(min_level),
            |dispatch, (target, level)| dispatch.level_for(*target, *level),
        )
        .chain(std::io::stdout())
        .chain(log_file)
        .apply()
        .map_err(LoggerInitError::FernInitError)?;

    info!("Logging initialised");
    info!("    Session epoch: {:?}", session::get_epoch());
    info!("    Log level: {:?}", min_level);
    for (target, level) in target_levels {
        info!("    Log level for {}: {:?}", target, level);
    }
    info!("    Log file path: {:?}", session.log_file_path);

    Ok(())
}

// ---------------------------------------------------------------------------
// PRIVATE ITEMS
// ---------------------------------------------------------------------------

/// One formatted log line.
struct Line<'a, 'b>(&'a Record<'b>, &'a fmt::Arguments<'a>);

impl<'a, 'b> fmt::Display for Line<'a, 'b> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let Line(record, message) = self;

        write!(
            f,
            "[{:10.6} {}] ",
            session::get_elapsed_seconds(),
            level_tag(record.level())
        )?;

        if record.level() > Level::Info {
            write!(f, "{}: ", record.target())?;
        }

        write!(f, "{}", message)
    }
}

fn level_tag(level: Level) -> ColoredString {
    match level {
        Level::Trace => "TRC".dimmed().italic(),
        Level::Debug => "DBG".dimmed(),
        Level::Info => "INF".normal(),
        Level::Warn => "WRN".yellow(),
        Level::Error => "ERR".red().bold(),
    }
}
