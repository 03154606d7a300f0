//! Log setup.
//!
//! The terminal UI owns stdout and stderr, so interactive runs log to a file
//! or not at all. Headless commands log to stderr. `RUST_LOG` overrides the
//! configured level.

use std::{fs::File, io, path::Path, sync::Mutex};

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber.
///
/// # Errors
///
/// Returns an error if the log file cannot be created.
pub fn init(level: &str, log_file: Option<&Path>, interactive: bool) -> io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match (log_file, interactive) {
        (Some(path), _) => {
            let file = File::create(path)?;
            tracing_subscriber::registry()
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .with(filter)
                .init();
        },
        (None, false) => {
            tracing_subscriber::registry().with(fmt::layer().with_writer(io::stderr)).with(filter).init();
        },
        (None, true) => {},
    }
    Ok(())
}
