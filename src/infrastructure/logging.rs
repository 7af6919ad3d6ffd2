use std::fs::File;
use std::io;
use std::sync::Mutex;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// File the log is written to; the terminal belongs to the UI.
pub const LOG_FILE: &str = "gridcalc.log";

/// Installs a file logger when `RUST_LOG` is set.
///
/// Returns whether a subscriber was installed. Filtering follows the usual
/// `RUST_LOG` syntax, e.g. `RUST_LOG=gridcalc=debug`.
pub fn init_logging() -> io::Result<bool> {
    if std::env::var_os("RUST_LOG").is_none() {
        return Ok(false);
    }

    let file = File::create(LOG_FILE)?;
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true),
        )
        .with(EnvFilter::from_default_env())
        .init();
    Ok(true)
}
