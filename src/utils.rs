//! Miscellaneous helper utilities.

use std::io::{self, Write};

use crossterm::{
    QueueableCommand,
    cursor::MoveTo,
    style::Print,
    terminal::{Clear, ClearType},
};
use tracing_subscriber::{EnvFilter, fmt};

/// Initialize `tracing` subscriber with env-based filter.
///
/// If `RUST_LOG` is not set, defaults to `info` level. Logs go to stderr so
/// the dashboard on stdout stays readable.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Clear the terminal and draw `frame` from the top-left corner.
pub fn redraw<W: Write>(out: &mut W, frame: &str) -> io::Result<()> {
    out.queue(Clear(ClearType::All))?
        .queue(MoveTo(0, 0))?
        .queue(Print(frame))?;
    out.flush()
}
