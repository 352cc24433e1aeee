use std::error::Error;
use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Installs the global tracing subscriber.
///
/// The interactive session owns the terminal, so diagnostics only go
/// somewhere when a log file is given; without one, tracing stays
/// uninstalled and events are dropped. Filtering honors `RUST_LOG` and
/// defaults to `info`.
pub fn init(log_file: Option<&str>) -> Result<(), Box<dyn Error>> {
    let Some(path) = log_file else {
        return Ok(());
    };

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
