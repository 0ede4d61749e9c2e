use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use env_logger::{Builder, Env, Target};

use crate::config::{self, LoggingSettings};

/// Route `log` output to a file so it does not draw over the TUI.
///
/// `RUST_LOG` wins over `logging.level`. Returns the log file path, or `None`
/// when no file could be opened, in which case logging stays off.
pub fn init(settings: &LoggingSettings) -> Option<PathBuf> {
    let path = settings.file.clone().or_else(config::default_log_path)?;
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).ok()?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path).ok()?;

    Builder::from_env(Env::default().default_filter_or(settings.level.as_str()))
        .format_timestamp_millis()
        .target(Target::Pipe(Box::new(file)))
        .try_init()
        .ok()?;

    log::info!("beetsheet {} starting up", env!("CARGO_PKG_VERSION"));
    Some(path)
}
