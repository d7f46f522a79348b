use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, fmt::time::ChronoLocal};

const LOG_FILTER_ENV: &str = "MP_LOG";
const DEFAULT_FILTER: &str = "info";

/// Sends `tracing` output to the log file. The terminal belongs to the UI,
/// so nothing is written to stdout or stderr; failures only disable logging.
pub fn init() -> Option<PathBuf> {
    let path = log_path()?;
    let file = open_log(&path)?;
    let filter =
        EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_timer(ChronoLocal::rfc_3339())
        .try_init()
        .ok()?;
    Some(path)
}

fn open_log(path: &Path) -> Option<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok()?;
    }
    OpenOptions::new().create(true).append(true).open(path).ok()
}

fn log_path() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_STATE_HOME")
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|home| home.join(".local").join("state")))?;
    Some(base.join("millpane").join("mp.log"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_log_creates_missing_directories() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("state").join("millpane").join("mp.log");

        let file = open_log(&path);

        assert!(file.is_some());
        assert!(path.exists());
    }
}
