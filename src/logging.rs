use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{info, warn};
use tracing_subscriber::{
    prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

pub const FILTER_VAR: &str = "WORD_FLASH_LOG";
const DEFAULT_FILTER: &str = "word_flash=info";
const DEFAULT_FILE: &str = "word-flash.log";

pub fn default_log_path() -> PathBuf
{
    std::env::temp_dir().join(DEFAULT_FILE)
}

fn filter() -> EnvFilter
{
    EnvFilter::try_from_env(FILTER_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Sends logs to `path`; the terminal itself is busy drawing the game.
/// Returns false when the file can't be opened, in which case nothing is logged.
pub fn init_tracing(path: &Path) -> bool
{
    let file = match File::create(path) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("Warning: logging disabled, couldn't open {}: {err}", path.display());
            return false;
        }
    };

    let installed = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(filter())
        .try_init();
    if let Err(err) = installed {
        warn!("tracing already initialised: {err}");
        return false;
    }

    info!(log = %path.display(), "logging started");
    true
}
