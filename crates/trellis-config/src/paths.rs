//! Log directory resolution.

use std::path::{Path, PathBuf};

use crate::{ConfigError, Result};

/// Environment variable to override the log directory.
const LOG_DIR_ENV: &str = "TRELLIS_LOG_DIR";

/// Directory name under the user's home directory.
const APP_DIR: &str = ".trellis_mcp";

/// Name of the append-only log file inside the log directory.
pub const LOG_FILE_NAME: &str = "server.log";

/// Resolve the directory that holds `server.log`.
///
/// Precedence: explicit override, then `TRELLIS_LOG_DIR`, then
/// `~/.trellis_mcp`, then `./.trellis_mcp` when no home directory exists.
pub fn log_dir(override_dir: Option<&Path>) -> PathBuf {
    if let Some(dir) = override_dir {
        return dir.to_path_buf();
    }
    if let Ok(dir) = std::env::var(LOG_DIR_ENV)
        && !dir.is_empty()
    {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .map(|home| home.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from(APP_DIR))
}

/// Create `dir` (and parents) if it does not exist.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir {
        path: dir.display().to_string(),
        source: e,
    })
}
