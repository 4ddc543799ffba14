//! Configuration file loading from disk.
//!
//! Replaces dynamic module resolution with an explicit two-step: resolve
//! the file path (exact name, else `.json` appended), then parse the
//! contents as JSON. Callers decide whether a failure is fatal; the
//! ConfigContext accessors swallow these errors and fall back to
//! documented defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON.
    #[error("failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Resolve a config file name inside a base directory.
///
/// Config files are named without extension in `SiteConf`; if the exact
/// name does not exist on disk, the `.json` variant is tried. When neither
/// exists the exact path is returned and the subsequent read reports the
/// missing file.
pub fn resolve_config_path(base: &Path, name: &str) -> PathBuf {
    let direct = base.join(name);
    if direct.is_file() {
        return direct;
    }
    let with_ext = base.join(format!("{name}.json"));
    if with_ext.is_file() {
        with_ext
    } else {
        direct
    }
}

/// Read and parse a JSON config file.
pub fn load_json(path: &Path) -> Result<Value, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolve a named config file against a base directory and parse it.
pub fn load_config_file(base: &Path, name: &str) -> Result<Value, ConfigError> {
    load_json(&resolve_config_path(base, name))
}
