//! Environment capture and site configuration resolution.
//!
//! # Responsibilities
//! - Capture the configuration-bearing environment variables once
//! - Resolve `SiteConf` by merging defaults, the `config` JSON blob, and
//!   (behind the legacy flag) a per-site config file
//!
//! # Design Decisions
//! - Env is captured into a plain struct at context creation; resolution
//!   is a pure function of that struct, so tests never touch process env
//! - Broken override layers are logged and skipped, never fatal

use std::env;
use std::path::{Path, PathBuf};

use crate::config::loader;
use crate::config::schema::{SiteConf, SiteConfPatch};

/// JSON blob merged over the site defaults.
pub const ENV_CONFIG: &str = "config";
/// Runtime environment name (`local`, `test`, `production`, ...).
pub const ENV_RUN_ENV: &str = "RUN_ENV";
/// Set to `on` to additionally merge the legacy per-site config file.
pub const ENV_CONFIG_FILE: &str = "CONFIG_FILE";
/// Site name selecting the legacy config file.
pub const ENV_SITE_NAME: &str = "SITE_NAME";
/// Directory holding legacy per-site config files.
pub const ENV_CONFIG_DIR: &str = "CONFIG_DIR";

const DEFAULT_ENV: &str = "local";
const DEFAULT_SITE: &str = "local";
const DEFAULT_CONFIG_DIR: &str = "config";

/// One-time capture of the configuration-bearing environment variables.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    /// Raw contents of the `config` variable (a JSON object).
    pub config: Option<String>,
    /// Runtime environment name; `None` means `local`.
    pub run_env: Option<String>,
    /// Legacy compatibility flag (`CONFIG_FILE=on`).
    pub legacy_config_file: bool,
    /// Site name for the legacy config file; `None` means `local`.
    pub site_name: Option<String>,
    /// Directory for legacy config files; `None` means `config`.
    pub config_dir: Option<PathBuf>,
}

impl EnvOverrides {
    /// Capture the relevant variables from the process environment.
    pub fn from_process_env() -> Self {
        Self {
            config: env::var(ENV_CONFIG).ok(),
            run_env: env::var(ENV_RUN_ENV).ok(),
            legacy_config_file: env::var(ENV_CONFIG_FILE).map(|v| v == "on").unwrap_or(false),
            site_name: env::var(ENV_SITE_NAME).ok(),
            config_dir: env::var(ENV_CONFIG_DIR).ok().map(PathBuf::from),
        }
    }

    /// Runtime environment name, defaulting to `local`.
    pub fn run_env(&self) -> &str {
        self.run_env.as_deref().unwrap_or(DEFAULT_ENV)
    }

    /// Site name for the legacy config file, defaulting to `local`.
    pub fn site_name(&self) -> &str {
        self.site_name.as_deref().unwrap_or(DEFAULT_SITE)
    }

    fn config_dir(&self) -> &Path {
        self.config_dir
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_CONFIG_DIR))
    }
}

/// Resolve the site configuration from captured overrides.
///
/// Merge order, later wins field by field: defaults, the `config` JSON
/// blob, then (only with `CONFIG_FILE=on`) the current environment's block
/// of `<config_dir>/<site>.json`. Layers that fail to load or parse are
/// logged and skipped.
pub fn resolve_site_conf(overrides: &EnvOverrides) -> SiteConf {
    let mut conf = SiteConf::default();

    if let Some(raw) = &overrides.config {
        match serde_json::from_str::<SiteConfPatch>(raw) {
            Ok(patch) => conf.apply(patch),
            Err(err) => {
                tracing::warn!(error = %err, "config env blob is not a JSON object, skipping");
            }
        }
    }

    if overrides.legacy_config_file {
        apply_legacy_file(&mut conf, overrides);
    }

    conf
}

fn apply_legacy_file(conf: &mut SiteConf, overrides: &EnvOverrides) {
    let site = overrides.site_name();
    let run_env = overrides.run_env();

    let value = match loader::load_config_file(overrides.config_dir(), site) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(site, error = %err, "legacy site config not loaded, skipping");
            return;
        }
    };

    // The legacy file is keyed by environment name.
    let Some(block) = value.get(run_env) else {
        tracing::warn!(site, run_env, "legacy site config has no block for this environment");
        return;
    };

    match serde_json::from_value::<SiteConfPatch>(block.clone()) {
        Ok(patch) => conf.apply(patch),
        Err(err) => {
            tracing::warn!(site, run_env, error = %err, "legacy site config block is malformed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_defaults_without_overrides() {
        let conf = resolve_site_conf(&EnvOverrides::default());
        assert_eq!(conf, SiteConf::default());
        assert_eq!(EnvOverrides::default().run_env(), "local");
        assert_eq!(EnvOverrides::default().site_name(), "local");
    }

    #[test]
    fn test_config_blob_merges_over_defaults() {
        let overrides = EnvOverrides {
            config: Some(r#"{"host": "127.0.0.1", "port": 3000, "stat": true}"#.to_string()),
            ..Default::default()
        };
        let conf = resolve_site_conf(&overrides);
        assert_eq!(conf.host, "127.0.0.1");
        assert_eq!(conf.port, 3000);
        assert!(conf.stat);
        assert_eq!(conf.routermap_file, "routermap");
    }

    #[test]
    fn test_invalid_blob_skipped() {
        let overrides = EnvOverrides {
            config: Some("not json".to_string()),
            ..Default::default()
        };
        assert_eq!(resolve_site_conf(&overrides), SiteConf::default());
    }

    #[test]
    fn test_legacy_file_applies_only_with_flag() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("mysite.json"),
            r#"{"local": {"port": 9090}, "production": {"port": 80}}"#,
        )
        .unwrap();

        let mut overrides = EnvOverrides {
            site_name: Some("mysite".to_string()),
            config_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        };

        // flag off: file ignored
        assert_eq!(resolve_site_conf(&overrides).port, 0);

        // flag on: environment block merged
        overrides.legacy_config_file = true;
        assert_eq!(resolve_site_conf(&overrides).port, 9090);

        // other environment selects the other block
        overrides.run_env = Some("production".to_string());
        assert_eq!(resolve_site_conf(&overrides).port, 80);
    }

    #[test]
    fn test_legacy_file_wins_over_blob() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("local.json"), r#"{"local": {"port": 1}}"#).unwrap();

        let overrides = EnvOverrides {
            config: Some(r#"{"port": 2, "host": "h"}"#.to_string()),
            legacy_config_file: true,
            config_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        let conf = resolve_site_conf(&overrides);
        assert_eq!(conf.port, 1);
        // fields absent from the legacy block keep the blob's value
        assert_eq!(conf.host, "h");
    }

    #[test]
    fn test_missing_legacy_file_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let overrides = EnvOverrides {
            legacy_config_file: true,
            config_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        assert_eq!(resolve_site_conf(&overrides), SiteConf::default());
    }
}
