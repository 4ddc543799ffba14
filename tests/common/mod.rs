//! Shared fixtures for integration tests.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use siteconf::{ConfigContext, EnvOverrides};

/// A throwaway site directory plus the overrides pointing a context at it.
pub struct SiteFixture {
    dir: TempDir,
}

impl SiteFixture {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp site dir"),
        }
    }

    #[allow(dead_code)]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a config file into the site directory.
    pub fn write(&self, name: &str, contents: &str) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create fixture subdir");
        }
        fs::write(path, contents).expect("write fixture file");
    }

    /// Remove a config file, for never-re-read assertions.
    pub fn remove(&self, name: &str) {
        fs::remove_file(self.dir.path().join(name)).expect("remove fixture file");
    }

    /// Overrides whose `config` blob points `path` at this fixture.
    #[allow(dead_code)]
    pub fn overrides(&self) -> EnvOverrides {
        self.overrides_with(serde_json::Map::new())
    }

    /// Like `overrides`, with extra fields merged into the config blob.
    pub fn overrides_with(
        &self,
        mut blob: serde_json::Map<String, serde_json::Value>,
    ) -> EnvOverrides {
        blob.insert(
            "path".to_string(),
            serde_json::json!(self.dir.path().to_string_lossy()),
        );
        EnvOverrides {
            config: Some(serde_json::Value::Object(blob).to_string()),
            ..Default::default()
        }
    }

    pub fn context(&self) -> ConfigContext {
        ConfigContext::with_overrides(self.overrides_with(serde_json::Map::new()))
    }
}
