//! Site configuration schema.
//!
//! Defines the resolved site settings and the partial form used when
//! merging override layers. All types derive Serde traits for
//! deserialization from JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Resolved configuration for a site.
///
/// The `*_file` fields name config files inside the site directory
/// (`path`), without extension; the loader appends `.json` when the exact
/// name does not exist.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteConf {
    /// Host the surrounding server binds to.
    pub host: String,

    /// Port the surrounding server binds to (0 = unset).
    pub port: u16,

    /// Whether request statistics reporting is enabled.
    pub stat: bool,

    /// Site directory all config files are resolved against.
    pub path: String,

    /// Static asset configuration file name.
    pub static_conf_file: String,

    /// Per-environment server configuration file name.
    pub server_conf_file: String,

    /// Dynamic route table file name.
    pub routermap_file: String,

    /// Static route table file name.
    pub static_routermap_file: String,

    /// Extensions loader file name, if the site uses one.
    pub extends_file: Option<String>,

    /// Fields the merge layers carried that this schema does not model.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl Default for SiteConf {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 0,
            stat: false,
            path: String::new(),
            static_conf_file: "static_routermap".to_string(),
            server_conf_file: "server".to_string(),
            routermap_file: "routermap".to_string(),
            static_routermap_file: "static_routermap".to_string(),
            extends_file: None,
            extra: serde_json::Map::new(),
        }
    }
}

/// One override layer: every field optional, unknown keys carried through.
///
/// Applying a patch is the shallow, field-level merge the resolution order
/// (defaults ← env blob ← legacy site file) is built from.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SiteConfPatch {
    host: Option<String>,
    port: Option<u16>,
    stat: Option<bool>,
    path: Option<String>,
    static_conf_file: Option<String>,
    server_conf_file: Option<String>,
    routermap_file: Option<String>,
    static_routermap_file: Option<String>,
    extends_file: Option<String>,
    #[serde(flatten)]
    extra: serde_json::Map<String, Value>,
}

impl SiteConf {
    /// Apply an override layer; later layers win field by field.
    pub fn apply(&mut self, patch: SiteConfPatch) {
        if let Some(host) = patch.host {
            self.host = host;
        }
        if let Some(port) = patch.port {
            self.port = port;
        }
        if let Some(stat) = patch.stat {
            self.stat = stat;
        }
        if let Some(path) = patch.path {
            self.path = path;
        }
        if let Some(name) = patch.static_conf_file {
            self.static_conf_file = name;
        }
        if let Some(name) = patch.server_conf_file {
            self.server_conf_file = name;
        }
        if let Some(name) = patch.routermap_file {
            self.routermap_file = name;
        }
        if let Some(name) = patch.static_routermap_file {
            self.static_routermap_file = name;
        }
        if let Some(name) = patch.extends_file {
            self.extends_file = Some(name);
        }
        self.extra.extend(patch.extra);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_file_names() {
        let conf = SiteConf::default();
        assert_eq!(conf.routermap_file, "routermap");
        assert_eq!(conf.server_conf_file, "server");
        assert_eq!(conf.static_routermap_file, "static_routermap");
        assert_eq!(conf.static_conf_file, "static_routermap");
        assert!(!conf.stat);
        assert_eq!(conf.port, 0);
        assert!(conf.extends_file.is_none());
    }

    #[test]
    fn test_patch_overrides_fields() {
        let mut conf = SiteConf::default();
        let patch: SiteConfPatch =
            serde_json::from_str(r#"{"host": "0.0.0.0", "port": 8080, "path": "/srv/site"}"#)
                .unwrap();
        conf.apply(patch);
        assert_eq!(conf.host, "0.0.0.0");
        assert_eq!(conf.port, 8080);
        assert_eq!(conf.path, "/srv/site");
        // untouched fields keep their defaults
        assert_eq!(conf.routermap_file, "routermap");
    }

    #[test]
    fn test_patch_keeps_unknown_keys() {
        let mut conf = SiteConf::default();
        let patch: SiteConfPatch =
            serde_json::from_str(r#"{"log_path": "/var/log/site", "port": 80}"#).unwrap();
        conf.apply(patch);
        assert_eq!(conf.extra.get("log_path").unwrap(), "/var/log/site");

        // a later layer overwrites the same unknown key
        let patch: SiteConfPatch =
            serde_json::from_str(r#"{"log_path": "/tmp/log"}"#).unwrap();
        conf.apply(patch);
        assert_eq!(conf.extra.get("log_path").unwrap(), "/tmp/log");
        assert_eq!(conf.port, 80);
    }
}
