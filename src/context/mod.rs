//! Process-wide configuration cache.
//!
//! # Data Flow
//! ```text
//! ConfigContext::new()  (captures env once)
//!     accessor first call
//!         → config::env / config::loader (resolve + read + parse)
//!         → routing::builder (router_map only)
//!         → value stored in the slot's OnceCell
//!     every later call
//!         → cached reference, backing file never re-read
//! ```
//!
//! # Design Decisions
//! - One compute-once slot per derived value; Unresolved → Resolved is
//!   one-way, with no invalidation or refresh path
//! - Load failures are logged and replaced by documented defaults, and
//!   the default itself is cached for the process lifetime
//! - `router_map()` alone is fallible: a malformed route key fails the
//!   call and is not cached, so every attempt reports the error
//! - Slots are `once_cell::sync::OnceCell`, so concurrent first access
//!   from multiple threads resolves exactly once

use std::net::Ipv4Addr;
use std::path::Path;

use once_cell::sync::OnceCell;
use serde_json::Value;

use crate::config::env::{self, EnvOverrides};
use crate::config::loader;
use crate::config::schema::SiteConf;
use crate::net;
use crate::routing::{self, RawRouteMap, RouteError, RouteTable};

/// The static route table file contents: static path → asset descriptor,
/// opaque to this crate.
pub type StaticRouteMap = serde_json::Map<String, Value>;

/// Owns every cached configuration value for the process.
///
/// Callers receive shared references into the cache; cached values are
/// never mutated after first resolution.
#[derive(Debug, Default)]
pub struct ConfigContext {
    overrides: EnvOverrides,
    site_conf: OnceCell<SiteConf>,
    origin_router_map: OnceCell<RawRouteMap>,
    router_map: OnceCell<RouteTable>,
    server_conf: OnceCell<Value>,
    extends_conf: OnceCell<Option<Value>>,
    static_router_map: OnceCell<StaticRouteMap>,
    local_ip: OnceCell<Option<Ipv4Addr>>,
}

impl ConfigContext {
    /// Context over the process environment, captured now.
    pub fn new() -> Self {
        Self::with_overrides(EnvOverrides::from_process_env())
    }

    /// Context over explicitly supplied overrides (tests, CLI).
    pub fn with_overrides(overrides: EnvOverrides) -> Self {
        Self {
            overrides,
            ..Default::default()
        }
    }

    /// Runtime environment name, defaulting to `local`.
    pub fn run_env(&self) -> &str {
        self.overrides.run_env()
    }

    /// Resolved site settings.
    pub fn site_conf(&self) -> &SiteConf {
        self.site_conf
            .get_or_init(|| env::resolve_site_conf(&self.overrides))
    }

    /// The routermap file as authored, before normalization.
    ///
    /// Missing or unparsable file resolves to an empty map.
    pub fn origin_router_map(&self) -> &RawRouteMap {
        self.origin_router_map
            .get_or_init(|| self.load_object_file(&self.site_conf().routermap_file))
    }

    /// The normalized route table (path → domain → descriptor).
    ///
    /// A missing routermap file yields an empty table; a malformed route
    /// key fails the build and is reported on every call.
    pub fn router_map(&self) -> Result<&RouteTable, RouteError> {
        self.router_map
            .get_or_try_init(|| routing::build_from_raw(self.origin_router_map()))
    }

    /// Server configuration block for the current environment.
    ///
    /// The server file maps environment names to blocks, optionally
    /// nested under a `genConf` key. A missing file or environment block
    /// resolves to the empty-view descriptor.
    pub fn server_conf(&self) -> &Value {
        self.server_conf.get_or_init(|| {
            let site = self.site_conf();
            let run_env = self.overrides.run_env();
            let path =
                loader::resolve_config_path(Path::new(&site.path), &site.server_conf_file);

            let value = match loader::load_json(&path) {
                Ok(value) => value,
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "no server config, using empty views");
                    return empty_server_conf(&site.path);
                }
            };

            let block = match value.get("genConf") {
                Some(gen) => gen.get(run_env),
                None => value.get(run_env),
            };
            match block {
                Some(conf) => conf.clone(),
                None => {
                    tracing::warn!(path = %path.display(), run_env, "server config has no block for this environment, using empty views");
                    empty_server_conf(&site.path)
                }
            }
        })
    }

    /// Extensions loader configuration, if the site declares one.
    ///
    /// Tries `<path>/<extends_file>`, then `<path>/<extends_file>/loader`.
    pub fn extends_conf(&self) -> Option<&Value> {
        self.extends_conf
            .get_or_init(|| {
                let site = self.site_conf();
                let name = site.extends_file.as_ref()?;
                let base = Path::new(&site.path);

                if let Ok(value) = loader::load_config_file(base, name) {
                    return Some(value);
                }
                match loader::load_config_file(&base.join(name), "loader") {
                    Ok(value) => Some(value),
                    Err(_) => {
                        tracing::info!(extends_file = %name, "no extends file");
                        None
                    }
                }
            })
            .as_ref()
    }

    /// The static route table, opaque to this crate.
    ///
    /// Missing or unparsable file resolves to an empty map.
    pub fn static_router_map(&self) -> &StaticRouteMap {
        self.static_router_map
            .get_or_init(|| self.load_object_file(&self.site_conf().static_routermap_file))
    }

    /// First non-internal IPv4 address of the host, discovered once.
    pub fn local_ip(&self) -> Option<Ipv4Addr> {
        *self.local_ip.get_or_init(net::local_ipv4)
    }

    fn load_object_file(&self, name: &str) -> serde_json::Map<String, Value> {
        let site = self.site_conf();
        let path = loader::resolve_config_path(Path::new(&site.path), name);
        match loader::load_json(&path) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                tracing::warn!(path = %path.display(), "config file is not a JSON object, using empty");
                serde_json::Map::new()
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "no config file, using empty");
                serde_json::Map::new()
            }
        }
    }
}

/// Fallback server block pointing views at the site's empty view
/// directory.
fn empty_server_conf(site_path: &str) -> Value {
    let empty = Path::new(site_path).join("views/empty");
    let empty = empty.to_string_lossy().into_owned();
    serde_json::json!({
        "views": { "path": empty },
        "index": { "path": empty },
    })
}
