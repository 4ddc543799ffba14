//! Site configuration resolution.
//!
//! Loads a site's JSON configuration files, normalizes the route table,
//! and caches every resolved value for the lifetime of the process.
//!
//! # Architecture Overview
//!
//! ```text
//!  process env ──▶ config::env ──┐
//!                                │
//!  site directory                ▼
//!  ├─ routermap ───▶ config::loader ──▶ routing::builder ──▶ RouteTable
//!  ├─ static_routermap ─▶ "                                      │
//!  ├─ server ──────────▶ "                                       ▼
//!  └─ extends ─────────▶ "                            context::ConfigContext
//!                                                     (one OnceCell per value,
//!  host interfaces ──▶ net::interface ──────────────▶  resolved at most once)
//! ```
//!
//! Callers hold a [`ConfigContext`] and read everything through its
//! accessors; repeated calls return the same cached reference and never
//! re-read the backing files.

pub mod config;
pub mod context;
pub mod net;
pub mod routing;

pub use config::{ConfigError, EnvOverrides, SiteConf};
pub use context::{ConfigContext, StaticRouteMap};
pub use routing::{Descriptor, RouteError, RouteTable, DOMAIN_ANY};
