//! Site configuration subsystem.
//!
//! # Data Flow
//! ```text
//! process env (config blob, RUN_ENV, CONFIG_FILE, SITE_NAME)
//!     → env.rs (captured once as EnvOverrides)
//!     → schema.rs (defaults ← blob ← legacy site file, shallow merge)
//!     → SiteConf (resolved, immutable)
//!
//! site directory (SiteConf.path)
//!     → loader.rs (path resolution + JSON parse, typed errors)
//!     → raw config values for the ConfigContext accessors
//! ```
//!
//! # Design Decisions
//! - SiteConf is immutable once resolved; no reload path
//! - All fields have defaults so an empty environment still resolves
//! - Unknown keys survive the merge (carried in `SiteConf::extra`)
//! - Tests construct EnvOverrides directly; nothing here mutates or
//!   re-reads process env after capture

pub mod env;
pub mod loader;
pub mod schema;

pub use env::EnvOverrides;
pub use loader::ConfigError;
pub use schema::SiteConf;
