//! Route table construction.
//!
//! # Data Flow
//! ```text
//! routermap file (JSON object, author order preserved)
//!     → RawRouteMap (raw key → descriptor value)
//!     → builder.rs (normalize keys, split domains, rewrite views)
//!     → RouteTable (path → domain → Descriptor)
//!     → cached by the ConfigContext, shared by reference
//! ```
//!
//! # Design Decisions
//! - The table is immutable after construction
//! - Build is a pure function of its input entries and their order
//! - Last write wins for duplicate (path, domain) pairs; no error
//! - A key with no `/` separator fails the whole build (explicit error
//!   instead of a silent wrong split)

pub mod builder;
pub mod types;

pub use builder::{build, build_from_raw};
pub use types::{Descriptor, RawRouteMap, RouteError, RouteTable, DOMAIN_ANY};
