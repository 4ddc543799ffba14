//! Host network discovery.
//!
//! # Responsibilities
//! - Report the host's primary non-internal IPv4 address
//!
//! # Design Decisions
//! - No interface enumeration dependency: connecting a datagram socket
//!   selects the outbound route, and its local address identifies the
//!   interface without sending any traffic
//! - Loopback or discovery failure yields `None`, never an error

pub mod interface;

pub use interface::local_ipv4;
