//! Primary local IPv4 address discovery.

use std::net::{IpAddr, Ipv4Addr, UdpSocket};

/// The address a UDP connect resolves against. Nothing is sent; connect
/// on a datagram socket only selects the route.
const PROBE_ADDR: &str = "8.8.8.8:80";

/// First non-internal IPv4 address of the host.
///
/// Returns `None` when the host has no external IPv4 route (offline, or
/// loopback only).
pub fn local_ipv4() -> Option<Ipv4Addr> {
    let socket = UdpSocket::bind("0.0.0.0:0").ok()?;
    socket.connect(PROBE_ADDR).ok()?;
    match socket.local_addr().ok()?.ip() {
        IpAddr::V4(ip) if !ip.is_loopback() && !ip.is_unspecified() => Some(ip),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_ipv4_never_internal() {
        // Result depends on the host's network setup; only the filter is
        // asserted here.
        if let Some(ip) = local_ipv4() {
            assert!(!ip.is_loopback());
            assert!(!ip.is_unspecified());
        }
    }
}
