//! Best-effort discovery of the host's outbound-routable IP address.
//!
//! The QR code must advertise an address the *phone* can reach, which is the
//! LAN address of whichever interface routes outbound traffic, not whatever
//! `hostname` resolves to, and certainly not `127.0.0.1` unless nothing else
//! exists.
//!
//! # How the probe works
//!
//! UDP is connectionless: `connect` on a UDP socket sends no packets at all.
//! It only asks the kernel to pick a route (and therefore a source interface)
//! for the given destination.  Reading the socket's local address back then
//! reveals the IP of that interface.  The destination `10.254.254.254:1` is
//! never contacted and does not need to exist; it just has to look like a
//! non-local address so the kernel picks the default route.
//!
//! On any failure (no default route, sandboxed process, sockets exhausted)
//! the probe falls back to the loopback address.  This function never
//! returns an error and never panics.

use std::net::{IpAddr, Ipv4Addr, UdpSocket};

use tracing::debug;

/// Probe destination.  Non-routable by design; no datagram is ever sent.
const PROBE_ADDR: &str = "10.254.254.254:1";

/// Returns the host's outbound-routable IP address, or `127.0.0.1` if it
/// cannot be determined.  Infallible by contract.
pub fn outbound_local_ip() -> IpAddr {
    match probe_outbound_ip() {
        Some(ip) => ip,
        None => {
            debug!("outbound IP probe failed; falling back to loopback");
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        }
    }
}

/// The fallible inner probe.  Splitting it out keeps the `?`-style early
/// returns while the public function stays infallible.
fn probe_outbound_ip() -> Option<IpAddr> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).ok()?;
    socket.connect(PROBE_ADDR).ok()?;
    let local = socket.local_addr().ok()?;
    Some(local.ip())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
