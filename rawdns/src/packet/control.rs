//! Send-time control descriptor.

use std::net::Ipv4Addr;

/// Out-of-band parameters passed to a raw send alongside the packet bytes.
///
/// `dst` mirrors the IPv4 header's destination; `if_index` is whatever the
/// caller resolved, it is never looked up here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlMessage {
    pub ttl: u8,
    pub if_index: u32,
    pub dst: Ipv4Addr,
}
