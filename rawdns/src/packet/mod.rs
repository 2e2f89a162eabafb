//! # Raw IPv4/UDP envelope
//!
//! Wraps a sealed DNS message in synthetic UDP and IPv4 headers so it can be
//! written to a raw socket, where the sender picks the source address, the
//! egress interface and the TTL itself.
//!
//! - `assembler` — [`RawPacketContext`] in, [`RawPacket`] out.
//! - `udp` / `ipv4` — header types with marshal and parse.
//! - `control` — the out-of-band [`ControlMessage`] for the send call.
//! - `options` — [`PacketOptions`] and protocol defaults.
//!
//! Only IPv4 is supported.

pub mod assembler;
mod checksum;
pub mod control;
pub mod ipv4;
pub mod options;
pub mod udp;

pub use self::assembler::{RawPacket, RawPacketContext, RawTransmitter, assemble};
pub use self::control::ControlMessage;
pub use self::ipv4::{IPV4_HEADER_LEN, Ipv4Header};
pub use self::options::{DEFAULT_TTL, DNS_PORT, PacketOptions};
pub use self::udp::{UDP_HEADER_LEN, UdpHeader};

use std::{error::Error, fmt::Display};

/// Errors raised while assembling or reading back a raw packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PacketErrors {
    /// No DNS message has been stored on the context yet.
    PayloadNotSealed,
    MissingDestPort,
    MissingLocalAddress,
    MissingRemoteAddress,
    /// Total datagram length that did not fit in 16 bits.
    PacketTooLarge(usize),
    TooShort(usize),
    InvalidVersion(u8),
}

impl Display for PacketErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PacketErrors::PayloadNotSealed => write!(
                f,
                "The DNS message must be built and set on the context before assembling"
            ),
            PacketErrors::MissingDestPort => write!(f, "Destination port is not set"),
            PacketErrors::MissingLocalAddress => write!(f, "Local address is not set"),
            PacketErrors::MissingRemoteAddress => write!(f, "Remote address is not set"),
            PacketErrors::PacketTooLarge(len) => {
                write!(f, "Packet of {} bytes exceeds the IPv4 limit", len)
            }
            PacketErrors::TooShort(len) => write!(f, "Packet too short: {} bytes", len),
            PacketErrors::InvalidVersion(v) => write!(f, "Invalid IP version: {}", v),
        }
    }
}

impl Error for PacketErrors {}
