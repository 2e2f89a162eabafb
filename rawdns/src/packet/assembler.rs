//! # Raw Packet Assembler
//!
//! Turns a [`RawPacketContext`] into the three artifacts a raw-socket send
//! needs: an [`Ipv4Header`], the payload bytes (UDP header + DNS message) and
//! a [`ControlMessage`].
//!
//! Assembly runs in two phases. The DNS message must already be sealed into
//! a [`DnsPayload`] and stored on the context; only then is the UDP header
//! derived from it, and only then the IPv4 total length from both:
//!
//! ```text
//! total_len = 20 (IPv4) + 8 (UDP) + payload.len()
//! ```
//!
//! Nothing in here touches the network.
//!
//! ```rust
//! use std::net::Ipv4Addr;
//! use rawdns::dns::build_query;
//! use rawdns::packet::{RawPacketContext, DNS_PORT};
//!
//! let payload = build_query("example.com", "a").unwrap();
//! let packet = RawPacketContext::new(Ipv4Addr::new(10, 0, 0, 2), Ipv4Addr::new(10, 0, 0, 1))
//!     .with_dest_port(DNS_PORT)
//!     .with_dns_message(payload)
//!     .assemble()
//!     .unwrap();
//!
//! assert_eq!(packet.ip_header.total_len as usize, 20 + packet.payload.len());
//! ```

use super::PacketErrors;
use super::checksum::PROTO_UDP;
use super::control::ControlMessage;
use super::ipv4::{IPV4_HEADER_LEN, Ipv4Header};
use super::options::PacketOptions;
use super::udp::{UDP_HEADER_LEN, UdpHeader};
use crate::dns::{DnsPayload, ephemeral_port};
use std::io;
use std::net::Ipv4Addr;
use tracing::{debug, trace};

/// Largest IPv4 datagram.
const MAX_PACKET_LEN: usize = u16::MAX as usize;

/// Everything the assembler needs for one packet.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPacketContext {
    pub local: Ipv4Addr,
    pub remote: Ipv4Addr,
    pub dest_port: Option<u16>,
    /// Random ephemeral port when unset.
    pub src_port: Option<u16>,
    pub options: PacketOptions,
    payload: Option<DnsPayload>,
}

impl RawPacketContext {
    pub fn new(local: Ipv4Addr, remote: Ipv4Addr) -> Self {
        RawPacketContext {
            local,
            remote,
            dest_port: None,
            src_port: None,
            options: PacketOptions::default(),
            payload: None,
        }
    }

    pub fn with_dest_port(mut self, port: u16) -> Self {
        self.dest_port = Some(port);
        self
    }

    pub fn with_src_port(mut self, port: u16) -> Self {
        self.src_port = Some(port);
        self
    }

    pub fn with_options(mut self, options: PacketOptions) -> Self {
        self.options = options;
        self
    }

    /// Stores the finished DNS message this packet will carry.
    pub fn with_dns_message(mut self, payload: DnsPayload) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn set_dns_message(&mut self, payload: DnsPayload) {
        self.payload = Some(payload);
    }

    pub fn dns_message(&self) -> Option<&DnsPayload> {
        self.payload.as_ref()
    }

    /// Builds the IPv4 header, payload and control message.
    pub fn assemble(&self) -> Result<RawPacket, PacketErrors> {
        assemble(self)
    }
}

/// The three values handed, unmodified, to a raw-socket send.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPacket {
    pub ip_header: Ipv4Header,
    /// UDP header followed by the DNS message.
    pub payload: Vec<u8>,
    pub control: ControlMessage,
}

impl RawPacket {
    /// The whole datagram: marshaled IPv4 header followed by the payload.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.ip_header.total_len as usize);
        bytes.extend_from_slice(&self.ip_header.marshal());
        bytes.extend_from_slice(&self.payload);
        bytes
    }

    pub fn udp_header(&self) -> Result<UdpHeader, PacketErrors> {
        UdpHeader::parse(&self.payload)
    }

    /// The DNS message carried after the UDP header, if the payload holds one.
    pub fn dns_message(&self) -> Option<&[u8]> {
        self.payload.get(UDP_HEADER_LEN..)
    }

    /// Hands the packet to an external raw sender.
    pub fn send_with<T: RawTransmitter + ?Sized>(&self, transmitter: &T) -> io::Result<usize> {
        transmitter.transmit(&self.ip_header, &self.payload, &self.control)
    }
}

/// Boundary to whatever opens the raw socket (`IP_HDRINCL` or equivalent).
///
/// The core never implements this; callers plug in their platform sender.
pub trait RawTransmitter {
    fn transmit(
        &self,
        header: &Ipv4Header,
        payload: &[u8],
        control: &ControlMessage,
    ) -> io::Result<usize>;
}

/// Assembles a raw packet from `ctx`.
///
/// Fails if the DNS message has not been sealed onto the context, if the
/// destination port is missing, if either address is unspecified, or if the
/// datagram would not fit in 65535 bytes.
pub fn assemble(ctx: &RawPacketContext) -> Result<RawPacket, PacketErrors> {
    let payload = ctx.payload.as_ref().ok_or(PacketErrors::PayloadNotSealed)?;
    let dest_port = ctx.dest_port.ok_or(PacketErrors::MissingDestPort)?;
    if ctx.local.is_unspecified() {
        return Err(PacketErrors::MissingLocalAddress);
    }
    if ctx.remote.is_unspecified() {
        return Err(PacketErrors::MissingRemoteAddress);
    }

    let total_len = IPV4_HEADER_LEN + UDP_HEADER_LEN + payload.len();
    if total_len > MAX_PACKET_LEN {
        return Err(PacketErrors::PacketTooLarge(total_len));
    }

    // Phase two: every length below derives from the sealed payload
    let src_port = ctx.src_port.unwrap_or_else(ephemeral_port);
    let mut udp = UdpHeader::for_payload(src_port, dest_port, payload)?;
    if ctx.options.udp_checksum {
        udp.compute_checksum(ctx.local, ctx.remote, payload);
    }

    let mut ip_header = Ipv4Header {
        version: 4,
        header_len: IPV4_HEADER_LEN,
        tos: 0,
        total_len: total_len as u16,
        id: 0,
        dont_fragment: ctx.options.dont_fragment,
        frag_offset: 0,
        ttl: ctx.options.ttl,
        protocol: PROTO_UDP,
        checksum: 0,
        src: ctx.local,
        dst: ctx.remote,
    };
    let ip_wire = ip_header.marshal();
    ip_header.checksum = u16::from_be_bytes([ip_wire[10], ip_wire[11]]);

    let control = ControlMessage {
        ttl: ctx.options.ttl,
        if_index: ctx.options.if_index,
        dst: ctx.remote,
    };

    let mut bytes = Vec::with_capacity(udp.length as usize);
    bytes.extend_from_slice(&udp.marshal());
    bytes.extend_from_slice(payload.as_bytes());

    debug!(
        src = %ctx.local,
        dst = %ctx.remote,
        src_port,
        dest_port,
        if_index = ctx.options.if_index,
        ttl = ctx.options.ttl,
        total_len,
        "Raw DNS packet assembled"
    );
    trace!(payload = ?bytes, "Raw DNS packet payload");

    Ok(RawPacket {
        ip_header,
        payload: bytes,
        control,
    })
}
