//! # Query Header
//!
//! The fixed 12-byte DNS header (RFC 1035 §4.1.1):
//!
//! ```text
//!                                   1  1  1  1  1  1
//!     0  1  2  3  4  5  6  7  8  9  0  1  2  3  4  5
//!   +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//!   |                      ID                       |
//!   +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//!   |QR|   Opcode  |AA|TC|RD|RA|   Z    |   RCODE   |
//!   +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//!   |                    QDCOUNT                    |
//!   +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//!   |                    ANCOUNT                    |
//!   +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//!   |                    NSCOUNT                    |
//!   +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//!   |                    ARCOUNT                    |
//!   +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//! ```
//!
//! [`DnsHeader::marshal`] lays the six words out as a fixed array and writes
//! them in one pass, so no counter can be skipped.
use crate::dns::id::generate_id;

/// Size of the DNS header on the wire.
pub const HEADER_LEN: usize = 12;

/// Flags word of a standard recursive query: opcode QUERY, RD set (`0x0100`).
pub const FLAGS_STANDARD_QUERY: u16 = DnsHeaderFlags::query(OpCodeOptions::StandardQuery).to_u16();

/// Represents the header section of a DNS query.
///
/// The counters are fixed at one question and no records; only the ID can
/// change after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DnsHeader {
    id: u16,
    flags: u16,
    qd_count: u16,
    an_count: u16,
    ns_count: u16,
    ar_count: u16,
}

impl DnsHeader {
    /// Header for a single-question recursive query with a fresh random ID.
    pub fn new() -> Self {
        DnsHeader {
            id: generate_id(),
            flags: DnsHeaderFlags::query(OpCodeOptions::StandardQuery).to_u16(),
            qd_count: 1,
            an_count: 0,
            ns_count: 0,
            ar_count: 0,
        }
    }

    /// Replaces the ID with a caller-chosen one (deterministic tests, replays).
    pub fn with_id(mut self, id: u16) -> Self {
        self.id = id;
        self
    }

    /// Draws a new random ID, keeping every other field.
    pub fn regenerate_id(&mut self) {
        self.id = generate_id();
    }

    /// Identifier to match requests and responses.
    pub fn id(&self) -> u16 {
        self.id
    }

    pub fn flags(&self) -> u16 {
        self.flags
    }

    /// QDCOUNT, ANCOUNT, NSCOUNT and ARCOUNT in wire order.
    pub fn counts(&self) -> [u16; 4] {
        [self.qd_count, self.an_count, self.ns_count, self.ar_count]
    }

    /// Structured view of the flags word.
    pub fn header_flags(&self) -> DnsHeaderFlags {
        DnsHeaderFlags::from_u16(self.flags)
    }

    /// Converts the header into a 12-byte array suitable for network transmission.
    pub fn marshal(&self) -> [u8; HEADER_LEN] {
        let words = [
            self.id,
            self.flags,
            self.qd_count,
            self.an_count,
            self.ns_count,
            self.ar_count,
        ];

        let mut bytes = [0u8; HEADER_LEN];
        for (chunk, word) in bytes.chunks_exact_mut(2).zip(words) {
            chunk.copy_from_slice(&word.to_be_bytes());
        }
        bytes
    }
}

impl Default for DnsHeader {
    fn default() -> Self {
        Self::new()
    }
}

/// Represents the 16-bit DNS flags field (RFC 1035 §4.1.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DnsHeaderFlags {
    /// Query/Response flag
    pub qr: bool,
    /// Operation code
    /// Use `OpCodeOptions`
    pub opcode: u8,
    /// Authoritative Answer
    pub aa: bool,
    /// Truncation flag
    pub tc: bool,
    /// Recursion Desired
    pub rd: bool,
    /// Recursion Available
    pub ra: bool,
    /// Reserved bits (RFC 1035)
    pub z: u8,
    /// Response code
    pub rcode: u8,
}

// 3-15 reserved for future use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpCodeOptions {
    StandardQuery = 0,
    InverseQuery = 1,
    ServerStatusRequest = 2,
}

impl DnsHeaderFlags {
    /// Flags for an outgoing query with the given opcode and RD set.
    pub const fn query(opcode: OpCodeOptions) -> Self {
        DnsHeaderFlags {
            qr: false,
            opcode: opcode as u8,
            aa: false,
            tc: false,
            rd: true,
            ra: false,
            z: 0,
            rcode: 0,
        }
    }

    /// Encode the flags into a 16-bit integer.
    pub const fn to_u16(self) -> u16 {
        ((self.qr as u16) << 15)
            | ((self.opcode as u16 & 0b1111) << 11)
            | ((self.aa as u16) << 10)
            | ((self.tc as u16) << 9)
            | ((self.rd as u16) << 8)
            | ((self.ra as u16) << 7)
            | ((self.z as u16 & 0b111) << 4)
            | (self.rcode as u16 & 0b1111)
    }

    /// Decode from a 16-bit integer into structured flags.
    pub fn from_u16(value: u16) -> Self {
        Self {
            qr: (value >> 15) & 1 != 0,
            opcode: ((value >> 11) & 0b1111) as u8,
            aa: (value >> 10) & 1 != 0,
            tc: (value >> 9) & 1 != 0,
            rd: (value >> 8) & 1 != 0,
            ra: (value >> 7) & 1 != 0,
            z: ((value >> 4) & 0b111) as u8,
            rcode: (value & 0b1111) as u8,
        }
    }
}
