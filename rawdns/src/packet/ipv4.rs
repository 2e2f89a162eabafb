//! IPv4 header descriptor handed to the raw sender.
//!
//! The assembler fills every field; [`Ipv4Header::marshal`] produces the
//! 20-byte wire form (no options) with the header checksum computed.
//! [`Ipv4Header::parse`] reads one back, which is how crafted packets are
//! checked after the fact.

use super::PacketErrors;
use super::checksum::ip_checksum;
use std::net::Ipv4Addr;

/// Size of an IPv4 header without options.
pub const IPV4_HEADER_LEN: usize = 20;

/// Don't Fragment bit, as it sits in the flags/fragment-offset word.
const FLAG_DF: u16 = 0x4000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv4Header {
    pub version: u8,
    /// Header length in bytes.
    pub header_len: usize,
    pub tos: u8,
    /// Header plus everything after it.
    pub total_len: u16,
    /// Identification. Zero lets the kernel pick one on send.
    pub id: u16,
    pub dont_fragment: bool,
    pub frag_offset: u16,
    pub ttl: u8,
    pub protocol: u8,
    /// Header checksum. The assembler stores the computed value here;
    /// [`Ipv4Header::marshal`] ignores it and always recomputes.
    pub checksum: u16,
    pub src: Ipv4Addr,
    pub dst: Ipv4Addr,
}

impl Ipv4Header {
    /// Converts the header into 20 bytes, computing the checksum.
    pub fn marshal(&self) -> [u8; IPV4_HEADER_LEN] {
        let mut hdr = [0u8; IPV4_HEADER_LEN];

        hdr[0] = (self.version << 4) | ((self.header_len / 4) as u8 & 0x0F);
        hdr[1] = self.tos;
        hdr[2..4].copy_from_slice(&self.total_len.to_be_bytes());
        hdr[4..6].copy_from_slice(&self.id.to_be_bytes());

        let mut frag = self.frag_offset & 0x1FFF;
        if self.dont_fragment {
            frag |= FLAG_DF;
        }
        hdr[6..8].copy_from_slice(&frag.to_be_bytes());
        hdr[8] = self.ttl;
        hdr[9] = self.protocol;
        // Checksum [10:12] stays zero while it is computed
        hdr[12..16].copy_from_slice(&self.src.octets());
        hdr[16..20].copy_from_slice(&self.dst.octets());

        let cksum = ip_checksum(&hdr);
        hdr[10..12].copy_from_slice(&cksum.to_be_bytes());
        hdr
    }

    /// Reads an IPv4 header from the front of `pkt`.
    pub fn parse(pkt: &[u8]) -> Result<Self, PacketErrors> {
        if pkt.len() < IPV4_HEADER_LEN {
            return Err(PacketErrors::TooShort(pkt.len()));
        }

        let version = pkt[0] >> 4;
        if version != 4 {
            return Err(PacketErrors::InvalidVersion(version));
        }

        let header_len = ((pkt[0] & 0x0F) as usize) * 4;
        if header_len < IPV4_HEADER_LEN || pkt.len() < header_len {
            return Err(PacketErrors::TooShort(pkt.len()));
        }

        let frag = u16::from_be_bytes([pkt[6], pkt[7]]);

        Ok(Ipv4Header {
            version,
            header_len,
            tos: pkt[1],
            total_len: u16::from_be_bytes([pkt[2], pkt[3]]),
            id: u16::from_be_bytes([pkt[4], pkt[5]]),
            dont_fragment: frag & FLAG_DF != 0,
            frag_offset: frag & 0x1FFF,
            ttl: pkt[8],
            protocol: pkt[9],
            checksum: u16::from_be_bytes([pkt[10], pkt[11]]),
            src: Ipv4Addr::new(pkt[12], pkt[13], pkt[14], pkt[15]),
            dst: Ipv4Addr::new(pkt[16], pkt[17], pkt[18], pkt[19]),
        })
    }
}
