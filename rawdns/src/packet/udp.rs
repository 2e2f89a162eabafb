//! UDP header builder.
//!
//! A [`UdpHeader`] can only be created from a sealed [`DnsPayload`], so its
//! length field is always derived from a message that already exists.

use super::PacketErrors;
use super::checksum::udp_checksum;
use crate::dns::{DnsPayload, ephemeral_port};
use std::net::Ipv4Addr;

/// Size of the UDP header.
pub const UDP_HEADER_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UdpHeader {
    pub src_port: u16,
    pub dst_port: u16,
    /// Header plus payload.
    pub length: u16,
    /// Zero means "not computed", which IPv4 allows.
    pub checksum: u16,
}

impl UdpHeader {
    /// Header for `payload`, with the length field set and no checksum.
    pub fn for_payload(
        src_port: u16,
        dst_port: u16,
        payload: &DnsPayload,
    ) -> Result<Self, PacketErrors> {
        let length = u16::try_from(UDP_HEADER_LEN + payload.len())
            .map_err(|_| PacketErrors::PacketTooLarge(UDP_HEADER_LEN + payload.len()))?;

        Ok(UdpHeader {
            src_port,
            dst_port,
            length,
            checksum: 0,
        })
    }

    /// Same as [`UdpHeader::for_payload`] with a random ephemeral source port.
    pub fn with_random_src_port(dst_port: u16, payload: &DnsPayload) -> Result<Self, PacketErrors> {
        Self::for_payload(ephemeral_port(), dst_port, payload)
    }

    /// Fills in the checksum over the IPv4 pseudo-header, this header and `payload`.
    pub fn compute_checksum(&mut self, src: Ipv4Addr, dst: Ipv4Addr, payload: &DnsPayload) {
        self.checksum = 0;
        let mut segment = Vec::with_capacity(self.length as usize);
        segment.extend_from_slice(&self.marshal());
        segment.extend_from_slice(payload.as_bytes());
        self.checksum = udp_checksum(src, dst, &segment);
    }

    pub fn marshal(&self) -> [u8; UDP_HEADER_LEN] {
        let mut bytes = [0u8; UDP_HEADER_LEN];
        bytes[0..2].copy_from_slice(&self.src_port.to_be_bytes());
        bytes[2..4].copy_from_slice(&self.dst_port.to_be_bytes());
        bytes[4..6].copy_from_slice(&self.length.to_be_bytes());
        bytes[6..8].copy_from_slice(&self.checksum.to_be_bytes());
        bytes
    }

    pub fn parse(bytes: &[u8]) -> Result<Self, PacketErrors> {
        if bytes.len() < UDP_HEADER_LEN {
            return Err(PacketErrors::TooShort(bytes.len()));
        }
        Ok(UdpHeader {
            src_port: u16::from_be_bytes([bytes[0], bytes[1]]),
            dst_port: u16::from_be_bytes([bytes[2], bytes[3]]),
            length: u16::from_be_bytes([bytes[4], bytes[5]]),
            checksum: u16::from_be_bytes([bytes[6], bytes[7]]),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::{QueryMessage, RecordType};
    use crate::packet::checksum::PROTO_UDP;

    fn payload() -> DnsPayload {
        QueryMessage::new("example.com", RecordType::A)
            .with_id(0x1234)
            .build()
            .unwrap()
    }

    #[test]
    fn test_length_follows_payload() {
        let payload = payload();
        let header = UdpHeader::for_payload(40000, 53, &payload).unwrap();
        assert_eq!(header.length as usize, 8 + payload.len());
        assert_eq!(header.checksum, 0);

        let bytes = header.marshal();
        assert_eq!(&bytes[0..2], &40000u16.to_be_bytes());
        assert_eq!(&bytes[2..4], &[0x00, 0x35]);
        assert_eq!(UdpHeader::parse(&bytes).unwrap(), header);
    }

    #[test]
    fn test_random_src_port_is_ephemeral() {
        let header = UdpHeader::with_random_src_port(53, &payload()).unwrap();
        assert!(header.src_port >= crate::dns::id::EPHEMERAL_PORT_MIN);
        assert_eq!(header.dst_port, 53);
    }

    #[test]
    fn test_oversized_payload_rejected() {
        let big = DnsPayload::from_bytes(vec![0u8; u16::MAX as usize]).unwrap();
        assert!(matches!(
            UdpHeader::for_payload(1, 53, &big),
            Err(PacketErrors::PacketTooLarge(_))
        ));
    }

    #[test]
    fn test_checksum_verifies() {
        let src = Ipv4Addr::new(10, 0, 0, 1);
        let dst = Ipv4Addr::new(10, 0, 0, 53);
        let payload = payload();
        let mut header = UdpHeader::for_payload(50000, 53, &payload).unwrap();
        header.compute_checksum(src, dst, &payload);
        assert_ne!(header.checksum, 0);

        // Summing the pseudo-header and the checksummed segment yields all ones
        let mut segment = header.marshal().to_vec();
        segment.extend_from_slice(payload.as_bytes());
        let mut sum: u32 = 0;
        for pair in [src.octets(), dst.octets()].concat().chunks(2) {
            sum += ((pair[0] as u32) << 8) | pair[1] as u32;
        }
        sum += PROTO_UDP as u32 + segment.len() as u32;
        for pair in segment.chunks(2) {
            let hi = (pair[0] as u32) << 8;
            let lo = pair.get(1).copied().unwrap_or(0) as u32;
            sum += hi | lo;
        }
        while sum > 0xFFFF {
            sum = (sum >> 16) + (sum & 0xFFFF);
        }
        assert_eq!(sum, 0xFFFF);
    }
}
