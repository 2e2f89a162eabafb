//! Internet checksum helpers (RFC 1071) for the IPv4 header and the UDP
//! pseudo-header.

use std::net::Ipv4Addr;

pub(crate) const PROTO_UDP: u8 = 17;

/// Computes the IPv4 header checksum. The checksum field must be zero.
pub(crate) fn ip_checksum(header: &[u8]) -> u16 {
    checksum_fold(checksum_data(0, header))
}

/// Computes the UDP checksum including the IPv4 pseudo-header.
///
/// `segment` is the UDP header (checksum field zeroed) followed by the payload.
/// A computed value of zero is transmitted as all ones (RFC 768).
pub(crate) fn udp_checksum(src_ip: Ipv4Addr, dst_ip: Ipv4Addr, segment: &[u8]) -> u16 {
    let src = src_ip.octets();
    let dst = dst_ip.octets();
    let mut sum: u32 = 0;

    // Pseudo-header: src IP, dst IP, zero + protocol, UDP length
    sum += ((src[0] as u32) << 8) | (src[1] as u32);
    sum += ((src[2] as u32) << 8) | (src[3] as u32);
    sum += ((dst[0] as u32) << 8) | (dst[1] as u32);
    sum += ((dst[2] as u32) << 8) | (dst[3] as u32);
    sum += PROTO_UDP as u32;
    sum += segment.len() as u32;

    sum = checksum_data(sum, segment);

    match checksum_fold(sum) {
        0 => 0xFFFF,
        cs => cs,
    }
}

/// Adds data bytes to a running checksum sum.
fn checksum_data(mut sum: u32, data: &[u8]) -> u32 {
    let mut chunks = data.chunks_exact(2);
    for pair in &mut chunks {
        sum += ((pair[0] as u32) << 8) | (pair[1] as u32);
    }
    if let [last] = chunks.remainder() {
        sum += (*last as u32) << 8;
    }
    sum
}

/// Folds a 32-bit sum into a 16-bit one's complement checksum.
fn checksum_fold(mut sum: u32) -> u16 {
    while sum > 0xFFFF {
        sum = (sum >> 16) + (sum & 0xFFFF);
    }
    !sum as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ip_checksum_known_header() {
        // Classic example header from RFC 1071 discussions
        let header = [
            0x45, 0x00, 0x00, 0x73, 0x00, 0x00, 0x40, 0x00, 0x40, 0x11, 0x00, 0x00, 0xc0, 0xa8,
            0x00, 0x01, 0xc0, 0xa8, 0x00, 0xc7,
        ];
        assert_eq!(ip_checksum(&header), 0xb861);
    }

    #[test]
    fn test_checksum_verifies_to_zero() {
        let mut header = [
            0x45, 0x00, 0x00, 0x30, 0x00, 0x00, 0x00, 0x00, 0x80, 0x11, 0x00, 0x00, 10, 0, 0, 1,
            8, 8, 8, 8,
        ];
        let cs = ip_checksum(&header);
        header[10..12].copy_from_slice(&cs.to_be_bytes());
        assert_eq!(ip_checksum(&header), 0);
    }

    #[test]
    fn test_odd_length_segment() {
        let segment = [0x12, 0x34, 0x00, 0x35, 0x00, 0x09, 0x00, 0x00, 0xAB];
        let cs = udp_checksum(Ipv4Addr::new(10, 0, 0, 1), Ipv4Addr::new(10, 0, 0, 2), &segment);
        assert_ne!(cs, 0);
    }
}
