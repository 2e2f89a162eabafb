//! Assembler configuration.
//!
//! With the `serde` feature, [`PacketOptions`] can be read from any serde
//! format; missing fields fall back to their defaults.

/// Default IPv4 TTL for crafted packets.
pub const DEFAULT_TTL: u8 = 128;

/// Well-known DNS server port.
pub const DNS_PORT: u16 = 53;

/// Packet-level knobs applied by the assembler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PacketOptions {
    /// TTL written to both the IPv4 header and the control message.
    pub ttl: u8,
    /// Egress interface index, already resolved by the caller. `0` lets the
    /// kernel route the packet.
    pub if_index: u32,
    /// Compute the UDP checksum instead of leaving it at zero.
    pub udp_checksum: bool,
    /// Set the IPv4 Don't Fragment bit.
    pub dont_fragment: bool,
}

impl PacketOptions {
    pub fn with_ttl(mut self, ttl: u8) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_if_index(mut self, if_index: u32) -> Self {
        self.if_index = if_index;
        self
    }

    pub fn with_udp_checksum(mut self, enabled: bool) -> Self {
        self.udp_checksum = enabled;
        self
    }

    pub fn with_dont_fragment(mut self, enabled: bool) -> Self {
        self.dont_fragment = enabled;
        self
    }
}

impl Default for PacketOptions {
    fn default() -> Self {
        PacketOptions {
            ttl: DEFAULT_TTL,
            if_index: 0,
            udp_checksum: false,
            dont_fragment: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = PacketOptions::default();
        assert_eq!(opts.ttl, 128);
        assert_eq!(opts.if_index, 0);
        assert!(!opts.udp_checksum);
        assert!(!opts.dont_fragment);
    }

    #[test]
    fn test_builder_setters() {
        let opts = PacketOptions::default()
            .with_ttl(64)
            .with_if_index(3)
            .with_udp_checksum(true)
            .with_dont_fragment(true);
        assert_eq!(opts.ttl, 64);
        assert_eq!(opts.if_index, 3);
        assert!(opts.udp_checksum);
        assert!(opts.dont_fragment);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_partial() {
        let opts: PacketOptions = serde_json::from_str(r#"{ "if_index": 7 }"#).unwrap();
        assert_eq!(opts.if_index, 7);
        assert_eq!(opts.ttl, DEFAULT_TTL);
    }
}
