#![cfg_attr(docsrs, feature(doc_cfg))]
//! # rawdns
//!
//! Crafts DNS query messages byte for byte and, when needed, the raw IPv4/UDP
//! envelope required to send them outside the host's normal socket stack, so
//! the sender chooses the source address, the egress interface and the TTL.
//!
//! ## Features
//!
//! | Feature     | Description                                                        |
//! |-------------|--------------------------------------------------------------------|
//! | `std`       | (default) blocking UDP exchange helpers in [`transport`].           |
//! | `tokio-dep` | async exchange and bounded concurrent fan-out over Tokio.           |
//! | `serde`     | `Serialize`/`Deserialize` for [`packet::PacketOptions`].            |
//!
//! With `default-features = false` only the encoding layers (`dns`, `packet`)
//! and the server list configuration are built.
//!
//! ## Quick Start
//!
//! ### Encode a query
//!
//! ```rust
//! use rawdns::dns::{QueryMessage, RecordType};
//!
//! let payload = QueryMessage::new("example.com", RecordType::A)
//!     .with_id(0x1234)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(&payload.as_bytes()[..12], &[0x12, 0x34, 0x01, 0x00, 0x00, 0x01, 0, 0, 0, 0, 0, 0]);
//! ```
//!
//! ### Wrap it for a raw socket
//!
//! ```rust
//! use std::net::Ipv4Addr;
//! use rawdns::dns::build_query;
//! use rawdns::packet::{PacketOptions, RawPacketContext, DNS_PORT};
//!
//! let payload = build_query("example.com", "mx").unwrap();
//! let packet = RawPacketContext::new(Ipv4Addr::new(192, 168, 1, 20), Ipv4Addr::new(9, 9, 9, 9))
//!     .with_dest_port(DNS_PORT)
//!     .with_options(PacketOptions::default().with_if_index(2))
//!     .with_dns_message(payload)
//!     .assemble()
//!     .unwrap();
//!
//! // packet.ip_header, packet.payload and packet.control go to the raw send call
//! assert_eq!(packet.control.if_index, 2);
//! ```
//!
//! ## Error Handling
//!
//! Each layer reports through its own enum implementing `Display` and `Error`:
//!
//! - `QuestionErrors` / `MessageErrors` — invalid names or record type tokens.
//! - `PacketErrors` — assembling before the message is set, missing ports or
//!   addresses, oversized datagrams.
//! - `UdpErrors` — socket failures, timeouts and mismatched reply IDs.
//!
//! ## Logging
//!
//! Events are emitted through [`tracing`]; install any subscriber to see them.

pub mod dns;

pub mod packet;

pub mod transport;
