//! # DNS query encoding
//!
//! Builds DNS query messages byte for byte, following RFC 1035 §4.1.
//!
//! ## Modules
//!
//! - `question` — validates a name and encodes one question (QNAME, QTYPE, QCLASS).
//! - `header` — the 12-byte header: ID, flags and the four section counts.
//! - `message` — header + question, sealed into a [`DnsPayload`].
//! - `id` — process-wide random source for message IDs and ephemeral ports.
//!
//! ## Quick Example
//!
//! ```rust
//! use rawdns::dns::build_query;
//!
//! let payload = build_query("example.com", "a").unwrap();
//! assert_eq!(payload.len(), 12 + 17);
//! ```
//!
//! No name compression is performed: a query carries exactly one name, so
//! there is nothing to point back to.

pub mod header;
pub mod id;
pub mod message;
pub mod question;

pub use self::header::{DnsHeader, DnsHeaderFlags, FLAGS_STANDARD_QUERY, HEADER_LEN, OpCodeOptions};
pub use self::id::{ephemeral_port, generate_id};
pub use self::message::{DnsPayload, MessageErrors, QueryMessage, build_query};
pub use self::question::{
    CLASS_IN, DnsQuestion, QuestionErrors, RecordClass, RecordType, encode_name, encode_question,
};
