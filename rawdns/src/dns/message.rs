//! # Query Message Builder
//!
//! Composes a [`DnsHeader`] and one [`DnsQuestion`] into a complete DNS
//! message. The result is a [`DnsPayload`]: a sealed byte buffer whose length
//! can no longer change, which is what the packet layer requires before it
//! computes any length field.
//!
//! ```rust
//! use rawdns::dns::{QueryMessage, RecordType};
//!
//! let payload = QueryMessage::new("example.com", RecordType::A)
//!     .with_id(0x1234)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(&payload.as_bytes()[..2], &[0x12, 0x34]);
//! assert_eq!(payload.len(), 12 + 17);
//! ```
use crate::dns::header::{DnsHeader, HEADER_LEN};
use crate::dns::question::{DnsQuestion, QuestionErrors, RecordClass, RecordType};
use std::{error::Error, fmt::Display};
use tracing::{debug, trace};

/// A single-question DNS query under construction.
///
/// The header stays in step with the one question it carries; callers can
/// only change its ID.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryMessage {
    header: DnsHeader,
    question: DnsQuestion,
}

impl QueryMessage {
    /// New recursive query for `name` in the Internet class, with a random ID.
    pub fn new(name: &str, record_type: RecordType) -> Self {
        QueryMessage {
            header: DnsHeader::new(),
            question: DnsQuestion::new(name, record_type),
        }
    }

    /// Like [`QueryMessage::new`], taking a record type token (`"mx"`, `"A"`, `"33"`).
    pub fn from_token(name: &str, record_type: &str) -> Result<Self, MessageErrors> {
        Ok(Self::new(name, record_type.parse()?))
    }

    pub fn with_id(mut self, id: u16) -> Self {
        self.header = self.header.with_id(id);
        self
    }

    pub fn with_class(mut self, class: RecordClass) -> Self {
        self.question = self.question.with_class(class);
        self
    }

    /// Draws a new ID so the same question can be sent again without rebuilding it.
    pub fn regenerate_id(&mut self) {
        self.header.regenerate_id();
    }

    pub fn id(&self) -> u16 {
        self.header.id()
    }

    pub fn header(&self) -> &DnsHeader {
        &self.header
    }

    pub fn question(&self) -> &DnsQuestion {
        &self.question
    }

    /// Marshals the header followed immediately by the question.
    ///
    /// The question is validated first; on error no bytes are produced.
    pub fn build(&self) -> Result<DnsPayload, MessageErrors> {
        let question = self.question.encode()?;

        let mut bytes = Vec::with_capacity(HEADER_LEN + question.len());
        bytes.extend_from_slice(&self.header.marshal());
        bytes.extend_from_slice(&question);

        debug!(
            id = self.header.id(),
            opcode = self.header.header_flags().opcode,
            name = %self.question.name,
            record_type = %self.question.record_type,
            len = bytes.len(),
            "DNS query built"
        );
        trace!(bytes = ?bytes, "DNS query bytes");

        Ok(DnsPayload { bytes })
    }
}

/// Builds a complete query for `name` from a record type token.
pub fn build_query(name: &str, record_type: &str) -> Result<DnsPayload, MessageErrors> {
    QueryMessage::from_token(name, record_type)?.build()
}

/// A finished DNS message.
///
/// Only the builder, or [`DnsPayload::from_bytes`] on a buffer that at least
/// holds a full header, can create one. Its length is fixed from then on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsPayload {
    bytes: Vec<u8>,
}

impl DnsPayload {
    /// Seals a message produced elsewhere.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, MessageErrors> {
        if bytes.len() < HEADER_LEN {
            return Err(MessageErrors::Truncated(bytes.len()));
        }
        Ok(DnsPayload { bytes })
    }

    /// The message ID carried in the first two bytes.
    pub fn id(&self) -> u16 {
        u16::from_be_bytes([self.bytes[0], self.bytes[1]])
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl AsRef<[u8]> for DnsPayload {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// Errors raised while building or sealing a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageErrors {
    Question(QuestionErrors),
    /// Buffer shorter than a DNS header.
    Truncated(usize),
}

impl Display for MessageErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageErrors::Question(e) => write!(f, "{}", e),
            MessageErrors::Truncated(len) => write!(
                f,
                "DNS message of {} bytes is shorter than the {} byte header",
                len, HEADER_LEN
            ),
        }
    }
}

impl Error for MessageErrors {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            MessageErrors::Question(e) => Some(e),
            MessageErrors::Truncated(_) => None,
        }
    }
}

impl From<QuestionErrors> for MessageErrors {
    fn from(value: QuestionErrors) -> Self {
        MessageErrors::Question(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::header::FLAGS_STANDARD_QUERY;

    #[test]
    fn test_build_literal_message() {
        let payload = QueryMessage::new("example.com", RecordType::A)
            .with_id(0x1234)
            .build()
            .unwrap();

        let mut expected = vec![
            0x12, 0x34, 0x01, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        ];
        expected.extend_from_slice(&[7, b'e', b'x', b'a', b'm', b'p', b'l', b'e']);
        expected.extend_from_slice(&[3, b'c', b'o', b'm', 0, 0x00, 0x01, 0x00, 0x01]);

        assert_eq!(payload.as_bytes(), expected.as_slice());
        assert_eq!(payload.id(), 0x1234);
    }

    #[test]
    fn test_length_is_header_plus_question() {
        let names = [
            "a".to_string(),
            "example.com".to_string(),
            "a.b.c.d.e.f.g".to_string(),
            vec!["z".repeat(63); 3].join("."),
        ];
        for name in &names {
            let msg = QueryMessage::new(name, RecordType::Srv);
            let question_len = msg.question.encode().unwrap().len();
            let payload = msg.build().unwrap();
            assert_eq!(payload.len(), HEADER_LEN + question_len, "{}", name);
        }
    }

    #[test]
    fn test_build_query_from_token() {
        let payload = build_query("example.com", "MX").unwrap();
        let bytes = payload.as_bytes();

        assert_ne!(payload.id(), 0);
        assert_eq!(u16::from_be_bytes([bytes[2], bytes[3]]), FLAGS_STANDARD_QUERY);
        assert_eq!(u16::from_be_bytes([bytes[4], bytes[5]]), 1);
        let qtype = u16::from_be_bytes([bytes[bytes.len() - 4], bytes[bytes.len() - 3]]);
        assert_eq!(qtype, 15);
    }

    #[test]
    fn test_build_query_rejects_unknown_type() {
        let result = build_query("example.com", "bogus");
        assert!(matches!(
            result,
            Err(MessageErrors::Question(QuestionErrors::UnknownRecordType(_)))
        ));
    }

    #[test]
    fn test_build_rejects_bad_name() {
        let result = QueryMessage::new("example..com", RecordType::A).build();
        assert!(matches!(
            result,
            Err(MessageErrors::Question(QuestionErrors::EmptyLabel(_)))
        ));
    }

    #[test]
    fn test_class_override_is_encoded() {
        let payload = QueryMessage::new("version.bind", RecordType::Other(16))
            .with_class(RecordClass::Ch)
            .build()
            .unwrap();
        let bytes = payload.as_bytes();
        assert_eq!(&bytes[bytes.len() - 4..], &[0x00, 0x10, 0x00, 0x03]);
    }

    #[test]
    fn test_regenerate_id_changes_only_header() {
        let mut msg = QueryMessage::new("example.com", RecordType::A).with_id(1);
        let before = msg.build().unwrap();
        msg.regenerate_id();
        let after = msg.build().unwrap();

        assert_eq!(after.id(), msg.id());
        assert_eq!(&before.as_bytes()[2..], &after.as_bytes()[2..]);
    }

    #[test]
    fn test_header_counts_fixed_to_one_question() {
        let mut msg = QueryMessage::new("example.com", RecordType::Any)
            .with_id(0x0102)
            .with_class(RecordClass::Any);
        msg.regenerate_id();
        assert_eq!(msg.header().counts(), [1, 0, 0, 0]);

        let payload = msg.build().unwrap();
        let bytes = payload.as_bytes();
        assert_eq!(&bytes[..HEADER_LEN], &msg.header().marshal());
        assert_eq!(&bytes[4..HEADER_LEN], &[0, 1, 0, 0, 0, 0, 0, 0]);
        assert_eq!(bytes.len(), HEADER_LEN + msg.question().encode().unwrap().len());
    }

    #[test]
    fn test_seal_foreign_bytes() {
        assert_eq!(
            DnsPayload::from_bytes(vec![0u8; 5]),
            Err(MessageErrors::Truncated(5))
        );
        let sealed = DnsPayload::from_bytes(vec![0xBE, 0xEF, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]).unwrap();
        assert_eq!(sealed.id(), 0xBEEF);
    }
}
