//! # Question Encoder
//!
//! Encodes a single DNS question (RFC 1035 §4.1.2) into its canonical,
//! uncompressed wire form:
//!
//! ```text
//!   +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//!   |                                               |
//!   /                     QNAME                     /
//!   /                                               /
//!   +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//!   |                     QTYPE                     |
//!   +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//!   |                     QCLASS                    |
//!   +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//! ```
//!
//! QNAME is a sequence of labels, each one a length octet followed by that
//! many octets, terminated by the zero-length root label.
//!
//! Input is validated before a single byte is produced: empty labels, labels
//! over 63 bytes, names over 255 bytes, non-ASCII labels and unknown record
//! type tokens are all reported as [`QuestionErrors`]. The encoder never
//! returns a partially written buffer.
use std::{error::Error, fmt::Display, str::FromStr};

/// Longest label allowed by RFC 1035 §2.3.4.
pub const MAX_LABEL_LEN: usize = 63;

/// Longest encoded name (length octets and root label included).
pub const MAX_NAME_LEN: usize = 255;

/// The Internet class, used unless a question overrides it.
pub const CLASS_IN: RecordClass = RecordClass::In;

/// Record types a question may ask for.
///
/// The named variants are the fixed token vocabulary accepted by
/// [`RecordType::from_str`]. [`RecordType::Other`] carries an explicit raw
/// code and is only produced from a numeric token or [`RecordType::from_u16`];
/// an unrecognised token never silently turns into a numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    // A host address
    A,
    // An authoritative name server
    Ns,
    // The canonical name for an alias
    Cname,
    // Marks the start of a zone of authority
    Soa,
    // A well known service description
    Wks,
    // A domain name pointer
    Ptr,
    // Mail exchange
    Mx,
    // Service locator
    Srv,
    // IPv6 address (experimental, RFC 2874)
    A6,
    // Request for all records
    Any,
    Other(u16),
}

#[allow(clippy::wrong_self_convention)]
impl RecordType {
    /// Numeric TYPE code.
    pub fn to_u16(self) -> u16 {
        match self {
            RecordType::A => 1,
            RecordType::Ns => 2,
            RecordType::Cname => 5,
            RecordType::Soa => 6,
            RecordType::Wks => 11,
            RecordType::Ptr => 12,
            RecordType::Mx => 15,
            RecordType::Srv => 33,
            RecordType::A6 => 38,
            RecordType::Any => 255,
            RecordType::Other(code) => code,
        }
    }

    /// Maps a numeric code back to a named variant when there is one.
    pub fn from_u16(code: u16) -> Self {
        match code {
            1 => RecordType::A,
            2 => RecordType::Ns,
            5 => RecordType::Cname,
            6 => RecordType::Soa,
            11 => RecordType::Wks,
            12 => RecordType::Ptr,
            15 => RecordType::Mx,
            33 => RecordType::Srv,
            38 => RecordType::A6,
            255 => RecordType::Any,
            other => RecordType::Other(other),
        }
    }

    /// Encode the record type as a 2-byte big-endian value.
    pub fn to_bytes(self) -> [u8; 2] {
        self.to_u16().to_be_bytes()
    }
}

impl FromStr for RecordType {
    type Err = QuestionErrors;

    /// Parses a record type token, ignoring case.
    ///
    /// Accepts `a`, `ns`, `cname`, `soa`, `wks`, `ptr`, `mx`, `srv`, `a6`,
    /// `any`, a decimal code (`"28"`) or the RFC 3597 form (`"TYPE28"`).
    /// Code 0 is reserved and rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_ascii_lowercase();
        let record_type = match token.as_str() {
            "a" => RecordType::A,
            "ns" => RecordType::Ns,
            "cname" => RecordType::Cname,
            "soa" => RecordType::Soa,
            "wks" => RecordType::Wks,
            "ptr" => RecordType::Ptr,
            "mx" => RecordType::Mx,
            "srv" => RecordType::Srv,
            "a6" => RecordType::A6,
            "any" => RecordType::Any,
            other => {
                let digits = other.strip_prefix("type").unwrap_or(other);
                match parse_type_code(digits) {
                    Some(code) => RecordType::from_u16(code),
                    None => return Err(QuestionErrors::UnknownRecordType(s.to_string())),
                }
            }
        };
        Ok(record_type)
    }
}

/// Plain decimal code in 1..=65535: no sign, no leading zeros.
fn parse_type_code(digits: &str) -> Option<u16> {
    if digits.is_empty() || digits.starts_with('0') || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

impl Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordType::A => write!(f, "A"),
            RecordType::Ns => write!(f, "NS"),
            RecordType::Cname => write!(f, "CNAME"),
            RecordType::Soa => write!(f, "SOA"),
            RecordType::Wks => write!(f, "WKS"),
            RecordType::Ptr => write!(f, "PTR"),
            RecordType::Mx => write!(f, "MX"),
            RecordType::Srv => write!(f, "SRV"),
            RecordType::A6 => write!(f, "A6"),
            RecordType::Any => write!(f, "ANY"),
            RecordType::Other(code) => write!(f, "TYPE{}", code),
        }
    }
}

/// Record classes (RFC 1035 §3.2.4).
///
/// Questions default to [`CLASS_IN`]; anything else must be set explicitly
/// with [`DnsQuestion::with_class`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RecordClass {
    #[default]
    In,
    Ch,
    Hs,
    Any,
    Other(u16),
}

#[allow(clippy::wrong_self_convention)]
impl RecordClass {
    pub fn to_u16(self) -> u16 {
        match self {
            RecordClass::In => 1,
            RecordClass::Ch => 3,
            RecordClass::Hs => 4,
            RecordClass::Any => 255,
            RecordClass::Other(code) => code,
        }
    }

    pub fn from_u16(code: u16) -> Self {
        match code {
            1 => RecordClass::In,
            3 => RecordClass::Ch,
            4 => RecordClass::Hs,
            255 => RecordClass::Any,
            other => RecordClass::Other(other),
        }
    }

    pub fn to_bytes(self) -> [u8; 2] {
        self.to_u16().to_be_bytes()
    }
}

/// A single question: the name being asked about, and what to ask for.
#[derive(Debug, Clone, PartialEq)]
pub struct DnsQuestion {
    /// The domain name being queried.
    pub name: String,
    /// The type of DNS record being requested.
    pub record_type: RecordType,
    /// The class of the DNS record (almost always IN).
    pub class: RecordClass,
}

impl DnsQuestion {
    /// Creates a question for `name` in the Internet class.
    pub fn new(name: &str, record_type: RecordType) -> Self {
        DnsQuestion {
            name: name.to_string(),
            record_type,
            class: CLASS_IN,
        }
    }

    /// Creates a question from a record type token such as `"mx"` or `"A"`.
    pub fn from_token(name: &str, record_type: &str) -> Result<Self, QuestionErrors> {
        Ok(Self::new(name, record_type.parse()?))
    }

    /// Overrides the query class.
    pub fn with_class(mut self, class: RecordClass) -> Self {
        self.class = class;
        self
    }

    /// Encodes the question into its wire form: QNAME, QTYPE, QCLASS.
    pub fn encode(&self) -> Result<Vec<u8>, QuestionErrors> {
        let mut buf = encode_name(&self.name)?;
        buf.extend_from_slice(&self.record_type.to_bytes());
        buf.extend_from_slice(&self.class.to_bytes());
        Ok(buf)
    }
}

/// Encodes a question given as a name, a record type token and a class.
///
/// ```rust
/// use rawdns::dns::{encode_question, CLASS_IN};
///
/// let bytes = encode_question("example.com", "a", CLASS_IN).unwrap();
/// assert_eq!(bytes.len(), 13 + 4);
/// ```
pub fn encode_question(
    name: &str,
    record_type: &str,
    class: RecordClass,
) -> Result<Vec<u8>, QuestionErrors> {
    DnsQuestion::from_token(name, record_type)?
        .with_class(class)
        .encode()
}

/// Encodes `name` as a sequence of length-prefixed labels plus the root label.
///
/// A single trailing dot (the fully-qualified form) is accepted and does not
/// produce an extra label. `"."` encodes the root name.
pub fn encode_name(name: &str) -> Result<Vec<u8>, QuestionErrors> {
    if name.is_empty() {
        return Err(QuestionErrors::EmptyName);
    }

    let relative = name.strip_suffix('.').unwrap_or(name);
    let mut buf = Vec::with_capacity(relative.len() + 2);

    if !relative.is_empty() {
        for label in relative.split('.') {
            if label.is_empty() {
                return Err(QuestionErrors::EmptyLabel(name.to_string()));
            }
            if label.len() > MAX_LABEL_LEN {
                return Err(QuestionErrors::LabelTooLong(label.to_string()));
            }
            if !label.is_ascii() {
                return Err(QuestionErrors::NonAsciiLabel(label.to_string()));
            }
            buf.push(label.len() as u8);
            buf.extend_from_slice(label.as_bytes());
        }
    }
    buf.push(0);

    if buf.len() > MAX_NAME_LEN {
        return Err(QuestionErrors::NameTooLong(name.to_string()));
    }

    Ok(buf)
}

/// Errors raised while validating or encoding a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionErrors {
    EmptyName,
    /// Two consecutive dots, or a leading dot.
    EmptyLabel(String),
    LabelTooLong(String),
    NameTooLong(String),
    NonAsciiLabel(String),
    UnknownRecordType(String),
}

impl Display for QuestionErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuestionErrors::EmptyName => write!(f, "Domain name is empty"),
            QuestionErrors::EmptyLabel(s) => write!(f, "Domain name has an empty label: {}", s),
            QuestionErrors::LabelTooLong(s) => write!(f, "Label too long (>63): {}", s),
            QuestionErrors::NameTooLong(s) => write!(f, "Name is too long (>255): {}", s),
            QuestionErrors::NonAsciiLabel(s) => write!(f, "Label is not ASCII: {}", s),
            QuestionErrors::UnknownRecordType(s) => write!(f, "Unknown record type: {}", s),
        }
    }
}

impl Error for QuestionErrors {}
