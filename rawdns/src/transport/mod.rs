//! # Transport helpers
//!
//! Thin glue for sending a built query over an ordinary connected UDP socket
//! and timing the reply. It sits outside the encoding core: it only builds a
//! message through [`crate::dns`] and reads the reply's 16-bit ID to make sure
//! the answer belongs to the question. Replies are not decoded further and
//! nothing is retransmitted.
//!
//! | Feature     | Provides                                                   |
//! |-------------|------------------------------------------------------------|
//! | (always)    | `servers` list configuration, [`RttStats`]                 |
//! | `std`       | blocking [`exchange`] and [`query`]                        |
//! | `tokio-dep` | [`exchange_async`] and bounded concurrent [`fan_out`]      |

pub mod servers;
pub mod stats;

pub use self::stats::RttStats;

use crate::dns::{DnsPayload, MessageErrors};
use std::net::SocketAddr;
use std::time::Duration;
use std::{error::Error, fmt::Display};

/// Replies larger than this are cut off by the receive buffer.
pub const MAX_RESPONSE_LEN: usize = 512;

cfg_if::cfg_if! {
    if #[cfg(feature = "std")] {
        mod blocking;
        pub use self::blocking::{exchange, query};
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "tokio-dep")] {
        mod async_udp;
        #[cfg_attr(docsrs, doc(cfg(feature = "tokio-dep")))]
        pub use self::async_udp::{FanOutReport, exchange_async, fan_out};
    }
}

/// Outcome of one successful query/reply round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub server: SocketAddr,
    pub id: u16,
    pub rtt: Duration,
    /// Raw reply bytes, left undecoded.
    pub response: Vec<u8>,
}

/// Checks a reply against the query it answers.
pub(crate) fn check_response(query: &DnsPayload, response: &[u8]) -> Result<(), UdpErrors> {
    match response {
        [hi, lo, ..] if u16::from_be_bytes([*hi, *lo]) == query.id() => Ok(()),
        [hi, lo, ..] => Err(UdpErrors::IdResponseInvalid {
            expected: query.id(),
            got: u16::from_be_bytes([*hi, *lo]),
        }),
        _ => Err(UdpErrors::ShortResponse(response.len())),
    }
}

/// Represents errors that may occur when sending or receiving DNS queries over UDP.
#[derive(Debug)]
pub enum UdpErrors {
    SocketIo(std::io::Error),
    Timeout(SocketAddr),
    IdResponseInvalid { expected: u16, got: u16 },
    ShortResponse(usize),
    NoServers,
    Message(MessageErrors),
}

impl Display for UdpErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UdpErrors::SocketIo(e) => write!(f, "{}", e),
            UdpErrors::Timeout(server) => write!(f, "No DNS response from {} before the timeout", server),
            UdpErrors::IdResponseInvalid { expected, got } => write!(
                f,
                "The DNS query's response ID didn't match with the DNS question sent.\nExpected: {} Got: {}",
                expected, got
            ),
            UdpErrors::ShortResponse(len) => write!(f, "DNS response too short: {} bytes", len),
            UdpErrors::NoServers => write!(f, "No DNS server is configured"),
            UdpErrors::Message(e) => write!(f, "{}", e),
        }
    }
}

impl Error for UdpErrors {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            UdpErrors::SocketIo(e) => Some(e),
            UdpErrors::Message(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for UdpErrors {
    fn from(value: std::io::Error) -> Self {
        UdpErrors::SocketIo(value)
    }
}

impl From<MessageErrors> for UdpErrors {
    fn from(value: MessageErrors) -> Self {
        UdpErrors::Message(value)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::{QueryMessage, RecordType};

    #[test]
    fn test_check_response() {
        let query = QueryMessage::new("example.com", RecordType::A)
            .with_id(0x0A0B)
            .build()
            .unwrap();

        assert!(check_response(&query, &[0x0A, 0x0B, 0x81, 0x80]).is_ok());
        assert!(matches!(
            check_response(&query, &[0x0A, 0x0C]),
            Err(UdpErrors::IdResponseInvalid { expected: 0x0A0B, got: 0x0A0C })
        ));
        assert!(matches!(
            check_response(&query, &[0x0A]),
            Err(UdpErrors::ShortResponse(1))
        ));
    }
}
