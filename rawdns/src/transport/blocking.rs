//! Blocking exchange over `std::net::UdpSocket`.

use super::servers::get_servers;
use super::{Exchange, MAX_RESPONSE_LEN, UdpErrors, check_response};
use crate::dns::{DnsPayload, build_query};
use std::io::ErrorKind;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Sends `query` to `server` over a connected UDP socket and waits for one reply.
///
/// # Errors
/// [`UdpErrors::Timeout`] if nothing arrives within `timeout`, and
/// [`UdpErrors::IdResponseInvalid`] if the reply belongs to another query.
pub fn exchange(
    query: &DnsPayload,
    server: SocketAddr,
    timeout: Duration,
) -> Result<Exchange, UdpErrors> {
    let bind_addr: SocketAddr = if server.is_ipv4() {
        (Ipv4Addr::UNSPECIFIED, 0).into()
    } else {
        (Ipv6Addr::UNSPECIFIED, 0).into()
    };
    let socket = UdpSocket::bind(bind_addr)?;
    socket.set_read_timeout(Some(timeout))?;
    socket.set_write_timeout(Some(timeout))?;
    socket.connect(server)?;

    let started = Instant::now();
    socket.send(query.as_bytes())?;

    let mut buf = [0u8; MAX_RESPONSE_LEN];
    let len = match socket.recv(&mut buf) {
        Ok(len) => len,
        Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
            warn!(%server, id = query.id(), "DNS query timed out");
            return Err(UdpErrors::Timeout(server));
        }
        Err(e) => return Err(e.into()),
    };
    let rtt = started.elapsed();

    let response = &buf[..len];
    if let Err(e) = check_response(query, response) {
        warn!(%server, error = %e, "Discarding DNS response");
        return Err(e);
    }

    debug!(%server, id = query.id(), rtt_us = rtt.as_micros() as u64, len, "DNS response received");

    Ok(Exchange {
        server,
        id: query.id(),
        rtt,
        response: response.to_vec(),
    })
}

/// Builds a query for `name` and exchanges it with the first configured server.
pub fn query(name: &str, record_type: &str, timeout: Duration) -> Result<Exchange, UdpErrors> {
    let payload = build_query(name, record_type)?;
    let server = get_servers().first().copied().ok_or(UdpErrors::NoServers)?;
    exchange(&payload, server, timeout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::{QueryMessage, RecordType};
    use crate::transport::servers::{reset_servers, set_servers};
    use crate::transport::test_support::spawn_responder;

    fn payload() -> DnsPayload {
        QueryMessage::new("example.com", RecordType::A).build().unwrap()
    }

    #[test]
    fn test_exchange_roundtrip() {
        let server = spawn_responder(1, false);
        let query = payload();

        let reply = exchange(&query, server, Duration::from_secs(2)).unwrap();
        assert_eq!(reply.server, server);
        assert_eq!(reply.id, query.id());
        assert_eq!(reply.response.len(), query.len());
        assert!(reply.rtt < Duration::from_secs(2));
    }

    #[test]
    fn test_exchange_id_mismatch() {
        let server = spawn_responder(1, true);
        let result = exchange(&payload(), server, Duration::from_secs(2));
        assert!(matches!(result, Err(UdpErrors::IdResponseInvalid { .. })));
    }

    #[test]
    fn test_exchange_timeout() {
        // Bound but never answers
        let silent = UdpSocket::bind("127.0.0.1:0").unwrap();
        let server = silent.local_addr().unwrap();

        let result = exchange(&payload(), server, Duration::from_millis(100));
        assert!(matches!(result, Err(UdpErrors::Timeout(addr)) if addr == server));
    }

    #[test]
    fn test_query_uses_configured_server() {
        let server = spawn_responder(1, false);
        let addr = server.to_string();
        set_servers(&[addr.as_str()]).unwrap();

        let result = query("example.com", "a", Duration::from_secs(2));
        reset_servers();

        assert_eq!(result.unwrap().server, server);
        assert!(matches!(
            query("example.com", "bogus", Duration::from_millis(10)),
            Err(UdpErrors::Message(_))
        ));
    }
}
