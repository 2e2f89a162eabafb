//! Async exchange over `tokio::net::UdpSocket`, plus a bounded fan-out for
//! running many lookups at once.

use super::{Exchange, MAX_RESPONSE_LEN, RttStats, UdpErrors, check_response};
use crate::dns::{DnsPayload, QueryMessage, RecordType};
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::UdpSocket;
use tokio::sync::{Semaphore, mpsc};
use tokio::time::timeout;
use tracing::{debug, warn};

/// Async counterpart of [`super::exchange`].
pub async fn exchange_async(
    query: &DnsPayload,
    server: SocketAddr,
    wait: Duration,
) -> Result<Exchange, UdpErrors> {
    let bind_addr: SocketAddr = if server.is_ipv4() {
        (Ipv4Addr::UNSPECIFIED, 0).into()
    } else {
        (Ipv6Addr::UNSPECIFIED, 0).into()
    };
    let socket = UdpSocket::bind(bind_addr).await?;
    socket.connect(server).await?;

    let started = Instant::now();
    match timeout(wait, socket.send(query.as_bytes())).await {
        Ok(sent) => {
            sent?;
        }
        Err(_) => return Err(UdpErrors::Timeout(server)),
    }

    let mut buf = [0u8; MAX_RESPONSE_LEN];
    let len = match timeout(wait, socket.recv(&mut buf)).await {
        Ok(Ok(len)) => len,
        Ok(Err(e)) => return Err(e.into()),
        Err(_) => {
            warn!(%server, id = query.id(), "DNS query timed out");
            return Err(UdpErrors::Timeout(server));
        }
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

/// Results of a [`fan_out`] run, in completion order.
#[derive(Debug)]
pub struct FanOutReport {
    pub stats: RttStats,
    pub outcomes: Vec<(String, Result<Exchange, UdpErrors>)>,
}

/// Looks up every name in `names` against `server`, with at most
/// `concurrency` exchanges in flight.
///
/// Each lookup runs in its own task and reports back over a channel; the
/// report is complete once every task has finished.
pub async fn fan_out(
    names: Vec<String>,
    record_type: RecordType,
    server: SocketAddr,
    concurrency: usize,
    wait: Duration,
) -> FanOutReport {
    let permits = Arc::new(Semaphore::new(concurrency.max(1)));
    let (tx, mut rx) = mpsc::channel(names.len().max(1));

    for name in names {
        let permits = Arc::clone(&permits);
        let tx = tx.clone();
        tokio::spawn(async move {
            let Ok(_permit) = permits.acquire_owned().await else {
                return;
            };
            let outcome = match QueryMessage::new(&name, record_type).build() {
                Ok(query) => exchange_async(&query, server, wait).await,
                Err(e) => Err(e.into()),
            };
            let _ = tx.send((name, outcome)).await;
        });
    }
    drop(tx);

    let mut report = FanOutReport {
        stats: RttStats::new(),
        outcomes: Vec::new(),
    };
    while let Some((name, outcome)) = rx.recv().await {
        match &outcome {
            Ok(exchange) => report.stats.record(exchange.rtt),
            Err(_) => report.stats.record_failure(),
        }
        report.outcomes.push((name, outcome));
    }

    debug!(
        ok = report.stats.count,
        failed = report.stats.failures,
        mean_rtt_us = report.stats.mean().map(|d| d.as_micros() as u64),
        "Fan-out finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::test_support::spawn_responder;

    #[tokio::test]
    async fn test_exchange_async_roundtrip() {
        let server = spawn_responder(1, false);
        let query = QueryMessage::new("example.com", RecordType::Mx).build().unwrap();

        let reply = exchange_async(&query, server, Duration::from_secs(2)).await.unwrap();
        assert_eq!(reply.id, query.id());
        assert_eq!(reply.server, server);
    }

    #[tokio::test]
    async fn test_exchange_async_timeout() {
        let silent = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();
        let server = silent.local_addr().unwrap();
        let query = QueryMessage::new("example.com", RecordType::A).build().unwrap();

        let result = exchange_async(&query, server, Duration::from_millis(100)).await;
        assert!(matches!(result, Err(UdpErrors::Timeout(_))));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_fan_out_collects_stats() {
        let server = spawn_responder(4, false);
        let names = vec![
            "a.example.com".to_string(),
            "b.example.com".to_string(),
            "c.example.com".to_string(),
            "d.example.com".to_string(),
            "bad..example.com".to_string(),
        ];

        let report = fan_out(names, RecordType::A, server, 2, Duration::from_secs(2)).await;

        assert_eq!(report.outcomes.len(), 5);
        assert_eq!(report.stats.count, 4);
        assert_eq!(report.stats.failures, 1);
        assert!(report.stats.mean().is_some());

        let (_, failed) = report
            .outcomes
            .iter()
            .find(|(name, _)| name == "bad..example.com")
            .unwrap();
        assert!(matches!(failed, Err(UdpErrors::Message(_))));
    }
}
