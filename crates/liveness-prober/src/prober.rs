//! Liveness probing
//!
//! A probe is one status query with its own connection. Failure of any kind
//! means the server is offline; retries belong to the caller.

use crate::codec::{self, decode_status_response, read_frame};
use crate::error::ProbeError;
use async_trait::async_trait;
use std::time::Instant;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{debug, instrument};
use warden_core::{Metrics, ProbeTarget, ServerState};

/// Source of truth for whether the controlled server is up.
#[async_trait]
pub trait Prober: Send + Sync {
    /// Queries the server once. Never returns `ServerState::Unknown`.
    async fn probe(&self) -> ServerState;
}

/// Prober speaking the Minecraft Java Edition server list ping.
#[derive(Debug, Clone)]
pub struct SlpProber {
    target: ProbeTarget,
}

impl SlpProber {
    pub fn new(target: ProbeTarget) -> Self {
        Self { target }
    }

    pub fn target(&self) -> &ProbeTarget {
        &self.target
    }

    /// Runs one status exchange, bounded by the target's timeout.
    pub async fn query(&self) -> Result<Option<Metrics>, ProbeError> {
        let limit = self.target.timeout;
        tokio::time::timeout(limit, self.exchange())
            .await
            .map_err(|_| ProbeError::Timeout(limit))?
    }

    async fn exchange(&self) -> Result<Option<Metrics>, ProbeError> {
        let host = self.target.host.as_str();
        let mut stream = TcpStream::connect((host, self.target.port)).await?;
        stream
            .write_all(&codec::handshake_packet(host, self.target.port))
            .await?;

        let sent_at = Instant::now();
        stream.write_all(&codec::status_request_packet()).await?;
        let payload = read_frame(&mut stream).await?;
        let latency = sent_at.elapsed();

        let status = decode_status_response(&payload)?;
        Ok(status.into_metrics(latency))
    }
}

#[async_trait]
impl Prober for SlpProber {
    #[instrument(skip(self), fields(host = %self.target.host, port = self.target.port))]
    async fn probe(&self) -> ServerState {
        match self.query().await {
            Ok(metrics) => {
                debug!(players = metrics.as_ref().map(|m| m.online), "server reachable");
                ServerState::Online(metrics)
            }
            Err(err) => {
                debug!(error = %err, "server unreachable");
                ServerState::Offline
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::net::TcpListener;

    const STATUS_JSON: &str =
        r#"{"version":{"name":"1.20.4","protocol":765},"players":{"max":10,"online":2},"description":"hello"}"#;

    fn target(port: u16, timeout: Duration) -> ProbeTarget {
        ProbeTarget {
            host: "127.0.0.1".to_string(),
            port,
            timeout,
        }
    }

    /// Accepts one connection and answers the status request with `reply`.
    async fn fake_server(reply: Vec<u8>) -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let handshake = read_frame(&mut socket).await.unwrap();
            assert_eq!(handshake[0], 0x00);
            let request = read_frame(&mut socket).await.unwrap();
            assert_eq!(request, vec![0x00]);
            socket.write_all(&reply).await.unwrap();
        });
        port
    }

    #[tokio::test]
    async fn reachable_server_reports_metrics() {
        let port = fake_server(codec::status_response_packet(STATUS_JSON)).await;
        let prober = SlpProber::new(target(port, Duration::from_secs(2)));

        let state = prober.probe().await;
        let metrics = state.metrics().expect("metrics");
        assert_eq!((metrics.online, metrics.max), (2, 10));
        assert_eq!(metrics.motd.as_deref(), Some("hello"));
        assert!(metrics.latency_ms >= 0.0);
    }

    #[tokio::test]
    async fn closed_port_is_offline() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let prober = SlpProber::new(target(port, Duration::from_secs(2)));
        assert_eq!(prober.probe().await, ServerState::Offline);
    }

    #[tokio::test]
    async fn malformed_reply_is_offline() {
        let port = fake_server(codec::frame(0x00, b"\x05{not")).await;
        let prober = SlpProber::new(target(port, Duration::from_secs(2)));
        assert_eq!(prober.probe().await, ServerState::Offline);
    }

    #[tokio::test]
    async fn silent_server_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let hold = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
            drop(socket);
        });

        let prober = SlpProber::new(target(port, Duration::from_millis(200)));
        let started = Instant::now();
        let err = prober.query().await.unwrap_err();
        assert!(matches!(err, ProbeError::Timeout(_)));
        assert!(started.elapsed() < Duration::from_secs(2));
        hold.abort();
    }
}
