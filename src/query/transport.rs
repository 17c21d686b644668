// src/query/transport.rs
use log::debug;
use std::fmt;
use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::{lookup_host, UdpSocket};

/// The ASE status probe is the single byte `s`.
pub const PROBE: u8 = b's';
pub const MAX_DATAGRAM_SIZE: usize = 16384;

#[derive(Debug)]
pub enum TransportError {
    Timeout,
    IoError(io::Error),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "No reply before the query timed out"),
            Self::IoError(e) => write!(f, "Query socket error: {}", e),
        }
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Timeout => None,
            Self::IoError(e) => Some(e),
        }
    }
}

impl From<io::Error> for TransportError {
    fn from(e: io::Error) -> Self {
        Self::IoError(e)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDatagram {
    bytes: Vec<u8>,
}

impl RawDatagram {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
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
}

/// Sends one status probe to `host:port` and waits for a single reply.
///
/// Resolution, send and receive all count against `timeout`. The socket is
/// dropped before returning, whatever the outcome.
pub async fn query(host: &str, port: u16, timeout: Duration) -> Result<RawDatagram, TransportError> {
    if timeout.is_zero() {
        return Err(TransportError::IoError(io::Error::new(
            io::ErrorKind::InvalidInput,
            "query timeout must be greater than zero",
        )));
    }

    match tokio::time::timeout(timeout, exchange(host, port)).await {
        Ok(result) => result,
        Err(_) => Err(TransportError::Timeout),
    }
}

async fn exchange(host: &str, port: u16) -> Result<RawDatagram, TransportError> {
    let server_addr = lookup_host((host, port))
        .await?
        .next()
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::AddrNotAvailable,
                format!("Could not resolve {}", host),
            )
        })?;

    let local_addr: SocketAddr = match server_addr {
        SocketAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, 0).into(),
        SocketAddr::V6(_) => (Ipv6Addr::UNSPECIFIED, 0).into(),
    };

    let socket = UdpSocket::bind(local_addr).await?;
    socket.connect(server_addr).await?;
    socket.send(&[PROBE]).await?;
    debug!("Status probe sent to {}", server_addr);

    let mut buffer = vec![0u8; MAX_DATAGRAM_SIZE];
    let len = socket.recv(&mut buffer).await?;
    buffer.truncate(len);
    debug!("Received {} byte reply from {}", len, server_addr);

    Ok(RawDatagram::new(buffer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    async fn responder(reply: Vec<u8>) -> (SocketAddr, tokio::task::JoinHandle<Vec<u8>>) {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = socket.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let mut buf = [0u8; 64];
            let (len, peer) = socket.recv_from(&mut buf).await.unwrap();
            socket.send_to(&reply, peer).await.unwrap();
            buf[..len].to_vec()
        });
        (addr, handle)
    }

    #[tokio::test]
    async fn sends_probe_and_returns_reply() {
        let (addr, handle) = responder(b"EYE1\x01\x01".to_vec()).await;

        let datagram = query("127.0.0.1", addr.port(), Duration::from_secs(2)).await.unwrap();
        assert_eq!(datagram.as_bytes(), b"EYE1\x01\x01");
        assert_eq!(datagram.len(), 6);
        assert_eq!(handle.await.unwrap(), vec![PROBE]);
    }

    #[tokio::test]
    async fn silent_server_times_out() {
        let silent = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let port = silent.local_addr().unwrap().port();

        let started = Instant::now();
        let result = query("127.0.0.1", port, Duration::from_millis(200)).await;

        assert!(matches!(result, Err(TransportError::Timeout)));
        assert!(started.elapsed() < Duration::from_secs(2));
        drop(silent);
    }

    #[tokio::test]
    async fn zero_timeout_is_rejected() {
        match query("127.0.0.1", 22126, Duration::ZERO).await {
            Err(TransportError::IoError(e)) => assert_eq!(e.kind(), io::ErrorKind::InvalidInput),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn empty_reply_is_returned_as_empty_datagram() {
        let (addr, _handle) = responder(Vec::new()).await;

        let datagram = query("127.0.0.1", addr.port(), Duration::from_secs(2)).await.unwrap();
        assert!(datagram.is_empty());
    }
}
