// src/query/mod.rs
pub mod decoder;
pub mod transport;

use log::{debug, warn};
use std::time::Duration;
use crate::models::server::ServerStatus;

/// Queries one ASE endpoint and decodes the reply.
///
/// Never fails: an unreachable server and an undecodable reply both come back
/// as `ServerStatus::offline()`.
pub async fn query_server_status(host: &str, port: u16, timeout: Duration) -> ServerStatus {
    let datagram = match transport::query(host, port, timeout).await {
        Ok(datagram) => datagram,
        Err(e) => {
            warn!("Status query to {}:{} failed: {}", host, port, e);
            return ServerStatus::offline();
        }
    };

    if !decoder::has_signature(datagram.as_bytes()) {
        warn!("Reply from {}:{} has an unrecognized signature, decoding anyway", host, port);
    }

    match decoder::decode(datagram.as_bytes()) {
        Ok(status) => {
            debug!(
                "Decoded {} byte reply from {}:{} with {} players",
                datagram.len(), host, port, status.current_players
            );
            status
        }
        Err(e) => {
            warn!("Could not decode reply from {}:{}: {}", host, port, e);
            ServerStatus::offline()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::decoder::tests::reply;
    use tokio::net::UdpSocket;

    async fn serve_once(reply: Vec<u8>) -> u16 {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let port = socket.local_addr().unwrap().port();
        tokio::spawn(async move {
            let mut buf = [0u8; 16];
            if let Ok((_, peer)) = socket.recv_from(&mut buf).await {
                let _ = socket.send_to(&reply, peer).await;
            }
        });
        port
    }

    #[tokio::test]
    async fn returns_decoded_status() {
        let port = serve_once(reply("Freeroam", "1", "32", &["CJ"])).await;

        let status = query_server_status("127.0.0.1", port, Duration::from_secs(2)).await;
        assert!(status.is_online());
        assert_eq!(status.server_name.as_deref(), Some("Freeroam"));
        assert_eq!(status.players, vec!["CJ"]);
    }

    #[tokio::test]
    async fn garbage_reply_yields_offline_status() {
        let port = serve_once(Vec::new()).await;

        let status = query_server_status("127.0.0.1", port, Duration::from_secs(2)).await;
        assert_eq!(status, ServerStatus::offline());
    }

    #[tokio::test]
    async fn silent_server_yields_offline_status_within_timeout() {
        let silent = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let port = silent.local_addr().unwrap().port();

        let started = std::time::Instant::now();
        let status = query_server_status("127.0.0.1", port, Duration::from_millis(250)).await;

        assert_eq!(status, ServerStatus::offline());
        assert_eq!(status.current_players, 0);
        assert!(status.players.is_empty());
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn concurrent_queries_do_not_interfere() {
        let first = serve_once(reply("First", "1", "8", &["a"])).await;
        let second = serve_once(reply("Second", "2", "16", &["b", "c"])).await;

        let (one, two) = tokio::join!(
            query_server_status("127.0.0.1", first, Duration::from_secs(2)),
            query_server_status("127.0.0.1", second, Duration::from_secs(2)),
        );

        assert_eq!(one.server_name.as_deref(), Some("First"));
        assert_eq!(one.players, vec!["a"]);
        assert_eq!(two.server_name.as_deref(), Some("Second"));
        assert_eq!(two.players, vec!["b", "c"]);
    }
}
