// src/models/server.rs
use serde::{Deserialize, Serialize};

/// Decoded answer to one ASE status probe.
///
/// A successful decode fills every optional field, even when the server sent
/// an empty string. The `Default` value is the "offline" record handed out for
/// every failed query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerStatus {
    pub server_name: Option<String>,
    pub game_mode: Option<String>,
    pub map_name: Option<String>,
    pub version: Option<String>,
    pub passworded: Option<bool>,
    pub current_players: u16,
    pub max_players: u16,
    pub players: Vec<String>,
}

impl ServerStatus {
    pub fn offline() -> Self {
        Self::default()
    }

    pub fn is_online(&self) -> bool {
        self.server_name.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub target: String,
    pub online: bool,
    pub status: ServerStatus,
    pub last_polled: u64,
}

impl StatusSnapshot {
    pub fn new(target: String, status: ServerStatus, last_polled: u64) -> Self {
        Self {
            target,
            online: status.is_online(),
            status,
            last_polled,
        }
    }

    /// One line of plain text describing the snapshot.
    pub fn summary(&self) -> String {
        let state = if self.online { "Online" } else { "Offline" };
        let name = self.status.server_name.as_deref().filter(|n| !n.is_empty()).unwrap_or("Unknown");
        let map = self.status.map_name.as_deref().filter(|m| !m.is_empty()).unwrap_or("Unknown");
        let players = if self.status.players.is_empty() {
            "none".to_string()
        } else {
            self.status.players.join(", ")
        };

        format!(
            "{} [{}] {} ({}/{}) map: {} players: {}",
            self.target,
            state,
            name,
            self.status.current_players,
            self.status.max_players,
            map,
            players
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offline_status_is_all_empty() {
        let status = ServerStatus::offline();
        assert!(!status.is_online());
        assert_eq!(status.current_players, 0);
        assert_eq!(status.max_players, 0);
        assert!(status.players.is_empty());
        assert_eq!(status.passworded, None);
    }

    #[test]
    fn summary_of_online_server() {
        let status = ServerStatus {
            server_name: Some("Freeroam".to_string()),
            game_mode: Some("default".to_string()),
            map_name: Some("Los Santos".to_string()),
            version: Some("1.6".to_string()),
            passworded: Some(false),
            current_players: 2,
            max_players: 32,
            players: vec!["CJ".to_string(), "Ryder".to_string()],
        };
        let snapshot = StatusSnapshot::new("127.0.0.1:22126".to_string(), status, 0);

        assert!(snapshot.online);
        assert_eq!(
            snapshot.summary(),
            "127.0.0.1:22126 [Online] Freeroam (2/32) map: Los Santos players: CJ, Ryder"
        );
    }

    #[test]
    fn summary_of_offline_server() {
        let snapshot = StatusSnapshot::new("example.org:22126".to_string(), ServerStatus::offline(), 0);

        assert!(!snapshot.online);
        assert_eq!(
            snapshot.summary(),
            "example.org:22126 [Offline] Unknown (0/0) map: Unknown players: none"
        );
    }
}
