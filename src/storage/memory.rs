// src/storage/memory.rs
use dashmap::DashMap;
use std::time::{SystemTime, UNIX_EPOCH};
use crate::config::Target;
use crate::models::server::{ServerStatus, StatusSnapshot};

/// Latest status per target. Each poll replaces the previous entry.
pub struct StatusStorage {
    snapshots: DashMap<String, StatusSnapshot>,
}

impl StatusStorage {
    pub fn new() -> Self {
        Self {
            snapshots: DashMap::new(),
        }
    }

    pub fn update(&self, target: &Target, status: ServerStatus) {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        let label = target.label();
        self.snapshots.insert(label.clone(), StatusSnapshot::new(label, status, now));
    }

    pub fn get(&self, label: &str) -> Option<StatusSnapshot> {
        self.snapshots.get(label).map(|r| r.value().clone())
    }

    pub fn get_all(&self) -> Vec<StatusSnapshot> {
        let mut snapshots: Vec<StatusSnapshot> =
            self.snapshots.iter().map(|r| r.value().clone()).collect();
        snapshots.sort_by(|a, b| a.target.cmp(&b.target));
        snapshots
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }
}
