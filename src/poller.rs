// src/poller.rs
use actix_web::web;
use log::{debug, error, info};
use std::time::Duration;
use tokio::task::JoinSet;
use crate::config::{Config, Target};
use crate::query::query_server_status;
use crate::storage::memory::StatusStorage;

pub async fn run(config: Config, storage: web::Data<StatusStorage>) {
    let mut ticker = tokio::time::interval(config.poll_interval());
    let timeout = config.query_timeout();

    loop {
        ticker.tick().await;
        poll_once(&config.targets, timeout, &storage).await;
    }
}

/// Queries every target concurrently and stores one snapshot per target.
pub async fn poll_once(targets: &[Target], timeout: Duration, storage: &StatusStorage) {
    let mut tasks = JoinSet::new();

    for target in targets.iter().cloned() {
        tasks.spawn(async move {
            let status = query_server_status(&target.host, target.port, timeout).await;
            (target, status)
        });
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((target, status)) => {
                if status.is_online() {
                    info!(
                        "{} online: {} players ({}/{})",
                        target,
                        status.players.len(),
                        status.current_players,
                        status.max_players
                    );
                } else {
                    info!("{} offline", target);
                }
                storage.update(&target, status);
            }
            Err(e) => error!("Status poll task failed: {}", e),
        }
    }

    debug!("Poll finished, tracking {} targets", storage.len());
}
