//! Pool of pooled HTTP/3 connections keyed by `(host, port)`, with
//! dial-coalescing so concurrent requests to a cold host share one QUIC
//! handshake instead of racing N of them.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tokio::sync::{watch, Mutex};

use super::config::QuicConfig;
use super::connection::{QuicConnection, QuicConnectionBuilder};
use crate::base::neterror::NetError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Http3HostKey {
    pub host: String,
    pub port: u16,
}

struct PooledEntry {
    connection: Arc<Mutex<QuicConnection>>,
    established_at: Instant,
}

enum SlotState {
    Dialing(watch::Receiver<Option<()>>),
    Ready(PooledEntry),
}

/// HTTP/3 connection pool with per-host dial coalescing.
///
/// Grounded on the same shape as a `watch`-based session pool: the first
/// caller to a cold host starts the dial and publishes its outcome over a
/// `watch` channel; every other caller observes that one dial instead of
/// starting its own.
pub struct Http3SessionPool {
    slots: DashMap<Http3HostKey, SlotState>,
    max_age: Duration,
}

impl Default for Http3SessionPool {
    fn default() -> Self {
        Self::new(Duration::from_secs(300))
    }
}

impl Http3SessionPool {
    pub fn new(max_age: Duration) -> Self {
        Self {
            slots: DashMap::new(),
            max_age,
        }
    }

    /// Get (dialing if necessary, coalescing concurrent dials) a connection
    /// to `key`.
    pub async fn get_or_connect(
        &self,
        key: Http3HostKey,
        url: &str,
        config: QuicConfig,
        insecure_skip_verify: bool,
    ) -> Result<Arc<Mutex<QuicConnection>>, NetError> {
        loop {
            let mut waiter = None;
            if let Some(entry) = self.slots.get(&key) {
                match entry.value() {
                    SlotState::Ready(pooled) if pooled.established_at.elapsed() < self.max_age => {
                        return Ok(pooled.connection.clone());
                    }
                    SlotState::Ready(_) => {}
                    SlotState::Dialing(rx) => waiter = Some(rx.clone()),
                }
            }

            if let Some(mut rx) = waiter {
                let _ = rx.changed().await;
                continue;
            }

            // We are the coalescing leader: claim the slot, dial, publish.
            let (tx, rx) = watch::channel(None);
            self.slots.insert(key.clone(), SlotState::Dialing(rx));

            let dial_result = QuicConnectionBuilder::new()
                .url(url)?
                .config(config)
                .insecure_skip_verify(insecure_skip_verify)
                .connect()
                .await;

            match dial_result {
                Ok(connection) => {
                    let pooled = PooledEntry {
                        connection: Arc::new(Mutex::new(connection)),
                        established_at: Instant::now(),
                    };
                    let handle = pooled.connection.clone();
                    self.slots.insert(key.clone(), SlotState::Ready(pooled));
                    let _ = tx.send(Some(()));
                    return Ok(handle);
                }
                Err(e) => {
                    self.slots.remove(&key);
                    let _ = tx.send(Some(()));
                    return Err(e);
                }
            }
        }
    }

    /// Evict and close every pooled connection, e.g. on `close_quic_connections`.
    pub async fn close_all(&self) {
        let keys: Vec<Http3HostKey> = self.slots.iter().map(|e| e.key().clone()).collect();
        for key in keys {
            if let Some((_, SlotState::Ready(pooled))) = self.slots.remove(&key) {
                pooled.connection.lock().await.close("pool closed");
            }
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Snapshot of per-host pool occupancy, useful for diagnostics.
pub fn snapshot_keys(pool: &Http3SessionPool) -> HashMap<Http3HostKey, bool> {
    pool.slots
        .iter()
        .map(|e| {
            let ready = matches!(e.value(), SlotState::Ready(_));
            (e.key().clone(), ready)
        })
        .collect()
}
