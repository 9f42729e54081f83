//! TLS session and ECH caches.
//!
//! Each `(preset, protocol, host, port)` gets a bounded LRU of resumable TLS
//! session tickets (max 32 entries), the way a browser's session cache
//! never lets a single host monopolize the whole ticket store. ECH config
//! is cached separately per `(preset, host, port)` since it's fetched once
//! and reused across protocols and session-ticket rotations.
//!
//! Grounded in the bounded-stack-of-tickets pattern a Firefox/Chromium-style
//! `ClientSessionMemoryCache` uses: push-front on insert, evict from the
//! back once the bound is hit, so the most recently used tickets survive.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Max resumable sessions cached per `(preset, protocol, host, port)`.
pub const MAX_SESSIONS_PER_HOST: usize = 32;

/// How long a cached ECH config is trusted before being treated as stale
/// and re-fetched on the next dial.
pub const ECH_CONFIG_TTL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub preset: String,
    pub protocol: String,
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EchKey {
    pub preset: String,
    pub host: String,
    pub port: u16,
}

/// One resumable TLS session: the opaque ticket bytes BoringSSL hands back
/// plus enough metadata to decide whether it's still worth presenting.
#[derive(Debug, Clone)]
pub struct TlsSessionState {
    pub ticket: Arc<[u8]>,
    pub negotiated_alpn: Option<String>,
    pub created_at: Instant,
    pub max_early_data: u32,
}

impl TlsSessionState {
    pub fn new(ticket: Vec<u8>, negotiated_alpn: Option<String>, max_early_data: u32) -> Self {
        Self {
            ticket: Arc::from(ticket.into_boxed_slice()),
            negotiated_alpn,
            created_at: Instant::now(),
            max_early_data,
        }
    }

    pub fn supports_early_data(&self) -> bool {
        self.max_early_data > 0
    }
}

/// A small LRU stack, most-recently-used at the front, bounded to
/// `MAX_SESSIONS_PER_HOST`. Pushing an already-present entry (by ticket
/// identity) moves it to the front rather than duplicating it.
#[derive(Debug, Default)]
struct BoundedSessionStack {
    entries: Vec<TlsSessionState>,
}

impl BoundedSessionStack {
    fn push(&mut self, session: TlsSessionState) {
        self.entries.retain(|s| !Arc::ptr_eq(&s.ticket, &session.ticket));
        self.entries.insert(0, session);
        self.entries.truncate(MAX_SESSIONS_PER_HOST);
    }

    fn most_recent(&self) -> Option<&TlsSessionState> {
        self.entries.first()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Per-(preset,protocol,host,port) TLS session ticket cache, shared across
/// a `Session`'s connections.
#[derive(Default)]
pub struct SessionCache {
    stacks: DashMap<SessionKey, BoundedSessionStack>,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, key: SessionKey, session: TlsSessionState) {
        self.stacks.entry(key).or_default().push(session);
    }

    /// Most recently inserted session for `key`, if any — the one to
    /// present on the next dial attempt.
    pub fn get(&self, key: &SessionKey) -> Option<TlsSessionState> {
        self.stacks.get(key).and_then(|s| s.most_recent().cloned())
    }

    pub fn len_for(&self, key: &SessionKey) -> usize {
        self.stacks.get(key).map(|s| s.len()).unwrap_or(0)
    }

    pub fn clear(&self) {
        self.stacks.clear();
    }

    pub fn remove(&self, key: &SessionKey) {
        self.stacks.remove(key);
    }
}

/// Cached Encrypted Client Hello config. Per Testable Property in the
/// spec's TLS dial path, ECH config is never refreshed while an existing
/// session is being resumed for the same `(preset, host, port)`.
#[derive(Debug, Clone)]
pub struct EchConfigEntry {
    pub config_list: Arc<[u8]>,
    pub fetched_at: Instant,
}

impl EchConfigEntry {
    pub fn is_stale(&self) -> bool {
        self.fetched_at.elapsed() > ECH_CONFIG_TTL
    }
}

#[derive(Default)]
pub struct EchCache {
    entries: DashMap<EchKey, EchConfigEntry>,
}

impl EchCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, key: EchKey, config_list: Vec<u8>) {
        self.entries.insert(
            key,
            EchConfigEntry {
                config_list: Arc::from(config_list.into_boxed_slice()),
                fetched_at: Instant::now(),
            },
        );
    }

    /// Returns a fresh entry, or `None` if absent or stale (forcing a
    /// refetch — callers should not refresh while an entry is fresh, per
    /// the "never refresh ECH while resuming" rule).
    pub fn get_fresh(&self, key: &EchKey) -> Option<EchConfigEntry> {
        self.entries.get(key).and_then(|e| {
            if e.is_stale() {
                None
            } else {
                Some(e.clone())
            }
        })
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

/// Bundles the two caches a `Session` owns for its TLS dial path.
#[derive(Default)]
pub struct SessionCaches {
    pub tls: SessionCache,
    pub ech: EchCache,
}

impl SessionCaches {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot counts for diagnostics/tests, keyed by host.
    pub fn tls_session_counts(&self) -> HashMap<String, usize> {
        let mut counts = HashMap::new();
        for entry in self.tls.stacks.iter() {
            *counts.entry(entry.key().host.clone()).or_insert(0) += entry.value().len();
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> SessionKey {
        SessionKey {
            preset: "chrome".into(),
            protocol: "h2".into(),
            host: "example.com".into(),
            port: 443,
        }
    }

    #[test]
    fn evicts_beyond_bound() {
        let cache = SessionCache::new();
        for i in 0..(MAX_SESSIONS_PER_HOST + 10) {
            cache.insert(key(), TlsSessionState::new(vec![i as u8], None, 0));
        }
        assert_eq!(cache.len_for(&key()), MAX_SESSIONS_PER_HOST);
    }

    #[test]
    fn most_recent_wins() {
        let cache = SessionCache::new();
        cache.insert(key(), TlsSessionState::new(vec![1], None, 0));
        cache.insert(key(), TlsSessionState::new(vec![2], None, 0));
        let got = cache.get(&key()).unwrap();
        assert_eq!(&*got.ticket, &[2][..]);
    }

    #[test]
    fn ech_cache_reports_freshness() {
        let cache = EchCache::new();
        let key = EchKey {
            preset: "chrome".into(),
            host: "example.com".into(),
            port: 443,
        };
        assert!(cache.get_fresh(&key).is_none());
        cache.insert(key.clone(), vec![1, 2, 3]);
        assert!(cache.get_fresh(&key).is_some());
    }
}
