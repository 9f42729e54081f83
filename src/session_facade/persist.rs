//! Versioned `Session` persistence and the distributed-cache key format for
//! TLS session tickets / ECH configs.
//!
//! Grounded on the same base64/serde stack `session/mod.rs` already uses for
//! in-memory caches; this module is the wire format for shipping that state
//! out of process.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use time::OffsetDateTime;

use crate::cookies::canonical_cookie::{CanonicalCookie, CookiePriority, SameSite};

pub const CURRENT_VERSION: u32 = 2;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedCookie {
    pub domain: String,
    pub path: String,
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "time::serde::rfc3339::option")]
    pub expires: Option<OffsetDateTime>,
    pub secure: bool,
    pub http_only: bool,
}

impl From<CanonicalCookie> for PersistedCookie {
    fn from(cookie: CanonicalCookie) -> Self {
        Self {
            domain: cookie.domain,
            path: cookie.path,
            name: cookie.name,
            value: cookie.value,
            expires: cookie.expiration_time,
            secure: cookie.secure,
            http_only: cookie.http_only,
        }
    }
}

impl PersistedCookie {
    /// Reconstitute a [`CanonicalCookie`] at restore time. `host_only` and
    /// `same_site`/`priority` aren't part of the persisted shape, so they
    /// fall back to the same defaults `CanonicalCookie::new` uses; a
    /// restored cookie simply re-learns them on its next `Set-Cookie`.
    pub fn into_canonical(self, now: OffsetDateTime) -> CanonicalCookie {
        let mut cookie = CanonicalCookie::new(self.name, self.value, self.domain, self.path, now, self.expires);
        cookie.secure = self.secure;
        cookie.http_only = self.http_only;
        cookie.same_site = SameSite::Unspecified;
        cookie.priority = CookiePriority::Medium;
        cookie
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedTlsSession {
    pub ticket: String,
    pub state: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedSession {
    pub version: u32,
    pub preset: String,
    pub force_h3: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ech_config_domain: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    pub cookies: Vec<PersistedCookie>,
    /// "<protocol>:<host>:<port>" -> session count, not the raw ticket
    /// bytes; the in-process `SessionCache` never exposes tickets outside
    /// the TLS stack that owns them, so a restored record repopulates
    /// caches lazily on first dial rather than reinjecting tickets here.
    pub tls_sessions: HashMap<String, usize>,
}

/// Distributed-cache key for a TLS session ticket blob.
pub fn tls_session_key(preset: &str, protocol: &str, host: &str, port: u16) -> String {
    format!("httpcloak:sessions:{preset}:{protocol}:{host}:{port}")
}

/// Distributed-cache key for an ECH config list.
pub fn ech_config_key(preset: &str, host: &str, port: u16) -> String {
    format!("httpcloak:ech:{preset}:{host}:{port}")
}

/// Recommended TTL for both key families.
pub const RECOMMENDED_TTL_SECS: u64 = 23 * 60 * 60;

/// Base64-encode a raw session ticket / ECH config for storage.
pub fn encode_blob(bytes: &[u8]) -> String {
    BASE64.encode(bytes)
}

/// Decode a stored base64 blob back to raw bytes.
pub fn decode_blob(encoded: &str) -> Option<Vec<u8>> {
    BASE64.decode(encoded).ok()
}

/// A pluggable distributed-cache backend for TLS session tickets and ECH
/// configs. Failures MUST NOT fail the request they're attached to — callers
/// treat a failed `get`/`put` the same as a cache miss and fall back to a
/// full handshake, routing the error through `on_error` for observability.
#[async_trait::async_trait]
pub trait DistributedCache: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;
    async fn put(&self, key: &str, value: &str, ttl_secs: u64);
    async fn delete(&self, key: &str);

    async fn get_ech(&self, key: &str) -> Option<String> {
        self.get(key).await
    }

    async fn put_ech(&self, key: &str, value: &str, ttl_secs: u64) {
        self.put(key, value, ttl_secs).await;
    }

    /// Called whenever a backend operation fails; never blocks request flow.
    fn on_error(&self, _operation: &str, _key: &str, _error: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_formats_match_spec() {
        assert_eq!(
            tls_session_key("chrome", "h2", "example.com", 443),
            "httpcloak:sessions:chrome:h2:example.com:443"
        );
        assert_eq!(ech_config_key("chrome", "example.com", 443), "httpcloak:ech:chrome:example.com:443");
    }

    #[test]
    fn blob_roundtrips() {
        let original = b"some-ticket-bytes";
        let encoded = encode_blob(original);
        assert_eq!(decode_blob(&encoded).unwrap(), original);
    }
}
