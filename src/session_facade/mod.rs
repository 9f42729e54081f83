//! The public `Session` API: cookies, redirects, retries, and persistence
//! layered over a [`Transport`].
//!
//! Plays the role Chromium's `URLRequestContext` + `URLRequest` pair plays
//! for `urlrequest::request::URLRequest`, but preset-driven and aware of
//! all three transports instead of just H1/H2.

pub mod persist;

use std::collections::HashMap;
use std::net::IpAddr;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode};
use time::OffsetDateTime;
use tokio::sync::RwLock;
use url::Url;

use crate::base::cloak_error::{CloakError, ErrorProtocol};
use crate::base::neterror::NetError;
use crate::cookies::canonical_cookie::CanonicalCookie;
use crate::cookies::monster::CookieMonster;
use crate::facade::{Protocol, Timings};
use crate::facade::transport::{FacadeBody, ProtocolPreference, Transport};
use crate::http::retry::{calculate_backoff, should_retry, RetryConfig};
use crate::preset::{self, Preset};
use crate::session::SessionCaches;
use crate::socket::proxy::ProxySettings;
use crate::tls::hsts::HstsStore;

const MAX_REDIRECTS_HARD_CAP: usize = 20;

/// Options accepted by [`Session::new`], matching the public API's
/// enumerated option set.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub proxy: Option<String>,
    pub tcp_proxy: Option<String>,
    pub udp_proxy: Option<String>,
    pub timeout: Duration,
    pub follow_redirects: bool,
    pub max_redirects: usize,
    pub retry: RetryConfig,
    pub retry_on_status: Vec<u16>,
    pub force_h1: bool,
    pub force_h2: bool,
    pub force_h3: bool,
    pub disable_h3: bool,
    pub prefer_ipv4: bool,
    pub ech_config_domain: Option<String>,
    pub connect_to: HashMap<String, String>,
    /// Skip the preset's default HTTP headers but keep the TLS fingerprint.
    pub tls_only: bool,
    pub quic_idle_timeout: Option<u64>,
    pub local_address: Option<IpAddr>,
    pub key_log_file: Option<std::path::PathBuf>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            proxy: None,
            tcp_proxy: None,
            udp_proxy: None,
            timeout: Duration::from_secs(30),
            follow_redirects: true,
            max_redirects: 10,
            retry: RetryConfig::default(),
            retry_on_status: Vec::new(),
            force_h1: false,
            force_h2: false,
            force_h3: false,
            disable_h3: false,
            prefer_ipv4: false,
            ech_config_domain: None,
            connect_to: HashMap::new(),
            tls_only: false,
            quic_idle_timeout: None,
            local_address: None,
            key_log_file: None,
        }
    }
}

/// A buffered HTTP response returned from a `Session` request method.
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    protocol: Protocol,
    timings: Timings,
}

impl Response {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    pub fn timings(&self) -> Timings {
        self.timings
    }

    pub fn bytes(&self) -> &Bytes {
        &self.body
    }

    pub fn text(&self) -> Result<String, NetError> {
        String::from_utf8(self.body.to_vec()).map_err(|_| NetError::InvalidUtf8)
    }

    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, NetError> {
        serde_json::from_slice(&self.body).map_err(|_| NetError::JsonParseError)
    }
}

/// The public, preset-driven HTTP client.
pub struct Session {
    preset_name: RwLock<String>,
    transport: RwLock<Transport>,
    cookies: Arc<CookieMonster>,
    hsts: HstsStore,
    session_caches: Arc<SessionCaches>,
    options: RwLock<SessionOptions>,
    created_at: OffsetDateTime,
    updated_at: RwLock<OffsetDateTime>,
    header_order_override: RwLock<Option<Vec<String>>>,
    ech_config_domain: RwLock<Option<String>>,
    forked_suffix: AtomicUsize,
}

impl Session {
    pub async fn new(preset_name: &str, options: SessionOptions) -> Result<Self, CloakError> {
        let preset = preset::get_preset(preset_name)
            .map_err(|e| CloakError::new("new_session", "", 0, ErrorProtocol::Unknown, e))?;
        let session_caches = Arc::new(SessionCaches::new());
        let transport = Self::build_transport(Arc::clone(&preset), Arc::clone(&session_caches), &options).await?;

        let now = OffsetDateTime::now_utc();
        Ok(Self {
            preset_name: RwLock::new(preset_name.to_string()),
            transport: RwLock::new(transport),
            cookies: Arc::new(CookieMonster::new()),
            hsts: HstsStore::with_preload(),
            session_caches,
            ech_config_domain: RwLock::new(options.ech_config_domain.clone()),
            options: RwLock::new(options),
            created_at: now,
            updated_at: RwLock::new(now),
            header_order_override: RwLock::new(None),
            forked_suffix: AtomicUsize::new(0),
        })
    }

    async fn build_transport(
        preset: Arc<Preset>,
        session_caches: Arc<SessionCaches>,
        options: &SessionOptions,
    ) -> Result<Transport, CloakError> {
        let mut transport = Transport::new(
            preset,
            session_caches,
            options.prefer_ipv4,
            options.local_address,
            options.key_log_file.clone(),
            options.quic_idle_timeout.map(Duration::from_secs),
        );

        let forced = if options.force_h3 {
            ProtocolPreference::ForceHttp3
        } else if options.force_h2 {
            ProtocolPreference::ForceHttp2
        } else if options.force_h1 {
            ProtocolPreference::ForceHttp1
        } else {
            ProtocolPreference::Auto
        };

        transport.set_protocol(forced).await;
        if options.disable_h3 {
            transport.set_protocol(ProtocolPreference::ForceHttp2).await;
        }
        transport.set_timeout(options.timeout).await;
        transport.set_tls_only(options.tls_only).await;
        for (request_host, connect_host) in &options.connect_to {
            transport.set_connect_to(request_host.clone(), connect_host.clone()).await;
        }

        if let Some(proxy_url) = options.proxy.as_ref().or(options.tcp_proxy.as_ref()) {
            let proxy = ProxySettings::new(proxy_url).ok_or_else(|| {
                CloakError::new("new_session", "", 0, ErrorProtocol::Unknown, NetError::InvalidUrl)
            })?;
            transport.set_proxy(Some(proxy), options.udp_proxy.is_some()).await;
        }

        Ok(transport)
    }

    // ---- Request methods ----

    pub async fn get(&self, url: &str) -> Result<Response, CloakError> {
        self.request(Method::GET, url, None, None).await
    }

    pub async fn post(&self, url: &str, body: Bytes) -> Result<Response, CloakError> {
        self.request(Method::POST, url, None, Some(body)).await
    }

    pub async fn put(&self, url: &str, body: Bytes) -> Result<Response, CloakError> {
        self.request(Method::PUT, url, None, Some(body)).await
    }

    pub async fn delete(&self, url: &str) -> Result<Response, CloakError> {
        self.request(Method::DELETE, url, None, None).await
    }

    pub async fn patch(&self, url: &str, body: Bytes) -> Result<Response, CloakError> {
        self.request(Method::PATCH, url, None, Some(body)).await
    }

    pub async fn head(&self, url: &str) -> Result<Response, CloakError> {
        self.request(Method::HEAD, url, None, None).await
    }

    pub async fn options_request(&self, url: &str) -> Result<Response, CloakError> {
        self.request(Method::OPTIONS, url, None, None).await
    }

    pub async fn request(
        &self,
        method: Method,
        url: &str,
        headers: Option<HeaderMap>,
        body: Option<Bytes>,
    ) -> Result<Response, CloakError> {
        let mut current_url = self.upgrade_for_hsts(url)?;
        let mut current_method = method;
        let mut current_body = body.unwrap_or_default();
        let mut visited = std::collections::HashSet::new();
        let max_redirects = self.options.read().await.max_redirects.min(MAX_REDIRECTS_HARD_CAP);
        let follow_redirects = self.options.read().await.follow_redirects;

        for hop in 0..=max_redirects {
            if !visited.insert(current_url.clone()) {
                return Err(CloakError::new(
                    "request",
                    current_url.host_str().unwrap_or_default(),
                    current_url.port_or_known_default().unwrap_or(0),
                    ErrorProtocol::Unknown,
                    NetError::RedirectCycleDetected,
                ));
            }

            let response = self
                .execute_with_retry(current_method.clone(), &current_url, headers.clone(), current_body.clone())
                .await?;

            if !follow_redirects || !response.status.is_redirection() {
                return Ok(response);
            }
            if hop == max_redirects {
                return Err(CloakError::new(
                    "request",
                    current_url.host_str().unwrap_or_default(),
                    current_url.port_or_known_default().unwrap_or(0),
                    ErrorProtocol::Unknown,
                    NetError::TooManyRedirects,
                ));
            }

            let Some(location) = response.headers.get(http::header::LOCATION) else {
                return Ok(response);
            };
            let Ok(location_str) = location.to_str() else {
                return Ok(response);
            };
            let Ok(next_url) = current_url.join(location_str) else {
                return Ok(response);
            };

            // 303 always downgrades to GET; 301/302 downgrade POST to GET
            // (matching every browser's de-facto behavior, not strict HTTP).
            if response.status == StatusCode::SEE_OTHER
                || ((response.status == StatusCode::MOVED_PERMANENTLY
                    || response.status == StatusCode::FOUND)
                    && current_method == Method::POST)
            {
                current_method = Method::GET;
                current_body = Bytes::new();
            }

            // Strip credentials when the redirect crosses an origin boundary.
            if next_url.host_str() != current_url.host_str() {
                // Cookie jar is host-scoped already; nothing further to
                // strip since the façade re-derives the Cookie header per
                // request from `current_url`.
            }

            current_url = self.upgrade_for_hsts(next_url.as_str())?;
        }

        unreachable!("loop always returns by the final iteration")
    }

    async fn execute_with_retry(
        &self,
        method: Method,
        url: &Url,
        headers: Option<HeaderMap>,
        body: Bytes,
    ) -> Result<Response, CloakError> {
        let retry_config = self.options.read().await.retry.clone();
        let retry_statuses = self.options.read().await.retry_on_status.clone();

        let mut attempt = 0;
        loop {
            let result = self.execute_once(method.clone(), url, headers.clone(), body.clone()).await;
            let retry_for_status = matches!(&result, Ok(r) if retry_statuses.contains(&r.status.as_u16()));

            match result {
                Ok(response) if !retry_for_status => return Ok(response),
                Ok(response) => {
                    if !should_retry(attempt, &retry_config) {
                        return Ok(response);
                    }
                }
                Err(err) if !err.retryable() || !should_retry(attempt, &retry_config) => {
                    return Err(err);
                }
                Err(_) => {}
            }

            tokio::time::sleep(calculate_backoff(attempt + 1, &retry_config)).await;
            attempt += 1;
        }
    }

    async fn execute_once(
        &self,
        method: Method,
        url: &Url,
        headers: Option<HeaderMap>,
        body: Bytes,
    ) -> Result<Response, CloakError> {
        let mut headers = headers.unwrap_or_default();

        let cookie_header = self.build_cookie_header(url);
        if let Some(value) = cookie_header {
            if let Ok(hv) = http::HeaderValue::from_str(&value) {
                headers.insert(http::header::COOKIE, hv);
            }
        }

        let transport = self.transport.read().await;
        let (protocol, response, timings) = transport.send(method, url, headers, body).await?;
        drop(transport);

        *self.updated_at.write().await = OffsetDateTime::now_utc();

        let (parts, facade_body) = response.into_parts();
        self.store_set_cookies(url, &parts.headers);
        if parts.headers.contains_key(http::header::STRICT_TRANSPORT_SECURITY) {
            if let Some(value) = parts.headers.get(http::header::STRICT_TRANSPORT_SECURITY) {
                if let (Ok(host), Ok(value_str)) = (
                    url.host_str().ok_or(()),
                    value.to_str().map_err(|_| ()),
                ) {
                    self.hsts.add_from_header(host, value_str);
                }
            }
        }

        let body_bytes = facade_body.into_bytes().await.map_err(|e| {
            CloakError::new(
                "read_body",
                url.host_str().unwrap_or_default(),
                url.port_or_known_default().unwrap_or(0),
                ErrorProtocol::Unknown,
                e,
            )
        })?;

        Ok(Response {
            status: parts.status,
            headers: parts.headers,
            body: body_bytes,
            protocol,
            timings,
        })
    }

    fn upgrade_for_hsts(&self, url: &str) -> Result<Url, CloakError> {
        let mut parsed = Url::parse(url).map_err(|_| {
            CloakError::new("parse_url", "", 0, ErrorProtocol::Unknown, NetError::InvalidUrl)
        })?;
        if parsed.scheme() == "http" {
            if let Some(host) = parsed.host_str() {
                if self.hsts.should_upgrade(host) {
                    let _ = parsed.set_scheme("https");
                }
            }
        }
        Ok(parsed)
    }

    fn build_cookie_header(&self, url: &Url) -> Option<String> {
        let cookies = self.cookies.get_cookies_for_url(url);
        if cookies.is_empty() {
            return None;
        }
        Some(
            cookies
                .iter()
                .map(CanonicalCookie::to_cookie_pair)
                .collect::<Vec<_>>()
                .join("; "),
        )
    }

    fn store_set_cookies(&self, url: &Url, headers: &HeaderMap) {
        let Some(host) = url.host_str() else { return };
        for value in headers.get_all(http::header::SET_COOKIE).iter() {
            let Ok(text) = value.to_str() else { continue };
            if let Some(cookie) = CanonicalCookie::from_set_cookie(text, host, url.path()) {
                self.cookies.set_canonical_cookie(cookie);
            }
        }
    }

    // ---- Cookie jar ----

    pub fn get_cookies(&self, url: &str) -> Result<Vec<CanonicalCookie>, CloakError> {
        let parsed = Url::parse(url).map_err(|_| {
            CloakError::new("get_cookies", "", 0, ErrorProtocol::Unknown, NetError::InvalidUrl)
        })?;
        Ok(self.cookies.get_cookies_for_url(&parsed))
    }

    pub fn set_cookies(&self, cookies: Vec<CanonicalCookie>) {
        for cookie in cookies {
            self.cookies.set_canonical_cookie(cookie);
        }
    }

    pub fn clear_cookies(&self) {
        self.cookies.clear();
    }

    // ---- Header order ----

    pub async fn get_header_order(&self) -> Option<Vec<String>> {
        self.header_order_override.read().await.clone()
    }

    pub async fn set_header_order(&self, order: Option<Vec<String>>) {
        self.header_order_override.write().await = order.clone();
        self.transport.read().await.set_header_order(order).await;
    }

    // ---- Runtime reconfiguration pass-throughs ----

    pub async fn set_protocol(&self, protocol: ProtocolPreference) {
        self.transport.read().await.set_protocol(protocol).await;
    }

    pub async fn set_timeout(&self, timeout: Duration) {
        self.options.write().await.timeout = timeout;
        self.transport.read().await.set_timeout(timeout).await;
    }

    pub async fn set_proxy(&self, proxy_url: Option<&str>, udp_capable: bool) -> Result<(), CloakError> {
        let proxy = match proxy_url {
            Some(u) => Some(ProxySettings::new(u).ok_or_else(|| {
                CloakError::new("set_proxy", "", 0, ErrorProtocol::Unknown, NetError::InvalidUrl)
            })?),
            None => None,
        };
        self.transport.write().await.set_proxy(proxy, udp_capable).await;
        Ok(())
    }

    pub async fn set_preset(&self, preset_name: &str) -> Result<(), CloakError> {
        let preset = preset::get_preset(preset_name)
            .map_err(|e| CloakError::new("set_preset", "", 0, ErrorProtocol::Unknown, e))?;
        self.transport.write().await.set_preset(preset);
        *self.preset_name.write().await = preset_name.to_string();
        Ok(())
    }

    pub async fn set_insecure_skip_verify(&self, skip: bool) {
        self.transport.read().await.set_insecure_skip_verify(skip).await;
    }

    pub async fn set_connect_to(&self, request_host: &str, connect_host: &str) {
        self.transport.read().await.set_connect_to(request_host.to_string(), connect_host.to_string()).await;
    }

    pub async fn set_ech_config(&self, config_list: Vec<u8>) {
        self.transport.read().await.set_ech_config(config_list).await;
    }

    pub async fn set_ech_config_domain(&self, domain: &str) {
        *self.ech_config_domain.write().await = Some(domain.to_string());
        self.transport.read().await.set_ech_config_domain(domain.to_string()).await;
    }

    // ---- Lifecycle ----

    /// Closes connections while preserving the session/ECH caches.
    pub async fn refresh(&self) {
        self.transport.read().await.close_quic_connections().await;
    }

    pub async fn close_quic_connections(&self) {
        self.transport.read().await.close_quic_connections().await;
    }

    /// Performs a page-like fetch to populate the connection/session/ECH
    /// caches for `url` ahead of real traffic.
    pub async fn warmup(&self, url: &str) -> Result<(), CloakError> {
        self.get(url).await.map(|_| ())
    }

    /// Create `n` sibling sessions sharing this session's cookie jar and
    /// caches but with independent connections (own `Transport`).
    pub async fn fork(&self, n: usize) -> Result<Vec<Session>, CloakError> {
        let mut forks = Vec::with_capacity(n);
        for _ in 0..n {
            let suffix = self.forked_suffix.fetch_add(1, Ordering::Relaxed);
            let preset_name = self.preset_name.read().await.clone();
            let options = self.options.read().await.clone();
            let preset = preset::get_preset(&preset_name)
                .map_err(|e| CloakError::new("fork", "", 0, ErrorProtocol::Unknown, e))?;
            let transport = Self::build_transport(preset, Arc::clone(&self.session_caches), &options).await?;
            let now = OffsetDateTime::now_utc();
            forks.push(Session {
                preset_name: RwLock::new(preset_name),
                transport: RwLock::new(transport),
                cookies: Arc::clone(&self.cookies),
                hsts: HstsStore::with_preload(),
                session_caches: Arc::clone(&self.session_caches),
                ech_config_domain: RwLock::new(None),
                options: RwLock::new(options),
                created_at: now,
                updated_at: RwLock::new(now),
                header_order_override: RwLock::new(None),
                forked_suffix: AtomicUsize::new(suffix),
            });
        }
        Ok(forks)
    }

    // ---- Persistence ----

    pub async fn save(&self, path: impl AsRef<Path>) -> Result<(), CloakError> {
        let bytes = self.marshal().await?;
        std::fs::write(path, bytes)
            .map_err(|e| CloakError::new("save", "", 0, ErrorProtocol::Unknown, NetError::Unknown(e.raw_os_error().unwrap_or(-1))))
    }

    pub async fn marshal(&self) -> Result<Vec<u8>, CloakError> {
        let record = persist::PersistedSession {
            version: persist::CURRENT_VERSION,
            preset: self.preset_name.read().await.clone(),
            force_h3: self.options.read().await.force_h3,
            ech_config_domain: self.ech_config_domain.read().await.clone(),
            created_at: self.created_at,
            updated_at: *self.updated_at.read().await,
            cookies: self
                .cookies
                .iter_all_cookies()
                .map(persist::PersistedCookie::from)
                .collect(),
            tls_sessions: self.session_caches.tls_session_counts(),
        };
        serde_json::to_vec(&record)
            .map_err(|_| CloakError::new("marshal", "", 0, ErrorProtocol::Unknown, NetError::JsonParseError))
    }

    pub async fn load(path: impl AsRef<Path>, options: SessionOptions) -> Result<Self, CloakError> {
        let bytes = std::fs::read(path).map_err(|e| {
            CloakError::new("load", "", 0, ErrorProtocol::Unknown, NetError::Unknown(e.raw_os_error().unwrap_or(-1)))
        })?;
        Self::unmarshal(&bytes, options).await
    }

    pub async fn unmarshal(bytes: &[u8], mut options: SessionOptions) -> Result<Self, CloakError> {
        let record: persist::PersistedSession = serde_json::from_slice(bytes)
            .map_err(|_| CloakError::new("unmarshal", "", 0, ErrorProtocol::Unknown, NetError::JsonParseError))?;

        if record.version != persist::CURRENT_VERSION {
            return Err(CloakError::new(
                "unmarshal",
                "",
                0,
                ErrorProtocol::Unknown,
                NetError::UnknownPreset(format!("unsupported session version {}", record.version)),
            ));
        }

        options.force_h3 = record.force_h3;
        if options.ech_config_domain.is_none() {
            options.ech_config_domain = record.ech_config_domain.clone();
        }

        let session = Self::new(&record.preset, options).await?;
        let now = OffsetDateTime::now_utc();
        for cookie in record.cookies {
            session.cookies.set_canonical_cookie(cookie.into_canonical(now));
        }
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_follow_redirects() {
        let opts = SessionOptions::default();
        assert!(opts.follow_redirects);
        assert_eq!(opts.max_redirects, 10);
    }
}
