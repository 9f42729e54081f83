//! Per-request protocol selection: force/proxy-class/auto, with H2-vs-H3
//! racing in `auto` mode against a cold host.
//!
//! Wraps [`HttpStreamFactory`] (H1/H2) and [`Http3SessionPool`] (H3) rather
//! than re-implementing either transport; this module only decides which
//! one a given request dials and records the outcome in [`SupportCache`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use dashmap::DashMap;
use http::{HeaderMap, Method, Request, Response};
use http_body_util::Full;
use tokio::sync::RwLock;
use url::Url;

use crate::base::cloak_error::{CloakError, ErrorProtocol};
use crate::base::neterror::NetError;
use crate::facade::{HostKey, Protocol, SupportCache, Timings};
use crate::http::orderedheaders::OrderedHeaderMap;
use crate::http::streamfactory::{HttpStreamFactory, StreamBody};
use crate::preset::Preset;
use crate::quic::session_pool::{Http3HostKey, Http3SessionPool};
use crate::quic::QuicConfig;
use crate::session::SessionCaches;
use crate::socket::pool::ClientSocketPool;
use crate::socket::proxy::ProxySettings;

/// Response body, unified across the three transports the façade can pick.
pub enum FacadeBody {
    Stream(StreamBody),
    Http3(Bytes),
}

impl FacadeBody {
    /// Buffer the whole body. H1 collects via `http_body_util`; H2 drains
    /// the fork's `RecvStream` data frames, releasing flow-control capacity
    /// as it goes; H3 is already fully buffered by `QuicConnection`.
    pub async fn into_bytes(self) -> Result<Bytes, NetError> {
        match self {
            FacadeBody::Http3(bytes) => Ok(bytes),
            FacadeBody::Stream(StreamBody::H1(incoming)) => {
                use http_body_util::BodyExt;
                let collected = incoming.collect().await.map_err(|_| NetError::HttpBodyError)?;
                Ok(collected.to_bytes())
            }
            FacadeBody::Stream(StreamBody::H2(mut recv)) => {
                let mut buf = Vec::new();
                while let Some(chunk) = recv.data().await {
                    let data = chunk.map_err(|_| NetError::Http2ProtocolError)?;
                    let _ = recv.flow_control().release_capacity(data.len());
                    buf.extend_from_slice(&data);
                }
                Ok(Bytes::from(buf))
            }
        }
    }
}

/// Forced protocol, or `Auto` to consult the support cache / race.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolPreference {
    Auto,
    ForceHttp1,
    ForceHttp2,
    ForceHttp3,
}

/// Mutable, reconfigurable knobs a live [`Transport`] carries. Split out of
/// `Transport` itself so `set_preset`/`set_proxy` can swap the whole thing
/// without disturbing caches that should survive the swap.
pub struct TransportConfig {
    pub protocol: ProtocolPreference,
    pub timeout: Duration,
    pub proxy: Option<ProxySettings>,
    pub insecure_skip_verify: bool,
    pub disable_h3: bool,
    /// Skip the preset's default HTTP headers but keep the TLS fingerprint.
    pub tls_only: bool,
    pub header_order_override: Option<Vec<String>>,
    pub ech_config: Option<Vec<u8>>,
    pub ech_config_domain: Option<String>,
    /// Domain fronting: request host -> DNS/connect host.
    pub connect_to: DashMap<String, String>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            protocol: ProtocolPreference::Auto,
            timeout: Duration::from_secs(30),
            proxy: None,
            insecure_skip_verify: false,
            disable_h3: false,
            tls_only: false,
            header_order_override: None,
            ech_config: None,
            ech_config_domain: None,
            connect_to: DashMap::new(),
        }
    }
}

/// The transport façade: one per [`crate::session_facade::Session`].
pub struct Transport {
    preset: Arc<Preset>,
    pool: Arc<ClientSocketPool>,
    stream_factory: HttpStreamFactory,
    h3_pool: Http3SessionPool,
    support_cache: SupportCache,
    session_caches: Arc<SessionCaches>,
    config: RwLock<TransportConfig>,
    quic_config: QuicConfig,
    // `set_connect_to` can point different request hosts at the same dial
    // target; H3 dial coalescing still keys off the *connect* host.
    h2_errors_pin_h1: AtomicBool,
    // Session-wide dial knobs, kept so `set_preset` can reapply them to the
    // freshly rebuilt pool.
    prefer_ipv4: bool,
    local_address: Option<std::net::IpAddr>,
    key_log_file: Option<std::path::PathBuf>,
}

impl Transport {
    /// `prefer_ipv4`/`local_address`/`key_log_file`/`quic_idle_timeout` are
    /// session-wide dial knobs threaded straight from
    /// [`crate::session_facade::SessionOptions`].
    pub fn new(
        preset: Arc<Preset>,
        session_caches: Arc<SessionCaches>,
        prefer_ipv4: bool,
        local_address: Option<std::net::IpAddr>,
        key_log_file: Option<std::path::PathBuf>,
        quic_idle_timeout: Option<Duration>,
    ) -> Self {
        let pool = Arc::new(
            ClientSocketPool::new(Some(preset.tls_options.clone())).with_dial_config(
                prefer_ipv4,
                local_address,
                key_log_file.clone(),
            ),
        );
        let mut quic_config = QuicConfig::default();
        if let Some(idle_timeout) = quic_idle_timeout {
            quic_config = quic_config.idle_timeout(idle_timeout);
        }
        Self {
            stream_factory: HttpStreamFactory::new(Arc::clone(&pool)),
            pool,
            h3_pool: Http3SessionPool::default(),
            support_cache: SupportCache::new(),
            session_caches,
            config: RwLock::new(TransportConfig::default()),
            quic_config,
            h2_errors_pin_h1: AtomicBool::new(false),
            prefer_ipv4,
            local_address,
            key_log_file,
            preset,
        }
    }

    fn dial_host(&self, url: &Url, connect_to: &DashMap<String, String>) -> String {
        let host = url.host_str().unwrap_or_default();
        connect_to
            .get(host)
            .map(|v| v.value().clone())
            .unwrap_or_else(|| host.to_string())
    }

    /// Send a request, selecting a protocol per §4.7. Returns the protocol
    /// that was actually used alongside the response and its timings.
    pub async fn send(
        &self,
        method: Method,
        url: &Url,
        headers: HeaderMap,
        body: Bytes,
    ) -> Result<(Protocol, Response<FacadeBody>, Timings), CloakError> {
        let host_key = HostKey::from_url(url).ok_or_else(|| {
            CloakError::new("send", "", 0, ErrorProtocol::Unknown, NetError::InvalidUrl)
        })?;

        let config = self.config.read().await;
        let plaintext = url.scheme() == "http";
        let has_proxy_without_udp = config.proxy.is_some();
        let forced = config.protocol;
        let disable_h3 = config.disable_h3 || !self.preset.supports_h3;
        drop(config);

        // 1. Plaintext always forces H1.
        if plaintext {
            return self.send_h1_or_h2(method, url, headers, body, false).await;
        }

        // 3. Explicitly forced protocol: no fallback.
        match forced {
            ProtocolPreference::ForceHttp1 => {
                return self.send_h1_or_h2(method, url, headers, body, true).await;
            }
            ProtocolPreference::ForceHttp2 => {
                return self.send_h2_no_fallback(method, url, headers, body).await;
            }
            ProtocolPreference::ForceHttp3 => {
                return self.send_h3(method, url, headers, body).await;
            }
            ProtocolPreference::Auto => {}
        }

        // 2. Proxy without a UDP-capable path: prefer H2, no H3 attempt.
        if has_proxy_without_udp {
            return self.send_h1_or_h2(method, url, headers, body, false).await;
        }

        // 4. Auto: consult the support cache first.
        if let Some(known) = self.support_cache.get(self.preset.name, &host_key) {
            return match known {
                Protocol::H3 if !disable_h3 => self.send_h3(method, url, headers, body).await,
                Protocol::H2 | Protocol::H3 => {
                    self.send_h1_or_h2(method, url, headers, body, false).await
                }
                Protocol::H1 => self.send_h1_or_h2(method, url, headers, body, true).await,
            };
        }

        if disable_h3 {
            return self.send_h1_or_h2(method, url, headers, body, false).await;
        }

        // Unknown: race H3 against H2.
        self.race_h2_h3(method, url, headers, body, &host_key).await
    }

    async fn race_h2_h3(
        &self,
        method: Method,
        url: &Url,
        headers: HeaderMap,
        body: Bytes,
        host_key: &HostKey,
    ) -> Result<(Protocol, Response<FacadeBody>, Timings), CloakError> {
        let h2_fut = self.send_h2_no_fallback(method.clone(), url, headers.clone(), body.clone());
        let h3_fut = self.send_h3(method.clone(), url, headers.clone(), body.clone());
        tokio::pin!(h2_fut);
        tokio::pin!(h3_fut);

        // The winner is committed only once response headers have arrived
        // (both branches already await `recv_response`/headers internally),
        // so whichever future resolves first here has already cleared that
        // bar. The loser future is simply dropped, cancelling its dial —
        // neither branch's `send_*` touches anything but the connection
        // pool / H3 session pool, which is fine to leave half-open.
        enum Winner {
            H2(Result<(Protocol, Response<FacadeBody>, Timings), CloakError>),
            H3(Result<(Protocol, Response<FacadeBody>, Timings), CloakError>),
        }
        let winner = tokio::select! {
            h2 = &mut h2_fut => Winner::H2(h2),
            h3 = &mut h3_fut => Winner::H3(h3),
        };

        match winner {
            Winner::H2(Ok(ok)) => {
                self.support_cache.record(self.preset.name, host_key, Protocol::H2);
                Ok(ok)
            }
            Winner::H3(Ok(ok)) => {
                self.support_cache.record(self.preset.name, host_key, Protocol::H3);
                Ok(ok)
            }
            Winner::H2(Err(_)) => match h3_fut.await {
                Ok(ok) => {
                    self.support_cache.record(self.preset.name, host_key, Protocol::H3);
                    Ok(ok)
                }
                Err(_) => self.send_h1_or_h2(method, url, headers, body, true).await,
            },
            Winner::H3(Err(_)) => match h2_fut.await {
                Ok(ok) => {
                    self.support_cache.record(self.preset.name, host_key, Protocol::H2);
                    Ok(ok)
                }
                Err(_) => self.send_h1_or_h2(method, url, headers, body, true).await,
            },
        }
    }

    async fn send_h3(
        &self,
        method: Method,
        url: &Url,
        headers: HeaderMap,
        body: Bytes,
    ) -> Result<(Protocol, Response<FacadeBody>, Timings), CloakError> {
        let config = self.config.read().await;
        let dial_host = self.dial_host(url, &config.connect_to);
        let port = url.port_or_known_default().unwrap_or(443);
        let key = Http3HostKey { host: dial_host.clone(), port };
        let insecure = config.insecure_skip_verify;
        drop(config);

        let start = Instant::now();
        let conn = self
            .h3_pool
            .get_or_connect(key, url.as_str(), self.quic_config.clone(), insecure)
            .await
            .map_err(|e| CloakError::new("h3_connect", dial_host.clone(), port, ErrorProtocol::Http3, e))?;

        let mut req_builder = Request::builder().method(method).uri(url.as_str());
        for (name, value) in headers.iter() {
            req_builder = req_builder.header(name, value);
        }
        let request = req_builder
            .body(())
            .map_err(|_| CloakError::new("h3_request", dial_host.clone(), port, ErrorProtocol::Http3, NetError::InvalidUrl))?;

        let response = {
            let mut guard = conn.lock().await;
            guard
                .send_request(request, body)
                .await
                .map_err(|e| CloakError::new("h3_send", dial_host.clone(), port, ErrorProtocol::Http3, e))?
        };

        let timings = Timings::apportion_h3(start.elapsed());
        let (parts, bytes) = response.into_parts();
        Ok((Protocol::H3, Response::from_parts(parts, FacadeBody::Http3(bytes)), timings))
    }

    /// Dial via the pool/stream-factory, allowing H1 or H2 (whichever the
    /// socket negotiates) and, if `pin_h1` is set, forcing H1 regardless.
    async fn send_h1_or_h2(
        &self,
        method: Method,
        url: &Url,
        headers: HeaderMap,
        body: Bytes,
        pin_h1: bool,
    ) -> Result<(Protocol, Response<FacadeBody>, Timings), CloakError> {
        let config = self.config.read().await;
        let proxy = config.proxy.clone();
        let insecure = config.insecure_skip_verify;
        let tls_only = config.tls_only;
        let header_order = config
            .header_order_override
            .clone()
            .unwrap_or_else(|| self.preset.header_order.clone());
        drop(config);

        let h2_fp = if pin_h1 { None } else { self.preset.http2_options.fingerprint.as_ref() };

        let start = Instant::now();
        let mut stream = self
            .stream_factory
            .create_stream(url, proxy.as_ref(), h2_fp, insecure)
            .await
            .map_err(|e| self.stream_error("connect", url, e))?;

        let request = self.build_h1h2_request(method, url, headers, body, &header_order, tls_only)?;
        let response = stream.send_request(request).await.map_err(|e| {
            self.stream_factory.report_failure(url);
            self.stream_error("send", url, e)
        })?;

        let protocol = if stream.is_h2() { Protocol::H2 } else { Protocol::H1 };
        let timings = Timings::apportion_h2(start.elapsed());
        let (parts, stream_body) = response.into_parts();
        Ok((protocol, Response::from_parts(parts, FacadeBody::Stream(stream_body)), timings))
    }

    /// Like `send_h1_or_h2`, but treats an ALPN mismatch / preface
    /// rejection as a permanent "pin to h1" signal instead of silently
    /// falling back within this call.
    async fn send_h2_no_fallback(
        &self,
        method: Method,
        url: &Url,
        headers: HeaderMap,
        body: Bytes,
    ) -> Result<(Protocol, Response<FacadeBody>, Timings), CloakError> {
        let result = self.send_h1_or_h2(method, url, headers, body, false).await;
        if let Err(err) = &result {
            if matches!(err.cause, NetError::AlpnNegotiationFailed | NetError::Http2ProtocolError) {
                self.h2_errors_pin_h1.store(true, Ordering::Relaxed);
                if let Some(host_key) = HostKey::from_url(url) {
                    self.support_cache.record(self.preset.name, &host_key, Protocol::H1);
                }
            }
        }
        result
    }

    /// Builds the wire request, ordering regular headers by `header_order`
    /// (the preset's own order, or the caller's override) before whatever's
    /// left over from the caller's set, using the teacher's
    /// insertion-order-preserving [`OrderedHeaderMap`] rather than a plain
    /// `http::HeaderMap` (which has no ordering guarantee across keys).
    fn build_h1h2_request(
        &self,
        method: Method,
        url: &Url,
        mut headers: HeaderMap,
        body: Bytes,
        header_order: &[String],
        tls_only: bool,
    ) -> Result<Request<Full<Bytes>>, CloakError> {
        // Fill in any preset default headers missing from the caller's set,
        // without disturbing the caller's own insertion order at the tail.
        // `tls_only` keeps the TLS fingerprint but drops this step, sending
        // only what the caller asked for.
        if !tls_only {
            for (name, value) in self.preset.headers.iter() {
                if !headers.contains_key(name) {
                    headers.insert(name.clone(), value.clone());
                }
            }
        }

        let mut ordered = OrderedHeaderMap::new();
        for name in header_order {
            if let Some(value) = headers.remove(name) {
                if let Ok(value_str) = value.to_str() {
                    let _ = ordered.insert(name, value_str);
                }
            }
        }
        for (name, value) in headers.iter() {
            if let Ok(value_str) = value.to_str() {
                let _ = ordered.insert(name.as_str(), value_str);
            }
        }

        let mut builder = Request::builder().method(method).uri(url.as_str());
        for (name, value) in ordered.iter() {
            builder = builder.header(name, value);
        }
        builder
            .body(Full::new(body))
            .map_err(|_| CloakError::new("build_request", url.host_str().unwrap_or_default(), url.port_or_known_default().unwrap_or(0), ErrorProtocol::Unknown, NetError::InvalidUrl))
    }

    fn stream_error(&self, op: &'static str, url: &Url, cause: NetError) -> CloakError {
        CloakError::new(
            op,
            url.host_str().unwrap_or_default(),
            url.port_or_known_default().unwrap_or(0),
            ErrorProtocol::Unknown,
            cause,
        )
    }

    // ---- Runtime reconfiguration (§4.8) ----

    pub async fn set_protocol(&self, protocol: ProtocolPreference) {
        self.config.write().await.protocol = protocol;
    }

    pub async fn set_timeout(&self, timeout: Duration) {
        self.config.write().await.timeout = timeout;
    }

    /// Re-instantiates the H1/H2 leg (fresh pool) but preserves the H3
    /// session cache when switching between UDP-capable proxies; only
    /// clears it when switching to/from a proxy with no UDP path.
    pub async fn set_proxy(&mut self, proxy: Option<ProxySettings>, udp_capable: bool) {
        self.config.write().await.proxy = proxy;
        self.pool.cleanup_idle_sockets();
        if !udp_capable {
            self.h3_pool.close_all().await;
        }
    }

    /// Tears down and rebuilds all three transports for a new preset;
    /// clears the support cache and connection pool. The session cache is
    /// intentionally left to the caller (`session_facade`) since it is
    /// keyed by preset name and a new preset simply gets a fresh slice of
    /// it rather than losing history for the old one.
    pub fn set_preset(&mut self, preset: Arc<Preset>) {
        self.pool = Arc::new(
            ClientSocketPool::new(Some(preset.tls_options.clone())).with_dial_config(
                self.prefer_ipv4,
                self.local_address,
                self.key_log_file.clone(),
            ),
        );
        self.preset = preset;
        self.stream_factory = HttpStreamFactory::new(Arc::clone(&self.pool));
        self.h3_pool = Http3SessionPool::default();
        self.support_cache.clear();
    }

    pub async fn set_insecure_skip_verify(&self, skip: bool) {
        self.config.write().await.insecure_skip_verify = skip;
    }

    pub async fn set_tls_only(&self, tls_only: bool) {
        self.config.write().await.tls_only = tls_only;
    }

    /// Domain fronting: requests to `request_host` keep `request_host` as
    /// SNI/Host but dial `connect_host` for DNS/TCP/QUIC.
    pub async fn set_connect_to(&self, request_host: impl Into<String>, connect_host: impl Into<String>) {
        self.config
            .write()
            .await
            .connect_to
            .insert(request_host.into(), connect_host.into());
    }

    pub async fn set_ech_config(&self, config_list: Vec<u8>) {
        self.config.write().await.ech_config = Some(config_list);
    }

    pub async fn set_ech_config_domain(&self, domain: impl Into<String>) {
        self.config.write().await.ech_config_domain = Some(domain.into());
    }

    pub async fn set_header_order(&self, order: Option<Vec<String>>) {
        self.config.write().await.header_order_override = order;
    }

    pub async fn close_quic_connections(&self) {
        self.h3_pool.close_all().await;
    }

    pub fn preset(&self) -> &Arc<Preset> {
        &self.preset
    }
}

