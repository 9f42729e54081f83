//! QUIC connection establishment and the HTTP/3 request surface built on
//! top of it.
//!
//! Transport: `quinn`. TLS: `rustls` (quinn's QUIC crypto plumbing is
//! rustls-shaped; `boring` cannot drive quinn's `rustls::QuicClientConfig`
//! callback surface, so the H3 leg is the one place this crate doesn't use
//! BoringSSL — see DESIGN.md). Framing: `h3` + `h3-quinn`.

use std::net::SocketAddr;
use std::sync::Arc;

use bytes::{Buf, Bytes};
use http::{Request, Response};
use url::Url;

use super::config::QuicConfig;
use crate::base::neterror::NetError;

/// Verifier that accepts any server certificate, used when a preset's TLS
/// options set `insecure_skip_verify` for the QUIC leg as well as TCP.
#[derive(Debug)]
struct NoVerify;

impl rustls::client::danger::ServerCertVerifier for NoVerify {
    fn verify_server_cert(
        &self,
        _end_entity: &rustls::pki_types::CertificateDer<'_>,
        _intermediates: &[rustls::pki_types::CertificateDer<'_>],
        _server_name: &rustls::pki_types::ServerName<'_>,
        _ocsp_response: &[u8],
        _now: rustls::pki_types::UnixTime,
    ) -> Result<rustls::client::danger::ServerCertVerified, rustls::Error> {
        Ok(rustls::client::danger::ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &rustls::pki_types::CertificateDer<'_>,
        _dss: &rustls::DigitallySignedStruct,
    ) -> Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        Ok(rustls::client::danger::HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &rustls::pki_types::CertificateDer<'_>,
        _dss: &rustls::DigitallySignedStruct,
    ) -> Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        Ok(rustls::client::danger::HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<rustls::SignatureScheme> {
        rustls::crypto::ring::default_provider()
            .signature_verification_algorithms
            .supported_schemes()
    }
}

fn build_rustls_config(
    config: &QuicConfig,
    insecure_skip_verify: bool,
) -> Result<rustls::ClientConfig, NetError> {
    let alpn: Vec<Vec<u8>> = config
        .alpn_protocols
        .iter()
        .map(|p| p.as_bytes().to_vec())
        .collect();

    let mut builder = if insecure_skip_verify {
        rustls::ClientConfig::builder()
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(NoVerify))
            .with_no_client_auth()
    } else {
        let mut roots = rustls::RootCertStore::empty();
        roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
        rustls::ClientConfig::builder()
            .with_root_certificates(roots)
            .with_no_client_auth()
    };
    builder.alpn_protocols = alpn;
    Ok(builder)
}

/// A live HTTP/3 connection: the `h3` `SendRequest` handle plus the quinn
/// connection it rides on, for liveness checks and pool eviction.
pub struct QuicConnection {
    url: Url,
    remote_addr: SocketAddr,
    quinn_connection: quinn::Connection,
    send_request: h3::client::SendRequest<h3_quinn::OpenStreams, Bytes>,
}

impl QuicConnection {
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn remote_addr(&self) -> Option<SocketAddr> {
        Some(self.remote_addr)
    }

    /// True while the underlying QUIC connection is still open.
    pub fn is_healthy(&self) -> bool {
        self.quinn_connection.close_reason().is_none()
    }

    /// Send a request over this connection and return the response with a
    /// fully-buffered body (the façade's `ResponseBody` wraps this as a
    /// one-shot stream at a higher layer).
    pub async fn send_request(
        &mut self,
        request: Request<()>,
        body: Bytes,
    ) -> Result<Response<Bytes>, NetError> {
        let mut stream = self
            .send_request
            .send_request(request)
            .await
            .map_err(|_| NetError::QuicProtocolError)?;

        if !body.is_empty() {
            stream
                .send_data(body)
                .await
                .map_err(|_| NetError::QuicProtocolError)?;
        }
        stream
            .finish()
            .await
            .map_err(|_| NetError::QuicProtocolError)?;

        let response = stream
            .recv_response()
            .await
            .map_err(|_| NetError::QuicProtocolError)?;

        let mut body_buf = Vec::new();
        while let Some(chunk) = stream
            .recv_data()
            .await
            .map_err(|_| NetError::QuicProtocolError)?
        {
            body_buf.extend_from_slice(chunk.chunk());
        }

        let (parts, _) = response.into_parts();
        Ok(Response::from_parts(parts, Bytes::from(body_buf)))
    }

    pub fn close(&self, reason: &str) {
        self.quinn_connection
            .close(quinn::VarInt::from_u32(0), reason.as_bytes());
    }
}

/// Builder for QUIC connections.
#[derive(Debug)]
pub struct QuicConnectionBuilder {
    url: Option<Url>,
    config: QuicConfig,
    insecure_skip_verify: bool,
    server_name_override: Option<String>,
}

impl Default for QuicConnectionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl QuicConnectionBuilder {
    pub fn new() -> Self {
        Self {
            url: None,
            config: QuicConfig::default(),
            insecure_skip_verify: false,
            server_name_override: None,
        }
    }

    pub fn url(mut self, url: &str) -> Result<Self, NetError> {
        let parsed = Url::parse(url).map_err(|_| NetError::InvalidUrl)?;
        if parsed.scheme() != "https" {
            return Err(NetError::InvalidUrl);
        }
        self.url = Some(parsed);
        Ok(self)
    }

    pub fn config(mut self, config: QuicConfig) -> Self {
        self.config = config;
        self
    }

    pub fn insecure_skip_verify(mut self, skip: bool) -> Self {
        self.insecure_skip_verify = skip;
        self
    }

    pub fn server_name(mut self, name: impl Into<String>) -> Self {
        self.server_name_override = Some(name.into());
        self
    }

    pub fn get_url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    /// Resolve, dial, and complete the HTTP/3 connection handshake.
    pub async fn connect(self) -> Result<QuicConnection, NetError> {
        let url = self.url.clone().ok_or(NetError::InvalidUrl)?;
        let host = url.host_str().ok_or(NetError::InvalidUrl)?.to_string();
        let port = url.port_or_known_default().unwrap_or(443);

        let remote_addr = tokio::net::lookup_host((host.as_str(), port))
            .await
            .map_err(|e| NetError::dns_failed(&host, e))?
            .next()
            .ok_or_else(|| NetError::dns_failed(&host, std::io::Error::other("no addresses")))?;

        let rustls_config = build_rustls_config(&self.config, self.insecure_skip_verify)?;
        let quic_client_config = quinn::crypto::rustls::QuicClientConfig::try_from(rustls_config)
            .map_err(|_| NetError::QuicHandshakeFailed)?;
        let mut client_config = quinn::ClientConfig::new(Arc::new(quic_client_config));
        client_config.transport_config(Arc::new(self.config.to_transport_config()));

        let bind_addr: SocketAddr = if remote_addr.is_ipv6() {
            "[::]:0".parse().unwrap()
        } else {
            "0.0.0.0:0".parse().unwrap()
        };
        let mut endpoint =
            quinn::Endpoint::client(bind_addr).map_err(|e| NetError::connection_failed_to(&host, port, e))?;
        endpoint.set_default_client_config(client_config);

        let server_name = self.server_name_override.unwrap_or(host.clone());
        let connecting = endpoint
            .connect(remote_addr, &server_name)
            .map_err(|_| NetError::QuicHandshakeFailed)?;
        let quinn_connection = connecting.await.map_err(|_| NetError::QuicHandshakeFailed)?;

        let h3_conn = h3_quinn::Connection::new(quinn_connection.clone());
        let (mut driver, send_request) = h3::client::new(h3_conn)
            .await
            .map_err(|_| NetError::QuicHandshakeFailed)?;

        // h3's connection driver must be polled to make progress; run it on
        // a detached task for the connection's lifetime, mirroring the
        // pattern used for pooled H3 connections elsewhere in the ecosystem.
        tokio::spawn(async move {
            let _ = std::future::poll_fn(|cx| driver.poll_close(cx)).await;
        });

        Ok(QuicConnection {
            url,
            remote_addr,
            quinn_connection,
            send_request,
        })
    }
}

/// Connect to a QUIC server (convenience function).
pub async fn connect(url: &str) -> Result<QuicConnection, NetError> {
    QuicConnectionBuilder::new().url(url)?.connect().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_new() {
        let builder = QuicConnectionBuilder::new();
        assert!(builder.url.is_none());
    }

    #[test]
    fn test_builder_url() {
        let builder = QuicConnectionBuilder::new()
            .url("https://example.com")
            .unwrap();
        assert!(builder.url.is_some());
    }

    #[test]
    fn test_builder_invalid_scheme() {
        let result = QuicConnectionBuilder::new().url("http://example.com");
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_config() {
        let config = QuicConfig::new().enable_0rtt(false);
        let builder = QuicConnectionBuilder::new().config(config);
        assert!(!builder.config.enable_0rtt);
    }

    #[test]
    fn insecure_config_accepts_everything() {
        let config = QuicConfig::default();
        let rustls_config = build_rustls_config(&config, true).unwrap();
        assert!(rustls_config.alpn_protocols.contains(&b"h3".to_vec()));
    }
}
