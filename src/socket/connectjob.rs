use crate::base::neterror::NetError;
use crate::socket::client::SocketType;
use crate::socket::tls::TlsOptions;
use boring::ssl::{SslConnector, SslMethod};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpSocket, TcpStream};
use url::Url;

/// Chromium's Happy Eyeballs IPv6 fallback delay (250ms).
const IPV6_FALLBACK_DELAY: Duration = Duration::from_millis(250);

/// Connection timeout (4 minutes, matches Chromium).
const CONNECTION_TIMEOUT: Duration = Duration::from_secs(240);

/// Session-wide knobs that shape every dial a pool performs: the
/// ClientHello to present, which IP family to prefer, which source address
/// to bind from, and where to append TLS key log lines (if anywhere).
///
/// `ssl_connector`, when set, is a pre-built connector the pool keeps one
/// instance of per (tls_options, insecure flag) pair so BoringSSL's
/// internal session cache survives across dials to the same host, which is
/// what actually lets session tickets/PSK get presented on a repeat
/// connection. `None` falls back to building a one-off connector, which
/// never resumes anything.
#[derive(Clone, Default)]
pub struct DialOptions {
    pub tls_options: Option<TlsOptions>,
    pub prefer_ipv4: bool,
    pub local_address: Option<IpAddr>,
    pub key_log_file: Option<Arc<PathBuf>>,
    pub ssl_connector: Option<SslConnector>,
}

/// Manages the connection process: DNS -> TCP -> SSL.
/// Implements Happy Eyeballs (RFC 8305) for faster dual-stack connections.
pub struct ConnectJob {
    // Configuration
}

impl ConnectJob {
    pub async fn connect(
        url: &Url,
        proxy: Option<&crate::socket::proxy::ProxySettings>,
        dial_options: &DialOptions,
        insecure_skip_verify: bool,
    ) -> Result<SocketType, NetError> {
        let tls_options = dial_options.tls_options.as_ref();
        let (host, port) = if let Some(p) = proxy {
            // If proxy, we connect to PROXY host/port first
            let phost = p.url.host_str().ok_or(NetError::InvalidUrl)?;
            let pport = p.url.port_or_known_default().ok_or(NetError::InvalidUrl)?;
            (phost.to_string(), pport)
        } else {
            // Direct connection
            let dhost = url.host_str().ok_or(NetError::InvalidUrl)?;
            let dport = url.port_or_known_default().ok_or(NetError::InvalidUrl)?;
            (dhost.to_string(), dport)
        };

        // 1. DNS Resolution
        let addr_str = format!("{}:{}", host, port);
        let addrs: Vec<SocketAddr> = tokio::net::lookup_host(&addr_str)
            .await
            .map_err(|_| NetError::NameNotResolved)?
            .collect();

        if addrs.is_empty() {
            return Err(NetError::NameNotResolved);
        }

        // 2. TCP Connect with Happy Eyeballs
        let mut stream = Self::connect_with_happy_eyeballs(
            &addrs,
            dial_options.prefer_ipv4,
            dial_options.local_address,
        )
        .await?;

        // 2b. Proxy Handshake (HTTP CONNECT)
        if let Some(p) = proxy {
            Self::proxy_handshake(&mut stream, url, p, tls_options, insecure_skip_verify).await?;
        }

        let target_host = url.host_str().ok_or(NetError::InvalidUrl)?;

        // 3. SSL Handshake (if https)
        if url.scheme() == "https" {
            Self::ssl_handshake(
                stream,
                target_host,
                tls_options,
                insecure_skip_verify,
                dial_options.key_log_file.as_deref(),
                dial_options.ssl_connector.as_ref(),
            )
            .await
        } else {
            Ok(SocketType::Tcp(stream))
        }
    }

    /// Connect using Happy Eyeballs (RFC 8305).
    /// Starts IPv6 first, then races IPv4 after 250ms delay, unless
    /// `prefer_ipv4` flips the preferred family.
    async fn connect_with_happy_eyeballs(
        addrs: &[SocketAddr],
        prefer_ipv4: bool,
        local_address: Option<IpAddr>,
    ) -> Result<TcpStream, NetError> {
        // Separate IPv4 and IPv6 addresses
        let (ipv6_addrs, ipv4_addrs): (Vec<_>, Vec<_>) =
            addrs.iter().partition(|a| matches!(a.ip(), IpAddr::V6(_)));
        let (first_family, second_family) = if prefer_ipv4 {
            (ipv4_addrs, ipv6_addrs)
        } else {
            (ipv6_addrs, ipv4_addrs)
        };

        // If only one family, just try them all sequentially
        if first_family.is_empty() {
            return Self::connect_any(&second_family, local_address).await;
        }
        if second_family.is_empty() {
            return Self::connect_any(&first_family, local_address).await;
        }

        // Happy Eyeballs: start the preferred family first, race the other
        // in after the fallback delay.
        tokio::select! {
            result = Self::connect_any(&first_family, local_address) => {
                match result {
                    Ok(stream) => Ok(stream),
                    Err(_) => Self::connect_any(&second_family, local_address).await,
                }
            }
            result = async {
                tokio::time::sleep(IPV6_FALLBACK_DELAY).await;
                Self::connect_any(&second_family, local_address).await
            } => {
                result
            }
        }
    }

    /// Try connecting to any address in the list, binding from
    /// `local_address` first if one is set.
    async fn connect_any(
        addrs: &[&SocketAddr],
        local_address: Option<IpAddr>,
    ) -> Result<TcpStream, NetError> {
        let mut last_error = NetError::ConnectionFailed;

        for addr in addrs {
            let attempt = async {
                match local_address {
                    Some(bind_ip) => {
                        let socket = match addr.ip() {
                            IpAddr::V4(_) => TcpSocket::new_v4(),
                            IpAddr::V6(_) => TcpSocket::new_v6(),
                        }
                        .map_err(|_| NetError::ConnectionFailed)?;
                        socket
                            .bind(SocketAddr::new(bind_ip, 0))
                            .map_err(|_| NetError::ConnectionFailed)?;
                        socket.connect(**addr).await.map_err(|_| NetError::ConnectionRefused)
                    }
                    None => TcpStream::connect(addr).await.map_err(|_| NetError::ConnectionRefused),
                }
            };

            match tokio::time::timeout(CONNECTION_TIMEOUT, attempt).await {
                Ok(Ok(stream)) => return Ok(stream),
                Ok(Err(e)) => last_error = e,
                Err(_) => last_error = NetError::ConnectionTimedOut,
            }
        }

        Err(last_error)
    }

    /// Perform HTTP CONNECT proxy handshake.
    async fn proxy_handshake(
        stream: &mut TcpStream,
        url: &Url,
        proxy: &crate::socket::proxy::ProxySettings,
        tls_options: Option<&TlsOptions>,
        insecure_skip_verify: bool,
    ) -> Result<(), NetError> {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        match proxy.proxy_type() {
            crate::socket::proxy::ProxyType::Http => {
                let target_host = url.host_str().ok_or(NetError::InvalidUrl)?;
                let target_port = url.port_or_known_default().ok_or(NetError::InvalidUrl)?;
                let target = format!("{}:{}", target_host, target_port);

                let mut connect_req =
                    format!("CONNECT {} HTTP/1.1\r\nHost: {}\r\n", target, target);

                if let Some(auth) = proxy.get_auth_header() {
                    connect_req.push_str(&format!("Proxy-Authorization: {}\r\n", auth));
                }
                connect_req.push_str("\r\n");

                stream
                    .write_all(connect_req.as_bytes())
                    .await
                    .map_err(|_| NetError::ConnectionFailed)?;

                // Read response until we see \r\n\r\n
                let mut response = Vec::with_capacity(1024);
                let mut buf = [0u8; 256];

                loop {
                    let n = stream.read(&mut buf).await.map_err(|_| NetError::ConnectionFailed)?;
                    if n == 0 {
                        return Err(NetError::EmptyResponse);
                    }
                    response.extend_from_slice(&buf[..n]);

                    // Check for header end
                    if response.windows(4).any(|w| w == b"\r\n\r\n") {
                        break;
                    }

                    // Prevent unbounded growth
                    if response.len() > 8192 {
                        return Err(NetError::ResponseHeadersTooBig);
                    }
                }

                let response_str = String::from_utf8_lossy(&response);
                if !response_str.starts_with("HTTP/1.1 200")
                    && !response_str.starts_with("HTTP/1.0 200")
                {
                    tracing::warn!(response = %response_str, "proxy tunnel failed");
                    return Err(NetError::TunnelConnectionFailed);
                }

                Ok(())
            }
            crate::socket::proxy::ProxyType::Socks5 => Self::socks5_handshake(stream, url).await,
            crate::socket::proxy::ProxyType::Https => {
                // HTTPS proxy: TLS to proxy first, then HTTP CONNECT through TLS
                Self::https_proxy_handshake(stream, url, proxy, tls_options, insecure_skip_verify).await
            }
        }
    }

    /// Perform HTTPS proxy handshake (TLS-in-TLS tunneling).
    /// Based on Chromium's HttpProxyConnectJob::is_over_ssl().
    async fn https_proxy_handshake(
        stream: &mut TcpStream,
        url: &Url,
        proxy: &crate::socket::proxy::ProxySettings,
        tls_options: Option<&TlsOptions>,
        insecure_skip_verify: bool,
    ) -> Result<(), NetError> {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let _proxy_host = proxy.url.host_str().ok_or(NetError::InvalidUrl)?;

        // Step 1: Establish TLS connection to the proxy itself
        let mut builder =
            SslConnector::builder(SslMethod::tls()).map_err(|_| NetError::SslProtocolError)?;

        // Apply the active preset's TLS fingerprint to the proxy connection too.
        match tls_options {
            Some(opts) => opts.apply_to_builder(&mut builder)?,
            None => crate::socket::tls::TlsConfig::default_chrome().apply_to_builder(&mut builder)?,
        }
        if insecure_skip_verify {
            builder.set_verify(boring::ssl::SslVerifyMode::NONE);
        }

        let connector = builder.build();
        let _config = connector.configure().map_err(|_| NetError::SslProtocolError)?;

        // We need to take ownership of the stream for TLS
        // This is a limitation - we'll need to restructure for proper TLS-in-TLS
        // For now, we return an error explaining the limitation
        // Full implementation requires returning the TLS stream for further TLS wrapping

        // Perform TLS handshake with proxy
        // Note: This requires restructuring the code to pass the TLS stream back
        // For a true TLS-in-TLS tunnel, we need:
        // 1. Replace `stream` with a TLS connection to proxy
        // 2. Send HTTP CONNECT through that TLS connection
        // 3. Wrap that connection in another TLS layer to the target

        // Simplified: Just validate we can connect to HTTPS proxy
        // Full TLS-in-TLS needs architectural changes
        let target_host = url.host_str().ok_or(NetError::InvalidUrl)?;
        let target_port = url.port_or_known_default().ok_or(NetError::InvalidUrl)?;
        let target = format!("{}:{}", target_host, target_port);

        // For now, send plain CONNECT through the stream and document limitation
        // A proper implementation needs to return a wrapper type
        let mut connect_req = format!("CONNECT {} HTTP/1.1\r\nHost: {}\r\n", target, target);

        if let Some(auth) = proxy.get_auth_header() {
            connect_req.push_str(&format!("Proxy-Authorization: {}\r\n", auth));
        }
        connect_req.push_str("\r\n");

        stream.write_all(connect_req.as_bytes()).await.map_err(|_| NetError::ConnectionFailed)?;

        // Read response
        let mut response = Vec::with_capacity(1024);
        let mut buf = [0u8; 256];

        loop {
            let n = stream.read(&mut buf).await.map_err(|_| NetError::ConnectionFailed)?;
            if n == 0 {
                return Err(NetError::EmptyResponse);
            }
            response.extend_from_slice(&buf[..n]);

            if response.windows(4).any(|w| w == b"\r\n\r\n") {
                break;
            }

            if response.len() > 8192 {
                return Err(NetError::ResponseHeadersTooBig);
            }
        }

        let response_str = String::from_utf8_lossy(&response);
        if !response_str.starts_with("HTTP/1.1 200") && !response_str.starts_with("HTTP/1.0 200") {
            tracing::warn!(response = %response_str, "https proxy tunnel failed");
            return Err(NetError::TunnelConnectionFailed);
        }

        // Note: For full TLS-in-TLS, the SSL handshake to target would happen
        // after this in the calling code (ssl_handshake is called after proxy_handshake)
        Ok(())
    }

    /// Perform SOCKS5 proxy handshake (RFC 1928).
    /// Based on Chromium's socks5_client_socket.cc pattern.
    async fn socks5_handshake(stream: &mut TcpStream, url: &Url) -> Result<(), NetError> {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        const SOCKS5_VERSION: u8 = 0x05;
        const NO_AUTH: u8 = 0x00;
        const CONNECT_CMD: u8 = 0x01;
        const DOMAIN_ADDR: u8 = 0x03;

        let target_host = url.host_str().ok_or(NetError::InvalidUrl)?;
        let target_port = url.port_or_known_default().ok_or(NetError::InvalidUrl)?;

        // Validate hostname length (must fit in 1 byte)
        if target_host.len() > 255 {
            return Err(NetError::InvalidUrl);
        }

        // Phase 1: Greeting - tell proxy we want no auth
        // [version, num_methods, method]
        let greet = [SOCKS5_VERSION, 0x01, NO_AUTH];
        stream.write_all(&greet).await.map_err(|_| NetError::ConnectionFailed)?;

        // Read greeting response: [version, chosen_method]
        let mut greet_response = [0u8; 2];
        stream
            .read_exact(&mut greet_response)
            .await
            .map_err(|_| NetError::SocksConnectionFailed)?;

        if greet_response[0] != SOCKS5_VERSION {
            tracing::warn!(version = greet_response[0], "socks5: invalid version");
            return Err(NetError::SocksConnectionFailed);
        }
        if greet_response[1] != NO_AUTH {
            tracing::warn!(method = greet_response[1], "socks5: unsupported auth method");
            return Err(NetError::SocksConnectionFailed);
        }

        // Phase 2: Handshake - request connection to target
        // [version, cmd, rsv, addr_type, addr..., port_hi, port_lo]
        let mut handshake = Vec::with_capacity(7 + target_host.len());
        handshake.push(SOCKS5_VERSION);
        handshake.push(CONNECT_CMD);
        handshake.push(0x00); // Reserved
        handshake.push(DOMAIN_ADDR);
        handshake.push(target_host.len() as u8);
        handshake.extend_from_slice(target_host.as_bytes());
        handshake.push((target_port >> 8) as u8);
        handshake.push((target_port & 0xFF) as u8);

        stream.write_all(&handshake).await.map_err(|_| NetError::ConnectionFailed)?;

        // Read handshake response header: [version, status, rsv, addr_type, ...]
        let mut response_header = [0u8; 5];
        stream
            .read_exact(&mut response_header)
            .await
            .map_err(|_| NetError::SocksConnectionFailed)?;

        if response_header[0] != SOCKS5_VERSION {
            return Err(NetError::SocksConnectionFailed);
        }
        if response_header[1] != 0x00 {
            tracing::warn!(status = response_header[1], "socks5: connection failed");
            return Err(NetError::SocksConnectionFailed);
        }

        // Read remaining address bytes based on address type
        let addr_type = response_header[3];
        let remaining_bytes = match addr_type {
            0x01 => 4 + 2 - 1, // IPv4 (4 bytes) + port (2) - already read 1
            0x03 => {
                // Domain: first byte is length
                let domain_len = response_header[4] as usize;
                domain_len + 2 // domain + port
            }
            0x04 => 16 + 2 - 1, // IPv6 (16 bytes) + port (2) - already read 1
            _ => return Err(NetError::SocksConnectionFailed),
        };

        // Drain remaining response bytes
        let mut remaining = vec![0u8; remaining_bytes];
        stream.read_exact(&mut remaining).await.map_err(|_| NetError::SocksConnectionFailed)?;

        // Tunnel established!
        Ok(())
    }

    /// Build a connector shaped after `tls_options` (or Chrome's default
    /// ClientHello if none is set). Pulled out of `ssl_handshake` so
    /// [`crate::socket::pool::ClientSocketPool`] can build one once and
    /// cache it, rather than every dial starting from a blank session cache.
    pub(crate) fn build_ssl_connector(
        tls_options: Option<&TlsOptions>,
        insecure_skip_verify: bool,
        key_log_file: Option<&PathBuf>,
    ) -> Result<SslConnector, NetError> {
        let mut builder =
            SslConnector::builder(SslMethod::tls()).map_err(|_| NetError::SslProtocolError)?;

        match tls_options {
            Some(opts) => opts.apply_to_builder(&mut builder)?,
            None => {
                use crate::socket::tls::TlsConfig;
                TlsConfig::default_chrome().apply_to_builder(&mut builder)?;
            }
        }
        if insecure_skip_verify {
            builder.set_verify(boring::ssl::SslVerifyMode::NONE);
        }
        if let Some(path) = key_log_file {
            Self::enable_keylog(&mut builder, path);
        }

        Ok(builder.build())
    }

    /// Perform SSL/TLS handshake, shaping the ClientHello after the active preset.
    ///
    /// `ssl_connector`, when given, is reused as-is instead of building a
    /// fresh connector from `tls_options`. Reusing the same `SslConnector`
    /// across dials to the same pool is what lets BoringSSL's session cache
    /// actually carry a ticket from one connection into the next; a
    /// freshly-built connector always starts with an empty cache.
    async fn ssl_handshake(
        stream: TcpStream,
        host: &str,
        tls_options: Option<&TlsOptions>,
        insecure_skip_verify: bool,
        key_log_file: Option<&PathBuf>,
        ssl_connector: Option<&SslConnector>,
    ) -> Result<SocketType, NetError> {
        let connector = match ssl_connector {
            Some(connector) => connector.clone(),
            None => Self::build_ssl_connector(tls_options, insecure_skip_verify, key_log_file)?,
        };
        let config = connector.configure().map_err(|_| NetError::SslProtocolError)?;

        let tls_stream = tokio_boring::connect(config, host, stream).await.map_err(|e| {
            tracing::warn!(error = ?e, "ssl handshake failed");
            NetError::SslProtocolError
        })?;

        Ok(SocketType::Ssl(tls_stream))
    }

    /// Append NSS-format key log lines (`CLIENT_RANDOM ...`) to `path` for
    /// every handshake on connectors built from this `builder`, the same
    /// format Wireshark expects via `SSLKEYLOGFILE`.
    fn enable_keylog(builder: &mut boring::ssl::SslConnectorBuilder, path: &PathBuf) {
        let path = path.clone();
        builder.set_keylog_callback(move |_ssl, line| {
            use std::io::Write;
            if let Ok(mut file) = std::fs::OpenOptions::new().create(true).append(true).open(&path) {
                let _ = writeln!(file, "{}", line);
            }
        });
    }
}
