//! Structured error envelope returned from public entry points.
//!
//! Wraps a [`NetError`] with the operation context Chromium's `NetLog`
//! attaches out of band (op, host, port, protocol). `category` and
//! `retryable` are computed from the wrapped error, never stored
//! independently, so they can't drift from it.

use std::fmt;

use crate::base::neterror::NetError;

/// Coarse bucket a [`NetError`] falls into, for callers that want to branch
/// on "what kind of thing went wrong" without matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Timeout,
    Dns,
    Tls,
    Proxy,
    Protocol,
    Request,
    Response,
    Closed,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCategory::Network => "network",
            ErrorCategory::Timeout => "timeout",
            ErrorCategory::Dns => "dns",
            ErrorCategory::Tls => "tls",
            ErrorCategory::Proxy => "proxy",
            ErrorCategory::Protocol => "protocol",
            ErrorCategory::Request => "request",
            ErrorCategory::Response => "response",
            ErrorCategory::Closed => "closed",
        };
        f.write_str(s)
    }
}

/// The protocol leg an operation was attempted over, for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorProtocol {
    Http1,
    Http2,
    Http3,
    Unknown,
}

impl fmt::Display for ErrorProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorProtocol::Http1 => "h1",
            ErrorProtocol::Http2 => "h2",
            ErrorProtocol::Http3 => "h3",
            ErrorProtocol::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Structured error envelope: `{op, host, port, protocol, cause, category, retryable}`.
#[derive(Debug, Clone)]
pub struct CloakError {
    pub op: &'static str,
    pub host: String,
    pub port: u16,
    pub protocol: ErrorProtocol,
    pub cause: NetError,
}

impl CloakError {
    pub fn new(
        op: &'static str,
        host: impl Into<String>,
        port: u16,
        protocol: ErrorProtocol,
        cause: NetError,
    ) -> Self {
        Self {
            op,
            host: host.into(),
            port,
            protocol,
            cause,
        }
    }

    /// Coarse category, derived structurally from the wrapped [`NetError`].
    pub fn category(&self) -> ErrorCategory {
        use NetError::*;
        match &self.cause {
            ConnectionTimedOut => ErrorCategory::Timeout,
            NameNotResolved | NameResolutionFailed | NameNotResolvedFor { .. } => {
                ErrorCategory::Dns
            }
            SslProtocolError
            | SslVersionOrCipherMismatch
            | SslHandshakeFailedWith { .. }
            | SslClientAuthCertNeeded
            | SslServerCertChanged
            | SslPinnedKeyNotInCertChain
            | CertPinningFailed
            | CertificateTransparencyRequired
            | InvalidEchConfigList
            | EchNotNegotiated
            | Tls13DowngradeDetected
            | AlpnNegotiationFailed => ErrorCategory::Tls,
            ProxyConnectionFailed
            | ProxyAuthRequested
            | ProxyAuthUnsupported
            | ProxyCertificateInvalid
            | TunnelConnectionFailed
            | NoSupportedProxies
            | ProxyUnableToConnectToDestination => ErrorCategory::Proxy,
            Http2ProtocolError
            | Http2FlowControlError
            | Http2FrameSizeError
            | Http2CompressionError
            | Http2ServerRefusedStream
            | Http2StreamClosed
            | QuicProtocolError
            | QuicHandshakeFailed
            | InvalidChunkedEncoding
            | IncompleteHttp2Headers => ErrorCategory::Protocol,
            InvalidUrl | DisallowedUrlScheme | UnknownUrlScheme | MethodNotSupported
            | UnknownPreset(_) => ErrorCategory::Request,
            InvalidResponse | EmptyResponse | ResponseHeadersTooBig | ContentLengthMismatch
            | ResponseHeadersTruncated | ContentDecodingFailed => ErrorCategory::Response,
            ConnectionClosed | ConnectionReset | SocketRemoteClosed | ConnectionAborted => {
                ErrorCategory::Closed
            }
            _ => ErrorCategory::Network,
        }
    }

    /// Whether retrying the same request might succeed. Derived from the
    /// `NetError` variant/kind, never from substring-matching a message.
    pub fn retryable(&self) -> bool {
        use NetError::*;
        matches!(
            &self.cause,
            ConnectionReset
                | ConnectionRefused
                | ConnectionAborted
                | ConnectionClosed
                | ConnectionTimedOut
                | SocketRemoteClosed
                | Http2ServerRefusedStream
                | Http2RstStreamNoErrorReceived
                | QuicHandshakeFailed
                | NameNotResolved
                | NameNotResolvedFor { .. }
                | TemporarilyThrottled
                | PreconnectMaxSocketLimit
        )
    }
}

impl fmt::Display for CloakError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}:{} [{}] ({}, retryable={}): {}",
            self.op,
            self.host,
            self.port,
            self.protocol,
            self.category(),
            self.retryable(),
            self.cause
        )
    }
}

impl std::error::Error for CloakError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.cause)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categorizes_dns_errors() {
        let err = CloakError::new(
            "connect",
            "example.com",
            443,
            ErrorProtocol::Http2,
            NetError::NameNotResolved,
        );
        assert_eq!(err.category(), ErrorCategory::Dns);
        assert!(err.retryable());
    }

    #[test]
    fn unknown_preset_is_not_retryable() {
        let err = CloakError::new(
            "select_preset",
            "",
            0,
            ErrorProtocol::Unknown,
            NetError::UnknownPreset("chrome-999".into()),
        );
        assert_eq!(err.category(), ErrorCategory::Request);
        assert!(!err.retryable());
    }
}
