//! QUIC connection configuration.
//!
//! Field names follow quinn-proto's `TransportConfig` builder so the
//! mapping onto `quinn::TransportConfig` at dial time is a straight copy.

use std::time::Duration;

/// QUIC/HTTP3 configuration.
#[derive(Debug, Clone)]
pub struct QuicConfig {
    /// Maximum idle timeout
    pub idle_timeout: Duration,
    /// Initial RTT estimate
    pub initial_rtt: Duration,
    /// Maximum UDP payload size
    pub max_udp_payload_size: u16,
    /// Initial max data (connection-level flow control)
    pub initial_max_data: u64,
    /// Initial max stream data (stream-level flow control)
    pub initial_max_stream_data: u64,
    /// Initial max bidirectional streams
    pub initial_max_streams_bidi: u64,
    /// Initial max unidirectional streams
    pub initial_max_streams_uni: u64,
    /// Enable 0-RTT
    pub enable_0rtt: bool,
    /// ALPN protocols
    pub alpn_protocols: Vec<String>,
    /// Keep-alive PING interval; `None` disables keep-alive pings.
    pub keep_alive_interval: Option<Duration>,
    /// Send a GREASE QUIC version in the first Initial packet's supported
    /// versions list, the way Chromium probes version-negotiation
    /// ossification.
    pub grease_quic_bit: bool,
    /// Emit the `version_information` (0x11) and `google_version` (0x4752)
    /// transport parameters.
    pub send_version_information: bool,
}

impl Default for QuicConfig {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::from_secs(60),
            initial_rtt: Duration::from_millis(100),
            max_udp_payload_size: 1200,
            initial_max_data: 10 * 1024 * 1024,   // 10 MB
            initial_max_stream_data: 1024 * 1024, // 1 MB
            initial_max_streams_bidi: 100,
            initial_max_streams_uni: 100,
            enable_0rtt: true,
            alpn_protocols: vec!["h3".to_string()],
            keep_alive_interval: Some(Duration::from_secs(15)),
            grease_quic_bit: true,
            send_version_information: true,
        }
    }
}

impl QuicConfig {
    /// Create a new config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set idle timeout.
    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Set initial RTT.
    pub fn initial_rtt(mut self, rtt: Duration) -> Self {
        self.initial_rtt = rtt;
        self
    }

    /// Set max UDP payload size.
    pub fn max_udp_payload_size(mut self, size: u16) -> Self {
        self.max_udp_payload_size = size;
        self
    }

    /// Set initial max data.
    pub fn initial_max_data(mut self, max: u64) -> Self {
        self.initial_max_data = max;
        self
    }

    /// Set initial max stream data.
    pub fn initial_max_stream_data(mut self, max: u64) -> Self {
        self.initial_max_stream_data = max;
        self
    }

    /// Enable or disable 0-RTT.
    pub fn enable_0rtt(mut self, enable: bool) -> Self {
        self.enable_0rtt = enable;
        self
    }

    /// Set ALPN protocols.
    pub fn alpn_protocols(mut self, protocols: Vec<String>) -> Self {
        self.alpn_protocols = protocols;
        self
    }

    /// Set the keep-alive PING interval.
    pub fn keep_alive_interval(mut self, interval: Option<Duration>) -> Self {
        self.keep_alive_interval = interval;
        self
    }

    /// Convert into a `quinn::TransportConfig`.
    pub fn to_transport_config(&self) -> quinn::TransportConfig {
        let mut transport = quinn::TransportConfig::default();
        transport.max_idle_timeout(Some(
            self.idle_timeout
                .try_into()
                .unwrap_or_else(|_| quinn::VarInt::from_u32(60_000).into()),
        ));
        transport.initial_rtt(self.initial_rtt);
        transport.receive_window(quinn::VarInt::from_u64(self.initial_max_data).unwrap_or(quinn::VarInt::MAX));
        transport.stream_receive_window(
            quinn::VarInt::from_u64(self.initial_max_stream_data).unwrap_or(quinn::VarInt::MAX),
        );
        transport.max_concurrent_bidi_streams(
            quinn::VarInt::from_u64(self.initial_max_streams_bidi).unwrap_or(quinn::VarInt::MAX),
        );
        transport.max_concurrent_uni_streams(
            quinn::VarInt::from_u64(self.initial_max_streams_uni).unwrap_or(quinn::VarInt::MAX),
        );
        if let Some(interval) = self.keep_alive_interval {
            transport.keep_alive_interval(Some(interval));
        }
        transport
    }
}
