//! HTTP/3-level settings (the SETTINGS frame h3 sends on its control
//! stream) plus the QUIC transport-parameter fingerprint surface: GREASE
//! transport parameters and the two vendor parameters Chromium sends
//! (`google_version` and the IETF `version_information` draft parameter).

/// QUIC transport parameter id for `version_information` (draft-ietf-quic-version-negotiation).
pub const TP_VERSION_INFORMATION: u64 = 0x11;
/// QUIC transport parameter id Chromium uses for its `google_version` extension.
pub const TP_GOOGLE_VERSION: u64 = 0x4752;

/// HTTP/3-layer SETTINGS a preset sends on the control stream, mirroring
/// the same fields `H2Fingerprint` exposes for HTTP/2's SETTINGS frame.
#[derive(Debug, Clone)]
pub struct Http3Settings {
    pub qpack_max_table_capacity: Option<u64>,
    pub qpack_blocked_streams: Option<u64>,
    pub max_field_section_size: Option<u64>,
    pub enable_connect_protocol: bool,
    /// Send a GREASE (reserved, ignorable) SETTINGS identifier, the way
    /// Chromium does for H2 and H3 alike to detect settings-order/presence
    /// fingerprinting.
    pub send_grease_setting: bool,
    /// Send a GREASE QUIC transport parameter using the
    /// `0x?a?a?a?a`-pattern reserved id space (RFC 9000 §18.1).
    pub send_grease_transport_param: bool,
}

impl Default for Http3Settings {
    fn default() -> Self {
        Self {
            qpack_max_table_capacity: Some(0),
            qpack_blocked_streams: Some(0),
            max_field_section_size: None,
            enable_connect_protocol: false,
            send_grease_setting: true,
            send_grease_transport_param: true,
        }
    }
}

/// Compute a GREASE transport-parameter id for the given session-scoped
/// seed, following RFC 9000 §18.1: `31 * N + 27` for some non-negative
/// integer `N`, which always lands on a `0x?a?a?a?a`-shaped value when `N`
/// is drawn from a small range. Deterministic per seed so a session reuses
/// the same id across reconnects within its lifetime.
pub fn grease_transport_param_id(seed: u64) -> u64 {
    let n = seed % 64;
    31 * n + 27
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grease_id_is_deterministic() {
        assert_eq!(grease_transport_param_id(5), grease_transport_param_id(5));
    }

    #[test]
    fn grease_id_follows_rfc_pattern() {
        for seed in 0..64 {
            let id = grease_transport_param_id(seed);
            assert_eq!((id - 27) % 31, 0);
        }
    }
}
