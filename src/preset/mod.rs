//! Preset: a named, immutable bundle of everything needed to make a
//! connection look like a specific browser/client on the wire.
//!
//! Generalizes [`crate::emulation::Emulation`] (which already bundles TLS +
//! HTTP/1 + HTTP/2 options) with the pieces `Emulation` doesn't carry:
//! HTTP/3 settings, named ClientHello variants for the PSK/QUIC legs, and an
//! `supports_h3` gate consulted by the transport façade.

pub mod registry;

use std::sync::Arc;

use crate::emulation::{Emulation, Http1Options, Http2Options};
use crate::http::orderedheaders::OrderedHeaderMap;
use crate::quic::settings::Http3Settings;
use crate::socket::tls::impersonate::ImpersonateTarget;
use crate::socket::tls::TlsOptions;

pub use registry::{get as get_preset, PresetRegistry};

/// Named ClientHello variants a preset can dial with, keyed by transport leg.
/// `tcp`/`tcp_psk` drive the BoringSSL ClientHello for TCP-based TLS
/// (H1/H2); `quic`/`quic_psk` drive the QUIC transport's TLS leg.
#[derive(Debug, Clone)]
pub struct ClientHelloIds {
    pub tcp: ImpersonateTarget,
    pub tcp_psk: Option<ImpersonateTarget>,
    pub quic: Option<ImpersonateTarget>,
    pub quic_psk: Option<ImpersonateTarget>,
}

impl ClientHelloIds {
    pub fn new(tcp: ImpersonateTarget) -> Self {
        Self {
            tcp,
            tcp_psk: None,
            quic: None,
            quic_psk: None,
        }
    }
}

/// Everything needed to dial and speak as a given browser/client.
///
/// Immutable once constructed; `Arc<Preset>` is the unit shared across
/// sessions and cloned cheaply into connect jobs.
#[derive(Debug, Clone)]
pub struct Preset {
    pub name: &'static str,
    pub tls_options: TlsOptions,
    pub http1_options: Http1Options,
    pub http2_options: Http2Options,
    pub http3_settings: Http3Settings,
    pub headers: OrderedHeaderMap,
    pub header_order: Vec<String>,
    pub pseudo_header_order: Vec<String>,
    pub client_hello_ids: ClientHelloIds,
    pub supports_h3: bool,
}

impl Preset {
    pub fn builder(name: &'static str, tls_options: TlsOptions, client_hello: ImpersonateTarget) -> PresetBuilder {
        PresetBuilder {
            preset: Preset {
                name,
                tls_options,
                http1_options: Http1Options::default(),
                http2_options: Http2Options::default(),
                http3_settings: Http3Settings::default(),
                headers: OrderedHeaderMap::new(),
                header_order: Vec::new(),
                pseudo_header_order: vec![
                    ":method".into(),
                    ":authority".into(),
                    ":scheme".into(),
                    ":path".into(),
                ],
                client_hello_ids: ClientHelloIds::new(client_hello),
                supports_h3: false,
            },
        }
    }

    /// Build from an existing [`Emulation`] bundle (HTTP/1+HTTP/2+TLS +
    /// default headers), filling HTTP/3 and ClientHello fields with
    /// defaults. Used to adapt the profiles already expressed in
    /// `emulation::profiles::*` into the richer `Preset` shape.
    pub fn from_emulation(
        name: &'static str,
        emulation: Emulation,
        client_hello: ImpersonateTarget,
        header_order: Vec<String>,
    ) -> Self {
        let (tls_options, http1_options, http2_options, headers) = emulation.into_parts();
        let mut ordered = OrderedHeaderMap::new();
        for (name, value) in headers.iter() {
            if let Ok(v) = value.to_str() {
                let _ = ordered.insert(name.as_str(), v);
            }
        }
        Preset {
            name,
            tls_options: tls_options.unwrap_or_default(),
            http1_options: http1_options.unwrap_or_default(),
            http2_options: http2_options.unwrap_or_default(),
            http3_settings: Http3Settings::default(),
            headers: ordered,
            header_order,
            pseudo_header_order: vec![
                ":method".into(),
                ":authority".into(),
                ":scheme".into(),
                ":path".into(),
            ],
            client_hello_ids: ClientHelloIds::new(client_hello),
            supports_h3: false,
        }
    }
}

pub struct PresetBuilder {
    preset: Preset,
}

impl PresetBuilder {
    pub fn http1_options(mut self, opts: Http1Options) -> Self {
        self.preset.http1_options = opts;
        self
    }

    pub fn http2_options(mut self, opts: Http2Options) -> Self {
        self.preset.http2_options = opts;
        self
    }

    pub fn http3_settings(mut self, settings: Http3Settings) -> Self {
        self.preset.http3_settings = settings;
        self
    }

    pub fn headers(mut self, headers: OrderedHeaderMap) -> Self {
        self.preset.headers = headers;
        self
    }

    pub fn header_order(mut self, order: Vec<String>) -> Self {
        self.preset.header_order = order;
        self
    }

    pub fn pseudo_header_order(mut self, order: Vec<String>) -> Self {
        self.preset.pseudo_header_order = order;
        self
    }

    pub fn quic_client_hello(mut self, target: ImpersonateTarget) -> Self {
        self.preset.client_hello_ids.quic = Some(target);
        self
    }

    pub fn supports_h3(mut self, value: bool) -> Self {
        self.preset.supports_h3 = value;
        self
    }

    pub fn build(self) -> Arc<Preset> {
        Arc::new(self.preset)
    }
}
