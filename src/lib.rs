//! # httpcloak
//!
//! A browser-fingerprint-emulating HTTP client with a Chromium-inspired
//! architecture: preset-driven TLS, HTTP/1.1, HTTP/2, and HTTP/3
//! transports racing behind one façade.
//!
//! `httpcloak` reproduces browser networking behavior at the wire level —
//! connection pooling, cookie management, TLS fingerprinting, and
//! protocol-level ordering — rather than just the high-level request API.
//!
//! ## Features
//!
//! - **Preset registry**: named browser fingerprints (`"chrome"`,
//!   `"firefox"`, `"safari"`, ...) driving TLS, H1, H2, and H3 wire shape
//! - **Connection pooling**: per-`(host, protocol)` pools with idle/max-age
//!   eviction and dial coalescing
//! - **HTTP/1.1, HTTP/2 & HTTP/3**: full protocol support, H2 via a
//!   fingerprint-aware fork of `h2`, H3 via `quinn` + `h3`
//! - **TLS session cache**: per-host LRU of resumable TLS/QUIC sessions
//! - **Cookie management**: RFC 6265 compliant with PSL validation
//! - **TLS security**: BoringSSL, HSTS, certificate pinning
//! - **Proxy support**: HTTP, HTTPS, and SOCKS5 proxies
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use httpcloak::session_facade::{Session, SessionOptions};
//!
//! #[tokio::main]
//! async fn main() {
//!     let session = Session::new("chrome", SessionOptions::default()).await.unwrap();
//!     let response = session.get("https://example.com").await.unwrap();
//!     println!("Status: {}", response.status());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Core types, error taxonomy, and the structured error envelope
//! - [`preset`] - Named browser fingerprint presets
//! - [`session`] - TLS/QUIC session and ECH caches
//! - [`facade`] - Protocol selection, racing, and the connection pool
//! - [`quic`] - QUIC transport and HTTP/3 framing
//! - [`cookies`] - Cookie storage, parsing, and browser extraction
//! - [`http`] - HTTP transactions, headers, and body handling
//! - [`socket`] - Connection pooling, proxy, and TLS sockets
//! - [`tls`] - HSTS, certificate pinning, and CT verification
//! - [`urlrequest`] - High-level request API and device emulation
//! - [`session_facade`] - The public `Session` API (cookies, redirects, retries)
//! - [`client`] - Builder-style `Client` API over the same transport stack
//! - [`ws`] - WebSocket client support
//!
//! ## Security
//!
//! This library implements several security features from Chromium:
//! - Public Suffix List validation to prevent supercookie attacks
//! - HSTS enforcement with preloaded domains
//! - Certificate pinning with SPKI hash verification
//! - Redirect cycle detection and credential stripping

pub mod base;
pub mod client;
pub mod cookies;
pub mod decompress;
pub mod dns;
pub mod emulation;
pub mod facade;
pub mod http;
pub mod preset;
pub mod quic;
pub mod session;
pub mod session_facade;
pub mod socket;
pub mod tls;
pub mod urlrequest;
pub mod ws;

pub use client::{Client, ClientBuilder};
pub use emulation::EmulationFactory;
