//! QUIC and HTTP/3 support.
//!
//! Provides QUIC transport and HTTP/3 protocol support using `quinn` + `h3`.
//! Mirrors Chromium's net/quic/ implementation pattern.
//!
//! # Example
//! ```ignore
//! use httpcloak::quic::{QuicConnection, QuicConnectionBuilder};
//!
//! let conn = QuicConnectionBuilder::new().url("https://example.com")?.connect().await?;
//! ```

mod config;
mod connection;
pub mod session_pool;
pub mod settings;

pub use config::QuicConfig;
pub use connection::{QuicConnection, QuicConnectionBuilder};
pub use session_pool::{Http3HostKey, Http3SessionPool};
pub use settings::Http3Settings;
