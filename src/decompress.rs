//! Response body decompression.
//!
//! Selects a decoder from the response's `Content-Encoding` header and
//! wraps the already-collected [`ResponseBody`] bytes the way a browser's
//! network stack transparently inflates a compressed response before
//! handing it to the caller. Kept outside the core transport (the spec
//! places decode/redirect/cookie handling in the session façade layer) but
//! still built here, since a usable client needs it.

use bytes::Bytes;

use crate::base::neterror::NetError;

/// Supported `Content-Encoding` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentEncoding {
    Identity,
    Gzip,
    Deflate,
    Brotli,
    Zstd,
}

impl ContentEncoding {
    /// Parse a `Content-Encoding` header value. Unknown encodings are
    /// treated as `Identity` — Chromium does the same rather than failing
    /// the whole response over an encoding it doesn't recognize.
    pub fn from_header(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "gzip" | "x-gzip" => ContentEncoding::Gzip,
            "deflate" => ContentEncoding::Deflate,
            "br" => ContentEncoding::Brotli,
            "zstd" => ContentEncoding::Zstd,
            _ => ContentEncoding::Identity,
        }
    }
}

/// Decode `body` according to `encoding`, returning the decompressed
/// bytes. A decode failure maps to [`NetError::ContentDecodingFailed`],
/// matching the error this crate's other body-handling paths already use.
pub fn decode(encoding: ContentEncoding, body: Bytes) -> Result<Bytes, NetError> {
    match encoding {
        ContentEncoding::Identity => Ok(body),
        ContentEncoding::Gzip => decode_gzip(&body),
        ContentEncoding::Deflate => decode_deflate(&body),
        ContentEncoding::Brotli => decode_brotli(&body),
        ContentEncoding::Zstd => decode_zstd(&body),
    }
}

fn decode_gzip(body: &[u8]) -> Result<Bytes, NetError> {
    use std::io::Read;
    let mut decoder = flate2::read::GzDecoder::new(body);
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .map_err(|_| NetError::ContentDecodingFailed)?;
    Ok(Bytes::from(out))
}

fn decode_deflate(body: &[u8]) -> Result<Bytes, NetError> {
    use std::io::Read;
    let mut decoder = flate2::read::DeflateDecoder::new(body);
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .map_err(|_| NetError::ContentDecodingFailed)?;
    Ok(Bytes::from(out))
}

fn decode_brotli(body: &[u8]) -> Result<Bytes, NetError> {
    use std::io::Read;
    let mut out = Vec::new();
    let mut reader = brotli::Decompressor::new(body, 4096);
    reader
        .read_to_end(&mut out)
        .map_err(|_| NetError::ContentDecodingFailed)?;
    Ok(Bytes::from(out))
}

fn decode_zstd(body: &[u8]) -> Result<Bytes, NetError> {
    zstd::stream::decode_all(body)
        .map(Bytes::from)
        .map_err(|_| NetError::ContentDecodingFailed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_encoding_is_identity() {
        assert_eq!(
            ContentEncoding::from_header("compress"),
            ContentEncoding::Identity
        );
    }

    #[test]
    fn identity_passthrough() {
        let body = Bytes::from_static(b"hello");
        let decoded = decode(ContentEncoding::Identity, body.clone()).unwrap();
        assert_eq!(decoded, body);
    }

    #[test]
    fn gzip_roundtrip() {
        use std::io::Write;
        let mut encoder =
            flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(b"hello world").unwrap();
        let compressed = encoder.finish().unwrap();
        let decoded = decode(ContentEncoding::Gzip, Bytes::from(compressed)).unwrap();
        assert_eq!(&decoded[..], b"hello world");
    }
}
