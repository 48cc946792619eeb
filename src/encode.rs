//! Token codec for mermaid.ink `pako:` links.
//!
//! A token is the [`RenderPayload`] serialized as compact JSON, compressed
//! with raw deflate at the highest level, then base64url-encoded with the
//! padding stripped and tagged with the `pako:` prefix.

use std::io::{Read, Write};

use base64::alphabet;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use flate2::read::{DeflateDecoder, ZlibDecoder};
use flate2::write::DeflateEncoder;
use flate2::Compression;

use crate::error::{Error, Result};
use crate::types::{RenderPayload, Theme};

/// Tag marking a compressed payload, as opposed to plain base64 source
pub const TOKEN_PREFIX: &str = "pako:";

/// Links copied from other tools are not always stripped of padding
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Encode diagram source with the default theme.
///
/// # Example
/// ```rust
/// let token = mermaid_ink::encode("graph LR\n  A --> B");
/// assert!(token.starts_with("pako:"));
/// ```
pub fn encode(source: &str) -> String {
    encode_with(source, Theme::Default)
}

/// Encode diagram source with an explicit theme
pub fn encode_with(source: &str, theme: Theme) -> String {
    let payload = RenderPayload::new(source, theme);
    // Serializing plain strings and bools into memory cannot fail
    let json = serde_json::to_vec(&payload).expect("payload serializes to JSON");
    let compressed = deflate(&json).expect("deflate into a Vec cannot fail");
    format!("{}{}", TOKEN_PREFIX, URL_SAFE_NO_PAD.encode(compressed))
}

/// Decode a `pako:` token back into its payload.
///
/// Accepts raw deflate as produced by [`encode`] and zlib-framed streams
/// as produced by mermaid.live.
pub fn decode(token: &str) -> Result<RenderPayload> {
    let body = token
        .trim()
        .strip_prefix(TOKEN_PREFIX)
        .ok_or_else(|| Error::Decode(format!("missing '{}' prefix", TOKEN_PREFIX)))?;

    let compressed = URL_SAFE_LENIENT
        .decode(body)
        .map_err(|e| Error::Decode(format!("base64: {}", e)))?;

    let json = inflate(&compressed).map_err(|e| Error::Decode(format!("inflate: {}", e)))?;

    serde_json::from_slice(&json).map_err(|e| Error::Decode(format!("json: {}", e)))
}

fn deflate(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(data)?;
    encoder.finish()
}

fn inflate(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut out = Vec::new();
    if is_zlib_header(data) && ZlibDecoder::new(data).read_to_end(&mut out).is_ok() {
        return Ok(out);
    }
    // A raw stream can start with bytes that pass the header check
    out.clear();
    DeflateDecoder::new(data).read_to_end(&mut out)?;
    Ok(out)
}

/// CMF/FLG pair check from RFC 1950: method 8, window <= 32K, checksum
fn is_zlib_header(data: &[u8]) -> bool {
    match data {
        [cmf, flg, ..] => {
            cmf & 0x0f == 8 && cmf >> 4 <= 7 && (u16::from(*cmf) << 8 | u16::from(*flg)) % 31 == 0
        }
        _ => false,
    }
}
