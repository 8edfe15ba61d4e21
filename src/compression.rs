//! Compression Envelope Module
//!
//! Wraps/unwraps the zlib-compressed outer form (ETF's `P` tag), grounded on
//! `infrastructure_utilities::compression`'s `flate2`-backed helpers. ETF's
//! `P` envelope carries a zlib (RFC 1950) stream, not raw DEFLATE — a peer
//! Erlang node's `zlib:uncompress/1` expects the two-byte header (`\x78\x9c`
//! at level 6, `\x78\x01` at level 1, `\x78\xda` at level 9) and trailing
//! Adler-32 checksum, so this module uses `flate2::{read,write}::Zlib*`
//! rather than the `Deflate*` pair. Unlike the grounding crate's
//! `CompressionLevel`, every level 0..9 is threaded straight through to
//! `flate2::Compression::new(level)` rather than coalesced into a
//! four-bucket enum: all nine levels must be individually honored.

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression as Flate2Level;
use std::io::{Read, Write};

use crate::error::DecodeError;

/// Requested compression for [`crate::encode`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Compression {
    /// Emit the plain, uncompressed term body.
    Off,
    /// Wrap the term body in the `P` envelope at the given deflate level
    /// (0..=9). Level 0 behaves identically to `Off` — the envelope is
    /// only used when compression is actually requested.
    Level(u8),
}

impl Compression {
    /// The default level (`compress=true`).
    pub const DEFAULT: Compression = Compression::Level(6);
}

impl From<bool> for Compression {
    fn from(enabled: bool) -> Self {
        if enabled {
            Compression::DEFAULT
        } else {
            Compression::Off
        }
    }
}

/// Zlib-compress `body` at `level` (0..=9, clamped).
pub(crate) fn deflate(body: &[u8], level: u8) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Flate2Level::new(level.min(9) as u32));
    encoder
        .write_all(body)
        .expect("writing to an in-memory encoder cannot fail");
    encoder
        .finish()
        .expect("finishing an in-memory encoder cannot fail")
}

/// Inflate `compressed`, failing with [`DecodeError`] if the stream does not
/// decode to exactly `expected_len` bytes.
pub(crate) fn inflate(compressed: &[u8], expected_len: u32) -> Result<Vec<u8>, DecodeError> {
    inflate_prefix(compressed, expected_len).map(|(out, _consumed)| out)
}

/// Inflate a zlib stream occupying a *prefix* of `input`, returning the
/// decompressed bytes alongside how many input bytes the stream actually
/// consumed. The decoder stops at the stream's own end marker (the trailing
/// Adler-32) rather than at the end of `input`, so trailing bytes the caller
/// appended after the compressed envelope are left untouched for the caller.
pub(crate) fn inflate_prefix(input: &[u8], expected_len: u32) -> Result<(Vec<u8>, usize), DecodeError> {
    let mut decoder = ZlibDecoder::new(input);
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .map_err(|e| DecodeError::malformed(format!("inflate failed: {e}")))?;

    if out.len() as u64 != expected_len as u64 {
        return Err(DecodeError::LengthMismatch {
            expected: expected_len as usize,
            actual: out.len(),
        });
    }
    let consumed = decoder.total_in() as usize;
    Ok((out, consumed))
}
