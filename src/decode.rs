//! Streaming charset decoding into the text scratch buffer.
//!
//! Byte count is a poor predictor of decoded length under multi-byte
//! encodings, so the output buffer starts from a configurable estimate and
//! grows only when the decoder reports it is full. This avoids scanning the
//! input twice and avoids large over-allocation for mostly-ASCII input.

use crate::cache::BufferCache;
use encoding_rs::{CoderResult, Encoding};
#[cfg(feature = "logging")]
use tracing;

/// The UTF-8 byte-order mark, stripped before decoding when present.
pub(crate) const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Decodes the first `valid` bytes of the byte scratch into the text
/// scratch, replacing malformed or unmappable sequences with U+FFFD.
/// Returns the decoded length in bytes of UTF-8.
///
/// The decode never fails: the replacing `encoding_rs` entry points only
/// ever report output-full or input-empty, and output-full is handled by
/// growing the text scratch and retrying from the same input position.
pub(crate) fn decode_into_text(
    cache: &mut BufferCache,
    charset: &'static Encoding,
    chars_per_byte: f64,
    chunk_size: usize,
    valid: usize,
) -> usize {
    let input = &cache.bytes.slice()[..valid];
    let mut pos = if input.starts_with(&UTF8_BOM) { UTF8_BOM.len() } else { 0 };

    let estimate = ((valid - pos) as f64 * chars_per_byte).ceil() as usize;
    cache.reset_text(estimate.max(chunk_size));

    // BOM handling is done above, so the decoder must not consume one again.
    let mut decoder = charset.new_decoder_without_bom_handling();
    loop {
        let (result, read, _replaced) = {
            let src = &cache.bytes.slice()[pos..valid];
            decoder.decode_to_string(src, &mut cache.text, true)
        };
        pos += read;
        match result {
            CoderResult::InputEmpty => break,
            CoderResult::OutputFull => {
                #[cfg(feature = "logging")]
                tracing::debug!(
                    "decode output full at {} bytes, growing",
                    cache.text.capacity()
                );
                cache.grow_text();
            }
        }
    }

    cache.text.len()
}
