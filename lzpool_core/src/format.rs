//! LZB1 block layout and varint encoding rules.
//!
//! A block is fully self-describing:
//!
//! ```text
//! [HEADER]   varint — exact byte length L of the decoded payload
//! [BODY]     token stream that reconstructs exactly L bytes
//! [TRAILER]  8 bytes LE — xxh3-64 of the decoded payload
//! ```
//!
//! Every token starts with a varint `v` whose low bit is the token tag:
//!
//! - `v & 1 == 0` — **literal run**: `count = v >> 1` raw bytes follow,
//!   copied verbatim into the output.
//! - `v & 1 == 1` — **back-reference**: `length = v >> 1`, followed by a
//!   varint `distance`; copies `length` bytes starting `distance` bytes
//!   behind the current output offset. `length` may exceed `distance`
//!   (self-overlapping copy, used for run-length expansion).
//!
//! No token needs look-ahead beyond its own encoded bytes to determine its
//! length, so the body can be replayed with a single forward scan.

use crate::error::FormatError;

/// Minimum back-reference length the encoder will emit.
///
/// With `MAX_DISTANCE` at 32 KiB a minimum-length back-reference costs at
/// most 4 wire bytes (1 tag varint + ≤3 distance varint), so a match is
/// never larger on the wire than the literals it replaces.
pub const MIN_MATCH: usize = 4;

/// Maximum back-reference distance: the 32 KiB sliding window the encoder
/// searches. The decoder accepts any distance up to the current output
/// offset; the window only bounds what the encoder produces.
pub const MAX_DISTANCE: usize = 32 * 1024;

/// Size of the xxh3-64 payload checksum trailer in bytes.
pub const TRAILER_SIZE: usize = 8;

/// Maximum encoded size of a single varint (u64 range).
pub const MAX_VARINT_LEN: usize = 10;

// ── Varints ────────────────────────────────────────────────────────────────

/// Append `value` to `out` as a little-endian base-128 varint.
pub fn put_varint(out: &mut Vec<u8>, mut value: u64) {
    while value >= 0x80 {
        out.push((value as u8) | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
}

/// Read a varint from the front of `buf`.
///
/// Returns the value and the number of bytes consumed, or `None` if the
/// varint is unterminated within `buf` or does not fit in a u64.
pub fn get_varint(buf: &[u8]) -> Option<(u64, usize)> {
    let mut value: u64 = 0;
    let mut shift = 0u32;
    for (i, &byte) in buf.iter().take(MAX_VARINT_LEN).enumerate() {
        let bits = (byte & 0x7f) as u64;
        // The 10th byte may only contribute the single remaining bit.
        if shift == 63 && bits > 1 {
            return None;
        }
        value |= bits << shift;
        if byte & 0x80 == 0 {
            return Some((value, i + 1));
        }
        shift += 7;
    }
    None
}

/// Number of bytes `put_varint` would emit for `value`.
pub fn varint_len(value: u64) -> usize {
    (((64 - (value | 1).leading_zeros()) as usize) + 6) / 7
}

// ── Size accounting ────────────────────────────────────────────────────────

/// Upper bound on `encode(input).len()` for an input of `n` bytes.
///
/// Callers use this to pre-size destination buffers without encoding first.
/// The `n / 4` term covers literal-run tag varints (a run tag amortizes to
/// at most one byte per five input bytes, since runs are separated by
/// matches of at least `MIN_MATCH` bytes whose wire cost never exceeds the
/// bytes they replace); the constant covers the header, the trailer, and
/// the tag of a single maximal literal run.
pub fn max_encoded_len(n: usize) -> usize {
    n + n / 4 + 2 * MAX_VARINT_LEN + TRAILER_SIZE + 4
}

/// Read the header-declared decoded length of `block` without touching the
/// body, so a destination buffer can be sized before calling `decode`.
pub fn decoded_len(block: &[u8]) -> Result<u64, FormatError> {
    match get_varint(block) {
        Some((len, _)) => Ok(len),
        None => Err(FormatError::TruncatedHeader),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn varint_round_trip_edge_values() {
        for value in [0u64, 1, 127, 128, 255, 16383, 16384, u64::MAX - 1, u64::MAX] {
            let mut buf = Vec::new();
            put_varint(&mut buf, value);
            assert!(buf.len() <= MAX_VARINT_LEN);
            assert_eq!(buf.len(), varint_len(value));
            assert_eq!(get_varint(&buf), Some((value, buf.len())));
        }
    }

    #[test]
    fn varint_unterminated_is_rejected() {
        let mut buf = Vec::new();
        put_varint(&mut buf, u64::MAX);
        for cut in 0..buf.len() {
            assert_eq!(get_varint(&buf[..cut]), None, "prefix of {cut} bytes");
        }
    }

    #[test]
    fn varint_overflow_is_rejected() {
        // 10 continuation-style bytes with a 10th byte carrying more than
        // the single bit that still fits in a u64.
        let buf = [0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x02];
        assert_eq!(get_varint(&buf), None);
    }

    #[test]
    fn varint_ignores_bytes_past_terminator() {
        let buf = [0x05, 0xaa, 0xbb];
        assert_eq!(get_varint(&buf), Some((5, 1)));
    }

    #[test]
    fn decoded_len_reads_header_only() {
        let mut block = Vec::new();
        put_varint(&mut block, 300);
        // No body or trailer needed — the header alone is enough.
        assert_eq!(decoded_len(&block), Ok(300));
        assert_eq!(decoded_len(&[]), Err(FormatError::TruncatedHeader));
        assert_eq!(decoded_len(&[0x80]), Err(FormatError::TruncatedHeader));
    }
}
