//! LZB1 decoder: bounds-checked token replay.
//!
//! The decoder never reads past the block, never writes past the caller's
//! destination, and surfaces every malformed-input condition as a typed
//! [`FormatError`]. This holds for arbitrary input bytes, including blocks
//! truncated at any byte boundary.

use xxhash_rust::xxh3::xxh3_64;

use crate::error::FormatError;
use crate::format::{self, TRAILER_SIZE};

/// Decode `block` into the front of `dst`, returning the number of bytes
/// written on success.
///
/// `dst` must hold at least [`format::decoded_len`]`(block)` bytes;
/// otherwise `DestinationTooSmall` is returned and `dst` is untouched.
/// On any error after the capacity check, `dst` contents below the declared
/// length are unspecified but nothing beyond `dst.len()` is ever written.
pub fn decode(block: &[u8], dst: &mut [u8]) -> Result<usize, FormatError> {
    let (declared, header_len) =
        format::get_varint(block).ok_or(FormatError::TruncatedHeader)?;
    if declared > dst.len() as u64 {
        return Err(FormatError::DestinationTooSmall {
            needed: declared,
            capacity: dst.len(),
        });
    }
    let declared = declared as usize;

    let mut rd = header_len;
    let mut wr = 0;

    while wr < declared {
        let (v, n) = format::get_varint(&block[rd..])
            .ok_or(FormatError::TruncatedBody { offset: rd })?;
        rd += n;

        if v & 1 == 0 {
            // Literal run.
            let count = (v >> 1) as usize;
            if count > declared - wr {
                return Err(FormatError::LengthMismatch {
                    declared,
                    written: wr + count,
                });
            }
            if count > block.len() - rd {
                return Err(FormatError::TruncatedBody { offset: rd });
            }
            dst[wr..wr + count].copy_from_slice(&block[rd..rd + count]);
            rd += count;
            wr += count;
        } else {
            // Back-reference.
            let length = (v >> 1) as usize;
            let (distance, n) = format::get_varint(&block[rd..])
                .ok_or(FormatError::TruncatedBody { offset: rd })?;
            rd += n;

            if distance == 0 || distance > wr as u64 {
                return Err(FormatError::InvalidBackReference {
                    distance,
                    written: wr,
                });
            }
            if length > declared - wr {
                return Err(FormatError::LengthMismatch {
                    declared,
                    written: wr + length,
                });
            }
            let distance = distance as usize;
            // Byte-wise copy: the source range may overlap the bytes being
            // written when distance < length.
            for i in 0..length {
                dst[wr + i] = dst[wr + i - distance];
            }
            wr += length;
        }
    }

    let mut trailer = [0u8; TRAILER_SIZE];
    trailer.copy_from_slice(
        block
            .get(rd..rd + TRAILER_SIZE)
            .ok_or(FormatError::TruncatedBody { offset: rd })?,
    );
    let stored = u64::from_le_bytes(trailer);
    rd += TRAILER_SIZE;

    let computed = xxh3_64(&dst[..wr]);
    if stored != computed {
        return Err(FormatError::ChecksumMismatch { stored, computed });
    }
    if rd != block.len() {
        return Err(FormatError::TrailingData(block.len() - rd));
    }

    Ok(wr)
}
