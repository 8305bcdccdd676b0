//! Decode-side error taxonomy.
//!
//! Every way a malformed block can fail is a typed, recoverable variant —
//! the decoder never panics on bad input and never writes past the caller's
//! destination. `DestinationTooSmall` is the only variant a caller is
//! expected to recover from in place (resize and retry); the rest mean the
//! block itself is damaged.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("block header truncated mid-varint")]
    TruncatedHeader,

    #[error("block truncated at byte {offset}: token data or trailer missing")]
    TruncatedBody { offset: usize },

    #[error("destination holds {capacity} bytes but the block decodes to {needed}")]
    DestinationTooSmall { needed: u64, capacity: usize },

    #[error("back-reference distance {distance} invalid at output offset {written}")]
    InvalidBackReference { distance: u64, written: usize },

    #[error("token stream writes {written} bytes but the header declares {declared}")]
    LengthMismatch { declared: usize, written: usize },

    #[error("payload checksum mismatch: stored {stored:016x}, computed {computed:016x}")]
    ChecksumMismatch { stored: u64, computed: u64 },

    #[error("{0} trailing bytes after the block trailer")]
    TrailingData(usize),
}
