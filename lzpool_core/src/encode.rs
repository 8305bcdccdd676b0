//! LZB1 encoder: greedy LZ scan with a hash-chain match finder.
//!
//! The encoder is a total function — any byte sequence encodes, including
//! the empty one — and is deterministic: the same input always produces a
//! byte-identical block.

use xxhash_rust::xxh3::xxh3_64;

use crate::format::{self, MAX_DISTANCE, MIN_MATCH};

/// Hash table size for the match finder (power of two).
const HASH_BITS: u32 = 15;
const HASH_SIZE: usize = 1 << HASH_BITS;

/// Maximum chain links followed per position. Bounds worst-case encode time
/// on pathological inputs at a small ratio cost.
const MAX_CHAIN: usize = 32;

/// Hash insertion cap per match. Positions deep inside a long match will
/// have left the window before they could be useful.
const MAX_INSERT: usize = 128;

/// Hash of the 4 bytes at `pos`. Caller guarantees `pos + 4 <= data.len()`.
#[inline(always)]
fn hash4(data: &[u8], pos: usize) -> usize {
    let word = u32::from_le_bytes([data[pos], data[pos + 1], data[pos + 2], data[pos + 3]]);
    (word.wrapping_mul(0x9e37_79b1) >> (32 - HASH_BITS)) as usize
}

/// Hash-chain match finder: `head[hash]` is the most recent position with
/// that 4-byte hash, `prev[pos % MAX_DISTANCE]` links to the previous one.
struct MatchFinder {
    head: Vec<usize>,
    prev: Vec<usize>,
}

impl MatchFinder {
    fn new() -> Self {
        Self {
            head: vec![usize::MAX; HASH_SIZE],
            prev: vec![usize::MAX; MAX_DISTANCE],
        }
    }

    #[inline(always)]
    fn insert(&mut self, input: &[u8], pos: usize) {
        if pos + MIN_MATCH > input.len() {
            return;
        }
        let h = hash4(input, pos);
        self.prev[pos % MAX_DISTANCE] = self.head[h];
        self.head[h] = pos;
    }

    /// Longest match at `pos` reachable within the window, or `None` if no
    /// candidate reaches `MIN_MATCH`. Matched bytes may overlap `pos`
    /// (distance < length), which the decoder's byte-wise copy handles.
    fn longest_match(&self, input: &[u8], pos: usize) -> Option<(usize, usize)> {
        let min_pos = pos.saturating_sub(MAX_DISTANCE);
        let mut cand = self.head[hash4(input, pos)];
        let mut best_len = 0;
        let mut best_dist = 0;

        let mut links = 0;
        while cand != usize::MAX && cand >= min_pos && cand < pos && links < MAX_CHAIN {
            let len = match_len(input, cand, pos);
            if len > best_len {
                best_len = len;
                best_dist = pos - cand;
            }
            let next = self.prev[cand % MAX_DISTANCE];
            // Chains must strictly decrease; a slot reused by a newer
            // position would otherwise cycle.
            if next >= cand {
                break;
            }
            cand = next;
            links += 1;
        }

        (best_len >= MIN_MATCH).then_some((best_dist, best_len))
    }
}

/// Number of bytes matching between `input[cand..]` and `input[pos..]`,
/// capped at the end of the input. `cand < pos`; the compared ranges may
/// overlap, which yields exactly the bytes a self-referential copy produces.
#[inline]
fn match_len(input: &[u8], cand: usize, pos: usize) -> usize {
    let limit = input.len() - pos;
    let mut n = 0;
    while n < limit && input[cand + n] == input[pos + n] {
        n += 1;
    }
    n
}

/// Emit the pending literal run, if any, as a single literal token.
fn flush_literals(out: &mut Vec<u8>, run: &[u8]) {
    if run.is_empty() {
        return;
    }
    format::put_varint(out, (run.len() as u64) << 1);
    out.extend_from_slice(run);
}

/// Compress `input` into a self-describing LZB1 block.
///
/// The result is at most [`format::max_encoded_len`]`(input.len())` bytes.
pub fn encode(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(format::max_encoded_len(input.len()));
    format::put_varint(&mut out, input.len() as u64);

    if !input.is_empty() {
        let mut finder = MatchFinder::new();
        let mut lit_start = 0;
        let mut pos = 0;

        while pos < input.len() {
            let found = if input.len() - pos >= MIN_MATCH {
                finder.longest_match(input, pos)
            } else {
                None
            };

            match found {
                Some((distance, length)) => {
                    flush_literals(&mut out, &input[lit_start..pos]);
                    format::put_varint(&mut out, ((length as u64) << 1) | 1);
                    format::put_varint(&mut out, distance as u64);

                    for i in 0..length.min(MAX_INSERT) {
                        finder.insert(input, pos + i);
                    }
                    pos += length;
                    lit_start = pos;
                }
                None => {
                    finder.insert(input, pos);
                    pos += 1;
                }
            }
        }
        flush_literals(&mut out, &input[lit_start..]);
    }

    out.extend_from_slice(&xxh3_64(input).to_le_bytes());
    out
}
