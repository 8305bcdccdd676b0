//! Reusable scratch-buffer pool.
//!
//! `acquire` hands out a buffer with exclusive ownership and length zero;
//! dropping the [`PooledBuf`] handle transfers ownership back to the pool.
//! The free list is a bounded lock-free queue, so concurrent acquire and
//! release never hand one buffer to two live owners and never block.
//!
//! Reset-on-acquire truncates but does not erase: the underlying capacity
//! (and its old bytes) is reused for performance. Callers holding sensitive
//! data must overwrite it explicitly before release.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use crossbeam_queue::ArrayQueue;

/// Shared pool of scratch buffers. Cloning the pool clones a handle to the
/// same free list, so one pool can be handed to many workers.
#[derive(Clone)]
pub struct BufferPool {
    free: Arc<ArrayQueue<Vec<u8>>>,
}

impl BufferPool {
    /// Create a pool retaining at most `max_idle` buffers. Releases beyond
    /// that simply free the allocation, so the pool bounds idle memory
    /// without ever making `acquire` block.
    pub fn new(max_idle: usize) -> Self {
        Self {
            free: Arc::new(ArrayQueue::new(max_idle)),
        }
    }

    /// Check out a buffer. Reuses a free one when available, otherwise
    /// allocates fresh. The returned buffer always has length zero.
    pub fn acquire(&self) -> PooledBuf {
        let mut buf = match self.free.pop() {
            Some(buf) => buf,
            None => {
                log::trace!("buffer pool empty, allocating fresh");
                Vec::new()
            }
        };
        buf.clear();
        PooledBuf {
            buf: Some(buf),
            free: Arc::clone(&self.free),
        }
    }

    /// Number of buffers currently sitting in the free list.
    pub fn idle(&self) -> usize {
        self.free.len()
    }
}

/// Exclusively-owned handle to a pooled buffer. Dropping it is the release:
/// the buffer goes back to the pool's free list (or is freed if the list is
/// at capacity).
pub struct PooledBuf {
    buf: Option<Vec<u8>>,
    free: Arc<ArrayQueue<Vec<u8>>>,
}

impl Deref for PooledBuf {
    type Target = Vec<u8>;

    fn deref(&self) -> &Vec<u8> {
        self.buf.as_ref().expect("buffer present until drop")
    }
}

impl DerefMut for PooledBuf {
    fn deref_mut(&mut self) -> &mut Vec<u8> {
        self.buf.as_mut().expect("buffer present until drop")
    }
}

impl Drop for PooledBuf {
    fn drop(&mut self) {
        if let Some(buf) = self.buf.take() {
            let _ = self.free.push(buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_starts_empty_and_reuses_capacity() {
        let pool = BufferPool::new(4);
        let retained = {
            let mut buf = pool.acquire();
            buf.extend_from_slice(b"previous owner's bytes");
            buf.capacity()
        }; // released here

        assert_eq!(pool.idle(), 1);
        let buf = pool.acquire();
        assert_eq!(buf.len(), 0, "reset must hide prior content");
        assert!(buf.capacity() >= retained, "capacity should be reused");
        assert_eq!(pool.idle(), 0);
    }

    #[test]
    fn release_beyond_capacity_drops_the_buffer() {
        let pool = BufferPool::new(1);
        let a = pool.acquire();
        let b = pool.acquire();
        drop(a);
        drop(b); // free list full, simply freed
        assert_eq!(pool.idle(), 1);
    }

    #[test]
    fn clones_share_one_free_list() {
        let pool = BufferPool::new(4);
        let other = pool.clone();
        drop(pool.acquire());
        assert_eq!(other.idle(), 1);
    }

    #[test]
    fn handles_are_independent() {
        let pool = BufferPool::new(4);
        let mut a = pool.acquire();
        let mut b = pool.acquire();
        a.extend_from_slice(b"aaaa");
        b.extend_from_slice(b"bbbb");
        assert_eq!(&a[..], b"aaaa");
        assert_eq!(&b[..], b"bbbb");
    }
}
