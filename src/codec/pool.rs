//! Bounded pool of scratch buffers for encoding.
//!
//! Buffers are checked out, filled, copied out and cleared before they go
//! back, so no two encoders ever share a buffer and no returned buffer holds
//! stale bytes. The pool never blocks: an empty pool hands out a fresh buffer,
//! a full one drops the returned buffer.

use std::ops::{Deref, DerefMut};
use std::sync::LazyLock;

use bytes::BytesMut;
use crossbeam_queue::ArrayQueue;

use crate::macros::log_event;

/// Sizing of a [`BufferPool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    /// Idle buffers kept at most.
    pub capacity: usize,
    /// Capacity of freshly allocated buffers.
    pub initial_buffer_size: usize,
    /// Buffers that grew beyond this are released instead of retained.
    pub max_retained_size: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            capacity: 32,
            initial_buffer_size: 128,
            max_retained_size: 64 * 1024,
        }
    }
}

/// Lock-free pool of [`BytesMut`] buffers.
///
/// # Examples
///
/// ```
/// use errx::{BufferPool, Error, PoolConfig};
///
/// let pool = BufferPool::new(PoolConfig::default());
/// let bytes = Error::new("x").encode_with(&pool);
/// assert_eq!(Error::decode(&bytes).unwrap().text(), "x");
/// assert_eq!(pool.idle(), 1);
/// ```
pub struct BufferPool {
    queue: ArrayQueue<BytesMut>,
    config: PoolConfig,
}

static GLOBAL: LazyLock<BufferPool> = LazyLock::new(|| BufferPool::new(PoolConfig::default()));

impl BufferPool {
    /// Creates an empty pool. A zero capacity is raised to one.
    pub fn new(config: PoolConfig) -> Self {
        Self {
            queue: ArrayQueue::new(config.capacity.max(1)),
            config,
        }
    }

    /// The process-wide pool used by [`Error::encode`](crate::Error::encode).
    pub fn global() -> &'static BufferPool {
        &GLOBAL
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Number of buffers currently waiting for reuse.
    pub fn idle(&self) -> usize {
        self.queue.len()
    }

    /// Takes an idle buffer, or allocates one when none is idle.
    pub fn checkout(&self) -> PooledBuffer<'_> {
        let buf = self
            .queue
            .pop()
            .unwrap_or_else(|| BytesMut::with_capacity(self.config.initial_buffer_size));
        PooledBuffer { buf, pool: self }
    }

    fn give_back(&self, mut buf: BytesMut) {
        if buf.capacity() > self.config.max_retained_size {
            log_event!(trace, capacity = buf.capacity(), "oversized encode buffer released");
            return;
        }
        buf.clear();
        if self.queue.push(buf).is_err() {
            log_event!(trace, "buffer pool full, encode buffer released");
        }
    }
}

impl core::fmt::Debug for BufferPool {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BufferPool")
            .field("idle", &self.idle())
            .field("config", &self.config)
            .finish()
    }
}

/// Buffer on loan from a [`BufferPool`]; cleared and returned on drop.
pub struct PooledBuffer<'a> {
    buf: BytesMut,
    pool: &'a BufferPool,
}

impl PooledBuffer<'_> {
    /// Copies the written bytes out. The buffer itself stays with the guard.
    pub fn to_vec(&self) -> Vec<u8> {
        self.buf.to_vec()
    }
}

impl Deref for PooledBuffer<'_> {
    type Target = BytesMut;

    fn deref(&self) -> &BytesMut {
        &self.buf
    }
}

impl DerefMut for PooledBuffer<'_> {
    fn deref_mut(&mut self) -> &mut BytesMut {
        &mut self.buf
    }
}

impl Drop for PooledBuffer<'_> {
    fn drop(&mut self) {
        self.pool.give_back(core::mem::take(&mut self.buf));
    }
}
