//! Internal scratch-buffer cache.
//!
//! Each [`Slurper`](crate::Slurper) owns one cache. Buffers are allocated
//! lazily, replaced with larger ones when a read outgrows them, and never
//! shrunk, so capacity is monotonically non-decreasing for the life of the
//! instance. Only the first `N` elements reported by a read are valid; the
//! rest of a buffer is stale content from earlier calls and must never reach
//! callers without an exact-size trim.

use serde::{Deserialize, Serialize};

/// A snapshot of one instance's read and allocation counters.
///
/// Resize counts are driven by the sizes of the inputs an instance has seen,
/// not by the order it saw them in, which makes them useful for verifying
/// that scratch buffers are actually being reused across calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    /// Read calls issued against byte sources.
    pub byte_reads: u64,
    /// Read calls issued against character sources.
    pub char_reads: u64,
    /// Times the byte scratch buffer was replaced with a larger one.
    pub byte_resizes: u64,
    /// Times the char scratch buffer was replaced with a larger one.
    pub char_resizes: u64,
    /// Times the decode output buffer grew.
    pub text_resizes: u64,
    /// Current byte scratch capacity.
    pub byte_capacity: usize,
    /// Current char scratch capacity.
    pub char_capacity: usize,
    /// Current decode output capacity, in bytes.
    pub text_capacity: usize,
}

/// One growable scratch buffer plus its counters.
///
/// The buffer is kept fully initialized (`len == capacity`) so accumulators
/// can write into arbitrary offsets through safe slices.
#[derive(Debug, Default)]
pub(crate) struct Scratch<T> {
    buf: Vec<T>,
    pub(crate) reads: u64,
    pub(crate) resizes: u64,
}

impl<T: Copy + Default> Scratch<T> {
    pub(crate) fn capacity(&self) -> usize {
        self.buf.len()
    }

    pub(crate) fn slice_mut(&mut self) -> &mut [T] {
        &mut self.buf
    }

    pub(crate) fn slice(&self) -> &[T] {
        &self.buf
    }

    /// Makes the buffer at least `n` elements, discarding prior content if a
    /// new allocation is needed. Callers that must keep a valid prefix across
    /// a growth use [`grow_preserving`](Self::grow_preserving) instead.
    pub(crate) fn ensure(&mut self, n: usize) {
        if self.buf.len() < n {
            self.buf = vec![T::default(); n];
            self.resizes += 1;
        }
    }

    /// Replaces the buffer with one of exactly `n` elements, carrying over
    /// the first `valid` elements.
    pub(crate) fn grow_preserving(&mut self, n: usize, valid: usize) {
        debug_assert!(n > self.buf.len());
        let mut next = vec![T::default(); n];
        next[..valid].copy_from_slice(&self.buf[..valid]);
        self.buf = next;
        self.resizes += 1;
    }
}

/// Returns an independent copy of the first `valid` elements of `buf`.
pub(crate) fn trim_copy<T: Clone>(buf: &[T], valid: usize) -> Vec<T> {
    buf[..valid].to_vec()
}

/// The scratch buffers owned by one reader instance.
///
/// Rust keeps decoded text (`String`) distinct from character slots
/// (`Vec<char>`), so the cache carries three buffers: bytes for raw sources,
/// chars for character sources, and text for decode output. Each grows
/// independently and monotonically.
#[derive(Debug, Default)]
pub(crate) struct BufferCache {
    pub(crate) bytes: Scratch<u8>,
    pub(crate) chars: Scratch<char>,
    pub(crate) text: String,
    pub(crate) text_resizes: u64,
}

impl BufferCache {
    /// Clears the decode output while keeping its capacity, then makes sure
    /// at least `n` bytes of capacity are available.
    pub(crate) fn reset_text(&mut self, n: usize) {
        self.text.clear();
        if self.text.capacity() < n {
            self.text.reserve_exact(n);
            self.text_resizes += 1;
        }
    }

    /// Grows the decode output to `2 * capacity + 4` bytes. The `+ 4`
    /// guarantees room for at least one more character even when the current
    /// capacity is tiny.
    pub(crate) fn grow_text(&mut self) {
        let target = 2 * self.text.capacity() + 4;
        self.text.reserve_exact(target - self.text.len());
        self.text_resizes += 1;
    }

    pub(crate) fn stats(&self) -> Stats {
        Stats {
            byte_reads: self.bytes.reads,
            char_reads: self.chars.reads,
            byte_resizes: self.bytes.resizes,
            char_resizes: self.chars.resizes,
            text_resizes: self.text_resizes,
            byte_capacity: self.bytes.capacity(),
            char_capacity: self.chars.capacity(),
            text_capacity: self.text.capacity(),
        }
    }
}
