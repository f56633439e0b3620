//! Character-producing sources.
//!
//! The standard library has [`std::io::Read`] for byte sources but no
//! counterpart that yields characters, so the char read path defines its own
//! seam here. Anything that iterates over `char` is a source, which covers
//! the common cases (`"...".chars()`, `String::chars`, collected
//! `Vec<char>` via `into_iter`) without adapter types.

use std::io;

/// A source of characters that can be drained into caller-provided slices.
///
/// Mirrors the [`std::io::Read`] contract: a call fills as much of `dst` as
/// the source yields right now and returns the count, with `Ok(0)` on a
/// non-empty `dst` meaning the source is exhausted.
pub trait CharSource {
    /// Reads characters into `dst`, returning how many were written.
    fn read_chars(&mut self, dst: &mut [char]) -> io::Result<usize>;

    /// A cheap lower bound on the characters immediately available, used to
    /// size the first read. Zero when unknown.
    fn ready_hint(&self) -> usize {
        0
    }
}

impl<I: Iterator<Item = char>> CharSource for I {
    fn read_chars(&mut self, dst: &mut [char]) -> io::Result<usize> {
        let mut filled = 0;
        for slot in dst.iter_mut() {
            match self.next() {
                Some(c) => {
                    *slot = c;
                    filled += 1;
                }
                None => break,
            }
        }
        Ok(filled)
    }

    fn ready_hint(&self) -> usize {
        self.size_hint().0
    }
}
