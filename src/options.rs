use encoding_rs::{Encoding, UTF_8};
use once_cell::sync::OnceCell;

/// Chunk size used by default instances when no process-wide override is set.
pub const DEFAULT_CHUNK_SIZE: usize = 8192;

/// Largest single growth increment. Growth steps double per growth event up
/// to this cap, which bounds the worst-case size of any one allocation.
pub const MAX_CHUNK_SIZE: usize = 1024 * 1024;

static PROCESS_CHUNK_SIZE: OnceCell<usize> = OnceCell::new();
static PROCESS_CHARSET: OnceCell<&'static Encoding> = OnceCell::new();

/// Overrides the chunk size used by subsequently constructed default
/// instances. May succeed at most once per process; returns `false` if a
/// process-wide chunk size was already set. Existing instances are unaffected.
pub fn set_default_chunk_size(chunk_size: usize) -> bool {
    PROCESS_CHUNK_SIZE.set(chunk_size).is_ok()
}

/// Overrides the charset used by subsequently constructed default instances.
/// May succeed at most once per process; returns `false` if a process-wide
/// charset was already set. Existing instances are unaffected.
pub fn set_default_charset(charset: &'static Encoding) -> bool {
    PROCESS_CHARSET.set(charset).is_ok()
}

/// Configuration for a [`Slurper`](crate::Slurper) instance.
#[derive(Debug, Clone, Copy)]
pub struct SlurpOptions {
    /// Charset used to decode byte sources into text. Malformed or
    /// unmappable sequences are always replaced, never reported as errors.
    pub charset: &'static Encoding,
    /// Initial scratch-buffer size and base growth increment. Minimum 2.
    pub chunk_size: usize,
    /// Estimated characters produced per input byte, used to size the
    /// decode output before the first decoder pass. 1.0 assumes the worst
    /// case of one character per byte.
    pub chars_per_byte: f64,
}

impl Default for SlurpOptions {
    fn default() -> Self {
        Self {
            charset: PROCESS_CHARSET.get().copied().unwrap_or(UTF_8),
            chunk_size: PROCESS_CHUNK_SIZE
                .get()
                .copied()
                .unwrap_or(DEFAULT_CHUNK_SIZE),
            chars_per_byte: 1.0,
        }
    }
}

#[derive(Debug, Default)]
pub struct SlurpBuilder {
    options: SlurpOptions,
}

impl SlurpBuilder {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn charset(mut self, charset: &'static Encoding) -> Self {
        self.options.charset = charset;
        self
    }
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.options.chunk_size = chunk_size;
        self
    }
    pub fn chars_per_byte(mut self, ratio: f64) -> Self {
        self.options.chars_per_byte = ratio;
        self
    }
    pub fn build(self) -> SlurpOptions {
        self.options
    }
}
