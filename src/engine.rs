use crate::cache::{BufferCache, Scratch, Stats, trim_copy};
use crate::decode::decode_into_text;
use crate::error::{MIN_CHUNK_SIZE, SlurpError};
use crate::options::{MAX_CHUNK_SIZE, SlurpOptions};
use crate::source::CharSource;
use std::cell::RefCell;
use std::fs::File;
use std::io::Read;
use std::path::Path;
#[cfg(feature = "logging")]
use tracing;

/// Unifies byte and character sources so both accumulators share one
/// implementation of the growth loop.
trait FillSource {
    type Unit: Copy + Default;
    fn fill(&mut self, dst: &mut [Self::Unit]) -> std::io::Result<usize>;
    fn hint(&self) -> usize {
        0
    }
}

struct ByteUnits<R>(R);

impl<R: Read> FillSource for ByteUnits<R> {
    type Unit = u8;
    fn fill(&mut self, dst: &mut [u8]) -> std::io::Result<usize> {
        self.0.read(dst)
    }
}

struct CharUnits<S>(S);

impl<S: CharSource> FillSource for CharUnits<S> {
    type Unit = char;
    fn fill(&mut self, dst: &mut [char]) -> std::io::Result<usize> {
        self.0.read_chars(dst)
    }
    fn hint(&self) -> usize {
        self.0.ready_hint()
    }
}

/// Occupancy above ~80% of capacity triggers a growth before the next read.
fn wants_growth(occupied: usize, capacity: usize) -> bool {
    occupied * 5 > capacity * 4
}

/// Growth steps double per growth event, capped so no single allocation
/// increment exceeds [`MAX_CHUNK_SIZE`].
fn next_step(step: usize) -> usize {
    if step >= MAX_CHUNK_SIZE { step } else { step * 2 }
}

/// Reads `src` to exhaustion into `scratch`, returning the count of valid
/// units now resident there. The scratch is left untrimmed.
///
/// After the initial bulk read, a single-unit read probes for EOF: an
/// exactly-sized source finishes here with zero growth, which is the common
/// case when the caller knows the input size. Otherwise the loop bulk-reads
/// into the remaining capacity, growing whenever occupancy passes the
/// threshold so every read has room to make progress.
fn accumulate<S: FillSource>(
    scratch: &mut Scratch<S::Unit>,
    src: &mut S,
    chunk_size: usize,
) -> Result<usize, SlurpError> {
    if chunk_size < MIN_CHUNK_SIZE {
        return Err(SlurpError::ChunkSize(chunk_size));
    }

    let probe = chunk_size.max(src.hint());
    scratch.ensure(probe);

    let mut total = src.fill(scratch.slice_mut())?;
    scratch.reads += 1;

    // Peek one unit to detect EOF without committing to a full next chunk.
    let mut one = [<S::Unit>::default(); 1];
    if src.fill(&mut one)? == 0 {
        return Ok(total);
    }
    scratch.reads += 1;

    let mut step = chunk_size;
    if wants_growth(total + 1, scratch.capacity()) {
        let target = (scratch.capacity() + step).max(total + 1);
        scratch.grow_preserving(target, total);
        step = next_step(step);
    }
    scratch.slice_mut()[total] = one[0];
    total += 1;

    loop {
        if wants_growth(total, scratch.capacity()) {
            #[cfg(feature = "logging")]
            tracing::debug!(
                "scratch {}/{} full, growing by {}",
                total,
                scratch.capacity(),
                step
            );
            scratch.grow_preserving(scratch.capacity() + step, total);
            step = next_step(step);
        }
        let read = src.fill(&mut scratch.slice_mut()[total..])?;
        if read == 0 {
            break;
        }
        scratch.reads += 1;
        total += read;
    }

    Ok(total)
}

/// A reusable stream-to-memory reader.
///
/// A `Slurper` owns growable scratch buffers that persist across calls, so
/// repeated reads of similarly sized inputs settle into zero allocations per
/// call. The first reads on a fresh instance pay for cache growth; see
/// [`Stats`] for the counters that make this observable.
///
/// Instances are exclusively owned: scratch buffers and counters are plain
/// mutable state, so share a `Slurper` between threads only by giving each
/// thread its own (the [`with_local`] accessor does exactly that). Sources
/// passed to read methods are never closed; the caller keeps ownership.
#[derive(Debug, Default)]
pub struct Slurper {
    options: SlurpOptions,
    cache: BufferCache,
}

impl Slurper {
    /// Creates an instance using the process-wide defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an instance with explicit options.
    pub fn with_options(options: SlurpOptions) -> Self {
        Self {
            options,
            cache: BufferCache::default(),
        }
    }

    pub fn options(&self) -> &SlurpOptions {
        &self.options
    }

    /// A snapshot of this instance's read and allocation counters.
    pub fn stats(&self) -> Stats {
        self.cache.stats()
    }

    /// Reads a byte source to exhaustion and returns its exact contents.
    pub fn read_bytes<R: Read>(&mut self, src: R) -> Result<Vec<u8>, SlurpError> {
        self.read_bytes_with(src, self.options.chunk_size)
    }

    /// [`read_bytes`](Self::read_bytes) with a chunk-size override.
    pub fn read_bytes_with<R: Read>(
        &mut self,
        src: R,
        chunk_size: usize,
    ) -> Result<Vec<u8>, SlurpError> {
        let total = accumulate(&mut self.cache.bytes, &mut ByteUnits(src), chunk_size)?;
        Ok(trim_copy(self.cache.bytes.slice(), total))
    }

    /// Reads a character source to exhaustion and returns its exact contents.
    pub fn read_chars<S: CharSource>(&mut self, src: S) -> Result<Vec<char>, SlurpError> {
        self.read_chars_with(src, self.options.chunk_size)
    }

    /// [`read_chars`](Self::read_chars) with a chunk-size override.
    pub fn read_chars_with<S: CharSource>(
        &mut self,
        src: S,
        chunk_size: usize,
    ) -> Result<Vec<char>, SlurpError> {
        let total = accumulate(&mut self.cache.chars, &mut CharUnits(src), chunk_size)?;
        Ok(trim_copy(self.cache.chars.slice(), total))
    }

    /// Reads a character source to exhaustion and returns its contents as a
    /// string.
    pub fn read_chars_string<S: CharSource>(&mut self, src: S) -> Result<String, SlurpError> {
        let total = accumulate(
            &mut self.cache.chars,
            &mut CharUnits(src),
            self.options.chunk_size,
        )?;
        Ok(self.cache.chars.slice()[..total].iter().collect())
    }

    /// Reads a byte source to exhaustion and decodes it with the configured
    /// charset, returning the decoded characters.
    pub fn decode_chars<R: Read>(&mut self, src: R) -> Result<Vec<char>, SlurpError> {
        self.decode_chars_with(src, self.options.chunk_size)
    }

    /// [`decode_chars`](Self::decode_chars) with a chunk-size override.
    pub fn decode_chars_with<R: Read>(
        &mut self,
        src: R,
        chunk_size: usize,
    ) -> Result<Vec<char>, SlurpError> {
        self.decode_with(src, chunk_size)?;
        Ok(self.cache.text.chars().collect())
    }

    /// Reads a byte source to exhaustion and decodes it with the configured
    /// charset, returning the result as a string. A leading UTF-8 byte-order
    /// mark is stripped, and malformed input is replaced with U+FFFD rather
    /// than reported as an error.
    pub fn read_string<R: Read>(&mut self, src: R) -> Result<String, SlurpError> {
        self.read_string_with(src, self.options.chunk_size)
    }

    /// [`read_string`](Self::read_string) with a chunk-size override.
    pub fn read_string_with<R: Read>(
        &mut self,
        src: R,
        chunk_size: usize,
    ) -> Result<String, SlurpError> {
        self.decode_with(src, chunk_size)?;
        Ok(self.cache.text.as_str().to_owned())
    }

    /// Reads and decodes a byte source, appending the result to `dst`.
    /// Returns the number of bytes appended.
    pub fn read_into<R: Read>(&mut self, src: R, dst: &mut String) -> Result<usize, SlurpError> {
        self.read_into_with(src, dst, self.options.chunk_size)
    }

    /// [`read_into`](Self::read_into) with a chunk-size override.
    pub fn read_into_with<R: Read>(
        &mut self,
        src: R,
        dst: &mut String,
        chunk_size: usize,
    ) -> Result<usize, SlurpError> {
        self.decode_with(src, chunk_size)?;
        dst.push_str(&self.cache.text);
        Ok(self.cache.text.len())
    }

    /// Reads a byte source, appending its raw contents to `dst`. Returns the
    /// number of bytes appended.
    pub fn read_into_vec<R: Read>(
        &mut self,
        src: R,
        dst: &mut Vec<u8>,
    ) -> Result<usize, SlurpError> {
        self.read_into_vec_with(src, dst, self.options.chunk_size)
    }

    /// [`read_into_vec`](Self::read_into_vec) with a chunk-size override.
    pub fn read_into_vec_with<R: Read>(
        &mut self,
        src: R,
        dst: &mut Vec<u8>,
        chunk_size: usize,
    ) -> Result<usize, SlurpError> {
        let total = accumulate(&mut self.cache.bytes, &mut ByteUnits(src), chunk_size)?;
        dst.extend_from_slice(&self.cache.bytes.slice()[..total]);
        Ok(total)
    }

    /// Reads a character source, appending its contents to `dst`. Returns
    /// the number of characters appended.
    pub fn read_chars_into<S: CharSource>(
        &mut self,
        src: S,
        dst: &mut Vec<char>,
    ) -> Result<usize, SlurpError> {
        let total = accumulate(
            &mut self.cache.chars,
            &mut CharUnits(src),
            self.options.chunk_size,
        )?;
        dst.extend_from_slice(&self.cache.chars.slice()[..total]);
        Ok(total)
    }

    /// Reads a file's raw contents. The file handle is opened and dropped
    /// within the call; errors carry the path.
    pub fn read_file_bytes(&mut self, path: impl AsRef<Path>) -> Result<Vec<u8>, SlurpError> {
        let path = path.as_ref();
        #[cfg(feature = "logging")]
        tracing::debug!("reading file {}", path.display());
        let file = File::open(path).map_err(|e| SlurpError::file(path, e))?;
        attach_path(path, self.read_bytes(file))
    }

    /// Reads and decodes a file's contents as characters.
    pub fn read_file_chars(&mut self, path: impl AsRef<Path>) -> Result<Vec<char>, SlurpError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| SlurpError::file(path, e))?;
        attach_path(path, self.decode_chars(file))
    }

    /// Reads and decodes a file's contents as a string.
    pub fn read_file_string(&mut self, path: impl AsRef<Path>) -> Result<String, SlurpError> {
        let path = path.as_ref();
        #[cfg(feature = "logging")]
        tracing::debug!("reading file {}", path.display());
        let file = File::open(path).map_err(|e| SlurpError::file(path, e))?;
        attach_path(path, self.read_string(file))
    }

    /// Byte accumulation followed by the decode pass, leaving the decoded
    /// text in the text scratch.
    fn decode_with<R: Read>(&mut self, src: R, chunk_size: usize) -> Result<usize, SlurpError> {
        let total = accumulate(&mut self.cache.bytes, &mut ByteUnits(src), chunk_size)?;
        Ok(decode_into_text(
            &mut self.cache,
            self.options.charset,
            self.options.chars_per_byte,
            chunk_size,
            total,
        ))
    }
}

thread_local! {
    static LOCAL: RefCell<Slurper> = RefCell::new(Slurper::new());
}

/// Runs `f` with this thread's shared [`Slurper`].
///
/// The per-thread instance is constructed with the process-wide defaults the
/// first time a thread uses it, and keeps its scratch buffers for the life
/// of the thread. This is the recommended pattern for using one instance per
/// thread without threading it through call sites.
pub fn with_local<T>(f: impl FnOnce(&mut Slurper) -> T) -> T {
    LOCAL.with(|cell| f(&mut cell.borrow_mut()))
}

fn attach_path<T>(path: &Path, result: Result<T, SlurpError>) -> Result<T, SlurpError> {
    result.map_err(|e| match e {
        SlurpError::Io(source) => SlurpError::file(path, source),
        other => other,
    })
}
