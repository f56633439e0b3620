//! # Slurpbuf
//!
//! `slurpbuf` reads byte or character streams of unknown length into contiguous
//! in-memory results (bytes, characters, or a decoded string) while reusing
//! internal scratch buffers across calls, so repeated reads avoid repeated heap
//! allocation.
//!
//! A [`Slurper`] owns its scratch buffers exclusively. Buffers grow adaptively
//! (doubling growth steps, capped per allocation), a one-unit peek detects EOF
//! so exactly-sized inputs finish without growing, and decoding uses a
//! streaming charset decoder that substitutes U+FFFD for malformed input
//! instead of failing.
//!
//! # Features
//!
//! - `logging`: Enables debug logging of reads and buffer growth via the
//!   `tracing` crate.
//!
//! # Example
//!
//! ```
//! use slurpbuf::{Slurper, SlurpBuilder};
//! use std::io::Cursor;
//!
//! let options = SlurpBuilder::new()
//!     .chunk_size(4096)
//!     .build();
//! let mut slurper = Slurper::with_options(options);
//!
//! let bytes = slurper.read_bytes(Cursor::new(b"raw data")).unwrap();
//! assert_eq!(bytes, b"raw data");
//!
//! let text = slurper.read_string(Cursor::new("caf\u{e9}".as_bytes())).unwrap();
//! assert_eq!(text, "caf\u{e9}");
//!
//! // Scratch buffers were reused between the two calls.
//! assert!(slurper.stats().byte_resizes >= 1);
//! ```
//!
//! For one-instance-per-thread usage without passing a `Slurper` around, use
//! [`with_local`]:
//!
//! ```
//! use std::io::Cursor;
//!
//! let text = slurpbuf::with_local(|s| s.read_string(Cursor::new(b"hi"))).unwrap();
//! assert_eq!(text, "hi");
//! ```

mod cache;
mod decode;
mod engine;
mod error;
mod options;
mod source;

pub use cache::Stats;
pub use engine::{Slurper, with_local};
pub use error::{MIN_CHUNK_SIZE, SlurpError};
pub use options::{
    DEFAULT_CHUNK_SIZE, MAX_CHUNK_SIZE, SlurpBuilder, SlurpOptions, set_default_charset,
    set_default_chunk_size,
};
pub use source::CharSource;
