//! Lazy, format-dispatching decompression over sequences of named streams.
//!
//! # Architecture
//!
//! - `format.rs` - Compression formats and extension inference
//! - `decoder.rs` - Decompressor binding table and the wrapped stream types
//! - `entry.rs` - Stream entries and the upstream source trait
//! - `extractor.rs` - The extraction stage itself

pub use decoder::{
    DecodedStream, Decompressed, Decompressor, TarInput, TarStream, ZipStream, decompressor,
};
pub use entry::{EntrySource, IterSource, StreamEntry, exact_len};
pub use error::{Error, Result};
pub use extractor::Extractor;
pub use format::{CompressionFormat, infer_format};

mod decoder;
mod entry;
mod error;
mod extractor;
mod format;
