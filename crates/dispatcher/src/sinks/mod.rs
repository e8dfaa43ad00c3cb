//! Sink implementations
//!
//! Contains DocumentStoreSink, BlobStoreSink and LogSink.

mod blob;
mod document;
mod log;

pub use self::blob::{BlobStoreConfig, BlobStoreSink};
pub use self::document::{DocumentStoreConfig, DocumentStoreSink};
pub use self::log::LogSink;
