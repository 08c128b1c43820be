//! # readreq
//!
//! Read-range descriptors for a read-through block cache.
//!
//! ## Overview
//!
//! When a caching layer sits between a client and a remote backend store, a
//! client's byte-range read is translated into a block-aligned read against
//! the backend: the cache fetches a superset of what was asked for so the
//! surrounding blocks can be kept. `readreq` provides the descriptor that
//! carries both coordinate systems through such a pipeline:
//!
//! - The **actual range** the client requested, `[actual_read_start,
//!   actual_read_end)`.
//! - The **backend range** actually fetched, `[backend_read_start,
//!   backend_read_end)`, a block-aligned superset of the actual range.
//! - The destination buffer and offset where the actual-range bytes land once
//!   extracted from the backend read, and the backend file size for
//!   end-of-file detection.
//!
//! All ranges are end-exclusive. The descriptor performs no I/O and knows
//! nothing about block sizes or cache blocks; computing the backend bounds and
//! filling the buffer belong to the surrounding pipeline.
//!
//! ## Features
//!
//! - Validated construction via [`ReadRequest::new`] or the field-by-field
//!   [`ReadRequestBuilder`], plus unchecked escape hatches for producers that
//!   own validation
//! - Safe 64-bit length accessors, with explicit fail-fast 32-bit narrowing
//!   for buffer APIs that need it
//! - Explicit copy semantics: independent-buffer clone vs. aliased-buffer
//!   clone, as two distinctly named operations
//! - Structural equality and hashing over scalars plus buffer contents
//!
//! ## Example
//!
//! ```
//! use readreq::{DestBuffer, ReadRequest};
//!
//! // Client asked for [10, 20); alignment produced backend range [0, 128).
//! let req = ReadRequest::new(0, 128, 10, 20, DestBuffer::with_len(64), 0, 1000).unwrap();
//!
//! assert_eq!(req.actual_read_len(), 10);
//! assert_eq!(req.backend_read_len(), 128);
//!
//! // Retry without copying: the clone shares the buffer storage.
//! let retry = req.clone_shared_buffer();
//! assert!(retry.dest_buffer().ptr_eq(req.dest_buffer()));
//!
//! // Splitting: the clone gets its own storage.
//! let split = req.clone_with_new_buffer();
//! assert!(!split.dest_buffer().ptr_eq(req.dest_buffer()));
//! ```

mod buffer;
mod builder;
mod error;
mod request;

pub use buffer::DestBuffer;
pub use builder::ReadRequestBuilder;
pub use error::RequestError;
pub use request::ReadRequest;
