//! Validation errors for read-range descriptors.

use thiserror::Error;

/// Reasons a read-range descriptor can be rejected by validation.
///
/// These cover the nesting and capacity invariants the alignment collaborator
/// is responsible for. A violated invariant that slips through validation does
/// not fail cleanly downstream; it silently places the wrong bytes, so
/// defensive consumers may re-run [`validate`](crate::ReadRequest::validate)
/// before acting on a request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// The actual range does not nest inside the backend range, or a range is
    /// inverted. Requires
    /// `backend_read_start <= actual_read_start <= actual_read_end <= backend_read_end`.
    #[error(
        "unordered read bounds: backend [{backend_read_start}, {backend_read_end}), \
         actual [{actual_read_start}, {actual_read_end})"
    )]
    UnorderedBounds {
        backend_read_start: i64,
        backend_read_end: i64,
        actual_read_start: i64,
        actual_read_end: i64,
    },

    /// A range start is negative.
    #[error("negative read offset: {offset}")]
    NegativeOffset { offset: i64 },

    /// The backend range extends past the known backend file size.
    #[error("backend read end {backend_read_end} exceeds backend file size {backend_file_size}")]
    RangeBeyondEof {
        backend_read_end: i64,
        backend_file_size: i64,
    },

    /// The destination buffer cannot hold the actual range at the given offset.
    #[error(
        "destination buffer too small: offset {dest_buffer_offset} + actual length \
         {actual_read_len} exceeds buffer length {dest_buffer_len}"
    )]
    BufferTooSmall {
        dest_buffer_offset: usize,
        actual_read_len: i64,
        dest_buffer_len: usize,
    },

    /// The builder was finished without a destination buffer.
    #[error("no destination buffer supplied")]
    MissingBuffer,
}
