//! Field-by-field assembly of read requests.

use crate::buffer::DestBuffer;
use crate::error::RequestError;
use crate::request::ReadRequest;

/// Builder for [`ReadRequest`].
///
/// This is the producer-side path for the alignment collaborator that
/// assembles a request incrementally: backend bounds once the block alignment
/// is computed, actual bounds from the client call, then the buffer binding.
/// Every field starts at its zero or empty equivalent.
///
/// [`build`](ReadRequestBuilder::build) checks the same invariants as
/// [`ReadRequest::new`]; the built value is read-only from then on.
///
/// # Example
///
/// ```
/// use readreq::{DestBuffer, ReadRequest};
///
/// let req = ReadRequest::builder()
///     .with_backend_read_bounds(0, 128)
///     .with_actual_read_bounds(10, 20)
///     .with_dest_buffer(DestBuffer::with_len(64))
///     .with_backend_file_size(1000)
///     .build()
///     .unwrap();
/// assert_eq!(req.actual_read_len(), 10);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReadRequestBuilder {
    backend_read_start: i64,
    backend_read_end: i64,
    actual_read_start: i64,
    actual_read_end: i64,
    dest_buffer: Option<DestBuffer>,
    dest_buffer_offset: usize,
    backend_file_size: i64,
}

impl ReadRequestBuilder {
    /// Create a builder with all fields at their zero/empty defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the block-aligned backend range, end-exclusive.
    pub fn with_backend_read_bounds(mut self, start: i64, end: i64) -> Self {
        self.backend_read_start = start;
        self.backend_read_end = end;
        self
    }

    /// Set the originally requested range, end-exclusive.
    pub fn with_actual_read_bounds(mut self, start: i64, end: i64) -> Self {
        self.actual_read_start = start;
        self.actual_read_end = end;
        self
    }

    /// Attach the destination buffer.
    pub fn with_dest_buffer(mut self, buffer: DestBuffer) -> Self {
        self.dest_buffer = Some(buffer);
        self
    }

    /// Set the offset into the destination buffer where the actual-range
    /// bytes land.
    pub fn with_dest_buffer_offset(mut self, offset: usize) -> Self {
        self.dest_buffer_offset = offset;
        self
    }

    /// Set the backend file size; zero means unknown.
    pub fn with_backend_file_size(mut self, size: i64) -> Self {
        self.backend_file_size = size;
        self
    }

    /// Finish the builder, validating the assembled request.
    ///
    /// Fails with [`RequestError::MissingBuffer`] if no destination buffer was
    /// attached, otherwise with whatever invariant
    /// [`ReadRequest::validate`] rejects.
    pub fn build(self) -> Result<ReadRequest, RequestError> {
        let dest_buffer = self.dest_buffer.ok_or(RequestError::MissingBuffer)?;
        ReadRequest::new(
            self.backend_read_start,
            self.backend_read_end,
            self.actual_read_start,
            self.actual_read_end,
            dest_buffer,
            self.dest_buffer_offset,
            self.backend_file_size,
        )
    }

    /// Finish the builder without validation, for producers that validated
    /// the fields themselves. A missing buffer becomes an empty one.
    pub fn build_unchecked(self) -> ReadRequest {
        ReadRequest::new_unchecked(
            self.backend_read_start,
            self.backend_read_end,
            self.actual_read_start,
            self.actual_read_end,
            self.dest_buffer.unwrap_or_else(|| DestBuffer::with_len(0)),
            self.dest_buffer_offset,
            self.backend_file_size,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_round_trip() {
        let built = ReadRequestBuilder::new()
            .with_backend_read_bounds(0, 128)
            .with_actual_read_bounds(10, 20)
            .with_dest_buffer(DestBuffer::with_len(64))
            .with_dest_buffer_offset(4)
            .with_backend_file_size(1000)
            .build()
            .unwrap();

        let direct =
            ReadRequest::new(0, 128, 10, 20, DestBuffer::with_len(64), 4, 1000).unwrap();
        assert_eq!(built, direct);
    }

    #[test]
    fn test_builder_requires_buffer() {
        let result = ReadRequestBuilder::new()
            .with_backend_read_bounds(0, 128)
            .with_actual_read_bounds(10, 20)
            .build();
        assert!(matches!(result, Err(RequestError::MissingBuffer)));
    }

    #[test]
    fn test_builder_validates() {
        let result = ReadRequestBuilder::new()
            .with_backend_read_bounds(0, 128)
            .with_actual_read_bounds(20, 10)
            .with_dest_buffer(DestBuffer::with_len(64))
            .build();
        assert!(matches!(result, Err(RequestError::UnorderedBounds { .. })));
    }

    #[test]
    fn test_build_unchecked_stores_verbatim() {
        let req = ReadRequestBuilder::new()
            .with_backend_read_bounds(0, 128)
            .with_actual_read_bounds(20, 10)
            .build_unchecked();
        assert_eq!(req.actual_read_len(), -10);
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_defaults_are_zero_equivalent() {
        let req = ReadRequestBuilder::new().build_unchecked();
        assert_eq!(req.backend_read_len(), 0);
        assert_eq!(req.actual_read_len(), 0);
        assert_eq!(req.dest_buffer_offset(), 0);
        assert_eq!(req.backend_file_size(), 0);
        assert!(req.dest_buffer().is_empty());
    }
}
