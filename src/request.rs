//! The read-range descriptor.
//!
//! A [`ReadRequest`] carries two extents over the same backend-file coordinate
//! space:
//!
//! 1. The **actual** range the client originally asked for, which need not be
//!    block aligned.
//! 2. The **backend** range derived from it by aligning to block boundaries,
//!    a superset of the actual range, which is what actually gets fetched
//!    from the backend store.
//!
//! All ends are exclusive: the byte at `*_read_end` is never read. Alongside
//! the two ranges the request carries the destination buffer the actual-range
//! bytes land in, the offset within that buffer, and the backend file size at
//! the time the request was built (used downstream to spot reads past
//! end-of-file).
//!
//! The request is a passive carrier between the alignment stage that builds
//! it and the I/O stage that services it. It performs no I/O and holds no
//! position state of its own.

use crate::buffer::DestBuffer;
use crate::builder::ReadRequestBuilder;
use crate::error::RequestError;

use std::fmt;
use std::hash::{Hash, Hasher};

/// A single logical read, described in both actual and backend coordinates.
///
/// Built once by the alignment collaborator (via [`ReadRequest::new`] or
/// [`ReadRequest::builder`]), then handed read-only through the read pipeline.
/// Two requests are equal iff all scalar fields match and their buffers are
/// element-wise equal; buffer identity does not matter for equality.
///
/// # Example
///
/// ```
/// use readreq::{DestBuffer, ReadRequest};
///
/// let req = ReadRequest::new(0, 128, 10, 20, DestBuffer::with_len(64), 0, 1000).unwrap();
/// assert_eq!(req.actual_read_len(), 10);
/// assert_eq!(req.backend_read_len(), 128);
/// ```
#[derive(Debug, Clone)]
pub struct ReadRequest {
    backend_read_start: i64,
    backend_read_end: i64,
    actual_read_start: i64,
    actual_read_end: i64,
    dest_buffer: DestBuffer,
    dest_buffer_offset: usize,
    backend_file_size: i64,
}

impl ReadRequest {
    /// Build a request, checking the range-nesting, end-of-file, and buffer
    /// capacity invariants.
    ///
    /// # Arguments
    ///
    /// * `backend_read_start` / `backend_read_end` - block-aligned backend
    ///   range, end-exclusive
    /// * `actual_read_start` / `actual_read_end` - originally requested range,
    ///   end-exclusive, nested inside the backend range
    /// * `dest_buffer` - destination storage for the actual-range bytes
    /// * `dest_buffer_offset` - offset into `dest_buffer` where those bytes land
    /// * `backend_file_size` - backend file size when the request was built;
    ///   zero means unknown and skips the end-of-file check
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        backend_read_start: i64,
        backend_read_end: i64,
        actual_read_start: i64,
        actual_read_end: i64,
        dest_buffer: DestBuffer,
        dest_buffer_offset: usize,
        backend_file_size: i64,
    ) -> Result<Self, RequestError> {
        let request = Self::new_unchecked(
            backend_read_start,
            backend_read_end,
            actual_read_start,
            actual_read_end,
            dest_buffer,
            dest_buffer_offset,
            backend_file_size,
        );
        request.validate()?;
        Ok(request)
    }

    /// Build a request storing all fields verbatim, without validation.
    ///
    /// The caller must guarantee the invariants checked by
    /// [`validate`](ReadRequest::validate); a violated invariant does not fail
    /// cleanly downstream, it places the wrong bytes.
    #[allow(clippy::too_many_arguments)]
    pub fn new_unchecked(
        backend_read_start: i64,
        backend_read_end: i64,
        actual_read_start: i64,
        actual_read_end: i64,
        dest_buffer: DestBuffer,
        dest_buffer_offset: usize,
        backend_file_size: i64,
    ) -> Self {
        Self {
            backend_read_start,
            backend_read_end,
            actual_read_start,
            actual_read_end,
            dest_buffer,
            dest_buffer_offset,
            backend_file_size,
        }
    }

    /// Start assembling a request field by field.
    pub fn builder() -> ReadRequestBuilder {
        ReadRequestBuilder::new()
    }

    /// Start of the block-aligned backend range.
    pub fn backend_read_start(&self) -> i64 {
        self.backend_read_start
    }

    /// End of the block-aligned backend range, exclusive.
    pub fn backend_read_end(&self) -> i64 {
        self.backend_read_end
    }

    /// Start of the originally requested range.
    pub fn actual_read_start(&self) -> i64 {
        self.actual_read_start
    }

    /// End of the originally requested range, exclusive.
    pub fn actual_read_end(&self) -> i64 {
        self.actual_read_end
    }

    /// Handle to the destination buffer.
    pub fn dest_buffer(&self) -> &DestBuffer {
        &self.dest_buffer
    }

    /// Offset into the destination buffer where the actual-range bytes land.
    pub fn dest_buffer_offset(&self) -> usize {
        self.dest_buffer_offset
    }

    /// Backend file size at the time the request was built.
    pub fn backend_file_size(&self) -> i64 {
        self.backend_file_size
    }

    /// Length of the actual range in bytes. Non-negative for any validated
    /// request.
    pub fn actual_read_len(&self) -> i64 {
        self.actual_read_end - self.actual_read_start
    }

    /// Length of the backend range in bytes. Non-negative for any validated
    /// request.
    pub fn backend_read_len(&self) -> i64 {
        self.backend_read_end - self.backend_read_start
    }

    /// Actual-range length narrowed to 32 bits, for buffer APIs that are
    /// 32-bit indexed.
    ///
    /// Prefer [`actual_read_len`](ReadRequest::actual_read_len); use this only
    /// at the boundary that genuinely requires a 32-bit length.
    ///
    /// # Panics
    ///
    /// Panics if the length does not fit in an `i32`. A length that large
    /// means the caller broke the precondition, and truncating it would place
    /// wrong bytes, so the narrowing aborts instead of wrapping.
    pub fn actual_read_len_int_unsafe(&self) -> i32 {
        let len = self.actual_read_len();
        match i32::try_from(len) {
            Ok(v) => v,
            Err(_) => panic!("actual read length {len} does not fit in 32 bits"),
        }
    }

    /// Backend-range length narrowed to 32 bits.
    ///
    /// # Panics
    ///
    /// Panics if the length does not fit in an `i32`, same contract as
    /// [`actual_read_len_int_unsafe`](ReadRequest::actual_read_len_int_unsafe).
    pub fn backend_read_len_int_unsafe(&self) -> i32 {
        let len = self.backend_read_len();
        match i32::try_from(len) {
            Ok(v) => v,
            Err(_) => panic!("backend read length {len} does not fit in 32 bits"),
        }
    }

    /// Clone the request with freshly allocated buffer storage.
    ///
    /// The clone compares equal to the original, but mutating its buffer never
    /// affects the original's bytes. Use when a split or retried request must
    /// stay isolated.
    ///
    /// `dest_buffer_offset` is carried over unchanged; the caller is
    /// responsible for the offset still making sense against the copy if it
    /// later repacks the buffer layout.
    pub fn clone_with_new_buffer(&self) -> Self {
        Self {
            dest_buffer: self.dest_buffer.deep_copy(),
            ..self.clone()
        }
    }

    /// Clone the request as an aliased view over the same buffer storage.
    ///
    /// Writes through either request's buffer are visible through the other.
    /// Safe only when the two holders operate on disjoint sub-ranges or one is
    /// strictly read-only; the surrounding pipeline must arrange that.
    pub fn clone_shared_buffer(&self) -> Self {
        self.clone()
    }

    /// Check the invariants a well-formed request satisfies:
    ///
    /// * non-negative starts;
    /// * `backend_read_start <= actual_read_start <= actual_read_end
    ///   <= backend_read_end`;
    /// * `backend_read_end <= backend_file_size` when the file size is known
    ///   (non-zero);
    /// * `dest_buffer_offset + actual_read_len()` within the buffer.
    ///
    /// Run by [`new`](ReadRequest::new) and the builder; also usable on its
    /// own by tests and defensive consumers of unchecked requests.
    pub fn validate(&self) -> Result<(), RequestError> {
        let result = self.check_invariants();
        if let Err(err) = &result {
            log::debug!("rejecting read request: {err}");
        }
        result
    }

    fn check_invariants(&self) -> Result<(), RequestError> {
        if self.backend_read_start < 0 {
            return Err(RequestError::NegativeOffset {
                offset: self.backend_read_start,
            });
        }

        let nested = self.backend_read_start <= self.actual_read_start
            && self.actual_read_start <= self.actual_read_end
            && self.actual_read_end <= self.backend_read_end;
        if !nested {
            return Err(RequestError::UnorderedBounds {
                backend_read_start: self.backend_read_start,
                backend_read_end: self.backend_read_end,
                actual_read_start: self.actual_read_start,
                actual_read_end: self.actual_read_end,
            });
        }

        // Zero file size means the backend range was computed without a known
        // size, so there is nothing to check it against.
        if self.backend_file_size > 0 && self.backend_read_end > self.backend_file_size {
            return Err(RequestError::RangeBeyondEof {
                backend_read_end: self.backend_read_end,
                backend_file_size: self.backend_file_size,
            });
        }

        // Widen before adding so a huge actual range cannot overflow the check.
        let needed = self.dest_buffer_offset as u128 + self.actual_read_len() as u128;
        if needed > self.dest_buffer.len() as u128 {
            return Err(RequestError::BufferTooSmall {
                dest_buffer_offset: self.dest_buffer_offset,
                actual_read_len: self.actual_read_len(),
                dest_buffer_len: self.dest_buffer.len(),
            });
        }

        Ok(())
    }
}

impl PartialEq for ReadRequest {
    fn eq(&self, other: &Self) -> bool {
        self.backend_read_start == other.backend_read_start
            && self.backend_read_end == other.backend_read_end
            && self.actual_read_start == other.actual_read_start
            && self.actual_read_end == other.actual_read_end
            && self.dest_buffer_offset == other.dest_buffer_offset
            && self.backend_file_size == other.backend_file_size
            && self.dest_buffer == other.dest_buffer
    }
}

impl Eq for ReadRequest {}

impl Hash for ReadRequest {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.backend_read_start.hash(state);
        self.backend_read_end.hash(state);
        self.actual_read_start.hash(state);
        self.actual_read_end.hash(state);
        self.dest_buffer_offset.hash(state);
        self.backend_file_size.hash(state);
        self.dest_buffer.hash(state);
    }
}

impl fmt::Display for ReadRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ReadRequest {{ backend_read_start: {}, backend_read_end: {}, \
             actual_read_start: {}, actual_read_end: {}, dest_buffer_len: {}, \
             dest_buffer_offset: {}, backend_file_size: {} }}",
            self.backend_read_start,
            self.backend_read_end,
            self.actual_read_start,
            self.actual_read_end,
            self.dest_buffer.len(),
            self.dest_buffer_offset,
            self.backend_file_size,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn sample_request() -> ReadRequest {
        ReadRequest::new(0, 128, 10, 20, DestBuffer::with_len(64), 0, 1000).unwrap()
    }

    fn hash_of(req: &ReadRequest) -> u64 {
        let mut hasher = DefaultHasher::new();
        req.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_derived_lengths() {
        let req = sample_request();
        assert_eq!(req.actual_read_len(), 10);
        assert_eq!(req.backend_read_len(), 128);
        assert_eq!(req.actual_read_len_int_unsafe(), 10);
        assert_eq!(req.backend_read_len_int_unsafe(), 128);
    }

    #[test]
    fn test_empty_actual_range() {
        let req = ReadRequest::new(0, 128, 64, 64, DestBuffer::with_len(64), 0, 1000).unwrap();
        assert_eq!(req.actual_read_len(), 0);
        assert_eq!(req.actual_read_len_int_unsafe(), 0);
    }

    #[test]
    #[should_panic(expected = "does not fit in 32 bits")]
    fn test_actual_len_overflow_panics() {
        let req = ReadRequest::new_unchecked(
            0,
            1 << 40,
            0,
            1 << 40,
            DestBuffer::with_len(0),
            0,
            1 << 41,
        );
        req.actual_read_len_int_unsafe();
    }

    #[test]
    #[should_panic(expected = "does not fit in 32 bits")]
    fn test_backend_len_overflow_panics() {
        let req =
            ReadRequest::new_unchecked(0, i64::MAX, 0, 0, DestBuffer::with_len(0), 0, i64::MAX);
        req.backend_read_len_int_unsafe();
    }

    #[test]
    fn test_clone_with_new_buffer_is_isolated() {
        let req = sample_request();
        let clone = req.clone_with_new_buffer();
        assert_eq!(req, clone);
        assert!(!req.dest_buffer().ptr_eq(clone.dest_buffer()));

        clone.dest_buffer().write()[0] = 0xFF;
        assert_eq!(req.dest_buffer().read()[0], 0);
        assert_ne!(req, clone);
    }

    #[test]
    fn test_clone_shared_buffer_aliases() {
        let req = sample_request();
        let clone = req.clone_shared_buffer();
        assert_eq!(req, clone);
        assert!(req.dest_buffer().ptr_eq(clone.dest_buffer()));

        clone.dest_buffer().write()[0] = 0xFF;
        assert_eq!(req.dest_buffer().read()[0], 0xFF);
        assert_eq!(req, clone);
    }

    #[test]
    fn test_equality_ignores_buffer_identity() {
        let a = sample_request();
        let b = sample_request();
        assert!(!a.dest_buffer().ptr_eq(b.dest_buffer()));
        assert_eq!(a, a);
        assert_eq!(a, b);
        assert_eq!(b, a);

        let c = sample_request();
        assert_eq!(b, c);
        assert_eq!(a, c);
    }

    #[test]
    fn test_inequality_on_buffer_content() {
        let a = sample_request();
        let b = sample_request();
        b.dest_buffer().write()[5] = 1;
        assert_ne!(a, b);
    }

    #[test]
    fn test_inequality_on_scalars() {
        let a = sample_request();
        let b = ReadRequest::new(0, 128, 10, 21, DestBuffer::with_len(64), 0, 1000).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_equal_requests_hash_identically() {
        let a = sample_request();
        let b = sample_request();
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));

        let shared = a.clone_shared_buffer();
        assert_eq!(hash_of(&a), hash_of(&shared));
    }

    #[test]
    fn test_validate_rejects_unordered_bounds() {
        let req = ReadRequest::new_unchecked(10, 128, 5, 20, DestBuffer::with_len(64), 0, 1000);
        assert!(matches!(
            req.validate(),
            Err(RequestError::UnorderedBounds { .. })
        ));

        let req = ReadRequest::new_unchecked(0, 128, 20, 10, DestBuffer::with_len(64), 0, 1000);
        assert!(matches!(
            req.validate(),
            Err(RequestError::UnorderedBounds { .. })
        ));

        let req = ReadRequest::new_unchecked(0, 128, 10, 200, DestBuffer::with_len(64), 0, 1000);
        assert!(matches!(
            req.validate(),
            Err(RequestError::UnorderedBounds { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_negative_start() {
        let req = ReadRequest::new_unchecked(-1, 128, 10, 20, DestBuffer::with_len(64), 0, 1000);
        assert!(matches!(
            req.validate(),
            Err(RequestError::NegativeOffset { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_read_past_eof() {
        let req = ReadRequest::new_unchecked(0, 2048, 10, 20, DestBuffer::with_len(64), 0, 1000);
        assert!(matches!(
            req.validate(),
            Err(RequestError::RangeBeyondEof { .. })
        ));
    }

    #[test]
    fn test_validate_skips_eof_check_without_file_size() {
        let req = ReadRequest::new_unchecked(0, 2048, 10, 20, DestBuffer::with_len(64), 0, 0);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_undersized_buffer() {
        let req = ReadRequest::new_unchecked(0, 128, 10, 20, DestBuffer::with_len(8), 0, 1000);
        assert!(matches!(
            req.validate(),
            Err(RequestError::BufferTooSmall { .. })
        ));

        // Fits without the offset, not with it.
        let req = ReadRequest::new_unchecked(0, 128, 10, 20, DestBuffer::with_len(12), 8, 1000);
        assert!(matches!(
            req.validate(),
            Err(RequestError::BufferTooSmall { .. })
        ));
    }

    #[test]
    fn test_buffer_check_survives_huge_offsets() {
        let req = ReadRequest::new_unchecked(
            0,
            i64::MAX,
            0,
            i64::MAX,
            DestBuffer::with_len(64),
            usize::MAX,
            0,
        );
        assert!(matches!(
            req.validate(),
            Err(RequestError::BufferTooSmall { .. })
        ));
    }

    #[test]
    fn test_display_surfaces_every_field() {
        let text = sample_request().to_string();
        assert!(text.contains("backend_read_start: 0"));
        assert!(text.contains("backend_read_end: 128"));
        assert!(text.contains("actual_read_start: 10"));
        assert!(text.contains("actual_read_end: 20"));
        assert!(text.contains("dest_buffer_len: 64"));
        assert!(text.contains("dest_buffer_offset: 0"));
        assert!(text.contains("backend_file_size: 1000"));
    }
}
