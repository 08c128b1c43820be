//! Shared destination buffer handle.
//!
//! A [`DestBuffer`] is the caller-owned byte storage that ultimately receives
//! the actual-range bytes extracted from a backend read. The storage is shared,
//! not exclusively owned: several requests may point at the same bytes (for
//! example when one physical buffer is split among the logical requests of a
//! batched read), so the handle wraps the storage in `Arc<RwLock<..>>` and
//! cloning the handle aliases the same storage.
//!
//! Use [`DestBuffer::deep_copy`] when independent storage is required.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Handle to a shared destination byte buffer.
///
/// Equality and hashing are content-based: two handles over distinct storage
/// with identical bytes compare equal. Use [`DestBuffer::ptr_eq`] to ask
/// whether two handles alias the same storage.
///
/// The lock exists to make shared mutation expressible in safe Rust; it does
/// not isolate holders from each other. Two requests sharing a buffer must be
/// confined by the surrounding pipeline to disjoint sub-ranges (or read-only
/// use), or one of them must take a [`deep_copy`](DestBuffer::deep_copy).
#[derive(Clone)]
pub struct DestBuffer {
    bytes: Arc<RwLock<Vec<u8>>>,
}

impl DestBuffer {
    /// Create a zero-filled buffer of the given length.
    pub fn with_len(len: usize) -> Self {
        Self::from_vec(vec![0u8; len])
    }

    /// Wrap an existing byte vector.
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Arc::new(RwLock::new(bytes)),
        }
    }

    /// Length of the underlying storage in bytes.
    pub fn len(&self) -> usize {
        self.bytes.read().unwrap().len()
    }

    /// Whether the underlying storage is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Acquire a read guard over the bytes.
    pub fn read(&self) -> RwLockReadGuard<'_, Vec<u8>> {
        self.bytes.read().unwrap()
    }

    /// Acquire a write guard over the bytes.
    pub fn write(&self) -> RwLockWriteGuard<'_, Vec<u8>> {
        self.bytes.write().unwrap()
    }

    /// Create a new handle over freshly allocated storage holding a
    /// byte-for-byte copy of this buffer's contents.
    ///
    /// Mutations through the copy never affect the original.
    pub fn deep_copy(&self) -> Self {
        Self::from_vec(self.read().clone())
    }

    /// Whether two handles alias the same underlying storage.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.bytes, &other.bytes)
    }
}

impl PartialEq for DestBuffer {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        *self.read() == *other.read()
    }
}

impl Eq for DestBuffer {}

impl Hash for DestBuffer {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.read().hash(state);
    }
}

impl fmt::Debug for DestBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DestBuffer")
            .field("len", &self.len())
            .field("shared", &(Arc::strong_count(&self.bytes) > 1))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_len_zero_filled() {
        let buf = DestBuffer::with_len(16);
        assert_eq!(buf.len(), 16);
        assert!(buf.read().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_clone_aliases_storage() {
        let buf = DestBuffer::from_vec(vec![1, 2, 3]);
        let alias = buf.clone();
        assert!(buf.ptr_eq(&alias));

        alias.write()[0] = 9;
        assert_eq!(buf.read()[0], 9);
    }

    #[test]
    fn test_deep_copy_is_independent() {
        let buf = DestBuffer::from_vec(vec![1, 2, 3]);
        let copy = buf.deep_copy();
        assert!(!buf.ptr_eq(&copy));
        assert_eq!(buf, copy);

        copy.write()[0] = 9;
        assert_eq!(buf.read()[0], 1);
        assert_ne!(buf, copy);
    }

    #[test]
    fn test_content_equality() {
        let a = DestBuffer::from_vec(vec![1, 2, 3]);
        let b = DestBuffer::from_vec(vec![1, 2, 3]);
        let c = DestBuffer::from_vec(vec![1, 2, 4]);
        assert!(!a.ptr_eq(&b));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
