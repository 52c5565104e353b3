//! Entropy sources and related types.

use std::{fmt, io, sync};

use crate::SourceError;

pub mod with_rand08;

/// A trait that defines the minimum interface of a random byte supplier.
///
/// Implementors are shared across threads, so `fill` takes `&self`; sources with mutable state
/// are expected to synchronize internally, as [`with_rand08::Adapter`] and [`Reader`] do.
pub trait EntropySource: Send + Sync {
    /// Fills the whole of `dest` with random bytes, or returns an error if fewer than
    /// `dest.len()` bytes can be supplied.
    fn fill(&self, dest: &mut [u8]) -> Result<(), SourceError>;
}

/// The default, cryptographically secure source that reads from the operating system.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&self, dest: &mut [u8]) -> Result<(), SourceError> {
        rand::RngCore::try_fill_bytes(&mut rand::rngs::OsRng, dest).map_err(SourceError::from)
    }
}

/// An adapter that implements [`EntropySource`] for [`io::Read`] types.
///
/// A stream that ends before `dest` is full yields a [`SourceError`] wrapping
/// [`io::ErrorKind::UnexpectedEof`].
#[derive(Debug, Default)]
pub struct Reader<R>(sync::Mutex<R>);

impl<R: io::Read + Send> Reader<R> {
    /// Wraps a byte stream.
    pub const fn new(inner: R) -> Self {
        Self(sync::Mutex::new(inner))
    }

    /// Consumes the adapter and returns the wrapped stream.
    pub fn into_inner(self) -> R {
        self.0.into_inner().unwrap_or_else(sync::PoisonError::into_inner)
    }
}

impl<R: io::Read + Send> EntropySource for Reader<R> {
    fn fill(&self, dest: &mut [u8]) -> Result<(), SourceError> {
        self.0
            .lock()
            .unwrap_or_else(sync::PoisonError::into_inner)
            .read_exact(dest)
            .map_err(SourceError::from)
    }
}

/// Holds the single active [`EntropySource`] and lets callers replace it at run time.
///
/// Readers obtain a counted reference to the source active at the moment of the call, so a
/// replacement never disturbs a read already in progress and takes effect for every subsequent
/// read.
pub struct SharedSource {
    current: sync::RwLock<sync::Arc<dyn EntropySource>>,
}

impl SharedSource {
    /// Creates a holder with `source` as the active source.
    pub fn new(source: sync::Arc<dyn EntropySource>) -> Self {
        Self {
            current: sync::RwLock::new(source),
        }
    }

    /// Returns the currently active source.
    pub fn current(&self) -> sync::Arc<dyn EntropySource> {
        let current = self
            .current
            .read()
            .unwrap_or_else(sync::PoisonError::into_inner);
        sync::Arc::clone(&current)
    }

    /// Makes `source` the active source, returning the one it replaces.
    pub fn replace(&self, source: sync::Arc<dyn EntropySource>) -> sync::Arc<dyn EntropySource> {
        let mut current = self
            .current
            .write()
            .unwrap_or_else(sync::PoisonError::into_inner);
        std::mem::replace(&mut *current, source)
    }
}

impl Default for SharedSource {
    fn default() -> Self {
        Self::new(sync::Arc::new(OsEntropy))
    }
}

impl fmt::Debug for SharedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedSource").finish_non_exhaustive()
    }
}


#[cfg(test)]
mod tests {
    use super::testing::ByteSource;
    use super::{EntropySource, OsEntropy, Reader, SharedSource};
    use std::{io, sync::Arc};

    /// Reads nonconstant bytes from the operating system
    #[test]
    fn reads_nonconstant_bytes_from_the_operating_system() {
        let mut a = [0u8; 64];
        let mut b = [0u8; 64];
        OsEntropy.fill(&mut a).unwrap();
        OsEntropy.fill(&mut b).unwrap();
        assert_ne!(a, b);
        assert_ne!(a, [0u8; 64]);
    }

    /// Fails on short reads from byte streams
    #[test]
    fn fails_on_short_reads_from_byte_streams() {
        let source = Reader::new(io::Cursor::new(vec![7u8; 24]));
        let mut dest = [0u8; 16];
        source.fill(&mut dest).unwrap();
        assert_eq!(dest, [7u8; 16]);

        let err = source.fill(&mut dest).unwrap_err();
        let cause = err.get_ref().downcast_ref::<io::Error>().unwrap();
        assert_eq!(cause.kind(), io::ErrorKind::UnexpectedEof);
        assert_eq!(source.into_inner().position(), 24);
    }

    /// Replaces active source and returns previous one
    #[test]
    fn replaces_active_source_and_returns_previous_one() {
        let shared = SharedSource::new(Arc::new(ByteSource::new(1)));
        let mut dest = [0u8; 4];
        shared.current().fill(&mut dest).unwrap();
        assert_eq!(dest, [1u8; 4]);

        let held = shared.current();
        let previous = shared.replace(Arc::new(ByteSource::new(2)));
        previous.fill(&mut dest).unwrap();
        assert_eq!(dest, [1u8; 4]);

        // a reference obtained before the swap keeps working
        held.fill(&mut dest).unwrap();
        assert_eq!(dest, [1u8; 4]);

        shared.current().fill(&mut dest).unwrap();
        assert_eq!(dest, [2u8; 4]);
    }
}
