//! UUIDv4 generator and related types.

use std::sync::Arc;

use crate::pool::RandomPool;
use crate::source::{EntropySource, SharedSource};
use crate::{SourceError, Uuid};

/// Represents a UUIDv4 generator that owns a replaceable entropy source and an optional batching
/// pool.
///
/// A generator is an ordinary value, so independent instances can be created for tests or for
/// subsystems that need their own source. The process-wide instance used by [`crate::uuid4()`] is
/// just one of them.
///
/// # Examples
///
/// ```rust
/// use std::{sync::Arc, thread};
/// use uuid4_pool::V4Generator;
///
/// let g = Arc::new(V4Generator::new());
/// g.enable_pool();
/// thread::scope(|s| {
///     for i in 0..4 {
///         let g = Arc::clone(&g);
///         s.spawn(move || {
///             for _ in 0..8 {
///                 println!("{} by thread {}", g.generate().unwrap(), i);
///             }
///         });
///     }
/// });
/// ```
#[derive(Debug, Default)]
pub struct V4Generator {
    source: SharedSource,
    pool: RandomPool,
}

impl V4Generator {
    /// Creates a generator that reads from the operating system, with the pool disabled.
    pub fn new() -> Self {
        Default::default()
    }

    /// Creates a generator that reads from `source`, with the pool disabled.
    pub fn with_source(source: impl EntropySource + 'static) -> Self {
        Self {
            source: SharedSource::new(Arc::new(source)),
            pool: RandomPool::new(),
        }
    }

    /// Generates a new UUIDv4 object.
    ///
    /// The 16 random bytes come from the pool if it is enabled, or directly from the active
    /// entropy source otherwise. A source failure is returned as is.
    pub fn generate(&self) -> Result<Uuid, SourceError> {
        let source = self.source.current();
        match self.pool.next_block(&*source)? {
            Some(bytes) => Ok(Uuid::from_random_bytes(bytes)),
            None => generate_with(&*source),
        }
    }

    /// Replaces the entropy source for all subsequent reads, including pool refills, and returns
    /// the previous source.
    pub fn set_source(&self, source: impl EntropySource + 'static) -> Arc<dyn EntropySource> {
        self.set_shared_source(Arc::new(source))
    }

    /// Replaces the entropy source with one that may be shared with other generators, returning
    /// the previous source.
    pub fn set_shared_source(&self, source: Arc<dyn EntropySource>) -> Arc<dyn EntropySource> {
        log::debug!("replacing entropy source");
        self.source.replace(source)
    }

    /// Enables the batching pool with the default capacity. No-op if already enabled.
    pub fn enable_pool(&self) {
        self.pool.enable();
    }

    /// Enables the batching pool with a buffer of `capacity` bytes. No-op if already enabled.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is not a positive multiple of 16.
    pub fn enable_pool_with_capacity(&self, capacity: usize) {
        self.pool.enable_with_capacity(capacity);
    }

    /// Disables the batching pool, discarding buffered bytes. No-op if already disabled.
    pub fn disable_pool(&self) {
        self.pool.disable();
    }

    /// Returns `true` if the batching pool is enabled.
    pub fn is_pool_enabled(&self) -> bool {
        self.pool.is_enabled()
    }

    /// Returns the capacity of the batching pool, or `None` if it is disabled.
    pub fn pool_capacity(&self) -> Option<usize> {
        self.pool.capacity()
    }
}

/// Generates a UUIDv4 object from 16 bytes read directly from `source`, bypassing any pool.
///
/// # Examples
///
/// ```rust
/// use uuid4_pool::{generate_with, source::Reader};
///
/// let uuid = generate_with(&Reader::new(&[0x01u8; 16][..]))?;
/// assert_eq!(uuid.to_string(), "01010101-0101-4101-8101-010101010101");
/// # Ok::<(), uuid4_pool::SourceError>(())
/// ```
pub fn generate_with(source: &dyn EntropySource) -> Result<Uuid, SourceError> {
    let mut bytes = [0u8; 16];
    source.fill(&mut bytes)?;
    Ok(Uuid::from_random_bytes(bytes))
}
