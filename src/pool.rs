//! Batching pool of random bytes.

use std::sync;

use crate::{source::EntropySource, SourceError};

/// Length of each slice served by [`RandomPool::next_block()`].
pub const BLOCK_LEN: usize = 16;

/// Default buffer capacity, which serves 64 blocks per refill.
pub const DEFAULT_POOL_CAPACITY: usize = 1024;

/// Represents a buffer of random bytes that reads entropy in large chunks and serves it 16 bytes
/// at a time.
///
/// The pool is disabled on construction. Once enabled, the first request fills the whole buffer
/// from the entropy source passed in, and subsequent requests are served from the buffer until it
/// is exhausted. Each byte is served at most once, and every refill replaces the entire buffer.
///
/// All operations run under a single lock, so at most one refill is in flight and no two callers
/// ever receive overlapping bytes.
///
/// On Unix, every request compares the current process ID with the one recorded at the last
/// request and discards the buffer after a fork, so a child never serves bytes its parent has
/// buffered. This costs a `getpid` call per request, which is far cheaper than the entropy read
/// the pool saves, but it means the pooled path is not entirely free of system calls.
///
/// # Examples
///
/// ```rust
/// use uuid4_pool::{pool::RandomPool, source::OsEntropy};
///
/// let pool = RandomPool::new();
/// assert_eq!(pool.next_block(&OsEntropy)?, None);
///
/// pool.enable();
/// let a = pool.next_block(&OsEntropy)?.unwrap();
/// let b = pool.next_block(&OsEntropy)?.unwrap();
/// assert_ne!(a, b);
/// # Ok::<(), uuid4_pool::SourceError>(())
/// ```
#[derive(Debug, Default)]
pub struct RandomPool {
    state: sync::Mutex<PoolState>,
}

#[derive(Debug, Default)]
struct PoolState {
    /// `None` while the pool is disabled.
    buffer: Option<Box<[u8]>>,

    /// Offset of the next unread byte; equals the buffer length when the buffer is exhausted.
    cursor: usize,

    /// Process that filled the buffer.
    #[cfg(unix)]
    pid: u32,
}

impl RandomPool {
    /// Creates a disabled pool.
    pub const fn new() -> Self {
        Self {
            state: sync::Mutex::new(PoolState {
                buffer: None,
                cursor: 0,
                #[cfg(unix)]
                pid: 0,
            }),
        }
    }

    /// Enables the pool with the [`DEFAULT_POOL_CAPACITY`].
    ///
    /// See [`RandomPool::enable_with_capacity()`].
    pub fn enable(&self) {
        self.enable_with_capacity(DEFAULT_POOL_CAPACITY);
    }

    /// Allocates a buffer of `capacity` bytes, marked as exhausted so the next request triggers a
    /// refill.
    ///
    /// This is a no-op if the pool is already enabled, in which case buffered bytes and the
    /// capacity in use are kept.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is not a positive multiple of 16.
    pub fn enable_with_capacity(&self, capacity: usize) {
        assert!(
            capacity > 0 && capacity % BLOCK_LEN == 0,
            "`capacity` must be a positive multiple of 16"
        );

        let mut state = self.lock();
        if state.buffer.is_none() {
            state.buffer = Some(vec![0u8; capacity].into_boxed_slice());
            state.cursor = capacity;
            log::debug!("random pool enabled with {} bytes", capacity);
        }
    }

    /// Discards the buffer and disables the pool. This is a no-op if the pool is already disabled.
    pub fn disable(&self) {
        let mut state = self.lock();
        if state.buffer.take().is_some() {
            log::debug!("random pool disabled");
        }
        state.cursor = 0;
    }

    /// Returns `true` if the pool is enabled.
    pub fn is_enabled(&self) -> bool {
        self.lock().buffer.is_some()
    }

    /// Returns the buffer capacity, or `None` if the pool is disabled.
    pub fn capacity(&self) -> Option<usize> {
        self.lock().buffer.as_ref().map(|buffer| buffer.len())
    }

    /// Returns the next 16 bytes from the buffer, refilling it from `source` first if it is
    /// exhausted, or returns `Ok(None)` if the pool is disabled.
    ///
    /// A refill either succeeds as a whole or leaves the buffer marked as exhausted, so that the
    /// next call retries the refill. The source error is returned as is and never retried here.
    pub fn next_block(
        &self,
        source: &dyn EntropySource,
    ) -> Result<Option<[u8; BLOCK_LEN]>, SourceError> {
        let mut guard = self.lock();
        let state = &mut *guard;
        let Some(buffer) = state.buffer.as_deref_mut() else {
            return Ok(None);
        };

        #[cfg(unix)]
        {
            let pid = std::process::id();
            if state.pid != pid {
                // never serve bytes inherited from the parent process
                if state.pid != 0 {
                    log::trace!("discarding random pool filled by process {}", state.pid);
                }
                state.cursor = buffer.len();
                state.pid = pid;
            }
        }

        if state.cursor == buffer.len() {
            if let Err(err) = source.fill(buffer) {
                log::warn!("random pool refill failed: {}: {}", err, err.get_ref());
                return Err(err);
            }
            state.cursor = 0;
            log::debug!("random pool refilled with {} bytes", buffer.len());
        }

        let mut block = [0u8; BLOCK_LEN];
        block.copy_from_slice(&buffer[state.cursor..state.cursor + BLOCK_LEN]);
        state.cursor += BLOCK_LEN;
        Ok(Some(block))
    }

    /// Locks the state, recovering it if a source panicked during a refill; the cursor is never
    /// moved before a refill completes, so the state stays consistent.
    fn lock(&self) -> sync::MutexGuard<'_, PoolState> {
        self.state.lock().unwrap_or_else(sync::PoisonError::into_inner)
    }
}
