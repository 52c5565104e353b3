//! Process-wide default generator and entry point functions.

#![cfg(feature = "global_gen")]
#![cfg_attr(docsrs, doc(cfg(feature = "global_gen")))]

use std::sync;

use crate::{source::EntropySource, SourceError, Uuid, V4Generator};

/// Returns the process-wide generator, creating one if none exists.
///
/// The generator initially reads from the operating system and has the pool disabled.
pub fn global() -> &'static V4Generator {
    static G: sync::OnceLock<V4Generator> = sync::OnceLock::new();
    G.get_or_init(V4Generator::new)
}

/// Generates a UUIDv4 object using the process-wide generator.
///
/// # Examples
///
/// ```rust
/// let uuid = uuid4_pool::uuid4()?;
/// println!("{}", uuid); // e.g., "2ca4b2ce-6c13-40d4-bccf-37d222820f6f"
/// println!("{:?}", uuid.as_bytes()); // as 16-byte big-endian array
///
/// let uuid_string: String = uuid4_pool::uuid4()?.to_string();
/// # Ok::<(), uuid4_pool::SourceError>(())
/// ```
pub fn uuid4() -> Result<Uuid, SourceError> {
    global().generate()
}

/// Enables the batching pool of the process-wide generator.
///
/// # Examples
///
/// ```rust
/// uuid4_pool::enable_pool();
/// for _ in 0..100 {
///     println!("{}", uuid4_pool::uuid4()?);
/// }
/// uuid4_pool::disable_pool();
/// # Ok::<(), uuid4_pool::SourceError>(())
/// ```
pub fn enable_pool() {
    global().enable_pool();
}

/// Disables the batching pool of the process-wide generator.
pub fn disable_pool() {
    global().disable_pool();
}

/// Replaces the entropy source of the process-wide generator, returning the previous source.
pub fn set_source(source: impl EntropySource + 'static) -> sync::Arc<dyn EntropySource> {
    global().set_source(source)
}
