//! Integration with `rand` (v0.8) crate.

use std::sync;

use super::EntropySource;
use crate::SourceError;
use rand::RngCore;

/// An adapter that implements [`EntropySource`] for [`RngCore`] types.
///
/// Any `rand` generator can be plugged in, which makes seeded generators convenient for
/// reproducible tests. Production code should wrap a [`rand::CryptoRng`] only.
///
/// # Examples
///
/// ```rust
/// use rand::{rngs::StdRng, SeedableRng};
/// use uuid4_pool::{source::with_rand08::Adapter, V4Generator};
///
/// let g = V4Generator::with_source(Adapter::new(StdRng::seed_from_u64(42)));
/// let x = g.generate()?;
///
/// let h = V4Generator::with_source(Adapter::new(StdRng::seed_from_u64(42)));
/// assert_eq!(h.generate()?, x);
/// # Ok::<(), uuid4_pool::SourceError>(())
/// ```
#[derive(Debug, Default)]
pub struct Adapter<T>(sync::Mutex<T>);

impl<T: RngCore + Send> Adapter<T> {
    /// Wraps a random number generator.
    pub const fn new(rng: T) -> Self {
        Self(sync::Mutex::new(rng))
    }

    /// Consumes the adapter and returns the wrapped generator.
    pub fn into_inner(self) -> T {
        self.0.into_inner().unwrap_or_else(sync::PoisonError::into_inner)
    }
}

impl<T: RngCore + Send> EntropySource for Adapter<T> {
    fn fill(&self, dest: &mut [u8]) -> Result<(), SourceError> {
        self.0
            .lock()
            .unwrap_or_else(sync::PoisonError::into_inner)
            .try_fill_bytes(dest)
            .map_err(SourceError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::Adapter;
    use crate::source::EntropySource;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// Reproduces seeded generator output
    #[test]
    fn reproduces_seeded_generator_output() {
        let mut expected = [0u8; 48];
        rand::RngCore::fill_bytes(&mut ChaCha8Rng::seed_from_u64(7), &mut expected);

        let source = Adapter::new(ChaCha8Rng::seed_from_u64(7));
        let mut actual = [0u8; 48];
        source.fill(&mut actual[..16]).unwrap();
        source.fill(&mut actual[16..]).unwrap();
        assert_eq!(actual, expected);

        // the wrapped generator resumes where the adapter stopped
        let mut rng = source.into_inner();
        let mut next = [0u8; 16];
        rand::RngCore::fill_bytes(&mut rng, &mut next);
        let mut reference = ChaCha8Rng::seed_from_u64(7);
        let mut skipped = [0u8; 64];
        rand::RngCore::fill_bytes(&mut reference, &mut skipped);
        assert_eq!(next, skipped[48..]);
    }
}
