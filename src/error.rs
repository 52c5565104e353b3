//! Error types

use std::{error, io};

/// Error parsing or validating an external representation of UUIDv4.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, thiserror::Error)]
pub enum ParseError {
    /// The input does not have the 16-byte or 8-4-4-4-12 hexadecimal structure.
    #[error("malformed uuidv4")]
    Malformed,

    /// The version nibble is not `4`.
    #[error("invalid version")]
    InvalidVersion,

    /// The variant bits are neither `10` nor `110`.
    #[error("invalid variant")]
    InvalidVariant,
}

/// Error reported when an entropy source cannot supply the requested number of bytes.
///
/// The underlying cause is kept as is and can be recovered through [`SourceError::get_ref()`] or
/// [`SourceError::into_inner()`].
#[derive(Debug, thiserror::Error)]
#[error("could not read from entropy source")]
pub struct SourceError {
    #[source]
    inner: Box<dyn error::Error + Send + Sync + 'static>,
}

impl SourceError {
    /// Creates an error wrapping an arbitrary cause.
    pub fn new<E>(cause: E) -> Self
    where
        E: Into<Box<dyn error::Error + Send + Sync + 'static>>,
    {
        Self {
            inner: cause.into(),
        }
    }

    /// Returns a reference to the underlying cause.
    pub fn get_ref(&self) -> &(dyn error::Error + Send + Sync + 'static) {
        &*self.inner
    }

    /// Consumes the error and returns the underlying cause.
    pub fn into_inner(self) -> Box<dyn error::Error + Send + Sync + 'static> {
        self.inner
    }
}

impl From<rand::Error> for SourceError {
    fn from(src: rand::Error) -> Self {
        Self::new(src)
    }
}

impl From<io::Error> for SourceError {
    fn from(src: io::Error) -> Self {
        Self::new(src)
    }
}
