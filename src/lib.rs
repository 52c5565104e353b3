//! UUID version 4 generator with an injectable entropy source and an optional batching pool
//!
//! ```rust
//! let uuid = uuid4_pool::uuid4()?;
//! println!("{}", uuid); // e.g., "2ca4b2ce-6c13-40d4-bccf-37d222820f6f"
//! println!("{:?}", uuid.as_bytes()); // as 16-byte big-endian array
//! # Ok::<(), uuid4_pool::SourceError>(())
//! ```
//!
//! # Field and bit layout
//!
//! This implementation produces identifiers with the following bit layout:
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                            random_a                           |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |           random_a            |  ver  |       random_b        |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |var|                       random_c                            |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                           random_c                            |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! Where the 4-bit `ver` field is set at `0100`, the 2-bit `var` field is set at `10`, and the
//! remaining 122 bits are filled with bytes from the entropy source. When validating external
//! input, the `110` variant is accepted as well.
//!
//! # Entropy source and pool
//!
//! Random bytes come from the operating system by default. The source can be replaced at run time
//! with any [`source::EntropySource`], which is primarily useful for deterministic tests:
//!
//! ```rust
//! use uuid4_pool::{source::Reader, V4Generator};
//!
//! let g = V4Generator::with_source(Reader::new(std::io::repeat(0x01)));
//! assert_eq!(g.generate()?.to_string(), "01010101-0101-4101-8101-010101010101");
//! # Ok::<(), uuid4_pool::SourceError>(())
//! ```
//!
//! Reading entropy costs a system call per read. The optional batching pool reads 1024 bytes at a
//! time and serves 16 of them per identifier, reducing the number of reads by a factor of 64:
//!
//! ```rust
//! let g = uuid4_pool::V4Generator::new();
//! g.enable_pool();
//! let uuid = g.generate()?;
//! # Ok::<(), uuid4_pool::SourceError>(())
//! ```
//!
//! # Crate features
//!
//! - `global_gen` (default): the process-wide generator behind [`uuid4()`].
//! - `serde`: `Serialize` and `Deserialize` for [`Uuid`].
//! - `uuid`: conversions from and to `uuid::Uuid`.

#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
pub use error::{ParseError, SourceError};

mod id;
pub use id::{
    Uuid, Variant, VARIANT_10, VARIANT_10_MASK, VARIANT_110, VARIANT_110_MASK, VERSION_4,
    VERSION_MASK,
};

pub mod source;

pub mod pool;

pub mod generator;
#[doc(inline)]
pub use generator::{generate_with, V4Generator};

mod global_gen;
#[cfg(feature = "global_gen")]
pub use global_gen::{disable_pool, enable_pool, global, set_source, uuid4};
