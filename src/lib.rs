//! Streaming SuperMinHash signatures for Jaccard similarity estimation.
//!
//! A [`SuperMinHash`] condenses a stream of elements into `m` ranks. Two
//! signatures built with the same size and seed estimate the Jaccard index
//! of the underlying sets as the fraction of equal slots.
//!
//! ```
//! use superminhash::SuperMinHash;
//!
//! let a = SuperMinHash::from_iterable(["a", "b", "c", "d", "e"], 1024, 42)?;
//! let b = SuperMinHash::from_iterable(["c", "d", "e", "f", "g"], 1024, 42)?;
//! let estimate = a.similarity(&b)?;
//! assert!((estimate - 3.0 / 7.0).abs() < 0.15);
//!
//! let restored = SuperMinHash::deserialize(&a.serialize())?;
//! assert_eq!(restored, a);
//! # Ok::<(), superminhash::SketchError>(())
//! ```

pub mod canonical;
pub mod config;
mod env;
pub mod error;
pub mod random;
mod superminhash;

pub use crate::canonical::{canonical_json, Canonicalize};
pub use crate::config::{SketchConfig, DEFAULT_SEED, DEFAULT_SIGNATURE_SIZE};
pub use crate::error::{Result, SketchError};
pub use crate::random::{
  chacha_stream, xoshiro_stream, StreamFactory, UniformStream,
};
pub use crate::superminhash::{
  adjust_max_bucket_index, SuperMinHash, HEADER_LEN, MAX_INPUT_LENGTH,
  MAX_RANK,
};

#[cfg(feature = "python")]
use pyo3::prelude::*;

#[cfg(feature = "python")]
#[pymodule]
#[pyo3(name = "superminhash")]
fn py_superminhash(m: &Bound<'_, PyModule>) -> PyResult<()> {
  m.add_class::<SuperMinHash>()?;
  Ok(())
}
