//! Streaming SuperMinHash signatures.
//!
//! SuperMinHash (Otmar Ertl, [arXiv:1706.05698](https://arxiv.org/abs/1706.05698))
//! replaces the `m` independent hash functions of classic `MinHash` with one
//! partial random permutation per element. Each element draws a seeded
//! uniform stream, walks a lazily materialized Fisher-Yates shuffle of the
//! `m` slots and proposes a rank for every slot it lands on. Slots keep the
//! minimum rank they have ever seen.
//!
//! Key characteristics:
//! - Fixed memory: the signature is `m` `u32` values no matter how many
//!   elements are added, and the input stream is never buffered.
//! - Order-free: adding a multiset of elements in one call, several calls or
//!   any order yields the same signature.
//! - Early exit: per-element bucket counts bound the ranks still reachable,
//!   so the shuffle stops once no remaining slot can improve.
//!
//! Usage:
//! - Create an instance with `SuperMinHash::new(signature_size, seed)`.
//! - Feed elements with `add` (or `add_with` for a custom canonicalizer).
//! - Estimate similarity with `similarity` / `jaccard_index`.
//! - Persist with `serialize` and restore with `SuperMinHash::deserialize`.

use crate::canonical::Canonicalize;
use crate::config::{
  validate_signature_size, SketchConfig, DEFAULT_SEED, DEFAULT_SIGNATURE_SIZE,
};
use crate::error::{Result, SketchError};
use crate::random::{xoshiro_stream, StreamFactory};
use std::fmt;

mod codec;
mod permutation;
#[cfg(feature = "python")]
mod py;
mod similarity;
#[cfg(test)]
mod tests;

pub use codec::HEADER_LEN;
pub use permutation::adjust_max_bucket_index;

/// Longest canonical element accepted by `add`, in characters.
pub const MAX_INPUT_LENGTH: usize = 100_000;
/// Exclusive upper bound of synthetic ranks; also the "unset" slot value.
pub const MAX_RANK: u32 = u32::MAX;

/// `SuperMinHash` keeps the minimal synthetic rank per slot across all
/// elements added so far.
#[derive(Clone)]
#[cfg_attr(feature = "python", pyo3::pyclass(module = "superminhash"))]
pub struct SuperMinHash {
  signature_size: usize,
  seed: u32,
  signature: Vec<u32>,
  empty: bool,
  streams: StreamFactory,
}

impl SuperMinHash {
  /// Creates an empty sketch using the default xoshiro stream factory.
  ///
  /// # Errors
  ///
  /// Returns `SketchError::Construction` when `signature_size` is zero or
  /// does not fit the binary layout.
  pub fn new(signature_size: usize, seed: u32) -> Result<Self> {
    Self::with_stream_factory(signature_size, seed, xoshiro_stream)
  }

  /// Creates an empty sketch drawing per-element randomness from `streams`.
  ///
  /// # Errors
  ///
  /// Returns `SketchError::Construction` for an invalid `signature_size`.
  pub fn with_stream_factory(
    signature_size: usize,
    seed: u32,
    streams: StreamFactory,
  ) -> Result<Self> {
    let signature_size = validate_signature_size(signature_size)?;
    Ok(Self::unchecked(vec![MAX_RANK; signature_size], seed, true, streams))
  }

  /// # Errors
  ///
  /// Returns `SketchError::Construction` for an invalid signature size.
  pub fn from_config(config: &SketchConfig) -> Result<Self> {
    Self::new(config.signature_size, config.seed)
  }

  /// Wraps an existing signature without checking its values.
  ///
  /// # Errors
  ///
  /// Returns `SketchError::Construction` when `signature` is empty or longer
  /// than `u32::MAX`.
  pub fn from_raw_signature(
    signature: &[u32],
    seed: u32,
    empty: bool,
  ) -> Result<Self> {
    validate_signature_size(signature.len())?;
    Ok(Self::unchecked(signature.to_vec(), seed, empty, xoshiro_stream))
  }

  /// Builds a sketch and adds `elements` in one call.
  ///
  /// # Errors
  ///
  /// Fails on an invalid size or an oversized element.
  pub fn from_iterable<I>(
    elements: I,
    signature_size: usize,
    seed: u32,
  ) -> Result<Self>
  where
    I: IntoIterator,
    I::Item: Canonicalize,
  {
    let mut sketch = Self::new(signature_size, seed)?;
    sketch.add(elements)?;
    Ok(sketch)
  }

  /// [`SuperMinHash::from_iterable`] with the default size and seed.
  ///
  /// # Errors
  ///
  /// Fails on an oversized element.
  pub fn from_iterable_default<I>(elements: I) -> Result<Self>
  where
    I: IntoIterator,
    I::Item: Canonicalize,
  {
    Self::from_iterable(elements, DEFAULT_SIGNATURE_SIZE, DEFAULT_SEED)
  }

  fn unchecked(
    signature: Vec<u32>,
    seed: u32,
    empty: bool,
    streams: StreamFactory,
  ) -> Self {
    Self {
      signature_size: signature.len(),
      seed,
      signature,
      empty,
      streams,
    }
  }

  /// Replaces the stream factory used by later `add` calls.
  pub fn set_stream_factory(&mut self, streams: StreamFactory) {
    self.streams = streams;
  }

  /// Adds elements using their [`Canonicalize`] form.
  ///
  /// # Errors
  ///
  /// Returns `SketchError::InputTooLarge` if any canonical form exceeds
  /// [`MAX_INPUT_LENGTH`]; the sketch is then left unchanged.
  pub fn add<I>(&mut self, elements: I) -> Result<()>
  where
    I: IntoIterator,
    I::Item: Canonicalize,
  {
    self.add_with(elements, |element| {
      Ok(element.canonical_form().into_owned())
    })
  }

  /// Adds elements rendered to strings by `canonicalize`.
  ///
  /// Updates go to a scratch copy of the signature that is committed only
  /// after every element succeeded.
  ///
  /// # Errors
  ///
  /// Returns the first error raised by `canonicalize`, or
  /// `SketchError::InputTooLarge` if any canonical form exceeds
  /// [`MAX_INPUT_LENGTH`]; the sketch is then left unchanged.
  pub fn add_with<I, F>(
    &mut self,
    elements: I,
    mut canonicalize: F,
  ) -> Result<()>
  where
    I: IntoIterator,
    F: FnMut(&I::Item) -> Result<String>,
  {
    let mut scratch = self.signature.clone();
    let mut added = 0_usize;
    for element in elements {
      let canonical = canonicalize(&element)?;
      let seed_string = self.seed_string(&canonical)?;
      let mut stream = (self.streams)(&seed_string);
      permutation::permute_element(&mut scratch, stream.as_mut());
      added += 1;
    }

    tracing::trace!(
      added,
      signature_size = self.signature_size,
      seed = self.seed,
      "superminhash add"
    );
    if added > 0 {
      self.signature = scratch;
      self.empty = false;
    }
    Ok(())
  }

  fn seed_string(&self, canonical: &str) -> Result<String> {
    if canonical.len() > MAX_INPUT_LENGTH {
      let length = canonical.chars().count();
      if length > MAX_INPUT_LENGTH {
        return Err(SketchError::InputTooLarge {
          length,
          max: MAX_INPUT_LENGTH,
        });
      }
    }
    Ok(format!("{}:{canonical}", self.seed))
  }

  /// Returns a copy of the current signature.
  #[must_use]
  pub fn signature(&self) -> Vec<u32> {
    self.signature.clone()
  }

  #[must_use]
  pub const fn is_empty(&self) -> bool {
    self.empty
  }

  #[must_use]
  pub const fn signature_size(&self) -> usize {
    self.signature_size
  }

  #[must_use]
  pub const fn seed(&self) -> u32 {
    self.seed
  }

  #[must_use]
  pub const fn config(&self) -> SketchConfig {
    SketchConfig::new(self.signature_size, self.seed)
  }
}

impl Default for SuperMinHash {
  fn default() -> Self {
    Self::unchecked(
      vec![MAX_RANK; DEFAULT_SIGNATURE_SIZE],
      DEFAULT_SEED,
      true,
      xoshiro_stream,
    )
  }
}

impl fmt::Debug for SuperMinHash {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("SuperMinHash")
      .field("signature_size", &self.signature_size)
      .field("seed", &self.seed)
      .field("empty", &self.empty)
      .field("signature", &self.signature)
      .finish_non_exhaustive()
  }
}

impl PartialEq for SuperMinHash {
  fn eq(&self, other: &Self) -> bool {
    self.signature_size == other.signature_size
      && self.seed == other.seed
      && self.empty == other.empty
      && self.signature == other.signature
  }
}

impl Eq for SuperMinHash {}
