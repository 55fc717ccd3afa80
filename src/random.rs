//! Seeded uniform streams feeding the per-element permutation.
//!
//! A stream is keyed by a seed string and must replay the same sequence of
//! floats in `[0, 1)` for the same key on every run and platform. The seed
//! string is hashed with murmur3 (x64, 128-bit) under two hash seeds to form
//! a 256-bit generator seed.

use murmur3::murmur3_x64_128;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha12Rng;
use rand_xoshiro::Xoshiro256PlusPlus;
use std::io::Cursor;

const SEED_HASH_LOW: u32 = 0x5eed_0001;
const SEED_HASH_HIGH: u32 = 0x5eed_0002;

/// Source of uniform floats in `[0, 1)`.
pub trait UniformStream {
  fn next_unit(&mut self) -> f64;
}

impl<R: RngCore> UniformStream for R {
  #[inline]
  fn next_unit(&mut self) -> f64 {
    self.random::<f64>()
  }
}

/// Builds a reproducible stream for a seed string.
pub type StreamFactory = fn(&str) -> Box<dyn UniformStream>;

fn hash_seed_string(seed: &str, hash_seed: u32) -> u128 {
  // Reading from an in-memory cursor cannot fail.
  murmur3_x64_128(&mut Cursor::new(seed.as_bytes()), hash_seed)
    .unwrap_or_default()
}

/// Expands a seed string into 32 bytes of generator seed material.
#[must_use]
pub fn seed_material(seed: &str) -> [u8; 32] {
  let low = hash_seed_string(seed, SEED_HASH_LOW).to_le_bytes();
  let high = hash_seed_string(seed, SEED_HASH_HIGH).to_le_bytes();
  let mut material = [0_u8; 32];
  material[..16].copy_from_slice(&low);
  material[16..].copy_from_slice(&high);
  material
}

/// Default stream: `Xoshiro256PlusPlus` seeded from the hashed seed string.
#[must_use]
pub fn xoshiro_stream(seed: &str) -> Box<dyn UniformStream> {
  Box::new(Xoshiro256PlusPlus::from_seed(seed_material(seed)))
}

/// Alternative stream backed by `ChaCha12Rng`. Signatures built with it are
/// not comparable with signatures built with [`xoshiro_stream`].
#[must_use]
pub fn chacha_stream(seed: &str) -> Box<dyn UniformStream> {
  Box::new(ChaCha12Rng::from_seed(seed_material(seed)))
}
