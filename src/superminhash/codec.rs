//! Fixed little-endian layout:
//!
//! ```text
//! offset 0 : u32  signature size (m)
//! offset 4 : u32  seed
//! offset 8 : u8   empty flag (0 = empty, nonzero = non-empty)
//! offset 9 : m x u32 signature values
//! ```

use crate::error::{Result, SketchError};
use crate::random::xoshiro_stream;
use crate::superminhash::SuperMinHash;

/// Bytes preceding the signature values.
pub const HEADER_LEN: usize = 9;
const SIZE_OFFSET: usize = 0;
const SEED_OFFSET: usize = 4;
const EMPTY_OFFSET: usize = 8;

#[inline]
const fn read_u32_le(bytes: &[u8], offset: usize) -> u32 {
  u32::from_le_bytes([
    bytes[offset],
    bytes[offset + 1],
    bytes[offset + 2],
    bytes[offset + 3],
  ])
}

fn expected_len(signature_size: u32) -> usize {
  let total = HEADER_LEN as u64 + 4 * u64::from(signature_size);
  usize::try_from(total).unwrap_or(usize::MAX)
}

impl SuperMinHash {
  /// Length of [`SuperMinHash::serialize`] output for this sketch.
  #[must_use]
  pub const fn serialized_len(&self) -> usize {
    HEADER_LEN + 4 * self.signature_size
  }

  /// Encodes size, seed, empty flag and signature values.
  #[must_use]
  pub fn serialize(&self) -> Vec<u8> {
    let mut buffer = Vec::with_capacity(self.serialized_len());
    // Construction caps the size at u32::MAX.
    let size = u32::try_from(self.signature_size).unwrap_or(u32::MAX);
    buffer.extend_from_slice(&size.to_le_bytes());
    buffer.extend_from_slice(&self.seed.to_le_bytes());
    buffer.push(u8::from(!self.empty));
    for value in &self.signature {
      buffer.extend_from_slice(&value.to_le_bytes());
    }
    buffer
  }

  /// Rebuilds a sketch from [`SuperMinHash::serialize`] output. Signature
  /// values are taken as-is.
  ///
  /// # Errors
  ///
  /// Returns `TooShort`, `InvalidSize` or `LengthMismatch` for malformed
  /// input.
  pub fn deserialize(bytes: &[u8]) -> Result<Self> {
    if bytes.len() < HEADER_LEN {
      tracing::debug!(length = bytes.len(), "serialized sketch too short");
      return Err(SketchError::TooShort {
        length: bytes.len(),
      });
    }

    let signature_size = read_u32_le(bytes, SIZE_OFFSET);
    if signature_size == 0 {
      tracing::debug!("serialized sketch declares zero signature size");
      return Err(SketchError::InvalidSize);
    }

    let expected = expected_len(signature_size);
    if bytes.len() != expected {
      tracing::debug!(
        expected,
        actual = bytes.len(),
        "serialized sketch length mismatch"
      );
      return Err(SketchError::LengthMismatch {
        expected,
        actual: bytes.len(),
      });
    }

    let seed = read_u32_le(bytes, SEED_OFFSET);
    let empty = bytes[EMPTY_OFFSET] == 0;
    let signature = bytes[HEADER_LEN..]
      .chunks_exact(4)
      .map(|chunk| read_u32_le(chunk, 0))
      .collect();

    Ok(Self::unchecked(signature, seed, empty, xoshiro_stream))
  }

  /// Deserializes both buffers and returns their [`SuperMinHash::similarity`].
  ///
  /// # Errors
  ///
  /// Propagates decoding and comparison errors.
  pub fn compare_serialized(first: &[u8], second: &[u8]) -> Result<f64> {
    let first = Self::deserialize(first)?;
    let second = Self::deserialize(second)?;
    first.similarity(&second)
  }
}
