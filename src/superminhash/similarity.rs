use crate::error::{Result, SketchError};
use crate::superminhash::SuperMinHash;

impl SuperMinHash {
  /// Estimated Jaccard similarity, with sentinel results for empty sketches:
  /// two empty sketches are identical (`1.0`) and an empty sketch shares
  /// nothing with a non-empty one (`0.0`).
  ///
  /// # Errors
  ///
  /// Returns a mismatch error when both sketches are non-empty and were built
  /// with different seeds or sizes.
  pub fn similarity(&self, other: &Self) -> Result<f64> {
    if self.empty || other.empty {
      return Ok(if self.empty && other.empty { 1.0 } else { 0.0 });
    }
    self.jaccard_index(other)
  }

  /// Fraction of slots holding equal ranks.
  ///
  /// # Errors
  ///
  /// Returns `SketchError::SeedMismatch` or `SketchError::SizeMismatch` for
  /// incompatible sketches.
  pub fn jaccard_index(&self, other: &Self) -> Result<f64> {
    self.ensure_compatible(other)?;
    Ok(self.jaccard_unchecked(other))
  }

  pub(crate) fn ensure_compatible(&self, other: &Self) -> Result<()> {
    if self.seed != other.seed {
      tracing::debug!(left = self.seed, right = other.seed, "seed mismatch");
      return Err(SketchError::SeedMismatch {
        left: self.seed,
        right: other.seed,
      });
    }
    if self.signature_size != other.signature_size {
      tracing::debug!(
        left = self.signature_size,
        right = other.signature_size,
        "signature size mismatch"
      );
      return Err(SketchError::SizeMismatch {
        left: self.signature_size,
        right: other.signature_size,
      });
    }
    Ok(())
  }

  #[inline]
  pub(crate) fn jaccard_unchecked(&self, other: &Self) -> f64 {
    let mut equal_count = 0usize;

    let chunks_a = self.signature.chunks_exact(8);
    let chunks_b = other.signature.chunks_exact(8);
    let rest_a = chunks_a.remainder();
    let rest_b = chunks_b.remainder();

    for (chunk_a, chunk_b) in chunks_a.zip(chunks_b) {
      equal_count += chunk_a
        .iter()
        .zip(chunk_b)
        .map(|(a, b)| usize::from(a == b))
        .sum::<usize>();
    }
    equal_count += rest_a
      .iter()
      .zip(rest_b)
      .filter(|&(&a, &b)| a == b)
      .count();

    equal_count as f64 / self.signature_size as f64
  }

  /// Folds `other` into this sketch, producing the signature of the union
  /// of both element sets.
  ///
  /// # Errors
  ///
  /// Returns a mismatch error for incompatible sketches; `self` is left
  /// untouched in that case.
  pub fn merge(&mut self, other: &Self) -> Result<()> {
    self.ensure_compatible(other)?;
    for (value, &incoming) in self.signature.iter_mut().zip(&other.signature) {
      *value = (*value).min(incoming);
    }
    self.empty = self.empty && other.empty;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use crate::error::SketchError;
  use crate::superminhash::{SuperMinHash, MAX_RANK};

  #[test]
  fn jaccard_counts_equal_slots_across_chunk_boundaries() {
    let left: Vec<u32> = (0..19).collect();
    let mut right = left.clone();
    right[0] = 100;
    right[9] = 100;
    right[17] = 100;
    let a = SuperMinHash::from_raw_signature(&left, 1, false).unwrap();
    let b = SuperMinHash::from_raw_signature(&right, 1, false).unwrap();
    let expected = 16.0 / 19.0;
    assert!((a.jaccard_index(&b).unwrap() - expected).abs() < 1e-12);
  }

  #[test]
  fn sentinel_similarity_for_empty_sketches() {
    let empty_a = SuperMinHash::new(16, 1).unwrap();
    let empty_b = SuperMinHash::new(16, 1).unwrap();
    let full = SuperMinHash::from_iterable(["x"], 16, 1).unwrap();
    assert_eq!(empty_a.similarity(&empty_b).unwrap(), 1.0);
    assert_eq!(empty_a.similarity(&full).unwrap(), 0.0);
    assert_eq!(full.similarity(&empty_a).unwrap(), 0.0);
  }

  #[test]
  fn mismatches_are_reported() {
    let a = SuperMinHash::from_iterable(["a"], 128, 42).unwrap();
    let other_seed = SuperMinHash::from_iterable(["a"], 128, 43).unwrap();
    let other_size = SuperMinHash::from_iterable(["a"], 256, 42).unwrap();
    assert_eq!(
      a.similarity(&other_seed),
      Err(SketchError::SeedMismatch { left: 42, right: 43 })
    );
    assert_eq!(
      a.jaccard_index(&other_size),
      Err(SketchError::SizeMismatch { left: 128, right: 256 })
    );
    // Empty sketches are checked before compatibility.
    let empty = SuperMinHash::new(256, 7).unwrap();
    assert_eq!(a.similarity(&empty).unwrap(), 0.0);
    assert!(a.jaccard_index(&empty).is_err());
  }

  #[test]
  fn merge_takes_slotwise_minimum() {
    let mut a =
      SuperMinHash::from_raw_signature(&[5, MAX_RANK, 3], 9, false).unwrap();
    let b = SuperMinHash::from_raw_signature(&[7, 1, 3], 9, true).unwrap();
    a.merge(&b).unwrap();
    assert_eq!(a.signature(), vec![5, 1, 3]);
    assert!(!a.is_empty());

    let mut wrong = SuperMinHash::new(3, 10).unwrap();
    assert!(wrong.merge(&a).is_err());
    assert_eq!(wrong.signature(), vec![MAX_RANK; 3]);
    assert!(wrong.is_empty());
  }
}
