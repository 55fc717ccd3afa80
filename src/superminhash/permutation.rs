use crate::random::UniformStream;
use crate::superminhash::MAX_RANK;

/// Per-element shuffle state. Built fresh for every element and dropped
/// once the element has been applied.
struct ElementContext {
  positions: Vec<usize>,
  touched: Vec<bool>,
  bucket_counts: Vec<u32>,
  max_bucket_index: usize,
}

#[inline]
const fn bucket_of(value: u32, signature_size: usize) -> usize {
  let last = signature_size - 1;
  if (value as usize) < last {
    value as usize
  } else {
    last
  }
}

impl ElementContext {
  /// Buckets are counted from the signature as it stands before the
  /// element, so `bucket_counts` always sums to the signature size.
  fn new(signature: &[u32]) -> Self {
    let m = signature.len();
    let mut bucket_counts = vec![0_u32; m];
    for &value in signature {
      bucket_counts[bucket_of(value, m)] += 1;
    }
    let max_bucket_index = adjust_max_bucket_index(m - 1, &bucket_counts);

    Self {
      positions: vec![0; m],
      touched: vec![false; m],
      bucket_counts,
      max_bucket_index,
    }
  }

  #[inline]
  fn touch(&mut self, index: usize) {
    if !self.touched[index] {
      self.touched[index] = true;
      self.positions[index] = index;
    }
  }

  /// One Fisher-Yates step: fixes the slot at `current` and returns it.
  #[inline]
  fn swap_into(&mut self, current: usize, random_position: usize) -> usize {
    self.touch(current);
    self.touch(random_position);
    self.positions.swap(current, random_position);
    self.positions[current]
  }

  /// Moves a slot from `previous_bucket` to `current` and shrinks the scan
  /// range when the top bucket drained.
  #[inline]
  fn rebucket(&mut self, current: usize, previous_bucket: usize) {
    if current < previous_bucket {
      self.bucket_counts[previous_bucket] -= 1;
      self.bucket_counts[current] += 1;
      self.max_bucket_index =
        adjust_max_bucket_index(self.max_bucket_index, &self.bucket_counts);
    }
  }
}

/// Lowers `max_index` past empty buckets, stopping at zero.
#[must_use]
pub fn adjust_max_bucket_index(
  max_index: usize,
  bucket_counts: &[u32],
) -> usize {
  let mut index = max_index;
  while index > 0 && bucket_counts[index] == 0 {
    index -= 1;
  }
  index
}

#[inline]
fn draw_rank(stream: &mut dyn UniformStream) -> u32 {
  // next_unit() < 1, so the product stays below MAX_RANK.
  (stream.next_unit() * f64::from(MAX_RANK)).floor() as u32
}

#[inline]
fn draw_position(
  stream: &mut dyn UniformStream,
  current: usize,
  signature_size: usize,
) -> usize {
  let span = signature_size - current;
  let offset = (stream.next_unit() * span as f64).floor() as usize;
  current + offset.min(span - 1)
}

#[inline]
const fn candidate_rank(random_value: u32, current: usize) -> u32 {
  ((random_value as u64 + current as u64) % MAX_RANK as u64) as u32
}

/// Applies one element's shuffle to `signature`. Returns the number of
/// shuffle steps taken before the bucket bound stopped the scan.
pub(crate) fn permute_element(
  signature: &mut [u32],
  stream: &mut dyn UniformStream,
) -> usize {
  let m = signature.len();
  let mut context = ElementContext::new(signature);

  let mut current = 0_usize;
  while current <= context.max_bucket_index {
    let random_value = draw_rank(stream);
    let random_position = draw_position(stream, current, m);
    let slot = context.swap_into(current, random_position);

    let candidate = candidate_rank(random_value, current);
    let existing = signature[slot];
    if candidate < existing {
      let previous_bucket = bucket_of(existing, m);
      signature[slot] = candidate;
      context.rebucket(current, previous_bucket);
    }
    current += 1;
  }
  current
}

/// Reference scan that visits every slot without the bucket bound.
#[cfg(test)]
pub(crate) fn permute_element_unpruned(
  signature: &mut [u32],
  stream: &mut dyn UniformStream,
) {
  let m = signature.len();
  let mut positions: Vec<usize> = (0..m).collect();
  for current in 0..m {
    let random_value = draw_rank(stream);
    let random_position = draw_position(stream, current, m);
    positions.swap(current, random_position);
    let slot = positions[current];
    let candidate = candidate_rank(random_value, current);
    signature[slot] = signature[slot].min(candidate);
  }
}
