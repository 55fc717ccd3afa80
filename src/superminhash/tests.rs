use crate::error::SketchError;
use crate::random::{chacha_stream, xoshiro_stream, UniformStream};
use crate::superminhash::permutation::{
  permute_element, permute_element_unpruned,
};
use crate::superminhash::{SuperMinHash, MAX_INPUT_LENGTH, MAX_RANK};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

struct FixedStream(f64);

impl UniformStream for FixedStream {
  fn next_unit(&mut self) -> f64 {
    self.0
  }
}

fn half_stream(_: &str) -> Box<dyn UniformStream> {
  Box::new(FixedStream(0.5))
}

#[test]
fn pruned_scan_matches_full_scan() {
  let mut rng = Xoshiro256PlusPlus::seed_from_u64(0x5a3c_91e7);
  for round in 0..64 {
    let m = 1 + rng.random_range(0..96_usize);
    let elements = 1 + rng.random_range(0..40_usize);
    let mut pruned = vec![MAX_RANK; m];
    let mut full = vec![MAX_RANK; m];

    for element in 0..elements {
      let key = format!("{round}:{element}:{}", rng.random::<u32>());
      permute_element(&mut pruned, xoshiro_stream(&key).as_mut());
      permute_element_unpruned(&mut full, xoshiro_stream(&key).as_mut());
      assert_eq!(pruned, full, "m={m} element={element}");
    }
  }
}

#[test]
fn pruned_scan_matches_full_scan_on_low_raw_values() {
  let mut rng = Xoshiro256PlusPlus::seed_from_u64(0x0bad_cafe);
  for round in 0..64 {
    let m = 2 + rng.random_range(0..48_usize);
    let start: Vec<u32> = (0..m)
      .map(|_| rng.random_range(0..(2 * m as u32)))
      .collect();
    let mut pruned = start.clone();
    let mut full = start;

    let key = format!("raw:{round}");
    permute_element(&mut pruned, xoshiro_stream(&key).as_mut());
    permute_element_unpruned(&mut full, xoshiro_stream(&key).as_mut());
    assert_eq!(pruned, full);
  }
}

#[test]
fn zeroed_signature_stops_after_first_step() {
  let mut signature = vec![0_u32; 32];
  let steps = permute_element(&mut signature, xoshiro_stream("x").as_mut());
  assert_eq!(steps, 1);
  assert!(signature.iter().all(|&value| value == 0));
}

#[test]
fn fresh_signature_scans_every_slot() {
  let mut signature = vec![MAX_RANK; 16];
  let steps = permute_element(&mut signature, xoshiro_stream("x").as_mut());
  assert_eq!(steps, 16);
  assert!(signature.iter().all(|&value| value < MAX_RANK));
}

#[test]
fn single_slot_signature_takes_one_step() {
  let mut signature = vec![MAX_RANK; 1];
  let steps = permute_element(&mut signature, xoshiro_stream("x").as_mut());
  assert_eq!(steps, 1);
  assert!(signature[0] < MAX_RANK);
}

#[test]
fn fixed_stream_produces_offset_ranks() {
  let mut sketch =
    SuperMinHash::with_stream_factory(4, 0, half_stream).unwrap();
  sketch.add(["anything"]).unwrap();
  // Every draw is 0.5, so step p proposes floor(0.5 * MAX_RANK) + p and
  // swaps in position p + (4 - p) / 2; the slots land in order 2, 0, 3, 1.
  let base = (0.5 * f64::from(MAX_RANK)).floor() as u32;
  let expected = vec![base + 1, base + 3, base, base + 2];
  assert_eq!(sketch.signature(), expected);
}

#[test]
fn split_and_reordered_adds_agree() {
  let mut whole = SuperMinHash::new(128, 42).unwrap();
  whole.add(["a", "b", "c", "d"]).unwrap();

  let mut split = SuperMinHash::new(128, 42).unwrap();
  split.add(["d", "b"]).unwrap();
  split.add(["c"]).unwrap();
  split.add(["a", "b"]).unwrap();

  assert_eq!(whole.signature(), split.signature());
}

#[test]
fn values_never_increase() {
  let mut sketch = SuperMinHash::new(64, 3).unwrap();
  let mut previous = sketch.signature();
  for index in 0..50 {
    sketch.add([format!("element-{index}")]).unwrap();
    let current = sketch.signature();
    assert!(current.iter().zip(&previous).all(|(now, before)| now <= before));
    previous = current;
  }
}

#[test]
fn oversized_element_leaves_sketch_untouched() {
  let mut sketch = SuperMinHash::new(32, 42).unwrap();
  sketch.add(["seed"]).unwrap();
  let before = sketch.clone();

  let long = "a".repeat(MAX_INPUT_LENGTH + 1);
  let result = sketch.add(["fresh".to_owned(), long]);
  assert_eq!(
    result,
    Err(SketchError::InputTooLarge {
      length: MAX_INPUT_LENGTH + 1,
      max: MAX_INPUT_LENGTH
    })
  );
  assert_eq!(sketch, before);

  let mut empty = SuperMinHash::new(32, 42).unwrap();
  assert!(empty.add(["b".repeat(MAX_INPUT_LENGTH + 1)]).is_err());
  assert!(empty.is_empty());
}

#[test]
fn input_length_counts_characters() {
  let mut sketch = SuperMinHash::new(8, 42).unwrap();
  // Multi-byte characters: over the byte cap, under the character cap.
  let wide = "é".repeat(MAX_INPUT_LENGTH);
  assert!(sketch.add([wide]).is_ok());
}

#[test]
fn empty_batch_keeps_sketch_empty() {
  let mut sketch = SuperMinHash::new(16, 42).unwrap();
  sketch.add(Vec::<String>::new()).unwrap();
  assert!(sketch.is_empty());
  assert_eq!(sketch.signature(), vec![MAX_RANK; 16]);
}

#[test]
fn add_with_uses_injected_canonicalizer() {
  let mut lowered = SuperMinHash::new(64, 42).unwrap();
  lowered
    .add_with(["Hello", "WORLD"], |token| Ok(token.to_lowercase()))
    .unwrap();
  let plain = SuperMinHash::from_iterable(["hello", "world"], 64, 42).unwrap();
  assert_eq!(lowered.signature(), plain.signature());
}

#[test]
fn failing_canonicalizer_leaves_sketch_untouched() {
  let mut sketch = SuperMinHash::new(32, 42).unwrap();
  sketch.add(["kept"]).unwrap();
  let before = sketch.clone();

  let result = sketch.add_with(["a", "bad", "c"], |token| {
    if *token == "bad" {
      Err(SketchError::Canonicalization(format!("cannot render {token}")))
    } else {
      Ok((*token).to_owned())
    }
  });
  assert_eq!(
    result,
    Err(SketchError::Canonicalization("cannot render bad".to_owned()))
  );
  assert_eq!(sketch, before);

  let mut empty = SuperMinHash::new(32, 42).unwrap();
  let result = empty.add_with(["x"], |_| {
    Err(SketchError::Canonicalization("unsupported".to_owned()))
  });
  assert!(result.is_err());
  assert!(empty.is_empty());
  assert_eq!(empty.signature(), vec![MAX_RANK; 32]);
}

#[test]
fn seed_scopes_the_hash_domain() {
  let a = SuperMinHash::from_iterable(["a", "b"], 64, 1).unwrap();
  let b = SuperMinHash::from_iterable(["a", "b"], 64, 2).unwrap();
  assert_ne!(a.signature(), b.signature());
}

#[test]
fn stream_factories_are_not_interchangeable() {
  let xoshiro = SuperMinHash::from_iterable(["a", "b"], 64, 1).unwrap();
  let mut chacha =
    SuperMinHash::with_stream_factory(64, 1, chacha_stream).unwrap();
  chacha.add(["a", "b"]).unwrap();
  assert_ne!(xoshiro.signature(), chacha.signature());

  let mut switched = SuperMinHash::new(64, 1).unwrap();
  switched.set_stream_factory(xoshiro_stream);
  switched.add(["a", "b"]).unwrap();
  assert_eq!(switched, xoshiro);
}

#[test]
fn raw_signature_construction_rejects_empty_input() {
  assert!(matches!(
    SuperMinHash::from_raw_signature(&[], 42, false),
    Err(SketchError::Construction(_))
  ));
  let sketch = SuperMinHash::from_raw_signature(&[3; 4], 42, true).unwrap();
  assert!(sketch.is_empty());
  assert_eq!(sketch.signature_size(), 4);
}
