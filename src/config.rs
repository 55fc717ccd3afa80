//! Sketch parameters and their validation.

use crate::error::{Result, SketchError};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SIGNATURE_SIZE: usize = 256;
pub const DEFAULT_SEED: u32 = 42;

pub const SIGNATURE_SIZE_ENV: &str = "SUPERMINHASH_SIGNATURE_SIZE";
pub const SEED_ENV: &str = "SUPERMINHASH_SEED";

/// Size and seed of a sketch. Two sketches are comparable only when both
/// fields match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SketchConfig {
  pub signature_size: usize,
  pub seed: u32,
}

impl Default for SketchConfig {
  fn default() -> Self {
    Self {
      signature_size: DEFAULT_SIGNATURE_SIZE,
      seed: DEFAULT_SEED,
    }
  }
}

impl SketchConfig {
  #[must_use]
  pub const fn new(signature_size: usize, seed: u32) -> Self {
    Self {
      signature_size,
      seed,
    }
  }

  /// Reads `SUPERMINHASH_SIGNATURE_SIZE` and `SUPERMINHASH_SEED`, falling
  /// back to the defaults for unset variables.
  ///
  /// # Errors
  ///
  /// Returns an error when a variable is set to an invalid value.
  pub fn from_env() -> Result<Self> {
    Self::from_lookup(crate::env::read_env_trimmed)
  }

  /// Same as [`SketchConfig::from_env`] but reads values through `lookup`.
  ///
  /// # Errors
  ///
  /// Returns an error when a looked-up value is invalid.
  pub fn from_lookup<F>(lookup: F) -> Result<Self>
  where
    F: Fn(&str) -> Option<String>,
  {
    let mut config = Self::default();
    if let Some(raw) = lookup(SIGNATURE_SIZE_ENV) {
      config.signature_size = parse_signature_size(&raw)?;
    }
    if let Some(raw) = lookup(SEED_ENV) {
      config.seed = parse_seed(&raw)?;
    }
    Ok(config)
  }

  /// # Errors
  ///
  /// Returns `SketchError::Construction` for an unusable signature size.
  pub fn validate(&self) -> Result<()> {
    validate_signature_size(self.signature_size).map(|_| ())
  }
}

/// Accepts sizes in `1..=u32::MAX`; the upper bound keeps every sketch
/// representable in the binary layout.
///
/// # Errors
///
/// Returns `SketchError::Construction` for zero or oversized values.
pub fn validate_signature_size(signature_size: usize) -> Result<usize> {
  if signature_size == 0 {
    return Err(SketchError::Construction(
      "signature size must be greater than 0".to_owned(),
    ));
  }
  if u32::try_from(signature_size).is_err() {
    return Err(SketchError::Construction(format!(
      "signature size {signature_size} exceeds {}",
      u32::MAX
    )));
  }
  Ok(signature_size)
}

/// Parses a textual signature size, rejecting zero, negative and
/// non-integer values.
///
/// # Errors
///
/// Returns `SketchError::Construction` when `raw` is not a positive integer.
pub fn parse_signature_size(raw: &str) -> Result<usize> {
  let trimmed = raw.trim();
  let parsed = trimmed.parse::<i64>().map_err(|_| {
    SketchError::Construction(format!("{trimmed:?} is not an integer"))
  })?;
  if parsed <= 0 {
    return Err(SketchError::Construction(format!(
      "{parsed} is not positive"
    )));
  }
  let size = usize::try_from(parsed).map_err(|_| {
    SketchError::Construction(format!("{parsed} does not fit in usize"))
  })?;
  validate_signature_size(size)
}

/// # Errors
///
/// Returns `SketchError::InvalidConfig` when `raw` is not a `u32`.
pub fn parse_seed(raw: &str) -> Result<u32> {
  let trimmed = raw.trim();
  trimmed.parse::<u32>().map_err(|_| {
    SketchError::InvalidConfig(format!("seed {trimmed:?} is not a u32"))
  })
}
