//! Error types shared by sketch construction, hashing, comparison and the
//! binary codec.

use thiserror::Error;

/// Errors raised by `SuperMinHash` operations.
///
/// Every operation validates its input before touching any state, so an
/// error never leaves a sketch partially updated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SketchError {
  #[error("Signature size must be a positive integer: {0}")]
  Construction(String),

  #[error("Failed to canonicalize element: {0}")]
  Canonicalization(String),

  #[error("Input exceeds maximum length of {max} characters (got {length})")]
  InputTooLarge { length: usize, max: usize },

  #[error("Cannot compare signatures generated with different seeds ({left} vs {right})")]
  SeedMismatch { left: u32, right: u32 },

  #[error("Can only compare signatures of the same size ({left} vs {right})")]
  SizeMismatch { left: usize, right: usize },

  #[error("Invalid binary data: too short ({length} bytes)")]
  TooShort { length: usize },

  #[error("Invalid binary data: signature size must be positive")]
  InvalidSize,

  #[error("Invalid binary data: expected length {expected}, got {actual}")]
  LengthMismatch { expected: usize, actual: usize },

  #[error("Invalid configuration: {0}")]
  InvalidConfig(String),
}

/// Result alias for sketch operations.
pub type Result<T> = std::result::Result<T, SketchError>;
