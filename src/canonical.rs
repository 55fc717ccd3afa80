//! Canonical string forms for hashable elements.
//!
//! Every element is reduced to a string before it seeds the per-element
//! random stream. Strings are used verbatim; everything else is rendered as
//! compact JSON. Rendering is order-sensitive: struct fields follow their
//! declaration order and map keys their insertion order, so two maps
//! holding the same entries in a different order produce different strings
//! and count as different elements.

use crate::error::{Result, SketchError};
use serde::Serialize;
use serde_json::Value;
use std::borrow::Cow;

/// Maps a structured value to a deterministic string.
pub trait Canonicalize {
  fn canonical_form(&self) -> Cow<'_, str>;
}

impl Canonicalize for str {
  #[inline]
  fn canonical_form(&self) -> Cow<'_, str> {
    Cow::Borrowed(self)
  }
}

impl Canonicalize for String {
  #[inline]
  fn canonical_form(&self) -> Cow<'_, str> {
    Cow::Borrowed(self.as_str())
  }
}

impl Canonicalize for bool {
  fn canonical_form(&self) -> Cow<'_, str> {
    Cow::Borrowed(if *self { "true" } else { "false" })
  }
}

macro_rules! canonicalize_integer {
  ($($ty:ty),* $(,)?) => {
    $(
      impl Canonicalize for $ty {
        fn canonical_form(&self) -> Cow<'_, str> {
          Cow::Owned(self.to_string())
        }
      }
    )*
  };
}

canonicalize_integer!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl Canonicalize for f64 {
  // Non-finite values render as `null`, same as any JSON encoder.
  fn canonical_form(&self) -> Cow<'_, str> {
    Cow::Owned(Value::from(*self).to_string())
  }
}

impl Canonicalize for f32 {
  fn canonical_form(&self) -> Cow<'_, str> {
    Cow::Owned(Value::from(*self).to_string())
  }
}

impl Canonicalize for Value {
  fn canonical_form(&self) -> Cow<'_, str> {
    match self {
      Value::String(text) => Cow::Borrowed(text.as_str()),
      other => Cow::Owned(other.to_string()),
    }
  }
}

impl<T: Canonicalize + ?Sized> Canonicalize for &T {
  #[inline]
  fn canonical_form(&self) -> Cow<'_, str> {
    (**self).canonical_form()
  }
}

/// Renders any serde-serializable value as compact JSON.
///
/// # Errors
///
/// Returns `SketchError::Canonicalization` when the value cannot be
/// represented as JSON (for example a map with non-string keys).
pub fn canonical_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
  let rendered = serde_json::to_string(value)
    .map_err(|err| SketchError::Canonicalization(err.to_string()))?;
  // A serialized string is unwrapped so it matches the bare-string form.
  if rendered.starts_with('"') {
    return serde_json::from_str::<String>(&rendered)
      .map_err(|err| SketchError::Canonicalization(err.to_string()));
  }
  Ok(rendered)
}
