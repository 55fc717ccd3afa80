use crate::config::{DEFAULT_SEED, DEFAULT_SIGNATURE_SIZE};
use crate::error::SketchError;
use crate::superminhash::SuperMinHash;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::{PyBytes, PyType};

impl From<SketchError> for PyErr {
  fn from(err: SketchError) -> Self {
    PyValueError::new_err(err.to_string())
  }
}

type ReduceResult = (Py<PyAny>, (usize, u32), Py<PyAny>);

#[pymethods]
impl SuperMinHash {
  /// Creates an empty `SuperMinHash`.
  ///
  /// # Errors
  ///
  /// Returns an error when `signature_size` is zero.
  #[new]
  #[pyo3(signature = (signature_size=DEFAULT_SIGNATURE_SIZE, seed=DEFAULT_SEED))]
  fn py_new(signature_size: usize, seed: u32) -> PyResult<Self> {
    Ok(Self::new(signature_size, seed)?)
  }

  /// Builds a sketch from string tokens in one call.
  #[classmethod]
  #[pyo3(name = "from_iterable", signature = (items, signature_size=DEFAULT_SIGNATURE_SIZE, seed=DEFAULT_SEED))]
  fn py_from_iterable(
    _cls: &Bound<'_, PyType>,
    items: Vec<String>,
    signature_size: usize,
    seed: u32,
  ) -> PyResult<Self> {
    Ok(Self::from_iterable(items, signature_size, seed)?)
  }

  #[classmethod]
  #[pyo3(name = "from_raw_signature", signature = (signature, seed, empty=false))]
  fn py_from_raw_signature(
    _cls: &Bound<'_, PyType>,
    signature: Vec<u32>,
    seed: u32,
    empty: bool,
  ) -> PyResult<Self> {
    Ok(Self::from_raw_signature(&signature, seed, empty)?)
  }

  /// Adds string tokens to the sketch.
  #[pyo3(name = "add")]
  fn py_add(&mut self, items: Vec<String>) -> PyResult<()> {
    Ok(self.add(items)?)
  }

  #[pyo3(name = "similarity")]
  fn py_similarity(&self, other: &Self) -> PyResult<f64> {
    Ok(self.similarity(other)?)
  }

  #[pyo3(name = "jaccard")]
  fn py_jaccard(&self, other: &Self) -> PyResult<f64> {
    Ok(self.jaccard_index(other)?)
  }

  #[pyo3(name = "merge")]
  fn py_merge(&mut self, other: &Self) -> PyResult<()> {
    Ok(self.merge(other)?)
  }

  fn digest(&self) -> Vec<u32> {
    self.signature()
  }

  #[pyo3(name = "is_empty")]
  const fn py_is_empty(&self) -> bool {
    self.empty
  }

  #[getter]
  const fn get_signature_size(&self) -> usize {
    self.signature_size
  }

  #[getter]
  const fn get_seed(&self) -> u32 {
    self.seed
  }

  #[pyo3(name = "serialize")]
  fn py_serialize<'py>(&self, py: Python<'py>) -> Bound<'py, PyBytes> {
    PyBytes::new(py, &self.serialize())
  }

  #[classmethod]
  #[pyo3(name = "deserialize")]
  fn py_deserialize(_cls: &Bound<'_, PyType>, data: &[u8]) -> PyResult<Self> {
    Ok(Self::deserialize(data)?)
  }

  #[classmethod]
  #[pyo3(name = "compare_serialized")]
  fn py_compare_serialized(
    _cls: &Bound<'_, PyType>,
    first: &[u8],
    second: &[u8],
  ) -> PyResult<f64> {
    Ok(Self::compare_serialized(first, second)?)
  }

  fn __setstate__(&mut self, state: &Bound<'_, PyBytes>) -> PyResult<()> {
    *self = Self::deserialize(state.as_bytes())?;
    Ok(())
  }

  fn __getstate__<'py>(&self, py: Python<'py>) -> Bound<'py, PyBytes> {
    PyBytes::new(py, &self.serialize())
  }

  const fn __getnewargs__(&self) -> (usize, u32) {
    (self.signature_size, self.seed)
  }

  fn __reduce__(&self) -> PyResult<ReduceResult> {
    Python::with_gil(|py| {
      let type_obj = py.get_type::<Self>().into_any().unbind();
      let state = self.__getstate__(py).into_any().unbind();
      Ok((type_obj, (self.signature_size, self.seed), state))
    })
  }

  fn __len__(&self) -> usize {
    self.signature_size
  }

  fn __repr__(&self) -> String {
    format!(
      "SuperMinHash(signature_size={}, seed={}, empty={})",
      self.signature_size, self.seed, self.empty
    )
  }
}
