use minijinja::value::ValueIter;

use crate::marshal::{DynValue, Result};

/// Lazy, single-pass iterator over a runtime value.
///
/// Yields elements of sequences and iterables and keys of mappings. The
/// runtime iterator is released when this is dropped, exhausted or not.
pub struct DynIter {
	inner: ValueIter,
	len: Option<usize>,
}

impl DynIter {
	pub(crate) fn new(value: &DynValue) -> Result<Self> {
		let inner = value.as_runtime().try_iter()?;
		Ok(Self { inner, len: value.len() })
	}

	/// Element count reported by the source, when known.
	pub fn len_hint(&self) -> Option<usize> {
		self.len
	}
}

impl Iterator for DynIter {
	type Item = DynValue;

	fn next(&mut self) -> Option<DynValue> {
		self.inner.next().map(DynValue::from_runtime)
	}
}

/// Key/value pairs of a mapping, values fetched by keyed lookup.
pub struct DynPairs {
	source: DynValue,
	keys: DynIter,
}

impl DynPairs {
	pub(crate) fn new(source: DynValue) -> Result<Self> {
		let keys = source.try_iter()?;
		Ok(Self { source, keys })
	}
}

impl Iterator for DynPairs {
	type Item = Result<(DynValue, DynValue)>;

	fn next(&mut self) -> Option<Self::Item> {
		let key = self.keys.next()?;
		Some(self.source.get_by_value(&key).map(|value| (key, value)))
	}
}
