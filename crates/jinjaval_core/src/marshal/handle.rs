use std::fmt;

use minijinja::Value;

use crate::marshal::{DynIter, DynPairs, Kind, Result};

/// Owned handle on a reference-counted runtime value.
///
/// Each handle holds one reference. Dropping the handle (or calling
/// [`DynValue::release`]) gives it back; cloning takes a new one.
#[derive(Clone, PartialEq)]
pub struct DynValue {
	inner: Value,
}

impl DynValue {
	/// `none` value.
	pub fn none() -> Self {
		Self { inner: Value::from(()) }
	}

	/// `undefined` value.
	pub fn undefined() -> Self {
		Self { inner: Value::UNDEFINED }
	}

	/// `bool` value.
	pub fn from_bool(v: bool) -> Self {
		Self { inner: Value::from(v) }
	}

	/// 32-bit signed `number`.
	pub fn from_i32(v: i32) -> Self {
		Self { inner: Value::from(v) }
	}

	/// 64-bit signed `number`.
	pub fn from_i64(v: i64) -> Self {
		Self { inner: Value::from(v) }
	}

	/// 32-bit unsigned `number`.
	pub fn from_u32(v: u32) -> Self {
		Self { inner: Value::from(v) }
	}

	/// 64-bit unsigned `number`.
	pub fn from_u64(v: u64) -> Self {
		Self { inner: Value::from(v) }
	}

	/// 32-bit float `number`.
	pub fn from_f32(v: f32) -> Self {
		Self { inner: Value::from(v) }
	}

	/// 64-bit float `number`.
	pub fn from_f64(v: f64) -> Self {
		Self { inner: Value::from(v) }
	}

	/// `string` value.
	pub fn from_string(v: &str) -> Self {
		Self { inner: Value::from(v) }
	}

	/// `bytes` value holding a copy of `v`.
	pub fn from_bytes(v: &[u8]) -> Self {
		Self {
			inner: Value::from_bytes(v.to_vec()),
		}
	}

	/// Wrap a value produced by the runtime.
	pub fn from_runtime(inner: Value) -> Self {
		Self { inner }
	}

	/// Borrow the underlying runtime value.
	pub fn as_runtime(&self) -> &Value {
		&self.inner
	}

	/// Unwrap into the underlying runtime value, transferring the reference.
	pub fn into_runtime(self) -> Value {
		self.inner
	}

	/// Shape of this value.
	pub fn kind(&self) -> Kind {
		self.inner.kind().into()
	}

	/// Length of strings, sequences and mappings.
	pub fn len(&self) -> Option<usize> {
		self.inner.len()
	}

	/// Whether [`DynValue::len`] reports zero.
	pub fn is_empty(&self) -> bool {
		self.len() == Some(0)
	}

	/// Truthiness as the runtime defines it.
	pub fn is_true(&self) -> bool {
		self.inner.is_true()
	}

	/// Raw content of `bytes` values and the UTF-8 content of `string` values.
	pub fn as_bytes(&self) -> Option<&[u8]> {
		self.inner.as_bytes()
	}

	/// Content of `string` values.
	pub fn as_str(&self) -> Option<&str> {
		self.inner.as_str()
	}

	/// Item at `index` of a sequence.
	pub fn get_by_index(&self, index: usize) -> Result<DynValue> {
		Ok(Self::from_runtime(self.inner.get_item_by_index(index)?))
	}

	/// Attribute or string-keyed item. A miss yields `undefined`.
	pub fn get_by_str(&self, key: &str) -> Result<DynValue> {
		Ok(Self::from_runtime(self.inner.get_attr(key)?))
	}

	/// Item looked up by an arbitrary key value. A miss yields `undefined`.
	pub fn get_by_value(&self, key: &DynValue) -> Result<DynValue> {
		Ok(Self::from_runtime(self.inner.get_item(&key.inner)?))
	}

	/// Iterate elements of sequences and iterables, or keys of mappings.
	pub fn try_iter(&self) -> Result<DynIter> {
		DynIter::new(self)
	}

	/// Iterate key/value pairs of a mapping.
	pub fn try_pairs(&self) -> Result<DynPairs> {
		DynPairs::new(self.clone())
	}

	/// Give back the reference held by this handle.
	pub fn release(self) {
		tracing::trace!(kind = %self.kind(), "releasing runtime value");
		drop(self);
	}
}

impl Default for DynValue {
	fn default() -> Self {
		Self::undefined()
	}
}

impl fmt::Display for DynValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Display::fmt(&self.inner, f)
	}
}

impl fmt::Debug for DynValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Debug::fmt(&self.inner, f)
	}
}

impl From<Value> for DynValue {
	fn from(inner: Value) -> Self {
		Self::from_runtime(inner)
	}
}

/// Accumulates items for a new `seq` value.
#[derive(Default)]
pub struct SeqBuilder {
	items: Vec<Value>,
}

impl SeqBuilder {
	/// Builder with room for `capacity` items.
	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			items: Vec::with_capacity(capacity),
		}
	}

	/// Append an item, taking over its reference.
	pub fn push(&mut self, item: DynValue) {
		self.items.push(item.into_runtime());
	}

	/// Finish into a `seq` value.
	pub fn finish(self) -> DynValue {
		DynValue::from_runtime(Value::from(self.items))
	}
}

/// Accumulates entries for a new `map` value; insertion order is kept.
#[derive(Default)]
pub struct MapBuilder {
	entries: Vec<(Value, Value)>,
}

impl MapBuilder {
	/// Add an entry, taking over both references.
	pub fn insert(&mut self, key: DynValue, value: DynValue) {
		self.entries.push((key.into_runtime(), value.into_runtime()));
	}

	/// Finish into a `map` value. Later duplicates of a key win.
	pub fn finish(self) -> DynValue {
		DynValue::from_runtime(Value::from_iter(self.entries))
	}
}

#[cfg(test)]
mod tests;
