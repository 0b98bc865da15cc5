use crate::marshal::{HostMut, HostRef, Reflect, Shape, TypeDesc};

/// Open value: accepts every decodable runtime kind and encodes like its content.
///
/// Numbers decoded into an open value always become [`AnyValue::Float`].
/// Byte content decoded element-wise into `Vec<AnyValue>` uses [`AnyValue::Byte`].
#[derive(Debug, Clone, Default, PartialEq)]
pub enum AnyValue {
	/// No value.
	#[default]
	Nil,
	/// Boolean.
	Bool(bool),
	/// Single byte.
	Byte(u8),
	/// Signed integer.
	Int(i64),
	/// Unsigned integer.
	Uint(u64),
	/// Float.
	Float(f64),
	/// Text.
	String(String),
	/// Byte content.
	Bytes(Vec<u8>),
	/// Ordered items.
	Seq(Vec<AnyValue>),
	/// Key/value entries in insertion order.
	Map(Vec<(AnyValue, AnyValue)>),
}

impl AnyValue {
	/// Whether this is [`AnyValue::Nil`].
	pub fn is_nil(&self) -> bool {
		matches!(self, Self::Nil)
	}

	/// Text content when this is a string.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(text) => Some(text),
			_ => None,
		}
	}

	/// Value stored under a string key of a map.
	pub fn get(&self, key: &str) -> Option<&AnyValue> {
		match self {
			Self::Map(entries) => entries.iter().find(|(k, _)| k.as_str() == Some(key)).map(|(_, v)| v),
			_ => None,
		}
	}
}

impl From<&str> for AnyValue {
	fn from(value: &str) -> Self {
		Self::String(value.to_owned())
	}
}

impl From<String> for AnyValue {
	fn from(value: String) -> Self {
		Self::String(value)
	}
}

impl From<bool> for AnyValue {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<i64> for AnyValue {
	fn from(value: i64) -> Self {
		Self::Int(value)
	}
}

impl From<f64> for AnyValue {
	fn from(value: f64) -> Self {
		Self::Float(value)
	}
}

impl Reflect for AnyValue {
	fn describe() -> TypeDesc {
		TypeDesc::of::<Self>(Shape::Any)
	}

	fn type_desc(&self) -> TypeDesc {
		Self::describe()
	}

	fn reflect(&self) -> HostRef<'_> {
		match self {
			Self::Nil => HostRef::Nil,
			Self::Bool(v) => HostRef::Bool(*v),
			Self::Byte(v) => HostRef::U8(*v),
			Self::Int(v) => HostRef::I64(*v),
			Self::Uint(v) => HostRef::U64(*v),
			Self::Float(v) => HostRef::F64(*v),
			Self::String(v) => HostRef::Str(v),
			Self::Bytes(v) => HostRef::Bytes(v),
			Self::Seq(items) => HostRef::Seq(Box::new(items.iter().map(|item| item as &dyn Reflect))),
			Self::Map(entries) => HostRef::Map(Box::new(entries.iter().map(|(k, v)| (k as &dyn Reflect, v as &dyn Reflect)))),
		}
	}

	fn reflect_mut(&mut self) -> HostMut<'_> {
		HostMut::Any(self)
	}
}
