use std::fmt;

use minijinja::value::ValueKind;

/// Shape tag of a runtime value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
	/// Value that was never defined.
	Undefined,
	/// Explicit absence.
	None,
	/// Boolean.
	Bool,
	/// Integer or float.
	Number,
	/// Text.
	String,
	/// Raw byte content.
	Bytes,
	/// Ordered sequence.
	Sequence,
	/// Keyed mapping.
	Mapping,
	/// Iterable object that is not a plain sequence.
	Iterable,
	/// Opaque object, decoded like a string.
	Plain,
	/// Value the runtime flagged as invalid.
	Invalid,
}

impl Kind {
	/// Render kind as a stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Undefined => "undefined",
			Self::None => "none",
			Self::Bool => "bool",
			Self::Number => "number",
			Self::String => "string",
			Self::Bytes => "bytes",
			Self::Sequence => "seq",
			Self::Mapping => "map",
			Self::Iterable => "iterable",
			Self::Plain => "plain",
			Self::Invalid => "invalid",
		}
	}

	/// Whether decoding this kind is a no-op.
	pub fn is_absent(self) -> bool {
		matches!(self, Self::Undefined | Self::None)
	}
}

impl fmt::Display for Kind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl From<ValueKind> for Kind {
	fn from(kind: ValueKind) -> Self {
		match kind {
			ValueKind::Undefined => Self::Undefined,
			ValueKind::None => Self::None,
			ValueKind::Bool => Self::Bool,
			ValueKind::Number => Self::Number,
			ValueKind::String => Self::String,
			ValueKind::Bytes => Self::Bytes,
			ValueKind::Seq => Self::Sequence,
			ValueKind::Map => Self::Mapping,
			ValueKind::Iterable => Self::Iterable,
			ValueKind::Plain => Self::Plain,
			ValueKind::Invalid => Self::Invalid,
			#[allow(unreachable_patterns)]
			_ => Self::Invalid,
		}
	}
}
