use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, OnceLock, PoisonError};

/// Bit width of a numeric host type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
	/// 8 bits.
	W8,
	/// 16 bits.
	W16,
	/// 32 bits.
	W32,
	/// 64 bits.
	W64,
	/// Pointer width of the running platform.
	Native,
}

impl Width {
	/// Resolve [`Width::Native`] to the platform's actual width.
	pub fn resolve(self) -> Self {
		match self {
			Self::Native if usize::BITS == 32 => Self::W32,
			Self::Native => Self::W64,
			other => other,
		}
	}
}

/// Structural shape of a host type.
///
/// Child descriptors are function pointers so recursive types can be
/// described without building an infinite tree.
#[derive(Debug, Clone, Copy)]
pub enum Shape {
	/// Unit-like absence.
	Nil,
	/// `bool`.
	Bool,
	/// Signed integer.
	Int(Width),
	/// Unsigned integer.
	Uint(Width),
	/// Floating point.
	Float(Width),
	/// Owned or borrowed text.
	String,
	/// Optional or owning pointer to a single pointee.
	Pointer(fn() -> TypeDesc),
	/// Fixed-length array.
	Array {
		/// Element count.
		len: usize,
		/// Element type.
		elem: fn() -> TypeDesc,
	},
	/// Growable sequence.
	Seq(fn() -> TypeDesc),
	/// Keyed mapping.
	Map {
		/// Key type.
		key: fn() -> TypeDesc,
		/// Value type.
		value: fn() -> TypeDesc,
	},
	/// Record with named fields.
	Record(&'static FieldTable),
	/// Open value that accepts any runtime kind.
	Any,
	/// Closed trait object.
	Interface,
	/// Type with no structural representation.
	Opaque,
}

/// Descriptor of a host type: its identity, name and [`Shape`].
///
/// Borrowed types are described by their `'static` form.
#[derive(Clone, Copy)]
pub struct TypeDesc {
	id: TypeId,
	name: &'static str,
	shape: Shape,
}

impl TypeDesc {
	/// Build a descriptor for `T`.
	pub fn of<T: ?Sized + 'static>(shape: Shape) -> Self {
		Self {
			id: TypeId::of::<T>(),
			name: std::any::type_name::<T>(),
			shape,
		}
	}

	/// Identity of the described type.
	pub fn type_id(&self) -> TypeId {
		self.id
	}

	/// Fully qualified type name.
	pub fn name(&self) -> &'static str {
		self.name
	}

	/// Structural shape.
	pub fn shape(&self) -> Shape {
		self.shape
	}

	/// Element type of pointers, arrays and sequences.
	pub fn elem(&self) -> Option<TypeDesc> {
		match self.shape {
			Shape::Pointer(elem) | Shape::Seq(elem) | Shape::Array { elem, .. } => Some(elem()),
			_ => None,
		}
	}

	/// Field table of records.
	pub fn fields(&self) -> Option<&'static FieldTable> {
		match self.shape {
			Shape::Record(table) => Some(table),
			_ => None,
		}
	}

	/// Whether this is the single-byte unsigned type.
	pub fn is_byte(&self) -> bool {
		matches!(self.shape, Shape::Uint(Width::W8))
	}

	/// Whether this is the open value type.
	pub fn is_any(&self) -> bool {
		matches!(self.shape, Shape::Any)
	}
}

impl PartialEq for TypeDesc {
	fn eq(&self, other: &Self) -> bool {
		self.id == other.id
	}
}

impl Eq for TypeDesc {}

impl fmt::Debug for TypeDesc {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "TypeDesc({})", self.name)
	}
}

impl fmt::Display for TypeDesc {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name)
	}
}

/// Metadata of one record field.
#[derive(Debug, Clone, Copy)]
pub struct FieldMeta {
	/// Declared field identifier.
	pub ident: &'static str,
	/// Name override; `"-"` excludes the field.
	pub tag: Option<&'static str>,
	/// Whether the field is declared with any `pub` visibility.
	pub visible: bool,
}

/// Tag value that excludes a field from encode and decode.
pub const EXCLUDE_TAG: &str = "-";

impl FieldMeta {
	/// Mapping key for this field, or `None` when the field is excluded.
	pub fn key(&self) -> Option<&'static str> {
		match self.tag {
			Some(EXCLUDE_TAG) => None,
			Some(tag) if !tag.is_empty() => Some(tag),
			_ => Some(self.ident),
		}
	}

	/// Whether the field takes part in encode and decode.
	pub fn is_active(&self) -> bool {
		self.visible && self.key().is_some()
	}
}

/// Field metadata of a record type, in declaration order.
#[derive(Debug)]
pub struct FieldTable {
	fields: Vec<FieldMeta>,
}

static TABLES: OnceLock<Mutex<HashMap<TypeId, &'static FieldTable>>> = OnceLock::new();

impl FieldTable {
	/// Shared table for `T`, built by `build` on first use.
	pub fn of<T: 'static>(build: impl FnOnce() -> Vec<FieldMeta>) -> &'static FieldTable {
		let id = TypeId::of::<T>();
		let mut tables = TABLES.get_or_init(Default::default).lock().unwrap_or_else(PoisonError::into_inner);

		// `build` only records field metadata and must not describe other types.
		*tables.entry(id).or_insert_with(|| &*Box::leak(Box::new(FieldTable { fields: build() })))
	}

	/// All fields, including inactive ones.
	pub fn fields(&self) -> &[FieldMeta] {
		&self.fields
	}

	/// Active fields in declaration order, each with its mapping key.
	pub fn active(&self) -> impl Iterator<Item = (&FieldMeta, &'static str)> + '_ {
		self.fields
			.iter()
			.filter(|field| field.visible)
			.filter_map(|field| field.key().map(|key| (field, key)))
	}

	/// Number of declared fields.
	pub fn len(&self) -> usize {
		self.fields.len()
	}

	/// Whether the record declares no fields.
	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}
}
