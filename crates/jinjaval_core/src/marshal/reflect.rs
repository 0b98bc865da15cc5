use crate::marshal::{AnyValue, MarshalText, Result, TypeDesc, UnmarshalBinary, UnmarshalText};

mod impls;

/// Host type that can be encoded to and decoded from runtime values.
///
/// Records get this through `#[derive(Reflect)]`; std scalars, strings,
/// containers and pointers are covered by blanket impls.
pub trait Reflect {
	/// Static descriptor of the implementing type.
	fn describe() -> TypeDesc
	where
		Self: Sized;

	/// Descriptor of this value's type.
	fn type_desc(&self) -> TypeDesc;

	/// Read view used by the encoder.
	fn reflect(&self) -> HostRef<'_>;

	/// Write view used by the decoder.
	fn reflect_mut(&mut self) -> HostMut<'_>;

	/// Text decoding hook, consulted before `string` and `plain` values are assigned.
	fn text_hook(&mut self) -> Option<&mut dyn UnmarshalText> {
		None
	}

	/// Binary decoding hook, consulted before `bytes` values are copied.
	fn binary_hook(&mut self) -> Option<&mut dyn UnmarshalBinary> {
		None
	}

	/// Text encoding hook, consulted before anything else on encode.
	fn marshal_hook(&self) -> Option<&dyn MarshalText> {
		None
	}
}

/// Read view of a host value.
pub enum HostRef<'a> {
	/// Absence.
	Nil,
	/// `bool`.
	Bool(bool),
	/// `i8`.
	I8(i8),
	/// `i16`.
	I16(i16),
	/// `i32`.
	I32(i32),
	/// `i64`.
	I64(i64),
	/// `isize`.
	Isize(isize),
	/// `u8`.
	U8(u8),
	/// `u16`.
	U16(u16),
	/// `u32`.
	U32(u32),
	/// `u64`.
	U64(u64),
	/// `usize`.
	Usize(usize),
	/// `f32`.
	F32(f32),
	/// `f64`.
	F64(f64),
	/// Text.
	Str(&'a str),
	/// Byte content held contiguously.
	Bytes(&'a [u8]),
	/// Array or sequence elements in order.
	Seq(Box<dyn Iterator<Item = &'a dyn Reflect> + 'a>),
	/// Map entries in the map's iteration order.
	Map(Box<dyn Iterator<Item = (&'a dyn Reflect, &'a dyn Reflect)> + 'a>),
	/// Active record fields in declaration order, matching [`FieldTable::active`](crate::marshal::FieldTable::active).
	Record(Box<dyn Iterator<Item = &'a dyn Reflect> + 'a>),
	/// Pointee, or `None` for a nil pointer.
	Pointer(Option<&'a dyn Reflect>),
	/// No runtime representation.
	Unsupported,
}

/// Write view of a host location.
pub enum HostMut<'a> {
	/// `bool`.
	Bool(&'a mut bool),
	/// `i8`.
	I8(&'a mut i8),
	/// `i16`.
	I16(&'a mut i16),
	/// `i32`.
	I32(&'a mut i32),
	/// `i64`.
	I64(&'a mut i64),
	/// `isize`.
	Isize(&'a mut isize),
	/// `u8`.
	U8(&'a mut u8),
	/// `u16`.
	U16(&'a mut u16),
	/// `u32`.
	U32(&'a mut u32),
	/// `u64`.
	U64(&'a mut u64),
	/// `usize`.
	Usize(&'a mut usize),
	/// `f32`.
	F32(&'a mut f32),
	/// `f64`.
	F64(&'a mut f64),
	/// Owned text.
	Str(&'a mut String),
	/// Fixed-length array.
	Array(&'a mut dyn ArrayMut),
	/// Growable sequence.
	Seq(&'a mut dyn SeqMut),
	/// Keyed mapping.
	Map(&'a mut dyn MapMut),
	/// Active record fields in declaration order, matching [`FieldTable::active`](crate::marshal::FieldTable::active).
	Record(Box<dyn Iterator<Item = &'a mut dyn Reflect> + 'a>),
	/// Optional or owning pointer.
	Pointer(&'a mut dyn PointerMut),
	/// Open value.
	Any(&'a mut AnyValue),
	/// Not writable from any runtime kind.
	Unsupported,
}

/// Fixed-length array accessed element-wise.
pub trait ArrayMut {
	/// Element count.
	fn len(&self) -> usize;
	/// Element type.
	fn elem_desc(&self) -> TypeDesc;
	/// Element at `index`.
	fn elem_mut(&mut self, index: usize) -> Option<&mut dyn Reflect>;
	/// Reset element at `index` to its default.
	fn zero(&mut self, index: usize);
}

/// Growable sequence accessed element-wise.
pub trait SeqMut {
	/// Current length.
	fn len(&self) -> usize;
	/// Allocated capacity; zero means unallocated.
	fn capacity(&self) -> usize;
	/// Element type.
	fn elem_desc(&self) -> TypeDesc;
	/// Truncate or extend with default elements.
	fn resize(&mut self, len: usize);
	/// Reserve room for exactly `additional` more elements.
	fn reserve_exact(&mut self, additional: usize);
	/// Element at `index`.
	fn elem_mut(&mut self, index: usize) -> Option<&mut dyn Reflect>;
}

/// Entry filler handed to [`MapMut::insert_with`].
pub type FillEntry<'f> = &'f mut dyn FnMut(&mut dyn Reflect, &mut dyn Reflect) -> Result<()>;

/// Keyed mapping that accepts new entries.
pub trait MapMut {
	/// Entry count.
	fn len(&self) -> usize;
	/// Fill a default key and value through `fill`, then insert them, replacing an equal key.
	fn insert_with(&mut self, fill: FillEntry<'_>) -> Result<()>;
}

/// Pointer that can be allocated and written through.
pub trait PointerMut {
	/// Whether no pointee is allocated.
	fn is_nil(&self) -> bool;
	/// Whether the pointee can be written.
	fn is_settable(&self) -> bool;
	/// Pointee, allocating a default one first when nil; `None` when the pointee is shared.
	fn pointee_mut(&mut self) -> Option<&mut dyn Reflect>;
}
