use tracing::{debug, trace};

use crate::marshal::{DynValue, HostRef, MapBuilder, MarshalError, Reflect, Result, SeqBuilder, TypeDesc};

/// Encode a host value into a runtime value.
///
/// Encoding is depth-first and stops at the first failure; values built
/// before the failure are released on the way out.
pub fn encode(value: &dyn Reflect) -> Result<DynValue> {
	let ty = value.type_desc();

	if let Some(hook) = value.marshal_hook() {
		let text = hook.marshal_text().map_err(|source| MarshalError::TextHook {
			hook: "marshal_text",
			ty,
			source,
		})?;
		return Ok(DynValue::from_string(&text));
	}

	match value.reflect() {
		HostRef::Nil | HostRef::Pointer(None) => Ok(DynValue::none()),
		HostRef::Bool(v) => Ok(DynValue::from_bool(v)),
		HostRef::I8(v) => Ok(DynValue::from_i32(v.into())),
		HostRef::I16(v) => Ok(DynValue::from_i32(v.into())),
		HostRef::I32(v) => Ok(DynValue::from_i32(v)),
		HostRef::I64(v) => Ok(DynValue::from_i64(v)),
		HostRef::Isize(v) => Ok(encode_isize(v)),
		HostRef::U8(v) => Ok(DynValue::from_u32(v.into())),
		HostRef::U16(v) => Ok(DynValue::from_u32(v.into())),
		HostRef::U32(v) => Ok(DynValue::from_u32(v)),
		HostRef::U64(v) => Ok(DynValue::from_u64(v)),
		HostRef::Usize(v) => Ok(encode_usize(v)),
		HostRef::F32(v) => Ok(DynValue::from_f32(v)),
		HostRef::F64(v) => Ok(DynValue::from_f64(v)),
		HostRef::Str(v) => Ok(DynValue::from_string(v)),
		HostRef::Bytes(v) => Ok(DynValue::from_bytes(v)),
		HostRef::Seq(items) => encode_seq(items),
		HostRef::Map(entries) => encode_map(entries),
		HostRef::Record(fields) => encode_record(ty, fields),
		HostRef::Pointer(Some(pointee)) => encode(pointee),
		HostRef::Unsupported => {
			debug!(ty = %ty, "type has no runtime representation");
			Err(MarshalError::UnsupportedType { ty })
		}
	}
}

fn encode_isize(v: isize) -> DynValue {
	if usize::BITS == 32 {
		DynValue::from_i32(v as i32)
	} else {
		DynValue::from_i64(v as i64)
	}
}

fn encode_usize(v: usize) -> DynValue {
	if usize::BITS == 32 {
		DynValue::from_u32(v as u32)
	} else {
		DynValue::from_u64(v as u64)
	}
}

fn encode_seq<'a>(items: impl Iterator<Item = &'a dyn Reflect>) -> Result<DynValue> {
	let mut seq = SeqBuilder::with_capacity(items.size_hint().0);
	for item in items {
		seq.push(encode(item)?);
	}
	Ok(seq.finish())
}

fn encode_map<'a>(entries: impl Iterator<Item = (&'a dyn Reflect, &'a dyn Reflect)>) -> Result<DynValue> {
	let mut map = MapBuilder::default();
	for (key, value) in entries {
		let key = encode(key)?;
		map.insert(key, encode(value)?);
	}
	Ok(map.finish())
}

fn encode_record<'a>(ty: TypeDesc, fields: impl Iterator<Item = &'a dyn Reflect>) -> Result<DynValue> {
	let Some(table) = ty.fields() else {
		return Err(MarshalError::UnsupportedType { ty });
	};
	trace!(ty = %ty, fields = table.len(), "encoding record");

	let mut map = MapBuilder::default();
	for ((_, key), field) in table.active().zip(fields) {
		map.insert(DynValue::from_string(key), encode(field)?);
	}
	Ok(map.finish())
}
