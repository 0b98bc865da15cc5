use minijinja::Value;
use tracing::{debug, trace};

use crate::marshal::{AnyValue, ArrayMut, DynValue, HostMut, Kind, MarshalError, Reflect, Result, SeqMut, TypeDesc, Width};

/// Decode a runtime value into a host location.
///
/// `undefined` and `none` leave the target untouched. Decoding does not roll
/// back: on failure, siblings decoded before the failing one keep their new values.
pub fn decode(value: &DynValue, target: &mut dyn Reflect) -> Result<()> {
	let kind = value.kind();
	if kind.is_absent() {
		return Ok(());
	}

	let ty = target.type_desc();
	if kind == Kind::Invalid {
		return Err(mismatch(value, ty));
	}

	match kind {
		Kind::String | Kind::Plain => {
			if let Some(hook) = target.text_hook() {
				let text = text_form(value);
				return hook.unmarshal_text(&text).map_err(|source| MarshalError::TextHook {
					hook: "unmarshal_text",
					ty,
					source,
				});
			}
		}
		Kind::Bytes => {
			if let Some(hook) = target.binary_hook() {
				let data = value.as_bytes().unwrap_or_default();
				return hook.unmarshal_binary(data).map_err(|source| MarshalError::BinaryHook {
					hook: "unmarshal_binary",
					ty,
					source,
				});
			}
		}
		_ => {}
	}

	match target.reflect_mut() {
		HostMut::Pointer(ptr) => match ptr.pointee_mut() {
			Some(pointee) => decode(value, pointee),
			None => Err(MarshalError::InvalidTarget { ty: Some(ty) }),
		},
		view => match kind {
			Kind::Bool => decode_bool(value, ty, view),
			Kind::Number => decode_number(value, ty, view),
			Kind::String | Kind::Plain => decode_string(value, ty, view),
			Kind::Bytes => decode_bytes(value, ty, view),
			Kind::Sequence => decode_seq(value, ty, view),
			Kind::Mapping | Kind::Iterable => decode_map(value, ty, view),
			Kind::Undefined | Kind::None | Kind::Invalid => Err(mismatch(value, ty)),
		},
	}
}

/// Decode into an optional target, rejecting a missing or unwritable one.
pub fn decode_into(value: &DynValue, target: Option<&mut dyn Reflect>) -> Result<()> {
	let target = ensure_settable(target)?;
	decode(value, target)
}

/// Check that `target` exists and can be written through.
pub(crate) fn ensure_settable(target: Option<&mut dyn Reflect>) -> Result<&mut dyn Reflect> {
	let Some(target) = target else {
		return Err(MarshalError::InvalidTarget { ty: None });
	};

	let ty = target.type_desc();
	let settable = match target.reflect_mut() {
		HostMut::Pointer(ptr) => ptr.is_settable(),
		_ => true,
	};
	if !settable {
		return Err(MarshalError::InvalidTarget { ty: Some(ty) });
	}
	Ok(target)
}

fn mismatch(value: &DynValue, ty: TypeDesc) -> MarshalError {
	let value = match value.kind() {
		Kind::Number => format!("number {value}"),
		Kind::Invalid => "unsupported invalid".to_owned(),
		kind => kind.as_str().to_owned(),
	};
	debug!(value = %value, ty = %ty, "decode type mismatch");
	MarshalError::DecodeType { value, ty }
}

fn text_form(value: &DynValue) -> String {
	match value.as_str() {
		Some(text) => text.to_owned(),
		None => value.to_string(),
	}
}

fn decode_bool(value: &DynValue, ty: TypeDesc, view: HostMut<'_>) -> Result<()> {
	match view {
		HostMut::Bool(slot) => *slot = value.is_true(),
		HostMut::Any(slot) => *slot = AnyValue::Bool(value.is_true()),
		_ => return Err(mismatch(value, ty)),
	}
	Ok(())
}

fn number<T: TryFrom<Value>>(value: &DynValue, ty: TypeDesc) -> Result<T> {
	T::try_from(value.as_runtime().clone()).map_err(|_| mismatch(value, ty))
}

fn decode_number(value: &DynValue, ty: TypeDesc, view: HostMut<'_>) -> Result<()> {
	let native = Width::Native.resolve();

	match view {
		HostMut::I8(slot) => *slot = number(value, ty)?,
		HostMut::I16(slot) => *slot = number(value, ty)?,
		HostMut::I32(slot) => *slot = number(value, ty)?,
		HostMut::I64(slot) => *slot = number(value, ty)?,
		HostMut::Isize(slot) if native == Width::W32 => *slot = number::<i32>(value, ty)? as isize,
		HostMut::Isize(slot) => *slot = number::<i64>(value, ty)? as isize,
		HostMut::U8(slot) => *slot = number(value, ty)?,
		HostMut::U16(slot) => *slot = number(value, ty)?,
		HostMut::U32(slot) => *slot = number(value, ty)?,
		HostMut::U64(slot) => *slot = number(value, ty)?,
		HostMut::Usize(slot) if native == Width::W32 => *slot = number::<u32>(value, ty)? as usize,
		HostMut::Usize(slot) => *slot = number::<u64>(value, ty)? as usize,
		HostMut::F32(slot) => *slot = number(value, ty)?,
		HostMut::F64(slot) => *slot = number(value, ty)?,
		HostMut::Any(slot) => *slot = AnyValue::Float(number(value, ty)?),
		_ => return Err(mismatch(value, ty)),
	}
	Ok(())
}

fn decode_string(value: &DynValue, ty: TypeDesc, view: HostMut<'_>) -> Result<()> {
	match view {
		HostMut::Str(slot) => *slot = text_form(value),
		HostMut::Any(slot) => *slot = AnyValue::String(text_form(value)),
		_ => return Err(mismatch(value, ty)),
	}
	Ok(())
}

fn decode_bytes(value: &DynValue, ty: TypeDesc, view: HostMut<'_>) -> Result<()> {
	let data = value.as_bytes().unwrap_or_default();

	match view {
		HostMut::Array(array) => {
			require_byte_elems(array.elem_desc(), value, ty)?;
			copy_into_array(data, value, ty, array)
		}
		HostMut::Seq(seq) => {
			require_byte_elems(seq.elem_desc(), value, ty)?;
			copy_into_seq(data, value, ty, seq)
		}
		HostMut::Any(slot) => {
			*slot = AnyValue::Bytes(data.to_vec());
			Ok(())
		}
		_ => Err(mismatch(value, ty)),
	}
}

fn require_byte_elems(elem: TypeDesc, value: &DynValue, ty: TypeDesc) -> Result<()> {
	if elem.is_byte() || elem.is_any() {
		return Ok(());
	}
	Err(mismatch(value, ty))
}

fn put_byte(slot: &mut dyn Reflect, byte: u8, value: &DynValue, ty: TypeDesc) -> Result<()> {
	match slot.reflect_mut() {
		HostMut::U8(slot) => *slot = byte,
		HostMut::Any(slot) => *slot = AnyValue::Byte(byte),
		_ => return Err(mismatch(value, ty)),
	}
	Ok(())
}

fn copy_into_array(data: &[u8], value: &DynValue, ty: TypeDesc, array: &mut dyn ArrayMut) -> Result<()> {
	let len = array.len();
	let copied = data.len().min(len);

	for (idx, byte) in data[..copied].iter().enumerate() {
		if let Some(slot) = array.elem_mut(idx) {
			put_byte(slot, *byte, value, ty)?;
		}
	}
	for idx in copied..len {
		array.zero(idx);
	}
	Ok(())
}

fn copy_into_seq(data: &[u8], value: &DynValue, ty: TypeDesc, seq: &mut dyn SeqMut) -> Result<()> {
	if seq.capacity() == 0 {
		seq.reserve_exact(data.len());
	}
	seq.resize(data.len());

	for (idx, byte) in data.iter().enumerate() {
		if let Some(slot) = seq.elem_mut(idx) {
			put_byte(slot, *byte, value, ty)?;
		}
	}
	Ok(())
}

fn decode_seq(value: &DynValue, ty: TypeDesc, view: HostMut<'_>) -> Result<()> {
	trace!(ty = %ty, len = ?value.len(), "decoding sequence");

	match view {
		HostMut::Array(array) => {
			let len = array.len();
			let mut filled = 0;
			for (idx, item) in value.try_iter()?.take(len).enumerate() {
				if let Some(slot) = array.elem_mut(idx) {
					decode(&item, slot)?;
				}
				filled = idx + 1;
			}
			for idx in filled..len {
				array.zero(idx);
			}
		}
		HostMut::Seq(seq) => {
			let len = value.len().unwrap_or(0);
			seq.resize(len);
			for (idx, item) in value.try_iter()?.take(len).enumerate() {
				if let Some(slot) = seq.elem_mut(idx) {
					decode(&item, slot)?;
				}
			}
		}
		HostMut::Any(slot) => {
			let mut items = Vec::with_capacity(value.len().unwrap_or(0));
			for item in value.try_iter()? {
				let mut out = AnyValue::Nil;
				decode(&item, &mut out)?;
				items.push(out);
			}
			*slot = AnyValue::Seq(items);
		}
		_ => return Err(mismatch(value, ty)),
	}
	Ok(())
}

fn decode_map(value: &DynValue, ty: TypeDesc, view: HostMut<'_>) -> Result<()> {
	trace!(ty = %ty, len = ?value.len(), "decoding mapping");

	match view {
		HostMut::Map(map) => {
			for pair in value.try_pairs()? {
				let (key, item) = pair?;
				map.insert_with(&mut |key_slot: &mut dyn Reflect, value_slot: &mut dyn Reflect| {
					decode(&key, key_slot)?;
					decode(&item, value_slot)
				})?;
			}
		}
		HostMut::Record(fields) => {
			let Some(table) = ty.fields() else {
				return Err(mismatch(value, ty));
			};
			for ((_, key), field) in table.active().zip(fields) {
				decode(&value.get_by_str(key)?, field)?;
			}
		}
		HostMut::Any(slot) => {
			let mut entries = Vec::with_capacity(value.len().unwrap_or(0));
			for pair in value.try_pairs()? {
				let (key, item) = pair?;
				let (mut key_out, mut item_out) = (AnyValue::Nil, AnyValue::Nil);
				decode(&key, &mut key_out)?;
				decode(&item, &mut item_out)?;
				entries.push((key_out, item_out));
			}
			*slot = AnyValue::Map(entries);
		}
		_ => return Err(mismatch(value, ty)),
	}
	Ok(())
}

#[cfg(test)]
mod tests;
