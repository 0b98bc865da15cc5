use super::{DynValue, MapBuilder, SeqBuilder};
use crate::marshal::Kind;

#[test]
fn constructors_report_expected_kinds() {
	assert_eq!(DynValue::none().kind(), Kind::None);
	assert_eq!(DynValue::undefined().kind(), Kind::Undefined);
	assert_eq!(DynValue::from_bool(true).kind(), Kind::Bool);
	assert_eq!(DynValue::from_i32(-4).kind(), Kind::Number);
	assert_eq!(DynValue::from_u64(u64::MAX).kind(), Kind::Number);
	assert_eq!(DynValue::from_f32(0.5).kind(), Kind::Number);
	assert_eq!(DynValue::from_string("hi").kind(), Kind::String);
	assert_eq!(DynValue::from_bytes(&[1, 2]).kind(), Kind::Bytes);
	assert_eq!(SeqBuilder::default().finish().kind(), Kind::Sequence);
	assert_eq!(MapBuilder::default().finish().kind(), Kind::Mapping);
}

#[test]
fn lookups_by_index_and_key() {
	let mut seq = SeqBuilder::with_capacity(2);
	seq.push(DynValue::from_string("first"));
	seq.push(DynValue::from_string("second"));
	let seq = seq.finish();
	assert_eq!(seq.len(), Some(2));
	assert_eq!(seq.get_by_index(1).expect("index lookup").as_str(), Some("second"));

	let mut map = MapBuilder::default();
	map.insert(DynValue::from_string("name"), DynValue::from_string("jinja"));
	map.insert(DynValue::from_i32(7), DynValue::from_bool(true));
	let map = map.finish();

	assert_eq!(map.get_by_str("name").expect("attr lookup").as_str(), Some("jinja"));
	assert!(map.get_by_value(&DynValue::from_i32(7)).expect("key lookup").is_true());
	assert_eq!(map.get_by_str("missing").expect("miss is not an error").kind(), Kind::Undefined);
}

#[test]
fn bytes_are_copied() {
	let mut source = vec![1_u8, 2, 3];
	let value = DynValue::from_bytes(&source);
	source[0] = 9;

	assert_eq!(value.as_bytes(), Some(&[1_u8, 2, 3][..]));
	assert_eq!(value.len(), Some(3));
}

#[test]
fn clones_hold_independent_references() {
	let value = DynValue::from_string("shared");
	let copy = value.clone();
	value.release();

	assert_eq!(copy.as_str(), Some("shared"));
	assert_eq!(copy.to_string(), "shared");
}

#[test]
fn map_builder_keeps_insertion_order_and_last_duplicate() {
	let mut map = MapBuilder::default();
	map.insert(DynValue::from_string("z"), DynValue::from_i32(1));
	map.insert(DynValue::from_string("a"), DynValue::from_i32(2));
	map.insert(DynValue::from_string("z"), DynValue::from_i32(3));
	let map = map.finish();

	let keys: Vec<String> = map.try_iter().expect("map iterates").map(|key| key.to_string()).collect();
	assert_eq!(keys, ["z", "a"]);
	assert_eq!(map.get_by_str("z").expect("lookup").to_string(), "3");
}

#[test]
fn emptiness_and_truthiness() {
	assert!(SeqBuilder::default().finish().is_empty());
	assert!(!DynValue::from_string("x").is_empty());
	assert!(!DynValue::from_i32(0).is_true());
	assert!(DynValue::from_i32(2).is_true());
	assert!(!DynValue::none().is_true());
}
