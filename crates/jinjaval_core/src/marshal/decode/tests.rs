use std::collections::{BTreeMap, HashMap, VecDeque};
use std::net::IpAddr;
use std::sync::Arc;

use minijinja::Value;

use crate::Reflect;
use crate::marshal::{
	AnyValue, BoxError, DynValue, Kind, MapBuilder, MarshalError, SeqBuilder, TypeDesc, UnmarshalBinary, UnmarshalText, decode, decode_into, encode,
};

#[derive(Reflect, Default, Debug, PartialEq)]
struct Item {
	pub id: u32,
	#[jinjaval(name = "label")]
	pub title: String,
	#[jinjaval(skip)]
	pub draft: bool,
	pub tags: Vec<String>,
	pub parent: Option<Box<Item>>,
}

#[derive(Reflect, Default, Debug, PartialEq)]
#[jinjaval(unmarshal_text, unmarshal_binary)]
struct Checksum {
	pub digest: Vec<u8>,
}

impl UnmarshalText for Checksum {
	fn unmarshal_text(&mut self, text: &str) -> Result<(), BoxError> {
		let digits = text.strip_prefix("sum:").ok_or("missing sum: prefix")?;
		self.digest = digits.bytes().map(|b| b - b'0').collect();
		Ok(())
	}
}

impl UnmarshalBinary for Checksum {
	fn unmarshal_binary(&mut self, data: &[u8]) -> Result<(), BoxError> {
		if data.is_empty() {
			return Err("empty digest".into());
		}
		self.digest = data.iter().rev().copied().collect();
		Ok(())
	}
}

fn round_trip<T: Reflect + Default>(value: &T) -> T {
	let encoded = encode(value).expect("encodes");
	let mut out = T::default();
	decode(&encoded, &mut out).expect("decodes");
	out
}

fn mismatch(err: MarshalError) -> (String, TypeDesc) {
	match err {
		MarshalError::DecodeType { value, ty } => (value, ty),
		other => panic!("expected decode type error, got {other}"),
	}
}

#[test]
fn scalars_round_trip() {
	assert!(round_trip(&true));
	assert_eq!(round_trip(&-120_i8), -120);
	assert_eq!(round_trip(&i16::MIN), i16::MIN);
	assert_eq!(round_trip(&i32::MAX), i32::MAX);
	assert_eq!(round_trip(&i64::MIN), i64::MIN);
	assert_eq!(round_trip(&-5_isize), -5);
	assert_eq!(round_trip(&255_u8), 255);
	assert_eq!(round_trip(&u16::MAX), u16::MAX);
	assert_eq!(round_trip(&u32::MAX), u32::MAX);
	assert_eq!(round_trip(&u64::MAX), u64::MAX);
	assert_eq!(round_trip(&usize::MAX), usize::MAX);
	assert_eq!(round_trip(&1.25_f32), 1.25);
	assert_eq!(round_trip(&-0.5_f64), -0.5);
	assert_eq!(round_trip(&String::from("héllo")), "héllo");
}

#[test]
fn containers_round_trip() {
	assert_eq!(round_trip(&vec![1_u16, 2, 3]), vec![1, 2, 3]);
	assert_eq!(round_trip(&VecDeque::from(vec![true, false])), VecDeque::from(vec![true, false]));
	assert_eq!(round_trip(&[4_i32, 5]), [4, 5]);
	assert_eq!(round_trip(&vec![0_u8, 255, 7]), vec![0, 255, 7]);

	let mut map = BTreeMap::new();
	map.insert("one".to_owned(), 1.0_f64);
	map.insert("two".to_owned(), 2.0);
	assert_eq!(round_trip(&map), map);

	let mut keyed = HashMap::new();
	keyed.insert(3_u64, vec!["c".to_owned()]);
	assert_eq!(round_trip(&keyed), keyed);

	assert_eq!(round_trip(&Some(9_u8)), Some(9));
	assert_eq!(*round_trip(&Box::new(3_i64)), 3);
}

#[test]
fn records_round_trip_with_renamed_and_excluded_fields() {
	let item = Item {
		id: 1,
		title: "root".to_owned(),
		draft: true,
		tags: vec!["a".to_owned(), "b".to_owned()],
		parent: Some(Box::new(Item {
			id: 2,
			title: "parent".to_owned(),
			..Item::default()
		})),
	};

	let decoded = round_trip(&item);
	assert_eq!(decoded.title, "root");
	assert_eq!(decoded.tags, item.tags);
	assert_eq!(decoded.parent.as_ref().map(|parent| parent.id), Some(2));
	assert!(!decoded.draft, "excluded field must not be decoded");
}

#[test]
fn excluded_field_is_not_populated_from_matching_key() {
	let mut map = MapBuilder::default();
	map.insert(DynValue::from_string("draft"), DynValue::from_bool(true));
	map.insert(DynValue::from_string("title"), DynValue::from_string("by ident"));
	map.insert(DynValue::from_string("label"), DynValue::from_string("by tag"));
	let map = map.finish();

	let mut item = Item::default();
	decode(&map, &mut item).expect("decodes");
	assert!(!item.draft);
	assert_eq!(item.title, "by tag");
}

#[test]
fn missing_record_keys_keep_field_values() {
	let mut map = MapBuilder::default();
	map.insert(DynValue::from_string("id"), DynValue::from_i32(5));
	let map = map.finish();

	let mut item = Item {
		title: "kept".to_owned(),
		..Item::default()
	};
	decode(&map, &mut item).expect("decodes");
	assert_eq!(item.id, 5);
	assert_eq!(item.title, "kept");
}

#[test]
fn none_leaves_targets_unchanged() {
	let none = encode(&None::<u8>).expect("encodes");
	let undefined = DynValue::undefined();

	let mut pointer = Some(Box::new(4_u8));
	decode(&none, &mut pointer).expect("no-op");
	assert_eq!(pointer, Some(Box::new(4)));

	let mut open = AnyValue::String("set".to_owned());
	decode(&undefined, &mut open).expect("no-op");
	assert_eq!(open, AnyValue::String("set".to_owned()));

	let mut map = HashMap::from([("k".to_owned(), 1_u8)]);
	decode(&none, &mut map).expect("no-op");
	assert_eq!(map.len(), 1);

	let mut seq = vec![1_u8, 2];
	decode(&none, &mut seq).expect("no-op");
	assert_eq!(seq, [1, 2]);

	let mut unset: Option<u8> = None;
	decode(&undefined, &mut unset).expect("no-op");
	assert_eq!(unset, None, "absent values must not allocate");
}

#[test]
fn bytes_into_fixed_arrays_truncate_or_zero_pad() {
	let four = DynValue::from_bytes(&[1, 2, 3, 4]);

	let mut three = [9_u8; 3];
	decode(&four, &mut three).expect("decodes");
	assert_eq!(three, [1, 2, 3]);

	let mut exact = [0_u8; 4];
	decode(&four, &mut exact).expect("decodes");
	assert_eq!(exact, [1, 2, 3, 4]);

	let mut five = [9_u8; 5];
	decode(&four, &mut five).expect("decodes");
	assert_eq!(five, [1, 2, 3, 4, 0]);

	let mut padded = [7_u8; 4];
	decode(&DynValue::from_bytes(&[1, 2, 3]), &mut padded).expect("decodes");
	assert_eq!(padded, [1, 2, 3, 0]);
}

#[test]
fn byte_element_sequences_into_fixed_arrays_truncate_or_zero_pad() {
	let source = encode(&vec![1_u8, 2, 3]).expect("encodes");
	assert_eq!(source.kind(), Kind::Sequence);

	let mut short = [9_u8; 2];
	decode(&source, &mut short).expect("decodes");
	assert_eq!(short, [1, 2]);

	let mut padded = [7_u8; 4];
	decode(&source, &mut padded).expect("decodes");
	assert_eq!(padded, [1, 2, 3, 0]);
}

#[test]
fn bytes_into_growable_sequences() {
	let source = DynValue::from_bytes(&[5, 6, 7]);

	let mut fresh: Vec<u8> = Vec::new();
	decode(&source, &mut fresh).expect("decodes");
	assert_eq!(fresh, [5, 6, 7]);

	let mut roomy: Vec<u8> = Vec::with_capacity(10);
	roomy.extend_from_slice(&[1, 1]);
	decode(&source, &mut roomy).expect("decodes");
	assert_eq!(roomy, [5, 6, 7]);
	assert!(roomy.capacity() >= 10, "allocated sequences are reused");

	let mut longer = vec![0_u8; 6];
	decode(&source, &mut longer).expect("decodes");
	assert_eq!(longer, [5, 6, 7]);

	let mut open_elems: Vec<AnyValue> = Vec::new();
	decode(&source, &mut open_elems).expect("decodes");
	assert_eq!(open_elems, [AnyValue::Byte(5), AnyValue::Byte(6), AnyValue::Byte(7)]);

	let mut open = AnyValue::Nil;
	decode(&source, &mut open).expect("decodes");
	assert_eq!(open, AnyValue::Bytes(vec![5, 6, 7]));
}

#[test]
fn bytes_into_non_byte_elements_fail() {
	let source = DynValue::from_bytes(&[1]);

	let mut words: Vec<u16> = Vec::new();
	let (value, ty) = mismatch(decode(&source, &mut words).err().expect("fails"));
	assert_eq!(value, "bytes");
	assert_eq!(ty, <Vec<u16> as Reflect>::describe());

	let mut text = String::new();
	assert_eq!(mismatch(decode(&source, &mut text).err().expect("fails")).0, "bytes");
}

#[test]
fn sequences_decode_element_wise() {
	let source = encode(&vec![1_i32, 2, 3]).expect("encodes");

	let mut short = [0_i64; 2];
	decode(&source, &mut short).expect("decodes");
	assert_eq!(short, [1, 2]);

	let mut long = [9_i64; 4];
	decode(&source, &mut long).expect("decodes");
	assert_eq!(long, [1, 2, 3, 0]);

	let mut existing = vec![7_u32; 5];
	decode(&source, &mut existing).expect("decodes");
	assert_eq!(existing, [1, 2, 3]);

	let mut open = AnyValue::Nil;
	decode(&source, &mut open).expect("decodes");
	assert_eq!(open, AnyValue::Seq(vec![AnyValue::Float(1.0), AnyValue::Float(2.0), AnyValue::Float(3.0)]));
}

#[test]
fn mappings_merge_into_existing_maps() {
	let source = encode(&HashMap::from([("foo".to_owned(), 1_i32)])).expect("encodes");

	let mut target = HashMap::from([("bar".to_owned(), 2_i32)]);
	decode(&source, &mut target).expect("decodes");
	assert_eq!(target, HashMap::from([("foo".to_owned(), 1), ("bar".to_owned(), 2)]));

	let overwrite = encode(&HashMap::from([("bar".to_owned(), 5_i32)])).expect("encodes");
	decode(&overwrite, &mut target).expect("decodes");
	assert_eq!(target["bar"], 5);
	assert_eq!(target.len(), 2);
}

#[test]
fn mappings_into_open_values_keep_order() {
	let mut map = MapBuilder::default();
	map.insert(DynValue::from_string("z"), DynValue::from_bool(true));
	map.insert(DynValue::from_string("a"), DynValue::from_string("x"));
	let map = map.finish();

	let mut open = AnyValue::Nil;
	decode(&map, &mut open).expect("decodes");
	assert_eq!(
		open,
		AnyValue::Map(vec![(AnyValue::from("z"), AnyValue::Bool(true)), (AnyValue::from("a"), AnyValue::from("x"))])
	);
}

#[test]
fn pointers_allocate_before_decoding() {
	let mut target: Option<Box<String>> = None;
	decode(&DynValue::from_string("set"), &mut target).expect("decodes");
	assert_eq!(target.as_deref().map(String::as_str), Some("set"));

	let mut nested: Option<Option<u8>> = None;
	decode(&DynValue::from_i32(3), &mut nested).expect("decodes");
	assert_eq!(nested, Some(Some(3)));
}

#[test]
fn shared_pointer_targets_are_rejected() {
	let mut shared = Arc::new(1_u8);
	let _other = Arc::clone(&shared);
	let err = decode(&DynValue::from_i32(2), &mut shared).err().expect("fails");
	assert!(matches!(err, MarshalError::InvalidTarget { ty: Some(ty) } if ty == <Arc<u8> as Reflect>::describe()));

	let mut unique = Arc::new(1_u8);
	decode(&DynValue::from_i32(2), &mut unique).expect("decodes");
	assert_eq!(*unique, 2);
}

#[test]
fn decode_into_requires_a_target() {
	let err = decode_into(&DynValue::from_i32(1), None).err().expect("fails");
	assert!(matches!(err, MarshalError::InvalidTarget { ty: None }));

	let mut out = 0_u8;
	decode_into(&DynValue::from_i32(1), Some(&mut out)).expect("decodes");
	assert_eq!(out, 1);
}

#[test]
fn numbers_into_open_values_become_floats() {
	let mut open = AnyValue::Nil;
	decode(&DynValue::from_u64(42), &mut open).expect("decodes");
	assert_eq!(open, AnyValue::Float(42.0));
}

#[test]
fn kind_mismatches_name_value_and_target() {
	let number = DynValue::from_i32(1);

	let (value, ty) = mismatch(decode(&number, &mut Item::default()).err().expect("fails"));
	assert_eq!(value, "number 1");
	assert_eq!(ty, <Item as Reflect>::describe());

	let (value, _) = mismatch(decode(&number, &mut HashMap::<String, u8>::new()).err().expect("fails"));
	assert_eq!(value, "number 1");
	let (value, _) = mismatch(decode(&number, &mut Vec::<u8>::new()).err().expect("fails"));
	assert_eq!(value, "number 1");
	let (value, _) = mismatch(decode(&number, &mut String::new()).err().expect("fails"));
	assert_eq!(value, "number 1");

	let (value, ty) = mismatch(decode(&DynValue::from_string("1"), &mut 0_i32).err().expect("fails"));
	assert_eq!(value, "string");
	assert_eq!(ty, <i32 as Reflect>::describe());

	let map = encode(&BTreeMap::from([("a", 1_u8)])).expect("encodes");
	let (value, _) = mismatch(decode(&map, &mut Vec::<u8>::new()).err().expect("fails"));
	assert_eq!(value, "map");

	let seq = encode(&vec![true]).expect("encodes");
	let (value, _) = mismatch(decode(&seq, &mut false).err().expect("fails"));
	assert_eq!(value, "seq");
}

#[test]
fn nested_mismatch_names_the_immediate_field_type() {
	let mut map = MapBuilder::default();
	map.insert(DynValue::from_string("id"), DynValue::from_string("seven"));
	let map = map.finish();

	let (value, ty) = mismatch(decode(&map, &mut Item::default()).err().expect("fails"));
	assert_eq!(value, "string");
	assert_eq!(ty, <u32 as Reflect>::describe());
}

#[test]
fn closed_interfaces_reject_every_kind() {
	let mut boxed: Box<dyn std::any::Any + Send + Sync> = Box::new(());
	let bytes = DynValue::from_bytes(&[1]);
	let seq = SeqBuilder::default().finish();
	let map = MapBuilder::default().finish();
	let text = DynValue::from_string("x");

	for (source, expected) in [(&bytes, "bytes"), (&seq, "seq"), (&map, "map"), (&text, "string")] {
		let (value, ty) = mismatch(decode(source, &mut boxed).err().expect("fails"));
		assert_eq!(value, expected);
		assert_eq!(ty, <Box<dyn std::any::Any + Send + Sync> as Reflect>::describe());
	}
}

#[test]
fn invalid_values_never_decode() {
	struct Unserializable;

	impl serde::Serialize for Unserializable {
		fn serialize<S: serde::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
			Err(serde::ser::Error::custom("cannot serialize"))
		}
	}

	let invalid = DynValue::from_runtime(Value::from_serialize(Unserializable));
	assert_eq!(invalid.kind(), Kind::Invalid);

	let mut open = AnyValue::Nil;
	let (value, _) = mismatch(decode(&invalid, &mut open).err().expect("fails"));
	assert_eq!(value, "unsupported invalid");
}

#[test]
fn text_hooks_receive_string_form() {
	let mut sum = Checksum::default();
	decode(&DynValue::from_string("sum:123"), &mut sum).expect("hook succeeds");
	assert_eq!(sum.digest, [1, 2, 3]);

	let err = decode(&DynValue::from_string("nope"), &mut sum).err().expect("hook fails");
	let MarshalError::TextHook { hook, ty, source } = err else {
		panic!("expected a text hook error");
	};
	assert_eq!(hook, "unmarshal_text");
	assert_eq!(ty, <Checksum as Reflect>::describe());
	assert_eq!(source.to_string(), "missing sum: prefix");

	let mut addr: IpAddr = "0.0.0.0".parse().expect("valid address");
	decode(&DynValue::from_string("192.168.1.2"), &mut addr).expect("parses");
	assert_eq!(addr.to_string(), "192.168.1.2");
}

#[test]
fn binary_hooks_receive_raw_bytes() {
	let mut sum = Checksum::default();
	decode(&DynValue::from_bytes(&[1, 2, 3]), &mut sum).expect("hook succeeds");
	assert_eq!(sum.digest, [3, 2, 1]);

	let err = decode(&DynValue::from_bytes(&[]), &mut sum).err().expect("hook fails");
	assert!(
		matches!(&err, MarshalError::BinaryHook { hook: "unmarshal_binary", .. }),
		"unexpected error: {err}"
	);
}
