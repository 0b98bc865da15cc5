use std::any::Any;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::hash::{BuildHasher, Hash};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::rc::Rc;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender};

use super::{ArrayMut, FillEntry, HostMut, HostRef, MapMut, PointerMut, Reflect, SeqMut};
use crate::marshal::{MarshalText, Result, Shape, TypeDesc, UnmarshalText, Width};

macro_rules! reflect_scalar {
	($($ty:ty => $shape:expr, $variant:ident;)*) => {
		$(
			impl Reflect for $ty {
				fn describe() -> TypeDesc {
					TypeDesc::of::<Self>($shape)
				}

				fn type_desc(&self) -> TypeDesc {
					Self::describe()
				}

				fn reflect(&self) -> HostRef<'_> {
					HostRef::$variant(*self)
				}

				fn reflect_mut(&mut self) -> HostMut<'_> {
					HostMut::$variant(self)
				}
			}
		)*
	};
}

reflect_scalar! {
	bool => Shape::Bool, Bool;
	i8 => Shape::Int(Width::W8), I8;
	i16 => Shape::Int(Width::W16), I16;
	i32 => Shape::Int(Width::W32), I32;
	i64 => Shape::Int(Width::W64), I64;
	isize => Shape::Int(Width::Native), Isize;
	u8 => Shape::Uint(Width::W8), U8;
	u16 => Shape::Uint(Width::W16), U16;
	u32 => Shape::Uint(Width::W32), U32;
	u64 => Shape::Uint(Width::W64), U64;
	usize => Shape::Uint(Width::Native), Usize;
	f32 => Shape::Float(Width::W32), F32;
	f64 => Shape::Float(Width::W64), F64;
}

impl Reflect for String {
	fn describe() -> TypeDesc {
		TypeDesc::of::<Self>(Shape::String)
	}

	fn type_desc(&self) -> TypeDesc {
		Self::describe()
	}

	fn reflect(&self) -> HostRef<'_> {
		HostRef::Str(self)
	}

	fn reflect_mut(&mut self) -> HostMut<'_> {
		HostMut::Str(self)
	}
}

impl Reflect for &str {
	fn describe() -> TypeDesc {
		TypeDesc::of::<&'static str>(Shape::String)
	}

	fn type_desc(&self) -> TypeDesc {
		Self::describe()
	}

	fn reflect(&self) -> HostRef<'_> {
		HostRef::Str(self)
	}

	fn reflect_mut(&mut self) -> HostMut<'_> {
		HostMut::Unsupported
	}
}

impl Reflect for () {
	fn describe() -> TypeDesc {
		TypeDesc::of::<Self>(Shape::Nil)
	}

	fn type_desc(&self) -> TypeDesc {
		Self::describe()
	}

	fn reflect(&self) -> HostRef<'_> {
		HostRef::Nil
	}

	fn reflect_mut(&mut self) -> HostMut<'_> {
		HostMut::Unsupported
	}
}

impl<T: Reflect + Default + 'static> Reflect for Vec<T> {
	fn describe() -> TypeDesc {
		TypeDesc::of::<Self>(Shape::Seq(T::describe))
	}

	fn type_desc(&self) -> TypeDesc {
		Self::describe()
	}

	fn reflect(&self) -> HostRef<'_> {
		HostRef::Seq(Box::new(self.iter().map(|item| item as &dyn Reflect)))
	}

	fn reflect_mut(&mut self) -> HostMut<'_> {
		HostMut::Seq(self)
	}
}

impl<T: Reflect + Default> SeqMut for Vec<T> {
	fn len(&self) -> usize {
		Vec::len(self)
	}

	fn capacity(&self) -> usize {
		Vec::capacity(self)
	}

	fn elem_desc(&self) -> TypeDesc {
		T::describe()
	}

	fn resize(&mut self, len: usize) {
		self.resize_with(len, T::default);
	}

	fn reserve_exact(&mut self, additional: usize) {
		Vec::reserve_exact(self, additional);
	}

	fn elem_mut(&mut self, index: usize) -> Option<&mut dyn Reflect> {
		self.get_mut(index).map(|item| item as &mut dyn Reflect)
	}
}

impl<T: Reflect + Default + 'static> Reflect for VecDeque<T> {
	fn describe() -> TypeDesc {
		TypeDesc::of::<Self>(Shape::Seq(T::describe))
	}

	fn type_desc(&self) -> TypeDesc {
		Self::describe()
	}

	fn reflect(&self) -> HostRef<'_> {
		HostRef::Seq(Box::new(self.iter().map(|item| item as &dyn Reflect)))
	}

	fn reflect_mut(&mut self) -> HostMut<'_> {
		HostMut::Seq(self)
	}
}

impl<T: Reflect + Default> SeqMut for VecDeque<T> {
	fn len(&self) -> usize {
		VecDeque::len(self)
	}

	fn capacity(&self) -> usize {
		VecDeque::capacity(self)
	}

	fn elem_desc(&self) -> TypeDesc {
		T::describe()
	}

	fn resize(&mut self, len: usize) {
		self.resize_with(len, T::default);
	}

	fn reserve_exact(&mut self, additional: usize) {
		VecDeque::reserve_exact(self, additional);
	}

	fn elem_mut(&mut self, index: usize) -> Option<&mut dyn Reflect> {
		self.get_mut(index).map(|item| item as &mut dyn Reflect)
	}
}

impl<T: Reflect + 'static> Reflect for &[T] {
	fn describe() -> TypeDesc {
		TypeDesc::of::<&'static [T]>(Shape::Seq(T::describe))
	}

	fn type_desc(&self) -> TypeDesc {
		Self::describe()
	}

	fn reflect(&self) -> HostRef<'_> {
		HostRef::Seq(Box::new(self.iter().map(|item| item as &dyn Reflect)))
	}

	fn reflect_mut(&mut self) -> HostMut<'_> {
		HostMut::Unsupported
	}
}

impl<T: Reflect + Default + 'static, const N: usize> Reflect for [T; N] {
	fn describe() -> TypeDesc {
		TypeDesc::of::<Self>(Shape::Array { len: N, elem: T::describe })
	}

	fn type_desc(&self) -> TypeDesc {
		Self::describe()
	}

	fn reflect(&self) -> HostRef<'_> {
		HostRef::Seq(Box::new(self.iter().map(|item| item as &dyn Reflect)))
	}

	fn reflect_mut(&mut self) -> HostMut<'_> {
		HostMut::Array(self)
	}
}

impl<T: Reflect + Default, const N: usize> ArrayMut for [T; N] {
	fn len(&self) -> usize {
		N
	}

	fn elem_desc(&self) -> TypeDesc {
		T::describe()
	}

	fn elem_mut(&mut self, index: usize) -> Option<&mut dyn Reflect> {
		self.get_mut(index).map(|item| item as &mut dyn Reflect)
	}

	fn zero(&mut self, index: usize) {
		if let Some(item) = self.get_mut(index) {
			*item = T::default();
		}
	}
}

impl<K, V, S> Reflect for HashMap<K, V, S>
where
	K: Reflect + Default + Eq + Hash + 'static,
	V: Reflect + Default + 'static,
	S: BuildHasher + 'static,
{
	fn describe() -> TypeDesc {
		TypeDesc::of::<Self>(Shape::Map {
			key: K::describe,
			value: V::describe,
		})
	}

	fn type_desc(&self) -> TypeDesc {
		Self::describe()
	}

	fn reflect(&self) -> HostRef<'_> {
		HostRef::Map(Box::new(self.iter().map(|(k, v)| (k as &dyn Reflect, v as &dyn Reflect))))
	}

	fn reflect_mut(&mut self) -> HostMut<'_> {
		HostMut::Map(self)
	}
}

impl<K, V, S> MapMut for HashMap<K, V, S>
where
	K: Reflect + Default + Eq + Hash,
	V: Reflect + Default,
	S: BuildHasher,
{
	fn len(&self) -> usize {
		HashMap::len(self)
	}

	fn insert_with(&mut self, fill: FillEntry<'_>) -> Result<()> {
		let mut key = K::default();
		let mut value = V::default();
		fill(&mut key, &mut value)?;
		self.insert(key, value);
		Ok(())
	}
}

impl<K, V> Reflect for BTreeMap<K, V>
where
	K: Reflect + Default + Ord + 'static,
	V: Reflect + Default + 'static,
{
	fn describe() -> TypeDesc {
		TypeDesc::of::<Self>(Shape::Map {
			key: K::describe,
			value: V::describe,
		})
	}

	fn type_desc(&self) -> TypeDesc {
		Self::describe()
	}

	fn reflect(&self) -> HostRef<'_> {
		HostRef::Map(Box::new(self.iter().map(|(k, v)| (k as &dyn Reflect, v as &dyn Reflect))))
	}

	fn reflect_mut(&mut self) -> HostMut<'_> {
		HostMut::Map(self)
	}
}

impl<K, V> MapMut for BTreeMap<K, V>
where
	K: Reflect + Default + Ord,
	V: Reflect + Default,
{
	fn len(&self) -> usize {
		BTreeMap::len(self)
	}

	fn insert_with(&mut self, fill: FillEntry<'_>) -> Result<()> {
		let mut key = K::default();
		let mut value = V::default();
		fill(&mut key, &mut value)?;
		self.insert(key, value);
		Ok(())
	}
}

impl<T: Reflect + Default + 'static> Reflect for Option<T> {
	fn describe() -> TypeDesc {
		TypeDesc::of::<Self>(Shape::Pointer(T::describe))
	}

	fn type_desc(&self) -> TypeDesc {
		Self::describe()
	}

	fn reflect(&self) -> HostRef<'_> {
		HostRef::Pointer(self.as_ref().map(|inner| inner as &dyn Reflect))
	}

	fn reflect_mut(&mut self) -> HostMut<'_> {
		HostMut::Pointer(self)
	}
}

impl<T: Reflect + Default> PointerMut for Option<T> {
	fn is_nil(&self) -> bool {
		self.is_none()
	}

	fn is_settable(&self) -> bool {
		true
	}

	fn pointee_mut(&mut self) -> Option<&mut dyn Reflect> {
		Some(self.get_or_insert_with(T::default) as &mut dyn Reflect)
	}
}

impl<T: Reflect + 'static> Reflect for Box<T> {
	fn describe() -> TypeDesc {
		TypeDesc::of::<Self>(Shape::Pointer(T::describe))
	}

	fn type_desc(&self) -> TypeDesc {
		Self::describe()
	}

	fn reflect(&self) -> HostRef<'_> {
		HostRef::Pointer(Some(&**self as &dyn Reflect))
	}

	fn reflect_mut(&mut self) -> HostMut<'_> {
		HostMut::Pointer(self)
	}
}

impl<T: Reflect> PointerMut for Box<T> {
	fn is_nil(&self) -> bool {
		false
	}

	fn is_settable(&self) -> bool {
		true
	}

	fn pointee_mut(&mut self) -> Option<&mut dyn Reflect> {
		Some(&mut **self as &mut dyn Reflect)
	}
}

macro_rules! reflect_shared {
	($($ptr:ident),*) => {
		$(
			impl<T: Reflect + 'static> Reflect for $ptr<T> {
				fn describe() -> TypeDesc {
					TypeDesc::of::<Self>(Shape::Pointer(T::describe))
				}

				fn type_desc(&self) -> TypeDesc {
					Self::describe()
				}

				fn reflect(&self) -> HostRef<'_> {
					HostRef::Pointer(Some(&**self as &dyn Reflect))
				}

				fn reflect_mut(&mut self) -> HostMut<'_> {
					HostMut::Pointer(self)
				}
			}

			impl<T: Reflect> PointerMut for $ptr<T> {
				fn is_nil(&self) -> bool {
					false
				}

				fn is_settable(&self) -> bool {
					$ptr::strong_count(self) == 1 && $ptr::weak_count(self) == 0
				}

				fn pointee_mut(&mut self) -> Option<&mut dyn Reflect> {
					$ptr::get_mut(self).map(|inner| inner as &mut dyn Reflect)
				}
			}
		)*
	};
}

reflect_shared!(Rc, Arc);

impl Reflect for Box<dyn Any + Send + Sync> {
	fn describe() -> TypeDesc {
		TypeDesc::of::<Self>(Shape::Interface)
	}

	fn type_desc(&self) -> TypeDesc {
		Self::describe()
	}

	fn reflect(&self) -> HostRef<'_> {
		HostRef::Unsupported
	}

	fn reflect_mut(&mut self) -> HostMut<'_> {
		HostMut::Unsupported
	}
}

macro_rules! reflect_opaque {
	($($ty:ty => [$($param:tt)*]),* $(,)?) => {
		$(
			impl<$($param)*> Reflect for $ty {
				fn describe() -> TypeDesc {
					TypeDesc::of::<Self>(Shape::Opaque)
				}

				fn type_desc(&self) -> TypeDesc {
					Self::describe()
				}

				fn reflect(&self) -> HostRef<'_> {
					HostRef::Unsupported
				}

				fn reflect_mut(&mut self) -> HostMut<'_> {
					HostMut::Unsupported
				}
			}
		)*
	};
}

reflect_opaque! {
	fn() -> R => [R: 'static],
	Sender<T> => [T: 'static],
	Receiver<T> => [T: 'static],
	*const T => [T: 'static],
	*mut T => [T: 'static],
}

macro_rules! reflect_text {
	($($ty:ty),*) => {
		$(
			impl Reflect for $ty {
				fn describe() -> TypeDesc {
					TypeDesc::of::<Self>(Shape::Opaque)
				}

				fn type_desc(&self) -> TypeDesc {
					Self::describe()
				}

				fn reflect(&self) -> HostRef<'_> {
					HostRef::Unsupported
				}

				fn reflect_mut(&mut self) -> HostMut<'_> {
					HostMut::Unsupported
				}

				fn text_hook(&mut self) -> Option<&mut dyn UnmarshalText> {
					Some(self)
				}

				fn marshal_hook(&self) -> Option<&dyn MarshalText> {
					Some(self)
				}
			}
		)*
	};
}

reflect_text!(IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr);
