//! Conversion between host values and runtime values.
//!
//! [`encode`] walks a [`Reflect`] value and builds a [`DynValue`]; [`decode`]
//! writes a [`DynValue`] into a settable [`Reflect`] location. [`Environment`]
//! wraps the template runtime that consumes and produces those values.

/// Open value used as untyped encode source and decode target.
pub mod any;
/// Decoder from runtime values into host locations.
pub mod decode;
/// Static type descriptors and record field tables.
pub mod desc;
/// Encoder from host values into runtime values.
pub mod encode;
/// Error types for marshaling and runtime failures.
pub mod error;
/// Owned runtime value handles and builders.
pub mod handle;
/// User-supplied text/binary conversion hooks.
pub mod hook;
/// Lazy iteration over runtime values.
pub mod iter;
/// Runtime value kind taxonomy.
pub mod kind;
/// Reflection views over host values.
pub mod reflect;
/// Template runtime boundary.
pub mod runtime;

pub use any::AnyValue;
pub use decode::{decode, decode_into};
pub use desc::{FieldMeta, FieldTable, Shape, TypeDesc, Width};
pub use encode::encode;
pub use error::{MarshalError, Result, RuntimeError, RuntimeErrorKind};
pub use handle::{DynValue, MapBuilder, SeqBuilder};
pub use hook::{BoxError, MarshalText, UnmarshalBinary, UnmarshalText};
pub use iter::{DynIter, DynPairs};
pub use kind::Kind;
pub use reflect::{ArrayMut, HostMut, HostRef, MapMut, PointerMut, Reflect, SeqMut};
pub use runtime::Environment;
