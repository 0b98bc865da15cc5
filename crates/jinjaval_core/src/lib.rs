//! Public library API for marshaling Rust values to and from MiniJinja runtime values.

extern crate self as jinjaval;

pub mod marshal;

pub use jinjaval_derive::Reflect;
pub use marshal::{AnyValue, DynValue, Environment, Kind, MarshalError, Reflect, Result, decode, encode};
