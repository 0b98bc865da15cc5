//! Conversion hooks a type can expose to take over its own encode or decode.
//!
//! Hooks are surfaced through [`Reflect::text_hook`](crate::marshal::Reflect::text_hook),
//! [`Reflect::binary_hook`](crate::marshal::Reflect::binary_hook) and
//! [`Reflect::marshal_hook`](crate::marshal::Reflect::marshal_hook). The derive
//! macro wires them up from `#[jinjaval(unmarshal_text)]`, `#[jinjaval(unmarshal_binary)]`
//! and `#[jinjaval(marshal_text)]`.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

/// Boxed error returned by hooks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Decode from the string form of a `string` or `plain` runtime value.
pub trait UnmarshalText {
	/// Replace `self` with the value parsed from `text`.
	fn unmarshal_text(&mut self, text: &str) -> Result<(), BoxError>;
}

/// Decode from the raw content of a `bytes` runtime value.
pub trait UnmarshalBinary {
	/// Replace `self` with the value parsed from `data`.
	fn unmarshal_binary(&mut self, data: &[u8]) -> Result<(), BoxError>;
}

/// Encode as a `string` runtime value.
pub trait MarshalText {
	/// Text form of `self`.
	fn marshal_text(&self) -> Result<String, BoxError>;
}

macro_rules! text_via_str {
	($($ty:ty),* $(,)?) => {
		$(
			impl UnmarshalText for $ty {
				fn unmarshal_text(&mut self, text: &str) -> Result<(), BoxError> {
					*self = text.parse()?;
					Ok(())
				}
			}

			impl MarshalText for $ty {
				fn marshal_text(&self) -> Result<String, BoxError> {
					Ok(self.to_string())
				}
			}
		)*
	};
}

text_via_str!(IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr);
