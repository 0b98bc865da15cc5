use std::io::Read;
use std::path::Path;

use jinjaval::AnyValue;
use serde_json::{Map, Number, Value as JsonValue};
use tracing::debug;

use crate::cmd::{CliError, Result};

const MAX_DECOMPRESSED_BYTES: usize = 64 * 1024 * 1024;
/// zstd frame magic marking a compressed context file.
pub const ZSTD_MAGIC: [u8; 4] = [0x28, 0xB5, 0x2F, 0xFD];

/// Compression mode detected for a context file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
	/// Plain JSON text.
	None,
	/// zstd-compressed JSON text.
	Zstd,
}

impl Compression {
	/// Render compression mode as a stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::None => "none",
			Self::Zstd => "zstd",
		}
	}
}

/// Load a JSON context from `path` (`-` reads stdin); no path yields an empty map.
pub fn load(path: Option<&Path>) -> Result<AnyValue> {
	let Some(path) = path else {
		return Ok(AnyValue::Map(Vec::new()));
	};

	let raw = read_source(path)?;
	let (compression, bytes) = decode_bytes(raw)?;
	debug!(path = %path.display(), compression = compression.as_str(), len = bytes.len(), "loaded context");

	let json: JsonValue = serde_json::from_slice(&bytes)?;
	Ok(from_json(json))
}

/// Read a whole file, or stdin for `-`.
pub fn read_source(path: &Path) -> Result<Vec<u8>> {
	if path.as_os_str() == "-" {
		let mut raw = Vec::new();
		std::io::stdin().read_to_end(&mut raw)?;
		return Ok(raw);
	}
	Ok(std::fs::read(path)?)
}

/// Detect and decode compression, returning `(mode, decoded_bytes)`.
pub fn decode_bytes(raw: Vec<u8>) -> Result<(Compression, Vec<u8>)> {
	if raw.starts_with(&ZSTD_MAGIC) {
		let out = decode_zstd(&raw)?;
		return Ok((Compression::Zstd, out));
	}
	Ok((Compression::None, raw))
}

fn decode_zstd(raw: &[u8]) -> Result<Vec<u8>> {
	let mut decoder = zstd::stream::read::Decoder::new(raw)?;
	let mut out = Vec::new();
	let mut buf = [0_u8; 8192];

	loop {
		let read = decoder.read(&mut buf)?;
		if read == 0 {
			break;
		}

		if out.len() + read > MAX_DECOMPRESSED_BYTES {
			return Err(CliError::DecompressedTooLarge { limit: MAX_DECOMPRESSED_BYTES });
		}

		out.extend_from_slice(&buf[..read]);
	}

	Ok(out)
}

/// Convert parsed JSON into an open value, keeping object key order.
pub fn from_json(json: JsonValue) -> AnyValue {
	match json {
		JsonValue::Null => AnyValue::Nil,
		JsonValue::Bool(v) => AnyValue::Bool(v),
		JsonValue::Number(n) => {
			if let Some(v) = n.as_i64() {
				AnyValue::Int(v)
			} else if let Some(v) = n.as_u64() {
				AnyValue::Uint(v)
			} else {
				AnyValue::Float(n.as_f64().unwrap_or(f64::NAN))
			}
		}
		JsonValue::String(v) => AnyValue::String(v),
		JsonValue::Array(items) => AnyValue::Seq(items.into_iter().map(from_json).collect()),
		JsonValue::Object(entries) => AnyValue::Map(entries.into_iter().map(|(k, v)| (AnyValue::String(k), from_json(v))).collect()),
	}
}

/// Convert an open value into JSON; non-string keys are rendered as text.
pub fn to_json(value: &AnyValue) -> JsonValue {
	match value {
		AnyValue::Nil => JsonValue::Null,
		AnyValue::Bool(v) => JsonValue::Bool(*v),
		AnyValue::Byte(v) => serde_json::json!(v),
		AnyValue::Int(v) => serde_json::json!(v),
		AnyValue::Uint(v) => serde_json::json!(v),
		AnyValue::Float(v) => Number::from_f64(*v).map_or(JsonValue::Null, JsonValue::Number),
		AnyValue::String(v) => JsonValue::String(v.clone()),
		AnyValue::Bytes(v) => JsonValue::Array(v.iter().map(|b| serde_json::json!(b)).collect()),
		AnyValue::Seq(items) => JsonValue::Array(items.iter().map(to_json).collect()),
		AnyValue::Map(entries) => {
			let fields: Map<String, JsonValue> = entries.iter().map(|(k, v)| (key_text(k), to_json(v))).collect();
			JsonValue::Object(fields)
		}
	}
}

fn key_text(key: &AnyValue) -> String {
	match key {
		AnyValue::String(v) => v.clone(),
		other => match to_json(other) {
			JsonValue::String(v) => v,
			json => json.to_string(),
		},
	}
}
