/// JSON context loading and conversion.
pub mod context;
/// Expression evaluation command.
pub mod eval;
/// Context kind tree command.
pub mod kinds;
/// Log subscriber setup.
pub mod logging;
/// Shared kind-tree printer.
pub mod print;
/// Template rendering command.
pub mod render;
/// Shared CLI utility helpers.
pub mod util;

use thiserror::Error;

/// CLI result type.
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors surfaced to the command line.
#[derive(Debug, Error)]
pub enum CliError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Context or output JSON failure.
	#[error("json: {0}")]
	Json(#[from] serde_json::Error),
	/// Marshaling or template runtime failure.
	#[error(transparent)]
	Marshal(#[from] jinjaval::MarshalError),
	/// Decompression output exceeded the configured safety limit.
	#[error("decompressed context exceeded limit {limit} bytes")]
	DecompressedTooLarge {
		/// Maximum allowed output bytes.
		limit: usize,
	},
}
