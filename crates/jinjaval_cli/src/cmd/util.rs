use serde::Serialize;

use crate::cmd::Result;

/// Print `payload` as pretty JSON on stdout.
pub fn emit_json<T: Serialize>(payload: &T) -> Result<()> {
	println!("{}", serde_json::to_string_pretty(payload)?);
	Ok(())
}

/// Truncate `text` to at most `max` Unicode scalar values, marking the cut.
pub fn truncate(text: &str, max: usize) -> String {
	match text.char_indices().nth(max) {
		Some((end, _)) => format!("{}...", &text[..end]),
		None => text.to_owned(),
	}
}
