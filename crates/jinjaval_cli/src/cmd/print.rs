use jinjaval::{DynValue, Kind};

use crate::cmd::Result;
use crate::cmd::util::truncate;

/// Output truncation limits for kind trees.
#[derive(Debug, Clone, Copy)]
pub struct PrintOptions {
	/// Maximum recursive depth for nested sequences and mappings.
	pub max_depth: u32,
	/// Maximum number of children listed per container.
	pub max_items: usize,
	/// Maximum number of Unicode scalar values shown for text previews.
	pub max_string_len: usize,
}

impl Default for PrintOptions {
	fn default() -> Self {
		Self {
			max_depth: 8,
			max_items: 32,
			max_string_len: 80,
		}
	}
}

impl PrintOptions {
	/// Preset for single-line summaries.
	pub fn compact() -> Self {
		Self {
			max_depth: 2,
			max_items: 8,
			max_string_len: 32,
		}
	}
}

/// One node of a runtime value's kind tree.
#[derive(Debug, serde::Serialize)]
pub struct KindNode {
	/// Key or index under the parent, absent for the root.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub label: Option<String>,
	/// Runtime kind label.
	pub kind: &'static str,
	/// Element count, when the runtime reports one.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub len: Option<usize>,
	/// Rendered scalar preview.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub preview: Option<String>,
	/// Child nodes of sequences and mappings.
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub children: Vec<KindNode>,
	/// Children left out by the item or depth limit.
	#[serde(skip_serializing_if = "is_zero")]
	pub omitted: usize,
}

fn is_zero(value: &usize) -> bool {
	*value == 0
}

/// Walk `value` with the iteration protocol and build its kind tree.
pub fn kind_tree(value: &DynValue, options: PrintOptions) -> Result<KindNode> {
	build(value, None, 0, options)
}

fn build(value: &DynValue, label: Option<String>, depth: u32, options: PrintOptions) -> Result<KindNode> {
	let kind = value.kind();
	let mut node = KindNode {
		label,
		kind: kind.as_str(),
		len: value.len(),
		preview: None,
		children: Vec::new(),
		omitted: 0,
	};

	match kind {
		Kind::Sequence | Kind::Iterable => {
			if depth >= options.max_depth {
				node.omitted = node.len.unwrap_or(0);
				return Ok(node);
			}
			let mut items = value.try_iter()?;
			for (idx, item) in items.by_ref().take(options.max_items).enumerate() {
				node.children.push(build(&item, Some(idx.to_string()), depth + 1, options)?);
			}
			node.omitted = items.count();
		}
		Kind::Mapping => {
			if depth >= options.max_depth {
				node.omitted = node.len.unwrap_or(0);
				return Ok(node);
			}
			let mut pairs = value.try_pairs()?;
			for pair in pairs.by_ref().take(options.max_items) {
				let (key, item) = pair?;
				node.children.push(build(&item, Some(key_label(&key)), depth + 1, options)?);
			}
			node.omitted = pairs.count();
		}
		Kind::Bytes => {}
		Kind::String => node.preview = value.as_str().map(|text| format!("{:?}", truncate(text, options.max_string_len))),
		_ => node.preview = Some(truncate(&value.to_string(), options.max_string_len)),
	}

	Ok(node)
}

fn key_label(key: &DynValue) -> String {
	match key.as_str() {
		Some(text) => text.to_owned(),
		None => key.to_string(),
	}
}

/// Print a kind tree as indented text.
pub fn print_tree(node: &KindNode, indent: usize) {
	let pad = " ".repeat(indent);
	let mut line = match &node.label {
		Some(label) => format!("{pad}{label}: {}", node.kind),
		None => format!("{pad}{}", node.kind),
	};
	if let Some(len) = node.len {
		line.push_str(&format!("[{len}]"));
	}
	if let Some(preview) = &node.preview {
		line.push_str(&format!(" = {preview}"));
	}
	println!("{line}");

	for child in &node.children {
		print_tree(child, indent + 2);
	}
	if node.omitted > 0 {
		println!("{pad}  ... {} more", node.omitted);
	}
}

#[cfg(test)]
mod tests {
	use jinjaval::{AnyValue, encode};

	use super::{PrintOptions, kind_tree};

	fn sample() -> AnyValue {
		AnyValue::Map(vec![
			(AnyValue::from("name"), AnyValue::from("world")),
			(AnyValue::from("ids"), AnyValue::Seq((0..5).map(AnyValue::Int).collect())),
			(AnyValue::from("raw"), AnyValue::Bytes(vec![1, 2, 3])),
		])
	}

	#[test]
	fn tree_follows_insertion_order() {
		let value = encode(&sample()).expect("encodes");
		let tree = kind_tree(&value, PrintOptions::default()).expect("walks");

		assert_eq!(tree.kind, "map");
		let labels: Vec<_> = tree.children.iter().filter_map(|child| child.label.as_deref()).collect();
		assert_eq!(labels, ["name", "ids", "raw"]);
		assert_eq!(tree.children[0].preview.as_deref(), Some("\"world\""));
		assert_eq!(tree.children[1].kind, "seq");
		assert_eq!(tree.children[1].children.len(), 5);
		assert_eq!(tree.children[2].kind, "bytes");
	}

	#[test]
	fn compact_preset_limits_items_and_depth() {
		let mut options = PrintOptions::compact();
		options.max_items = 2;
		let value = encode(&sample()).expect("encodes");
		let tree = kind_tree(&value, options).expect("walks");

		assert_eq!(tree.children.len(), 2);
		assert_eq!(tree.omitted, 1);
		assert_eq!(tree.children[1].children.len(), 2);
		assert_eq!(tree.children[1].omitted, 3);

		options.max_depth = 0;
		let shallow = kind_tree(&value, options).expect("walks");
		assert!(shallow.children.is_empty());
		assert_eq!(shallow.omitted, 3);
	}
}
