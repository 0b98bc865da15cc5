use std::path::PathBuf;

use jinjaval::encode;

use crate::cmd::print::{PrintOptions, kind_tree, print_tree};
use crate::cmd::util::emit_json;
use crate::cmd::{Result, context};

#[derive(clap::Args)]
pub struct Args {
	/// JSON context file, optionally zstd-compressed; `-` reads stdin.
	#[arg(long)]
	pub context: Option<PathBuf>,
	#[arg(long = "max-depth")]
	pub max_depth: Option<u32>,
	#[arg(long = "max-items")]
	pub max_items: Option<usize>,
	/// Start from the compact limits; `--max-depth`/`--max-items` still override them.
	#[arg(long)]
	pub compact: bool,
	#[arg(long)]
	pub json: bool,
}

/// Encode a context and print the runtime kind of every value in it.
pub fn run(args: Args) -> Result<()> {
	let Args {
		context,
		max_depth,
		max_items,
		compact,
		json,
	} = args;

	let mut options = if compact { PrintOptions::compact() } else { PrintOptions::default() };
	if let Some(max_depth) = max_depth {
		options.max_depth = max_depth;
	}
	if let Some(max_items) = max_items {
		options.max_items = max_items;
	}

	let ctx = context::load(context.as_deref())?;
	let value = encode(&ctx)?;
	let tree = kind_tree(&value, options)?;
	value.release();

	if json {
		return emit_json(&tree);
	}

	print_tree(&tree, 0);
	Ok(())
}
