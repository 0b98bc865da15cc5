use std::path::PathBuf;

use jinjaval::Environment;
use tracing::debug;

use crate::cmd::{Result, context};

#[derive(clap::Args)]
pub struct Args {
	/// Template file to render.
	pub template: PathBuf,
	/// JSON context file, optionally zstd-compressed; `-` reads stdin.
	#[arg(long)]
	pub context: Option<PathBuf>,
	/// Template name used in error locations; defaults to the file name.
	#[arg(long)]
	pub name: Option<String>,
}

/// Render one template file against a JSON context.
pub fn run(args: Args) -> Result<()> {
	let Args { template, context, name } = args;

	let source = std::fs::read_to_string(&template)?;
	let ctx = context::load(context.as_deref())?;
	let name = name.unwrap_or_else(|| template_name(&template));
	debug!(name = %name, len = source.len(), "rendering template");

	let env = Environment::new();
	env.add_template(&name, &source)?;
	let output = env.render_template(&name, &ctx)?;
	println!("{output}");

	Ok(())
}

fn template_name(path: &std::path::Path) -> String {
	path.file_name()
		.map(|name| name.to_string_lossy().into_owned())
		.unwrap_or_else(|| "template".to_owned())
}
