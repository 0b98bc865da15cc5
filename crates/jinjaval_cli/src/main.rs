#![allow(missing_docs)]

use clap::{Parser, Subcommand};

mod cmd;

#[derive(Parser)]
#[command(name = "jinjaval", about = "Render templates and evaluate expressions against JSON contexts")]
struct Cli {
	/// Increase log verbosity (-v debug, -vv trace).
	#[arg(short, long, action = clap::ArgAction::Count, global = true)]
	verbose: u8,
	/// Only log errors.
	#[arg(short, long, global = true)]
	quiet: bool,
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Render a template file.
	Render(cmd::render::Args),
	/// Evaluate an expression and print its decoded result.
	Eval(cmd::eval::Args),
	/// Print the runtime kind of every value in a context.
	Kinds(cmd::kinds::Args),
}

fn main() {
	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run() -> cmd::Result<()> {
	let cli = Cli::parse();
	cmd::logging::init(cli.verbose, cli.quiet);

	match cli.command {
		Commands::Render(args) => cmd::render::run(args),
		Commands::Eval(args) => cmd::eval::run(args),
		Commands::Kinds(args) => cmd::kinds::run(args),
	}
}
