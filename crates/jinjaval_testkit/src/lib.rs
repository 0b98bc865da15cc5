//! Shared test helpers for workspace crates.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use jinjaval::marshal::{AnyValue, Environment, HostMut, HostRef, Reflect, Result, Shape, TypeDesc};

/// Resolve the workspace root path.
pub fn workspace_root() -> PathBuf {
	let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
	manifest_dir
		.join("..")
		.join("..")
		.canonicalize()
		.unwrap_or_else(|_| manifest_dir.join("..").join(".."))
}

/// Resolve a fixture path under `<workspace>/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
	workspace_root().join("fixtures").join(name)
}

/// Fixture path rendered as a command-line argument.
pub fn fixture_arg(name: &str) -> String {
	fixture_path(name).display().to_string()
}

/// Resolve the workspace target directory.
pub fn target_dir() -> PathBuf {
	std::env::var_os("CARGO_TARGET_DIR")
		.map(PathBuf::from)
		.unwrap_or_else(|| workspace_root().join("target"))
}

/// Parse command output as JSON, panicking with the raw text on failure.
pub fn parse_json(stdout: &[u8]) -> serde_json::Value {
	serde_json::from_slice(stdout).unwrap_or_else(|err| panic!("stdout should be valid json ({err}): {}", String::from_utf8_lossy(stdout)))
}

/// Captured result of one binary invocation.
pub struct CliRun {
	/// Joined `bin args...` line, for failure messages.
	pub command: String,
	/// Raw process output.
	pub output: Output,
}

/// Run `bin` with `args` and capture its output.
pub fn run_cli(bin: &str, args: &[&str]) -> CliRun {
	let output = Command::new(bin).args(args).output().unwrap_or_else(|err| panic!("{bin} should start: {err}"));
	CliRun {
		command: std::iter::once(bin).chain(args.iter().copied()).collect::<Vec<_>>().join(" "),
		output,
	}
}

impl CliRun {
	/// Stdout as lossy UTF-8.
	pub fn stdout(&self) -> String {
		String::from_utf8_lossy(&self.output.stdout).into_owned()
	}

	/// Stderr as lossy UTF-8.
	pub fn stderr(&self) -> String {
		String::from_utf8_lossy(&self.output.stderr).into_owned()
	}

	/// Assert a zero exit status and return stdout.
	pub fn success(&self) -> String {
		assert!(self.output.status.success(), "`{}` failed with {}: {}", self.command, self.output.status, self.stderr());
		self.stdout()
	}

	/// Assert a zero exit status and parse stdout as JSON.
	pub fn success_json(&self) -> serde_json::Value {
		self.success();
		parse_json(&self.output.stdout)
	}

	/// Assert a failing exit status and return stderr.
	pub fn failure(&self) -> String {
		assert!(!self.output.status.success(), "`{}` unexpectedly succeeded: {}", self.command, self.stdout());
		self.stderr()
	}
}

const VALUE_KEY: &str = "value";

/// Context exposing one borrowed host value under the name `value`.
pub struct ValueCtx<'a>(pub &'a dyn Reflect);

impl Reflect for ValueCtx<'_> {
	fn describe() -> TypeDesc {
		TypeDesc::of::<ValueCtx<'static>>(Shape::Map {
			key: <&str as Reflect>::describe,
			value: <AnyValue as Reflect>::describe,
		})
	}

	fn type_desc(&self) -> TypeDesc {
		Self::describe()
	}

	fn reflect(&self) -> HostRef<'_> {
		HostRef::Map(Box::new(std::iter::once((&VALUE_KEY as &dyn Reflect, self.0))))
	}

	fn reflect_mut(&mut self) -> HostMut<'_> {
		HostMut::Unsupported
	}
}

/// Encode `input`, pass it through the runtime as `value`, and decode the result into `out`.
pub fn through_runtime(input: &dyn Reflect, out: &mut dyn Reflect) -> Result<()> {
	Environment::new().eval_expr_dyn(VALUE_KEY, &ValueCtx(input), Some(out))
}

/// Round-trip `value` through the runtime into a fresh default target.
pub fn round_trip<T: Reflect + Default>(value: &T) -> T {
	let mut out = T::default();
	through_runtime(value, &mut out).unwrap_or_else(|err| panic!("round trip of {} failed: {err}", value.type_desc()));
	out
}
