use std::path::PathBuf;

use jinjaval::{AnyValue, Environment, Reflect};
use serde_json::Value as JsonValue;

use crate::cmd::util::emit_json;
use crate::cmd::{Result, context};

/// Host type the evaluated result is decoded into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Target {
	/// Open value accepting every kind.
	#[default]
	Any,
	/// Boolean.
	Bool,
	/// Signed 64-bit integer.
	Int,
	/// Unsigned 64-bit integer.
	Uint,
	/// 64-bit float.
	Float,
	/// Text.
	String,
	/// Byte vector.
	Bytes,
}

impl Target {
	/// Render target as a stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Any => "any",
			Self::Bool => "bool",
			Self::Int => "int",
			Self::Uint => "uint",
			Self::Float => "float",
			Self::String => "string",
			Self::Bytes => "bytes",
		}
	}
}

#[derive(clap::Args)]
pub struct Args {
	/// Expression to evaluate.
	pub expr: String,
	/// JSON context file, optionally zstd-compressed; `-` reads stdin.
	#[arg(long)]
	pub context: Option<PathBuf>,
	/// Decode target for the result.
	#[arg(long = "as", value_enum, default_value_t)]
	pub target: Target,
	#[arg(long)]
	pub json: bool,
}

/// Evaluate an expression and print the decoded result.
pub fn run(args: Args) -> Result<()> {
	let Args { expr, context, target, json } = args;

	let ctx = context::load(context.as_deref())?;
	let env = Environment::new();
	let value = evaluate(&env, &expr, &ctx, target)?;

	if json {
		let payload = EvalJson {
			expr,
			target: target.as_str(),
			value,
		};
		return emit_json(&payload);
	}

	match value {
		JsonValue::String(text) => println!("{text}"),
		other => println!("{other}"),
	}
	Ok(())
}

/// Evaluate `expr` and decode the result into `target`, rendered as JSON.
pub fn evaluate(env: &Environment, expr: &str, ctx: &dyn Reflect, target: Target) -> Result<JsonValue> {
	let value = match target {
		Target::Any => context::to_json(&eval_as::<AnyValue>(env, expr, ctx)?),
		Target::Bool => serde_json::json!(eval_as::<bool>(env, expr, ctx)?),
		Target::Int => serde_json::json!(eval_as::<i64>(env, expr, ctx)?),
		Target::Uint => serde_json::json!(eval_as::<u64>(env, expr, ctx)?),
		Target::Float => serde_json::json!(eval_as::<f64>(env, expr, ctx)?),
		Target::String => serde_json::json!(eval_as::<String>(env, expr, ctx)?),
		Target::Bytes => serde_json::json!(eval_as::<Vec<u8>>(env, expr, ctx)?),
	};
	Ok(value)
}

fn eval_as<T: Reflect + Default>(env: &Environment, expr: &str, ctx: &dyn Reflect) -> Result<T> {
	let mut out = T::default();
	env.eval_expr(expr, ctx, &mut out)?;
	Ok(out)
}

#[derive(serde::Serialize)]
struct EvalJson {
	expr: String,
	#[serde(rename = "as")]
	target: &'static str,
	value: JsonValue,
}

#[cfg(test)]
mod tests {
	use jinjaval::{AnyValue, Environment, MarshalError};
	use serde_json::json;

	use super::{Target, evaluate};
	use crate::cmd::CliError;

	fn ctx() -> AnyValue {
		AnyValue::Map(vec![(AnyValue::from("x"), AnyValue::Int(3)), (AnyValue::from("name"), AnyValue::from("ada"))])
	}

	#[test]
	fn targets_shape_the_result() {
		let env = Environment::new();
		assert_eq!(evaluate(&env, "x * 2", &ctx(), Target::Any).expect("any"), json!(6.0));
		assert_eq!(evaluate(&env, "x * 2", &ctx(), Target::Int).expect("int"), json!(6));
		assert_eq!(evaluate(&env, "x > 2", &ctx(), Target::Bool).expect("bool"), json!(true));
		assert_eq!(evaluate(&env, "name | upper", &ctx(), Target::String).expect("string"), json!("ADA"));
	}

	#[test]
	fn undefined_result_keeps_the_default() {
		let env = Environment::new();
		assert_eq!(evaluate(&env, "missing", &ctx(), Target::Int).expect("no-op"), json!(0));
		assert_eq!(evaluate(&env, "missing", &ctx(), Target::Any).expect("no-op"), json!(null));
	}

	#[test]
	fn kind_mismatch_is_reported() {
		let env = Environment::new();
		let Err(err) = evaluate(&env, "name", &ctx(), Target::Bool) else {
			panic!("string into bool should fail");
		};
		assert!(matches!(err, CliError::Marshal(MarshalError::DecodeType { .. })), "{err}");
	}
}
