use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, trace};

use crate::marshal::decode::ensure_settable;
use crate::marshal::{DynValue, Reflect, Result, RuntimeError, RuntimeErrorKind, decode, encode};

/// Template runtime shared between threads.
///
/// Every runtime call runs inside a [`Session`] that holds the runtime lock
/// from the call until its error slot has been read and cleared, so a failure
/// is always reported to the caller that caused it.
pub struct Environment {
	state: Mutex<RuntimeState>,
}

struct RuntimeState {
	env: minijinja::Environment<'static>,
	last_error: Option<minijinja::Error>,
}

/// Exclusive access to the runtime for one call-then-read-error sequence.
struct Session<'a> {
	state: MutexGuard<'a, RuntimeState>,
}

impl Session<'_> {
	fn call<R>(&mut self, op: impl FnOnce(&mut minijinja::Environment<'static>) -> std::result::Result<R, minijinja::Error>) -> Option<R> {
		let state = &mut *self.state;
		match op(&mut state.env) {
			Ok(out) => Some(out),
			Err(err) => {
				state.last_error = Some(err);
				None
			}
		}
	}

	fn take_error(&mut self) -> RuntimeError {
		match self.state.last_error.take() {
			Some(err) => err.into(),
			None => RuntimeError {
				kind: RuntimeErrorKind::Unknown,
				detail: None,
				name: None,
				line: None,
			},
		}
	}

	fn finish<R>(mut self, out: Option<R>) -> Result<R> {
		match out {
			Some(out) => Ok(out),
			None => {
				let err = self.take_error();
				debug!(kind = %err.kind, name = ?err.name, line = ?err.line, "runtime call failed");
				Err(err.into())
			}
		}
	}
}

impl Default for Environment {
	fn default() -> Self {
		Self::new()
	}
}

impl Environment {
	/// Environment with the runtime's default configuration and no templates.
	pub fn new() -> Self {
		Self {
			state: Mutex::new(RuntimeState {
				env: minijinja::Environment::new(),
				last_error: None,
			}),
		}
	}

	fn session(&self) -> Session<'_> {
		Session {
			state: self.state.lock().unwrap_or_else(PoisonError::into_inner),
		}
	}

	/// Register a template under `name`, replacing any existing one.
	pub fn add_template(&self, name: &str, source: &str) -> Result<()> {
		let mut session = self.session();
		let out = session.call(|env| env.add_template_owned(name.to_owned(), source.to_owned()));
		session.finish(out)
	}

	/// Remove the template registered under `name`.
	pub fn remove_template(&self, name: &str) {
		let mut session = self.session();
		session.call(|env| {
			env.remove_template(name);
			Ok(())
		});
	}

	/// Remove every registered template.
	pub fn clear_templates(&self) {
		let mut session = self.session();
		session.call(|env| {
			env.clear_templates();
			Ok(())
		});
	}

	/// Render the registered template `name` with `ctx` encoded as its context.
	pub fn render_template(&self, name: &str, ctx: &dyn Reflect) -> Result<String> {
		let ctx = encode(ctx)?;
		trace!(name, "rendering template");

		let mut session = self.session();
		let out = session.call(|env| env.get_template(name)?.render(ctx.as_runtime()));
		session.finish(out)
	}

	/// Render `source` as a one-off template called `name`.
	pub fn render_named_str(&self, name: &str, source: &str, ctx: &dyn Reflect) -> Result<String> {
		let ctx = encode(ctx)?;
		trace!(name, "rendering template source");

		let mut session = self.session();
		let out = session.call(|env| env.render_named_str(name, source, ctx.as_runtime()));
		session.finish(out)
	}

	/// Evaluate an expression with `ctx` encoded as its context.
	pub fn eval(&self, expr: &str, ctx: &dyn Reflect) -> Result<DynValue> {
		let ctx = encode(ctx)?;
		trace!(expr, "evaluating expression");

		let mut session = self.session();
		let out = session.call(|env| env.compile_expression_owned(expr.to_owned())?.eval(ctx.as_runtime()));
		session.finish(out).map(DynValue::from_runtime)
	}

	/// Evaluate an expression and decode its result into `out`.
	pub fn eval_expr<T: Reflect>(&self, expr: &str, ctx: &dyn Reflect, out: &mut T) -> Result<()> {
		self.eval_expr_dyn(expr, ctx, Some(out as &mut dyn Reflect))
	}

	/// Evaluate an expression and decode its result into `out`.
	///
	/// A missing or unwritable target is rejected before the expression is evaluated.
	pub fn eval_expr_dyn(&self, expr: &str, ctx: &dyn Reflect, out: Option<&mut dyn Reflect>) -> Result<()> {
		let out = ensure_settable(out)?;
		let value = self.eval(expr, ctx)?;
		decode(&value, out)
	}
}
