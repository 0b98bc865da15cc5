use std::fmt;

use thiserror::Error;

use crate::marshal::{BoxError, TypeDesc};

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, MarshalError>;

/// Errors produced while encoding, decoding, or calling into the runtime.
#[derive(Debug, Error)]
pub enum MarshalError {
	/// Host type has no runtime value representation.
	#[error("unsupported type {ty}")]
	UnsupportedType {
		/// Offending host type.
		ty: TypeDesc,
	},
	/// Runtime value kind is incompatible with the target type.
	#[error("cannot decode {value} into {ty}")]
	DecodeType {
		/// Kind name of the source value, with the literal for numbers.
		value: String,
		/// Immediate target type.
		ty: TypeDesc,
	},
	/// A text hook returned an error.
	#[error("{hook} on {ty} failed: {source}")]
	TextHook {
		/// Hook function that was invoked.
		hook: &'static str,
		/// Type exposing the hook.
		ty: TypeDesc,
		/// Error returned by the hook.
		source: BoxError,
	},
	/// A binary hook returned an error.
	#[error("{hook} on {ty} failed: {source}")]
	BinaryHook {
		/// Hook function that was invoked.
		hook: &'static str,
		/// Type exposing the hook.
		ty: TypeDesc,
		/// Error returned by the hook.
		source: BoxError,
	},
	/// Decode target is missing or cannot be written.
	#[error("invalid decode target{}", .ty.map(|ty| format!(" {ty}")).unwrap_or_default())]
	InvalidTarget {
		/// Target type when one was supplied.
		ty: Option<TypeDesc>,
	},
	/// Failure reported by the template runtime.
	#[error(transparent)]
	Runtime(#[from] RuntimeError),
}

impl From<minijinja::Error> for MarshalError {
	fn from(err: minijinja::Error) -> Self {
		Self::Runtime(RuntimeError::from(err))
	}
}

/// Error category reported by the template runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeErrorKind {
	/// Operation needed a primitive value.
	NonPrimitive,
	/// Value cannot be used as a mapping key.
	NonKey,
	/// Operation is not valid for its operands.
	InvalidOperation,
	/// Template or expression failed to parse.
	SyntaxError,
	/// Named template does not exist.
	TemplateNotFound,
	/// Callable received extra arguments.
	TooManyArguments,
	/// Callable missed a required argument.
	MissingArgument,
	/// Filter is not registered.
	UnknownFilter,
	/// Function is not registered.
	UnknownFunction,
	/// Test is not registered.
	UnknownTest,
	/// Method does not exist on the receiver.
	UnknownMethod,
	/// String literal has an invalid escape.
	BadEscape,
	/// Strict undefined access.
	UndefinedError,
	/// Host value could not be turned into a runtime value.
	BadSerialization,
	/// Included template failed to render.
	BadInclude,
	/// Block failed to render.
	EvalBlock,
	/// Value could not be unpacked into targets.
	CannotUnpack,
	/// Output sink failed.
	WriteFailure,
	/// Anything the runtime does not categorize.
	Unknown,
}

impl RuntimeErrorKind {
	/// Human-readable label for the category.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::NonPrimitive => "not a primitive",
			Self::NonKey => "not a key type",
			Self::InvalidOperation => "invalid operation",
			Self::SyntaxError => "syntax error",
			Self::TemplateNotFound => "template not found",
			Self::TooManyArguments => "too many arguments",
			Self::MissingArgument => "missing argument",
			Self::UnknownFilter => "unknown filter",
			Self::UnknownFunction => "unknown function",
			Self::UnknownTest => "unknown test",
			Self::UnknownMethod => "unknown method",
			Self::BadEscape => "bad string escape",
			Self::UndefinedError => "undefined value",
			Self::BadSerialization => "could not serialize to value",
			Self::BadInclude => "could not render include",
			Self::EvalBlock => "could not render block",
			Self::CannotUnpack => "cannot unpack",
			Self::WriteFailure => "failed to write output",
			Self::Unknown => "unknown error",
		}
	}
}

impl fmt::Display for RuntimeErrorKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl From<minijinja::ErrorKind> for RuntimeErrorKind {
	fn from(kind: minijinja::ErrorKind) -> Self {
		use minijinja::ErrorKind as K;

		match kind {
			K::NonPrimitive => Self::NonPrimitive,
			K::NonKey => Self::NonKey,
			K::InvalidOperation => Self::InvalidOperation,
			K::SyntaxError => Self::SyntaxError,
			K::TemplateNotFound => Self::TemplateNotFound,
			K::TooManyArguments => Self::TooManyArguments,
			K::MissingArgument => Self::MissingArgument,
			K::UnknownFilter => Self::UnknownFilter,
			K::UnknownFunction => Self::UnknownFunction,
			K::UnknownTest => Self::UnknownTest,
			K::UnknownMethod => Self::UnknownMethod,
			K::BadEscape => Self::BadEscape,
			K::UndefinedError => Self::UndefinedError,
			K::BadSerialization => Self::BadSerialization,
			K::BadInclude => Self::BadInclude,
			K::EvalBlock => Self::EvalBlock,
			K::CannotUnpack => Self::CannotUnpack,
			K::WriteFailure => Self::WriteFailure,
			_ => Self::Unknown,
		}
	}
}

/// Failure reported by the template runtime, detached from the runtime's error type.
#[derive(Debug, Clone)]
pub struct RuntimeError {
	/// Error category.
	pub kind: RuntimeErrorKind,
	/// Optional detail message.
	pub detail: Option<String>,
	/// Template name the error occurred in.
	pub name: Option<String>,
	/// Line within the template.
	pub line: Option<usize>,
}

impl fmt::Display for RuntimeError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.kind == RuntimeErrorKind::Unknown {
			return f.write_str(self.kind.as_str());
		}

		write!(f, "{}", self.kind)?;
		if let Some(detail) = &self.detail {
			write!(f, ": {detail}")?;
		}
		if let Some(name) = &self.name {
			write!(f, " (in {name}:{})", self.line.unwrap_or(0))?;
		}
		Ok(())
	}
}

impl std::error::Error for RuntimeError {}

impl From<minijinja::Error> for RuntimeError {
	fn from(err: minijinja::Error) -> Self {
		Self {
			kind: err.kind().into(),
			detail: err.detail().map(str::to_owned),
			name: err.name().map(str::to_owned),
			line: err.line(),
		}
	}
}
