//! Error types for scope resolution.

use thiserror::Error;
use vista_lexer::ParseError;
use vista_value::ValueError;

/// Errors raised while evaluating a lazy expression.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
	/// A field referenced by the expression does not exist at flush time.
	#[error("missing field '{0}'")]
	MissingField(String),

	/// A binary operator was applied to operands it does not support.
	#[error("unsupported operand types for {op}: {left} and {right}")]
	TypeMismatch {
		op: &'static str,
		left: &'static str,
		right: &'static str,
	},

	/// A unary operator was applied to an operand it does not support.
	#[error("unsupported operand type for unary {op}: {operand}")]
	InvalidOperand { op: &'static str, operand: &'static str },

	#[error("division by zero")]
	DivisionByZero,
}

/// Errors raised by scopes, registries and entry points.
#[derive(Debug, Error)]
pub enum ScopeError {
	/// A view name was registered twice in one scope.
	#[error("view '{view}' is already registered in scope '{scope}'")]
	DuplicateView { scope: String, view: String },

	/// A view was activated or chained to without being registered.
	#[error("unknown view '{view}' in scope '{scope}'")]
	UnknownView { scope: String, view: String },

	/// A scope name was registered twice in one registry or multi-scope.
	#[error("scope '{0}' is already registered")]
	DuplicateScope(String),

	#[error("unknown scope '{0}'")]
	UnknownScope(String),

	/// The caller bound a parameter the active scope injects.
	#[error("parameter '{0}' is injected by its scope and cannot also be passed by the caller")]
	InjectionConflict(String),

	#[error("missing argument '{0}'")]
	MissingArgument(String),

	/// More positional arguments than free parameters.
	#[error("too many positional arguments: expected at most {expected}, got {got}")]
	TooManyArguments { expected: usize, got: usize },

	/// A keyword argument named a parameter already bound positionally.
	#[error("multiple values for argument '{0}'")]
	DuplicateArgument(String),

	/// A keyword argument named no declared parameter.
	#[error("unexpected keyword argument '{0}'")]
	UnexpectedArgument(String),

	/// More pause scopes were exited than entered.
	#[error("scope '{0}' resumed more times than it was paused")]
	PauseUnderflow(String),

	/// A token could not be routed to exactly one scope.
	#[error("cannot route '{0}' to a single scope")]
	AmbiguousToken(String),

	/// A token is neither a view name nor a `key=value` pair.
	#[error("invalid assignment '{0}'")]
	InvalidAssignment(String),

	#[error(transparent)]
	Eval(#[from] EvalError),

	#[error(transparent)]
	Value(#[from] ValueError),

	#[error(transparent)]
	Parse(#[from] ParseError),
}

/// Result type for scope operations.
pub type Result<T> = std::result::Result<T, ScopeError>;
