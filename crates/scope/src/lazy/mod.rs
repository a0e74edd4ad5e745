//! Deferred statements for view bodies.
//!
//! A view records a [`LazyBlock`] instead of writing fields directly when a
//! value depends on the *final* state of the namespace. The block is flushed
//! after every view and direct assignment has taken effect, so conditions
//! such as `field("learning_rate").equals(0.1)` see command-line overrides.
//!
//! ```ignore
//! cfg.lazy(|block| {
//!     block.branch(
//!         field("learning_rate").equals(0.1),
//!         |then| { then.assign("batch_size", field("factor") * 256); },
//!         |otherwise| { otherwise.assign("batch_size", 1024); },
//!     );
//! });
//! ```
//!
//! Blocks recorded with `lazy_compiled` are looked up by [`LazyBlock::signature`]
//! in a shared [`LazyCache`] and run as pre-built closures. Both paths produce
//! the same namespace.

mod compile;
mod eval;

use std::fmt;
use std::ops;

use vista_value::{Namespace, Value};

pub use compile::{CompiledBlock, LazyCache};

use crate::{EvalError, Result};


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
	Neg,
	Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
	Add,
	Sub,
	Mul,
	Div,
	Rem,
	Eq,
	Ne,
	Lt,
	Le,
	Gt,
	Ge,
	And,
	Or,
}

impl BinaryOp {
	pub fn symbol(self) -> &'static str {
		match self {
			Self::Add => "+",
			Self::Sub => "-",
			Self::Mul => "*",
			Self::Div => "/",
			Self::Rem => "%",
			Self::Eq => "==",
			Self::Ne => "!=",
			Self::Lt => "<",
			Self::Le => "<=",
			Self::Gt => ">",
			Self::Ge => ">=",
			Self::And => "&&",
			Self::Or => "||",
		}
	}
}

impl UnaryOp {
	pub fn symbol(self) -> &'static str {
		match self {
			Self::Neg => "-",
			Self::Not => "!",
		}
	}
}

/// An expression over namespace fields, evaluated at flush time.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
	Lit(Value),
	/// Dotted path into the namespace being resolved.
	Field(String),
	Unary(UnaryOp, Box<Expr>),
	Binary(BinaryOp, Box<Expr>, Box<Expr>),
}

/// A literal expression.
pub fn lit(value: impl Into<Value>) -> Expr {
	Expr::Lit(value.into())
}

/// A reference to the field at `path`, read when the block is flushed.
pub fn field(path: impl Into<String>) -> Expr {
	Expr::Field(path.into())
}

impl Expr {
	fn binary(self, op: BinaryOp, rhs: impl Into<Expr>) -> Expr {
		Expr::Binary(op, Box::new(self), Box::new(rhs.into()))
	}

	/// Equality that compares `Int` and `Float` numerically.
	pub fn equals(self, rhs: impl Into<Expr>) -> Expr {
		self.binary(BinaryOp::Eq, rhs)
	}

	pub fn not_equals(self, rhs: impl Into<Expr>) -> Expr {
		self.binary(BinaryOp::Ne, rhs)
	}

	pub fn lt(self, rhs: impl Into<Expr>) -> Expr {
		self.binary(BinaryOp::Lt, rhs)
	}

	pub fn le(self, rhs: impl Into<Expr>) -> Expr {
		self.binary(BinaryOp::Le, rhs)
	}

	pub fn gt(self, rhs: impl Into<Expr>) -> Expr {
		self.binary(BinaryOp::Gt, rhs)
	}

	pub fn ge(self, rhs: impl Into<Expr>) -> Expr {
		self.binary(BinaryOp::Ge, rhs)
	}

	/// Short-circuiting conjunction over truthiness.
	pub fn and(self, rhs: impl Into<Expr>) -> Expr {
		self.binary(BinaryOp::And, rhs)
	}

	/// Short-circuiting disjunction over truthiness.
	pub fn or(self, rhs: impl Into<Expr>) -> Expr {
		self.binary(BinaryOp::Or, rhs)
	}

	/// Evaluates against `ns` by walking the tree.
	pub fn eval(&self, ns: &Namespace) -> std::result::Result<Value, EvalError> {
		match self {
			Expr::Lit(value) => Ok(value.clone()),
			Expr::Field(path) => ns
				.get(path)
				.cloned()
				.ok_or_else(|| EvalError::MissingField(path.clone())),
			Expr::Unary(op, operand) => eval::unary(*op, operand.eval(ns)?),
			Expr::Binary(op @ (BinaryOp::And | BinaryOp::Or), lhs, rhs) => {
				let lhs = lhs.eval(ns)?.is_truthy();
				match eval::short_circuit(*op, lhs) {
					Some(decided) => Ok(Value::Bool(decided)),
					None => Ok(Value::Bool(rhs.eval(ns)?.is_truthy())),
				}
			}
			Expr::Binary(op, lhs, rhs) => eval::binary(*op, lhs.eval(ns)?, rhs.eval(ns)?),
		}
	}
}

impl fmt::Display for Expr {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Expr::Lit(value) => write!(f, "{value}"),
			Expr::Field(path) => write!(f, "${path}"),
			Expr::Unary(op, operand) => write!(f, "({}{operand})", op.symbol()),
			Expr::Binary(op, lhs, rhs) => write!(f, "({lhs} {} {rhs})", op.symbol()),
		}
	}
}

macro_rules! expr_from {
	($($ty:ty),*) => {
		$(impl From<$ty> for Expr {
			fn from(value: $ty) -> Self {
				Expr::Lit(value.into())
			}
		})*
	};
}

expr_from!(bool, i32, i64, f64, &str, String, Value);

macro_rules! expr_op {
	($($trait:ident :: $method:ident => $op:ident),*) => {
		$(impl<R: Into<Expr>> ops::$trait<R> for Expr {
			type Output = Expr;

			fn $method(self, rhs: R) -> Expr {
				self.binary(BinaryOp::$op, rhs)
			}
		})*
	};
}

expr_op!(Add::add => Add, Sub::sub => Sub, Mul::mul => Mul, Div::div => Div, Rem::rem => Rem);

impl ops::Neg for Expr {
	type Output = Expr;

	fn neg(self) -> Expr {
		Expr::Unary(UnaryOp::Neg, Box::new(self))
	}
}

impl ops::Not for Expr {
	type Output = Expr;

	fn not(self) -> Expr {
		Expr::Unary(UnaryOp::Not, Box::new(self))
	}
}

/// A recorded statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
	Assign {
		path: String,
		expr: Expr,
	},
	/// Condition re-evaluated at flush time; the chosen arm runs in order.
	Branch {
		cond: Expr,
		then: Vec<Stmt>,
		otherwise: Vec<Stmt>,
	},
}

/// Recorder for deferred statements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LazyBlock {
	stmts: Vec<Stmt>,
}

impl LazyBlock {
	pub fn new() -> Self {
		Self::default()
	}

	/// Records `path = expr`.
	pub fn assign(&mut self, path: impl Into<String>, expr: impl Into<Expr>) -> &mut Self {
		self.stmts.push(Stmt::Assign {
			path: path.into(),
			expr: expr.into(),
		});
		self
	}

	/// Records an if/else whose arms are built by `then` and `otherwise`.
	pub fn branch(
		&mut self,
		cond: Expr,
		then: impl FnOnce(&mut LazyBlock),
		otherwise: impl FnOnce(&mut LazyBlock),
	) -> &mut Self {
		let mut then_block = LazyBlock::new();
		then(&mut then_block);
		let mut otherwise_block = LazyBlock::new();
		otherwise(&mut otherwise_block);
		self.stmts.push(Stmt::Branch {
			cond,
			then: then_block.stmts,
			otherwise: otherwise_block.stmts,
		});
		self
	}

	/// Records an if without an else arm.
	pub fn when(&mut self, cond: Expr, then: impl FnOnce(&mut LazyBlock)) -> &mut Self {
		self.branch(cond, then, |_| {})
	}

	pub fn statements(&self) -> &[Stmt] {
		&self.stmts
	}

	pub fn is_empty(&self) -> bool {
		self.stmts.is_empty()
	}

	/// Canonical rendering of the statement tree, used as the cache key.
	pub fn signature(&self) -> String {
		let mut out = String::new();
		render(&self.stmts, &mut out);
		out
	}

	/// Interprets the block against `ns`. Earlier statements are visible to later ones.
	pub fn run(&self, ns: &mut Namespace) -> Result<()> {
		run_stmts(&self.stmts, ns)
	}
}

fn run_stmts(stmts: &[Stmt], ns: &mut Namespace) -> Result<()> {
	for stmt in stmts {
		match stmt {
			Stmt::Assign { path, expr } => {
				let value = expr.eval(ns)?;
				ns.set(path, value)?;
			}
			Stmt::Branch { cond, then, otherwise } => {
				let arm = if cond.eval(ns)?.is_truthy() { then } else { otherwise };
				run_stmts(arm, ns)?;
			}
		}
	}
	Ok(())
}

fn render(stmts: &[Stmt], out: &mut String) {
	use std::fmt::Write;

	for stmt in stmts {
		match stmt {
			Stmt::Assign { path, expr } => {
				let _ = write!(out, "{path}={expr};");
			}
			Stmt::Branch { cond, then, otherwise } => {
				let _ = write!(out, "if {cond}{{");
				render(then, out);
				out.push_str("}else{");
				render(otherwise, out);
				out.push_str("};");
			}
		}
	}
}
