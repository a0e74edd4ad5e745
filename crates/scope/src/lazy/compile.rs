//! Closure compilation of lazy blocks and the shared signature cache.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use vista_value::{Namespace, Value};

use super::{BinaryOp, Expr, LazyBlock, Stmt, eval};
use crate::{EvalError, Result};

type ExprFn = Box<dyn Fn(&Namespace) -> std::result::Result<Value, EvalError> + Send + Sync>;
type StmtFn = Box<dyn Fn(&mut Namespace) -> Result<()> + Send + Sync>;

/// A lazy block pre-built into nested closures.
pub struct CompiledBlock {
	signature: String,
	run: StmtFn,
}

impl CompiledBlock {
	pub fn compile(block: &LazyBlock) -> Self {
		Self {
			signature: block.signature(),
			run: compile_stmts(block.statements()),
		}
	}

	pub fn signature(&self) -> &str {
		&self.signature
	}

	pub fn run(&self, ns: &mut Namespace) -> Result<()> {
		(self.run)(ns)
	}
}

impl fmt::Debug for CompiledBlock {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("CompiledBlock")
			.field("signature", &self.signature)
			.finish_non_exhaustive()
	}
}

fn compile_stmts(stmts: &[Stmt]) -> StmtFn {
	let compiled: Vec<StmtFn> = stmts.iter().map(compile_stmt).collect();
	Box::new(move |ns: &mut Namespace| compiled.iter().try_for_each(|stmt| stmt(ns)))
}

fn compile_stmt(stmt: &Stmt) -> StmtFn {
	match stmt {
		Stmt::Assign { path, expr } => {
			let path = path.clone();
			let expr = compile_expr(expr);
			Box::new(move |ns: &mut Namespace| {
				let value = expr(ns)?;
				ns.set(&path, value)?;
				Ok(())
			})
		}
		Stmt::Branch { cond, then, otherwise } => {
			let cond = compile_expr(cond);
			let then = compile_stmts(then);
			let otherwise = compile_stmts(otherwise);
			Box::new(move |ns: &mut Namespace| {
				if cond(ns)?.is_truthy() {
					then(ns)
				} else {
					otherwise(ns)
				}
			})
		}
	}
}

fn compile_expr(expr: &Expr) -> ExprFn {
	match expr {
		Expr::Lit(value) => {
			let value = value.clone();
			Box::new(move |_: &Namespace| Ok(value.clone()))
		}
		Expr::Field(path) => {
			let path = path.clone();
			Box::new(move |ns: &Namespace| {
				ns.get(&path)
					.cloned()
					.ok_or_else(|| EvalError::MissingField(path.clone()))
			})
		}
		Expr::Unary(op, operand) => {
			let op = *op;
			let operand = compile_expr(operand);
			Box::new(move |ns: &Namespace| eval::unary(op, operand(ns)?))
		}
		Expr::Binary(op @ (BinaryOp::And | BinaryOp::Or), lhs, rhs) => {
			let op = *op;
			let lhs = compile_expr(lhs);
			let rhs = compile_expr(rhs);
			Box::new(move |ns: &Namespace| {
				let left = lhs(ns)?.is_truthy();
				let decided = match eval::short_circuit(op, left) {
					Some(decided) => decided,
					None => rhs(ns)?.is_truthy(),
				};
				Ok(Value::Bool(decided))
			})
		}
		Expr::Binary(op, lhs, rhs) => {
			let op = *op;
			let lhs = compile_expr(lhs);
			let rhs = compile_expr(rhs);
			Box::new(move |ns: &Namespace| eval::binary(op, lhs(ns)?, rhs(ns)?))
		}
	}
}

/// Compiled blocks keyed by [`LazyBlock::signature`].
///
/// Shared by every scope in a registry. Compilation happens outside the lock;
/// concurrent misses for one signature both insert and the last writer wins.
#[derive(Clone, Default)]
pub struct LazyCache {
	blocks: Arc<RwLock<FxHashMap<String, Arc<CompiledBlock>>>>,
}

impl LazyCache {
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the compiled form of `block`, compiling it on a miss.
	pub fn get_or_compile(&self, block: &LazyBlock) -> Arc<CompiledBlock> {
		let signature = block.signature();
		if let Some(hit) = self.blocks.read().get(&signature) {
			return Arc::clone(hit);
		}

		tracing::trace!(domain = "lazy", %signature, "compiling lazy block");
		let compiled = Arc::new(CompiledBlock::compile(block));
		self.blocks.write().insert(signature, Arc::clone(&compiled));
		compiled
	}

	pub fn contains(&self, signature: &str) -> bool {
		self.blocks.read().contains_key(signature)
	}

	pub fn len(&self) -> usize {
		self.blocks.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.blocks.read().is_empty()
	}

	pub fn clear(&self) {
		self.blocks.write().clear();
	}
}

impl fmt::Debug for LazyCache {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("LazyCache").field("len", &self.len()).finish()
	}
}
