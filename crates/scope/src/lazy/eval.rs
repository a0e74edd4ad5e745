//! Operator semantics shared by interpreted and compiled blocks.

use std::cmp::Ordering;

use vista_value::Value;

use super::{BinaryOp, UnaryOp};
use crate::EvalError;

type EvalResult = Result<Value, EvalError>;

/// Numeric view of a value. `Bool` is not numeric.
#[derive(Clone, Copy)]
enum Num {
	Int(i64),
	Float(f64),
}

impl Num {
	fn of(value: &Value) -> Option<Num> {
		match value {
			Value::Int(v) => Some(Num::Int(*v)),
			Value::Float(v) => Some(Num::Float(*v)),
			_ => None,
		}
	}

	fn float(self) -> f64 {
		match self {
			Num::Int(v) => v as f64,
			Num::Float(v) => v,
		}
	}

	fn is_zero(self) -> bool {
		match self {
			Num::Int(v) => v == 0,
			Num::Float(v) => v == 0.0,
		}
	}
}

fn mismatch(op: BinaryOp, lhs: &Value, rhs: &Value) -> EvalError {
	EvalError::TypeMismatch {
		op: op.symbol(),
		left: lhs.type_name(),
		right: rhs.type_name(),
	}
}

/// Returns the result of `&&`/`||` when the left operand alone decides it.
pub(super) fn short_circuit(op: BinaryOp, lhs: bool) -> Option<bool> {
	match (op, lhs) {
		(BinaryOp::And, false) => Some(false),
		(BinaryOp::Or, true) => Some(true),
		_ => None,
	}
}

pub(super) fn unary(op: UnaryOp, operand: Value) -> EvalResult {
	match (op, &operand) {
		(UnaryOp::Not, _) => Ok(Value::Bool(!operand.is_truthy())),
		(UnaryOp::Neg, Value::Int(v)) => Ok(v
			.checked_neg()
			.map_or(Value::Float(-(*v as f64)), Value::Int)),
		(UnaryOp::Neg, Value::Float(v)) => Ok(Value::Float(-v)),
		(UnaryOp::Neg, _) => Err(EvalError::InvalidOperand {
			op: op.symbol(),
			operand: operand.type_name(),
		}),
	}
}

pub(super) fn binary(op: BinaryOp, lhs: Value, rhs: Value) -> EvalResult {
	match op {
		BinaryOp::Add => add(lhs, rhs),
		BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => {
			let (Some(l), Some(r)) = (Num::of(&lhs), Num::of(&rhs)) else {
				return Err(mismatch(op, &lhs, &rhs));
			};
			arithmetic(op, l, r)
		}
		BinaryOp::Eq => Ok(Value::Bool(loose_eq(&lhs, &rhs))),
		BinaryOp::Ne => Ok(Value::Bool(!loose_eq(&lhs, &rhs))),
		BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
			let ordering = compare(&lhs, &rhs).ok_or_else(|| mismatch(op, &lhs, &rhs))?;
			Ok(Value::Bool(match op {
				BinaryOp::Lt => ordering == Ordering::Less,
				BinaryOp::Le => ordering != Ordering::Greater,
				BinaryOp::Gt => ordering == Ordering::Greater,
				_ => ordering != Ordering::Less,
			}))
		}
		BinaryOp::And => Ok(Value::Bool(lhs.is_truthy() && rhs.is_truthy())),
		BinaryOp::Or => Ok(Value::Bool(lhs.is_truthy() || rhs.is_truthy())),
	}
}

fn add(lhs: Value, rhs: Value) -> EvalResult {
	match (lhs, rhs) {
		(Value::Str(mut l), Value::Str(r)) => {
			l.push_str(&r);
			Ok(Value::Str(l))
		}
		(Value::List(mut l), Value::List(r)) => {
			l.extend(r);
			Ok(Value::List(l))
		}
		(lhs, rhs) => match (Num::of(&lhs), Num::of(&rhs)) {
			(Some(l), Some(r)) => arithmetic(BinaryOp::Add, l, r),
			_ => Err(mismatch(BinaryOp::Add, &lhs, &rhs)),
		},
	}
}

fn arithmetic(op: BinaryOp, lhs: Num, rhs: Num) -> EvalResult {
	if matches!(op, BinaryOp::Div | BinaryOp::Rem) && rhs.is_zero() {
		return Err(EvalError::DivisionByZero);
	}
	if let (Num::Int(l), Num::Int(r)) = (lhs, rhs) {
		let exact = match op {
			BinaryOp::Add => l.checked_add(r),
			BinaryOp::Sub => l.checked_sub(r),
			BinaryOp::Mul => l.checked_mul(r),
			BinaryOp::Div if l.checked_rem(r) == Some(0) => l.checked_div(r),
			BinaryOp::Div => None,
			_ => l.checked_rem(r),
		};
		// Overflow and inexact division fall through to float arithmetic.
		if let Some(v) = exact {
			return Ok(Value::Int(v));
		}
	}
	let (l, r) = (lhs.float(), rhs.float());
	Ok(Value::Float(match op {
		BinaryOp::Add => l + r,
		BinaryOp::Sub => l - r,
		BinaryOp::Mul => l * r,
		BinaryOp::Div => l / r,
		_ => l % r,
	}))
}

fn loose_eq(lhs: &Value, rhs: &Value) -> bool {
	match (Num::of(lhs), Num::of(rhs)) {
		(Some(Num::Int(l)), Some(Num::Int(r))) => l == r,
		(Some(l), Some(r)) => l.float() == r.float(),
		_ => lhs == rhs,
	}
}

fn compare(lhs: &Value, rhs: &Value) -> Option<Ordering> {
	match (Num::of(lhs), Num::of(rhs), lhs, rhs) {
		(Some(Num::Int(l)), Some(Num::Int(r)), ..) => Some(l.cmp(&r)),
		(Some(l), Some(r), ..) => l.float().partial_cmp(&r.float()),
		(_, _, Value::Str(l), Value::Str(r)) => Some(l.cmp(r)),
		_ => None,
	}
}
