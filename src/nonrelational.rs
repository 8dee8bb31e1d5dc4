// SPDX-License-Identifier: BSD-3-Clause
//! Non-relational evaluation of symbolic expressions.
//!
//! A domain implements [`NonRelationalValueDomain`] by overriding the hooks
//! for the constants and operators it models; everything else falls back to
//! top. The free functions [`eval`] and [`satisfies`] walk an expression and
//! drive those hooks, enforcing two rules uniformly for every domain:
//!
//! - a bottom operand makes the whole expression bottom, and
//! - an operand whose runtime types do not fit the operator (and are not
//!   untyped) makes the whole expression bottom: the operation is undefined
//!   on that path. This is distinct from top, which means "defined, but not
//!   tracked precisely".

use tracing::{trace, trace_span};

use crate::{
    error::Result,
    lattice::{Lattice, Satisfiability},
    symbolic::{
        BinaryOperator, Category, Constant, ExpressionKind, Identifier, ProgramPoint,
        RuntimeTypes, SymbolicExpression, TernaryOperator, UnaryOperator,
    },
};

pub trait NonRelationalValueDomain: Lattice {
    fn eval_null_constant(_pp: &ProgramPoint) -> Result<Self> {
        Ok(Self::top())
    }

    fn eval_non_null_constant(_constant: &Constant, _pp: &ProgramPoint) -> Result<Self> {
        Ok(Self::top())
    }

    /// Value of a variable the caller has no binding for.
    fn eval_variable(_id: &Identifier, _pp: &ProgramPoint) -> Result<Self> {
        Ok(Self::top())
    }

    fn eval_push_any(_types: &RuntimeTypes, _pp: &ProgramPoint) -> Result<Self> {
        Ok(Self::top())
    }

    fn eval_skip(_pp: &ProgramPoint) -> Result<Self> {
        Ok(Self::bottom())
    }

    fn eval_unary(_op: UnaryOperator, _arg: &Self, _pp: &ProgramPoint) -> Result<Self> {
        Ok(Self::top())
    }

    fn eval_binary(
        _op: BinaryOperator,
        _left: &Self,
        _right: &Self,
        _pp: &ProgramPoint,
    ) -> Result<Self> {
        Ok(Self::top())
    }

    fn eval_ternary(
        _op: TernaryOperator,
        _left: &Self,
        _middle: &Self,
        _right: &Self,
        _pp: &ProgramPoint,
    ) -> Result<Self> {
        Ok(Self::top())
    }

    fn satisfies_abstract_value(&self, _pp: &ProgramPoint) -> Result<Satisfiability> {
        Ok(Satisfiability::Unknown)
    }

    fn satisfies_unary(
        _op: UnaryOperator,
        _arg: &Self,
        _pp: &ProgramPoint,
    ) -> Result<Satisfiability> {
        Ok(Satisfiability::Unknown)
    }

    /// Never claims [`Satisfiability::Satisfied`] unless overridden by a
    /// domain that can prove it.
    fn satisfies_binary(
        op: BinaryOperator,
        left: &Self,
        right: &Self,
        _pp: &ProgramPoint,
    ) -> Result<Satisfiability> {
        match op {
            BinaryOperator::ComparisonEq => unequal_if_incomparable(left, right),
            _ => Ok(Satisfiability::Unknown),
        }
    }

    fn satisfies_ternary(
        _op: TernaryOperator,
        _left: &Self,
        _middle: &Self,
        _right: &Self,
        _pp: &ProgramPoint,
    ) -> Result<Satisfiability> {
        Ok(Satisfiability::Unknown)
    }
}

/// Equality between two mutually incomparable abstractions cannot hold.
pub fn unequal_if_incomparable<D: Lattice>(left: &D, right: &D) -> Result<Satisfiability> {
    if !left.less_or_equal(right)? && !right.less_or_equal(left)? {
        Ok(Satisfiability::NotSatisfied)
    } else {
        Ok(Satisfiability::Unknown)
    }
}

pub fn eval_constant<D: NonRelationalValueDomain>(
    constant: &Constant,
    pp: &ProgramPoint,
) -> Result<D> {
    match constant {
        Constant::Null => D::eval_null_constant(pp),
        c => D::eval_non_null_constant(c, pp),
    }
}

fn well_typed(operands: &[&SymbolicExpression], categories: &[Category]) -> bool {
    operands
        .iter()
        .zip(categories)
        .all(|(e, c)| e.types.accepts(*c))
}

fn lookup_or_default<D, F>(id: &Identifier, lookup: &F, pp: &ProgramPoint) -> Result<D>
where
    D: NonRelationalValueDomain,
    F: Fn(&Identifier) -> Option<D>,
{
    match lookup(id) {
        Some(v) => Ok(v),
        None => D::eval_variable(id, pp),
    }
}

/// Evaluate `expr`, resolving variables through `lookup`. Variables `lookup`
/// does not know are evaluated with [`NonRelationalValueDomain::eval_variable`].
pub fn eval<D, F>(expr: &SymbolicExpression, lookup: &F, pp: &ProgramPoint) -> Result<D>
where
    D: NonRelationalValueDomain,
    F: Fn(&Identifier) -> Option<D>,
{
    let _span = trace_span!("eval", %pp).entered();
    eval_expr(expr, lookup, pp)
}

fn eval_expr<D, F>(expr: &SymbolicExpression, lookup: &F, pp: &ProgramPoint) -> Result<D>
where
    D: NonRelationalValueDomain,
    F: Fn(&Identifier) -> Option<D>,
{
    match &expr.kind {
        ExpressionKind::Constant(c) => eval_constant(c, pp),
        ExpressionKind::Variable(id) => lookup_or_default(id, lookup, pp),
        ExpressionKind::PushAny => D::eval_push_any(&expr.types, pp),
        ExpressionKind::Skip => D::eval_skip(pp),
        ExpressionKind::Unary { op, arg } => {
            if !well_typed(&[&**arg], &[op.operand_category()]) {
                trace!(%expr, "ill-typed operand");
                return Ok(D::bottom());
            }
            let a: D = eval_expr(arg, lookup, pp)?;
            if a.is_bottom() {
                return Ok(a);
            }
            D::eval_unary(*op, &a, pp)
        }
        ExpressionKind::Binary { op, left, right } => {
            if !well_typed(&[&**left, &**right], &op.operand_categories()) {
                trace!(%expr, "ill-typed operand");
                return Ok(D::bottom());
            }
            let l: D = eval_expr(left, lookup, pp)?;
            if l.is_bottom() {
                return Ok(l);
            }
            let r: D = eval_expr(right, lookup, pp)?;
            if r.is_bottom() {
                return Ok(r);
            }
            D::eval_binary(*op, &l, &r, pp)
        }
        ExpressionKind::Ternary {
            op,
            left,
            middle,
            right,
        } => {
            if !well_typed(&[&**left, &**middle, &**right], &op.operand_categories()) {
                trace!(%expr, "ill-typed operand");
                return Ok(D::bottom());
            }
            let l: D = eval_expr(left, lookup, pp)?;
            if l.is_bottom() {
                return Ok(l);
            }
            let m: D = eval_expr(middle, lookup, pp)?;
            if m.is_bottom() {
                return Ok(m);
            }
            let r: D = eval_expr(right, lookup, pp)?;
            if r.is_bottom() {
                return Ok(r);
            }
            D::eval_ternary(*op, &l, &m, &r, pp)
        }
    }
}

/// Decide whether the boolean condition `expr` holds.
///
/// A condition whose operands evaluate to bottom (ill-typed, or undefined
/// like a division by zero) cannot hold on any execution and is reported as
/// [`Satisfiability::NotSatisfied`].
pub fn satisfies<D, F>(
    expr: &SymbolicExpression,
    lookup: &F,
    pp: &ProgramPoint,
) -> Result<Satisfiability>
where
    D: NonRelationalValueDomain,
    F: Fn(&Identifier) -> Option<D>,
{
    let _span = trace_span!("satisfies", %pp).entered();
    satisfies_expr::<D, F>(expr, lookup, pp)
}

fn satisfies_expr<D, F>(
    expr: &SymbolicExpression,
    lookup: &F,
    pp: &ProgramPoint,
) -> Result<Satisfiability>
where
    D: NonRelationalValueDomain,
    F: Fn(&Identifier) -> Option<D>,
{
    match &expr.kind {
        ExpressionKind::Constant(Constant::Bool(b)) => Ok(Satisfiability::from_bool(*b)),
        ExpressionKind::Constant(_) | ExpressionKind::PushAny | ExpressionKind::Skip => {
            Ok(Satisfiability::Unknown)
        }
        ExpressionKind::Variable(id) => {
            let v: D = lookup_or_default(id, lookup, pp)?;
            v.satisfies_abstract_value(pp)
        }
        ExpressionKind::Unary {
            op: UnaryOperator::LogicalNot,
            arg,
        } => Ok(satisfies_expr::<D, F>(arg, lookup, pp)?.negate()),
        ExpressionKind::Binary {
            op: BinaryOperator::LogicalAnd,
            left,
            right,
        } => {
            let l = satisfies_expr::<D, F>(left, lookup, pp)?;
            let r = satisfies_expr::<D, F>(right, lookup, pp)?;
            Ok(l.and(r))
        }
        ExpressionKind::Binary {
            op: BinaryOperator::LogicalOr,
            left,
            right,
        } => {
            let l = satisfies_expr::<D, F>(left, lookup, pp)?;
            let r = satisfies_expr::<D, F>(right, lookup, pp)?;
            Ok(l.or(r))
        }
        ExpressionKind::Unary { op, arg } => {
            if !well_typed(&[&**arg], &[op.operand_category()]) {
                return Ok(Satisfiability::NotSatisfied);
            }
            let a: D = eval_expr(arg, lookup, pp)?;
            if a.is_bottom() {
                return Ok(Satisfiability::NotSatisfied);
            }
            D::satisfies_unary(*op, &a, pp)
        }
        ExpressionKind::Binary { op, left, right } => {
            if !well_typed(&[&**left, &**right], &op.operand_categories()) {
                return Ok(Satisfiability::NotSatisfied);
            }
            let l: D = eval_expr(left, lookup, pp)?;
            let r: D = eval_expr(right, lookup, pp)?;
            if l.is_bottom() || r.is_bottom() {
                return Ok(Satisfiability::NotSatisfied);
            }
            D::satisfies_binary(*op, &l, &r, pp)
        }
        ExpressionKind::Ternary {
            op,
            left,
            middle,
            right,
        } => {
            if !well_typed(&[&**left, &**middle, &**right], &op.operand_categories()) {
                return Ok(Satisfiability::NotSatisfied);
            }
            let l: D = eval_expr(left, lookup, pp)?;
            let m: D = eval_expr(middle, lookup, pp)?;
            let r: D = eval_expr(right, lookup, pp)?;
            if l.is_bottom() || m.is_bottom() || r.is_bottom() {
                return Ok(Satisfiability::NotSatisfied);
            }
            D::satisfies_ternary(*op, &l, &m, &r, pp)
        }
    }
}
