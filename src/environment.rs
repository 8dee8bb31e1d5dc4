// SPDX-License-Identifier: BSD-3-Clause
//! Map from program variables to abstract values

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::{
    error::Result,
    lattice::{Lattice, Satisfiability},
    nonrelational::{self, NonRelationalValueDomain},
    symbolic::{BinaryOperator, ExpressionKind, Identifier, ProgramPoint, SymbolicExpression},
};

/// Either unreachable, or a binding for each variable that is known to be
/// below top. Unbound variables are evaluated with
/// [`NonRelationalValueDomain::eval_variable`].
#[derive(Clone, Debug, PartialEq)]
pub enum ValueEnvironment<D> {
    Bottom,
    Bindings(FxHashMap<Identifier, D>),
}

impl<D> Default for ValueEnvironment<D> {
    fn default() -> Self {
        ValueEnvironment::Bindings(FxHashMap::default())
    }
}

// ------------------------------------------------------------------
// Operations

impl<D: NonRelationalValueDomain> ValueEnvironment<D> {
    pub fn get(&self, id: &Identifier) -> Option<&D> {
        match self {
            ValueEnvironment::Bottom => None,
            ValueEnvironment::Bindings(m) => m.get(id),
        }
    }

    /// Bind `id` to `v` directly. Binding bottom makes the whole
    /// environment bottom.
    pub fn bind(&self, id: Identifier, v: D) -> Self {
        let ValueEnvironment::Bindings(m) = self else {
            return ValueEnvironment::Bottom;
        };
        if v.is_bottom() {
            return ValueEnvironment::Bottom;
        }
        let mut m = m.clone();
        if v.is_top() {
            m.remove(&id);
        } else {
            m.insert(id, v);
        }
        ValueEnvironment::Bindings(m)
    }

    pub fn assign(
        &self,
        id: Identifier,
        expr: &SymbolicExpression,
        pp: &ProgramPoint,
    ) -> Result<Self> {
        let v = self.eval(expr, pp)?;
        trace!(%id, %expr, "assign");
        Ok(self.bind(id, v))
    }

    pub fn forget(&self, id: &Identifier) -> Self {
        match self {
            ValueEnvironment::Bottom => ValueEnvironment::Bottom,
            ValueEnvironment::Bindings(m) => {
                let mut m = m.clone();
                m.remove(id);
                ValueEnvironment::Bindings(m)
            }
        }
    }

    pub fn eval(&self, expr: &SymbolicExpression, pp: &ProgramPoint) -> Result<D> {
        match self {
            ValueEnvironment::Bottom => Ok(D::bottom()),
            ValueEnvironment::Bindings(m) => {
                nonrelational::eval(expr, &|id: &Identifier| m.get(id).cloned(), pp)
            }
        }
    }

    /// No execution reaches a bottom environment, so no condition holds
    /// there.
    pub fn satisfies(&self, expr: &SymbolicExpression, pp: &ProgramPoint) -> Result<Satisfiability> {
        match self {
            ValueEnvironment::Bottom => Ok(Satisfiability::NotSatisfied),
            ValueEnvironment::Bindings(m) => {
                nonrelational::satisfies::<D, _>(expr, &|id: &Identifier| m.get(id).cloned(), pp)
            }
        }
    }

    /// Restrict the environment to the executions where `expr` holds.
    pub fn assume(&self, expr: &SymbolicExpression, pp: &ProgramPoint) -> Result<Self> {
        if self.satisfies(expr, pp)? == Satisfiability::NotSatisfied {
            trace!(%expr, %pp, "assumption cannot hold");
            return Ok(ValueEnvironment::Bottom);
        }
        if let ExpressionKind::Binary {
            op: BinaryOperator::ComparisonEq,
            left,
            right,
        } = &expr.kind
        {
            let (id, var, other) = match (&left.kind, &right.kind) {
                (ExpressionKind::Variable(id), _) => (id, &**left, &**right),
                (_, ExpressionKind::Variable(id)) => (id, &**right, &**left),
                _ => return Ok(self.clone()),
            };
            let narrowed = self.eval(var, pp)?.glb(&self.eval(other, pp)?)?;
            return Ok(self.bind(id.clone(), narrowed));
        }
        Ok(self.clone())
    }
}

// ------------------------------------------------------------------
// Traits

impl<D: std::fmt::Display> std::fmt::Display for ValueEnvironment<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueEnvironment::Bottom => write!(f, "⊥"),
            ValueEnvironment::Bindings(m) => {
                let mut bindings: Vec<_> = m.iter().collect();
                bindings.sort_by(|a, b| a.0.cmp(b.0));
                write!(f, "[")?;
                for (i, (id, v)) in bindings.into_iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} -> {}", id, v)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl<D: Lattice> ValueEnvironment<D> {
    fn combine<F>(&self, other: &Self, f: F) -> Result<Self>
    where
        F: Fn(&D, &D) -> Result<D>,
    {
        let (ValueEnvironment::Bindings(a), ValueEnvironment::Bindings(b)) = (self, other) else {
            return Ok(ValueEnvironment::Bottom);
        };
        let mut m = FxHashMap::default();
        for (id, v) in a {
            if let Some(w) = b.get(id) {
                let j = f(v, w)?;
                if !j.is_top() {
                    m.insert(id.clone(), j);
                }
            }
        }
        Ok(ValueEnvironment::Bindings(m))
    }
}

impl<D: Lattice> Lattice for ValueEnvironment<D> {
    fn top() -> Self {
        ValueEnvironment::default()
    }

    fn bottom() -> Self {
        ValueEnvironment::Bottom
    }

    fn is_top(&self) -> bool {
        matches!(self, ValueEnvironment::Bindings(m) if m.values().all(Lattice::is_top))
    }

    fn lub_aux(&self, other: &Self) -> Result<Self> {
        self.combine(other, D::lub)
    }

    fn widening_aux(&self, other: &Self) -> Result<Self> {
        self.combine(other, D::widening)
    }

    fn glb_aux(&self, other: &Self) -> Result<Self> {
        let (ValueEnvironment::Bindings(a), ValueEnvironment::Bindings(b)) = (self, other) else {
            return Ok(ValueEnvironment::Bottom);
        };
        let mut m = a.clone();
        for (id, w) in b {
            let v = match a.get(id) {
                Some(v) => v.glb(w)?,
                None => w.clone(),
            };
            if v.is_bottom() {
                return Ok(ValueEnvironment::Bottom);
            }
            m.insert(id.clone(), v);
        }
        Ok(ValueEnvironment::Bindings(m))
    }

    fn less_or_equal_aux(&self, other: &Self) -> Result<bool> {
        let (ValueEnvironment::Bindings(a), ValueEnvironment::Bindings(b)) = (self, other) else {
            return Ok(matches!(self, ValueEnvironment::Bottom));
        };
        for (id, w) in b {
            let below = match a.get(id) {
                Some(v) => v.less_or_equal(w)?,
                None => w.is_top(),
            };
            if !below {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domains::{Sign, SignParity},
        symbolic::{RuntimeTypes, Type},
    };

    fn num() -> RuntimeTypes {
        RuntimeTypes::single(Type::Numeric)
    }

    fn var(name: &str) -> SymbolicExpression {
        SymbolicExpression::variable(name, num())
    }

    fn cmp(op: BinaryOperator, l: SymbolicExpression, r: SymbolicExpression) -> SymbolicExpression {
        SymbolicExpression::binary(op, l, r, RuntimeTypes::single(Type::Boolean))
    }

    #[test]
    fn assign_and_eval() {
        let pp = ProgramPoint::from("t:1");
        let env = ValueEnvironment::<Sign>::top()
            .assign("x".into(), &SymbolicExpression::int(5), &pp)
            .unwrap();
        assert_eq!(Some(&Sign::Plus), env.get(&"x".into()));
        let neg = SymbolicExpression::unary(
            crate::symbolic::UnaryOperator::NumericNeg,
            var("x"),
            num(),
        );
        assert_eq!(Sign::Minus, env.eval(&neg, &pp).unwrap());
        assert_eq!(Sign::Top, env.eval(&var("y"), &pp).unwrap());
        assert_eq!(None, env.forget(&"x".into()).get(&"x".into()));
    }

    #[test]
    fn assigning_bottom() {
        let pp = ProgramPoint::default();
        let div = SymbolicExpression::binary(
            BinaryOperator::NumericDiv,
            SymbolicExpression::int(1),
            SymbolicExpression::int(0),
            num(),
        );
        let env = ValueEnvironment::<Sign>::top().assign("x".into(), &div, &pp).unwrap();
        assert!(env.is_bottom());
    }

    #[test]
    fn assume() {
        let pp = ProgramPoint::default();
        let env = ValueEnvironment::<Sign>::top()
            .assign("x".into(), &SymbolicExpression::int(3), &pp)
            .unwrap();
        let lt = cmp(BinaryOperator::ComparisonLt, var("x"), SymbolicExpression::int(0));
        assert!(env.assume(&lt, &pp).unwrap().is_bottom());
        let ge = cmp(BinaryOperator::ComparisonGe, var("x"), SymbolicExpression::int(0));
        assert_eq!(env, env.assume(&ge, &pp).unwrap());

        let eq = cmp(BinaryOperator::ComparisonEq, var("y"), SymbolicExpression::int(0));
        let narrowed = env.assume(&eq, &pp).unwrap();
        assert_eq!(Some(&Sign::Zero), narrowed.get(&"y".into()));
    }

    #[test]
    fn assume_over_product() {
        let pp = ProgramPoint::default();
        let env = ValueEnvironment::<SignParity>::top()
            .assign("x".into(), &SymbolicExpression::int(7), &pp)
            .unwrap();
        let eq = cmp(BinaryOperator::ComparisonEq, var("x"), SymbolicExpression::int(0));
        assert!(env.assume(&eq, &pp).unwrap().is_bottom());
    }

    #[test]
    fn pointwise_lattice() {
        let pp = ProgramPoint::default();
        let top = ValueEnvironment::<Sign>::top();
        let a = top.assign("x".into(), &SymbolicExpression::int(1), &pp).unwrap();
        let b = top.assign("x".into(), &SymbolicExpression::int(0), &pp).unwrap();
        let c = top.assign("z".into(), &SymbolicExpression::int(0), &pp).unwrap();
        let lub = a.lub(&b).unwrap();
        assert_eq!(Some(&Sign::ZeroPlus), lub.get(&"x".into()));
        assert!(a.less_or_equal(&lub).unwrap());
        assert!(!lub.less_or_equal(&a).unwrap());
        assert!(a.lub(&c).unwrap().is_top());
        assert!(a.glb(&b).unwrap().is_bottom());
        let meet = a.glb(&c).unwrap();
        assert_eq!(Some(&Sign::Zero), meet.get(&"z".into()));
        assert_eq!("[x -> +, z -> 0]", meet.to_string());
    }
}
