// SPDX-License-Identifier: BSD-3-Clause
//! Reduced product of two domains
//!
//! A [`ReducedProduct`] pairs an element of `L` with an element of `R` that
//! describe the same values, and runs a [`Reduction`] after every operation
//! so that each component can sharpen the other. The product is itself a
//! [`Lattice`] and a [`NonRelationalValueDomain`], so products nest.

use std::{fmt::Debug, hash::Hash, marker::PhantomData};

use crate::{
    domains::{parity::Parity, sign::Sign},
    error::{Result, SemanticError},
    lattice::{Lattice, Satisfiability},
    nonrelational::{unequal_if_incomparable, NonRelationalValueDomain},
    symbolic::{
        BinaryOperator, Constant, Identifier, ProgramPoint, RuntimeTypes, TernaryOperator,
        UnaryOperator,
    },
};

/// Restores consistency between the two components of a product.
///
/// Implementations may only move components *down* (towards more precise
/// elements); [`ReducedProduct`] rejects a reduction that loses precision.
/// Returning bottom in either component makes the whole product bottom.
pub trait Reduction<L: Lattice, R: Lattice> {
    fn reduce(left: L, right: R) -> Result<(L, R)>;

    /// Order on reduced pairs. Componentwise unless the pairing knows more.
    fn less_or_equal(left: (&L, &R), right: (&L, &R)) -> Result<bool> {
        Ok(left.0.less_or_equal(right.0)? && left.1.less_or_equal(right.1)?)
    }
}

/// Plain cartesian product: bottom in one component is bottom in both.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct NoReduction;

impl<L: Lattice, R: Lattice> Reduction<L, R> for NoReduction {
    #[inline]
    fn reduce(left: L, right: R) -> Result<(L, R)> {
        Ok((left, right))
    }
}

pub struct ReducedProduct<L, R, Red = NoReduction> {
    left: L,
    right: R,
    reduction: PhantomData<fn() -> Red>,
}

// ------------------------------------------------------------------
// Constructors

impl<L, R, Red> ReducedProduct<L, R, Red>
where
    L: Lattice,
    R: Lattice,
    Red: Reduction<L, R>,
{
    #[inline]
    fn raw(left: L, right: R) -> Self {
        ReducedProduct {
            left,
            right,
            reduction: PhantomData,
        }
    }

    /// Build the reduced pair `(left, right)`.
    pub fn new(left: L, right: R) -> Result<Self> {
        if left.is_bottom() || right.is_bottom() {
            return Ok(Self::bottom());
        }
        let (l, r) = Red::reduce(left.clone(), right.clone())?;
        if !l.less_or_equal(&left)? || !r.less_or_equal(&right)? {
            return Err(SemanticError::InconsistentReduction {
                pair: format!("({:?}, {:?}) from ({:?}, {:?})", l, r, left, right),
            });
        }
        if l.is_bottom() || r.is_bottom() {
            return Ok(Self::bottom());
        }
        Ok(Self::raw(l, r))
    }

    #[inline]
    pub fn left(&self) -> &L {
        &self.left
    }

    #[inline]
    pub fn right(&self) -> &R {
        &self.right
    }

    pub fn into_parts(self) -> (L, R) {
        (self.left, self.right)
    }
}

/// A definite answer from either component is a definite answer for the
/// pair, since both describe the same values.
fn combine(left: Satisfiability, right: Satisfiability) -> Satisfiability {
    match left {
        Satisfiability::Unknown => right,
        l => l,
    }
}

// ------------------------------------------------------------------
// Traits

impl<L: Clone, R: Clone, Red> Clone for ReducedProduct<L, R, Red> {
    fn clone(&self) -> Self {
        ReducedProduct {
            left: self.left.clone(),
            right: self.right.clone(),
            reduction: PhantomData,
        }
    }
}

impl<L: Copy, R: Copy, Red> Copy for ReducedProduct<L, R, Red> {}

impl<L: Debug, R: Debug, Red> Debug for ReducedProduct<L, R, Red> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ReducedProduct")
            .field(&self.left)
            .field(&self.right)
            .finish()
    }
}

impl<L: PartialEq, R: PartialEq, Red> PartialEq for ReducedProduct<L, R, Red> {
    fn eq(&self, other: &Self) -> bool {
        self.left == other.left && self.right == other.right
    }
}

impl<L: Eq, R: Eq, Red> Eq for ReducedProduct<L, R, Red> {}

impl<L: Hash, R: Hash, Red> Hash for ReducedProduct<L, R, Red> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.left.hash(state);
        self.right.hash(state);
    }
}

impl<L, R, Red> std::fmt::Display for ReducedProduct<L, R, Red>
where
    L: std::fmt::Display,
    R: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.left, self.right)
    }
}

impl<L, R, Red> Lattice for ReducedProduct<L, R, Red>
where
    L: Lattice,
    R: Lattice,
    Red: Reduction<L, R>,
{
    fn top() -> Self {
        Self::raw(L::top(), R::top())
    }

    fn bottom() -> Self {
        Self::raw(L::bottom(), R::bottom())
    }

    fn lub_aux(&self, other: &Self) -> Result<Self> {
        Self::new(self.left.lub(&other.left)?, self.right.lub(&other.right)?)
    }

    fn widening_aux(&self, other: &Self) -> Result<Self> {
        Self::new(
            self.left.widening(&other.left)?,
            self.right.widening(&other.right)?,
        )
    }

    fn glb_aux(&self, other: &Self) -> Result<Self> {
        Self::new(self.left.glb(&other.left)?, self.right.glb(&other.right)?)
    }

    fn narrowing_aux(&self, other: &Self) -> Result<Self> {
        Self::new(
            self.left.narrowing(&other.left)?,
            self.right.narrowing(&other.right)?,
        )
    }

    fn less_or_equal_aux(&self, other: &Self) -> Result<bool> {
        Red::less_or_equal((&self.left, &self.right), (&other.left, &other.right))
    }
}

impl<L, R, Red> NonRelationalValueDomain for ReducedProduct<L, R, Red>
where
    L: NonRelationalValueDomain,
    R: NonRelationalValueDomain,
    Red: Reduction<L, R>,
{
    fn eval_null_constant(pp: &ProgramPoint) -> Result<Self> {
        Self::new(L::eval_null_constant(pp)?, R::eval_null_constant(pp)?)
    }

    fn eval_non_null_constant(constant: &Constant, pp: &ProgramPoint) -> Result<Self> {
        Self::new(
            L::eval_non_null_constant(constant, pp)?,
            R::eval_non_null_constant(constant, pp)?,
        )
    }

    fn eval_variable(id: &Identifier, pp: &ProgramPoint) -> Result<Self> {
        Self::new(L::eval_variable(id, pp)?, R::eval_variable(id, pp)?)
    }

    fn eval_push_any(types: &RuntimeTypes, pp: &ProgramPoint) -> Result<Self> {
        Self::new(L::eval_push_any(types, pp)?, R::eval_push_any(types, pp)?)
    }

    fn eval_unary(op: UnaryOperator, arg: &Self, pp: &ProgramPoint) -> Result<Self> {
        Self::new(
            L::eval_unary(op, &arg.left, pp)?,
            R::eval_unary(op, &arg.right, pp)?,
        )
    }

    fn eval_binary(
        op: BinaryOperator,
        left: &Self,
        right: &Self,
        pp: &ProgramPoint,
    ) -> Result<Self> {
        Self::new(
            L::eval_binary(op, &left.left, &right.left, pp)?,
            R::eval_binary(op, &left.right, &right.right, pp)?,
        )
    }

    fn eval_ternary(
        op: TernaryOperator,
        left: &Self,
        middle: &Self,
        right: &Self,
        pp: &ProgramPoint,
    ) -> Result<Self> {
        Self::new(
            L::eval_ternary(op, &left.left, &middle.left, &right.left, pp)?,
            R::eval_ternary(op, &left.right, &middle.right, &right.right, pp)?,
        )
    }

    fn satisfies_abstract_value(&self, pp: &ProgramPoint) -> Result<Satisfiability> {
        Ok(combine(
            self.left.satisfies_abstract_value(pp)?,
            self.right.satisfies_abstract_value(pp)?,
        ))
    }

    fn satisfies_unary(op: UnaryOperator, arg: &Self, pp: &ProgramPoint) -> Result<Satisfiability> {
        Ok(combine(
            L::satisfies_unary(op, &arg.left, pp)?,
            R::satisfies_unary(op, &arg.right, pp)?,
        ))
    }

    /// Equality is decided on the product order alone: it cannot hold
    /// between two incomparable pairs, and is unknown otherwise.
    fn satisfies_binary(
        op: BinaryOperator,
        left: &Self,
        right: &Self,
        pp: &ProgramPoint,
    ) -> Result<Satisfiability> {
        match op {
            BinaryOperator::ComparisonEq => unequal_if_incomparable(left, right),
            _ => Ok(combine(
                L::satisfies_binary(op, &left.left, &right.left, pp)?,
                R::satisfies_binary(op, &left.right, &right.right, pp)?,
            )),
        }
    }

    fn satisfies_ternary(
        op: TernaryOperator,
        left: &Self,
        middle: &Self,
        right: &Self,
        pp: &ProgramPoint,
    ) -> Result<Satisfiability> {
        Ok(combine(
            L::satisfies_ternary(op, &left.left, &middle.left, &right.left, pp)?,
            R::satisfies_ternary(op, &left.right, &middle.right, &right.right, pp)?,
        ))
    }
}

// ------------------------------------------------------------------
// Sign × parity

/// Zero is even, so an odd value cannot be zero.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct SignParityReduction;

impl Reduction<Sign, Parity> for SignParityReduction {
    fn reduce(sign: Sign, parity: Parity) -> Result<(Sign, Parity)> {
        Ok(match (sign, parity) {
            (Sign::Zero, Parity::Odd) => (Sign::Bottom, Parity::Bottom),
            (Sign::ZeroMinus, Parity::Odd) => (Sign::Minus, Parity::Odd),
            (Sign::ZeroPlus, Parity::Odd) => (Sign::Plus, Parity::Odd),
            pair => pair,
        })
    }

    /// A pair with a known parity is below any pair whose parity is
    /// unknown; otherwise pairs compare componentwise.
    fn less_or_equal(left: (&Sign, &Parity), right: (&Sign, &Parity)) -> Result<bool> {
        match (left.1, right.1) {
            (Parity::Top, Parity::Top) => left.0.less_or_equal(right.0),
            (_, Parity::Top) => Ok(true),
            (Parity::Top, _) => Ok(false),
            (l, r) => Ok(l == r && left.0.less_or_equal(right.0)?),
        }
    }
}

pub type SignParity = ReducedProduct<Sign, Parity, SignParityReduction>;

#[cfg(test)]
mod tests {
    use super::{NoReduction, ReducedProduct, Reduction, SignParity};
    use crate::{
        domains::{parity::Parity, sign::Sign},
        error::{Result, SemanticError},
        lattice::Lattice,
    };

    #[test]
    fn reduction() {
        assert!(SignParity::new(Sign::Zero, Parity::Odd).unwrap().is_bottom());
        let p = SignParity::new(Sign::ZeroMinus, Parity::Odd).unwrap();
        assert_eq!((Sign::Minus, Parity::Odd), p.into_parts());
        let p = SignParity::new(Sign::ZeroPlus, Parity::Odd).unwrap();
        assert_eq!((&Sign::Plus, &Parity::Odd), (p.left(), p.right()));
        let p = SignParity::new(Sign::ZeroPlus, Parity::Even).unwrap();
        assert_eq!(Sign::ZeroPlus, *p.left());
    }

    #[test]
    fn bottom_is_smashed() {
        type Plain = ReducedProduct<Sign, Parity, NoReduction>;
        let p = Plain::new(Sign::Bottom, Parity::Odd).unwrap();
        assert_eq!(Plain::bottom(), p);
        assert!(p.is_bottom());
    }

    #[derive(Debug)]
    struct Widens;

    impl Reduction<Sign, Parity> for Widens {
        fn reduce(_: Sign, parity: Parity) -> Result<(Sign, Parity)> {
            Ok((Sign::Top, parity))
        }
    }

    #[test]
    fn imprecise_reduction_is_rejected() {
        let err = ReducedProduct::<Sign, Parity, Widens>::new(Sign::Plus, Parity::Even);
        assert!(matches!(
            err,
            Err(SemanticError::InconsistentReduction { .. })
        ));
    }

    #[test]
    fn display() {
        let p = SignParity::new(Sign::Minus, Parity::Even).unwrap();
        assert_eq!("(-, even)", p.to_string());
    }
}
