// SPDX-License-Identifier: BSD-3-Clause
//! Flat lattice of integer parities

use crate::{
    error::Result,
    lattice::Lattice,
    nonrelational::NonRelationalValueDomain,
    symbolic::{BinaryOperator, Constant, ProgramPoint, UnaryOperator},
};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Parity {
    Bottom,
    Even,
    Odd,
    Top,
}

impl Parity {
    #[inline]
    pub fn of(i: i64) -> Self {
        if i % 2 == 0 {
            Parity::Even
        } else {
            Parity::Odd
        }
    }

    pub fn is_concrete(self) -> bool {
        matches!(self, Parity::Even | Parity::Odd)
    }

    pub fn negate(self) -> Self {
        self
    }

    /// Also used for subtraction, which has the same parity table.
    #[allow(clippy::should_implement_trait)]
    pub fn add(self, other: Self) -> Self {
        match (self, other) {
            (Parity::Bottom, _) | (_, Parity::Bottom) => Parity::Bottom,
            (Parity::Top, _) | (_, Parity::Top) => Parity::Top,
            (a, b) if a == b => Parity::Even,
            _ => Parity::Odd,
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn mul(self, other: Self) -> Self {
        match (self, other) {
            (Parity::Bottom, _) | (_, Parity::Bottom) => Parity::Bottom,
            (Parity::Even, _) | (_, Parity::Even) => Parity::Even,
            (Parity::Odd, Parity::Odd) => Parity::Odd,
            _ => Parity::Top,
        }
    }
}

impl std::fmt::Display for Parity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Parity::Bottom => write!(f, "⊥"),
            Parity::Even => write!(f, "even"),
            Parity::Odd => write!(f, "odd"),
            Parity::Top => write!(f, "⊤"),
        }
    }
}

impl Lattice for Parity {
    #[inline]
    fn top() -> Self {
        Parity::Top
    }

    #[inline]
    fn bottom() -> Self {
        Parity::Bottom
    }

    // Only `Even` and `Odd` reach the hooks, and they are distinct.

    fn lub_aux(&self, _other: &Self) -> Result<Self> {
        Ok(Parity::Top)
    }

    fn glb_aux(&self, _other: &Self) -> Result<Self> {
        Ok(Parity::Bottom)
    }

    fn less_or_equal_aux(&self, _other: &Self) -> Result<bool> {
        Ok(false)
    }
}

impl NonRelationalValueDomain for Parity {
    fn eval_non_null_constant(constant: &Constant, _pp: &ProgramPoint) -> Result<Self> {
        Ok(match constant {
            Constant::Int(i) => Parity::of(*i),
            _ => Parity::Top,
        })
    }

    fn eval_unary(op: UnaryOperator, arg: &Self, _pp: &ProgramPoint) -> Result<Self> {
        Ok(match op {
            UnaryOperator::NumericNeg => arg.negate(),
            _ => Parity::Top,
        })
    }

    fn eval_binary(
        op: BinaryOperator,
        left: &Self,
        right: &Self,
        _pp: &ProgramPoint,
    ) -> Result<Self> {
        Ok(match op {
            BinaryOperator::NumericAdd | BinaryOperator::NumericSub => left.add(*right),
            BinaryOperator::NumericMul => left.mul(*right),
            _ => Parity::Top,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::Parity::{self, *};
    use crate::lattice::Lattice;

    #[test]
    fn transfer() {
        assert_eq!(Even, Parity::of(-4));
        assert_eq!(Odd, Parity::of(-3));
        assert_eq!(Even, Odd.add(Odd));
        assert_eq!(Odd, Even.add(Odd));
        assert_eq!(Top, Top.add(Odd));
        assert_eq!(Even, Even.mul(Top));
        assert_eq!(Top, Odd.mul(Top));
        assert_eq!(Bottom, Bottom.mul(Even));
    }

    #[test]
    fn flat() {
        assert_eq!(Top, Even.lub(&Odd).unwrap());
        assert_eq!(Bottom, Even.glb(&Odd).unwrap());
        assert!(!Even.less_or_equal(&Odd).unwrap());
        assert!(Odd.less_or_equal(&Top).unwrap());
    }
}
