// SPDX-License-Identifier: BSD-3-Clause
//! Lattice of signs, extended with "zero or positive" and "zero or negative"
//!
//! ```text
//!        ⊤
//!      /   \
//!    0-     0+
//!   /  \   /  \
//!  -    0      +
//!   \   |     /
//!       ⊥
//! ```

use crate::{
    error::Result,
    lattice::{Lattice, Satisfiability},
    nonrelational::{unequal_if_incomparable, NonRelationalValueDomain},
    symbolic::{BinaryOperator, Constant, ProgramPoint, UnaryOperator},
};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Sign {
    Bottom,
    Zero,
    Plus,
    Minus,
    ZeroPlus,
    ZeroMinus,
    Top,
}

// ------------------------------------------------------------------
// Constructors

impl Sign {
    #[inline]
    pub fn of(i: i64) -> Self {
        match i.cmp(&0) {
            std::cmp::Ordering::Less => Sign::Minus,
            std::cmp::Ordering::Equal => Sign::Zero,
            std::cmp::Ordering::Greater => Sign::Plus,
        }
    }

    /// Whether every value this sign stands for is `>= 0`.
    #[inline]
    fn non_negative(self) -> bool {
        matches!(self, Sign::Zero | Sign::Plus | Sign::ZeroPlus)
    }

    /// Whether every value this sign stands for is `<= 0`.
    #[inline]
    fn non_positive(self) -> bool {
        matches!(self, Sign::Zero | Sign::Minus | Sign::ZeroMinus)
    }
}

// ------------------------------------------------------------------
// Operations
//
// Division and remainder are undefined (bottom) only for a divisor that is
// exactly zero. A divisor that merely may be zero still yields a defined
// result.

impl Sign {
    pub fn negate(self) -> Self {
        match self {
            Sign::Bottom => Sign::Bottom,
            Sign::Zero => Sign::Zero,
            Sign::Plus => Sign::Minus,
            Sign::Minus => Sign::Plus,
            Sign::ZeroPlus => Sign::ZeroMinus,
            Sign::ZeroMinus => Sign::ZeroPlus,
            Sign::Top => Sign::Top,
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn add(self, other: Self) -> Self {
        match (self, other) {
            (Sign::Bottom, _) | (_, Sign::Bottom) => Sign::Bottom,
            (Sign::Zero, o) => o,
            (Sign::Plus, Sign::Zero | Sign::Plus | Sign::ZeroPlus) => Sign::Plus,
            (Sign::Minus, Sign::Zero | Sign::Minus | Sign::ZeroMinus) => Sign::Minus,
            (Sign::ZeroPlus, Sign::Zero | Sign::ZeroPlus) => Sign::ZeroPlus,
            (Sign::ZeroPlus, Sign::Plus) => Sign::Plus,
            (Sign::ZeroMinus, Sign::Zero | Sign::ZeroMinus) => Sign::ZeroMinus,
            (Sign::ZeroMinus, Sign::Minus) => Sign::Minus,
            _ => Sign::Top,
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn sub(self, other: Self) -> Self {
        self.add(other.negate())
    }

    #[allow(clippy::should_implement_trait)]
    pub fn mul(self, other: Self) -> Self {
        match (self, other) {
            (Sign::Bottom, _) | (_, Sign::Bottom) => Sign::Bottom,
            (Sign::Zero, _) => Sign::Zero,
            (Sign::Plus, o) => o,
            (Sign::Minus, o) => o.negate(),
            (Sign::ZeroPlus | Sign::ZeroMinus | Sign::Top, Sign::Zero) => Sign::Zero,
            (Sign::ZeroPlus, Sign::Plus | Sign::ZeroPlus) => Sign::ZeroPlus,
            (Sign::ZeroPlus, Sign::Minus | Sign::ZeroMinus) => Sign::ZeroMinus,
            (Sign::ZeroMinus, Sign::Plus | Sign::ZeroPlus) => Sign::ZeroMinus,
            (Sign::ZeroMinus, Sign::Minus | Sign::ZeroMinus) => Sign::ZeroPlus,
            _ => Sign::Top,
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn div(self, other: Self) -> Self {
        match (self, other) {
            (Sign::Bottom, _) | (_, Sign::Bottom | Sign::Zero) => Sign::Bottom,
            (Sign::Zero, _) => Sign::Zero,
            (Sign::Plus, Sign::Plus | Sign::ZeroPlus) => Sign::Plus,
            (Sign::Plus, Sign::Minus | Sign::ZeroMinus) => Sign::Minus,
            (Sign::Minus, Sign::Plus | Sign::ZeroPlus) => Sign::Minus,
            (Sign::Minus, Sign::Minus | Sign::ZeroMinus) => Sign::Plus,
            (Sign::ZeroPlus, Sign::Plus | Sign::ZeroPlus) => Sign::ZeroPlus,
            (Sign::ZeroPlus, Sign::Minus | Sign::ZeroMinus) => Sign::ZeroMinus,
            (Sign::ZeroMinus, Sign::Plus | Sign::ZeroPlus) => Sign::ZeroMinus,
            (Sign::ZeroMinus, Sign::Minus | Sign::ZeroMinus) => Sign::ZeroPlus,
            _ => Sign::Top,
        }
    }

    /// The result takes the sign of the dividend.
    #[allow(clippy::should_implement_trait)]
    pub fn rem(self, other: Self) -> Self {
        match (self, other) {
            (Sign::Bottom, _) | (_, Sign::Bottom | Sign::Zero) => Sign::Bottom,
            (Sign::Zero, _) => Sign::Zero,
            (Sign::Plus | Sign::ZeroPlus, _) => Sign::ZeroPlus,
            (Sign::Minus | Sign::ZeroMinus, _) => Sign::ZeroMinus,
            (Sign::Top, _) => Sign::Top,
        }
    }

    /// Every value of `self` is strictly less than every value of `other`.
    fn strictly_below(self, other: Self) -> bool {
        match (self, other) {
            (Sign::Minus, o) => o.non_negative(),
            (Sign::Zero | Sign::ZeroMinus, Sign::Plus) => true,
            _ => false,
        }
    }

    /// Every value of `self` is less than or equal to every value of `other`.
    fn weakly_below(self, other: Self) -> bool {
        (self.non_positive() && other.non_negative()) || self.strictly_below(other)
    }
}

// ------------------------------------------------------------------
// Traits

impl std::fmt::Display for Sign {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sign::Bottom => write!(f, "⊥"),
            Sign::Zero => write!(f, "0"),
            Sign::Plus => write!(f, "+"),
            Sign::Minus => write!(f, "-"),
            Sign::ZeroPlus => write!(f, "0+"),
            Sign::ZeroMinus => write!(f, "0-"),
            Sign::Top => write!(f, "⊤"),
        }
    }
}

impl Lattice for Sign {
    #[inline]
    fn top() -> Self {
        Sign::Top
    }

    #[inline]
    fn bottom() -> Self {
        Sign::Bottom
    }

    fn lub_aux(&self, other: &Self) -> Result<Self> {
        Ok(if self.non_negative() && other.non_negative() {
            Sign::ZeroPlus
        } else if self.non_positive() && other.non_positive() {
            Sign::ZeroMinus
        } else {
            Sign::Top
        })
    }

    fn glb_aux(&self, other: &Self) -> Result<Self> {
        Ok(match (*self, *other) {
            (Sign::ZeroPlus, Sign::ZeroMinus) | (Sign::ZeroMinus, Sign::ZeroPlus) => Sign::Zero,
            (s @ (Sign::Zero | Sign::Plus), Sign::ZeroPlus)
            | (Sign::ZeroPlus, s @ (Sign::Zero | Sign::Plus)) => s,
            (s @ (Sign::Zero | Sign::Minus), Sign::ZeroMinus)
            | (Sign::ZeroMinus, s @ (Sign::Zero | Sign::Minus)) => s,
            _ => Sign::Bottom,
        })
    }

    fn less_or_equal_aux(&self, other: &Self) -> Result<bool> {
        Ok(match other {
            Sign::ZeroPlus => matches!(self, Sign::Zero | Sign::Plus),
            Sign::ZeroMinus => matches!(self, Sign::Zero | Sign::Minus),
            _ => false,
        })
    }
}

impl NonRelationalValueDomain for Sign {
    fn eval_non_null_constant(constant: &Constant, _pp: &ProgramPoint) -> Result<Self> {
        Ok(match constant {
            Constant::Int(i) => Sign::of(*i),
            _ => Sign::Top,
        })
    }

    fn eval_unary(op: UnaryOperator, arg: &Self, _pp: &ProgramPoint) -> Result<Self> {
        Ok(match op {
            UnaryOperator::NumericNeg => arg.negate(),
            _ => Sign::Top,
        })
    }

    fn eval_binary(
        op: BinaryOperator,
        left: &Self,
        right: &Self,
        _pp: &ProgramPoint,
    ) -> Result<Self> {
        Ok(match op {
            BinaryOperator::NumericAdd => left.add(*right),
            BinaryOperator::NumericSub => left.sub(*right),
            BinaryOperator::NumericMul => left.mul(*right),
            BinaryOperator::NumericDiv => left.div(*right),
            BinaryOperator::NumericMod => left.rem(*right),
            _ => Sign::Top,
        })
    }

    fn satisfies_binary(
        op: BinaryOperator,
        left: &Self,
        right: &Self,
        _pp: &ProgramPoint,
    ) -> Result<Satisfiability> {
        let (l, r) = (*left, *right);
        Ok(match op {
            BinaryOperator::ComparisonEq if l == Sign::Zero && r == Sign::Zero => {
                Satisfiability::Satisfied
            }
            BinaryOperator::ComparisonEq => return unequal_if_incomparable(left, right),
            BinaryOperator::ComparisonLt if l.strictly_below(r) => Satisfiability::Satisfied,
            BinaryOperator::ComparisonLt if r.weakly_below(l) => Satisfiability::NotSatisfied,
            BinaryOperator::ComparisonLe if l.weakly_below(r) => Satisfiability::Satisfied,
            BinaryOperator::ComparisonLe if r.strictly_below(l) => Satisfiability::NotSatisfied,
            BinaryOperator::ComparisonGt if r.strictly_below(l) => Satisfiability::Satisfied,
            BinaryOperator::ComparisonGt if l.weakly_below(r) => Satisfiability::NotSatisfied,
            BinaryOperator::ComparisonGe if r.weakly_below(l) => Satisfiability::Satisfied,
            BinaryOperator::ComparisonGe if l.strictly_below(r) => Satisfiability::NotSatisfied,
            _ => Satisfiability::Unknown,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::Sign::{self, *};
    use crate::lattice::{Lattice, Satisfiability};
    use crate::nonrelational::{eval_constant, NonRelationalValueDomain};
    use crate::symbolic::{BinaryOperator, Constant, ProgramPoint};

    const ALL: [Sign; 7] = [Bottom, Zero, Plus, Minus, ZeroPlus, ZeroMinus, Top];

    #[test]
    fn constants() {
        let pp = ProgramPoint::default();
        assert_eq!(Zero, eval_constant::<Sign>(&Constant::Int(0), &pp).unwrap());
        assert_eq!(Plus, eval_constant::<Sign>(&Constant::Int(5), &pp).unwrap());
        assert_eq!(Minus, eval_constant::<Sign>(&Constant::Int(-3), &pp).unwrap());
        assert_eq!(Top, eval_constant::<Sign>(&Constant::Null, &pp).unwrap());
        assert_eq!(
            Top,
            eval_constant::<Sign>(&Constant::Str("5".to_string()), &pp).unwrap()
        );
    }

    #[test]
    fn arithmetic() {
        assert_eq!(Top, Plus.add(Minus));
        assert_eq!(Bottom, Zero.div(Zero));
        assert_eq!(Plus, Plus.div(Plus));
        assert_eq!(Minus, Minus.sub(ZeroPlus));
        assert_eq!(Top, Plus.sub(ZeroPlus));
        assert_eq!(ZeroMinus, ZeroPlus.mul(Minus));
        assert_eq!(ZeroPlus, Minus.mul(ZeroMinus));
        assert_eq!(Zero, Top.mul(Zero));
        assert_eq!(ZeroMinus, Minus.rem(Top));
    }

    #[test]
    fn maybe_zero_divisor_is_defined() {
        for divisor in [ZeroPlus, ZeroMinus, Top] {
            for dividend in [Zero, Plus, Minus, ZeroPlus, ZeroMinus, Top] {
                assert_ne!(Bottom, dividend.div(divisor));
                assert_ne!(Bottom, dividend.rem(divisor));
            }
        }
        for dividend in ALL {
            assert_eq!(Bottom, dividend.div(Zero));
            assert_eq!(Bottom, dividend.rem(Zero));
        }
    }

    #[test]
    fn join_and_meet() {
        assert_eq!(Top, Plus.lub(&Minus).unwrap());
        assert_eq!(ZeroPlus, Zero.lub(&Plus).unwrap());
        assert_eq!(ZeroMinus, Minus.lub(&Zero).unwrap());
        assert_eq!(Top, ZeroPlus.lub(&Minus).unwrap());
        assert_eq!(Zero, ZeroPlus.glb(&ZeroMinus).unwrap());
        assert_eq!(Bottom, Plus.glb(&Minus).unwrap());
        assert_eq!(Plus, Top.glb(&Plus).unwrap());
        assert_eq!(ZeroMinus, ZeroMinus.widening(&Minus).unwrap());
    }

    #[test]
    fn order() {
        assert!(Zero.less_or_equal(&ZeroPlus).unwrap());
        assert!(Minus.less_or_equal(&ZeroMinus).unwrap());
        assert!(!Plus.less_or_equal(&ZeroMinus).unwrap());
        assert!(!ZeroPlus.less_or_equal(&ZeroMinus).unwrap());
        assert!(!Plus.less_or_equal(&Minus).unwrap());
        for s in ALL {
            assert!(Bottom.less_or_equal(&s).unwrap());
            assert!(s.less_or_equal(&Top).unwrap());
        }
    }

    #[test]
    fn comparisons() {
        let pp = ProgramPoint::default();
        let sat = |op, l, r| Sign::satisfies_binary(op, &l, &r, &pp).unwrap();
        assert_eq!(
            Satisfiability::Satisfied,
            sat(BinaryOperator::ComparisonEq, Zero, Zero)
        );
        assert_eq!(
            Satisfiability::NotSatisfied,
            sat(BinaryOperator::ComparisonEq, Plus, Minus)
        );
        assert_eq!(
            Satisfiability::Unknown,
            sat(BinaryOperator::ComparisonEq, Plus, ZeroPlus)
        );
        assert_eq!(
            Satisfiability::Satisfied,
            sat(BinaryOperator::ComparisonLt, Minus, ZeroPlus)
        );
        assert_eq!(
            Satisfiability::NotSatisfied,
            sat(BinaryOperator::ComparisonLt, Zero, ZeroMinus)
        );
        assert_eq!(
            Satisfiability::Satisfied,
            sat(BinaryOperator::ComparisonGe, ZeroPlus, ZeroMinus)
        );
        assert_eq!(
            Satisfiability::Unknown,
            sat(BinaryOperator::ComparisonGt, ZeroPlus, Zero)
        );
    }
}
