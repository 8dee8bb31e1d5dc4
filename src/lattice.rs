// SPDX-License-Identifier: BSD-3-Clause
//! The lattice contract every abstract domain satisfies.

use std::fmt::Debug;

use crate::error::Result;

/// A lattice of abstract values.
///
/// Implementors provide the canonical elements and the `*_aux` hooks; the
/// provided methods take care of the trivial cases (equal operands, bottom,
/// top) so that the hooks only ever see two distinct proper elements. Every
/// operation returns a fresh element.
///
/// Errors are reserved for invariant violations. Two incomparable elements
/// make [`Lattice::less_or_equal`] return `Ok(false)`, never an error.
pub trait Lattice: Clone + Debug + PartialEq + Sized {
    fn top() -> Self;

    fn bottom() -> Self;

    #[inline]
    fn is_top(&self) -> bool {
        *self == Self::top()
    }

    #[inline]
    fn is_bottom(&self) -> bool {
        *self == Self::bottom()
    }

    /// Least upper bound of two distinct, non-trivial elements.
    fn lub_aux(&self, other: &Self) -> Result<Self>;

    /// Greatest lower bound of two distinct, non-trivial elements.
    fn glb_aux(&self, other: &Self) -> Result<Self>;

    /// Order between two distinct, non-trivial elements.
    fn less_or_equal_aux(&self, other: &Self) -> Result<bool>;

    /// Finite-height lattices can keep this default.
    fn widening_aux(&self, other: &Self) -> Result<Self> {
        self.lub_aux(other)
    }

    fn narrowing_aux(&self, other: &Self) -> Result<Self> {
        self.glb_aux(other)
    }

    fn lub(&self, other: &Self) -> Result<Self> {
        if other.is_bottom() || self.is_top() || self == other {
            return Ok(self.clone());
        }
        if self.is_bottom() || other.is_top() {
            return Ok(other.clone());
        }
        self.lub_aux(other)
    }

    /// Used in place of [`Lattice::lub`] on back-edges of a fixpoint
    /// iteration. `self` is the previous iterate.
    fn widening(&self, other: &Self) -> Result<Self> {
        if other.is_bottom() || self.is_top() || self == other {
            return Ok(self.clone());
        }
        if self.is_bottom() || other.is_top() {
            return Ok(other.clone());
        }
        self.widening_aux(other)
    }

    fn glb(&self, other: &Self) -> Result<Self> {
        if other.is_top() || self.is_bottom() || self == other {
            return Ok(self.clone());
        }
        if self.is_top() || other.is_bottom() {
            return Ok(other.clone());
        }
        self.glb_aux(other)
    }

    fn narrowing(&self, other: &Self) -> Result<Self> {
        if other.is_top() || self.is_bottom() || self == other {
            return Ok(self.clone());
        }
        if self.is_top() || other.is_bottom() {
            return Ok(other.clone());
        }
        self.narrowing_aux(other)
    }

    fn less_or_equal(&self, other: &Self) -> Result<bool> {
        if self == other || self.is_bottom() || other.is_top() {
            return Ok(true);
        }
        if self.is_top() || other.is_bottom() {
            return Ok(false);
        }
        self.less_or_equal_aux(other)
    }
}

/// Outcome of checking a condition against an abstraction.
#[derive(
    Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Satisfiability {
    Satisfied,
    NotSatisfied,
    Unknown,
}

impl Satisfiability {
    #[inline]
    pub fn from_bool(b: bool) -> Self {
        if b {
            Satisfiability::Satisfied
        } else {
            Satisfiability::NotSatisfied
        }
    }

    pub fn negate(self) -> Self {
        match self {
            Satisfiability::Satisfied => Satisfiability::NotSatisfied,
            Satisfiability::NotSatisfied => Satisfiability::Satisfied,
            Satisfiability::Unknown => Satisfiability::Unknown,
        }
    }

    pub fn and(self, other: Self) -> Self {
        match (self, other) {
            (Satisfiability::NotSatisfied, _) | (_, Satisfiability::NotSatisfied) => {
                Satisfiability::NotSatisfied
            }
            (Satisfiability::Satisfied, Satisfiability::Satisfied) => Satisfiability::Satisfied,
            _ => Satisfiability::Unknown,
        }
    }

    pub fn or(self, other: Self) -> Self {
        match (self, other) {
            (Satisfiability::Satisfied, _) | (_, Satisfiability::Satisfied) => {
                Satisfiability::Satisfied
            }
            (Satisfiability::NotSatisfied, Satisfiability::NotSatisfied) => {
                Satisfiability::NotSatisfied
            }
            _ => Satisfiability::Unknown,
        }
    }

    /// Outcome over the union of the states two outcomes were computed on.
    pub fn lub(self, other: Self) -> Self {
        if self == other {
            self
        } else {
            Satisfiability::Unknown
        }
    }
}

impl std::fmt::Display for Satisfiability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Satisfiability::Satisfied => write!(f, "satisfied"),
            Satisfiability::NotSatisfied => write!(f, "not satisfied"),
            Satisfiability::Unknown => write!(f, "unknown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Satisfiability::*;

    #[test]
    fn connectives() {
        assert_eq!(Satisfied.and(Unknown), Unknown);
        assert_eq!(NotSatisfied.and(Unknown), NotSatisfied);
        assert_eq!(Satisfied.or(Unknown), Satisfied);
        assert_eq!(NotSatisfied.or(NotSatisfied), NotSatisfied);
        assert_eq!(Unknown.negate(), Unknown);
        assert_eq!(Satisfied.negate(), NotSatisfied);
        assert_eq!(Satisfied.lub(NotSatisfied), Unknown);
        assert_eq!(Satisfied.lub(Satisfied), Satisfied);
    }
}
