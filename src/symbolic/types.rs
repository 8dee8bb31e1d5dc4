// SPDX-License-Identifier: BSD-3-Clause
use std::collections::BTreeSet;
use std::fmt::Display;

/// A runtime type, only as fine-grained as the domains need.
#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Type {
    /// Not yet resolved by type inference.
    Untyped,
    Numeric,
    Boolean,
    String,
    Null,
    Reference,
    Void,
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Untyped => write!(f, "untyped"),
            Type::Numeric => write!(f, "numeric"),
            Type::Boolean => write!(f, "boolean"),
            Type::String => write!(f, "string"),
            Type::Null => write!(f, "null"),
            Type::Reference => write!(f, "reference"),
            Type::Void => write!(f, "void"),
        }
    }
}

/// What an operator expects of one of its operands.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Category {
    Any,
    Numeric,
    Boolean,
    String,
}

/// Candidate runtime types of an expression.
#[derive(
    Clone,
    Debug,
    Default,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    serde::Deserialize,
    serde::Serialize,
)]
#[serde(transparent)]
pub struct RuntimeTypes(BTreeSet<Type>);

impl RuntimeTypes {
    pub fn untyped() -> Self {
        Self::single(Type::Untyped)
    }

    pub fn single(ty: Type) -> Self {
        RuntimeTypes(BTreeSet::from([ty]))
    }

    pub fn contains(&self, ty: Type) -> bool {
        self.0.contains(&ty)
    }

    /// No information yet: empty, or explicitly containing
    /// [`Type::Untyped`].
    pub fn is_untyped(&self) -> bool {
        self.0.is_empty() || self.0.contains(&Type::Untyped)
    }

    /// Whether an operand with these types is acceptable where `category` is
    /// expected. Untyped operands are always acceptable so that evaluation
    /// can proceed while type inference is still running. Several candidate
    /// types only share the untyped supertype, so they are accepted too.
    pub fn accepts(&self, category: Category) -> bool {
        if self.is_untyped() || self.0.len() > 1 {
            return true;
        }
        self.0.iter().any(|ty| match category {
            Category::Any => true,
            Category::Numeric => *ty == Type::Numeric,
            Category::Boolean => *ty == Type::Boolean,
            Category::String => *ty == Type::String,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Type> {
        self.0.iter()
    }
}

impl FromIterator<Type> for RuntimeTypes {
    fn from_iter<I: IntoIterator<Item = Type>>(iter: I) -> Self {
        RuntimeTypes(iter.into_iter().collect())
    }
}

impl Display for RuntimeTypes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, ty) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", ty)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::{Category, RuntimeTypes, Type};

    #[test]
    fn untyped_is_accepted_everywhere() {
        let untyped = RuntimeTypes::untyped();
        assert!(untyped.accepts(Category::Numeric));
        assert!(untyped.accepts(Category::String));
        assert!(RuntimeTypes::default().accepts(Category::Boolean));
    }

    #[test]
    fn mixed_sets_are_accepted() {
        let mixed: RuntimeTypes = [Type::Numeric, Type::String].into_iter().collect();
        assert!(mixed.accepts(Category::Numeric));
        assert!(mixed.accepts(Category::Boolean));
        assert!(mixed.accepts(Category::Any));
        let with_untyped: RuntimeTypes = [Type::String, Type::Untyped].into_iter().collect();
        assert!(with_untyped.accepts(Category::Numeric));
    }

    #[test]
    fn single_type_must_fit() {
        let string = RuntimeTypes::single(Type::String);
        assert!(!string.accepts(Category::Numeric));
        assert!(string.accepts(Category::String));
        assert!(string.accepts(Category::Any));
        assert!(!RuntimeTypes::single(Type::Null).accepts(Category::Boolean));
    }
}
