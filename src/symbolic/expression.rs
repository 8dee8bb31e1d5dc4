// SPDX-License-Identifier: BSD-3-Clause
use std::fmt::Display;

use super::operator::{BinaryOperator, TernaryOperator, UnaryOperator};
use super::types::{RuntimeTypes, Type};

/// Where an expression is evaluated. Opaque to the domains; only carried
/// along for diagnostics.
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
pub struct ProgramPoint(String);

impl ProgramPoint {
    pub fn new(s: impl Into<String>) -> Self {
        ProgramPoint(s.into())
    }
}

impl From<&str> for ProgramPoint {
    fn from(s: &str) -> Self {
        ProgramPoint(s.to_string())
    }
}

impl Display for ProgramPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            write!(f, "<unknown>")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

#[derive(
    Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    pub fn new(s: impl Into<String>) -> Self {
        Identifier(s.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Identifier {
    fn from(s: &str) -> Self {
        Identifier(s.to_string())
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(
    Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Constant {
    Int(i64),
    Bool(bool),
    Str(String),
    Null,
}

impl Constant {
    pub fn runtime_type(&self) -> Type {
        match self {
            Constant::Int(_) => Type::Numeric,
            Constant::Bool(_) => Type::Boolean,
            Constant::Str(_) => Type::String,
            Constant::Null => Type::Null,
        }
    }
}

impl Display for Constant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Constant::Int(i) => write!(f, "{}", i),
            Constant::Bool(b) => write!(f, "{}", b),
            Constant::Str(s) => write!(f, "{:?}", s),
            Constant::Null => write!(f, "null"),
        }
    }
}

#[derive(
    Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum ExpressionKind {
    Constant(Constant),
    Variable(Identifier),
    Unary {
        op: UnaryOperator,
        arg: Box<SymbolicExpression>,
    },
    Binary {
        op: BinaryOperator,
        left: Box<SymbolicExpression>,
        right: Box<SymbolicExpression>,
    },
    Ternary {
        op: TernaryOperator,
        left: Box<SymbolicExpression>,
        middle: Box<SymbolicExpression>,
        right: Box<SymbolicExpression>,
    },
    /// Any value of the node's runtime types.
    PushAny,
    /// Does nothing; evaluates to bottom.
    Skip,
}

#[derive(
    Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct SymbolicExpression {
    pub kind: ExpressionKind,
    #[serde(default)]
    pub types: RuntimeTypes,
}

impl SymbolicExpression {
    pub fn new(kind: ExpressionKind, types: RuntimeTypes) -> Self {
        SymbolicExpression { kind, types }
    }

    /// A constant typed after its own value.
    pub fn constant(c: Constant) -> Self {
        let types = RuntimeTypes::single(c.runtime_type());
        SymbolicExpression::new(ExpressionKind::Constant(c), types)
    }

    pub fn int(i: i64) -> Self {
        Self::constant(Constant::Int(i))
    }

    pub fn bool(b: bool) -> Self {
        Self::constant(Constant::Bool(b))
    }

    pub fn str(s: &str) -> Self {
        Self::constant(Constant::Str(s.to_string()))
    }

    pub fn null() -> Self {
        Self::constant(Constant::Null)
    }

    pub fn variable(id: impl Into<Identifier>, types: RuntimeTypes) -> Self {
        SymbolicExpression::new(ExpressionKind::Variable(id.into()), types)
    }

    pub fn unary(op: UnaryOperator, arg: SymbolicExpression, types: RuntimeTypes) -> Self {
        SymbolicExpression::new(
            ExpressionKind::Unary {
                op,
                arg: Box::new(arg),
            },
            types,
        )
    }

    pub fn binary(
        op: BinaryOperator,
        left: SymbolicExpression,
        right: SymbolicExpression,
        types: RuntimeTypes,
    ) -> Self {
        SymbolicExpression::new(
            ExpressionKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            types,
        )
    }

    pub fn ternary(
        op: TernaryOperator,
        left: SymbolicExpression,
        middle: SymbolicExpression,
        right: SymbolicExpression,
        types: RuntimeTypes,
    ) -> Self {
        SymbolicExpression::new(
            ExpressionKind::Ternary {
                op,
                left: Box::new(left),
                middle: Box::new(middle),
                right: Box::new(right),
            },
            types,
        )
    }

    pub fn push_any(types: RuntimeTypes) -> Self {
        SymbolicExpression::new(ExpressionKind::PushAny, types)
    }

    pub fn skip() -> Self {
        SymbolicExpression::new(ExpressionKind::Skip, RuntimeTypes::single(Type::Void))
    }
}

impl Display for SymbolicExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            ExpressionKind::Constant(c) => write!(f, "{}", c),
            ExpressionKind::Variable(id) => write!(f, "{}", id),
            ExpressionKind::Unary { op, arg } => write!(f, "{}{}", op, arg),
            ExpressionKind::Binary { op, left, right } => write!(f, "({} {} {})", left, op, right),
            ExpressionKind::Ternary {
                op,
                left,
                middle,
                right,
            } => write!(f, "{}({}, {}, {})", op, left, middle, right),
            ExpressionKind::PushAny => write!(f, "?{}", self.types),
            ExpressionKind::Skip => write!(f, "skip"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let e = SymbolicExpression::binary(
            BinaryOperator::NumericAdd,
            SymbolicExpression::variable("x", RuntimeTypes::untyped()),
            SymbolicExpression::unary(
                UnaryOperator::NumericNeg,
                SymbolicExpression::int(3),
                RuntimeTypes::single(Type::Numeric),
            ),
            RuntimeTypes::single(Type::Numeric),
        );
        assert_eq!("(x + -3)", e.to_string());
        assert_eq!("skip", SymbolicExpression::skip().to_string());
    }

    #[test]
    fn deserialize() {
        let json = r#"{
            "kind": {"binary": {
                "op": "numeric-div",
                "left": {"kind": {"constant": {"int": 4}}, "types": ["numeric"]},
                "right": {"kind": {"variable": "y"}}
            }},
            "types": ["numeric"]
        }"#;
        let e: SymbolicExpression = serde_json::from_str(json).unwrap();
        assert_eq!("(4 / y)", e.to_string());
        if let ExpressionKind::Binary { right, .. } = &e.kind {
            assert!(right.types.is_untyped());
        } else {
            panic!("expected a binary expression");
        }
    }
}
