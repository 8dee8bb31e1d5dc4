// SPDX-License-Identifier: BSD-3-Clause
use std::fmt::Display;

use super::types::Category;

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum UnaryOperator {
    NumericNeg,
    LogicalNot,
    StringLength,
    TypeOf,
}

impl UnaryOperator {
    pub fn operand_category(self) -> Category {
        match self {
            UnaryOperator::NumericNeg => Category::Numeric,
            UnaryOperator::LogicalNot => Category::Boolean,
            UnaryOperator::StringLength => Category::String,
            UnaryOperator::TypeOf => Category::Any,
        }
    }
}

impl Display for UnaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnaryOperator::NumericNeg => write!(f, "-"),
            UnaryOperator::LogicalNot => write!(f, "!"),
            UnaryOperator::StringLength => write!(f, "strlen "),
            UnaryOperator::TypeOf => write!(f, "typeof "),
        }
    }
}

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum BinaryOperator {
    NumericAdd,
    NumericSub,
    NumericMul,
    NumericDiv,
    NumericMod,
    ComparisonEq,
    ComparisonNe,
    ComparisonLt,
    ComparisonLe,
    ComparisonGt,
    ComparisonGe,
    LogicalAnd,
    LogicalOr,
    StringConcat,
    StringContains,
    StringStartsWith,
    StringEndsWith,
    StringIndexOf,
}

impl BinaryOperator {
    /// Categories expected of the left and right operand.
    pub fn operand_categories(self) -> [Category; 2] {
        match self {
            BinaryOperator::NumericAdd
            | BinaryOperator::NumericSub
            | BinaryOperator::NumericMul
            | BinaryOperator::NumericDiv
            | BinaryOperator::NumericMod
            | BinaryOperator::ComparisonLt
            | BinaryOperator::ComparisonLe
            | BinaryOperator::ComparisonGt
            | BinaryOperator::ComparisonGe => [Category::Numeric; 2],
            BinaryOperator::ComparisonEq | BinaryOperator::ComparisonNe => [Category::Any; 2],
            BinaryOperator::LogicalAnd | BinaryOperator::LogicalOr => [Category::Boolean; 2],
            BinaryOperator::StringConcat
            | BinaryOperator::StringContains
            | BinaryOperator::StringStartsWith
            | BinaryOperator::StringEndsWith
            | BinaryOperator::StringIndexOf => [Category::String; 2],
        }
    }

    /// The operator that holds exactly when `self` does not.
    pub fn negate(self) -> Option<Self> {
        match self {
            BinaryOperator::ComparisonEq => Some(BinaryOperator::ComparisonNe),
            BinaryOperator::ComparisonNe => Some(BinaryOperator::ComparisonEq),
            BinaryOperator::ComparisonLt => Some(BinaryOperator::ComparisonGe),
            BinaryOperator::ComparisonLe => Some(BinaryOperator::ComparisonGt),
            BinaryOperator::ComparisonGt => Some(BinaryOperator::ComparisonLe),
            BinaryOperator::ComparisonGe => Some(BinaryOperator::ComparisonLt),
            _ => None,
        }
    }
}

impl Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BinaryOperator::NumericAdd => "+",
            BinaryOperator::NumericSub => "-",
            BinaryOperator::NumericMul => "*",
            BinaryOperator::NumericDiv => "/",
            BinaryOperator::NumericMod => "%",
            BinaryOperator::ComparisonEq => "==",
            BinaryOperator::ComparisonNe => "!=",
            BinaryOperator::ComparisonLt => "<",
            BinaryOperator::ComparisonLe => "<=",
            BinaryOperator::ComparisonGt => ">",
            BinaryOperator::ComparisonGe => ">=",
            BinaryOperator::LogicalAnd => "&&",
            BinaryOperator::LogicalOr => "||",
            BinaryOperator::StringConcat => "strcat",
            BinaryOperator::StringContains => "strcontains",
            BinaryOperator::StringStartsWith => "strstarts",
            BinaryOperator::StringEndsWith => "strends",
            BinaryOperator::StringIndexOf => "strindexof",
        };
        write!(f, "{}", s)
    }
}

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum TernaryOperator {
    StringReplace,
    StringSubstring,
}

impl TernaryOperator {
    pub fn operand_categories(self) -> [Category; 3] {
        match self {
            TernaryOperator::StringReplace => [Category::String; 3],
            TernaryOperator::StringSubstring => {
                [Category::String, Category::Numeric, Category::Numeric]
            }
        }
    }
}

impl Display for TernaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TernaryOperator::StringReplace => write!(f, "strreplace"),
            TernaryOperator::StringSubstring => write!(f, "strsub"),
        }
    }
}
