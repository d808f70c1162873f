// Copyright 2025 Msgsieve Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Abstract syntax tree for selector expressions
//!
//! The tree is built once per compile and is immutable afterwards; a
//! compiled expression can be shared freely across threads. Operators are
//! small enums stored inline in the nodes and matched at evaluation time.
//!
//! `Display` renders the canonical, fully parenthesized form used in logs.

use std::fmt;

use crate::core::Value;

use super::pattern::LikePattern;

/// Comparison operator (pre-computed at parse time)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOperator {
    /// =
    Equal,
    /// <>
    NotEqual,
    /// <
    LessThan,
    /// >
    GreaterThan,
    /// <=
    LessEqual,
    /// >=
    GreaterEqual,
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ComparisonOperator::Equal => "=",
            ComparisonOperator::NotEqual => "<>",
            ComparisonOperator::LessThan => "<",
            ComparisonOperator::GreaterThan => ">",
            ComparisonOperator::LessEqual => "<=",
            ComparisonOperator::GreaterEqual => ">=",
        };
        write!(f, "{}", s)
    }
}

/// Binary arithmetic operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithmeticOperator {
    /// +
    Add,
    /// -
    Subtract,
    /// *
    Multiply,
    /// /
    Divide,
}

impl fmt::Display for ArithmeticOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ArithmeticOperator::Add => "+",
            ArithmeticOperator::Subtract => "-",
            ArithmeticOperator::Multiply => "*",
            ArithmeticOperator::Divide => "/",
        };
        write!(f, "{}", s)
    }
}

/// Expression enum representing all selector expression nodes
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Constant value
    Literal(Literal),
    /// Environment lookup
    Identifier(Identifier),
    /// Unary arithmetic negation
    Negate(NegateExpression),
    /// Binary arithmetic (a + b)
    Arithmetic(ArithmeticExpression),
    /// Comparison (a = b, a < b, ...)
    Comparison(ComparisonExpression),
    /// Three-valued AND
    And(AndExpression),
    /// Three-valued OR
    Or(OrExpression),
    /// Three-valued NOT
    Not(NotExpression),
    /// IS NULL / IS NOT NULL
    IsNull(IsNullExpression),
    /// LIKE / NOT LIKE with precompiled pattern
    Like(LikeExpression),
    /// BETWEEN / NOT BETWEEN
    Between(BetweenExpression),
    /// IN / NOT IN
    In(InExpression),
}

/// Constant value
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub value: Value,
}

/// Identifier resolved against the environment at evaluation time
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub name: String,
}

/// Unary arithmetic negation
#[derive(Debug, Clone, PartialEq)]
pub struct NegateExpression {
    pub child: Box<Expression>,
}

/// Binary arithmetic expression
#[derive(Debug, Clone, PartialEq)]
pub struct ArithmeticExpression {
    pub op: ArithmeticOperator,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
}

/// Comparison expression
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonExpression {
    pub op: ComparisonOperator,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
}

/// Three-valued AND: False dominates, Unknown otherwise infects
#[derive(Debug, Clone, PartialEq)]
pub struct AndExpression {
    pub left: Box<Expression>,
    pub right: Box<Expression>,
}

/// Three-valued OR: True dominates, Unknown otherwise infects
#[derive(Debug, Clone, PartialEq)]
pub struct OrExpression {
    pub left: Box<Expression>,
    pub right: Box<Expression>,
}

/// Three-valued NOT
#[derive(Debug, Clone, PartialEq)]
pub struct NotExpression {
    pub child: Box<Expression>,
}

/// IS NULL test (`negated` for IS NOT NULL)
#[derive(Debug, Clone, PartialEq)]
pub struct IsNullExpression {
    pub child: Box<Expression>,
    pub negated: bool,
}

/// LIKE pattern match (`negated` for NOT LIKE)
///
/// The pattern is translated to an anchored regex when the expression is
/// built; evaluation only runs the match.
#[derive(Debug, Clone, PartialEq)]
pub struct LikeExpression {
    pub child: Box<Expression>,
    pub pattern: String,
    pub escape: Option<char>,
    pub matcher: LikePattern,
    pub negated: bool,
}

/// Range test (`negated` for NOT BETWEEN)
#[derive(Debug, Clone, PartialEq)]
pub struct BetweenExpression {
    pub child: Box<Expression>,
    pub lower: Box<Expression>,
    pub upper: Box<Expression>,
    pub negated: bool,
}

/// Set membership test (`negated` for NOT IN)
#[derive(Debug, Clone, PartialEq)]
pub struct InExpression {
    pub child: Box<Expression>,
    pub items: Vec<Expression>,
    pub negated: bool,
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Literal(e) => write!(f, "{}", e),
            Expression::Identifier(e) => write!(f, "{}", e),
            Expression::Negate(e) => write!(f, "{}", e),
            Expression::Arithmetic(e) => write!(f, "{}", e),
            Expression::Comparison(e) => write!(f, "{}", e),
            Expression::And(e) => write!(f, "{}", e),
            Expression::Or(e) => write!(f, "{}", e),
            Expression::Not(e) => write!(f, "{}", e),
            Expression::IsNull(e) => write!(f, "{}", e),
            Expression::Like(e) => write!(f, "{}", e),
            Expression::Between(e) => write!(f, "{}", e),
            Expression::In(e) => write!(f, "{}", e),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl fmt::Display for NegateExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "-({})", self.child)
    }
}

impl fmt::Display for ArithmeticExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {} {})", self.left, self.op, self.right)
    }
}

impl fmt::Display for ComparisonExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {} {})", self.left, self.op, self.right)
    }
}

impl fmt::Display for AndExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} AND {})", self.left, self.right)
    }
}

impl fmt::Display for OrExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} OR {})", self.left, self.right)
    }
}

impl fmt::Display for NotExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(NOT {})", self.child)
    }
}

impl fmt::Display for IsNullExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            write!(f, "({} IS NOT NULL)", self.child)
        } else {
            write!(f, "({} IS NULL)", self.child)
        }
    }
}

impl fmt::Display for LikeExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let not = if self.negated { " NOT" } else { "" };
        match self.escape {
            Some(e) => write!(f, "({}{} LIKE '{}' ESCAPE '{}')", self.child, not, self.pattern, e),
            None => write!(f, "({}{} LIKE '{}')", self.child, not, self.pattern),
        }
    }
}

impl fmt::Display for BetweenExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let not = if self.negated { " NOT" } else { "" };
        write!(
            f,
            "({}{} BETWEEN {} AND {})",
            self.child, not, self.lower, self.upper
        )
    }
}

impl fmt::Display for InExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let not = if self.negated { " NOT" } else { "" };
        write!(f, "({}{} IN (", self.child, not)?;
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", item)?;
        }
        write!(f, "))")
    }
}
