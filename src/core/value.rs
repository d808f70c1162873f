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

//! Runtime values and three-valued logic
//!
//! This module provides the [`Value`] union that selector expressions
//! evaluate to, together with [`BoolOrNone`], the three-valued boolean that
//! carries SQL-style NULL propagation through every predicate.

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::sync::Arc;

/// Three-valued boolean: the result of every predicate in a selector.
///
/// `Unknown` absorbs missing identifiers and type mismatches and follows the
/// SQL NULL-propagation rules through AND/OR/NOT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOrNone {
    /// Definitely false
    False,
    /// Definitely true
    True,
    /// NULL / indeterminate
    Unknown,
}

impl BoolOrNone {
    /// Three-valued negation: NOT Unknown is Unknown
    pub fn negate(self) -> Self {
        match self {
            BoolOrNone::False => BoolOrNone::True,
            BoolOrNone::True => BoolOrNone::False,
            BoolOrNone::Unknown => BoolOrNone::Unknown,
        }
    }

    /// True exactly for `True`; `False` and `Unknown` both map to false
    pub fn is_true(self) -> bool {
        self == BoolOrNone::True
    }
}

impl From<bool> for BoolOrNone {
    fn from(b: bool) -> Self {
        if b {
            BoolOrNone::True
        } else {
            BoolOrNone::False
        }
    }
}

impl fmt::Display for BoolOrNone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoolOrNone::False => write!(f, "false"),
            BoolOrNone::True => write!(f, "true"),
            BoolOrNone::Unknown => write!(f, "unknown"),
        }
    }
}

/// Tag identifying a [`Value`] variant.
///
/// The order matches the variant order in `Value`; same-type checks compare
/// these tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Unknown,
    Boolean,
    Exact,
    Inexact,
    Text,
}

/// A runtime value with type information
///
/// Each variant carries its data directly. `Unknown` stands in for SQL NULL
/// and for any operation that cannot produce a value (missing identifier,
/// type mismatch, integer overflow, division by zero).
///
/// Note: `Text` uses `Arc<str>` so that cloning a value during evaluation
/// never copies string bytes.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    /// NULL / missing / erroneous
    #[default]
    Unknown,
    /// Boolean value
    Boolean(bool),
    /// 64-bit signed integer
    Exact(i64),
    /// 64-bit IEEE-754 floating point
    Inexact(f64),
    /// UTF-8 text (Arc for cheap cloning)
    Text(Arc<str>),
}

/// A pair of numeric operands after promotion
enum NumericPair {
    Exact(i64, i64),
    Inexact(f64, f64),
}

impl Value {
    /// Create a text value from anything string-like
    pub fn text(value: impl AsRef<str>) -> Self {
        Value::Text(Arc::from(value.as_ref()))
    }

    /// Returns the type tag of this value
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Unknown => ValueType::Unknown,
            Value::Boolean(_) => ValueType::Boolean,
            Value::Exact(_) => ValueType::Exact,
            Value::Inexact(_) => ValueType::Inexact,
            Value::Text(_) => ValueType::Text,
        }
    }

    /// Returns true if this value is NULL/unknown
    pub fn is_unknown(&self) -> bool {
        matches!(self, Value::Unknown)
    }

    /// Returns true for `Exact` and `Inexact` values
    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Exact(_) | Value::Inexact(_))
    }

    /// Returns true if both values carry the same type tag
    pub fn same_type(&self, other: &Value) -> bool {
        self.value_type() == other.value_type()
    }

    /// Promote a pair of numeric operands to a common representation.
    ///
    /// An `Exact` operand paired with an `Inexact` one is widened to f64.
    /// Returns `None` if either side is not numeric.
    fn numeric_pair(&self, other: &Value) -> Option<NumericPair> {
        match (self, other) {
            (Value::Exact(a), Value::Exact(b)) => Some(NumericPair::Exact(*a, *b)),
            (Value::Inexact(a), Value::Inexact(b)) => Some(NumericPair::Inexact(*a, *b)),
            (Value::Exact(a), Value::Inexact(b)) => Some(NumericPair::Inexact(*a as f64, *b)),
            (Value::Inexact(a), Value::Exact(b)) => Some(NumericPair::Inexact(*a, *b as f64)),
            _ => None,
        }
    }

    /// Selector equality: numeric operands compare after promotion, other
    /// operands compare only when the type tags match. Cross-type pairs are
    /// simply not equal. Unknown never reaches this function during
    /// evaluation; comparing it here yields false.
    pub fn equals(&self, other: &Value) -> bool {
        if let Some(pair) = self.numeric_pair(other) {
            return match pair {
                NumericPair::Exact(a, b) => a == b,
                NumericPair::Inexact(a, b) => a == b,
            };
        }
        match (self, other) {
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a.as_bytes() == b.as_bytes(),
            _ => false,
        }
    }

    /// Selector ordering: defined only between numeric values after
    /// promotion; every other combination is false.
    pub fn less_than(&self, other: &Value) -> bool {
        match self.numeric_pair(other) {
            Some(NumericPair::Exact(a, b)) => a < b,
            Some(NumericPair::Inexact(a, b)) => a < b,
            None => false,
        }
    }

    pub fn greater_than(&self, other: &Value) -> bool {
        match self.numeric_pair(other) {
            Some(NumericPair::Exact(a, b)) => a > b,
            Some(NumericPair::Inexact(a, b)) => a > b,
            None => false,
        }
    }

    pub fn less_equal(&self, other: &Value) -> bool {
        match self.numeric_pair(other) {
            Some(NumericPair::Exact(a, b)) => a <= b,
            Some(NumericPair::Inexact(a, b)) => a <= b,
            None => false,
        }
    }

    pub fn greater_equal(&self, other: &Value) -> bool {
        match self.numeric_pair(other) {
            Some(NumericPair::Exact(a, b)) => a >= b,
            Some(NumericPair::Inexact(a, b)) => a >= b,
            None => false,
        }
    }

    /// Logical negation: defined only on `Boolean`, everything else is
    /// `Unknown`.
    pub fn logical_not(&self) -> BoolOrNone {
        match self {
            Value::Boolean(b) => BoolOrNone::from(!*b),
            _ => BoolOrNone::Unknown,
        }
    }

    /// Three-valued view of this value: `Boolean` maps across, anything
    /// else is `Unknown`.
    pub fn as_bool_or_none(&self) -> BoolOrNone {
        match self {
            Value::Boolean(b) => BoolOrNone::from(*b),
            _ => BoolOrNone::Unknown,
        }
    }
}

impl From<BoolOrNone> for Value {
    fn from(bn: BoolOrNone) -> Self {
        match bn {
            BoolOrNone::True => Value::Boolean(true),
            BoolOrNone::False => Value::Boolean(false),
            BoolOrNone::Unknown => Value::Unknown,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Exact(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Inexact(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::text(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::text(s)
    }
}

// Arithmetic follows the promotion rules above. Non-numeric operands yield
// Unknown. Integer overflow and integer division by zero also yield Unknown;
// float division by zero follows IEEE-754.

impl Add for &Value {
    type Output = Value;

    fn add(self, rhs: Self) -> Value {
        match self.numeric_pair(rhs) {
            Some(NumericPair::Exact(a, b)) => {
                a.checked_add(b).map(Value::Exact).unwrap_or_default()
            }
            Some(NumericPair::Inexact(a, b)) => Value::Inexact(a + b),
            None => Value::Unknown,
        }
    }
}

impl Sub for &Value {
    type Output = Value;

    fn sub(self, rhs: Self) -> Value {
        match self.numeric_pair(rhs) {
            Some(NumericPair::Exact(a, b)) => {
                a.checked_sub(b).map(Value::Exact).unwrap_or_default()
            }
            Some(NumericPair::Inexact(a, b)) => Value::Inexact(a - b),
            None => Value::Unknown,
        }
    }
}

impl Mul for &Value {
    type Output = Value;

    fn mul(self, rhs: Self) -> Value {
        match self.numeric_pair(rhs) {
            Some(NumericPair::Exact(a, b)) => {
                a.checked_mul(b).map(Value::Exact).unwrap_or_default()
            }
            Some(NumericPair::Inexact(a, b)) => Value::Inexact(a * b),
            None => Value::Unknown,
        }
    }
}

impl Div for &Value {
    type Output = Value;

    fn div(self, rhs: Self) -> Value {
        match self.numeric_pair(rhs) {
            Some(NumericPair::Exact(a, b)) => {
                a.checked_div(b).map(Value::Exact).unwrap_or_default()
            }
            Some(NumericPair::Inexact(a, b)) => Value::Inexact(a / b),
            None => Value::Unknown,
        }
    }
}

impl Neg for &Value {
    type Output = Value;

    fn neg(self) -> Value {
        match self {
            Value::Exact(i) => i.checked_neg().map(Value::Exact).unwrap_or_default(),
            Value::Inexact(x) => Value::Inexact(-x),
            _ => Value::Unknown,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unknown => write!(f, "UNKNOWN"),
            Value::Boolean(b) => write!(f, "BOOL:{}", b),
            Value::Exact(i) => write!(f, "EXACT:{}", i),
            Value::Inexact(x) => write!(f, "APPROX:{}", x),
            Value::Text(s) => write!(f, "STRING:'{}'", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_tags() {
        assert!(Value::Unknown.is_unknown());
        assert!(!Value::Boolean(false).is_unknown());
        assert!(Value::Exact(1).is_numeric());
        assert!(Value::Inexact(1.0).is_numeric());
        assert!(!Value::text("1").is_numeric());
        assert!(Value::Exact(1).same_type(&Value::Exact(2)));
        assert!(!Value::Exact(1).same_type(&Value::Inexact(1.0)));
    }

    #[test]
    fn test_equality_with_promotion() {
        assert!(Value::Exact(42).equals(&Value::Inexact(42.0)));
        assert!(Value::Inexact(39.0).equals(&Value::Exact(39)));
        assert!(Value::text("foo").equals(&Value::text("foo")));
        assert!(!Value::text("foo").equals(&Value::text("bar")));
        assert!(!Value::Exact(1).equals(&Value::text("1")));
        assert!(!Value::Boolean(true).equals(&Value::Exact(1)));
        assert!(!Value::Unknown.equals(&Value::Unknown));
    }

    #[test]
    fn test_ordering_numeric_only() {
        assert!(Value::Exact(17).less_than(&Value::Inexact(19.0)));
        assert!(Value::Inexact(20.0).greater_equal(&Value::Exact(19)));
        assert!(Value::Exact(42).less_equal(&Value::Inexact(42.0)));
        // Orderings involving non-numeric operands are plain false
        assert!(!Value::text("hello").greater_than(&Value::Inexact(19.0)));
        assert!(!Value::text("hello").less_than(&Value::Inexact(19.0)));
        assert!(!Value::Boolean(true).less_than(&Value::Exact(1)));
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(&Value::Exact(17) / &Value::Exact(4), Value::Exact(4));
        assert_eq!(&Value::Exact(1) + &Value::Inexact(0.5), Value::Inexact(1.5));
        assert_eq!(&Value::Exact(3) * &Value::Exact(7), Value::Exact(21));
        assert_eq!(&Value::text("a") + &Value::Exact(1), Value::Unknown);
        assert_eq!(&Value::Unknown - &Value::Exact(1), Value::Unknown);
        assert_eq!(-&Value::Exact(5), Value::Exact(-5));
        assert_eq!(-&Value::text("5"), Value::Unknown);
    }

    #[test]
    fn test_division_by_zero() {
        // Integer division by zero collapses to Unknown
        assert_eq!(&Value::Exact(42) / &Value::Exact(0), Value::Unknown);
        // Float division by zero follows IEEE-754
        match &Value::Inexact(42.0) / &Value::Exact(0) {
            Value::Inexact(x) => assert!(x.is_infinite()),
            other => panic!("expected infinity, got {other}"),
        }
    }

    #[test]
    fn test_overflow_collapses() {
        assert_eq!(&Value::Exact(i64::MAX) + &Value::Exact(1), Value::Unknown);
        assert_eq!(&Value::Exact(0) - &Value::Exact(i64::MIN), Value::Unknown);
        assert_eq!(-&Value::Exact(i64::MIN), Value::Unknown);
    }

    #[test]
    fn test_logical_not() {
        assert_eq!(Value::Boolean(true).logical_not(), BoolOrNone::False);
        assert_eq!(Value::Boolean(false).logical_not(), BoolOrNone::True);
        assert_eq!(Value::Exact(1).logical_not(), BoolOrNone::Unknown);
        assert_eq!(Value::Unknown.logical_not(), BoolOrNone::Unknown);
    }

    #[test]
    fn test_bool_or_none() {
        assert_eq!(BoolOrNone::True.negate(), BoolOrNone::False);
        assert_eq!(BoolOrNone::Unknown.negate(), BoolOrNone::Unknown);
        assert!(BoolOrNone::True.is_true());
        assert!(!BoolOrNone::Unknown.is_true());
        assert_eq!(Value::from(BoolOrNone::Unknown), Value::Unknown);
        assert_eq!(Value::from(BoolOrNone::True), Value::Boolean(true));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Unknown.to_string(), "UNKNOWN");
        assert_eq!(Value::Boolean(true).to_string(), "BOOL:true");
        assert_eq!(Value::Exact(17).to_string(), "EXACT:17");
        assert_eq!(Value::Inexact(42.5).to_string(), "APPROX:42.5");
        assert_eq!(Value::text("hi").to_string(), "STRING:'hi'");
    }
}
