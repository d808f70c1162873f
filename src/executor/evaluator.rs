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

//! Expression evaluation
//!
//! A tree walk over the compiled AST. Evaluation never fails: missing
//! identifiers, type mismatches, integer overflow and division by zero all
//! collapse to `Unknown` and propagate by the three-valued-logic rules.
//!
//! Every node can be read two ways: [`eval`] produces a [`Value`],
//! [`eval_bool`] a [`BoolOrNone`]. Boolean nodes turn into boolean values;
//! value nodes that happen to hold a boolean convert back, anything else is
//! `Unknown`.

use crate::core::{BoolOrNone, Value};
use crate::parser::ast::{
    ArithmeticOperator, BetweenExpression, ComparisonExpression, ComparisonOperator, Expression,
    InExpression, LikeExpression,
};

use super::env::Environment;

/// Evaluate an expression to a boolean routing decision.
///
/// `True` maps to `true`; `False` and `Unknown` both mean the message does
/// not match.
pub fn evaluate(expression: &Expression, env: &dyn Environment) -> bool {
    eval_bool(expression, env).is_true()
}

/// Evaluate an expression to a [`Value`] for inspection or debugging
pub fn evaluate_value(expression: &Expression, env: &dyn Environment) -> Value {
    eval(expression, env)
}

/// Reduce an expression to a value
pub fn eval(expression: &Expression, env: &dyn Environment) -> Value {
    match expression {
        Expression::Literal(e) => e.value.clone(),
        Expression::Identifier(e) => env.lookup(&e.name),
        Expression::Negate(e) => -&eval(&e.child, env),
        Expression::Arithmetic(e) => {
            let left = eval(&e.left, env);
            let right = eval(&e.right, env);
            match e.op {
                ArithmeticOperator::Add => &left + &right,
                ArithmeticOperator::Subtract => &left - &right,
                ArithmeticOperator::Multiply => &left * &right,
                ArithmeticOperator::Divide => &left / &right,
            }
        }
        // Boolean-producing nodes come back through three-valued logic
        _ => Value::from(eval_bool(expression, env)),
    }
}

/// Reduce an expression to a three-valued boolean
pub fn eval_bool(expression: &Expression, env: &dyn Environment) -> BoolOrNone {
    match expression {
        Expression::Comparison(e) => comparison(e, env),
        Expression::And(e) => {
            let left = eval_bool(&e.left, env);
            if left == BoolOrNone::False {
                return BoolOrNone::False;
            }
            let right = eval_bool(&e.right, env);
            if right == BoolOrNone::False {
                return BoolOrNone::False;
            }
            if left == BoolOrNone::True && right == BoolOrNone::True {
                BoolOrNone::True
            } else {
                BoolOrNone::Unknown
            }
        }
        Expression::Or(e) => {
            let left = eval_bool(&e.left, env);
            if left == BoolOrNone::True {
                return BoolOrNone::True;
            }
            let right = eval_bool(&e.right, env);
            if right == BoolOrNone::True {
                return BoolOrNone::True;
            }
            if left == BoolOrNone::False && right == BoolOrNone::False {
                BoolOrNone::False
            } else {
                BoolOrNone::Unknown
            }
        }
        Expression::Not(e) => eval_bool(&e.child, env).negate(),
        Expression::IsNull(e) => {
            let is_null = eval(&e.child, env).is_unknown();
            BoolOrNone::from(is_null != e.negated)
        }
        Expression::Like(e) => like(e, env),
        Expression::Between(e) => between(e, env),
        Expression::In(e) => {
            if e.negated {
                not_in_list(e, env)
            } else {
                in_list(e, env)
            }
        }
        // Value-producing nodes only contribute a boolean if they hold one
        _ => eval(expression, env).as_bool_or_none(),
    }
}

/// Comparisons guard on Unknown operands, then apply a plain predicate
fn comparison(e: &ComparisonExpression, env: &dyn Environment) -> BoolOrNone {
    let left = eval(&e.left, env);
    if left.is_unknown() {
        return BoolOrNone::Unknown;
    }
    let right = eval(&e.right, env);
    if right.is_unknown() {
        return BoolOrNone::Unknown;
    }
    let result = match e.op {
        ComparisonOperator::Equal => left.equals(&right),
        ComparisonOperator::NotEqual => !left.equals(&right),
        ComparisonOperator::LessThan => left.less_than(&right),
        ComparisonOperator::GreaterThan => left.greater_than(&right),
        ComparisonOperator::LessEqual => left.less_equal(&right),
        ComparisonOperator::GreaterEqual => left.greater_equal(&right),
    };
    BoolOrNone::from(result)
}

/// LIKE only applies to strings; anything else is Unknown (and stays
/// Unknown under NOT LIKE)
fn like(e: &LikeExpression, env: &dyn Environment) -> BoolOrNone {
    match eval(&e.child, env) {
        Value::Text(s) => BoolOrNone::from(e.matcher.matches(&s) != e.negated),
        _ => BoolOrNone::Unknown,
    }
}

/// BETWEEN is the two orderings with Unknown propagation; the negated form
/// is its three-valued negation
fn between(e: &BetweenExpression, env: &dyn Environment) -> BoolOrNone {
    let value = eval(&e.child, env);
    let lower = eval(&e.lower, env);
    let upper = eval(&e.upper, env);
    if value.is_unknown() || lower.is_unknown() || upper.is_unknown() {
        return BoolOrNone::Unknown;
    }
    let inside = value.greater_equal(&lower) && value.less_equal(&upper);
    BoolOrNone::from(inside != e.negated)
}

/// IN: any match wins; otherwise Unknown if any element was Unknown
fn in_list(e: &InExpression, env: &dyn Environment) -> BoolOrNone {
    let value = eval(&e.child, env);
    if value.is_unknown() {
        return BoolOrNone::Unknown;
    }
    let mut result = BoolOrNone::False;
    for item in &e.items {
        let candidate = eval(item, env);
        if candidate.is_unknown() {
            result = BoolOrNone::Unknown;
            continue;
        }
        if value.equals(&candidate) {
            return BoolOrNone::True;
        }
    }
    result
}

/// NOT IN: any match loses outright. An element of an incomparable type
/// forces the result towards False, but never overrides an Unknown already
/// seen; an Unknown element always wins over the type mismatch.
fn not_in_list(e: &InExpression, env: &dyn Environment) -> BoolOrNone {
    let value = eval(&e.child, env);
    if value.is_unknown() {
        return BoolOrNone::Unknown;
    }
    let mut result = BoolOrNone::True;
    for item in &e.items {
        let candidate = eval(item, env);
        if candidate.is_unknown() {
            result = BoolOrNone::Unknown;
            continue;
        }
        if result != BoolOrNone::Unknown
            && !value.same_type(&candidate)
            && !(value.is_numeric() && candidate.is_numeric())
        {
            result = BoolOrNone::False;
            continue;
        }
        if value.equals(&candidate) {
            return BoolOrNone::False;
        }
    }
    result
}
