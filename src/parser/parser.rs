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

//! Recursive-descent parser for selector expressions
//!
//! Grammar (informal), lowest precedence first:
//!
//! ```text
//! Select     := ε | Or                       -- empty selector is TRUE
//! Or         := And ( "OR" And )*
//! And        := Comparison ( "AND" Comparison )*
//! Comparison := "NOT" Comparison
//!             | Add "IS" ["NOT"] "NULL"
//!             | Add ["NOT"] "LIKE" String ["ESCAPE" String]
//!             | Add ["NOT"] "BETWEEN" Add "AND" Add
//!             | Add ["NOT"] "IN" "(" Add ("," Add)* ")"
//!             | Add CmpOp Add
//!             | Add
//! Add        := Mul ( ("+"|"-") Mul )*
//! Mul        := Unary ( ("*"|"/") Unary )*
//! Unary      := "-" ExactNumericLiteral     -- lets i64::MIN parse
//!             | "+" Unary | "-" Unary | "(" Or ")" | Primary
//! Primary    := Identifier | String | "TRUE" | "FALSE"
//!             | ExactNumericLiteral | ApproxNumericLiteral
//! ```
//!
//! All binary operators are left-associative. Nesting through NOT, unary
//! signs and parentheses is depth-limited so hostile input cannot overflow
//! the stack.

use crate::core::Value;

use super::ast::{
    AndExpression, ArithmeticExpression, ArithmeticOperator, BetweenExpression,
    ComparisonExpression, ComparisonOperator, Expression, Identifier, InExpression,
    IsNullExpression, LikeExpression, Literal, NegateExpression, NotExpression, OrExpression,
};
use super::error::{ParseError, Result};
use super::lexer::Tokeniser;
use super::pattern::LikePattern;
use super::token::{Token, TokenType};

/// Default limit on NOT/unary/parenthesis nesting
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Selector parser over a rewindable token cursor
pub struct Parser<'a> {
    tokens: Tokeniser<'a>,
    depth: usize,
    max_depth: usize,
}

/// Token text for error messages; end-of-stream has none of its own
fn describe(token: &Token) -> String {
    if token.is_eos() {
        "<end of input>".to_string()
    } else {
        token.text.clone()
    }
}

impl<'a> Parser<'a> {
    /// Create a parser for the given input
    pub fn new(input: &'a str) -> Self {
        Self::with_max_depth(input, DEFAULT_MAX_DEPTH)
    }

    /// Create a parser with a custom nesting limit
    pub fn with_max_depth(input: &'a str, max_depth: usize) -> Self {
        Self {
            tokens: Tokeniser::new(input),
            depth: 0,
            max_depth,
        }
    }

    /// Parse a complete selector.
    ///
    /// An empty selector compiles to the constant TRUE; anything left over
    /// after a complete expression is an error.
    pub fn parse(&mut self) -> Result<Expression> {
        if self.tokens.next_token()?.is_eos() {
            return Ok(Expression::Literal(Literal {
                value: Value::Boolean(true),
            }));
        }
        self.tokens.rewind(1);

        let expression = self.or_expression()?;

        let trailing = self.tokens.next_token()?;
        if !trailing.is_eos() {
            return Err(ParseError::TrailingInput {
                token: trailing.text,
            });
        }
        Ok(expression)
    }

    fn or_expression(&mut self) -> Result<Expression> {
        let mut expression = self.and_expression()?;
        while self.tokens.next_token()?.token_type == TokenType::Or {
            let right = self.and_expression()?;
            expression = Expression::Or(OrExpression {
                left: Box::new(expression),
                right: Box::new(right),
            });
        }
        self.tokens.rewind(1);
        Ok(expression)
    }

    fn and_expression(&mut self) -> Result<Expression> {
        let mut expression = self.comparison_expression()?;
        while self.tokens.next_token()?.token_type == TokenType::And {
            let right = self.comparison_expression()?;
            expression = Expression::And(AndExpression {
                left: Box::new(expression),
                right: Box::new(right),
            });
        }
        self.tokens.rewind(1);
        Ok(expression)
    }

    fn comparison_expression(&mut self) -> Result<Expression> {
        self.enter()?;
        let result = self.comparison_tail();
        self.leave();
        result
    }

    fn comparison_tail(&mut self) -> Result<Expression> {
        let token = self.tokens.next_token()?;
        if token.token_type == TokenType::Not {
            let child = self.comparison_expression()?;
            return Ok(Expression::Not(NotExpression {
                child: Box::new(child),
            }));
        }
        self.tokens.rewind(1);

        let left = self.add_expression()?;

        let token = self.tokens.next_token()?;
        let op = match token.token_type {
            TokenType::Is => return self.is_null_tail(left),
            TokenType::Not => return self.special_comparison(left, true),
            TokenType::Like | TokenType::Between | TokenType::In => {
                self.tokens.rewind(1);
                return self.special_comparison(left, false);
            }
            TokenType::Equal => ComparisonOperator::Equal,
            TokenType::NotEqual => ComparisonOperator::NotEqual,
            TokenType::Less => ComparisonOperator::LessThan,
            TokenType::Greater => ComparisonOperator::GreaterThan,
            TokenType::LessEqual => ComparisonOperator::LessEqual,
            TokenType::GreaterEqual => ComparisonOperator::GreaterEqual,
            _ => {
                self.tokens.rewind(1);
                return Ok(left);
            }
        };

        let right = self.add_expression()?;
        Ok(Expression::Comparison(ComparisonExpression {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }))
    }

    /// The `IS` keyword has been consumed; the rest must be `NULL` or
    /// `NOT NULL`.
    fn is_null_tail(&mut self, left: Expression) -> Result<Expression> {
        let token = self.tokens.next_token()?;
        let negated = match token.token_type {
            TokenType::Null => false,
            TokenType::Not => {
                let token = self.tokens.next_token()?;
                if token.token_type != TokenType::Null {
                    return Err(ParseError::syntax(
                        describe(&token),
                        "expected NULL or NOT NULL after IS",
                    ));
                }
                true
            }
            _ => {
                return Err(ParseError::syntax(
                    describe(&token),
                    "expected NULL or NOT NULL after IS",
                ));
            }
        };
        Ok(Expression::IsNull(IsNullExpression {
            child: Box::new(left),
            negated,
        }))
    }

    /// LIKE / BETWEEN / IN, optionally negated
    fn special_comparison(&mut self, left: Expression, negated: bool) -> Result<Expression> {
        let token = self.tokens.next_token()?;
        match token.token_type {
            TokenType::Like => {
                let pattern = self.tokens.next_token()?;
                if pattern.token_type != TokenType::String {
                    return Err(ParseError::syntax(
                        describe(&pattern),
                        "expected string after LIKE",
                    ));
                }
                let escape = self.escape_clause()?;
                let matcher = LikePattern::compile(&pattern.text, escape)?;
                Ok(Expression::Like(LikeExpression {
                    child: Box::new(left),
                    pattern: pattern.text,
                    escape,
                    matcher,
                    negated,
                }))
            }
            TokenType::Between => {
                let lower = self.add_expression()?;
                let token = self.tokens.next_token()?;
                if token.token_type != TokenType::And {
                    return Err(ParseError::syntax(
                        describe(&token),
                        "expected AND after BETWEEN",
                    ));
                }
                let upper = self.add_expression()?;
                Ok(Expression::Between(BetweenExpression {
                    child: Box::new(left),
                    lower: Box::new(lower),
                    upper: Box::new(upper),
                    negated,
                }))
            }
            TokenType::In => {
                let token = self.tokens.next_token()?;
                if token.token_type != TokenType::LParen {
                    return Err(ParseError::syntax(describe(&token), "missing '(' after IN"));
                }
                let mut items = vec![self.add_expression()?];
                while self.tokens.next_token()?.token_type == TokenType::Comma {
                    items.push(self.add_expression()?);
                }
                self.tokens.rewind(1);
                let token = self.tokens.next_token()?;
                if token.token_type != TokenType::RParen {
                    return Err(ParseError::syntax(
                        describe(&token),
                        "missing ',' or ')' after IN",
                    ));
                }
                Ok(Expression::In(InExpression {
                    child: Box::new(left),
                    items,
                    negated,
                }))
            }
            _ => Err(ParseError::syntax(
                describe(&token),
                "expected LIKE, IN or BETWEEN",
            )),
        }
    }

    /// Optional `ESCAPE '<c>'` clause after a LIKE pattern
    fn escape_clause(&mut self) -> Result<Option<char>> {
        let token = self.tokens.next_token()?;
        if token.token_type != TokenType::Escape {
            self.tokens.rewind(1);
            return Ok(None);
        }

        let escape = self.tokens.next_token()?;
        if escape.token_type != TokenType::String {
            return Err(ParseError::syntax(
                describe(&escape),
                "expected string after ESCAPE",
            ));
        }
        let mut chars = escape.text.chars();
        let c = match (chars.next(), chars.next()) {
            (Some(c), None) => c,
            _ => {
                return Err(ParseError::BadEscape {
                    token: escape.text,
                    reason: "single character string required after ESCAPE".to_string(),
                });
            }
        };
        if c == '%' || c == '_' {
            return Err(ParseError::BadEscape {
                token: escape.text,
                reason: "'%' and '_' are not allowed as ESCAPE characters".to_string(),
            });
        }
        Ok(Some(c))
    }

    fn add_expression(&mut self) -> Result<Expression> {
        let mut expression = self.multiply_expression()?;
        loop {
            let op = match self.tokens.next_token()?.token_type {
                TokenType::Plus => ArithmeticOperator::Add,
                TokenType::Minus => ArithmeticOperator::Subtract,
                _ => {
                    self.tokens.rewind(1);
                    return Ok(expression);
                }
            };
            let right = self.multiply_expression()?;
            expression = Expression::Arithmetic(ArithmeticExpression {
                op,
                left: Box::new(expression),
                right: Box::new(right),
            });
        }
    }

    fn multiply_expression(&mut self) -> Result<Expression> {
        let mut expression = self.unary_expression()?;
        loop {
            let op = match self.tokens.next_token()?.token_type {
                TokenType::Mult => ArithmeticOperator::Multiply,
                TokenType::Div => ArithmeticOperator::Divide,
                _ => {
                    self.tokens.rewind(1);
                    return Ok(expression);
                }
            };
            let right = self.unary_expression()?;
            expression = Expression::Arithmetic(ArithmeticExpression {
                op,
                left: Box::new(expression),
                right: Box::new(right),
            });
        }
    }

    fn unary_expression(&mut self) -> Result<Expression> {
        self.enter()?;
        let result = self.unary_tail();
        self.leave();
        result
    }

    fn unary_tail(&mut self) -> Result<Expression> {
        let token = self.tokens.next_token()?;
        match token.token_type {
            TokenType::LParen => {
                let expression = self.or_expression()?;
                let token = self.tokens.next_token()?;
                if token.token_type != TokenType::RParen {
                    return Err(ParseError::syntax(
                        describe(&token),
                        "missing ')' after '('",
                    ));
                }
                Ok(expression)
            }
            TokenType::Plus => self.unary_expression(),
            TokenType::Minus => {
                let token = self.tokens.next_token()?;
                // A negated exact literal is folded directly so that
                // -9223372036854775808 can exist at all
                if token.token_type == TokenType::NumericExact {
                    parse_exact_numeric(&token, true)
                } else {
                    self.tokens.rewind(1);
                    let child = self.unary_expression()?;
                    Ok(Expression::Negate(NegateExpression {
                        child: Box::new(child),
                    }))
                }
            }
            _ => {
                self.tokens.rewind(1);
                self.primary_expression()
            }
        }
    }

    fn primary_expression(&mut self) -> Result<Expression> {
        let token = self.tokens.next_token()?;
        match token.token_type {
            TokenType::Identifier => Ok(Expression::Identifier(Identifier { name: token.text })),
            TokenType::String => Ok(Expression::Literal(Literal {
                value: Value::text(token.text),
            })),
            TokenType::True => Ok(Expression::Literal(Literal {
                value: Value::Boolean(true),
            })),
            TokenType::False => Ok(Expression::Literal(Literal {
                value: Value::Boolean(false),
            })),
            TokenType::NumericExact => parse_exact_numeric(&token, false),
            TokenType::NumericApprox => parse_approx_numeric(&token),
            _ => Err(ParseError::syntax(
                describe(&token),
                "expected literal or identifier",
            )),
        }
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(ParseError::TooDeep {
                limit: self.max_depth,
            });
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }
}

/// Convert an exact numeric literal token to an i64 literal node.
///
/// Underscore separators and the `l`/`L` suffix are stripped; the radix
/// comes from the prefix. A hex literal may carry a binary exponent, which
/// the integer path ignores. Negated values accept magnitudes up to 2^63;
/// non-negated decimals stop at 2^63 - 1, while the other radixes cover the
/// full 64-bit pattern and reinterpret it as signed.
fn parse_exact_numeric(token: &Token, negate: bool) -> Result<Expression> {
    let cleaned: String = token.text.chars().filter(|c| *c != '_').collect();
    let mut s = cleaned.as_str();
    if s.ends_with(['l', 'L']) {
        s = &s[..s.len() - 1];
    }

    let (base, body) = if s.starts_with("0x") || s.starts_with("0X") {
        let body = &s[2..];
        let body = match body.find(['p', 'P']) {
            Some(i) => &body[..i],
            None => body,
        };
        (16, body)
    } else if s.starts_with("0b") || s.starts_with("0B") {
        (2, &s[2..])
    } else if s.len() > 1 && s.starts_with('0') {
        (8, &s[1..])
    } else {
        (10, s)
    };

    let too_big = || ParseError::IntegerTooBig {
        token: token.text.clone(),
    };
    let magnitude = u64::from_str_radix(body, base).map_err(|_| too_big())?;

    let value = if negate {
        if magnitude < 1 << 63 {
            -(magnitude as i64)
        } else if magnitude == 1 << 63 {
            i64::MIN
        } else {
            return Err(too_big());
        }
    } else if base == 10 && magnitude > i64::MAX as u64 {
        return Err(too_big());
    } else {
        magnitude as i64
    };

    Ok(Expression::Literal(Literal {
        value: Value::Exact(value),
    }))
}

/// Convert an approximate numeric literal token to an f64 literal node.
///
/// Underscore separators and the `f`/`F`/`d`/`D` suffix are stripped.
/// Magnitudes that overflow to infinity are rejected.
fn parse_approx_numeric(token: &Token) -> Result<Expression> {
    let mut s: String = token.text.chars().filter(|c| *c != '_').collect();
    if s.ends_with(['f', 'F', 'd', 'D']) {
        s.pop();
    }

    let out_of_range = || ParseError::FloatOutOfRange {
        token: token.text.clone(),
    };
    let value: f64 = s.parse().map_err(|_| out_of_range())?;
    if value.is_infinite() {
        return Err(out_of_range());
    }

    Ok(Expression::Literal(Literal {
        value: Value::Inexact(value),
    }))
}
