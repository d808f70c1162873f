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

//! Selector parser
//!
//! This module provides the complete compilation pipeline:
//!
//! - [`lexer::Lexer`] - state-machine tokenizer
//! - [`lexer::Tokeniser`] - rewindable token cursor
//! - [`Parser`] - recursive-descent parser producing the AST
//! - [`ast`] - expression tree types
//! - [`token`] - token types and the reserved-word table
//! - [`pattern`] - LIKE pattern compilation
//! - [`error`] - compile error types
//!
//! # Example
//!
//! ```
//! use msgsieve::parser::parse_selector;
//!
//! let expression = parse_selector("A > 10 AND B LIKE 'hel%'").unwrap();
//! assert_eq!(
//!     expression.to_string(),
//!     "((A > EXACT:10) AND (B LIKE 'hel%'))"
//! );
//! ```

pub mod ast;
pub mod error;
pub mod lexer;
#[allow(clippy::module_inception)]
pub mod parser;
pub mod pattern;
pub mod token;

pub use ast::{ArithmeticOperator, ComparisonOperator, Expression};
pub use error::{ParseError, Result};
pub use lexer::{Lexer, Tokeniser};
pub use parser::{Parser, DEFAULT_MAX_DEPTH};
pub use pattern::LikePattern;
pub use token::{Position, Token, TokenType};

/// Parse a selector string into an expression tree
///
/// This is the low-level entry point; most callers want
/// [`compile`](crate::compile), which wraps the tree in a
/// [`Selector`](crate::Selector).
///
/// An empty (or all-whitespace) selector is valid and always matches.
pub fn parse_selector(selector: &str) -> Result<Expression> {
    Parser::new(selector).parse()
}
