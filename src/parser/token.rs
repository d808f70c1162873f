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

//! Token types for the selector lexer
//!
//! This module defines the token types produced by the lexer and consumed by
//! the parser, plus the reserved-word table.

use std::cmp::Ordering;
use std::fmt;

/// Position represents a position in the input source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    /// Byte offset, starting at 0
    pub offset: usize,
    /// Line number, starting at 1
    pub line: usize,
    /// Column number, starting at 1
    pub column: usize,
}

impl Position {
    /// Create a new position
    pub fn new(offset: usize, line: usize, column: usize) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// TokenType represents the type of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    /// End of stream
    Eos,
    /// NULL keyword
    Null,
    /// TRUE keyword
    True,
    /// FALSE keyword
    False,
    /// NOT keyword
    Not,
    /// AND keyword
    And,
    /// OR keyword
    Or,
    /// IN keyword
    In,
    /// IS keyword
    Is,
    /// BETWEEN keyword
    Between,
    /// LIKE keyword
    Like,
    /// ESCAPE keyword
    Escape,
    /// Identifier (property name)
    Identifier,
    /// String literal ('hello')
    String,
    /// Exact numeric literal (integer, any radix)
    NumericExact,
    /// Approximate numeric literal (floating point)
    NumericApprox,
    /// (
    LParen,
    /// )
    RParen,
    /// ,
    Comma,
    /// +
    Plus,
    /// -
    Minus,
    /// *
    Mult,
    /// /
    Div,
    /// =
    Equal,
    /// <>
    NotEqual,
    /// <
    Less,
    /// >
    Greater,
    /// <=
    LessEqual,
    /// >=
    GreaterEqual,
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenType::Eos => "EOS",
            TokenType::Null => "NULL",
            TokenType::True => "TRUE",
            TokenType::False => "FALSE",
            TokenType::Not => "NOT",
            TokenType::And => "AND",
            TokenType::Or => "OR",
            TokenType::In => "IN",
            TokenType::Is => "IS",
            TokenType::Between => "BETWEEN",
            TokenType::Like => "LIKE",
            TokenType::Escape => "ESCAPE",
            TokenType::Identifier => "IDENTIFIER",
            TokenType::String => "STRING",
            TokenType::NumericExact => "NUMERIC_EXACT",
            TokenType::NumericApprox => "NUMERIC_APPROX",
            TokenType::LParen => "(",
            TokenType::RParen => ")",
            TokenType::Comma => ",",
            TokenType::Plus => "+",
            TokenType::Minus => "-",
            TokenType::Mult => "*",
            TokenType::Div => "/",
            TokenType::Equal => "=",
            TokenType::NotEqual => "<>",
            TokenType::Less => "<",
            TokenType::Greater => ">",
            TokenType::LessEqual => "<=",
            TokenType::GreaterEqual => ">=",
        };
        write!(f, "{}", name)
    }
}

/// Token represents a lexical token
///
/// Tokens own their text so error messages can quote the offending input
/// after the lexer has moved on. For string literals and quoted identifiers
/// the text is the unescaped content.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The type of the token
    pub token_type: TokenType,
    /// The literal text
    pub text: String,
    /// The position in the source
    pub position: Position,
}

impl Token {
    /// Create a new token
    pub fn new(token_type: TokenType, text: impl Into<String>, position: Position) -> Self {
        Self {
            token_type,
            text: text.into(),
            position,
        }
    }

    /// Create an end-of-stream token
    pub fn eos(position: Position) -> Self {
        Self {
            token_type: TokenType::Eos,
            text: String::new(),
            position,
        }
    }

    /// Check if this is the end-of-stream token
    pub fn is_eos(&self) -> bool {
        self.token_type == TokenType::Eos
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_eos() {
            write!(f, "{} at {}", self.token_type, self.position)
        } else {
            write!(f, "{}: '{}' at {}", self.token_type, self.text, self.position)
        }
    }
}

/// Reserved words, sorted for binary search. Lexically reserved words are a
/// subset of identifiers, so the lexer produces an identifier first and then
/// reclassifies it here.
static RESERVED_WORDS: &[(&str, TokenType)] = &[
    ("and", TokenType::And),
    ("between", TokenType::Between),
    ("escape", TokenType::Escape),
    ("false", TokenType::False),
    ("in", TokenType::In),
    ("is", TokenType::Is),
    ("like", TokenType::Like),
    ("not", TokenType::Not),
    ("null", TokenType::Null),
    ("or", TokenType::Or),
    ("true", TokenType::True),
];

/// ASCII-caseless string ordering, used to probe the reserved-word table
/// without allocating a lowercased copy.
fn caseless_cmp(a: &str, b: &str) -> Ordering {
    let mut ai = a.bytes().map(|b| b.to_ascii_lowercase());
    let mut bi = b.bytes().map(|b| b.to_ascii_lowercase());
    loop {
        match (ai.next(), bi.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => match x.cmp(&y) {
                Ordering::Equal => continue,
                other => return other,
            },
        }
    }
}

/// Look up a reserved word, case-insensitively. Returns the keyword token
/// type, or `None` if the text is an ordinary identifier.
pub fn reserved_word(text: &str) -> Option<TokenType> {
    RESERVED_WORDS
        .binary_search_by(|entry| caseless_cmp(entry.0, text))
        .ok()
        .map(|i| RESERVED_WORDS[i].1)
}
