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

//! Selector lexer
//!
//! A hand-written state machine over a byte-offset cursor. Each call to
//! [`Lexer::next_token`] skips whitespace, recognises one token and leaves
//! the cursor on the following character, so the consumed prefix plus
//! [`Lexer::remaining`] always reassembles the original input.
//!
//! [`Tokeniser`] wraps the lexer in a rewindable cursor for the parser.

use super::error::{ParseError, Result};
use super::token::{reserved_word, Position, Token, TokenType};

/// States of the numeric-literal recogniser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumState {
    /// Seen a leading `0`: may become octal, hex, binary or a decimal point
    Zero,
    /// Decimal digits
    Digit,
    /// Seen `0x`, need at least one hex digit
    HexStart,
    /// Hex digits
    Hex,
    /// Octal digits
    Oct,
    /// Seen `0b`, need at least one binary digit
    BinStart,
    /// Binary digits
    Bin,
    /// Seen a leading `.`, need at least one digit
    DecimalStart,
    /// Fractional digits
    Decimal,
    /// Seen `e`/`E` (or `p`/`P` after hex), sign or digit must follow
    ExponentSign,
    /// Seen an exponent sign, digit must follow
    ExponentStart,
    /// Exponent digits
    Exponent,
}

/// Selector lexer producing one token per step
pub struct Lexer<'a> {
    /// Input string
    input: &'a str,
    /// Byte offset of the cursor
    pos: usize,
    /// Current line, starting at 1
    line: usize,
    /// Current column, starting at 1
    column: usize,
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_identifier_part(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$' || c == '.'
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    /// The character under the cursor, if any
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Advance the cursor past the current character
    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    /// Current cursor position
    fn position(&self) -> Position {
        Position::new(self.pos, self.line, self.column)
    }

    /// Unconsumed input
    pub fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    /// Skip whitespace characters
    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    /// Get the next token
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace();

        let position = self.position();
        let start = self.pos;

        let c = match self.peek() {
            None => return Ok(Token::eos(position)),
            Some(c) => c,
        };

        match c {
            '(' => Ok(self.single(TokenType::LParen, position)),
            ')' => Ok(self.single(TokenType::RParen, position)),
            ',' => Ok(self.single(TokenType::Comma, position)),
            '+' => Ok(self.single(TokenType::Plus, position)),
            '-' => Ok(self.single(TokenType::Minus, position)),
            '*' => Ok(self.single(TokenType::Mult, position)),
            '/' => Ok(self.single(TokenType::Div, position)),
            '=' => Ok(self.single(TokenType::Equal, position)),
            '<' => {
                self.bump();
                let token_type = match self.peek() {
                    Some('>') => {
                        self.bump();
                        TokenType::NotEqual
                    }
                    Some('=') => {
                        self.bump();
                        TokenType::LessEqual
                    }
                    _ => TokenType::Less,
                };
                Ok(Token::new(token_type, &self.input[start..self.pos], position))
            }
            '>' => {
                self.bump();
                let token_type = match self.peek() {
                    Some('=') => {
                        self.bump();
                        TokenType::GreaterEqual
                    }
                    _ => TokenType::Greater,
                };
                Ok(Token::new(token_type, &self.input[start..self.pos], position))
            }
            '\'' => self.quoted('\'', TokenType::String, position),
            '"' => self.quoted('"', TokenType::Identifier, position),
            c if is_identifier_start(c) => Ok(self.identifier(start, position)),
            '0' => {
                self.bump();
                self.number(NumState::Zero, start, position)
            }
            c if c.is_ascii_digit() => {
                self.bump();
                self.number(NumState::Digit, start, position)
            }
            '.' => {
                self.bump();
                self.number(NumState::DecimalStart, start, position)
            }
            c => Err(ParseError::UnrecognizedCharacter { found: c, position }),
        }
    }

    /// Emit a single-character token
    fn single(&mut self, token_type: TokenType, position: Position) -> Token {
        let start = self.pos;
        self.bump();
        Token::new(token_type, &self.input[start..self.pos], position)
    }

    /// Read an identifier and reclassify reserved words
    fn identifier(&mut self, start: usize, position: Position) -> Token {
        self.bump();
        while matches!(self.peek(), Some(c) if is_identifier_part(c)) {
            self.bump();
        }
        let text = &self.input[start..self.pos];
        let token_type = reserved_word(text).unwrap_or(TokenType::Identifier);
        Token::new(token_type, text, position)
    }

    /// Read a quoted string or quoted identifier.
    ///
    /// A doubled quote character stands for one literal quote, which also
    /// makes immediately-adjacent quoted segments concatenate.
    fn quoted(&mut self, quote: char, token_type: TokenType, position: Position) -> Result<Token> {
        self.bump();

        let mut content = String::new();
        loop {
            match self.peek() {
                None => return Err(ParseError::UnterminatedString { position }),
                Some(c) if c == quote => {
                    self.bump();
                    if self.peek() == Some(quote) {
                        content.push(quote);
                        self.bump();
                    } else {
                        break;
                    }
                }
                Some(c) => {
                    content.push(c);
                    self.bump();
                }
            }
        }

        Ok(Token::new(token_type, content, position))
    }

    /// Numeric-literal state machine.
    ///
    /// The caller has consumed the first character and picked the entry
    /// state. Hex literals may carry a binary exponent (`0x800p-3`) and stay
    /// exact; the parser ignores the exponent suffix when converting.
    fn number(&mut self, entry: NumState, start: usize, position: Position) -> Result<Token> {
        let mut state = entry;
        let mut hex = false;

        let reject = |lexer: &Self| -> Result<Token> {
            Err(ParseError::MalformedNumber {
                fragment: lexer.input[start..lexer.pos].to_string(),
                position,
            })
        };

        loop {
            match state {
                NumState::Zero => match self.peek() {
                    Some('.') => {
                        self.bump();
                        state = NumState::Decimal;
                    }
                    Some('x') | Some('X') => {
                        self.bump();
                        hex = true;
                        state = NumState::HexStart;
                    }
                    Some('b') | Some('B') => {
                        self.bump();
                        state = NumState::BinStart;
                    }
                    None => return Ok(self.accept(TokenType::NumericExact, start, position)),
                    _ => state = NumState::Oct,
                },
                NumState::Digit => match self.peek() {
                    Some('l') | Some('L') => {
                        self.bump();
                        return Ok(self.accept(TokenType::NumericExact, start, position));
                    }
                    Some('f') | Some('F') | Some('d') | Some('D') => {
                        self.bump();
                        return Ok(self.accept(TokenType::NumericApprox, start, position));
                    }
                    Some(c) if c.is_ascii_digit() || c == '_' => self.bump(),
                    Some('.') => {
                        self.bump();
                        state = NumState::Decimal;
                    }
                    Some('e') | Some('E') => {
                        self.bump();
                        state = NumState::ExponentSign;
                    }
                    _ => return Ok(self.accept(TokenType::NumericExact, start, position)),
                },
                NumState::HexStart => match self.peek() {
                    Some(c) if c.is_ascii_hexdigit() => {
                        self.bump();
                        state = NumState::Hex;
                    }
                    _ => return reject(self),
                },
                NumState::Hex => match self.peek() {
                    Some('l') | Some('L') => {
                        self.bump();
                        return Ok(self.accept(TokenType::NumericExact, start, position));
                    }
                    Some(c) if c.is_ascii_hexdigit() || c == '_' => self.bump(),
                    Some('p') | Some('P') => {
                        self.bump();
                        state = NumState::ExponentSign;
                    }
                    _ => return Ok(self.accept(TokenType::NumericExact, start, position)),
                },
                NumState::BinStart => match self.peek() {
                    Some('0') | Some('1') => {
                        self.bump();
                        state = NumState::Bin;
                    }
                    _ => return reject(self),
                },
                NumState::Bin => match self.peek() {
                    Some('l') | Some('L') => {
                        self.bump();
                        return Ok(self.accept(TokenType::NumericExact, start, position));
                    }
                    Some('0') | Some('1') | Some('_') => self.bump(),
                    _ => return Ok(self.accept(TokenType::NumericExact, start, position)),
                },
                NumState::Oct => match self.peek() {
                    Some('l') | Some('L') => {
                        self.bump();
                        return Ok(self.accept(TokenType::NumericExact, start, position));
                    }
                    Some(c) if ('0'..='7').contains(&c) || c == '_' => self.bump(),
                    _ => return Ok(self.accept(TokenType::NumericExact, start, position)),
                },
                NumState::DecimalStart => match self.peek() {
                    Some(c) if c.is_ascii_digit() => {
                        self.bump();
                        state = NumState::Decimal;
                    }
                    _ => return reject(self),
                },
                NumState::Decimal => match self.peek() {
                    Some(c) if c.is_ascii_digit() || c == '_' => self.bump(),
                    Some('e') | Some('E') => {
                        self.bump();
                        state = NumState::ExponentSign;
                    }
                    Some('f') | Some('F') | Some('d') | Some('D') => {
                        self.bump();
                        return Ok(self.accept(TokenType::NumericApprox, start, position));
                    }
                    _ => return Ok(self.accept(TokenType::NumericApprox, start, position)),
                },
                NumState::ExponentSign => match self.peek() {
                    Some('+') | Some('-') => {
                        self.bump();
                        state = NumState::ExponentStart;
                    }
                    Some(c) if c.is_ascii_digit() => {
                        self.bump();
                        state = NumState::Exponent;
                    }
                    _ => return reject(self),
                },
                NumState::ExponentStart => match self.peek() {
                    Some(c) if c.is_ascii_digit() => {
                        self.bump();
                        state = NumState::Exponent;
                    }
                    _ => return reject(self),
                },
                NumState::Exponent => {
                    let token_type = if hex {
                        TokenType::NumericExact
                    } else {
                        TokenType::NumericApprox
                    };
                    match self.peek() {
                        Some(c) if c.is_ascii_digit() => self.bump(),
                        Some('f') | Some('F') | Some('d') | Some('D') if !hex => {
                            self.bump();
                            return Ok(self.accept(token_type, start, position));
                        }
                        _ => return Ok(self.accept(token_type, start, position)),
                    }
                }
            }
        }
    }

    fn accept(&self, token_type: TokenType, start: usize, position: Position) -> Token {
        Token::new(token_type, &self.input[start..self.pos], position)
    }
}

/// Rewindable token cursor
///
/// Buffers every token the lexer produces so the parser can hand tokens back
/// with [`Tokeniser::rewind`] and read them again. Once the end-of-stream
/// token has been produced, further calls keep returning it.
pub struct Tokeniser<'a> {
    lexer: Lexer<'a>,
    tokens: Vec<Token>,
    next_index: usize,
}

impl<'a> Tokeniser<'a> {
    /// Create a cursor over the given input
    pub fn new(input: &'a str) -> Self {
        Self {
            lexer: Lexer::new(input),
            tokens: Vec::new(),
            next_index: 0,
        }
    }

    /// Produce the next token, replaying rewound tokens first
    pub fn next_token(&mut self) -> Result<Token> {
        if self.next_index < self.tokens.len() {
            let token = self.tokens[self.next_index].clone();
            self.next_index += 1;
            return Ok(token);
        }

        // Don't extend the stream past end-of-stream
        if self.next_index > 0 && self.tokens[self.next_index - 1].is_eos() {
            return Ok(self.tokens[self.next_index - 1].clone());
        }

        let token = self.lexer.next_token()?;
        self.tokens.push(token.clone());
        self.next_index += 1;
        Ok(token)
    }

    /// Return the last `n` consumed tokens to the stream.
    ///
    /// `n` must not exceed the number of tokens consumed so far; exceeding
    /// it is a bug in the caller.
    pub fn rewind(&mut self, n: usize) {
        assert!(
            n <= self.next_index,
            "cannot rewind {} tokens, only {} consumed",
            n,
            self.next_index
        );
        self.next_index -= n;
    }

    /// Unconsumed input past the last token the lexer has produced
    pub fn remaining(&self) -> &'a str {
        self.lexer.remaining()
    }
}
