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

//! Compile error types
//!
//! Every way a selector can be rejected at compile time. Evaluation itself
//! never fails; runtime anomalies collapse to `Unknown`.

use thiserror::Error;

use super::token::Position;

/// Result type alias for selector compilation
pub type Result<T> = std::result::Result<T, ParseError>;

/// Error compiling a selector expression
///
/// Variants carry the offending token text (or the source position for
/// lexical errors) so the message can be shown to whoever wrote the
/// selector.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// A character that cannot start any token
    #[error("unrecognized character {found:?} at {position}")]
    UnrecognizedCharacter { found: char, position: Position },

    /// A numeric literal the lexer could not complete (e.g. `34e`, `.e5`)
    #[error("malformed numeric literal '{fragment}' at {position}")]
    MalformedNumber { fragment: String, position: Position },

    /// A string literal or quoted identifier with no closing quote
    #[error("unterminated string starting at {position}")]
    UnterminatedString { position: Position },

    /// Any other syntax error, quoting the token where parsing stopped
    #[error("illegal selector near '{token}': {reason}")]
    Syntax { token: String, reason: String },

    /// Exact numeric literal outside the 64-bit range
    #[error("integer literal too big: '{token}'")]
    IntegerTooBig { token: String },

    /// Approximate numeric literal that overflows an f64
    #[error("floating literal overflow/underflow: '{token}'")]
    FloatOutOfRange { token: String },

    /// ESCAPE string that is not a single non-wildcard character
    #[error("invalid ESCAPE string '{token}': {reason}")]
    BadEscape { token: String, reason: String },

    /// Expression nested deeper than the parser allows
    #[error("expression nesting deeper than {limit} levels")]
    TooDeep { limit: usize },

    /// Input left over after a complete expression
    #[error("extra input after selector: '{token}'")]
    TrailingInput { token: String },
}

impl ParseError {
    /// Convenience constructor for the common syntax-error case
    pub(crate) fn syntax(token: impl Into<String>, reason: impl Into<String>) -> Self {
        ParseError::Syntax {
            token: token.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ParseError::syntax("world", "expected literal or identifier");
        assert_eq!(
            err.to_string(),
            "illegal selector near 'world': expected literal or identifier"
        );

        let err = ParseError::UnrecognizedCharacter {
            found: '^',
            position: Position::new(6, 1, 7),
        };
        assert!(err.to_string().contains("'^'"));
        assert!(err.to_string().contains("line 1, column 7"));

        let err = ParseError::IntegerTooBig {
            token: "9223372036854775808".into(),
        };
        assert!(err.to_string().contains("integer literal too big"));
    }
}
