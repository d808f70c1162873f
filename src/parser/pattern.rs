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

//! LIKE pattern compilation
//!
//! Translates a SQL LIKE pattern into an anchored regex, once, at parse
//! time:
//! - `%` matches any sequence of characters (including empty)
//! - `_` matches any single character
//! - the optional escape character makes the following `%` or `_` literal
//!
//! Every regex metacharacter in the pattern is escaped so nothing but the
//! two wildcards has special meaning.

use std::fmt;

use regex::Regex;

use super::error::{ParseError, Result};

/// A LIKE pattern compiled to an anchored regex
#[derive(Debug, Clone)]
pub struct LikePattern {
    regex: Regex,
}

impl LikePattern {
    /// Compile a LIKE pattern, honouring the optional escape character
    pub fn compile(pattern: &str, escape: Option<char>) -> Result<Self> {
        let mut re = String::with_capacity(pattern.len() * 2 + 2);
        re.push('^');

        let mut escaped = false;
        for c in pattern.chars() {
            if !escaped && Some(c) == escape {
                escaped = true;
                continue;
            }
            match c {
                '%' if !escaped => re.push_str(".*"),
                '_' if !escaped => re.push('.'),
                '.' | '+' | '*' | '?' | '^' | '$' | '(' | ')' | '[' | ']' | '{' | '}' | '|'
                | '-' | '\\' => {
                    re.push('\\');
                    re.push(c);
                }
                _ => re.push(c),
            }
            escaped = false;
        }

        re.push('$');

        let regex = Regex::new(&re).map_err(|_| {
            ParseError::syntax(pattern.to_string(), "unmatchable LIKE pattern")
        })?;
        Ok(Self { regex })
    }

    /// Full-string match against the compiled pattern
    pub fn matches(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

impl PartialEq for LikePattern {
    fn eq(&self, other: &Self) -> bool {
        self.regex.as_str() == other.regex.as_str()
    }
}

impl fmt::Display for LikePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.regex.as_str())
    }
}
