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

//! # Msgsieve - JMS-style message selectors
//!
//! Msgsieve compiles JMS selector expressions (`A > 10 AND B LIKE 'hel%'`)
//! into reusable predicates and evaluates them against per-message property
//! environments. It is built to sit in a broker's routing path: compile a
//! selector once per subscription, match it once per candidate message.
//!
//! ## Key Features
//!
//! - **Full JMS selector surface** - comparisons, arithmetic, `LIKE` with
//!   `ESCAPE`, `BETWEEN`, `IN`, `IS [NOT] NULL`, three-valued `AND`/`OR`/`NOT`
//! - **SQL NULL semantics** - missing properties and type mismatches become
//!   `Unknown` and silently fail to match; evaluation never errors
//! - **Compile-time diagnostics** - every malformed selector is rejected at
//!   compile time with the offending token quoted
//! - **Precompiled patterns** - `LIKE` patterns translate to anchored
//!   regexes once, at compile time
//! - **Share freely** - a compiled [`Selector`] is immutable and can be
//!   evaluated concurrently against independent environments
//!
//! ## Quick Start
//!
//! ```rust
//! use msgsieve::{compile, MapEnvironment};
//!
//! let selector = compile("colour = 'red' AND weight BETWEEN 10 AND 20").unwrap();
//!
//! let mut message = MapEnvironment::new();
//! message.set("colour", "red");
//! message.set("weight", 15i64);
//! assert!(selector.matches(&message));
//!
//! message.set("weight", 27i64);
//! assert!(!selector.matches(&message));
//! ```
//!
//! ## Modules
//!
//! - [`core`] - [`Value`] union and [`BoolOrNone`] three-valued boolean
//! - [`parser`] - lexer, rewindable token cursor, parser, AST
//! - [`executor`] - [`Environment`] interface and the evaluator

use std::fmt;
use std::str::FromStr;

pub mod core;
pub mod executor;
pub mod parser;

// Re-export main types for convenience
pub use crate::core::{BoolOrNone, Value, ValueType};
pub use executor::{evaluate, evaluate_value, Environment, MapEnvironment};
pub use parser::{Expression, ParseError, Result};

/// A compiled selector expression
///
/// Immutable after compilation; share it across threads and evaluate it
/// against one environment per message.
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    root: Expression,
}

impl Selector {
    /// Compile a selector string
    pub fn compile(selector: &str) -> Result<Self> {
        Ok(Self {
            root: parser::parse_selector(selector)?,
        })
    }

    /// Does a message with these properties match?
    ///
    /// `Unknown` counts as a non-match, per SQL NULL semantics.
    pub fn matches(&self, env: &dyn Environment) -> bool {
        executor::evaluate(&self.root, env)
    }

    /// Evaluate to a [`Value`] for inspection or debugging
    pub fn value(&self, env: &dyn Environment) -> Value {
        executor::evaluate_value(&self.root, env)
    }

    /// The underlying expression tree
    pub fn expression(&self) -> &Expression {
        &self.root
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)
    }
}

impl FromStr for Selector {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self> {
        Selector::compile(s)
    }
}

/// Compile a selector string
///
/// The main entry point of the crate.
///
/// # Example
///
/// ```
/// use msgsieve::{compile, MapEnvironment};
///
/// let selector = compile("priority >= 7").unwrap();
/// let mut env = MapEnvironment::new();
/// env.set("priority", 9i64);
/// assert!(selector.matches(&env));
/// ```
pub fn compile(selector: &str) -> Result<Selector> {
    Selector::compile(selector)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_and_match() {
        let selector = compile("A='foo'").unwrap();
        let mut env = MapEnvironment::new();
        env.set("A", "foo");
        assert!(selector.matches(&env));
        env.set("A", "bar");
        assert!(!selector.matches(&env));
    }

    #[test]
    fn test_from_str() {
        let selector: Selector = "A IS NULL".parse().unwrap();
        assert!(selector.matches(&MapEnvironment::new()));
        assert!("A like 234".parse::<Selector>().is_err());
    }

    #[test]
    fn test_render() {
        let selector = compile("A > 10 AND B LIKE 'hel%'").unwrap();
        assert_eq!(
            selector.to_string(),
            "((A > EXACT:10) AND (B LIKE 'hel%'))"
        );
    }

    #[test]
    fn test_value_inspection() {
        let selector = compile("17/4").unwrap();
        assert_eq!(selector.value(&MapEnvironment::new()), Value::Exact(4));
    }

    #[test]
    fn test_shared_across_threads() {
        let selector = std::sync::Arc::new(compile("n > 5").unwrap());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let selector = std::sync::Arc::clone(&selector);
                std::thread::spawn(move || {
                    let mut env = MapEnvironment::new();
                    env.set("n", i as i64 * 3);
                    selector.matches(&env)
                })
            })
            .collect();
        let results: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(results, vec![false, false, true, true]);
    }
}
