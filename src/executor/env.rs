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

//! Evaluation environments
//!
//! An [`Environment`] resolves identifier names to values while a selector
//! runs. Brokers typically implement it over message properties or header
//! dictionaries; [`MapEnvironment`] is the plain in-memory implementation.

use std::collections::HashMap;
use std::hash::BuildHasher;

use rustc_hash::FxHashMap;

use crate::core::Value;

/// Name-to-value lookup used during evaluation
///
/// A missing identifier is `Value::Unknown`, never an error. The
/// environment is only read while a selector evaluates; lookups on the hot
/// path should be O(1).
pub trait Environment {
    /// Resolve an identifier to its value
    fn lookup(&self, name: &str) -> Value;
}

/// Any string-keyed value map already is an environment
impl<S: BuildHasher> Environment for HashMap<String, Value, S> {
    fn lookup(&self, name: &str) -> Value {
        self.get(name).cloned().unwrap_or_default()
    }
}

/// In-memory environment backed by a hash map
#[derive(Debug, Clone, Default)]
pub struct MapEnvironment {
    values: FxHashMap<String, Value>,
}

impl MapEnvironment {
    /// Create an empty environment
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a name to a value, replacing any previous binding
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    /// Remove a binding; subsequent lookups return `Unknown`
    pub fn unset(&mut self, name: &str) {
        self.values.remove(name);
    }

    /// Number of bindings
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if no names are bound
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Environment for MapEnvironment {
    fn lookup(&self, name: &str) -> Value {
        self.values.get(name).cloned().unwrap_or_default()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for MapEnvironment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut env = MapEnvironment::new();
        for (k, v) in iter {
            env.set(k, v);
        }
        env
    }
}
