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

//! Selector evaluation
//!
//! The [`Environment`] lookup interface and the tree-walking evaluator.
//! Evaluation is synchronous, CPU-bound and infallible.

pub mod env;
pub mod evaluator;

pub use env::{Environment, MapEnvironment};
pub use evaluator::{eval, eval_bool, evaluate, evaluate_value};
