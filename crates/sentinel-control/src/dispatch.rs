// Copyright 2025 eraflo
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

//! Handler lookup by task type and mode.

use crate::handlers::{
    CodeGenerationHandler, DatasetAnalysisHandler, GameplayAnalysisHandler,
    HyperparameterSearchHandler, PerformanceOptimizationHandler, SyntaxAnalysisHandler,
};
use sentinel_core::mode::Mode;
use sentinel_core::task::{Handler, TaskHandler, TaskType};
use std::collections::HashMap;
use std::sync::Arc;

/// Maps `(task type, mode)` to the handler bound at submission.
///
/// Pairs without an entry resolve to [`Handler::Noop`].
pub struct DispatchTable {
    entries: HashMap<(TaskType, Mode), Arc<dyn TaskHandler>>,
}

impl DispatchTable {
    /// Creates a table with no entries.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Creates the table with the built-in handlers.
    ///
    /// | Type | Gaming | Development | Research |
    /// |---|---|---|---|
    /// | Analysis | gameplay | syntax | dataset |
    /// | Optimization | performance | | hyperparameter |
    /// | Generation | | code generation | |
    pub fn with_defaults() -> Self {
        let mut table = Self::empty();
        table.register(TaskType::Analysis, Mode::Gaming, Arc::new(GameplayAnalysisHandler));
        table.register(TaskType::Analysis, Mode::Development, Arc::new(SyntaxAnalysisHandler));
        table.register(TaskType::Analysis, Mode::Research, Arc::new(DatasetAnalysisHandler));
        table.register(
            TaskType::Optimization,
            Mode::Gaming,
            Arc::new(PerformanceOptimizationHandler),
        );
        table.register(
            TaskType::Optimization,
            Mode::Research,
            Arc::new(HyperparameterSearchHandler),
        );
        table.register(
            TaskType::Generation,
            Mode::Development,
            Arc::new(CodeGenerationHandler),
        );
        table
    }

    /// Binds `handler` to `(task_type, mode)`, replacing any previous entry.
    pub fn register(&mut self, task_type: TaskType, mode: Mode, handler: Arc<dyn TaskHandler>) {
        log::debug!(
            "DispatchTable: {:?} in {} -> {}",
            task_type,
            mode,
            handler.name()
        );
        self.entries.insert((task_type, mode), handler);
    }

    /// Returns the handler for `(task_type, mode)`.
    pub fn resolve(&self, task_type: TaskType, mode: Mode) -> Handler {
        self.entries
            .get(&(task_type, mode))
            .map(|h| Handler::Bound(Arc::clone(h)))
            .unwrap_or(Handler::Noop)
    }

    /// Number of bound pairs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for DispatchTable {
    fn default() -> Self {
        Self::with_defaults()
    }
}
