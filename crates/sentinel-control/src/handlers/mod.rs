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

//! Built-in task handlers, one module per mode.

mod development;
mod gaming;
mod research;

pub use development::{CodeGenerationHandler, SyntaxAnalysisHandler, TemplateKind};
pub use gaming::{GameplayAnalysisHandler, GameplayMetrics, PerformanceOptimizationHandler};
pub use research::{
    DatasetAnalysisHandler, DatasetInfo, HyperparameterRange, HyperparameterSearchHandler,
    SearchResult,
};

use sentinel_core::task::{HandlerStatus, Task};
use serde::de::DeserializeOwned;

/// Decodes a JSON payload, or describes why it could not be decoded.
fn decode_json<T: DeserializeOwned>(task: &Task) -> Result<T, HandlerStatus> {
    serde_json::from_slice(task.payload()).map_err(|e| {
        HandlerStatus::Failed(format!("invalid payload for task {}: {}", task.id(), e))
    })
}

/// Reads a UTF-8 text payload.
fn decode_text(task: &Task) -> Result<&str, HandlerStatus> {
    std::str::from_utf8(task.payload()).map_err(|e| {
        HandlerStatus::Failed(format!("payload of task {} is not UTF-8: {}", task.id(), e))
    })
}

/// Wraps findings, reporting plain completion when there are none.
fn findings(list: Vec<String>) -> HandlerStatus {
    if list.is_empty() {
        HandlerStatus::Completed
    } else {
        HandlerStatus::Findings(list)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use sentinel_core::mode::Mode;
    use sentinel_core::task::{Handler, Priority, Task, TaskId, TaskType};

    pub fn task_with(task_type: TaskType, mode: Mode, payload: &[u8]) -> Task {
        Task::new(
            TaskId::new(1).unwrap(),
            task_type,
            Priority::Normal,
            mode,
            payload.to_vec(),
            Handler::Noop,
        )
    }
}
