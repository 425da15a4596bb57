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

//! Units of work and the handler capability that executes them.

use crate::clock::unix_micros;
use crate::mode::{Mode, ModeProfiles};
use crate::platform::HardwareState;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Identifier of a submitted task.
///
/// Ids are handed out in increasing order starting at 1 and are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId(u64);

impl TaskId {
    /// Wraps a raw id. `0` is reserved for "no task".
    pub fn new(raw: u64) -> Option<Self> {
        (raw != 0).then_some(Self(raw))
    }

    /// Returns the id handed out after `issued` ids. Never `0`.
    pub fn after(issued: u64) -> Self {
        Self(issued.saturating_add(1))
    }

    /// Returns the raw numeric id.
    pub fn as_raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What kind of work a task represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskType {
    /// Inspect some input and report findings.
    Analysis,
    /// Tune resources or parameters.
    Optimization,
    /// Produce an artifact.
    Generation,
    /// Observe the system.
    Monitoring,
    /// Update learned state.
    Learning,
    /// Forecast an outcome.
    Prediction,
}

/// Task priority. Variants are ordered from lowest to highest.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum Priority {
    /// Background work.
    Low,
    /// Default priority.
    #[default]
    Normal,
    /// Ahead of normal work.
    High,
    /// Ahead of everything but real-time work.
    Critical,
    /// Always served first.
    Realtime,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Read-only view of the engine handed to a handler while it runs.
///
/// It is a snapshot: the handler holds no lock and later state changes are not
/// visible to it.
#[derive(Debug, Clone, Default)]
pub struct HandlerEnv {
    /// Hardware state at the moment execution started.
    pub hardware: HardwareState,
    /// Mode profiles at the moment execution started.
    pub profiles: ModeProfiles,
}

/// Outcome reported by a handler.
#[derive(Debug, Clone, PartialEq)]
pub enum HandlerStatus {
    /// The task ran and produced nothing worth reporting.
    Completed,
    /// The task ran and produced findings.
    Findings(Vec<String>),
    /// The task could not be carried out (bad payload, invalid parameters).
    Failed(String),
}

/// A capability that executes tasks of one (type, mode) combination.
pub trait TaskHandler: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Executes the task.
    fn execute(&self, task: &Task, env: &HandlerEnv) -> HandlerStatus;
}

/// The handler bound to a task at submission time.
#[derive(Clone, Default)]
pub enum Handler {
    /// No handler is mapped for the task's (type, mode); execution completes
    /// without doing anything.
    #[default]
    Noop,
    /// A concrete handler.
    Bound(Arc<dyn TaskHandler>),
}

impl Handler {
    /// Returns the handler's name, `"noop"` for [`Handler::Noop`].
    pub fn name(&self) -> &'static str {
        match self {
            Handler::Noop => "noop",
            Handler::Bound(handler) => handler.name(),
        }
    }

    /// Returns `true` if this is [`Handler::Noop`].
    pub fn is_noop(&self) -> bool {
        matches!(self, Handler::Noop)
    }

    /// Runs the handler against `task`.
    pub fn invoke(&self, task: &Task, env: &HandlerEnv) -> HandlerStatus {
        match self {
            Handler::Noop => HandlerStatus::Completed,
            Handler::Bound(handler) => handler.execute(task, env),
        }
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handler::Noop => f.write_str("Noop"),
            Handler::Bound(handler) => f.debug_tuple("Bound").field(&handler.name()).finish(),
        }
    }
}

/// A unit of work.
#[derive(Debug)]
pub struct Task {
    id: TaskId,
    task_type: TaskType,
    priority: Priority,
    mode: Mode,
    payload: Vec<u8>,
    created_at_us: u64,
    execution_time: Option<Duration>,
    handler: Handler,
}

impl Task {
    /// Creates a pending task. The handler is fixed for the task's lifetime.
    pub fn new(
        id: TaskId,
        task_type: TaskType,
        priority: Priority,
        mode: Mode,
        payload: Vec<u8>,
        handler: Handler,
    ) -> Self {
        Self {
            id,
            task_type,
            priority,
            mode,
            payload,
            created_at_us: unix_micros(),
            execution_time: None,
            handler,
        }
    }

    /// The task's id.
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// The task's type.
    pub fn task_type(&self) -> TaskType {
        self.task_type
    }

    /// The task's priority.
    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// The mode that was current when the task was submitted.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The opaque payload bytes.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Creation time, in microseconds since the UNIX epoch.
    pub fn created_at_us(&self) -> u64 {
        self.created_at_us
    }

    /// The handler bound at submission.
    pub fn handler(&self) -> &Handler {
        &self.handler
    }

    /// How long execution took, once completed.
    pub fn execution_time(&self) -> Option<Duration> {
        self.execution_time
    }

    /// Returns `true` once the task has been executed.
    pub fn is_completed(&self) -> bool {
        self.execution_time.is_some()
    }

    /// Records completion.
    pub fn mark_completed(&mut self, elapsed: Duration) {
        self.execution_time = Some(elapsed);
    }
}

/// Where a task stands, as seen from outside the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Waiting in the queue; `position` 0 is the next task to run.
    Pending {
        /// Zero-based place in the queue.
        position: usize,
    },
    /// Not in the queue: already taken by the worker, cancelled, or never submitted.
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoHandler;

    impl TaskHandler for EchoHandler {
        fn name(&self) -> &'static str {
            "echo"
        }

        fn execute(&self, task: &Task, _env: &HandlerEnv) -> HandlerStatus {
            HandlerStatus::Findings(vec![String::from_utf8_lossy(task.payload()).into_owned()])
        }
    }

    fn task_with(handler: Handler) -> Task {
        Task::new(
            TaskId::new(1).unwrap(),
            TaskType::Analysis,
            Priority::High,
            Mode::Development,
            b"hello".to_vec(),
            handler,
        )
    }

    #[test]
    fn test_task_id_zero_is_reserved() {
        assert!(TaskId::new(0).is_none());
        assert_eq!(TaskId::new(7).unwrap().as_raw(), 7);
    }

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::Low < Priority::Normal);
        assert!(Priority::Normal < Priority::High);
        assert!(Priority::High < Priority::Critical);
        assert!(Priority::Critical < Priority::Realtime);
    }

    #[test]
    fn test_noop_handler_completes() {
        let task = task_with(Handler::Noop);
        assert!(task.handler().is_noop());
        assert_eq!(
            task.handler().invoke(&task, &HandlerEnv::default()),
            HandlerStatus::Completed
        );
    }

    #[test]
    fn test_bound_handler_sees_payload() {
        let task = task_with(Handler::Bound(Arc::new(EchoHandler)));
        assert_eq!(task.handler().name(), "echo");
        assert_eq!(
            task.handler().invoke(&task, &HandlerEnv::default()),
            HandlerStatus::Findings(vec!["hello".to_string()])
        );
    }

    #[test]
    fn test_mark_completed() {
        let mut task = task_with(Handler::Noop);
        assert!(!task.is_completed());
        task.mark_completed(Duration::from_millis(3));
        assert!(task.is_completed());
        assert_eq!(task.execution_time(), Some(Duration::from_millis(3)));
    }
}
