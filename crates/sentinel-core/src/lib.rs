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

//! Shared vocabulary for the Sentinel engine.
//!
//! Every other crate in the workspace speaks in terms of the types defined here:
//! operating modes and their profiles, tasks and the handler capability bound to
//! them, the platform traits that feed hardware and user-activity data in, the
//! knowledge record format, the error taxonomy, and the engine configuration.

#![warn(missing_docs)]

pub mod clock;
pub mod config;
pub mod error;
pub mod knowledge;
pub mod mode;
pub mod platform;
pub mod status;
pub mod task;

pub use config::{ConfigError, EngineConfig};
pub use error::{EngineError, KnowledgeError, ModeError, SubmitError};
pub use knowledge::{KnowledgeCategory, KnowledgePersistence, KnowledgeRecord};
pub use mode::{Mode, ModeProfile, ModeProfiles, ResourceAllocation};
pub use platform::{ContextProvider, HardwareProbe, HardwareSample, HardwareState, ResourceKind};
pub use status::StatusReport;
pub use task::{
    Handler, HandlerEnv, HandlerStatus, Priority, Task, TaskHandler, TaskId, TaskStatus, TaskType,
};
