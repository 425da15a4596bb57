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

//! The control plane of the Sentinel engine.
//!
//! This crate wires the shared data structures to the policies that act on
//! them: the mode controller and its resource guards, the activity-driven mode
//! predictor, the learning policy, the (task type, mode) dispatch table with
//! its built-in handlers, and the [`Engine`] service that owns the background
//! worker, predictor, learning and monitor loops.

#![warn(missing_docs)]

pub mod analysis;
pub mod context;
pub mod dispatch;
pub mod handlers;
pub mod learning;
pub mod mode;
pub mod service;

mod loops;
mod shared;

pub use analysis::ModePredictor;
pub use context::{SystemState, UserContext};
pub use dispatch::DispatchTable;
pub use learning::{LearningOutcome, LearningPolicy};
pub use mode::ModeTransition;
pub use service::Engine;
