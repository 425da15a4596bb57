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

//! Defines the hierarchy of error types for the engine.
//!
//! None of these errors is fatal to the engine: each one is reported to the
//! caller of a single operation, and the background loops keep running.

use crate::mode::Mode;
use crate::platform::ResourceKind;
use thiserror::Error;

/// A mode transition was refused.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModeError {
    /// The resource guard for the target mode did not pass.
    #[error("insufficient resources to enter {target} mode")]
    InsufficientResources {
        /// The mode that was requested.
        target: Mode,
    },
}

/// An error from the knowledge store or its persistence service.
#[derive(Debug, Error)]
pub enum KnowledgeError {
    /// The store reached its fixed capacity.
    #[error("knowledge store is full (capacity {capacity})")]
    Full {
        /// The configured capacity.
        capacity: usize,
    },
    /// No entry matches the key. A normal outcome, not a fault.
    #[error("no knowledge entry for key '{key}'")]
    NotFound {
        /// The key that was looked up.
        key: String,
    },
    /// Reading or writing the destination failed.
    #[error("knowledge persistence I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Records could not be encoded.
    #[error("failed to encode knowledge records: {0}")]
    Encode(String),
    /// Records could not be decoded.
    #[error("failed to decode knowledge records: {0}")]
    Decode(String),
}

/// A task submission was rejected. No id is consumed and no state changes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// The task record cannot be allocated: the payload exceeds the configured limit.
    #[error("payload of {size} bytes exceeds the {limit} byte limit")]
    PayloadTooLarge {
        /// Size of the rejected payload.
        size: usize,
        /// Configured limit.
        limit: usize,
    },
}

/// Errors from engine lifecycle and control operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// `start` was called on a running engine.
    #[error("engine is already running")]
    AlreadyRunning,
    /// `shutdown` was called on a stopped engine.
    #[error("engine is not running")]
    NotRunning,
    /// A mode transition was refused.
    #[error(transparent)]
    Mode(#[from] ModeError),
    /// The resource kind cannot be allocated.
    #[error("resource {0} cannot be allocated")]
    UnsupportedResource(ResourceKind),
    /// An allocation percentage outside 0–100.
    #[error("allocation of {percent}% is outside 0-100")]
    InvalidAllocation {
        /// The rejected percentage.
        percent: f32,
    },
    /// A success rating outside [0, 1].
    #[error("success rating {0} is outside [0, 1]")]
    InvalidRating(f32),
    /// A background loop could not be spawned.
    #[error("failed to spawn {name} thread: {source}")]
    ThreadSpawn {
        /// Name of the loop.
        name: &'static str,
        /// The OS error.
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ModeError::InsufficientResources {
            target: Mode::Gaming,
        };
        assert_eq!(err.to_string(), "insufficient resources to enter Gaming mode");

        let err = KnowledgeError::Full { capacity: 3 };
        assert_eq!(err.to_string(), "knowledge store is full (capacity 3)");

        let err = EngineError::from(ModeError::InsufficientResources {
            target: Mode::Research,
        });
        assert_eq!(
            err.to_string(),
            "insufficient resources to enter Research mode"
        );
    }
}
