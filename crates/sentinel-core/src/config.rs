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

//! Engine configuration.

use crate::mode::{Mode, ModeProfiles};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Failure to load an [`EngineConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file '{path}': {source}")]
    Io {
        /// The file that was read.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The JSON was malformed or had the wrong shape.
    #[error("invalid engine config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Configuration for the engine and its background loops.
///
/// Every field has a default, so a config file only needs the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Sleep of the worker loop when the queue is empty, in milliseconds.
    pub worker_idle_interval_ms: u64,
    /// Period of the mode-predictor loop, in milliseconds.
    pub predictor_interval_ms: u64,
    /// Period of the learning loop, in milliseconds.
    pub learning_interval_ms: u64,
    /// Period of the resource-monitor loop, in milliseconds.
    pub monitor_interval_ms: u64,
    /// Fixed number of knowledge entries the store can hold.
    pub knowledge_capacity: usize,
    /// Largest payload a task may carry. Larger submissions are rejected.
    pub max_payload_bytes: usize,
    /// Mode entered by `start`.
    pub initial_mode: Mode,
    /// Mode the predictor falls back to when no activity is recognized.
    pub preferred_mode: Mode,
    /// Skill level assumed for a new user (0–1).
    pub initial_skill_level: f32,
    /// Accuracy assumed before any prediction has been recorded (0–1).
    pub initial_accuracy: f64,
    /// Skill added per learning pass once the command threshold is passed.
    pub skill_increment: f32,
    /// Commands a session must exceed before skill starts to grow.
    pub skill_command_threshold: u64,
    /// Memory capacity assumed until the first probe reading, in megabytes.
    pub memory_available_mb: u64,
    /// Where knowledge is saved on shutdown, if anywhere.
    pub knowledge_path: Option<PathBuf>,
    /// Per-mode profiles.
    pub profiles: ModeProfiles,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            worker_idle_interval_ms: 10,
            predictor_interval_ms: 5_000,
            learning_interval_ms: 30_000,
            monitor_interval_ms: 1_000,
            knowledge_capacity: 10_000,
            max_payload_bytes: 16 * 1024 * 1024,
            initial_mode: Mode::Development,
            preferred_mode: Mode::Development,
            initial_skill_level: 0.5,
            initial_accuracy: 0.95,
            skill_increment: 0.01,
            skill_command_threshold: 100,
            memory_available_mb: 8192,
            knowledge_path: None,
            profiles: ModeProfiles::default(),
        }
    }
}

impl EngineConfig {
    /// Parses a config from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&text)?;
        log::info!("Loaded engine configuration from {}", path.display());
        Ok(config)
    }

    /// Worker idle sleep.
    pub fn worker_idle_interval(&self) -> Duration {
        Duration::from_millis(self.worker_idle_interval_ms)
    }

    /// Mode-predictor period.
    pub fn predictor_interval(&self) -> Duration {
        Duration::from_millis(self.predictor_interval_ms)
    }

    /// Learning period.
    pub fn learning_interval(&self) -> Duration {
        Duration::from_millis(self.learning_interval_ms)
    }

    /// Resource-monitor period.
    pub fn monitor_interval(&self) -> Duration {
        Duration::from_millis(self.monitor_interval_ms)
    }
}
