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

//! Provides abstractions over the host platform.
//!
//! The engine never probes hardware or enumerates processes itself. It is fed
//! by a [`HardwareProbe`] and a [`ContextProvider`], and keeps what they report
//! in a [`HardwareState`].

use crate::mode::ResourceAllocation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kinds of host resource the engine can request a share of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    /// Processor time.
    Cpu,
    /// Graphics / compute accelerator.
    Gpu,
    /// System memory.
    Memory,
    /// Persistent storage.
    Storage,
    /// Network bandwidth.
    Network,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A single reading returned by a [`HardwareProbe`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HardwareSample {
    /// Overall CPU usage (0–100).
    pub cpu_usage_percent: f32,
    /// GPU usage (0–100), if the probe can observe it.
    pub gpu_usage_percent: Option<f32>,
    /// System memory in use, in megabytes.
    pub memory_used_mb: u64,
    /// System memory capacity, in megabytes.
    pub memory_available_mb: u64,
}

/// Hardware context observed by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HardwareState {
    /// Overall CPU usage (0–100).
    pub cpu_usage_percent: f32,
    /// GPU usage (0–100).
    pub gpu_usage_percent: f32,
    /// System memory in use, in megabytes.
    pub memory_used_mb: u64,
    /// Memory capacity the mode guards compare against, in megabytes.
    pub memory_available_mb: u64,
    /// Whether a compute accelerator was detected.
    pub acceleration_available: bool,
    /// Resource shares currently granted to the engine.
    pub allocation: ResourceAllocation,
}

impl Default for HardwareState {
    fn default() -> Self {
        Self::new(8192, false)
    }
}

impl HardwareState {
    /// Creates an idle hardware state with the given memory capacity.
    pub fn new(memory_available_mb: u64, acceleration_available: bool) -> Self {
        Self {
            cpu_usage_percent: 0.0,
            gpu_usage_percent: 0.0,
            memory_used_mb: 0,
            memory_available_mb,
            acceleration_available,
            allocation: ResourceAllocation::default(),
        }
    }

    /// Folds a probe reading into the state.
    ///
    /// GPU usage is only taken over when acceleration is available.
    pub fn apply_sample(&mut self, sample: &HardwareSample) {
        self.cpu_usage_percent = sample.cpu_usage_percent;
        self.memory_used_mb = sample.memory_used_mb;
        self.memory_available_mb = sample.memory_available_mb;
        if self.acceleration_available {
            if let Some(gpu) = sample.gpu_usage_percent {
                self.gpu_usage_percent = gpu;
            }
        }
    }

    /// Returns `true` if memory in use is strictly below `fraction` of capacity.
    pub fn memory_below(&self, fraction: f64) -> bool {
        (self.memory_used_mb as f64) < self.memory_available_mb as f64 * fraction
    }

    /// Predicts an achievable frame rate from the current headroom.
    ///
    /// `120 * (0.4 * cpu_free + 0.5 * gpu_free + 0.1 * memory_free)`, each factor
    /// being the free fraction of that resource.
    pub fn predicted_fps(&self) -> f32 {
        let cpu_factor = (100.0 - self.cpu_usage_percent) / 100.0;
        let gpu_factor = (100.0 - self.gpu_usage_percent) / 100.0;
        let memory_factor = if self.memory_available_mb == 0 {
            0.0
        } else {
            self.memory_available_mb.saturating_sub(self.memory_used_mb) as f32
                / self.memory_available_mb as f32
        };
        120.0 * (cpu_factor * 0.4 + gpu_factor * 0.5 + memory_factor * 0.1)
    }
}

/// A source of hardware usage readings.
pub trait HardwareProbe: Send + Sync {
    /// Returns a fresh reading.
    fn sample(&self) -> HardwareSample;

    /// Returns `true` if a compute accelerator is present.
    fn acceleration_available(&self) -> bool;
}

/// A source of user-activity classification.
///
/// Implementations return a normalized name for the application the user is
/// working in (for example `"vscode"`, `"game"`, `"research"`), or `None`
/// when nothing recognizable is running.
pub trait ContextProvider: Send + Sync {
    /// Returns the normalized foreground application, if any was recognized.
    fn foreground_application(&self) -> Option<String>;
}
