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

//! Read-only status snapshot of a running engine.

use crate::mode::Mode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A point-in-time report of counters, mode and resource usage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusReport {
    /// Engine version.
    pub version: String,
    /// Current mode.
    pub mode: Mode,
    /// Whether the background loops are running.
    pub active: bool,
    /// Seconds since the engine was constructed.
    pub uptime_secs: f64,
    /// Number of task ids handed out so far.
    pub total_operations: u64,
    /// Tasks waiting in the queue.
    pub active_tasks: u64,
    /// Tasks executed by the worker.
    pub completed_tasks: u64,
    /// Mean execution time of completed tasks, in milliseconds.
    pub average_latency_ms: f64,
    /// Fraction of successful predictions (0–1).
    pub accuracy_rate: f64,
    /// CPU usage (0–100).
    pub cpu_usage_percent: f32,
    /// GPU usage (0–100).
    pub gpu_usage_percent: f32,
    /// Memory in use, in megabytes.
    pub memory_used_mb: u64,
    /// Whether a compute accelerator is available.
    pub acceleration_available: bool,
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Sentinel Status Report")?;
        writeln!(f, "======================")?;
        writeln!(f, "Version: {}", self.version)?;
        writeln!(f, "Current Mode: {}", self.mode)?;
        writeln!(f, "Active: {}", if self.active { "Yes" } else { "No" })?;
        writeln!(f, "Uptime: {:.2} minutes", self.uptime_secs / 60.0)?;
        writeln!(f, "Total Operations: {}", self.total_operations)?;
        writeln!(f, "Active Tasks: {}", self.active_tasks)?;
        writeln!(f, "Completed Tasks: {}", self.completed_tasks)?;
        writeln!(f, "Average Response Time: {:.2} ms", self.average_latency_ms)?;
        writeln!(f, "Accuracy Rate: {:.1}%", self.accuracy_rate * 100.0)?;
        writeln!(f, "CPU Usage: {:.1}%", self.cpu_usage_percent)?;
        writeln!(f, "GPU Usage: {:.1}%", self.gpu_usage_percent)?;
        writeln!(f, "Memory Used: {} MB", self.memory_used_mb)?;
        write!(
            f,
            "Hardware Acceleration: {}",
            if self.acceleration_available {
                "Available"
            } else {
                "CPU Only"
            }
        )
    }
}
