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

//! sysinfo-based implementation of the HardwareProbe trait.

use sentinel_core::platform::{HardwareProbe, HardwareSample};
use std::path::Path;
use std::sync::{Mutex, PoisonError};
use sysinfo::System;

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Files whose presence signals a usable compute accelerator.
const ACCELERATION_MARKERS: [&str; 2] = [
    "/usr/local/cuda/bin/nvcc",
    "/usr/lib/x86_64-linux-gnu/libOpenCL.so",
];

/// A hardware probe that uses the `sysinfo` crate.
///
/// sysinfo does not report GPU usage, so samples carry none.
pub struct SysinfoProbe {
    system: Mutex<System>,
    acceleration: bool,
}

impl SysinfoProbe {
    /// Creates a new probe and takes an initial CPU reading.
    pub fn new() -> Self {
        let mut system = System::new();
        system.refresh_cpu_usage();
        system.refresh_memory();
        let acceleration = detect_acceleration();
        log::info!(
            "Hardware probe ready (acceleration: {})",
            if acceleration { "available" } else { "CPU only" }
        );
        Self {
            system: Mutex::new(system),
            acceleration,
        }
    }
}

impl HardwareProbe for SysinfoProbe {
    fn sample(&self) -> HardwareSample {
        let mut system = self.system.lock().unwrap_or_else(PoisonError::into_inner);
        system.refresh_cpu_usage();
        system.refresh_memory();
        HardwareSample {
            cpu_usage_percent: system.global_cpu_usage(),
            gpu_usage_percent: None,
            memory_used_mb: system.used_memory() / BYTES_PER_MB,
            memory_available_mb: system.total_memory() / BYTES_PER_MB,
        }
    }

    fn acceleration_available(&self) -> bool {
        self.acceleration
    }
}

impl Default for SysinfoProbe {
    fn default() -> Self {
        Self::new()
    }
}

fn detect_acceleration() -> bool {
    ACCELERATION_MARKERS
        .iter()
        .any(|marker| Path::new(marker).exists())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_is_within_bounds() {
        let probe = SysinfoProbe::new();
        let sample = probe.sample();
        assert!((0.0..=100.0).contains(&sample.cpu_usage_percent));
        assert!(sample.memory_used_mb <= sample.memory_available_mb);
        assert!(sample.gpu_usage_percent.is_none());
    }
}
