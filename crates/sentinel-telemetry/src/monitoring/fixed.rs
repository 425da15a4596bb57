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

//! Fixed-value sources for tests and headless runs.

use sentinel_core::platform::{ContextProvider, HardwareProbe, HardwareSample};
use std::sync::{Mutex, PoisonError};

/// A hardware probe that returns a settable reading.
#[derive(Debug, Default)]
pub struct StaticProbe {
    sample: Mutex<HardwareSample>,
    acceleration: bool,
}

impl StaticProbe {
    /// Creates a probe that always reports `sample`.
    pub fn new(sample: HardwareSample, acceleration: bool) -> Self {
        Self {
            sample: Mutex::new(sample),
            acceleration,
        }
    }

    /// An idle machine with `memory_available_mb` of memory.
    pub fn idle(memory_available_mb: u64) -> Self {
        Self::new(
            HardwareSample {
                cpu_usage_percent: 0.0,
                gpu_usage_percent: None,
                memory_used_mb: 0,
                memory_available_mb,
            },
            false,
        )
    }

    /// Replaces the reading returned from now on.
    pub fn set(&self, sample: HardwareSample) {
        *self.sample.lock().unwrap_or_else(PoisonError::into_inner) = sample;
    }
}

impl HardwareProbe for StaticProbe {
    fn sample(&self) -> HardwareSample {
        *self.sample.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn acceleration_available(&self) -> bool {
        self.acceleration
    }
}

/// A context provider that returns a settable application name.
#[derive(Debug, Default)]
pub struct FixedActivity {
    application: Mutex<Option<String>>,
}

impl FixedActivity {
    /// Creates a provider reporting `application`.
    pub fn new(application: Option<&str>) -> Self {
        Self {
            application: Mutex::new(application.map(str::to_string)),
        }
    }

    /// Replaces the reported application.
    pub fn set(&self, application: Option<&str>) {
        *self
            .application
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = application.map(str::to_string);
    }
}

impl ContextProvider for FixedActivity {
    fn foreground_application(&self) -> Option<String> {
        self.application
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
