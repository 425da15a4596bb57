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

//! Sampling of hardware usage and user activity.

use sentinel_core::platform::{ContextProvider, HardwareProbe, HardwareSample};
use std::sync::Arc;
use std::time::Duration;

/// One round of monitoring output.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorReport {
    /// Hardware reading.
    pub hardware: HardwareSample,
    /// Recognized foreground application, if any.
    pub application: Option<String>,
}

/// Pairs a hardware probe with a context provider and the interval they are
/// polled at.
pub struct TelemetryService {
    probe: Arc<dyn HardwareProbe>,
    context: Arc<dyn ContextProvider>,
    update_interval: Duration,
}

impl TelemetryService {
    /// Creates a new telemetry service with the given update interval.
    pub fn new(
        probe: Arc<dyn HardwareProbe>,
        context: Arc<dyn ContextProvider>,
        update_interval: Duration,
    ) -> Self {
        Self {
            probe,
            context,
            update_interval,
        }
    }

    /// Whether the probe reports a compute accelerator.
    pub fn acceleration_available(&self) -> bool {
        self.probe.acceleration_available()
    }

    /// Samples both sources now.
    pub fn sample(&self) -> MonitorReport {
        log::trace!("Sampling hardware and activity...");
        MonitorReport {
            hardware: self.probe.sample(),
            application: self.context.foreground_application(),
        }
    }

    /// How often the owner should call [`sample`](Self::sample).
    pub fn update_interval(&self) -> Duration {
        self.update_interval
    }
}

impl Default for TelemetryService {
    fn default() -> Self {
        Self::new(
            Arc::new(crate::monitoring::SysinfoProbe::new()),
            Arc::new(crate::monitoring::ProcessContextProvider::new()),
            Duration::from_secs(1),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitoring::{FixedActivity, StaticProbe};

    #[test]
    fn test_sample_reads_both_sources() {
        let probe = Arc::new(StaticProbe::idle(4096));
        let activity = Arc::new(FixedActivity::new(Some("vscode")));
        let service =
            TelemetryService::new(probe.clone(), activity.clone(), Duration::from_millis(5));

        let report = service.sample();
        assert_eq!(report.hardware.memory_available_mb, 4096);
        assert_eq!(report.application.as_deref(), Some("vscode"));
        assert!(!service.acceleration_available());

        probe.set(HardwareSample {
            cpu_usage_percent: 75.0,
            gpu_usage_percent: None,
            memory_used_mb: 1000,
            memory_available_mb: 4096,
        });
        activity.set(None);
        let report = service.sample();
        assert_eq!(report.hardware.cpu_usage_percent, 75.0);
        assert!(report.application.is_none());
        assert_eq!(service.update_interval(), Duration::from_millis(5));
    }
}
