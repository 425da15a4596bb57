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

//! Performance counters reported in the engine status.

use serde::Serialize;

/// Counters for completed work and prediction outcomes.
///
/// Pending work is not counted here; the queue length is the source of truth.
///
/// Not synchronised on its own. The engine keeps it behind a single mutex so
/// that related counters always change together.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceMetrics {
    completed_tasks: u64,
    average_latency_ms: f64,
    accuracy_rate: f64,
    successful_predictions: u64,
    total_predictions: u64,
}

impl PerformanceMetrics {
    /// Creates zeroed counters with the given starting accuracy.
    pub fn new(initial_accuracy: f64) -> Self {
        Self {
            completed_tasks: 0,
            average_latency_ms: 0.0,
            accuracy_rate: initial_accuracy,
            successful_predictions: 0,
            total_predictions: 0,
        }
    }

    /// A task ran for `elapsed_ms`.
    ///
    /// Updates the running mean as `avg = (avg * (n - 1) + elapsed) / n`.
    pub fn record_completion(&mut self, elapsed_ms: f64) {
        self.completed_tasks += 1;
        let n = self.completed_tasks as f64;
        self.average_latency_ms = (self.average_latency_ms * (n - 1.0) + elapsed_ms) / n;
    }

    /// Records one prediction outcome.
    pub fn record_prediction(&mut self, success: bool) {
        self.total_predictions += 1;
        if success {
            self.successful_predictions += 1;
        }
    }

    /// Recomputes accuracy from prediction outcomes.
    ///
    /// With no predictions recorded the previous value is kept.
    pub fn refresh_accuracy(&mut self) -> f64 {
        if self.total_predictions > 0 {
            self.accuracy_rate = self.successful_predictions as f64 / self.total_predictions as f64;
        }
        self.accuracy_rate
    }

    /// Tasks the worker has executed.
    pub fn completed_tasks(&self) -> u64 {
        self.completed_tasks
    }

    /// Mean execution time, in milliseconds.
    pub fn average_latency_ms(&self) -> f64 {
        self.average_latency_ms
    }

    /// Current accuracy estimate.
    pub fn accuracy_rate(&self) -> f64 {
        self.accuracy_rate
    }

    /// Successful predictions.
    pub fn successful_predictions(&self) -> u64 {
        self.successful_predictions
    }

    /// All recorded predictions.
    pub fn total_predictions(&self) -> u64 {
        self.total_predictions
    }
}

impl Default for PerformanceMetrics {
    fn default() -> Self {
        Self::new(0.95)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_latency_is_running_mean() {
        let mut metrics = PerformanceMetrics::default();
        for ms in [10.0, 20.0, 30.0] {
            metrics.record_completion(ms);
        }
        assert_eq!(metrics.completed_tasks(), 3);
        assert_eq!(metrics.average_latency_ms(), 20.0);
    }

    #[test]
    fn test_accuracy_unchanged_without_predictions() {
        let mut metrics = PerformanceMetrics::new(0.95);
        assert_eq!(metrics.refresh_accuracy(), 0.95);
    }

    #[test]
    fn test_accuracy_from_predictions() {
        let mut metrics = PerformanceMetrics::new(0.95);
        metrics.record_prediction(true);
        metrics.record_prediction(true);
        metrics.record_prediction(false);
        metrics.record_prediction(true);
        assert_eq!(metrics.refresh_accuracy(), 0.75);
        assert_eq!(metrics.successful_predictions(), 3);
        assert_eq!(metrics.total_predictions(), 4);
    }

    #[test]
    fn test_serializes_counters() {
        let mut metrics = PerformanceMetrics::new(0.5);
        metrics.record_completion(4.0);
        let json = serde_json::to_value(&metrics).unwrap();
        assert_eq!(json["completed_tasks"], 1);
        assert_eq!(json["average_latency_ms"], 4.0);
        assert_eq!(json["accuracy_rate"], 0.5);
    }
}
