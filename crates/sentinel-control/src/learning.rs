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

//! The periodic learning pass.

use crate::context::UserContext;
use sentinel_core::config::EngineConfig;
use sentinel_telemetry::PerformanceMetrics;

/// Parameters of a learning pass, taken from [`EngineConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LearningPolicy {
    /// Commands a session must exceed before skill grows.
    pub command_threshold: u64,
    /// Skill added per pass past the threshold.
    pub skill_increment: f32,
}

impl From<&EngineConfig> for LearningPolicy {
    fn from(config: &EngineConfig) -> Self {
        Self {
            command_threshold: config.skill_command_threshold,
            skill_increment: config.skill_increment,
        }
    }
}

impl Default for LearningPolicy {
    fn default() -> Self {
        Self::from(&EngineConfig::default())
    }
}

/// What a learning pass changed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LearningOutcome {
    /// Skill level after the pass.
    pub skill_level: f32,
    /// Accuracy after the pass.
    pub accuracy_rate: f64,
}

impl LearningPolicy {
    /// Adapts the user context and refreshes accuracy.
    ///
    /// Returns `None` without touching anything when learning is disabled.
    pub fn run(
        &self,
        user: &mut UserContext,
        metrics: &mut PerformanceMetrics,
    ) -> Option<LearningOutcome> {
        if !user.learning_enabled {
            return None;
        }
        if user.commands_executed > self.command_threshold {
            user.skill_level = (user.skill_level + self.skill_increment).min(1.0);
        }
        let accuracy_rate = metrics.refresh_accuracy();
        Some(LearningOutcome {
            skill_level: user.skill_level,
            accuracy_rate,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentinel_core::mode::Mode;

    #[test]
    fn test_skill_grows_only_past_threshold() {
        let policy = LearningPolicy::default();
        let mut metrics = PerformanceMetrics::new(0.95);
        let mut user = UserContext::new(Mode::Development, 0.5);

        user.commands_executed = 100;
        let outcome = policy.run(&mut user, &mut metrics).unwrap();
        assert_eq!(outcome.skill_level, 0.5);

        user.commands_executed = 101;
        let outcome = policy.run(&mut user, &mut metrics).unwrap();
        assert!((outcome.skill_level - 0.51).abs() < 1e-6);
    }

    #[test]
    fn test_skill_is_capped() {
        let policy = LearningPolicy::default();
        let mut metrics = PerformanceMetrics::new(0.95);
        let mut user = UserContext::new(Mode::Development, 0.995);
        user.commands_executed = 500;
        policy.run(&mut user, &mut metrics).unwrap();
        assert_eq!(user.skill_level, 1.0);
        policy.run(&mut user, &mut metrics).unwrap();
        assert_eq!(user.skill_level, 1.0);
    }

    #[test]
    fn test_accuracy_refresh() {
        let policy = LearningPolicy::default();
        let mut user = UserContext::default();
        let mut metrics = PerformanceMetrics::new(0.95);

        assert_eq!(
            policy.run(&mut user, &mut metrics).unwrap().accuracy_rate,
            0.95
        );
        metrics.record_prediction(true);
        metrics.record_prediction(false);
        assert_eq!(
            policy.run(&mut user, &mut metrics).unwrap().accuracy_rate,
            0.5
        );
    }

    #[test]
    fn test_disabled_learning_changes_nothing() {
        let policy = LearningPolicy::default();
        let mut user = UserContext::default();
        user.learning_enabled = false;
        user.commands_executed = 1_000;
        let mut metrics = PerformanceMetrics::new(0.95);
        metrics.record_prediction(false);

        assert!(policy.run(&mut user, &mut metrics).is_none());
        assert_eq!(user.skill_level, 0.5);
        assert_eq!(metrics.accuracy_rate(), 0.95);
    }
}
