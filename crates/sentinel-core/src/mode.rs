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

//! Operating modes and their per-mode configuration profiles.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The operating mode of the engine.
///
/// Exactly one mode is current at any time. Each non-inactive mode owns a
/// profile in [`ModeProfiles`] that controls its feature flags and the share
/// of simulated hardware granted to the engine while it is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Mode {
    /// No profile is active. Tasks submitted in this mode bind no handler.
    #[default]
    Inactive,
    /// Latency-sensitive, performance-oriented profile.
    Gaming,
    /// Code analysis and generation profile.
    Development,
    /// Data analysis and model experimentation profile.
    Research,
}

impl Mode {
    /// All modes, in declaration order.
    pub const ALL: [Mode; 4] = [
        Mode::Inactive,
        Mode::Gaming,
        Mode::Development,
        Mode::Research,
    ];

    /// Returns the human-readable name of the mode.
    pub fn name(self) -> &'static str {
        match self {
            Mode::Inactive => "Inactive",
            Mode::Gaming => "Gaming",
            Mode::Development => "Development",
            Mode::Research => "Research",
        }
    }

    /// Parses a mode from its human-readable name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resource shares granted to the engine, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ResourceAllocation {
    /// CPU share (0–100).
    pub cpu_percent: f32,
    /// GPU share (0–100).
    pub gpu_percent: f32,
    /// System memory share (0–100).
    pub memory_percent: f32,
}

/// Configuration of the Gaming profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GamingProfile {
    /// Continuously watch frame-rate and load metrics.
    pub performance_monitoring: bool,
    /// Apply optimizations while a session is running.
    pub real_time_optimization: bool,
    /// Include accuracy, reaction time and win-rate in gameplay analysis.
    pub competitive_analysis: bool,
    /// Tune graphics settings towards frame rate.
    pub fps_optimization: bool,
    /// Apply input-latency reductions.
    pub latency_reduction: bool,
    /// CPU share requested when entering the mode.
    pub cpu_allocation_percent: f32,
    /// GPU share requested when entering the mode.
    pub gpu_allocation_percent: f32,
}

impl Default for GamingProfile {
    fn default() -> Self {
        Self {
            performance_monitoring: true,
            real_time_optimization: true,
            competitive_analysis: true,
            fps_optimization: true,
            latency_reduction: true,
            cpu_allocation_percent: 60.0,
            gpu_allocation_percent: 80.0,
        }
    }
}

/// Configuration of the Development profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DevelopmentProfile {
    /// Enable code generation tasks.
    pub code_generation: bool,
    /// Enable syntax analysis tasks.
    pub syntax_analysis: bool,
    /// Enable debugging assistance.
    pub debugging_assistance: bool,
    /// Enable architecture planning.
    pub architecture_planning: bool,
    /// Enable pair-programming sessions.
    pub pair_programming: bool,
    /// Maximum number of source lines kept as context.
    pub max_code_context_lines: u32,
    /// Enable completion suggestions.
    pub auto_completion: bool,
}

impl Default for DevelopmentProfile {
    fn default() -> Self {
        Self {
            code_generation: true,
            syntax_analysis: true,
            debugging_assistance: true,
            architecture_planning: true,
            pair_programming: true,
            max_code_context_lines: 500,
            auto_completion: true,
        }
    }
}

/// Configuration of the Research profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResearchProfile {
    /// Enable (simulated) network training.
    pub neural_training: bool,
    /// Enable model experimentation.
    pub model_experimentation: bool,
    /// Enable dataset analysis.
    pub data_analysis: bool,
    /// Enable hyperparameter and algorithm optimization.
    pub algorithm_optimization: bool,
    /// Allow work to be distributed.
    pub distributed_computing: bool,
    /// Upper bound on training epochs.
    pub max_training_epochs: u32,
    /// Learning-rate adaptation factor.
    pub learning_rate_adaptation: f32,
}

impl Default for ResearchProfile {
    fn default() -> Self {
        Self {
            neural_training: true,
            model_experimentation: true,
            data_analysis: true,
            algorithm_optimization: true,
            distributed_computing: true,
            max_training_epochs: 1000,
            learning_rate_adaptation: 0.001,
        }
    }
}

/// A single profile record, used to reconfigure one mode at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ModeProfile {
    /// Replacement for the Gaming profile.
    Gaming(GamingProfile),
    /// Replacement for the Development profile.
    Development(DevelopmentProfile),
    /// Replacement for the Research profile.
    Research(ResearchProfile),
}

impl ModeProfile {
    /// Returns the mode this profile configures.
    pub fn mode(&self) -> Mode {
        match self {
            ModeProfile::Gaming(_) => Mode::Gaming,
            ModeProfile::Development(_) => Mode::Development,
            ModeProfile::Research(_) => Mode::Research,
        }
    }
}

/// The full set of mode profiles.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModeProfiles {
    /// Gaming profile.
    pub gaming: GamingProfile,
    /// Development profile.
    pub development: DevelopmentProfile,
    /// Research profile.
    pub research: ResearchProfile,
}

impl ModeProfiles {
    /// Replaces the profile matching `profile`'s mode.
    pub fn apply(&mut self, profile: ModeProfile) {
        match profile {
            ModeProfile::Gaming(p) => self.gaming = p,
            ModeProfile::Development(p) => self.development = p,
            ModeProfile::Research(p) => self.research = p,
        }
    }

    /// Returns the resource shares requested when entering `mode`.
    ///
    /// | Mode | CPU | GPU |
    /// |---|---|---|
    /// | Gaming | configured | configured |
    /// | Development | 50 | 30 |
    /// | Research | 70 | 90 |
    /// | Inactive | none | none |
    pub fn allocation_for(&self, mode: Mode) -> Option<ResourceAllocation> {
        match mode {
            Mode::Gaming => Some(ResourceAllocation {
                cpu_percent: self.gaming.cpu_allocation_percent,
                gpu_percent: self.gaming.gpu_allocation_percent,
                memory_percent: 0.0,
            }),
            Mode::Development => Some(ResourceAllocation {
                cpu_percent: 50.0,
                gpu_percent: 30.0,
                memory_percent: 0.0,
            }),
            Mode::Research => Some(ResourceAllocation {
                cpu_percent: 70.0,
                gpu_percent: 90.0,
                memory_percent: 0.0,
            }),
            Mode::Inactive => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_names_round_trip() {
        for mode in Mode::ALL {
            assert_eq!(Mode::from_name(mode.name()), Some(mode));
        }
        assert_eq!(Mode::from_name("research"), Some(Mode::Research));
        assert_eq!(Mode::from_name("Hybrid"), None);
    }

    #[test]
    fn test_default_allocations() {
        let profiles = ModeProfiles::default();
        let gaming = profiles.allocation_for(Mode::Gaming).unwrap();
        assert_eq!(gaming.cpu_percent, 60.0);
        assert_eq!(gaming.gpu_percent, 80.0);

        let dev = profiles.allocation_for(Mode::Development).unwrap();
        assert_eq!((dev.cpu_percent, dev.gpu_percent), (50.0, 30.0));

        let research = profiles.allocation_for(Mode::Research).unwrap();
        assert_eq!((research.cpu_percent, research.gpu_percent), (70.0, 90.0));

        assert!(profiles.allocation_for(Mode::Inactive).is_none());
    }

    #[test]
    fn test_apply_replaces_only_matching_profile() {
        let mut profiles = ModeProfiles::default();
        let gaming = GamingProfile {
            cpu_allocation_percent: 40.0,
            ..Default::default()
        };
        profiles.apply(ModeProfile::Gaming(gaming));

        assert_eq!(profiles.gaming.cpu_allocation_percent, 40.0);
        assert_eq!(profiles.development, DevelopmentProfile::default());
        assert_eq!(
            profiles.allocation_for(Mode::Gaming).unwrap().cpu_percent,
            40.0
        );
    }

    #[test]
    fn test_profiles_deserialize_with_partial_fields() {
        let profiles: ModeProfiles =
            serde_json::from_str(r#"{"research": {"max_training_epochs": 10}}"#).unwrap();
        assert_eq!(profiles.research.max_training_epochs, 10);
        assert!(profiles.research.neural_training);
        assert_eq!(profiles.gaming, GamingProfile::default());
    }
}
