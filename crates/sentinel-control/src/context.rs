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

//! Shared state observed and mutated by the engine loops.

use sentinel_core::config::EngineConfig;
use sentinel_core::mode::{Mode, ModeProfiles};
use sentinel_core::platform::HardwareState;
use sentinel_core::task::HandlerEnv;
use serde::Serialize;
use std::path::PathBuf;

/// What the engine knows about the user and their session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserContext {
    /// Normalized name of the application in use.
    pub current_application: String,
    /// Project the user is working on.
    pub current_project: String,
    /// Working directory of the session.
    pub working_directory: PathBuf,
    /// Commands executed in this session.
    pub commands_executed: u64,
    /// Mode used when no activity is recognized.
    pub preferred_mode: Mode,
    /// Estimated skill level (0–1).
    pub skill_level: f32,
    /// Whether voice interaction is enabled.
    pub voice_interaction: bool,
    /// Whether the learning loop adapts to this user.
    pub learning_enabled: bool,
}

impl UserContext {
    /// Creates the initial context of a new session.
    pub fn new(preferred_mode: Mode, skill_level: f32) -> Self {
        Self {
            current_application: "system".to_string(),
            current_project: "none".to_string(),
            working_directory: std::env::current_dir().unwrap_or_default(),
            commands_executed: 0,
            preferred_mode,
            skill_level,
            voice_interaction: false,
            learning_enabled: true,
        }
    }
}

impl Default for UserContext {
    fn default() -> Self {
        Self::new(Mode::Development, 0.5)
    }
}

/// Mode, profiles, hardware, and user context.
///
/// The engine keeps exactly one of these behind a `RwLock`, so a guard check
/// and the switch it allows see the same hardware reading.
#[derive(Debug, Clone)]
pub struct SystemState {
    /// The mode tasks are currently bound against.
    pub current_mode: Mode,
    /// The mode before the last transition.
    pub previous_mode: Mode,
    /// Per-mode profiles.
    pub profiles: ModeProfiles,
    /// Last observed hardware state and granted allocation.
    pub hardware: HardwareState,
    /// User and session context.
    pub user: UserContext,
}

impl SystemState {
    /// Builds the state of a freshly constructed, inactive engine.
    pub fn new(config: &EngineConfig, acceleration_available: bool) -> Self {
        Self {
            current_mode: Mode::Inactive,
            previous_mode: Mode::Inactive,
            profiles: config.profiles.clone(),
            hardware: HardwareState::new(config.memory_available_mb, acceleration_available),
            user: UserContext::new(config.preferred_mode, config.initial_skill_level),
        }
    }

    /// Copies out what a handler is allowed to see.
    pub fn handler_env(&self) -> HandlerEnv {
        HandlerEnv {
            hardware: self.hardware.clone(),
            profiles: self.profiles.clone(),
        }
    }
}

impl Default for SystemState {
    fn default() -> Self {
        Self::new(&EngineConfig::default(), false)
    }
}
