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

//! Resource-guarded mode transitions and resource allocation.
//!
//! These functions operate on a [`SystemState`] the caller already holds
//! exclusively, so a guard check and the switch it permits are atomic.

use crate::context::SystemState;
use sentinel_core::error::{EngineError, ModeError};
use sentinel_core::mode::Mode;
use sentinel_core::platform::{HardwareState, ResourceKind};

/// Result of a successful [`switch_mode`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeTransition {
    /// The target was already current. Nothing changed.
    Unchanged,
    /// The mode changed.
    Switched {
        /// The mode that was left.
        from: Mode,
        /// The mode that was entered.
        to: Mode,
    },
}

/// Returns `true` if the hardware leaves enough headroom to enter `target`.
///
/// | Mode | CPU | Memory in use |
/// |---|---|---|
/// | Gaming | < 80 % | < 0.8 of capacity |
/// | Development | any | < 0.7 of capacity |
/// | Research | < 90 % | < 0.9 of capacity |
/// | Inactive | any | any |
pub fn guard_passes(hardware: &HardwareState, target: Mode) -> bool {
    match target {
        Mode::Gaming => hardware.cpu_usage_percent < 80.0 && hardware.memory_below(0.8),
        Mode::Development => hardware.memory_below(0.7),
        Mode::Research => hardware.cpu_usage_percent < 90.0 && hardware.memory_below(0.9),
        Mode::Inactive => true,
    }
}

/// Moves `state` to `target` if the guard allows it.
///
/// A request for the current mode succeeds without touching anything,
/// including the previous mode. On success the mode's resource shares are
/// applied.
pub fn switch_mode(state: &mut SystemState, target: Mode) -> Result<ModeTransition, ModeError> {
    if state.current_mode == target {
        return Ok(ModeTransition::Unchanged);
    }
    if !guard_passes(&state.hardware, target) {
        log::warn!(
            "Cannot switch {} -> {}: insufficient resources (cpu {:.1}%, memory {}/{} MB)",
            state.current_mode,
            target,
            state.hardware.cpu_usage_percent,
            state.hardware.memory_used_mb,
            state.hardware.memory_available_mb
        );
        return Err(ModeError::InsufficientResources { target });
    }

    let from = state.current_mode;
    state.previous_mode = from;
    state.current_mode = target;

    if let Some(allocation) = state.profiles.allocation_for(target) {
        // Both values come from validated profiles; a bad configured share is
        // logged and the transition stands.
        for (kind, percent) in [
            (ResourceKind::Cpu, allocation.cpu_percent),
            (ResourceKind::Gpu, allocation.gpu_percent),
        ] {
            if let Err(e) = allocate_resource(&mut state.hardware, kind, percent) {
                log::warn!("Allocation on entering {} failed: {}", target, e);
            }
        }
    }

    log::info!("Mode switch complete: {} -> {}", from, target);
    Ok(ModeTransition::Switched { from, to: target })
}

/// Records the share of `kind` granted to the engine.
///
/// CPU and memory shares are always recorded. A GPU share is recorded, and
/// becomes the GPU usage target, only when acceleration is available;
/// otherwise the request succeeds without effect. Storage and network cannot
/// be allocated.
pub fn allocate_resource(
    hardware: &mut HardwareState,
    kind: ResourceKind,
    percent: f32,
) -> Result<(), EngineError> {
    if !(0.0..=100.0).contains(&percent) {
        return Err(EngineError::InvalidAllocation { percent });
    }
    match kind {
        ResourceKind::Cpu => {
            log::debug!("Allocating {:.1}% CPU", percent);
            hardware.allocation.cpu_percent = percent;
        }
        ResourceKind::Memory => {
            log::debug!("Allocating {:.1}% memory", percent);
            hardware.allocation.memory_percent = percent;
        }
        ResourceKind::Gpu => {
            if hardware.acceleration_available {
                log::debug!("Allocating {:.1}% GPU", percent);
                hardware.allocation.gpu_percent = percent;
                hardware.gpu_usage_percent = percent;
            } else {
                log::debug!("GPU allocation of {:.1}% skipped: CPU only", percent);
            }
        }
        ResourceKind::Storage | ResourceKind::Network => {
            return Err(EngineError::UnsupportedResource(kind));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(cpu: f32, used_mb: u64, accel: bool) -> SystemState {
        let mut state = SystemState::default();
        state.hardware.cpu_usage_percent = cpu;
        state.hardware.memory_used_mb = used_mb;
        state.hardware.memory_available_mb = 1000;
        state.hardware.acceleration_available = accel;
        state
    }

    #[test]
    fn test_guards() {
        let hw = state_with(79.0, 799, false).hardware;
        assert!(guard_passes(&hw, Mode::Gaming));
        assert!(!guard_passes(&hw, Mode::Development));
        assert!(guard_passes(&hw, Mode::Research));

        let hw = state_with(80.0, 100, false).hardware;
        assert!(!guard_passes(&hw, Mode::Gaming));
        assert!(guard_passes(&hw, Mode::Development));

        let hw = state_with(95.0, 950, false).hardware;
        assert!(!guard_passes(&hw, Mode::Research));
        assert!(guard_passes(&hw, Mode::Inactive));
    }

    #[test]
    fn test_memory_guard_is_strict() {
        let hw = state_with(0.0, 700, false).hardware;
        assert!(!guard_passes(&hw, Mode::Development));
    }

    #[test]
    fn test_switch_updates_previous_and_allocation() {
        let mut state = state_with(10.0, 100, true);
        let transition = switch_mode(&mut state, Mode::Gaming).unwrap();
        assert_eq!(
            transition,
            ModeTransition::Switched {
                from: Mode::Inactive,
                to: Mode::Gaming
            }
        );
        assert_eq!(state.current_mode, Mode::Gaming);
        assert_eq!(state.previous_mode, Mode::Inactive);
        assert_eq!(state.hardware.allocation.cpu_percent, 60.0);
        assert_eq!(state.hardware.allocation.gpu_percent, 80.0);
        assert_eq!(state.hardware.gpu_usage_percent, 80.0);

        switch_mode(&mut state, Mode::Research).unwrap();
        assert_eq!(state.previous_mode, Mode::Gaming);
        assert_eq!(state.hardware.allocation.cpu_percent, 70.0);
        assert_eq!(state.hardware.allocation.gpu_percent, 90.0);
    }

    #[test]
    fn test_same_mode_is_noop() {
        let mut state = state_with(10.0, 100, false);
        switch_mode(&mut state, Mode::Development).unwrap();
        assert_eq!(state.previous_mode, Mode::Inactive);

        let transition = switch_mode(&mut state, Mode::Development).unwrap();
        assert_eq!(transition, ModeTransition::Unchanged);
        assert_eq!(state.previous_mode, Mode::Inactive);
    }

    #[test]
    fn test_denied_switch_leaves_state() {
        let mut state = state_with(85.0, 100, false);
        switch_mode(&mut state, Mode::Development).unwrap();

        let err = switch_mode(&mut state, Mode::Gaming).unwrap_err();
        assert_eq!(
            err,
            ModeError::InsufficientResources {
                target: Mode::Gaming
            }
        );
        assert_eq!(state.current_mode, Mode::Development);
        assert_eq!(state.previous_mode, Mode::Inactive);
        assert_eq!(state.hardware.allocation.cpu_percent, 50.0);
    }

    #[test]
    fn test_gpu_allocation_without_acceleration() {
        let mut hw = state_with(0.0, 0, false).hardware;
        allocate_resource(&mut hw, ResourceKind::Gpu, 40.0).unwrap();
        assert_eq!(hw.allocation.gpu_percent, 0.0);
        assert_eq!(hw.gpu_usage_percent, 0.0);
    }

    #[test]
    fn test_allocation_errors() {
        let mut hw = HardwareState::default();
        assert!(matches!(
            allocate_resource(&mut hw, ResourceKind::Storage, 10.0),
            Err(EngineError::UnsupportedResource(ResourceKind::Storage))
        ));
        assert!(matches!(
            allocate_resource(&mut hw, ResourceKind::Cpu, 120.0),
            Err(EngineError::InvalidAllocation { .. })
        ));
        allocate_resource(&mut hw, ResourceKind::Memory, 25.0).unwrap();
        assert_eq!(hw.allocation.memory_percent, 25.0);
    }
}
