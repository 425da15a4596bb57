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

//! Gaming-mode handlers.

use super::{decode_json, findings};
use sentinel_core::platform::HardwareState;
use sentinel_core::task::{HandlerEnv, HandlerStatus, Task, TaskHandler};
use serde::{Deserialize, Serialize};

const TARGET_FPS: f32 = 120.0;

/// Gameplay figures reported by a running game session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameplayMetrics {
    /// Frames per second.
    pub current_fps: f32,
    /// Input-to-photon latency, in milliseconds.
    pub input_latency_ms: f32,
    /// Hit accuracy as a fraction (0–1).
    pub accuracy_percent: f32,
    /// Average reaction time, in milliseconds.
    pub reaction_time_ms: f32,
    /// Win rate as a fraction (0–1).
    pub win_rate: f32,
}

/// Graphics, resolution and latency suggestions for the current hardware load.
fn graphics_adjustments(hardware: &HardwareState) -> Vec<String> {
    let mut out = Vec::new();
    let cpu = hardware.cpu_usage_percent;
    let gpu = hardware.gpu_usage_percent;

    if cpu > 80.0 || gpu > 85.0 {
        out.push("High system load: reduce texture, shadow and anti-aliasing quality".into());
    } else if cpu < 50.0 && gpu < 60.0 {
        out.push(
            "System has headroom: raise texture and shadow quality, extend view distance by 20%".into(),
        );
    }

    let predicted = hardware.predicted_fps();
    if predicted < TARGET_FPS * 0.9 {
        out.push(format!(
            "Dynamic resolution scaling: {:.2}x (predicted {:.1} FPS)",
            predicted / TARGET_FPS,
            predicted
        ));
    }
    out
}

/// Bottleneck hints when one processor is much busier than the other.
fn load_balance(hardware: &HardwareState) -> Vec<String> {
    let cpu = hardware.cpu_usage_percent;
    let gpu = hardware.gpu_usage_percent;
    let mut out = Vec::new();
    if cpu > gpu + 20.0 {
        out.push("CPU bottleneck: reduce draw calls, particle density and AI complexity".into());
    }
    if gpu > cpu + 20.0 {
        out.push(
            "GPU bottleneck: reduce shader complexity, texture resolution and post-processing".into(),
        );
    }
    out
}

/// Analyzes [`GameplayMetrics`] for frame-rate, latency and competitive issues.
#[derive(Debug, Default)]
pub struct GameplayAnalysisHandler;

impl TaskHandler for GameplayAnalysisHandler {
    fn name(&self) -> &'static str {
        "gameplay_analysis"
    }

    fn execute(&self, task: &Task, env: &HandlerEnv) -> HandlerStatus {
        let metrics: GameplayMetrics = match decode_json(task) {
            Ok(m) => m,
            Err(status) => return status,
        };
        let mut out = Vec::new();

        if metrics.current_fps < 60.0 {
            out.push(format!("Low FPS detected ({:.1})", metrics.current_fps));
            out.extend(graphics_adjustments(&env.hardware));
        }
        if metrics.input_latency_ms > 20.0 {
            out.push(format!(
                "High input latency detected ({:.1} ms)",
                metrics.input_latency_ms
            ));
        }
        if env.profiles.gaming.competitive_analysis {
            if metrics.accuracy_percent < 0.7 {
                out.push(format!(
                    "Accuracy below optimal ({:.1}%): aim training suggested",
                    metrics.accuracy_percent * 100.0
                ));
            }
            if metrics.reaction_time_ms > 250.0 {
                out.push(format!(
                    "Reaction time high ({:.1} ms): practice drills recommended",
                    metrics.reaction_time_ms
                ));
            }
            if metrics.win_rate <= 0.6 {
                out.push("Win rate trend needs improvement".into());
            }
        }
        findings(out)
    }
}

/// Produces graphics, latency and load-balancing suggestions from the hardware
/// snapshot. Ignores the payload.
#[derive(Debug, Default)]
pub struct PerformanceOptimizationHandler;

impl TaskHandler for PerformanceOptimizationHandler {
    fn name(&self) -> &'static str {
        "performance_optimization"
    }

    fn execute(&self, _task: &Task, env: &HandlerEnv) -> HandlerStatus {
        let profile = &env.profiles.gaming;
        let mut out = Vec::new();
        if profile.fps_optimization {
            out.extend(graphics_adjustments(&env.hardware));
        }
        if profile.latency_reduction {
            let mut step =
                "Reduce input latency: performance governor, low-latency network stack, raised game priority"
                    .to_string();
            if env.hardware.acceleration_available {
                step.push_str(", GPU scheduling");
            }
            out.push(step);
        }
        out.extend(load_balance(&env.hardware));
        findings(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::task_with;
    use sentinel_core::mode::Mode;
    use sentinel_core::task::TaskType;

    fn env(cpu: f32, gpu: f32) -> HandlerEnv {
        let mut env = HandlerEnv::default();
        env.hardware.cpu_usage_percent = cpu;
        env.hardware.gpu_usage_percent = gpu;
        env
    }

    fn metrics_payload(fps: f32, latency: f32, accuracy: f32, reaction: f32, win: f32) -> Vec<u8> {
        serde_json::to_vec(&GameplayMetrics {
            current_fps: fps,
            input_latency_ms: latency,
            accuracy_percent: accuracy,
            reaction_time_ms: reaction,
            win_rate: win,
        })
        .unwrap()
    }

    #[test]
    fn test_healthy_session_has_no_findings() {
        let payload = metrics_payload(144.0, 8.0, 0.8, 180.0, 0.7);
        let task = task_with(TaskType::Analysis, Mode::Gaming, &payload);
        assert_eq!(
            GameplayAnalysisHandler.execute(&task, &env(10.0, 10.0)),
            HandlerStatus::Completed
        );
    }

    #[test]
    fn test_problem_session_reports_each_issue() {
        let payload = metrics_payload(45.0, 35.0, 0.5, 300.0, 0.4);
        let task = task_with(TaskType::Analysis, Mode::Gaming, &payload);
        let HandlerStatus::Findings(list) = GameplayAnalysisHandler.execute(&task, &env(90.0, 50.0))
        else {
            panic!("expected findings");
        };
        assert!(list.iter().any(|f| f.starts_with("Low FPS")));
        assert!(list.iter().any(|f| f.starts_with("High system load")));
        assert!(list.iter().any(|f| f.starts_with("High input latency")));
        assert!(list.iter().any(|f| f.starts_with("Accuracy below")));
        assert!(list.iter().any(|f| f.starts_with("Reaction time")));
        assert!(list.iter().any(|f| f.starts_with("Win rate")));
    }

    #[test]
    fn test_competitive_analysis_can_be_disabled() {
        let payload = metrics_payload(144.0, 8.0, 0.1, 900.0, 0.0);
        let task = task_with(TaskType::Analysis, Mode::Gaming, &payload);
        let mut env = env(10.0, 10.0);
        env.profiles.gaming.competitive_analysis = false;
        assert_eq!(
            GameplayAnalysisHandler.execute(&task, &env),
            HandlerStatus::Completed
        );
    }

    #[test]
    fn test_bad_payload_fails() {
        let task = task_with(TaskType::Analysis, Mode::Gaming, b"not json");
        assert!(matches!(
            GameplayAnalysisHandler.execute(&task, &HandlerEnv::default()),
            HandlerStatus::Failed(_)
        ));
    }

    #[test]
    fn test_optimization_detects_bottlenecks() {
        let task = task_with(TaskType::Optimization, Mode::Gaming, b"");
        let HandlerStatus::Findings(list) =
            PerformanceOptimizationHandler.execute(&task, &env(95.0, 40.0))
        else {
            panic!("expected findings");
        };
        assert!(list.iter().any(|f| f.starts_with("CPU bottleneck")));
        assert!(!list.iter().any(|f| f.starts_with("GPU bottleneck")));
        assert!(list.iter().any(|f| f.starts_with("Dynamic resolution")));
    }

    #[test]
    fn test_idle_hardware_raises_quality() {
        let list = graphics_adjustments(&env(10.0, 10.0).hardware);
        assert_eq!(list.len(), 1);
        assert!(list[0].starts_with("System has headroom"));
    }
}
