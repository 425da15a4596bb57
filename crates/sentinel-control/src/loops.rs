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

//! Bodies of the background loops.
//!
//! Each loop is a `*_step` function doing one iteration plus a driver that
//! repeats it until shutdown. Drivers sleep on the shutdown channel, so
//! dropping the sender wakes every loop at once.

use crate::mode::{guard_passes, switch_mode, ModeTransition};
use crate::shared::EngineShared;
use crossbeam_channel::{Receiver, RecvTimeoutError};
use sentinel_core::task::HandlerStatus;
use sentinel_telemetry::TelemetryService;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Sleeps for `interval` or until shutdown. Returns `false` on shutdown.
pub(crate) fn pause(shutdown: &Receiver<()>, interval: Duration) -> bool {
    match shutdown.recv_timeout(interval) {
        Err(RecvTimeoutError::Timeout) => true,
        Ok(()) | Err(RecvTimeoutError::Disconnected) => false,
    }
}

/// Runs the task at the head of the queue, if any. Returns `false` when the
/// queue was empty.
pub(crate) fn worker_step(shared: &EngineShared) -> bool {
    let Some(mut task) = shared.queue.take_next() else {
        return false;
    };
    let env = shared.read_state().handler_env();

    let started = Instant::now();
    let status = task.handler().invoke(&task, &env);
    let elapsed = started.elapsed();
    task.mark_completed(elapsed);

    shared
        .lock_metrics()
        .record_completion(elapsed.as_secs_f64() * 1000.0);

    match status {
        HandlerStatus::Completed => {
            log::debug!("Task {} ({}) completed", task.id(), task.handler().name());
        }
        HandlerStatus::Findings(findings) => {
            log::info!(
                "Task {} ({}) completed with {} finding(s)",
                task.id(),
                task.handler().name(),
                findings.len()
            );
            for finding in findings {
                log::info!("  - {}", finding);
            }
        }
        HandlerStatus::Failed(reason) => {
            log::warn!("Task {} ({}) failed: {}", task.id(), task.handler().name(), reason);
        }
    }
    true
}

/// Switches to the mode the current activity calls for, if it differs from
/// the current one and the guard allows it.
pub(crate) fn predictor_step(shared: &EngineShared) -> Option<ModeTransition> {
    let mut state = shared.write_state();
    let desired = shared
        .predictor
        .predict(&state.user.current_application, state.user.preferred_mode);
    if desired == state.current_mode || !guard_passes(&state.hardware, desired) {
        return None;
    }
    log::info!("Auto-switching to {} mode", desired);
    switch_mode(&mut state, desired).ok()
}

/// Runs one learning pass.
pub(crate) fn learning_step(shared: &EngineShared) {
    let mut state = shared.write_state();
    let mut metrics = shared.lock_metrics();
    if let Some(outcome) = shared.learning.run(&mut state.user, &mut metrics) {
        log::debug!(
            "Learning pass: skill {:.2}, accuracy {:.3}",
            outcome.skill_level,
            outcome.accuracy_rate
        );
    }
}

/// Samples hardware and activity into the shared state.
///
/// Every pass counts as one session command and refreshes the working
/// directory.
pub(crate) fn monitor_step(shared: &EngineShared, telemetry: &TelemetryService) {
    let report = telemetry.sample();
    let working_directory = std::env::current_dir().ok();

    let mut state = shared.write_state();
    state.hardware.apply_sample(&report.hardware);
    if let Some(application) = report.application {
        state.user.current_application = application;
    }
    if let Some(dir) = working_directory {
        state.user.working_directory = dir;
    }
    state.user.commands_executed += 1;
}

pub(crate) fn run_worker(shared: Arc<EngineShared>, shutdown: Receiver<()>) {
    log::info!("Worker thread started.");
    let idle = shared.config.worker_idle_interval();
    while shared.is_running() {
        if !worker_step(&shared) && !pause(&shutdown, idle) {
            break;
        }
    }
    log::info!("Worker thread stopped.");
}

pub(crate) fn run_predictor(shared: Arc<EngineShared>, shutdown: Receiver<()>) {
    log::info!("Mode predictor thread started.");
    let interval = shared.config.predictor_interval();
    while shared.is_running() {
        predictor_step(&shared);
        if !pause(&shutdown, interval) {
            break;
        }
    }
    log::info!("Mode predictor thread stopped.");
}

pub(crate) fn run_learning(shared: Arc<EngineShared>, shutdown: Receiver<()>) {
    log::info!("Learning thread started.");
    let interval = shared.config.learning_interval();
    while shared.is_running() {
        learning_step(&shared);
        if !pause(&shutdown, interval) {
            break;
        }
    }
    log::info!("Learning thread stopped.");
}

pub(crate) fn run_monitor(
    shared: Arc<EngineShared>,
    telemetry: TelemetryService,
    shutdown: Receiver<()>,
) {
    log::info!("Resource monitor thread started.");
    while shared.is_running() {
        monitor_step(&shared, &telemetry);
        if !pause(&shutdown, telemetry.update_interval()) {
            break;
        }
    }
    log::info!("Resource monitor thread stopped.");
}
