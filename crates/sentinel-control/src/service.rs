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

//! The engine service: public operations and the lifecycle of its loops.

use crate::context::UserContext;
use crate::loops;
use crate::mode::{self, ModeTransition};
use crate::shared::EngineShared;
use crossbeam_channel::{Receiver, Sender};
use sentinel_core::config::EngineConfig;
use sentinel_core::error::{EngineError, KnowledgeError, ModeError, SubmitError};
use sentinel_core::knowledge::{KnowledgeCategory, KnowledgePersistence, KnowledgeRecord};
use sentinel_core::mode::{Mode, ModeProfile, ModeProfiles};
use sentinel_core::platform::{
    ContextProvider, HardwareProbe, HardwareSample, HardwareState, ResourceKind,
};
use sentinel_core::status::StatusReport;
use sentinel_core::task::{Priority, Task, TaskHandler, TaskId, TaskStatus, TaskType};
use sentinel_data::BincodeFileStore;
use sentinel_telemetry::{ProcessContextProvider, SysinfoProbe, TelemetryService};
use std::path::Path;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread;

/// Engine version reported in the status.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The adaptive task-scheduling engine.
///
/// Owns the shared state and, while running, four background threads: the
/// worker, the mode predictor, the learning loop and the resource monitor.
/// All operations take `&self` and may be called from any thread, except
/// [`start`](Self::start) and [`shutdown`](Self::shutdown).
pub struct Engine {
    shared: Arc<EngineShared>,
    probe: Arc<dyn HardwareProbe>,
    context: Arc<dyn ContextProvider>,
    persistence: Arc<dyn KnowledgePersistence>,
    shutdown_tx: Option<Sender<()>>,
    handles: Vec<thread::JoinHandle<()>>,
}

impl Engine {
    /// Creates an engine that observes the host through `sysinfo`.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_sources(
            config,
            Arc::new(SysinfoProbe::new()),
            Arc::new(ProcessContextProvider::new()),
        )
    }

    /// Creates an engine fed by the given hardware probe and context provider.
    pub fn with_sources(
        config: EngineConfig,
        probe: Arc<dyn HardwareProbe>,
        context: Arc<dyn ContextProvider>,
    ) -> Self {
        let acceleration = probe.acceleration_available();
        log::info!(
            "Engine initialised (hardware acceleration: {})",
            if acceleration { "available" } else { "CPU only" }
        );
        Self {
            shared: Arc::new(EngineShared::new(config, acceleration)),
            probe,
            context,
            persistence: Arc::new(BincodeFileStore::new()),
            shutdown_tx: None,
            handles: Vec::new(),
        }
    }

    /// Replaces the service used by [`save_knowledge`](Self::save_knowledge)
    /// and [`load_knowledge`](Self::load_knowledge).
    pub fn with_persistence(mut self, persistence: Arc<dyn KnowledgePersistence>) -> Self {
        self.persistence = persistence;
        self
    }

    /// Binds `handler` to `(task_type, mode)` for tasks submitted from now on.
    pub fn register_handler(&self, task_type: TaskType, mode: Mode, handler: Arc<dyn TaskHandler>) {
        self.shared
            .dispatch
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .register(task_type, mode, handler);
    }

    /// The configuration the engine was built with.
    pub fn config(&self) -> &EngineConfig {
        &self.shared.config
    }

    /// Returns `true` while the background loops run.
    pub fn is_running(&self) -> bool {
        self.shared.is_running()
    }

    // --- Lifecycle -------------------------------------------------------

    /// Enters the configured initial mode and starts the background loops.
    pub fn start(&mut self) -> Result<(), EngineError> {
        if self.shared.is_running() {
            log::warn!("Engine is already running");
            return Err(EngineError::AlreadyRunning);
        }
        log::info!("Starting engine...");

        let initial = self.shared.config.initial_mode;
        mode::switch_mode(&mut self.shared.write_state(), initial)?;

        let (shutdown_tx, shutdown_rx) = crossbeam_channel::bounded::<()>(1);
        self.shared.running.store(true, Ordering::SeqCst);
        self.shutdown_tx = Some(shutdown_tx);

        if let Err(e) = self.spawn_loops(shutdown_rx) {
            self.stop_loops();
            return Err(e);
        }

        log::info!("Engine is now active in {} mode", initial);
        Ok(())
    }

    fn spawn_loops(&mut self, shutdown: Receiver<()>) -> Result<(), EngineError> {
        let telemetry = TelemetryService::new(
            Arc::clone(&self.probe),
            Arc::clone(&self.context),
            self.shared.config.monitor_interval(),
        );

        let shared = Arc::clone(&self.shared);
        let rx = shutdown.clone();
        self.spawn("sentinel-worker", move || loops::run_worker(shared, rx))?;

        let shared = Arc::clone(&self.shared);
        let rx = shutdown.clone();
        self.spawn("sentinel-predictor", move || loops::run_predictor(shared, rx))?;

        let shared = Arc::clone(&self.shared);
        let rx = shutdown.clone();
        self.spawn("sentinel-learning", move || loops::run_learning(shared, rx))?;

        let shared = Arc::clone(&self.shared);
        self.spawn("sentinel-monitor", move || {
            loops::run_monitor(shared, telemetry, shutdown)
        })?;
        Ok(())
    }

    fn spawn<F>(&mut self, name: &'static str, body: F) -> Result<(), EngineError>
    where
        F: FnOnce() + Send + 'static,
    {
        let handle = thread::Builder::new()
            .name(name.to_string())
            .spawn(body)
            .map_err(|source| EngineError::ThreadSpawn { name, source })?;
        self.handles.push(handle);
        Ok(())
    }

    fn stop_loops(&mut self) {
        self.shared.running.store(false, Ordering::SeqCst);
        // Dropping the sender wakes every loop sleeping on the channel.
        self.shutdown_tx = None;
        for handle in self.handles.drain(..) {
            let name = handle.thread().name().unwrap_or("unnamed").to_string();
            if handle.join().is_err() {
                log::error!("Thread {} panicked", name);
            }
        }
    }

    /// Stops and joins every loop.
    ///
    /// Tasks still queued stay queued. If a knowledge path is configured the
    /// store is saved there; a save failure is logged, not returned.
    pub fn shutdown(&mut self) -> Result<(), EngineError> {
        if !self.shared.is_running() {
            log::warn!("Engine is not running");
            return Err(EngineError::NotRunning);
        }
        log::info!("Shutting down engine...");
        self.stop_loops();

        if let Some(path) = self.shared.config.knowledge_path.clone() {
            if let Err(e) = self.save_knowledge(&path) {
                log::error!("Failed to save knowledge to {}: {}", path.display(), e);
            }
        }
        log::info!("Engine shutdown complete");
        Ok(())
    }

    // --- Tasks -------------------------------------------------------------

    /// Queues a task and binds its handler for the current mode.
    ///
    /// Ids start at 1 and are never reused. A rejected submission consumes no
    /// id and changes nothing.
    pub fn submit(
        &self,
        task_type: TaskType,
        priority: Priority,
        payload: impl Into<Vec<u8>>,
    ) -> Result<TaskId, SubmitError> {
        let payload = payload.into();
        let limit = self.shared.config.max_payload_bytes;
        if payload.len() > limit {
            return Err(SubmitError::PayloadTooLarge {
                size: payload.len(),
                limit,
            });
        }

        let mode = self.shared.read_state().current_mode;
        let handler = self
            .shared
            .dispatch
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .resolve(task_type, mode);
        let id = TaskId::after(self.shared.total_operations.fetch_add(1, Ordering::SeqCst));

        log::debug!(
            "Task {} submitted ({:?}, {} priority, {} mode, handler {})",
            id,
            task_type,
            priority,
            mode,
            handler.name()
        );
        self.shared
            .queue
            .push(Task::new(id, task_type, priority, mode, payload, handler));
        Ok(id)
    }

    /// Removes a task that has not started yet. Returns `false` if it was not
    /// pending.
    pub fn cancel_task(&self, id: TaskId) -> bool {
        let cancelled = self.shared.queue.cancel(id).is_some();
        if cancelled {
            log::debug!("Task {} cancelled", id);
        }
        cancelled
    }

    /// Where a task stands.
    pub fn task_status(&self, id: TaskId) -> TaskStatus {
        match self.shared.queue.position(id) {
            Some(position) => TaskStatus::Pending { position },
            None => TaskStatus::Unknown,
        }
    }

    // --- Modes and resources -----------------------------------------------

    /// Requests a transition to `target`.
    pub fn switch_mode(&self, target: Mode) -> Result<ModeTransition, ModeError> {
        mode::switch_mode(&mut self.shared.write_state(), target)
    }

    /// Returns `true` if the guard for `target` currently passes.
    pub fn can_switch(&self, target: Mode) -> bool {
        mode::guard_passes(&self.shared.read_state().hardware, target)
    }

    /// The current mode.
    pub fn current_mode(&self) -> Mode {
        self.shared.read_state().current_mode
    }

    /// The mode before the last transition.
    pub fn previous_mode(&self) -> Mode {
        self.shared.read_state().previous_mode
    }

    /// Replaces one mode's profile. Takes effect on the next transition into
    /// that mode and for handlers started from now on.
    pub fn configure_mode(&self, profile: ModeProfile) {
        log::info!("Reconfiguring {} profile", profile.mode());
        self.shared.write_state().profiles.apply(profile);
    }

    /// A copy of all mode profiles.
    pub fn profiles(&self) -> ModeProfiles {
        self.shared.read_state().profiles.clone()
    }

    /// Records the share of `kind` granted to the engine.
    pub fn allocate_resources(&self, kind: ResourceKind, percent: f32) -> Result<(), EngineError> {
        mode::allocate_resource(&mut self.shared.write_state().hardware, kind, percent)
    }

    /// Folds an externally obtained hardware reading into the state.
    pub fn update_hardware(&self, sample: HardwareSample) {
        self.shared.write_state().hardware.apply_sample(&sample);
    }

    /// A copy of the hardware state.
    pub fn hardware_state(&self) -> HardwareState {
        self.shared.read_state().hardware.clone()
    }

    // --- User context and learning -------------------------------------------

    /// Sets the application and project the user is working in.
    pub fn set_context(&self, application: &str, project: &str) {
        let mut state = self.shared.write_state();
        state.user.current_application = application.to_string();
        state.user.current_project = project.to_string();
    }

    /// Counts one executed user command.
    pub fn record_command(&self) {
        self.shared.write_state().user.commands_executed += 1;
    }

    /// A copy of the user context.
    pub fn user_context(&self) -> UserContext {
        self.shared.read_state().user.clone()
    }

    /// Enables or disables the learning loop's adaptation.
    pub fn set_learning(&self, enabled: bool) {
        self.shared.write_state().user.learning_enabled = enabled;
        log::info!("Learning {}", if enabled { "enabled" } else { "disabled" });
    }

    /// Records how well a prediction served the user.
    ///
    /// `success_rating` must lie in `[0, 1]`; ratings of 0.5 and above count as
    /// a successful prediction.
    pub fn learn_from_interaction(&self, success_rating: f32) -> Result<(), EngineError> {
        if !(0.0..=1.0).contains(&success_rating) {
            return Err(EngineError::InvalidRating(success_rating));
        }
        self.shared
            .lock_metrics()
            .record_prediction(success_rating >= 0.5);
        Ok(())
    }

    // --- Knowledge -----------------------------------------------------------

    /// Adds a knowledge entry.
    pub fn add_knowledge(
        &self,
        key: &str,
        category: KnowledgeCategory,
        content: &str,
    ) -> Result<(), KnowledgeError> {
        self.shared.knowledge.add(key, category, content)
    }

    /// Looks up a knowledge entry and counts the use.
    pub fn get_knowledge(&self, key: &str) -> Result<String, KnowledgeError> {
        self.shared.knowledge.get(key)
    }

    /// Replaces the content of a knowledge entry.
    pub fn update_knowledge(&self, key: &str, content: &str) -> Result<(), KnowledgeError> {
        self.shared.knowledge.update(key, content)
    }

    /// Keys of entries whose key or content contains `query`, ignoring case.
    pub fn search_knowledge(&self, query: &str) -> Vec<String> {
        self.shared.knowledge.search(query)
    }

    /// A copy of every knowledge entry.
    pub fn knowledge_records(&self) -> Vec<KnowledgeRecord> {
        self.shared.knowledge.records()
    }

    /// Saves the knowledge store to `path`.
    pub fn save_knowledge(&self, path: &Path) -> Result<(), KnowledgeError> {
        self.shared.knowledge.save(self.persistence.as_ref(), path)
    }

    /// Appends entries saved at `path`, up to capacity. Returns how many were
    /// added.
    pub fn load_knowledge(&self, path: &Path) -> Result<usize, KnowledgeError> {
        let added = self.shared.knowledge.load(self.persistence.as_ref(), path)?;
        log::info!("Loaded {} knowledge entries from {}", added, path.display());
        Ok(added)
    }

    // --- Status --------------------------------------------------------------

    /// A point-in-time report.
    pub fn status(&self) -> StatusReport {
        let state = self.shared.read_state();
        let metrics = self.shared.lock_metrics();
        StatusReport {
            version: VERSION.to_string(),
            mode: state.current_mode,
            active: self.shared.is_running(),
            uptime_secs: self.shared.started_at.elapsed().as_secs_f64(),
            total_operations: self.shared.total_operations.load(Ordering::SeqCst),
            active_tasks: self.shared.queue.len() as u64,
            completed_tasks: metrics.completed_tasks(),
            average_latency_ms: metrics.average_latency_ms(),
            accuracy_rate: metrics.accuracy_rate(),
            cpu_usage_percent: state.hardware.cpu_usage_percent,
            gpu_usage_percent: state.hardware.gpu_usage_percent,
            memory_used_mb: state.hardware.memory_used_mb,
            acceleration_available: state.hardware.acceleration_available,
        }
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        if self.shared.is_running() {
            let _ = self.shutdown();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentinel_telemetry::{FixedActivity, StaticProbe};

    fn engine() -> Engine {
        Engine::with_sources(
            EngineConfig::default(),
            Arc::new(StaticProbe::idle(8192)),
            Arc::new(FixedActivity::new(None)),
        )
    }

    #[test]
    fn test_ids_start_at_one_and_increase() {
        let engine = engine();
        let a = engine
            .submit(TaskType::Monitoring, Priority::Low, Vec::new())
            .unwrap();
        let b = engine
            .submit(TaskType::Monitoring, Priority::Low, Vec::new())
            .unwrap();
        assert_eq!(a.as_raw(), 1);
        assert_eq!(b.as_raw(), 2);
        assert_eq!(engine.status().total_operations, 2);
        assert_eq!(engine.status().active_tasks, 2);
    }

    #[test]
    fn test_oversized_payload_consumes_no_id() {
        let config = EngineConfig {
            max_payload_bytes: 4,
            ..EngineConfig::default()
        };
        let engine = Engine::with_sources(
            config,
            Arc::new(StaticProbe::idle(8192)),
            Arc::new(FixedActivity::new(None)),
        );
        let err = engine
            .submit(TaskType::Analysis, Priority::High, vec![0u8; 5])
            .unwrap_err();
        assert_eq!(err, SubmitError::PayloadTooLarge { size: 5, limit: 4 });
        assert_eq!(engine.status().total_operations, 0);
        assert_eq!(engine.status().active_tasks, 0);

        let id = engine
            .submit(TaskType::Analysis, Priority::High, vec![0u8; 4])
            .unwrap();
        assert_eq!(id.as_raw(), 1);
    }

    #[test]
    fn test_cancel_and_status() {
        let engine = engine();
        let a = engine
            .submit(TaskType::Analysis, Priority::Normal, Vec::new())
            .unwrap();
        let b = engine
            .submit(TaskType::Analysis, Priority::High, Vec::new())
            .unwrap();
        assert_eq!(engine.task_status(b), TaskStatus::Pending { position: 0 });
        assert_eq!(engine.task_status(a), TaskStatus::Pending { position: 1 });

        assert!(engine.cancel_task(b));
        assert!(!engine.cancel_task(b));
        assert_eq!(engine.task_status(b), TaskStatus::Unknown);
        assert_eq!(engine.task_status(a), TaskStatus::Pending { position: 0 });
        assert_eq!(engine.status().active_tasks, 1);
    }

    #[test]
    fn test_lifecycle_errors() {
        let mut engine = engine();
        assert!(matches!(engine.shutdown(), Err(EngineError::NotRunning)));
        engine.start().unwrap();
        assert_eq!(engine.current_mode(), Mode::Development);
        assert!(matches!(engine.start(), Err(EngineError::AlreadyRunning)));
        engine.shutdown().unwrap();
        assert!(!engine.is_running());
        assert!(!engine.status().active);
    }

    #[test]
    fn test_learn_from_interaction_validates_rating() {
        let engine = engine();
        assert!(matches!(
            engine.learn_from_interaction(1.5),
            Err(EngineError::InvalidRating(_))
        ));
        assert!(engine.learn_from_interaction(f32::NAN).is_err());
        engine.learn_from_interaction(0.9).unwrap();
        engine.learn_from_interaction(0.1).unwrap();
        let metrics = engine.shared.lock_metrics();
        assert_eq!(metrics.total_predictions(), 2);
        assert_eq!(metrics.successful_predictions(), 1);
    }

    #[test]
    fn test_configure_mode_changes_allocation() {
        let engine = engine();
        let mut gaming = engine.profiles().gaming;
        gaming.cpu_allocation_percent = 40.0;
        engine.configure_mode(ModeProfile::Gaming(gaming));
        engine.switch_mode(Mode::Gaming).unwrap();
        assert_eq!(engine.hardware_state().allocation.cpu_percent, 40.0);
    }

    #[test]
    fn test_context_and_commands() {
        let engine = engine();
        engine.set_context("vscode", "sentinel");
        engine.record_command();
        engine.record_command();
        let user = engine.user_context();
        assert_eq!(user.current_application, "vscode");
        assert_eq!(user.current_project, "sentinel");
        assert_eq!(user.commands_executed, 2);
    }
}
