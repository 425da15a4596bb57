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

//! State shared between the engine handle and its loops.

use crate::analysis::ModePredictor;
use crate::context::SystemState;
use crate::dispatch::DispatchTable;
use crate::learning::LearningPolicy;
use sentinel_core::config::EngineConfig;
use sentinel_data::{KnowledgeStore, TaskQueue};
use sentinel_telemetry::PerformanceMetrics;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;

/// Everything the loops touch.
///
/// Lock order: `state` before `metrics`. The queue and the knowledge store
/// take their own locks and are never held across another lock.
pub(crate) struct EngineShared {
    pub(crate) config: EngineConfig,
    pub(crate) state: RwLock<SystemState>,
    pub(crate) queue: TaskQueue,
    pub(crate) knowledge: KnowledgeStore,
    pub(crate) metrics: Mutex<PerformanceMetrics>,
    pub(crate) dispatch: RwLock<DispatchTable>,
    pub(crate) total_operations: AtomicU64,
    pub(crate) running: AtomicBool,
    pub(crate) started_at: Instant,
    pub(crate) predictor: ModePredictor,
    pub(crate) learning: LearningPolicy,
}

impl EngineShared {
    pub(crate) fn new(config: EngineConfig, acceleration_available: bool) -> Self {
        Self {
            state: RwLock::new(SystemState::new(&config, acceleration_available)),
            queue: TaskQueue::new(),
            knowledge: KnowledgeStore::new(config.knowledge_capacity),
            metrics: Mutex::new(PerformanceMetrics::new(config.initial_accuracy)),
            dispatch: RwLock::new(DispatchTable::with_defaults()),
            total_operations: AtomicU64::new(0),
            running: AtomicBool::new(false),
            started_at: Instant::now(),
            predictor: ModePredictor,
            learning: LearningPolicy::from(&config),
            config,
        }
    }

    pub(crate) fn read_state(&self) -> RwLockReadGuard<'_, SystemState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn write_state(&self) -> RwLockWriteGuard<'_, SystemState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn lock_metrics(&self) -> MutexGuard<'_, PerformanceMetrics> {
        self.metrics.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}
