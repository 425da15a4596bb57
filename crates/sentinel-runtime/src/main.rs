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

//! Sentinel daemon.
//!
//! Configuration is read from the JSON file named by `SENTINEL_CONFIG`, or the
//! defaults are used. `SENTINEL_RUN_SECS` bounds how long the engine runs
//! after the demonstration workload is submitted (default 2).

use anyhow::{Context, Result};
use sentinel_control::handlers::{DatasetInfo, GameplayMetrics, HyperparameterRange};
use sentinel_control::Engine;
use sentinel_core::config::EngineConfig;
use sentinel_core::knowledge::KnowledgeCategory;
use sentinel_core::mode::Mode;
use sentinel_core::task::{Priority, TaskType};
use std::thread;
use std::time::Duration;

const CONFIG_ENV: &str = "SENTINEL_CONFIG";
const RUN_SECS_ENV: &str = "SENTINEL_RUN_SECS";

fn load_config() -> Result<EngineConfig> {
    match std::env::var_os(CONFIG_ENV) {
        Some(path) => EngineConfig::from_json_file(&path)
            .with_context(|| format!("failed to load configuration from {:?}", path)),
        None => {
            log::info!("{} not set, using default configuration", CONFIG_ENV);
            Ok(EngineConfig::default())
        }
    }
}

fn run_duration() -> Result<Duration> {
    match std::env::var(RUN_SECS_ENV) {
        Ok(value) => {
            let secs: u64 = value
                .parse()
                .with_context(|| format!("{} must be a number of seconds", RUN_SECS_ENV))?;
            Ok(Duration::from_secs(secs))
        }
        Err(_) => Ok(Duration::from_secs(2)),
    }
}

/// Switches mode for the demo; a busy host keeps the current mode.
fn enter(engine: &Engine, mode: Mode) {
    if let Err(e) = engine.switch_mode(mode) {
        log::warn!("Staying in {} mode: {}", engine.current_mode(), e);
    }
}

/// Submits a small workload for every mode.
fn submit_demo_workload(engine: &Engine) -> Result<()> {
    enter(engine, Mode::Gaming);
    let metrics = GameplayMetrics {
        current_fps: 48.0,
        input_latency_ms: 35.0,
        accuracy_percent: 0.42,
        reaction_time_ms: 310.0,
        win_rate: 0.38,
    };
    engine.submit(
        TaskType::Analysis,
        Priority::High,
        serde_json::to_vec(&metrics)?,
    )?;
    engine.submit(TaskType::Optimization, Priority::Realtime, Vec::new())?;

    enter(engine, Mode::Development);
    engine.submit(
        TaskType::Analysis,
        Priority::Normal,
        "char *buf = malloc(64);\nstrcpy(buf, input);\nFILE *f = fopen(path, \"r\");\n",
    )?;
    engine.submit(
        TaskType::Generation,
        Priority::Normal,
        "function that parses a config file",
    )?;

    enter(engine, Mode::Research);
    let dataset = DatasetInfo {
        name: "telemetry-2025".to_string(),
        sample_count: 250_000,
        feature_count: 42,
    };
    engine.submit(
        TaskType::Analysis,
        Priority::Low,
        serde_json::to_vec(&dataset)?,
    )?;
    let range = HyperparameterRange {
        learning_rate_min: 0.0001,
        learning_rate_max: 0.01,
        batch_size_min: 16,
        batch_size_max: 256,
    };
    engine.submit(
        TaskType::Optimization,
        Priority::Critical,
        serde_json::to_vec(&range)?,
    )?;

    engine.add_knowledge(
        "memory-safety",
        KnowledgeCategory::Fact,
        "prefer bounded copies over strcpy",
    )?;
    Ok(())
}

fn main() -> Result<()> {
    sentinel_telemetry::logging::init();

    let config = load_config()?;
    let run_for = run_duration()?;

    let mut engine = Engine::new(config);
    engine.start().context("failed to start engine")?;

    submit_demo_workload(&engine)?;

    thread::sleep(run_for);

    let status = engine.status();
    log::info!("\n{}", status);
    println!("{}", serde_json::to_string_pretty(&status)?);

    engine.shutdown().context("failed to shut down engine")?;
    Ok(())
}
