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

//! Research-mode handlers.

use super::{decode_json, findings};
use sentinel_core::task::{HandlerEnv, HandlerStatus, Task, TaskHandler};
use serde::{Deserialize, Serialize};

/// Summary of a dataset submitted for analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetInfo {
    /// Dataset name.
    pub name: String,
    /// Number of samples.
    pub sample_count: u64,
    /// Number of features per sample.
    pub feature_count: u64,
}

/// Flags dataset shapes that tend to train poorly.
#[derive(Debug, Default)]
pub struct DatasetAnalysisHandler;

impl TaskHandler for DatasetAnalysisHandler {
    fn name(&self) -> &'static str {
        "dataset_analysis"
    }

    fn execute(&self, task: &Task, _env: &HandlerEnv) -> HandlerStatus {
        let dataset: DatasetInfo = match decode_json(task) {
            Ok(d) => d,
            Err(status) => return status,
        };
        log::debug!(
            "Dataset '{}': {} samples, {} features",
            dataset.name,
            dataset.sample_count,
            dataset.feature_count
        );
        let mut out = Vec::new();
        if dataset.sample_count < 1000 {
            out.push("Small dataset: consider data augmentation".to_string());
        }
        if dataset.feature_count > dataset.sample_count {
            out.push("More features than samples: risk of overfitting".to_string());
        }
        if dataset.feature_count > 100 {
            out.push("High dimensionality: apply dimensionality reduction (PCA/t-SNE)".to_string());
        }
        findings(out)
    }
}

/// Bounds of a hyperparameter grid search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HyperparameterRange {
    /// Smallest learning rate tried.
    pub learning_rate_min: f64,
    /// Largest learning rate tried.
    pub learning_rate_max: f64,
    /// Smallest batch size tried.
    pub batch_size_min: u64,
    /// Largest batch size tried.
    pub batch_size_max: u64,
}

/// Best point found by [`HyperparameterSearchHandler::search`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchResult {
    /// Chosen learning rate.
    pub learning_rate: f64,
    /// Chosen batch size.
    pub batch_size: u64,
    /// Score of the chosen point.
    pub score: f64,
    /// Number of grid points evaluated.
    pub evaluated: usize,
}

/// Grid search over learning rate and batch size, both doubling per step.
///
/// Points are scored without training: the score falls off with the distance,
/// in doublings, from a learning rate of 0.001 and a batch size of 64, and
/// stays within 0.70–0.95.
#[derive(Debug, Default)]
pub struct HyperparameterSearchHandler;

impl HyperparameterSearchHandler {
    fn score(learning_rate: f64, batch_size: u64) -> f64 {
        let distance =
            (learning_rate / 0.001).log2().abs() + (batch_size as f64 / 64.0).log2().abs();
        0.70 + 0.25 / (1.0 + distance)
    }

    /// Runs the search, or explains why the range is unusable.
    pub fn search(range: &HyperparameterRange) -> Result<SearchResult, String> {
        if range.learning_rate_min <= 0.0 || range.batch_size_min == 0 {
            return Err("hyperparameter minimums must be positive".to_string());
        }
        if range.learning_rate_min > range.learning_rate_max
            || range.batch_size_min > range.batch_size_max
        {
            return Err("hyperparameter range is empty".to_string());
        }

        let mut best: Option<SearchResult> = None;
        let mut evaluated = 0;
        let mut lr = range.learning_rate_min;
        while lr <= range.learning_rate_max {
            let mut bs = range.batch_size_min;
            loop {
                let score = Self::score(lr, bs);
                evaluated += 1;
                let improves = match &best {
                    Some(current) => score > current.score,
                    None => true,
                };
                if improves {
                    best = Some(SearchResult {
                        learning_rate: lr,
                        batch_size: bs,
                        score,
                        evaluated: 0,
                    });
                }
                match bs.checked_mul(2) {
                    Some(next) if next <= range.batch_size_max => bs = next,
                    _ => break,
                }
            }
            lr *= 2.0;
        }

        best.map(|b| SearchResult { evaluated, ..b })
            .ok_or_else(|| "hyperparameter range is empty".to_string())
    }
}

impl TaskHandler for HyperparameterSearchHandler {
    fn name(&self) -> &'static str {
        "hyperparameter_search"
    }

    fn execute(&self, task: &Task, _env: &HandlerEnv) -> HandlerStatus {
        let range: HyperparameterRange = match decode_json(task) {
            Ok(r) => r,
            Err(status) => return status,
        };
        match Self::search(&range) {
            Ok(best) => HandlerStatus::Findings(vec![format!(
                "Best of {} points: learning rate {:.6}, batch size {}, expected accuracy {:.3}",
                best.evaluated, best.learning_rate, best.batch_size, best.score
            )]),
            Err(reason) => HandlerStatus::Failed(reason),
        }
    }
}
