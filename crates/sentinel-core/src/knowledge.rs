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

//! Knowledge record format and the persistence contract.

use crate::error::KnowledgeError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Broad classification of a knowledge entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum KnowledgeCategory {
    /// A standalone fact.
    #[default]
    Fact,
    /// A how-to or sequence of steps.
    Procedure,
    /// Something the user prefers.
    Preference,
    /// An observed recurring behaviour.
    Pattern,
}

/// A self-contained copy of one knowledge entry, as handed to persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeRecord {
    /// Lookup key.
    pub key: String,
    /// Classification.
    pub category: KnowledgeCategory,
    /// Payload.
    pub content: String,
    /// Confidence score; 1.0 at insertion.
    pub confidence: f32,
    /// Number of successful lookups.
    pub usage_count: u64,
    /// Creation time, in microseconds since the UNIX epoch.
    pub created_us: u64,
    /// Last lookup or update, in microseconds since the UNIX epoch.
    pub last_accessed_us: u64,
    /// Whether the entry was refined after insertion.
    pub learned: bool,
}

/// An external store that knowledge records are saved to and loaded from.
///
/// The record layout on the destination is the implementation's concern.
pub trait KnowledgePersistence: Send + Sync {
    /// Writes all `records` to `destination`, replacing what was there.
    fn save(&self, destination: &Path, records: &[KnowledgeRecord]) -> Result<(), KnowledgeError>;

    /// Reads every record stored at `source`.
    fn load(&self, source: &Path) -> Result<Vec<KnowledgeRecord>, KnowledgeError>;
}
