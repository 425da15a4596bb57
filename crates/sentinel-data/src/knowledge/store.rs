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

//! Fixed-capacity knowledge table.

use sentinel_core::clock::unix_micros;
use sentinel_core::error::KnowledgeError;
use sentinel_core::knowledge::{KnowledgeCategory, KnowledgePersistence, KnowledgeRecord};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// One stored entry.
///
/// Usage and last-access are atomics so a lookup can bump them while holding
/// only the shared lock.
#[derive(Debug)]
struct KnowledgeEntry {
    key: String,
    category: KnowledgeCategory,
    content: String,
    confidence: f32,
    usage_count: AtomicU64,
    created_us: u64,
    last_accessed_us: AtomicU64,
    learned: bool,
}

impl KnowledgeEntry {
    fn new(key: String, category: KnowledgeCategory, content: String) -> Self {
        let now = unix_micros();
        Self {
            key,
            category,
            content,
            confidence: 1.0,
            usage_count: AtomicU64::new(0),
            created_us: now,
            last_accessed_us: AtomicU64::new(now),
            learned: false,
        }
    }

    fn from_record(record: KnowledgeRecord) -> Self {
        Self {
            key: record.key,
            category: record.category,
            content: record.content,
            confidence: record.confidence,
            usage_count: AtomicU64::new(record.usage_count),
            created_us: record.created_us,
            last_accessed_us: AtomicU64::new(record.last_accessed_us),
            learned: record.learned,
        }
    }

    fn to_record(&self) -> KnowledgeRecord {
        KnowledgeRecord {
            key: self.key.clone(),
            category: self.category,
            content: self.content.clone(),
            confidence: self.confidence,
            usage_count: self.usage_count.load(Ordering::Relaxed),
            created_us: self.created_us,
            last_accessed_us: self.last_accessed_us.load(Ordering::Relaxed),
            learned: self.learned,
        }
    }

    fn touch(&self) {
        self.usage_count.fetch_add(1, Ordering::Relaxed);
        self.last_accessed_us.store(unix_micros(), Ordering::Relaxed);
    }
}

/// A keyed table with a capacity fixed at construction.
///
/// Writers (`add`, `update`, `extend`) take the lock exclusively; lookups share
/// it. Keys are not deduplicated: a repeated key is stored as a separate entry
/// and lookups return the first one in insertion order.
#[derive(Debug)]
pub struct KnowledgeStore {
    capacity: usize,
    entries: RwLock<Vec<KnowledgeEntry>>,
}

impl KnowledgeStore {
    /// Creates an empty store that can hold `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: RwLock::new(Vec::new()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<KnowledgeEntry>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<KnowledgeEntry>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// The fixed capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Appends a new entry.
    pub fn add(
        &self,
        key: impl Into<String>,
        category: KnowledgeCategory,
        content: impl Into<String>,
    ) -> Result<(), KnowledgeError> {
        let mut entries = self.write();
        if entries.len() >= self.capacity {
            log::warn!("Knowledge store full ({} entries)", self.capacity);
            return Err(KnowledgeError::Full {
                capacity: self.capacity,
            });
        }
        let key = key.into();
        log::debug!("Knowledge added: {}", key);
        entries.push(KnowledgeEntry::new(key, category, content.into()));
        Ok(())
    }

    /// Returns the content of the first entry with `key`.
    ///
    /// A hit increments that entry's usage counter by one and refreshes its
    /// last-access time.
    pub fn get(&self, key: &str) -> Result<String, KnowledgeError> {
        let entries = self.read();
        let entry = entries
            .iter()
            .find(|e| e.key == key)
            .ok_or_else(|| KnowledgeError::NotFound {
                key: key.to_string(),
            })?;
        entry.touch();
        Ok(entry.content.clone())
    }

    /// Replaces the content of the first entry with `key` and marks it learned.
    pub fn update(&self, key: &str, content: impl Into<String>) -> Result<(), KnowledgeError> {
        let mut entries = self.write();
        let entry = entries
            .iter_mut()
            .find(|e| e.key == key)
            .ok_or_else(|| KnowledgeError::NotFound {
                key: key.to_string(),
            })?;
        entry.content = content.into();
        entry.learned = true;
        entry.last_accessed_us.store(unix_micros(), Ordering::Relaxed);
        Ok(())
    }

    /// Returns the keys of entries whose key or content contains `query`,
    /// ignoring case. Usage counters are left alone.
    pub fn search(&self, query: &str) -> Vec<String> {
        let needle = query.to_lowercase();
        self.read()
            .iter()
            .filter(|e| {
                e.key.to_lowercase().contains(&needle) || e.content.to_lowercase().contains(&needle)
            })
            .map(|e| e.key.clone())
            .collect()
    }

    /// Usage counter of the first entry with `key`.
    pub fn usage_count(&self, key: &str) -> Option<u64> {
        self.read()
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.usage_count.load(Ordering::Relaxed))
    }

    /// Copies every entry out as a record, in insertion order.
    pub fn records(&self) -> Vec<KnowledgeRecord> {
        self.read().iter().map(KnowledgeEntry::to_record).collect()
    }

    /// Appends records until capacity is reached. Returns how many were taken.
    pub fn extend(&self, records: impl IntoIterator<Item = KnowledgeRecord>) -> usize {
        let mut entries = self.write();
        let room = self.capacity.saturating_sub(entries.len());
        let before = entries.len();
        entries.extend(
            records
                .into_iter()
                .take(room)
                .map(KnowledgeEntry::from_record),
        );
        entries.len() - before
    }

    /// Saves every entry through `persistence`.
    pub fn save(
        &self,
        persistence: &dyn KnowledgePersistence,
        destination: &Path,
    ) -> Result<(), KnowledgeError> {
        let records = self.records();
        persistence.save(destination, &records)?;
        log::info!(
            "Knowledge store saved {} entries to {}",
            records.len(),
            destination.display()
        );
        Ok(())
    }

    /// Loads entries through `persistence` and appends them.
    ///
    /// Records beyond the remaining capacity are dropped. Returns how many
    /// were added.
    pub fn load(
        &self,
        persistence: &dyn KnowledgePersistence,
        source: &Path,
    ) -> Result<usize, KnowledgeError> {
        let records = persistence.load(source)?;
        let total = records.len();
        let added = self.extend(records);
        if added < total {
            log::warn!(
                "Knowledge store kept {} of {} loaded entries (capacity {})",
                added,
                total,
                self.capacity
            );
        }
        Ok(added)
    }
}
