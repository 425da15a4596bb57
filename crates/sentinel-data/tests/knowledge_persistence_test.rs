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

//! Saving and reloading the knowledge store through the bincode file format.

use sentinel_core::error::KnowledgeError;
use sentinel_core::knowledge::KnowledgeCategory;
use sentinel_data::{BincodeFileStore, KnowledgeStore};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_save_and_load_preserves_entries() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("knowledge.bin");
    let persistence = BincodeFileStore::new();

    let store = KnowledgeStore::new(16);
    store
        .add("editor", KnowledgeCategory::Preference, "helix")
        .unwrap();
    store
        .add("build", KnowledgeCategory::Procedure, "cargo build --release")
        .unwrap();
    store.get("editor").unwrap();
    store.update("build", "cargo build --locked").unwrap();
    store.save(&persistence, &path).unwrap();

    let restored = KnowledgeStore::new(16);
    assert_eq!(restored.load(&persistence, &path).unwrap(), 2);
    assert_eq!(restored.records(), store.records());
    assert_eq!(restored.get("build").unwrap(), "cargo build --locked");
}

#[test]
fn test_load_stops_at_capacity() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("knowledge.bin");
    let persistence = BincodeFileStore::new();

    let store = KnowledgeStore::new(10);
    for i in 0..10 {
        store
            .add(format!("k{i}"), KnowledgeCategory::Fact, "v")
            .unwrap();
    }
    store.save(&persistence, &path).unwrap();

    let small = KnowledgeStore::new(4);
    small.add("own", KnowledgeCategory::Fact, "v").unwrap();
    assert_eq!(small.load(&persistence, &path).unwrap(), 3);
    assert_eq!(small.len(), 4);
    assert!(small.get("k2").is_ok());
    assert!(small.get("k3").is_err());
}

#[test]
fn test_load_missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    let store = KnowledgeStore::new(4);
    let err = store
        .load(&BincodeFileStore::new(), &dir.path().join("absent.bin"))
        .unwrap_err();
    assert!(matches!(err, KnowledgeError::Io(_)));
    assert!(store.is_empty());
}

#[test]
fn test_load_garbage_is_decode_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("garbage.bin");
    fs::write(&path, [0xff; 3]).unwrap();

    let store = KnowledgeStore::new(4);
    let err = store.load(&BincodeFileStore::new(), &path).unwrap_err();
    assert!(matches!(err, KnowledgeError::Decode(_)));
}

#[test]
fn test_save_empty_store() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.bin");
    let persistence = BincodeFileStore::new();

    KnowledgeStore::new(4).save(&persistence, &path).unwrap();
    let restored = KnowledgeStore::new(4);
    assert_eq!(restored.load(&persistence, &path).unwrap(), 0);
}
