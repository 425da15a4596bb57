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

//! Binary file persistence for knowledge records.

use sentinel_core::error::KnowledgeError;
use sentinel_core::knowledge::{KnowledgePersistence, KnowledgeRecord};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

const FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
struct KnowledgeFileRef<'a> {
    version: u32,
    records: &'a [KnowledgeRecord],
}

#[derive(Deserialize)]
struct KnowledgeFile {
    version: u32,
    records: Vec<KnowledgeRecord>,
}

/// Stores knowledge records in a single bincode-encoded file.
#[derive(Debug, Clone, Copy, Default)]
pub struct BincodeFileStore;

impl BincodeFileStore {
    /// Creates the store.
    pub fn new() -> Self {
        Self
    }
}

impl KnowledgePersistence for BincodeFileStore {
    fn save(&self, destination: &Path, records: &[KnowledgeRecord]) -> Result<(), KnowledgeError> {
        let mut writer = BufWriter::new(File::create(destination)?);
        let file = KnowledgeFileRef {
            version: FORMAT_VERSION,
            records,
        };
        bincode::serde::encode_into_std_write(&file, &mut writer, bincode::config::standard())
            .map_err(|e| KnowledgeError::Encode(e.to_string()))?;
        writer.flush()?;
        Ok(())
    }

    fn load(&self, source: &Path) -> Result<Vec<KnowledgeRecord>, KnowledgeError> {
        let mut reader = BufReader::new(File::open(source)?);
        let file: KnowledgeFile =
            bincode::serde::decode_from_std_read(&mut reader, bincode::config::standard())
                .map_err(|e| KnowledgeError::Decode(e.to_string()))?;
        if file.version != FORMAT_VERSION {
            return Err(KnowledgeError::Decode(format!(
                "unsupported format version {}",
                file.version
            )));
        }
        Ok(file.records)
    }
}
