// Copyright (c) 2026 AutoDNS
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//     http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

//! Record store: name→(category, payload) map with hierarchical resolution.
//!
//! Resolution walks from the most-specific name to the least-specific one,
//! dropping the leftmost label at each step: `a.b.c` → `b.c` → `c`. The first
//! exact hit wins; running out of dots yields no record.

use crate::core::types::Record;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Record map keyed by full dot-separated name. Deterministic ordering.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordStore {
    /// Stored records. One record per exact key, last write wins.
    pub records: BTreeMap<String, Record>,
}

impl RecordStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the record at `key`. Content-agnostic.
    pub fn set(&mut self, key: String, category: u64, payload: Vec<u8>) {
        self.records.insert(key, Record { category, payload });
    }

    /// Exact lookup, no fallback.
    pub fn get_exact(&self, key: &str) -> Option<&Record> {
        self.records.get(key)
    }

    /// Hierarchical lookup: exact match first, then each proper dot-suffix in
    /// order of decreasing specificity. Never mutates the store.
    pub fn resolve(&self, key: &str) -> Option<&Record> {
        let mut cur = key;
        loop {
            if let Some(r) = self.records.get(cur) {
                return Some(r);
            }
            match cur.find('.') {
                Some(i) => cur = &cur[i + 1..],
                None => return None,
            }
        }
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if no records are stored.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
