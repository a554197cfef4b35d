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

//! Subdomain registry: flat label→owner delegation map.
//!
//! Labels are single dot-free path components. Lookups carry no fallback
//! semantics; a label is either delegated or it is not.

use crate::core::types::AccountId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Delegation map keyed by label. Deterministic ordering.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubdomainRegistry {
    /// One owner per label; re-registration overwrites silently.
    pub delegations: BTreeMap<String, AccountId>,
}

impl SubdomainRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store or overwrite the delegation for `label`.
    pub fn register(&mut self, label: String, owner: AccountId) {
        self.delegations.insert(label, owner);
    }

    /// Flat lookup of the delegated owner.
    pub fn owner_of(&self, label: &str) -> Option<&AccountId> {
        self.delegations.get(label)
    }

    /// Number of delegated labels.
    pub fn len(&self) -> usize {
        self.delegations.len()
    }

    /// True if nothing is delegated.
    pub fn is_empty(&self) -> bool {
        self.delegations.is_empty()
    }
}
