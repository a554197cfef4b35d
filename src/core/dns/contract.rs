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

//! Contract state: single owner, immutable root domain, bounded record and
//! delegation stores, held balance, and the Active/Terminated lifecycle.
//!
//! Authorization is a single predicate (`caller == owner`) re-read from the
//! state field on every call and compared in constant time. Every mutating
//! entry point checks the lifecycle phase and then authorization before it
//! touches any state, so a rejected message can never leave a partial write.

use crate::core::dns::records::RecordStore;
use crate::core::dns::registry::SubdomainRegistry;
use crate::core::types::{AccountId, Record, MAX_DELEGATIONS, MAX_RECORDS, MAX_RECORD_PAYLOAD};
use ring::digest;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use thiserror::Error;

const INIT_DOMAIN_SEP: &[u8] = b"AutoDNS-Init-v1";

/// Rejection kinds. Status values follow the TVM/Tact standard exit codes so
/// receipts line up with what an on-chain explorer would show.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ContractError {
    /// Undecodable or structurally invalid operation.
    #[error("malformed operation")]
    Malformed,
    /// Caller is not the current owner.
    #[error("access denied")]
    Unauthorized,
    /// Message arrived after termination.
    #[error("contract stopped")]
    Stopped,
    /// A store is at capacity and the operation would add a new entry.
    #[error("state full")]
    Full,
}

impl ContractError {
    /// Non-zero wire status for this rejection.
    pub fn status(&self) -> u32 {
        match self {
            ContractError::Malformed => 130,
            ContractError::Unauthorized => 132,
            ContractError::Stopped => 133,
            // TVM cell overflow: the state would not fit.
            ContractError::Full => 8,
        }
    }
}

/// Lifecycle phase. `Terminated` is terminal and accepts no input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Accepting operations.
    Active,
    /// Self-destructed; every message is rejected.
    Terminated,
}

/// The domain-name contract state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoDns {
    /// Deterministic instance identity, fixed at construction.
    contract_id: [u8; 32],
    /// Sole authorized account. Mutated only by `transfer_ownership`.
    owner: AccountId,
    /// Root domain, immutable after construction.
    domain: String,
    /// Record store.
    records: RecordStore,
    /// Subdomain delegation registry.
    subdomains: SubdomainRegistry,
    /// Seconds since epoch of the last privileged mutation. Monotonic.
    last_update: u64,
    /// Held funds in nano-units.
    balance: u128,
    /// Lifecycle phase.
    phase: Phase,
}

/// Derive the instance identity from construction parameters.
pub fn contract_id(owner: &AccountId, domain: &str) -> [u8; 32] {
    let mut buf = Vec::with_capacity(INIT_DOMAIN_SEP.len() + 32 + domain.len());
    buf.extend_from_slice(INIT_DOMAIN_SEP);
    buf.extend_from_slice(owner.as_bytes());
    buf.extend_from_slice(domain.as_bytes());
    let d = digest::digest(&digest::SHA256, &buf);
    let mut out = [0u8; 32];
    out.copy_from_slice(d.as_ref());
    out
}

// Key and label length caps double the classic DNS limits (255-octet names,
// 63-octet labels) and bound the per-entry footprint of a snapshot.
fn valid_key(key: &str) -> bool {
    !key.is_empty() && key.len() <= 256
}

fn valid_label(label: &str) -> bool {
    !label.is_empty() && label.len() <= 128 && !label.contains('.')
}

impl AutoDns {
    /// Construct a fresh contract. Invoked once per instance; the host never
    /// re-runs construction for an existing ledger.
    pub fn construct(
        owner: AccountId,
        domain: String,
        initial_balance: u128,
    ) -> Result<Self, ContractError> {
        if !valid_key(&domain) {
            return Err(ContractError::Malformed);
        }
        let id = contract_id(&owner, &domain);
        Ok(Self {
            contract_id: id,
            owner,
            domain,
            records: RecordStore::new(),
            subdomains: SubdomainRegistry::new(),
            last_update: 0,
            balance: initial_balance,
            phase: Phase::Active,
        })
    }

    /// Instance identity.
    pub fn contract_id(&self) -> &[u8; 32] {
        &self.contract_id
    }

    /// Current owner.
    pub fn owner(&self) -> AccountId {
        self.owner
    }

    /// Root domain.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Held balance in nano-units.
    pub fn balance(&self) -> u128 {
        self.balance
    }

    /// Timestamp of the last privileged mutation (0 until the first one).
    pub fn last_update(&self) -> u64 {
        self.last_update
    }

    /// Record store view.
    pub fn records(&self) -> &RecordStore {
        &self.records
    }

    /// Delegation registry view.
    pub fn subdomains(&self) -> &SubdomainRegistry {
        &self.subdomains
    }

    /// Hierarchical record lookup. Side-effect-free.
    pub fn resolve_record(&self, key: &str) -> Option<&Record> {
        self.records.resolve(key)
    }

    /// Flat delegation lookup. Side-effect-free.
    pub fn subdomain_owner(&self, label: &str) -> Option<&AccountId> {
        self.subdomains.owner_of(label)
    }

    fn ensure_active(&self) -> Result<(), ContractError> {
        match self.phase {
            Phase::Active => Ok(()),
            Phase::Terminated => Err(ContractError::Stopped),
        }
    }

    /// The single authorization predicate: `caller == owner`, re-read from the
    /// live field, constant-time comparison.
    fn authorize(&self, caller: &AccountId) -> Result<(), ContractError> {
        if bool::from(caller.as_bytes().ct_eq(self.owner.as_bytes())) {
            Ok(())
        } else {
            Err(ContractError::Unauthorized)
        }
    }

    fn touch(&mut self, now: u64) {
        self.last_update = self.last_update.max(now);
    }

    /// Credit attached value. Valid only while active.
    pub fn credit(&mut self, value: u128) -> Result<(), ContractError> {
        self.ensure_active()?;
        self.balance = self.balance.saturating_add(value);
        Ok(())
    }

    /// Insert or overwrite a record. Owner-gated.
    pub fn set_record(
        &mut self,
        caller: &AccountId,
        key: &str,
        category: u64,
        payload: Vec<u8>,
        now: u64,
    ) -> Result<(), ContractError> {
        self.ensure_active()?;
        self.authorize(caller)?;
        if !valid_key(key) || payload.len() > MAX_RECORD_PAYLOAD {
            return Err(ContractError::Malformed);
        }
        // Overwrites never grow the store, so only new keys hit the cap.
        if self.records.get_exact(key).is_none() && self.records.len() >= MAX_RECORDS {
            return Err(ContractError::Full);
        }
        self.records.set(key.to_string(), category, payload);
        self.touch(now);
        Ok(())
    }

    /// Delegate a subdomain label. Owner-gated; labels must be dot-free.
    pub fn register_subdomain(
        &mut self,
        caller: &AccountId,
        label: &str,
        owner: AccountId,
        now: u64,
    ) -> Result<(), ContractError> {
        self.ensure_active()?;
        self.authorize(caller)?;
        if !valid_label(label) {
            return Err(ContractError::Malformed);
        }
        if self.subdomains.owner_of(label).is_none() && self.subdomains.len() >= MAX_DELEGATIONS {
            return Err(ContractError::Full);
        }
        self.subdomains.register(label.to_string(), owner);
        self.touch(now);
        Ok(())
    }

    /// Replace the owner. The previous owner loses authorization immediately.
    pub fn transfer_ownership(
        &mut self,
        caller: &AccountId,
        new_owner: AccountId,
        now: u64,
    ) -> Result<(), ContractError> {
        self.ensure_active()?;
        self.authorize(caller)?;
        self.owner = new_owner;
        self.touch(now);
        Ok(())
    }

    /// Flush the held balance (plus the message's attached value) to the owner
    /// and enter the terminal phase. Returns the flushed amount; the recipient
    /// is the owner, which terminate does not change.
    ///
    /// A second terminate is unreachable: the phase gate rejects every message
    /// once terminated, so the balance cannot be flushed twice.
    pub fn terminate(
        &mut self,
        caller: &AccountId,
        attached_value: u128,
        now: u64,
    ) -> Result<u128, ContractError> {
        self.ensure_active()?;
        self.authorize(caller)?;
        let amount = self.balance.saturating_add(attached_value);
        self.balance = 0;
        self.phase = Phase::Terminated;
        self.touch(now);
        Ok(amount)
    }
}
