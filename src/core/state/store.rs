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
#![warn(missing_docs)]

//! Durable contract state using sled. The full contract snapshot and the
//! accepted-message sequence number commit in one transaction, so a reload
//! always observes a state produced by a whole message, never half of one.

use crate::core::dns::contract::AutoDns;
use crate::core::types::{decode_canonical_limited, encode_canonical};
use sled::transaction::TransactionError;
use thiserror::Error;

const K_FORMAT: &[u8] = b"format/version";
const K_STATE: &[u8] = b"contract/state";
const K_SEQ: &[u8] = b"contract/seq";

const FORMAT_VERSION: u32 = 1;

/// Cap on a stored snapshot, enforced on both sides: `commit` refuses to
/// write more than `load` will read back.
pub const MAX_STATE_BYTES: usize = 64 * 1024 * 1024;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("db open")]
    DbOpen,
    #[error("db io")]
    DbIo,
    #[error("tx conflict")]
    TxConflict,
    #[error("state codec")]
    Codec,
    #[error("snapshot too large")]
    TooLarge,
    #[error("unsupported format version")]
    Format,
}

/// Persistent store wrapper.
#[derive(Clone)]
pub struct ContractStore {
    db: sled::Db,
}

impl ContractStore {
    /// Open the sled DB at `path` (directory). Stamps a fresh DB with the
    /// current format version and refuses one stamped with any other.
    pub fn open(path: &str) -> Result<Self, StateError> {
        let db = sled::open(path).map_err(|_| StateError::DbOpen)?;
        match db.get(K_FORMAT).map_err(|_| StateError::DbIo)? {
            Some(v) if *v == FORMAT_VERSION.to_be_bytes() => {}
            Some(_) => return Err(StateError::Format),
            None => {
                let stamp = FORMAT_VERSION.to_be_bytes();
                db.insert(K_FORMAT, &stamp[..]).map_err(|_| StateError::DbIo)?;
            }
        }
        Ok(Self { db })
    }

    /// Load the stored contract and sequence number, if any.
    pub fn load(&self) -> Result<Option<(AutoDns, u64)>, StateError> {
        let Some(raw) = self.db.get(K_STATE).map_err(|_| StateError::DbIo)? else {
            return Ok(None);
        };
        let contract: AutoDns =
            decode_canonical_limited(&raw, MAX_STATE_BYTES).map_err(|_| StateError::Codec)?;
        let seq = match self.db.get(K_SEQ).map_err(|_| StateError::DbIo)? {
            Some(v) => {
                let arr: [u8; 8] = v.as_ref().try_into().map_err(|_| StateError::Codec)?;
                u64::from_be_bytes(arr)
            }
            None => 0,
        };
        Ok(Some((contract, seq)))
    }

    /// Commit a snapshot and its sequence number atomically, then flush.
    /// A snapshot past [`MAX_STATE_BYTES`] is refused before anything is
    /// written, so every committed state stays loadable.
    pub fn commit(&self, contract: &AutoDns, seq: u64) -> Result<(), StateError> {
        let state_bytes = encode_canonical(contract).map_err(|_| StateError::Codec)?;
        if state_bytes.len() > MAX_STATE_BYTES {
            return Err(StateError::TooLarge);
        }
        let seq_bytes = seq.to_be_bytes();
        self.db
            .transaction(|t| {
                t.insert(K_STATE, state_bytes.as_slice())?;
                t.insert(K_SEQ, &seq_bytes[..])?;
                Ok(())
            })
            .map_err(|e: TransactionError<()>| match e {
                TransactionError::Abort(()) => StateError::TxConflict,
                TransactionError::Storage(_) => StateError::DbIo,
            })?;
        self.db.flush().map_err(|_| StateError::DbIo)?;
        Ok(())
    }
}
