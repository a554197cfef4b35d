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

//! Message dispatcher: routes a decoded inbound message to the matching
//! contract entry point and reports the resulting effect.
//!
//! Rejection order: a terminated contract rejects every message before the
//! tag is even read, an undecodable body is malformed, authorization is
//! checked before operand shape, and store capacity is the last gate before
//! any write. Attached value is credited only when the operation is accepted;
//! a rejected message leaves the balance untouched.

use crate::core::dns::contract::{AutoDns, ContractError, Phase};
use crate::core::types::{decode_operation, AccountId, Operation};

/// What an accepted message did. Carries enough for receipts and metrics;
/// `Terminated` is the only variant with an outbound payment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Empty-body value transfer absorbed into the balance.
    Transfer,
    /// Explicit funding message absorbed, query id echoed back.
    Funded {
        /// Correlation id from the funding body.
        query_id: u64,
    },
    /// Record inserted or overwritten.
    RecordSet {
        /// The key that was written.
        key: String,
    },
    /// Subdomain label delegated.
    SubdomainRegistered {
        /// The label that was delegated.
        label: String,
    },
    /// Ownership replaced.
    OwnershipTransferred {
        /// The account that now holds sole authority.
        new_owner: AccountId,
    },
    /// Contract terminated and its funds flushed.
    Terminated {
        /// Recipient of the flush (the owner at termination time).
        to: AccountId,
        /// Flushed amount: held balance plus the message's attached value.
        amount: u128,
    },
}

impl Effect {
    /// Stable lowercase label, used for receipts and metric partitioning.
    pub fn label(&self) -> &'static str {
        match self {
            Effect::Transfer => "transfer",
            Effect::Funded { .. } => "fund",
            Effect::RecordSet { .. } => "update_record",
            Effect::SubdomainRegistered { .. } => "register_subdomain",
            Effect::OwnershipTransferred { .. } => "transfer_ownership",
            Effect::Terminated { .. } => "terminate",
        }
    }
}

/// Apply one inbound message to the contract.
///
/// `value` is the attached amount in nano-units and `now` is the host clock
/// in seconds. An empty `body` is a plain transfer and is accepted from any
/// sender while the contract is active.
pub fn dispatch(
    contract: &mut AutoDns,
    sender: &AccountId,
    value: u128,
    body: &[u8],
    now: u64,
) -> Result<Effect, ContractError> {
    // A flushed contract accepts nothing; the tag is never inspected.
    if contract.phase() == Phase::Terminated {
        return Err(ContractError::Stopped);
    }

    if body.is_empty() {
        contract.credit(value)?;
        return Ok(Effect::Transfer);
    }

    let op = decode_operation(body).map_err(|_| ContractError::Malformed)?;
    match op {
        Operation::Fund(fund) => {
            contract.credit(value)?;
            Ok(Effect::Funded {
                query_id: fund.query_id,
            })
        }
        Operation::RegisterSubdomain(reg) => {
            contract.register_subdomain(sender, &reg.label, reg.owner, now)?;
            contract.credit(value)?;
            Ok(Effect::SubdomainRegistered { label: reg.label })
        }
        Operation::UpdateRecord(upd) => {
            contract.set_record(sender, &upd.key, upd.category, upd.payload, now)?;
            contract.credit(value)?;
            Ok(Effect::RecordSet { key: upd.key })
        }
        Operation::TransferOwnership(xfer) => {
            contract.transfer_ownership(sender, xfer.new_owner, now)?;
            contract.credit(value)?;
            Ok(Effect::OwnershipTransferred {
                new_owner: xfer.new_owner,
            })
        }
        Operation::Terminate => {
            // The flush target is the owner at the moment of termination;
            // attached value rides along instead of being credited first.
            let to = contract.owner();
            let amount = contract.terminate(sender, value, now)?;
            Ok(Effect::Terminated { to, amount })
        }
    }
}
