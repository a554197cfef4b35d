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

//! Deterministic core types, canonical encoding, and the operation wire format.

use bincode::Options;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Hard cap on a single inbound message body (host single-message limit).
pub const MAX_MESSAGE_BYTES: usize = 64 * 1024;

/// Cap on a stored record payload. Payloads are opaque; only their size is checked.
pub const MAX_RECORD_PAYLOAD: usize = 16 * 1024;

/// Cap on distinct record keys. Together with the key and payload caps this
/// keeps the worst-case encoded snapshot well inside the ledger's reload cap.
pub const MAX_RECORDS: usize = 2 * 1024;

/// Cap on delegated subdomain labels, part of the same snapshot bound.
pub const MAX_DELEGATIONS: usize = 8 * 1024;

/// Operation tag: register a subdomain label to an owner.
pub const OP_REGISTER_SUBDOMAIN: u32 = 0x1234_5678;
/// Operation tag: insert or overwrite a record.
pub const OP_UPDATE_RECORD: u32 = 0x2345_6789;
/// Operation tag: replace the contract owner.
pub const OP_TRANSFER_OWNERSHIP: u32 = 0x3456_7890;
/// Operation tag: flush balance to the owner and stop.
pub const OP_TERMINATE: u32 = 0x5445_5220;
/// Operation tag: acknowledged top-up, credits attached value only.
pub const OP_FUND: u32 = 0x946a_98b6;

/// Canonical serialization error.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("serialization")]
    Serialize,
    #[error("deserialization")]
    Deserialize,
    #[error("size limit exceeded")]
    TooLarge,
    #[error("unknown operation tag")]
    UnknownTag,
}

/// Canonical bincode options (deterministic).
fn bincode_opts() -> impl Options {
    // Fixint encoding keeps integer widths stable across versions.
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .reject_trailing_bytes()
}

/// Encode with deterministic rules. Containers must have a deterministic order
/// (BTreeMap/BTreeSet), which every persisted type here uses.
pub fn encode_canonical<T: Serialize>(v: &T) -> Result<Vec<u8>, CodecError> {
    bincode_opts()
        .serialize(v)
        .map_err(|_| CodecError::Serialize)
}

/// Decode with a hard size cap on both the wire bytes and the deserializer.
pub fn decode_canonical_limited<T: DeserializeOwned>(
    bytes: &[u8],
    max: usize,
) -> Result<T, CodecError> {
    if bytes.len() > max {
        return Err(CodecError::TooLarge);
    }
    // The inner limit guards against length-prefix bombs inside containers.
    bincode_opts()
        .with_limit(max as u64)
        .deserialize(bytes)
        .map_err(|_| CodecError::Deserialize)
}

/// Opaque account identifier (32 bytes).
///
/// The engine never inspects these beyond equality; producers outside the core
/// derive them from Ed25519 public keys. Text form is base58, hex accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AccountId(pub [u8; 32]);

impl AccountId {
    /// Construct from raw bytes.
    pub fn from_bytes(b: [u8; 32]) -> Self {
        Self(b)
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Base58 text form.
    pub fn to_base58(&self) -> String {
        bs58::encode(&self.0).into_string()
    }

    /// Hex text form.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base58())
    }
}

/// Account identifier parse error.
#[derive(Debug, Error)]
#[error("invalid account identifier")]
pub struct ParseAccountIdError;

impl FromStr for AccountId {
    type Err = ParseAccountIdError;

    /// Accepts base58 or 64-char hex.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(bytes) = bs58::decode(s).into_vec() {
            if bytes.len() == 32 {
                let mut out = [0u8; 32];
                out.copy_from_slice(&bytes);
                return Ok(Self(out));
            }
        }
        if let Ok(bytes) = hex::decode(s) {
            if bytes.len() == 32 {
                let mut out = [0u8; 32];
                out.copy_from_slice(&bytes);
                return Ok(Self(out));
            }
        }
        Err(ParseAccountIdError)
    }
}

/// Stored record value: an opaque payload under an unsigned category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Caller-chosen category. Not interpreted.
    pub category: u64,
    /// Opaque payload, bounded by [`MAX_RECORD_PAYLOAD`].
    pub payload: Vec<u8>,
}

/// Register-subdomain operation body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterSubdomain {
    /// Single dot-free label.
    pub label: String,
    /// Delegated owner identifier.
    pub owner: AccountId,
}

/// Update-record operation body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateRecord {
    /// Full dot-separated name.
    pub key: String,
    /// Record category.
    pub category: u64,
    /// Opaque record payload.
    pub payload: Vec<u8>,
}

/// Transfer-ownership operation body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferOwnership {
    /// Identifier that becomes the sole owner on success.
    pub new_owner: AccountId,
}

/// Fund (top-up acknowledgment) operation body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fund {
    /// Caller correlation id, echoed in logs only.
    pub query_id: u64,
}

/// A decoded inbound operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operation {
    /// Delegate a subdomain label (owner-gated).
    RegisterSubdomain(RegisterSubdomain),
    /// Insert/overwrite a record (owner-gated).
    UpdateRecord(UpdateRecord),
    /// Replace the owner (owner-gated).
    TransferOwnership(TransferOwnership),
    /// Flush balance and stop (owner-gated).
    Terminate,
    /// Credit attached value (ungated).
    Fund(Fund),
}

impl Operation {
    /// The 32-bit wire tag for this operation.
    pub fn tag(&self) -> u32 {
        match self {
            Operation::RegisterSubdomain(_) => OP_REGISTER_SUBDOMAIN,
            Operation::UpdateRecord(_) => OP_UPDATE_RECORD,
            Operation::TransferOwnership(_) => OP_TRANSFER_OWNERSHIP,
            Operation::Terminate => OP_TERMINATE,
            Operation::Fund(_) => OP_FUND,
        }
    }
}

/// Encode an operation as `tag(4, BE) || canonical body`.
pub fn encode_operation(op: &Operation) -> Result<Vec<u8>, CodecError> {
    let mut out = op.tag().to_be_bytes().to_vec();
    match op {
        Operation::RegisterSubdomain(b) => out.extend_from_slice(&encode_canonical(b)?),
        Operation::UpdateRecord(b) => out.extend_from_slice(&encode_canonical(b)?),
        Operation::TransferOwnership(b) => out.extend_from_slice(&encode_canonical(b)?),
        Operation::Terminate => {}
        Operation::Fund(b) => out.extend_from_slice(&encode_canonical(b)?),
    }
    if out.len() > MAX_MESSAGE_BYTES {
        return Err(CodecError::TooLarge);
    }
    Ok(out)
}

/// Decode an operation from wire bytes.
///
/// Unknown tags, truncated bodies, and trailing bytes are all decode errors.
/// Empty bodies are not operations; callers treat them as plain transfers
/// before reaching this function.
pub fn decode_operation(bytes: &[u8]) -> Result<Operation, CodecError> {
    if bytes.len() > MAX_MESSAGE_BYTES {
        return Err(CodecError::TooLarge);
    }
    if bytes.len() < 4 {
        return Err(CodecError::Deserialize);
    }
    let mut tag_bytes = [0u8; 4];
    tag_bytes.copy_from_slice(&bytes[..4]);
    let tag = u32::from_be_bytes(tag_bytes);
    let rest = &bytes[4..];

    match tag {
        OP_REGISTER_SUBDOMAIN => Ok(Operation::RegisterSubdomain(decode_canonical_limited(
            rest,
            MAX_MESSAGE_BYTES,
        )?)),
        OP_UPDATE_RECORD => Ok(Operation::UpdateRecord(decode_canonical_limited(
            rest,
            MAX_MESSAGE_BYTES,
        )?)),
        OP_TRANSFER_OWNERSHIP => Ok(Operation::TransferOwnership(decode_canonical_limited(
            rest,
            MAX_MESSAGE_BYTES,
        )?)),
        OP_TERMINATE => {
            // No body; trailing bytes are malformed.
            decode_canonical_limited::<()>(rest, MAX_MESSAGE_BYTES)?;
            Ok(Operation::Terminate)
        }
        OP_FUND => Ok(Operation::Fund(decode_canonical_limited(
            rest,
            MAX_MESSAGE_BYTES,
        )?)),
        _ => Err(CodecError::UnknownTag),
    }
}

/// Node configuration root.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Node settings.
    pub node: NodeSettings,
    /// HTTP endpoint.
    pub http: HttpConfig,
    /// Contract construction parameters.
    pub contract: ContractConfig,
}

/// Node settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeSettings {
    /// Human-readable name.
    pub name: String,
    /// Data directory (sled ledger + keys).
    pub data_dir: String,
}

fn default_require_signatures() -> bool {
    cfg!(feature = "production")
}

/// HTTP config.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Listen address, e.g. 0.0.0.0:9090.
    pub listen_addr: String,
    /// Reject unsigned envelopes. Defaults on for production builds; dev
    /// builds may accept unsigned envelopes for local testing.
    #[serde(default = "default_require_signatures")]
    pub require_signatures: bool,
}

/// Contract construction parameters, used only when the ledger is empty.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContractConfig {
    /// Root domain, immutable after construction.
    pub domain: String,
    /// Initial owner identifier (base58 or hex). When omitted, the node's
    /// own keystore account becomes the owner.
    #[serde(default)]
    pub owner: Option<String>,
    /// Initial balance in nano-units. TOML integers cap this at i64 range,
    /// which is ample for a construction-time balance.
    #[serde(default)]
    pub initial_balance: u64,
}
