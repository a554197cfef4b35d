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

//! Signed message envelopes.
//!
//! An envelope carries one wire message plus everything the gateway needs to
//! attribute it: the sender's Ed25519 public key, the attached value, an
//! expiry for replay bounding, and a signature over all of it. The signature
//! binds the contract instance id, so an envelope minted for one deployment
//! cannot be replayed against another.

use crate::core::security::keystore::{verify_pubkey_bytes, Keystore, KeystoreError, SignerBackend};
use crate::core::types::{AccountId, MAX_MESSAGE_BYTES};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Domain separator for envelope signatures.
pub const ENVELOPE_DOMAIN_SEP: &[u8] = b"AutoDNS-Envelope-v1";

/// Longest acceptable distance between now and an envelope's expiry. Bounds
/// the replay window for a captured envelope.
pub const MAX_ENVELOPE_TTL_MS: u64 = 10 * 60 * 1000;

/// Envelope rejection reasons.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum EnvelopeError {
    /// A field failed hex or integer decoding.
    #[error("field encoding")]
    Field,
    /// Body exceeds the wire message cap.
    #[error("oversized body")]
    TooLarge,
    /// Expiry is in the past.
    #[error("expired")]
    Expired,
    /// Expiry is further ahead than the replay window allows.
    #[error("expiry too far ahead")]
    Window,
    /// Signature missing or failed verification.
    #[error("bad signature")]
    Signature,
}

/// The JSON form accepted on the wire. Byte fields are hex; `value` is a
/// decimal string because JSON numbers cannot carry a full u128.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SignedEnvelope {
    /// Sender's Ed25519 public key, hex (64 chars).
    pub sender_pubkey: String,
    /// Attached value in nano-units, decimal string.
    pub value: String,
    /// Expiry, milliseconds since epoch.
    pub expires_at_ms: u64,
    /// Message body, hex. Empty means a plain value transfer.
    #[serde(default)]
    pub body: String,
    /// Ed25519 signature over the signing bytes, hex.
    #[serde(default)]
    pub signature: String,
}

/// A decoded envelope ready for verification and dispatch.
#[derive(Clone, Debug)]
pub struct Envelope {
    /// Sender account (the public key bytes).
    pub sender: AccountId,
    /// Attached value in nano-units.
    pub value: u128,
    /// Expiry, milliseconds since epoch.
    pub expires_at_ms: u64,
    /// Raw message body.
    pub body: Vec<u8>,
    /// Signature bytes, possibly empty.
    pub signature: Vec<u8>,
}

/// The exact bytes an envelope signature covers.
pub fn signing_bytes(
    contract_id: &[u8; 32],
    value: u128,
    expires_at_ms: u64,
    body: &[u8],
) -> Vec<u8> {
    let mut out = Vec::with_capacity(ENVELOPE_DOMAIN_SEP.len() + 32 + 16 + 8 + body.len());
    out.extend_from_slice(ENVELOPE_DOMAIN_SEP);
    out.extend_from_slice(contract_id);
    out.extend_from_slice(&value.to_be_bytes());
    out.extend_from_slice(&expires_at_ms.to_be_bytes());
    out.extend_from_slice(body);
    out
}

impl SignedEnvelope {
    /// Decode the hex and integer fields.
    pub fn parse(&self) -> Result<Envelope, EnvelopeError> {
        let pk = hex::decode(&self.sender_pubkey).map_err(|_| EnvelopeError::Field)?;
        let pk: [u8; 32] = pk.as_slice().try_into().map_err(|_| EnvelopeError::Field)?;
        let value: u128 = self.value.trim().parse().map_err(|_| EnvelopeError::Field)?;
        let body = hex::decode(&self.body).map_err(|_| EnvelopeError::Field)?;
        if body.len() > MAX_MESSAGE_BYTES {
            return Err(EnvelopeError::TooLarge);
        }
        let signature = hex::decode(&self.signature).map_err(|_| EnvelopeError::Field)?;
        Ok(Envelope {
            sender: AccountId::from_bytes(pk),
            value,
            expires_at_ms: self.expires_at_ms,
            body,
            signature,
        })
    }

    /// Build and sign an envelope with a keystore key.
    pub fn seal<B: SignerBackend>(
        ks: &Keystore<B>,
        contract_id: &[u8; 32],
        value: u128,
        expires_at_ms: u64,
        body: &[u8],
    ) -> Result<Self, KeystoreError> {
        let sig = ks.sign(&signing_bytes(contract_id, value, expires_at_ms, body))?;
        Ok(Self {
            sender_pubkey: hex::encode(ks.public_key()),
            value: value.to_string(),
            expires_at_ms,
            body: hex::encode(body),
            signature: hex::encode(sig),
        })
    }
}

impl Envelope {
    /// Expiry gate: alive, and not postdated beyond the replay window.
    pub fn check_freshness(&self, now_ms: u64) -> Result<(), EnvelopeError> {
        if self.expires_at_ms <= now_ms {
            return Err(EnvelopeError::Expired);
        }
        if self.expires_at_ms > now_ms.saturating_add(MAX_ENVELOPE_TTL_MS) {
            return Err(EnvelopeError::Window);
        }
        Ok(())
    }

    /// Verify the signature against the sender key and instance id.
    pub fn verify(&self, contract_id: &[u8; 32]) -> Result<(), EnvelopeError> {
        let msg = signing_bytes(contract_id, self.value, self.expires_at_ms, &self.body);
        verify_pubkey_bytes(self.sender.as_bytes(), &msg, &self.signature)
            .map_err(|_| EnvelopeError::Signature)
    }
}
