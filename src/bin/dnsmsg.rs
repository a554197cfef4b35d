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

//! Offline envelope builder. Signs one message with the key under a data
//! directory and prints the JSON envelope for `POST /v1/message`.
//!
//! ```text
//! dnsmsg <data_dir> <contract_id_hex> transfer       <value>
//! dnsmsg <data_dir> <contract_id_hex> fund           <value> <query_id>
//! dnsmsg <data_dir> <contract_id_hex> update         <value> <key> <category> <payload_hex>
//! dnsmsg <data_dir> <contract_id_hex> register       <value> <label> <owner>
//! dnsmsg <data_dir> <contract_id_hex> transfer-owner <value> <new_owner>
//! dnsmsg <data_dir> <contract_id_hex> terminate      <value>
//! ```
//!
//! Expiry is now + `AUTODNS_MSG_TTL_MS` (default 120000).

use anyhow::{bail, Result};
use autodns::core::security::keystore::Keystore;
use autodns::core::types::{
    encode_operation, AccountId, Fund, Operation, RegisterSubdomain, TransferOwnership,
    UpdateRecord,
};
use autodns::gateway::envelope::SignedEnvelope;
use std::time::{SystemTime, UNIX_EPOCH};

const DEFAULT_TTL_MS: u64 = 120_000;

fn usage() -> ! {
    eprintln!("usage: dnsmsg <data_dir> <contract_id_hex> <command> [args...]");
    eprintln!("commands: transfer fund update register transfer-owner terminate");
    std::process::exit(2);
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn parse_contract_id(s: &str) -> Result<[u8; 32]> {
    let bytes = hex::decode(s.trim())?;
    match <[u8; 32]>::try_from(bytes.as_slice()) {
        Ok(id) => Ok(id),
        Err(_) => bail!("contract id must be 32 bytes of hex"),
    }
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 3 {
        usage();
    }
    let data_dir = &args[0];
    let contract_id = parse_contract_id(&args[1])?;
    let cmd = args[2].as_str();
    let rest = &args[3..];

    let (value, body): (u128, Vec<u8>) = match (cmd, rest) {
        ("transfer", [value]) => (value.parse()?, Vec::new()),
        ("fund", [value, query_id]) => {
            let op = Operation::Fund(Fund {
                query_id: query_id.parse()?,
            });
            (value.parse()?, encode_operation(&op)?)
        }
        ("update", [value, key, category, payload_hex]) => {
            let op = Operation::UpdateRecord(UpdateRecord {
                key: key.clone(),
                category: category.parse()?,
                payload: hex::decode(payload_hex)?,
            });
            (value.parse()?, encode_operation(&op)?)
        }
        ("register", [value, label, owner]) => {
            let op = Operation::RegisterSubdomain(RegisterSubdomain {
                label: label.clone(),
                owner: owner.parse::<AccountId>()?,
            });
            (value.parse()?, encode_operation(&op)?)
        }
        ("transfer-owner", [value, new_owner]) => {
            let op = Operation::TransferOwnership(TransferOwnership {
                new_owner: new_owner.parse::<AccountId>()?,
            });
            (value.parse()?, encode_operation(&op)?)
        }
        ("terminate", [value]) => (value.parse()?, encode_operation(&Operation::Terminate)?),
        _ => usage(),
    };

    let ttl_ms = std::env::var("AUTODNS_MSG_TTL_MS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(DEFAULT_TTL_MS);
    let expires_at_ms = now_ms().saturating_add(ttl_ms);

    let ks = Keystore::open(data_dir)?;
    let envelope = SignedEnvelope::seal(&ks, &contract_id, value, expires_at_ms, &body)?;
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}
