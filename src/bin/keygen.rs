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

//! Create (or read back) the Ed25519 key under a data directory and print
//! the account it maps to. Honors `AUTODNS_KEY_PASSPHRASE` for at-rest
//! encryption.

use anyhow::Result;
use autodns::core::security::keystore::Keystore;

fn main() -> Result<()> {
    let data_dir = std::env::args().nth(1).unwrap_or_else(|| "data".to_string());
    std::fs::create_dir_all(&data_dir)?;

    let ks = Keystore::open(&data_dir)?;
    let account = ks.account();
    println!("account: {account}");
    println!("hex:     {}", account.to_hex());
    Ok(())
}
