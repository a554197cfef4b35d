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

use autodns::core::dns::contract::{AutoDns, ContractError, Phase};
use autodns::core::state::store::ContractStore;
use autodns::core::types::{AccountId, MAX_DELEGATIONS, MAX_RECORDS, MAX_RECORD_PAYLOAD};

fn acct(b: u8) -> AccountId {
    AccountId::from_bytes([b; 32])
}

#[test]
fn fresh_store_loads_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = ContractStore::open(dir.path().to_str().unwrap()).expect("open");
    assert!(store.load().expect("load").is_none());
}

#[test]
fn snapshot_survives_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().to_str().unwrap().to_string();

    let mut contract =
        AutoDns::construct(acct(1), "alpha.ton".to_string(), 100).expect("construct");
    contract
        .set_record(&acct(1), "api.alpha.ton", 1, b"addr".to_vec(), 10)
        .expect("set");
    contract
        .register_subdomain(&acct(1), "mail", acct(9), 20)
        .expect("register");

    {
        let store = ContractStore::open(&path).expect("open");
        store.commit(&contract, 2).expect("commit");
    }

    let store = ContractStore::open(&path).expect("reopen");
    let (loaded, seq) = store.load().expect("load").expect("present");
    assert_eq!(loaded, contract);
    assert_eq!(seq, 2);
    assert_eq!(
        loaded.resolve_record("deep.api.alpha.ton").expect("resolves").payload,
        b"addr".to_vec()
    );
}

#[test]
fn later_commit_replaces_earlier_snapshot() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().to_str().unwrap().to_string();
    let store = ContractStore::open(&path).expect("open");

    let mut contract =
        AutoDns::construct(acct(1), "alpha.ton".to_string(), 0).expect("construct");
    store.commit(&contract, 0).expect("initial commit");

    contract
        .set_record(&acct(1), "api.alpha.ton", 5, b"v2".to_vec(), 30)
        .expect("set");
    store.commit(&contract, 1).expect("second commit");

    let (loaded, seq) = store.load().expect("load").expect("present");
    assert_eq!(seq, 1);
    assert_eq!(loaded.records().len(), 1);
    let rec = loaded.records().get_exact("api.alpha.ton").expect("present");
    assert_eq!(rec.category, 5);
    assert_eq!(rec.payload, b"v2".to_vec());
}

// The largest state reachable through accepted messages: every record slot
// taken at the payload cap, every delegation slot taken. It must commit, and
// a reopened store must read it back whole.
#[test]
fn state_grown_to_capacity_commits_and_reloads() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().to_str().unwrap().to_string();
    let store = ContractStore::open(&path).expect("open");

    let owner = acct(1);
    let mut contract =
        AutoDns::construct(owner, "alpha.ton".to_string(), 100).expect("construct");
    let payload = vec![0xAB; MAX_RECORD_PAYLOAD];
    for i in 0..MAX_RECORDS {
        contract
            .set_record(&owner, &format!("n{i}.alpha.ton"), 1, payload.clone(), 10)
            .expect("under record cap");
    }
    for i in 0..MAX_DELEGATIONS {
        contract
            .register_subdomain(&owner, &format!("s{i}"), acct(9), 10)
            .expect("under delegation cap");
    }

    // Growth past capacity is refused before any write.
    assert_eq!(
        contract.set_record(&owner, "over.alpha.ton", 1, payload.clone(), 11),
        Err(ContractError::Full)
    );
    assert_eq!(
        contract.register_subdomain(&owner, "overflow", acct(9), 11),
        Err(ContractError::Full)
    );

    let seq = (MAX_RECORDS + MAX_DELEGATIONS) as u64;
    store.commit(&contract, seq).expect("commit at capacity");
    drop(store);

    let store = ContractStore::open(&path).expect("reopen");
    let (loaded, loaded_seq) = store.load().expect("load").expect("present");
    assert_eq!(loaded, contract);
    assert_eq!(loaded_seq, seq);
    assert_eq!(loaded.records().len(), MAX_RECORDS);
    assert_eq!(loaded.subdomains().len(), MAX_DELEGATIONS);
}

#[test]
fn terminated_state_reloads_terminated() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().to_str().unwrap().to_string();
    let store = ContractStore::open(&path).expect("open");

    let mut contract =
        AutoDns::construct(acct(1), "alpha.ton".to_string(), 75).expect("construct");
    let flushed = contract.terminate(&acct(1), 0, 40).expect("terminate");
    assert_eq!(flushed, 75);
    store.commit(&contract, 3).expect("commit");

    let (loaded, _) = store.load().expect("load").expect("present");
    assert_eq!(loaded.phase(), Phase::Terminated);
    assert_eq!(loaded.balance(), 0);
    assert_eq!(loaded.last_update(), 40);
}
