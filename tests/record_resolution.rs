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

use autodns::core::dns::records::RecordStore;

#[test]
fn exact_match_wins_over_ancestors() {
    let mut store = RecordStore::new();
    store.set("alpha.ton".to_string(), 1, b"root".to_vec());
    store.set("api.alpha.ton".to_string(), 1, b"api".to_vec());

    let rec = store.resolve("api.alpha.ton").expect("resolves");
    assert_eq!(rec.payload, b"api".to_vec());

    // The less specific name still resolves to its own record.
    let rec = store.resolve("alpha.ton").expect("resolves");
    assert_eq!(rec.payload, b"root".to_vec());
}

#[test]
fn suffix_fallback_drops_leftmost_labels() {
    let mut store = RecordStore::new();
    store.set("alpha.ton".to_string(), 7, b"site".to_vec());

    // svc.api.alpha.ton -> api.alpha.ton -> alpha.ton (hit)
    let rec = store.resolve("svc.api.alpha.ton").expect("falls back");
    assert_eq!(rec.category, 7);
    assert_eq!(rec.payload, b"site".to_vec());
}

#[test]
fn fallback_prefers_most_specific_ancestor() {
    let mut store = RecordStore::new();
    store.set("ton".to_string(), 1, b"tld".to_vec());
    store.set("alpha.ton".to_string(), 1, b"mid".to_vec());

    let rec = store.resolve("deep.api.alpha.ton").expect("resolves");
    assert_eq!(rec.payload, b"mid".to_vec());
}

#[test]
fn miss_when_no_suffix_matches() {
    let mut store = RecordStore::new();
    store.set("alpha.ton".to_string(), 1, b"x".to_vec());

    assert!(store.resolve("beta.net").is_none());
    assert!(store.resolve("ton").is_none());
    assert!(store.resolve("alpha").is_none());
}

#[test]
fn empty_store_resolves_nothing() {
    let store = RecordStore::new();
    assert!(store.resolve("anything.at.all").is_none());
    assert!(store.is_empty());
}

#[test]
fn overwrite_is_idempotent_and_in_place() {
    let mut store = RecordStore::new();
    store.set("alpha.ton".to_string(), 1, b"old".to_vec());
    store.set("alpha.ton".to_string(), 2, b"new".to_vec());
    store.set("alpha.ton".to_string(), 2, b"new".to_vec());

    assert_eq!(store.len(), 1);
    let rec = store.get_exact("alpha.ton").expect("present");
    assert_eq!(rec.category, 2);
    assert_eq!(rec.payload, b"new".to_vec());
}

#[test]
fn keys_with_unusual_shapes_are_stored_verbatim() {
    let mut store = RecordStore::new();
    // Keys are opaque dot-separated names; the store does not normalize.
    store.set("UPPER.ton".to_string(), 1, b"a".to_vec());
    assert!(store.resolve("upper.ton").is_none());
    assert!(store.resolve("UPPER.ton").is_some());

    // A leading empty label still walks to the suffix.
    store.set("x.y".to_string(), 1, b"b".to_vec());
    assert!(store.resolve(".x.y").is_some());
}
