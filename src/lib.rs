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

//! AutoDNS - a single-owner domain-name record engine with ledger semantics.
//!
//! This repository provides:
//! - Deterministic wire types & canonical encoding
//! - A hierarchical record store with suffix-fallback resolution
//! - Subdomain delegation and owner-gated mutation with a terminal lifecycle
//! - Durable snapshots on sled, committed before receipts are issued
//! - A signed-envelope HTTP gateway plus Prometheus metrics

/// Core engine (wire types, contract state, dispatch, persistence, keys).
pub mod core;
/// Node ingress (signed envelopes over HTTP).
pub mod gateway;
/// Observability (Prometheus metrics).
pub mod monitoring;
