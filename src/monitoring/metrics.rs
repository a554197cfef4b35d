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

use prometheus::{IntCounter, IntGauge, Registry};
use thiserror::Error;

/// Metrics errors.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("prometheus")]
    Prom,
}

/// Metrics container.
#[derive(Clone)]
pub struct Metrics {
    /// Registry.
    pub registry: Registry,

    /// All inbound messages, accepted or not.
    pub messages_total: IntCounter,
    /// Accepted messages.
    pub messages_accepted_total: IntCounter,
    /// Messages rejected by the contract.
    pub messages_rejected_total: IntCounter,
    /// Envelopes dropped before dispatch (bad encoding, expiry, signature).
    pub envelopes_invalid_total: IntCounter,

    /// Record lookups served.
    pub resolves_total: IntCounter,
    /// Record lookups that found nothing.
    pub resolve_misses_total: IntCounter,

    /// Stored records gauge.
    pub records: IntGauge,
    /// Delegated subdomains gauge.
    pub subdomains: IntGauge,
    /// Accepted-message sequence number gauge.
    pub message_seq: IntGauge,
}

impl Metrics {
    /// Create and register metrics.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let messages_total = IntCounter::new("autodns_messages_total", "Inbound messages")
            .map_err(|_| MetricsError::Prom)?;
        let messages_accepted_total =
            IntCounter::new("autodns_messages_accepted_total", "Accepted messages")
                .map_err(|_| MetricsError::Prom)?;
        let messages_rejected_total =
            IntCounter::new("autodns_messages_rejected_total", "Rejected messages")
                .map_err(|_| MetricsError::Prom)?;
        let envelopes_invalid_total = IntCounter::new(
            "autodns_envelopes_invalid_total",
            "Envelopes dropped before dispatch",
        )
        .map_err(|_| MetricsError::Prom)?;

        let resolves_total = IntCounter::new("autodns_resolves_total", "Record lookups")
            .map_err(|_| MetricsError::Prom)?;
        let resolve_misses_total =
            IntCounter::new("autodns_resolve_misses_total", "Record lookups with no match")
                .map_err(|_| MetricsError::Prom)?;

        let records = IntGauge::new("autodns_records", "Stored records")
            .map_err(|_| MetricsError::Prom)?;
        let subdomains = IntGauge::new("autodns_subdomains", "Delegated subdomains")
            .map_err(|_| MetricsError::Prom)?;
        let message_seq = IntGauge::new("autodns_message_seq", "Accepted-message sequence")
            .map_err(|_| MetricsError::Prom)?;

        registry
            .register(Box::new(messages_total.clone()))
            .map_err(|_| MetricsError::Prom)?;
        registry
            .register(Box::new(messages_accepted_total.clone()))
            .map_err(|_| MetricsError::Prom)?;
        registry
            .register(Box::new(messages_rejected_total.clone()))
            .map_err(|_| MetricsError::Prom)?;
        registry
            .register(Box::new(envelopes_invalid_total.clone()))
            .map_err(|_| MetricsError::Prom)?;
        registry
            .register(Box::new(resolves_total.clone()))
            .map_err(|_| MetricsError::Prom)?;
        registry
            .register(Box::new(resolve_misses_total.clone()))
            .map_err(|_| MetricsError::Prom)?;
        registry
            .register(Box::new(records.clone()))
            .map_err(|_| MetricsError::Prom)?;
        registry
            .register(Box::new(subdomains.clone()))
            .map_err(|_| MetricsError::Prom)?;
        registry
            .register(Box::new(message_seq.clone()))
            .map_err(|_| MetricsError::Prom)?;

        Ok(Self {
            registry,
            messages_total,
            messages_accepted_total,
            messages_rejected_total,
            envelopes_invalid_total,
            resolves_total,
            resolve_misses_total,
            records,
            subdomains,
            message_seq,
        })
    }
}
