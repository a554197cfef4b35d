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

//! HTTP gateway: the node's only ingress.
//!
//! Envelope problems (encoding, expiry, signature) are transport failures and
//! map to HTTP error codes; contract outcomes always come back as a 200 with
//! a receipt carrying the contract's own status, accepted or not. The engine
//! is single-writer: one lock serializes every dispatch, and the snapshot is
//! committed to disk before the receipt is issued.

use crate::core::dns::contract::Phase;
use crate::core::dns::dispatch::{dispatch, Effect};
use crate::core::dns::AutoDns;
use crate::core::state::store::ContractStore;
use crate::gateway::envelope::SignedEnvelope;
use crate::monitoring::metrics::Metrics;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use prometheus::{Encoder, TextEncoder};
use serde::Serialize;
use serde_json::json;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tracing::{info, warn};

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Live node state behind the gateway.
pub struct NodeHandle {
    /// Contract state.
    pub contract: AutoDns,
    /// Durable store.
    pub store: ContractStore,
    /// Accepted-message sequence number.
    pub seq: u64,
}

/// Shared state for axum handlers.
#[derive(Clone)]
pub struct AppState {
    node: Arc<Mutex<NodeHandle>>,
    metrics: Arc<Metrics>,
    require_signatures: bool,
}

impl AppState {
    /// Wrap a node handle for the router, seeding gauges from its state.
    pub fn new(node: NodeHandle, metrics: Arc<Metrics>, require_signatures: bool) -> Self {
        metrics.records.set(node.contract.records().len() as i64);
        metrics.subdomains.set(node.contract.subdomains().len() as i64);
        metrics.message_seq.set(node.seq as i64);
        Self {
            node: Arc::new(Mutex::new(node)),
            metrics,
            require_signatures,
        }
    }
}

/// Receipt for one processed message. Status 0 is acceptance; non-zero values
/// are the contract's own rejection statuses.
#[derive(Debug, Serialize)]
pub struct Receipt {
    /// 0 accepted, 8 state full, 130 malformed, 132 access denied, 133 stopped.
    pub status: u32,
    /// Accepted-message sequence after this message.
    pub seq: u64,
    /// Operation label when accepted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub op: Option<String>,
    /// Rejection reason when not.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Termination payout recipient, base58.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flushed_to: Option<String>,
    /// Termination payout amount in nano-units, decimal string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flushed_amount: Option<String>,
}

/// Build the gateway router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/v1/message", post(post_message))
        .route("/v1/owner", get(get_owner))
        .route("/v1/record/:key", get(get_record))
        .route("/v1/subdomain/:label", get(get_subdomain))
        .route("/v1/info", get(get_info))
        .route("/metrics", get(get_metrics))
        .route("/healthz", get(healthz))
        .with_state(state)
}

/// Bind `listen_addr` and serve until `shutdown` resolves.
pub async fn serve<F>(listen_addr: &str, state: AppState, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr: SocketAddr = listen_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "http gateway listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

async fn post_message(
    State(state): State<AppState>,
    Json(req): Json<SignedEnvelope>,
) -> Response {
    state.metrics.messages_total.inc();

    let env = match req.parse() {
        Ok(env) => env,
        Err(e) => {
            state.metrics.envelopes_invalid_total.inc();
            return (StatusCode::BAD_REQUEST, Json(json!({ "error": e.to_string() })))
                .into_response();
        }
    };

    let now = now_ms();
    if let Err(e) = env.check_freshness(now) {
        state.metrics.envelopes_invalid_total.inc();
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": e.to_string() }))).into_response();
    }

    let mut node = state.node.lock().await;

    // A present signature is always verified, even when not required.
    if state.require_signatures || !env.signature.is_empty() {
        if let Err(e) = env.verify(node.contract.contract_id()) {
            state.metrics.envelopes_invalid_total.inc();
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response();
        }
    }

    let prev = node.contract.clone();
    match dispatch(&mut node.contract, &env.sender, env.value, &env.body, now / 1000) {
        Ok(effect) => {
            let seq = node.seq + 1;
            if let Err(e) = node.store.commit(&node.contract, seq) {
                // Keep memory and disk agreeing: undo and drop the message.
                node.contract = prev;
                warn!(error = %e, "state commit failed, message dropped");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "storage" })),
                )
                    .into_response();
            }
            node.seq = seq;
            state.metrics.messages_accepted_total.inc();
            state.metrics.message_seq.set(seq as i64);
            state.metrics.records.set(node.contract.records().len() as i64);
            state
                .metrics
                .subdomains
                .set(node.contract.subdomains().len() as i64);
            info!(op = effect.label(), seq, "message accepted");

            let (flushed_to, flushed_amount) = match &effect {
                Effect::Terminated { to, amount } => {
                    (Some(to.to_base58()), Some(amount.to_string()))
                }
                _ => (None, None),
            };
            Json(Receipt {
                status: 0,
                seq,
                op: Some(effect.label().to_string()),
                error: None,
                flushed_to,
                flushed_amount,
            })
            .into_response()
        }
        Err(e) => {
            state.metrics.messages_rejected_total.inc();
            info!(status = e.status(), reason = %e, "message rejected");
            Json(Receipt {
                status: e.status(),
                seq: node.seq,
                op: None,
                error: Some(e.to_string()),
                flushed_to: None,
                flushed_amount: None,
            })
            .into_response()
        }
    }
}

async fn get_owner(State(state): State<AppState>) -> Response {
    let node = state.node.lock().await;
    let owner = node.contract.owner();
    Json(json!({ "owner": owner.to_base58(), "owner_hex": owner.to_hex() })).into_response()
}

async fn get_record(State(state): State<AppState>, Path(key): Path<String>) -> Response {
    state.metrics.resolves_total.inc();
    let node = state.node.lock().await;
    match node.contract.resolve_record(&key) {
        Some(rec) => Json(json!({
            "key": key,
            "category": rec.category,
            "payload": hex::encode(&rec.payload),
        }))
        .into_response(),
        None => {
            state.metrics.resolve_misses_total.inc();
            (StatusCode::NOT_FOUND, Json(json!({ "error": "no record" }))).into_response()
        }
    }
}

async fn get_subdomain(State(state): State<AppState>, Path(label): Path<String>) -> Response {
    let node = state.node.lock().await;
    match node.contract.subdomain_owner(&label) {
        Some(owner) => {
            Json(json!({ "label": label, "owner": owner.to_base58() })).into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "no delegation" })),
        )
            .into_response(),
    }
}

async fn get_info(State(state): State<AppState>) -> Response {
    let node = state.node.lock().await;
    let c = &node.contract;
    let phase = match c.phase() {
        Phase::Active => "active",
        Phase::Terminated => "terminated",
    };
    Json(json!({
        "contract_id": hex::encode(c.contract_id()),
        "domain": c.domain(),
        "owner": c.owner().to_base58(),
        "phase": phase,
        "balance": c.balance().to_string(),
        "last_update": c.last_update(),
        "records": c.records().len(),
        "subdomains": c.subdomains().len(),
        "seq": node.seq,
    }))
    .into_response()
}

async fn get_metrics(State(state): State<AppState>) -> Response {
    let families = state.metrics.registry.gather();
    let mut buf = Vec::new();
    let encoder = TextEncoder::new();
    if encoder.encode(&families, &mut buf).is_err() {
        return (StatusCode::INTERNAL_SERVER_ERROR, String::new()).into_response();
    }
    String::from_utf8_lossy(&buf).into_owned().into_response()
}

async fn healthz() -> &'static str {
    "ok"
}
