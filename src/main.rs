#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! AutoDNS node entrypoint (systemd-friendly).
//! Loads or constructs the contract, then serves the HTTP gateway.

use std::sync::Arc;

use autodns::core::dns::contract::AutoDns;
use autodns::core::state::store::ContractStore;
use autodns::core::types::{AccountId, ContractConfig, HttpConfig, NodeConfig, NodeSettings};
use autodns::gateway::http::{self, AppState, NodeHandle};
use autodns::monitoring::metrics::Metrics;
use tracing::{info, warn};

fn env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_flag(key: &str) -> bool {
    std::env::var(key)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Config comes from `AUTODNS_CONFIG` (TOML) when the file exists, with env
/// fallbacks for bare deployments.
fn load_config() -> NodeConfig {
    let path = env("AUTODNS_CONFIG", "autodns.toml");
    match std::fs::read_to_string(&path) {
        Ok(raw) => match toml::from_str::<NodeConfig>(&raw) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("bad config {path}: {e}");
                std::process::exit(1);
            }
        },
        Err(_) => NodeConfig {
            node: NodeSettings {
                name: env("AUTODNS_NODE_NAME", "autodns"),
                data_dir: env("AUTODNS_DATA_DIR", "./data"),
            },
            http: HttpConfig {
                listen_addr: env("AUTODNS_LISTEN", "127.0.0.1:9090"),
                require_signatures: cfg!(feature = "production"),
            },
            contract: ContractConfig {
                domain: env("AUTODNS_DOMAIN", "example.ton"),
                owner: std::env::var("AUTODNS_OWNER").ok(),
                initial_balance: 0,
            },
        },
    }
}

/// Resolve the construction-time owner: the configured account if present,
/// otherwise this node's own keystore account.
fn initial_owner(cfg: &NodeConfig) -> AccountId {
    if let Some(raw) = cfg.contract.owner.as_deref() {
        match raw.parse::<AccountId>() {
            Ok(owner) => return owner,
            Err(_) => {
                eprintln!("invalid contract.owner: {raw}");
                std::process::exit(1);
            }
        }
    }
    match autodns::core::security::keystore::Keystore::open(&cfg.node.data_dir) {
        Ok(ks) => {
            let account = ks.account();
            info!(owner = %account, "no owner configured; using node key");
            account
        }
        Err(e) => {
            eprintln!("keystore open failed: {e}");
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() {
    if env_flag("AUTODNS_LOG_JSON") {
        let _ = tracing_subscriber::fmt()
            .with_target(false)
            .with_level(true)
            .json()
            .try_init();
    } else {
        let _ = tracing_subscriber::fmt()
            .with_target(false)
            .with_level(true)
            .compact()
            .try_init();
    }

    let cfg = load_config();

    info!(
        node = %cfg.node.name,
        version = env!("CARGO_PKG_VERSION"),
        git = option_env!("VERGEN_GIT_SHA").unwrap_or("unknown"),
        data_dir = %cfg.node.data_dir,
        "autodns node starting"
    );

    let metrics: Arc<Metrics> = Arc::new(Metrics::new().expect("metrics init failed"));

    let ledger_path = format!("{}/ledger", cfg.node.data_dir);
    let store = match ContractStore::open(&ledger_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("ledger open failed: {e}");
            std::process::exit(1);
        }
    };

    let (contract, seq) = match store.load() {
        Ok(Some((contract, seq))) => {
            if contract.domain() != cfg.contract.domain {
                // Construction parameters only apply to an empty ledger.
                warn!(
                    stored = contract.domain(),
                    configured = %cfg.contract.domain,
                    "config domain differs from stored contract; keeping stored state"
                );
            }
            info!(
                domain = contract.domain(),
                owner = %contract.owner(),
                seq,
                "contract loaded"
            );
            (contract, seq)
        }
        Ok(None) => {
            let owner = initial_owner(&cfg);
            let contract = match AutoDns::construct(
                owner,
                cfg.contract.domain.clone(),
                u128::from(cfg.contract.initial_balance),
            ) {
                Ok(c) => c,
                Err(e) => {
                    eprintln!("contract construction failed: {e}");
                    std::process::exit(1);
                }
            };
            if let Err(e) = store.commit(&contract, 0) {
                eprintln!("initial commit failed: {e}");
                std::process::exit(1);
            }
            info!(
                contract_id = hex::encode(contract.contract_id()),
                domain = contract.domain(),
                owner = %owner,
                "contract constructed"
            );
            (contract, 0)
        }
        Err(e) => {
            eprintln!("ledger load failed: {e}");
            std::process::exit(1);
        }
    };

    let state = AppState::new(
        NodeHandle {
            contract,
            store,
            seq,
        },
        metrics,
        cfg.http.require_signatures,
    );

    let shutdown = async {
        let _ = tokio::signal::ctrl_c().await;
        info!("shutdown signal received");
    };

    if let Err(e) = http::serve(&cfg.http.listen_addr, state, shutdown).await {
        eprintln!("gateway failed: {e}");
        std::process::exit(1);
    }
}
