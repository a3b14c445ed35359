//! Shared fixtures for the integration flows.

use std::sync::Arc;
use std::time::Duration;

use registry_runtime::{Backends, RegistryConfig, RegistryContainer, RegistryRuntime, RegistryService};
use rg_01_queue_routing::TopologyOptions;
use shared_types::{
    sha256, FederatedStreamId, Transaction, TransactionHash, TransactionHeader, TransactionStatus,
};
use uuid::Uuid;

/// Registry name used by every fixture.
pub const REGISTRY: &str = "registry";

/// A transaction the development verifier accepts.
pub fn transaction(stream: Uuid, nonce: u32) -> Transaction {
    transaction_with(REGISTRY, "dev.Event", stream, nonce)
}

/// A transaction with a chosen registry and payload type.
pub fn transaction_with(registry: &str, payload_type: &str, stream: Uuid, nonce: u32) -> Transaction {
    let payload = format!("{{\"stream\":\"{stream}\",\"seq\":{nonce}}}").into_bytes();
    Transaction {
        header: TransactionHeader {
            federated_stream_id: FederatedStreamId::new(registry, stream),
            payload_type: payload_type.to_string(),
            payload_hash: sha256(&payload).to_vec(),
            nonce: nonce.to_string(),
        },
        header_signature: vec![],
        payload,
    }
}

/// Test configuration for one server of a `servers`-wide topology.
pub fn config(server_number: u32, servers: u32, threads: u32) -> RegistryConfig {
    RegistryConfig {
        processor: TopologyOptions::new(server_number, servers, threads),
        ..RegistryConfig::for_testing()
    }
}

/// Wire an instance over `backends`.
pub fn container(config: RegistryConfig, backends: &Backends) -> Arc<RegistryContainer> {
    Arc::new(RegistryContainer::new(config, backends.clone()).unwrap())
}

/// Wire and start an instance over `backends`.
pub async fn start(config: RegistryConfig, backends: &Backends) -> RegistryRuntime {
    let mut runtime = RegistryRuntime::new(container(config, backends));
    runtime.start().await.unwrap();
    runtime
}

/// Poll until `hash` reaches `want`; panics after `limit`.
pub async fn wait_for_status(
    service: &RegistryService,
    hash: &TransactionHash,
    want: TransactionStatus,
    limit: Duration,
) {
    let polled = tokio::time::timeout(limit, async {
        loop {
            let record = service.get_transaction_status(hash).await.unwrap();
            if record.status == want {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await;
    if polled.is_err() {
        let last = service.get_transaction_status(hash).await.unwrap();
        panic!("{hash} stuck at {:?} ({}), wanted {want:?}", last.status, last.message);
    }
}
