use cluster_router::{topics, ConnectionSnapshot, WorkerRuntime};
use integration_test_utils::{MemoryLogSink, RecordingExchange, RecordingStatusEmitter};
use serde_json::json;
use std::sync::Arc;

pub(crate) struct Fixture {
    pub(crate) runtime: WorkerRuntime,
    pub(crate) exchange: Arc<RecordingExchange>,
    pub(crate) logs: Arc<MemoryLogSink>,
    #[allow(dead_code)]
    pub(crate) statuses: Arc<RecordingStatusEmitter>,
}

/// Worker `worker_id` with every internal channel installed and `registry` in the shared store.
pub(crate) async fn make_fixture(worker_id: &str, registry: &[&str]) -> Fixture {
    make_fixture_with_snapshot(worker_id, registry, ConnectionSnapshot::default()).await
}

pub(crate) async fn make_fixture_with_snapshot(
    worker_id: &str,
    registry: &[&str],
    snapshot: ConnectionSnapshot,
) -> Fixture {
    integration_test_utils::init_logging();

    let exchange = Arc::new(RecordingExchange::new());
    exchange
        .seed(topics::WORKERS_STORE_KEY, json!(registry))
        .await;
    let logs = Arc::new(MemoryLogSink::new());
    let statuses = Arc::new(RecordingStatusEmitter::new());

    let runtime = WorkerRuntime::builder(worker_id, exchange.clone(), logs.clone())
        .status_emitter(statuses.clone())
        .connection_monitor(Arc::new(snapshot))
        .build();
    runtime
        .install_internal_channels()
        .await
        .expect("internal channels should install");

    Fixture {
        runtime,
        exchange,
        logs,
        statuses,
    }
}
