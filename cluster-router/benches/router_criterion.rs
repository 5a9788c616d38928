use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use cluster_router::{
    topics, Command, CommandCollection, CommandDescriptor, CommandKind, Exchange, LocalExchange,
    RuleOrder, TransportPhase, WorkerRuntime,
};
use integration_test_utils::{transacted_cluster_insert, untransacted_cluster_insert, MemoryLogSink};
use serde_json::json;
use std::sync::Arc;
use tokio::runtime::Builder;

const COLLECTION_ROWS: usize = 64;
const PIPELINE_BATCH_OPS: usize = 8;

struct BenchCommand(CommandDescriptor);

impl Command for BenchCommand {
    fn descriptor(&self) -> &CommandDescriptor {
        &self.0
    }
}

fn bench_commands() -> Vec<Arc<BenchCommand>> {
    let orders = [RuleOrder::High, RuleOrder::Mid, RuleOrder::Low];
    (0..COLLECTION_ROWS)
        .map(|row| {
            Arc::new(BenchCommand(CommandDescriptor::new(
                CommandKind::Custom("bench"),
                orders[row % orders.len()],
            )))
        })
        .collect()
}

async fn bench_runtime() -> WorkerRuntime {
    let exchange = Arc::new(LocalExchange::new(16));
    exchange
        .set(topics::WORKERS_STORE_KEY, json!(["w1", "w2"]))
        .await
        .expect("local store should accept the registry");
    let runtime = WorkerRuntime::builder("w1", exchange, Arc::new(MemoryLogSink::new())).build();
    runtime
        .install_internal_channels()
        .await
        .expect("internal channels should install");
    runtime.install_standard_channels(["dev:dog"]).await;
    runtime
}

fn router_criterion(c: &mut Criterion) {
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("benchmark runtime should build");

    let mut collection_group = c.benchmark_group("command_collection");
    collection_group.bench_function("ordered_insert", |b| {
        b.iter_batched(
            bench_commands,
            |commands| {
                let mut collection = CommandCollection::new();
                for command in commands {
                    collection
                        .add(command)
                        .expect("non-singleton orders should always insert");
                }
                black_box(collection.len());
            },
            BatchSize::SmallInput,
        );
    });
    collection_group.finish();

    let mut pipeline_group = c.benchmark_group("inbound_pipeline");
    pipeline_group.bench_function("transacted_insert", |b| {
        b.iter_batched(
            || runtime.block_on(bench_runtime()),
            |router| {
                for id in 0..PIPELINE_BATCH_OPS {
                    let outcome = runtime
                        .block_on(router.on_inbound(
                            transacted_cluster_insert("dev:dog", json!([{ "id": id }])),
                            TransportPhase::PublishIn,
                        ))
                        .expect("transacted insert should route");
                    black_box(outcome);
                }
            },
            BatchSize::SmallInput,
        );
    });
    pipeline_group.bench_function("worker_handoff", |b| {
        b.iter_batched(
            || runtime.block_on(bench_runtime()),
            |router| {
                for id in 0..PIPELINE_BATCH_OPS {
                    let outcome = runtime
                        .block_on(router.on_inbound(
                            untransacted_cluster_insert("dev:dog", json!([{ "id": id }])),
                            TransportPhase::PublishIn,
                        ))
                        .expect("handoff should route");
                    black_box(outcome);
                }
            },
            BatchSize::SmallInput,
        );
    });
    pipeline_group.finish();
}

criterion_group!(benches, router_criterion);
criterion_main!(benches);
