//! # Registry Benchmarks
//!
//! | Subsystem | Operation | Target |
//! |-----------|-----------|--------|
//! | rg-01 Queue Routing | ring lookup per transaction | < 5µs |
//! | rg-01 Queue Routing | ring construction, 128×128×100 nodes | < 2s |
//! | rg-02 Transaction Store | Merkle root over a full block | < 1s at 2^16 |
//! | rg-02 Transaction Store | inclusion proof | < 1ms |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;
use rg_01_queue_routing::{ConsistentHashRingQueueResolver, QueueResolver, TopologyOptions};
use rg_02_transaction_store::MerkleTree;
use std::time::Duration;

fn bench_queue_routing(c: &mut Criterion) {
    let mut group = c.benchmark_group("rg-01-queue-routing");

    let resolver =
        ConsistentHashRingQueueResolver::new(TopologyOptions::new(0, 3, 5).with_weight(20))
            .unwrap();
    let mut rng = rand::thread_rng();
    let keys: Vec<[u8; 16]> = (0..1024).map(|_| rng.gen()).collect();

    group.throughput(Throughput::Elements(keys.len() as u64));
    group.bench_function("queue_for_key_1024", |b| {
        b.iter(|| {
            for key in &keys {
                black_box(resolver.queue_for_key(key));
            }
        })
    });

    group.measurement_time(Duration::from_secs(10));
    for (servers, threads, weight) in [(3, 5, 20), (32, 32, 50), (128, 128, 100)] {
        let options = TopologyOptions::new(0, servers, threads).with_weight(weight);
        group.bench_with_input(
            BenchmarkId::new("build_ring", servers * threads * weight),
            &options,
            |b, options| {
                b.iter(|| black_box(ConsistentHashRingQueueResolver::new(options.clone()).unwrap()))
            },
        );
    }

    group.finish();
}

fn bench_merkle_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("rg-02-merkle-tree");

    for size in [16usize, 1024, 65_536] {
        let payloads: Vec<Vec<u8>> = (0..size)
            .map(|i| format!("{{\"seq\":{i}}}").into_bytes())
            .collect();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("root", size), &payloads, |b, payloads| {
            b.iter(|| {
                let tree = MerkleTree::from_payloads(payloads.iter().map(Vec::as_slice));
                black_box(tree.map(|t| t.root()))
            })
        });

        let tree = MerkleTree::from_payloads(payloads.iter().map(Vec::as_slice)).unwrap();
        group.bench_with_input(BenchmarkId::new("proof", size), &tree, |b, tree| {
            b.iter(|| black_box(tree.proof(size / 2)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_queue_routing, bench_merkle_tree);
criterion_main!(benches);
