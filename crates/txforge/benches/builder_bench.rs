//! Benchmarks for the builder flows of both families: build, sign, parse
//! and canonical JSON rendering.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use txforge::crypto::{Ed25519KeyPair, KeyPair};
use txforge::prelude::*;
use txforge::{EthTransaction, StakeTransaction};

const ETH_KEY: &str = "fad9c8855b740a0b7ed4c221dbad0f33a83a49cad6b3fe8d5817ac83d38b6a19";
const RECIPIENT: &str = "0x3535353535353535353535353535353535353535";

fn stake_account(seed: u8) -> String {
    Ed25519KeyPair::from_seed([seed; 32]).public_key().account_hex()
}

fn eth_builder(registry: &ChainRegistry, data: &[u8]) -> EthereumBuilder {
    let mut builder = registry.ethereum_builder("eth").unwrap();
    builder
        .fee(20_000_000_000u64)
        .unwrap()
        .nonce(7)
        .unwrap()
        .to(RECIPIENT)
        .unwrap()
        .value("1000000000000000000")
        .unwrap()
        .data(data.to_vec())
        .unwrap();
    builder
}

fn stake_builder(registry: &ChainRegistry) -> StakeBuilder {
    let mut builder = registry.stake_builder("stake").unwrap();
    builder
        .source(&stake_account(1))
        .unwrap()
        .fee(100_000_000u64)
        .unwrap()
        .target(&stake_account(2))
        .unwrap()
        .amount(2_500_000_000u64)
        .unwrap()
        .timestamp(1_700_000_000_000)
        .unwrap()
        .threshold(2)
        .unwrap();
    builder
}

fn signed_eth(registry: &ChainRegistry) -> String {
    let mut builder = eth_builder(registry, &[]);
    builder.build().unwrap();
    builder.sign(ETH_KEY).unwrap();
    builder.transaction().unwrap().to_serialized()
}

fn signed_stake(registry: &ChainRegistry) -> String {
    let mut builder = stake_builder(registry);
    builder.build().unwrap();
    builder.sign(&hex::encode([1u8; 32])).unwrap();
    builder.sign(&hex::encode([3u8; 32])).unwrap();
    builder.transaction().unwrap().to_serialized()
}

fn benchmark_build(c: &mut Criterion) {
    let registry = ChainRegistry::new();
    let mut group = c.benchmark_group("build");

    for size in [0usize, 256, 4096] {
        let data = vec![0xab; size];
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("ethereum", size), &data, |b, data| {
            b.iter(|| {
                let mut builder = eth_builder(&registry, black_box(data));
                black_box(builder.build().unwrap().to_serialized())
            });
        });
    }

    group.bench_function("stake", |b| {
        b.iter(|| {
            let mut builder = stake_builder(&registry);
            black_box(builder.build().unwrap().to_serialized())
        });
    });

    group.finish();
}

fn benchmark_sign(c: &mut Criterion) {
    let registry = ChainRegistry::new();
    let mut group = c.benchmark_group("sign");

    group.bench_function("ethereum", |b| {
        b.iter(|| {
            let mut builder = eth_builder(&registry, &[]);
            builder.build().unwrap();
            builder.sign(black_box(ETH_KEY)).unwrap();
        });
    });

    let stake_key = hex::encode([1u8; 32]);
    group.bench_function("stake", |b| {
        b.iter(|| {
            let mut builder = stake_builder(&registry);
            builder.build().unwrap();
            builder.sign(black_box(&stake_key)).unwrap();
        });
    });

    group.finish();
}

fn benchmark_parse(c: &mut Criterion) {
    let registry = ChainRegistry::new();
    let eth = signed_eth(&registry);
    let stake = signed_stake(&registry);
    let mut group = c.benchmark_group("parse");

    group.bench_function("ethereum/wire", |b| {
        b.iter(|| black_box(EthTransaction::from_serialized(black_box(&eth)).unwrap()));
    });
    group.bench_function("ethereum/builder", |b| {
        b.iter(|| {
            let mut builder = registry.ethereum_builder("eth").unwrap();
            builder.from(black_box(eth.as_str())).unwrap();
            black_box(builder.state())
        });
    });
    group.bench_function("stake/wire", |b| {
        b.iter(|| black_box(StakeTransaction::from_serialized(black_box(&stake)).unwrap()));
    });

    group.finish();
}

fn benchmark_canonical_json(c: &mut Criterion) {
    let registry = ChainRegistry::new();
    let eth = EthTransaction::from_serialized(&signed_eth(&registry)).unwrap();
    let stake = StakeTransaction::from_serialized(&signed_stake(&registry)).unwrap();

    // includes sender recovery and approval verification
    c.bench_function("json/ethereum", |b| {
        b.iter(|| black_box(eth.to_json().unwrap()));
    });
    c.bench_function("json/stake", |b| {
        b.iter(|| black_box(stake.to_json().unwrap()));
    });
}

criterion_group!(
    benches,
    benchmark_build,
    benchmark_sign,
    benchmark_parse,
    benchmark_canonical_json,
);

criterion_main!(benches);
