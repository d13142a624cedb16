//! Performance benchmarks for a3s-channel
//!
//! Run with: cargo bench

use a3s_channel::{json_channel, Encoder, FanoutHub, JsonCodec, MemoryTransport};
use bytes::Bytes;
use criterion::{criterion_group, criterion_main, Criterion};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Serialize, Deserialize)]
struct RateChanged {
    pair: String,
    rate: f64,
    source: String,
}

fn rate() -> RateChanged {
    RateChanged {
        pair: "USD/CNY".to_string(),
        rate: 7.35,
        source: "reuters".to_string(),
    }
}

fn bench_codec(c: &mut Criterion) {
    let codec = JsonCodec::new();
    let event = rate();

    c.bench_function("JsonCodec encode", |b| {
        b.iter(|| Encoder::<Bytes>::encode(&codec, &event).unwrap());
    });
}

fn bench_hub_broadcast(c: &mut Criterion) {
    let mut group = c.benchmark_group("hub_broadcast");
    for listeners in [1, 10, 100] {
        let hub: FanoutHub<u64> = FanoutHub::new();
        let subs: Vec<_> = (0..listeners).map(|_| hub.register(|_| {})).collect();

        group.bench_function(format!("{} listeners", listeners), |b| {
            b.iter(|| hub.broadcast(&42));
        });
        drop(subs);
    }
    group.finish();
}

fn bench_channel_publish(c: &mut Criterion) {
    let mut group = c.benchmark_group("channel_publish");
    for subscribers in [0, 1, 10] {
        let channel = json_channel(Arc::new(MemoryTransport::<Bytes>::new()));
        let subs: Vec<_> = (0..subscribers)
            .map(|_| channel.subscribe(|_: RateChanged| {}))
            .collect();
        let event = rate();

        group.bench_function(format!("{} subscribers", subscribers), |b| {
            b.iter(|| channel.publish(&event));
        });
        drop(subs);
    }
    group.finish();
}

fn bench_mixed_types(c: &mut Criterion) {
    let channel = json_channel(Arc::new(MemoryTransport::<Bytes>::new()));
    let _rates = channel.subscribe(|_: RateChanged| {});
    let _other = channel.subscribe(|_: Vec<u32>| {});
    let _any = channel.subscribe(|_: serde_json::Value| {});
    let event = rate();

    c.bench_function("publish to mixed-type subscribers", |b| {
        b.iter(|| channel.publish(&event));
    });
}

criterion_group!(
    benches,
    bench_codec,
    bench_hub_broadcast,
    bench_channel_publish,
    bench_mixed_types,
);
criterion_main!(benches);
