//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Benchmarks for rlogincodec performance

use bytes::BytesMut;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rloginix_rlogincodec::{consts, RloginCodec};
use std::hint::black_box;

fn connected_codec() -> RloginCodec {
    let mut codec = RloginCodec::new();
    codec.process_chunk(&[consts::HANDSHAKE_ACK]);
    codec
}

fn bench_inbound_plain(c: &mut Criterion) {
    let mut group = c.benchmark_group("inbound_plain");

    for size in [64, 1024, 16384].iter() {
        group.throughput(Throughput::Bytes(*size as u64));

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let mut codec = connected_codec();
            let chunk: Vec<u8> = (0..size).map(|i| b'a' + (i % 26) as u8).collect();

            b.iter(|| {
                let events = codec.process_chunk(black_box(&chunk));
                black_box(events);
            });
        });
    }

    group.finish();
}

fn bench_inbound_control_heavy(c: &mut Criterion) {
    let mut group = c.benchmark_group("inbound_control_heavy");

    group.bench_function("flow_control_mix", |b| {
        let mut codec = connected_codec();
        // Alternating text runs and XON/XOFF pairs.
        let mut chunk = Vec::with_capacity(1024);
        for _ in 0..64 {
            chunk.extend_from_slice(b"output");
            chunk.push(consts::XOFF);
            chunk.extend_from_slice(b"paused");
            chunk.push(consts::XON);
        }

        b.iter(|| {
            let events = codec.process_chunk(black_box(&chunk));
            black_box(events);
        });
    });

    group.finish();
}

fn bench_filter_input(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_input");

    group.throughput(Throughput::Bytes(1024));
    group.bench_function("plain_1k", |b| {
        let mut codec = connected_codec();
        let input: Vec<u8> = (0..1024).map(|i| b'a' + (i % 26) as u8).collect();
        let mut dst = BytesMut::with_capacity(2048);

        b.iter(|| {
            dst.clear();
            let disposition = codec.filter_input(black_box(&input), &mut dst);
            black_box(disposition);
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_inbound_plain,
    bench_inbound_control_heavy,
    bench_filter_input
);
criterion_main!(benches);
