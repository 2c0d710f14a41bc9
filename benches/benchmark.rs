//! Benchmarks for raftlog segment performance.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use raftlog::{Segment, SegmentOptions};
use tempfile::TempDir;

/// Benchmark sequential appends into a fresh segment.
fn bench_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("append");

    for count in [256u64, 1024, 4096].iter() {
        group.throughput(Throughput::Elements(*count));
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            b.iter_with_setup(
                || {
                    let dir = TempDir::new().unwrap();
                    let path = dir.path().join("00000001.segment");
                    let segment =
                        Segment::open(path, SegmentOptions::append().max_count(count as u16))
                            .unwrap();
                    (dir, segment)
                },
                |(_dir, mut segment)| {
                    let payload = [0x5au8; 100];
                    for i in 0..count {
                        segment.append(i, 1, &payload).unwrap();
                    }
                    black_box(())
                },
            );
        });
    }

    group.finish();
}

/// Benchmark appends with a sync after every write.
fn bench_append_sync_always(c: &mut Criterion) {
    let mut group = c.benchmark_group("append_sync_always");
    group.sample_size(10);

    group.throughput(Throughput::Elements(64));
    group.bench_function("64_entries", |b| {
        b.iter_with_setup(
            || {
                let dir = TempDir::new().unwrap();
                let path = dir.path().join("00000001.segment");
                let segment =
                    Segment::open(path, SegmentOptions::append().max_count(64)).unwrap();
                (dir, segment)
            },
            |(_dir, mut segment)| {
                let payload = [0x5au8; 100];
                for i in 0..64u64 {
                    segment.append(i, 1, &payload).unwrap();
                    segment.sync().unwrap();
                }
                black_box(())
            },
        );
    });

    group.finish();
}

/// Build a segment on disk for the read-side benchmarks.
fn build_segment(count: u64) -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("00000001.segment");
    let mut segment =
        Segment::open(&path, SegmentOptions::append().max_count(count as u16)).unwrap();
    for i in 0..count {
        let payload = format!("payload-{:08}", i);
        segment.append(i, 1, payload.as_bytes()).unwrap();
    }
    segment.sync().unwrap();
    segment.close().unwrap();
    (dir, path)
}

/// Benchmark sequential reads across a populated segment.
fn bench_read_sequential(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_sequential");

    let count = 4096u64;
    let (_dir, path) = build_segment(count);

    group.throughput(Throughput::Elements(count));
    group.bench_function("4096_entries", |b| {
        b.iter_with_setup(
            || Segment::open(&path, SegmentOptions::read()).unwrap(),
            |mut segment| {
                let entries = segment.read(0, count as usize).unwrap();
                black_box(entries)
            },
        );
    });

    group.finish();
}

/// Benchmark single-entry random reads.
fn bench_read_random(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_random");

    let count = 4096u64;
    let (_dir, path) = build_segment(count);
    let mut segment = Segment::open(&path, SegmentOptions::read()).unwrap();

    // Pseudo-random probe order
    let probes: Vec<u64> = (0..1000u64).map(|i| (i * 7919) % count).collect();

    group.throughput(Throughput::Elements(probes.len() as u64));
    group.bench_function("1000_probes", |b| {
        b.iter(|| {
            for &idx in &probes {
                let entries = segment.read(idx, 1).unwrap();
                black_box(entries);
            }
        });
    });

    group.finish();
}

/// Benchmark recovery cost: opening a populated segment in read mode.
fn bench_recovery(c: &mut Criterion) {
    let mut group = c.benchmark_group("recovery");

    for count in [1024u64, 4096].iter() {
        let (_dir, path) = build_segment(*count);
        group.throughput(Throughput::Elements(*count));
        group.bench_with_input(BenchmarkId::from_parameter(count), &path, |b, path| {
            b.iter(|| {
                let segment = Segment::open(path, SegmentOptions::read()).unwrap();
                black_box(segment.range())
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_append,
    bench_append_sync_always,
    bench_read_sequential,
    bench_read_random,
    bench_recovery
);
criterion_main!(benches);
