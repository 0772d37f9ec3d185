//! Benchmarks for catalog lookups and snapshot parsing
//!
//! Lookups run on every order check; snapshot parsing runs once at startup.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use symbol_catalog::{Catalog, Symbol, SymbolCache, TradingStatus};

const SYMBOL_COUNT: usize = 30_000;

fn make_catalog() -> Catalog {
    (0..SYMBOL_COUNT)
        .map(|i| {
            Symbol::new(format!("SYM{}", i))
                .with_name(format!("SYMBOL {} INC", i))
                .with_lot_size(1)
                .with_tick_size(0.01)
                .with_trading_status(TradingStatus::Trading)
        })
        .collect()
}

fn bench_catalog_lookup(c: &mut Criterion) {
    let catalog = make_catalog();

    c.bench_function("catalog_lookup_hit", |b| {
        b.iter(|| black_box(catalog.get(black_box("SYM12345"))))
    });

    c.bench_function("catalog_lookup_miss", |b| {
        b.iter(|| black_box(catalog.get(black_box("NOPE"))))
    });
}

fn bench_snapshot_read(c: &mut Criterion) {
    let dir = tempfile::TempDir::new().unwrap();
    let cache = SymbolCache::new(dir.path().join("symbols.csv"));
    cache.write(&make_catalog()).unwrap();

    let mut group = c.benchmark_group("snapshot");
    group.throughput(Throughput::Elements(SYMBOL_COUNT as u64));
    group.sample_size(20);

    group.bench_function("read", |b| b.iter(|| black_box(cache.read().unwrap())));

    group.finish();
}

criterion_group!(benches, bench_catalog_lookup, bench_snapshot_read);
criterion_main!(benches);
