//! Per-core statistics tickers summed on demand.

use core::sync::atomic::{AtomicU64, Ordering};
use corelocal::{CoreLocalArray, PaddedCoreLocalArray};
use std::thread;

#[derive(Default)]
struct Tickers {
    reads: AtomicU64,
    writes: AtomicU64,
}

struct Statistics {
    per_core: PaddedCoreLocalArray<Tickers>,
}

impl Statistics {
    fn new() -> Self {
        Self {
            per_core: CoreLocalArray::new(),
        }
    }

    fn record_read(&self) {
        self.per_core.access().reads.fetch_add(1, Ordering::Relaxed);
    }

    fn record_writes(&self, n: u64) {
        // One core-id lookup for the whole batch.
        let (_, core) = self.per_core.access_element_and_index();
        for _ in 0..n {
            self.per_core.access_at_core(core).writes.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn totals(&self) -> (u64, u64) {
        self.per_core.iter().fold((0, 0), |(r, w), t| {
            (r + t.reads.load(Ordering::Relaxed), w + t.writes.load(Ordering::Relaxed))
        })
    }
}

fn main() {
    let stats = Statistics::new();
    println!("{} slots", stats.per_core.len());

    thread::scope(|s| {
        for _ in 0..8 {
            s.spawn(|| {
                for _ in 0..100_000 {
                    stats.record_read();
                }
                stats.record_writes(1_000);
            });
        }
    });

    let (reads, writes) = stats.totals();
    println!("reads = {reads}, writes = {writes}");
    for (core, tickers) in stats.per_core.iter().enumerate() {
        let reads = tickers.reads.load(Ordering::Relaxed);
        if reads > 0 {
            println!("  slot {core:>3}: {reads} reads");
        }
    }
}
