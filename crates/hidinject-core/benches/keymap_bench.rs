//! Criterion benchmarks for key code table lookups.
//!
//! Lookups sit on the per-key hot path of both bulk typing and live
//! passthrough, so they should stay in the low-nanosecond range.
//!
//! Run with:
//! ```bash
//! cargo bench --package hidinject-core --bench keymap_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hidinject_core::keymap::{HOTKEYS, INTERACTIVE, TEXT};
use hidinject_core::{InputKey, SpecialKey};

// ── Representative inputs ─────────────────────────────────────────────────────

/// Mix of letters, shifted symbols, whitespace, control codes and a miss.
const BENCH_BYTES: &[u8] = b"aZ5%\n\t ~\x03\x7f";

const BENCH_SPECIAL: &[SpecialKey] = &[
    SpecialKey::ArrowUp,
    SpecialKey::ArrowDown,
    SpecialKey::Backspace,
    SpecialKey::Escape,
];

// ── Benchmarks ────────────────────────────────────────────────────────────────

fn bench_ascii_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("keymap_ascii");

    group.bench_function("text_single", |b| {
        b.iter(|| TEXT.lookup_byte(black_box(b'a')))
    });

    group.bench_function("interactive_batch_10", |b| {
        b.iter(|| {
            BENCH_BYTES
                .iter()
                .map(|&byte| INTERACTIVE.lookup_byte(black_box(byte)))
                .collect::<Vec<_>>()
        })
    });

    // A miss must cost no more than a hit.
    group.bench_with_input(BenchmarkId::new("hotkeys_miss", "x"), &b'x', |b, &byte| {
        b.iter(|| HOTKEYS.lookup_byte(black_box(byte)))
    });

    group.finish();
}

fn bench_special_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("keymap_special");

    group.bench_function("special_batch_4", |b| {
        b.iter(|| {
            BENCH_SPECIAL
                .iter()
                .map(|&key| INTERACTIVE.lookup(black_box(InputKey::Special(key))))
                .collect::<Vec<_>>()
        })
    });

    group.finish();
}

criterion_group!(benches, bench_ascii_lookup, bench_special_lookup);
criterion_main!(benches);
